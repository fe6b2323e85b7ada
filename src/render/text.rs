// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-LoanTree-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Loan Tree and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use super::Canvas;

pub(crate) fn text_len(text: &str) -> usize {
    text.chars().count()
}

pub(crate) fn truncate_with_ellipsis(text: &str, max_len: usize) -> String {
    if max_len == 0 {
        return String::new();
    }
    if text_len(text) <= max_len {
        return text.to_owned();
    }

    let mut out: String = text.chars().take(max_len - 1).collect();
    out.push('…');
    out
}

/// `left` and `right` on one line of exactly `width` chars; `right` is dropped when both do not
/// fit with a space between them.
pub(crate) fn spread(left: &str, right: &str, width: usize) -> String {
    let left = truncate_with_ellipsis(left, width);
    let used = text_len(&left);
    let right_len = text_len(right);
    if right.is_empty() || used + 1 + right_len > width {
        return format!("{left:<width$}");
    }
    let gap = width - used - right_len;
    format!("{left}{:gap$}{right}", "")
}

/// Canvas text with trailing blanks and trailing empty lines removed.
pub(crate) fn canvas_to_string_trimmed(canvas: &Canvas) -> String {
    let rendered = canvas.to_string();
    let mut lines = rendered.lines().map(|line| line.trim_end_matches(' ')).collect::<Vec<_>>();
    while matches!(lines.last(), Some(line) if line.is_empty()) {
        lines.pop();
    }
    lines.join("\n")
}
