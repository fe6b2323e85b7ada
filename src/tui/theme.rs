// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-LoanTree-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Loan Tree and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use ratatui::style::{Color, Modifier, Style};

use crate::model::NodeKind;

/// Colours used by the diagram and panels.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct TuiTheme {
    account: Color,
    loan: Color,
    collateral: Color,
    connector: Color,
    focus: Color,
}

impl Default for TuiTheme {
    fn default() -> Self {
        Self {
            account: Color::LightBlue,
            loan: Color::LightGreen,
            collateral: Color::Yellow,
            connector: Color::DarkGray,
            focus: Color::LightCyan,
        }
    }
}

impl TuiTheme {
    pub(crate) fn kind_color(&self, kind: NodeKind) -> Color {
        match kind {
            NodeKind::Account => self.account,
            NodeKind::Loan => self.loan,
            NodeKind::Collateral => self.collateral,
        }
    }

    /// Box border and heading of an unselected node.
    pub(crate) fn node_style(&self, kind: NodeKind) -> Style {
        Style::default().fg(self.kind_color(kind))
    }

    /// Whole box of the selected node.
    pub(crate) fn selected_node_style(&self, kind: NodeKind) -> Style {
        Style::default()
            .fg(Color::Black)
            .bg(self.kind_color(kind))
            .add_modifier(Modifier::BOLD)
    }

    pub(crate) fn connector_style(&self) -> Style {
        Style::default().fg(self.connector)
    }

    pub(crate) fn panel_border_style(&self, focused: bool) -> Style {
        if focused {
            Style::default().fg(self.focus)
        } else {
            Style::default()
        }
    }

    pub(crate) fn error_style(&self) -> Style {
        Style::default().fg(Color::LightRed)
    }

    pub(crate) fn dim_style(&self) -> Style {
        Style::default().fg(Color::DarkGray)
    }
}
