// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-LoanTree-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Loan Tree and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

/// Toolbar, panel, footer, popup and style helpers used by TUI rendering.
fn stack_main_panes_vertically(area: Rect) -> bool {
    area.width < 90
}

fn count_label(count: usize, noun: &str) -> String {
    if count == 1 {
        format!("1 {noun}")
    } else {
        format!("{count} {noun}s")
    }
}

fn view_title(label: &str, tail: Option<&str>) -> String {
    let mut title = format!("─ {label}");
    if let Some(tail) = tail.map(str::trim).filter(|tail| !tail.is_empty()) {
        title.push_str(" · ");
        title.push_str(tail);
    }
    title.push(' ');
    title
}

fn clamp_positive_i32_to_u16(value: i32) -> u16 {
    value.clamp(0, i32::from(u16::MAX)) as u16
}

fn pad_text(mut text: Text<'static>, left_pad: usize, top_pad: usize) -> Text<'static> {
    if left_pad > 0 {
        let pad = " ".repeat(left_pad);
        for line in &mut text.lines {
            line.spans.insert(0, Span::raw(pad.clone()));
        }
    }

    if top_pad > 0 {
        let mut lines = vec![Line::from(String::new()); top_pad];
        lines.extend(text.lines);
        text.lines = lines;
    }

    text
}

fn root_kind_key(kind: NodeKind) -> Option<char> {
    match kind {
        NodeKind::Account => Some('a'),
        NodeKind::Loan => Some('l'),
        NodeKind::Collateral => None,
    }
}

fn root_kind_for_key(key: char) -> Option<NodeKind> {
    ROOT_KINDS.iter().copied().find(|kind| root_kind_key(*kind) == Some(key))
}

fn key_span(key: impl Into<String>) -> Span<'static> {
    Span::styled(key.into(), Style::default().fg(FOOTER_KEY_COLOR).add_modifier(Modifier::BOLD))
}

fn toolbar_line(app: &App) -> Line<'static> {
    let separator = Style::default().fg(FOOTER_LABEL_COLOR);
    let mut spans = vec![
        Span::styled(
            TITLE.to_owned(),
            Style::default().fg(Color::White).add_modifier(Modifier::BOLD),
        ),
        Span::styled(" │ ", separator),
        Span::raw(count_label(app.store.len(), "node")),
        Span::styled(" │ ", separator),
    ];
    for kind in ROOT_KINDS {
        let Some(key) = root_kind_key(*kind) else {
            continue;
        };
        spans.push(key_span(key.to_string()));
        spans.push(Span::styled(
            format!(" Add {}  ", kind.display_name()),
            app.theme.node_style(*kind),
        ));
    }
    Line::from(spans)
}

fn panel_kv(key: &str, value: impl Into<String>) -> Line<'static> {
    Line::from(vec![
        Span::styled(format!("{key}: "), Style::default().fg(FOOTER_LABEL_COLOR)),
        Span::raw(value.into()),
    ])
}

fn panel_action(key: &str, desc: impl Into<String>) -> Line<'static> {
    Line::from(vec![key_span(format!("[{key}]")), Span::raw(" "), Span::raw(desc.into())])
}

fn detail_panel_title(app: &App) -> String {
    match app.store.selected_node() {
        Some(node) => view_title("Details", Some(node.kind().display_name())),
        None => view_title("Tree", None),
    }
}

fn detail_panel_lines(app: &App) -> Vec<Line<'static>> {
    let Some(node) = app.store.selected_node() else {
        return tree_panel_lines(app);
    };

    let kind = node.kind();
    let description = node.data().description().filter(|text| !text.is_empty());
    let created = node
        .data()
        .created_date()
        .map_or_else(|| "—".to_owned(), |date| date.format("%Y-%m-%d").to_string());

    let mut lines = vec![
        Line::from(vec![
            Span::styled("Kind: ", Style::default().fg(FOOTER_LABEL_COLOR)),
            Span::styled(kind.display_name().to_owned(), app.theme.node_style(kind)),
        ]),
        panel_kv("ID", node.id().as_str()),
        panel_kv("Label", node.label()),
        panel_kv("Description", description.unwrap_or("—")),
        panel_kv("Children", node.children().len().to_string()),
        panel_kv("Created", created),
        Line::from(""),
        panel_action("e", "Edit label"),
        panel_action("d", "Edit description"),
    ];
    for (idx, child_kind) in kind.allowed_children().iter().enumerate() {
        lines.push(panel_action(
            &(idx + 1).to_string(),
            format!("Add {}", child_kind.display_name()),
        ));
    }
    lines.push(panel_action("D", "Delete node and children"));
    lines.push(panel_action("Esc", "Clear selection"));
    lines
}

fn tree_panel_lines(app: &App) -> Vec<Line<'static>> {
    let issues = check_tree(app.store.nodes(), app.store.selected_id()).len();
    let integrity = if issues == 0 {
        Span::raw("no issues")
    } else {
        Span::styled(count_label(issues, "issue"), app.theme.error_style())
    };

    vec![
        Line::styled("No node selected", app.theme.dim_style()),
        Line::from(""),
        panel_kv("Nodes", app.store.len().to_string()),
        panel_kv("Roots", app.store.roots().len().to_string()),
        Line::from(vec![
            Span::styled("Integrity: ", Style::default().fg(FOOTER_LABEL_COLOR)),
            integrity,
        ]),
        Line::from(""),
        panel_action("X", "Export JSON"),
        panel_action("I", "Import JSON"),
        panel_action("C", "Clear tree"),
    ]
}

fn footer_help_line(app: &App, toast: Option<&str>) -> Line<'static> {
    let mut spans = Vec::<Span<'static>>::new();
    if app.store.selected_id().is_some() {
        push_footer_entry(&mut spans, "LABEL", "e");
        push_footer_entry(&mut spans, "DESCRIPTION", "d");
        let child_kinds =
            app.store.selected_node().map_or(0, |node| node.kind().allowed_children().len());
        match child_kinds {
            0 => {}
            1 => push_footer_entry(&mut spans, "CHILD", "1"),
            n => push_footer_entry(&mut spans, "CHILD", &format!("1-{n}")),
        }
        push_footer_entry(&mut spans, "DELETE", "D");
        push_footer_entry(&mut spans, "MOVE", "←↑↓→");
    } else {
        push_footer_entry(&mut spans, "EXPORT", "X");
        push_footer_entry(&mut spans, "IMPORT", "I");
        push_footer_entry(&mut spans, "CLEAR", "C");
        push_footer_entry(&mut spans, "SELECT", "Tab");
    }
    push_footer_entry(&mut spans, "HELP", "?");
    push_footer_entry(&mut spans, "QUIT", "q");
    push_toast(&mut spans, toast);
    Line::from(spans)
}

fn prompt_footer_line(prompt: &Prompt, toast: Option<&str>) -> Line<'static> {
    let mut spans = vec![
        Span::styled(
            prompt_prefix(prompt),
            Style::default().fg(FOOTER_KEY_COLOR).add_modifier(Modifier::BOLD),
        ),
        Span::raw(prompt.input.clone()),
        Span::raw("   "),
    ];
    push_footer_entry(&mut spans, "COMMIT", "Enter");
    push_footer_entry(&mut spans, "CANCEL", "Esc");
    push_toast(&mut spans, toast);
    Line::from(spans)
}

fn prompt_prefix(prompt: &Prompt) -> String {
    format!("{}: ", prompt.kind.title())
}

fn push_toast(spans: &mut Vec<Span<'static>>, toast: Option<&str>) {
    let Some(message) = toast.map(str::trim).filter(|message| !message.is_empty()) else {
        return;
    };
    spans.push(Span::styled(" | ", Style::default().fg(FOOTER_LABEL_COLOR)));
    spans.push(Span::styled("Toast:".to_owned(), Style::default().fg(FOOTER_LABEL_COLOR)));
    spans.push(Span::raw(message.to_owned()));
}

fn help_key_style() -> Style {
    Style::default().fg(FOOTER_KEY_COLOR).add_modifier(Modifier::BOLD)
}

fn help_header_style() -> Style {
    Style::default().fg(Color::White).add_modifier(Modifier::BOLD)
}

fn centered_rect(width_percent: u16, height_percent: u16, area: Rect) -> Rect {
    let vertical_margin = (100u16.saturating_sub(height_percent)) / 2;
    let horizontal_margin = (100u16.saturating_sub(width_percent)) / 2;

    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage(vertical_margin),
            Constraint::Percentage(height_percent),
            Constraint::Percentage(vertical_margin),
        ])
        .split(area);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage(horizontal_margin),
            Constraint::Percentage(width_percent),
            Constraint::Percentage(horizontal_margin),
        ])
        .split(vertical[1])[1]
}

fn help_kv(key: &str, desc: &str, key_width: usize, key_style: Style) -> Line<'static> {
    Line::from(vec![
        Span::styled(format!("{key:>key_width$}"), key_style),
        Span::raw("  "),
        Span::raw(desc.to_owned()),
    ])
}

fn help_lines() -> Vec<Line<'static>> {
    let key_style = help_key_style();
    let header_style = help_header_style();
    let key_width = "Shift-Tab".len();

    let sections: [(&str, &[(&str, &str)]); 4] = [
        (
            "--- Global ---",
            &[("?", "Help (toggle)"), ("q", "Quit"), ("a", "Add account"), ("l", "Add loan")],
        ),
        (
            "--- Navigation ---",
            &[
                ("↑", "Select parent"),
                ("↓", "Select first child"),
                ("←/→", "Neighbour in the same row"),
                ("Tab", "Next node"),
                ("Shift-Tab", "Previous node"),
                ("Esc", "Clear selection"),
                ("PgUp/PgDn", "Scroll diagram"),
                ("</>", "Scroll sideways"),
                ("Click", "Select node or clear"),
            ],
        ),
        (
            "--- Selected node ---",
            &[
                ("e", "Edit label"),
                ("d", "Edit description"),
                ("1..9", "Add child of the listed kind"),
                ("D/Del", "Delete node and children"),
            ],
        ),
        (
            "--- Tree ---",
            &[("X", "Export JSON"), ("I", "Import JSON from file"), ("C", "Clear tree")],
        ),
    ];

    let mut lines = Vec::<Line<'static>>::new();
    for (header, entries) in sections {
        if !lines.is_empty() {
            lines.push(Line::from(""));
        }
        lines.push(Line::from(Span::styled(header, header_style)));
        for (key, desc) in entries {
            lines.push(help_kv(key, desc, key_width, key_style));
        }
    }
    lines
}

fn render_help(frame: &mut Frame<'_>, app: &mut App, main_area: Rect) {
    let area = centered_rect(70, 80, main_area);
    frame.render_widget(Clear, area);

    let lines = help_lines();
    let block = Block::default()
        .borders(Borders::ALL)
        .title("─ Help ─")
        .border_style(Style::default().fg(FOCUS_COLOR))
        .title_style(Style::default().fg(FOCUS_COLOR).add_modifier(Modifier::BOLD));
    let inner = block.inner(area);
    app.help_viewport_height = inner.height;
    let max_scroll = lines
        .len()
        .saturating_sub(usize::from(inner.height.max(1)))
        .min(usize::from(u16::MAX)) as u16;
    app.help_scroll = app.help_scroll.min(max_scroll);

    let paragraph = Paragraph::new(lines)
        .block(block)
        .wrap(Wrap { trim: false })
        .scroll((app.help_scroll, 0));
    frame.render_widget(paragraph, area);
}

fn render_confirm(frame: &mut Frame<'_>, theme: &TuiTheme, question: &str, main_area: Rect) {
    let area = centered_rect(60, 30, main_area);
    frame.render_widget(Clear, area);

    let lines = vec![
        Line::from(question.to_owned()),
        Line::from(""),
        Line::from(vec![
            key_span("y"),
            Span::raw(" confirm   "),
            key_span("n"),
            Span::raw(" cancel"),
        ]),
    ];
    let block = Block::default()
        .borders(Borders::ALL)
        .title("─ Confirm ─")
        .border_style(theme.error_style());
    frame.render_widget(Paragraph::new(lines).block(block).wrap(Wrap { trim: false }), area);
}

fn push_footer_entry(spans: &mut Vec<Span<'static>>, label: &str, value: &str) {
    if !spans.is_empty() {
        spans.push(Span::styled(" | ", Style::default().fg(FOOTER_LABEL_COLOR)));
    }
    spans.push(Span::styled(
        format!("{}:", footer_label_ucfirst(label)),
        Style::default().fg(FOOTER_LABEL_COLOR),
    ));
    spans.push(key_span(value));
}

fn footer_label_ucfirst(label: &str) -> String {
    let lower = label.to_lowercase();
    let mut chars = lower.chars();
    let Some(first) = chars.next() else {
        return String::new();
    };
    let mut out = first.to_uppercase().collect::<String>();
    out.push_str(chars.as_str());
    out
}
