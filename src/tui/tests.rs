// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-LoanTree-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Loan Tree and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::env;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

use chrono::Utc;
use crossterm::event::{KeyCode, KeyModifiers, MouseButton, MouseEvent, MouseEventKind};
use ratatui::{backend::TestBackend, layout::Rect, Terminal};
use rstest::{fixture, rstest};

use super::{
    clamp_pan_axis, count_label, detail_panel_lines, draw, footer_help_line, footer_label_ucfirst,
    pad_text, root_kind_for_key, view_title, App, Mode, PromptKind, TuiOptions,
};
use crate::model::{fixtures, NodeId, NodeKind};
use crate::store::{export_file_name, TreeStore};

static TEMP_DIR_COUNTER: AtomicUsize = AtomicUsize::new(0);

struct TempDir {
    path: PathBuf,
}

impl TempDir {
    fn new(prefix: &str) -> Self {
        let nanos = SystemTime::now().duration_since(UNIX_EPOCH).unwrap_or_default().as_nanos();
        let counter = TEMP_DIR_COUNTER.fetch_add(1, Ordering::Relaxed);
        let mut path = env::temp_dir();
        path.push(format!("loan-tree-{prefix}-{}-{nanos}-{counter}", std::process::id()));
        std::fs::create_dir_all(&path).expect("create temp dir");
        Self { path }
    }

    fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for TempDir {
    fn drop(&mut self) {
        let _ = std::fs::remove_dir_all(&self.path);
    }
}

struct AppCtx {
    tmp: TempDir,
    app: App,
}

impl AppCtx {
    fn new(store: TreeStore) -> Self {
        let tmp = TempDir::new("tui");
        let app = App::new(store, TuiOptions { export_dir: tmp.path().to_path_buf() });
        Self { tmp, app }
    }

    fn press(&mut self, codes: &[KeyCode]) {
        for code in codes {
            assert!(!self.app.handle_key_code(*code), "{code:?} quit the app");
        }
    }

    fn type_text(&mut self, text: &str) {
        for ch in text.chars() {
            self.press(&[KeyCode::Char(ch)]);
        }
    }

    fn selected(&self) -> Option<&str> {
        self.app.store.selected_id().map(NodeId::as_str)
    }

    fn select(&mut self, id: &str) {
        self.app.select(Some(nid(id)));
    }

    fn toast(&self) -> Option<&str> {
        self.app.toast.as_ref().map(|toast| toast.message.as_str())
    }
}

#[fixture]
fn demo() -> AppCtx {
    AppCtx::new(TreeStore::from_nodes(fixtures::demo_portfolio()))
}

#[fixture]
fn empty() -> AppCtx {
    AppCtx::new(TreeStore::new())
}

fn nid(value: &str) -> NodeId {
    NodeId::new(value).expect("node id")
}

fn line_to_string(line: &ratatui::text::Line<'_>) -> String {
    line.spans.iter().map(|span| span.content.as_ref()).collect::<String>()
}

fn buffer_to_string(terminal: &Terminal<TestBackend>) -> String {
    let buffer = terminal.backend().buffer();
    let width = usize::from(buffer.area.width);
    buffer
        .content()
        .chunks(width)
        .map(|row| row.iter().map(|cell| cell.symbol()).collect::<String>())
        .collect::<Vec<_>>()
        .join("\n")
}

#[rstest]
fn root_keys_create_and_select_roots(empty: AppCtx) {
    let mut ctx = empty;
    ctx.press(&[KeyCode::Char('a')]);
    let account = ctx.app.store.selected_node().expect("selected");
    assert_eq!(account.kind(), NodeKind::Account);
    assert!(account.is_root());

    ctx.press(&[KeyCode::Char('l')]);
    assert_eq!(ctx.app.store.selected_node().map(|n| n.kind()), Some(NodeKind::Loan));
    assert_eq!(ctx.app.store.roots().len(), 2);
}

#[test]
fn only_root_kinds_have_toolbar_keys() {
    assert_eq!(root_kind_for_key('a'), Some(NodeKind::Account));
    assert_eq!(root_kind_for_key('l'), Some(NodeKind::Loan));
    assert_eq!(root_kind_for_key('c'), None);
}

#[rstest]
fn digits_add_children_of_allowed_kinds(demo: AppCtx) {
    let mut ctx = demo;
    ctx.select("acct-main");

    ctx.press(&[KeyCode::Char('2')]);
    let created = ctx.app.store.selected_node().expect("new child");
    assert_eq!(created.kind(), NodeKind::Collateral);
    assert_eq!(created.parent_id().map(NodeId::as_str), Some("acct-main"));

    ctx.select("loan-term");
    ctx.press(&[KeyCode::Char('1')]);
    assert_eq!(ctx.app.store.selected_node().map(|n| n.kind()), Some(NodeKind::Collateral));
    assert_eq!(ctx.app.store.node("loan-term").map(|n| n.children().len()), Some(3));
}

#[rstest]
fn digits_without_matching_kind_only_toast(demo: AppCtx) {
    let mut ctx = demo;
    ctx.select("coll-plant");
    let before = ctx.app.store.clone();

    ctx.press(&[KeyCode::Char('1')]);
    assert_eq!(ctx.app.store, before);
    assert_eq!(ctx.toast(), Some("Collateral has no child type 1"));
}

#[rstest]
fn label_prompt_commits_on_enter(demo: AppCtx) {
    let mut ctx = demo;
    ctx.select("loan-term");

    ctx.press(&[KeyCode::Char('e')]);
    assert!(matches!(
        &ctx.app.mode,
        Mode::Prompt(prompt) if prompt.kind == PromptKind::Label(nid("loan-term")) && prompt.input == "Term Loan A"
    ));
    ctx.press(&[KeyCode::Backspace]);
    ctx.type_text("B");
    ctx.press(&[KeyCode::Enter]);

    assert_eq!(ctx.app.mode, Mode::Normal);
    assert_eq!(ctx.app.store.node("loan-term").map(|n| n.label()), Some("Term Loan B"));
}

#[rstest]
fn description_prompt_cancels_on_esc(demo: AppCtx) {
    let mut ctx = demo;
    ctx.select("loan-term");
    let before = ctx.app.store.clone();

    ctx.press(&[KeyCode::Char('d')]);
    ctx.type_text("5y amortising");
    ctx.press(&[KeyCode::Esc]);

    assert_eq!(ctx.app.mode, Mode::Normal);
    assert_eq!(ctx.app.store, before);
    assert_eq!(ctx.selected(), Some("loan-term"));
}

#[rstest]
fn description_prompt_commits(demo: AppCtx) {
    let mut ctx = demo;
    ctx.select("coll-fleet");
    ctx.press(&[KeyCode::Char('d')]);
    ctx.type_text("12 trucks");
    ctx.press(&[KeyCode::Enter]);

    assert_eq!(
        ctx.app.store.node("coll-fleet").and_then(|n| n.data().description()),
        Some("12 trucks")
    );
}

#[rstest]
fn delete_waits_for_confirmation(demo: AppCtx) {
    let mut ctx = demo;
    ctx.select("loan-term");

    ctx.press(&[KeyCode::Char('D')]);
    assert!(matches!(
        &ctx.app.mode,
        Mode::Confirm { question, .. }
            if question == "Are you sure you want to delete \"Term Loan A\" and all its children?"
    ));
    ctx.press(&[KeyCode::Char('n')]);
    assert!(ctx.app.store.contains("loan-term"));

    ctx.press(&[KeyCode::Delete, KeyCode::Char('y')]);
    assert!(!ctx.app.store.contains("loan-term"));
    assert!(!ctx.app.store.contains("coll-plant"));
    assert_eq!(ctx.selected(), None);
    assert_eq!(ctx.toast(), Some("Deleted 3 nodes"));
}

#[rstest]
fn clear_needs_empty_selection_and_confirmation(demo: AppCtx) {
    let mut ctx = demo;
    ctx.select("loan-term");
    ctx.press(&[KeyCode::Char('C')]);
    assert_eq!(ctx.app.mode, Mode::Normal);

    ctx.press(&[KeyCode::Esc, KeyCode::Char('C')]);
    assert!(matches!(ctx.app.mode, Mode::Confirm { .. }));
    ctx.press(&[KeyCode::Char('y')]);
    assert!(ctx.app.store.is_empty());
    assert_eq!(ctx.toast(), Some("Tree cleared"));
}

#[rstest]
fn arrows_follow_the_tree(demo: AppCtx) {
    let mut ctx = demo;
    ctx.select("acct-main");

    ctx.press(&[KeyCode::Down]);
    assert_eq!(ctx.selected(), Some("loan-term"));
    ctx.press(&[KeyCode::Right]);
    assert_eq!(ctx.selected(), Some("loan-credit"));
    ctx.press(&[KeyCode::Down]);
    assert_eq!(ctx.selected(), Some("coll-receivables"));
    ctx.press(&[KeyCode::Up, KeyCode::Up]);
    assert_eq!(ctx.selected(), Some("acct-main"));

    // Roots have no parent; the selection stays.
    ctx.press(&[KeyCode::Up]);
    assert_eq!(ctx.selected(), Some("acct-main"));
    ctx.press(&[KeyCode::Esc]);
    assert_eq!(ctx.selected(), None);
}

#[rstest]
fn tab_walks_the_layout_order(demo: AppCtx) {
    let mut ctx = demo;
    ctx.press(&[KeyCode::Tab]);
    assert_eq!(ctx.selected(), Some("acct-main"));
    ctx.press(&[KeyCode::Tab]);
    assert_eq!(ctx.selected(), Some("loan-bridge"));
    ctx.press(&[KeyCode::BackTab, KeyCode::BackTab]);
    assert_eq!(ctx.selected(), Some("coll-receivables"));
}

#[rstest]
fn export_writes_dated_file(demo: AppCtx) {
    let mut ctx = demo;
    ctx.press(&[KeyCode::Char('X')]);

    let path = ctx.tmp.path().join(export_file_name(Utc::now().date_naive()));
    let text = std::fs::read_to_string(&path).expect("export file");
    let mut reloaded = TreeStore::new();
    assert_eq!(reloaded.import_json(&text).expect("import"), 9);
    assert_eq!(reloaded.nodes(), ctx.app.store.nodes());
    assert!(ctx.toast().is_some_and(|toast| toast.starts_with("Exported 9 nodes to ")));
}

#[rstest]
fn import_prompt_reads_a_file(empty: AppCtx) {
    let mut ctx = empty;
    let source = TreeStore::from_nodes(fixtures::chain()).export_json().expect("export");
    let path = ctx.tmp.path().join("chain.json");
    std::fs::write(&path, source).expect("write");

    ctx.press(&[KeyCode::Char('I')]);
    ctx.type_text(&path.display().to_string());
    ctx.press(&[KeyCode::Enter]);

    assert_eq!(ctx.app.store.len(), 3);
    assert_eq!(ctx.toast(), Some("Imported 3 nodes"));
}

#[rstest]
fn import_reports_integrity_issues(empty: AppCtx) {
    let mut ctx = empty;
    let source = TreeStore::from_nodes(fixtures::inconsistent()).export_json().expect("export");
    let path = ctx.tmp.path().join("odd.json");
    std::fs::write(&path, source).expect("write");

    ctx.app.import_from_path(&path.display().to_string());
    assert_eq!(ctx.app.store.len(), 4);
    assert!(ctx.toast().is_some_and(|toast| toast.contains("integrity issue")));
}

#[rstest]
fn invalid_import_keeps_the_tree(demo: AppCtx) {
    let mut ctx = demo;
    let path = ctx.tmp.path().join("broken.json");
    std::fs::write(&path, "{ nope").expect("write");
    let before = ctx.app.store.clone();

    ctx.app.import_from_path(&path.display().to_string());
    assert_eq!(ctx.app.store, before);
    assert!(ctx.toast().is_some_and(|toast| toast.starts_with("Invalid JSON format: ")));

    ctx.app.import_from_path(&ctx.tmp.path().join("missing.json").display().to_string());
    assert_eq!(ctx.app.store, before);
    assert!(ctx.toast().is_some_and(|toast| toast.starts_with("Cannot read ")));
}

#[rstest]
fn clicks_select_nodes_and_clear_on_empty_canvas(demo: AppCtx) {
    let mut ctx = demo;
    ctx.app.diagram_viewport = Rect::new(1, 1, 120, 30);
    ctx.app.pan_x = 0;
    ctx.app.pan_y = 0;

    let click = |column, row| MouseEvent {
        kind: MouseEventKind::Down(MouseButton::Left),
        column,
        row,
        modifiers: KeyModifiers::NONE,
    };

    // acct-main occupies cells 49..=74 of rows 0..=4.
    ctx.app.handle_mouse(click(1 + 50, 1 + 1));
    assert_eq!(ctx.selected(), Some("acct-main"));

    ctx.app.handle_mouse(click(1 + 40, 1 + 2));
    assert_eq!(ctx.selected(), None);

    ctx.select("loan-term");
    ctx.app.handle_mouse(click(0, 0));
    assert_eq!(ctx.selected(), Some("loan-term"));
}

#[rstest]
fn selection_is_revealed_inside_a_small_viewport(demo: AppCtx) {
    let mut ctx = demo;
    ctx.app.diagram_viewport = Rect::new(1, 1, 40, 10);
    ctx.app.pan_x = 0;
    ctx.app.pan_y = 0;
    ctx.app.center_diagram_on_next_draw = false;

    ctx.select("coll-property");
    ctx.app.reveal_selection_if_needed();

    // coll-property spans columns 112..=137 and rows 8..=12.
    assert!(ctx.app.pan_x <= 112 && ctx.app.pan_x + 40 > 137);
    assert!(ctx.app.pan_y <= 8 && ctx.app.pan_y + 10 > 12);
}

#[test]
fn pan_axis_clamps_to_content() {
    assert_eq!(clamp_pan_axis(500, 138, 40), 99);
    assert_eq!(clamp_pan_axis(-20, 138, 40), -1);
    // Narrow content is pinned to its centred position.
    assert_eq!(clamp_pan_axis(5, 20, 60), -20);
}

#[rstest]
fn panel_lists_node_details(demo: AppCtx) {
    let mut ctx = demo;
    ctx.select("loan-term");
    let lines = detail_panel_lines(&ctx.app).iter().map(line_to_string).collect::<Vec<_>>();

    assert_eq!(lines[0], "Kind: Loan");
    assert_eq!(lines[1], "ID: loan-term");
    assert_eq!(lines[2], "Label: Term Loan A");
    assert_eq!(lines[4], "Children: 2");
    assert!(lines.iter().any(|line| line == "[1] Add Collateral"));
    assert!(lines.iter().any(|line| line == "[D] Delete node and children"));
}

#[rstest]
fn panel_without_selection_offers_tree_actions(demo: AppCtx) {
    let lines = detail_panel_lines(&demo.app).iter().map(line_to_string).collect::<Vec<_>>();
    assert_eq!(lines[0], "No node selected");
    assert!(lines.contains(&"Nodes: 9".to_owned()));
    assert!(lines.contains(&"Roots: 2".to_owned()));
    assert!(lines.contains(&"Integrity: no issues".to_owned()));
    assert!(lines.contains(&"[X] Export JSON".to_owned()));
}

#[rstest]
fn footer_switches_with_selection(demo: AppCtx) {
    let mut ctx = demo;
    let footer = line_to_string(&footer_help_line(&ctx.app, Some("Saved")));
    assert_eq!(
        footer,
        "Export:X | Import:I | Clear:C | Select:Tab | Help:? | Quit:q | Toast:Saved"
    );

    ctx.select("acct-main");
    let footer = line_to_string(&footer_help_line(&ctx.app, None));
    assert!(footer.starts_with("Label:e | Description:d | Child:1-2 | Delete:D"));
}

#[test]
fn chrome_helpers() {
    assert_eq!(count_label(1, "node"), "1 node");
    assert_eq!(count_label(0, "node"), "0 nodes");
    assert_eq!(view_title("Diagram", Some(" 9 nodes ")), "─ Diagram · 9 nodes ");
    assert_eq!(view_title("Tree", None), "─ Tree ");
    assert_eq!(footer_label_ucfirst("DESCRIPTION"), "Description");

    let padded = pad_text(ratatui::text::Text::from("x"), 2, 1);
    assert_eq!(padded.lines.len(), 2);
    assert_eq!(line_to_string(&padded.lines[1]), "  x");
}

#[rstest]
fn help_overlay_swallows_keys(demo: AppCtx) {
    let mut ctx = demo;
    ctx.press(&[KeyCode::Char('?')]);
    assert!(ctx.app.show_help);
    ctx.press(&[KeyCode::Char('a')]);
    assert_eq!(ctx.app.store.len(), 9);
    ctx.press(&[KeyCode::Esc]);
    assert!(!ctx.app.show_help);
    assert!(ctx.app.handle_key_code(KeyCode::Char('q')));
}

#[rstest]
fn draw_shows_toolbar_diagram_and_panel(demo: AppCtx) {
    let mut ctx = demo;
    ctx.select("loan-bridge");
    let mut terminal = Terminal::new(TestBackend::new(160, 40)).expect("terminal");
    terminal.draw(|frame| draw(frame, &mut ctx.app)).expect("draw");

    let screen = buffer_to_string(&terminal);
    let first_line = screen.lines().next().unwrap_or_default();
    assert!(first_line.starts_with("Loan Tree │ 9 nodes │ a Add Account  l Add Loan"));
    assert!(screen.contains("Bridge Loan"));
    assert!(screen.contains("Label: Bridge Loan"));
    assert!(screen.contains("Label:e"));
}

#[rstest]
fn draw_handles_empty_tree(empty: AppCtx) {
    let mut ctx = empty;
    let mut terminal = Terminal::new(TestBackend::new(100, 24)).expect("terminal");
    terminal.draw(|frame| draw(frame, &mut ctx.app)).expect("draw");

    let screen = buffer_to_string(&terminal);
    assert!(screen.contains("Empty tree"));
    assert!(screen.contains("0 nodes"));
}
