// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-LoanTree-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Loan Tree and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Terminal UI.
//!
//! The interactive editor (ratatui + crossterm): a toolbar, the diagram surface and a detail
//! panel. Every change goes through `ops::apply_action`; the diagram is relaid out and
//! rerendered whenever the store revision moves.

use std::{
    error::Error,
    fs, io, mem,
    path::PathBuf,
    time::{Duration, Instant},
};

use chrono::Utc;
use crossterm::{
    event::{
        self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEvent, KeyEventKind,
        MouseButton, MouseEvent, MouseEventKind,
    },
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    prelude::*,
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
};
use tracing::{debug, info, warn};

use crate::layout::{layout_store, LayoutConfig, TreeLayout};
use crate::model::{NodeId, NodeKind, ROOT_KINDS};
use crate::ops::{apply_action, Action, ApplyError, ApplyResult};
use crate::render::{render_layout_annotated, AnnotatedRender};
use crate::store::{check_tree, export_file_name, TreeStore};

mod theme;

use theme::TuiTheme;

const TITLE: &str = "Loan Tree";
const FOCUS_COLOR: Color = Color::LightCyan;
const FOOTER_LABEL_COLOR: Color = Color::Gray;
const FOOTER_KEY_COLOR: Color = Color::Cyan;
const CENTER_BORDER_PADDING: i32 = 1;
const REVEAL_MARGIN: i32 = 2;
const TOAST_TTL: Duration = Duration::from_secs(3);

/// Startup settings for the interactive editor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TuiOptions {
    /// Directory that `X` writes exports into.
    pub export_dir: PathBuf,
}

impl Default for TuiOptions {
    fn default() -> Self {
        Self { export_dir: PathBuf::from(".") }
    }
}

/// Runs the interactive terminal UI until the user quits.
pub fn run(store: TreeStore, options: TuiOptions) -> Result<(), Box<dyn Error>> {
    let mut terminal = TerminalSession::new()?;
    let mut app = App::new(store, options);
    info!(nodes = app.store.len(), "starting terminal ui");

    while !app.should_quit {
        terminal.draw(|frame| draw(frame, &mut app))?;

        if event::poll(Duration::from_millis(250))? {
            match event::read()? {
                Event::Key(key) if key.kind == KeyEventKind::Press => app.handle_key(key),
                Event::Mouse(mouse) => app.handle_mouse(mouse),
                _ => {}
            }
        }
    }

    info!(rev = app.store.rev(), "terminal ui closed");
    Ok(())
}

fn draw(frame: &mut Frame<'_>, app: &mut App) {
    app.refresh_view();
    let area = frame.area();

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(1), Constraint::Min(0), Constraint::Length(1)])
        .split(area);
    let (toolbar_area, main_area, footer_area) = (rows[0], rows[1], rows[2]);

    frame.render_widget(Paragraph::new(toolbar_line(app)), toolbar_area);

    let direction = if stack_main_panes_vertically(main_area) {
        Direction::Vertical
    } else {
        Direction::Horizontal
    };
    let panes = Layout::default()
        .direction(direction)
        .constraints([Constraint::Percentage(68), Constraint::Percentage(32)])
        .split(main_area);
    let (diagram_area, panel_area) = (panes[0], panes[1]);

    let diagram_block = Block::default()
        .borders(Borders::ALL)
        .title(view_title("Diagram", Some(&count_label(app.store.len(), "node"))))
        .border_style(app.theme.panel_border_style(true));
    app.diagram_viewport = diagram_block.inner(diagram_area);

    let mut diagram_text = app.diagram_text();
    let content = (diagram_text.width(), diagram_text.height());
    app.center_diagram_if_needed(content);
    app.reveal_selection_if_needed();
    app.clamp_pan(content);
    let (scroll_x, scroll_y, left_pad, top_pad) = app.diagram_render_offsets();
    if left_pad > 0 || top_pad > 0 {
        diagram_text = pad_text(diagram_text, left_pad, top_pad);
    }
    let diagram = Paragraph::new(diagram_text).block(diagram_block).scroll((scroll_y, scroll_x));
    frame.render_widget(diagram, diagram_area);

    let panel = Paragraph::new(detail_panel_lines(app))
        .wrap(Wrap { trim: false })
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(detail_panel_title(app))
                .border_style(app.theme.panel_border_style(false)),
        );
    frame.render_widget(panel, panel_area);

    let toast = app.active_toast();
    match &app.mode {
        Mode::Prompt(prompt) => {
            let footer = prompt_footer_line(prompt, toast.as_deref());
            frame.render_widget(Paragraph::new(footer), footer_area);
            let typed = prompt_prefix(prompt).chars().count() + prompt.input.chars().count();
            let cursor_x = footer_area
                .x
                .saturating_add(u16::try_from(typed).unwrap_or(u16::MAX))
                .min(footer_area.x.saturating_add(footer_area.width.saturating_sub(1)));
            frame.set_cursor_position((cursor_x, footer_area.y));
        }
        Mode::Confirm { question, .. } => {
            let footer = footer_help_line(app, toast.as_deref());
            frame.render_widget(Paragraph::new(footer), footer_area);
            render_confirm(frame, &app.theme, question, main_area);
        }
        Mode::Normal => {
            let footer = footer_help_line(app, toast.as_deref());
            frame.render_widget(Paragraph::new(footer), footer_area);
        }
    }

    if app.show_help {
        render_help(frame, app, main_area);
    }
}

// Extracted toolbar/panel/footer/help rendering helpers.
include!("chrome.rs");

#[derive(Debug, Clone, PartialEq, Eq)]
enum PromptKind {
    Label(NodeId),
    Description(NodeId),
    ImportPath,
}

impl PromptKind {
    fn title(&self) -> &'static str {
        match self {
            Self::Label(_) => "Label",
            Self::Description(_) => "Description",
            Self::ImportPath => "Import file",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct Prompt {
    kind: PromptKind,
    input: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Mode {
    Normal,
    Prompt(Prompt),
    /// A destructive action waiting for y/n.
    Confirm { action: Action, question: String },
}

#[derive(Debug, Clone)]
struct Toast {
    message: String,
    expires_at: Instant,
}

/// Layout and render of one store revision.
#[derive(Debug, Clone)]
struct DiagramView {
    rev: u64,
    layout: TreeLayout,
    render: AnnotatedRender,
    error: Option<String>,
}

impl DiagramView {
    fn build(store: &TreeStore) -> Self {
        let layout = layout_store(store, &LayoutConfig::terminal());
        let (render, error) = match render_layout_annotated(store.nodes(), &layout) {
            Ok(render) => (render, None),
            Err(err) => {
                warn!(error = %err, "diagram render failed");
                (AnnotatedRender::default(), Some(err.to_string()))
            }
        };
        Self { rev: store.rev(), layout, render, error }
    }
}

struct App {
    store: TreeStore,
    theme: TuiTheme,
    export_dir: PathBuf,
    view: DiagramView,
    mode: Mode,
    pan_x: i32,
    pan_y: i32,
    center_diagram_on_next_draw: bool,
    reveal_selection: bool,
    diagram_viewport: Rect,
    show_help: bool,
    help_scroll: u16,
    help_viewport_height: u16,
    toast: Option<Toast>,
    should_quit: bool,
}

impl App {
    fn new(store: TreeStore, options: TuiOptions) -> Self {
        let view = DiagramView::build(&store);
        Self {
            store,
            theme: TuiTheme::default(),
            export_dir: options.export_dir,
            view,
            mode: Mode::Normal,
            pan_x: 0,
            pan_y: 0,
            center_diagram_on_next_draw: true,
            reveal_selection: false,
            diagram_viewport: Rect::default(),
            show_help: false,
            help_scroll: 0,
            help_viewport_height: 0,
            toast: None,
            should_quit: false,
        }
    }

    fn refresh_view(&mut self) {
        if self.view.rev != self.store.rev() {
            self.view = DiagramView::build(&self.store);
        }
    }

    fn diagram_text(&self) -> Text<'static> {
        if let Some(error) = &self.view.error {
            return Text::from(Line::styled(
                format!("Cannot draw tree: {error}"),
                self.theme.error_style(),
            ));
        }
        if self.store.is_empty() {
            let mut lines =
                vec![Line::styled("Empty tree", self.theme.dim_style()), Line::from("")];
            for kind in ROOT_KINDS {
                if let Some(key) = root_kind_key(*kind) {
                    lines.push(Line::from(vec![
                        Span::styled("Press ", self.theme.dim_style()),
                        key_span(key.to_string()),
                        Span::styled(
                            format!(" to add a root {}", kind.as_str()),
                            self.theme.dim_style(),
                        ),
                    ]));
                }
            }
            return Text::from(lines);
        }

        let render = &self.view.render;
        let rows = render
            .text()
            .lines()
            .map(|line| line.chars().collect::<Vec<_>>())
            .collect::<Vec<_>>();
        let mut styles = rows
            .iter()
            .map(|row| vec![self.theme.connector_style(); row.len()])
            .collect::<Vec<_>>();

        let selected = self.store.selected_id();
        for (node_id, rect) in render.node_boxes() {
            let Some(node) = self.store.node(node_id.as_str()) else {
                continue;
            };
            let is_selected = selected == Some(node_id);
            let style = if is_selected {
                self.theme.selected_node_style(node.kind())
            } else {
                self.theme.node_style(node.kind())
            };
            for y in rect.y..=rect.bottom() {
                let Some(row) = styles.get_mut(y) else {
                    continue;
                };
                for x in rect.x..=rect.right() {
                    let inside =
                        x > rect.x && x < rect.right() && y > rect.y + 1 && y < rect.bottom();
                    if let Some(cell) = row.get_mut(x) {
                        // Label and id rows of unselected boxes keep the terminal colour.
                        *cell = if inside && !is_selected { Style::default() } else { style };
                    }
                }
            }
        }

        let lines = rows
            .into_iter()
            .zip(styles)
            .map(|(row, row_styles)| {
                let mut spans = Vec::<Span<'static>>::new();
                let mut run = String::new();
                let mut run_style = Style::default();
                for (ch, style) in row.into_iter().zip(row_styles) {
                    if style != run_style && !run.is_empty() {
                        spans.push(Span::styled(mem::take(&mut run), run_style));
                    }
                    run_style = style;
                    run.push(ch);
                }
                if !run.is_empty() {
                    spans.push(Span::styled(run, run_style));
                }
                Line::from(spans)
            })
            .collect::<Vec<_>>();
        Text::from(lines)
    }

    fn viewport_size(&self) -> (i32, i32) {
        (i32::from(self.diagram_viewport.width), i32::from(self.diagram_viewport.height))
    }

    fn center_diagram_if_needed(&mut self, content: (usize, usize)) {
        if !self.center_diagram_on_next_draw {
            return;
        }
        let (viewport_width, viewport_height) = self.viewport_size();
        if viewport_width == 0 || viewport_height == 0 {
            return;
        }

        let (content_width, content_height) = content_size(content);
        // Never start clipped on the left/top.
        self.pan_x = ((content_width - viewport_width) / 2).min(-CENTER_BORDER_PADDING);
        self.pan_y = ((content_height - viewport_height) / 2).min(-CENTER_BORDER_PADDING);
        self.center_diagram_on_next_draw = false;
    }

    fn reveal_selection_if_needed(&mut self) {
        if !self.reveal_selection {
            return;
        }
        let (viewport_width, viewport_height) = self.viewport_size();
        if viewport_width == 0 || viewport_height == 0 {
            return;
        }
        self.reveal_selection = false;

        let Some(rect) =
            self.store.selected_id().and_then(|node_id| self.view.render.node_box(node_id.as_str()))
        else {
            return;
        };
        let to_i32 = |value: usize| i32::try_from(value).unwrap_or(i32::MAX);
        let (left, right) = (to_i32(rect.x), to_i32(rect.right()));
        let (top, bottom) = (to_i32(rect.y), to_i32(rect.bottom()));

        if left < self.pan_x {
            self.pan_x = left - REVEAL_MARGIN;
        } else if right >= self.pan_x + viewport_width {
            self.pan_x = right - viewport_width + 1 + REVEAL_MARGIN;
        }
        if top < self.pan_y {
            self.pan_y = top - 1;
        } else if bottom >= self.pan_y + viewport_height {
            self.pan_y = bottom - viewport_height + 2;
        }
    }

    /// Keeps panning inside the content plus a one-cell margin; narrow content stays centred.
    fn clamp_pan(&mut self, content: (usize, usize)) {
        let (viewport_width, viewport_height) = self.viewport_size();
        if viewport_width == 0 || viewport_height == 0 {
            return;
        }
        let (content_width, content_height) = content_size(content);
        self.pan_x = clamp_pan_axis(self.pan_x, content_width, viewport_width);
        self.pan_y = clamp_pan_axis(self.pan_y, content_height, viewport_height);
    }

    fn pan_by(&mut self, dx: i32, dy: i32) {
        self.pan_x = self.pan_x.saturating_add(dx);
        self.pan_y = self.pan_y.saturating_add(dy);
    }

    fn diagram_render_offsets(&self) -> (u16, u16, usize, usize) {
        let scroll_x = clamp_positive_i32_to_u16(self.pan_x);
        let scroll_y = clamp_positive_i32_to_u16(self.pan_y);
        let left_pad = usize::try_from(self.pan_x.saturating_neg().max(0)).unwrap_or(0);
        let top_pad = usize::try_from(self.pan_y.saturating_neg().max(0)).unwrap_or(0);
        (scroll_x, scroll_y, left_pad, top_pad)
    }

    fn set_toast(&mut self, message: impl Into<String>) {
        let expires_at = Instant::now() + TOAST_TTL;
        self.toast = Some(Toast { message: message.into(), expires_at });
    }

    /// Current toast message; drops it once expired.
    fn active_toast(&mut self) -> Option<String> {
        match &self.toast {
            Some(toast) if toast.expires_at > Instant::now() => Some(toast.message.clone()),
            Some(_) => {
                self.toast = None;
                None
            }
            None => None,
        }
    }

    fn handle_key(&mut self, key: KeyEvent) {
        if self.handle_key_code(key.code) {
            self.should_quit = true;
        }
    }

    fn handle_key_code(&mut self, code: KeyCode) -> bool {
        if self.show_help {
            match code {
                KeyCode::Esc | KeyCode::Char('?') => self.show_help = false,
                KeyCode::Char('q') => return true,
                KeyCode::Down | KeyCode::Char('j') => {
                    self.help_scroll = self.help_scroll.saturating_add(1);
                }
                KeyCode::Up | KeyCode::Char('k') => {
                    self.help_scroll = self.help_scroll.saturating_sub(1);
                }
                KeyCode::PageDown => {
                    self.help_scroll = self.help_scroll.saturating_add(self.help_page());
                }
                KeyCode::PageUp => {
                    self.help_scroll = self.help_scroll.saturating_sub(self.help_page());
                }
                KeyCode::Home => self.help_scroll = 0,
                KeyCode::End => self.help_scroll = u16::MAX,
                _ => {}
            }
            return false;
        }

        match self.mode {
            Mode::Prompt(_) => {
                self.handle_prompt_key(code);
                return false;
            }
            Mode::Confirm { .. } => {
                self.handle_confirm_key(code);
                return false;
            }
            Mode::Normal => {}
        }

        match code {
            KeyCode::Char('q') => return true,
            KeyCode::Char('?') => {
                self.show_help = true;
                self.help_scroll = 0;
            }
            KeyCode::Esc => self.select(None),
            KeyCode::Up => self.select_parent(),
            KeyCode::Down => self.select_first_child(),
            KeyCode::Left => self.select_rank_neighbor(-1),
            KeyCode::Right => self.select_rank_neighbor(1),
            KeyCode::Tab => self.cycle_selection(1),
            KeyCode::BackTab => self.cycle_selection(-1),
            KeyCode::PageDown => self.pan_by(0, self.page_height()),
            KeyCode::PageUp => self.pan_by(0, -self.page_height()),
            KeyCode::Char('>') => self.pan_by(8, 0),
            KeyCode::Char('<') => self.pan_by(-8, 0),
            KeyCode::Char(key) if root_kind_for_key(key).is_some() => {
                if let Some(kind) = root_kind_for_key(key) {
                    self.dispatch(Action::CreateRoot { kind });
                }
            }
            _ if self.store.selected_id().is_some() => self.handle_node_key(code),
            _ => self.handle_tree_key(code),
        }

        false
    }

    fn help_page(&self) -> u16 {
        self.help_viewport_height.saturating_sub(1).max(1)
    }

    fn page_height(&self) -> i32 {
        (i32::from(self.diagram_viewport.height) / 2).max(1)
    }

    /// Keys acting on the selected node.
    fn handle_node_key(&mut self, code: KeyCode) {
        let Some(node) = self.store.selected_node() else {
            return;
        };
        let node_id = node.id().clone();
        let kind = node.kind();
        let label = node.label().to_owned();
        let description = node.data().description().unwrap_or_default().to_owned();

        match code {
            KeyCode::Char('e') => self.open_prompt(PromptKind::Label(node_id), label),
            KeyCode::Char('d') => self.open_prompt(PromptKind::Description(node_id), description),
            KeyCode::Delete | KeyCode::Char('D') => self.dispatch(Action::Delete { node_id }),
            KeyCode::Char(digit @ '1'..='9') => {
                let idx = digit.to_digit(10).map_or(0, |n| n as usize - 1);
                match kind.allowed_children().get(idx) {
                    Some(child_kind) => {
                        let kind = *child_kind;
                        self.dispatch(Action::CreateChild { kind, parent_id: node_id });
                    }
                    None => {
                        self.set_toast(format!(
                            "{} has no child type {digit}",
                            kind.display_name()
                        ));
                    }
                }
            }
            _ => {}
        }
    }

    /// Whole-tree keys, available while nothing is selected.
    fn handle_tree_key(&mut self, code: KeyCode) {
        match code {
            KeyCode::Char('X') => self.export_tree(),
            KeyCode::Char('I') => self.open_prompt(PromptKind::ImportPath, String::new()),
            KeyCode::Char('C') => {
                if self.store.is_empty() {
                    self.set_toast("Tree is already empty");
                } else {
                    self.dispatch(Action::Clear);
                }
            }
            _ => {}
        }
    }

    fn open_prompt(&mut self, kind: PromptKind, input: String) {
        self.mode = Mode::Prompt(Prompt { kind, input });
    }

    fn handle_prompt_key(&mut self, code: KeyCode) {
        match code {
            KeyCode::Esc => self.mode = Mode::Normal,
            KeyCode::Enter => {
                if let Mode::Prompt(prompt) = mem::replace(&mut self.mode, Mode::Normal) {
                    self.submit_prompt(prompt);
                }
            }
            KeyCode::Backspace => {
                if let Mode::Prompt(prompt) = &mut self.mode {
                    prompt.input.pop();
                }
            }
            KeyCode::Char(ch) => {
                if let Mode::Prompt(prompt) = &mut self.mode {
                    prompt.input.push(ch);
                }
            }
            _ => {}
        }
    }

    fn submit_prompt(&mut self, prompt: Prompt) {
        match prompt.kind {
            PromptKind::Label(node_id) => {
                self.apply(Action::EditLabel { node_id, label: prompt.input });
            }
            PromptKind::Description(node_id) => {
                self.apply(Action::EditDescription { node_id, description: prompt.input });
            }
            PromptKind::ImportPath => self.import_from_path(prompt.input.trim()),
        }
    }

    fn handle_confirm_key(&mut self, code: KeyCode) {
        match code {
            KeyCode::Char('y') | KeyCode::Char('Y') | KeyCode::Enter => {
                if let Mode::Confirm { action, .. } = mem::replace(&mut self.mode, Mode::Normal) {
                    self.apply(action);
                }
            }
            KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => self.mode = Mode::Normal,
            _ => {}
        }
    }

    /// Applies `action`, asking for confirmation first when it is destructive.
    fn dispatch(&mut self, action: Action) {
        match action.confirmation_prompt(&self.store) {
            Some(question) if action.requires_confirmation() => {
                self.mode = Mode::Confirm { action, question };
            }
            _ => {
                self.apply(action);
            }
        }
    }

    fn apply(&mut self, action: Action) -> Option<ApplyResult> {
        let name = action.name();
        let is_delete = matches!(action, Action::Delete { .. });
        let is_clear = matches!(action, Action::Clear);

        match apply_action(&mut self.store, action) {
            Ok(result) => {
                debug!(
                    action = name,
                    rev = result.new_rev,
                    added = result.delta.added.len(),
                    removed = result.delta.removed.len(),
                    updated = result.delta.updated.len(),
                    "applied action"
                );
                if result.created.is_some() {
                    self.reveal_selection = true;
                }
                if is_delete {
                    let removed = count_label(result.delta.removed.len(), "node");
                    self.set_toast(format!("Deleted {removed}"));
                }
                if is_clear {
                    self.center_diagram_on_next_draw = true;
                    self.set_toast("Tree cleared");
                }
                Some(result)
            }
            Err(err) => {
                warn!(action = name, error = %err, "action failed");
                self.set_toast(err.to_string());
                None
            }
        }
    }

    fn select(&mut self, node_id: Option<NodeId>) {
        if node_id.is_some() {
            self.reveal_selection = true;
        }
        self.apply(Action::Select { node_id });
    }

    fn select_parent(&mut self) {
        let parent = self
            .store
            .selected_node()
            .and_then(|node| node.parent_id())
            .filter(|parent_id| self.store.contains(parent_id.as_str()))
            .cloned();
        if parent.is_some() {
            self.select(parent);
        }
    }

    fn select_first_child(&mut self) {
        let child = self.store.selected_id().and_then(|node_id| {
            self.store.children(node_id.as_str()).first().map(|child| child.id().clone())
        });
        if child.is_some() {
            self.select(child);
        }
    }

    fn select_rank_neighbor(&mut self, offset: isize) {
        self.refresh_view();
        let neighbor = self
            .store
            .selected_id()
            .and_then(|node_id| self.view.layout.rank_neighbor(node_id.as_str(), offset))
            .cloned();
        if neighbor.is_some() {
            self.select(neighbor);
        }
    }

    /// Moves the selection `step` places through the layout order, wrapping around.
    fn cycle_selection(&mut self, step: isize) {
        self.refresh_view();
        let order = self.view.layout.layout_order().collect::<Vec<_>>();
        let Ok(len) = isize::try_from(order.len()) else {
            return;
        };
        if len == 0 {
            return;
        }
        let current = self
            .store
            .selected_id()
            .and_then(|node_id| order.iter().position(|candidate| *candidate == node_id))
            .and_then(|idx| isize::try_from(idx).ok());
        let next = match current {
            Some(idx) => (idx + step).rem_euclid(len),
            None if step >= 0 => 0,
            None => len - 1,
        };
        let next = order.get(usize::try_from(next).unwrap_or(0)).map(|node_id| (*node_id).clone());
        self.select(next);
    }

    fn handle_mouse(&mut self, mouse: MouseEvent) {
        match mouse.kind {
            MouseEventKind::Down(MouseButton::Left) => self.click_diagram(mouse.column, mouse.row),
            MouseEventKind::ScrollDown => self.pan_by(0, 3),
            MouseEventKind::ScrollUp => self.pan_by(0, -3),
            MouseEventKind::ScrollRight => self.pan_by(6, 0),
            MouseEventKind::ScrollLeft => self.pan_by(-6, 0),
            _ => {}
        }
    }

    /// Selects the node under a click inside the diagram, or clears the selection on empty canvas.
    fn click_diagram(&mut self, column: u16, row: u16) {
        if self.show_help || self.mode != Mode::Normal {
            return;
        }
        let area = self.diagram_viewport;
        let inside = column >= area.x
            && column < area.x.saturating_add(area.width)
            && row >= area.y
            && row < area.y.saturating_add(area.height);
        if !inside {
            return;
        }

        self.refresh_view();
        let x = i32::from(column - area.x) + self.pan_x;
        let y = i32::from(row - area.y) + self.pan_y;
        let hit = usize::try_from(x)
            .ok()
            .zip(usize::try_from(y).ok())
            .and_then(|(x, y)| self.view.render.node_at(x, y))
            .cloned();
        self.apply(Action::Select { node_id: hit });
    }

    fn export_tree(&mut self) {
        let text = match self.store.export_json() {
            Ok(text) => text,
            Err(err) => {
                warn!(error = %err, "export failed");
                self.set_toast(format!("Export failed: {err}"));
                return;
            }
        };
        let path = self.export_dir.join(export_file_name(Utc::now().date_naive()));
        match fs::write(&path, text) {
            Ok(()) => {
                info!(path = %path.display(), nodes = self.store.len(), "exported tree");
                self.set_toast(format!(
                    "Exported {} to {}",
                    count_label(self.store.len(), "node"),
                    path.display()
                ));
            }
            Err(err) => {
                warn!(path = %path.display(), error = %err, "export failed");
                self.set_toast(format!("Export failed: {err}"));
            }
        }
    }

    fn import_from_path(&mut self, path: &str) {
        if path.is_empty() {
            self.set_toast("No file given");
            return;
        }
        let text = match fs::read_to_string(path) {
            Ok(text) => text,
            Err(err) => {
                warn!(path, error = %err, "cannot read import file");
                self.set_toast(format!("Cannot read {path}: {err}"));
                return;
            }
        };

        match apply_action(&mut self.store, Action::Import { text }) {
            Ok(_) => {
                let issues = check_tree(self.store.nodes(), self.store.selected_id()).len();
                info!(path, nodes = self.store.len(), issues, "imported tree");
                let mut message = format!("Imported {}", count_label(self.store.len(), "node"));
                if issues > 0 {
                    message.push_str(&format!(" ({})", count_label(issues, "integrity issue")));
                }
                self.center_diagram_on_next_draw = true;
                self.set_toast(message);
            }
            Err(ApplyError::Import(err)) => {
                warn!(path, error = %err, "import rejected");
                self.set_toast(format!("Invalid JSON format: {err}"));
            }
        }
    }
}

fn content_size((width, height): (usize, usize)) -> (i32, i32) {
    (i32::try_from(width).unwrap_or(i32::MAX), i32::try_from(height).unwrap_or(i32::MAX))
}

fn clamp_pan_axis(pan: i32, content: i32, viewport: i32) -> i32 {
    let lower = ((content - viewport) / 2).min(-CENTER_BORDER_PADDING);
    let upper = (content - viewport + CENTER_BORDER_PADDING).max(lower);
    pan.clamp(lower, upper)
}

struct TerminalSession {
    terminal: Terminal<CrosstermBackend<io::Stdout>>,
}

impl TerminalSession {
    fn new() -> Result<Self, Box<dyn Error>> {
        enable_raw_mode()?;

        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen, EnableMouseCapture).map_err(|err| {
            teardown_terminal();
            err
        })?;

        let backend = CrosstermBackend::new(stdout);
        let mut terminal = Terminal::new(backend).map_err(|err| {
            teardown_terminal();
            err
        })?;
        terminal.clear().map_err(|err| {
            teardown_terminal();
            err
        })?;

        Ok(Self { terminal })
    }

    fn draw(&mut self, draw_fn: impl FnOnce(&mut Frame<'_>)) -> io::Result<()> {
        self.terminal.draw(draw_fn)?;
        Ok(())
    }
}

impl Drop for TerminalSession {
    fn drop(&mut self) {
        let _ = self.terminal.show_cursor();
        teardown_terminal();
    }
}

fn teardown_terminal() {
    let _ = disable_raw_mode();
    let mut stdout = io::stdout();
    let _ = execute!(stdout, DisableMouseCapture, LeaveAlternateScreen);
}

#[cfg(test)]
mod tests;
