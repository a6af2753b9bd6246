//! Interactive terminal tree view for the explorer
//!
//! Holds the UI state machine (search input, expansion state, selection,
//! error modal) and the ratatui draw routine. Fetching stays in the binary;
//! this module only renders what it is given.

use crate::tree::TreeNode;
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block as TuiBlock, Borders, Clear, List, ListItem, ListState, Paragraph},
    Frame,
};
use std::collections::HashSet;

/// What the user is searching by.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchMode {
    BlockNum,
    TxId,
    Key,
}

impl SearchMode {
    pub fn label(&self) -> &'static str {
        match self {
            SearchMode::BlockNum => "Block number",
            SearchMode::TxId => "Tx ID",
            SearchMode::Key => "Key",
        }
    }

    pub fn placeholder(&self) -> &'static str {
        match self {
            SearchMode::BlockNum => "1",
            SearchMode::TxId => "af589062d2e699c9b0ba36e831609876f0ebae99",
            SearchMode::Key => "car0",
        }
    }

    pub fn next(&self) -> SearchMode {
        match self {
            SearchMode::BlockNum => SearchMode::TxId,
            SearchMode::TxId => SearchMode::Key,
            SearchMode::Key => SearchMode::BlockNum,
        }
    }
}

/// One visible row of the flattened tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Row {
    pub depth: usize,
    pub name: String,
    pub folder: bool,
    pub open: bool,
    /// Child-index path from the root to this node.
    pub path: Vec<usize>,
}

pub struct App {
    pub mode: SearchMode,
    pub input: String,
    pub tree: TreeNode,
    pub selected: usize,
    pub error: Option<String>,
    pub status: String,
    /// Folders start open; this records the collapsed ones.
    closed: HashSet<Vec<usize>>,
}

impl Default for App {
    fn default() -> Self {
        App::new()
    }
}

impl App {
    pub fn new() -> Self {
        App {
            mode: SearchMode::BlockNum,
            input: String::new(),
            tree: TreeNode::folder("Blocks", Vec::new()),
            selected: 0,
            error: None,
            status: "Type a block number and press Enter".to_string(),
            closed: HashSet::new(),
        }
    }

    /// Replace the tree with a fresh query result.
    pub fn set_tree(&mut self, tree: TreeNode) {
        self.tree = tree;
        self.closed.clear();
        self.selected = 0;
        self.error = None;
    }

    /// Drop the current result before a new fetch begins.
    pub fn clear_tree(&mut self) {
        self.tree = TreeNode::folder("Blocks", Vec::new());
        self.closed.clear();
        self.selected = 0;
    }

    pub fn set_error(&mut self, message: String) {
        self.error = Some(message);
    }

    pub fn dismiss_error(&mut self) {
        self.error = None;
    }

    /// Visible rows given the current expansion state.
    pub fn rows(&self) -> Vec<Row> {
        let mut rows = Vec::new();
        self.collect_rows(&self.tree, &mut Vec::new(), 0, &mut rows);
        rows
    }

    fn collect_rows(&self, node: &TreeNode, path: &mut Vec<usize>, depth: usize, out: &mut Vec<Row>) {
        let open = !self.closed.contains(path.as_slice());
        out.push(Row {
            depth,
            name: node.name.clone(),
            folder: node.is_folder(),
            open,
            path: path.clone(),
        });
        if open {
            for (i, child) in node.children.iter().enumerate() {
                path.push(i);
                self.collect_rows(child, path, depth + 1, out);
                path.pop();
            }
        }
    }

    pub fn move_up(&mut self) {
        self.selected = self.selected.saturating_sub(1);
    }

    pub fn move_down(&mut self) {
        let last = self.rows().len().saturating_sub(1);
        if self.selected < last {
            self.selected += 1;
        }
    }

    /// Toggle the selected folder open/closed. Leaves are unaffected.
    pub fn toggle_selected(&mut self) {
        let rows = self.rows();
        if let Some(row) = rows.get(self.selected) {
            if row.folder {
                if !self.closed.remove(&row.path) {
                    self.closed.insert(row.path.clone());
                }
            }
        }
    }

    /// Step the block-number query left or right, saturating at both ends of
    /// the u64 range, and switch to block-number mode. Returns the new block
    /// number.
    pub fn step_block(&mut self, delta: i64) -> u64 {
        self.mode = SearchMode::BlockNum;
        let current: u64 = self.input.trim().parse().unwrap_or(0);
        let next = if delta < 0 {
            current.saturating_sub(delta.unsigned_abs())
        } else {
            current.saturating_add(delta as u64)
        };
        self.input = next.to_string();
        next
    }
}

pub fn draw(f: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .margin(1)
        .constraints([
            Constraint::Length(3), // Title
            Constraint::Length(3), // Search bar
            Constraint::Min(5),    // Tree
            Constraint::Length(2), // Footer
        ])
        .split(f.size());

    // Title
    let title = Paragraph::new(vec![Line::from(vec![
        Span::styled("🌳  ", Style::default().fg(Color::Green)),
        Span::styled(
            "FABTREE EXPLORER",
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled("  🌳", Style::default().fg(Color::Green)),
    ])])
    .block(
        TuiBlock::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Cyan)),
    )
    .alignment(Alignment::Center);
    f.render_widget(title, chunks[0]);

    // Search bar
    let query = if app.input.is_empty() {
        Span::styled(
            app.mode.placeholder(),
            Style::default()
                .fg(Color::DarkGray)
                .add_modifier(Modifier::ITALIC),
        )
    } else {
        Span::styled(app.input.as_str(), Style::default().fg(Color::White))
    };
    let search = Paragraph::new(Line::from(vec![
        Span::styled(
            format!(" {} ", app.mode.label()),
            Style::default()
                .fg(Color::Black)
                .bg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        ),
        Span::raw("  "),
        query,
    ]))
    .block(
        TuiBlock::default()
            .borders(Borders::ALL)
            .title(format!(" 🔍 {} ", app.status))
            .border_style(Style::default().fg(Color::Yellow)),
    );
    f.render_widget(search, chunks[1]);

    // Tree
    let rows = app.rows();
    let items: Vec<ListItem> = rows
        .iter()
        .map(|row| {
            let indent = "  ".repeat(row.depth);
            let (glyph, style) = if row.folder {
                (
                    if row.open { "▼ " } else { "▶ " },
                    Style::default()
                        .fg(Color::Cyan)
                        .add_modifier(Modifier::BOLD),
                )
            } else {
                ("", Style::default().fg(Color::White))
            };
            ListItem::new(Line::from(vec![
                Span::raw(indent),
                Span::styled(glyph, Style::default().fg(Color::Cyan)),
                Span::styled(row.name.clone(), style),
            ]))
        })
        .collect();

    let list = List::new(items)
        .block(
            TuiBlock::default()
                .borders(Borders::ALL)
                .title(" Ledger Tree ")
                .border_style(Style::default().fg(Color::Magenta)),
        )
        .highlight_style(
            Style::default()
                .bg(Color::DarkGray)
                .add_modifier(Modifier::BOLD),
        );
    let mut state = ListState::default().with_selected(Some(app.selected));
    f.render_stateful_widget(list, chunks[2], &mut state);

    // Footer
    let footer = Paragraph::new(Line::from(vec![
        key_hint("Tab"),
        Span::raw(" mode  "),
        key_hint("Enter"),
        Span::raw(" search  "),
        key_hint("Space"),
        Span::raw(" toggle  "),
        key_hint("←/→"),
        Span::raw(" prev/next block  "),
        key_hint("Esc"),
        Span::raw(" quit"),
    ]));
    f.render_widget(footer, chunks[3]);

    // Error modal
    if let Some(error) = &app.error {
        let area = centered_rect(60, 30, f.size());
        let modal = Paragraph::new(vec![
            Line::from(Span::styled(
                "❌ Query failed",
                Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
            )),
            Line::from(""),
            Line::from(Span::styled(
                error.as_str(),
                Style::default().fg(Color::White),
            )),
            Line::from(""),
            Line::from(Span::styled(
                "Press Esc to dismiss",
                Style::default().fg(Color::DarkGray),
            )),
        ])
        .alignment(Alignment::Center)
        .wrap(ratatui::widgets::Wrap { trim: true })
        .block(
            TuiBlock::default()
                .borders(Borders::ALL)
                .title(" Error ")
                .border_style(Style::default().fg(Color::Red)),
        );
        f.render_widget(Clear, area);
        f.render_widget(modal, area);
    }
}

fn key_hint(key: &str) -> Span<'_> {
    Span::styled(
        key,
        Style::default()
            .fg(Color::Yellow)
            .add_modifier(Modifier::BOLD),
    )
}

fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(r);
    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(vertical[1])[1]
}
