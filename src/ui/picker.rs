use super::{centered_rect, styles, with_terminal};
use crate::commands::BackAction;
use crate::git::{CommitFileChange, FileChangeStatus, GitCommit, GitUri, RepoLogBatch};
use anyhow::Result;
use crossterm::event::{self, Event, KeyCode};
use ratatui::{
    layout::{Constraint, Direction, Layout},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, List, ListItem, Paragraph},
    Frame,
};
use std::time::Duration;

/// What the user picked from a commit picker.
#[derive(Debug, Clone, PartialEq)]
pub enum PickerItem {
    /// A generic action row (e.g. "go back") to execute verbatim
    Action(BackAction),
    /// One of the commit's changed files
    File(CommitFileChange),
}

/// Outcome of the file-detail picker.
#[derive(Debug, Clone, PartialEq)]
pub enum FileSelection {
    Cancelled,
    Back(BackAction),
    ShowPatch,
}

/// The interactive list UI the sessions drive. One `show_*` call per
/// invocation; "no selection" is the only cancellation channel.
pub trait Picker {
    /// Show a commit with its changed files. `back` is the optional "go back"
    /// row; `return_here` labels what re-invoking this view replays; `log` is
    /// the cached batch the caller resolved through, if any.
    fn show_commit(
        &mut self,
        commit: &GitCommit,
        uri: &GitUri,
        back: Option<&BackAction>,
        return_here: &BackAction,
        log: Option<&RepoLogBatch>,
    ) -> Result<Option<PickerItem>>;

    /// Show one file of a commit with a back row and a patch row.
    fn show_file(
        &mut self,
        commit: &GitCommit,
        file: &str,
        back: Option<&BackAction>,
    ) -> Result<FileSelection>;

    /// Show a plain commit list; returns the selected index.
    fn show_commit_list(&mut self, title: &str, commits: &[GitCommit]) -> Result<Option<usize>>;
}

/// One renderable row: marker + primary text + dim secondary text.
struct Row {
    primary: String,
    primary_color: ratatui::style::Color,
    secondary: String,
}

/// Ratatui modal-list picker.
pub struct TuiPicker {
    short_sha: usize,
}

impl TuiPicker {
    pub fn new(short_sha: usize) -> Self {
        Self { short_sha }
    }
}

impl Picker for TuiPicker {
    fn show_commit(
        &mut self,
        commit: &GitCommit,
        _uri: &GitUri,
        back: Option<&BackAction>,
        return_here: &BackAction,
        _log: Option<&RepoLogBatch>,
    ) -> Result<Option<PickerItem>> {
        let mut rows: Vec<Row> = Vec::new();
        if let Some(action) = back {
            rows.push(Row {
                primary: "← back".to_string(),
                primary_color: styles::CYAN,
                secondary: action.label.clone(),
            });
        }
        for file in &commit.files {
            let color = match file.status {
                FileChangeStatus::Added => styles::GREEN,
                FileChangeStatus::Deleted => styles::RED,
                FileChangeStatus::Modified => styles::YELLOW,
                FileChangeStatus::Renamed(_) => styles::CYAN,
            };
            rows.push(Row {
                primary: format!("{} {}", file.status.symbol(), file.path),
                primary_color: color,
                secondary: String::new(),
            });
        }

        let title = format!(
            " {} {} (Enter=open, Esc=close) ",
            commit.short_sha(self.short_sha),
            commit.summary
        );
        let header = vec![
            format!("{} <{}>", commit.author_name, commit.author_email),
            commit.date.clone(),
        ];

        let picked = run_list(&title, &header, &rows, &return_here.label)?;
        Ok(picked.and_then(|idx| match back {
            Some(action) if idx == 0 => Some(PickerItem::Action(action.clone())),
            _ => {
                let file_idx = idx - back.is_some() as usize;
                commit.files.get(file_idx).cloned().map(PickerItem::File)
            }
        }))
    }

    fn show_file(
        &mut self,
        commit: &GitCommit,
        file: &str,
        back: Option<&BackAction>,
    ) -> Result<FileSelection> {
        let mut rows: Vec<Row> = Vec::new();
        if let Some(action) = back {
            rows.push(Row {
                primary: "← back".to_string(),
                primary_color: styles::CYAN,
                secondary: action.label.clone(),
            });
        }
        rows.push(Row {
            primary: "show patch".to_string(),
            primary_color: styles::TEXT,
            secondary: file.to_string(),
        });

        let title = format!(
            " {} — {} (Enter=open, Esc=close) ",
            file,
            commit.short_sha(self.short_sha)
        );
        let header = vec![commit.summary.clone()];

        let picked = run_list(&title, &header, &rows, "")?;
        Ok(match (picked, back) {
            (None, _) => FileSelection::Cancelled,
            (Some(0), Some(action)) => FileSelection::Back(action.clone()),
            (Some(_), _) => FileSelection::ShowPatch,
        })
    }

    fn show_commit_list(&mut self, title: &str, commits: &[GitCommit]) -> Result<Option<usize>> {
        let rows: Vec<Row> = commits
            .iter()
            .map(|c| Row {
                primary: format!("{:<10}", c.short_sha(self.short_sha)),
                primary_color: styles::CYAN,
                secondary: format!("{}  {}", c.summary, c.author_name),
            })
            .collect();

        let title = format!(" {} (Enter=select, Esc=close) ", title);
        run_list(&title, &[], &rows, "")
    }
}

/// Drive one modal list interaction. Returns the selected row index, or None
/// when the user closes the picker.
fn run_list(
    title: &str,
    header: &[String],
    rows: &[Row],
    footer: &str,
) -> Result<Option<usize>> {
    with_terminal(|terminal| {
        let mut selected = 0usize;
        loop {
            terminal.draw(|f| draw_list(f, title, header, rows, footer, selected))?;

            if !event::poll(Duration::from_millis(100))? {
                continue;
            }
            if let Event::Key(key) = event::read()? {
                match key.code {
                    KeyCode::Esc | KeyCode::Char('q') => return Ok(None),
                    KeyCode::Up | KeyCode::Char('k') => {
                        selected = selected.saturating_sub(1);
                    }
                    KeyCode::Down | KeyCode::Char('j') => {
                        if selected + 1 < rows.len() {
                            selected += 1;
                        }
                    }
                    KeyCode::Enter => {
                        if rows.is_empty() {
                            return Ok(None);
                        }
                        return Ok(Some(selected));
                    }
                    _ => {}
                }
            }
        }
    })
}

fn draw_list(
    f: &mut Frame,
    title: &str,
    header: &[String],
    rows: &[Row],
    footer: &str,
    selected: usize,
) {
    let area = f.area();
    let footer_lines = if footer.is_empty() { 0 } else { 1 };
    let content_height = (header.len() + rows.len() + footer_lines) as u16 + 2;
    let popup_height = content_height.min(area.height.saturating_sub(4)).max(4);
    let popup_width = 80u16.min(area.width.saturating_sub(4)).max(20);
    let popup = centered_rect(popup_width, popup_height, area);

    f.render_widget(Clear, popup);

    let block = Block::default()
        .title(Span::styled(
            title.to_string(),
            ratatui::style::Style::default().fg(styles::CYAN),
        ))
        .borders(Borders::ALL)
        .border_style(ratatui::style::Style::default().fg(styles::CYAN))
        .style(ratatui::style::Style::default().bg(styles::PANEL));
    let inner = block.inner(popup);
    f.render_widget(block, popup);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(header.len() as u16),
            Constraint::Min(0),
            Constraint::Length(footer_lines as u16),
        ])
        .split(inner);

    if !header.is_empty() {
        let lines: Vec<Line> = header
            .iter()
            .map(|h| {
                Line::from(Span::styled(
                    h.clone(),
                    ratatui::style::Style::default().fg(styles::DIM),
                ))
            })
            .collect();
        f.render_widget(Paragraph::new(lines), chunks[0]);
    }

    let items: Vec<ListItem> = rows
        .iter()
        .enumerate()
        .map(|(idx, row)| {
            let is_sel = idx == selected;
            let marker = if is_sel { "▶ " } else { "  " };
            let line = Line::from(vec![
                Span::styled(
                    marker,
                    ratatui::style::Style::default().fg(styles::CYAN),
                ),
                Span::styled(
                    format!("{:<30}", row.primary),
                    if is_sel {
                        ratatui::style::Style::default().fg(styles::BRIGHT)
                    } else {
                        ratatui::style::Style::default().fg(row.primary_color)
                    },
                ),
                Span::styled(
                    row.secondary.clone(),
                    ratatui::style::Style::default().fg(styles::DIM),
                ),
            ]);
            let style = if is_sel {
                styles::selected_style()
            } else {
                ratatui::style::Style::default().bg(styles::PANEL)
            };
            ListItem::new(line).style(style)
        })
        .collect();
    f.render_widget(List::new(items), chunks[1]);

    if !footer.is_empty() {
        f.render_widget(
            Paragraph::new(Line::from(Span::styled(
                footer.to_string(),
                ratatui::style::Style::default().fg(styles::MUTED),
            ))),
            chunks[2],
        );
    }
}
