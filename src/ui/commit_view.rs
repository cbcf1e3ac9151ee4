use super::{styles, with_terminal};
use crate::git::{FileChangeStatus, GitBackend, GitCommit};
use anyhow::{Context, Result};
use crossterm::event::{self, Event, KeyCode};
use ratatui::{
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};
use std::path::Path;
use std::time::Duration;

/// The persistent view: a commit routed here by (repo, sha) is rendered
/// full-screen rather than through the transient picker.
pub trait CommitView {
    /// Look the commit up by sha and render it.
    fn show_commit(&mut self, repo: &Path, sha: &str) -> Result<()>;

    /// Render raw patch text.
    fn show_patch(&mut self, title: &str, patch: &str) -> Result<()>;
}

/// Full-screen ratatui commit view backed by a git lookup.
pub struct TuiCommitView<G: GitBackend> {
    git: G,
    short_sha: usize,
}

impl<G: GitBackend> TuiCommitView<G> {
    pub fn new(git: G, short_sha: usize) -> Self {
        Self { git, short_sha }
    }
}

impl<G: GitBackend> CommitView for TuiCommitView<G> {
    fn show_commit(&mut self, repo: &Path, sha: &str) -> Result<()> {
        let batch = self
            .git
            .log_for_sha(repo, sha, 1)?
            .with_context(|| format!("Commit {} not found", sha))?;
        let commit = batch
            .find(sha)
            .or_else(|| batch.commits.first())
            .with_context(|| format!("Commit {} not found", sha))?;

        let title = format!(" {} (q=close) ", commit.short_sha(self.short_sha));
        let lines = commit_lines(commit);
        show_lines(&title, lines)
    }

    fn show_patch(&mut self, title: &str, patch: &str) -> Result<()> {
        let title = format!(" {} (q=close) ", title);
        let lines = patch
            .lines()
            .map(|l| {
                let color = match l.chars().next() {
                    Some('+') => styles::GREEN,
                    Some('-') => styles::RED,
                    Some('@') => styles::CYAN,
                    _ => styles::TEXT,
                };
                Line::from(Span::styled(
                    l.to_string(),
                    ratatui::style::Style::default().fg(color),
                ))
            })
            .collect();
        show_lines(&title, lines)
    }
}

fn commit_lines(commit: &GitCommit) -> Vec<Line<'static>> {
    let mut lines = vec![
        Line::from(Span::styled(
            commit.summary.clone(),
            ratatui::style::Style::default().fg(styles::BRIGHT),
        )),
        Line::from(Span::styled(
            format!("{} <{}>", commit.author_name, commit.author_email),
            ratatui::style::Style::default().fg(styles::DIM),
        )),
        Line::from(Span::styled(
            commit.date.clone(),
            ratatui::style::Style::default().fg(styles::DIM),
        )),
        Line::from(""),
    ];
    for file in &commit.files {
        let color = match file.status {
            FileChangeStatus::Added => styles::GREEN,
            FileChangeStatus::Deleted => styles::RED,
            FileChangeStatus::Modified => styles::YELLOW,
            FileChangeStatus::Renamed(_) => styles::CYAN,
        };
        lines.push(Line::from(Span::styled(
            format!("  {} {}", file.status.symbol(), file.path),
            ratatui::style::Style::default().fg(color),
        )));
    }
    lines
}

/// Scrollable full-screen text view; q/Esc closes.
fn show_lines(title: &str, lines: Vec<Line<'static>>) -> Result<()> {
    with_terminal(|terminal| {
        let mut scroll: u16 = 0;
        let total = lines.len() as u16;
        loop {
            terminal.draw(|f| draw_lines(f, title, &lines, scroll))?;

            if !event::poll(Duration::from_millis(100))? {
                continue;
            }
            if let Event::Key(key) = event::read()? {
                match key.code {
                    KeyCode::Esc | KeyCode::Char('q') | KeyCode::Enter => return Ok(()),
                    KeyCode::Up | KeyCode::Char('k') => scroll = scroll.saturating_sub(1),
                    KeyCode::Down | KeyCode::Char('j') => {
                        scroll = (scroll + 1).min(total.saturating_sub(1));
                    }
                    KeyCode::PageUp => scroll = scroll.saturating_sub(20),
                    KeyCode::PageDown => scroll = (scroll + 20).min(total.saturating_sub(1)),
                    _ => {}
                }
            }
        }
    })
}

fn draw_lines(f: &mut Frame, title: &str, lines: &[Line<'static>], scroll: u16) {
    let block = Block::default()
        .title(Span::styled(
            title.to_string(),
            ratatui::style::Style::default().fg(styles::CYAN),
        ))
        .borders(Borders::ALL)
        .border_style(ratatui::style::Style::default().fg(styles::CYAN));
    let paragraph = Paragraph::new(lines.to_vec())
        .block(block)
        .scroll((scroll, 0));
    f.render_widget(paragraph, f.area());
}
