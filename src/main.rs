mod commands;
mod config;
mod git;
mod host;
mod ui;

use anyhow::Result;
use clap::Parser;
use commands::{CommandArgs, CommandName, CommitDetailsArgs, SessionCtx};
use git::{GitBackend, GitCli, GitUri};
use host::CliHost;
use std::path::PathBuf;
use ui::commit_view::TuiCommitView;
use ui::notify::TerminalNotifier;
use ui::picker::TuiPicker;

/// Resolve a cursor position or revision to a git commit and walk its history
#[derive(Parser)]
#[command(name = "cw", version, about)]
struct Cli {
    /// File the cursor is in (stands in for the active editor)
    #[arg(long)]
    file: Option<PathBuf>,

    /// 1-based cursor line within --file
    #[arg(long, default_value_t = 1)]
    line: i64,

    /// Revision to inspect directly (skips blame)
    #[arg(long)]
    rev: Option<String>,

    /// Show the commit in the persistent view instead of the picker
    #[arg(long)]
    view: bool,

    /// Repository path (defaults to the repo containing --file or the cwd)
    #[arg(long)]
    repo: Option<PathBuf>,

    /// Print a markdown command link for --rev instead of opening a session
    #[arg(long)]
    markdown: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging();

    if cli.markdown {
        let Some(rev) = &cli.rev else {
            anyhow::bail!("--markdown requires --rev");
        };
        println!("{}", CommitDetailsArgs::from_sha(rev.clone()).markdown_command());
        return Ok(());
    }

    let git = GitCli;
    let file = cli.file.map(|f| std::fs::canonicalize(&f).unwrap_or(f));
    let anchor = cli
        .repo
        .clone()
        .or_else(|| file.as_ref().and_then(|f| f.parent().map(PathBuf::from)))
        .unwrap_or_else(|| PathBuf::from("."));
    let repo_root = git.repo_root(&anchor)?;
    let config = config::load_config(&repo_root);

    let host = CliHost::new(file, cli.line - 1);
    let mut picker = TuiPicker::new(config.display.short_sha);
    let mut notifier = TerminalNotifier;
    let mut view = TuiCommitView::new(GitCli, config.display.short_sha);

    let args = CommitDetailsArgs {
        uri: cli.rev.as_ref().map(|rev| GitUri {
            repo_path: repo_root.clone(),
            path: None,
            sha: Some(rev.clone()),
        }),
        sha: cli.rev,
        show_in_view: cli.view,
        ..CommitDetailsArgs::default()
    };

    let mut ctx = SessionCtx {
        git: &git,
        host: &host,
        picker: &mut picker,
        notifier: &mut notifier,
        view: &mut view,
        config: &config,
    };
    commands::dispatch_named(
        &mut ctx,
        CommandName::CommitDetails.as_str(),
        CommandArgs::CommitDetails(args),
    )
}

/// Log to a file under the user state dir; the TUI owns the terminal.
/// Level comes from CW_LOG (default info).
fn init_logging() {
    let Some(dir) = dirs::state_dir().or_else(dirs::cache_dir) else {
        return;
    };
    let dir = dir.join("cw");
    if std::fs::create_dir_all(&dir).is_err() {
        return;
    }
    let Ok(file) = std::fs::File::create(dir.join("cw.log")) else {
        return;
    };
    let filter = tracing_subscriber::EnvFilter::try_from_env("CW_LOG")
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::sync::Mutex::new(file))
        .with_ansi(false)
        .init();
}
