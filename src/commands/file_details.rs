use super::{execute_action, BackAction, SessionCtx};
use crate::git::{Commit, GitUri};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::error;

/// Arguments for one file-detail session: the commit scoped to a file, the
/// revision id of that file, and the step to replay on "go back".
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FileDetailsArgs {
    pub uri: GitUri,
    pub commit: Commit,
    pub sha: String,
    pub back: Option<Box<BackAction>>,
}

/// Outer error boundary; same always-resolves contract as commit details.
pub fn execute(ctx: &mut SessionCtx, args: FileDetailsArgs) -> Result<()> {
    let sha = args.sha.clone();
    if let Err(err) = run(ctx, args) {
        error!(sha = %sha, error = %err, "file details session failed");
        ctx.notifier.error("Unable to show file details");
    }
    Ok(())
}

fn run(ctx: &mut SessionCtx, args: FileDetailsArgs) -> Result<()> {
    let mut commit = args.commit;
    let repo = args.uri.repo_path.clone();

    // A replayed (e.g. markdown-embedded) invocation may carry only the
    // file-scoped variant; upgrade it before display
    if commit.as_full().is_none() {
        let batch = ctx
            .git
            .log_for_sha(&repo, &args.sha, 2)
            .context("log lookup failed")?;
        let Some(full) = batch.as_ref().and_then(|b| b.find(&args.sha).cloned()) else {
            ctx.notifier
                .warn(&format!("Commit {} not found", args.sha));
            return Ok(());
        };
        commit.upgrade(full);
    }
    let Some(full) = commit.as_full() else {
        return Ok(());
    };

    let file = full
        .working_file
        .clone()
        .or_else(|| args.uri.path.clone())
        .context("file details without a file association")?;

    use crate::ui::picker::FileSelection;
    match ctx.picker.show_file(full, &file, args.back.as_deref())? {
        FileSelection::Cancelled => Ok(()),
        FileSelection::Back(action) => execute_action(ctx, action),
        FileSelection::ShowPatch => {
            let patch = ctx
                .git
                .file_patch(&repo, &args.sha, &file)
                .context("patch lookup failed")?;
            let title = format!("{} @ {}", file, args.sha);
            ctx.view.show_patch(&title, &patch)
        }
    }
}
