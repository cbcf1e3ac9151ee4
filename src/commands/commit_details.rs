use super::{
    dispatch, execute_action, BackAction, BranchHistoryArgs, CommandArgs, CommandName,
    FileDetailsArgs, SessionCtx,
};
use crate::git::{take_from_log, Commit, GitCommit, GitUri, RepoLogBatch};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, error};

/// Page size when hydrating a bare sha: the target plus one neighbor.
const HYDRATE_LOG_SIZE: usize = 2;

/// The working set for one commit-details invocation. Callers pass it by
/// value; the session mutates its own copy through resolution, so a caller's
/// snapshot (e.g. inside a [`BackAction`]) is never touched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CommitDetailsArgs {
    /// Original input location, when the caller knows it
    pub uri: Option<GitUri>,
    pub sha: Option<String>,
    pub commit: Option<Commit>,
    /// Log batch a previous step already fetched; only trusted for its own sha
    pub log: Option<RepoLogBatch>,
    /// Route the commit to the persistent view instead of the picker
    pub show_in_view: bool,
    /// The step before this one, replayed verbatim on "go back"
    pub back: Option<Box<BackAction>>,
}

impl CommitDetailsArgs {
    pub fn from_sha(sha: impl Into<String>) -> Self {
        Self {
            sha: Some(sha.into()),
            ..Self::default()
        }
    }

    /// Serialized `command:` payload for embedding this invocation inside
    /// rendered text (e.g. a markdown link). Works from a bare sha through
    /// `From<&str>` or from a full arguments object.
    pub fn markdown_command(&self) -> String {
        let payload = serde_json::to_string(self).unwrap_or_default();
        format!(
            "command:{}?{}",
            CommandName::CommitDetails.as_str(),
            urlencoding::encode(&payload)
        )
    }
}

impl From<&str> for CommitDetailsArgs {
    fn from(sha: &str) -> Self {
        Self::from_sha(sha)
    }
}

/// Run one commit-details session. This is the outer error boundary: the
/// command always resolves, failure is communicated only through the
/// notifier.
pub fn execute(ctx: &mut SessionCtx, args: CommitDetailsArgs) -> Result<()> {
    let sha = args.sha.clone();
    if let Err(err) = run(ctx, args) {
        error!(
            sha = sha.as_deref().unwrap_or("<cursor>"),
            error = %err,
            "commit details session failed"
        );
        ctx.notifier.error("Unable to show commit details");
    }
    Ok(())
}

fn run(ctx: &mut SessionCtx, args: CommitDetailsArgs) -> Result<()> {
    let mut req = args;

    // ── Revision Resolver ──
    let Some(commit) = resolve(ctx, &mut req)? else {
        return Ok(()); // no-op or already warned
    };
    let repo = commit.repo_path.clone();

    // Persistent-view short circuit: route by (repo, sha), never show a picker
    if req.show_in_view {
        debug!(sha = %commit.sha, "routing commit to persistent view");
        return ctx.view.show_commit(&repo, &commit.sha);
    }

    // ── Back-Command Builder ──
    let back = build_back_action(ctx, &req, &commit)?;
    req.back = back.clone().map(Box::new);
    let return_here = build_return_action(ctx.config.display.short_sha, &req, &commit);

    // ── Session Loop ──
    let uri = commit.uri();
    use crate::ui::picker::PickerItem;
    match ctx
        .picker
        .show_commit(&commit, &uri, back.as_ref(), &return_here, req.log.as_ref())?
    {
        None => Ok(()),
        Some(PickerItem::Action(action)) => execute_action(ctx, action),
        Some(PickerItem::File(file)) => {
            let mut file_commit = commit.clone();
            file_commit.working_file = Some(file.path.clone());
            let args = FileDetailsArgs {
                uri: GitUri {
                    repo_path: repo,
                    path: Some(file.path),
                    sha: Some(commit.sha.clone()),
                },
                commit: Commit::Full(file_commit),
                sha: commit.sha.clone(),
                back: Some(Box::new(return_here)),
            };
            dispatch(ctx, CommandArgs::FileDetails(args))
        }
    }
}

/// Resolve the request to a full commit, or `None` for the silent no-op and
/// domain-warning outcomes.
fn resolve(ctx: &mut SessionCtx, req: &mut CommitDetailsArgs) -> Result<Option<GitCommit>> {
    if req.sha.is_none() {
        // No revision named: the cursor is the only source of truth
        let Some(editor) = ctx.host.active_editor() else {
            return Ok(None);
        };
        if editor.line < 0 {
            return Ok(None);
        }

        let blamed = ctx
            .git
            .blame_for_line(&editor.file, editor.line as u64 + 1)
            .context("blame lookup failed")?;
        let Some(blamed) = blamed else {
            ctx.notifier.warn("File is not under source control");
            return Ok(None);
        };
        if blamed.is_uncommitted {
            ctx.notifier
                .warn("Line has uncommitted changes, no commit to show yet");
            return Ok(None);
        }

        // Adopt the blamed commit wholesale; blame hydrates fully
        req.sha = Some(blamed.sha.clone());
        if req.uri.is_none() {
            req.uri = Some(blamed.uri());
        }
        req.commit = Some(Commit::Full(blamed));
    }

    let Some(sha) = req.sha.clone() else {
        return Ok(None);
    };

    let mut commit = if let Some(Commit::Full(c)) = &req.commit {
        // Full commit already in hand: no lookups
        c.clone()
    } else if let Some(found) = take_from_log(&mut req.log, &sha) {
        found
    } else {
        let repo = request_repo(ctx, req)?;
        let batch = ctx
            .git
            .log_for_sha(&repo, &sha, HYDRATE_LOG_SIZE)
            .context("log lookup failed")?;
        let Some(batch) = batch else {
            ctx.notifier.warn(&format!("Commit {} not found", sha));
            return Ok(None);
        };
        let Some(found) = batch.find(&sha).cloned() else {
            ctx.notifier.warn(&format!("Commit {} not found", sha));
            return Ok(None);
        };
        req.log = Some(batch);
        found
    };

    // Working-file association: file-scoped request wins, then the original
    // input location relative to the repo root
    if commit.working_file.is_none() {
        if let Some(Commit::FileScoped { file, .. }) = &req.commit {
            commit.working_file = Some(file.clone());
        }
    }
    if commit.working_file.is_none() {
        commit.working_file = default_working_file(ctx, req, &commit.repo_path);
    }

    req.commit = Some(Commit::Full(commit.clone()));
    Ok(Some(commit))
}

/// Repository to run lookups in when resolution did not go through blame.
fn request_repo(ctx: &SessionCtx, req: &CommitDetailsArgs) -> Result<PathBuf> {
    if let Some(uri) = &req.uri {
        return Ok(uri.repo_path.clone());
    }
    if let Some(editor) = ctx.host.active_editor() {
        let dir = editor.file.parent().unwrap_or_else(|| Path::new("."));
        return ctx.git.repo_root(dir);
    }
    anyhow::bail!("no repository context for revision lookup")
}

fn default_working_file(
    ctx: &SessionCtx,
    req: &CommitDetailsArgs,
    repo: &Path,
) -> Option<String> {
    if let Some(path) = req.uri.as_ref().and_then(|u| u.path.clone()) {
        return Some(path);
    }
    let editor = ctx.host.active_editor()?;
    ctx.host.relative_path(&editor.file, repo)
}

/// The "go back" action for the current display: the inbound one verbatim if
/// the caller supplied it, otherwise a synthesized jump to the containing
/// branch's history — or nothing when there is no branch.
fn build_back_action(
    ctx: &mut SessionCtx,
    req: &CommitDetailsArgs,
    commit: &GitCommit,
) -> Result<Option<BackAction>> {
    if let Some(back) = &req.back {
        return Ok(Some((**back).clone()));
    }
    let branch = ctx
        .git
        .current_branch(&commit.repo_path)
        .context("branch lookup failed")?;
    Ok(branch.map(|branch| BackAction {
        command: CommandName::BranchHistory,
        label: format!("Show {} branch history", branch.name),
        args: CommandArgs::BranchHistory(BranchHistoryArgs {
            uri: GitUri {
                repo_path: commit.repo_path.clone(),
                path: None,
                sha: None,
            },
            branch: branch.name,
        }),
    }))
}

/// The "return here" action offered to the next step down. Snapshot by value:
/// later mutation of the live request must not alter what this replays.
fn build_return_action(
    short_sha: usize,
    req: &CommitDetailsArgs,
    commit: &GitCommit,
) -> BackAction {
    let mut snapshot = req.clone();
    snapshot.uri = Some(commit.uri());
    BackAction {
        command: CommandName::CommitDetails,
        label: format!("Details of {}", commit.short_sha(short_sha)),
        args: CommandArgs::CommitDetails(snapshot),
    }
}
