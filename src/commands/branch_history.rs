use super::{dispatch, BackAction, CommandArgs, CommandName, CommitDetailsArgs, SessionCtx};
use crate::git::{Commit, GitUri};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::error;

/// Arguments for a branch-history session: where, and which branch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BranchHistoryArgs {
    pub uri: GitUri,
    pub branch: String,
}

/// Outer error boundary; same always-resolves contract as commit details.
pub fn execute(ctx: &mut SessionCtx, args: BranchHistoryArgs) -> Result<()> {
    let branch = args.branch.clone();
    if let Err(err) = run(ctx, args) {
        error!(branch = %branch, error = %err, "branch history session failed");
        ctx.notifier.error("Unable to show branch history");
    }
    Ok(())
}

fn run(ctx: &mut SessionCtx, args: BranchHistoryArgs) -> Result<()> {
    let repo = args.uri.repo_path.clone();
    let commits = ctx
        .git
        .log_for_branch(&repo, &args.branch, ctx.config.log.page_size)
        .context("branch log lookup failed")?;
    if commits.is_empty() {
        ctx.notifier
            .warn(&format!("No commits found on {}", args.branch));
        return Ok(());
    }

    let title = format!("{} history", args.branch);
    let Some(idx) = ctx.picker.show_commit_list(&title, &commits)? else {
        return Ok(());
    };
    let Some(picked) = commits.get(idx).cloned() else {
        return Ok(());
    };

    // Going back from the picked commit returns to this history view
    let back = BackAction {
        command: CommandName::BranchHistory,
        label: format!("Show {} branch history", args.branch),
        args: CommandArgs::BranchHistory(args.clone()),
    };
    let details = CommitDetailsArgs {
        uri: Some(picked.uri()),
        sha: Some(picked.sha.clone()),
        commit: Some(Commit::Full(picked)),
        back: Some(Box::new(back)),
        ..CommitDetailsArgs::default()
    };
    dispatch(ctx, CommandArgs::CommitDetails(details))
}

#[cfg(test)]
mod tests {
    use super::super::testkit::*;
    use super::*;
    use std::path::PathBuf;

    fn args() -> BranchHistoryArgs {
        BranchHistoryArgs {
            uri: GitUri {
                repo_path: PathBuf::from("/repo"),
                path: None,
                sha: None,
            },
            branch: "main".to_string(),
        }
    }

    #[test]
    fn empty_branch_warns() {
        let mut fx = Fixture::default();
        {
            let mut ctx = fx.ctx();
            execute(&mut ctx, args()).unwrap();
        }
        assert!(fx.notifier.warnings[0].contains("No commits"));
        assert!(fx.picker.shown_lists.is_empty());
    }

    #[test]
    fn cancel_leaves_no_trace() {
        let mut fx = Fixture::default();
        fx.git.branch_commits = vec![commit("abc123"), commit("def456")];
        fx.picker.list_response = None;
        {
            let mut ctx = fx.ctx();
            execute(&mut ctx, args()).unwrap();
        }
        assert_eq!(fx.picker.shown_lists, vec![("main history".to_string(), 2)]);
        assert!(fx.picker.shown_commits.is_empty());
    }

    #[test]
    fn selection_opens_commit_details_with_back_to_history() {
        let mut fx = Fixture::default();
        fx.git.branch_commits = vec![commit("abc123"), commit("def456")];
        fx.picker.list_response = Some(1);
        {
            let mut ctx = fx.ctx();
            execute(&mut ctx, args()).unwrap();
        }
        assert_eq!(fx.picker.shown_commits.len(), 1);
        let shown = &fx.picker.shown_commits[0];
        assert_eq!(shown.sha, "def456");
        assert_eq!(
            shown.back_label.as_deref(),
            Some("Show main branch history")
        );
    }
}
