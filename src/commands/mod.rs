pub mod branch_history;
pub mod commit_details;
pub mod file_details;
#[cfg(test)]
pub(crate) mod testkit;

pub use branch_history::BranchHistoryArgs;
pub use commit_details::CommitDetailsArgs;
pub use file_details::FileDetailsArgs;

use crate::config::CwConfig;
use crate::git::GitBackend;
use crate::host::EditorHost;
use crate::ui::commit_view::CommitView;
use crate::ui::notify::Notifier;
use crate::ui::picker::Picker;
use anyhow::Result;
use serde::{Deserialize, Serialize};
use tracing::warn;

/// Names the sessions are registered and dispatched under.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CommandName {
    CommitDetails,
    FileDetails,
    BranchHistory,
}

impl CommandName {
    pub fn as_str(&self) -> &'static str {
        match self {
            CommandName::CommitDetails => "cw.commit-details",
            CommandName::FileDetails => "cw.file-details",
            CommandName::BranchHistory => "cw.branch-history",
        }
    }

    /// Resolve an external name, including aliases.
    pub fn parse(name: &str) -> Option<Self> {
        match name {
            "cw.commit-details" | "commit-details" | "show-commit" => {
                Some(CommandName::CommitDetails)
            }
            "cw.file-details" | "file-details" => Some(CommandName::FileDetails),
            "cw.branch-history" | "branch-history" => Some(CommandName::BranchHistory),
            _ => None,
        }
    }
}

/// Argument payload for one command invocation. Serializable so back-actions
/// and markdown-embedded links can replay an invocation verbatim.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "command", content = "args")]
pub enum CommandArgs {
    CommitDetails(CommitDetailsArgs),
    FileDetails(FileDetailsArgs),
    BranchHistory(BranchHistoryArgs),
}

impl CommandArgs {
    pub fn name(&self) -> CommandName {
        match self {
            CommandArgs::CommitDetails(_) => CommandName::CommitDetails,
            CommandArgs::FileDetails(_) => CommandName::FileDetails,
            CommandArgs::BranchHistory(_) => CommandName::BranchHistory,
        }
    }
}

/// An immutable, replayable description of a navigation step: the command to
/// invoke, the argument snapshot to invoke it with, and a display label.
/// Always passed and stored by value; cloning is the snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BackAction {
    pub command: CommandName,
    pub label: String,
    pub args: CommandArgs,
}

/// Everything a session needs from its collaborators. One context serves one
/// logical flow; recursion re-enters through [`dispatch`] with the same
/// context, never concurrently.
pub struct SessionCtx<'a> {
    pub git: &'a dyn GitBackend,
    pub host: &'a dyn EditorHost,
    pub picker: &'a mut dyn Picker,
    pub notifier: &'a mut dyn Notifier,
    pub view: &'a mut dyn CommitView,
    pub config: &'a CwConfig,
}

/// Route an argument payload to its handler.
pub fn dispatch(ctx: &mut SessionCtx, args: CommandArgs) -> Result<()> {
    match args {
        CommandArgs::CommitDetails(args) => commit_details::execute(ctx, args),
        CommandArgs::FileDetails(args) => file_details::execute(ctx, args),
        CommandArgs::BranchHistory(args) => branch_history::execute(ctx, args),
    }
}

/// Route by external name. Unknown names and name/payload mismatches are
/// no-ops, logged for diagnosis.
pub fn dispatch_named(ctx: &mut SessionCtx, name: &str, args: CommandArgs) -> Result<()> {
    let Some(command) = CommandName::parse(name) else {
        warn!(name, "unknown command name");
        return Ok(());
    };
    if command != args.name() {
        warn!(name, "command name does not match argument payload");
        return Ok(());
    }
    dispatch(ctx, args)
}

/// Execute a picked action verbatim.
pub fn execute_action(ctx: &mut SessionCtx, action: BackAction) -> Result<()> {
    dispatch(ctx, action.args)
}
