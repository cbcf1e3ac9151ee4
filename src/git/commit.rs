use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Pseudo-sha git blame emits for lines that are not yet committed.
pub const UNCOMMITTED_SHA: &str = "0000000000000000000000000000000000000000";

/// File change status within a commit
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum FileChangeStatus {
    Added,
    Modified,
    Deleted,
    Renamed(String), // old path
}

impl FileChangeStatus {
    pub fn symbol(&self) -> &'static str {
        match self {
            FileChangeStatus::Added => "+",
            FileChangeStatus::Modified => "~",
            FileChangeStatus::Deleted => "-",
            FileChangeStatus::Renamed(_) => "R",
        }
    }
}

/// One file touched by a commit
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommitFileChange {
    pub path: String,
    pub status: FileChangeStatus,
}

/// A fully hydrated commit: metadata plus the list of changed files
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GitCommit {
    pub repo_path: PathBuf,
    pub sha: String,
    pub author_name: String,
    pub author_email: String,
    pub date: String,
    pub summary: String,
    pub files: Vec<CommitFileChange>,
    pub is_uncommitted: bool,
    /// File the commit was reached through (blame or file drill-down), if any
    pub working_file: Option<String>,
}

impl GitCommit {
    pub fn short_sha(&self, len: usize) -> &str {
        let end = self
            .sha
            .char_indices()
            .nth(len)
            .map(|(i, _)| i)
            .unwrap_or(self.sha.len());
        &self.sha[..end]
    }

    pub fn uri(&self) -> GitUri {
        GitUri {
            repo_path: self.repo_path.clone(),
            path: self.working_file.clone(),
            sha: Some(self.sha.clone()),
        }
    }
}

/// A commit reference in one of two states: a bare sha + file association
/// (metadata not yet loaded) or the full commit. A file-scoped commit must be
/// upgraded via a log lookup before it can be displayed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Commit {
    FileScoped { sha: String, file: String },
    Full(GitCommit),
}

impl Commit {
    pub fn as_full(&self) -> Option<&GitCommit> {
        match self {
            Commit::Full(c) => Some(c),
            Commit::FileScoped { .. } => None,
        }
    }

    /// Upgrade a file-scoped commit with the full commit found in a log
    /// lookup, carrying the file association over as the working file.
    pub fn upgrade(&mut self, mut full: GitCommit) {
        if let Commit::FileScoped { file, .. } = self {
            if full.working_file.is_none() {
                full.working_file = Some(file.clone());
            }
        }
        *self = Commit::Full(full);
    }
}

/// A bounded page of commits fetched for one specific target sha.
///
/// The batch is only trustworthy for the sha it was fetched for; callers go
/// through [`take_from_log`] which drops it on any other target.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RepoLogBatch {
    pub for_sha: String,
    pub commits: Vec<GitCommit>,
}

impl RepoLogBatch {
    pub fn find(&self, sha: &str) -> Option<&GitCommit> {
        self.commits.iter().find(|c| c.sha == sha)
    }
}

/// Log cache guard: look up `sha` in the cached batch. A miss (including a
/// batch fetched for a different sha) discards the batch so it can never be
/// silently reused for an unrelated target.
pub fn take_from_log(log: &mut Option<RepoLogBatch>, sha: &str) -> Option<GitCommit> {
    let found = log
        .as_ref()
        .filter(|batch| batch.for_sha == sha)
        .and_then(|batch| batch.find(sha).cloned());
    if found.is_none() {
        *log = None;
    }
    found
}

/// A resolved location: repo, optional file path within it, optional revision
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GitUri {
    pub repo_path: PathBuf,
    pub path: Option<String>,
    pub sha: Option<String>,
}

/// A branch, as far as this tool cares: its name
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Branch {
    pub name: String,
}
