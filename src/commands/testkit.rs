//! Fake collaborators for command-session tests.

use super::{BackAction, SessionCtx};
use crate::config::CwConfig;
use crate::git::{Branch, GitBackend, GitCommit, GitUri, RepoLogBatch};
use crate::host::{ActiveEditor, EditorHost};
use crate::ui::commit_view::CommitView;
use crate::ui::notify::Notifier;
use crate::ui::picker::{FileSelection, Picker, PickerItem};
use anyhow::Result;
use std::cell::Cell;
use std::path::{Path, PathBuf};

pub fn commit(sha: &str) -> GitCommit {
    GitCommit {
        repo_path: PathBuf::from("/repo"),
        sha: sha.to_string(),
        author_name: "Ada".to_string(),
        author_email: "ada@example.com".to_string(),
        date: "2026-01-01 12:00:00 +0000".to_string(),
        summary: "change things".to_string(),
        files: vec![],
        is_uncommitted: false,
        working_file: None,
    }
}

#[derive(Default)]
pub struct FakeGit {
    /// blame outcome: Err when None-level failure is wanted via `blame_fails`
    pub blame_result: Option<Option<GitCommit>>,
    pub blame_fails: bool,
    /// batch returned by log_for_sha, regardless of sha asked for
    pub log_result: Option<RepoLogBatch>,
    pub branch: Option<Branch>,
    pub branch_commits: Vec<GitCommit>,
    pub patch: String,

    pub blame_calls: Cell<usize>,
    pub log_calls: Cell<usize>,
    pub last_log_max_count: Cell<usize>,
}

impl GitBackend for FakeGit {
    fn blame_for_line(&self, _file: &Path, _line: u64) -> Result<Option<GitCommit>> {
        self.blame_calls.set(self.blame_calls.get() + 1);
        if self.blame_fails {
            anyhow::bail!("blame exploded");
        }
        Ok(self.blame_result.clone().unwrap_or(None))
    }

    fn log_for_sha(
        &self,
        _repo: &Path,
        _sha: &str,
        max_count: usize,
    ) -> Result<Option<RepoLogBatch>> {
        self.log_calls.set(self.log_calls.get() + 1);
        self.last_log_max_count.set(max_count);
        Ok(self.log_result.clone())
    }

    fn log_for_branch(&self, _repo: &Path, _branch: &str, _max: usize) -> Result<Vec<GitCommit>> {
        Ok(self.branch_commits.clone())
    }

    fn current_branch(&self, _repo: &Path) -> Result<Option<Branch>> {
        Ok(self.branch.clone())
    }

    fn repo_root(&self, _dir: &Path) -> Result<PathBuf> {
        Ok(PathBuf::from("/repo"))
    }

    fn file_patch(&self, _repo: &Path, _sha: &str, _file: &str) -> Result<String> {
        Ok(self.patch.clone())
    }
}

#[derive(Default)]
pub struct FakeHost {
    pub editor: Option<ActiveEditor>,
}

impl EditorHost for FakeHost {
    fn active_editor(&self) -> Option<ActiveEditor> {
        self.editor.clone()
    }
}

/// One recorded commit-picker interaction.
pub struct ShownCommit {
    pub sha: String,
    pub back_label: Option<String>,
    pub return_label: String,
    pub had_log: bool,
}

/// One recorded file-picker interaction.
pub struct ShownFile {
    pub sha: String,
    pub file: String,
    pub back_label: Option<String>,
}

#[derive(Default)]
pub struct FakePicker {
    pub commit_response: Option<PickerItem>,
    pub file_response: Option<FileSelection>,
    pub list_response: Option<usize>,

    pub shown_commits: Vec<ShownCommit>,
    pub shown_files: Vec<ShownFile>,
    pub shown_lists: Vec<(String, usize)>,
}

impl Picker for FakePicker {
    fn show_commit(
        &mut self,
        commit: &GitCommit,
        _uri: &GitUri,
        back: Option<&BackAction>,
        return_here: &BackAction,
        log: Option<&RepoLogBatch>,
    ) -> Result<Option<PickerItem>> {
        self.shown_commits.push(ShownCommit {
            sha: commit.sha.clone(),
            back_label: back.map(|a| a.label.clone()),
            return_label: return_here.label.clone(),
            had_log: log.is_some(),
        });
        Ok(self.commit_response.take())
    }

    fn show_file(
        &mut self,
        commit: &GitCommit,
        file: &str,
        back: Option<&BackAction>,
    ) -> Result<FileSelection> {
        self.shown_files.push(ShownFile {
            sha: commit.sha.clone(),
            file: file.to_string(),
            back_label: back.map(|a| a.label.clone()),
        });
        Ok(self.file_response.take().unwrap_or(FileSelection::Cancelled))
    }

    fn show_commit_list(&mut self, title: &str, commits: &[GitCommit]) -> Result<Option<usize>> {
        self.shown_lists.push((title.to_string(), commits.len()));
        Ok(self.list_response.take())
    }
}

#[derive(Default)]
pub struct FakeNotifier {
    pub warnings: Vec<String>,
    pub errors: Vec<String>,
}

impl Notifier for FakeNotifier {
    fn warn(&mut self, msg: &str) {
        self.warnings.push(msg.to_string());
    }

    fn error(&mut self, msg: &str) {
        self.errors.push(msg.to_string());
    }
}

#[derive(Default)]
pub struct FakeView {
    pub shown_commits: Vec<(PathBuf, String)>,
    pub shown_patches: Vec<String>,
}

impl CommitView for FakeView {
    fn show_commit(&mut self, repo: &Path, sha: &str) -> Result<()> {
        self.shown_commits.push((repo.to_path_buf(), sha.to_string()));
        Ok(())
    }

    fn show_patch(&mut self, _title: &str, patch: &str) -> Result<()> {
        self.shown_patches.push(patch.to_string());
        Ok(())
    }
}

/// Bundle of fakes wired into a [`SessionCtx`].
#[derive(Default)]
pub struct Fixture {
    pub git: FakeGit,
    pub host: FakeHost,
    pub picker: FakePicker,
    pub notifier: FakeNotifier,
    pub view: FakeView,
    pub config: CwConfig,
}

impl Fixture {
    pub fn ctx(&mut self) -> SessionCtx<'_> {
        SessionCtx {
            git: &self.git,
            host: &self.host,
            picker: &mut self.picker,
            notifier: &mut self.notifier,
            view: &mut self.view,
            config: &self.config,
        }
    }
}
