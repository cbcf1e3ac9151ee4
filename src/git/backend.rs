use super::commit::{
    Branch, CommitFileChange, FileChangeStatus, GitCommit, RepoLogBatch, UNCOMMITTED_SHA,
};
use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use std::process::Command;
use tracing::debug;

/// Separator between fields in git log/show --format output. A rare Unicode
/// character avoids collision with commit messages.
const FIELD_SEP: &str = "␞";
/// Separator between records in multi-commit output.
const RECORD_SEP: &str = "␟";

/// Version-control queries the navigation session needs. Implemented by
/// [`GitCli`] for real repos and by fakes in tests.
pub trait GitBackend {
    /// Blame a single 1-based line. `None` means the file is not tracked.
    /// A committed line yields a fully hydrated commit; an uncommitted line
    /// yields the working-tree placeholder (`is_uncommitted = true`).
    fn blame_for_line(&self, file: &Path, line: u64) -> Result<Option<GitCommit>>;

    /// Fetch at most `max_count` commits anchored at `sha`. `None` means the
    /// revision is unknown to the repository.
    fn log_for_sha(&self, repo: &Path, sha: &str, max_count: usize)
        -> Result<Option<RepoLogBatch>>;

    /// Fetch at most `max_count` commits from the tip of `branch`.
    fn log_for_branch(&self, repo: &Path, branch: &str, max_count: usize)
        -> Result<Vec<GitCommit>>;

    /// The branch HEAD currently points at, or `None` when detached.
    fn current_branch(&self, repo: &Path) -> Result<Option<Branch>>;

    /// Repository root containing `dir`.
    fn repo_root(&self, dir: &Path) -> Result<PathBuf>;

    /// Patch text for one file of one commit.
    fn file_patch(&self, repo: &Path, sha: &str, file: &str) -> Result<String>;
}

/// Backend that shells out to the `git` CLI.
pub struct GitCli;

impl GitCli {
    fn run(cmd: &mut Command) -> Result<String> {
        let output = cmd.output().context("Failed to run git")?;
        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            anyhow::bail!("git command failed: {}", stderr.trim());
        }
        Ok(String::from_utf8_lossy(&output.stdout).to_string())
    }

    /// Hydrate one commit: metadata plus name-status file list.
    fn show_commit(&self, repo: &Path, sha: &str) -> Result<Option<GitCommit>> {
        let format = log_format();
        let mut cmd = Command::new("git");
        cmd.current_dir(repo)
            .args(["show", "--name-status", "--no-color"])
            .arg(format!("--format={format}"))
            .arg(sha);
        let stdout = match Self::run(&mut cmd) {
            Ok(out) => out,
            Err(_) => return Ok(None), // unknown revision
        };
        Ok(parse_log_records(&stdout, repo).into_iter().next())
    }
}

impl GitBackend for GitCli {
    fn blame_for_line(&self, file: &Path, line: u64) -> Result<Option<GitCommit>> {
        let dir = file.parent().unwrap_or_else(|| Path::new("."));
        let mut cmd = Command::new("git");
        cmd.current_dir(dir)
            .arg("blame")
            .arg(format!("-L{line},{line}"))
            .arg("--porcelain")
            .arg("--")
            .arg(file);

        let output = cmd.output().context("Failed to run git blame")?;
        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            // Untracked files are a domain outcome, not an error
            if stderr.contains("no such path") || stderr.contains("outside repository") {
                debug!(file = %file.display(), "blame: file not tracked");
                return Ok(None);
            }
            anyhow::bail!("git blame failed: {}", stderr.trim());
        }

        let stdout = String::from_utf8_lossy(&output.stdout);
        let Some(blamed) = parse_blame_porcelain(&stdout) else {
            return Ok(None);
        };

        let repo = self.repo_root(dir)?;
        if blamed.sha == UNCOMMITTED_SHA {
            return Ok(Some(GitCommit {
                repo_path: repo,
                sha: UNCOMMITTED_SHA.to_string(),
                author_name: String::new(),
                author_email: String::new(),
                date: String::new(),
                summary: "Uncommitted changes".to_string(),
                files: vec![],
                is_uncommitted: true,
                working_file: Some(blamed.file),
            }));
        }

        let mut commit = self
            .show_commit(&repo, &blamed.sha)?
            .with_context(|| format!("blamed commit {} not found in log", blamed.sha))?;
        commit.working_file = Some(blamed.file);
        Ok(Some(commit))
    }

    fn log_for_sha(
        &self,
        repo: &Path,
        sha: &str,
        max_count: usize,
    ) -> Result<Option<RepoLogBatch>> {
        let format = log_format();
        let mut cmd = Command::new("git");
        cmd.current_dir(repo)
            .args(["log", "--name-status", "--no-color"])
            .arg(format!("-n{max_count}"))
            .arg(format!("--format={format}"))
            .arg(sha);
        let stdout = match Self::run(&mut cmd) {
            Ok(out) => out,
            Err(_) => return Ok(None), // unknown ref
        };
        let commits = parse_log_records(&stdout, repo);
        if commits.is_empty() {
            return Ok(None);
        }
        Ok(Some(RepoLogBatch {
            for_sha: sha.to_string(),
            commits,
        }))
    }

    fn log_for_branch(&self, repo: &Path, branch: &str, max_count: usize)
        -> Result<Vec<GitCommit>> {
        let format = log_format();
        let mut cmd = Command::new("git");
        cmd.current_dir(repo)
            .args(["log", "--name-status", "--no-color"])
            .arg(format!("-n{max_count}"))
            .arg(format!("--format={format}"))
            .arg(branch);
        let stdout = Self::run(&mut cmd).context("Failed to read branch log")?;
        Ok(parse_log_records(&stdout, repo))
    }

    fn current_branch(&self, repo: &Path) -> Result<Option<Branch>> {
        let mut cmd = Command::new("git");
        cmd.current_dir(repo).args(["rev-parse", "--abbrev-ref", "HEAD"]);
        let name = Self::run(&mut cmd)
            .context("Failed to determine current branch")?
            .trim()
            .to_string();
        if name.is_empty() || name == "HEAD" {
            // detached HEAD
            return Ok(None);
        }
        Ok(Some(Branch { name }))
    }

    fn repo_root(&self, dir: &Path) -> Result<PathBuf> {
        let mut cmd = Command::new("git");
        cmd.current_dir(dir).args(["rev-parse", "--show-toplevel"]);
        let output = cmd.output().context("Failed to run git")?;
        if !output.status.success() {
            anyhow::bail!("Not a git repository: {}", dir.display());
        }
        Ok(PathBuf::from(
            String::from_utf8_lossy(&output.stdout).trim(),
        ))
    }

    fn file_patch(&self, repo: &Path, sha: &str, file: &str) -> Result<String> {
        let mut cmd = Command::new("git");
        cmd.current_dir(repo)
            .args(["show", "--no-color", "--format="])
            .arg(sha)
            .arg("--")
            .arg(file);
        Self::run(&mut cmd).context("Failed to read file patch")
    }
}

fn log_format() -> String {
    format!("{RECORD_SEP}%H{FIELD_SEP}%an{FIELD_SEP}%ae{FIELD_SEP}%ai{FIELD_SEP}%s")
}

/// The sha and filename blame attributes a line to.
#[derive(Debug, PartialEq)]
pub(crate) struct BlamedLine {
    pub sha: String,
    pub file: String,
}

/// Parse `git blame -L<n>,<n> --porcelain` output for a single line.
///
/// The first line is `<sha> <orig_line> <final_line> [<num_lines>]`, followed
/// by header fields until the tab-prefixed content line. Only the sha and the
/// `filename` header matter here; the commit is hydrated separately.
pub(crate) fn parse_blame_porcelain(output: &str) -> Option<BlamedLine> {
    let mut lines = output.lines();
    let head = lines.next()?;
    let sha = head.split_whitespace().next()?.trim_start_matches('^');
    if sha.len() != 40 || !sha.chars().all(|c| c.is_ascii_hexdigit()) {
        return None;
    }

    let mut file = String::new();
    for line in lines {
        if line.starts_with('\t') {
            break;
        }
        if let Some(val) = line.strip_prefix("filename ") {
            file = val.to_string();
        }
    }

    Some(BlamedLine {
        sha: sha.to_string(),
        file,
    })
}

/// Parse `git log/show --name-status` output using the RECORD_SEP/FIELD_SEP
/// format into commits. Each record is the formatted metadata line, a blank
/// line, then one name-status line per changed file.
pub(crate) fn parse_log_records(output: &str, repo: &Path) -> Vec<GitCommit> {
    output
        .split(RECORD_SEP)
        .filter(|r| !r.trim().is_empty())
        .filter_map(|record| parse_log_record(record, repo))
        .collect()
}

fn parse_log_record(record: &str, repo: &Path) -> Option<GitCommit> {
    let (meta, file_lines) = match record.split_once('\n') {
        Some((m, rest)) => (m, rest),
        None => (record, ""),
    };

    let fields: Vec<&str> = meta.split(FIELD_SEP).collect();
    if fields.len() < 5 {
        return None;
    }

    let files = file_lines
        .lines()
        .filter(|l| !l.trim().is_empty())
        .filter_map(parse_name_status_line)
        .collect();

    Some(GitCommit {
        repo_path: repo.to_path_buf(),
        sha: fields[0].trim().to_string(),
        author_name: fields[1].trim().to_string(),
        author_email: fields[2].trim().to_string(),
        date: fields[3].trim().to_string(),
        // a summary containing the separator splits into extra fields
        summary: fields[4..].join(FIELD_SEP).trim().to_string(),
        files,
        is_uncommitted: false,
        working_file: None,
    })
}

/// Parse one `--name-status` line: `M\tpath`, `A\tpath`, `D\tpath`, or
/// `R<score>\told\tnew`.
fn parse_name_status_line(line: &str) -> Option<CommitFileChange> {
    let mut parts = line.split('\t');
    let code = parts.next()?.trim();
    let first = parts.next()?.trim();
    match code.chars().next()? {
        'A' => Some(CommitFileChange {
            path: first.to_string(),
            status: FileChangeStatus::Added,
        }),
        'M' => Some(CommitFileChange {
            path: first.to_string(),
            status: FileChangeStatus::Modified,
        }),
        'D' => Some(CommitFileChange {
            path: first.to_string(),
            status: FileChangeStatus::Deleted,
        }),
        'R' | 'C' => {
            let new_path = parts.next()?.trim();
            Some(CommitFileChange {
                path: new_path.to_string(),
                status: FileChangeStatus::Renamed(first.to_string()),
            })
        }
        _ => None,
    }
}
