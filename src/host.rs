use std::path::{Path, PathBuf};

/// The "active editor": a file plus a cursor line. The line is signed because
/// host integrations have been seen to report negative lines; the resolver
/// treats those as no usable cursor.
#[derive(Debug, Clone, PartialEq)]
pub struct ActiveEditor {
    pub file: PathBuf,
    pub line: i64,
}

/// What the session needs from whatever is hosting it: the active editor
/// context and repo-relative path resolution.
pub trait EditorHost {
    fn active_editor(&self) -> Option<ActiveEditor>;

    /// `file` relative to `repo`, with forward slashes.
    fn relative_path(&self, file: &Path, repo: &Path) -> Option<String> {
        let rel = file.strip_prefix(repo).ok()?;
        Some(rel.to_string_lossy().replace('\\', "/"))
    }
}

/// Host backed by command-line arguments: `--file`/`--line` stand in for the
/// active editor and cursor.
pub struct CliHost {
    file: Option<PathBuf>,
    line: i64,
}

impl CliHost {
    pub fn new(file: Option<PathBuf>, line: i64) -> Self {
        Self { file, line }
    }
}

impl EditorHost for CliHost {
    fn active_editor(&self) -> Option<ActiveEditor> {
        self.file.as_ref().map(|file| ActiveEditor {
            file: file.clone(),
            line: self.line,
        })
    }
}
