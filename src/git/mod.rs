mod backend;
mod commit;

pub use backend::{GitBackend, GitCli};
pub use commit::{
    take_from_log, Branch, Commit, CommitFileChange, FileChangeStatus, GitCommit, GitUri,
    RepoLogBatch, UNCOMMITTED_SHA,
};
