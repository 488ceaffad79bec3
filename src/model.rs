use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// File suffixes counted as solutions.
pub const EXTENSIONS: [&str; 3] = [".cpp", ".java", ".py"];

/// Maximum number of real entries kept in the series file.
pub const DEFAULT_WINDOW: usize = 11;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommitSnapshot {
    pub date: NaiveDate,
    pub added_files: Vec<String>,
}

impl CommitSnapshot {
    pub fn added_count(&self) -> u64 {
        self.added_files.len() as u64
    }
}

/// One `label value` row of the series file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeriesEntry {
    pub label: String,
    pub value: u64,
}

impl SeriesEntry {
    pub fn new(label: impl Into<String>, value: u64) -> Self {
        Self { label: label.into(), value }
    }
}

// Wire types for `GET /repos/{owner}/{repo}/commits/{ref}`.

#[derive(Debug, Clone, Deserialize)]
pub struct CommitResponse {
    pub commit: CommitDetail,
    pub files: Vec<ChangedFile>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CommitDetail {
    pub committer: Signature,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Signature {
    pub date: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ChangedFile {
    pub filename: String,
    pub status: String,
}
