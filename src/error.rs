use thiserror::Error;

pub type Result<T> = std::result::Result<T, StatsError>;

#[derive(Error, Debug)]
pub enum StatsError {
    #[error("{status} for url ({url})")]
    RemoteStatus { status: reqwest::StatusCode, url: String },
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("Decode error: {0}")]
    Decode(#[from] serde_json::Error),
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Parse error: {0}")]
    Parse(String),
    #[error("Invalid date: {0}")]
    InvalidDate(String),
    #[error("Plot command not found: {0}")]
    PlotNotFound(String),
    #[error("Plot command failed with {status}: {stderr}")]
    PlotFailed { status: std::process::ExitStatus, stderr: String },
    #[error("Plot output is not valid UTF-8: {0}")]
    PlotOutput(#[from] std::string::FromUtf8Error),
    #[error("Marker '{0}' not found")]
    MarkerNotFound(String),
    #[error("Marker '{marker}' found {count} times, expected exactly once")]
    DuplicateMarkers { marker: String, count: usize },
}

impl StatsError {
    /// True for the remote-fetch failure kind, i.e. the API answered with a
    /// non-success status. Transport errors are not included.
    pub fn is_remote(&self) -> bool {
        matches!(self, StatsError::RemoteStatus { .. })
    }
}
