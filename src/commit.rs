use crate::error::{Result, StatsError};
use crate::model::{ChangedFile, CommitResponse, CommitSnapshot, EXTENSIONS};
use crate::util::has_extension;
use chrono::{DateTime, NaiveDate, NaiveDateTime};
use indicatif::{ProgressBar, ProgressStyle};
use reqwest::header::{ACCEPT, AUTHORIZATION};
use std::time::Duration;
use tracing::debug;

pub const DEFAULT_API_URL: &str = "https://api.github.com";
pub const DEFAULT_REPO: &str = "arkn98/cp-everyday";
pub const DEFAULT_BRANCH: &str = "master";

/// Where to look for the latest commit and how to authenticate.
#[derive(Debug, Clone)]
pub struct RemoteConfig {
    pub api_url: String,
    pub repo: String,
    pub branch: String,
    /// Sent as `Authorization: token <token>`; may be empty.
    pub token: String,
}

impl Default for RemoteConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            repo: DEFAULT_REPO.to_string(),
            branch: DEFAULT_BRANCH.to_string(),
            token: String::new(),
        }
    }
}

pub struct CommitFetcher {
    remote: RemoteConfig,
    client: reqwest::blocking::Client,
}

impl CommitFetcher {
    pub fn new(remote: RemoteConfig) -> Result<Self> {
        let client = reqwest::blocking::Client::builder()
            .user_agent(concat!("cpstats/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self { remote, client })
    }

    pub fn url(&self) -> String {
        format!(
            "{}/repos/{}/commits/{}",
            self.remote.api_url.trim_end_matches('/'),
            self.remote.repo,
            self.remote.branch
        )
    }

    /// Fetch the head commit of the configured branch.
    pub fn fetch_latest(&self) -> Result<CommitSnapshot> {
        let url = self.url();
        debug!(%url, authenticated = !self.remote.token.is_empty(), "requesting latest commit");

        let pb = ProgressBar::new_spinner();
        pb.set_style(
            ProgressStyle::default_spinner()
                .template("{spinner:.green} {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_spinner()),
        );
        pb.set_message(format!("Fetching {}@{}...", self.remote.repo, self.remote.branch));
        pb.enable_steady_tick(Duration::from_millis(100));

        let result = self.request(&url);
        pb.finish_and_clear();
        let body = result?;

        parse_snapshot(&body)
    }

    fn request(&self, url: &str) -> Result<String> {
        let resp = self
            .client
            .get(url)
            .header(AUTHORIZATION, format!("token {}", self.remote.token))
            .header(ACCEPT, "application/vnd.github+json")
            .send()?;

        let status = resp.status();
        debug!(%status, "commit request finished");
        if !status.is_success() {
            return Err(StatsError::RemoteStatus { status, url: url.to_string() });
        }
        Ok(resp.text()?)
    }
}

/// Decode a commit response body into a snapshot.
pub fn parse_snapshot(body: &str) -> Result<CommitSnapshot> {
    let response: CommitResponse = serde_json::from_str(body)?;
    let date = commit_date(&response.commit.committer.date)?;
    let added_files = count_added(&response.files);
    debug!(%date, added = added_files.len(), total = response.files.len(), "decoded commit");
    Ok(CommitSnapshot { date, added_files })
}

const OFFSET_FORMATS: [&str; 2] = ["%Y-%m-%dT%H:%M:%S%.f%z", "%Y%m%dT%H%M%S%.f%z"];
const NAIVE_FORMATS: [&str; 4] = [
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y%m%dT%H%M%S%.f",
];
const DATE_FORMATS: [&str; 2] = ["%Y-%m-%d", "%Y%m%d"];

/// Calendar date of an ISO-8601 timestamp, in the timestamp's own offset.
///
/// Accepts RFC 3339, basic (`20240315T100000Z`) and extended forms, numeric
/// offsets with or without a colon, and timestamps without a zone or time.
pub fn commit_date(raw: &str) -> Result<NaiveDate> {
    let raw = raw.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Ok(dt.date_naive());
    }

    let zoned = match raw.strip_suffix('Z').or_else(|| raw.strip_suffix('z')) {
        Some(rest) => format!("{rest}+0000"),
        None => raw.to_string(),
    };
    if let Some(dt) = OFFSET_FORMATS
        .iter()
        .find_map(|fmt| DateTime::parse_from_str(&zoned, fmt).ok())
    {
        return Ok(dt.date_naive());
    }
    if let Some(dt) = NAIVE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
    {
        return Ok(dt.date());
    }
    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(raw, fmt).ok())
        .ok_or_else(|| StatsError::InvalidDate(format!("'{raw}' is not an ISO-8601 timestamp")))
}

/// Names of newly added solution files, in response order.
pub fn count_added(files: &[ChangedFile]) -> Vec<String> {
    files
        .iter()
        .filter(|f| f.status == "added" && has_extension(&f.filename, &EXTENSIONS))
        .map(|f| f.filename.clone())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn file(status: &str, filename: &str) -> ChangedFile {
        ChangedFile { status: status.to_string(), filename: filename.to_string() }
    }

    #[test]
    fn counts_only_added_solutions() {
        let files = vec![
            file("added", "a.cpp"),
            file("modified", "b.py"),
            file("added", "c.txt"),
            file("added", "D.JAVA"),
        ];
        assert_eq!(count_added(&files), vec!["a.cpp".to_string(), "D.JAVA".to_string()]);
    }

    #[test]
    fn date_keeps_own_offset() {
        let d = commit_date("2024-03-15T23:30:00-05:00").unwrap();
        assert_eq!(d, NaiveDate::from_ymd_opt(2024, 3, 15).unwrap());
        let d = commit_date("2024-03-15T08:00:00Z").unwrap();
        assert_eq!(d, NaiveDate::from_ymd_opt(2024, 3, 15).unwrap());
    }

    #[test]
    fn accepts_other_iso_8601_forms() {
        let expected = NaiveDate::from_ymd_opt(2024, 3, 15).unwrap();
        for raw in [
            "2024-03-15T10:00:00",
            "2024-03-15T10:00",
            "2024-03-15",
            "20240315",
            "20240315T100000Z",
            "20240315T100000+0530",
            "2024-03-15T10:00:00+0200",
            "2024-03-15T10:00:00.250-03:00",
        ] {
            assert_eq!(commit_date(raw).unwrap(), expected, "{raw}");
        }
    }

    #[test]
    fn bad_date_is_rejected() {
        assert!(matches!(commit_date("yesterday"), Err(StatsError::InvalidDate(_))));
    }

    #[test]
    fn parses_response_body() {
        let body = r#"{
            "sha": "abc",
            "commit": {"committer": {"name": "x", "date": "2024-03-15T10:00:00Z"}},
            "files": [
                {"filename": "day1/sol.cpp", "status": "added", "additions": 10},
                {"filename": "README.md", "status": "modified"},
                {"filename": "day1/Main.java", "status": "added"}
            ]
        }"#;
        let snap = parse_snapshot(body).unwrap();
        assert_eq!(snap.date, NaiveDate::from_ymd_opt(2024, 3, 15).unwrap());
        assert_eq!(snap.added_count(), 2);
    }

    #[test]
    fn missing_fields_fail_decode() {
        let body = r#"{"commit": {"committer": {"date": "2024-03-15T10:00:00Z"}}}"#;
        assert!(matches!(parse_snapshot(body), Err(StatsError::Decode(_))));
    }

    #[test]
    fn url_joins_parts() {
        let fetcher = CommitFetcher::new(RemoteConfig {
            api_url: "http://127.0.0.1:9/".to_string(),
            ..RemoteConfig::default()
        })
        .unwrap();
        assert_eq!(fetcher.url(), "http://127.0.0.1:9/repos/arkn98/cp-everyday/commits/master");
    }
}
