use crate::cli::CommonArgs;
use crate::commit::{CommitFetcher, RemoteConfig};
use crate::error::StatsError;
use crate::model::{CommitSnapshot, SeriesEntry};
use crate::readme::update_readme;
use crate::series::{read_series, SeriesStore};
use crate::util::day_label;
use anyhow::Context;
use console::style;
use std::process::ExitCode;
use tracing::info;

/// How a failed run is reported.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Failure {
    /// The API answered with a non-success status.
    Remote,
    Other,
}

impl Failure {
    pub fn classify(err: &anyhow::Error) -> Self {
        let remote = err
            .chain()
            .any(|cause| cause.downcast_ref::<StatsError>().is_some_and(StatsError::is_remote));
        if remote {
            Failure::Remote
        } else {
            Failure::Other
        }
    }

    pub fn prefix(self) -> &'static str {
        match self {
            Failure::Remote => "request to GitHub API failed",
            Failure::Other => "something went wrong",
        }
    }

    /// Failures exit 0 unless `strict`.
    pub fn exit_status(self, strict: bool) -> u8 {
        match (strict, self) {
            (false, _) => 0,
            (true, Failure::Remote) => 2,
            (true, Failure::Other) => 1,
        }
    }
}

pub fn exec(common: &CommonArgs, remote: RemoteConfig, dry_run: bool, strict: bool) -> ExitCode {
    let outcome = if dry_run {
        preview(common, remote)
    } else {
        run(common, remote).map(|snapshot| print_recorded(&snapshot))
    };
    report(outcome, strict)
}

pub fn exec_render(common: &CommonArgs, strict: bool) -> ExitCode {
    let outcome = replot(common).map(|()| {
        println!("{} {}", style("Patched").green().bold(), common.readme.display());
    });
    report(outcome, strict)
}

pub fn exec_show(common: &CommonArgs, json: bool, strict: bool) -> ExitCode {
    let outcome = read_series(&common.data)
        .context("Failed to read series file")
        .and_then(|entries| {
            if json {
                println!("{}", serde_json::to_string_pretty(&entries)?);
            } else {
                output_table(&entries);
            }
            Ok(())
        });
    report(outcome, strict)
}

/// Fetch, record, plot, patch. Each stage commits its own side effects.
pub fn run(common: &CommonArgs, remote: RemoteConfig) -> anyhow::Result<CommitSnapshot> {
    let fetcher = CommitFetcher::new(remote).context("Failed to build HTTP client")?;
    let snapshot = fetcher.fetch_latest().context("Failed to fetch latest commit")?;
    info!(date = %snapshot.date, added = snapshot.added_count(), "fetched snapshot");

    SeriesStore::new(&common.data, common.window)
        .update(&snapshot)
        .context("Failed to update series file")?;

    replot(common)?;
    Ok(snapshot)
}

fn replot(common: &CommonArgs) -> anyhow::Result<()> {
    let fig = common.renderer().render().context("Failed to render plot")?;
    update_readme(&common.readme, &common.marker, &fig).context("Failed to patch README")?;
    Ok(())
}

fn preview(common: &CommonArgs, remote: RemoteConfig) -> anyhow::Result<()> {
    let fetcher = CommitFetcher::new(remote).context("Failed to build HTTP client")?;
    let snapshot = fetcher.fetch_latest().context("Failed to fetch latest commit")?;
    let entries = SeriesStore::new(&common.data, common.window)
        .preview(&snapshot)
        .context("Failed to read series file")?;

    println!("{}", style("Dry run, nothing written").yellow());
    println!("Commit date: {}", style(snapshot.date).cyan());
    for f in &snapshot.added_files {
        println!("  + {f}");
    }
    output_table(&entries);
    Ok(())
}

fn print_recorded(snapshot: &CommitSnapshot) {
    println!(
        "{} {} new solution(s) on {}",
        style("Recorded").green().bold(),
        style(snapshot.added_count()).cyan(),
        day_label(snapshot.date)
    );
}

fn output_table(entries: &[SeriesEntry]) {
    println!("{:<8} {:>6}", style("Date").bold(), style("Added").bold());
    println!("{}", "─".repeat(15));
    for e in entries {
        println!("{:<8} {:>6}", e.label, e.value);
    }
}

fn report<T>(outcome: anyhow::Result<T>, strict: bool) -> ExitCode {
    match outcome {
        Ok(_) => ExitCode::SUCCESS,
        Err(err) => {
            let failure = Failure::classify(&err);
            println!("{}: {err:#}", style(failure.prefix()).red());
            ExitCode::from(failure.exit_status(strict))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_errors_classify_as_remote() {
        let err = anyhow::Error::from(StatsError::RemoteStatus {
            status: reqwest::StatusCode::NOT_FOUND,
            url: "http://localhost/repos/a/b/commits/master".to_string(),
        })
        .context("Failed to fetch latest commit");
        assert_eq!(Failure::classify(&err), Failure::Remote);
        assert_eq!(Failure::Remote.prefix(), "request to GitHub API failed");
    }

    #[test]
    fn everything_else_is_generic() {
        let err = anyhow::Error::from(StatsError::MarkerNotFound("cp-progress".to_string()))
            .context("Failed to patch README");
        assert_eq!(Failure::classify(&err), Failure::Other);
        assert_eq!(Failure::classify(&anyhow::anyhow!("boom")), Failure::Other);
    }

    #[test]
    fn exit_codes_depend_on_strict() {
        assert_eq!(Failure::Remote.exit_status(false), 0);
        assert_eq!(Failure::Other.exit_status(false), 0);
        assert_eq!(Failure::Remote.exit_status(true), 2);
        assert_eq!(Failure::Other.exit_status(true), 1);
    }
}
