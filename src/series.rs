use crate::error::{Result, StatsError};
use crate::model::{CommitSnapshot, SeriesEntry};
use crate::util::{day_label, next_day};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

pub const DEFAULT_DATA_FILE: &str = "data.csv";

/// The rolling `(label, value)` dataset read by the plotting tool.
///
/// The file holds up to `window` real rows followed by one synthetic
/// zero-value row dated the day after the last real row.
pub struct SeriesStore {
    path: PathBuf,
    window: usize,
}

impl SeriesStore {
    pub fn new<P: AsRef<Path>>(path: P, window: usize) -> Self {
        Self { path: path.as_ref().to_path_buf(), window: window.max(1) }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Record `snapshot`, rewriting the whole file.
    pub fn update(&self, snapshot: &CommitSnapshot) -> Result<Vec<SeriesEntry>> {
        let entries = self.preview(snapshot)?;
        write_series(&self.path, &entries)?;
        info!(path = %self.path.display(), rows = entries.len(), "series updated");
        Ok(entries)
    }

    /// The rows `update` would write, without touching the file.
    pub fn preview(&self, snapshot: &CommitSnapshot) -> Result<Vec<SeriesEntry>> {
        let existing = read_series(&self.path)?;
        apply(existing, snapshot, self.window)
    }
}

/// Drop the previous synthetic row, trim the oldest rows to make room,
/// then append the new real row and a fresh synthetic row.
pub fn apply(
    mut entries: Vec<SeriesEntry>,
    snapshot: &CommitSnapshot,
    window: usize,
) -> Result<Vec<SeriesEntry>> {
    // An empty series has no synthetic row yet.
    entries.pop();

    if entries.len() >= window {
        let excess = entries.len() + 1 - window;
        debug!(excess, "trimming oldest entries");
        entries.drain(..excess);
    }

    entries.push(SeriesEntry::new(day_label(snapshot.date), snapshot.added_count()));
    entries.push(SeriesEntry::new(day_label(next_day(snapshot.date)?), 0));
    Ok(entries)
}

/// Read a space-delimited series file. A missing file reads as empty.
pub fn read_series(path: &Path) -> Result<Vec<SeriesEntry>> {
    let content = match std::fs::read_to_string(path) {
        Ok(c) => c,
        Err(e) if e.kind() == ErrorKind::NotFound => {
            info!(path = %path.display(), "series file missing, starting fresh");
            return Ok(Vec::new());
        }
        Err(e) => return Err(e.into()),
    };
    parse_series(&content)
}

/// Parse space-delimited `label value` rows. Blank lines are skipped and
/// trailing empty fields (from trailing spaces) are ignored.
pub fn parse_series(content: &str) -> Result<Vec<SeriesEntry>> {
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(b' ')
        .has_headers(false)
        .flexible(true)
        .from_reader(content.as_bytes());

    let mut entries = Vec::new();
    for result in reader.records() {
        let record = result?;
        let line = record.position().map(|p| p.line()).unwrap_or(0);
        let fields: csv::StringRecord = {
            let used = record.as_byte_record().iter().rposition(|f| !f.is_empty()).map_or(0, |i| i + 1);
            record.iter().take(used).collect()
        };
        if fields.is_empty() {
            continue;
        }
        if fields.len() != 2 || fields[0].is_empty() {
            return Err(StatsError::Parse(format!(
                "line {line}: expected '<label> <value>', got {} field(s)",
                fields.len()
            )));
        }
        let entry: SeriesEntry = fields
            .deserialize(None)
            .map_err(|e| StatsError::Parse(format!("line {line}: {e}")))?;
        entries.push(entry);
    }
    Ok(entries)
}

pub fn format_series(entries: &[SeriesEntry]) -> Result<String> {
    let mut writer = csv::WriterBuilder::new()
        .delimiter(b' ')
        .has_headers(false)
        .terminator(csv::Terminator::Any(b'\n'))
        .from_writer(Vec::new());
    for entry in entries {
        writer.serialize(entry)?;
    }
    let bytes = writer.into_inner().map_err(|e| StatsError::Io(e.into_error()))?;
    String::from_utf8(bytes).map_err(|e| StatsError::Parse(format!("series output: {e}")))
}

/// Truncate and rewrite. Not atomic: a crash mid-write can leave a partial file.
pub fn write_series(path: &Path, entries: &[SeriesEntry]) -> Result<()> {
    std::fs::write(path, format_series(entries)?)?;
    Ok(())
}
