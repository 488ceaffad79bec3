use crate::error::{Result, StatsError};
use regex::Regex;
use std::path::Path;
use tracing::info;

pub const DEFAULT_README_FILE: &str = "README.md";
pub const DEFAULT_MARKER: &str = "cp-progress";

fn marker_pattern(marker: &str) -> Result<Regex> {
    let m = regex::escape(marker);
    Regex::new(&format!(r"(?s)<!-- {m} start -->(.*?)<!-- {m} end -->"))
        .map_err(|e| StatsError::Parse(format!("marker '{marker}': {e}")))
}

/// Locate the single marked region, failing on zero or several.
fn find_region<'c>(content: &'c str, marker: &str) -> Result<regex::Captures<'c>> {
    let re = marker_pattern(marker)?;
    let mut matches = re.captures_iter(content);
    let first = matches
        .next()
        .ok_or_else(|| StatsError::MarkerNotFound(marker.to_string()))?;
    let extra = matches.count();
    if extra > 0 {
        return Err(StatsError::DuplicateMarkers {
            marker: marker.to_string(),
            count: extra + 1,
        });
    }
    Ok(first)
}

/// Replace the text between `<!-- {marker} start -->` and `<!-- {marker} end -->`.
///
/// Unless `inline`, the chunk is surrounded by line breaks. Everything outside
/// the region, the markers included, is returned unchanged.
pub fn replace_chunk(content: &str, marker: &str, chunk: &str, inline: bool) -> Result<String> {
    let region = find_region(content, marker)?;
    let whole = region.get(0).ok_or_else(|| StatsError::MarkerNotFound(marker.to_string()))?;

    let body = if inline { chunk.to_string() } else { format!("\n{chunk}\n") };
    let mut out = String::with_capacity(content.len() + body.len());
    out.push_str(&content[..whole.start()]);
    out.push_str(&format!("<!-- {marker} start -->{body}<!-- {marker} end -->"));
    out.push_str(&content[whole.end()..]);
    Ok(out)
}

/// Text strictly between the markers.
pub fn extract_chunk<'c>(content: &'c str, marker: &str) -> Result<&'c str> {
    let region = find_region(content, marker)?;
    region
        .get(1)
        .map(|m| m.as_str())
        .ok_or_else(|| StatsError::MarkerNotFound(marker.to_string()))
}

/// Patch the document at `path` in place. The file is truncated on write.
pub fn update_readme(path: &Path, marker: &str, chunk: &str) -> Result<()> {
    let content = std::fs::read_to_string(path)?;
    let patched = replace_chunk(&content, marker, chunk, false)?;
    std::fs::write(path, patched)?;
    info!(path = %path.display(), marker, "readme patched");
    Ok(())
}
