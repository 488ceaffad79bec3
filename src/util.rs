use chrono::{Days, NaiveDate};
use crate::error::{Result, StatsError};

pub const LABEL_FORMAT: &str = "%d/%m";

pub fn day_label(date: NaiveDate) -> String {
    date.format(LABEL_FORMAT).to_string()
}

pub fn next_day(date: NaiveDate) -> Result<NaiveDate> {
    date.checked_add_days(Days::new(1))
        .ok_or_else(|| StatsError::InvalidDate(format!("No day after {date}")))
}

pub fn has_extension(filename: &str, extensions: &[&str]) -> bool {
    let lower = filename.to_lowercase();
    extensions.iter().any(|ext| lower.ends_with(ext))
}
