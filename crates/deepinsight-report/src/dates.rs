use chrono::{DateTime, Utc};
use deepinsight_core::Manifest;

pub const UNKNOWN_RANGE: &str = "Date range unknown";
pub const UNKNOWN_DATE: &str = "Unknown date";

/// `"Mar 01 – Mar 14, 2025"` spanning every manifest start and end time
pub fn date_range(manifest: Option<&Manifest>) -> String {
    let Some(manifest) = manifest else {
        return UNKNOWN_RANGE.to_string();
    };

    let times: Vec<DateTime<Utc>> = manifest
        .sessions
        .iter()
        .flat_map(|s| [s.start_time, s.end_time])
        .flatten()
        .collect();
    let (first, last) = (times.iter().min(), times.iter().max());

    match (first, last) {
        (Some(first), Some(last)) => format!(
            "{} \u{2013} {}",
            first.format("%b %d"),
            last.format("%b %d, %Y")
        ),
        _ => UNKNOWN_RANGE.to_string(),
    }
}

/// Start date of one session as `"Mar 01"`
pub fn session_date(manifest: Option<&Manifest>, session_id: &str) -> String {
    manifest
        .and_then(|m| m.entry(session_id))
        .and_then(|e| e.start_time)
        .map(|t| t.format("%b %d").to_string())
        .unwrap_or_else(|| UNKNOWN_DATE.to_string())
}

pub fn generated_date(now: DateTime<Utc>) -> String {
    now.format("%b %d, %Y").to_string()
}
