//! String parsing utilities

use super::format::UNKNOWN;
use chrono::{Local, NaiveDate, NaiveDateTime};

/// Extract value after a colon and space
pub fn extract_after_colon(line: &str) -> Option<String> {
    line.split_once(':')
        .map(|(_, value)| value.trim().to_string())
        .filter(|s| !s.is_empty())
}

/// Parse the `YYYYMMDDHHMMSS` prefix of a provider timestamp
/// (`20240115083000.000000+480` style).
pub fn parse_timestamp(raw: &str) -> Option<NaiveDateTime> {
    let stamp = raw.get(..14)?;
    if !stamp.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }

    let field = |range: std::ops::Range<usize>| stamp[range].parse::<u32>().ok();
    let year = stamp[0..4].parse::<i32>().ok()?;

    NaiveDate::from_ymd_opt(year, field(4..6)?, field(6..8)?)?
        .and_hms_opt(field(8..10)?, field(10..12)?, field(12..14)?)
}

/// Render a provider timestamp as local date-time text; the raw input is
/// returned unchanged when it cannot be parsed.
pub fn format_timestamp(raw: &str) -> String {
    if raw.is_empty() {
        return UNKNOWN.to_string();
    }
    match parse_timestamp(raw) {
        Some(dt) => dt.format("%Y-%m-%d %H:%M:%S").to_string(),
        None => raw.to_string(),
    }
}

/// Render a driver timestamp as `YYYY/MM/DD`, empty when unparseable
pub fn format_driver_date(raw: &str) -> String {
    parse_timestamp(raw)
        .map(|dt| dt.format("%Y/%m/%d").to_string())
        .unwrap_or_default()
}

/// Time elapsed since a provider timestamp (usually last boot)
pub fn format_uptime(raw: &str) -> String {
    format_uptime_at(raw, Local::now().naive_local())
}

pub fn format_uptime_at(raw: &str, now: NaiveDateTime) -> String {
    if raw.is_empty() {
        return UNKNOWN.to_string();
    }
    let Some(since) = parse_timestamp(raw) else {
        return raw.to_string();
    };

    let elapsed = (now - since).num_seconds().max(0);
    let days = elapsed / 86_400;
    let hours = (elapsed % 86_400) / 3600;
    let minutes = (elapsed % 3600) / 60;
    let seconds = elapsed % 60;

    if days > 0 {
        format!("{}d {}h {}m {}s", days, hours, minutes, seconds)
    } else {
        format!("{}h {}m {}s", hours, minutes, seconds)
    }
}

/// Render a `NaiveDateTime` in the 14-digit provider timestamp encoding
pub fn to_timestamp(dt: NaiveDateTime) -> String {
    dt.format("%Y%m%d%H%M%S").to_string()
}
