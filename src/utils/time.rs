use chrono::{DateTime, Local, SecondsFormat, Utc};

/// ISO-8601 in UTC with millisecond precision, e.g. `2024-01-08T05:00:00.000Z`.
pub fn iso_timestamp(time: &DateTime<Utc>) -> String {
    time.to_rfc3339_opts(SecondsFormat::Millis, true)
}

pub fn current_human_timestamp() -> String {
    Local::now().format("%Y-%m-%d %H:%M").to_string()
}
