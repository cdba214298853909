use chrono::{DateTime, Duration, NaiveDate, NaiveDateTime, Utc};

// Formats accepted for timestamps with a time part, besides RFC 3339 and unix
// seconds.
const DATE_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S",
    "%Y/%m/%d %H:%M:%S", // Seen in some nginx logs
];

const DAY_FORMAT: &str = "%Y-%m-%d";

/// Parses a timestamp in any of the supported formats, as UTC.
pub fn parse_timestamp(s: &str) -> Option<DateTime<Utc>> {
    let s = s.trim();
    if s.is_empty() {
        return None;
    }
    if looks_like_unix_seconds(s) {
        let secs = match s.find('.') {
            Some(dot) => &s[..dot],
            None => s,
        };
        return secs
            .parse::<i64>()
            .ok()
            .and_then(|secs| DateTime::from_timestamp(secs, 0));
    }
    if let Ok(date_time) = DateTime::parse_from_rfc3339(s) {
        return Some(date_time.with_timezone(&Utc));
    }
    for format in DATE_FORMATS.iter() {
        if let Ok(naive) = NaiveDateTime::parse_from_str(s, format) {
            return Some(naive.and_utc());
        }
    }
    NaiveDate::parse_from_str(s, DAY_FORMAT)
        .ok()
        .and_then(start_of_day)
}

// Unix timestamps of arbitrary precision.  Years alone ("2021") are not
// timestamps.
fn looks_like_unix_seconds(s: &str) -> bool {
    let integer = match s.find('.') {
        Some(dot) => {
            let fraction = &s[dot + 1..];
            if fraction.is_empty() || !fraction.bytes().all(|c| c.is_ascii_digit()) {
                return false;
            }
            &s[..dot]
        }
        None => s,
    };
    integer.len() > 4 && integer.bytes().all(|c| c.is_ascii_digit())
}

fn start_of_day(date: NaiveDate) -> Option<DateTime<Utc>> {
    date.and_hms_opt(0, 0, 0).map(|naive| naive.and_utc())
}

fn end_of_day(date: NaiveDate) -> Option<DateTime<Utc>> {
    date.and_hms_opt(23, 59, 59).map(|naive| naive.and_utc())
}

// A day, or a duration meaning "that long before now".
fn parse_bound<F>(s: &str, now: DateTime<Utc>, from_day: F) -> Option<DateTime<Utc>>
where
    F: Fn(NaiveDate) -> Option<DateTime<Utc>>,
{
    if let Ok(date) = NaiveDate::parse_from_str(s, DAY_FORMAT) {
        return from_day(date);
    }
    let elapsed = humantime::parse_duration(s).ok()?;
    let elapsed = Duration::from_std(elapsed).ok()?;
    now.checked_sub_signed(elapsed)
}

/// Start of the date range.  Missing or unparseable values mean the unix
/// epoch.
pub fn parse_since(value: Option<&str>, now: DateTime<Utc>) -> DateTime<Utc> {
    let value = value.map(str::trim).unwrap_or_default();
    if value.is_empty() {
        return DateTime::<Utc>::default();
    }
    match parse_bound(value, now, start_of_day) {
        Some(since) => since,
        None => {
            warn!("Ignoring unparseable start date '{}'", value);
            DateTime::<Utc>::default()
        }
    }
}

/// End of the date range (days are included whole).  Missing or unparseable
/// values mean `now`.
pub fn parse_to(value: Option<&str>, now: DateTime<Utc>) -> DateTime<Utc> {
    let value = value.map(str::trim).unwrap_or_default();
    if value.is_empty() {
        return now;
    }
    match parse_bound(value, now, end_of_day) {
        Some(to) => to,
        None => {
            warn!("Ignoring unparseable end date '{}'", value);
            now
        }
    }
}
