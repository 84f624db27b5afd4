//! Date utilities: terminal timestamp parsing, calendar-day windows and the
//! facility clock.
//!
//! Every timestamp handled by the service is a naive facility-local value.
//! The only place an offset is applied is `facility_now`, which turns the
//! host's UTC clock into facility wall-clock time.

use chrono::{Days, FixedOffset, NaiveDate, NaiveDateTime, Utc};

/// Shapes the terminal (or a hand-written test payload) may send.
const DEVICE_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M",
    "%Y/%m/%d %H:%M:%S",
];

/// Storage format for `meals_taken.recorded_at`. Sub-second digits are kept
/// only when present; `.` sorts below any digit, so text order is time order.
pub const DB_TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.f";

pub fn parse_device_timestamp(s: &str) -> Option<NaiveDateTime> {
    let s = s.trim();
    if s.is_empty() {
        return None;
    }
    DEVICE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(s, fmt).ok())
}

/// Half-open window `[start of day, start of next day)` containing `at`.
pub fn day_window(at: NaiveDateTime) -> (NaiveDateTime, NaiveDateTime) {
    let day = at.date();
    (start_of(day), start_of_next(day))
}

/// Same window, keyed by date rather than by an instant inside it.
pub fn date_window(day: NaiveDate) -> (NaiveDateTime, NaiveDateTime) {
    (start_of(day), start_of_next(day))
}

fn start_of(day: NaiveDate) -> NaiveDateTime {
    day.and_time(chrono::NaiveTime::MIN)
}

fn start_of_next(day: NaiveDate) -> NaiveDateTime {
    // NaiveDate::MAX has no successor; saturate so the window stays non-empty.
    day.checked_add_days(Days::new(1))
        .map(start_of)
        .unwrap_or(NaiveDateTime::MAX)
}

pub fn format_db_timestamp(at: &NaiveDateTime) -> String {
    at.format(DB_TIMESTAMP_FORMAT).to_string()
}

pub fn parse_db_timestamp(s: &str) -> Option<NaiveDateTime> {
    NaiveDateTime::parse_from_str(s, DB_TIMESTAMP_FORMAT).ok()
}

/// Parse "+HH:MM" / "-HH:MM" / "Z" into a fixed offset.
pub fn parse_offset(s: &str) -> Option<FixedOffset> {
    let s = s.trim();
    if s.eq_ignore_ascii_case("z") || s.eq_ignore_ascii_case("utc") {
        return FixedOffset::east_opt(0);
    }

    let (sign, rest) = match s.as_bytes().first()? {
        b'+' => (1, &s[1..]),
        b'-' => (-1, &s[1..]),
        _ => return None,
    };

    let (h, m) = rest.split_once(':').unwrap_or((rest, "0"));
    let hours: i32 = h.parse().ok()?;
    let minutes: i32 = m.parse().ok()?;
    if hours > 23 || minutes > 59 {
        return None;
    }

    FixedOffset::east_opt(sign * (hours * 3600 + minutes * 60))
}

/// Current facility wall-clock time.
pub fn facility_now(offset: FixedOffset) -> NaiveDateTime {
    Utc::now().with_timezone(&offset).naive_local()
}

pub fn facility_today(offset: FixedOffset) -> NaiveDate {
    facility_now(offset).date()
}

pub fn parse_date(s: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").ok()
}
