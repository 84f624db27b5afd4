//! Formatting utilities used for CLI listings and printed tickets.

use chrono::NaiveDateTime;

pub fn pad_left(s: &str, width: usize) -> String {
    format!("{:>width$}", s, width = width)
}

/// Ticket date, DD/MM/YYYY.
pub fn ticket_date(at: &NaiveDateTime) -> String {
    at.format("%d/%m/%Y").to_string()
}

/// Ticket time, HH:MM:SS.
pub fn ticket_time(at: &NaiveDateTime) -> String {
    at.format("%H:%M:%S").to_string()
}

/// Truncate to `max` characters (not bytes), for fixed-width columns.
pub fn truncate_chars(s: &str, max: usize) -> String {
    s.chars().take(max).collect()
}
