//! Push protocol payload decoding.
//!
//! An ATTLOG upload is one punch per line, tab separated:
//! `PIN \t YYYY-MM-DD HH:MM:SS \t status \t verify \t workcode ...`

use crate::models::attendance::AttendanceEvent;
use crate::utils::date::parse_device_timestamp;
use tracing::warn;

/// The `table` query parameter of a data upload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PushTable {
    AttLog,
    OperLog,
    Unknown(String),
}

impl PushTable {
    pub fn from_param(table: Option<&str>) -> Self {
        match table {
            Some("ATTLOG") => PushTable::AttLog,
            Some("OPERLOG") => PushTable::OperLog,
            Some(other) => PushTable::Unknown(other.to_string()),
            None => PushTable::Unknown(String::new()),
        }
    }
}

/// Events decoded from one upload body plus the lines that were dropped.
#[derive(Debug, Default)]
pub struct ParsedBatch {
    pub events: Vec<AttendanceEvent>,
    pub rejected: Vec<String>,
}

/// Decode a single ATTLOG record. Returns `None` for anything that does not
/// carry a numeric PIN and a readable timestamp.
pub fn parse_attlog_line(line: &str) -> Option<AttendanceEvent> {
    let mut fields = line.trim().split('\t').map(str::trim);

    let subject_id = fields.next()?.parse::<i64>().ok()?;
    let event_time = parse_device_timestamp(fields.next()?)?;
    let status_code = numeric_or_zero(fields.next());
    let verify_method = numeric_or_zero(fields.next());

    Some(AttendanceEvent {
        subject_id,
        event_time,
        status_code,
        verify_method,
    })
}

fn numeric_or_zero(field: Option<&str>) -> i32 {
    field.and_then(|f| f.parse().ok()).unwrap_or(0)
}

/// Split an upload body into records. Blank lines are skipped silently,
/// unreadable ones are logged and collected; neither stops the batch.
pub fn parse_attlog_body(body: &str) -> ParsedBatch {
    let mut batch = ParsedBatch::default();

    for line in body.split('\n') {
        if line.trim().is_empty() {
            continue;
        }

        match parse_attlog_line(line) {
            Some(event) => batch.events.push(event),
            None => {
                let line = line.trim_end_matches('\r');
                warn!(line = %line.escape_debug(), "failed to parse ATTLOG line");
                batch.rejected.push(line.to_string());
            }
        }
    }

    batch
}
