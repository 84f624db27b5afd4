use chrono::NaiveDateTime;
use serde::Serialize;

/// One punch decoded from an ATTLOG line.
///
/// `event_time` is the terminal's wall clock: it carries no offset and is
/// interpreted as facility-local time everywhere in the pipeline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AttendanceEvent {
    pub subject_id: i64,
    pub event_time: NaiveDateTime,
    pub status_code: i32,   // 0 = check-in, 1 = check-out, ... (device defined)
    pub verify_method: i32, // 1 = finger, 15 = face, ... (device defined)
}

impl AttendanceEvent {
    pub fn new(subject_id: i64, event_time: NaiveDateTime) -> Self {
        Self {
            subject_id,
            event_time,
            status_code: 0,
            verify_method: 0,
        }
    }
}
