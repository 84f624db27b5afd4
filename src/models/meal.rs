use super::employee::Employee;
use chrono::{NaiveDate, NaiveDateTime};
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MealRecord {
    pub id: String,                 // ⇔ meals_taken.id (TEXT, uuid v4)
    pub employee_id: i64,           // ⇔ meals_taken.employee_id
    pub recorded_at: NaiveDateTime, // ⇔ meals_taken.recorded_at ("YYYY-MM-DD HH:MM:SS")
}

impl MealRecord {
    /// Calendar day the record counts against.
    pub fn day(&self) -> NaiveDate {
        self.recorded_at.date()
    }
}

/// A meal joined with the employee that took it, used by listings.
/// `employee` is `None` only if the directory row has since been removed.
#[derive(Debug, Clone, Serialize)]
pub struct MealWithEmployee {
    #[serde(flatten)]
    pub meal: MealRecord,
    pub employee: Option<Employee>,
}

/// Result of an insert against the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InsertOutcome {
    Inserted(MealRecord),
    /// The `(employee_id, day)` uniqueness constraint rejected the row.
    Duplicate,
}
