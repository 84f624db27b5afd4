//! Subject resolution and the meal insert.

use crate::core::ports::MealStore;
use crate::models::employee::Employee;
use crate::models::meal::{InsertOutcome, MealRecord};
use chrono::NaiveDateTime;
use std::sync::Arc;
use tracing::{error, info};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubjectStatus {
    Active(Employee),
    Inactive(Employee),
    NotFound,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecordOutcome {
    Recorded(MealRecord),
    /// Another delivery won the race to the unique constraint.
    AlreadyRecorded,
    Failed,
}

#[derive(Clone)]
pub struct MealRecorder {
    store: Arc<dyn MealStore>,
}

impl MealRecorder {
    pub fn new(store: Arc<dyn MealStore>) -> Self {
        Self { store }
    }

    /// Look up the employee behind a PIN. A failed read counts as not found.
    pub async fn resolve_subject(&self, subject_id: i64) -> SubjectStatus {
        match self.store.find_employee(subject_id).await {
            Ok(Some(emp)) if emp.active => SubjectStatus::Active(emp),
            Ok(Some(emp)) => SubjectStatus::Inactive(emp),
            Ok(None) => SubjectStatus::NotFound,
            Err(e) => {
                error!(subject_id, error = %e, "employee lookup failed");
                SubjectStatus::NotFound
            }
        }
    }

    pub async fn record(&self, subject_id: i64, event_time: NaiveDateTime) -> RecordOutcome {
        match self.store.insert_meal(subject_id, event_time).await {
            Ok(InsertOutcome::Inserted(meal)) => RecordOutcome::Recorded(meal),
            Ok(InsertOutcome::Duplicate) => {
                info!(subject_id, %event_time, "meal already recorded for that day");
                RecordOutcome::AlreadyRecorded
            }
            Err(e) => {
                error!(subject_id, %event_time, error = %e, "failed to insert meal");
                RecordOutcome::Failed
            }
        }
    }
}
