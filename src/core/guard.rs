//! Same-day duplicate pre-check.
//!
//! This is an optimisation that saves a write and a ticket for terminal
//! retries. The unique constraint on `(employee_id, day)` is what actually keeps
//! the store at one meal per day.

use crate::core::ports::MealStore;
use crate::utils::date::day_window;
use chrono::NaiveDateTime;
use std::sync::Arc;
use tracing::error;

#[derive(Clone)]
pub struct IdempotencyGuard {
    store: Arc<dyn MealStore>,
}

impl IdempotencyGuard {
    pub fn new(store: Arc<dyn MealStore>) -> Self {
        Self { store }
    }

    /// Whether `subject_id` already has a meal on the calendar day of
    /// `event_time` (the event's own day, not today's).
    ///
    /// A failed read answers `false`: ingestion keeps flowing and the unique
    /// index still rejects a real duplicate at insert time.
    pub async fn already_recorded(&self, subject_id: i64, event_time: NaiveDateTime) -> bool {
        let (start, end) = day_window(event_time);
        match self.store.has_meal_between(subject_id, start, end).await {
            Ok(found) => found,
            Err(e) => {
                error!(subject_id, error = %e, "meal lookup failed, assuming no meal today");
                false
            }
        }
    }
}
