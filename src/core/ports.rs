//! Seams between the ingestion pipeline and its collaborators.
//!
//! The processor only talks to these traits, so the SQLite store and the
//! ESC/POS printer can be swapped for fakes in tests.

use crate::errors::AppResult;
use crate::models::employee::Employee;
use crate::models::meal::InsertOutcome;
use crate::printer::ticket::Ticket;
use async_trait::async_trait;
use chrono::NaiveDateTime;

#[async_trait]
pub trait MealStore: Send + Sync {
    async fn find_employee(&self, id: i64) -> AppResult<Option<Employee>>;

    /// Whether `employee_id` has a meal in `[start, end)`.
    async fn has_meal_between(
        &self,
        employee_id: i64,
        start: NaiveDateTime,
        end: NaiveDateTime,
    ) -> AppResult<bool>;

    /// Must map a violation of the `(employee, day)` uniqueness constraint
    /// to `InsertOutcome::Duplicate`.
    async fn insert_meal(&self, employee_id: i64, at: NaiveDateTime) -> AppResult<InsertOutcome>;
}

#[async_trait]
pub trait ReceiptPrinter: Send + Sync {
    /// Cheap reachability check, run before each print.
    async fn is_connected(&self) -> bool;

    /// Encode and send the ticket, flushing within the printer's timeout.
    async fn print(&self, ticket: &Ticket) -> AppResult<()>;

    /// Human readable target, for logs.
    fn describe(&self) -> String;
}
