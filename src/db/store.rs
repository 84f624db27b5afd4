//! `MealStore` backed by the SQLite database.
//!
//! rusqlite is blocking, so every call hops onto the blocking pool and locks
//! the single shared connection there.

use crate::core::ports::MealStore;
use crate::db::pool::DbPool;
use crate::db::queries;
use crate::errors::{AppError, AppResult};
use crate::models::employee::Employee;
use crate::models::meal::InsertOutcome;
use async_trait::async_trait;
use chrono::NaiveDateTime;
use rusqlite::Connection;
use std::sync::{Arc, Mutex};

#[derive(Clone)]
pub struct SqliteStore {
    pool: Arc<Mutex<DbPool>>,
}

impl SqliteStore {
    pub fn new(pool: DbPool) -> Self {
        Self {
            pool: Arc::new(Mutex::new(pool)),
        }
    }

    pub fn open(path: &str) -> AppResult<Self> {
        let pool = DbPool::new(path)?;
        crate::db::initialize::init_db(&pool.conn)?;
        Ok(Self::new(pool))
    }

    async fn run<F, T>(&self, func: F) -> AppResult<T>
    where
        F: FnOnce(&Connection) -> AppResult<T> + Send + 'static,
        T: Send + 'static,
    {
        let pool = Arc::clone(&self.pool);
        tokio::task::spawn_blocking(move || {
            let guard = pool
                .lock()
                .map_err(|_| AppError::Other("database mutex poisoned".into()))?;
            func(&guard.conn)
        })
        .await?
    }

    pub async fn upsert_employee(&self, emp: Employee) -> AppResult<()> {
        self.run(move |conn| queries::upsert_employee(conn, &emp)).await
    }

    pub async fn set_employee_active(&self, id: i64, active: bool) -> AppResult<()> {
        self.run(move |conn| queries::set_employee_active(conn, id, active))
            .await
    }
}

#[async_trait]
impl MealStore for SqliteStore {
    async fn find_employee(&self, id: i64) -> AppResult<Option<Employee>> {
        self.run(move |conn| queries::find_employee(conn, id)).await
    }

    async fn has_meal_between(
        &self,
        employee_id: i64,
        start: NaiveDateTime,
        end: NaiveDateTime,
    ) -> AppResult<bool> {
        self.run(move |conn| queries::meal_exists_between(conn, employee_id, &start, &end))
            .await
    }

    async fn insert_meal(&self, employee_id: i64, at: NaiveDateTime) -> AppResult<InsertOutcome> {
        self.run(move |conn| queries::insert_meal(conn, employee_id, &at))
            .await
    }
}
