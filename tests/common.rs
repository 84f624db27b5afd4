#![allow(dead_code)]
use assert_cmd::{Command, cargo_bin_cmd};
use async_trait::async_trait;
use chrono::NaiveDateTime;
use rmealticket::config::ReceiptConfig;
use rmealticket::core::ports::{MealStore, ReceiptPrinter};
use rmealticket::core::{AttendanceEventProcessor, Dispatcher, ReceiptEmitter};
use rmealticket::errors::{AppError, AppResult};
use rmealticket::models::employee::Employee;
use rmealticket::db::pool::DbPool;
use rmealticket::db::queries;
use rmealticket::models::meal::{InsertOutcome, MealRecord, MealWithEmployee};
use rmealticket::printer::Ticket;
use std::collections::HashMap;
use std::env;
use std::fs;
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

pub const DRAIN: Duration = Duration::from_secs(5);

pub fn rmt() -> Command {
    cargo_bin_cmd!("rmealticket")
}

/// Fresh, empty directory under the system temp dir
pub fn setup_test_dir(name: &str) -> PathBuf {
    let mut path: PathBuf = env::temp_dir();
    path.push(format!("{}_rmealticket", name));
    fs::remove_dir_all(&path).ok();
    fs::create_dir_all(&path).expect("create test dir");
    path
}

/// `(config file, database file)` inside a fresh test dir
pub fn setup_test_paths(name: &str) -> (String, String) {
    let dir = setup_test_dir(name);
    let conf = dir.join("rmealticket.conf").to_string_lossy().to_string();
    let db = dir.join("rmealticket.sqlite").to_string_lossy().to_string();
    (conf, db)
}

pub fn ts(s: &str) -> NaiveDateTime {
    NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S%.f").expect("test timestamp")
}

/// Every meal in the database file at `db`, newest first, read on a
/// connection of its own.
pub fn stored_meals(db: &str) -> Vec<MealWithEmployee> {
    let pool = DbPool::new(db).expect("open db");
    queries::list_meals(&pool.conn, None).expect("list meals")
}

pub fn stored_employees(db: &str) -> Vec<Employee> {
    let pool = DbPool::new(db).expect("open db");
    queries::list_employees(&pool.conn).expect("list employees")
}

// ---------------------------------------------------------------------------
// In-memory store
// ---------------------------------------------------------------------------

#[derive(Default)]
pub struct FakeStore {
    employees: Mutex<HashMap<i64, Employee>>,
    meals: Mutex<Vec<MealRecord>>,
    pub fail_reads: AtomicBool,
    /// Fails only `has_meal_between`, leaving the employee lookup working.
    pub fail_guard_reads: AtomicBool,
    pub fail_writes: AtomicBool,
    pub inserts: AtomicUsize,
}

impl FakeStore {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn with_employees(list: &[(i64, &str, bool)]) -> Arc<Self> {
        let store = Self::default();
        {
            let mut emps = store.employees.lock().unwrap();
            for (id, name, active) in list {
                emps.insert(
                    *id,
                    Employee {
                        id: *id,
                        name: name.to_string(),
                        active: *active,
                    },
                );
            }
        }
        Arc::new(store)
    }

    pub fn meals(&self) -> Vec<MealRecord> {
        self.meals.lock().unwrap().clone()
    }

    pub fn meals_for(&self, employee_id: i64) -> Vec<MealRecord> {
        self.meals()
            .into_iter()
            .filter(|m| m.employee_id == employee_id)
            .collect()
    }
}

#[async_trait]
impl MealStore for FakeStore {
    async fn find_employee(&self, id: i64) -> AppResult<Option<Employee>> {
        if self.fail_reads.load(Ordering::SeqCst) {
            return Err(AppError::Other("read failure".into()));
        }
        Ok(self.employees.lock().unwrap().get(&id).cloned())
    }

    async fn has_meal_between(
        &self,
        employee_id: i64,
        start: NaiveDateTime,
        end: NaiveDateTime,
    ) -> AppResult<bool> {
        if self.fail_reads.load(Ordering::SeqCst) || self.fail_guard_reads.load(Ordering::SeqCst) {
            return Err(AppError::Other("read failure".into()));
        }
        Ok(self
            .meals
            .lock()
            .unwrap()
            .iter()
            .any(|m| m.employee_id == employee_id && m.recorded_at >= start && m.recorded_at < end))
    }

    async fn insert_meal(&self, employee_id: i64, at: NaiveDateTime) -> AppResult<InsertOutcome> {
        self.inserts.fetch_add(1, Ordering::SeqCst);
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(AppError::Other("write failure".into()));
        }

        let mut meals = self.meals.lock().unwrap();
        // same rule as the unique constraint on (employee_id, day)
        if meals
            .iter()
            .any(|m| m.employee_id == employee_id && m.day() == at.date())
        {
            return Ok(InsertOutcome::Duplicate);
        }

        let meal = MealRecord {
            id: format!("meal-{}", meals.len() + 1),
            employee_id,
            recorded_at: at,
        };
        meals.push(meal.clone());
        Ok(InsertOutcome::Inserted(meal))
    }
}

// ---------------------------------------------------------------------------
// Recording printer
// ---------------------------------------------------------------------------

pub struct FakePrinter {
    pub connected: AtomicBool,
    pub fail_print: AtomicBool,
    pub attempts: AtomicUsize,
    printed: Mutex<Vec<Ticket>>,
}

impl FakePrinter {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            connected: AtomicBool::new(true),
            fail_print: AtomicBool::new(false),
            attempts: AtomicUsize::new(0),
            printed: Mutex::new(Vec::new()),
        })
    }

    pub fn offline() -> Arc<Self> {
        let p = Self::new();
        p.connected.store(false, Ordering::SeqCst);
        p
    }

    pub fn printed(&self) -> Vec<Ticket> {
        self.printed.lock().unwrap().clone()
    }

    pub fn attempts(&self) -> usize {
        self.attempts.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ReceiptPrinter for FakePrinter {
    async fn is_connected(&self) -> bool {
        self.connected.load(Ordering::SeqCst)
    }

    async fn print(&self, ticket: &Ticket) -> AppResult<()> {
        self.attempts.fetch_add(1, Ordering::SeqCst);
        if self.fail_print.load(Ordering::SeqCst) {
            return Err(AppError::PrinterTimeout(5000));
        }
        self.printed.lock().unwrap().push(ticket.clone());
        Ok(())
    }

    fn describe(&self) -> String {
        "fake://printer".to_string()
    }
}

pub fn processor_with(
    store: Arc<dyn MealStore>,
    printer: Arc<dyn ReceiptPrinter>,
) -> AttendanceEventProcessor {
    let receipts = ReceiptEmitter::new(printer, ReceiptConfig::default(), 1);
    AttendanceEventProcessor::new(store, receipts, Dispatcher::new())
}
