use crate::errors::{AppError, AppResult};
use crate::models::employee::Employee;
use crate::models::meal::{InsertOutcome, MealRecord, MealWithEmployee};
use crate::utils::date::{format_db_timestamp, parse_db_timestamp};
use chrono::{Local, NaiveDateTime};
use rusqlite::{Connection, ErrorCode, OptionalExtension, Result, Row, params};

fn conversion_error(col: usize, err: AppError) -> rusqlite::Error {
    rusqlite::Error::FromSqlConversionFailure(col, rusqlite::types::Type::Text, Box::new(err))
}

pub fn map_employee(row: &Row) -> Result<Employee> {
    Ok(Employee {
        id: row.get("id")?,
        name: row.get("name")?,
        active: row.get::<_, i32>("active")? == 1,
    })
}

pub fn map_meal(row: &Row) -> Result<MealRecord> {
    let ts: String = row.get("recorded_at")?;
    let recorded_at =
        parse_db_timestamp(&ts).ok_or_else(|| conversion_error(2, AppError::InvalidTimestamp(ts)))?;

    Ok(MealRecord {
        id: row.get("id")?,
        employee_id: row.get("employee_id")?,
        recorded_at,
    })
}

fn map_meal_with_employee(row: &Row) -> Result<MealWithEmployee> {
    let meal = map_meal(row)?;

    // LEFT JOIN: employee columns are NULL when the directory row is gone
    let employee = match row.get::<_, Option<String>>("employee_name")? {
        Some(name) => Some(Employee {
            id: meal.employee_id,
            name,
            active: row.get::<_, Option<i32>>("employee_active")?.unwrap_or(0) == 1,
        }),
        None => None,
    };

    Ok(MealWithEmployee { meal, employee })
}

// ---------------------------------------------------------------------------
// employees
// ---------------------------------------------------------------------------

pub fn find_employee(conn: &Connection, id: i64) -> AppResult<Option<Employee>> {
    let mut stmt = conn.prepare_cached("SELECT id, name, active FROM employees WHERE id = ?1")?;
    Ok(stmt.query_row([id], map_employee).optional()?)
}

pub fn list_employees(conn: &Connection) -> AppResult<Vec<Employee>> {
    let mut stmt = conn.prepare_cached("SELECT id, name, active FROM employees ORDER BY id ASC")?;
    let rows = stmt.query_map([], map_employee)?;

    let mut out = Vec::new();
    for r in rows {
        out.push(r?);
    }
    Ok(out)
}

/// Insert or rename an employee. A re-added employee becomes active again.
pub fn upsert_employee(conn: &Connection, emp: &Employee) -> AppResult<()> {
    conn.execute(
        "INSERT INTO employees (id, name, active) VALUES (?1, ?2, ?3)
         ON CONFLICT(id) DO UPDATE SET name = excluded.name, active = excluded.active",
        params![emp.id, emp.name, if emp.active { 1 } else { 0 }],
    )?;
    Ok(())
}

pub fn set_employee_active(conn: &Connection, id: i64, active: bool) -> AppResult<()> {
    let changed = conn.execute(
        "UPDATE employees SET active = ?1 WHERE id = ?2",
        params![if active { 1 } else { 0 }, id],
    )?;
    if changed == 0 {
        return Err(AppError::EmployeeNotFound(id));
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// meals
// ---------------------------------------------------------------------------

/// Existence check for a meal of `employee_id` in `[start, end)`.
pub fn meal_exists_between(
    conn: &Connection,
    employee_id: i64,
    start: &NaiveDateTime,
    end: &NaiveDateTime,
) -> AppResult<bool> {
    let mut stmt = conn.prepare_cached(
        "SELECT 1 FROM meals_taken
         WHERE employee_id = ?1 AND recorded_at >= ?2 AND recorded_at < ?3
         LIMIT 1",
    )?;
    Ok(stmt.exists(params![
        employee_id,
        format_db_timestamp(start),
        format_db_timestamp(end)
    ])?)
}

fn is_unique_violation(err: &rusqlite::Error) -> bool {
    matches!(
        err,
        rusqlite::Error::SqliteFailure(e, _)
            if e.code == ErrorCode::ConstraintViolation
                && (e.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE
                    || e.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_PRIMARYKEY)
    )
}

/// Insert one meal. The `(employee_id, day)` unique constraint is the real
/// guarantee of one meal per day; hitting it yields `Duplicate`.
pub fn insert_meal(
    conn: &Connection,
    employee_id: i64,
    recorded_at: &NaiveDateTime,
) -> AppResult<InsertOutcome> {
    let meal = MealRecord {
        id: uuid::Uuid::new_v4().to_string(),
        employee_id,
        recorded_at: *recorded_at,
    };

    let res = conn.execute(
        "INSERT INTO meals_taken (id, employee_id, recorded_at, day, created_at)
         VALUES (?1, ?2, ?3, ?4, ?5)",
        params![
            meal.id,
            meal.employee_id,
            format_db_timestamp(&meal.recorded_at),
            meal.day().format("%Y-%m-%d").to_string(),
            Local::now().to_rfc3339(),
        ],
    );

    match res {
        Ok(_) => Ok(InsertOutcome::Inserted(meal)),
        Err(e) if is_unique_violation(&e) => Ok(InsertOutcome::Duplicate),
        Err(e) => Err(e.into()),
    }
}

/// Meals newest first, optionally restricted to `[start, end)`.
pub fn list_meals(
    conn: &Connection,
    window: Option<(NaiveDateTime, NaiveDateTime)>,
) -> AppResult<Vec<MealWithEmployee>> {
    const SELECT: &str = "SELECT m.id, m.employee_id, m.recorded_at,
                e.name AS employee_name, e.active AS employee_active
         FROM meals_taken m
         LEFT JOIN employees e ON e.id = m.employee_id";

    let mut out = Vec::new();

    match window {
        Some((start, end)) => {
            let sql = format!(
                "{SELECT} WHERE m.recorded_at >= ?1 AND m.recorded_at < ?2
                 ORDER BY m.recorded_at DESC"
            );
            let mut stmt = conn.prepare(&sql)?;
            let rows = stmt.query_map(
                params![format_db_timestamp(&start), format_db_timestamp(&end)],
                map_meal_with_employee,
            )?;
            for r in rows {
                out.push(r?);
            }
        }
        None => {
            let sql = format!("{SELECT} ORDER BY m.recorded_at DESC");
            let mut stmt = conn.prepare(&sql)?;
            let rows = stmt.query_map([], map_meal_with_employee)?;
            for r in rows {
                out.push(r?);
            }
        }
    }

    Ok(out)
}
