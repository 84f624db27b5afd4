use crate::cli::parser::EmployeeAction;
use crate::config::Config;
use crate::db::initialize::init_db;
use crate::db::log::write_log;
use crate::db::pool::DbPool;
use crate::db::queries::{list_employees, set_employee_active, upsert_employee};
use crate::errors::AppResult;
use crate::models::employee::Employee;
use crate::ui::messages::{info, success, warning};
use crate::utils::formatting::pad_left;

pub fn handle(action: &EmployeeAction, cfg: &Config) -> AppResult<()> {
    let pool = DbPool::new(&cfg.database)?;
    init_db(&pool.conn)?;
    let conn = &pool.conn;

    match action {
        EmployeeAction::Add { id, name } => {
            let name = name.trim();
            if name.is_empty() {
                return Err(crate::errors::AppError::Other(
                    "Employee name cannot be empty.".into(),
                ));
            }
            upsert_employee(conn, &Employee::new(*id, name))?;
            audit(&pool, "employee_add", *id, &format!("Added employee {name}"));
            success(format!("Employee {} saved: {}", id, name));
        }
        EmployeeAction::List { json } => {
            let employees = list_employees(conn)?;
            if *json {
                println!("{}", serde_json::to_string_pretty(&employees)?);
            } else if employees.is_empty() {
                info("No employees registered.");
            } else {
                for e in &employees {
                    println!(
                        "{} | {:<8} | {}",
                        pad_left(&e.id.to_string(), 6),
                        e.status_str(),
                        e.name
                    );
                }
            }
        }
        EmployeeAction::Activate { id } => {
            set_employee_active(conn, *id, true)?;
            audit(&pool, "employee_activate", *id, "Employee activated");
            success(format!("Employee {} activated.", id));
        }
        EmployeeAction::Deactivate { id } => {
            set_employee_active(conn, *id, false)?;
            audit(&pool, "employee_deactivate", *id, "Employee deactivated");
            success(format!("Employee {} deactivated.", id));
        }
    }

    Ok(())
}

fn audit(pool: &DbPool, operation: &str, id: i64, message: &str) {
    if let Err(e) = write_log(&pool.conn, operation, &id.to_string(), message) {
        warning(format!("Failed to write internal log: {}", e));
    }
}
