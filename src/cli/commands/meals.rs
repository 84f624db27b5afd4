use crate::cli::parser::Commands;
use crate::config::Config;
use crate::db::initialize::init_db;
use crate::db::pool::DbPool;
use crate::db::queries::list_meals;
use crate::errors::{AppError, AppResult};
use crate::models::meal::MealWithEmployee;
use crate::ui::messages::{header, info};
use crate::utils::date::{date_window, facility_today, format_db_timestamp, parse_date};
use crate::utils::formatting::{pad_left, truncate_chars};

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Meals {
        today: _,
        date,
        all,
        json,
    } = cmd
    {
        let pool = DbPool::new(&cfg.database)?;
        init_db(&pool.conn)?;

        // --today is the default, so it only matters for readability
        let (label, window) = if *all {
            ("all days".to_string(), None)
        } else {
            let day = match date {
                Some(d) => parse_date(d).ok_or_else(|| AppError::InvalidDate(d.clone()))?,
                None => facility_today(cfg.offset()?),
            };
            (day.to_string(), Some(date_window(day)))
        };

        let meals = list_meals(&pool.conn, window)?;

        if *json {
            println!("{}", serde_json::to_string_pretty(&meals)?);
            return Ok(());
        }

        if meals.is_empty() {
            info(format!("No meals recorded for {}.", label));
            return Ok(());
        }

        header(format!("Meals for {}", label));
        print_meals(&meals);
        println!("Total: {}", meals.len());
    }
    Ok(())
}

fn print_meals(meals: &[MealWithEmployee]) {
    for m in meals {
        let name = m
            .employee
            .as_ref()
            .map(|e| e.name.as_str())
            .unwrap_or("<unknown>");
        println!(
            "{} | {} | {}",
            format_db_timestamp(&m.meal.recorded_at),
            pad_left(&m.meal.employee_id.to_string(), 6),
            truncate_chars(name, 40)
        );
    }
}
