use crate::config::Config;
use crate::db::initialize::init_db;
use crate::db::log::load_log;
use crate::db::pool::DbPool;
use crate::errors::AppResult;
use crate::ui::messages::info;

pub fn handle(cfg: &Config) -> AppResult<()> {
    let pool = DbPool::new(&cfg.database)?;
    init_db(&pool.conn)?;

    let entries = load_log(&pool.conn)?;
    if entries.is_empty() {
        info("Internal log is empty.");
        return Ok(());
    }

    let op_w = entries
        .iter()
        .map(|e| e.operation.len())
        .max()
        .unwrap_or(10)
        .min(30);

    for e in entries {
        let target = if e.target.is_empty() {
            String::new()
        } else {
            format!(" ({})", e.target)
        };
        println!(
            "{:>4} | {} | {:<op_w$} | {}{}",
            e.id,
            e.date,
            e.operation,
            e.message,
            target,
            op_w = op_w
        );
    }

    Ok(())
}
