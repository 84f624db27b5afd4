use crate::cli::parser::Cli;
use crate::config::Config;
use crate::db::initialize::init_db;
use crate::db::log;
use crate::db::pool::DbPool;
use crate::errors::AppResult;
use crate::ui::messages::{info, success, warning};
use std::fs;
use std::path::Path;

/// Handle the `init` command
///
/// This initializes:
///  - the config directory (if missing)
///  - the configuration file (kept unless `--force`)
///  - the SQLite database and all pending migrations
pub fn handle(cli: &Cli, cfg: &Config, force: bool) -> AppResult<()> {
    let path = cli.config.clone().unwrap_or_else(Config::config_file);

    if path.exists() && !force {
        info(format!(
            "Config file already exists, keeping it: {}",
            path.display()
        ));
    } else {
        cfg.save(&path)?;
        success(format!("Config file: {}", path.display()));
    }

    if let Some(dir) = Path::new(&cfg.database).parent()
        && !dir.as_os_str().is_empty()
    {
        fs::create_dir_all(dir)?;
    }

    let pool = DbPool::new(&cfg.database)?;
    init_db(&pool.conn)?;
    success(format!("Database initialized at {}", &cfg.database));

    // internal log is informative only
    if let Err(e) = log::write_log(
        &pool.conn,
        "init",
        "Database initialized",
        &format!("Database initialized at {}", &cfg.database),
    ) {
        warning(format!("Failed to write internal log: {}", e));
    }

    Ok(())
}
