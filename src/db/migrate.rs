use rusqlite::{Connection, OptionalExtension, Result};
use tracing::info;

/// Ordered schema steps. Each one runs at most once; applied steps are
/// recorded in the `log` table as `migration_applied`.
const MIGRATIONS: &[(&str, &str, &str)] = &[
    (
        "20251123_0001_create_employees",
        "Created employees table",
        r#"
        CREATE TABLE IF NOT EXISTS employees (
            id      INTEGER PRIMARY KEY,
            name    TEXT NOT NULL,
            active  INTEGER NOT NULL DEFAULT 1 CHECK(active IN (0, 1))
        );
        "#,
    ),
    (
        "20251123_0002_create_meals_taken",
        "Created meals_taken table",
        r#"
        CREATE TABLE IF NOT EXISTS meals_taken (
            id           TEXT PRIMARY KEY,
            employee_id  INTEGER NOT NULL REFERENCES employees(id),
            recorded_at  TEXT NOT NULL,
            day          TEXT NOT NULL,
            created_at   TEXT NOT NULL,
            UNIQUE(employee_id, day)
        );

        CREATE INDEX IF NOT EXISTS idx_meals_recorded_at ON meals_taken(recorded_at);
        "#,
    ),
];

/// Ensure that the `log` table exists. It doubles as the migration ledger.
fn ensure_log_table(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS log (
            id        INTEGER PRIMARY KEY AUTOINCREMENT,
            date      TEXT NOT NULL,
            operation TEXT NOT NULL,
            target    TEXT DEFAULT '',
            message   TEXT NOT NULL
        );
        "#,
    )?;
    Ok(())
}

fn is_applied(conn: &Connection, version: &str) -> Result<bool> {
    let mut chk = conn.prepare(
        "SELECT 1 FROM log
         WHERE operation = 'migration_applied' AND target = ?1
         LIMIT 1",
    )?;
    Ok(chk.query_row([version], |_| Ok(())).optional()?.is_some())
}

fn apply(conn: &Connection, version: &str, message: &str, sql: &str) -> Result<()> {
    // schema change and its ledger entry land together or not at all
    let tx = conn.unchecked_transaction()?;
    tx.execute_batch(sql)?;
    tx.execute(
        "INSERT INTO log (date, operation, target, message)
         VALUES (datetime('now'), 'migration_applied', ?1, ?2)",
        [version, message],
    )?;
    tx.commit()?;

    info!(version, "migration applied: {message}");
    Ok(())
}

/// Public entry point: run all pending migrations.
///
/// Invoked by db::initialize::init_db().
pub fn run_pending_migrations(conn: &Connection) -> Result<usize> {
    ensure_log_table(conn)?;

    let mut applied = 0;
    for (version, message, sql) in MIGRATIONS {
        if is_applied(conn, version)? {
            continue;
        }
        apply(conn, version, message, sql)?;
        applied += 1;
    }

    Ok(applied)
}
