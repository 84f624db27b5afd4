use predicates::prelude::PredicateBooleanExt;
use predicates::str::contains;
use std::fs;

mod common;
use common::{rmt, setup_test_paths, ts};
use rmealticket::db::pool::DbPool;
use rmealticket::db::queries::insert_meal;

/// `rmealticket --config <conf> --db <db> <args>`
fn run_with(conf: &str, db: &str, args: &[&str]) -> assert_cmd::assert::Assert {
    let mut cmd = rmt();
    cmd.args(["--config", conf, "--db", db]).args(args);
    cmd.env_remove("RMEALTICKET_BIND")
        .env_remove("RMEALTICKET_DEVICE_SERIAL")
        .env_remove("RMEALTICKET_PRINTER");
    cmd.assert()
}

fn init(name: &str) -> (String, String) {
    let (conf, db) = setup_test_paths(name);
    run_with(&conf, &db, &["init"])
        .success()
        .stdout(contains("Database initialized"));
    (conf, db)
}

#[test]
fn test_init_creates_config_and_database() {
    let (conf, db) = init("cli_init");

    assert!(fs::metadata(&db).is_ok());
    let yaml = fs::read_to_string(&conf).expect("config written");
    assert!(yaml.contains("0.0.0.0:8081"));
    assert!(yaml.contains("max_in_flight: 1"));

    // a second init keeps the file
    assert!(yaml.contains("device_serial: null"));
    fs::write(
        &conf,
        yaml.replace("device_serial: null", "device_serial: CQZ7232260045"),
    )
    .unwrap();
    run_with(&conf, &db, &["init"])
        .success()
        .stdout(contains("keeping it"));
    assert!(fs::read_to_string(&conf).unwrap().contains("CQZ7232260045"));

    run_with(&conf, &db, &["init", "--force"])
        .success()
        .stdout(contains("Config file:"));
}

#[test]
fn test_minimal_config_file_is_accepted() {
    let (conf, db) = init("cli_minimal_conf");
    fs::write(&conf, "device_serial: CQZ7232260045\n").unwrap();

    run_with(&conf, &db, &["employees", "list"])
        .success()
        .stdout(contains("No employees registered."));
}

#[test]
fn test_employee_directory_lifecycle() {
    let (conf, db) = init("cli_employees");

    run_with(&conf, &db, &["employees", "list"])
        .success()
        .stdout(contains("No employees registered."));

    run_with(&conf, &db, &["employees", "add", "2", "María López"])
        .success()
        .stdout(contains("ok: Employee 2 saved: María López"))
        .stdout(contains("\x1b[").not());
    run_with(&conf, &db, &["employees", "add", "3", "Luis"]).success();

    run_with(&conf, &db, &["employees", "deactivate", "3"])
        .success()
        .stdout(contains("Employee 3 deactivated."));

    run_with(&conf, &db, &["employees", "list"])
        .success()
        .stdout(contains("active   | María López"))
        .stdout(contains("inactive | Luis"));

    run_with(&conf, &db, &["employees", "activate", "3"]).success();
    run_with(&conf, &db, &["employees", "list", "--json"])
        .success()
        .stdout(contains("\"name\": \"Luis\""))
        .stdout(contains("\"active\": false").not());

    run_with(&conf, &db, &["employees", "activate", "99"])
        .failure()
        .stderr(contains("error: Employee 99 not found"));

    run_with(&conf, &db, &["employees", "add", "4", "   "])
        .failure()
        .stderr(contains("Employee name cannot be empty."));
}

#[test]
fn test_meals_listing() {
    let (conf, db) = init("cli_meals");
    run_with(&conf, &db, &["employees", "add", "2", "María López"]).success();
    run_with(&conf, &db, &["employees", "add", "3", "Luis"]).success();

    {
        let pool = DbPool::new(&db).unwrap();
        insert_meal(&pool.conn, 2, &ts("2025-11-23 17:05:30")).unwrap();
        insert_meal(&pool.conn, 3, &ts("2025-11-23 12:00:00")).unwrap();
        insert_meal(&pool.conn, 2, &ts("2025-11-24 12:00:00")).unwrap();
    }

    run_with(&conf, &db, &["meals", "--date", "2025-11-23"])
        .success()
        .stdout(contains("Meals for 2025-11-23"))
        .stdout(contains("2025-11-23 17:05:30"))
        .stdout(contains("María López"))
        .stdout(contains("Luis"))
        .stdout(contains("2025-11-24").not())
        .stdout(contains("Total: 2"));

    run_with(&conf, &db, &["meals", "--all"])
        .success()
        .stdout(contains("Total: 3"));

    run_with(&conf, &db, &["meals", "--date", "2025-11-24", "--json"])
        .success()
        .stdout(contains("\"employee_id\": 2"))
        .stdout(contains("\"recorded_at\": \"2025-11-24T12:00:00\""));

    run_with(&conf, &db, &["meals", "--date", "2025-11-25"])
        .success()
        .stdout(contains("No meals recorded for 2025-11-25."));

    run_with(&conf, &db, &["meals", "--date", "25/11/2025"])
        .failure()
        .stderr(contains("Invalid date format"));
}

#[test]
fn test_log_shows_migrations_and_directory_changes() {
    let (conf, db) = init("cli_log");
    run_with(&conf, &db, &["employees", "add", "2", "Ana"]).success();

    run_with(&conf, &db, &["log"])
        .success()
        .stdout(contains("migration_applied"))
        .stdout(contains("employee_add"))
        .stdout(contains("Added employee Ana"));
}

#[test]
fn test_serve_rejects_bad_settings_before_binding() {
    let (conf, db) = init("cli_serve_bad");

    run_with(&conf, &db, &["serve", "--printer", "COM3"])
        .failure()
        .stderr(contains("Invalid printer target"));

    fs::write(&conf, "database: rmealticket.sqlite\nfacility_offset: \"6\"\n").unwrap();
    run_with(&conf, &db, &["serve", "--no-print"])
        .failure()
        .stderr(contains("Invalid UTC offset"));
}

#[test]
fn test_print_test_reports_offline_printer() {
    let (conf, db) = init("cli_print_test");

    let closed = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = closed.local_addr().unwrap().to_string();
    drop(closed);

    run_with(&conf, &db, &["print-test", "--printer", &format!("tcp://{addr}")])
        .failure()
        .stderr(contains("Printer not connected"));
}
