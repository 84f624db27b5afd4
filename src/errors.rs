//! Unified application error type.
//! All modules (db, core, printer, server, cli) return AppError to keep the
//! error handling consistent. The ingestion pipeline never lets one of these
//! reach the HTTP response: it is logged and the event is dropped.

use std::io;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    // ---------------------------
    // IO
    // ---------------------------
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    // ---------------------------
    // Database-related
    // ---------------------------
    #[error("Database error: {0}")]
    Db(#[from] rusqlite::Error),

    // ---------------------------
    // Parsing errors
    // ---------------------------
    #[error("Invalid date format: {0}")]
    InvalidDate(String),

    #[error("Invalid timestamp: {0}")]
    InvalidTimestamp(String),

    #[error("Invalid UTC offset: {0}")]
    InvalidOffset(String),

    // ---------------------------
    // Domain errors
    // ---------------------------
    #[error("Employee {0} not found")]
    EmployeeNotFound(i64),

    // ---------------------------
    // Printer errors
    // ---------------------------
    #[error("Printer not connected: {0}")]
    PrinterOffline(String),

    #[error("Printer timed out after {0} ms")]
    PrinterTimeout(u64),

    #[error("Invalid printer target: {0}")]
    InvalidPrinterTarget(String),

    // ---------------------------
    // Config errors
    // ---------------------------
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Failed to parse configuration: {0}")]
    ConfigParse(#[from] serde_yaml::Error),

    // ---------------------------
    // Runtime errors
    // ---------------------------
    #[error("Background task failed: {0}")]
    Task(#[from] tokio::task::JoinError),

    #[error("Serialization error: {0}")]
    Json(#[from] serde_json::Error),

    // ---------------------------
    // Generic fallback
    // ---------------------------
    #[error("Internal error: {0}")]
    Other(String),
}

pub type AppResult<T> = Result<T, AppError>;
