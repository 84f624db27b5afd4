use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Command-line interface definition for rMealTicket
/// Canteen meal tracker fed by a biometric terminal
#[derive(Parser)]
#[command(
    name = "rmealticket",
    version = env!("CARGO_PKG_VERSION"),
    about = "Canteen meal tracker: one meal per employee per day, fed by a biometric terminal, with printed tickets",
    long_about = None
)]
pub struct Cli {
    /// Override database path (useful for tests or custom DB)
    #[arg(global = true, long = "db")]
    pub db: Option<String>,

    /// Use this configuration file instead of ~/.rmealticket/rmealticket.conf
    #[arg(global = true, long = "config")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Initialize the configuration file and the database
    Init {
        #[arg(long = "force", help = "Overwrite an existing configuration file")]
        force: bool,
    },

    /// Run the push protocol server the terminal uploads to
    Serve {
        #[arg(long = "bind", help = "Listen address, e.g. 0.0.0.0:8081")]
        bind: Option<String>,

        #[arg(long = "serial", help = "Only accept uploads from this device serial")]
        serial: Option<String>,

        #[arg(long = "printer", help = "Printer target: tcp://host:port or file:///dev/usb/lp0")]
        printer: Option<String>,

        #[arg(long = "no-print", help = "Record meals without printing tickets")]
        no_print: bool,
    },

    /// List recorded meals
    Meals {
        #[arg(long = "today", help = "Meals of the current facility day (default)")]
        today: bool,

        #[arg(long = "date", help = "Meals of a given day (YYYY-MM-DD)", conflicts_with_all = ["today", "all"])]
        date: Option<String>,

        #[arg(long = "all", help = "Every meal ever recorded", conflicts_with = "today")]
        all: bool,

        #[arg(long = "json", help = "Print as JSON")]
        json: bool,
    },

    /// Manage the employee directory
    Employees {
        #[command(subcommand)]
        action: EmployeeAction,
    },

    /// Print the internal log table (migrations, directory changes)
    Log,

    /// Send a sample ticket to the configured printer
    PrintTest {
        #[arg(long = "printer", help = "Printer target overriding the configuration")]
        printer: Option<String>,
    },
}

#[derive(Subcommand)]
pub enum EmployeeAction {
    /// Add an employee, or rename and reactivate an existing one
    Add {
        /// Terminal PIN
        id: i64,
        /// Display name printed on tickets
        name: String,
    },

    /// List all employees
    List {
        #[arg(long = "json", help = "Print as JSON")]
        json: bool,
    },

    /// Allow an employee to take meals again
    Activate { id: i64 },

    /// Stop recording meals for an employee
    Deactivate { id: i64 },
}
