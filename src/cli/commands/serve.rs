use crate::cli::parser::Commands;
use crate::config::Config;
use crate::core::{AttendanceEventProcessor, DeviceGate, Dispatcher, ReceiptEmitter};
use crate::db::SqliteStore;
use crate::errors::AppResult;
use crate::printer::{NetworkPrinter, PrinterTarget};
use crate::server::{self, AppState};
use std::fs;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tracing::{info, warn};

/// How long shutdown waits for dispatched events and tickets to finish.
const DRAIN_TIMEOUT: Duration = Duration::from_secs(10);

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Serve {
        bind,
        serial,
        printer,
        no_print,
    } = cmd
    {
        let mut cfg = cfg.clone();
        cfg.apply_env_overrides();

        // command line wins over environment and file
        if let Some(b) = bind {
            cfg.bind = b.clone();
        }
        if let Some(s) = serial {
            cfg.device_serial = Some(s.clone());
        }
        if let Some(p) = printer {
            cfg.printer.target = p.clone();
        }
        if *no_print {
            cfg.printer.enabled = false;
        }
        cfg.validate()?;

        let runtime = tokio::runtime::Runtime::new()?;
        runtime.block_on(run(cfg))?;
    }
    Ok(())
}

/// Ticket emitter as configured: a real printer, or a logging no-op.
pub fn build_emitter(cfg: &Config) -> AppResult<ReceiptEmitter> {
    if !cfg.printer.enabled {
        return Ok(ReceiptEmitter::disabled(cfg.receipt.clone()));
    }

    let target = PrinterTarget::parse(&cfg.printer.target)?;
    let printer = NetworkPrinter::new(target, Duration::from_millis(cfg.printer.timeout_ms));
    Ok(ReceiptEmitter::new(
        Arc::new(printer),
        cfg.receipt.clone(),
        cfg.printer.max_in_flight,
    ))
}

async fn run(cfg: Config) -> AppResult<()> {
    server::init_tracing("info");

    if let Some(dir) = Path::new(&cfg.database).parent()
        && !dir.as_os_str().is_empty()
    {
        fs::create_dir_all(dir)?;
    }
    let store = Arc::new(SqliteStore::open(&cfg.database)?);
    info!(database = %cfg.database, "store ready");

    let receipts = build_emitter(&cfg)?;
    if cfg.printer.enabled {
        info!(printer = %cfg.printer.target, "ticket printing enabled");
    } else {
        warn!("ticket printing disabled");
    }

    let gate = DeviceGate::new(cfg.device_serial.clone());
    if gate.is_open() {
        warn!("no device serial configured, accepting uploads from any device");
    }

    let dispatcher = Dispatcher::new();
    let processor = AttendanceEventProcessor::new(store, receipts, dispatcher.clone());

    let listener = TcpListener::bind(&cfg.bind).await?;
    server::serve(
        listener,
        AppState::new(gate, processor),
        server::shutdown_signal(),
    )
    .await?;

    if !dispatcher.wait_idle(DRAIN_TIMEOUT).await {
        warn!(
            in_flight = dispatcher.in_flight(),
            "shutting down with event work still in flight"
        );
    }

    info!("Server stopped");
    Ok(())
}
