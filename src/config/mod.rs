use crate::errors::{AppError, AppResult};
use crate::printer::PrinterTarget;
use crate::utils::date::parse_offset;
use crate::utils::path::resolve_in;
use chrono::FixedOffset;
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

pub const ENV_BIND: &str = "RMEALTICKET_BIND";
pub const ENV_DEVICE_SERIAL: &str = "RMEALTICKET_DEVICE_SERIAL";
pub const ENV_PRINTER: &str = "RMEALTICKET_PRINTER";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "default_database")]
    pub database: String,
    #[serde(default = "default_bind")]
    pub bind: String,
    /// Serial number the terminal must declare. `None` disables the check.
    #[serde(default)]
    pub device_serial: Option<String>,
    /// Facility UTC offset, used only to compute "today" from the host clock.
    #[serde(default = "default_offset")]
    pub facility_offset: String,
    #[serde(default)]
    pub printer: PrinterConfig,
    #[serde(default)]
    pub receipt: ReceiptConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PrinterConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,
    /// `tcp://host:port` or `file:///dev/usb/lp0`
    #[serde(default = "default_printer_target")]
    pub target: String,
    #[serde(default = "default_printer_timeout")]
    pub timeout_ms: u64,
    #[serde(default = "default_max_in_flight")]
    pub max_in_flight: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReceiptConfig {
    #[serde(default = "default_title")]
    pub title: String,
    #[serde(default = "default_subtitle")]
    pub subtitle: String,
    #[serde(default = "default_footer")]
    pub footer: String,
    /// Characters per line (48 for 80 mm paper, 32 for 58 mm).
    #[serde(default = "default_width")]
    pub width: usize,
}

fn default_database() -> String {
    Config::database_file().to_string_lossy().to_string()
}
fn default_bind() -> String {
    "0.0.0.0:8081".to_string()
}
fn default_offset() -> String {
    "+00:00".to_string()
}
fn default_true() -> bool {
    true
}
fn default_printer_target() -> String {
    "tcp://127.0.0.1:9100".to_string()
}
fn default_printer_timeout() -> u64 {
    5000
}
fn default_max_in_flight() -> usize {
    1
}
fn default_title() -> String {
    "COMEDOR INDUSTRIAL".to_string()
}
fn default_subtitle() -> String {
    "Ticket de Comida".to_string()
}
fn default_footer() -> String {
    "Buen provecho!".to_string()
}
fn default_width() -> usize {
    48
}

impl Default for PrinterConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            target: default_printer_target(),
            timeout_ms: default_printer_timeout(),
            max_in_flight: default_max_in_flight(),
        }
    }
}

impl Default for ReceiptConfig {
    fn default() -> Self {
        Self {
            title: default_title(),
            subtitle: default_subtitle(),
            footer: default_footer(),
            width: default_width(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database: default_database(),
            bind: default_bind(),
            device_serial: None,
            facility_offset: default_offset(),
            printer: PrinterConfig::default(),
            receipt: ReceiptConfig::default(),
        }
    }
}

impl Config {
    /// Standard configuration directory (`~/.rmealticket`).
    pub fn config_dir() -> PathBuf {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".rmealticket")
    }

    /// Full path of the config file
    pub fn config_file() -> PathBuf {
        Self::config_dir().join("rmealticket.conf")
    }

    /// Full path of the SQLite database
    pub fn database_file() -> PathBuf {
        Self::config_dir().join("rmealticket.sqlite")
    }

    /// Load configuration from `path` (or the standard location), falling
    /// back to defaults when the file does not exist.
    pub fn load(path: Option<&Path>) -> AppResult<Self> {
        let path = path.map(Path::to_path_buf).unwrap_or_else(Self::config_file);

        let mut cfg = if path.exists() {
            let content = fs::read_to_string(&path)?;
            let mut cfg: Config = serde_yaml::from_str(&content)?;
            // a relative database path given in the file is relative to it
            if cfg.database != default_database()
                && let Some(dir) = path.parent()
            {
                cfg.database = resolve_in(dir, &cfg.database)
                    .to_string_lossy()
                    .to_string();
            }
            cfg
        } else {
            Config::default()
        };

        cfg.normalize();
        Ok(cfg)
    }

    /// Environment variables win over the file.
    pub fn apply_env_overrides(&mut self) {
        if let Ok(bind) = env::var(ENV_BIND) {
            info!("{ENV_BIND} set, binding to {bind}");
            self.bind = bind;
        }
        if let Ok(serial) = env::var(ENV_DEVICE_SERIAL) {
            info!("{ENV_DEVICE_SERIAL} set, expecting device {serial}");
            self.device_serial = Some(serial);
        }
        if let Ok(target) = env::var(ENV_PRINTER) {
            info!("{ENV_PRINTER} set, printing to {target}");
            self.printer.target = target;
        }
        self.normalize();
    }

    fn normalize(&mut self) {
        if self
            .device_serial
            .as_deref()
            .is_some_and(|s| s.trim().is_empty())
        {
            self.device_serial = None;
        }
    }

    pub fn offset(&self) -> AppResult<FixedOffset> {
        parse_offset(&self.facility_offset)
            .ok_or_else(|| AppError::InvalidOffset(self.facility_offset.clone()))
    }

    pub fn validate(&self) -> AppResult<()> {
        self.offset()?;
        if self.printer.max_in_flight == 0 {
            return Err(AppError::Config(
                "printer.max_in_flight must be at least 1".into(),
            ));
        }
        if self.printer.enabled {
            PrinterTarget::parse(&self.printer.target)?;
        }
        if self.receipt.width < 16 {
            return Err(AppError::Config("receipt.width must be at least 16".into()));
        }
        Ok(())
    }

    pub fn save(&self, path: &Path) -> AppResult<()> {
        if let Some(dir) = path.parent() {
            fs::create_dir_all(dir)?;
        }
        let yaml = serde_yaml::to_string(self)?;
        fs::write(path, yaml)?;
        Ok(())
    }
}
