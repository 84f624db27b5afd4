//! Thermal printer reachable over raw TCP (port 9100) or a device file.

use super::escpos;
use super::ticket::Ticket;
use crate::core::ports::ReceiptPrinter;
use crate::errors::{AppError, AppResult};
use async_trait::async_trait;
use std::path::PathBuf;
use std::time::Duration;
use tokio::io::AsyncWriteExt;
use tokio::net::TcpStream;
use tokio::time::timeout;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PrinterTarget {
    /// `host:port`
    Tcp(String),
    /// e.g. `/dev/usb/lp0`
    File(PathBuf),
}

impl PrinterTarget {
    /// Accepts `tcp://host:port`, `file:///dev/usb/lp0`, a bare absolute
    /// path, or a bare `host:port`.
    pub fn parse(s: &str) -> AppResult<Self> {
        let s = s.trim();
        if let Some(addr) = s.strip_prefix("tcp://") {
            return Self::tcp(addr, s);
        }
        if let Some(path) = s.strip_prefix("file://") {
            return Self::file(path, s);
        }
        if s.starts_with('/') {
            return Self::file(s, s);
        }
        Self::tcp(s, s)
    }

    fn tcp(addr: &str, raw: &str) -> AppResult<Self> {
        let valid = addr
            .rsplit_once(':')
            .is_some_and(|(host, port)| !host.is_empty() && port.parse::<u16>().is_ok());
        if valid {
            Ok(Self::Tcp(addr.to_string()))
        } else {
            Err(AppError::InvalidPrinterTarget(raw.to_string()))
        }
    }

    fn file(path: &str, raw: &str) -> AppResult<Self> {
        if path.is_empty() {
            return Err(AppError::InvalidPrinterTarget(raw.to_string()));
        }
        Ok(Self::File(PathBuf::from(path)))
    }
}

impl std::fmt::Display for PrinterTarget {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PrinterTarget::Tcp(addr) => write!(f, "tcp://{addr}"),
            PrinterTarget::File(path) => write!(f, "file://{}", path.display()),
        }
    }
}

pub struct NetworkPrinter {
    target: PrinterTarget,
    timeout: Duration,
}

impl NetworkPrinter {
    pub fn new(target: PrinterTarget, timeout: Duration) -> Self {
        Self { target, timeout }
    }

    pub fn target(&self) -> &PrinterTarget {
        &self.target
    }

    fn timeout_ms(&self) -> u64 {
        self.timeout.as_millis() as u64
    }

    async fn send(&self, bytes: &[u8]) -> AppResult<()> {
        match &self.target {
            PrinterTarget::Tcp(addr) => {
                let mut stream = TcpStream::connect(addr).await?;
                stream.write_all(bytes).await?;
                stream.flush().await?;
                stream.shutdown().await?;
            }
            PrinterTarget::File(path) => {
                let mut file = tokio::fs::OpenOptions::new()
                    .write(true)
                    .append(true)
                    .open(path)
                    .await?;
                file.write_all(bytes).await?;
                file.flush().await?;
            }
        }
        Ok(())
    }
}

#[async_trait]
impl ReceiptPrinter for NetworkPrinter {
    async fn is_connected(&self) -> bool {
        match &self.target {
            PrinterTarget::Tcp(addr) => matches!(
                timeout(self.timeout, TcpStream::connect(addr.as_str())).await,
                Ok(Ok(_))
            ),
            PrinterTarget::File(path) => tokio::fs::metadata(path).await.is_ok(),
        }
    }

    async fn print(&self, ticket: &Ticket) -> AppResult<()> {
        let bytes = escpos::encode(ticket);
        timeout(self.timeout, self.send(&bytes))
            .await
            .map_err(|_| AppError::PrinterTimeout(self.timeout_ms()))?
    }

    fn describe(&self) -> String {
        self.target.to_string()
    }
}
