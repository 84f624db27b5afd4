//! Receipt printing: layout (`ticket`), wire encoding (`escpos`) and the
//! transport to the physical device (`network`).

pub mod escpos;
pub mod network;
pub mod ticket;

pub use network::{NetworkPrinter, PrinterTarget};
pub use ticket::Ticket;
