//! Best-effort meal ticket printing.
//!
//! A ticket is a courtesy: the meal row is the record of truth. Nothing in
//! here returns an error and nothing is retried.

use crate::config::ReceiptConfig;
use crate::core::ports::ReceiptPrinter;
use crate::models::employee::Employee;
use crate::printer::ticket::Ticket;
use crate::utils::{ticket_date, ticket_time};
use chrono::NaiveDateTime;
use std::sync::Arc;
use tokio::sync::Semaphore;
use tracing::{debug, error, info};

#[derive(Clone)]
pub struct ReceiptEmitter {
    printer: Option<Arc<dyn ReceiptPrinter>>,
    layout: ReceiptConfig,
    permits: Arc<Semaphore>,
}

impl ReceiptEmitter {
    /// `max_in_flight` bounds concurrent prints; 1 keeps tickets from
    /// interleaving on a single device.
    pub fn new(printer: Arc<dyn ReceiptPrinter>, layout: ReceiptConfig, max_in_flight: usize) -> Self {
        Self {
            printer: Some(printer),
            layout,
            permits: Arc::new(Semaphore::new(max_in_flight.max(1))),
        }
    }

    /// An emitter that only logs. Used when printing is switched off.
    pub fn disabled(layout: ReceiptConfig) -> Self {
        Self {
            printer: None,
            layout,
            permits: Arc::new(Semaphore::new(1)),
        }
    }

    pub fn render(&self, employee: &Employee, at: NaiveDateTime) -> Ticket {
        let mut t = Ticket::new(self.layout.width);

        t.align_center()
            .bold(true)
            .println(&self.layout.title)
            .bold(false)
            .println(&self.layout.subtitle)
            .draw_line()
            .new_line();

        t.align_left()
            .println(format!("Empleado: {}", employee.name))
            .println(format!("ID: {}", employee.id))
            .new_line()
            .println(format!("Fecha: {}", ticket_date(&at)))
            .println(format!("Hora: {}", ticket_time(&at)))
            .new_line();

        t.draw_line()
            .align_center()
            .println(&self.layout.footer)
            .new_line()
            .new_line()
            .cut();

        t
    }

    /// Print a ticket for `employee`. Returns whether it reached the printer;
    /// failures are logged here and go no further.
    pub async fn emit(&self, employee: &Employee, at: NaiveDateTime) -> bool {
        let Some(printer) = &self.printer else {
            debug!(employee_id = employee.id, "printing disabled, no ticket");
            return false;
        };

        let _permit = match self.permits.acquire().await {
            Ok(p) => p,
            Err(e) => {
                error!(employee_id = employee.id, error = %e, "print queue closed");
                return false;
            }
        };

        if !printer.is_connected().await {
            error!(
                employee_id = employee.id,
                printer = %printer.describe(),
                "printer not connected, ticket dropped"
            );
            return false;
        }

        let ticket = self.render(employee, at);
        match printer.print(&ticket).await {
            Ok(()) => {
                info!(employee_id = employee.id, name = %employee.name, "ticket printed");
                true
            }
            Err(e) => {
                error!(employee_id = employee.id, error = %e, "failed to print ticket");
                false
            }
        }
    }
}
