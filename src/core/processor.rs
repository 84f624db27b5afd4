//! Per-event orchestration: dedup, resolve, record, print.
//!
//! Each event walks `received → deduplicated → subject-resolved → recorded
//! → receipt-dispatched` once, leaving early (and quietly) on a duplicate,
//! an unknown or inactive employee, or a failed insert. There is no retry:
//! the terminal re-sending its upload is the only retry path.

use crate::core::dispatch::Dispatcher;
use crate::core::guard::IdempotencyGuard;
use crate::core::ports::MealStore;
use crate::core::receipt::ReceiptEmitter;
use crate::core::recorder::{MealRecorder, RecordOutcome, SubjectStatus};
use crate::models::attendance::AttendanceEvent;
use std::sync::Arc;
use tracing::{info, warn};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProcessOutcome {
    Recorded,
    SkippedDuplicate,
    SkippedUnknownSubject,
    SkippedInactiveSubject,
    RecordFailed,
}

#[derive(Clone)]
pub struct AttendanceEventProcessor {
    guard: IdempotencyGuard,
    recorder: MealRecorder,
    receipts: ReceiptEmitter,
    dispatcher: Dispatcher,
}

impl AttendanceEventProcessor {
    pub fn new(store: Arc<dyn MealStore>, receipts: ReceiptEmitter, dispatcher: Dispatcher) -> Self {
        Self {
            guard: IdempotencyGuard::new(Arc::clone(&store)),
            recorder: MealRecorder::new(store),
            receipts,
            dispatcher,
        }
    }

    pub fn dispatcher(&self) -> &Dispatcher {
        &self.dispatcher
    }

    /// Hand every event to its own detached task and return at once.
    pub fn dispatch_batch(&self, events: Vec<AttendanceEvent>) {
        for event in events {
            let this = self.clone();
            let label = format!("attlog pin={}", event.subject_id);
            self.dispatcher.spawn(label, async move {
                this.process(event).await;
                Ok(())
            });
        }
    }

    pub async fn process(&self, event: AttendanceEvent) -> ProcessOutcome {
        let pin = event.subject_id;
        let at = event.event_time;
        info!(
            subject_id = pin,
            %at,
            status = event.status_code,
            verify = event.verify_method,
            "processing attendance event"
        );

        if self.guard.already_recorded(pin, at).await {
            info!(subject_id = pin, "employee already ate today, skipping");
            return ProcessOutcome::SkippedDuplicate;
        }

        let employee = match self.recorder.resolve_subject(pin).await {
            SubjectStatus::Active(emp) => emp,
            SubjectStatus::Inactive(_) => {
                warn!(subject_id = pin, "employee is inactive, skipping");
                return ProcessOutcome::SkippedInactiveSubject;
            }
            SubjectStatus::NotFound => {
                warn!(subject_id = pin, "employee not found, skipping");
                return ProcessOutcome::SkippedUnknownSubject;
            }
        };

        match self.recorder.record(pin, at).await {
            RecordOutcome::Recorded(meal) => {
                info!(subject_id = pin, meal_id = %meal.id, name = %employee.name, "meal recorded");
            }
            RecordOutcome::AlreadyRecorded => return ProcessOutcome::SkippedDuplicate,
            RecordOutcome::Failed => return ProcessOutcome::RecordFailed,
        }

        let receipts = self.receipts.clone();
        self.dispatcher.spawn(format!("ticket pin={pin}"), async move {
            receipts.emit(&employee, at).await;
            Ok(())
        });

        ProcessOutcome::Recorded
    }
}
