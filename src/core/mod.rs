//! The attendance ingestion pipeline.

pub mod dispatch;
pub mod gate;
pub mod guard;
pub mod ports;
pub mod processor;
pub mod protocol;
pub mod receipt;
pub mod recorder;

pub use dispatch::Dispatcher;
pub use gate::DeviceGate;
pub use guard::IdempotencyGuard;
pub use processor::{AttendanceEventProcessor, ProcessOutcome};
pub use protocol::{PushTable, parse_attlog_body, parse_attlog_line};
pub use receipt::ReceiptEmitter;
pub use recorder::{MealRecorder, RecordOutcome, SubjectStatus};
