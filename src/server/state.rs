use crate::core::{AttendanceEventProcessor, DeviceGate};
use std::sync::Arc;

/// Shared, read-only state handed to every request.
pub struct AppState {
    pub gate: DeviceGate,
    pub processor: AttendanceEventProcessor,
}

impl AppState {
    pub fn new(gate: DeviceGate, processor: AttendanceEventProcessor) -> Arc<Self> {
        Arc::new(Self { gate, processor })
    }
}
