//! Device identity check on the declared `SN` query parameter.

use tracing::warn;

#[derive(Debug, Clone, Default)]
pub struct DeviceGate {
    expected: Option<String>,
}

impl DeviceGate {
    /// A blank `expected` is the same as none: every device is admitted.
    pub fn new(expected: Option<String>) -> Self {
        Self {
            expected: expected.filter(|s| !s.trim().is_empty()),
        }
    }

    pub fn is_open(&self) -> bool {
        self.expected.is_none()
    }

    pub fn admits(&self, declared: Option<&str>) -> bool {
        match &self.expected {
            None => true,
            Some(expected) => declared == Some(expected.as_str()),
        }
    }

    /// `admits`, logging the mismatch. Never an error: a misconfigured but
    /// genuine terminal must still get its `OK`.
    pub fn check(&self, declared: Option<&str>) -> bool {
        let ok = self.admits(declared);
        if !ok {
            warn!(serial = declared.unwrap_or("<none>"), "unknown device serial");
        }
        ok
    }
}
