use serde::{Deserialize, Serialize};

/// A person enrolled on the terminal. `id` is the terminal PIN.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Employee {
    pub id: i64,
    pub name: String,
    pub active: bool,
}

impl Employee {
    pub fn new(id: i64, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            active: true,
        }
    }

    pub fn status_str(&self) -> &'static str {
        if self.active { "active" } else { "inactive" }
    }
}
