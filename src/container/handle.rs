//! Handle to a launched container

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A container started by the launcher
///
/// Subsequent runtime calls address the container by `name`; the id is kept
/// for reporting.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContainerHandle {
    /// Fixed container name
    pub name: String,
    /// Id printed by `run -d`, empty if the runtime printed nothing
    pub id: String,
    /// When the container was launched
    pub created_at: DateTime<Utc>,
}

impl ContainerHandle {
    pub fn new(name: impl Into<String>, id: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            id: id.into(),
            created_at: Utc::now(),
        }
    }

    /// Reference used for runtime calls
    pub fn reference(&self) -> &str {
        &self.name
    }

    /// Short id as `docker ps` shows it, or the name when no id is known
    pub fn display_id(&self) -> &str {
        if self.id.is_empty() {
            &self.name
        } else {
            self.id.get(..12).unwrap_or(&self.id)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_handle_display_id() {
        let handle = ContainerHandle::new("roc", "0123456789abcdef0123");
        assert_eq!(handle.reference(), "roc");
        assert_eq!(handle.display_id(), "0123456789ab");
    }

    #[test]
    fn test_handle_without_id() {
        let handle = ContainerHandle::new("roc", "");
        assert_eq!(handle.display_id(), "roc");
    }
}
