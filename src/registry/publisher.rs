//! Registry publication
//!
//! The publisher owns the "current" registry pointer. Reloads build a brand
//! new `Registry` off the hot path and swap the pointer in one step;
//! readers that already acquired a snapshot keep it for the whole
//! evaluation, so no reader ever observes a torn update.

use std::sync::{Arc, RwLock};

use crate::observability::Logger;

use super::registry::Registry;

/// Atomic publication point for registry snapshots.
///
/// The lock guards only the pointer swap and clone; evaluation never holds
/// it. Concurrent readers share snapshots via `Arc`.
pub struct RegistryPublisher {
    current: RwLock<Arc<Registry>>,
}

impl RegistryPublisher {
    /// Creates a publisher serving an initial registry.
    pub fn new(initial: Registry) -> Self {
        Self {
            current: RwLock::new(Arc::new(initial)),
        }
    }

    /// Acquires the currently published snapshot.
    pub fn acquire(&self) -> Arc<Registry> {
        self.current
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    /// Publishes a new registry, replacing the current pointer atomically.
    pub fn publish(&self, registry: Registry) {
        let version = registry.version().to_string();
        let rules = registry.len().to_string();
        let next = Arc::new(registry);
        {
            let mut guard = self
                .current
                .write()
                .unwrap_or_else(|poisoned| poisoned.into_inner());
            *guard = next;
        }
        Logger::info(
            "REGISTRY_PUBLISHED",
            &[("version", version.as_str()), ("rules", rules.as_str())],
        );
    }
}
