//! # Engine Context
//!
//! Explicit owner of the process-wide engine instance. Hosts create one
//! context, initialize it once, hand it to every generator, and shut it down
//! after the last generation.

use std::fmt;
use std::sync::Arc;

use parking_lot::RwLock;
use tracing::{debug, info};

use crate::RuleEngine;

/// Lifecycle holder for the running rule engine.
///
/// ## Example
///
/// ```rust
/// use std::sync::Arc;
/// use cga_engine::{EngineContext, ReferenceEngine};
///
/// let context = EngineContext::new();
/// assert!(!context.is_initialized());
///
/// context.initialize(Arc::new(ReferenceEngine::new()));
/// assert!(context.is_initialized());
///
/// context.shutdown();
/// assert!(context.engine().is_none());
/// ```
#[derive(Default)]
pub struct EngineContext {
    engine: RwLock<Option<Arc<dyn RuleEngine>>>,
}

impl EngineContext {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Installs `engine` unless one is already running.
    ///
    /// Returns `true` when this call installed the engine.
    pub fn initialize(&self, engine: Arc<dyn RuleEngine>) -> bool {
        let mut slot = self.engine.write();
        if slot.is_some() {
            debug!("engine already initialized");
            return false;
        }
        *slot = Some(engine);
        info!("engine initialized");
        true
    }

    pub fn is_initialized(&self) -> bool {
        self.engine.read().is_some()
    }

    /// Handle to the running engine, if any.
    pub fn engine(&self) -> Option<Arc<dyn RuleEngine>> {
        self.engine.read().clone()
    }

    /// Drops the context's engine handle. Calls already holding a handle
    /// finish with it.
    pub fn shutdown(&self) {
        if self.engine.write().take().is_some() {
            info!("engine shut down");
        }
    }
}

impl fmt::Debug for EngineContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EngineContext")
            .field("initialized", &self.is_initialized())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ReferenceEngine;

    #[test]
    fn test_initialize_is_idempotent() {
        let context = EngineContext::new();
        assert!(context.initialize(Arc::new(ReferenceEngine::new())));
        assert!(!context.initialize(Arc::new(ReferenceEngine::new())));
        assert!(context.is_initialized());
    }

    #[test]
    fn test_shutdown_then_reinitialize() {
        let context = EngineContext::new();
        context.initialize(Arc::new(ReferenceEngine::new()));
        context.shutdown();
        assert!(!context.is_initialized());
        assert!(context.initialize(Arc::new(ReferenceEngine::new())));
    }

    #[test]
    fn test_debug_reports_state() {
        let context = EngineContext::new();
        assert!(format!("{:?}", context).contains("initialized: false"));
    }
}
