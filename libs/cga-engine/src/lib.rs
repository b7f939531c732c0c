//! # CGA Engine
//!
//! Boundary between the generation orchestrator and the rule-evaluation
//! engine. The engine is a capability set ([`RuleEngine`]) that resolves rule
//! packages, loads shape geometry, validates encoder options and runs
//! generation, pushing its output through [`OutputCallbacks`].
//!
//! ## Architecture
//!
//! ```text
//! InitialShapeBuilder ──► InitialShape ─┐
//! EncoderSpec (validated options) ──────┼──► RuleEngine::generate ──► OutputCallbacks
//! ResolveMap / GeometryCache ───────────┘
//! ```
//!
//! [`ReferenceEngine`] is a deterministic in-process engine: it extrudes
//! every face of the initial shape and reports simple measurements. It backs
//! the test suites and hosts that run without the production engine.
//!
//! ## Example
//!
//! ```rust
//! use cga_engine::{RuleEngine, ReferenceEngine, AttributeMap};
//! use config::constants::IN_MEMORY_ENCODER_ID;
//!
//! let engine = ReferenceEngine::new();
//! let options = engine.validate_options(IN_MEMORY_ENCODER_ID, &AttributeMap::new()).unwrap();
//! assert_eq!(options.get("emitGeometry").and_then(|v| v.as_bool()), Some(true));
//! ```

pub mod attributes;
pub mod callbacks;
pub mod context;
pub mod error;
pub mod reference;
pub mod resolve;
pub mod shape;

use std::path::Path;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use url::Url;

pub use attributes::{AttributeKind, AttributeMap, AttributeValue};
pub use callbacks::{BoolReport, FileOutputCallbacks, FloatReport, OutputCallbacks, StringReport};
pub use context::EngineContext;
pub use error::{EngineError, EngineResult, Status};
pub use reference::ReferenceEngine;
pub use resolve::{GeometryCache, ResolveMap};
pub use shape::{InitialShape, InitialShapeBuilder, ShapeGeometry};

// =============================================================================
// ENCODER SPEC
// =============================================================================

/// One encoder to run during generation, with engine-validated options.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EncoderSpec {
    pub id: String,
    pub options: AttributeMap,
}

impl EncoderSpec {
    pub fn new(id: impl Into<String>, options: AttributeMap) -> Self {
        Self {
            id: id.into(),
            options,
        }
    }
}

// =============================================================================
// ENGINE CAPABILITIES
// =============================================================================

/// Capability set of a rule-evaluation engine.
///
/// Implementations must tolerate concurrent calls: one engine instance is
/// shared by every generator of the process.
pub trait RuleEngine: Send + Sync {
    /// Builds the resolve map of the rule package at `package`.
    fn resolve_package(&self, package: &Url) -> EngineResult<ResolveMap>;

    /// Loads initial-shape geometry from `uri`, consulting `cache` first.
    fn resolve_geometry(
        &self,
        uri: &Url,
        resolve_map: Option<&ResolveMap>,
        cache: &GeometryCache,
    ) -> EngineResult<Arc<ShapeGeometry>>;

    /// Checks `options` against the encoder's option schema and returns the
    /// complete option set, defaults included.
    fn validate_options(&self, encoder_id: &str, options: &AttributeMap) -> EngineResult<AttributeMap>;

    /// Runs every encoder on every shape. Returns once all callbacks have
    /// been delivered. Shapes whose rule evaluation fails produce no output
    /// and do not fail the call.
    fn generate(
        &self,
        shapes: &[InitialShape],
        encoders: &[EncoderSpec],
        callbacks: &dyn OutputCallbacks,
        cache: &GeometryCache,
    ) -> EngineResult<()>;

    /// Callbacks that write file-encoder output into `directory`.
    fn file_output_callbacks(&self, directory: &Path) -> EngineResult<Box<dyn OutputCallbacks>> {
        Ok(Box::new(FileOutputCallbacks::new(directory)?))
    }
}
