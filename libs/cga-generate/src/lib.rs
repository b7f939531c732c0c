//! # CGA Generate
//!
//! Batched procedural model generation on top of a [`cga_engine::RuleEngine`].
//!
//! A [`ModelGenerator`] owns a list of initial shapes. Each generate call
//! applies per-shape attribute overrides, validates every shape, selects the
//! encoders and runs the engine once for the whole batch. In-memory output is
//! collected by a [`ResultSink`] into one [`GeneratedModel`] per shape.
//!
//! ## Architecture
//!
//! ```text
//! ┌────────────────────┐   ┌──────────────────┐   ┌────────────────┐
//! │ InitialShapeSet    │   │ AttributeResolver│   │ EncoderSelector│
//! │ (descriptors)      │◄──│ (overrides)      │   │ (id, options)  │
//! └─────────┬──────────┘   └──────────────────┘   └───────┬────────┘
//!           │ InitialShape                                │ EncoderSpec
//!           ▼                                             ▼
//! ┌──────────────────────────────────────────────────────────────────┐
//! │ ModelGenerator ──► RuleEngine::generate ──► ResultSink / files   │
//! └──────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Example
//!
//! ```rust
//! use std::sync::Arc;
//! use cga_engine::{EngineContext, ReferenceEngine};
//! use cga_generate::{EncoderOptions, InitialShapeDescriptor, ModelGenerator};
//! use config::constants::IN_MEMORY_ENCODER_ID;
//! use serde_json::json;
//!
//! let dir = tempfile::tempdir().unwrap();
//! let package = dir.path().join("rules.json");
//! std::fs::write(&package, r#"{ "rules": ["bin/rule.cgb"] }"#).unwrap();
//!
//! let context = Arc::new(EngineContext::new());
//! context.initialize(Arc::new(ReferenceEngine::new()));
//!
//! let lot = InitialShapeDescriptor::from_vertices(vec![
//!     0.0, 0.0, 0.0, 0.0, 0.0, 2.0, 2.0, 0.0, 2.0, 2.0, 0.0, 0.0,
//! ]);
//! let generator = ModelGenerator::new(context, vec![lot]);
//! let overrides = json!({ "height": 5.0 }).as_object().cloned().unwrap();
//!
//! let models = generator
//!     .generate(&[overrides], Some(package.as_path()), IN_MEMORY_ENCODER_ID, &EncoderOptions::new())
//!     .unwrap();
//! assert_eq!(models.len(), 1);
//! assert_eq!(models[0].report()["height"].as_float(), Some(5.0));
//! ```

pub mod attributes;
pub mod encoder;
pub mod error;
pub mod initial_shape;
pub mod model;
pub mod orchestrator;
pub mod sink;

pub use attributes::{AttributeOverrides, AttributeResolver, ResolvedAttributes};
pub use encoder::{EncoderOptions, EncoderSelector};
pub use error::{ErrorKind, GenerationError, GenerationResult};
pub use initial_shape::{InitialShapeDescriptor, InitialShapeSet};
pub use model::{GeneratedModel, ReportValue};
pub use orchestrator::ModelGenerator;
pub use sink::ResultSink;
