//! # Config Crate
//!
//! Centralized defaults and identifiers for the CGA generation pipeline.
//! Rule defaults, reserved attribute keys, encoder identifiers and option
//! names are defined here so the engine boundary and the orchestrator agree
//! on every literal.
//!
//! ## Usage
//!
//! ```rust
//! use config::constants::{GenerationDefaults, DEFAULT_SEED, IN_MEMORY_ENCODER_ID};
//!
//! let defaults = GenerationDefaults::default();
//! assert_eq!(defaults.seed, DEFAULT_SEED);
//!
//! // The in-memory encoder streams results back through callbacks.
//! assert!(!IN_MEMORY_ENCODER_ID.is_empty());
//! ```
//!
//! ## Design Principles
//!
//! - **Single Source of Truth**: All constants defined once, used everywhere
//! - **Engine Compatible**: Encoder identifiers match what the engine registers
//! - **Validated Snapshots**: `GenerationDefaults::new` rejects unusable values

pub mod constants;
