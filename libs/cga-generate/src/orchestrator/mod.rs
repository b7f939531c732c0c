//! # Model Generator
//!
//! Drives one batch of initial shapes through the rule engine.
//!
//! ## Generate Pipeline
//!
//! ```text
//! engine ready? ──► rule package ──► override count ──► initial shapes
//!                                                          │
//!        Vec<GeneratedModel> ◄── ResultSink ◄── in-memory ─┤ encoders
//!        (empty)             ◄── output dir ◄── file ──────┘
//! ```
//!
//! Every gate fails before the engine's generate is called. The resolve map
//! of the last rule package and the last encoder selection are kept on the
//! generator, so repeat calls can skip both.

use std::any::Any;
use std::fs;
use std::panic::{self, AssertUnwindSafe};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use cga_engine::{
    EncoderSpec, EngineContext, GeometryCache, InitialShape, OutputCallbacks, ResolveMap,
    RuleEngine, Status,
};
use config::constants::{GenerationDefaults, OUTPUT_PATH_OPTION};
use parking_lot::RwLock;
use tracing::{debug, error, info, instrument};
use url::Url;

use crate::attributes::{check_override_count, AttributeOverrides};
use crate::encoder::{is_in_memory, EncoderOptions, EncoderSelector};
use crate::error::{GenerationError, GenerationResult};
use crate::initial_shape::{InitialShapeDescriptor, InitialShapeSet};
use crate::model::GeneratedModel;
use crate::sink::ResultSink;

/// Encoder specs of the last successful selection, with the host options
/// they were built from.
#[derive(Debug, Clone)]
struct SelectedEncoders {
    specs: Vec<EncoderSpec>,
    options: EncoderOptions,
}

#[derive(Debug, Default)]
struct GeneratorState {
    resolve_map: Option<Arc<ResolveMap>>,
    encoders: Option<SelectedEncoders>,
}

/// Generates models for a fixed list of initial shapes.
///
/// ## Example
///
/// ```rust
/// use std::sync::Arc;
/// use cga_engine::{EngineContext, ReferenceEngine};
/// use cga_generate::{EncoderOptions, InitialShapeDescriptor, ModelGenerator};
/// use config::constants::IN_MEMORY_ENCODER_ID;
///
/// let context = Arc::new(EngineContext::new());
/// context.initialize(Arc::new(ReferenceEngine::new()));
///
/// let lot = InitialShapeDescriptor::from_vertices(vec![
///     0.0, 0.0, 0.0, 0.0, 0.0, 1.0, 1.0, 0.0, 1.0, 1.0, 0.0, 0.0,
/// ]);
/// let generator = ModelGenerator::new(context, vec![lot]);
///
/// // No rule package yet: the shape has no rule to run and yields nothing.
/// let models = generator
///     .generate(&[Default::default()], None, IN_MEMORY_ENCODER_ID, &EncoderOptions::new())
///     .unwrap();
/// assert!(models.is_empty());
/// ```
#[derive(Debug)]
pub struct ModelGenerator {
    context: Arc<EngineContext>,
    shapes: Vec<InitialShapeDescriptor>,
    defaults: GenerationDefaults,
    cache: GeometryCache,
    state: RwLock<GeneratorState>,
}

impl ModelGenerator {
    pub fn new(context: Arc<EngineContext>, shapes: Vec<InitialShapeDescriptor>) -> Self {
        Self::with_defaults(context, shapes, GenerationDefaults::default())
    }

    pub fn with_defaults(
        context: Arc<EngineContext>,
        shapes: Vec<InitialShapeDescriptor>,
        defaults: GenerationDefaults,
    ) -> Self {
        Self {
            context,
            shapes,
            defaults,
            cache: GeometryCache::new(),
            state: RwLock::new(GeneratorState::default()),
        }
    }

    pub fn shapes(&self) -> &[InitialShapeDescriptor] {
        &self.shapes
    }

    pub fn defaults(&self) -> &GenerationDefaults {
        &self.defaults
    }

    /// Geometry cache shared by every call on this generator.
    pub fn cache(&self) -> &GeometryCache {
        &self.cache
    }

    /// Resolve map of the most recently resolved rule package.
    pub fn resolve_map(&self) -> Option<Arc<ResolveMap>> {
        self.state.read().resolve_map.clone()
    }

    /// Generates every initial shape.
    ///
    /// - `overrides`: one attribute set for all shapes, or one per shape
    /// - `rule_package`: resolved and kept for later calls; `None` or an empty
    ///   path reuses the kept resolve map
    /// - `encoder_id`: an empty id reuses the previous encoder selection
    ///
    /// Returns the models of the in-memory encoder, ordered by shape index.
    /// File encoders write into the `outputPath` option and return nothing.
    #[instrument(skip_all, fields(shapes = self.shapes.len(), encoder = encoder_id))]
    pub fn generate(
        &self,
        overrides: &[AttributeOverrides],
        rule_package: Option<&Path>,
        encoder_id: &str,
        encoder_options: &EncoderOptions,
    ) -> GenerationResult<Vec<GeneratedModel>> {
        let engine = self.context.engine().ok_or(GenerationError::EngineNotReady)?;

        if let Some(package) = rule_package.filter(|p| !p.as_os_str().is_empty()) {
            // A failed package leaves no map behind for later calls.
            let resolved = resolve_package(engine.as_ref(), package).map(Arc::new);
            self.state.write().resolve_map = resolved.as_ref().ok().cloned();
            resolved?;
        }
        let resolve_map = self.resolve_map();

        check_override_count(overrides.len(), self.shapes.len())?;

        let shapes = InitialShapeSet {
            engine: engine.as_ref(),
            defaults: &self.defaults,
            resolve_map,
            cache: &self.cache,
        }
        .build(&self.shapes, overrides)?;

        let encoders = self.select_encoders(engine.as_ref(), encoder_id, encoder_options)?;

        if is_in_memory(&encoders.specs[0].id) {
            let sink = ResultSink::new();
            self.run(engine.as_ref(), &shapes, &encoders.specs, &sink)?;
            let models = sink.drain();
            debug!(models = models.len(), "generation finished");
            Ok(models)
        } else {
            let directory = output_directory(&encoders.options)?;
            let callbacks = engine
                .file_output_callbacks(&directory)
                .map_err(|e| GenerationError::OutputPath {
                    path: directory.clone(),
                    message: e.to_string(),
                })?;
            self.run(engine.as_ref(), &shapes, &encoders.specs, callbacks.as_ref())?;
            info!(directory = %directory.display(), "generated files written");
            Ok(Vec::new())
        }
    }

    /// Generates again with new attribute overrides, reusing the kept
    /// resolve map and encoder selection.
    pub fn generate_another(
        &self,
        overrides: &[AttributeOverrides],
    ) -> GenerationResult<Vec<GeneratedModel>> {
        if !self.context.is_initialized() {
            return Err(GenerationError::EngineNotReady);
        }
        if self.resolve_map().is_none() {
            return Err(GenerationError::PackageResolution {
                package: String::new(),
                message: "no rule package has been resolved by an earlier call".to_string(),
            });
        }
        self.generate(overrides, None, "", &EncoderOptions::new())
    }

    fn select_encoders(
        &self,
        engine: &dyn RuleEngine,
        encoder_id: &str,
        options: &EncoderOptions,
    ) -> GenerationResult<SelectedEncoders> {
        if encoder_id.is_empty() {
            return self.state.read().encoders.clone().ok_or_else(|| {
                GenerationError::OptionValidation {
                    encoder: String::new(),
                    message: "no encoder given and none selected by an earlier call".to_string(),
                }
            });
        }

        let selected = SelectedEncoders {
            specs: EncoderSelector::new(engine).select(encoder_id, options)?,
            options: options.clone(),
        };
        self.state.write().encoders = Some(selected.clone());
        Ok(selected)
    }

    fn run(
        &self,
        engine: &dyn RuleEngine,
        shapes: &[InitialShape],
        encoders: &[EncoderSpec],
        callbacks: &dyn OutputCallbacks,
    ) -> GenerationResult<()> {
        let outcome = panic::catch_unwind(AssertUnwindSafe(|| {
            engine.generate(shapes, encoders, callbacks, &self.cache)
        }));

        match outcome {
            Ok(Ok(())) => Ok(()),
            Ok(Err(err)) => {
                error!(status = %err.status, code = err.status.code(), "generate failed: {}", err.message);
                Err(err.into())
            }
            Err(payload) => {
                let message = panic_message(&*payload);
                error!("generate panicked: {message}");
                Err(GenerationError::Generation {
                    status: Status::UnspecifiedError,
                    code: Status::UnspecifiedError.code(),
                    message,
                })
            }
        }
    }
}

fn resolve_package(engine: &dyn RuleEngine, package: &Path) -> GenerationResult<ResolveMap> {
    let failure = |message: String| GenerationError::PackageResolution {
        package: package.display().to_string(),
        message,
    };

    let absolute = fs::canonicalize(package).map_err(|e| failure(e.to_string()))?;
    let uri = Url::from_file_path(&absolute)
        .map_err(|()| failure("cannot be expressed as a file URI".to_string()))?;
    info!(package = %uri, "using rule package");

    let resolve_map = engine.resolve_package(&uri).map_err(|e| failure(e.to_string()))?;
    debug!(
        entries = ?resolve_map.keys().collect::<Vec<_>>(),
        "resolve map of {}",
        resolve_map.package()
    );
    Ok(resolve_map)
}

fn output_directory(options: &EncoderOptions) -> GenerationResult<PathBuf> {
    let path = options
        .get(OUTPUT_PATH_OPTION)
        .and_then(|v| v.as_str())
        .map(PathBuf::from)
        .ok_or_else(|| GenerationError::OutputPath {
            path: PathBuf::new(),
            message: format!("option '{OUTPUT_PATH_OPTION}' is required for file encoders"),
        })?;
    if !path.is_dir() {
        return Err(GenerationError::OutputPath {
            path,
            message: "not an existing directory".to_string(),
        });
    }
    Ok(path)
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "engine panicked".to_string()
    }
}
