//! # Reference Engine
//!
//! Deterministic in-process [`RuleEngine`]. It stands in for the production
//! engine in tests and in hosts that only need simple massing models.
//!
//! ## Rule
//!
//! Every face of the initial shape is extruded along its normal by the
//! `height` attribute (int or float, default 10). Per shape the in-memory
//! encoder emits two geometry batches (the initial faces, then the extruded
//! shell), one report set and the index acknowledgement.
//!
//! | Report key  | Kind   | Value                          |
//! |-------------|--------|--------------------------------|
//! | `area`      | float  | summed area of the initial faces |
//! | `height`    | float  | extrusion height               |
//! | `faceCount` | float  | number of initial faces        |
//! | `seed`      | float  | shape seed                     |
//! | `startRule` | string | start rule                     |
//! | `shapeName` | string | shape name                     |
//! | `extruded`  | bool   | `height != 0`                  |
//!
//! A shape produces no output at all when its rule file is not part of the
//! resolve map or its start rule is not of the form `style$rule`.
//!
//! ## Rule Packages
//!
//! A package is a JSON manifest listing the rule files it provides:
//!
//! ```json
//! { "rules": ["bin/rule.cgb"] }
//! ```

mod extrude;
mod obj;

use std::collections::BTreeMap;
use std::fmt::Write;
use std::fs;
use std::sync::Arc;

use config::constants::{
    CGA_PRINT_ENCODER_ID, CGA_REPORT_ENCODER_ID, CGA_REPORT_FILE, ENCODER_OPT_NAME,
    IN_MEMORY_ENCODER_ID, OBJ_ENCODER_ID, OUTPUT_PATH_OPTION,
};
use rayon::prelude::*;
use serde::Deserialize;
use tracing::{debug, warn};
use url::Url;

use crate::attributes::{AttributeKind, AttributeMap, AttributeValue};
use crate::callbacks::{BoolReport, FloatReport, OutputCallbacks, StringReport};
use crate::error::{EngineError, EngineResult, Status};
use crate::resolve::{GeometryCache, ResolveMap};
use crate::shape::{InitialShape, ShapeGeometry};
use crate::{EncoderSpec, RuleEngine};

use self::extrude::{extrude, Extrusion};

/// Extrusion height used when a shape has no `height` attribute.
pub const DEFAULT_HEIGHT: f64 = 10.0;

/// Attribute controlling the extrusion height.
pub const HEIGHT_ATTRIBUTE: &str = "height";

/// In-memory encoder option: emit geometry batches.
pub const EMIT_GEOMETRY_OPTION: &str = "emitGeometry";

/// In-memory encoder option: emit report values.
pub const EMIT_REPORT_OPTION: &str = "emitReport";

/// OBJ encoder option: file name prefix.
pub const BASE_NAME_OPTION: &str = "baseName";

/// One option an encoder accepts, with its default.
struct OptionSchema {
    key: &'static str,
    kind: AttributeKind,
    default: Option<AttributeValue>,
}

impl OptionSchema {
    fn new(key: &'static str, kind: AttributeKind, default: Option<AttributeValue>) -> Self {
        Self { key, kind, default }
    }
}

#[derive(Debug, Deserialize)]
struct PackageManifest {
    rules: Vec<String>,
}

/// Deterministic extrusion engine.
///
/// ## Example
///
/// ```rust
/// use cga_engine::{ReferenceEngine, RuleEngine, AttributeMap};
/// use config::constants::CGA_REPORT_ENCODER_ID;
///
/// let engine = ReferenceEngine::new();
/// let options = engine.validate_options(CGA_REPORT_ENCODER_ID, &AttributeMap::new()).unwrap();
/// assert_eq!(options.get("name").and_then(|v| v.as_str()), Some("CGAReport.txt"));
/// ```
#[derive(Debug, Clone)]
pub struct ReferenceEngine {
    default_height: f64,
}

impl Default for ReferenceEngine {
    fn default() -> Self {
        Self {
            default_height: DEFAULT_HEIGHT,
        }
    }
}

impl ReferenceEngine {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Engine that extrudes by `height` when shapes carry no height attribute.
    #[must_use]
    pub fn with_default_height(height: f64) -> Self {
        Self {
            default_height: height,
        }
    }

    fn option_schema(encoder_id: &str) -> Option<Vec<OptionSchema>> {
        let schema = match encoder_id {
            IN_MEMORY_ENCODER_ID => vec![
                OptionSchema::new(EMIT_GEOMETRY_OPTION, AttributeKind::Bool, Some(true.into())),
                OptionSchema::new(EMIT_REPORT_OPTION, AttributeKind::Bool, Some(true.into())),
            ],
            OBJ_ENCODER_ID => vec![
                OptionSchema::new(OUTPUT_PATH_OPTION, AttributeKind::String, None),
                OptionSchema::new(BASE_NAME_OPTION, AttributeKind::String, Some("model".into())),
            ],
            CGA_REPORT_ENCODER_ID | CGA_PRINT_ENCODER_ID => vec![OptionSchema::new(
                ENCODER_OPT_NAME,
                AttributeKind::String,
                Some(CGA_REPORT_FILE.into()),
            )],
            _ => return None,
        };
        Some(schema)
    }

    /// Evaluates the rule for one shape, or `None` when the shape fails.
    fn evaluate(&self, shape_index: u32, shape: &InitialShape) -> Option<(Extrusion, f64)> {
        let known_rule = shape
            .resolve_map()
            .is_some_and(|map| map.contains(shape.rule_file()));
        if !known_rule {
            warn!(shape_index, rule_file = shape.rule_file(), "rule file not found in resolve map");
            return None;
        }
        if !is_style_rule(shape.start_rule()) {
            warn!(shape_index, start_rule = shape.start_rule(), "start rule must be of the form style$rule");
            return None;
        }
        let height = shape
            .attributes()
            .get(HEIGHT_ATTRIBUTE)
            .and_then(AttributeValue::as_number)
            .unwrap_or(self.default_height);
        Some((extrude(shape.geometry(), height), height))
    }

    fn generate_shape(
        &self,
        shape_index: u32,
        shape: &InitialShape,
        encoders: &[EncoderSpec],
        callbacks: &dyn OutputCallbacks,
    ) -> EngineResult<()> {
        let Some((extrusion, height)) = self.evaluate(shape_index, shape) else {
            return Ok(());
        };
        let (floats, strings, bools) = reports(shape, &extrusion, height);

        for encoder in encoders {
            match encoder.id.as_str() {
                IN_MEMORY_ENCODER_ID => {
                    if option_flag(encoder, EMIT_GEOMETRY_OPTION) {
                        callbacks.on_geometry(shape_index, &extrusion.base.vertices, &extrusion.base.faces);
                        callbacks.on_geometry(shape_index, &extrusion.shell.vertices, &extrusion.shell.faces);
                    } else {
                        callbacks.on_geometry(shape_index, &[], &[]);
                    }
                    if option_flag(encoder, EMIT_REPORT_OPTION) {
                        callbacks.on_reports(shape_index, &floats, &strings, &bools);
                    }
                    callbacks.on_index_ack(shape_index);
                }
                OBJ_ENCODER_ID => {
                    let base_name = option_str(encoder, BASE_NAME_OPTION).unwrap_or("model");
                    let (vertices, faces) = merged(&extrusion);
                    let text = obj::write(shape.shape_name(), &vertices, &faces);
                    let name = format!("{}_{}.obj", base_name, shape_index);
                    callbacks.on_file(shape_index, &name, text.as_bytes())?;
                }
                CGA_REPORT_ENCODER_ID => {
                    let name = option_str(encoder, ENCODER_OPT_NAME).unwrap_or(CGA_REPORT_FILE);
                    let mut text = String::new();
                    for (key, value) in &floats {
                        let _ = writeln!(text, "{}[{}] {}={}", shape.shape_name(), shape_index, key, value);
                    }
                    for (key, value) in &strings {
                        let _ = writeln!(text, "{}[{}] {}={}", shape.shape_name(), shape_index, key, value);
                    }
                    for (key, value) in &bools {
                        let _ = writeln!(text, "{}[{}] {}={}", shape.shape_name(), shape_index, key, value);
                    }
                    callbacks.on_file(shape_index, name, text.as_bytes())?;
                }
                CGA_PRINT_ENCODER_ID => {
                    let name = option_str(encoder, ENCODER_OPT_NAME).unwrap_or(CGA_REPORT_FILE);
                    let line = format!(
                        "{}[{}] print: {} from {}\n",
                        shape.shape_name(),
                        shape_index,
                        shape.start_rule(),
                        shape.rule_file()
                    );
                    callbacks.on_file(shape_index, name, line.as_bytes())?;
                }
                other => {
                    return Err(EngineError::new(
                        Status::UnknownEncoder,
                        format!("no encoder registered as '{}'", other),
                    ))
                }
            }
        }
        Ok(())
    }
}

impl RuleEngine for ReferenceEngine {
    fn resolve_package(&self, package: &Url) -> EngineResult<ResolveMap> {
        let path = package.to_file_path().map_err(|_| {
            EngineError::new(Status::InvalidArgument, format!("'{}' is not a file URI", package))
        })?;
        let text = fs::read_to_string(&path).map_err(|e| {
            EngineError::new(Status::FileNotFound, format!("{}: {}", path.display(), e))
        })?;
        let manifest: PackageManifest = serde_json::from_str(&text).map_err(|e| {
            EngineError::new(Status::ResolveError, format!("{}: {}", path.display(), e))
        })?;

        let mut map = ResolveMap::new(package.clone());
        for rule in manifest.rules {
            let mut location = package.clone();
            location.set_fragment(Some(&rule));
            map.insert(rule, location);
        }
        Ok(map)
    }

    fn resolve_geometry(
        &self,
        uri: &Url,
        _resolve_map: Option<&ResolveMap>,
        cache: &GeometryCache,
    ) -> EngineResult<Arc<ShapeGeometry>> {
        cache.get_or_load(uri, || {
            let path = uri.to_file_path().map_err(|_| {
                EngineError::new(Status::InvalidArgument, format!("'{}' is not a file URI", uri))
            })?;
            debug!(path = %path.display(), "loading initial shape geometry");
            let text = fs::read_to_string(&path).map_err(|e| {
                EngineError::new(Status::FileNotFound, format!("{}: {}", path.display(), e))
            })?;
            obj::parse(&text)
        })
    }

    fn validate_options(&self, encoder_id: &str, options: &AttributeMap) -> EngineResult<AttributeMap> {
        let schema = Self::option_schema(encoder_id).ok_or_else(|| {
            EngineError::new(
                Status::UnknownEncoder,
                format!("no encoder registered as '{}'", encoder_id),
            )
        })?;

        for (key, value) in options {
            let entry = schema.iter().find(|s| s.key == key.as_str()).ok_or_else(|| {
                EngineError::new(
                    Status::InvalidOption,
                    format!("unknown option '{}' for encoder '{}'", key, encoder_id),
                )
            })?;
            if value.kind() != entry.kind {
                return Err(EngineError::new(
                    Status::InvalidOption,
                    format!(
                        "option '{}' of encoder '{}' must be {}, got {}",
                        key,
                        encoder_id,
                        entry.kind,
                        value.kind()
                    ),
                ));
            }
        }

        let mut validated = options.clone();
        for entry in schema {
            if let Some(default) = entry.default {
                validated.entry(entry.key.to_string()).or_insert(default);
            }
        }
        Ok(validated)
    }

    fn generate(
        &self,
        shapes: &[InitialShape],
        encoders: &[EncoderSpec],
        callbacks: &dyn OutputCallbacks,
        _cache: &GeometryCache,
    ) -> EngineResult<()> {
        if encoders.is_empty() {
            return Err(EngineError::new(Status::InvalidArgument, "no encoders given"));
        }
        if let Some(unknown) = encoders.iter().find(|e| Self::option_schema(&e.id).is_none()) {
            return Err(EngineError::new(
                Status::UnknownEncoder,
                format!("no encoder registered as '{}'", unknown.id),
            ));
        }
        let shape_count = u32::try_from(shapes.len()).map_err(|_| {
            EngineError::new(Status::InvalidArgument, "too many initial shapes")
        })?;
        debug!(shapes = shape_count, encoders = encoders.len(), "generating");

        shapes
            .par_iter()
            .enumerate()
            .try_for_each(|(index, shape)| self.generate_shape(index as u32, shape, encoders, callbacks))
    }
}

fn option_str<'a>(encoder: &'a EncoderSpec, key: &str) -> Option<&'a str> {
    encoder.options.get(key).and_then(AttributeValue::as_str)
}

fn option_flag(encoder: &EncoderSpec, key: &str) -> bool {
    encoder
        .options
        .get(key)
        .and_then(AttributeValue::as_bool)
        .unwrap_or(true)
}

fn is_style_rule(start_rule: &str) -> bool {
    match start_rule.split_once('$') {
        Some((style, rule)) => !style.is_empty() && !rule.is_empty(),
        None => false,
    }
}

fn reports(shape: &InitialShape, extrusion: &Extrusion, height: f64) -> (FloatReport, StringReport, BoolReport) {
    let floats = BTreeMap::from([
        ("area".to_string(), extrusion.area),
        ("height".to_string(), height),
        ("faceCount".to_string(), extrusion.base.faces.len() as f64),
        ("seed".to_string(), f64::from(shape.seed())),
    ]);
    let strings = BTreeMap::from([
        ("startRule".to_string(), shape.start_rule().to_string()),
        ("shapeName".to_string(), shape.shape_name().to_string()),
    ]);
    let bools = BTreeMap::from([("extruded".to_string(), height != 0.0)]);
    (floats, strings, bools)
}

/// Base and shell in one buffer, shell indices rebased.
fn merged(extrusion: &Extrusion) -> (Vec<f64>, Vec<Vec<u32>>) {
    let offset = (extrusion.base.vertices.len() / 3) as u32;
    let mut vertices = extrusion.base.vertices.clone();
    vertices.extend_from_slice(&extrusion.shell.vertices);
    let mut faces = extrusion.base.faces.clone();
    faces.extend(
        extrusion
            .shell
            .faces
            .iter()
            .map(|face| face.iter().map(|i| i + offset).collect()),
    );
    (vertices, faces)
}
