//! # Initial Shapes
//!
//! Geometry buffers, the builder that validates them, and the finalized
//! initial shape handed to [`RuleEngine::generate`](crate::RuleEngine::generate).
//!
//! ## Memory Layout
//!
//! - `vertices`: [x0, y0, z0, x1, y1, z1, ...] - 3 coordinates per vertex
//! - `indices`: vertex indices of all faces, concatenated
//! - `face_counts`: number of indices of each face, in order

use std::sync::Arc;

use url::Url;

use crate::attributes::AttributeMap;
use crate::error::{EngineError, EngineResult, Status};
use crate::resolve::{GeometryCache, ResolveMap};
use crate::RuleEngine;

// =============================================================================
// SHAPE GEOMETRY
// =============================================================================

/// Polygonal geometry of an initial shape.
///
/// ## Example
///
/// ```rust
/// use cga_engine::ShapeGeometry;
///
/// let quad = ShapeGeometry::new(
///     vec![0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 1.0, 0.0, 1.0, 0.0, 0.0, 1.0],
///     vec![0, 1, 2, 3],
///     vec![4],
/// );
/// assert!(quad.validate().is_ok());
/// assert_eq!(quad.vertex_count(), 4);
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ShapeGeometry {
    pub vertices: Vec<f64>,
    pub indices: Vec<u32>,
    pub face_counts: Vec<u32>,
}

impl ShapeGeometry {
    #[must_use]
    pub fn new(vertices: Vec<f64>, indices: Vec<u32>, face_counts: Vec<u32>) -> Self {
        Self {
            vertices,
            indices,
            face_counts,
        }
    }

    /// Number of vertices (coordinate triples).
    pub fn vertex_count(&self) -> usize {
        self.vertices.len() / 3
    }

    /// Checks the buffer invariants.
    ///
    /// # Errors
    /// [`Status::InvalidArgument`] when the coordinate count is not a multiple
    /// of three, the face counts do not sum to the index count, or an index
    /// points past the last vertex.
    pub fn validate(&self) -> EngineResult<()> {
        if self.vertices.len() % 3 != 0 {
            return Err(EngineError::new(
                Status::InvalidArgument,
                format!(
                    "vertex buffer has {} coordinates, not a multiple of 3",
                    self.vertices.len()
                ),
            ));
        }
        let face_total: u64 = self.face_counts.iter().map(|&c| u64::from(c)).sum();
        if face_total != self.indices.len() as u64 {
            return Err(EngineError::new(
                Status::InvalidArgument,
                format!(
                    "face counts sum to {} but {} indices were given",
                    face_total,
                    self.indices.len()
                ),
            ));
        }
        let vertex_count = self.vertex_count();
        if let Some(bad) = self.indices.iter().find(|&&i| i as usize >= vertex_count) {
            return Err(EngineError::new(
                Status::InvalidArgument,
                format!("index {} out of range for {} vertices", bad, vertex_count),
            ));
        }
        Ok(())
    }

    /// Iterates the index slice of every face. Assumes a validated geometry.
    pub fn faces(&self) -> impl Iterator<Item = &[u32]> + '_ {
        let mut start = 0usize;
        self.face_counts.iter().map(move |&count| {
            let end = (start + count as usize).min(self.indices.len());
            let face = &self.indices[start.min(end)..end];
            start = end;
            face
        })
    }

    /// Position of vertex `index` as an `[x, y, z]` triple.
    pub fn position(&self, index: u32) -> [f64; 3] {
        let base = index as usize * 3;
        [
            self.vertices[base],
            self.vertices[base + 1],
            self.vertices[base + 2],
        ]
    }
}

// =============================================================================
// INITIAL SHAPE
// =============================================================================

/// Finalized initial shape: geometry plus the rule setup it starts from.
#[derive(Debug, Clone)]
pub struct InitialShape {
    geometry: Arc<ShapeGeometry>,
    rule_file: String,
    start_rule: String,
    seed: i32,
    shape_name: String,
    attributes: AttributeMap,
    resolve_map: Option<Arc<ResolveMap>>,
}

impl InitialShape {
    pub fn geometry(&self) -> &ShapeGeometry {
        &self.geometry
    }

    pub fn rule_file(&self) -> &str {
        &self.rule_file
    }

    pub fn start_rule(&self) -> &str {
        &self.start_rule
    }

    pub fn seed(&self) -> i32 {
        self.seed
    }

    pub fn shape_name(&self) -> &str {
        &self.shape_name
    }

    /// Rule attributes, without the reserved keys.
    pub fn attributes(&self) -> &AttributeMap {
        &self.attributes
    }

    pub fn resolve_map(&self) -> Option<&ResolveMap> {
        self.resolve_map.as_deref()
    }
}

// =============================================================================
// BUILDER
// =============================================================================

#[derive(Debug, Clone)]
struct RuleSetup {
    rule_file: String,
    start_rule: String,
    seed: i32,
    shape_name: String,
    attributes: AttributeMap,
    resolve_map: Option<Arc<ResolveMap>>,
}

/// Collects geometry and rule setup for one initial shape.
///
/// ## Example
///
/// ```rust
/// use cga_engine::{InitialShapeBuilder, ShapeGeometry, AttributeMap};
///
/// let mut builder = InitialShapeBuilder::new();
/// builder
///     .set_geometry(ShapeGeometry::new(
///         vec![0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 0.0, 1.0],
///         vec![0, 1, 2],
///         vec![3],
///     ))
///     .unwrap();
/// builder.set_attributes("bin/rule.cgb", "default$init", 1, "Lot", AttributeMap::new(), None);
/// let shape = builder.create_initial_shape().unwrap();
/// assert_eq!(shape.shape_name(), "Lot");
/// ```
#[derive(Debug, Default)]
pub struct InitialShapeBuilder {
    geometry: Option<Arc<ShapeGeometry>>,
    setup: Option<RuleSetup>,
}

impl InitialShapeBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Takes inline geometry after validating it.
    pub fn set_geometry(&mut self, geometry: ShapeGeometry) -> EngineResult<()> {
        geometry.validate()?;
        self.geometry = Some(Arc::new(geometry));
        Ok(())
    }

    /// Asks the engine to load geometry from `uri` against `resolve_map`.
    pub fn resolve_geometry(
        &mut self,
        engine: &dyn RuleEngine,
        uri: &Url,
        resolve_map: Option<&ResolveMap>,
        cache: &GeometryCache,
    ) -> EngineResult<()> {
        let geometry = engine.resolve_geometry(uri, resolve_map, cache)?;
        geometry.validate()?;
        self.geometry = Some(geometry);
        Ok(())
    }

    pub fn has_geometry(&self) -> bool {
        self.geometry.is_some()
    }

    /// Attaches the rule setup, replacing any previous one.
    pub fn set_attributes(
        &mut self,
        rule_file: impl Into<String>,
        start_rule: impl Into<String>,
        seed: i32,
        shape_name: impl Into<String>,
        attributes: AttributeMap,
        resolve_map: Option<Arc<ResolveMap>>,
    ) {
        self.setup = Some(RuleSetup {
            rule_file: rule_file.into(),
            start_rule: start_rule.into(),
            seed,
            shape_name: shape_name.into(),
            attributes,
            resolve_map,
        });
    }

    /// Finalizes the shape.
    ///
    /// # Errors
    /// [`Status::InvalidArgument`] when geometry or rule setup is missing.
    pub fn create_initial_shape(self) -> EngineResult<InitialShape> {
        let geometry = self.geometry.ok_or_else(|| {
            EngineError::new(Status::InvalidArgument, "initial shape has no geometry")
        })?;
        let setup = self.setup.ok_or_else(|| {
            EngineError::new(Status::InvalidArgument, "initial shape has no rule attributes")
        })?;
        Ok(InitialShape {
            geometry,
            rule_file: setup.rule_file,
            start_rule: setup.start_rule,
            seed: setup.seed,
            shape_name: setup.shape_name,
            attributes: setup.attributes,
            resolve_map: setup.resolve_map,
        })
    }
}

// =============================================================================
// TESTS
// =============================================================================
