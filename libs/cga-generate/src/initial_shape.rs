//! # Initial Shapes
//!
//! Host-side description of the shapes a generator works on, and their
//! conversion into engine [`InitialShape`]s.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use cga_engine::{
    GeometryCache, InitialShape, InitialShapeBuilder, ResolveMap, RuleEngine, ShapeGeometry,
};
use config::constants::GenerationDefaults;
use tracing::{debug, error};
use url::Url;

use crate::attributes::{overrides_for, AttributeOverrides, AttributeResolver};
use crate::error::{GenerationError, GenerationResult};

// =============================================================================
// DESCRIPTOR
// =============================================================================

/// Geometry of one initial shape: inline buffers or a file reference.
///
/// ## Example
///
/// ```rust
/// use cga_generate::InitialShapeDescriptor;
///
/// let quad = InitialShapeDescriptor::from_vertices(vec![
///     0.0, 0.0, 0.0,
///     0.0, 0.0, 1.0,
///     1.0, 0.0, 1.0,
///     1.0, 0.0, 0.0,
/// ]);
/// assert_eq!(quad.vertex_count(), 4);
/// assert_eq!(quad.face_counts_count(), 1);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub enum InitialShapeDescriptor {
    Inline {
        vertices: Vec<f64>,
        indices: Vec<u32>,
        face_counts: Vec<u32>,
    },
    Path(PathBuf),
}

impl InitialShapeDescriptor {
    /// Single polygon over all vertices in their natural order.
    pub fn from_vertices(vertices: Vec<f64>) -> Self {
        let n = (vertices.len() / 3) as u32;
        Self::Inline {
            vertices,
            indices: (0..n).collect(),
            face_counts: vec![n],
        }
    }

    pub fn with_faces(vertices: Vec<f64>, indices: Vec<u32>, face_counts: Vec<u32>) -> Self {
        Self::Inline {
            vertices,
            indices,
            face_counts,
        }
    }

    pub fn from_path(path: impl Into<PathBuf>) -> Self {
        Self::Path(path.into())
    }

    /// Number of inline vertices; zero for path shapes.
    pub fn vertex_count(&self) -> usize {
        match self {
            Self::Inline { vertices, .. } => vertices.len() / 3,
            Self::Path(_) => 0,
        }
    }

    pub fn index_count(&self) -> usize {
        match self {
            Self::Inline { indices, .. } => indices.len(),
            Self::Path(_) => 0,
        }
    }

    pub fn face_counts_count(&self) -> usize {
        match self {
            Self::Inline { face_counts, .. } => face_counts.len(),
            Self::Path(_) => 0,
        }
    }

    pub fn path(&self) -> Option<&Path> {
        match self {
            Self::Inline { .. } => None,
            Self::Path(path) => Some(path),
        }
    }
}

// =============================================================================
// SHAPE SET
// =============================================================================

/// Everything needed to turn descriptors into engine shapes.
pub struct InitialShapeSet<'a> {
    pub engine: &'a dyn RuleEngine,
    pub defaults: &'a GenerationDefaults,
    pub resolve_map: Option<Arc<ResolveMap>>,
    pub cache: &'a GeometryCache,
}

impl InitialShapeSet<'_> {
    /// Builds one engine shape per descriptor.
    ///
    /// Every descriptor is processed even after a failure so that all
    /// problems are logged; the error names the first failing shape.
    /// `overrides` must already satisfy the override count policy.
    pub fn build(
        &self,
        descriptors: &[InitialShapeDescriptor],
        overrides: &[AttributeOverrides],
    ) -> GenerationResult<Vec<InitialShape>> {
        let resolver = AttributeResolver::new(self.defaults);
        let empty = AttributeOverrides::new();
        let mut shapes = Vec::with_capacity(descriptors.len());
        let mut first_failure: Option<GenerationError> = None;

        for (index, descriptor) in descriptors.iter().enumerate() {
            let set = overrides_for(overrides, index).unwrap_or(&empty);
            match self.build_one(index, descriptor, &resolver, set) {
                Ok(shape) => shapes.push(shape),
                Err(err) => {
                    error!(shape_index = index, "{err}");
                    if first_failure.is_none() {
                        first_failure = Some(err);
                    }
                }
            }
        }

        match first_failure {
            Some(err) => Err(err),
            None => Ok(shapes),
        }
    }

    fn build_one(
        &self,
        index: usize,
        descriptor: &InitialShapeDescriptor,
        resolver: &AttributeResolver<'_>,
        overrides: &AttributeOverrides,
    ) -> GenerationResult<InitialShape> {
        let mut builder = InitialShapeBuilder::new();

        match descriptor {
            InitialShapeDescriptor::Inline {
                vertices,
                indices,
                face_counts,
            } => {
                debug!(shape_index = index, vertices = vertices.len() / 3, "inline geometry");
                let geometry =
                    ShapeGeometry::new(vertices.clone(), indices.clone(), face_counts.clone());
                builder
                    .set_geometry(geometry)
                    .map_err(|e| GenerationError::validation(index, e.message))?;
            }
            InitialShapeDescriptor::Path(path) => {
                let uri = file_uri(path).map_err(|m| GenerationError::validation(index, m))?;
                debug!(shape_index = index, %uri, "geometry from file");
                builder
                    .resolve_geometry(self.engine, &uri, self.resolve_map.as_deref(), self.cache)
                    .map_err(|e| GenerationError::validation(index, e.to_string()))?;
            }
        }

        let resolved = resolver.resolve(overrides);
        builder.set_attributes(
            resolved.rule_file,
            resolved.start_rule,
            resolved.seed,
            resolved.shape_name,
            resolved.attributes,
            self.resolve_map.clone(),
        );
        builder
            .create_initial_shape()
            .map_err(|e| GenerationError::validation(index, e.message))
    }
}

/// Canonical `file://` URI of an existing path.
fn file_uri(path: &Path) -> Result<Url, String> {
    let absolute = fs::canonicalize(path)
        .map_err(|e| format!("path '{}' is not accessible: {e}", path.display()))?;
    Url::from_file_path(&absolute)
        .map_err(|()| format!("path '{}' cannot be expressed as a file URI", absolute.display()))
}

// =============================================================================
// TESTS
// =============================================================================
