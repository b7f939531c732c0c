//! Shared fixtures for the generator integration tests.

#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use cga_engine::{
    AttributeMap, EncoderSpec, EngineContext, EngineResult, GeometryCache, InitialShape,
    OutputCallbacks, ReferenceEngine, ResolveMap, RuleEngine, ShapeGeometry,
};
use cga_generate::{AttributeOverrides, InitialShapeDescriptor};
use serde_json::Value;
use url::Url;

/// Reference engine that counts its generate calls.
#[derive(Default)]
pub struct CountingEngine {
    inner: ReferenceEngine,
    generate_calls: AtomicUsize,
}

impl CountingEngine {
    pub fn generate_calls(&self) -> usize {
        self.generate_calls.load(Ordering::SeqCst)
    }
}

impl RuleEngine for CountingEngine {
    fn resolve_package(&self, package: &Url) -> EngineResult<ResolveMap> {
        self.inner.resolve_package(package)
    }

    fn resolve_geometry(
        &self,
        uri: &Url,
        resolve_map: Option<&ResolveMap>,
        cache: &GeometryCache,
    ) -> EngineResult<Arc<ShapeGeometry>> {
        self.inner.resolve_geometry(uri, resolve_map, cache)
    }

    fn validate_options(&self, encoder_id: &str, options: &AttributeMap) -> EngineResult<AttributeMap> {
        self.inner.validate_options(encoder_id, options)
    }

    fn generate(
        &self,
        shapes: &[InitialShape],
        encoders: &[EncoderSpec],
        callbacks: &dyn OutputCallbacks,
        cache: &GeometryCache,
    ) -> EngineResult<()> {
        self.generate_calls.fetch_add(1, Ordering::SeqCst);
        self.inner.generate(shapes, encoders, callbacks, cache)
    }
}

/// Context running a fresh counting engine.
pub fn counting_context() -> (Arc<EngineContext>, Arc<CountingEngine>) {
    let engine = Arc::new(CountingEngine::default());
    let context = Arc::new(EngineContext::new());
    context.initialize(engine.clone());
    (context, engine)
}

/// Writes a rule package providing the default rule file.
pub fn write_package(dir: &Path) -> PathBuf {
    let path = dir.join("rules.json");
    fs::write(&path, r#"{ "rules": ["bin/rule.cgb"] }"#).unwrap();
    path
}

/// Axis-aligned box of 8 vertices and 6 quads, offset along x.
pub fn unit_box(x: f64) -> InitialShapeDescriptor {
    let vertices = vec![
        x, 0.0, 0.0, x + 1.0, 0.0, 0.0, x + 1.0, 0.0, 1.0, x, 0.0, 1.0, //
        x, 1.0, 0.0, x + 1.0, 1.0, 0.0, x + 1.0, 1.0, 1.0, x, 1.0, 1.0,
    ];
    let indices = vec![
        0, 1, 2, 3, // bottom
        7, 6, 5, 4, // top
        0, 4, 5, 1, //
        1, 5, 6, 2, //
        2, 6, 7, 3, //
        3, 7, 4, 0,
    ];
    InitialShapeDescriptor::with_faces(vertices, indices, vec![4; 6])
}

/// The 8 corners of a unit box as one face of 8 indices, offset along x.
pub fn octagon_box(x: f64) -> InitialShapeDescriptor {
    InitialShapeDescriptor::with_faces(
        vec![
            x, 0.0, 0.0, x + 1.0, 0.0, 0.0, x + 1.0, 0.0, 1.0, x, 0.0, 1.0, //
            x, 1.0, 0.0, x + 1.0, 1.0, 0.0, x + 1.0, 1.0, 1.0, x, 1.0, 1.0,
        ],
        (0..8).collect(),
        vec![8],
    )
}

pub fn quad(x: f64) -> InitialShapeDescriptor {
    InitialShapeDescriptor::from_vertices(vec![
        x, 0.0, 0.0, x, 0.0, 1.0, x + 1.0, 0.0, 1.0, x + 1.0, 0.0, 0.0,
    ])
}

pub fn overrides(value: Value) -> AttributeOverrides {
    value.as_object().cloned().unwrap()
}
