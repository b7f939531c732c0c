//! # Resolve Map and Cache
//!
//! The resolve map indexes the assets of a rule package by name. The geometry
//! cache keeps geometry loaded from file URIs so repeated generations reuse it.

use std::collections::BTreeMap;
use std::sync::Arc;

use dashmap::DashMap;
use url::Url;

use crate::error::EngineResult;
use crate::shape::ShapeGeometry;

/// Asset name to location index of one rule package.
///
/// ## Example
///
/// ```rust
/// use cga_engine::ResolveMap;
/// use url::Url;
///
/// let package = Url::parse("file:///rules/city.json").unwrap();
/// let mut map = ResolveMap::new(package.clone());
/// map.insert("bin/rule.cgb", package.clone());
/// assert!(map.contains("bin/rule.cgb"));
/// assert_eq!(map.len(), 1);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct ResolveMap {
    package: Url,
    entries: BTreeMap<String, Url>,
}

impl ResolveMap {
    #[must_use]
    pub fn new(package: Url) -> Self {
        Self {
            package,
            entries: BTreeMap::new(),
        }
    }

    /// URI of the package this map was resolved from.
    pub fn package(&self) -> &Url {
        &self.package
    }

    pub fn insert(&mut self, key: impl Into<String>, location: Url) {
        self.entries.insert(key.into(), location);
    }

    pub fn get(&self, key: &str) -> Option<&Url> {
        self.entries.get(key)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Concurrent cache of geometry loaded from URIs.
#[derive(Debug, Default)]
pub struct GeometryCache {
    geometry: DashMap<Url, Arc<ShapeGeometry>>,
}

impl GeometryCache {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, uri: &Url) -> Option<Arc<ShapeGeometry>> {
        self.geometry.get(uri).map(|entry| Arc::clone(entry.value()))
    }

    /// Returns the cached geometry for `uri`, loading and storing it on a miss.
    ///
    /// The loader runs outside the map's locks; concurrent misses for the same
    /// URI may both load, and the first stored value wins.
    pub fn get_or_load<F>(&self, uri: &Url, load: F) -> EngineResult<Arc<ShapeGeometry>>
    where
        F: FnOnce() -> EngineResult<ShapeGeometry>,
    {
        if let Some(hit) = self.get(uri) {
            return Ok(hit);
        }
        let loaded = Arc::new(load()?);
        let entry = self.geometry.entry(uri.clone()).or_insert(loaded);
        Ok(Arc::clone(entry.value()))
    }

    pub fn len(&self) -> usize {
        self.geometry.len()
    }

    pub fn is_empty(&self) -> bool {
        self.geometry.is_empty()
    }

    pub fn clear(&self) {
        self.geometry.clear();
    }
}
