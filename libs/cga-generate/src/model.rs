//! # Generated Models
//!
//! Per-shape result records returned by in-memory generation.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// One CGA report value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ReportValue {
    Float(f64),
    String(String),
    Bool(bool),
}

impl ReportValue {
    pub fn as_float(&self) -> Option<f64> {
        match self {
            ReportValue::Float(f) => Some(*f),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            ReportValue::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            ReportValue::Bool(b) => Some(*b),
            _ => None,
        }
    }
}

impl fmt::Display for ReportValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReportValue::Float(v) => write!(f, "{v}"),
            ReportValue::String(v) => f.write_str(v),
            ReportValue::Bool(v) => write!(f, "{v}"),
        }
    }
}

/// Merged geometry and reports of one initial shape.
///
/// `indices` address `vertices` (three coordinates per vertex);
/// `face_counts` partitions `indices` into faces.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GeneratedModel {
    shape_index: u32,
    vertices: Vec<f64>,
    indices: Vec<u32>,
    face_counts: Vec<u32>,
    report: BTreeMap<String, ReportValue>,
}

impl GeneratedModel {
    pub(crate) fn new(
        shape_index: u32,
        vertices: Vec<f64>,
        indices: Vec<u32>,
        face_counts: Vec<u32>,
        report: BTreeMap<String, ReportValue>,
    ) -> Self {
        Self {
            shape_index,
            vertices,
            indices,
            face_counts,
            report,
        }
    }

    /// Position of the source shape in the generator's shape list.
    pub fn initial_shape_index(&self) -> u32 {
        self.shape_index
    }

    pub fn vertices(&self) -> &[f64] {
        &self.vertices
    }

    pub fn indices(&self) -> &[u32] {
        &self.indices
    }

    pub fn face_counts(&self) -> &[u32] {
        &self.face_counts
    }

    pub fn report(&self) -> &BTreeMap<String, ReportValue> {
        &self.report
    }
}
