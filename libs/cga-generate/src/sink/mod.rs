//! # Result Sink
//!
//! Collects the engine's callback stream of one generate call and
//! reassembles it into ordered [`GeneratedModel`]s.
//!
//! Callbacks for different shapes may arrive interleaved and from several
//! threads. State is kept per shape index in a sharded map, so concurrent
//! callbacks only contend when they hit the same shard.

use std::collections::BTreeMap;

use cga_engine::{BoolReport, FloatReport, OutputCallbacks, StringReport};
use dashmap::DashMap;
use tracing::{debug, warn};

use crate::model::{GeneratedModel, ReportValue};

#[derive(Debug, Default)]
struct PartialResult {
    vertices: Vec<f64>,
    indices: Vec<u32>,
    face_counts: Vec<u32>,
    report: BTreeMap<String, ReportValue>,
    has_geometry: bool,
    sealed: bool,
}

/// In-memory [`OutputCallbacks`] for one generate call.
///
/// ## Example
///
/// ```rust
/// use cga_engine::OutputCallbacks;
/// use cga_generate::ResultSink;
///
/// let sink = ResultSink::new();
/// sink.on_geometry(3, &[0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 0.0, 1.0], &[vec![0, 1, 2]]);
/// sink.on_geometry(1, &[0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 0.0, 1.0], &[vec![0, 1, 2]]);
///
/// let models = sink.drain();
/// let order: Vec<u32> = models.iter().map(|m| m.initial_shape_index()).collect();
/// assert_eq!(order, vec![1, 3]);
/// ```
#[derive(Debug, Default)]
pub struct ResultSink {
    entries: DashMap<u32, PartialResult>,
}

impl ResultSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of shape indices referenced so far.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Finishes the session: one model per index that received geometry,
    /// ascending by index.
    pub fn drain(self) -> Vec<GeneratedModel> {
        let mut entries: Vec<(u32, PartialResult)> = self.entries.into_iter().collect();
        entries.sort_unstable_by_key(|(index, _)| *index);

        entries
            .into_iter()
            .filter_map(|(index, partial)| {
                if !partial.sealed {
                    debug!(shape_index = index, "shape was never acknowledged");
                }
                if !partial.has_geometry {
                    debug!(shape_index = index, "no geometry received, dropping");
                    return None;
                }
                Some(GeneratedModel::new(
                    index,
                    partial.vertices,
                    partial.indices,
                    partial.face_counts,
                    partial.report,
                ))
            })
            .collect()
    }
}

impl OutputCallbacks for ResultSink {
    fn on_geometry(&self, shape_index: u32, vertices: &[f64], faces: &[Vec<u32>]) {
        let mut entry = self.entries.entry(shape_index).or_default();
        let entry = entry.value_mut();
        if entry.sealed {
            warn!(shape_index, "geometry after acknowledgement");
        }

        let (Ok(offset), Ok(batch_vertices)) = (
            u32::try_from(entry.vertices.len() / 3),
            u32::try_from(vertices.len() / 3),
        ) else {
            warn!(shape_index, "vertex count exceeds index range, dropping geometry batch");
            return;
        };

        entry.vertices.extend_from_slice(vertices);
        for face in faces {
            // Indices must address this batch and stay addressable once rebased.
            let rebased: Option<Vec<u32>> = face
                .iter()
                .map(|&i| if i < batch_vertices { i.checked_add(offset) } else { None })
                .collect();
            match rebased {
                Some(indices) => {
                    entry.face_counts.push(indices.len() as u32);
                    entry.indices.extend(indices);
                }
                None => warn!(shape_index, ?face, "face index outside its vertex batch, dropping face"),
            }
        }
        entry.has_geometry = true;
    }

    fn on_reports(
        &self,
        shape_index: u32,
        floats: &FloatReport,
        strings: &StringReport,
        bools: &BoolReport,
    ) {
        let mut entry = self.entries.entry(shape_index).or_default();
        let report = &mut entry.value_mut().report;
        for (key, value) in floats {
            report.insert(key.clone(), ReportValue::Float(*value));
        }
        for (key, value) in strings {
            report.insert(key.clone(), ReportValue::String(value.clone()));
        }
        for (key, value) in bools {
            report.insert(key.clone(), ReportValue::Bool(*value));
        }
    }

    fn on_index_ack(&self, shape_index: u32) {
        self.entries.entry(shape_index).or_default().sealed = true;
    }
}
