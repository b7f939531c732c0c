//! # Output Callbacks
//!
//! The engine pushes generated output through [`OutputCallbacks`]. In-memory
//! encoders call the geometry/report/index methods; file encoders call
//! [`OutputCallbacks::on_file`].
//!
//! Implementations must be `Send + Sync`: the engine may invoke callbacks for
//! different shapes concurrently from worker threads.

use std::collections::{BTreeMap, HashSet};
use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Component, Path, PathBuf};

use parking_lot::Mutex;
use tracing::debug;

use crate::error::{EngineError, EngineResult, Status};

/// Float-valued CGA report entries.
pub type FloatReport = BTreeMap<String, f64>;
/// String-valued CGA report entries.
pub type StringReport = BTreeMap<String, String>;
/// Bool-valued CGA report entries.
pub type BoolReport = BTreeMap<String, bool>;

/// Sink for everything the engine emits during one generate call.
pub trait OutputCallbacks: Send + Sync {
    /// Delivers a batch of geometry for `shape_index`.
    ///
    /// Face indices refer to positions in this call's `vertices` buffer.
    fn on_geometry(&self, shape_index: u32, vertices: &[f64], faces: &[Vec<u32>]);

    /// Delivers CGA report values for `shape_index`.
    fn on_reports(
        &self,
        shape_index: u32,
        floats: &FloatReport,
        strings: &StringReport,
        bools: &BoolReport,
    );

    /// Signals that no more data will arrive for `shape_index`.
    fn on_index_ack(&self, shape_index: u32);

    /// Delivers encoded file contents. The first write of a name in one
    /// generate call replaces the file, later writes append.
    fn on_file(&self, shape_index: u32, name: &str, contents: &[u8]) -> EngineResult<()> {
        let _ = (shape_index, name, contents);
        Ok(())
    }
}

/// Writes encoded files into a directory; ignores in-memory output.
///
/// ## Example
///
/// ```rust
/// use cga_engine::{FileOutputCallbacks, OutputCallbacks};
///
/// let dir = std::env::temp_dir();
/// let callbacks = FileOutputCallbacks::new(&dir).unwrap();
/// assert_eq!(callbacks.directory(), dir.as_path());
/// ```
#[derive(Debug)]
pub struct FileOutputCallbacks {
    directory: PathBuf,
    written: Mutex<HashSet<String>>,
}

impl FileOutputCallbacks {
    /// Binds the callbacks to an existing directory.
    ///
    /// # Errors
    /// [`Status::FileNotFound`] when `directory` is not an existing directory.
    pub fn new(directory: impl Into<PathBuf>) -> EngineResult<Self> {
        let directory = directory.into();
        if !directory.is_dir() {
            return Err(EngineError::new(
                Status::FileNotFound,
                format!("'{}' is not a directory", directory.display()),
            ));
        }
        Ok(Self {
            directory,
            written: Mutex::new(HashSet::new()),
        })
    }

    pub fn directory(&self) -> &Path {
        &self.directory
    }
}

impl OutputCallbacks for FileOutputCallbacks {
    fn on_geometry(&self, _shape_index: u32, _vertices: &[f64], _faces: &[Vec<u32>]) {}

    fn on_reports(
        &self,
        _shape_index: u32,
        _floats: &FloatReport,
        _strings: &StringReport,
        _bools: &BoolReport,
    ) {
    }

    fn on_index_ack(&self, _shape_index: u32) {}

    fn on_file(&self, shape_index: u32, name: &str, contents: &[u8]) -> EngineResult<()> {
        let mut components = Path::new(name).components();
        let plain = matches!(components.next(), Some(Component::Normal(_))) && components.next().is_none();
        if !plain {
            return Err(EngineError::new(
                Status::InvalidArgument,
                format!("invalid output file name '{}'", name),
            ));
        }
        let path = self.directory.join(name);

        // Held across the write so appends from different shapes never interleave.
        let mut written = self.written.lock();
        let first = written.insert(name.to_string());
        let mut file = OpenOptions::new()
            .create(true)
            .write(true)
            .append(!first)
            .truncate(first)
            .open(&path)
            .map_err(|e| EngineError::new(Status::WriteError, format!("{}: {}", path.display(), e)))?;
        file.write_all(contents)
            .map_err(|e| EngineError::new(Status::WriteError, format!("{}: {}", path.display(), e)))?;
        debug!(shape_index, file = %path.display(), bytes = contents.len(), "wrote encoder output");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejects_missing_directory() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope");
        let err = FileOutputCallbacks::new(&missing).unwrap_err();
        assert_eq!(err.status, Status::FileNotFound);
    }

    #[test]
    fn test_first_write_replaces_then_appends() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("out.txt"), "stale\n").unwrap();

        let callbacks = FileOutputCallbacks::new(dir.path()).unwrap();
        callbacks.on_file(0, "out.txt", b"a\n").unwrap();
        callbacks.on_file(1, "out.txt", b"b\n").unwrap();

        let text = std::fs::read_to_string(dir.path().join("out.txt")).unwrap();
        assert_eq!(text, "a\nb\n");
    }

    #[test]
    fn test_rejects_nested_names() {
        let dir = tempfile::tempdir().unwrap();
        let callbacks = FileOutputCallbacks::new(dir.path()).unwrap();
        assert!(callbacks.on_file(0, "../escape.txt", b"x").is_err());
        assert!(callbacks.on_file(0, "", b"x").is_err());
    }
}
