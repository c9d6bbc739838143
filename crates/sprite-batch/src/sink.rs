use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SinkError {
    #[error("Failed to create output directory: {path}")]
    CreateDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to write output file: {path}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Destination of processed frames.
pub trait OutputSink {
    /// Whether an output with this name already exists.
    fn contains(&self, name: &str) -> bool;

    /// Store `bytes` under `name`, returning where it ended up.
    fn write(&self, name: &str, bytes: &[u8]) -> Result<PathBuf, SinkError>;
}

/// Writes outputs as files in a single directory.
///
/// Files are staged in a temporary file next to the target and renamed into
/// place, so an interrupted write never leaves a file under the final name.
#[derive(Debug, Clone)]
pub struct DirectorySink {
    dir: PathBuf,
}

impl DirectorySink {
    /// Open `dir`, creating it if absent.
    pub fn create(dir: impl Into<PathBuf>) -> Result<Self, SinkError> {
        let dir = dir.into();
        fs::create_dir_all(&dir).map_err(|source| SinkError::CreateDir {
            path: dir.clone(),
            source,
        })?;
        Ok(Self { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn path_for(&self, name: &str) -> PathBuf {
        self.dir.join(name)
    }
}

impl OutputSink for DirectorySink {
    fn contains(&self, name: &str) -> bool {
        self.path_for(name).is_file()
    }

    fn write(&self, name: &str, bytes: &[u8]) -> Result<PathBuf, SinkError> {
        let path = self.path_for(name);
        let write_err = |source| SinkError::Write {
            path: path.clone(),
            source,
        };
        let mut staged = NamedTempFile::new_in(&self.dir).map_err(write_err)?;
        staged.write_all(bytes).map_err(write_err)?;
        staged.persist(&path).map_err(|e| write_err(e.error))?;
        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn create_makes_nested_directory() {
        let dir = tempdir().unwrap();
        let out = dir.path().join("output_sprites/nested");
        let sink = DirectorySink::create(&out).unwrap();
        assert!(sink.dir().is_dir());
    }

    #[test]
    fn write_then_contains() {
        let dir = tempdir().unwrap();
        let sink = DirectorySink::create(dir.path()).unwrap();
        assert!(!sink.contains("a-b.png"));

        let path = sink.write("a-b.png", b"frame").unwrap();
        assert_eq!(path, dir.path().join("a-b.png"));
        assert!(sink.contains("a-b.png"));
        assert_eq!(fs::read(&path).unwrap(), b"frame");
    }

    #[test]
    fn write_leaves_no_staging_files() {
        let dir = tempdir().unwrap();
        let sink = DirectorySink::create(dir.path()).unwrap();
        sink.write("x.png", b"1").unwrap();
        sink.write("x.png", b"2").unwrap();

        let names: Vec<_> = fs::read_dir(dir.path())
            .unwrap()
            .map(|e| e.unwrap().file_name())
            .collect();
        assert_eq!(names, vec!["x.png"]);
        assert_eq!(fs::read(dir.path().join("x.png")).unwrap(), b"2");
    }
}
