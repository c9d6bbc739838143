use std::io::ErrorKind;
use std::path::PathBuf;

use log::debug;

use crate::error::FetchError;
use crate::fetcher::AssetFetcher;

/// Reads assets from `<root>/<entity>/<file>` on the local filesystem.
///
/// A missing file is reported as absent; there is no retry.
#[derive(Debug, Clone)]
pub struct LocalFetcher {
    root: PathBuf,
}

impl LocalFetcher {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn path_for(&self, entity_path: &str, filename: &str) -> PathBuf {
        self.root.join(entity_path).join(filename)
    }
}

impl Default for LocalFetcher {
    fn default() -> Self {
        Self::new(".")
    }
}

impl AssetFetcher for LocalFetcher {
    fn fetch(&self, entity_path: &str, filename: &str) -> Result<Option<Vec<u8>>, FetchError> {
        let path = self.path_for(entity_path, filename);
        match std::fs::read(&path) {
            Ok(bytes) => Ok(Some(bytes)),
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!("{} not found", path.display());
                Ok(None)
            }
            Err(source) => Err(FetchError::Io { path, source }),
        }
    }
}
