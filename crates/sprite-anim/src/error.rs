use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum RegistryError {
    /// The registry document is not well-formed XML.
    #[error("Failed to parse AnimData.xml: {0}")]
    Parse(#[from] quick_xml::Error),

    /// Well-formed tokens that do not make up a single complete document.
    #[error("Failed to parse AnimData.xml: {0}")]
    Malformed(&'static str),

    #[error("Failed to read AnimData.xml: {path}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
