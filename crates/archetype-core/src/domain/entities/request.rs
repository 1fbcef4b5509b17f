//! A single reification request: where to write, with which metadata.

use std::path::{Path, PathBuf};

use crate::domain::{Encoding, Metadata};

/// Transient description of one reification.
///
/// Built with [`ReificationRequest::new`] and refined with the `with_*`
/// methods; metadata defaults to an empty mapping and the encoding to UTF-8.
#[derive(Debug, Clone, PartialEq)]
pub struct ReificationRequest {
    target_directory: PathBuf,
    metadata: Metadata,
    encoding: Encoding,
}

impl ReificationRequest {
    pub fn new(target_directory: impl Into<PathBuf>) -> Self {
        Self {
            target_directory: target_directory.into(),
            metadata: Metadata::default(),
            encoding: Encoding::default(),
        }
    }

    pub fn with_metadata(mut self, metadata: Metadata) -> Self {
        self.metadata = metadata;
        self
    }

    pub fn with_encoding(mut self, encoding: Encoding) -> Self {
        self.encoding = encoding;
        self
    }

    pub fn target_directory(&self) -> &Path {
        &self.target_directory
    }

    pub fn metadata(&self) -> &Metadata {
        &self.metadata
    }

    pub fn encoding(&self) -> Encoding {
        self.encoding
    }
}
