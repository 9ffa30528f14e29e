//! Descriptor storage seam and the local repository implementation.

use anyhow::Result;
use std::path::{Path, PathBuf};

use super::Descriptor;
use crate::core::DepvizError;
use crate::tree::Coordinate;

/// Capability to fetch the raw descriptor for a coordinate.
///
/// `Ok(None)` means the artifact has no descriptor, which callers treat as
/// "no metadata". An `Err` means a descriptor exists but could not be used.
pub trait DescriptorSource {
    fn fetch(&self, coordinate: &Coordinate) -> Result<Option<Descriptor>>;
}

/// Descriptor repository on the local filesystem.
///
/// Descriptors are laid out the way artifact repositories store project
/// files, with the group split on dots:
///
/// ```text
/// <root>/org/example/core/1.0.0/core-1.0.0.toml
/// ```
#[derive(Debug, Clone)]
pub struct LocalRepository {
    root: PathBuf,
}

impl LocalRepository {
    /// Create a repository rooted at `root`. The directory does not have to
    /// exist; lookups against a missing root simply find no descriptors.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
        }
    }

    /// The repository root directory.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Filesystem location of the descriptor for a coordinate.
    pub fn descriptor_path(&self, coordinate: &Coordinate) -> PathBuf {
        let mut path = self.root.clone();
        for segment in coordinate.group.split('.') {
            path.push(segment);
        }
        path.push(&coordinate.artifact);
        path.push(&coordinate.version);
        path.push(format!("{}-{}.toml", coordinate.artifact, coordinate.version));
        path
    }
}

impl DescriptorSource for LocalRepository {
    fn fetch(&self, coordinate: &Coordinate) -> Result<Option<Descriptor>> {
        let path = self.descriptor_path(coordinate);
        if !path.exists() {
            tracing::trace!("no descriptor for {} at {}", coordinate, path.display());
            return Ok(None);
        }

        let content = std::fs::read_to_string(&path).map_err(|e| DepvizError::Resolution {
            coordinate: coordinate.to_string(),
            reason: format!("failed to read {}: {e}", path.display()),
        })?;
        let descriptor = Descriptor::parse(&content).map_err(|e| DepvizError::Resolution {
            coordinate: coordinate.to_string(),
            reason: format!("failed to parse {}: {e}", path.display()),
        })?;
        Ok(Some(descriptor))
    }
}
