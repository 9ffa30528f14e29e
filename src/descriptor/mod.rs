//! Project descriptors and effective model resolution.
//!
//! Annotation data (web site URL, color-relevant properties) lives in small
//! TOML project descriptors stored in a local artifact repository. Fetching
//! descriptors is hidden behind the [`DescriptorSource`] seam so the storage
//! layout stays an implementation detail; the bundled [`LocalRepository`]
//! reads them from a Maven-style directory tree.
//!
//! [`MetadataResolver`] turns a coordinate into an [`EffectiveModel`] by
//! walking the declared parent chain, merging ancestor values under the
//! child's, and interpolating `${...}` placeholders.
//!
//! # Descriptor format
//!
//! ```toml
//! [project]
//! group = "org.example"
//! artifact = "core"
//! version = "1.0.0"
//! url = "https://example.org/projects/${project.artifactId}"
//!
//! [project.parent]
//! group = "org.example"
//! artifact = "parent"
//! version = "7"
//!
//! [properties]
//! team = "platform"
//! ```

mod resolver;
pub mod source;

pub use resolver::{EffectiveModel, MetadataResolver};
pub use source::{DescriptorSource, LocalRepository};

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::tree::Coordinate;

/// A parsed project descriptor, before parent merging and interpolation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Descriptor {
    /// The `[project]` table
    #[serde(default)]
    pub project: ProjectSection,
    /// Free-form `[properties]` string table
    #[serde(default)]
    pub properties: BTreeMap<String, String>,
}

/// The `[project]` table of a descriptor.
///
/// All fields are optional: a child descriptor routinely omits `group` and
/// `version` and inherits them from its parent.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProjectSection {
    pub group: Option<String>,
    pub artifact: Option<String>,
    pub version: Option<String>,
    /// Project web site, inherited from the parent when unset
    pub url: Option<String>,
    /// Declared parent, the next link of the ancestor chain
    pub parent: Option<ParentRef>,
}

/// Full coordinate of a declared parent project.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParentRef {
    pub group: String,
    pub artifact: String,
    pub version: String,
}

impl ParentRef {
    /// The parent's coordinate.
    pub fn coordinate(&self) -> Coordinate {
        Coordinate::new(&self.group, &self.artifact, &self.version)
    }
}

impl Descriptor {
    /// Parse a descriptor from TOML text.
    pub fn parse(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(content)
    }
}
