//! Dependency tree input model.
//!
//! Dependency resolution happens outside of depviz. An external resolver
//! walks a project, decides which artifact versions win, and exports the
//! result as one JSON tree per project. This module defines the read-only
//! model for those files and the loader that turns them into
//! [`DependencyNode`] values.
//!
//! A tree file looks like this:
//!
//! ```json
//! {
//!   "group": "org.example", "artifact": "app", "version": "1.0.0",
//!   "packaging": "jar",
//!   "children": [
//!     {
//!       "group": "org.example", "artifact": "core", "version": "1.0.0",
//!       "scope": "compile",
//!       "parent": { "group": "org.example", "artifact": "app", "version": "1.0.0" },
//!       "children": []
//!     }
//!   ]
//! }
//! ```
//!
//! Only the coordinate fields are mandatory. `state` records why a node was
//! kept or dropped by the resolver's conflict mediation; omitted nodes are
//! still present in the tree so they can be drawn when requested.

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;

use crate::core::DepvizError;

/// The `(group, artifact, version)` identity of a resolvable artifact.
///
/// Coordinates are the sole identity used for annotation caching and for
/// node deduplication across trees. Two nodes with equal coordinates are
/// the same artifact no matter where in which tree they appear.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Coordinate {
    /// Group identifier, e.g. `org.example`
    pub group: String,
    /// Artifact identifier within the group
    pub artifact: String,
    /// Resolved version string
    pub version: String,
}

impl Coordinate {
    /// Create a coordinate from its three components.
    pub fn new(
        group: impl Into<String>,
        artifact: impl Into<String>,
        version: impl Into<String>,
    ) -> Self {
        Self {
            group: group.into(),
            artifact: artifact.into(),
            version: version.into(),
        }
    }

    /// Parse a `group:artifact:version` string.
    pub fn parse(value: &str) -> Result<Self> {
        let mut parts = value.split(':');
        match (parts.next(), parts.next(), parts.next(), parts.next()) {
            (Some(group), Some(artifact), Some(version), None)
                if !group.is_empty() && !artifact.is_empty() && !version.is_empty() =>
            {
                Ok(Self::new(group, artifact, version))
            }
            _ => Err(DepvizError::InvalidCoordinate {
                value: value.to_string(),
            }
            .into()),
        }
    }
}

impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}:{}", self.group, self.artifact, self.version)
    }
}

/// Dependency scope of an edge, as reported by the external resolver.
///
/// The well-known scopes get their own variants; anything else is carried
/// through verbatim so scope filters can match resolver-specific scopes.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Scope {
    Compile,
    Provided,
    Runtime,
    Test,
    System,
    Import,
    #[serde(untagged)]
    Other(String),
}

impl Scope {
    /// The scope name; unknown scopes keep the tree's casing.
    pub fn as_str(&self) -> &str {
        match self {
            Self::Compile => "compile",
            Self::Provided => "provided",
            Self::Runtime => "runtime",
            Self::Test => "test",
            Self::System => "system",
            Self::Import => "import",
            Self::Other(name) => name,
        }
    }
}

impl fmt::Display for Scope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Conflict mediation outcome for a node.
///
/// `Included` nodes are part of the resolved set; the omitted states mark
/// nodes the resolver kept in the tree for reporting purposes but excluded
/// from resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum NodeState {
    #[default]
    Included,
    OmittedForConflict,
    OmittedForDuplicate,
    OmittedForCycle,
}

impl NodeState {
    /// Whether this node was excluded from the resolved set.
    pub const fn is_omitted(self) -> bool {
        !matches!(self, Self::Included)
    }
}

/// One node of a resolved dependency tree.
///
/// The root node of a tree file is the project itself; every other node is a
/// (possibly transitive) dependency. The structure is read-only input: depviz
/// never mutates trees, it only decides what to draw from them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DependencyNode {
    /// Artifact identity
    #[serde(flatten)]
    pub coordinate: Coordinate,
    /// Packaging type (`jar`, `pom`, `war`, ...), defaults to `jar`
    #[serde(default = "default_packaging")]
    pub packaging: String,
    /// Scope of the edge leading to this node, if any
    #[serde(default)]
    pub scope: Option<Scope>,
    /// Whether the edge leading to this node is optional
    #[serde(default)]
    pub optional: bool,
    /// Conflict mediation state
    #[serde(default)]
    pub state: NodeState,
    /// Declared parent coordinate, used to detect linkage mismatches
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent: Option<Coordinate>,
    /// Direct dependencies in declaration order
    #[serde(default)]
    pub children: Vec<DependencyNode>,
}

fn default_packaging() -> String {
    "jar".to_string()
}

impl DependencyNode {
    /// Create a bare node for the given coordinate with `jar` packaging.
    pub fn new(coordinate: Coordinate) -> Self {
        Self {
            coordinate,
            packaging: default_packaging(),
            scope: None,
            optional: false,
            state: NodeState::default(),
            parent: None,
            children: Vec::new(),
        }
    }

    /// Total number of nodes in this subtree, the node itself included.
    pub fn count(&self) -> usize {
        1 + self.children.iter().map(Self::count).sum::<usize>()
    }
}

/// Load one dependency tree from a JSON file.
///
/// An unreadable or malformed tree file is fatal, there is nothing to draw
/// without it.
pub fn load_tree(path: &Path) -> Result<DependencyNode> {
    let content = std::fs::read_to_string(path).map_err(|e| DepvizError::TreeParse {
        file: path.display().to_string(),
        reason: e.to_string(),
    })?;
    let tree: DependencyNode =
        serde_json::from_str(&content).map_err(|e| DepvizError::TreeParse {
            file: path.display().to_string(),
            reason: e.to_string(),
        })?;
    tracing::debug!(
        "loaded dependency tree for {} ({} nodes) from {}",
        tree.coordinate,
        tree.count(),
        path.display()
    );
    Ok(tree)
}

/// Load several tree files, preserving the given order.
///
/// The order matters: the roots of these trees form the set of aggregated
/// projects, and the first occurrence of a coordinate decides its node
/// attributes when trees overlap.
pub fn load_trees(paths: &[impl AsRef<Path>]) -> Result<Vec<DependencyNode>> {
    paths.iter().map(|p| load_tree(p.as_ref())).collect()
}
