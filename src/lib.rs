//! Depviz - dependency graph visualizer
//!
//! Depviz turns resolved dependency trees into annotated Graphviz graphs.
//! The trees themselves come from an external resolver and are handed over as
//! JSON files; depviz decides which nodes and edges are worth drawing, looks
//! up per-artifact annotation metadata (web site URL, custom color) from a
//! local descriptor repository, and drives the external `dot` layout tool to
//! produce the final image plus an optional clickable image map.
//!
//! # Pipeline
//!
//! 1. Load one dependency tree per aggregated project ([`tree`]).
//! 2. Walk the trees, cascading scope/optional flags, applying the configured
//!    hide filters and deduplicating nodes by coordinate ([`graph`]).
//! 3. For every surviving node, resolve annotation data through a run-scoped
//!    memoizing cache backed by the descriptor repository ([`annotate`],
//!    [`descriptor`]).
//! 4. Serialize the graph to DOT and invoke `dot` to lay it out ([`render`]).
//!
//! # Core Modules
//!
//! - [`cli`] - Command-line interface (`render` and `report` subcommands)
//! - [`config`] - Run configuration: hide filters, label, direction, colors
//! - [`core`] - Error types and user-facing error reporting
//! - [`tree`] - Dependency tree input model and JSON loading
//! - [`descriptor`] - Project descriptors and effective model resolution
//! - [`annotate`] - Annotation cache, color rules and URL resolution
//! - [`graph`] - Graph construction: filters, cascade, dedup, labels
//! - [`render`] - DOT emission, `dot` subprocess handling, map read-back
//!
//! # Example
//!
//! ```bash
//! # Render two project trees into one deduplicated graph
//! depviz render app-tree.json lib-tree.json \
//!     --target target/dependency-graph.png \
//!     --hide-scopes test,provided \
//!     --color team=platform:#6495ED
//!
//! # Generate a report page with a clickable image map
//! depviz report app-tree.json lib-tree.json --output-dir target/site
//! ```

pub mod annotate;
pub mod cli;
pub mod config;
pub mod core;
pub mod descriptor;
pub mod graph;
pub mod render;
pub mod tree;

// Test utilities (only available in test builds or with test-utils feature)
#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;
