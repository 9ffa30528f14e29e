//! Rendered-graph construction from dependency trees.
//!
//! This module turns one or more [`DependencyNode`] trees into a single
//! [`RenderedGraph`]: a directed graph of annotated, display-ready nodes.
//! Construction is where all the visualization policy lives, in this order
//! per visited node:
//!
//! 1. scope/optional cascading along the path from the root,
//! 2. the filter chain (hidden scopes, optional, omitted, poms, transitive,
//!    external), which prunes the whole subtree under a dropped node,
//! 3. cross-tree deduplication by coordinate, keeping every surviving edge,
//! 4. annotation (label, URL, color) of the nodes that remain.
//!
//! Roots are exempt from filtering. A multi-module aggregator is usually
//! `pom`-packaged, and the default filter set would otherwise erase the very
//! projects being visualized.

use std::collections::{HashMap, HashSet};

use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::visit::EdgeRef;

use crate::annotate::{AnnotationCache, Color, UrlResolver};
use crate::config::VisualizerConfig;
use crate::core::DepvizError;
use crate::tree::{Coordinate, DependencyNode, Scope};

/// A display-ready dependency node.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderedNode {
    /// Artifact identity, also the deduplication key
    pub coordinate: Coordinate,
    /// Label text composed according to the `hide_*` label toggles
    pub label: String,
    /// Hyperlink target, if one resolved
    pub url: Option<String>,
    /// Fill color decided by the color rules, if any matched
    pub color: Option<Color>,
    /// Whether this coordinate is one of the visualized project roots
    pub root: bool,
    /// Whether every occurrence of this node was optional
    pub optional: bool,
}

/// A dependency edge between two rendered nodes.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderedEdge {
    /// Effective scope after cascading, `None` when the tree declares none
    pub scope: Option<Scope>,
    /// Effective optional flag after cascading
    pub optional: bool,
    /// Whether the child was omitted from the resolved set
    pub omitted: bool,
}

/// The deduplicated graph handed to the renderer.
///
/// Nodes are unique per coordinate; parallel edges between the same pair of
/// nodes are kept only when their attributes differ. Scoped to one run and
/// discarded after rendering.
pub struct RenderedGraph {
    graph: DiGraph<RenderedNode, RenderedEdge>,
    node_map: HashMap<Coordinate, NodeIndex>,
}

impl RenderedGraph {
    pub fn new() -> Self {
        Self {
            graph: DiGraph::new(),
            node_map: HashMap::new(),
        }
    }

    /// Add a node, or merge into the node already registered for its
    /// coordinate.
    ///
    /// Merging keeps the first occurrence's annotation, promotes the node to
    /// a root if any occurrence is one, and treats it as optional only if
    /// every occurrence is.
    fn ensure_node(&mut self, node: RenderedNode) -> NodeIndex {
        if let Some(&index) = self.node_map.get(&node.coordinate) {
            let existing = &mut self.graph[index];
            existing.root |= node.root;
            existing.optional &= node.optional;
            index
        } else {
            let coordinate = node.coordinate.clone();
            let index = self.graph.add_node(node);
            self.node_map.insert(coordinate, index);
            index
        }
    }

    /// Add an edge unless an identical one already connects the pair.
    fn connect(&mut self, from: NodeIndex, to: NodeIndex, edge: RenderedEdge) {
        let duplicate = self.graph.edges_connecting(from, to).any(|e| *e.weight() == edge);
        if !duplicate {
            self.graph.add_edge(from, to, edge);
        }
    }

    /// The rendered node registered for a coordinate, if it survived.
    pub fn get(&self, coordinate: &Coordinate) -> Option<&RenderedNode> {
        self.node_map.get(coordinate).map(|&index| &self.graph[index])
    }

    /// All nodes, in insertion order.
    pub fn nodes(&self) -> impl Iterator<Item = &RenderedNode> {
        self.graph.node_weights()
    }

    /// All edges as `(from, to, edge)` triples.
    pub fn edges(&self) -> impl Iterator<Item = (&RenderedNode, &RenderedNode, &RenderedEdge)> {
        self.graph.edge_references().map(|edge| {
            (
                &self.graph[edge.source()],
                &self.graph[edge.target()],
                edge.weight(),
            )
        })
    }

    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    pub fn is_empty(&self) -> bool {
        self.graph.node_count() == 0
    }

    /// Whether deduplication produced a proper DAG.
    pub fn is_acyclic(&self) -> bool {
        !petgraph::algo::is_cyclic_directed(&self.graph)
    }
}

impl Default for RenderedGraph {
    fn default() -> Self {
        Self::new()
    }
}

/// Scope and optional flags pushed down from the path above a node.
#[derive(Debug, Clone, Copy, Default)]
struct Inherited {
    test: bool,
    optional: bool,
}

/// Walks dependency trees and assembles the rendered graph.
pub struct GraphBuilder<'a> {
    config: &'a VisualizerConfig,
    cache: &'a AnnotationCache,
    urls: &'a dyn UrlResolver,
}

impl<'a> GraphBuilder<'a> {
    pub fn new(
        config: &'a VisualizerConfig,
        cache: &'a AnnotationCache,
        urls: &'a dyn UrlResolver,
    ) -> Self {
        Self {
            config,
            cache,
            urls,
        }
    }

    /// Build the rendered graph for a set of project trees.
    ///
    /// The trees' own root coordinates form the reactor set used by the
    /// `hide_external` filter.
    pub fn build(&self, trees: &[DependencyNode]) -> RenderedGraph {
        let reactor: HashSet<Coordinate> =
            trees.iter().map(|tree| tree.coordinate.clone()).collect();

        let mut graph = RenderedGraph::new();
        for tree in trees {
            let root_idx = graph.ensure_node(self.rendered_node(tree, true, tree.optional));
            self.walk(tree, root_idx, Inherited::default(), 1, &reactor, &mut graph);
        }

        tracing::debug!(
            "built graph with {} nodes and {} edges from {} tree(s)",
            graph.node_count(),
            graph.edge_count(),
            trees.len()
        );
        graph
    }

    /// Visit `parent`'s children, which sit at `depth` edges below their
    /// tree root.
    fn walk(
        &self,
        parent: &DependencyNode,
        parent_idx: NodeIndex,
        inherited: Inherited,
        depth: usize,
        reactor: &HashSet<Coordinate>,
        graph: &mut RenderedGraph,
    ) {
        for child in &parent.children {
            if let Some(declared) = &child.parent {
                if *declared != parent.coordinate {
                    let err = DepvizError::TreeLinkage {
                        coordinate: child.coordinate.to_string(),
                        declared: declared.to_string(),
                    };
                    tracing::warn!("{err}, keeping it as a detached root");
                    let idx = graph.ensure_node(self.rendered_node(child, true, child.optional));
                    self.walk(child, idx, Inherited::default(), 1, reactor, graph);
                    continue;
                }
            }

            let scope = if self.config.cascade && inherited.test {
                Some(Scope::Test)
            } else {
                child.scope.clone()
            };
            let optional = child.optional || (self.config.cascade && inherited.optional);

            // Dropping a node drops everything only reachable through it
            if !self.retained(child, scope.as_ref(), optional, depth, reactor) {
                continue;
            }

            let child_idx = graph.ensure_node(self.rendered_node(child, false, optional));
            graph.connect(
                parent_idx,
                child_idx,
                RenderedEdge {
                    scope: scope.clone(),
                    optional,
                    omitted: child.state.is_omitted(),
                },
            );

            let next = if self.config.cascade {
                Inherited {
                    test: inherited.test || matches!(child.scope, Some(Scope::Test)),
                    optional: inherited.optional || child.optional,
                }
            } else {
                Inherited::default()
            };
            self.walk(child, child_idx, next, depth + 1, reactor, graph);
        }
    }

    /// The filter chain, evaluated in fixed precedence order.
    fn retained(
        &self,
        node: &DependencyNode,
        scope: Option<&Scope>,
        optional: bool,
        depth: usize,
        reactor: &HashSet<Coordinate>,
    ) -> bool {
        let config = self.config;
        if let Some(scope) = scope {
            // Hide entries are normalized lowercase; unknown scopes keep tree casing
            if config.hide_scopes.contains(&scope.as_str().to_lowercase()) {
                return false;
            }
        }
        if optional && config.hide_optional {
            return false;
        }
        if node.state.is_omitted() && config.hide_omitted {
            return false;
        }
        if node.packaging == "pom" && config.hide_poms {
            return false;
        }
        if config.hide_transitive && depth > 1 {
            return false;
        }
        if config.hide_external && !reactor.contains(&node.coordinate) {
            return false;
        }
        true
    }

    fn rendered_node(&self, node: &DependencyNode, root: bool, optional: bool) -> RenderedNode {
        let annotation = self.cache.lookup(&node.coordinate);
        RenderedNode {
            label: self.label(node),
            url: self.urls.resolve_url(&node.coordinate),
            color: annotation.color,
            root,
            optional,
            coordinate: node.coordinate.clone(),
        }
    }

    /// Colon-joined label with hidden fields simply left out.
    fn label(&self, node: &DependencyNode) -> String {
        let config = self.config;
        let mut parts = Vec::with_capacity(4);
        if !config.hide_group_id {
            parts.push(node.coordinate.group.as_str());
        }
        parts.push(node.coordinate.artifact.as_str());
        if !config.hide_version {
            parts.push(node.coordinate.version.as_str());
        }
        if !config.hide_type {
            parts.push(node.packaging.as_str());
        }
        parts.join(":")
    }
}
