//! DOT serialization and layout tool orchestration.
//!
//! [`dot_source`] turns a [`RenderedGraph`] into the layout tool's textual
//! input language. [`Renderer`] writes that text next to the render target,
//! invokes the tool to produce the image (and, on request, a clickable
//! `cmapx` map), then cleans the intermediate file up. A target with a
//! `.dot` extension short-circuits: the description itself is the product
//! and no external tool runs.

mod dot_command;
mod map;

pub use dot_command::{DotCommand, DotOutput};
pub use map::report_page;

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tokio::fs;

use crate::annotate::Color;
use crate::config::VisualizerConfig;
use crate::core::DepvizError;
use crate::graph::{RenderedEdge, RenderedGraph, RenderedNode};
use crate::tree::Scope;

/// Paths and text produced by a successful render.
#[derive(Debug)]
pub struct RenderOutcome {
    /// The rendered image, or the DOT file itself for `.dot` targets
    pub image: PathBuf,
    /// Raw map text when a clickable map was requested
    pub map: Option<String>,
}

/// Serialize the graph into DOT.
///
/// The graph is always named `dependencies`; the `cmapx` output derives the
/// map name from it, and report pages reference `#dependencies`.
pub fn dot_source(graph: &RenderedGraph, config: &VisualizerConfig) -> String {
    let mut out = String::new();
    out.push_str("digraph \"dependencies\" {\n");
    out.push_str(&format!("  label=\"{}\";\n", escape(&config.label)));
    out.push_str("  labelloc=t;\n");
    out.push_str(&format!("  rankdir={};\n", config.direction.rankdir()));
    out.push_str("  node [shape=box, style=filled, fillcolor=\"#FFFFFF\"];\n");
    out.push('\n');

    for node in graph.nodes() {
        out.push_str(&format!(
            "  \"{}\" [{}];\n",
            escape(&node.coordinate.to_string()),
            node_attributes(node)
        ));
    }
    out.push('\n');

    for (from, to, edge) in graph.edges() {
        let attributes = edge_attributes(edge);
        if attributes.is_empty() {
            out.push_str(&format!(
                "  \"{}\" -> \"{}\";\n",
                escape(&from.coordinate.to_string()),
                escape(&to.coordinate.to_string())
            ));
        } else {
            out.push_str(&format!(
                "  \"{}\" -> \"{}\" [{}];\n",
                escape(&from.coordinate.to_string()),
                escape(&to.coordinate.to_string()),
                attributes
            ));
        }
    }

    out.push_str("}\n");
    out
}

fn node_attributes(node: &RenderedNode) -> String {
    let mut attrs = vec![format!("label=\"{}\"", escape(&node.label))];
    if let Some(fill) = fill_color(node) {
        attrs.push(format!("fillcolor=\"{fill}\""));
    }
    if let Some(url) = &node.url {
        attrs.push(format!("href=\"{}\"", escape(url)));
    }
    attrs.join(", ")
}

/// Rule color first, then the root grey, otherwise the white default from
/// the node statement. Optional nodes get a lightened shade.
fn fill_color(node: &RenderedNode) -> Option<Color> {
    let base = match node.color {
        Some(color) => color,
        None if node.root => Color::ROOT_GREY,
        None => return None,
    };
    Some(if node.optional { base.lighten() } else { base })
}

fn edge_attributes(edge: &RenderedEdge) -> String {
    let mut attrs = Vec::new();
    if let Some(scope) = &edge.scope {
        if *scope != Scope::Compile {
            attrs.push(format!("label=\"{}\"", escape(scope.as_str())));
        }
    }
    if edge.omitted {
        attrs.push("style=dashed".to_string());
        attrs.push(format!("color=\"{}\"", Color::DARK_GREY));
    } else if edge.optional {
        attrs.push(format!("color=\"{}\"", Color::DARK_GREY.lighten()));
    }
    attrs.join(", ")
}

fn escape(text: &str) -> String {
    text.replace('\\', "\\\\").replace('"', "\\\"")
}

/// `<target>.map`, the file the layout tool writes `cmapx` output to.
fn map_path(target: &Path) -> PathBuf {
    let mut name = target.file_name().map(std::ffi::OsStr::to_os_string).unwrap_or_default();
    name.push(".map");
    target.with_file_name(name)
}

/// Drives one render: DOT file, layout tool, map read-back, cleanup.
pub struct Renderer<'a> {
    config: &'a VisualizerConfig,
}

impl<'a> Renderer<'a> {
    pub const fn new(config: &'a VisualizerConfig) -> Self {
        Self {
            config,
        }
    }

    /// Render `graph` to `target`, inferring the image format from the
    /// target's extension.
    ///
    /// On layout tool failure, or when a requested map cannot be read back,
    /// the image and map are removed so no partial output is left behind;
    /// the DOT file stays for diagnosis.
    pub async fn render(&self, graph: &RenderedGraph, target: &Path) -> Result<RenderOutcome> {
        let extension = target
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_lowercase)
            .ok_or_else(|| DepvizError::Render {
                reason: format!(
                    "target '{}' has no file extension to infer an image format from",
                    target.display()
                ),
            })?;

        if let Some(parent) = target.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).await.with_context(|| {
                    format!("Failed to create output directory {}", parent.display())
                })?;
            }
        }

        let source = dot_source(graph, self.config);

        if extension == "dot" {
            fs::write(target, &source)
                .await
                .with_context(|| format!("Failed to write {}", target.display()))?;
            if self.config.generate_map {
                tracing::debug!("skipping map generation for a .dot target");
            }
            tracing::debug!("wrote graph description to {}", target.display());
            return Ok(RenderOutcome {
                image: target.to_path_buf(),
                map: None,
            });
        }

        let dot_file = target.with_extension("dot");
        fs::write(&dot_file, &source)
            .await
            .with_context(|| format!("Failed to write {}", dot_file.display()))?;

        let map_file = map_path(target);
        let mut command = DotCommand::locate(&self.config.dot_command)?
            .with_timeout(Some(Duration::from_secs(self.config.dot_timeout)))
            .with_context(target.display().to_string())
            .arg(format!("-T{extension}"))
            .args(["-o".to_string(), target.display().to_string()]);
        if self.config.generate_map {
            command = command
                .arg("-Tcmapx")
                .args(["-o".to_string(), map_file.display().to_string()]);
        }

        if let Err(e) = command.arg(dot_file.display().to_string()).execute_success().await {
            let _ = fs::remove_file(target).await;
            let _ = fs::remove_file(&map_file).await;
            return Err(e);
        }

        let map = if self.config.generate_map {
            match fs::read_to_string(&map_file).await {
                Ok(text) => Some(text),
                Err(e) => {
                    let _ = fs::remove_file(target).await;
                    let _ = fs::remove_file(&map_file).await;
                    return Err(DepvizError::Render {
                        reason: format!("could not read map file {}: {e}", map_file.display()),
                    }
                    .into());
                }
            }
        } else {
            None
        };

        if !self.config.keep_dot {
            fs::remove_file(&dot_file)
                .await
                .with_context(|| format!("Failed to remove {}", dot_file.display()))?;
        }

        Ok(RenderOutcome {
            image: target.to_path_buf(),
            map,
        })
    }
}
