//! The `report` command: the rendered graph wrapped in an HTML page with a
//! clickable image map.

use anyhow::{Context, Result};
use clap::Args;
use colored::Colorize;
use std::collections::HashMap;
use std::path::PathBuf;

use super::CliConfig;
use super::common::GraphArgs;
use crate::annotate::{AnnotationCache, ReactorUrlResolver};
use crate::config::{FileConfig, VisualizerConfig};
use crate::descriptor::{LocalRepository, MetadataResolver};
use crate::graph::GraphBuilder;
use crate::render::{Renderer, report_page};
use crate::tree;

/// Render the dependency graph and embed it in a standalone report page.
///
/// Unlike `render`, the map is generated by default so nodes in the page are
/// clickable, and aggregating several trees hides external dependencies to
/// keep the reactor overview readable.
#[derive(Args, Debug)]
pub struct ReportCommand {
    /// Dependency tree JSON files, one per project
    #[arg(required = true, value_name = "TREE")]
    trees: Vec<PathBuf>,

    /// Directory the report files are written into
    #[arg(short, long, default_value = "target/site", value_name = "DIR")]
    output_dir: PathBuf,

    /// Image format for the rendered graph
    #[arg(short, long, default_value = "png", value_name = "FORMAT")]
    format: String,

    #[command(flatten)]
    graph: GraphArgs,
}

impl ReportCommand {
    pub async fn execute_with_config(self, cli: CliConfig) -> Result<()> {
        let file = FileConfig::load(cli.config_path.as_deref()).await?;
        let base = VisualizerConfig {
            generate_map: true,
            ..VisualizerConfig::default()
        };
        let mut config = self.graph.build_config(base, file)?;

        let trees = tree::load_trees(&self.trees)?;
        // An aggregated report only shows the modules themselves; external
        // dependencies would swamp the reactor overview.
        if trees.len() > 1 {
            if !config.hide_external {
                tracing::debug!(
                    "aggregating {} trees, hiding external dependencies",
                    trees.len()
                );
            }
            config.hide_external = true;
        }

        // Module roots link to their sibling report pages instead of whatever
        // URL their descriptor declares.
        let mut pages = HashMap::new();
        for (path, root) in self.trees.iter().zip(&trees) {
            if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
                pages.insert(root.coordinate.clone(), format!("{stem}.html"));
            }
        }

        let repository = LocalRepository::new(config.repository.clone());
        let resolver = MetadataResolver::new(Box::new(repository));
        let cache = AnnotationCache::new(resolver, config.color_rules.clone());
        let urls = ReactorUrlResolver::new(&cache, pages);

        let graph = GraphBuilder::new(&config, &cache, &urls).build(&trees);

        let extension = self.format.trim_start_matches('.');
        let image_name = format!("dependency-graph.{extension}");
        let target = self.output_dir.join(&image_name);
        let outcome = Renderer::new(&config).render(&graph, &target).await?;

        let page = report_page(&config.label, &image_name, outcome.map.as_deref());
        let page_path = self.output_dir.join("dependency-graph.html");
        tokio::fs::write(&page_path, page)
            .await
            .with_context(|| format!("Failed to write report page to {}", page_path.display()))?;

        println!(
            "{}",
            format!("Dependency report written to: {}", page_path.display()).green()
        );
        Ok(())
    }
}
