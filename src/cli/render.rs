//! The `render` command: dependency trees in, annotated graph image out.

use anyhow::Result;
use clap::Args;
use colored::Colorize;
use std::path::PathBuf;

use super::CliConfig;
use super::common::GraphArgs;
use crate::annotate::{AnnotationCache, MetadataUrlResolver};
use crate::config::{FileConfig, VisualizerConfig};
use crate::descriptor::{LocalRepository, MetadataResolver};
use crate::graph::GraphBuilder;
use crate::render::Renderer;
use crate::tree;

/// Render one or more dependency trees into a single graph image.
///
/// Multiple trees are merged into one graph on shared coordinates, so a
/// reactor build renders as one picture with the inter-module edges intact.
#[derive(Args, Debug)]
pub struct RenderCommand {
    /// Dependency tree JSON files, one per project
    #[arg(required = true, value_name = "TREE")]
    trees: Vec<PathBuf>,

    /// Output image path; the extension selects the format
    #[arg(short, long, default_value = "target/dependency-graph.png", value_name = "FILE")]
    target: PathBuf,

    #[command(flatten)]
    graph: GraphArgs,
}

impl RenderCommand {
    pub async fn execute_with_config(self, cli: CliConfig) -> Result<()> {
        let file = FileConfig::load(cli.config_path.as_deref()).await?;
        let config = self.graph.build_config(VisualizerConfig::default(), file)?;

        let trees = tree::load_trees(&self.trees)?;

        let repository = LocalRepository::new(config.repository.clone());
        let resolver = MetadataResolver::new(Box::new(repository));
        let cache = AnnotationCache::new(resolver, config.color_rules.clone());
        let urls = MetadataUrlResolver::new(&cache);

        let graph = GraphBuilder::new(&config, &cache, &urls).build(&trees);
        tracing::debug!(
            "resolved {} descriptors for {} nodes and {} edges",
            cache.resolution_count(),
            graph.node_count(),
            graph.edge_count()
        );

        let outcome = Renderer::new(&config).render(&graph, &self.target).await?;
        println!(
            "{}",
            format!("Dependency graph exported to: {}", outcome.image.display()).green()
        );
        Ok(())
    }
}
