//! Command-line interface for depviz.
//!
//! Each command lives in its own module with its own argument struct and
//! execution logic. The two commands share the display and filtering flags
//! through [`common::GraphArgs`], so `render` and `report` accept the same
//! graph surface and differ only in what they do with the result.
//!
//! # Usage Patterns
//!
//! ```bash
//! # Render one tree into an image
//! depviz render target/tree.json --target target/dependency-graph.svg
//!
//! # Render a reactor build, hiding test scope
//! depviz render app/tree.json lib/tree.json --hide-scopes test,provided
//!
//! # Produce an HTML report with a clickable image map
//! depviz report target/tree.json --output-dir target/site
//! ```
//!
//! Global flags (`--verbose`, `--quiet`, `--config`) apply to every command
//! and are resolved once in [`Cli::execute`] before dispatch.

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

mod common;
mod render;
mod report;

pub use common::GraphArgs;
pub use render::RenderCommand;
pub use report::ReportCommand;

/// Resolved global settings shared by all commands.
///
/// Built once from the global CLI flags and handed to the command being
/// executed. Commands read from this instead of inspecting the raw flags,
/// so tests can construct one directly.
#[derive(Debug, Clone, Default)]
pub struct CliConfig {
    /// Log filter directive, `None` defers to `RUST_LOG` or the default.
    pub log_level: Option<String>,
    /// Explicit config file path from `--config`.
    pub config_path: Option<PathBuf>,
}

impl CliConfig {
    /// Creates an empty configuration with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

/// Maven dependency graph visualizer
#[derive(Parser, Debug)]
#[command(name = "depviz")]
#[command(about = "Render Maven dependency trees as annotated Graphviz graphs", long_about = None)]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Suppress all output except errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    quiet: bool,

    /// Path to the configuration file
    #[arg(short, long, global = true, value_name = "FILE")]
    config: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Render dependency trees into a single graph image
    Render(RenderCommand),
    /// Render the graph and wrap it in an HTML report page
    Report(ReportCommand),
}

impl Cli {
    /// Executes the parsed command with settings derived from the global flags.
    pub async fn execute(self) -> Result<()> {
        let config = self.build_config();
        self.execute_with_config(config).await
    }

    /// Translates the global flags into a [`CliConfig`].
    ///
    /// `--verbose` wins over `--quiet`; clap already rejects passing both.
    #[must_use]
    fn build_config(&self) -> CliConfig {
        let log_level = if self.verbose {
            Some("debug".to_string())
        } else if self.quiet {
            Some("error".to_string())
        } else {
            None
        };

        CliConfig {
            log_level,
            config_path: self.config.clone(),
        }
    }

    /// Executes the command with an explicit configuration.
    pub async fn execute_with_config(self, config: CliConfig) -> Result<()> {
        init_logging(&config);

        match self.command {
            Commands::Render(cmd) => cmd.execute_with_config(config).await,
            Commands::Report(cmd) => cmd.execute_with_config(config).await,
        }
    }
}

/// Installs the global tracing subscriber.
///
/// The CLI flag takes precedence, then `RUST_LOG`, then `info`. Logs go to
/// stderr so stdout stays clean for the success line. Repeated calls are
/// tolerated because tests execute commands in-process.
fn init_logging(config: &CliConfig) {
    use tracing_subscriber::EnvFilter;

    let filter = match config.log_level.as_deref() {
        Some(level) => EnvFilter::new(level),
        None => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
    };

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}
