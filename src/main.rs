//! Depviz CLI entry point
//!
//! This is the main executable for the depviz dependency graph visualizer.
//! It handles command-line argument parsing, error display, and command execution.
//!
//! The CLI supports two commands:
//! - `render` - Render dependency trees into a single annotated graph image
//! - `report` - Render a graph plus a standalone HTML page with a clickable map

use anyhow::Result;
use clap::Parser;
use depviz::cli;
use depviz::core::error::user_friendly_error;

#[tokio::main]
async fn main() -> Result<()> {
    // Parse CLI arguments
    let cli = cli::Cli::parse();

    // Set up colored output for Windows
    #[cfg(windows)]
    colored::control::set_virtual_terminal(true).ok();

    // Execute the command
    match cli.execute().await {
        Ok(_) => Ok(()),
        Err(e) => {
            // Convert to user-friendly error with context and suggestions
            let error_ctx = user_friendly_error(e);
            error_ctx.display();
            std::process::exit(1);
        }
    }
}
