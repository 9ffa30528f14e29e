//! Run configuration: defaults, the optional TOML file, and CLI overrides.
//!
//! Configuration is layered. [`VisualizerConfig::default`] supplies the
//! baseline, an optional `depviz.toml` overrides it, and command-line flags
//! override both. The file layer is [`FileConfig`], where every field is
//! optional so that "not mentioned" and "set to the default value" stay
//! distinguishable when folding the layers together.
//!
//! # File Format
//!
//! ```toml
//! hide-transitive = true
//! label = "acme platform"
//! direction = "LR"
//! repository = "~/.depviz/repository"
//!
//! [[colors]]
//! property = "team"
//! value = "platform"
//! color = "#6495ED"
//! ```

use anyhow::{Context, Result};
use clap::ValueEnum;
use serde::Deserialize;
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use tokio::fs;

use crate::annotate::ColorRule;
use crate::core::DepvizError;

/// File picked up from the working directory when no `--config` is given.
pub const DEFAULT_CONFIG_FILE: &str = "depviz.toml";

/// Graph layout direction, named after the `rankdir` values of the layout
/// tool.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum, Deserialize)]
pub enum Direction {
    /// Roots at the top, dependencies below
    #[default]
    #[value(name = "TB", alias = "top-to-bottom")]
    #[serde(rename = "TB", alias = "top-to-bottom")]
    TopToBottom,
    #[value(name = "LR", alias = "left-to-right")]
    #[serde(rename = "LR", alias = "left-to-right")]
    LeftToRight,
    #[value(name = "BT", alias = "bottom-to-top")]
    #[serde(rename = "BT", alias = "bottom-to-top")]
    BottomToTop,
    #[value(name = "RL", alias = "right-to-left")]
    #[serde(rename = "RL", alias = "right-to-left")]
    RightToLeft,
}

impl Direction {
    /// The `rankdir` attribute value emitted into the graph description.
    pub const fn rankdir(self) -> &'static str {
        match self {
            Self::TopToBottom => "TB",
            Self::LeftToRight => "LR",
            Self::BottomToTop => "BT",
            Self::RightToLeft => "RL",
        }
    }
}

/// Immutable configuration for one graph-generation run.
#[derive(Debug, Clone)]
pub struct VisualizerConfig {
    /// Drop nodes the resolver omitted (conflict, duplicate and cycle losers)
    pub hide_omitted: bool,
    /// Drop optional dependencies
    pub hide_optional: bool,
    /// Drop everything that is not one of the visualized project roots
    pub hide_external: bool,
    /// Drop `pom`-packaged dependencies
    pub hide_poms: bool,
    /// Drop everything deeper than the roots' direct dependencies
    pub hide_transitive: bool,
    /// Leave the version out of node labels
    pub hide_version: bool,
    /// Leave the group id out of node labels
    pub hide_group_id: bool,
    /// Leave the packaging type out of node labels
    pub hide_type: bool,
    /// Scope names whose dependencies are dropped entirely
    pub hide_scopes: BTreeSet<String>,
    /// Push test scope and optional flags down through the tree before
    /// filtering
    pub cascade: bool,
    /// Keep the intermediate DOT file after a successful render
    pub keep_dot: bool,
    /// Produce a clickable image map alongside the image
    pub generate_map: bool,
    pub direction: Direction,
    /// Graph-level caption
    pub label: String,
    /// Ordered first-match color rules
    pub color_rules: Vec<ColorRule>,
    /// Root directory of the local descriptor repository
    pub repository: PathBuf,
    /// Layout tool executable, a name looked up on `PATH` or a full path
    pub dot_command: String,
    /// Seconds before a layout tool invocation is abandoned
    pub dot_timeout: u64,
}

impl Default for VisualizerConfig {
    fn default() -> Self {
        Self {
            hide_omitted: true,
            hide_optional: false,
            hide_external: false,
            hide_poms: true,
            hide_transitive: false,
            hide_version: false,
            hide_group_id: false,
            hide_type: false,
            hide_scopes: BTreeSet::new(),
            cascade: true,
            keep_dot: false,
            generate_map: false,
            direction: Direction::default(),
            label: "Dependency graph".to_string(),
            color_rules: Vec::new(),
            repository: default_repository(),
            dot_command: "dot".to_string(),
            dot_timeout: 60,
        }
    }
}

/// `~/.depviz/repository`, or a working-directory fallback when no home
/// directory can be determined.
pub fn default_repository() -> PathBuf {
    dirs::home_dir().map_or_else(
        || PathBuf::from(".depviz/repository"),
        |home| home.join(".depviz").join("repository"),
    )
}

/// The optional `depviz.toml` overlay.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct FileConfig {
    pub hide_omitted: Option<bool>,
    pub hide_optional: Option<bool>,
    pub hide_external: Option<bool>,
    pub hide_poms: Option<bool>,
    pub hide_transitive: Option<bool>,
    pub hide_version: Option<bool>,
    pub hide_group_id: Option<bool>,
    pub hide_type: Option<bool>,
    pub hide_scopes: Option<Vec<String>>,
    pub cascade: Option<bool>,
    pub keep_dot: Option<bool>,
    pub map: Option<bool>,
    pub direction: Option<Direction>,
    pub label: Option<String>,
    pub colors: Vec<ColorRule>,
    pub repository: Option<String>,
    pub dot_command: Option<String>,
    pub dot_timeout: Option<u64>,
}

impl FileConfig {
    /// Load the file layer.
    ///
    /// An explicitly requested path must exist. Without one, `depviz.toml`
    /// in the working directory is used when present, and an empty layer
    /// when not.
    pub async fn load(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => {
                if !path.exists() {
                    return Err(DepvizError::ConfigNotFound {
                        path: path.display().to_string(),
                    }
                    .into());
                }
                Self::load_from(path).await
            }
            None => {
                let fallback = Path::new(DEFAULT_CONFIG_FILE);
                if fallback.exists() {
                    Self::load_from(fallback).await
                } else {
                    Ok(Self::default())
                }
            }
        }
    }

    async fn load_from(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .await
            .with_context(|| format!("Failed to read config from {}", path.display()))?;

        toml::from_str(&content)
            .with_context(|| format!("Failed to parse config from {}", path.display()))
    }

    /// Fold the fields present in the file into `config`.
    pub fn apply(self, config: &mut VisualizerConfig) {
        if let Some(value) = self.hide_omitted {
            config.hide_omitted = value;
        }
        if let Some(value) = self.hide_optional {
            config.hide_optional = value;
        }
        if let Some(value) = self.hide_external {
            config.hide_external = value;
        }
        if let Some(value) = self.hide_poms {
            config.hide_poms = value;
        }
        if let Some(value) = self.hide_transitive {
            config.hide_transitive = value;
        }
        if let Some(value) = self.hide_version {
            config.hide_version = value;
        }
        if let Some(value) = self.hide_group_id {
            config.hide_group_id = value;
        }
        if let Some(value) = self.hide_type {
            config.hide_type = value;
        }
        if let Some(scopes) = self.hide_scopes {
            config.hide_scopes = scopes
                .into_iter()
                .map(|scope| scope.trim().to_lowercase())
                .collect();
        }
        if let Some(value) = self.cascade {
            config.cascade = value;
        }
        if let Some(value) = self.keep_dot {
            config.keep_dot = value;
        }
        if let Some(value) = self.map {
            config.generate_map = value;
        }
        if let Some(direction) = self.direction {
            config.direction = direction;
        }
        if let Some(label) = self.label {
            config.label = label;
        }
        if !self.colors.is_empty() {
            config.color_rules = self.colors;
        }
        if let Some(repository) = self.repository {
            config.repository = PathBuf::from(shellexpand::tilde(&repository).into_owned());
        }
        if let Some(dot_command) = self.dot_command {
            config.dot_command = dot_command;
        }
        if let Some(seconds) = self.dot_timeout {
            config.dot_timeout = seconds;
        }
    }
}
