//! Display and filtering flags shared by the graph-producing commands.

use anyhow::Result;
use clap::Args;
use std::path::PathBuf;

use crate::annotate::ColorRule;
use crate::config::{Direction, FileConfig, VisualizerConfig};

/// Graph surface flags accepted by both `render` and `report`.
///
/// The boolean toggles are tri-state: absent inherits the config file value
/// (or the built-in default), `--hide-poms` turns the toggle on, and
/// `--hide-poms false` turns it off. That lets the command line override a
/// config file in either direction.
#[derive(Args, Debug, Clone, Default)]
pub struct GraphArgs {
    /// Hide dependencies omitted by conflict or duplicate resolution
    #[arg(long, num_args = 0..=1, default_missing_value = "true", value_name = "BOOL")]
    pub hide_omitted: Option<bool>,

    /// Hide optional dependencies
    #[arg(long, num_args = 0..=1, default_missing_value = "true", value_name = "BOOL")]
    pub hide_optional: Option<bool>,

    /// Hide dependencies that are not roots of the supplied trees
    #[arg(long, num_args = 0..=1, default_missing_value = "true", value_name = "BOOL")]
    pub hide_external: Option<bool>,

    /// Hide dependencies of type pom
    #[arg(long, num_args = 0..=1, default_missing_value = "true", value_name = "BOOL")]
    pub hide_poms: Option<bool>,

    /// Hide everything below the direct dependencies
    #[arg(long, num_args = 0..=1, default_missing_value = "true", value_name = "BOOL")]
    pub hide_transitive: Option<bool>,

    /// Omit the version from node labels
    #[arg(long, num_args = 0..=1, default_missing_value = "true", value_name = "BOOL")]
    pub hide_version: Option<bool>,

    /// Omit the group id from node labels
    #[arg(long, num_args = 0..=1, default_missing_value = "true", value_name = "BOOL")]
    pub hide_group_id: Option<bool>,

    /// Omit the packaging type from node labels
    #[arg(long, num_args = 0..=1, default_missing_value = "true", value_name = "BOOL")]
    pub hide_type: Option<bool>,

    /// Push test scope and optionality down through the tree
    #[arg(long, num_args = 0..=1, default_missing_value = "true", value_name = "BOOL")]
    pub cascade: Option<bool>,

    /// Keep the intermediate Graphviz source file next to the image
    #[arg(long, num_args = 0..=1, default_missing_value = "true", value_name = "BOOL")]
    pub keep_dot: Option<bool>,

    /// Generate a clickable image map alongside the image
    #[arg(long, num_args = 0..=1, default_missing_value = "true", value_name = "BOOL")]
    pub map: Option<bool>,

    /// Comma separated scopes to hide, e.g. `test,provided`
    #[arg(long, value_delimiter = ',', value_name = "SCOPES")]
    pub hide_scopes: Option<Vec<String>>,

    /// Color rule `property=value:#RRGGBB`, repeatable, first match wins
    #[arg(long = "color", value_name = "RULE")]
    pub colors: Vec<String>,

    /// Caption drawn above the graph
    #[arg(long, value_name = "TEXT")]
    pub label: Option<String>,

    /// Layout direction of the graph
    #[arg(long, value_enum, value_name = "DIR")]
    pub direction: Option<Direction>,

    /// Root of the descriptor repository
    #[arg(long, env = "DEPVIZ_REPOSITORY", value_name = "PATH")]
    pub repository: Option<String>,

    /// Graphviz executable to run
    #[arg(long, value_name = "COMMAND")]
    pub dot_command: Option<String>,

    /// Seconds to wait for Graphviz before giving up
    #[arg(long, value_name = "SECONDS")]
    pub dot_timeout: Option<u64>,
}

impl GraphArgs {
    /// Layers the config file and then these flags over `base`.
    ///
    /// Each layer only touches settings it actually mentions, so a flag
    /// given on the command line always wins over the config file.
    pub fn build_config(&self, base: VisualizerConfig, file: FileConfig) -> Result<VisualizerConfig> {
        let mut config = base;
        file.apply(&mut config);
        self.apply(&mut config)?;
        Ok(config)
    }

    fn apply(&self, config: &mut VisualizerConfig) -> Result<()> {
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
        if let Some(value) = self.cascade {
            config.cascade = value;
        }
        if let Some(value) = self.keep_dot {
            config.keep_dot = value;
        }
        if let Some(value) = self.map {
            config.generate_map = value;
        }
        if let Some(scopes) = &self.hide_scopes {
            config.hide_scopes = scopes
                .iter()
                .map(|scope| scope.trim().to_lowercase())
                .filter(|scope| !scope.is_empty())
                .collect();
        }
        if !self.colors.is_empty() {
            config.color_rules = self
                .colors
                .iter()
                .map(|spec| ColorRule::parse(spec))
                .collect::<Result<_, _>>()?;
        }
        if let Some(label) = &self.label {
            config.label = label.clone();
        }
        if let Some(direction) = self.direction {
            config.direction = direction;
        }
        if let Some(repository) = &self.repository {
            config.repository = PathBuf::from(shellexpand::tilde(repository).into_owned());
        }
        if let Some(dot_command) = &self.dot_command {
            config.dot_command = dot_command.clone();
        }
        if let Some(seconds) = self.dot_timeout {
            config.dot_timeout = seconds;
        }
        Ok(())
    }
}
