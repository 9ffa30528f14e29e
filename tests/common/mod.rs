//! Common test utilities for depviz integration tests
//!
//! Consolidates the project directory setup used across the command tests.

// Allow dead code because these utilities are used across different test files
// and not all utilities are used in every test file
#![allow(dead_code)]

use anyhow::Result;
use assert_cmd::Command;
use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

use depviz::test_utils::DescriptorFixture;

/// A throwaway project directory holding tree files, an optional descriptor
/// repository, and an optional config file. Commands run with the project
/// root as their working directory.
pub struct TestProject {
    root: TempDir,
}

impl TestProject {
    pub fn new() -> Result<Self> {
        Ok(Self {
            root: TempDir::new()?,
        })
    }

    pub fn path(&self) -> &Path {
        self.root.path()
    }

    /// Root of the descriptor repository for this project.
    pub fn repository_path(&self) -> PathBuf {
        self.path().join("repository")
    }

    /// Write a dependency tree JSON file and return its path.
    pub fn write_tree(&self, name: &str, tree: &Value) -> Result<PathBuf> {
        let path = self.path().join(name);
        fs::write(&path, serde_json::to_string_pretty(tree)?)?;
        Ok(path)
    }

    /// Seed one descriptor into the project repository.
    pub fn seed_descriptor(&self, fixture: &DescriptorFixture) -> Result<PathBuf> {
        fixture.write_to(&self.repository_path())
    }

    /// Write a config file with the given name and return its path.
    pub fn write_config(&self, name: &str, content: &str) -> Result<PathBuf> {
        let path = self.path().join(name);
        fs::write(&path, content)?;
        Ok(path)
    }

    /// A depviz command rooted in this project directory.
    pub fn depviz(&self) -> Command {
        let mut cmd = Command::cargo_bin("depviz").unwrap();
        cmd.current_dir(self.path());
        cmd.env_remove("DEPVIZ_REPOSITORY");
        cmd.env_remove("RUST_LOG");
        cmd
    }

    /// Read a file relative to the project root.
    pub fn read(&self, relative: &str) -> String {
        fs::read_to_string(self.path().join(relative)).unwrap()
    }

    pub fn exists(&self, relative: &str) -> bool {
        self.path().join(relative).exists()
    }

    /// Write an executable shell script into the project directory.
    #[cfg(unix)]
    pub fn install_script(&self, name: &str, content: &str) -> Result<PathBuf> {
        use std::os::unix::fs::PermissionsExt;

        let path = self.path().join(name);
        fs::write(&path, content)?;
        fs::set_permissions(&path, fs::Permissions::from_mode(0o755))?;
        Ok(path)
    }

    /// Install a fake layout tool that writes a stub file for every `-o`
    /// argument, so graph rendering works without Graphviz installed.
    #[cfg(unix)]
    pub fn install_fake_dot(&self) -> Result<PathBuf> {
        let script = concat!(
            "#!/bin/sh\n",
            "prev=\"\"\n",
            "for arg in \"$@\"; do\n",
            "  if [ \"$prev\" = \"-o\" ]; then\n",
            "    printf '%s\\n' '<map id=\"dependencies\" name=\"dependencies\">' > \"$arg\"\n",
            "    printf '%s\\n' '<area shape=\"rect\" href=\"https://example.org/app\"/>' >> \"$arg\"\n",
            "    printf '%s\\n' '</map>' >> \"$arg\"\n",
            "  fi\n",
            "  prev=\"$arg\"\n",
            "done\n",
            "exit 0\n"
        );
        self.install_script("fake-dot", script)
    }
}
