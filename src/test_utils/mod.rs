//! Test utilities for depviz.
//!
//! Helpers shared by the unit and integration test suites: one-time logging
//! setup and fixtures for seeding a descriptor repository on disk. Enabled
//! through the `test-utils` feature so integration tests can reach them
//! without shipping them in release builds.

use std::path::{Path, PathBuf};
use std::sync::Once;
use tracing::Level;
use tracing_subscriber::EnvFilter;

use crate::descriptor::LocalRepository;
use crate::tree::Coordinate;

/// Global flag to ensure logging is only initialized once in tests
static INIT_LOGGING: Once = Once::new();

/// Initialize logging for tests.
///
/// Initializes the tracing subscriber once regardless of how many times it is
/// called. Respects the `RUST_LOG` environment variable if set, otherwise
/// uses the provided level, otherwise stays silent.
///
/// ```bash
/// RUST_LOG=debug cargo test
/// ```
pub fn init_test_logging(level: Option<Level>) {
    INIT_LOGGING.call_once(|| {
        let filter = if std::env::var("RUST_LOG").is_ok() {
            EnvFilter::from_default_env()
        } else if let Some(level) = level {
            EnvFilter::new(level.to_string())
        } else {
            return;
        };

        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_test_writer()
            .with_target(true)
            .with_thread_ids(false)
            .try_init();
    });
}

/// A descriptor file to be placed in a repository layout.
///
/// Produces the same `<group>/<artifact>/<version>/<artifact>-<version>.toml`
/// layout the resolver reads, so tests seed a repository by writing fixtures
/// into a temporary root.
#[derive(Debug, Clone)]
pub struct DescriptorFixture {
    /// Coordinate the descriptor belongs to
    pub coordinate: Coordinate,
    /// Raw TOML content
    pub content: String,
}

impl DescriptorFixture {
    /// A minimal descriptor with only a project URL.
    pub fn basic(group: &str, artifact: &str, version: &str) -> Self {
        Self::with_url(
            group,
            artifact,
            version,
            &format!("https://example.org/{artifact}"),
        )
    }

    /// A descriptor carrying an explicit project URL.
    pub fn with_url(group: &str, artifact: &str, version: &str, url: &str) -> Self {
        Self {
            coordinate: Coordinate::new(group, artifact, version),
            content: format!("[project]\nurl = \"{url}\"\n"),
        }
    }

    /// A descriptor with a `[properties]` table and no URL.
    pub fn with_properties(
        group: &str,
        artifact: &str,
        version: &str,
        properties: &[(&str, &str)],
    ) -> Self {
        let mut content = String::from("[properties]\n");
        for (key, value) in properties {
            content.push_str(&format!("{key} = \"{value}\"\n"));
        }
        Self {
            coordinate: Coordinate::new(group, artifact, version),
            content,
        }
    }

    /// Write the descriptor into a repository rooted at `root`.
    ///
    /// Creates the intermediate directories and returns the file path.
    pub fn write_to(&self, root: &Path) -> anyhow::Result<PathBuf> {
        let path = LocalRepository::new(root).descriptor_path(&self.coordinate);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(&path, &self.content)?;
        Ok(path)
    }
}
