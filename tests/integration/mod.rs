//! Integration test suite for depviz
//!
//! End-to-end tests that run the compiled binary against real tree files on
//! disk. Rendering targets use the `.dot` extension wherever possible so the
//! suite does not require Graphviz; the report tests that need a layout tool
//! run a stub executable instead.
//!
//! ```bash
//! cargo test --test integration
//! ```

// Shared test utilities (from parent tests/ directory)
#[path = "../common/mod.rs"]
mod common;

mod render_command;
mod report_command;
