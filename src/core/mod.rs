//! Core types for depviz
//!
//! This module contains the error types shared across the crate and the
//! user-facing error reporting helpers used by the CLI layer.
//!
//! The error system is split in two:
//! - [`DepvizError`] - strongly typed failure cases for precise handling
//! - [`ErrorContext`] - wrapper adding suggestions and details for display
//!
//! Per-coordinate metadata failures are deliberately non-fatal: callers log
//! them and degrade to "no annotation data" so a single broken descriptor
//! never prevents the graph from rendering. Rendering failures, on the other
//! hand, abort the run because no usable output exists.

pub mod error;

pub use error::{DepvizError, ErrorContext, user_friendly_error};
