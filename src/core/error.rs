//! Error handling for depviz
//!
//! This module provides the error types and user-friendly error reporting for
//! the depviz CLI. The error system is designed around two core principles:
//! 1. **Strongly-typed errors** for precise error handling in code
//! 2. **User-friendly messages** with actionable suggestions for CLI users
//!
//! # Architecture
//!
//! The error system consists of two main types:
//! - [`DepvizError`] - Enumerated error types for all failure cases
//! - [`ErrorContext`] - Wrapper that adds user-friendly messages and suggestions
//!
//! # Fatal vs. degrading errors
//!
//! Not every [`DepvizError`] aborts a run. [`DepvizError::Resolution`] is
//! raised per coordinate while looking up annotation metadata; the annotation
//! cache logs it and records an empty annotation instead of failing the whole
//! graph. [`DepvizError::TreeLinkage`] downgrades a mis-parented node to a
//! detached root. Everything else (unreadable tree files, renderer failures,
//! configuration problems) is fatal and surfaces through
//! [`user_friendly_error`] at the CLI boundary.
//!
//! # Examples
//!
//! ```rust,no_run
//! use depviz::core::{DepvizError, user_friendly_error};
//!
//! fn locate_layout_tool() -> Result<(), DepvizError> {
//!     Err(DepvizError::DotNotFound { command: "dot".to_string() })
//! }
//!
//! match locate_layout_tool() {
//!     Ok(_) => println!("found"),
//!     Err(e) => {
//!         let ctx = user_friendly_error(anyhow::Error::from(e));
//!         ctx.display(); // Shows colored error with suggestions
//!     }
//! }
//! ```

use colored::Colorize;
use std::fmt;
use thiserror::Error;

/// The main error type for depviz operations
///
/// Each variant represents a specific failure mode and carries the details
/// needed for a useful message: coordinates, file paths, tool output.
#[derive(Error, Debug)]
pub enum DepvizError {
    /// Annotation metadata could not be resolved for a coordinate
    ///
    /// Raised while fetching or merging project descriptors, interpolating
    /// properties, or evaluating color rules. Non-fatal: the coordinate is
    /// rendered without annotation data.
    #[error("metadata resolution failed for '{coordinate}': {reason}")]
    Resolution {
        /// The coordinate whose metadata could not be resolved
        coordinate: String,
        /// Why resolution failed (missing parent, cycle, parse error, ...)
        reason: String,
    },

    /// A dependency tree file could not be read or parsed
    ///
    /// Fatal: without the tree there is nothing to draw.
    #[error("failed to load dependency tree from {file}: {reason}")]
    TreeParse {
        /// Path of the tree file
        file: String,
        /// Parse or I/O failure description
        reason: String,
    },

    /// A node's declared parent disagrees with its position in the tree
    ///
    /// Non-fatal: the node is rendered as a detached root and traversal
    /// continues below it.
    #[error("node '{coordinate}' declares parent '{declared}' but was found elsewhere")]
    TreeLinkage {
        /// The misplaced node
        coordinate: String,
        /// The parent coordinate the node claims
        declared: String,
    },

    /// The layout tool run or output handling failed
    ///
    /// Fatal for the run. Partial outputs are removed; no image is usable.
    #[error("graph rendering failed: {reason}")]
    Render {
        /// Tool stderr or a description of the failure
        reason: String,
    },

    /// The Graphviz layout executable is not installed or not on PATH
    #[error("layout tool '{command}' not found")]
    DotNotFound {
        /// The executable name that was looked up
        command: String,
    },

    /// The layout tool did not finish within the configured timeout
    #[error("layout tool '{command}' timed out after {seconds} seconds")]
    DotTimeout {
        /// The executable that was run
        command: String,
        /// The timeout that elapsed
        seconds: u64,
    },

    /// A color literal could not be parsed
    ///
    /// Accepted forms are `#RRGGBB`, `0xRRGGBB` and plain decimal.
    #[error("invalid color value '{value}'")]
    InvalidColor {
        /// The literal that failed to parse
        value: String,
    },

    /// A color rule given on the command line is malformed
    ///
    /// The expected form is `property=value:#RRGGBB`.
    #[error("invalid color rule '{rule}' (expected property=value:#RRGGBB)")]
    InvalidColorRule {
        /// The rule specification as given
        rule: String,
    },

    /// A coordinate string is not of the form `group:artifact:version`
    #[error("invalid coordinate '{value}' (expected group:artifact:version)")]
    InvalidCoordinate {
        /// The string that failed to parse
        value: String,
    },

    /// Configuration file issues or invalid flag combinations
    #[error("configuration error: {message}")]
    ConfigError {
        /// Description of the configuration problem
        message: String,
    },

    /// Explicitly requested configuration file doesn't exist
    #[error("configuration file not found: {path}")]
    ConfigNotFound {
        /// Path that was checked
        path: String,
    },

    /// IO operation failed
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    /// TOML parsing failed
    #[error("TOML parsing error: {0}")]
    TomlError(#[from] toml::de::Error),

    /// JSON parsing failed
    #[error("JSON parsing error: {0}")]
    JsonError(#[from] serde_json::Error),

    /// Generic error with custom message
    #[error("{message}")]
    Other {
        /// Generic error message
        message: String,
    },
}

impl Clone for DepvizError {
    fn clone(&self) -> Self {
        match self {
            Self::Resolution {
                coordinate,
                reason,
            } => Self::Resolution {
                coordinate: coordinate.clone(),
                reason: reason.clone(),
            },
            Self::TreeParse {
                file,
                reason,
            } => Self::TreeParse {
                file: file.clone(),
                reason: reason.clone(),
            },
            Self::TreeLinkage {
                coordinate,
                declared,
            } => Self::TreeLinkage {
                coordinate: coordinate.clone(),
                declared: declared.clone(),
            },
            Self::Render {
                reason,
            } => Self::Render {
                reason: reason.clone(),
            },
            Self::DotNotFound {
                command,
            } => Self::DotNotFound {
                command: command.clone(),
            },
            Self::DotTimeout {
                command,
                seconds,
            } => Self::DotTimeout {
                command: command.clone(),
                seconds: *seconds,
            },
            Self::InvalidColor {
                value,
            } => Self::InvalidColor {
                value: value.clone(),
            },
            Self::InvalidColorRule {
                rule,
            } => Self::InvalidColorRule {
                rule: rule.clone(),
            },
            Self::InvalidCoordinate {
                value,
            } => Self::InvalidCoordinate {
                value: value.clone(),
            },
            Self::ConfigError {
                message,
            } => Self::ConfigError {
                message: message.clone(),
            },
            Self::ConfigNotFound {
                path,
            } => Self::ConfigNotFound {
                path: path.clone(),
            },
            // For errors that don't implement Clone, convert to Other
            Self::IoError(e) => Self::Other {
                message: format!("IO error: {e}"),
            },
            Self::TomlError(e) => Self::Other {
                message: format!("TOML parsing error: {e}"),
            },
            Self::JsonError(e) => Self::Other {
                message: format!("JSON parsing error: {e}"),
            },
            Self::Other {
                message,
            } => Self::Other {
                message: message.clone(),
            },
        }
    }
}

/// Error context wrapper that provides user-friendly error information
///
/// `ErrorContext` wraps a [`DepvizError`] and adds optional suggestions and
/// details. This is the primary way depviz presents errors to CLI users.
#[derive(Debug)]
pub struct ErrorContext {
    /// The underlying error
    pub error: DepvizError,
    /// Optional suggestion for resolving the error
    pub suggestion: Option<String>,
    /// Optional additional details about the error
    pub details: Option<String>,
}

impl ErrorContext {
    /// Create a new error context from a [`DepvizError`]
    #[must_use]
    pub const fn new(error: DepvizError) -> Self {
        Self {
            error,
            suggestion: None,
            details: None,
        }
    }

    /// Add a suggestion for resolving the error
    ///
    /// Suggestions should be actionable steps. They are displayed in green
    /// in the terminal to draw attention.
    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestion = Some(suggestion.into());
        self
    }

    /// Add additional details explaining the error
    ///
    /// Details explain why the error occurred. They are displayed in yellow,
    /// less prominent than the error itself.
    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }

    /// Display the error context to stderr with terminal colors
    ///
    /// Color coding:
    /// - Error message: Red and bold
    /// - Details: Yellow
    /// - Suggestion: Green
    pub fn display(&self) {
        eprintln!("{}: {}", "error".red().bold(), self.error);

        if let Some(details) = &self.details {
            eprintln!("{}: {}", "details".yellow(), details);
        }

        if let Some(suggestion) = &self.suggestion {
            eprintln!("{}: {}", "suggestion".green(), suggestion);
        }
    }
}

impl fmt::Display for ErrorContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.error)?;

        if let Some(details) = &self.details {
            write!(f, "\nDetails: {details}")?;
        }

        if let Some(suggestion) = &self.suggestion {
            write!(f, "\nSuggestion: {suggestion}")?;
        }

        Ok(())
    }
}

impl std::error::Error for ErrorContext {}

/// Convert any error to a user-friendly [`ErrorContext`] with actionable suggestions
///
/// This function is the main entry point for converting arbitrary errors into
/// user-friendly error messages for CLI display. It recognizes common error
/// types and provides appropriate context and suggestions.
#[must_use]
pub fn user_friendly_error(error: anyhow::Error) -> ErrorContext {
    // Check for specific error types and provide helpful suggestions
    if let Some(depviz_error) = error.downcast_ref::<DepvizError>() {
        return create_error_context(depviz_error.clone());
    }

    if let Some(io_error) = error.downcast_ref::<std::io::Error>() {
        match io_error.kind() {
            std::io::ErrorKind::PermissionDenied => {
                return ErrorContext::new(DepvizError::Other {
                    message: format!("permission denied: {io_error}"),
                })
                .with_suggestion("Check file ownership or run with elevated permissions")
                .with_details("depviz could not read or write one of the involved files");
            }
            std::io::ErrorKind::NotFound => {
                return ErrorContext::new(DepvizError::Other {
                    message: format!("file not found: {io_error}"),
                })
                .with_suggestion("Check that the path exists and is spelled correctly");
            }
            _ => {}
        }
    }

    if let Some(toml_error) = error.downcast_ref::<toml::de::Error>() {
        return ErrorContext::new(DepvizError::ConfigError {
            message: toml_error.to_string(),
        })
        .with_suggestion("Check the TOML syntax. Verify quotes, brackets, and table headers")
        .with_details("TOML parsing errors are usually caused by syntax issues");
    }

    // Generic error - include the full error chain for better diagnostics
    let mut message = error.to_string();

    // Append error chain if available
    let chain: Vec<String> = error
        .chain()
        .skip(1) // Skip the root cause which is already in to_string()
        .map(std::string::ToString::to_string)
        .collect();

    if !chain.is_empty() {
        message.push_str("\n\nCaused by:");
        for (i, cause) in chain.iter().enumerate() {
            message.push_str(&format!("\n  {}: {}", i + 1, cause));
        }
    }

    ErrorContext::new(DepvizError::Other {
        message,
    })
}

/// Create an [`ErrorContext`] with suggestions tailored to the specific error
fn create_error_context(error: DepvizError) -> ErrorContext {
    match &error {
        DepvizError::DotNotFound {
            command,
        } => {
            let command = command.clone();
            ErrorContext::new(error)
                .with_suggestion(format!(
                    "Install Graphviz (https://graphviz.org/download/) or point --dot-command at an existing '{command}' executable"
                ))
                .with_details("depviz delegates graph layout to the external Graphviz toolchain")
        }
        DepvizError::DotTimeout {
            ..
        } => ErrorContext::new(error)
            .with_suggestion("Increase --dot-timeout or reduce the graph size with hide filters")
            .with_details("Very large graphs can take Graphviz a long time to lay out"),
        DepvizError::Render {
            ..
        } => ErrorContext::new(error)
            .with_suggestion("Run with --verbose to see the layout tool invocation and its output"),
        DepvizError::TreeParse {
            ..
        } => ErrorContext::new(error)
            .with_suggestion("Check that the file is a dependency tree exported as JSON")
            .with_details(
                "Each tree file holds one project: coordinate fields, optional scope/state, and a children array",
            ),
        DepvizError::InvalidColorRule {
            ..
        } => ErrorContext::new(error)
            .with_suggestion("Use the form property=value:#RRGGBB, e.g. team=platform:#6495ED"),
        DepvizError::InvalidCoordinate {
            ..
        } => ErrorContext::new(error)
            .with_suggestion("Coordinates are colon separated: group:artifact:version"),
        DepvizError::ConfigNotFound {
            ..
        } => ErrorContext::new(error)
            .with_suggestion("Create the file or drop the --config flag to use defaults"),
        DepvizError::ConfigError {
            ..
        } => ErrorContext::new(error)
            .with_suggestion("Check depviz.toml and the command line flags for conflicting values"),
        _ => ErrorContext::new(error),
    }
}
