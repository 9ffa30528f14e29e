//! Builder for invoking the external layout tool.
//!
//! All `dot` invocations go through [`DotCommand`] so that discovery,
//! timeout handling, logging and error mapping stay consistent. The layout
//! tool is the single external process this crate runs.

use anyhow::{Context, Result};
use std::path::PathBuf;
use std::process::Stdio;
use std::time::Duration;
use tokio::process::Command;
use tokio::time::timeout;

use crate::core::DepvizError;

/// Fluent builder for layout tool invocations.
///
/// # Examples
///
/// ```rust,ignore
/// use depviz::render::DotCommand;
/// use std::time::Duration;
///
/// # async fn example() -> anyhow::Result<()> {
/// DotCommand::locate("dot")?
///     .args(["-Tpng", "-o", "graph.png", "graph.dot"])
///     .with_timeout(Some(Duration::from_secs(30)))
///     .execute_success()
///     .await?;
/// # Ok(())
/// # }
/// ```
///
/// # Default Configuration
///
/// - **Timeout**: 60 seconds, enough for very large graphs
/// - **Output capture**: always enabled, `dot` is never interactive here
/// - **Process cleanup**: the child is killed if the invocation is abandoned
#[derive(Debug)]
pub struct DotCommand {
    /// Resolved executable path
    program: PathBuf,

    /// Arguments in the order they were added
    args: Vec<String>,

    /// Maximum duration to wait for completion (None = no timeout)
    timeout_duration: Option<Duration>,

    /// Optional context string for log messages
    context: Option<String>,
}

impl DotCommand {
    /// Create a builder for an already-resolved executable path.
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            // Default timeout of 60 seconds for layout runs
            timeout_duration: Some(Duration::from_secs(60)),
            context: None,
        }
    }

    /// Look up the layout tool on `PATH` and create a builder for it.
    ///
    /// # Errors
    ///
    /// Returns [`DepvizError::DotNotFound`] when no matching executable
    /// exists, which the CLI surfaces with installation instructions.
    pub fn locate(command: &str) -> Result<Self> {
        let program = which::which(command).map_err(|_| DepvizError::DotNotFound {
            command: command.to_string(),
        })?;
        tracing::trace!(target: "dot", "Resolved layout tool to {}", program.display());
        Ok(Self::new(program))
    }

    /// Add a single argument.
    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    /// Add multiple arguments at once.
    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    /// Set a custom timeout for the command (None for no timeout).
    pub const fn with_timeout(mut self, duration: Option<Duration>) -> Self {
        self.timeout_duration = duration;
        self
    }

    /// Set a context string for logging (e.g. the render target).
    pub fn with_context(mut self, context: impl Into<String>) -> Self {
        self.context = Some(context.into());
        self
    }

    /// Execute the command and return the captured output.
    pub async fn execute(self) -> Result<DotOutput> {
        let start = std::time::Instant::now();
        let rendered = format!("{} {}", self.program.display(), self.args.join(" "));

        if let Some(ref ctx) = self.context {
            tracing::debug!(target: "dot", "({ctx}) Executing command: {rendered}");
        } else {
            tracing::debug!(target: "dot", "Executing command: {rendered}");
        }

        let mut cmd = Command::new(&self.program);
        cmd.args(&self.args).stdout(Stdio::piped()).stderr(Stdio::piped()).kill_on_drop(true);

        let output_future = cmd.output();
        let output = if let Some(duration) = self.timeout_duration {
            match timeout(duration, output_future).await {
                Ok(result) => {
                    result.with_context(|| format!("Failed to execute {rendered}"))?
                }
                Err(_) => {
                    tracing::warn!(
                        target: "dot",
                        "Command timed out after {} seconds: {rendered}",
                        duration.as_secs()
                    );
                    return Err(DepvizError::DotTimeout {
                        command: self.program.display().to_string(),
                        seconds: duration.as_secs(),
                    }
                    .into());
                }
            }
        } else {
            output_future.await.with_context(|| format!("Failed to execute {rendered}"))?
        };

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            let stdout = String::from_utf8_lossy(&output.stdout);

            tracing::debug!(
                target: "dot",
                "Command failed with exit code: {:?}",
                output.status.code()
            );

            // dot reports syntax problems on stderr, some wrappers on stdout
            let detail = if stderr.trim().is_empty() {
                stdout.trim().to_string()
            } else {
                stderr.trim().to_string()
            };
            return Err(DepvizError::Render {
                reason: format!("'{rendered}' failed: {detail}"),
            }
            .into());
        }

        let stdout = String::from_utf8_lossy(&output.stdout).to_string();
        let stderr = String::from_utf8_lossy(&output.stderr).to_string();

        if !stderr.is_empty() {
            if let Some(ref ctx) = self.context {
                tracing::debug!(target: "dot", "({}) {}", ctx, stderr.trim());
            } else {
                tracing::debug!(target: "dot", "{}", stderr.trim());
            }
        }

        let elapsed = start.elapsed();
        if elapsed.as_secs() >= 1 {
            tracing::debug!(target: "dot", "Layout took {:.2}s", elapsed.as_secs_f64());
        }

        Ok(DotOutput {
            stdout,
            stderr,
        })
    }

    /// Execute the command and check for success without keeping the output.
    pub async fn execute_success(self) -> Result<()> {
        self.execute().await?;
        Ok(())
    }
}

/// Output from a layout tool invocation.
#[derive(Debug)]
pub struct DotOutput {
    /// Captured standard output
    pub stdout: String,
    /// Captured standard error
    pub stderr: String,
}
