//! Mutation tool integration (`dotnet add package`)
//!
//! This module provides:
//! - The `PackageMutator` trait the orchestrator invokes through
//! - The real `dotnet` CLI invocation with both output streams drained
//!   concurrently before the exit code is read
//!
//! The tool performs the actual manifest rewrite and dependency
//! resolution; dotup only interprets its exit code and output.

use crate::error::ToolError;
use async_trait::async_trait;
use std::path::Path;
use std::process::Stdio;
use tokio::io::{AsyncRead, AsyncReadExt};
use tokio::process::Command;

/// Captured result of one mutation tool run
#[derive(Debug, Clone)]
pub struct MutationOutput {
    /// Captured standard output
    pub stdout: String,
    /// Captured standard error
    pub stderr: String,
    /// Process exit code (-1 when terminated by a signal)
    pub code: i32,
}

impl MutationOutput {
    /// Whether the tool reported success via its exit code
    pub fn success(&self) -> bool {
        self.code == 0
    }

    /// The last non-empty stdout line, if it carries an error marker
    ///
    /// Some tool versions report errors as text despite a zero exit code;
    /// this is the double-check the caller surfaces as a warning.
    pub fn trailing_error_line(&self) -> Option<&str> {
        self.stdout
            .lines()
            .rev()
            .map(str::trim)
            .find(|line| !line.is_empty())
            .filter(|line| line.starts_with("error"))
    }
}

/// Trait for invoking the external mutation tool
#[async_trait]
pub trait PackageMutator: Send + Sync {
    /// Pin `package_id` to `version` from `source_url`, scoped to the
    /// project's containing directory
    async fn add_package(
        &self,
        project_dir: &Path,
        package_id: &str,
        version: &str,
        source_url: &str,
    ) -> Result<MutationOutput, ToolError>;
}

/// The real dotnet CLI
pub struct DotnetCli {
    program: String,
}

impl DotnetCli {
    /// Create a mutator that runs `dotnet`
    pub fn new() -> Self {
        Self {
            program: "dotnet".to_string(),
        }
    }

    /// Create a mutator running a different program (for testing)
    pub fn with_program(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
        }
    }
}

impl Default for DotnetCli {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl PackageMutator for DotnetCli {
    async fn add_package(
        &self,
        project_dir: &Path,
        package_id: &str,
        version: &str,
        source_url: &str,
    ) -> Result<MutationOutput, ToolError> {
        let mut child = Command::new(&self.program)
            .args(["add", "package", package_id, "-v", version, "-s", source_url])
            .current_dir(project_dir)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| ToolError::Spawn { source: e })?;

        let stdout_pipe = child.stdout.take().ok_or_else(|| ToolError::Spawn {
            source: std::io::Error::other("stdout not captured"),
        })?;
        let stderr_pipe = child.stderr.take().ok_or_else(|| ToolError::Spawn {
            source: std::io::Error::other("stderr not captured"),
        })?;

        // Drain both streams before waiting so a full pipe buffer cannot
        // deadlock the child
        let (stdout, stderr) = tokio::try_join!(drain(stdout_pipe), drain(stderr_pipe))
            .map_err(|e| ToolError::Spawn { source: e })?;

        let status = child
            .wait()
            .await
            .map_err(|e| ToolError::Spawn { source: e })?;

        Ok(MutationOutput {
            stdout,
            stderr,
            code: status.code().unwrap_or(-1),
        })
    }
}

async fn drain(mut pipe: impl AsyncRead + Unpin) -> std::io::Result<String> {
    let mut output = String::new();
    pipe.read_to_string(&mut output).await?;
    Ok(output)
}
