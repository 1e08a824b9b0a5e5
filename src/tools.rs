//! # External Transcoder
//!
//! Locates and runs the `ffmpeg`/`ffprobe` executables every media operation
//! is delegated to.

use std::ffi::OsStr;
use std::path::{Path, PathBuf};
use std::process::{Output, Stdio};

use tokio::process::Command;
use tracing::{debug, info};

use crate::{
    config::ToolsConfig,
    error::{PreconditionError, Result},
};

/// Handles to the ffmpeg toolchain
#[derive(Debug, Clone)]
pub struct FfmpegTools {
    ffmpeg: PathBuf,
    ffprobe: PathBuf,
}

impl FfmpegTools {
    pub fn new(config: &ToolsConfig) -> Self {
        Self {
            ffmpeg: config.ffmpeg.clone(),
            ffprobe: config.ffprobe.clone(),
        }
    }

    pub fn ffmpeg_path(&self) -> &Path {
        &self.ffmpeg
    }

    pub fn ffprobe_path(&self) -> &Path {
        &self.ffprobe
    }

    /// Check that both executables can be started
    pub async fn probe(&self) -> Result<()> {
        for tool in [&self.ffmpeg, &self.ffprobe] {
            Self::check_version(tool).await?;
        }
        info!("Found external transcoder ({})", self.ffmpeg.display());
        Ok(())
    }

    async fn check_version(tool: &Path) -> Result<()> {
        let name = tool.display().to_string();
        let status = Command::new(tool)
            .arg("-version")
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
            .await
            .map_err(|e| PreconditionError::ToolMissing {
                tool: name.clone(),
                reason: e.to_string(),
            })?;

        if !status.success() {
            return Err(PreconditionError::ToolMissing {
                tool: name,
                reason: format!("'-version' exited with {}", status),
            }
            .into());
        }

        Ok(())
    }

    /// Run ffmpeg with the given arguments and wait for it to finish
    pub async fn run_ffmpeg<I, S>(&self, args: I) -> std::io::Result<Output>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<OsStr>,
    {
        Self::run(&self.ffmpeg, args).await
    }

    /// Run ffprobe with the given arguments and wait for it to finish
    pub async fn run_ffprobe<I, S>(&self, args: I) -> std::io::Result<Output>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<OsStr>,
    {
        Self::run(&self.ffprobe, args).await
    }

    async fn run<I, S>(tool: &Path, args: I) -> std::io::Result<Output>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<OsStr>,
    {
        let mut cmd = Command::new(tool);
        cmd.args(args).stdin(Stdio::null()).kill_on_drop(true);
        debug!("Running {:?}", cmd.as_std());
        cmd.output().await
    }

    /// Convert a failed spawn into a precondition error when the tool is absent
    pub(crate) fn spawn_error(tool: &Path, err: std::io::Error) -> Option<PreconditionError> {
        PreconditionError::from_spawn(&tool.display().to_string(), &err)
    }
}

/// Last non-empty lines of a tool's stderr, for error messages
pub(crate) fn stderr_tail(output: &Output) -> String {
    let stderr = String::from_utf8_lossy(&output.stderr);
    let lines: Vec<&str> = stderr.lines().filter(|l| !l.trim().is_empty()).collect();
    let start = lines.len().saturating_sub(5);
    if lines.is_empty() {
        format!("exited with {}", output.status)
    } else {
        lines[start..].join("\n")
    }
}
