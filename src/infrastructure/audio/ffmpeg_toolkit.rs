use std::path::{Path, PathBuf};
use std::process::Output;

use async_trait::async_trait;
use tokio::process::Command;

use crate::application::ports::{AudioToolkit, AudioToolkitError};

const STDERR_SUFFIX_CHARS: usize = 500;

/// Merge and probe via the ffmpeg/ffprobe binaries on PATH (or configured
/// absolute paths).
pub struct FfmpegToolkit {
    ffmpeg: String,
    ffprobe: String,
}

impl FfmpegToolkit {
    pub fn new(ffmpeg: impl Into<String>, ffprobe: impl Into<String>) -> Self {
        Self {
            ffmpeg: ffmpeg.into(),
            ffprobe: ffprobe.into(),
        }
    }
}

impl Default for FfmpegToolkit {
    fn default() -> Self {
        Self::new("ffmpeg", "ffprobe")
    }
}

#[async_trait]
impl AudioToolkit for FfmpegToolkit {
    async fn merge(&self, inputs: &[PathBuf], output: &Path) -> Result<(), AudioToolkitError> {
        if inputs.is_empty() {
            return Err(AudioToolkitError::NoInputs);
        }

        // The concat demuxer resolves entries relative to the list file, so
        // absolute paths keep it independent of where the list lands.
        let mut list = String::from("ffconcat version 1.0\n");
        for input in inputs {
            let absolute = tokio::fs::canonicalize(input).await?;
            list.push_str(&format!("file '{}'\n", absolute.display()));
        }

        let list_path = output.with_extension("ffconcat");
        tokio::fs::write(&list_path, list).await?;

        let list_arg = list_path.display().to_string();
        let output_arg = output.display().to_string();
        let result = run_command(
            &self.ffmpeg,
            &[
                "-hide_banner",
                "-loglevel",
                "error",
                "-y",
                "-f",
                "concat",
                "-safe",
                "0",
                "-i",
                &list_arg,
                "-c",
                "copy",
                &output_arg,
            ],
        )
        .await;

        if let Err(e) = tokio::fs::remove_file(&list_path).await {
            if e.kind() != std::io::ErrorKind::NotFound {
                tracing::warn!(error = %e, "Failed to remove concat list file");
            }
        }

        result.map(|_| ())
    }

    async fn probe_duration(&self, file: &Path) -> Result<f64, AudioToolkitError> {
        let file_arg = file.display().to_string();
        let stdout = run_command(
            &self.ffprobe,
            &[
                "-v",
                "error",
                "-show_entries",
                "format=duration",
                "-of",
                "default=noprint_wrappers=1:nokey=1",
                &file_arg,
            ],
        )
        .await?;

        let text = String::from_utf8_lossy(&stdout);
        text.trim()
            .parse::<f64>()
            .map_err(|_| AudioToolkitError::UnparseableOutput(text.trim().to_string()))
    }
}

async fn run_command(program: &str, args: &[&str]) -> Result<Vec<u8>, AudioToolkitError> {
    tracing::debug!(program, ?args, "Running external audio tool");

    let output: Output = Command::new(program)
        .args(args)
        .output()
        .await
        .map_err(|e| match e.kind() {
            std::io::ErrorKind::NotFound => AudioToolkitError::CommandMissing(program.to_string()),
            _ => AudioToolkitError::Io(e),
        })?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        let stderr = stderr.trim();
        let suffix: String = stderr
            .chars()
            .rev()
            .take(STDERR_SUFFIX_CHARS)
            .collect::<Vec<_>>()
            .into_iter()
            .rev()
            .collect();
        return Err(AudioToolkitError::CommandFailed {
            status: output.status.code().unwrap_or(-1),
            stderr: suffix,
        });
    }

    Ok(output.stdout)
}
