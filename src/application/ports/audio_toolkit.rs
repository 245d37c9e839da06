use std::path::{Path, PathBuf};

use async_trait::async_trait;

/// External merge/probe tooling. Inputs and outputs are real filesystem
/// paths because the backing binaries work on files, not buffers.
#[async_trait]
pub trait AudioToolkit: Send + Sync {
    /// Sequentially merge `inputs` (in slice order) into `output`.
    async fn merge(&self, inputs: &[PathBuf], output: &Path) -> Result<(), AudioToolkitError>;

    /// Duration of the audio file, in (possibly fractional) seconds.
    async fn probe_duration(&self, file: &Path) -> Result<f64, AudioToolkitError>;
}

#[derive(Debug, thiserror::Error)]
pub enum AudioToolkitError {
    #[error("no input files to merge")]
    NoInputs,
    #[error("command missing: {0}")]
    CommandMissing(String),
    #[error("command exited with status {status}: {stderr}")]
    CommandFailed { status: i32, stderr: String },
    #[error("unparseable tool output: {0}")]
    UnparseableOutput(String),
    #[error("io: {0}")]
    Io(#[from] std::io::Error),
}
