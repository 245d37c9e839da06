use std::path::PathBuf;
use std::sync::Arc;

use base64::{Engine as _, engine::general_purpose};
use uuid::Uuid;

use crate::application::ports::{AudioToolkit, AudioToolkitError};
use crate::domain::PodcastId;

/// Persists synthesized buffers to scratch storage, merges them through the
/// external toolkit and encodes the final artifact. Every scratch file is
/// removed on every exit path.
pub struct AudioAssembler {
    toolkit: Arc<dyn AudioToolkit>,
    scratch_dir: PathBuf,
}

#[derive(Debug, thiserror::Error)]
pub enum AssemblyError {
    #[error("no audible segments to assemble")]
    NoAudibleSegments,
    #[error("scratch io: {0}")]
    ScratchIo(#[from] std::io::Error),
    #[error("merge failed: {0}")]
    Merge(AudioToolkitError),
    #[error("probe failed: {0}")]
    Probe(AudioToolkitError),
}

impl AudioAssembler {
    pub fn new(toolkit: Arc<dyn AudioToolkit>, scratch_dir: PathBuf) -> Self {
        Self {
            toolkit,
            scratch_dir,
        }
    }

    /// Merges the non-null buffers, in input order, into one audio buffer.
    /// Requires at least one non-null buffer.
    pub async fn stitch(
        &self,
        buffers: &[Option<Vec<u8>>],
        job_id: PodcastId,
    ) -> Result<Vec<u8>, AssemblyError> {
        let mut scratch = ScratchFiles::new();
        let result = self.stitch_inner(buffers, job_id, &mut scratch).await;
        scratch.cleanup().await;
        result
    }

    async fn stitch_inner(
        &self,
        buffers: &[Option<Vec<u8>>],
        job_id: PodcastId,
        scratch: &mut ScratchFiles,
    ) -> Result<Vec<u8>, AssemblyError> {
        let valid: Vec<&Vec<u8>> = buffers.iter().flatten().collect();
        if valid.is_empty() {
            return Err(AssemblyError::NoAudibleSegments);
        }

        tokio::fs::create_dir_all(&self.scratch_dir).await?;

        // Job id plus a per-call token keeps concurrently running jobs (and
        // retries of the same job) from colliding on scratch names.
        let token = scratch_token();
        let mut inputs = Vec::with_capacity(valid.len());
        for (index, buffer) in valid.iter().enumerate() {
            let path = self.scratch_dir.join(format!(
                "{}-{}-{:03}.mp3",
                job_id.as_uuid(),
                token,
                index
            ));
            scratch.register(path.clone());
            tokio::fs::write(&path, buffer).await?;
            inputs.push(path);
        }

        let output = self
            .scratch_dir
            .join(format!("{}-{}-merged.mp3", job_id.as_uuid(), token));
        scratch.register(output.clone());

        self.toolkit
            .merge(&inputs, &output)
            .await
            .map_err(AssemblyError::Merge)?;

        let merged = tokio::fs::read(&output).await?;
        tracing::info!(
            job_id = %job_id.as_uuid(),
            segments = inputs.len(),
            bytes = merged.len(),
            "Stitched dialogue segments"
        );
        Ok(merged)
    }

    /// Probed duration in whole seconds; `0` when probing fails.
    pub async fn duration(&self, buffer: &[u8]) -> u32 {
        let mut scratch = ScratchFiles::new();
        let probed = self.probe_inner(buffer, &mut scratch).await;
        scratch.cleanup().await;
        match probed {
            Ok(seconds) => seconds.round() as u32,
            Err(e) => {
                tracing::warn!(error = %e, "Duration probe failed, recording zero");
                0
            }
        }
    }

    async fn probe_inner(
        &self,
        buffer: &[u8],
        scratch: &mut ScratchFiles,
    ) -> Result<f64, AssemblyError> {
        tokio::fs::create_dir_all(&self.scratch_dir).await?;
        let path = self
            .scratch_dir
            .join(format!("probe-{}.mp3", scratch_token()));
        scratch.register(path.clone());
        tokio::fs::write(&path, buffer).await?;
        self.toolkit
            .probe_duration(&path)
            .await
            .map_err(AssemblyError::Probe)
    }

    /// Deterministic transform of the merged audio into a self-contained,
    /// transportable artifact reference.
    pub fn encode(&self, buffer: &[u8]) -> String {
        let b64 = general_purpose::STANDARD.encode(buffer);
        format!("data:audio/mpeg;base64,{b64}")
    }
}

fn scratch_token() -> String {
    let mut token = Uuid::new_v4().simple().to_string();
    token.truncate(8);
    token
}

/// Paths registered here are deleted when `cleanup` runs, whatever the
/// surrounding operation did. A file that already vanished is not an error;
/// other cleanup failures are logged and swallowed.
struct ScratchFiles {
    paths: Vec<PathBuf>,
}

impl ScratchFiles {
    fn new() -> Self {
        Self { paths: Vec::new() }
    }

    fn register(&mut self, path: PathBuf) {
        self.paths.push(path);
    }

    async fn cleanup(self) {
        for path in self.paths {
            if let Err(e) = tokio::fs::remove_file(&path).await {
                if e.kind() != std::io::ErrorKind::NotFound {
                    tracing::warn!(
                        error = %e,
                        path = %path.display(),
                        "Failed to remove scratch file"
                    );
                }
            }
        }
    }
}
