use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::Mutex;

use base64::{Engine as _, engine::general_purpose};

use podsmith::application::ports::{AudioToolkit, AudioToolkitError};
use podsmith::application::services::{AssemblyError, AudioAssembler};
use podsmith::domain::PodcastId;

/// Concatenates input files byte-wise in place of a real merge binary.
struct FakeToolkit {
    merge_calls: Mutex<Vec<Vec<PathBuf>>>,
    fail_merge: bool,
    probe_result: Option<f64>,
}

impl FakeToolkit {
    fn new() -> Self {
        Self {
            merge_calls: Mutex::new(Vec::new()),
            fail_merge: false,
            probe_result: Some(12.0),
        }
    }

    fn failing_merge() -> Self {
        Self {
            fail_merge: true,
            ..Self::new()
        }
    }

    fn with_probe(probe_result: Option<f64>) -> Self {
        Self {
            probe_result,
            ..Self::new()
        }
    }

    fn merge_count(&self) -> usize {
        self.merge_calls.lock().unwrap().len()
    }
}

#[async_trait::async_trait]
impl AudioToolkit for FakeToolkit {
    async fn merge(&self, inputs: &[PathBuf], output: &Path) -> Result<(), AudioToolkitError> {
        self.merge_calls.lock().unwrap().push(inputs.to_vec());
        if self.fail_merge {
            return Err(AudioToolkitError::CommandFailed {
                status: 1,
                stderr: "synthetic merge failure".to_string(),
            });
        }
        let mut merged = Vec::new();
        for input in inputs {
            merged.extend(tokio::fs::read(input).await?);
        }
        tokio::fs::write(output, merged).await?;
        Ok(())
    }

    async fn probe_duration(&self, _file: &Path) -> Result<f64, AudioToolkitError> {
        self.probe_result
            .ok_or_else(|| AudioToolkitError::UnparseableOutput("N/A".to_string()))
    }
}

fn scratch_entries(dir: &Path) -> usize {
    match std::fs::read_dir(dir) {
        Ok(entries) => entries.count(),
        Err(_) => 0,
    }
}

#[tokio::test]
async fn given_only_null_buffers_when_stitching_then_errors_and_writes_nothing() {
    let scratch = tempfile::tempdir().unwrap();
    let toolkit = Arc::new(FakeToolkit::new());
    let assembler = AudioAssembler::new(toolkit.clone(), scratch.path().to_path_buf());

    let result = assembler.stitch(&[None, None], PodcastId::new()).await;

    assert!(matches!(result, Err(AssemblyError::NoAudibleSegments)));
    assert_eq!(toolkit.merge_count(), 0);
    assert_eq!(scratch_entries(scratch.path()), 0);
}

#[tokio::test]
async fn given_valid_buffers_when_stitching_then_merges_in_input_order_and_cleans_scratch() {
    let scratch = tempfile::tempdir().unwrap();
    let toolkit = Arc::new(FakeToolkit::new());
    let assembler = AudioAssembler::new(toolkit.clone(), scratch.path().to_path_buf());

    let buffers = vec![
        Some(b"one".to_vec()),
        None,
        Some(b"two".to_vec()),
        Some(b"three".to_vec()),
    ];

    let merged = assembler.stitch(&buffers, PodcastId::new()).await.unwrap();

    assert_eq!(merged, b"onetwothree");

    let calls = toolkit.merge_calls.lock().unwrap().clone();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].len(), 3);
    // Input order is preserved in the scratch file names.
    let mut sorted = calls[0].clone();
    sorted.sort();
    assert_eq!(calls[0], sorted);

    assert_eq!(scratch_entries(scratch.path()), 0);
}

#[tokio::test]
async fn given_merge_failure_when_stitching_then_errors_and_still_cleans_scratch() {
    let scratch = tempfile::tempdir().unwrap();
    let toolkit = Arc::new(FakeToolkit::failing_merge());
    let assembler = AudioAssembler::new(toolkit, scratch.path().to_path_buf());

    let result = assembler
        .stitch(&[Some(b"audio".to_vec())], PodcastId::new())
        .await;

    assert!(matches!(result, Err(AssemblyError::Merge(_))));
    assert_eq!(scratch_entries(scratch.path()), 0);
}

#[tokio::test]
async fn given_fractional_probe_when_measuring_duration_then_result_is_rounded() {
    let scratch = tempfile::tempdir().unwrap();
    let toolkit = Arc::new(FakeToolkit::with_probe(Some(12.6)));
    let assembler = AudioAssembler::new(toolkit, scratch.path().to_path_buf());

    let duration = assembler.duration(b"audio").await;

    assert_eq!(duration, 13);
    assert_eq!(scratch_entries(scratch.path()), 0);
}

#[tokio::test]
async fn given_probe_failure_when_measuring_duration_then_zero_and_scratch_is_clean() {
    let scratch = tempfile::tempdir().unwrap();
    let toolkit = Arc::new(FakeToolkit::with_probe(None));
    let assembler = AudioAssembler::new(toolkit, scratch.path().to_path_buf());

    let duration = assembler.duration(b"audio").await;

    assert_eq!(duration, 0);
    assert_eq!(scratch_entries(scratch.path()), 0);
}

#[tokio::test]
async fn given_a_buffer_when_encoding_then_produces_a_decodable_data_uri() {
    let scratch = tempfile::tempdir().unwrap();
    let toolkit = Arc::new(FakeToolkit::new());
    let assembler = AudioAssembler::new(toolkit, scratch.path().to_path_buf());

    let artifact = assembler.encode(b"merged audio bytes");

    let payload = artifact
        .strip_prefix("data:audio/mpeg;base64,")
        .expect("data uri prefix");
    let decoded = general_purpose::STANDARD.decode(payload).unwrap();
    assert_eq!(decoded, b"merged audio bytes");
}

#[tokio::test]
async fn given_concurrent_jobs_when_stitching_then_scratch_names_do_not_collide() {
    let scratch = tempfile::tempdir().unwrap();
    let toolkit = Arc::new(FakeToolkit::new());
    let assembler = Arc::new(AudioAssembler::new(
        toolkit,
        scratch.path().to_path_buf(),
    ));

    let a = {
        let assembler = Arc::clone(&assembler);
        tokio::spawn(async move {
            assembler
                .stitch(&[Some(b"aaa".to_vec())], PodcastId::new())
                .await
        })
    };
    let b = {
        let assembler = Arc::clone(&assembler);
        tokio::spawn(async move {
            assembler
                .stitch(&[Some(b"bbb".to_vec())], PodcastId::new())
                .await
        })
    };

    assert_eq!(a.await.unwrap().unwrap(), b"aaa");
    assert_eq!(b.await.unwrap().unwrap(), b"bbb");
    assert_eq!(scratch_entries(scratch.path()), 0);
}
