// In-process stand-ins for the media collaborators, used by tests.

use super::{ImageResizer, ProcessingError, VideoTranscoder};
use async_trait::async_trait;
use std::path::Path;
use std::sync::{Arc, Mutex};
use tokio::sync::Notify;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    Frame { at_secs: u32 },
    Trim { start_secs: u32, duration_secs: u32 },
}

/// Records every call and writes placeholder outputs, optionally failing on one step.
#[derive(Debug, Default)]
pub struct FakeTranscoder {
    fail_at: Option<Step>,
    calls: Mutex<Vec<Step>>,
    gate: Option<Gate>,
}

/// Holds frame extraction until released, announcing when it has started.
#[derive(Debug, Clone, Default)]
pub struct Gate {
    pub started: Arc<Notify>,
    pub release: Arc<Notify>,
}

impl FakeTranscoder {
    pub fn failing_at(step: Step) -> Self {
        Self {
            fail_at: Some(step),
            ..Default::default()
        }
    }

    pub fn gated(gate: Gate) -> Self {
        Self {
            gate: Some(gate),
            ..Default::default()
        }
    }

    pub fn calls(&self) -> Vec<Step> {
        self.calls.lock().unwrap().clone()
    }

    async fn perform(&self, step: Step, output: &Path, contents: &[u8]) -> Result<(), ProcessingError> {
        self.calls.lock().unwrap().push(step);
        if self.fail_at == Some(step) {
            return Err(ProcessingError::MissingOutput {
                operation: "fake",
                path: output.to_path_buf(),
            });
        }
        tokio::fs::write(output, contents).await?;
        Ok(())
    }
}

#[async_trait]
impl VideoTranscoder for FakeTranscoder {
    async fn extract_frame(
        &self,
        _source: &Path,
        at_secs: u32,
        output: &Path,
    ) -> Result<(), ProcessingError> {
        if let Some(gate) = &self.gate {
            gate.started.notify_one();
            gate.release.notified().await;
        }
        self.perform(Step::Frame { at_secs }, output, b"\x89PNG fake frame")
            .await
    }

    async fn trim(
        &self,
        source: &Path,
        start_secs: u32,
        duration_secs: u32,
        output: &Path,
    ) -> Result<(), ProcessingError> {
        let contents = tokio::fs::read(source).await?;
        self.perform(
            Step::Trim {
                start_secs,
                duration_secs,
            },
            output,
            &contents,
        )
        .await
    }
}

/// Copies the source to the output, or fails with an I/O error.
#[derive(Debug, Default)]
pub struct FakeResizer {
    fail: bool,
    widths: Mutex<Vec<u32>>,
}

impl FakeResizer {
    pub fn failing() -> Self {
        Self {
            fail: true,
            widths: Mutex::default(),
        }
    }

    pub fn widths(&self) -> Vec<u32> {
        self.widths.lock().unwrap().clone()
    }
}

#[async_trait]
impl ImageResizer for FakeResizer {
    async fn resize_to_width(
        &self,
        source: &Path,
        width: u32,
        output: &Path,
    ) -> Result<(), ProcessingError> {
        self.widths.lock().unwrap().push(width);
        if self.fail {
            return Err(ProcessingError::Io(std::io::Error::other("fake decode failure")));
        }
        tokio::fs::copy(source, output).await?;
        Ok(())
    }
}
