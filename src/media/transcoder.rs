// Video collaborator. Frame extraction and trimming are delegated to the ffmpeg executable.

use super::error::ProcessingError;
use async_trait::async_trait;
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use tokio::process::Command;
use tracing::debug;

/// Number of trailing stderr lines kept when ffmpeg fails.
const STDERR_TAIL_LINES: usize = 10;

#[async_trait]
pub trait VideoTranscoder: Send + Sync {
    /// Writes the frame at `at_secs` of `source` to `output` as a single image.
    async fn extract_frame(
        &self,
        source: &Path,
        at_secs: u32,
        output: &Path,
    ) -> Result<(), ProcessingError>;

    /// Writes `[start_secs, start_secs + duration_secs)` of `source` to `output`.
    async fn trim(
        &self,
        source: &Path,
        start_secs: u32,
        duration_secs: u32,
        output: &Path,
    ) -> Result<(), ProcessingError>;
}

#[derive(Debug, Clone)]
pub struct FfmpegTranscoder {
    program: PathBuf,
}

impl FfmpegTranscoder {
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
        }
    }

    async fn run(&self, operation: &'static str, args: Vec<OsString>) -> Result<(), ProcessingError> {
        debug!("Running {} {:?}", self.program.display(), args);

        let output = Command::new(&self.program)
            .args(&args)
            // Only fires when the owning upload task is torn down with the runtime.
            .kill_on_drop(true)
            .output()
            .await
            .map_err(|source| ProcessingError::Spawn {
                program: self.program.display().to_string(),
                source,
            })?;

        if !output.status.success() {
            return Err(ProcessingError::TranscoderFailed {
                operation,
                status: output.status,
                stderr: stderr_tail(&output.stderr),
            });
        }

        Ok(())
    }
}

#[async_trait]
impl VideoTranscoder for FfmpegTranscoder {
    async fn extract_frame(
        &self,
        source: &Path,
        at_secs: u32,
        output: &Path,
    ) -> Result<(), ProcessingError> {
        self.run("frame extraction", frame_args(source, at_secs, output))
            .await?;
        // ffmpeg exits cleanly when seeking past the end, it just writes nothing.
        ensure_output("frame extraction", output).await
    }

    async fn trim(
        &self,
        source: &Path,
        start_secs: u32,
        duration_secs: u32,
        output: &Path,
    ) -> Result<(), ProcessingError> {
        self.run("trim", trim_args(source, start_secs, duration_secs, output))
            .await?;
        ensure_output("trim", output).await
    }
}

fn common_args() -> Vec<OsString> {
    ["-hide_banner", "-nostdin", "-loglevel", "error", "-y"]
        .into_iter()
        .map(OsString::from)
        .collect()
}

fn frame_args(source: &Path, at_secs: u32, output: &Path) -> Vec<OsString> {
    let mut args = common_args();
    let tail: [OsString; 9] = [
        "-ss".into(),
        at_secs.to_string().into(),
        "-i".into(),
        source.as_os_str().to_owned(),
        "-frames:v".into(),
        "1".into(),
        "-update".into(),
        "1".into(),
        output.as_os_str().to_owned(),
    ];
    args.extend(tail);
    args
}

fn trim_args(source: &Path, start_secs: u32, duration_secs: u32, output: &Path) -> Vec<OsString> {
    let mut args = common_args();
    let tail: [OsString; 7] = [
        "-ss".into(),
        start_secs.to_string().into(),
        "-i".into(),
        source.as_os_str().to_owned(),
        "-t".into(),
        duration_secs.to_string().into(),
        output.as_os_str().to_owned(),
    ];
    args.extend(tail);
    args
}

async fn ensure_output(operation: &'static str, path: &Path) -> Result<(), ProcessingError> {
    match tokio::fs::metadata(path).await {
        Ok(meta) if meta.is_file() && meta.len() > 0 => Ok(()),
        _ => Err(ProcessingError::MissingOutput {
            operation,
            path: path.to_path_buf(),
        }),
    }
}

fn stderr_tail(stderr: &[u8]) -> String {
    let text = String::from_utf8_lossy(stderr);
    let lines: Vec<&str> = text.trim().lines().collect();
    let start = lines.len().saturating_sub(STDERR_TAIL_LINES);
    lines[start..].join("\n")
}
