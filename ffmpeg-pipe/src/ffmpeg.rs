use std::path::{Path, PathBuf};
use std::process::Stdio;

use async_trait::async_trait;
use bytes::Bytes;
use tokio::io::AsyncReadExt;
use tokio::process::{Child, ChildStdout, Command};

use crate::job::{TranscodeBackend, TranscodeJob};
use crate::params::TranscodeParams;

/// Backend that runs one ffmpeg child process per job.
pub struct FfmpegBackend {
    ffmpeg_path: PathBuf,
}

impl FfmpegBackend {
    pub fn new(ffmpeg_path: impl Into<PathBuf>) -> Self {
        Self {
            ffmpeg_path: ffmpeg_path.into(),
        }
    }
}

#[async_trait]
impl TranscodeBackend for FfmpegBackend {
    async fn start(&self, params: &TranscodeParams) -> anyhow::Result<Box<dyn TranscodeJob>> {
        let job = FfmpegJob::spawn(&self.ffmpeg_path, params).await?;
        Ok(Box::new(job))
    }
}

/// Command line for one job: source file in, encoded audio on stdout.
fn build_args(params: &TranscodeParams) -> Vec<String> {
    vec![
        "-hide_banner".to_string(),
        "-loglevel".to_string(),
        "error".to_string(),
        "-i".to_string(),
        params.input.to_string_lossy().into_owned(),
        "-vn".to_string(),
        "-c:a".to_string(),
        params.format.audio_codec().to_string(),
        "-b:a".to_string(),
        params.bitrate_bps.to_string(),
        "-f".to_string(),
        params.format.muxer().to_string(),
        "pipe:1".to_string(),
    ]
}

/// A running ffmpeg process whose stdout is drained in bounded reads.
pub struct FfmpegJob {
    child: Child,
    stdout: ChildStdout,
    complete: bool,
}

impl FfmpegJob {
    pub async fn spawn(ffmpeg: &Path, params: &TranscodeParams) -> anyhow::Result<Self> {
        if !params.input.is_file() {
            anyhow::bail!("input not found: {}", params.input.display());
        }

        let mut child = Command::new(ffmpeg)
            .args(build_args(params))
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::null())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| anyhow::anyhow!("spawn {}: {}", ffmpeg.display(), e))?;

        let stdout = child
            .stdout
            .take()
            .ok_or_else(|| anyhow::anyhow!("ffmpeg stdout not captured"))?;

        log::debug!(
            "ffmpeg: started pid {:?} for {}",
            child.id(),
            params.input.display()
        );

        Ok(Self {
            child,
            stdout,
            complete: false,
        })
    }
}

#[async_trait]
impl TranscodeJob for FfmpegJob {
    async fn produce(&mut self, max_size: usize) -> anyhow::Result<Bytes> {
        if self.complete || max_size == 0 {
            return Ok(Bytes::new());
        }

        // One bounded read; the pipe decides how much is ready right now.
        let mut buf = vec![0u8; max_size];
        let n = self.stdout.read(&mut buf).await?;
        if n == 0 {
            self.complete = true;
            let status = self.child.wait().await?;
            log::debug!("ffmpeg: job finished, status {}", status);
            return Ok(Bytes::new());
        }

        buf.truncate(n);
        Ok(Bytes::from(buf))
    }

    fn is_complete(&self) -> bool {
        self.complete
    }

    async fn dispose(&mut self) {
        if let Err(e) = self.child.start_kill() {
            // Process already gone; nothing to release.
            log::debug!("ffmpeg: kill: {}", e);
        }
        let _ = self.child.wait().await;
    }
}

#[cfg(test)]
#[path = "ffmpeg_test.rs"]
mod ffmpeg_test;
