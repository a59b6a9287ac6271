use async_trait::async_trait;
use bytes::Bytes;

use crate::params::TranscodeParams;

/// One live transcode job. The caller pulls encoded output in bounded
/// chunks; the job never produces anything on its own.
#[async_trait]
pub trait TranscodeJob: Send {
    /// Pull up to `max_size` bytes of encoded output. The returned chunk
    /// may be shorter than requested, including empty, while the job is
    /// still running; poll again until `is_complete()`.
    async fn produce(&mut self, max_size: usize) -> anyhow::Result<Bytes>;

    /// True once the encoder has emitted all of its output. Transitions to
    /// true at most once and never back.
    fn is_complete(&self) -> bool;

    /// Release the underlying encoder resources. The job is unusable
    /// afterwards.
    async fn dispose(&mut self);
}

/// Creates transcode jobs. Construction is the point where bad source data
/// or resource exhaustion surfaces as an error.
#[async_trait]
pub trait TranscodeBackend: Send + Sync {
    async fn start(&self, params: &TranscodeParams) -> anyhow::Result<Box<dyn TranscodeJob>>;
}
