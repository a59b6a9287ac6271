use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;

use async_trait::async_trait;
use bytes::Bytes;
use ffmpeg_pipe::job::{TranscodeBackend, TranscodeJob};
use ffmpeg_pipe::params::TranscodeParams;

use crate::media::types::{AudioBitrate, AudioCodec, MediaRequest, MediaResponse};

/// Resolves an opaque track id to a playable source path.
#[async_trait]
pub trait TrackResolver: Send + Sync {
    /// `Ok(None)` means the track does not (or no longer does) exist.
    async fn resolve(&self, track_id: i64) -> anyhow::Result<Option<PathBuf>>;
}

/// Limits applied to the sessions of one connection.
#[derive(Debug, Clone, Copy)]
pub struct SessionLimits {
    /// Ceiling on concurrently live transcode jobs.
    pub max_sessions: usize,
    /// Upper bound on the chunk size of a single part response.
    pub max_part_size: usize,
}

/// One live transcode job together with the parameters it was created with.
struct Session {
    params: TranscodeParams,
    job: Box<dyn TranscodeJob>,
}

/// Connection-scoped session manager: owns the handle space, the admission
/// ceiling and every live transcode job of one client connection.
///
/// Requests are handled one at a time (the caller holds `&mut self` for the
/// whole request); a failing request never touches sibling sessions.
pub struct SessionManager {
    limits: SessionLimits,
    resolver: Arc<dyn TrackResolver>,
    backend: Arc<dyn TranscodeBackend>,
    sessions: HashMap<u32, Session>,
    next_handle: u32,
}

impl SessionManager {
    pub fn new(
        limits: SessionLimits,
        resolver: Arc<dyn TrackResolver>,
        backend: Arc<dyn TranscodeBackend>,
    ) -> Self {
        Self {
            limits,
            resolver,
            backend,
            sessions: HashMap::new(),
            next_handle: 0,
        }
    }

    /// Number of currently live sessions.
    pub fn live_sessions(&self) -> usize {
        self.sessions.len()
    }

    /// Handles one request. `Err` fails that request only: the caller
    /// answers it with a failure frame and the registry stays consistent.
    pub async fn process(&mut self, request: MediaRequest) -> anyhow::Result<MediaResponse> {
        match request {
            MediaRequest::Prepare {
                codec,
                bitrate,
                track_id,
            } => self.prepare(codec, bitrate, track_id).await,
            MediaRequest::GetPart {
                handle,
                requested_size,
            } => self.get_part(handle, requested_size).await,
            MediaRequest::Terminate { handle } => self.terminate(handle).await,
        }
    }

    async fn prepare(
        &mut self,
        codec: AudioCodec,
        bitrate: AudioBitrate,
        track_id: i64,
    ) -> anyhow::Result<MediaResponse> {
        if self.sessions.len() + 1 > self.limits.max_sessions {
            log::warn!("media: transcode limit reached, rejecting prepare");
            // Empty result; existing jobs keep running.
            return Ok(MediaResponse::PrepareResult { handle: None });
        }

        let path = match self.resolver.resolve(track_id).await? {
            Some(path) => path,
            None => {
                log::warn!("media: requested track {} does not exist", track_id);
                return Ok(MediaResponse::PrepareResult { handle: None });
            }
        };

        let params = TranscodeParams::new(path, codec.output_format(), bitrate.bits_per_second());
        let job = self.backend.start(&params).await?;

        let handle = self.allocate_handle();
        log::debug!(
            "media: set up new transcode, handle = {}, source = {}, bitrate = {}",
            handle,
            params.input.display(),
            params.bitrate_bps
        );
        self.sessions.insert(handle, Session { params, job });

        Ok(MediaResponse::PrepareResult {
            handle: Some(handle),
        })
    }

    async fn get_part(&mut self, handle: u32, requested_size: usize) -> anyhow::Result<MediaResponse> {
        let size = requested_size.min(self.limits.max_part_size);

        let session = match self.sessions.get_mut(&handle) {
            Some(session) => session,
            None => {
                log::warn!("media: no transcode job for handle {}", handle);
                return Ok(MediaResponse::PartResult { data: Vec::new() });
            }
        };

        let data = if session.job.is_complete() {
            Bytes::new()
        } else {
            session.job.produce(size).await?
        };

        log::debug!(
            "media: get part, handle = {}, complete = {}, size = {}",
            handle,
            session.job.is_complete(),
            data.len()
        );

        Ok(MediaResponse::PartResult {
            data: data.to_vec(),
        })
    }

    async fn terminate(&mut self, handle: u32) -> anyhow::Result<MediaResponse> {
        match self.sessions.remove(&handle) {
            Some(mut session) => {
                session.job.dispose().await;
                log::debug!(
                    "media: terminated transcode for handle {} ({})",
                    handle,
                    session.params.input.display()
                );
            }
            None => {
                log::warn!("media: no transcode job for handle {}", handle);
            }
        }

        Ok(MediaResponse::TerminateResult {})
    }

    /// Disposes every live session. Called when the owning connection closes.
    pub async fn shutdown(&mut self) {
        let count = self.sessions.len();
        for (_, mut session) in self.sessions.drain() {
            session.job.dispose().await;
        }
        if count > 0 {
            log::debug!("media: disposed {} leftover session(s)", count);
        }
    }

    fn allocate_handle(&mut self) -> u32 {
        // Handles only grow for the lifetime of the connection, so a live
        // handle can never be handed out twice.
        let handle = self.next_handle;
        self.next_handle += 1;
        debug_assert!(!self.sessions.contains_key(&handle));
        handle
    }
}

#[cfg(test)]
#[path = "session_test.rs"]
mod session_test;
