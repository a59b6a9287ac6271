use std::net::SocketAddr;
use std::sync::Arc;

use futures::{SinkExt, StreamExt};
use tokio::net::{TcpListener, TcpStream};
use tokio_util::codec::{Framed, LengthDelimitedCodec};
use tokio_util::sync::CancellationToken;

use ffmpeg_pipe::ffmpeg::FfmpegBackend;
use ffmpeg_pipe::job::TranscodeBackend;

use crate::config;
use crate::db::DbTrackResolver;
use crate::media::session::{SessionLimits, SessionManager, TrackResolver};
use crate::media::types::{MediaRequest, MediaResponse};

pub(crate) fn start_media_server(cancel: CancellationToken) {
    tokio::spawn(async move {
        let config = config::config();
        let resolver: Arc<dyn TrackResolver> = Arc::new(DbTrackResolver);
        let backend: Arc<dyn TranscodeBackend> = Arc::new(FfmpegBackend::new(config.ffmpeg_path()));

        let listener = TcpListener::bind(config.media_bind()).await.unwrap();
        log::info!("media: server started on {}", config.media_bind());

        loop {
            tokio::select! {
                _ = cancel.cancelled() => {
                    log::info!("media: server cancelled");
                    break;
                }
                accepted = listener.accept() => {
                    match accepted {
                        Ok((stream, peer)) => {
                            let resolver = Arc::clone(&resolver);
                            let backend = Arc::clone(&backend);
                            let cancel = cancel.clone();
                            tokio::spawn(async move {
                                handle_connection(stream, peer, resolver, backend, cancel).await;
                            });
                        }
                        Err(e) => {
                            log::warn!("media: accept failed: {}", e);
                        }
                    }
                }
            }
        }
    });
}

/// One client connection: requests are handled strictly in order, and the
/// next frame is not read before the current one has been answered. All
/// session state lives in the connection's own manager and is torn down
/// when the connection goes away.
async fn handle_connection(
    stream: TcpStream,
    peer: SocketAddr,
    resolver: Arc<dyn TrackResolver>,
    backend: Arc<dyn TranscodeBackend>,
    cancel: CancellationToken,
) {
    log::info!("media: connection from {}", peer);

    let config = config::config();
    let limits = SessionLimits {
        max_sessions: config.max_sessions(),
        max_part_size: config.max_part_size(),
    };
    let mut manager = SessionManager::new(limits, resolver, backend);
    let mut framed = Framed::new(stream, LengthDelimitedCodec::new());

    loop {
        tokio::select! {
            _ = cancel.cancelled() => {
                break;
            }
            frame = framed.next() => {
                let frame = match frame {
                    None => break,
                    Some(Err(e)) => {
                        log::warn!("media: {}: read failed: {}", peer, e);
                        break;
                    }
                    Some(Ok(frame)) => frame,
                };

                let response = match serde_json::from_slice::<MediaRequest>(&frame) {
                    Ok(request) => match manager.process(request).await {
                        Ok(response) => response,
                        Err(e) => {
                            log::error!("media: {}: request failed: {:#}", peer, e);
                            MediaResponse::Failure {
                                reason: format!("{:#}", e),
                            }
                        }
                    },
                    Err(e) => {
                        log::error!("media: {}: malformed request: {}", peer, e);
                        MediaResponse::Failure {
                            reason: "malformed request".to_string(),
                        }
                    }
                };

                let encoded = match serde_json::to_vec(&response) {
                    Ok(encoded) => encoded,
                    Err(e) => {
                        log::error!("media: {}: encode failed: {}", peer, e);
                        break;
                    }
                };
                if let Err(e) = framed.send(encoded.into()).await {
                    log::warn!("media: {}: write failed: {}", peer, e);
                    break;
                }
            }
        }
    }

    manager.shutdown().await;
    log::info!("media: connection {} closed", peer);
}
