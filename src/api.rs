use axum::Router;
use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;

use crate::config;

pub(crate) fn start_api_server(cancel: CancellationToken) {
    tokio::spawn(async move {
        let app = Router::new()
            .nest("/track", crate::handler::track::track_router())
            .nest("/audio", crate::handler::audio::audio_router());

        let bind = config::config().api_bind();
        let listener = TcpListener::bind(bind).await.unwrap();
        log::info!("api: server started on {}", bind);
        if let Err(e) = axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal(cancel))
            .await
        {
            log::error!("api: server error: {}", e);
        }
    });
}

async fn shutdown_signal(cancel: CancellationToken) {
    tokio::select! {
        _ = cancel.cancelled() => {
            log::info!("api: shutting down");
        }
    }
}
