use axum::{
    Json, Router,
    extract::Path,
    routing::{get, post},
};
use serde::{Deserialize, Serialize};

use crate::{config, db, handler::ApiJsonResult};
use tunecast_db::track::{Track, TrackCreate};

pub fn track_router() -> Router {
    Router::new()
        .route("/", get(index))
        .route("/list", get(list_tracks))
        .route("/add", post(add_track))
        .route("/remove/{id}", get(remove_track))
}

#[derive(Serialize, Deserialize)]
struct TrackAddRequest {
    name: String,
    path: String,
}

async fn index() -> &'static str {
    "track route!"
}

async fn list_tracks() -> ApiJsonResult<Vec<Track>> {
    let conn = db::app_db_conn()?;
    Ok(Json(tunecast_db::track::query_all(&conn).await?))
}

async fn add_track(Json(request): Json<TrackAddRequest>) -> ApiJsonResult<Track> {
    if !std::path::Path::new(&request.path).is_file() {
        return Err(anyhow::anyhow!("file not found: {}", request.path).into());
    }

    // Duration is informational; a failed probe does not block registration.
    let config = config::config();
    let duration_sec = match ffmpeg_pipe::probe::probe(
        std::path::Path::new(config.ffprobe_path()),
        std::path::Path::new(&request.path),
    )
    .await
    {
        Ok(info) => info.duration_sec,
        Err(e) => {
            log::warn!("api: probe failed for {}: {:#}", request.path, e);
            None
        }
    };

    let conn = db::app_db_conn()?;
    let create = TrackCreate {
        name: request.name,
        path: request.path,
        duration_sec,
    };
    let track = tunecast_db::track::insert(&create, &conn).await?;
    Ok(Json(track))
}

async fn remove_track(Path(id): Path<i64>) -> ApiJsonResult<String> {
    let conn = db::app_db_conn()?;
    let removed = tunecast_db::track::delete(id, &conn).await?;
    Ok(Json(
        if removed { "success" } else { "not found" }.to_string(),
    ))
}
