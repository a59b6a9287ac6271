use axum::{
    Router,
    body::Body,
    extract::Path,
    http::{StatusCode, header},
    response::Response,
    routing::get,
};
use tokio_util::io::ReaderStream;

use crate::db;

pub fn audio_router() -> Router {
    Router::new().route("/{id}", get(get_audio))
}

/// Serves the raw (untranscoded) file of a catalog track.
async fn get_audio(Path(id): Path<i64>) -> Result<Response, (StatusCode, String)> {
    let conn = db::app_db_conn().map_err(internal)?;
    let track = tunecast_db::track::by_id(id, &conn).await.map_err(internal)?;

    let track = match track {
        Some(track) => track,
        None => return Err((StatusCode::NOT_FOUND, "missing track".to_string())),
    };

    let file = match tokio::fs::File::open(&track.path).await {
        Ok(file) => file,
        Err(e) => {
            log::error!("api: track {} file {} not readable: {}", id, track.path, e);
            return Err((StatusCode::NOT_FOUND, "missing file".to_string()));
        }
    };

    let body = Body::from_stream(ReaderStream::new(file));
    Response::builder()
        .header(header::CONTENT_TYPE, content_type(&track.path))
        .body(body)
        .map_err(internal)
}

fn internal<E: std::fmt::Display>(e: E) -> (StatusCode, String) {
    (StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
}

/// Content type from the file extension; generic binary as fallback.
fn content_type(path: &str) -> &'static str {
    match std::path::Path::new(path)
        .extension()
        .and_then(|e| e.to_str())
    {
        Some("mp3") => "audio/mpeg",
        Some("ogg") | Some("oga") => "audio/ogg",
        Some("flac") => "audio/flac",
        Some("wav") => "audio/wav",
        Some("m4a") | Some("mp4") => "audio/mp4",
        Some("aac") => "audio/aac",
        _ => "application/octet-stream",
    }
}

#[cfg(test)]
mod tests {
    use super::content_type;

    #[test]
    fn test_content_type_by_extension() {
        assert_eq!(content_type("/music/a.mp3"), "audio/mpeg");
        assert_eq!(content_type("/music/a.oga"), "audio/ogg");
        assert_eq!(content_type("/music/a.flac"), "audio/flac");
        assert_eq!(content_type("/music/a"), "application/octet-stream");
    }
}
