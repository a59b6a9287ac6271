use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};

pub mod audio;
pub mod track;

pub type ApiResult<T> = Result<T, ApiError>;
pub type ApiJsonResult<T> = ApiResult<Json<T>>;

pub struct ApiError(anyhow::Error);

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        log::error!("api: {:?}", self.0);
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            "service inner error".to_string(),
        )
            .into_response()
    }
}

impl<E> From<E> for ApiError
where
    E: Into<anyhow::Error>,
{
    fn from(err: E) -> Self {
        Self(err.into())
    }
}
