use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

/// The uniform response body returned by every endpoint
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Envelope<T> {
    status_code: u16,
    data: Option<T>,
    message: String,
    success: bool,
}

impl<T> Envelope<T> {
    /// A 200 response carrying data
    pub fn ok(data: T, message: &str) -> Self {
        Self::with_status(StatusCode::OK, data, message)
    }

    /// A 201 response for newly created resources
    pub fn created(data: T, message: &str) -> Self {
        Self::with_status(StatusCode::CREATED, data, message)
    }

    fn with_status(status: StatusCode, data: T, message: &str) -> Self {
        Self {
            status_code: status.as_u16(),
            data: Some(data),
            message: message.to_string(),
            success: true,
        }
    }
}

impl Envelope<()> {
    /// A failure envelope carrying no data
    pub fn failure(status: StatusCode, message: String) -> Self {
        Self {
            status_code: status.as_u16(),
            data: None,
            message,
            success: false,
        }
    }
}

impl<T> IntoResponse for Envelope<T>
where
    T: Serialize,
{
    fn into_response(self) -> Response {
        let status =
            StatusCode::from_u16(self.status_code).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

        (status, Json(self)).into_response()
    }
}
