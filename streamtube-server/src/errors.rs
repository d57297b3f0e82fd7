use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use streamtube_catalog::{
    AccessError, DashboardError, DatabaseError, LikeError, PlaylistError, SubscriptionError,
    VideoError,
};
use thiserror::Error;

use crate::envelope::Envelope;

pub type ServerResult<T> = Result<T, ServerError>;

#[derive(Debug, Error)]
pub enum ServerError {
    #[error("{0}")]
    BadRequest(String),
    #[error("{0}")]
    Unauthorized(&'static str),
    #[error("{0}")]
    Forbidden(String),
    #[error("{resource}:{identifier} not found")]
    NotFound {
        resource: &'static str,
        identifier: &'static str,
    },
    #[error("{resource} with {field} of value {value} already exists")]
    Conflict {
        resource: &'static str,
        field: &'static str,
        value: String,
    },
    #[error("{0}")]
    Upload(String),
    #[error("Unknown internal error: {0}")]
    Unknown(String),
}

impl ServerError {
    fn as_status_code(&self) -> StatusCode {
        match self {
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            Self::Forbidden(_) => StatusCode::FORBIDDEN,
            Self::NotFound { .. } => StatusCode::NOT_FOUND,
            Self::Conflict { .. } => StatusCode::CONFLICT,
            Self::Upload(_) | Self::Unknown(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        Envelope::failure(self.as_status_code(), self.to_string()).into_response()
    }
}

impl From<DatabaseError> for ServerError {
    fn from(value: DatabaseError) -> Self {
        match value {
            DatabaseError::NotFound {
                resource,
                identifier,
            } => Self::NotFound {
                resource,
                identifier,
            },
            DatabaseError::Conflict {
                resource,
                field,
                value,
            } => Self::Conflict {
                resource,
                field,
                value,
            },
            e => Self::Unknown(e.to_string()),
        }
    }
}

impl From<AccessError> for ServerError {
    fn from(value: AccessError) -> Self {
        Self::Forbidden(value.to_string())
    }
}

impl From<VideoError> for ServerError {
    fn from(value: VideoError) -> Self {
        match value {
            VideoError::MissingMetadata | VideoError::NothingToUpdate => {
                Self::BadRequest(value.to_string())
            }
            VideoError::Access(e) => e.into(),
            VideoError::Storage(e) => Self::Upload(e.to_string()),
            VideoError::Db(e) => e.into(),
        }
    }
}

impl From<PlaylistError> for ServerError {
    fn from(value: PlaylistError) -> Self {
        match value {
            PlaylistError::NameRequired
            | PlaylistError::NothingToUpdate
            | PlaylistError::DuplicateVideo => Self::BadRequest(value.to_string()),
            PlaylistError::Access(e) => e.into(),
            PlaylistError::Db(e) => e.into(),
        }
    }
}

impl From<LikeError> for ServerError {
    fn from(value: LikeError) -> Self {
        match value {
            LikeError::Db(e) => e.into(),
        }
    }
}

impl From<SubscriptionError> for ServerError {
    fn from(value: SubscriptionError) -> Self {
        match value {
            SubscriptionError::Db(e) => e.into(),
        }
    }
}

impl From<DashboardError> for ServerError {
    fn from(value: DashboardError) -> Self {
        match value {
            DashboardError::Db(e) => e.into(),
        }
    }
}
