use axum::extract::multipart::MultipartError;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use thiserror::Error;

use crate::service::ServiceError;

/// Everything a handler can fail with, mapped to a status code in `into_response`.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error(transparent)]
    Service(#[from] ServiceError),

    /// Writing an upload to disk failed
    #[error("Could not upload the file: {0}")]
    Upload(std::io::Error),

    #[error("Multipart request has no `file` field")]
    MissingFile,

    #[error(transparent)]
    Multipart(#[from] MultipartError),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::Service(ServiceError::NotFound) => StatusCode::NOT_FOUND.into_response(),
            ApiError::Service(ServiceError::InvalidTemplate(_)) => {
                StatusCode::BAD_REQUEST.into_response()
            }
            ApiError::Service(ServiceError::Database(e)) => {
                tracing::error!(error = %e, "Database failure while handling request");
                StatusCode::INTERNAL_SERVER_ERROR.into_response()
            }
            ApiError::Upload(ref e) => {
                tracing::error!(error = %e, "Upload failed");
                (StatusCode::INTERNAL_SERVER_ERROR, self.to_string()).into_response()
            }
            ApiError::MissingFile => (StatusCode::BAD_REQUEST, self.to_string()).into_response(),
            ApiError::Multipart(e) => {
                tracing::debug!(error = %e, "Rejected multipart body");
                (e.status(), e.body_text()).into_response()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::DatabaseError;

    #[test]
    fn test_status_mapping() {
        assert_eq!(
            ApiError::from(ServiceError::NotFound).into_response().status(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            ApiError::from(ServiceError::InvalidTemplate(3))
                .into_response()
                .status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ApiError::from(ServiceError::Database(DatabaseError::Migration(
                "boom".to_string()
            )))
            .into_response()
            .status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            ApiError::MissingFile.into_response().status(),
            StatusCode::BAD_REQUEST
        );
    }

    #[test]
    fn test_upload_error_exposes_description() {
        let err = ApiError::Upload(std::io::Error::new(
            std::io::ErrorKind::PermissionDenied,
            "read-only file system",
        ));
        assert_eq!(
            err.to_string(),
            "Could not upload the file: read-only file system"
        );
        assert_eq!(
            err.into_response().status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
