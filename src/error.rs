use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;

use crate::metrics::MetricsError;

/// The main error type for the exporter
#[derive(Debug, thiserror::Error)]
pub enum KiteError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Internal server error: {0}")]
    Internal(String),

    /// A query against the issue store failed
    #[error("Database error: {0}")]
    Database(String),

    /// The store could not hand out connection or pool information
    #[error("Store unavailable: {0}")]
    StoreUnavailable(String),

    #[error(transparent)]
    Metrics(#[from] MetricsError),

    #[error(transparent)]
    Anyhow(#[from] anyhow::Error),
}

/// JSON body returned for failed requests
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    error: String,
    error_id: String,
}

impl KiteError {
    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::NotFound(msg.into())
    }

    pub fn bad_request(msg: impl Into<String>) -> Self {
        Self::BadRequest(msg.into())
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }

    pub fn database(msg: impl Into<String>) -> Self {
        Self::Database(msg.into())
    }

    pub fn store_unavailable(msg: impl Into<String>) -> Self {
        Self::StoreUnavailable(msg.into())
    }

    fn status_code(&self) -> StatusCode {
        match self {
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::StoreUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            Self::Internal(_) | Self::Database(_) | Self::Metrics(_) | Self::Anyhow(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    /// Message suitable for clients.
    ///
    /// Server-side failures are reported generically; the full error is logged.
    fn safe_message(&self) -> String {
        match self {
            Self::NotFound(msg) => format!("Not found: {}", msg),
            Self::BadRequest(msg) => format!("Bad request: {}", msg),
            Self::StoreUnavailable(_) => "Service unavailable".to_string(),
            Self::Database(_) => "Database error".to_string(),
            Self::Internal(_) | Self::Metrics(_) | Self::Anyhow(_) => {
                "Internal server error".to_string()
            }
        }
    }
}

impl IntoResponse for KiteError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let error_id = uuid::Uuid::new_v4().to_string();

        if status.is_server_error() {
            tracing::error!(
                status = status.as_u16(),
                error_id = %error_id,
                error = %self,
                "Request failed"
            );
        } else {
            tracing::debug!(status = status.as_u16(), error = %self, "Request rejected");
        }

        let body = Json(ErrorResponse {
            error: self.safe_message(),
            error_id,
        });

        (status, body).into_response()
    }
}

/// Result type alias used throughout the crate
pub type Result<T> = std::result::Result<T, KiteError>;

#[cfg(feature = "database")]
impl From<sea_orm::DbErr> for KiteError {
    fn from(err: sea_orm::DbErr) -> Self {
        match &err {
            sea_orm::DbErr::Conn(inner) => {
                KiteError::StoreUnavailable(format!("Connection error: {}", inner))
            }
            sea_orm::DbErr::ConnectionAcquire(inner) => {
                KiteError::StoreUnavailable(format!("Connection acquire error: {}", inner))
            }
            sea_orm::DbErr::Query(inner) => KiteError::Database(format!("Query error: {}", inner)),
            sea_orm::DbErr::Exec(inner) => {
                KiteError::Database(format!("Execution error: {}", inner))
            }
            sea_orm::DbErr::Type(inner) => KiteError::Database(format!("Type error: {}", inner)),
            _ => KiteError::Database(format!("Database error: {}", err)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_error() {
        let err = KiteError::not_found("Route /xyz");
        assert!(matches!(err, KiteError::NotFound(_)));
        assert_eq!(err.to_string(), "Not found: Route /xyz");
        assert_eq!(err.status_code(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn test_database_error() {
        let err = KiteError::database("no such table: issues");
        assert_eq!(err.to_string(), "Database error: no such table: issues");
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(err.safe_message(), "Database error");
    }

    #[test]
    fn test_store_unavailable_error() {
        let err = KiteError::store_unavailable("pool closed");
        assert_eq!(err.status_code(), StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(err.safe_message(), "Service unavailable");
    }

    #[test]
    fn test_metrics_error_conversion() {
        let err: KiteError = MetricsError::UnknownInstrument("missing".to_string()).into();
        assert!(matches!(err, KiteError::Metrics(_)));
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_anyhow_error() {
        let err: KiteError = anyhow::anyhow!("Something unexpected").into();
        assert!(matches!(err, KiteError::Anyhow(_)));
        assert_eq!(err.safe_message(), "Internal server error");
    }

    #[tokio::test]
    async fn test_into_response_hides_internal_details() {
        let response = KiteError::internal("registry poisoned").into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["error"], "Internal server error");
        assert!(body["error_id"].is_string());
    }

    #[cfg(feature = "database")]
    #[test]
    fn test_from_db_err() {
        let err: KiteError = sea_orm::DbErr::Custom("boom".to_string()).into();
        assert!(matches!(err, KiteError::Database(_)));
    }
}
