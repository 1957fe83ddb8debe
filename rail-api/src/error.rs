use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use rail_core::{CoreError, ServiceError};
use rail_store::StoreError;
use rail_ticket::TicketError;
use serde_json::json;

#[derive(Debug)]
pub enum AppError {
    AuthenticationError(String),
    AuthorizationError(String),
    ValidationError(String),
    NotFoundError(String),
    ConflictError(String),
    ServiceUnavailable(String),
    InternalServerError(String),
    Anyhow(anyhow::Error),
}

impl AppError {
    pub fn from_core(err: CoreError) -> Self {
        match err {
            CoreError::NotFound(msg) => AppError::NotFoundError(format!("Booking not found: {}", msg)),
            CoreError::ValidationError(msg) => AppError::ValidationError(msg),
        }
    }

    pub fn from_store(err: StoreError) -> Self {
        match err {
            StoreError::NotFound(_) => AppError::NotFoundError(err.to_string()),
            StoreError::NotCancellable { .. } => AppError::ConflictError(err.to_string()),
            StoreError::Repository(inner) => AppError::from_core(inner),
        }
    }

    pub fn from_service(err: ServiceError) -> Self {
        match err {
            ServiceError::NotFound(_) => AppError::NotFoundError(err.to_string()),
            ServiceError::Unavailable(_) => AppError::ServiceUnavailable(err.to_string()),
        }
    }

    /// Stored bookings are validated on insert, so any ticket failure is ours.
    pub fn from_ticket(err: TicketError) -> Self {
        AppError::InternalServerError(err.to_string())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_message) = match self {
            AppError::AuthenticationError(msg) => (StatusCode::UNAUTHORIZED, msg),
            AppError::AuthorizationError(msg) => (StatusCode::FORBIDDEN, msg),
            AppError::ValidationError(msg) => (StatusCode::BAD_REQUEST, msg),
            AppError::NotFoundError(msg) => (StatusCode::NOT_FOUND, msg),
            AppError::ConflictError(msg) => (StatusCode::CONFLICT, msg),
            AppError::ServiceUnavailable(msg) => {
                tracing::warn!("Booking service unavailable: {}", msg);
                (StatusCode::SERVICE_UNAVAILABLE, msg)
            },
            AppError::InternalServerError(msg) => {
                tracing::error!("Internal Server Error: {}", msg);
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error".to_string())
            },
            AppError::Anyhow(err) => {
                tracing::error!("Internal Server Error: {}", err);
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error".to_string())
            },
        };

        let body = Json(json!({
            "error": error_message,
        }));

        (status, body).into_response()
    }
}

impl<E> From<E> for AppError
where
    E: Into<anyhow::Error>,
{
    fn from(err: E) -> Self {
        Self::Anyhow(err.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rail_core::BookingStatus;
    use uuid::Uuid;

    #[test]
    fn test_store_errors_map_to_status_codes() {
        let not_found = AppError::from_store(StoreError::NotFound(Uuid::nil())).into_response();
        assert_eq!(not_found.status(), StatusCode::NOT_FOUND);

        let conflict = AppError::from_store(StoreError::NotCancellable {
            pnr: "8203948245".to_string(),
            status: BookingStatus::Cancelled,
        })
        .into_response();
        assert_eq!(conflict.status(), StatusCode::CONFLICT);
    }

    #[test]
    fn test_ticket_errors_are_server_faults() {
        let err = AppError::from_ticket(TicketError::TooManyPassengers {
            pnr: "8203948245".to_string(),
            max: 6,
        });
        assert!(matches!(&err, AppError::InternalServerError(msg) if msg.contains("8203948245")));
        assert_eq!(err.into_response().status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_internal_details_are_hidden() {
        let response = AppError::Anyhow(anyhow::anyhow!("render thread panicked")).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
