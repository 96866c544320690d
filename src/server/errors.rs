//! Mapping library errors to HTTP responses.

use axum::http::StatusCode;
use tracing::{debug, error, warn};

use yuvaa::Error;

/// Status code and plain-text message for a failed request
pub fn error_response(err: Error) -> (StatusCode, String) {
    let status = match &err {
        Error::LocationNotResolved(_) => StatusCode::NOT_FOUND,
        e if e.is_user_error() => StatusCode::BAD_REQUEST,
        e if e.is_unavailable() => StatusCode::SERVICE_UNAVAILABLE,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    };

    if status.is_server_error() {
        if status == StatusCode::SERVICE_UNAVAILABLE {
            warn!("Request failed: {}", err);
        } else {
            error!("Request failed: {}", err);
        }
    } else {
        debug!("Rejected request: {}", err);
    }

    (status, err.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        assert_eq!(error_response(Error::MissingInput).0, StatusCode::BAD_REQUEST);
        assert_eq!(
            error_response(Error::LocationNotResolved("x".into())).0,
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            error_response(Error::GeocodingUnavailable("down".into())).0,
            StatusCode::SERVICE_UNAVAILABLE
        );
        assert_eq!(
            error_response(Error::EmptyDataset).0,
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            error_response(Error::BackgroundTask("task panicked".into())).0,
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            error_response(Error::DistanceComputationFailed { excluded: 3 }).0,
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_body_is_plain_message() {
        let (_, body) = error_response(Error::MissingColumn("latitude".into()));
        assert_eq!(body, "missing expected column in soil data: latitude");
    }
}
