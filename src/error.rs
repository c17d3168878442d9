use std::fmt;

use actix_web::{http::StatusCode, HttpResponse, ResponseError};
use serde::Serialize;

/// Failures surfaced by the station to its callers.
///
/// Every variant maps to a `500` with an `{"error": ...}` body at the HTTP
/// boundary; none of them is fatal to the process.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StationError {
    /// Retries exhausted or the sensor reported a non-transient fault.
    SensorFailure(String),
    LogWrite(String),
    LogRead(String),
    LogClear(String),
    /// The station worker thread is gone.
    Unavailable(String),
}

impl StationError {
    pub fn message(&self) -> &str {
        match self {
            StationError::SensorFailure(msg)
            | StationError::LogWrite(msg)
            | StationError::LogRead(msg)
            | StationError::LogClear(msg)
            | StationError::Unavailable(msg) => msg,
        }
    }
}

impl fmt::Display for StationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.message())
    }
}

impl std::error::Error for StationError {}

#[derive(Serialize)]
struct ErrorBody<'a> {
    error: &'a str,
}

impl ResponseError for StationError {
    fn status_code(&self) -> StatusCode {
        StatusCode::INTERNAL_SERVER_ERROR
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code()).json(ErrorBody {
            error: self.message(),
        })
    }
}
