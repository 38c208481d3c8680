use actix_web::HttpResponse;
use common::error::{SigningError, TemplateError};
use thiserror::Error;

/// Failures of the HTTP services, mapped to a status code by [`ServiceError::to_response`].
#[derive(Error, Debug)]
pub enum ServiceError {
    #[error("{0} not found")]
    NotFound(String),
    #[error("{0}")]
    BadRequest(String),
    #[error("{0}")]
    Conflict(String),
    #[error("invalid template: {0}")]
    Template(#[from] TemplateError),
    #[error(transparent)]
    Signing(#[from] SigningError),
    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("corrupt stored data: {0}")]
    Corrupt(String),
}

impl ServiceError {
    pub fn to_response(&self) -> HttpResponse {
        let body = self.to_string();
        match self {
            ServiceError::NotFound(_) => HttpResponse::NotFound().body(body),
            ServiceError::BadRequest(_) | ServiceError::Template(_) => {
                HttpResponse::BadRequest().body(body)
            }
            ServiceError::Conflict(_) => HttpResponse::Conflict().body(body),
            ServiceError::Signing(err) => match err {
                SigningError::ZoneAlreadyCompleted(_) | SigningError::SessionClosed(_) => {
                    HttpResponse::Conflict().body(body)
                }
                SigningError::Archive(_) => HttpResponse::ServiceUnavailable().body(body),
                _ => HttpResponse::BadRequest().body(body),
            },
            ServiceError::Database(_) | ServiceError::Io(_) | ServiceError::Corrupt(_) => {
                HttpResponse::ServiceUnavailable().body(body)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::http::StatusCode;
    use common::model::session::SessionStatus;

    #[test]
    fn status_codes() {
        let cases = [
            (ServiceError::NotFound("session".into()), StatusCode::NOT_FOUND),
            (
                ServiceError::Signing(SigningError::SessionClosed(SessionStatus::Signed)),
                StatusCode::CONFLICT,
            ),
            (
                ServiceError::Signing(SigningError::EmptyValue("z".into())),
                StatusCode::BAD_REQUEST,
            ),
            (
                ServiceError::Template(TemplateError::MissingId),
                StatusCode::BAD_REQUEST,
            ),
            (
                ServiceError::Corrupt("zone_type".into()),
                StatusCode::SERVICE_UNAVAILABLE,
            ),
        ];
        for (error, status) in cases {
            assert_eq!(error.to_response().status(), status, "{error}");
        }
    }
}
