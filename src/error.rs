/// Unified Error Handling Module
///
/// Every fallible path in the application maps into `AppError`, which is
/// built from domain-specific error types so that callers can still match
/// on the precise failure while the HTTP layer gets a single conversion
/// point.
///
/// Security note: no variant ever carries a plaintext password, a stored
/// hash, or a token value, and none of the logging below emits one.

use actix_web::{error::ResponseError, http::StatusCode, HttpResponse};
use std::error::Error as StdError;
use std::fmt;

/// Failures parsing credentials out of the `Authorization` header.
///
/// The three cases stay distinct so tests and logs can tell a missing
/// header from a wrong scheme from an empty token; the HTTP layer maps
/// them all to 401.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CredentialError {
    MissingHeader,
    MalformedScheme(&'static str),
    EmptyToken,
}

impl fmt::Display for CredentialError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CredentialError::MissingHeader => write!(f, "authorization header not found"),
            CredentialError::MalformedScheme(scheme) => {
                write!(f, "authorization header format must be '{} {{token}}'", scheme)
            }
            CredentialError::EmptyToken => {
                write!(f, "token not found in authorization header")
            }
        }
    }
}

impl StdError for CredentialError {}

/// Authentication and token-lifecycle errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthError {
    /// Generic login failure. Deliberately covers both "unknown email" and
    /// "wrong password" so responses cannot be used for account enumeration.
    IncorrectCredentials,
    PasswordMismatch,
    HashingFailure(String),
    SignatureInvalid,
    TokenExpired,
    TokenRevoked,
    TokenNotFound,
    MalformedSubject,
    IssuanceFailure,
    InvalidApiKey,
    NotResourceOwner,
}

impl fmt::Display for AuthError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AuthError::IncorrectCredentials => write!(f, "incorrect email or password"),
            AuthError::PasswordMismatch => write!(f, "password does not match"),
            AuthError::HashingFailure(msg) => write!(f, "password hashing failed: {}", msg),
            AuthError::SignatureInvalid => write!(f, "invalid token signature"),
            AuthError::TokenExpired => write!(f, "token has expired"),
            AuthError::TokenRevoked => write!(f, "token has been revoked"),
            AuthError::TokenNotFound => write!(f, "token not found"),
            AuthError::MalformedSubject => write!(f, "token subject is not a valid user id"),
            AuthError::IssuanceFailure => write!(f, "token issuance failed"),
            AuthError::InvalidApiKey => write!(f, "invalid api key"),
            AuthError::NotResourceOwner => write!(f, "not authorised to modify this resource"),
        }
    }
}

impl StdError for AuthError {}

/// Validation errors for input data.
#[derive(Debug, Clone)]
pub enum ValidationError {
    EmptyField(&'static str),
    TooShort(&'static str, usize),
    TooLong(&'static str, usize),
    InvalidFormat(&'static str),
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationError::EmptyField(field) => write!(f, "{} is empty", field),
            ValidationError::TooShort(field, min) => {
                write!(f, "{} is too short (minimum {} characters)", field, min)
            }
            ValidationError::TooLong(field, max) => {
                write!(f, "{} is too long (maximum {} characters)", field, max)
            }
            ValidationError::InvalidFormat(field) => write!(f, "{} has invalid format", field),
        }
    }
}

impl StdError for ValidationError {}

/// Database operation errors, classified from sqlx.
#[derive(Debug)]
pub enum DatabaseError {
    UniqueConstraintViolation(String),
    NotFound(String),
    ConnectionPool(String),
    UnexpectedError(String),
}

impl fmt::Display for DatabaseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DatabaseError::UniqueConstraintViolation(msg) => {
                write!(f, "duplicate entry: {}", msg)
            }
            DatabaseError::NotFound(msg) => write!(f, "not found: {}", msg),
            DatabaseError::ConnectionPool(msg) => {
                write!(f, "database connection error: {}", msg)
            }
            DatabaseError::UnexpectedError(msg) => write!(f, "database error: {}", msg),
        }
    }
}

impl StdError for DatabaseError {}

/// Central error type that all application errors map to.
#[derive(Debug)]
pub enum AppError {
    Credential(CredentialError),
    Auth(AuthError),
    Validation(ValidationError),
    Database(DatabaseError),
    Internal(String),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::Credential(e) => write!(f, "{}", e),
            AppError::Auth(e) => write!(f, "{}", e),
            AppError::Validation(e) => write!(f, "{}", e),
            AppError::Database(e) => write!(f, "{}", e),
            AppError::Internal(msg) => write!(f, "internal error: {}", msg),
        }
    }
}

impl StdError for AppError {}

impl From<CredentialError> for AppError {
    fn from(err: CredentialError) -> Self {
        AppError::Credential(err)
    }
}

impl From<AuthError> for AppError {
    fn from(err: AuthError) -> Self {
        AppError::Auth(err)
    }
}

impl From<ValidationError> for AppError {
    fn from(err: ValidationError) -> Self {
        AppError::Validation(err)
    }
}

impl From<DatabaseError> for AppError {
    fn from(err: DatabaseError) -> Self {
        AppError::Database(err)
    }
}

impl From<sqlx::Error> for AppError {
    fn from(err: sqlx::Error) -> Self {
        match &err {
            sqlx::Error::RowNotFound => {
                AppError::Database(DatabaseError::NotFound("record not found".to_string()))
            }
            sqlx::Error::Database(db_err) if db_err.code().as_deref() == Some("23505") => {
                AppError::Database(DatabaseError::UniqueConstraintViolation(
                    "record already exists".to_string(),
                ))
            }
            sqlx::Error::PoolTimedOut | sqlx::Error::PoolClosed | sqlx::Error::Io(_) => {
                AppError::Database(DatabaseError::ConnectionPool(err.to_string()))
            }
            _ => AppError::Database(DatabaseError::UnexpectedError(err.to_string())),
        }
    }
}

/// Error response body returned to HTTP clients.
#[derive(Debug, serde::Serialize)]
pub struct ErrorResponse {
    /// Unique error ID for correlating the response with server logs.
    pub error_id: String,
    pub message: String,
    pub code: String,
    pub status: u16,
    pub timestamp: String,
}

impl ErrorResponse {
    pub fn new(error_id: String, message: String, code: String, status: u16) -> Self {
        Self {
            error_id,
            message,
            code,
            status,
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }
}

impl AppError {
    fn code(&self) -> &'static str {
        match self {
            AppError::Credential(_) => "CREDENTIAL_ERROR",
            AppError::Auth(AuthError::IncorrectCredentials) => "INCORRECT_CREDENTIALS",
            AppError::Auth(AuthError::HashingFailure(_))
            | AppError::Auth(AuthError::IssuanceFailure) => "AUTH_INTERNAL",
            AppError::Auth(AuthError::NotResourceOwner) => "FORBIDDEN",
            AppError::Auth(_) => "TOKEN_INVALID",
            AppError::Validation(_) => "VALIDATION_ERROR",
            AppError::Database(DatabaseError::UniqueConstraintViolation(_)) => "DUPLICATE_ENTRY",
            AppError::Database(DatabaseError::NotFound(_)) => "NOT_FOUND",
            AppError::Database(DatabaseError::ConnectionPool(_)) => "SERVICE_UNAVAILABLE",
            AppError::Database(_) => "DATABASE_ERROR",
            AppError::Internal(_) => "INTERNAL_ERROR",
        }
    }

    /// Client-facing message. Internal failure detail stays in the logs.
    fn public_message(&self) -> String {
        match self {
            AppError::Auth(AuthError::HashingFailure(_))
            | AppError::Auth(AuthError::IssuanceFailure) => {
                "internal server error".to_string()
            }
            AppError::Database(DatabaseError::ConnectionPool(_)) => {
                "service temporarily unavailable".to_string()
            }
            AppError::Database(DatabaseError::UnexpectedError(_)) | AppError::Internal(_) => {
                "internal server error".to_string()
            }
            other => other.to_string(),
        }
    }

    fn log(&self, error_id: &str) {
        match self {
            AppError::Credential(e) => {
                tracing::warn!(error_id = error_id, error = %e, "credential format error");
            }
            AppError::Auth(AuthError::HashingFailure(e)) => {
                tracing::error!(error_id = error_id, error = %e, "password hashing failure");
            }
            AppError::Auth(AuthError::IssuanceFailure) => {
                tracing::error!(error_id = error_id, "token issuance failure");
            }
            AppError::Auth(e) => {
                tracing::warn!(error_id = error_id, error = %e, "authentication error");
            }
            AppError::Validation(e) => {
                tracing::warn!(error_id = error_id, error = %e, "validation error");
            }
            AppError::Database(e) => {
                tracing::error!(error_id = error_id, error = %e, "database error");
            }
            AppError::Internal(msg) => {
                tracing::error!(error_id = error_id, error = %msg, "internal error");
            }
        }
    }
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::Credential(_) => StatusCode::UNAUTHORIZED,
            AppError::Auth(e) => match e {
                AuthError::HashingFailure(_) | AuthError::IssuanceFailure => {
                    StatusCode::INTERNAL_SERVER_ERROR
                }
                AuthError::NotResourceOwner => StatusCode::FORBIDDEN,
                _ => StatusCode::UNAUTHORIZED,
            },
            AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::Database(e) => match e {
                DatabaseError::UniqueConstraintViolation(_) => StatusCode::CONFLICT,
                DatabaseError::NotFound(_) => StatusCode::NOT_FOUND,
                DatabaseError::ConnectionPool(_) => StatusCode::SERVICE_UNAVAILABLE,
                DatabaseError::UnexpectedError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            },
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let error_id = uuid::Uuid::new_v4().to_string();
        self.log(&error_id);

        let status = self.status_code();
        let body = ErrorResponse::new(
            error_id,
            self.public_message(),
            self.code().to_string(),
            status.as_u16(),
        );

        HttpResponse::build(status).json(body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn credential_errors_stay_distinct() {
        assert_ne!(
            CredentialError::MissingHeader,
            CredentialError::EmptyToken
        );
        assert_eq!(
            CredentialError::MalformedScheme("Bearer").to_string(),
            "authorization header format must be 'Bearer {token}'"
        );
    }

    #[test]
    fn login_failure_message_does_not_name_the_cause() {
        let err = AppError::Auth(AuthError::IncorrectCredentials);
        assert_eq!(err.to_string(), "incorrect email or password");
        assert_eq!(err.status_code(), StatusCode::UNAUTHORIZED);
    }

    #[test]
    fn token_lifecycle_errors_map_to_unauthorized() {
        for err in [
            AuthError::SignatureInvalid,
            AuthError::TokenExpired,
            AuthError::TokenRevoked,
            AuthError::TokenNotFound,
            AuthError::MalformedSubject,
        ] {
            assert_eq!(AppError::Auth(err).status_code(), StatusCode::UNAUTHORIZED);
        }
    }

    #[test]
    fn hashing_failure_is_a_server_error_with_opaque_message() {
        let err = AppError::Auth(AuthError::HashingFailure("entropy exhausted".to_string()));
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(err.public_message(), "internal server error");
    }

    #[test]
    fn unique_violation_maps_to_conflict() {
        let err = AppError::Database(DatabaseError::UniqueConstraintViolation(
            "email already registered".to_string(),
        ));
        assert_eq!(err.status_code(), StatusCode::CONFLICT);
    }
}
