/// JWT claims structure
///
/// The claim set is fixed and small, so it is represented as a closed
/// struct rather than a dynamic object: subject, issued-at, expiry, issuer.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{AppError, AuthError};

/// Issuer stamped into every access token and required on validation.
pub const ISSUER: &str = "chirpy";

/// Claims carried by an access token.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    /// Subject (user ID as UUID string)
    pub sub: String,
    /// Expiration time (Unix timestamp)
    pub exp: i64,
    /// Issued at (Unix timestamp)
    pub iat: i64,
    /// Issuer
    pub iss: String,
}

impl Claims {
    /// Create claims for a user expiring `ttl_seconds` from now.
    pub fn new(user_id: Uuid, ttl_seconds: i64) -> Self {
        let now = chrono::Utc::now().timestamp();
        Self {
            sub: user_id.to_string(),
            exp: now + ttl_seconds,
            iat: now,
            iss: ISSUER.to_string(),
        }
    }

    /// Extract the user ID from the subject claim.
    ///
    /// # Errors
    /// Returns `MalformedSubject` if the subject is not a valid UUID.
    pub fn user_id(&self) -> Result<Uuid, AppError> {
        Uuid::parse_str(&self.sub).map_err(|_| AppError::Auth(AuthError::MalformedSubject))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn claims_bind_subject_and_issuer() {
        let user_id = Uuid::new_v4();
        let claims = Claims::new(user_id, 3600);

        assert_eq!(claims.sub, user_id.to_string());
        assert_eq!(claims.iss, "chirpy");
        assert_eq!(claims.exp - claims.iat, 3600);
    }

    #[test]
    fn user_id_round_trips() {
        let user_id = Uuid::new_v4();
        let claims = Claims::new(user_id, 3600);

        assert_eq!(claims.user_id().unwrap(), user_id);
    }

    #[test]
    fn garbage_subject_is_malformed() {
        let mut claims = Claims::new(Uuid::new_v4(), 3600);
        claims.sub = "not-a-uuid".to_string();

        match claims.user_id() {
            Err(AppError::Auth(AuthError::MalformedSubject)) => {}
            other => panic!("expected MalformedSubject, got {:?}", other),
        }
    }
}
