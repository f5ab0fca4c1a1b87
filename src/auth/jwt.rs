/// Access-token issuance and validation
///
/// Access tokens are stateless: anyone holding the signing secret can mint
/// or verify them offline, which is the intended trust model for a
/// short-lived credential. Lifetime is capped at one hour regardless of
/// what the caller asks for.

use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use uuid::Uuid;

use crate::auth::claims::{Claims, ISSUER};
use crate::configuration::AuthSettings;
use crate::error::{AppError, AuthError};

/// Hard ceiling on access-token lifetime, also the default when the caller
/// requests zero or a negative TTL.
pub const MAX_ACCESS_TOKEN_TTL_SECONDS: i64 = 3600;

/// Clock-skew allowance applied when checking expiry.
const EXPIRY_LEEWAY_SECONDS: u64 = 5;

/// Issue a signed access token for a user.
///
/// `ttl_seconds` is clamped to at most one hour; zero or negative requests
/// get the one-hour default.
///
/// # Errors
/// Returns `IssuanceFailure` if signing fails.
pub fn issue_access_token(
    user_id: &Uuid,
    ttl_seconds: i64,
    config: &AuthSettings,
) -> Result<String, AppError> {
    let effective_ttl = if ttl_seconds <= 0 {
        MAX_ACCESS_TOKEN_TTL_SECONDS
    } else {
        ttl_seconds.min(MAX_ACCESS_TOKEN_TTL_SECONDS)
    };

    let claims = Claims::new(*user_id, effective_ttl);

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(config.jwt_secret.as_bytes()),
    )
    .map_err(|_| AppError::Auth(AuthError::IssuanceFailure))
}

/// Validate an access token and return the user it was issued to.
///
/// Checks the signature and issuer, then expiry with a small leeway, then
/// parses the subject. Failures are classified so callers can distinguish
/// an expired token from a forged one from a corrupt subject.
pub fn validate_access_token(token: &str, config: &AuthSettings) -> Result<Uuid, AppError> {
    let mut validation = Validation::new(Algorithm::HS256);
    validation.leeway = EXPIRY_LEEWAY_SECONDS;
    validation.set_issuer(&[ISSUER]);

    let data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(config.jwt_secret.as_bytes()),
        &validation,
    )
    .map_err(|e| match e.kind() {
        jsonwebtoken::errors::ErrorKind::ExpiredSignature => {
            AppError::Auth(AuthError::TokenExpired)
        }
        _ => AppError::Auth(AuthError::SignatureInvalid),
    })?;

    data.claims.user_id()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_config() -> AuthSettings {
        AuthSettings {
            jwt_secret: "test-secret-key-at-least-32-characters-long".to_string(),
            polka_key: "unused".to_string(),
        }
    }

    fn decode_claims(token: &str, config: &AuthSettings) -> Claims {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_issuer(&[ISSUER]);
        decode::<Claims>(
            token,
            &DecodingKey::from_secret(config.jwt_secret.as_bytes()),
            &validation,
        )
        .expect("failed to decode token")
        .claims
    }

    #[test]
    fn issue_and_validate_round_trips_the_user_id() {
        let config = test_config();
        let user_id = Uuid::new_v4();

        let token = issue_access_token(&user_id, 600, &config).expect("failed to issue token");
        let validated = validate_access_token(&token, &config).expect("failed to validate token");

        assert_eq!(validated, user_id);
    }

    #[test]
    fn requested_ttl_above_the_cap_is_clamped_to_one_hour() {
        let config = test_config();
        let token = issue_access_token(&Uuid::new_v4(), 3601, &config).unwrap();

        let claims = decode_claims(&token, &config);
        assert_eq!(claims.exp - claims.iat, 3600);
    }

    #[test]
    fn zero_ttl_defaults_to_one_hour() {
        let config = test_config();
        let token = issue_access_token(&Uuid::new_v4(), 0, &config).unwrap();

        let claims = decode_claims(&token, &config);
        assert_eq!(claims.exp - claims.iat, 3600);
    }

    #[test]
    fn expired_token_is_classified_as_expired() {
        let config = test_config();
        // Hand-roll claims already past expiry (beyond the 5s leeway).
        let mut claims = Claims::new(Uuid::new_v4(), 3600);
        claims.iat -= 7200;
        claims.exp -= 7200;
        let token = encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(config.jwt_secret.as_bytes()),
        )
        .unwrap();

        match validate_access_token(&token, &config) {
            Err(AppError::Auth(AuthError::TokenExpired)) => {}
            other => panic!("expected TokenExpired, got {:?}", other),
        }
    }

    #[test]
    fn tampered_token_is_classified_as_bad_signature() {
        let config = test_config();
        let token = issue_access_token(&Uuid::new_v4(), 600, &config).unwrap();

        let tampered = format!("{}x", token);
        match validate_access_token(&tampered, &config) {
            Err(AppError::Auth(AuthError::SignatureInvalid)) => {}
            other => panic!("expected SignatureInvalid, got {:?}", other),
        }
    }

    #[test]
    fn token_signed_with_a_different_secret_is_rejected() {
        let config = test_config();
        let other = AuthSettings {
            jwt_secret: "a-completely-different-signing-secret!!".to_string(),
            polka_key: "unused".to_string(),
        };

        let token = issue_access_token(&Uuid::new_v4(), 600, &other).unwrap();
        match validate_access_token(&token, &config) {
            Err(AppError::Auth(AuthError::SignatureInvalid)) => {}
            other => panic!("expected SignatureInvalid, got {:?}", other),
        }
    }

    #[test]
    fn non_uuid_subject_is_classified_as_malformed() {
        let config = test_config();
        let mut claims = Claims::new(Uuid::new_v4(), 3600);
        claims.sub = "service-account".to_string();
        let token = encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(config.jwt_secret.as_bytes()),
        )
        .unwrap();

        match validate_access_token(&token, &config) {
            Err(AppError::Auth(AuthError::MalformedSubject)) => {}
            other => panic!("expected MalformedSubject, got {:?}", other),
        }
    }
}
