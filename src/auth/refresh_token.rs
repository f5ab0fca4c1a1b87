/// Refresh-token authority
///
/// Refresh tokens are opaque: 32 bytes of CSPRNG output, hex-encoded.
/// Their unforgeability rests entirely on that randomness, not on signing,
/// so validation is a stateful lookup against the store. A record is
/// mutated exactly once in its life, when `revoked_at` is set.

use chrono::{DateTime, Duration, Utc};
use rand::RngCore;
use sqlx::PgPool;
use uuid::Uuid;

use crate::error::{AppError, AuthError};

const TOKEN_BYTES: usize = 32;
const TOKEN_TTL_DAYS: i64 = 60;

/// A persisted refresh token, keyed by its value.
#[derive(Debug, Clone)]
pub struct RefreshTokenRecord {
    pub token: String,
    pub user_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
    pub revoked_at: Option<DateTime<Utc>>,
}

/// Generate a fresh opaque refresh token (64 hex characters).
pub fn generate_refresh_token() -> String {
    let mut bytes = [0u8; TOKEN_BYTES];
    rand::thread_rng().fill_bytes(&mut bytes);
    hex::encode(bytes)
}

/// Issue and persist a refresh token for a user, valid for 60 days.
///
/// # Errors
/// A uniqueness violation on the token value (astronomically unlikely)
/// surfaces as `IssuanceFailure`; callers retry the whole operation so a
/// fresh value is drawn — the failed one is never reused. Other storage
/// failures propagate as database errors.
pub async fn issue_refresh_token(
    pool: &PgPool,
    user_id: Uuid,
) -> Result<RefreshTokenRecord, AppError> {
    let token = generate_refresh_token();
    let now = Utc::now();
    let expires_at = now + Duration::days(TOKEN_TTL_DAYS);

    sqlx::query(
        r#"
        INSERT INTO refresh_tokens (token, user_id, created_at, expires_at)
        VALUES ($1, $2, $3, $4)
        "#,
    )
    .bind(&token)
    .bind(user_id)
    .bind(now)
    .bind(expires_at)
    .execute(pool)
    .await
    .map_err(|e| match &e {
        sqlx::Error::Database(db_err) if db_err.code().as_deref() == Some("23505") => {
            AppError::Auth(AuthError::IssuanceFailure)
        }
        _ => AppError::from(e),
    })?;

    Ok(RefreshTokenRecord {
        token,
        user_id,
        created_at: now,
        expires_at,
        revoked_at: None,
    })
}

/// Validate a refresh token and return the user it belongs to.
///
/// Performs no mutation: the same token stays valid until its own expiry
/// or an explicit revocation. Revocation is checked before expiry because
/// a revoked record is permanently unusable regardless of its clock state.
///
/// # Errors
/// `TokenNotFound` for an unknown value, `TokenRevoked` once `revoked_at`
/// is set, `TokenExpired` past `expires_at`.
pub async fn validate_refresh_token(pool: &PgPool, token: &str) -> Result<Uuid, AppError> {
    let row = sqlx::query_as::<_, (Uuid, DateTime<Utc>, Option<DateTime<Utc>>)>(
        r#"
        SELECT user_id, expires_at, revoked_at
        FROM refresh_tokens
        WHERE token = $1
        "#,
    )
    .bind(token)
    .fetch_optional(pool)
    .await?;

    match row {
        None => Err(AppError::Auth(AuthError::TokenNotFound)),
        Some((user_id, expires_at, revoked_at)) => {
            if revoked_at.is_some() {
                tracing::warn!(user_id = %user_id, "attempt to use revoked refresh token");
                return Err(AppError::Auth(AuthError::TokenRevoked));
            }

            if expires_at < Utc::now() {
                tracing::info!(user_id = %user_id, "refresh token expired");
                return Err(AppError::Auth(AuthError::TokenExpired));
            }

            Ok(user_id)
        }
    }
}

/// Revoke a refresh token.
///
/// A single atomic update; `COALESCE` keeps the original revocation time,
/// so revoking an already-revoked token succeeds without rewriting the
/// record. An unknown token is an error.
pub async fn revoke_refresh_token(pool: &PgPool, token: &str) -> Result<(), AppError> {
    let result = sqlx::query(
        r#"
        UPDATE refresh_tokens
        SET revoked_at = COALESCE(revoked_at, $1)
        WHERE token = $2
        "#,
    )
    .bind(Utc::now())
    .bind(token)
    .execute(pool)
    .await?;

    if result.rows_affected() == 0 {
        return Err(AppError::Auth(AuthError::TokenNotFound));
    }

    Ok(())
}
