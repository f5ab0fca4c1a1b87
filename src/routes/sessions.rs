/// Session Routes
///
/// Login, access-token refresh, and refresh-token revocation.
///
/// Login failures deliberately collapse into one generic error: a caller
/// cannot tell an unknown email from a wrong password. Refresh and revoke
/// take the refresh token from the `Authorization` header, not the body.

use actix_web::{web, HttpRequest, HttpResponse};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

use crate::auth::{
    bearer_token, issue_access_token, issue_refresh_token, revoke_refresh_token,
    validate_refresh_token, verify_password,
};
use crate::configuration::AuthSettings;
use crate::error::{AppError, AuthError};

#[derive(Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
    /// Requested access-token lifetime; clamped to one hour, defaulted to
    /// one hour when absent or zero.
    #[serde(default)]
    pub expires_in_seconds: i64,
}

/// Login response: the user plus both tokens.
#[derive(Serialize)]
pub struct SessionResponse {
    pub id: String,
    pub username: String,
    pub created_at: String,
    pub updated_at: String,
    pub email: String,
    pub token: String,
    pub refresh_token: String,
    pub is_chirpy_red: bool,
}

#[derive(Serialize)]
pub struct RefreshResponse {
    pub token: String,
}

/// POST /api/login
///
/// Verify email + password, then issue a short-lived access token and a
/// long-lived refresh token. Every issuance failure propagates; nothing is
/// returned unless both tokens exist.
///
/// # Errors
/// - 401: unknown email or wrong password (indistinguishable by design)
/// - 500: hashing/signing/storage failure
pub async fn login(
    form: web::Json<LoginRequest>,
    pool: web::Data<PgPool>,
    auth_config: web::Data<AuthSettings>,
) -> Result<HttpResponse, AppError> {
    let user = sqlx::query_as::<_, (Uuid, String, DateTime<Utc>, DateTime<Utc>, String, String, bool)>(
        r#"
        SELECT id, username, created_at, updated_at, email, hashed_password, is_chirpy_red
        FROM users
        WHERE email = $1
        "#,
    )
    .bind(&form.email)
    .fetch_optional(pool.get_ref())
    .await?
    .ok_or(AppError::Auth(AuthError::IncorrectCredentials))?;

    let (user_id, username, created_at, updated_at, email, hashed_password, is_chirpy_red) = user;

    verify_password(&form.password, &hashed_password)
        .map_err(|_| AppError::Auth(AuthError::IncorrectCredentials))?;

    let access_token = issue_access_token(&user_id, form.expires_in_seconds, auth_config.get_ref())?;
    let refresh_token = issue_refresh_token(pool.get_ref(), user_id).await?;

    tracing::info!(user_id = %user_id, "user logged in");

    Ok(HttpResponse::Ok().json(SessionResponse {
        id: user_id.to_string(),
        username,
        created_at: created_at.to_rfc3339(),
        updated_at: updated_at.to_rfc3339(),
        email,
        token: access_token,
        refresh_token: refresh_token.token,
        is_chirpy_red,
    }))
}

/// POST /api/refresh
///
/// Exchange a valid refresh token (bearer header) for a new one-hour
/// access token. The refresh record itself is not altered: the same token
/// stays usable until it expires or is revoked.
///
/// # Errors
/// - 401: missing/malformed header, or token unknown/revoked/expired
pub async fn refresh(
    request: HttpRequest,
    pool: web::Data<PgPool>,
    auth_config: web::Data<AuthSettings>,
) -> Result<HttpResponse, AppError> {
    let refresh_token = bearer_token(request.headers())?;

    let user_id = validate_refresh_token(pool.get_ref(), &refresh_token).await?;

    let access_token = issue_access_token(&user_id, 0, auth_config.get_ref())?;

    tracing::info!(user_id = %user_id, "access token refreshed");

    Ok(HttpResponse::Ok().json(RefreshResponse {
        token: access_token,
    }))
}

/// POST /api/revoke
///
/// Permanently revoke the refresh token in the bearer header. Revoking an
/// already-revoked token succeeds; revoking an unknown one does not.
///
/// # Errors
/// - 401: missing/malformed header, or token not found
pub async fn revoke(
    request: HttpRequest,
    pool: web::Data<PgPool>,
) -> Result<HttpResponse, AppError> {
    let refresh_token = bearer_token(request.headers())?;

    revoke_refresh_token(pool.get_ref(), &refresh_token).await?;

    Ok(HttpResponse::NoContent().finish())
}
