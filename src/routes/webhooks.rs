/// Payment-provider webhook
///
/// Polka notifies us of subscription upgrades. The caller authenticates
/// with `Authorization: ApiKey <key>` against the key configured at boot;
/// events other than `user.upgraded` are acknowledged and ignored.

use actix_web::{web, HttpRequest, HttpResponse};
use serde::Deserialize;
use sqlx::PgPool;
use uuid::Uuid;

use crate::auth::api_key;
use crate::configuration::AuthSettings;
use crate::error::{AppError, AuthError, DatabaseError, ValidationError};

#[derive(Deserialize)]
pub struct WebhookRequest {
    pub event: String,
    pub data: WebhookData,
}

#[derive(Deserialize)]
pub struct WebhookData {
    pub user_id: String,
}

/// POST /api/polka/webhooks
///
/// # Errors
/// - 401: missing/malformed ApiKey credential, or key mismatch
/// - 400: user id is not a UUID
/// - 404: no such user
pub async fn polka_webhook(
    request: HttpRequest,
    form: web::Json<WebhookRequest>,
    pool: web::Data<PgPool>,
    auth_config: web::Data<AuthSettings>,
) -> Result<HttpResponse, AppError> {
    let key = api_key(request.headers())?;
    if key != auth_config.polka_key {
        return Err(AppError::Auth(AuthError::InvalidApiKey));
    }

    if form.event != "user.upgraded" {
        return Ok(HttpResponse::NoContent().finish());
    }

    let user_id = Uuid::parse_str(&form.data.user_id)
        .map_err(|_| AppError::Validation(ValidationError::InvalidFormat("user_id")))?;

    let result = sqlx::query(
        "UPDATE users SET is_chirpy_red = TRUE, updated_at = $1 WHERE id = $2",
    )
    .bind(chrono::Utc::now())
    .bind(user_id)
    .execute(pool.get_ref())
    .await?;

    if result.rows_affected() == 0 {
        return Err(AppError::Database(DatabaseError::NotFound(
            "user not found".to_string(),
        )));
    }

    tracing::info!(user_id = %user_id, "user upgraded to chirpy red");

    Ok(HttpResponse::NoContent().finish())
}
