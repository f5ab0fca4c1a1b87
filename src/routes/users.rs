/// User account routes
///
/// Account creation, authenticated email/password updates, and the user
/// listing. The stored password hash is never echoed back to clients.

use actix_web::{web, HttpRequest, HttpResponse};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

use crate::auth::{bearer_token, hash_password, validate_access_token};
use crate::configuration::AuthSettings;
use crate::error::{AppError, DatabaseError};
use crate::validators::is_valid_email;

#[derive(Deserialize)]
pub struct CreateUserRequest {
    pub email: String,
    pub password: String,
    pub username: String,
}

#[derive(Deserialize)]
pub struct UpdateUserRequest {
    pub email: String,
    pub password: String,
}

#[derive(Serialize)]
pub struct UserResponse {
    pub id: String,
    pub username: String,
    pub created_at: String,
    pub updated_at: String,
    pub email: String,
    pub is_chirpy_red: bool,
}

#[derive(Serialize)]
pub struct UpdatedUserResponse {
    pub email: String,
}

#[derive(Serialize)]
pub struct UserSummary {
    pub id: String,
    pub username: String,
    pub email: String,
}

/// POST /api/users
///
/// # Errors
/// - 400: invalid email format
/// - 409: email already registered
/// - 500: hashing or storage failure
pub async fn create_user(
    form: web::Json<CreateUserRequest>,
    pool: web::Data<PgPool>,
) -> Result<HttpResponse, AppError> {
    let email = is_valid_email(&form.email)?;
    let hashed_password = hash_password(&form.password)?;

    let user_id = Uuid::new_v4();
    let now = Utc::now();
    sqlx::query(
        r#"
        INSERT INTO users (id, created_at, updated_at, email, hashed_password, username)
        VALUES ($1, $2, $2, $3, $4, $5)
        "#,
    )
    .bind(user_id)
    .bind(now)
    .bind(&email)
    .bind(&hashed_password)
    .bind(&form.username)
    .execute(pool.get_ref())
    .await?;

    tracing::info!(user_id = %user_id, "user created");

    Ok(HttpResponse::Created().json(UserResponse {
        id: user_id.to_string(),
        username: form.username.clone(),
        created_at: now.to_rfc3339(),
        updated_at: now.to_rfc3339(),
        email,
        is_chirpy_red: false,
    }))
}

/// PUT /api/users
///
/// Update the authenticated user's email and password. Identity comes from
/// the access token in the bearer header, never from the body.
///
/// # Errors
/// - 400: invalid email format
/// - 401: missing/invalid access token
/// - 404: the authenticated user no longer exists
pub async fn update_user(
    request: HttpRequest,
    form: web::Json<UpdateUserRequest>,
    pool: web::Data<PgPool>,
    auth_config: web::Data<AuthSettings>,
) -> Result<HttpResponse, AppError> {
    let access_token = bearer_token(request.headers())?;
    let user_id = validate_access_token(&access_token, auth_config.get_ref())?;

    let email = is_valid_email(&form.email)?;
    let hashed_password = hash_password(&form.password)?;

    let result = sqlx::query(
        r#"
        UPDATE users
        SET email = $1, hashed_password = $2, updated_at = $3
        WHERE id = $4
        "#,
    )
    .bind(&email)
    .bind(&hashed_password)
    .bind(Utc::now())
    .bind(user_id)
    .execute(pool.get_ref())
    .await?;

    if result.rows_affected() == 0 {
        return Err(AppError::Database(DatabaseError::NotFound(
            "user not found".to_string(),
        )));
    }

    tracing::info!(user_id = %user_id, "user credentials updated");

    Ok(HttpResponse::Ok().json(UpdatedUserResponse { email }))
}

/// GET /api/showusers
pub async fn show_users(pool: web::Data<PgPool>) -> Result<HttpResponse, AppError> {
    let users = sqlx::query_as::<_, (Uuid, String, String)>(
        "SELECT id, username, email FROM users ORDER BY email",
    )
    .fetch_all(pool.get_ref())
    .await?;

    let body: Vec<UserSummary> = users
        .into_iter()
        .map(|(id, username, email)| UserSummary {
            id: id.to_string(),
            username,
            email,
        })
        .collect();

    Ok(HttpResponse::Ok().json(body))
}
