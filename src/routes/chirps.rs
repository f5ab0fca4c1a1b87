/// Chirp routes
///
/// Posting requires a valid access token; the author is always taken from
/// the token subject, never from the request body. Bodies are capped at
/// 140 characters and run through the profanity filter before storage.

use actix_web::{web, HttpRequest, HttpResponse};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

use crate::auth::{bearer_token, validate_access_token};
use crate::configuration::AuthSettings;
use crate::error::{AppError, AuthError, DatabaseError, ValidationError};

const MAX_CHIRP_LENGTH: usize = 140;
const BANNED_WORDS: [&str; 3] = ["kerfuffle", "sharbert", "fornax"];

#[derive(Deserialize)]
pub struct CreateChirpRequest {
    pub body: String,
}

#[derive(Deserialize)]
pub struct ChirpsQuery {
    pub author_id: Option<String>,
    pub sort: Option<String>,
}

#[derive(Serialize)]
pub struct ChirpResponse {
    pub id: String,
    pub created_at: String,
    pub updated_at: String,
    pub body: String,
    pub user_id: String,
}

type ChirpRow = (Uuid, DateTime<Utc>, DateTime<Utc>, String, Uuid);

fn chirp_response(row: ChirpRow) -> ChirpResponse {
    let (id, created_at, updated_at, body, user_id) = row;
    ChirpResponse {
        id: id.to_string(),
        created_at: created_at.to_rfc3339(),
        updated_at: updated_at.to_rfc3339(),
        body,
        user_id: user_id.to_string(),
    }
}

/// Replace banned words with **** . Matching is case-insensitive on whole
/// space-separated words, so punctuation-adjacent occurrences pass through.
fn clean_chirp(body: &str) -> String {
    body.split(' ')
        .map(|word| {
            if BANNED_WORDS.contains(&word.to_lowercase().as_str()) {
                "****"
            } else {
                word
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// POST /api/chirps
///
/// # Errors
/// - 400: chirp longer than 140 characters
/// - 401: missing/invalid access token
pub async fn create_chirp(
    request: HttpRequest,
    form: web::Json<CreateChirpRequest>,
    pool: web::Data<PgPool>,
    auth_config: web::Data<AuthSettings>,
) -> Result<HttpResponse, AppError> {
    let access_token = bearer_token(request.headers())?;
    let user_id = validate_access_token(&access_token, auth_config.get_ref())?;

    if form.body.len() > MAX_CHIRP_LENGTH {
        return Err(AppError::Validation(ValidationError::TooLong(
            "chirp",
            MAX_CHIRP_LENGTH,
        )));
    }

    let cleaned = clean_chirp(&form.body);

    let chirp_id = Uuid::new_v4();
    let now = Utc::now();
    sqlx::query(
        r#"
        INSERT INTO chirps (id, created_at, updated_at, body, user_id)
        VALUES ($1, $2, $2, $3, $4)
        "#,
    )
    .bind(chirp_id)
    .bind(now)
    .bind(&cleaned)
    .bind(user_id)
    .execute(pool.get_ref())
    .await?;

    Ok(HttpResponse::Created().json(chirp_response((chirp_id, now, now, cleaned, user_id))))
}

/// GET /api/chirps
///
/// Optional `author_id` filter and `sort=asc|desc` on creation time
/// (anything other than `desc` means ascending).
pub async fn get_chirps(
    query: web::Query<ChirpsQuery>,
    pool: web::Data<PgPool>,
) -> Result<HttpResponse, AppError> {
    let rows = sqlx::query_as::<_, ChirpRow>(
        "SELECT id, created_at, updated_at, body, user_id FROM chirps",
    )
    .fetch_all(pool.get_ref())
    .await?;

    let mut chirps = rows;

    if let Some(author) = &query.author_id {
        let author_id = Uuid::parse_str(author)
            .map_err(|_| AppError::Validation(ValidationError::InvalidFormat("author_id")))?;
        chirps.retain(|(_, _, _, _, user_id)| *user_id == author_id);
    }

    if query.sort.as_deref() == Some("desc") {
        chirps.sort_by(|a, b| b.1.cmp(&a.1));
    } else {
        chirps.sort_by(|a, b| a.1.cmp(&b.1));
    }

    let body: Vec<ChirpResponse> = chirps.into_iter().map(chirp_response).collect();

    Ok(HttpResponse::Ok().json(body))
}

/// GET /api/chirps/{chirp_id}
pub async fn get_chirp(
    path: web::Path<String>,
    pool: web::Data<PgPool>,
) -> Result<HttpResponse, AppError> {
    let chirp_id = Uuid::parse_str(&path)
        .map_err(|_| AppError::Validation(ValidationError::InvalidFormat("chirp_id")))?;

    let row = sqlx::query_as::<_, ChirpRow>(
        "SELECT id, created_at, updated_at, body, user_id FROM chirps WHERE id = $1",
    )
    .bind(chirp_id)
    .fetch_optional(pool.get_ref())
    .await?
    .ok_or_else(|| AppError::Database(DatabaseError::NotFound("chirp not found".to_string())))?;

    Ok(HttpResponse::Ok().json(chirp_response(row)))
}

/// DELETE /api/chirps/{chirp_id}
///
/// Only the author may delete a chirp.
///
/// # Errors
/// - 401: missing/invalid access token
/// - 403: authenticated user is not the author
/// - 404: no such chirp
pub async fn delete_chirp(
    request: HttpRequest,
    path: web::Path<String>,
    pool: web::Data<PgPool>,
    auth_config: web::Data<AuthSettings>,
) -> Result<HttpResponse, AppError> {
    let access_token = bearer_token(request.headers())?;
    let user_id = validate_access_token(&access_token, auth_config.get_ref())?;

    let chirp_id = Uuid::parse_str(&path)
        .map_err(|_| AppError::Validation(ValidationError::InvalidFormat("chirp_id")))?;

    let author = sqlx::query_as::<_, (Uuid,)>("SELECT user_id FROM chirps WHERE id = $1")
        .bind(chirp_id)
        .fetch_optional(pool.get_ref())
        .await?
        .ok_or_else(|| AppError::Database(DatabaseError::NotFound("chirp not found".to_string())))?;

    if author.0 != user_id {
        return Err(AppError::Auth(AuthError::NotResourceOwner));
    }

    sqlx::query("DELETE FROM chirps WHERE id = $1 AND user_id = $2")
        .bind(chirp_id)
        .bind(user_id)
        .execute(pool.get_ref())
        .await?;

    Ok(HttpResponse::NoContent().finish())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn banned_words_are_masked_case_insensitively() {
        assert_eq!(
            clean_chirp("I had something interesting for breakfast"),
            "I had something interesting for breakfast"
        );
        assert_eq!(
            clean_chirp("I hear Mastodon is better than Chirpy. sharbert I need to migrate"),
            "I hear Mastodon is better than Chirpy. **** I need to migrate"
        );
        assert_eq!(
            clean_chirp("I really need a kerfuffle to go to bed sooner, Fornax !"),
            "I really need a **** to go to bed sooner, **** !"
        );
    }

    #[test]
    fn punctuation_adjacent_words_are_left_alone() {
        assert_eq!(clean_chirp("kerfuffle!"), "kerfuffle!");
    }
}
