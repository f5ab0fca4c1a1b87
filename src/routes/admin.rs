/// Admin endpoints
///
/// The metrics page reports file-server hits; reset is restricted to the
/// "dev" platform because it wipes the user table.

use actix_web::{web, HttpResponse};
use sqlx::PgPool;

use crate::configuration::ApplicationSettings;
use crate::error::AppError;
use crate::middleware::HitCounter;

/// GET /admin/metrics
pub async fn metrics(hits: web::Data<HitCounter>) -> HttpResponse {
    HttpResponse::Ok()
        .content_type("text/html; charset=utf-8")
        .body(format!(
            "<html>\n  <body>\n    <h1>Welcome, Chirpy Admin</h1>\n    <p>Chirpy has been visited {} times!</p>\n  </body>\n</html>\n",
            hits.value()
        ))
}

/// POST /admin/reset
///
/// Zeroes the hit counter and deletes every user (chirps and refresh
/// tokens cascade). 403 outside the dev platform.
pub async fn reset(
    pool: web::Data<PgPool>,
    hits: web::Data<HitCounter>,
    app_settings: web::Data<ApplicationSettings>,
) -> Result<HttpResponse, AppError> {
    if app_settings.platform != "dev" {
        return Ok(HttpResponse::Forbidden().finish());
    }

    hits.reset();
    sqlx::query("DELETE FROM users").execute(pool.get_ref()).await?;

    tracing::info!("hit counter and user table reset");

    Ok(HttpResponse::Ok().body("Hits reset to 0"))
}
