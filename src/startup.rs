use actix_files as fs;
use actix_web::dev::Server;
use actix_web::{web, App, HttpServer};
use sqlx::PgPool;
use std::net::TcpListener;

use crate::configuration::Settings;
use crate::middleware::{HitCounter, MetricsMiddleware};
use crate::routes::{
    create_chirp, create_user, delete_chirp, get_chirp, get_chirps, health_check, login, metrics,
    polka_webhook, refresh, reset, revoke, show_users, update_user,
};

pub fn run(
    listener: TcpListener,
    connection: PgPool,
    settings: Settings,
) -> Result<Server, std::io::Error> {
    let connection = web::Data::new(connection);
    let auth_settings = web::Data::new(settings.auth);
    let application_settings = web::Data::new(settings.application);
    let hits = web::Data::new(HitCounter::default());

    let server = HttpServer::new(move || {
        App::new()
            // Shared state
            .app_data(connection.clone())
            .app_data(auth_settings.clone())
            .app_data(application_settings.clone())
            .app_data(hits.clone())

            .route("/api/healthz", web::get().to(health_check))

            // Accounts
            .route("/api/users", web::post().to(create_user))
            .route("/api/users", web::put().to(update_user))
            .route("/api/showusers", web::get().to(show_users))

            // Sessions
            .route("/api/login", web::post().to(login))
            .route("/api/refresh", web::post().to(refresh))
            .route("/api/revoke", web::post().to(revoke))

            // Chirps
            .route("/api/chirps", web::post().to(create_chirp))
            .route("/api/chirps", web::get().to(get_chirps))
            .route("/api/chirps/{chirp_id}", web::get().to(get_chirp))
            .route("/api/chirps/{chirp_id}", web::delete().to(delete_chirp))

            // Webhooks
            .route("/api/polka/webhooks", web::post().to(polka_webhook))

            // Admin
            .route("/admin/metrics", web::get().to(metrics))
            .route("/admin/reset", web::post().to(reset))

            // Hit-counted app mount, then the static shell (must be last)
            .service(
                web::scope("/app")
                    .wrap(MetricsMiddleware::new(hits.clone()))
                    .service(fs::Files::new("/", ".").index_file("index.html")),
            )
            .service(fs::Files::new("/", "./html").index_file("index.html"))
    })
    .listen(listener)?
    .run();

    Ok(server)
}
