mod admin;
mod chirps;
mod health_check;
mod sessions;
mod users;
mod webhooks;

pub use admin::metrics;
pub use admin::reset;
pub use chirps::create_chirp;
pub use chirps::delete_chirp;
pub use chirps::get_chirp;
pub use chirps::get_chirps;
pub use health_check::health_check;
pub use sessions::login;
pub use sessions::refresh;
pub use sessions::revoke;
pub use users::create_user;
pub use users::show_users;
pub use users::update_user;
pub use webhooks::polka_webhook;
