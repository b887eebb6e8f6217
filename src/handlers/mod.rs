//! HTTP handlers module
//!
//! Handlers are thin: they extract the caller and the request, call one
//! service and serialise its result. Errors become JSON via [`error`].

pub mod admin;
pub mod bookings;
pub mod courts;
pub mod error;
pub mod groups;
pub mod health;
pub mod scans;
pub mod users;

use actix_web::web;

/// Register every route and the JSON/query/path error handlers
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.app_data(web::JsonConfig::default().error_handler(error::json_error_handler))
        .app_data(web::QueryConfig::default().error_handler(error::query_error_handler))
        .app_data(web::PathConfig::default().error_handler(error::path_error_handler))
        .route("/health", web::get().to(health::health))
        .service(
            web::scope("/api")
                .route("/register", web::post().to(users::register))
                .route("/login", web::post().to(users::login))
                .route("/courts", web::get().to(courts::list_courts))
                .route("/courts/{id}/slots", web::get().to(courts::court_slots))
                .route("/fetch-bookings", web::get().to(courts::fetch_bookings))
                .route("/bookings", web::post().to(bookings::create_booking))
                .route("/bookings/{id}", web::delete().to(bookings::cancel_booking))
                .route("/user-bookings", web::get().to(bookings::user_bookings))
                .route("/check-user-bookings", web::get().to(bookings::check_user_bookings))
                .route("/users/lookup", web::get().to(users::lookup_user))
                .route("/registered-players", web::get().to(users::registered_players))
                .route("/profile", web::get().to(users::get_profile))
                .route("/profile", web::put().to(users::update_profile))
                .route("/profile/password", web::post().to(users::change_password))
                .route("/profile/qr-code", web::post().to(users::generate_qr_code))
                .route("/scan", web::post().to(scans::scan))
                .route("/groups", web::get().to(groups::list_groups))
                .route("/groups", web::post().to(groups::create_group))
                .route("/groups/{id}", web::delete().to(groups::delete_group))
                .route("/groups/{id}/members", web::get().to(groups::list_members))
                .route("/groups/{id}/members", web::post().to(groups::add_member))
                .route(
                    "/groups/{id}/members/{user_id}",
                    web::delete().to(groups::remove_member),
                )
                .service(
                    web::scope("/admin")
                        .route("/dashboard", web::get().to(admin::dashboard))
                        .route("/users", web::get().to(admin::list_users))
                        .route("/users/{id}/activate", web::post().to(admin::activate_user))
                        .route("/scans", web::get().to(admin::recent_scans))
                        .route("/email-logs", web::get().to(admin::email_logs))
                        .route("/email-blast", web::post().to(admin::email_blast)),
                ),
        );
}
