pub mod auth;
pub mod messages;
pub mod reviews;
pub mod service_offers;
pub mod service_requests;
pub mod services;
pub mod users;

use actix_web::web;

use crate::errors::ApiError;

pub fn init_routes(cfg: &mut web::ServiceConfig) {
    // Malformed bodies and query strings get the same JSON error shape as everything else.
    cfg.app_data(
        web::JsonConfig::default()
            .error_handler(|err, _req| ApiError::validation(err.to_string()).into()),
    );
    cfg.app_data(
        web::QueryConfig::default()
            .error_handler(|err, _req| ApiError::validation(err.to_string()).into()),
    );

    // ── Auth routes (protected by JWT via the AuthenticatedUser extractor) ──
    cfg.service(
        web::scope("/auth")
            .route("/me", web::get().to(auth::me))
            .route("/complete-profile", web::post().to(auth::complete_profile)),
    );

    // ── User routes ──
    cfg.service(web::resource("/users").route(web::get().to(users::get_users)));
    cfg.service(
        web::resource("/users/{id}")
            .route(web::get().to(users::get_user))
            .route(web::put().to(users::update_user))
            .route(web::patch().to(users::update_user))
            .route(web::delete().to(users::delete_user)),
    );

    // ── Service request routes ──
    cfg.service(
        web::scope("/service-requests")
            .route("", web::get().to(service_requests::get_requests))
            .route("", web::post().to(service_requests::create_request))
            .route("/{id}", web::get().to(service_requests::get_request))
            .route("/{id}", web::put().to(service_requests::update_request))
            .route("/{id}", web::patch().to(service_requests::update_request))
            .route("/{id}", web::delete().to(service_requests::delete_request)),
    );

    // ── Service offer routes ──
    cfg.service(
        web::scope("/service-offers")
            .route("", web::get().to(service_offers::get_offers))
            .route("", web::post().to(service_offers::create_offer))
            .route("/{id}", web::get().to(service_offers::get_offer))
            .route("/{id}", web::put().to(service_offers::update_offer))
            .route("/{id}", web::patch().to(service_offers::update_offer))
            .route("/{id}", web::delete().to(service_offers::delete_offer))
            .route("/{id}/status", web::put().to(service_offers::update_status)),
    );

    // ── Service routes (read-only; services are created by accepting an offer) ──
    cfg.service(
        web::scope("/services")
            .route("", web::get().to(services::get_services))
            .route("/{id}", web::get().to(services::get_service)),
    );

    // ── Review routes ──
    cfg.service(
        web::scope("/reviews")
            .route("", web::get().to(reviews::get_reviews))
            .route("", web::post().to(reviews::create_review))
            .route("/{id}", web::get().to(reviews::get_review))
            .route("/{id}", web::put().to(reviews::update_review))
            .route("/{id}", web::patch().to(reviews::update_review))
            .route("/{id}", web::delete().to(reviews::delete_review)),
    );

    // ── Message routes ──
    // `/unread-count` is registered before `/{id}` so it is not taken for an id.
    cfg.service(
        web::scope("/messages")
            .route("", web::get().to(messages::get_messages))
            .route("", web::post().to(messages::create_message))
            .route("/unread-count", web::get().to(messages::unread_count))
            .route("/{id}", web::get().to(messages::get_message))
            .route("/{id}", web::put().to(messages::method_not_allowed))
            .route("/{id}", web::patch().to(messages::method_not_allowed))
            .route("/{id}", web::delete().to(messages::method_not_allowed))
            .route("/{id}/read", web::post().to(messages::mark_read)),
    );
}
