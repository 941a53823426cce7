pub mod accounts;
pub mod library;
pub mod pictures;
pub mod sessions;
pub mod support;

use axum::extract::DefaultBodyLimit;
use axum::http::{HeaderValue, Request};
use axum::routing::{get, post};
use tower::ServiceBuilder;
use tower_http::compression::CompressionLayer;
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::set_header::SetResponseHeaderLayer;
use tower_http::trace::{DefaultOnResponse, MakeSpan, TraceLayer};
use tracing::{Level, Span};

use crate::application::rate_limit::RateLimitLayer;
use crate::application::services::pictures::MAX_PICTURE_BYTES;
use crate::application::state::AppState;

/// 1 MiB limit for ordinary JSON bodies.
const BODY_LIMIT_BYTES: usize = 1024 * 1024;

/// Hard cap on any request body; leaves room for multipart framing around a
/// maximum-size picture.
const UPLOAD_BODY_LIMIT_BYTES: usize = MAX_PICTURE_BYTES + 64 * 1024;

/// Maximum auth requests per IP per minute.
const AUTH_RATE_LIMIT_PER_MINUTE: u32 = 20;

pub fn app_router(state: AppState) -> axum::Router {
    axum::Router::new()
        .nest("/api/v1", api_router())
        .layer(
            ServiceBuilder::new()
                .layer(
                    TraceLayer::new_for_http()
                        .make_span_with(UserdeskMakeSpan)
                        .on_response(DefaultOnResponse::new().level(Level::INFO)),
                )
                .layer(RequestBodyLimitLayer::new(UPLOAD_BODY_LIMIT_BYTES))
                .layer(DefaultBodyLimit::max(BODY_LIMIT_BYTES))
                .layer(SetResponseHeaderLayer::overriding(
                    axum::http::header::X_CONTENT_TYPE_OPTIONS,
                    HeaderValue::from_static("nosniff"),
                ))
                .layer(SetResponseHeaderLayer::overriding(
                    axum::http::header::X_FRAME_OPTIONS,
                    HeaderValue::from_static("DENY"),
                ))
                .layer(SetResponseHeaderLayer::overriding(
                    axum::http::header::REFERRER_POLICY,
                    HeaderValue::from_static("strict-origin-when-cross-origin"),
                ))
                .layer(CompressionLayer::new().gzip(true)),
        )
        .with_state(state)
}

fn api_router() -> axum::Router<AppState> {
    account_routes()
        .merge(library_routes())
        .route("/auth/me", get(sessions::me))
        .merge(session_routes().layer(RateLimitLayer::per_minute(AUTH_RATE_LIMIT_PER_MINUTE)))
}

fn account_routes() -> axum::Router<AppState> {
    axum::Router::new()
        .route(
            "/users",
            get(accounts::list_accounts).post(accounts::create_account),
        )
        .route(
            "/users/{id}",
            get(accounts::get_account)
                .put(accounts::update_account)
                .delete(accounts::delete_account),
        )
        .route("/users/{id}/activate", post(accounts::activate_account))
        .route(
            "/users/{id}/upload_profile_pic",
            post(pictures::upload_profile_pic).layer(DefaultBodyLimit::max(UPLOAD_BODY_LIMIT_BYTES)),
        )
        .route(
            "/users/{id}/download_profile_pic",
            get(pictures::download_profile_pic),
        )
}

fn session_routes() -> axum::Router<AppState> {
    axum::Router::new()
        .route("/auth/signup", post(sessions::signup))
        .route("/auth/login", post(sessions::login))
        .route("/auth/logout", post(sessions::logout))
        .route("/auth/refresh", post(sessions::refresh))
}

fn library_routes() -> axum::Router<AppState> {
    axum::Router::new()
        .route("/profiles", get(library::list_profiles))
        .route("/profiles/{id}", get(library::get_profile))
        .route("/books", get(library::list_books))
        .route("/books/{id}", get(library::get_book))
        .route("/readers", get(library::list_readers))
        .route("/readers/{id}", get(library::get_reader))
}

#[derive(Clone)]
struct UserdeskMakeSpan;

impl<B> MakeSpan<B> for UserdeskMakeSpan {
    fn make_span(&mut self, request: &Request<B>) -> Span {
        tracing::info_span!(
            "request",
            method = %request.method(),
            uri = %request.uri(),
            version = ?request.version(),
            account.id = tracing::field::Empty,
        )
    }
}
