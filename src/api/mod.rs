//! HTTP API server

use axum::http::header::{HeaderValue, REFERRER_POLICY, X_CONTENT_TYPE_OPTIONS, X_FRAME_OPTIONS};
use axum::routing::get;
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::set_header::SetResponseHeaderLayer;
use tower_http::trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer};
use tracing::Level;

pub mod extract;
pub mod handlers;
pub mod state;
pub mod view;

pub use state::AppState;

/// Build the API router using the provided application state.
///
/// The layer stack mirrors the original deployment: security response
/// headers, permissive CORS, and per-request trace logging.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/plain-text", get(handlers::plain_text))
        .route("/json", get(handlers::json_hello))
        .route("/fortune", get(handlers::fortune))
        .route("/health", get(handlers::health))
        .nest("/products", product_routes())
        .layer(SetResponseHeaderLayer::if_not_present(
            X_CONTENT_TYPE_OPTIONS,
            HeaderValue::from_static("nosniff"),
        ))
        .layer(SetResponseHeaderLayer::if_not_present(
            X_FRAME_OPTIONS,
            HeaderValue::from_static("SAMEORIGIN"),
        ))
        .layer(SetResponseHeaderLayer::if_not_present(
            REFERRER_POLICY,
            HeaderValue::from_static("no-referrer"),
        ))
        .layer(CorsLayer::permissive())
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .with_state(state)
}

fn product_routes() -> Router<AppState> {
    use axum::routing::post;

    Router::new()
        .route(
            "/",
            post(handlers::create_product).get(handlers::list_products),
        )
        .route(
            "/:id",
            get(handlers::get_product)
                .put(handlers::update_product)
                .delete(handlers::delete_product),
        )
}
