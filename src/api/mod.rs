pub mod handlers;
pub mod middleware;
pub mod state;

use std::sync::Arc;

use axum::{
    routing::{delete, get, patch, post, put},
    Router,
};
use tower_http::{compression::CompressionLayer, cors::CorsLayer, trace::TraceLayer};

use crate::{config::Settings, service::ServiceContext};
use state::AppState;

pub fn create_app(service_context: Arc<ServiceContext>, settings: Arc<Settings>) -> Router {
    let app_state = AppState::new(service_context, settings);

    Router::new()
        // Root and health endpoints
        .route("/", get(handlers::root::root))
        .route("/health", get(handlers::root::health_check))
        .route("/api", get(handlers::root::api_info))
        // Auth routes
        .nest("/auth", auth_routes(app_state.clone()))
        // API routes
        .nest("/api", api_routes(app_state.clone()))
        // Add state to the router
        .with_state(app_state)
        // Middleware
        .layer(CompressionLayer::new())
        .layer(CorsLayer::permissive()) // Configure properly for production
        .layer(TraceLayer::new_for_http())
}

fn api_routes(state: AppState) -> Router<AppState> {
    Router::new()
        .nest("/announcements", announcement_routes(state.clone()))
        .nest("/programs", program_routes(state.clone()))
        .nest("/farmers", farmer_routes(state))
}

fn auth_routes(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/register", post(handlers::auth::register))
        .route("/login", post(handlers::auth::login))
        .route("/logout", post(handlers::auth::logout))
        .nest(
            "/",
            Router::new()
                .route("/me", get(handlers::auth::me))
                .route_layer(axum::middleware::from_fn_with_state(
                    state,
                    middleware::auth::require_auth,
                )),
        )
}

fn announcement_routes(state: AppState) -> Router<AppState> {
    Router::new()
        // Public routes (listing is visibility-filtered, by-id is not)
        .route("/", get(handlers::announcements::list))
        .route("/:id", get(handlers::announcements::get))
        // Protected routes - require auth
        .nest(
            "/",
            Router::new()
                .route("/", post(handlers::announcements::create))
                .route("/:id", put(handlers::announcements::update))
                .route("/:id", patch(handlers::announcements::update))
                .route("/:id", delete(handlers::announcements::delete))
                .route_layer(axum::middleware::from_fn_with_state(
                    state,
                    middleware::auth::require_auth,
                )),
        )
}

fn program_routes(state: AppState) -> Router<AppState> {
    Router::new()
        // Public routes
        .route("/", get(handlers::programs::list))
        .route("/active", get(handlers::programs::list_active))
        .route("/:id", get(handlers::programs::get))
        // Any logged-in farmer may apply
        .nest(
            "/",
            Router::new()
                .route("/:id/apply", post(handlers::programs::apply))
                .route_layer(axum::middleware::from_fn_with_state(
                    state.clone(),
                    middleware::auth::require_auth,
                )),
        )
        // Admin-only management routes
        .nest(
            "/",
            Router::new()
                .route("/", post(handlers::programs::create))
                .route("/:id", put(handlers::programs::update))
                .route("/:id", delete(handlers::programs::delete))
                .route("/:id/applications", get(handlers::programs::list_applications))
                .route(
                    "/:id/applications/:application_id",
                    put(handlers::programs::update_application),
                )
                .route_layer(axum::middleware::from_fn_with_state(
                    state,
                    middleware::auth::require_admin,
                )),
        )
}

fn farmer_routes(state: AppState) -> Router<AppState> {
    Router::new()
        // Admin-or-self checks happen in the handlers
        .nest(
            "/",
            Router::new()
                .route("/:id", get(handlers::farmers::get))
                .route("/:id", put(handlers::farmers::update))
                .route_layer(axum::middleware::from_fn_with_state(
                    state.clone(),
                    middleware::auth::require_auth,
                )),
        )
        .nest(
            "/",
            Router::new()
                .route("/", get(handlers::farmers::list))
                .route("/:id", delete(handlers::farmers::delete))
                .route_layer(axum::middleware::from_fn_with_state(
                    state,
                    middleware::auth::require_admin,
                )),
        )
}
