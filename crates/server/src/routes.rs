use axum::{
    http::{header, StatusCode},
    middleware,
    response::IntoResponse,
    routing::{delete, get, patch, post, MethodRouter},
    Json, Router,
};
use models::enums::Role;
use tower_http::{
    cors::CorsLayer,
    trace::{DefaultMakeSpan, DefaultOnFailure, DefaultOnRequest, DefaultOnResponse, TraceLayer},
};
use tracing::Level;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use common::types::Health;

use crate::errors::JsonApiError;
use crate::openapi::ApiDoc;

pub mod auth;
pub mod deliveries;
pub mod products;
pub mod transactions;

use auth::ServerState;

const ALL: &[Role] = &[Role::Admin, Role::Employee, Role::Customer];
const STAFF: &[Role] = &[Role::Admin, Role::Employee];
const ADMIN: &[Role] = &[Role::Admin];

#[utoipa::path(get, path = "/health", tag = "health", responses((status = 200, description = "OK", body = crate::openapi::HealthResponse)))]
pub async fn health() -> Json<Health> {
    Json(Health { status: "ok" })
}

pub async fn metrics() -> Result<impl IntoResponse, JsonApiError> {
    let body = common::metrics::encode_metrics().map_err(|e| JsonApiError::internal(e.to_string()))?;
    Ok((StatusCode::OK, [(header::CONTENT_TYPE, "text/plain; version=0.0.4")], body))
}

/// Method, path and the roles allowed to call it; all entries require a verified token.
fn protected_routes() -> Vec<(&'static str, MethodRouter<ServerState>, &'static [Role])> {
    vec![
        ("/deliveries", get(deliveries::list), STAFF),
        ("/deliveries", post(deliveries::create), ADMIN),
        ("/delivery/:id", get(deliveries::get), STAFF),
        ("/delivery/edit/:id", patch(deliveries::update), ADMIN),
        ("/delivery/:id", delete(deliveries::delete), ADMIN),
        ("/transactions", get(transactions::list), STAFF),
        ("/transactions", post(transactions::create), ALL),
        ("/transaction/:id", get(transactions::get), ALL),
        ("/transaction/edit/:id", patch(transactions::update), STAFF),
        ("/transaction/:id", delete(transactions::delete), ADMIN),
        ("/products", get(products::list), ALL),
        ("/products", post(products::create), ADMIN),
        ("/product/:id", get(products::get), ALL),
        ("/product/edit/:id", patch(products::update), ADMIN),
        ("/product/:id", delete(products::delete), ADMIN),
        ("/users", get(auth::list_users), ADMIN),
        ("/users", post(auth::create_user), ADMIN),
    ]
}

/// Build the full application router: public, token-protected and docs routes
pub fn build_router(state: ServerState, cors: CorsLayer) -> Router {
    // Public routes
    let public = Router::new()
        .route("/register", post(auth::register))
        .route("/login", post(auth::login))
        .route("/logout", post(auth::logout));

    // Role-gated routes; repeated paths merge their method routers
    let protected = protected_routes()
        .into_iter()
        .fold(Router::new(), |router, (path, handler, roles)| {
            router.route(path, handler.route_layer(middleware::from_fn_with_state(roles, auth::authorize_roles)))
        })
        .route_layer(middleware::from_fn_with_state(state.clone(), auth::require_bearer_token_state));

    Router::new()
        .route("/health", get(health))
        .route("/metrics", get(metrics))
        .nest("/api/v1", public.merge(protected))
        .merge(SwaggerUi::new("/docs").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .with_state(state)
        .layer(cors)
        .layer(
            TraceLayer::new_for_http()
                // one INFO span per request with method and path
                .make_span_with(
                    DefaultMakeSpan::new()
                        .level(Level::INFO)
                        .include_headers(false),
                )
                .on_request(
                    DefaultOnRequest::new()
                        .level(Level::INFO),
                )
                // status code and latency
                .on_response(
                    DefaultOnResponse::new()
                        .level(Level::INFO)
                        .include_headers(false),
                )
                .on_failure(
                    DefaultOnFailure::new()
                        .level(Level::ERROR),
                )
        )
}
