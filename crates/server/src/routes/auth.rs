use std::sync::Arc;

use axum::{
    extract::{Request, State},
    http::{header, Method},
    middleware::Next,
    response::Response,
    Json,
};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use models::enums::Role;
use sea_orm::DatabaseConnection;
use serde_json::Value;
use tracing::{info, warn};

use service::auth::domain::{AuthSession, AuthUser, Claims, LoginInput, NewUserInput, RegisterInput};
use service::auth::repo::seaorm::SeaOrmAuthRepository;
use service::auth::repository::AuthRepository;
use service::auth::{AuthConfig, AuthService};
use service::delivery::{repo::seaorm::SeaOrmDeliveryRepository, repository::DeliveryRepository, DeliveryService};
use service::notify::Mailer;
use service::product::{repo::seaorm::SeaOrmProductRepository, repository::ProductRepository, ProductService};
use service::transaction::{repo::seaorm::SeaOrmTransactionRepository, repository::TransactionRepository, TransactionService};

use crate::errors::JsonApiError;
use crate::response::{self, ApiResult};
use crate::validation::{parse_body, require_fields, ApiJson};

pub const AUTH_COOKIE: &str = "auth_token";

/// Shared handler state; every service sits behind its repository trait object.
#[derive(Clone)]
pub struct ServerState {
    pub auth: Arc<AuthService<dyn AuthRepository>>,
    pub deliveries: Arc<DeliveryService<dyn DeliveryRepository>>,
    pub transactions: Arc<TransactionService<dyn TransactionRepository, dyn Mailer>>,
    pub products: Arc<ProductService<dyn ProductRepository>>,
}

impl ServerState {
    pub fn from_repositories(
        auth_repo: Arc<dyn AuthRepository>,
        auth_cfg: AuthConfig,
        deliveries: Arc<dyn DeliveryRepository>,
        transactions: Arc<dyn TransactionRepository>,
        products: Arc<dyn ProductRepository>,
        mailer: Arc<dyn Mailer>,
    ) -> Self {
        Self {
            auth: Arc::new(AuthService::new(auth_repo, auth_cfg)),
            deliveries: Arc::new(DeliveryService::new(deliveries)),
            transactions: Arc::new(TransactionService::new(transactions, mailer)),
            products: Arc::new(ProductService::new(products)),
        }
    }

    /// Wire the SeaORM repositories over one pool.
    pub fn from_db(db: DatabaseConnection, auth_cfg: AuthConfig, mailer: Arc<dyn Mailer>) -> Self {
        Self::from_repositories(
            Arc::new(SeaOrmAuthRepository { db: db.clone() }),
            auth_cfg,
            Arc::new(SeaOrmDeliveryRepository { db: db.clone() }),
            Arc::new(SeaOrmTransactionRepository { db: db.clone() }),
            Arc::new(SeaOrmProductRepository { db }),
            mailer,
        )
    }
}

fn session_cookie(token: String) -> Cookie<'static> {
    let mut cookie = Cookie::new(AUTH_COOKIE, token);
    cookie.set_path("/");
    cookie.set_http_only(true);
    cookie.set_secure(false);
    cookie.set_same_site(SameSite::Lax);
    cookie
}

#[utoipa::path(post, path = "/api/v1/register", tag = "auth", request_body = crate::openapi::RegisterRequest,
    responses((status = 201, description = "Registered"), (status = 400, description = "Bad Request"), (status = 409, description = "Conflict")))]
pub async fn register(State(state): State<ServerState>, ApiJson(body): ApiJson<Value>) -> ApiResult<AuthUser> {
    require_fields(&body, &["name", "email", "password"])?;
    let input: RegisterInput = parse_body(body)?;
    let user = state.auth.register(input).await?;
    response::created(format!("User {} with ID {} is registered", user.name, user.id), user)
}

#[utoipa::path(post, path = "/api/v1/login", tag = "auth", request_body = crate::openapi::LoginRequest,
    responses((status = 200, description = "Logged In"), (status = 401, description = "Unauthorized")))]
pub async fn login(
    State(state): State<ServerState>,
    jar: CookieJar,
    ApiJson(body): ApiJson<Value>,
) -> Result<(CookieJar, Json<response::ApiResponse<AuthSession>>), JsonApiError> {
    require_fields(&body, &["email", "password"])?;
    let input: LoginInput = parse_body(body)?;
    let session = state.auth.login(input).await?;
    let jar = jar.add(session_cookie(session.token.clone()));
    let (_, envelope) = response::ok(format!("User {} is logged in", session.user.name), session)?;
    Ok((jar, envelope))
}

#[utoipa::path(post, path = "/api/v1/logout", tag = "auth", responses((status = 200, description = "Logged Out")))]
pub async fn logout(jar: CookieJar) -> (CookieJar, Json<response::ApiResponse<Option<()>>>) {
    let jar = jar.remove(Cookie::build(AUTH_COOKIE).path("/"));
    let body = response::ApiResponse { success: true, message: "Logged out".into(), data: None };
    (jar, Json(body))
}

#[utoipa::path(get, path = "/api/v1/users", tag = "auth", responses((status = 200, description = "OK"), (status = 403, description = "Forbidden")))]
pub async fn list_users(State(state): State<ServerState>) -> ApiResult<Vec<AuthUser>> {
    let users = state.auth.list_users().await?;
    response::ok(format!("{} users retrieved", users.len()), users)
}

#[utoipa::path(post, path = "/api/v1/users", tag = "auth", request_body = crate::openapi::NewUserRequest,
    responses((status = 201, description = "Created"), (status = 409, description = "Conflict")))]
pub async fn create_user(State(state): State<ServerState>, ApiJson(body): ApiJson<Value>) -> ApiResult<AuthUser> {
    require_fields(&body, &["name", "email", "password", "role"])?;
    let input: NewUserInput = parse_body(body)?;
    let user = state.auth.create_user(input).await?;
    response::created(format!("Created new User {} with an ID {}", user.name, user.id), user)
}

fn bearer_or_cookie(req: &Request) -> Result<String, JsonApiError> {
    if let Some(h) = req.headers().get(header::AUTHORIZATION).and_then(|v| v.to_str().ok()) {
        return match h.strip_prefix("Bearer ") {
            Some(t) if !t.trim().is_empty() => Ok(t.trim().to_string()),
            _ => {
                warn!(path = %req.uri().path(), "invalid Authorization format (expect Bearer)");
                Err(JsonApiError::unauthorized("Invalid Authorization header"))
            }
        };
    }
    // Cookie fallback
    let cookie_header = req.headers().get(header::COOKIE).and_then(|v| v.to_str().ok()).unwrap_or("");
    cookie_header
        .split(';')
        .filter_map(|part| part.trim().strip_prefix("auth_token="))
        .find(|t| !t.is_empty())
        .map(str::to_string)
        .ok_or_else(|| {
            warn!(path = %req.uri().path(), "missing Authorization header and auth_token cookie");
            JsonApiError::unauthorized("Please log in to access this resource")
        })
}

/// Verify the bearer token (header or `auth_token` cookie) and stash its claims on the request.
pub async fn require_bearer_token_state(
    State(state): State<ServerState>,
    mut req: Request,
    next: Next,
) -> Result<Response, JsonApiError> {
    if req.method() == Method::OPTIONS {
        return Ok(next.run(req).await);
    }
    let token = bearer_or_cookie(&req)?;
    let claims = state.auth.verify_token(&token).map_err(|e| {
        warn!(path = %req.uri().path(), err = %e, "token validation failed");
        JsonApiError::unauthorized("Invalid or expired token")
    })?;
    req.extensions_mut().insert(claims);
    Ok(next.run(req).await)
}

/// Allow the request only when the verified role is one of `roles`.
pub async fn authorize_roles(
    State(roles): State<&'static [Role]>,
    req: Request,
    next: Next,
) -> Result<Response, JsonApiError> {
    let claims = req
        .extensions()
        .get::<Claims>()
        .ok_or_else(|| JsonApiError::unauthorized("Please log in to access this resource"))?;
    if !roles.contains(&claims.role) {
        info!(user_id = %claims.sub, role = claims.role.as_str(), path = %req.uri().path(), "role rejected");
        return Err(JsonApiError::forbidden(format!(
            "Role ({}) is not allowed to access this resource",
            claims.role.as_str()
        )));
    }
    Ok(next.run(req).await)
}
