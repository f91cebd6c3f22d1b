// task-analytics/src/middleware/auth.rs

use crate::config::AppConfig;
use crate::error::AppError;
use crate::utils::jwt::{AccessTokenClaims, JwtManager};
use axum::{
    extract::{Request, State},
    http::{header, HeaderMap, HeaderValue, Method},
    middleware::Next,
    response::Response,
};
use axum_extra::extract::cookie::CookieJar;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};
use uuid::Uuid;

pub const ACCESS_TOKEN_COOKIE: &str = "access_token";

/// JWT認証ミドルウェアの設定
#[derive(Clone)]
pub struct AuthMiddlewareConfig {
    pub jwt_manager: Arc<JwtManager>,
    pub access_token_cookie_name: String,
}

impl AuthMiddlewareConfig {
    pub fn new(jwt_manager: Arc<JwtManager>) -> Self {
        Self {
            jwt_manager,
            access_token_cookie_name: ACCESS_TOKEN_COOKIE.to_string(),
        }
    }
}

/// 認証済みユーザー情報を格納するエクステンション
#[derive(Debug, Clone)]
pub struct AuthenticatedUser {
    user_id: Uuid,
    pub claims: AccessTokenClaims,
}

impl AuthenticatedUser {
    pub fn new(user_id: Uuid, claims: AccessTokenClaims) -> Self {
        Self { user_id, claims }
    }

    pub fn user_id(&self) -> Uuid {
        self.user_id
    }
}

/// JWT認証ミドルウェア。
///
/// トークンが無い・検証できない場合は 401、`sub` が UUID でない場合は 400。
pub async fn jwt_auth_middleware(
    State(config): State<AuthMiddlewareConfig>,
    headers: HeaderMap,
    cookie_jar: CookieJar,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let path = request.uri().path().to_string();

    // トークンを抽出
    let token = extract_token(&headers, &cookie_jar, &config.access_token_cookie_name)
        .ok_or_else(|| {
            warn!(path = %path, "Missing authentication token");
            AppError::Unauthorized("Authentication required".to_string())
        })?;

    // JWTを検証
    let claims = config
        .jwt_manager
        .verify_access_token(&token)
        .map_err(|e| {
            warn!(path = %path, error = %e, "Invalid access token");
            AppError::Unauthorized("Invalid or expired token".to_string())
        })?;

    let user_id = Uuid::parse_str(&claims.sub).map_err(|_| {
        warn!(path = %path, subject = %claims.sub, "Token subject is not a valid user id");
        AppError::BadRequest("Invalid user id in token".to_string())
    })?;

    debug!(user_id = %user_id, path = %path, "Request authenticated");
    request
        .extensions_mut()
        .insert(AuthenticatedUser::new(user_id, claims));

    Ok(next.run(request).await)
}

/// Authorization ヘッダーを優先し、無ければ Cookie から取得する
fn extract_token(headers: &HeaderMap, cookie_jar: &CookieJar, cookie_name: &str) -> Option<String> {
    let auth_header = headers
        .get(header::AUTHORIZATION)
        .and_then(|header| header.to_str().ok())
        .and_then(|auth_str| auth_str.strip_prefix("Bearer "))
        .map(|token| token.trim().to_string())
        .filter(|token| !token.is_empty());

    let cookie_token = cookie_jar
        .get(cookie_name)
        .map(|cookie| cookie.value().to_string())
        .filter(|token| !token.is_empty());

    auth_header.or(cookie_token)
}

pub fn cors_layer(config: &AppConfig) -> tower_http::cors::CorsLayer {
    let origins: Vec<HeaderValue> = config
        .cors_allowed_origins
        .iter()
        .filter_map(|origin| match origin.parse::<HeaderValue>() {
            Ok(value) => Some(value),
            Err(_) => {
                warn!(origin = %origin, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    tower_http::cors::CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PATCH,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([
            header::AUTHORIZATION,
            header::CONTENT_TYPE,
            header::ACCEPT,
        ])
        .allow_credentials(true) // Cookie送信を許可
        .max_age(Duration::from_secs(3600))
}

impl<S> axum::extract::FromRequestParts<S> for AuthenticatedUser
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut axum::http::request::Parts,
        _state: &S,
    ) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<AuthenticatedUser>()
            .cloned()
            .ok_or_else(|| AppError::Unauthorized("Authentication required".to_string()))
    }
}
