use actix_web::cookie::time::Duration as CookieDuration;
use actix_web::cookie::{Cookie, SameSite};
use actix_web::dev::Payload;
use actix_web::http::header::Header;
use actix_web::{FromRequest, HttpRequest, web};
use actix_web_httpauth::headers::authorization::{Authorization, Bearer};
use futures_util::future::LocalBoxFuture;
use jsonwebtoken::{DecodingKey, EncodingKey, Validation, decode, encode};
use mongodb::bson::oid::ObjectId;
use serde::{Deserialize, Serialize};

use crate::config::AppConfig;
use crate::database::RedisService;
use crate::utils::error::CustomError;

pub const SESSION_COOKIE: &str = "sessionid";

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    pub id: String,
    pub username: String,
    pub exp: usize,
}

/// The logged-in user behind a request.
///
/// Extracting `AuthUser` from an anonymous request fails with a redirect to
/// the login page carrying the requested path as `next`; extract
/// `Option<AuthUser>` on pages that anonymous visitors may see.
#[derive(Debug, Clone, PartialEq)]
pub struct AuthUser {
    pub id: ObjectId,
    pub username: String,
}

impl FromRequest for AuthUser {
    type Error = CustomError;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        let req = req.clone();
        Box::pin(async move {
            match authenticate(&req).await? {
                Some(user) => Ok(user),
                None => {
                    let config = app_config(&req)?;
                    Err(login_redirect(&req, &config.login_url))
                }
            }
        })
    }
}

pub fn app_config(req: &HttpRequest) -> Result<web::Data<AppConfig>, CustomError> {
    req.app_data::<web::Data<AppConfig>>()
        .cloned()
        .ok_or_else(|| CustomError::InternalServerError("Application config missing".to_string()))
}

/// Session token from the `Authorization: Bearer` header, else the session cookie.
pub fn token_from_request(req: &HttpRequest) -> Option<String> {
    if let Ok(authorization) = Authorization::<Bearer>::parse(req) {
        return Some(authorization.as_ref().token().to_string());
    }

    req.cookie(SESSION_COOKIE)
        .map(|cookie| cookie.value().to_string())
        .filter(|token| !token.is_empty())
}

fn decode_claims(token: &str, secret: &str) -> Option<Claims> {
    decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::default(),
    )
    .map(|data| data.claims)
    .ok()
}

/// Resolve the request's user. Missing, malformed, expired or revoked
/// tokens all mean anonymous.
pub async fn authenticate(req: &HttpRequest) -> Result<Option<AuthUser>, CustomError> {
    let config = app_config(req)?;

    let Some(token) = token_from_request(req) else {
        return Ok(None);
    };
    let Some(claims) = decode_claims(&token, &config.jwt_secret) else {
        log::debug!("rejected an invalid session token");
        return Ok(None);
    };
    let Ok(id) = ObjectId::parse_str(&claims.id) else {
        return Ok(None);
    };

    // Without Redis the signed token alone identifies the user.
    if let Some(redis_service) = req.app_data::<web::Data<RedisService>>().cloned() {
        match redis_service.validate_session(&token).await {
            Ok(Some(stored_user_id)) if stored_user_id == claims.id => {}
            Ok(_) => return Ok(None),
            Err(e) => log::warn!("session lookup failed, trusting the token: {}", e),
        }
    }

    Ok(Some(AuthUser {
        id,
        username: claims.username,
    }))
}

pub fn create_token(user_id: &ObjectId, username: &str, config: &AppConfig) -> Result<String, CustomError> {
    let expiration = chrono::Utc::now()
        .checked_add_signed(chrono::Duration::hours(config.session_ttl_hours))
        .ok_or_else(|| CustomError::InternalServerError("Invalid session lifetime".to_string()))?
        .timestamp() as usize;

    let claims = Claims {
        id: user_id.to_hex(),
        username: username.to_owned(),
        exp: expiration,
    };

    encode(
        &jsonwebtoken::Header::default(),
        &claims,
        &EncodingKey::from_secret(config.jwt_secret.as_bytes()),
    )
    .map_err(|_| CustomError::InternalServerError("Token generation failed".to_string()))
}

/// Create a token and register it as the user's live session in Redis.
pub async fn create_token_with_session(
    user_id: &ObjectId,
    username: &str,
    config: &AppConfig,
    redis_service: &RedisService,
) -> Result<String, CustomError> {
    let token = create_token(user_id, username, config)?;

    redis_service
        .store_session(&user_id.to_hex(), &token, config.session_ttl_seconds())
        .await
        .map_err(|e| CustomError::InternalServerError(format!("Failed to store session: {}", e)))?;

    Ok(token)
}

/// Revoke `token` so it no longer authenticates (logout).
pub async fn invalidate_session(token: &str, redis_service: &RedisService) -> Result<(), CustomError> {
    redis_service
        .invalidate_session(token)
        .await
        .map_err(|e| CustomError::InternalServerError(format!("Failed to invalidate session: {}", e)))
}

pub fn session_cookie(token: &str, config: &AppConfig) -> Cookie<'static> {
    Cookie::build(SESSION_COOKIE, token.to_string())
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .max_age(CookieDuration::hours(config.session_ttl_hours))
        .finish()
}

pub fn removal_cookie() -> Cookie<'static> {
    let mut cookie = Cookie::build(SESSION_COOKIE, "").path("/").finish();
    cookie.make_removal();
    cookie
}

/// `login_url?next=<path>`; slashes stay readable in `next`.
pub fn login_location(login_url: &str, next: &str) -> String {
    format!(
        "{}?next={}",
        login_url,
        urlencoding::encode(next).replace("%2F", "/")
    )
}

pub fn login_redirect(req: &HttpRequest, login_url: &str) -> CustomError {
    let next = req
        .uri()
        .path_and_query()
        .map(|path| path.as_str())
        .unwrap_or("/");

    CustomError::LoginRequired {
        location: login_location(login_url, next),
    }
}

/// Only local absolute paths are followed after login. Browsers drop tabs and
/// newlines from URLs and read `\` as `/`, so neither may appear anywhere.
pub fn is_safe_redirect(target: &str) -> bool {
    if target.chars().any(|c| c.is_control() || c == '\\') {
        return false;
    }
    target.starts_with('/') && !target.starts_with("//")
}
