use actix_web::{HttpRequest, HttpResponse, web};
use serde_json::json;

use crate::config::AppConfig;
use crate::database::RedisService;
use crate::middleware::auth::{
    invalidate_session, is_safe_redirect, removal_cookie, session_cookie, token_from_request,
};
use crate::user::model::{LOGIN_FORM, LoginForm, NextQuery, SIGNUP_FORM, SignupForm};
use crate::user::service::UserService;
use crate::utils::error::CustomError;
use crate::utils::form::{FormOutcome, RenderedForm, decode_form};
use crate::utils::response::{redirect, render};

const DEFAULT_LOGIN_REDIRECT: &str = "/";

/// GET /auth/signup/
pub async fn signup_page() -> HttpResponse {
    let form = RenderedForm::unbound(SIGNUP_FORM, SignupForm::default());
    render("Sign up", json!({ "form": form }))
}

/// POST /auth/signup/
pub async fn register_user(
    req: HttpRequest,
    body: web::Bytes,
    config: web::Data<AppConfig>,
    user_service: web::Data<UserService>,
) -> Result<HttpResponse, CustomError> {
    let form: SignupForm = decode_form(&req, &body)?;

    match user_service.signup(&form).await? {
        FormOutcome::Saved(_) => Ok(redirect(&config.login_url)),
        FormOutcome::Invalid(errors) => {
            let form = RenderedForm::with_errors(SIGNUP_FORM, form, errors);
            Ok(render("Sign up failed", json!({ "form": form })))
        }
    }
}

/// GET /auth/login/?next=...
pub async fn login_page(query: web::Query<NextQuery>) -> HttpResponse {
    let form = RenderedForm::unbound(
        LOGIN_FORM,
        LoginForm {
            next: query.into_inner().next,
            ..LoginForm::default()
        },
    );
    render("Log in", json!({ "form": form }))
}

/// POST /auth/login/?next=...
///
/// On success the session cookie is set and the user continues to `next`.
pub async fn login_user(
    req: HttpRequest,
    query: web::Query<NextQuery>,
    body: web::Bytes,
    config: web::Data<AppConfig>,
    user_service: web::Data<UserService>,
) -> Result<HttpResponse, CustomError> {
    let mut form: LoginForm = decode_form(&req, &body)?;
    if form.next.is_empty() {
        form.next = query.into_inner().next;
    }

    let redis_service = req.app_data::<web::Data<RedisService>>();

    match user_service
        .login_fn(&form, &config, redis_service.map(|redis| redis.get_ref()))
        .await?
    {
        FormOutcome::Saved(token) => {
            let target = if is_safe_redirect(&form.next) {
                form.next.as_str()
            } else {
                DEFAULT_LOGIN_REDIRECT
            };

            let mut response = redirect(target);
            response
                .add_cookie(&session_cookie(&token, &config))
                .map_err(|e| CustomError::InternalServerError(e.to_string()))?;
            Ok(response)
        }
        FormOutcome::Invalid(errors) => {
            let form = RenderedForm::with_errors(LOGIN_FORM, form, errors);
            Ok(render("Log in failed", json!({ "form": form })))
        }
    }
}

/// GET|POST /auth/logout/
pub async fn logout_user(req: HttpRequest) -> Result<HttpResponse, CustomError> {
    let revoked = match (
        token_from_request(&req),
        req.app_data::<web::Data<RedisService>>(),
    ) {
        (Some(token), Some(redis_service)) => invalidate_session(&token, redis_service).await,
        _ => Ok(()),
    };

    logged_out(revoked)
}

/// The browser forgets its session cookie even when the server-side
/// revocation failed.
fn logged_out(revoked: Result<(), CustomError>) -> Result<HttpResponse, CustomError> {
    if let Err(e) = revoked {
        log::error!("logout could not revoke the session: {}", e);
    }

    let mut response = render("You have been logged out", json!({}));
    response
        .add_cookie(&removal_cookie())
        .map_err(|e| CustomError::InternalServerError(e.to_string()))?;
    Ok(response)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::middleware::auth::SESSION_COOKIE;

    #[test]
    fn failed_revocation_still_clears_the_cookie() {
        let resp = logged_out(Err(CustomError::InternalServerError(
            "Failed to invalidate session: connection refused".to_string(),
        )))
        .unwrap();

        assert_eq!(resp.status(), actix_web::http::StatusCode::OK);
        let cookie = resp
            .cookies()
            .find(|cookie| cookie.name() == SESSION_COOKIE)
            .expect("removal cookie");
        assert_eq!(cookie.value(), "");
        assert_eq!(
            cookie.max_age(),
            Some(actix_web::cookie::time::Duration::ZERO)
        );
    }
}
