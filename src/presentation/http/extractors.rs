// src/presentation/http/extractors.rs
use crate::{
    application::{dto::AuthenticatedUser, error::ApplicationError},
    presentation::http::{error::HttpError, state::HttpState},
};
use axum::{
    Extension,
    extract::FromRequestParts,
    http::{HeaderValue, header::SET_COOKIE, request::Parts},
    response::{IntoResponse, Redirect, Response},
};
use headers::{Cookie, HeaderMapExt};

pub const SESSION_COOKIE: &str = "newsdesk_session";
pub const LOGIN_PATH: &str = "/admin/login";

/// Session actor for admin pages. Requests without a valid session are
/// redirected to the login form (with the stale cookie cleared).
#[derive(Debug, Clone)]
pub struct Authenticated(pub AuthenticatedUser);

pub enum AuthRejection {
    LoginRedirect,
    Internal(HttpError),
}

impl IntoResponse for AuthRejection {
    fn into_response(self) -> Response {
        match self {
            AuthRejection::LoginRedirect => {
                let mut response = Redirect::to(LOGIN_PATH).into_response();
                response
                    .headers_mut()
                    .append(SET_COOKIE, expired_session_cookie());
                response
            }
            AuthRejection::Internal(err) => err.into_response(),
        }
    }
}

impl<S> FromRequestParts<S> for Authenticated
where
    S: Send + Sync,
{
    type Rejection = AuthRejection;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Extension(app_state) = Extension::<HttpState>::from_request_parts(parts, state)
            .await
            .map_err(|_| {
                AuthRejection::Internal(HttpError::from_error(ApplicationError::infrastructure(
                    "application state missing",
                )))
            })?;

        let token = parts
            .headers
            .typed_get::<Cookie>()
            .and_then(|cookie| cookie.get(SESSION_COOKIE).map(str::to_owned))
            .ok_or(AuthRejection::LoginRedirect)?;

        let manager = app_state.services.session_manager();
        let user = manager
            .authenticate(&token)
            .map_err(|_| AuthRejection::LoginRedirect)?;

        Ok(Self(user))
    }
}

pub fn session_cookie(token: &str, max_age_secs: i64) -> Option<HeaderValue> {
    HeaderValue::from_str(&format!(
        "{SESSION_COOKIE}={token}; Path=/; HttpOnly; SameSite=Lax; Max-Age={max_age_secs}"
    ))
    .ok()
}

pub fn expired_session_cookie() -> HeaderValue {
    HeaderValue::from_static("newsdesk_session=; Path=/; HttpOnly; SameSite=Lax; Max-Age=0")
}
