use crate::application::services::auth::LoginCommand;
use crate::presentation::http::{
    extractors::{LOGIN_PATH, expired_session_cookie, session_cookie},
    flash::{Flash, IncomingFlash, clear_flash, redirect_with_flash},
    state::HttpState,
    templates::render_page,
};
use axum::{
    Extension, Form,
    http::header::SET_COOKIE,
    response::{IntoResponse, Redirect, Response},
};
use minijinja::context;
use serde::Deserialize;

const ARTICLES_PATH: &str = "/admin/articles";

#[derive(Debug, Deserialize)]
pub struct LoginForm {
    pub username: String,
    pub password: String,
}

pub async fn login_form(
    Extension(state): Extension<HttpState>,
    IncomingFlash(flash): IncomingFlash,
) -> Response {
    let had_flash = flash.is_some();
    match render_page(&state.templates, "login.html", context! { flash => flash }) {
        Ok(page) => {
            let mut response = page.into_response();
            if had_flash {
                clear_flash(&mut response);
            }
            response
        }
        Err(err) => err.into_response(),
    }
}

pub async fn login(
    Extension(state): Extension<HttpState>,
    Form(form): Form<LoginForm>,
) -> Response {
    let command = LoginCommand {
        username: form.username,
        password: form.password,
    };

    match state.services.auth.login(command).await {
        Ok(session) => {
            let max_age = session
                .expires_at
                .signed_duration_since(state.services.clock().now())
                .num_seconds()
                .max(0);

            let mut response = Redirect::to(ARTICLES_PATH).into_response();
            if let Some(cookie) = session_cookie(&session.token, max_age) {
                response.headers_mut().append(SET_COOKIE, cookie);
            }
            response
        }
        Err(err) => {
            tracing::warn!(error = %err, "login failed");
            redirect_with_flash(LOGIN_PATH, Flash::error("Invalid username or password."))
        }
    }
}

pub async fn logout() -> Response {
    let mut response = redirect_with_flash(LOGIN_PATH, Flash::success("You have been logged out."));
    response
        .headers_mut()
        .append(SET_COOKIE, expired_session_cookie());
    response
}
