use axum::{
    extract::FromRequestParts,
    http::{HeaderValue, header::SET_COOKIE, request::Parts},
    response::{IntoResponse, Redirect, Response},
};
use base64::{Engine as _, engine::general_purpose::URL_SAFE_NO_PAD};
use headers::{Cookie, HeaderMapExt};
use serde::{Deserialize, Serialize};
use std::convert::Infallible;

pub const FLASH_COOKIE: &str = "newsdesk_flash";

/// One-shot notice carried across a redirect in a cookie: written on the
/// redirect, rendered and cleared on the next page.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Flash {
    pub kind: FlashKind,
    pub message: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FlashKind {
    Success,
    Error,
}

impl Flash {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            kind: FlashKind::Success,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            kind: FlashKind::Error,
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct IncomingFlash(pub Option<Flash>);

impl<S> FromRequestParts<S> for IncomingFlash
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let flash = parts
            .headers
            .typed_get::<Cookie>()
            .and_then(|cookie| cookie.get(FLASH_COOKIE).map(str::to_owned))
            .and_then(|value| URL_SAFE_NO_PAD.decode(value).ok())
            .and_then(|bytes| serde_json::from_slice(&bytes).ok());
        Ok(Self(flash))
    }
}

pub fn redirect_with_flash(location: &str, flash: Flash) -> Response {
    let mut response = Redirect::to(location).into_response();
    if let Some(value) = flash_cookie_value(&flash) {
        response.headers_mut().append(SET_COOKIE, value);
    }
    response
}

pub fn clear_flash(response: &mut Response) {
    response.headers_mut().append(
        SET_COOKIE,
        HeaderValue::from_static("newsdesk_flash=; Path=/; HttpOnly; SameSite=Lax; Max-Age=0"),
    );
}

fn flash_cookie_value(flash: &Flash) -> Option<HeaderValue> {
    let bytes = serde_json::to_vec(flash).ok()?;
    let encoded = URL_SAFE_NO_PAD.encode(bytes);
    HeaderValue::from_str(&format!(
        "{FLASH_COOKIE}={encoded}; Path=/; HttpOnly; SameSite=Lax"
    ))
    .ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::header::COOKIE;
    use axum::http::{HeaderMap, Request};

    async fn extract(headers: HeaderMap) -> IncomingFlash {
        let mut request = Request::builder().uri("/admin/articles");
        for (name, value) in headers.iter() {
            request = request.header(name, value);
        }
        let (mut parts, ()) = request.body(()).unwrap().into_parts();
        IncomingFlash::from_request_parts(&mut parts, &()).await.unwrap()
    }

    #[tokio::test]
    async fn flash_roundtrips_through_the_cookie() {
        let flash = Flash::success("article created");
        let value = flash_cookie_value(&flash).unwrap();
        let cookie_pair = value.to_str().unwrap().split(';').next().unwrap().to_owned();

        let mut headers = HeaderMap::new();
        headers.insert(COOKIE, HeaderValue::from_str(&cookie_pair).unwrap());

        let IncomingFlash(read) = extract(headers).await;
        let read = read.unwrap();
        assert_eq!(read.kind, FlashKind::Success);
        assert_eq!(read.message, "article created");
    }

    #[tokio::test]
    async fn missing_or_garbled_cookie_reads_as_none() {
        let IncomingFlash(read) = extract(HeaderMap::new()).await;
        assert!(read.is_none());

        let mut headers = HeaderMap::new();
        headers.insert(
            COOKIE,
            HeaderValue::from_static("newsdesk_flash=!!definitely-not-base64!!"),
        );
        let IncomingFlash(read) = extract(headers).await;
        assert!(read.is_none());
    }
}
