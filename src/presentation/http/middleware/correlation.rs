use crate::presentation::http::middleware::lifecycle::{
    Dispatch, LifecycleHook, RequestContext,
};
use axum::{
    http::{HeaderName, HeaderValue},
    response::Response,
};
use uuid::Uuid;

pub const REQUEST_ID_HEADER: HeaderName = HeaderName::from_static("x-request-id");
pub const POWERED_BY_HEADER: HeaderName = HeaderName::from_static("x-powered-by");
pub const CUSTOM_HEADER: HeaderName = HeaderName::from_static("x-custom-header");

pub const POWERED_BY_VALUE: &str = "newsdesk";
pub const CUSTOM_HEADER_VALUE: &str = "article-admin";

/// Stamps a fresh correlation id on the inbound edge, mirrors it onto the
/// response together with the static marker headers, and logs unhandled
/// failures. Runs before the plain request logger (priority 10).
#[derive(Default)]
pub struct CorrelationHook;

impl LifecycleHook for CorrelationHook {
    fn priority(&self) -> i32 {
        10
    }

    fn on_request(&self, ctx: &mut RequestContext) {
        if ctx.dispatch == Dispatch::Nested {
            return;
        }

        let id = Uuid::new_v4().to_string();
        tracing::info!(
            method = %ctx.method,
            path = %ctx.path,
            correlation_id = %id,
            "request received"
        );
        ctx.set_correlation_id(id);
    }

    fn on_response(&self, ctx: &RequestContext, response: &mut Response) {
        if ctx.dispatch == Dispatch::Nested {
            return;
        }

        let id = ctx.correlation_id_or_unknown();
        if let Ok(value) = HeaderValue::from_str(id) {
            response.headers_mut().insert(REQUEST_ID_HEADER, value);
        }
        response.headers_mut().insert(
            POWERED_BY_HEADER,
            HeaderValue::from_static(POWERED_BY_VALUE),
        );
        response.headers_mut().insert(
            CUSTOM_HEADER,
            HeaderValue::from_static(CUSTOM_HEADER_VALUE),
        );

        tracing::info!(
            status = response.status().as_u16(),
            correlation_id = %id,
            "response ready"
        );
    }

    fn on_failure(&self, ctx: &RequestContext, detail: &str) {
        if ctx.dispatch == Dispatch::Nested {
            return;
        }

        tracing::error!(
            error = %detail,
            path = %ctx.path,
            correlation_id = %ctx.correlation_id_or_unknown(),
            "unhandled failure during dispatch"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::Method;

    fn primary_ctx() -> RequestContext {
        RequestContext::new(Method::GET, "/admin/articles", Dispatch::Primary)
    }

    #[test]
    fn response_header_matches_the_stamped_id() {
        let hook = CorrelationHook;
        let mut ctx = primary_ctx();
        hook.on_request(&mut ctx);

        let stamped = ctx.correlation_id().expect("id stamped").to_owned();
        // stamped ids are uuids
        assert!(Uuid::parse_str(&stamped).is_ok());

        let mut response = Response::new(Body::empty());
        hook.on_response(&ctx, &mut response);

        assert_eq!(
            response.headers().get(REQUEST_ID_HEADER).unwrap(),
            stamped.as_str()
        );
        assert_eq!(
            response.headers().get(POWERED_BY_HEADER).unwrap(),
            POWERED_BY_VALUE
        );
        assert_eq!(
            response.headers().get(CUSTOM_HEADER).unwrap(),
            CUSTOM_HEADER_VALUE
        );
    }

    #[test]
    fn unstamped_context_falls_back_to_unknown() {
        let hook = CorrelationHook;
        let ctx = primary_ctx();

        let mut response = Response::new(Body::empty());
        hook.on_response(&ctx, &mut response);

        assert_eq!(
            response.headers().get(REQUEST_ID_HEADER).unwrap(),
            "unknown"
        );
    }

    #[test]
    fn nested_dispatch_is_ignored_entirely() {
        let hook = CorrelationHook;
        let mut ctx = RequestContext::new(Method::GET, "/admin/articles", Dispatch::Nested);
        hook.on_request(&mut ctx);
        assert!(ctx.correlation_id().is_none());

        let mut response = Response::new(Body::empty());
        hook.on_response(&ctx, &mut response);
        assert!(response.headers().is_empty());
    }
}
