use crate::presentation::http::middleware::lifecycle::{
    Dispatch, LifecycleHook, RequestContext,
};

/// Plain access logger on the inbound edge. Independent of the correlation
/// hook and unaware of its id.
#[derive(Default)]
pub struct RequestLogHook;

impl LifecycleHook for RequestLogHook {
    fn on_request(&self, ctx: &mut RequestContext) {
        if ctx.dispatch == Dispatch::Nested {
            return;
        }

        tracing::info!(
            method = %ctx.method,
            path = %ctx.path,
            client = ctx.client_addr.as_deref().unwrap_or("unknown"),
            "incoming request"
        );
    }
}
