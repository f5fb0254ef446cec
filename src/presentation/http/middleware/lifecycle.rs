// src/presentation/http/middleware/lifecycle.rs
use crate::presentation::http::{error::FailureDetail, state::HttpState};
use axum::{
    Extension,
    extract::Request,
    http::Method,
    middleware::Next,
    response::Response,
};

/// Sentinel correlation id for responses whose request edge never stamped
/// one (e.g. a nested dispatch).
pub const UNKNOWN_CORRELATION_ID: &str = "unknown";

/// Whether a request is the outermost one of a dispatch cycle. Hooks only
/// act on primary requests; a nested re-dispatch through the same stack
/// carries the correlation extension already and is left alone.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dispatch {
    Primary,
    Nested,
}

/// Correlation id attached to the request extensions on the inbound edge.
#[derive(Debug, Clone)]
pub struct CorrelationId(pub String);

/// Per-request view handed to hooks on every edge.
#[derive(Debug)]
pub struct RequestContext {
    pub method: Method,
    pub path: String,
    pub client_addr: Option<String>,
    pub dispatch: Dispatch,
    correlation_id: Option<String>,
}

impl RequestContext {
    pub fn new(method: Method, path: impl Into<String>, dispatch: Dispatch) -> Self {
        Self {
            method,
            path: path.into(),
            client_addr: None,
            dispatch,
            correlation_id: None,
        }
    }

    pub fn from_request(req: &Request, dispatch: Dispatch) -> Self {
        let client_addr = req
            .headers()
            .get("x-forwarded-for")
            .and_then(|value| value.to_str().ok())
            .map(str::to_owned);

        let mut ctx = Self::new(req.method().clone(), req.uri().path(), dispatch);
        ctx.client_addr = client_addr;
        ctx
    }

    pub fn set_correlation_id(&mut self, id: String) {
        self.correlation_id = Some(id);
    }

    pub fn correlation_id(&self) -> Option<&str> {
        self.correlation_id.as_deref()
    }

    pub fn correlation_id_or_unknown(&self) -> &str {
        self.correlation_id
            .as_deref()
            .unwrap_or(UNKNOWN_CORRELATION_ID)
    }
}

/// One observer over the request/response cycle. Hooks must ignore
/// `Dispatch::Nested` contexts entirely.
pub trait LifecycleHook: Send + Sync {
    fn priority(&self) -> i32 {
        0
    }

    fn on_request(&self, _ctx: &mut RequestContext) {}

    fn on_response(&self, _ctx: &RequestContext, _response: &mut Response) {}

    fn on_failure(&self, _ctx: &RequestContext, _detail: &str) {}
}

/// Registration table sorted by priority. The inbound edge runs in
/// descending priority order; the outbound and failure edges run in the
/// reverse order, so higher-priority hooks wrap the rest.
#[derive(Default)]
pub struct HookRegistry {
    hooks: Vec<Box<dyn LifecycleHook>>,
}

impl HookRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, hook: Box<dyn LifecycleHook>) {
        self.hooks.push(hook);
        // stable sort keeps registration order between equal priorities
        self.hooks.sort_by_key(|hook| std::cmp::Reverse(hook.priority()));
    }

    pub fn request(&self, ctx: &mut RequestContext) {
        for hook in &self.hooks {
            hook.on_request(ctx);
        }
    }

    pub fn response(&self, ctx: &RequestContext, response: &mut Response) {
        for hook in self.hooks.iter().rev() {
            hook.on_response(ctx, response);
        }
    }

    pub fn failure(&self, ctx: &RequestContext, detail: &str) {
        for hook in self.hooks.iter().rev() {
            hook.on_failure(ctx, detail);
        }
    }
}

/// Single middleware driving the whole registry: inbound hooks, dispatch,
/// failure edge (when the response carries a stored detail), outbound hooks.
pub async fn lifecycle_middleware(
    Extension(state): Extension<HttpState>,
    mut req: Request,
    next: Next,
) -> Response {
    let existing = req.extensions().get::<CorrelationId>().cloned();
    let dispatch = if existing.is_some() {
        Dispatch::Nested
    } else {
        Dispatch::Primary
    };

    let mut ctx = RequestContext::from_request(&req, dispatch);
    if let Some(CorrelationId(id)) = existing {
        ctx.set_correlation_id(id);
    }
    state.hooks.request(&mut ctx);

    if let Some(id) = ctx.correlation_id() {
        req.extensions_mut().insert(CorrelationId(id.to_owned()));
    }

    let mut response = next.run(req).await;

    if let Some(detail) = response.extensions().get::<FailureDetail>().cloned() {
        state.hooks.failure(&ctx, &detail.0);
    }

    state.hooks.response(&ctx, &mut response);
    response
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use std::sync::{Arc, Mutex};

    struct RecordingHook {
        name: &'static str,
        priority: i32,
        log: Arc<Mutex<Vec<String>>>,
    }

    impl LifecycleHook for RecordingHook {
        fn priority(&self) -> i32 {
            self.priority
        }

        fn on_request(&self, _ctx: &mut RequestContext) {
            self.log.lock().unwrap().push(format!("req:{}", self.name));
        }

        fn on_response(&self, _ctx: &RequestContext, _response: &mut Response) {
            self.log.lock().unwrap().push(format!("resp:{}", self.name));
        }
    }

    fn ctx(dispatch: Dispatch) -> RequestContext {
        RequestContext::new(Method::GET, "/admin/articles", dispatch)
    }

    #[test]
    fn inbound_edge_runs_in_descending_priority_order() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let mut registry = HookRegistry::new();
        registry.register(Box::new(RecordingHook {
            name: "low",
            priority: 0,
            log: Arc::clone(&log),
        }));
        registry.register(Box::new(RecordingHook {
            name: "high",
            priority: 10,
            log: Arc::clone(&log),
        }));

        let mut context = ctx(Dispatch::Primary);
        registry.request(&mut context);

        let mut response = Response::new(Body::empty());
        registry.response(&context, &mut response);

        assert_eq!(
            *log.lock().unwrap(),
            vec!["req:high", "req:low", "resp:low", "resp:high"]
        );
    }

    #[test]
    fn correlation_id_falls_back_to_unknown() {
        let context = ctx(Dispatch::Primary);
        assert_eq!(context.correlation_id_or_unknown(), UNKNOWN_CORRELATION_ID);
    }
}
