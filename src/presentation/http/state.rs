// src/presentation/http/state.rs
use crate::application::services::ApplicationServices;
use crate::presentation::http::middleware::lifecycle::HookRegistry;
use minijinja::Environment;
use std::sync::Arc;

#[derive(Clone)]
pub struct HttpState {
    pub services: Arc<ApplicationServices>,
    pub templates: Arc<Environment<'static>>,
    pub hooks: Arc<HookRegistry>,
}
