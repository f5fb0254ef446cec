// src/application/services/mod.rs
pub mod articles;
pub mod auth;

use crate::application::ports::{
    security::{CsrfProtection, PasswordHasher, SessionManager},
    time::Clock,
};
use crate::domain::{
    article::{ArticleReadRepository, ArticleWriteRepository},
    user::UserRepository,
};
use self::articles::ArticleService;
use self::auth::AuthService;
use std::sync::Arc;

pub struct ApplicationServices {
    pub articles: Arc<ArticleService>,
    pub auth: Arc<AuthService>,
    session_manager: Arc<dyn SessionManager>,
    csrf: Arc<dyn CsrfProtection>,
    clock: Arc<dyn Clock>,
}

impl ApplicationServices {
    pub fn new(
        user_repo: Arc<dyn UserRepository>,
        article_write_repo: Arc<dyn ArticleWriteRepository>,
        article_read_repo: Arc<dyn ArticleReadRepository>,
        password_hasher: Arc<dyn PasswordHasher>,
        session_manager: Arc<dyn SessionManager>,
        csrf: Arc<dyn CsrfProtection>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        let articles = Arc::new(ArticleService::new(
            article_write_repo,
            article_read_repo,
            Arc::clone(&clock),
        ));

        let auth = Arc::new(AuthService::new(
            user_repo,
            password_hasher,
            Arc::clone(&session_manager),
            Arc::clone(&clock),
        ));

        Self {
            articles,
            auth,
            session_manager,
            csrf,
            clock,
        }
    }

    pub fn session_manager(&self) -> Arc<dyn SessionManager> {
        Arc::clone(&self.session_manager)
    }

    pub fn csrf(&self) -> Arc<dyn CsrfProtection> {
        Arc::clone(&self.csrf)
    }

    pub fn clock(&self) -> Arc<dyn Clock> {
        Arc::clone(&self.clock)
    }
}
