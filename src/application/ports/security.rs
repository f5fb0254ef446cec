// src/application/ports/security.rs
use crate::application::{
    ApplicationResult,
    dto::{AuthenticatedUser, SessionSubject, SessionTokenDto},
};
use async_trait::async_trait;

#[async_trait]
pub trait PasswordHasher: Send + Sync {
    async fn hash(&self, password: &str) -> ApplicationResult<String>;
    async fn verify(&self, password: &str, expected_hash: &str) -> ApplicationResult<()>;
}

/// Issues and validates the signed session cookie value.
pub trait SessionManager: Send + Sync {
    fn issue(&self, subject: SessionSubject) -> ApplicationResult<SessionTokenDto>;
    fn authenticate(&self, token: &str) -> ApplicationResult<AuthenticatedUser>;
}

/// Anti-forgery tokens scoped to one intent string, e.g. `delete-article-7:2`.
pub trait CsrfProtection: Send + Sync {
    fn issue(&self, intent: &str) -> String;
    fn verify(&self, intent: &str, token: &str) -> bool;
}
