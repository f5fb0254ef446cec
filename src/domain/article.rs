use crate::domain::errors::{DomainError, DomainResult};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ArticleId(pub i64);

impl ArticleId {
    pub fn new(id: i64) -> DomainResult<Self> {
        if id <= 0 {
            Err(DomainError::Validation(
                "article id must be positive".into(),
            ))
        } else {
            Ok(Self(id))
        }
    }
}

impl From<ArticleId> for i64 {
    fn from(value: ArticleId) -> Self {
        value.0
    }
}

impl fmt::Display for ArticleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

pub const TITLE_MIN_CHARS: usize = 3;
pub const TITLE_MAX_CHARS: usize = 255;
pub const DESCRIPTION_MIN_CHARS: usize = 10;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArticleTitle(String);

impl ArticleTitle {
    pub fn new(value: impl Into<String>) -> DomainResult<Self> {
        let value = value.into();
        if value.trim().is_empty() {
            return Err(DomainError::Validation("title cannot be empty".into()));
        }
        let chars = value.chars().count();
        if chars < TITLE_MIN_CHARS {
            return Err(DomainError::Validation(format!(
                "title must be at least {TITLE_MIN_CHARS} characters long"
            )));
        }
        if chars > TITLE_MAX_CHARS {
            return Err(DomainError::Validation(format!(
                "title must be at most {TITLE_MAX_CHARS} characters long"
            )));
        }
        Ok(Self(value))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ArticleTitle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<ArticleTitle> for String {
    fn from(value: ArticleTitle) -> Self {
        value.0
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArticleDescription(String);

impl ArticleDescription {
    pub fn new(value: impl Into<String>) -> DomainResult<Self> {
        let value = value.into();
        if value.chars().count() < DESCRIPTION_MIN_CHARS {
            return Err(DomainError::Validation(format!(
                "description must be at least {DESCRIPTION_MIN_CHARS} characters long"
            )));
        }
        Ok(Self(value))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ArticleDescription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<ArticleDescription> for String {
    fn from(value: ArticleDescription) -> Self {
        value.0
    }
}

/// A persisted article. `created_at` is assigned once at first persist;
/// `updated_at` moves forward on every modification and never precedes
/// `created_at`.
#[derive(Debug, Clone)]
pub struct Article {
    pub id: ArticleId,
    pub title: ArticleTitle,
    pub description: ArticleDescription,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewArticle {
    pub title: ArticleTitle,
    pub description: ArticleDescription,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct ArticleUpdate {
    pub id: ArticleId,
    pub title: ArticleTitle,
    pub description: ArticleDescription,
    pub updated_at: DateTime<Utc>,
}

#[async_trait]
pub trait ArticleWriteRepository: Send + Sync {
    async fn insert(&self, article: NewArticle) -> DomainResult<Article>;
    async fn update(&self, update: ArticleUpdate) -> DomainResult<Article>;
    async fn delete(&self, id: ArticleId) -> DomainResult<()>;
}

#[async_trait]
pub trait ArticleReadRepository: Send + Sync {
    async fn find_by_id(&self, id: ArticleId) -> DomainResult<Option<Article>>;
    async fn list_newest_first(&self) -> DomainResult<Vec<Article>>;
    async fn search(&self, query: &str) -> DomainResult<Vec<Article>>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn article_id_rejects_non_positive() {
        assert!(ArticleId::new(0).is_err());
        assert!(ArticleId::new(-3).is_err());
        assert!(ArticleId::new(1).is_ok());
    }

    #[test]
    fn title_enforces_length_bounds() {
        assert!(ArticleTitle::new("ab").is_err());
        assert!(ArticleTitle::new("abc").is_ok());
        assert!(ArticleTitle::new("a".repeat(255)).is_ok());
        assert!(ArticleTitle::new("a".repeat(256)).is_err());
    }

    #[test]
    fn title_rejects_blank_input() {
        assert!(ArticleTitle::new("   ").is_err());
    }

    #[test]
    fn description_requires_minimum_length() {
        assert!(ArticleDescription::new("too short").is_err());
        assert!(ArticleDescription::new("long enough description").is_ok());
    }

    #[test]
    fn title_length_counts_characters_not_bytes() {
        // three multibyte characters satisfy the minimum
        assert!(ArticleTitle::new("äöü").is_ok());
    }
}
