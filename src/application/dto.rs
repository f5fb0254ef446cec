use crate::domain::{
    article::Article,
    policy::{self, Permission},
    user::{Role, UserId},
};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::HashSet;

#[derive(Debug, Clone, Serialize)]
pub struct ArticleDto {
    pub id: i64,
    pub title: String,
    pub description: String,
    #[serde(with = "serde_time")]
    pub created_at: DateTime<Utc>,
    #[serde(with = "serde_time")]
    pub updated_at: DateTime<Utc>,
}

impl From<Article> for ArticleDto {
    fn from(article: Article) -> Self {
        Self {
            id: article.id.into(),
            title: article.title.to_string(),
            description: article.description.to_string(),
            created_at: article.created_at,
            updated_at: article.updated_at,
        }
    }
}

/// The actor attached to a request after session authentication.
#[derive(Debug, Clone)]
pub struct AuthenticatedUser {
    pub id: UserId,
    pub username: String,
    pub roles: HashSet<Role>,
    pub issued_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

impl AuthenticatedUser {
    pub fn is_granted(&self, permission: Permission) -> bool {
        policy::is_granted(permission, &self.roles)
    }
}

/// Input to session issuance.
#[derive(Debug, Clone)]
pub struct SessionSubject {
    pub user_id: UserId,
    pub username: String,
    pub roles: HashSet<Role>,
}

#[derive(Debug, Clone)]
pub struct SessionTokenDto {
    pub token: String,
    pub expires_at: DateTime<Utc>,
}

pub mod serde_time {
    use chrono::{DateTime, Utc};
    use serde::{self, Serializer};

    pub fn serialize<S>(value: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&value.to_rfc3339())
    }
}
