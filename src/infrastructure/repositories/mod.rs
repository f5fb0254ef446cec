mod sqlite_article;
mod sqlite_user;

pub use sqlite_article::{SqliteArticleReadRepository, SqliteArticleWriteRepository};
pub use sqlite_user::SqliteUserRepository;

use crate::domain::errors::DomainError;

pub(crate) fn map_sqlx(err: sqlx::Error) -> DomainError {
    DomainError::Persistence(err.to_string())
}
