// src/infrastructure/repositories/sqlite_article.rs
use super::map_sqlx;
use crate::domain::article::{
    Article, ArticleDescription, ArticleId, ArticleReadRepository, ArticleTitle, ArticleUpdate,
    ArticleWriteRepository, NewArticle,
};
use crate::domain::errors::{DomainError, DomainResult};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, QueryBuilder, Sqlite, SqlitePool};
use std::sync::Arc;

#[derive(Clone)]
pub struct SqliteArticleWriteRepository {
    pool: Arc<SqlitePool>,
}

impl SqliteArticleWriteRepository {
    pub fn new(pool: Arc<SqlitePool>) -> Self {
        Self { pool }
    }
}

#[derive(Clone)]
pub struct SqliteArticleReadRepository {
    pool: Arc<SqlitePool>,
}

impl SqliteArticleReadRepository {
    pub fn new(pool: Arc<SqlitePool>) -> Self {
        Self { pool }
    }
}

#[derive(Debug, FromRow)]
struct ArticleRow {
    id: i64,
    title: String,
    description: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<ArticleRow> for Article {
    type Error = DomainError;

    fn try_from(row: ArticleRow) -> Result<Self, Self::Error> {
        Ok(Article {
            id: ArticleId::new(row.id)?,
            title: ArticleTitle::new(row.title)?,
            description: ArticleDescription::new(row.description)?,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

#[async_trait]
impl ArticleWriteRepository for SqliteArticleWriteRepository {
    async fn insert(&self, article: NewArticle) -> DomainResult<Article> {
        let NewArticle {
            title,
            description,
            created_at,
            updated_at,
        } = article;

        let row = sqlx::query_as::<_, ArticleRow>(
            "INSERT INTO articles (title, description, created_at, updated_at) \
             VALUES (?, ?, ?, ?) \
             RETURNING id, title, description, created_at, updated_at",
        )
        .bind(title.as_str())
        .bind(description.as_str())
        .bind(created_at)
        .bind(updated_at)
        .fetch_one(&*self.pool)
        .await
        .map_err(map_sqlx)?;

        Article::try_from(row)
    }

    async fn update(&self, update: ArticleUpdate) -> DomainResult<Article> {
        let ArticleUpdate {
            id,
            title,
            description,
            updated_at,
        } = update;

        let row = sqlx::query_as::<_, ArticleRow>(
            "UPDATE articles SET title = ?, description = ?, updated_at = ? \
             WHERE id = ? \
             RETURNING id, title, description, created_at, updated_at",
        )
        .bind(title.as_str())
        .bind(description.as_str())
        .bind(updated_at)
        .bind(i64::from(id))
        .fetch_optional(&*self.pool)
        .await
        .map_err(map_sqlx)?;

        let row = row.ok_or_else(|| DomainError::NotFound("article not found".into()))?;
        Article::try_from(row)
    }

    async fn delete(&self, id: ArticleId) -> DomainResult<()> {
        let result = sqlx::query("DELETE FROM articles WHERE id = ?")
            .bind(i64::from(id))
            .execute(&*self.pool)
            .await
            .map_err(map_sqlx)?;
        if result.rows_affected() == 0 {
            return Err(DomainError::NotFound("article not found".into()));
        }
        Ok(())
    }
}

#[async_trait]
impl ArticleReadRepository for SqliteArticleReadRepository {
    async fn find_by_id(&self, id: ArticleId) -> DomainResult<Option<Article>> {
        let row = sqlx::query_as::<_, ArticleRow>(
            "SELECT id, title, description, created_at, updated_at FROM articles WHERE id = ?",
        )
        .bind(i64::from(id))
        .fetch_optional(&*self.pool)
        .await
        .map_err(map_sqlx)?;

        row.map(Article::try_from).transpose()
    }

    async fn list_newest_first(&self) -> DomainResult<Vec<Article>> {
        let rows = sqlx::query_as::<_, ArticleRow>(
            "SELECT id, title, description, created_at, updated_at FROM articles \
             ORDER BY created_at DESC, id DESC",
        )
        .fetch_all(&*self.pool)
        .await
        .map_err(map_sqlx)?;

        rows.into_iter().map(Article::try_from).collect()
    }

    async fn search(&self, query: &str) -> DomainResult<Vec<Article>> {
        // SQLite LIKE is case-insensitive for ASCII, which is the documented
        // match semantics for this query.
        let pattern = format!("%{}%", query);

        let mut builder: QueryBuilder<Sqlite> = QueryBuilder::new(
            "SELECT id, title, description, created_at, updated_at FROM articles WHERE (title LIKE ",
        );
        builder.push_bind(pattern.clone());
        builder.push(" OR description LIKE ");
        builder.push_bind(pattern);
        builder.push(") ORDER BY created_at DESC, id DESC");

        let rows = builder
            .build_query_as::<ArticleRow>()
            .fetch_all(&*self.pool)
            .await
            .map_err(map_sqlx)?;

        rows.into_iter().map(Article::try_from).collect()
    }
}
