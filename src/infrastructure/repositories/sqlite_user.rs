use super::map_sqlx;
use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::user::{NewUser, PasswordHash, Role, User, UserId, UserRepository, Username};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, SqlitePool};
use std::sync::Arc;

#[derive(Clone)]
pub struct SqliteUserRepository {
    pool: Arc<SqlitePool>,
}

impl SqliteUserRepository {
    pub fn new(pool: Arc<SqlitePool>) -> Self {
        Self { pool }
    }
}

#[derive(Debug, FromRow)]
struct UserRow {
    id: i64,
    username: String,
    password_hash: String,
    roles: String,
    is_active: i64,
    created_at: DateTime<Utc>,
}

impl TryFrom<UserRow> for User {
    type Error = DomainError;

    fn try_from(row: UserRow) -> Result<Self, Self::Error> {
        Ok(User {
            id: UserId::new(row.id)?,
            username: Username::new(row.username)?,
            password_hash: PasswordHash::new(row.password_hash)?,
            roles: Role::parse_set(&row.roles)?,
            is_active: row.is_active != 0,
            created_at: row.created_at,
        })
    }
}

#[async_trait]
impl UserRepository for SqliteUserRepository {
    async fn count(&self) -> DomainResult<u64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(1) FROM users")
            .fetch_one(&*self.pool)
            .await
            .map_err(map_sqlx)?;
        Ok(count as u64)
    }

    async fn insert(&self, new_user: NewUser) -> DomainResult<User> {
        let NewUser {
            username,
            password_hash,
            roles,
            is_active,
            created_at,
        } = new_user;

        let row = sqlx::query_as::<_, UserRow>(
            "INSERT INTO users (username, password_hash, roles, is_active, created_at) \
             VALUES (?, ?, ?, ?, ?) \
             RETURNING id, username, password_hash, roles, is_active, created_at",
        )
        .bind(username.as_str())
        .bind(password_hash.as_str())
        .bind(Role::encode_set(&roles))
        .bind(if is_active { 1 } else { 0 })
        .bind(created_at)
        .fetch_one(&*self.pool)
        .await
        .map_err(map_sqlx)?;

        User::try_from(row)
    }

    async fn find_by_username(&self, username: &Username) -> DomainResult<Option<User>> {
        let row = sqlx::query_as::<_, UserRow>(
            "SELECT id, username, password_hash, roles, is_active, created_at \
             FROM users WHERE username = ?",
        )
        .bind(username.as_str())
        .fetch_optional(&*self.pool)
        .await
        .map_err(map_sqlx)?;

        row.map(User::try_from).transpose()
    }
}
