use crate::{
    application::{
        dto::{ArticleDto, AuthenticatedUser},
        error::{ApplicationError, ApplicationResult},
        ports::time::Clock,
    },
    domain::{
        article::{
            Article, ArticleDescription, ArticleId, ArticleReadRepository, ArticleTitle,
            ArticleUpdate, ArticleWriteRepository, NewArticle,
        },
        policy::Permission,
    },
};
use std::sync::Arc;

/// Form-shaped input for create and update.
#[derive(Debug, Clone)]
pub struct ArticleInput {
    pub title: String,
    pub description: String,
}

pub struct ArticleService {
    write_repo: Arc<dyn ArticleWriteRepository>,
    read_repo: Arc<dyn ArticleReadRepository>,
    clock: Arc<dyn Clock>,
}

impl ArticleService {
    pub fn new(
        write_repo: Arc<dyn ArticleWriteRepository>,
        read_repo: Arc<dyn ArticleReadRepository>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            write_repo,
            read_repo,
            clock,
        }
    }

    pub async fn find_article(
        &self,
        actor: &AuthenticatedUser,
        id: i64,
    ) -> ApplicationResult<ArticleDto> {
        ensure_granted(actor, Permission::View)?;
        let id = ArticleId::new(id)?;
        let article = self.fetch_or_fail(id).await?;
        Ok(article.into())
    }

    pub async fn list_articles(
        &self,
        actor: &AuthenticatedUser,
    ) -> ApplicationResult<Vec<ArticleDto>> {
        ensure_granted(actor, Permission::View)?;
        let records = self.read_repo.list_newest_first().await?;
        Ok(records.into_iter().map(Into::into).collect())
    }

    pub async fn search_articles(
        &self,
        actor: &AuthenticatedUser,
        query: &str,
    ) -> ApplicationResult<Vec<ArticleDto>> {
        let trimmed = query.trim();
        if trimmed.is_empty() {
            return self.list_articles(actor).await;
        }

        ensure_granted(actor, Permission::View)?;
        let records = self.read_repo.search(trimmed).await?;
        Ok(records.into_iter().map(Into::into).collect())
    }

    pub async fn create_article(
        &self,
        actor: &AuthenticatedUser,
        input: ArticleInput,
    ) -> ApplicationResult<ArticleDto> {
        ensure_granted(actor, Permission::Edit)?;

        let title = ArticleTitle::new(input.title)?;
        let description = ArticleDescription::new(input.description)?;
        let now = self.clock.now();

        tracing::info!(title = %title, "creating article");

        let created = self
            .write_repo
            .insert(NewArticle {
                title,
                description,
                created_at: now,
                updated_at: now,
            })
            .await?;

        tracing::info!(article_id = %created.id, "article created");
        Ok(created.into())
    }

    pub async fn update_article(
        &self,
        actor: &AuthenticatedUser,
        id: i64,
        input: ArticleInput,
    ) -> ApplicationResult<ArticleDto> {
        ensure_granted(actor, Permission::Edit)?;

        let id = ArticleId::new(id)?;
        self.fetch_or_fail(id).await?;

        let title = ArticleTitle::new(input.title)?;
        let description = ArticleDescription::new(input.description)?;

        tracing::info!(article_id = %id, "updating article");

        let updated = self
            .write_repo
            .update(ArticleUpdate {
                id,
                title,
                description,
                updated_at: self.clock.now(),
            })
            .await?;

        tracing::info!(article_id = %id, "article updated");
        Ok(updated.into())
    }

    pub async fn delete_article(
        &self,
        actor: &AuthenticatedUser,
        id: i64,
    ) -> ApplicationResult<()> {
        ensure_granted(actor, Permission::Delete)?;

        let id = ArticleId::new(id)?;
        let article = self.fetch_or_fail(id).await?;

        tracing::info!(article_id = %id, title = %article.title, "deleting article");
        self.write_repo.delete(id).await?;
        tracing::info!(article_id = %id, "article deleted");
        Ok(())
    }

    async fn fetch_or_fail(&self, id: ArticleId) -> ApplicationResult<Article> {
        match self.read_repo.find_by_id(id).await? {
            Some(article) => Ok(article),
            None => {
                tracing::warn!(article_id = %id, "article lookup failed");
                Err(ApplicationError::not_found(format!(
                    "article {id} not found"
                )))
            }
        }
    }
}

fn ensure_granted(actor: &AuthenticatedUser, permission: Permission) -> ApplicationResult<()> {
    if actor.is_granted(permission) {
        Ok(())
    } else {
        Err(ApplicationError::forbidden(format!(
            "missing permission {permission}"
        )))
    }
}
