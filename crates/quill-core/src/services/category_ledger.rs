//! Category ownership and the published-post count.

use std::sync::Arc;

use uuid::Uuid;

use crate::domain::{Category, CategoryChanges, NewCategory};
use crate::error::{DomainError, RepoError};
use crate::ports::{BaseRepository, CategoryRepository, PostRepository};

/// Owns categories and keeps `post_count` equal to the number of published
/// posts that reference each one.
#[derive(Clone)]
pub struct CategoryLedger {
    categories: Arc<dyn CategoryRepository>,
    posts: Arc<dyn PostRepository>,
}

impl CategoryLedger {
    pub fn new(categories: Arc<dyn CategoryRepository>, posts: Arc<dyn PostRepository>) -> Self {
        Self { categories, posts }
    }

    pub async fn list(&self) -> Result<Vec<Category>, DomainError> {
        Ok(self.categories.find_all().await?)
    }

    pub async fn get(&self, id: Uuid) -> Result<Category, DomainError> {
        self.categories
            .find_by_id(id)
            .await?
            .ok_or(DomainError::not_found("Category", id))
    }

    pub async fn create(&self, input: NewCategory) -> Result<Category, DomainError> {
        let category = Category::new(input)?;
        let name = category.name.clone();

        let saved = self
            .categories
            .insert(category)
            .await
            .map_err(|e| name_conflict(e, &name))?;

        tracing::info!(category_id = %saved.id, slug = %saved.slug, "Category created");
        Ok(saved)
    }

    pub async fn update(&self, id: Uuid, changes: CategoryChanges) -> Result<Category, DomainError> {
        let mut category = self.get(id).await?;
        category.apply(changes)?;
        let name = category.name.clone();

        let saved = self.categories.update(category).await.map_err(|e| match e {
            RepoError::NotFound => DomainError::not_found("Category", id),
            other => name_conflict(other, &name),
        })?;

        tracing::info!(category_id = %id, slug = %saved.slug, "Category updated");
        Ok(saved)
    }

    /// Remove an empty category. The count is recomputed first so a stale
    /// value can neither block nor allow the deletion.
    pub async fn delete(&self, id: Uuid) -> Result<(), DomainError> {
        let post_count = self
            .recompute_count(id)
            .await?
            .ok_or(DomainError::not_found("Category", id))?;

        if post_count > 0 {
            return Err(DomainError::HasPosts { id, post_count });
        }

        self.categories.delete(id).await.map_err(|e| match e {
            RepoError::NotFound => DomainError::not_found("Category", id),
            other => other.into(),
        })?;

        tracing::info!(category_id = %id, "Category deleted");
        Ok(())
    }

    /// Count the category's published posts and store the result.
    ///
    /// A full recount, so calling it any number of times, in any order,
    /// converges on the true value. Returns `None` when the category no
    /// longer exists.
    pub async fn recompute_count(&self, id: Uuid) -> Result<Option<u64>, DomainError> {
        let count = self.posts.count_published_in(id).await?;

        match self.categories.set_post_count(id, count).await {
            Ok(()) => {
                tracing::debug!(category_id = %id, post_count = count, "Category count recomputed");
                Ok(Some(count))
            }
            Err(RepoError::NotFound) => {
                tracing::warn!(category_id = %id, "Skipping recount of missing category");
                Ok(None)
            }
            Err(e) => Err(e.into()),
        }
    }
}

fn name_conflict(err: RepoError, name: &str) -> DomainError {
    match err {
        RepoError::Constraint(_) => DomainError::DuplicateName(name.to_string()),
        other => other.into(),
    }
}
