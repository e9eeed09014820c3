//! Post lifecycle: writes, reads, likes, comments and listings.

use std::sync::Arc;

use uuid::Uuid;

use super::ConsistencyCoordinator;
use crate::domain::{Comment, LikeOutcome, NewPost, Post, PostChanges, PostPage, PostQuery};
use crate::error::{DomainError, RepoError};
use crate::policy::{Actor, can_modify_post};
use crate::ports::{BaseRepository, CategoryRepository, PostRepository};

#[derive(Clone)]
pub struct PostRegistry {
    posts: Arc<dyn PostRepository>,
    categories: Arc<dyn CategoryRepository>,
    coordinator: ConsistencyCoordinator,
}

impl PostRegistry {
    pub fn new(
        posts: Arc<dyn PostRepository>,
        categories: Arc<dyn CategoryRepository>,
        coordinator: ConsistencyCoordinator,
    ) -> Self {
        Self {
            posts,
            categories,
            coordinator,
        }
    }

    pub async fn list(&self, query: &PostQuery) -> Result<PostPage, DomainError> {
        Ok(self.posts.find_page(query).await?)
    }

    /// Fetch a post and count the view.
    pub async fn get(&self, id: Uuid) -> Result<Post, DomainError> {
        self.posts
            .increment_views(id)
            .await
            .map_err(|e| vanished(e, id))
    }

    pub async fn create(&self, author_id: Uuid, input: NewPost) -> Result<Post, DomainError> {
        let post = Post::new(author_id, input)?;
        self.ensure_category(post.category_id).await?;

        let title = post.title.clone();
        let saved = self
            .posts
            .insert(post)
            .await
            .map_err(|e| title_conflict(e, &title))?;

        tracing::info!(
            post_id = %saved.id,
            category_id = %saved.category_id,
            status = %saved.status,
            "Post created"
        );

        self.coordinator.sync_category(saved.category_id).await?;
        Ok(saved)
    }

    pub async fn update(
        &self,
        id: Uuid,
        actor: &Actor,
        changes: PostChanges,
    ) -> Result<Post, DomainError> {
        let mut post = self.find(id).await?;
        if !can_modify_post(actor, &post) {
            return Err(DomainError::Forbidden);
        }

        if let Some(category_id) = changes.category_id {
            if category_id != post.category_id {
                self.ensure_category(category_id).await?;
            }
        }

        let applied = post.apply(changes)?;
        let title = post.title.clone();
        let saved = self.posts.update(post).await.map_err(|e| match e {
            RepoError::NotFound => DomainError::not_found("Post", id),
            other => title_conflict(other, &title),
        })?;

        tracing::info!(post_id = %id, actor_id = %actor.id, status = %saved.status, "Post updated");

        self.coordinator
            .sync_categories(&applied.affected_categories(&saved))
            .await?;
        Ok(saved)
    }

    pub async fn delete(&self, id: Uuid, actor: &Actor) -> Result<(), DomainError> {
        let post = self.find(id).await?;
        if !can_modify_post(actor, &post) {
            return Err(DomainError::Forbidden);
        }

        self.posts.delete(id).await.map_err(|e| match e {
            RepoError::NotFound => DomainError::not_found("Post", id),
            other => other.into(),
        })?;

        tracing::info!(post_id = %id, actor_id = %actor.id, "Post deleted");

        self.coordinator.sync_category(post.category_id).await
    }

    /// Like the post if the user has not yet, unlike it otherwise.
    pub async fn toggle_like(&self, id: Uuid, user_id: Uuid) -> Result<LikeOutcome, DomainError> {
        let outcome = self
            .posts
            .toggle_like(id, user_id)
            .await
            .map_err(|e| vanished(e, id))?;

        tracing::debug!(
            post_id = %id,
            user_id = %user_id,
            is_liked = outcome.is_liked,
            "Like toggled"
        );
        Ok(outcome)
    }

    pub async fn add_comment(
        &self,
        id: Uuid,
        author_id: Uuid,
        content: &str,
    ) -> Result<Post, DomainError> {
        let comment = Comment::new(author_id, content)?;
        let comment_id = comment.id;

        let saved = self
            .posts
            .push_comment(id, comment)
            .await
            .map_err(|e| vanished(e, id))?;

        tracing::info!(post_id = %id, comment_id = %comment_id, "Comment added");
        Ok(saved)
    }

    async fn find(&self, id: Uuid) -> Result<Post, DomainError> {
        self.posts
            .find_by_id(id)
            .await?
            .ok_or(DomainError::not_found("Post", id))
    }

    async fn ensure_category(&self, category_id: Uuid) -> Result<(), DomainError> {
        match self.categories.find_by_id(category_id).await? {
            Some(_) => Ok(()),
            None => Err(DomainError::InvalidCategory(category_id)),
        }
    }
}

fn vanished(err: RepoError, id: Uuid) -> DomainError {
    match err {
        RepoError::NotFound => DomainError::not_found("Post", id),
        other => other.into(),
    }
}

fn title_conflict(err: RepoError, title: &str) -> DomainError {
    match err {
        RepoError::Constraint(_) => DomainError::DuplicateTitle(title.to_string()),
        other => other.into(),
    }
}
