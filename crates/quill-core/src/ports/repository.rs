use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::{Category, Comment, LikeOutcome, Post, PostPage, PostQuery, User};
use crate::error::RepoError;

/// Generic repository trait defining standard CRUD operations.
#[async_trait]
pub trait BaseRepository<T, ID>: Send + Sync {
    /// Find an entity by its unique ID.
    async fn find_by_id(&self, id: ID) -> Result<Option<T>, RepoError>;

    /// Persist a new entity. Unique-index collisions surface as
    /// [`RepoError::Constraint`].
    async fn insert(&self, entity: T) -> Result<T, RepoError>;

    /// Write the editable fields of an existing entity and return the stored
    /// row. Fields with a dedicated write path (counters, likes, comments)
    /// keep their stored values. [`RepoError::NotFound`] if it is gone.
    async fn update(&self, entity: T) -> Result<T, RepoError>;

    /// Delete an entity by its ID.
    async fn delete(&self, id: ID) -> Result<(), RepoError>;
}

/// User repository with domain-specific methods.
#[async_trait]
pub trait UserRepository: BaseRepository<User, Uuid> {
    /// Find a user by their email address.
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, RepoError>;

    /// Resolve several users at once, skipping unknown ids.
    async fn find_many(&self, ids: &[Uuid]) -> Result<Vec<User>, RepoError>;
}

/// Category repository.
#[async_trait]
pub trait CategoryRepository: BaseRepository<Category, Uuid> {
    /// All categories ordered by name.
    async fn find_all(&self) -> Result<Vec<Category>, RepoError>;

    /// Resolve several categories at once, skipping unknown ids.
    async fn find_many(&self, ids: &[Uuid]) -> Result<Vec<Category>, RepoError>;

    /// Overwrite the stored published-post count.
    async fn set_post_count(&self, id: Uuid, count: u64) -> Result<(), RepoError>;
}

/// Post repository.
#[async_trait]
pub trait PostRepository: BaseRepository<Post, Uuid> {
    /// One page of posts matching the query, in listing order, with the total
    /// number of matches.
    async fn find_page(&self, query: &PostQuery) -> Result<PostPage, RepoError>;

    /// Number of published posts that reference the category.
    async fn count_published_in(&self, category_id: Uuid) -> Result<u64, RepoError>;

    /// Add one view in a single store-side step and return the stored post.
    async fn increment_views(&self, id: Uuid) -> Result<Post, RepoError>;

    /// Add the user's like if absent, remove it otherwise, in one step.
    async fn toggle_like(&self, id: Uuid, user_id: Uuid) -> Result<LikeOutcome, RepoError>;

    /// Append a comment to the post's thread and return the stored post.
    async fn push_comment(&self, id: Uuid, comment: Comment) -> Result<Post, RepoError>;
}
