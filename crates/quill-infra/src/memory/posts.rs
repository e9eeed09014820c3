use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use quill_core::domain::{Comment, LikeOutcome, Post, PostPage, PostQuery, listing_order};
use quill_core::error::RepoError;
use quill_core::ports::{BaseRepository, PostRepository};

/// Post store with a unique `slug`.
#[derive(Default)]
pub struct InMemoryPostRepository {
    store: RwLock<HashMap<Uuid, Post>>,
}

impl InMemoryPostRepository {
    pub fn new() -> Self {
        Self::default()
    }

    fn check_unique(store: &HashMap<Uuid, Post>, post: &Post) -> Result<(), RepoError> {
        if store
            .values()
            .any(|other| other.id != post.id && other.slug == post.slug)
        {
            Err(RepoError::Constraint(format!(
                "post slug '{}' already exists",
                post.slug
            )))
        } else {
            Ok(())
        }
    }
}

#[async_trait]
impl BaseRepository<Post, Uuid> for InMemoryPostRepository {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Post>, RepoError> {
        Ok(self.store.read().await.get(&id).cloned())
    }

    async fn insert(&self, post: Post) -> Result<Post, RepoError> {
        let mut store = self.store.write().await;
        if store.contains_key(&post.id) {
            return Err(RepoError::Constraint("duplicate post id".to_string()));
        }
        Self::check_unique(&store, &post)?;
        store.insert(post.id, post.clone());
        Ok(post)
    }

    async fn update(&self, mut post: Post) -> Result<Post, RepoError> {
        let mut store = self.store.write().await;
        Self::check_unique(&store, &post)?;
        let stored = store.get_mut(&post.id).ok_or(RepoError::NotFound)?;

        post.views = stored.views;
        post.likes = std::mem::take(&mut stored.likes);
        post.comments = std::mem::take(&mut stored.comments);
        *stored = post.clone();
        Ok(post)
    }

    async fn delete(&self, id: Uuid) -> Result<(), RepoError> {
        match self.store.write().await.remove(&id) {
            Some(_) => Ok(()),
            None => Err(RepoError::NotFound),
        }
    }
}

#[async_trait]
impl PostRepository for InMemoryPostRepository {
    async fn find_page(&self, query: &PostQuery) -> Result<PostPage, RepoError> {
        let store = self.store.read().await;
        let mut matching: Vec<&Post> = store.values().filter(|p| query.matches(p)).collect();
        matching.sort_by(|a, b| listing_order(a, b));

        let total = matching.len() as u64;
        let posts = matching
            .into_iter()
            .skip(usize::try_from(query.offset()).unwrap_or(usize::MAX))
            .take(usize::try_from(query.limit).unwrap_or(usize::MAX))
            .cloned()
            .collect();

        Ok(PostPage {
            posts,
            total,
            page: query.page,
            limit: query.limit,
        })
    }

    async fn count_published_in(&self, category_id: Uuid) -> Result<u64, RepoError> {
        let store = self.store.read().await;
        Ok(store
            .values()
            .filter(|p| p.category_id == category_id && p.is_published())
            .count() as u64)
    }

    async fn increment_views(&self, id: Uuid) -> Result<Post, RepoError> {
        let mut store = self.store.write().await;
        let post = store.get_mut(&id).ok_or(RepoError::NotFound)?;
        post.record_view();
        Ok(post.clone())
    }

    async fn toggle_like(&self, id: Uuid, user_id: Uuid) -> Result<LikeOutcome, RepoError> {
        let mut store = self.store.write().await;
        let post = store.get_mut(&id).ok_or(RepoError::NotFound)?;
        let is_liked = post.toggle_like(user_id);
        Ok(LikeOutcome {
            likes: post.like_count(),
            is_liked,
        })
    }

    async fn push_comment(&self, id: Uuid, comment: Comment) -> Result<Post, RepoError> {
        let mut store = self.store.write().await;
        let post = store.get_mut(&id).ok_or(RepoError::NotFound)?;
        post.add_comment(comment);
        Ok(post.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use quill_core::domain::{NewPost, PostStatus};

    fn post(title: &str, category_id: Uuid, status: PostStatus) -> Post {
        Post::new(
            Uuid::new_v4(),
            NewPost {
                title: title.to_string(),
                content: "Body".to_string(),
                category_id,
                status: Some(status),
                ..Default::default()
            },
        )
        .unwrap()
    }

    #[tokio::test]
    async fn test_count_published_ignores_drafts_and_other_categories() {
        let repo = InMemoryPostRepository::new();
        let tech = Uuid::new_v4();
        repo.insert(post("One", tech, PostStatus::Published)).await.unwrap();
        repo.insert(post("Two", tech, PostStatus::Draft)).await.unwrap();
        repo.insert(post("Three", Uuid::new_v4(), PostStatus::Published))
            .await
            .unwrap();

        assert_eq!(repo.count_published_in(tech).await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_find_page_windows_results() {
        let repo = InMemoryPostRepository::new();
        let category = Uuid::new_v4();
        for i in 0..5 {
            repo.insert(post(&format!("Post {i}"), category, PostStatus::Published))
                .await
                .unwrap();
        }

        let query = PostQuery::new(None, None, None, Some(2), Some(2));
        let page = repo.find_page(&query).await.unwrap();

        assert_eq!(page.total, 5);
        assert_eq!(page.posts.len(), 2);
        assert_eq!(page.total_pages(), 3);
    }

    #[tokio::test]
    async fn test_duplicate_slug_is_a_constraint_violation() {
        let repo = InMemoryPostRepository::new();
        let category = Uuid::new_v4();
        repo.insert(post("Same Title", category, PostStatus::Draft))
            .await
            .unwrap();

        let result = repo
            .insert(post("same title", category, PostStatus::Draft))
            .await;
        assert!(matches!(result, Err(RepoError::Constraint(_))));
    }

    #[tokio::test]
    async fn test_update_keeps_stored_engagement() {
        let repo = InMemoryPostRepository::new();
        let stale = repo
            .insert(post("Engaged", Uuid::new_v4(), PostStatus::Published))
            .await
            .unwrap();
        let reader = Uuid::new_v4();

        repo.increment_views(stale.id).await.unwrap();
        repo.toggle_like(stale.id, reader).await.unwrap();
        repo.push_comment(stale.id, Comment::new(reader, "nice").unwrap())
            .await
            .unwrap();

        let mut edit = stale.clone();
        edit.content = "Edited".to_string();
        let saved = repo.update(edit).await.unwrap();

        assert_eq!(saved.content, "Edited");
        assert_eq!(saved.views, 1);
        assert!(saved.likes.contains(&reader));
        assert_eq!(saved.comments.len(), 1);
        assert_eq!(repo.find_by_id(stale.id).await.unwrap().unwrap().views, 1);
    }

    #[tokio::test]
    async fn test_toggle_like_on_missing_post() {
        let repo = InMemoryPostRepository::new();
        let result = repo.toggle_like(Uuid::new_v4(), Uuid::new_v4()).await;
        assert!(matches!(result, Err(RepoError::NotFound)));
    }
}
