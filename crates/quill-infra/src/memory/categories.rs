use std::collections::HashMap;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;
use uuid::Uuid;

use quill_core::domain::Category;
use quill_core::error::RepoError;
use quill_core::ports::{BaseRepository, CategoryRepository};

/// Category store with unique `name` and `slug`.
#[derive(Default)]
pub struct InMemoryCategoryRepository {
    store: RwLock<HashMap<Uuid, Category>>,
}

impl InMemoryCategoryRepository {
    pub fn new() -> Self {
        Self::default()
    }

    fn check_unique(store: &HashMap<Uuid, Category>, category: &Category) -> Result<(), RepoError> {
        let clash = store.values().any(|other| {
            other.id != category.id && (other.name == category.name || other.slug == category.slug)
        });
        if clash {
            Err(RepoError::Constraint(format!(
                "category '{}' already exists",
                category.name
            )))
        } else {
            Ok(())
        }
    }
}

#[async_trait]
impl BaseRepository<Category, Uuid> for InMemoryCategoryRepository {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Category>, RepoError> {
        Ok(self.store.read().await.get(&id).cloned())
    }

    async fn insert(&self, category: Category) -> Result<Category, RepoError> {
        let mut store = self.store.write().await;
        if store.contains_key(&category.id) {
            return Err(RepoError::Constraint("duplicate category id".to_string()));
        }
        Self::check_unique(&store, &category)?;
        store.insert(category.id, category.clone());
        Ok(category)
    }

    async fn update(&self, mut category: Category) -> Result<Category, RepoError> {
        let mut store = self.store.write().await;
        Self::check_unique(&store, &category)?;
        let stored = store.get_mut(&category.id).ok_or(RepoError::NotFound)?;

        category.post_count = stored.post_count;
        *stored = category.clone();
        Ok(category)
    }

    async fn delete(&self, id: Uuid) -> Result<(), RepoError> {
        match self.store.write().await.remove(&id) {
            Some(_) => Ok(()),
            None => Err(RepoError::NotFound),
        }
    }
}

#[async_trait]
impl CategoryRepository for InMemoryCategoryRepository {
    async fn find_all(&self) -> Result<Vec<Category>, RepoError> {
        let mut categories: Vec<Category> = self.store.read().await.values().cloned().collect();
        categories.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(categories)
    }

    async fn find_many(&self, ids: &[Uuid]) -> Result<Vec<Category>, RepoError> {
        let store = self.store.read().await;
        Ok(ids.iter().filter_map(|id| store.get(id).cloned()).collect())
    }

    async fn set_post_count(&self, id: Uuid, count: u64) -> Result<(), RepoError> {
        let mut store = self.store.write().await;
        let category = store.get_mut(&id).ok_or(RepoError::NotFound)?;
        category.post_count = count;
        category.updated_at = Utc::now();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use quill_core::domain::NewCategory;

    fn category(name: &str) -> Category {
        Category::new(NewCategory {
            name: name.to_string(),
            ..Default::default()
        })
        .unwrap()
    }

    #[tokio::test]
    async fn test_insert_rejects_duplicate_slug() {
        let repo = InMemoryCategoryRepository::new();
        repo.insert(category("Web Dev")).await.unwrap();

        let result = repo.insert(category("web dev")).await;
        assert!(matches!(result, Err(RepoError::Constraint(_))));
    }

    #[tokio::test]
    async fn test_find_all_sorted_by_name() {
        let repo = InMemoryCategoryRepository::new();
        repo.insert(category("Technology")).await.unwrap();
        repo.insert(category("Business")).await.unwrap();

        let names: Vec<_> = repo
            .find_all()
            .await
            .unwrap()
            .into_iter()
            .map(|c| c.name)
            .collect();
        assert_eq!(names, vec!["Business", "Technology"]);
    }

    #[tokio::test]
    async fn test_update_keeps_stored_post_count() {
        let repo = InMemoryCategoryRepository::new();
        let stale = repo.insert(category("Gaming")).await.unwrap();
        repo.set_post_count(stale.id, 4).await.unwrap();

        let mut renamed = stale.clone();
        renamed.name = "Games".to_string();
        renamed.slug = "games".to_string();
        let saved = repo.update(renamed).await.unwrap();

        assert_eq!(saved.name, "Games");
        assert_eq!(saved.post_count, 4);
        assert_eq!(repo.find_by_id(stale.id).await.unwrap().unwrap().post_count, 4);
    }

    #[tokio::test]
    async fn test_set_post_count_on_missing_category() {
        let repo = InMemoryCategoryRepository::new();
        let result = repo.set_post_count(Uuid::new_v4(), 3).await;
        assert!(matches!(result, Err(RepoError::NotFound)));
    }
}
