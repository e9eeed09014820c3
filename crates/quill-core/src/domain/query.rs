//! Listing filters and pagination for posts.

use std::cmp::Ordering;

use uuid::Uuid;

use super::post::{Post, PostStatus};

pub const DEFAULT_PAGE: u64 = 1;
pub const DEFAULT_LIMIT: u64 = 10;
/// Upper bound on page size; larger requests are clamped.
pub const MAX_LIMIT: u64 = 100;

/// Filters and page window for a post listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostQuery {
    pub category: Option<Uuid>,
    pub status: PostStatus,
    /// Case-insensitive substring matched against title, content and tags.
    pub search: Option<String>,
    pub page: u64,
    pub limit: u64,
}

impl Default for PostQuery {
    fn default() -> Self {
        Self {
            category: None,
            status: PostStatus::Published,
            search: None,
            page: DEFAULT_PAGE,
            limit: DEFAULT_LIMIT,
        }
    }
}

impl PostQuery {
    /// Build a query, applying defaults and clamping the page window.
    pub fn new(
        category: Option<Uuid>,
        status: Option<PostStatus>,
        search: Option<String>,
        page: Option<u64>,
        limit: Option<u64>,
    ) -> Self {
        Self {
            category,
            status: status.unwrap_or(PostStatus::Published),
            search: search
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty()),
            page: page.unwrap_or(DEFAULT_PAGE).max(1),
            limit: limit.unwrap_or(DEFAULT_LIMIT).clamp(1, MAX_LIMIT),
        }
    }

    /// Number of rows to skip before this page.
    pub fn offset(&self) -> u64 {
        (self.page - 1).saturating_mul(self.limit)
    }

    pub fn matches(&self, post: &Post) -> bool {
        if post.status != self.status {
            return false;
        }
        if let Some(category) = self.category {
            if post.category_id != category {
                return false;
            }
        }
        match &self.search {
            Some(term) => {
                let term = term.to_lowercase();
                post.title.to_lowercase().contains(&term)
                    || post.content.to_lowercase().contains(&term)
                    || post.tags.iter().any(|t| t.to_lowercase().contains(&term))
            }
            None => true,
        }
    }
}

/// Listing order: newest publication first (unpublished last), then newest
/// creation, then id so pages never overlap.
pub fn listing_order(a: &Post, b: &Post) -> Ordering {
    match (a.published_at, b.published_at) {
        (Some(x), Some(y)) => y.cmp(&x),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
    .then_with(|| b.created_at.cmp(&a.created_at))
    .then_with(|| a.id.cmp(&b.id))
}

/// One page of a post listing.
#[derive(Debug, Clone)]
pub struct PostPage {
    pub posts: Vec<Post>,
    pub total: u64,
    pub page: u64,
    pub limit: u64,
}

impl PostPage {
    pub fn total_pages(&self) -> u64 {
        self.total.div_ceil(self.limit.max(1))
    }
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, Utc};

    use super::*;
    use crate::domain::post::NewPost;

    fn post(title: &str, content: &str, tags: &[&str]) -> Post {
        Post::new(
            Uuid::new_v4(),
            NewPost {
                title: title.to_string(),
                content: content.to_string(),
                category_id: Uuid::new_v4(),
                tags: Some(tags.iter().map(|t| t.to_string()).collect()),
                status: Some(PostStatus::Published),
                ..Default::default()
            },
        )
        .unwrap()
    }

    #[test]
    fn test_defaults_and_clamping() {
        let query = PostQuery::new(None, None, Some("   ".into()), Some(0), Some(10_000));

        assert_eq!(query.status, PostStatus::Published);
        assert_eq!(query.search, None);
        assert_eq!(query.page, 1);
        assert_eq!(query.limit, MAX_LIMIT);
        assert_eq!(query.offset(), 0);
    }

    #[test]
    fn test_offset() {
        let query = PostQuery::new(None, None, None, Some(3), Some(20));
        assert_eq!(query.offset(), 40);
    }

    #[test]
    fn test_search_is_case_insensitive_over_title_content_and_tags() {
        let query = PostQuery::new(None, None, Some("React".into()), None, None);

        assert!(query.matches(&post("Learning REACT", "body", &[])));
        assert!(query.matches(&post("Hooks", "Using react hooks", &[])));
        assert!(query.matches(&post("Hooks", "body", &["reactjs"])));
        assert!(!query.matches(&post("Vue", "body", &["frontend"])));
    }

    #[test]
    fn test_status_and_category_filters() {
        let mut p = post("Draft", "body", &[]);
        let query = PostQuery::new(Some(p.category_id), None, None, None, None);
        assert!(query.matches(&p));

        p.set_status(PostStatus::Draft);
        assert!(!query.matches(&p));

        let other = PostQuery::new(Some(Uuid::new_v4()), Some(PostStatus::Draft), None, None, None);
        assert!(!other.matches(&p));
    }

    #[test]
    fn test_listing_order() {
        let mut older = post("Older", "body", &[]);
        let mut newer = post("Newer", "body", &[]);
        let mut draft = post("Draft", "body", &[]);
        let now = Utc::now();
        older.published_at = Some(now - Duration::hours(1));
        newer.published_at = Some(now);
        draft.published_at = None;

        let mut posts = vec![draft.clone(), older.clone(), newer.clone()];
        posts.sort_by(listing_order);

        let titles: Vec<_> = posts.iter().map(|p| p.title.as_str()).collect();
        assert_eq!(titles, vec!["Newer", "Older", "Draft"]);
    }

    #[test]
    fn test_total_pages() {
        let page = |total| PostPage {
            posts: Vec::new(),
            total,
            page: 1,
            limit: 10,
        };
        assert_eq!(page(0).total_pages(), 0);
        assert_eq!(page(10).total_pages(), 1);
        assert_eq!(page(11).total_pages(), 2);
    }
}
