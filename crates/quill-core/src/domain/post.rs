use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::slug::slugify;
use super::validation::{
    COMMENT_MAX, POST_EXCERPT_MAX, POST_TITLE_MAX, TAG_MAX, Validator, normalize_tags,
};
use crate::error::DomainError;

/// Publication state of a post.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PostStatus {
    #[default]
    Draft,
    Published,
}

impl PostStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            PostStatus::Draft => "draft",
            PostStatus::Published => "published",
        }
    }
}

impl fmt::Display for PostStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PostStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "draft" => Ok(PostStatus::Draft),
            "published" => Ok(PostStatus::Published),
            other => Err(format!("unknown post status '{other}'")),
        }
    }
}

/// A reader comment embedded in its post.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Comment {
    pub id: Uuid,
    pub author_id: Uuid,
    pub content: String,
    pub created_at: DateTime<Utc>,
}

impl Comment {
    /// Validate the text and stamp a new comment.
    pub fn new(author_id: Uuid, content: &str) -> Result<Self, DomainError> {
        let content = content.trim();
        Validator::new()
            .length(
                "content",
                content,
                1,
                COMMENT_MAX,
                "Comment must be between 1 and 500 characters",
            )
            .finish()?;

        Ok(Self {
            id: Uuid::new_v4(),
            author_id,
            content: content.to_string(),
            created_at: Utc::now(),
        })
    }
}

/// Append-only, insertion-ordered comment thread owned by a single post.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Comments(Vec<Comment>);

impl Comments {
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Comment> {
        self.0.iter()
    }

    pub fn last(&self) -> Option<&Comment> {
        self.0.last()
    }

    fn push(&mut self, comment: Comment) {
        self.0.push(comment);
    }
}

impl From<Vec<Comment>> for Comments {
    fn from(comments: Vec<Comment>) -> Self {
        Self(comments)
    }
}

impl<'a> IntoIterator for &'a Comments {
    type Item = &'a Comment;
    type IntoIter = std::slice::Iter<'a, Comment>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

/// Post entity - represents a blog post or article.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Post {
    pub id: Uuid,
    pub title: String,
    pub slug: String,
    pub content: String,
    pub excerpt: Option<String>,
    pub category_id: Uuid,
    pub author_id: Uuid,
    pub tags: Vec<String>,
    pub status: PostStatus,
    pub views: u64,
    pub likes: BTreeSet<Uuid>,
    pub comments: Comments,
    pub featured_image: Option<String>,
    pub published_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Post {
    /// Create a new post owned by `author_id`.
    ///
    /// Only field shapes are checked here; whether the category exists is the
    /// registry's concern.
    pub fn new(author_id: Uuid, input: NewPost) -> Result<Self, DomainError> {
        input.validate()?;

        let title = input.title.trim().to_string();
        let now = Utc::now();
        let mut post = Self {
            id: Uuid::new_v4(),
            slug: slugify(&title),
            title,
            content: input.content,
            excerpt: input.excerpt.filter(|e| !e.trim().is_empty()),
            category_id: input.category_id,
            author_id,
            tags: normalize_tags(input.tags.unwrap_or_default()),
            status: PostStatus::Draft,
            views: 0,
            likes: BTreeSet::new(),
            comments: Comments::default(),
            featured_image: input.featured_image,
            published_at: None,
            created_at: now,
            updated_at: now,
        };
        post.set_status(input.status.unwrap_or_default());
        Ok(post)
    }

    pub fn is_published(&self) -> bool {
        self.status == PostStatus::Published
    }

    /// Excerpt to show in listings; the title stands in when none was given.
    pub fn summary(&self) -> &str {
        self.excerpt.as_deref().unwrap_or(&self.title)
    }

    /// Move between draft and published. `published_at` is stamped on the
    /// first publication and kept afterwards.
    pub fn set_status(&mut self, status: PostStatus) {
        if status == PostStatus::Published && self.published_at.is_none() {
            self.published_at = Some(Utc::now());
        }
        self.status = status;
    }

    pub fn record_view(&mut self) {
        self.views = self.views.saturating_add(1);
    }

    /// Like when absent, unlike when present. Returns whether the user now
    /// likes the post.
    pub fn toggle_like(&mut self, user_id: Uuid) -> bool {
        if self.likes.remove(&user_id) {
            false
        } else {
            self.likes.insert(user_id);
            true
        }
    }

    pub fn like_count(&self) -> usize {
        self.likes.len()
    }

    /// Append a comment to the end of the thread.
    pub fn add_comment(&mut self, comment: Comment) {
        self.updated_at = comment.created_at;
        self.comments.push(comment);
    }

    /// Apply validated changes and report what moved.
    pub fn apply(&mut self, changes: PostChanges) -> Result<AppliedChange, DomainError> {
        changes.validate()?;

        let applied = AppliedChange {
            previous_category: self.category_id,
            previous_status: self.status,
        };

        if let Some(title) = changes.title {
            let title = title.trim().to_string();
            self.slug = slugify(&title);
            self.title = title;
        }
        if let Some(content) = changes.content {
            self.content = content;
        }
        if let Some(excerpt) = changes.excerpt {
            self.excerpt = Some(excerpt).filter(|e| !e.trim().is_empty());
        }
        if let Some(category_id) = changes.category_id {
            self.category_id = category_id;
        }
        if let Some(tags) = changes.tags {
            self.tags = normalize_tags(tags);
        }
        if let Some(featured_image) = changes.featured_image {
            self.featured_image = Some(featured_image).filter(|f| !f.trim().is_empty());
        }
        if let Some(status) = changes.status {
            self.set_status(status);
        }
        self.updated_at = Utc::now();
        Ok(applied)
    }
}

/// Result of a like toggle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct LikeOutcome {
    pub likes: usize,
    pub is_liked: bool,
}

/// Snapshot of the category-relevant fields taken before an update.
#[derive(Debug, Clone, Copy)]
pub struct AppliedChange {
    pub previous_category: Uuid,
    pub previous_status: PostStatus,
}

impl AppliedChange {
    /// Categories whose published membership may have changed, given the
    /// post after the update.
    pub fn affected_categories(&self, post: &Post) -> Vec<Uuid> {
        if self.previous_category != post.category_id {
            vec![self.previous_category, post.category_id]
        } else if self.previous_status != post.status {
            vec![post.category_id]
        } else {
            Vec::new()
        }
    }
}

/// Input for creating a post.
#[derive(Debug, Clone, Default)]
pub struct NewPost {
    pub title: String,
    pub content: String,
    pub category_id: Uuid,
    pub excerpt: Option<String>,
    pub tags: Option<Vec<String>>,
    pub status: Option<PostStatus>,
    pub featured_image: Option<String>,
}

impl NewPost {
    pub fn validate(&self) -> Result<(), DomainError> {
        let mut v = Validator::new();
        validate_title(&mut v, &self.title);
        validate_content(&mut v, &self.content);
        validate_optional(&mut v, self.excerpt.as_deref(), self.tags.as_deref());
        v.finish()
    }
}

/// Partial update of a post; `None` leaves a field untouched. The author is
/// fixed at creation and cannot be changed.
#[derive(Debug, Clone, Default)]
pub struct PostChanges {
    pub title: Option<String>,
    pub content: Option<String>,
    pub category_id: Option<Uuid>,
    pub excerpt: Option<String>,
    pub tags: Option<Vec<String>>,
    pub status: Option<PostStatus>,
    pub featured_image: Option<String>,
}

impl PostChanges {
    pub fn validate(&self) -> Result<(), DomainError> {
        let mut v = Validator::new();
        if let Some(title) = &self.title {
            validate_title(&mut v, title);
        }
        if let Some(content) = &self.content {
            validate_content(&mut v, content);
        }
        validate_optional(&mut v, self.excerpt.as_deref(), self.tags.as_deref());
        v.finish()
    }
}

fn validate_title(v: &mut Validator, title: &str) {
    v.length(
        "title",
        title.trim(),
        1,
        POST_TITLE_MAX,
        "Title is required and must be at most 100 characters",
    );
    v.check(
        title.trim().is_empty() || !slugify(title).is_empty(),
        "title",
        "Title must contain at least one letter or digit",
    );
}

fn validate_content(v: &mut Validator, content: &str) {
    v.check(!content.trim().is_empty(), "content", "Content is required");
}

fn validate_optional(v: &mut Validator, excerpt: Option<&str>, tags: Option<&[String]>) {
    if let Some(excerpt) = excerpt {
        v.length(
            "excerpt",
            excerpt,
            0,
            POST_EXCERPT_MAX,
            "Excerpt must be at most 300 characters",
        );
    }
    if let Some(tags) = tags {
        v.check(
            tags.iter().all(|t| t.trim().chars().count() <= TAG_MAX),
            "tags",
            "Tags must be at most 30 characters each",
        );
    }
}
