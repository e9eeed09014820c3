//! Post handlers and response population.

use std::collections::{BTreeSet, HashMap};

use actix_web::{HttpResponse, web};
use uuid::Uuid;

use quill_core::domain::{NewPost, Post, PostChanges, PostQuery, PostStatus};
use quill_core::ports::{CategoryRepository, UserRepository};
use quill_shared::MessageResponse;
use quill_shared::dto::{
    AuthorSummary, CategorySummary, CommentResponse, CreateCommentRequest, CreatePostRequest,
    LikeResponse, ListPostsParams, PostListResponse, PostResponse, UpdatePostRequest,
};

use crate::middleware::auth::Identity;
use crate::middleware::error::{AppError, AppResult};
use crate::state::AppState;

fn parse_status(raw: Option<String>) -> AppResult<Option<PostStatus>> {
    raw.map(|s| s.trim().to_lowercase().parse::<PostStatus>())
        .transpose()
        .map_err(|_| {
            AppError::Validation(vec![quill_core::error::FieldError::new(
                "status",
                "Status must be either draft or published",
            )])
        })
}

/// Resolve category and user references for a batch of posts in two lookups.
/// A dangling reference is served as `null`.
async fn populate(state: &AppState, posts: Vec<Post>) -> AppResult<Vec<PostResponse>> {
    let category_ids: Vec<Uuid> = posts
        .iter()
        .map(|p| p.category_id)
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect();
    let user_ids: Vec<Uuid> = posts
        .iter()
        .flat_map(|p| std::iter::once(p.author_id).chain(p.comments.iter().map(|c| c.author_id)))
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect();

    let categories: HashMap<Uuid, CategorySummary> = state
        .category_rows
        .find_many(&category_ids)
        .await?
        .into_iter()
        .map(|c| {
            (
                c.id,
                CategorySummary {
                    id: c.id,
                    name: c.name,
                    slug: c.slug,
                    color: c.color,
                },
            )
        })
        .collect();
    let authors: HashMap<Uuid, AuthorSummary> = state
        .users
        .find_many(&user_ids)
        .await?
        .into_iter()
        .map(|u| {
            (
                u.id,
                AuthorSummary {
                    id: u.id,
                    username: u.username,
                },
            )
        })
        .collect();

    Ok(posts
        .into_iter()
        .map(|post| PostResponse {
            excerpt: post.summary().to_string(),
            category: categories.get(&post.category_id).cloned(),
            author: authors.get(&post.author_id).cloned(),
            status: post.status.to_string(),
            like_count: post.like_count(),
            likes: post.likes.iter().copied().collect(),
            comments: post
                .comments
                .iter()
                .map(|c| CommentResponse {
                    id: c.id,
                    author: authors.get(&c.author_id).cloned(),
                    content: c.content.clone(),
                    created_at: c.created_at,
                })
                .collect(),
            id: post.id,
            title: post.title,
            slug: post.slug,
            content: post.content,
            tags: post.tags,
            views: post.views,
            featured_image: post.featured_image,
            published_at: post.published_at,
            created_at: post.created_at,
            updated_at: post.updated_at,
        })
        .collect())
}

async fn populate_one(state: &AppState, post: Post) -> AppResult<PostResponse> {
    populate(state, vec![post])
        .await?
        .pop()
        .ok_or_else(|| AppError::Internal("populated post went missing".to_string()))
}

/// GET /api/posts
pub async fn list(
    state: web::Data<AppState>,
    params: web::Query<ListPostsParams>,
) -> AppResult<HttpResponse> {
    let params = params.into_inner();
    let query = PostQuery::new(
        params.category,
        parse_status(params.status)?,
        params.search,
        params.page,
        params.limit,
    );

    let page = state.posts.list(&query).await?;
    let total_pages = page.total_pages();

    Ok(HttpResponse::Ok().json(PostListResponse {
        posts: populate(&state, page.posts).await?,
        total_pages,
        current_page: page.page,
        total: page.total,
    }))
}

/// GET /api/posts/{id} - counts a view
pub async fn get(state: web::Data<AppState>, path: web::Path<Uuid>) -> AppResult<HttpResponse> {
    let post = state.posts.get(path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(populate_one(&state, post).await?))
}

/// POST /api/posts
pub async fn create(
    state: web::Data<AppState>,
    identity: Identity,
    body: web::Json<CreatePostRequest>,
) -> AppResult<HttpResponse> {
    let req = body.into_inner();
    let input = NewPost {
        title: req.title,
        content: req.content,
        category_id: req.category,
        excerpt: req.excerpt,
        tags: req.tags,
        status: parse_status(req.status)?,
        featured_image: req.featured_image,
    };

    let post = state.posts.create(identity.user_id, input).await?;
    Ok(HttpResponse::Created().json(populate_one(&state, post).await?))
}

/// PUT /api/posts/{id} - author or admin
pub async fn update(
    state: web::Data<AppState>,
    identity: Identity,
    path: web::Path<Uuid>,
    body: web::Json<UpdatePostRequest>,
) -> AppResult<HttpResponse> {
    let req = body.into_inner();
    let changes = PostChanges {
        title: req.title,
        content: req.content,
        category_id: req.category,
        excerpt: req.excerpt,
        tags: req.tags,
        status: parse_status(req.status)?,
        featured_image: req.featured_image,
    };

    let post = state
        .posts
        .update(path.into_inner(), &identity.actor(), changes)
        .await?;
    Ok(HttpResponse::Ok().json(populate_one(&state, post).await?))
}

/// DELETE /api/posts/{id} - author or admin
pub async fn delete(
    state: web::Data<AppState>,
    identity: Identity,
    path: web::Path<Uuid>,
) -> AppResult<HttpResponse> {
    state
        .posts
        .delete(path.into_inner(), &identity.actor())
        .await?;
    Ok(HttpResponse::Ok().json(MessageResponse::new("Post deleted successfully")))
}

/// POST /api/posts/{id}/like
pub async fn toggle_like(
    state: web::Data<AppState>,
    identity: Identity,
    path: web::Path<Uuid>,
) -> AppResult<HttpResponse> {
    let outcome = state
        .posts
        .toggle_like(path.into_inner(), identity.user_id)
        .await?;
    Ok(HttpResponse::Ok().json(LikeResponse {
        likes: outcome.likes,
        is_liked: outcome.is_liked,
    }))
}

/// POST /api/posts/{id}/comments
pub async fn add_comment(
    state: web::Data<AppState>,
    identity: Identity,
    path: web::Path<Uuid>,
    body: web::Json<CreateCommentRequest>,
) -> AppResult<HttpResponse> {
    let post = state
        .posts
        .add_comment(path.into_inner(), identity.user_id, &body.content)
        .await?;
    Ok(HttpResponse::Created().json(populate_one(&state, post).await?))
}
