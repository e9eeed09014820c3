//! Category handlers. Reads are public, writes need an admin token.

use actix_web::{HttpResponse, web};
use uuid::Uuid;

use quill_core::domain::{Category, CategoryChanges, NewCategory};
use quill_shared::MessageResponse;
use quill_shared::dto::{CategoryResponse, CreateCategoryRequest, UpdateCategoryRequest};

use crate::middleware::auth::AdminIdentity;
use crate::middleware::error::AppResult;
use crate::state::AppState;

pub(crate) fn category_response(category: Category) -> CategoryResponse {
    CategoryResponse {
        id: category.id,
        name: category.name,
        slug: category.slug,
        description: category.description,
        color: category.color,
        post_count: category.post_count,
        created_at: category.created_at,
        updated_at: category.updated_at,
    }
}

/// GET /api/categories
pub async fn list(state: web::Data<AppState>) -> AppResult<HttpResponse> {
    let categories = state.categories.list().await?;
    let body: Vec<_> = categories.into_iter().map(category_response).collect();
    Ok(HttpResponse::Ok().json(body))
}

/// GET /api/categories/{id}
pub async fn get(state: web::Data<AppState>, path: web::Path<Uuid>) -> AppResult<HttpResponse> {
    let category = state.categories.get(path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(category_response(category)))
}

/// POST /api/categories
pub async fn create(
    state: web::Data<AppState>,
    admin: AdminIdentity,
    body: web::Json<CreateCategoryRequest>,
) -> AppResult<HttpResponse> {
    let req = body.into_inner();
    let category = state
        .categories
        .create(NewCategory {
            name: req.name,
            description: req.description,
            color: req.color,
        })
        .await?;

    tracing::info!(category_id = %category.id, admin_id = %admin.0.user_id, "Category created");
    Ok(HttpResponse::Created().json(category_response(category)))
}

/// PUT /api/categories/{id}
pub async fn update(
    state: web::Data<AppState>,
    _admin: AdminIdentity,
    path: web::Path<Uuid>,
    body: web::Json<UpdateCategoryRequest>,
) -> AppResult<HttpResponse> {
    let req = body.into_inner();
    let category = state
        .categories
        .update(
            path.into_inner(),
            CategoryChanges {
                name: req.name,
                description: req.description,
                color: req.color,
            },
        )
        .await?;

    Ok(HttpResponse::Ok().json(category_response(category)))
}

/// DELETE /api/categories/{id}
pub async fn delete(
    state: web::Data<AppState>,
    admin: AdminIdentity,
    path: web::Path<Uuid>,
) -> AppResult<HttpResponse> {
    let id = path.into_inner();
    state.categories.delete(id).await?;

    tracing::info!(category_id = %id, admin_id = %admin.0.user_id, "Category deleted");
    Ok(HttpResponse::Ok().json(MessageResponse::new("Category deleted successfully")))
}
