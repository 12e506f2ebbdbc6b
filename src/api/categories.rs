//! Category API endpoints.

use axum::extract::{Path, State};
use serde::Deserialize;

use super::{created, max_len, require, success, ApiJson, ApiQuery, ApiResult};
use crate::models::{Category, CreateCategoryRequest, UpdateCategoryRequest, MAX_NAME_LEN};
use crate::AppState;

/// Query parameters for listing categories.
#[derive(Debug, Default, Deserialize)]
pub struct CategoryListQuery {
    /// Include inactive categories (admin console)
    #[serde(default)]
    pub all: bool,
}

/// GET /api/categories - List categories.
pub async fn list_categories(
    State(state): State<AppState>,
    ApiQuery(query): ApiQuery<CategoryListQuery>,
) -> ApiResult<Vec<Category>> {
    success(state.repo.list_categories(query.all).await?)
}

/// POST /api/categories - Create a category.
pub async fn create_category(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<CreateCategoryRequest>,
) -> ApiResult<Category> {
    require(&request.name, "Please provide a category name")?;
    max_len(&request.name, MAX_NAME_LEN, "Name")?;

    let category = state.repo.create_category(&request).await?;
    tracing::info!(category_id = %category.id, name = %category.name, "Category created");
    created(category)
}

/// PATCH /api/categories/:id - Partially update a category.
pub async fn update_category(
    State(state): State<AppState>,
    Path(id): Path<String>,
    ApiJson(request): ApiJson<UpdateCategoryRequest>,
) -> ApiResult<Category> {
    if let Some(name) = &request.name {
        require(name, "Please provide a category name")?;
        max_len(name, MAX_NAME_LEN, "Name")?;
    }

    success(state.repo.update_category(&id, &request).await?)
}

/// DELETE /api/categories/:id - Delete a category and return it.
pub async fn delete_category(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Category> {
    let category = state.repo.delete_category(&id).await?;
    tracing::info!(category_id = %id, "Category deleted");
    success(category)
}
