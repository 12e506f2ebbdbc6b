//! Product API endpoints.

use axum::extract::{Path, State};
use serde::{Deserialize, Serialize};

use super::{created, max_len, non_negative, require, success, ApiJson, ApiQuery, ApiResult};
use crate::errors::AppError;
use crate::models::{CreateProductRequest, Product, UpdateProductRequest, MAX_NAME_LEN};
use crate::AppState;

const DEFAULT_SEARCH_LIMIT: usize = 20;
const MAX_SEARCH_LIMIT: usize = 100;

/// Query parameters for product search.
#[derive(Debug, Deserialize)]
pub struct ProductSearchQuery {
    #[serde(default)]
    pub q: String,
    #[serde(default)]
    pub limit: Option<usize>,
}

/// A product matching a search, with its relevance score.
#[derive(Debug, Serialize)]
pub struct ProductSearchHit {
    #[serde(flatten)]
    pub product: Product,
    pub score: f32,
}

/// GET /api/products - List all products.
pub async fn list_products(State(state): State<AppState>) -> ApiResult<Vec<Product>> {
    success(state.repo.list_products().await?)
}

/// GET /api/products/search - Full-text product search.
pub async fn search_products(
    State(state): State<AppState>,
    ApiQuery(query): ApiQuery<ProductSearchQuery>,
) -> ApiResult<Vec<ProductSearchHit>> {
    let limit = query
        .limit
        .unwrap_or(DEFAULT_SEARCH_LIMIT)
        .clamp(1, MAX_SEARCH_LIMIT);

    let results = state.search.search(&query.q, limit, 0)?;

    let mut hits = Vec::with_capacity(results.len());
    for result in results {
        // The index can briefly trail the database after a delete
        if let Some(product) = state.repo.get_product(&result.product_id).await? {
            hits.push(ProductSearchHit {
                product,
                score: result.score,
            });
        }
    }

    success(hits)
}

/// GET /api/products/:id - Get a single product.
pub async fn get_product(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Product> {
    match state.repo.get_product(&id).await? {
        Some(product) => success(product),
        None => Err(AppError::NotFound("Product not found".to_string())),
    }
}

/// POST /api/products - Create a new product.
pub async fn create_product(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<CreateProductRequest>,
) -> ApiResult<Product> {
    require(&request.name, "Please provide a product name")?;
    require(&request.sub, "Please provide a subtitle (e.g., Lyophilized)")?;
    max_len(&request.name, MAX_NAME_LEN, "Name")?;
    max_len(&request.sub, MAX_NAME_LEN, "Subtitle")?;
    validate_amounts(
        Some(request.price),
        Some(request.cost_price),
        Some(request.stock_quantity),
        Some(request.low_stock_threshold),
    )?;

    let product = state.repo.create_product(&request).await?;

    if let Err(e) = state.search.index_product(&product).await {
        tracing::warn!("Failed to index product: {}", e);
    }

    tracing::info!(product_id = %product.id, name = %product.name, "Product created");
    created(product)
}

/// PATCH /api/products/:id - Partially update a product.
pub async fn update_product(
    State(state): State<AppState>,
    Path(id): Path<String>,
    ApiJson(request): ApiJson<UpdateProductRequest>,
) -> ApiResult<Product> {
    if let Some(name) = &request.name {
        require(name, "Please provide a product name")?;
        max_len(name, MAX_NAME_LEN, "Name")?;
    }
    if let Some(sub) = &request.sub {
        require(sub, "Please provide a subtitle (e.g., Lyophilized)")?;
        max_len(sub, MAX_NAME_LEN, "Subtitle")?;
    }
    validate_amounts(
        request.price,
        request.cost_price,
        request.stock_quantity,
        request.low_stock_threshold,
    )?;

    let product = state.repo.update_product(&id, &request).await?;

    if let Err(e) = state.search.index_product(&product).await {
        tracing::warn!("Failed to re-index product: {}", e);
    }

    success(product)
}

/// DELETE /api/products/:id - Delete a product.
pub async fn delete_product(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<serde_json::Value> {
    state.repo.delete_product(&id).await?;

    if let Err(e) = state.search.remove_product(&id).await {
        tracing::warn!("Failed to remove product from index: {}", e);
    }

    tracing::info!(product_id = %id, "Product deleted");
    success(serde_json::json!({}))
}

fn validate_amounts(
    price: Option<f64>,
    cost_price: Option<f64>,
    stock_quantity: Option<i64>,
    low_stock_threshold: Option<i64>,
) -> Result<(), AppError> {
    if let Some(price) = price {
        non_negative(price, "Price")?;
    }
    if let Some(cost_price) = cost_price {
        non_negative(cost_price, "Cost price")?;
    }
    if stock_quantity.is_some_and(|s| s < 0) {
        return Err(AppError::Validation(
            "Stock quantity cannot be negative".to_string(),
        ));
    }
    if low_stock_threshold.is_some_and(|t| t < 0) {
        return Err(AppError::Validation(
            "Low stock threshold cannot be negative".to_string(),
        ));
    }
    Ok(())
}
