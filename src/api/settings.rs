//! Vendor settings and site content endpoints.

use axum::extract::State;

use super::{require, success, ApiJson, ApiResult};
use crate::errors::AppError;
use crate::models::{SiteContent, VendorSettings};
use crate::AppState;

/// GET /api/settings - Vendor settings, created with defaults on first read.
pub async fn get_settings(State(state): State<AppState>) -> ApiResult<VendorSettings> {
    success(state.repo.get_vendor_settings().await?)
}

/// POST /api/settings - Replace the vendor settings.
pub async fn save_settings(
    State(state): State<AppState>,
    ApiJson(vendor): ApiJson<VendorSettings>,
) -> ApiResult<VendorSettings> {
    require(&vendor.company_name, "Company name is required")?;

    let saved = state.repo.save_vendor_settings(&vendor).await?;
    tracing::info!(company = %saved.company_name, "Vendor settings saved");
    success(saved)
}

/// GET /api/site-content - Homepage copy.
pub async fn get_site_content(State(state): State<AppState>) -> ApiResult<SiteContent> {
    success(state.repo.get_site_content().await?)
}

/// PUT /api/site-content - Merge the given fields over the stored copy.
pub async fn update_site_content(
    State(state): State<AppState>,
    ApiJson(patch): ApiJson<serde_json::Value>,
) -> ApiResult<SiteContent> {
    if !patch.is_object() {
        return Err(AppError::Validation(
            "Site content must be a JSON object".to_string(),
        ));
    }

    let current = state.repo.get_site_content().await?;
    let merged = current
        .merged_with(&patch)
        .map_err(|e| AppError::Validation(format!("Invalid site content: {}", e)))?;

    success(state.repo.save_site_content(&merged).await?)
}
