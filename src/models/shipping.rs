//! Shipping method model.

use serde::{Deserialize, Serialize};

use super::product::default_active;

/// A selectable shipping option at checkout.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShippingMethod {
    pub id: String,
    pub name: String,
    pub price: f64,
    /// Free text, e.g. "5-7 days"
    pub delivery_time: String,
    pub is_active: bool,
    pub created_at: String,
    pub updated_at: String,
}

/// Request body for creating a shipping method.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateShippingMethodRequest {
    pub name: String,
    pub price: f64,
    pub delivery_time: String,
    #[serde(default = "default_active")]
    pub is_active: bool,
}

/// Request body for a partial shipping method update.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateShippingMethodRequest {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub price: Option<f64>,
    #[serde(default)]
    pub delivery_time: Option<String>,
    #[serde(default)]
    pub is_active: Option<bool>,
}
