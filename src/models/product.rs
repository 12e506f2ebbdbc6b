//! Product model for the order form and admin inventory.

use serde::{Deserialize, Serialize};

/// Maximum length of product names and subtitles.
pub const MAX_NAME_LEN: usize = 60;

/// Default low-stock alert threshold.
pub const DEFAULT_LOW_STOCK_THRESHOLD: i64 = 5;

/// Stock availability derived from quantity and threshold.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum StockStatus {
    InStock,
    LowStock,
    OutOfStock,
}

impl StockStatus {
    pub fn classify(stock_quantity: i64, low_stock_threshold: i64) -> Self {
        if stock_quantity <= 0 {
            StockStatus::OutOfStock
        } else if stock_quantity <= low_stock_threshold {
            StockStatus::LowStock
        } else {
            StockStatus::InStock
        }
    }
}

/// A sellable product.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: String,
    pub name: String,
    /// Subtitle shown under the name, e.g. "Lyophilized"
    pub sub: String,
    pub category: String,
    pub price: f64,
    pub cost_price: f64,
    pub stock_quantity: i64,
    pub low_stock_threshold: i64,
    pub is_active: bool,
    pub order: i64,
    pub created_at: String,
    pub updated_at: String,
    /// Percentage margin over the sale price, one decimal
    pub profit_margin: f64,
    pub stock_status: StockStatus,
}

impl Product {
    /// Recompute `profit_margin` and `stock_status` from the stored fields.
    pub fn with_derived(mut self) -> Self {
        self.profit_margin = profit_margin(self.price, self.cost_price);
        self.stock_status = StockStatus::classify(self.stock_quantity, self.low_stock_threshold);
        self
    }
}

/// Margin as a percentage of the sale price; zero when no cost is recorded.
pub fn profit_margin(price: f64, cost_price: f64) -> f64 {
    if cost_price > 0.0 && price > 0.0 {
        (((price - cost_price) / price) * 1000.0).round() / 10.0
    } else {
        0.0
    }
}

/// Request body for creating a product.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateProductRequest {
    pub name: String,
    pub sub: String,
    #[serde(default)]
    pub category: String,
    pub price: f64,
    #[serde(default)]
    pub cost_price: f64,
    #[serde(default)]
    pub stock_quantity: i64,
    #[serde(default = "default_low_stock_threshold")]
    pub low_stock_threshold: i64,
    #[serde(default = "default_active")]
    pub is_active: bool,
    #[serde(default)]
    pub order: i64,
}

fn default_low_stock_threshold() -> i64 {
    DEFAULT_LOW_STOCK_THRESHOLD
}

pub(crate) fn default_active() -> bool {
    true
}

/// Request body for a partial product update.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProductRequest {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub sub: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub price: Option<f64>,
    #[serde(default)]
    pub cost_price: Option<f64>,
    #[serde(default)]
    pub stock_quantity: Option<i64>,
    #[serde(default)]
    pub low_stock_threshold: Option<i64>,
    #[serde(default)]
    pub is_active: Option<bool>,
    #[serde(default)]
    pub order: Option<i64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stock_status_boundaries() {
        assert_eq!(StockStatus::classify(0, 5), StockStatus::OutOfStock);
        assert_eq!(StockStatus::classify(-2, 5), StockStatus::OutOfStock);
        assert_eq!(StockStatus::classify(5, 5), StockStatus::LowStock);
        assert_eq!(StockStatus::classify(6, 5), StockStatus::InStock);
    }

    #[test]
    fn test_profit_margin() {
        assert_eq!(profit_margin(100.0, 0.0), 0.0);
        assert_eq!(profit_margin(100.0, 40.0), 60.0);
        assert_eq!(profit_margin(30.0, 20.0), 33.3);
    }

    #[test]
    fn test_create_request_defaults() {
        let req: CreateProductRequest =
            serde_json::from_str(r#"{"name":"BPC-157","sub":"Lyophilized","price":45}"#).unwrap();
        assert_eq!(req.category, "");
        assert_eq!(req.stock_quantity, 0);
        assert_eq!(req.low_stock_threshold, 5);
        assert!(req.is_active);
    }
}
