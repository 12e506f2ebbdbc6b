//! Admin dashboard summaries computed from products and orders.

use std::collections::HashMap;

use serde::Serialize;

use super::{round_cents, Order, Product, StockStatus};

/// A product that is low on or out of stock.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StockAlert {
    pub product_id: String,
    pub name: String,
    pub stock_quantity: i64,
    pub low_stock_threshold: i64,
    pub stock_status: StockStatus,
}

/// Stock levels across the catalogue.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InventoryReport {
    pub in_stock: usize,
    pub low_stock: usize,
    pub out_of_stock: usize,
    pub attention: Vec<StockAlert>,
}

impl InventoryReport {
    pub fn from_products(products: &[Product]) -> Self {
        let mut report = Self {
            in_stock: 0,
            low_stock: 0,
            out_of_stock: 0,
            attention: Vec::new(),
        };

        for product in products {
            let status = StockStatus::classify(product.stock_quantity, product.low_stock_threshold);
            match status {
                StockStatus::InStock => report.in_stock += 1,
                StockStatus::LowStock => report.low_stock += 1,
                StockStatus::OutOfStock => report.out_of_stock += 1,
            }
            if status != StockStatus::InStock {
                report.attention.push(StockAlert {
                    product_id: product.id.clone(),
                    name: product.name.clone(),
                    stock_quantity: product.stock_quantity,
                    low_stock_threshold: product.low_stock_threshold,
                    stock_status: status,
                });
            }
        }

        report
    }
}

/// Revenue, cost and inventory valuation.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfitReport {
    pub total_revenue: f64,
    pub total_cogs: f64,
    pub net_profit: f64,
    /// Net profit as a percentage of revenue
    pub profit_margin: f64,
    pub inventory_cost_value: f64,
    pub inventory_retail_value: f64,
    pub potential_profit: f64,
    pub order_count: usize,
}

impl ProfitReport {
    /// Cost of goods uses each product's current cost price; lines for
    /// deleted or unlinked products count as zero cost.
    pub fn compute(orders: &[Order], products: &[Product]) -> Self {
        let cost_by_id: HashMap<&str, f64> = products
            .iter()
            .map(|p| (p.id.as_str(), p.cost_price))
            .collect();

        let total_revenue: f64 = orders.iter().map(|o| o.total).sum();
        let total_cogs: f64 = orders
            .iter()
            .flat_map(|o| o.items.iter())
            .map(|item| {
                let cost = item
                    .product_id
                    .as_deref()
                    .and_then(|id| cost_by_id.get(id))
                    .copied()
                    .unwrap_or(0.0);
                cost * item.quantity as f64
            })
            .sum();

        let net_profit = total_revenue - total_cogs;
        let profit_margin = if total_revenue > 0.0 {
            ((net_profit / total_revenue) * 1000.0).round() / 10.0
        } else {
            0.0
        };

        let inventory_cost_value: f64 = products
            .iter()
            .map(|p| p.cost_price * p.stock_quantity.max(0) as f64)
            .sum();
        let inventory_retail_value: f64 = products
            .iter()
            .map(|p| p.price * p.stock_quantity.max(0) as f64)
            .sum();

        Self {
            total_revenue: round_cents(total_revenue),
            total_cogs: round_cents(total_cogs),
            net_profit: round_cents(net_profit),
            profit_margin,
            inventory_cost_value: round_cents(inventory_cost_value),
            inventory_retail_value: round_cents(inventory_retail_value),
            potential_profit: round_cents(inventory_retail_value - inventory_cost_value),
            order_count: orders.len(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{OrderItem, OrderStatus, ShippingAddress};

    fn product(id: &str, price: f64, cost: f64, stock: i64) -> Product {
        Product {
            id: id.to_string(),
            name: format!("Product {}", id),
            sub: "Lyophilized".to_string(),
            category: String::new(),
            price,
            cost_price: cost,
            stock_quantity: stock,
            low_stock_threshold: 5,
            is_active: true,
            order: 0,
            created_at: String::new(),
            updated_at: String::new(),
            profit_margin: 0.0,
            stock_status: StockStatus::InStock,
        }
        .with_derived()
    }

    fn order(total: f64, items: Vec<OrderItem>) -> Order {
        Order {
            id: "o".to_string(),
            first_name: String::new(),
            last_name: String::new(),
            title: String::new(),
            practice_name: "Clinic".to_string(),
            email: "a@b.c".to_string(),
            phone: String::new(),
            shipping_address: ShippingAddress::default(),
            shipping_option: String::new(),
            shipping_cost: 0.0,
            items,
            subtotal: total,
            processing_fee: 0.0,
            total,
            status: OrderStatus::Pending,
            payment_link: None,
            notes: String::new(),
            referral: String::new(),
            created_at: String::new(),
            updated_at: String::new(),
        }
    }

    #[test]
    fn test_inventory_counts() {
        let products = vec![
            product("a", 10.0, 0.0, 20),
            product("b", 10.0, 0.0, 3),
            product("c", 10.0, 0.0, 0),
        ];
        let report = InventoryReport::from_products(&products);
        assert_eq!(report.in_stock, 1);
        assert_eq!(report.low_stock, 1);
        assert_eq!(report.out_of_stock, 1);
        assert_eq!(report.attention.len(), 2);
    }

    #[test]
    fn test_profit_uses_cost_price() {
        let products = vec![product("a", 50.0, 20.0, 10)];
        let orders = vec![order(
            100.0,
            vec![OrderItem {
                product_id: Some("a".to_string()),
                name: "A".to_string(),
                quantity: 2,
                price: 100.0,
            }],
        )];
        let report = ProfitReport::compute(&orders, &products);
        assert_eq!(report.total_revenue, 100.0);
        assert_eq!(report.total_cogs, 40.0);
        assert_eq!(report.net_profit, 60.0);
        assert_eq!(report.profit_margin, 60.0);
        assert_eq!(report.inventory_cost_value, 200.0);
        assert_eq!(report.inventory_retail_value, 500.0);
        assert_eq!(report.potential_profit, 300.0);
    }

    #[test]
    fn test_profit_with_no_orders() {
        let report = ProfitReport::compute(&[], &[]);
        assert_eq!(report.profit_margin, 0.0);
        assert_eq!(report.order_count, 0);
    }
}
