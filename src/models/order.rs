//! Order model for the secure order form.

use serde::{Deserialize, Serialize};

/// Processing fee applied to every order subtotal.
pub const PROCESSING_FEE_RATE: f64 = 0.05;

/// Shipping option recorded when the customer picks none.
pub const DEFAULT_SHIPPING_OPTION: &str = "Standard Shipping";

/// Order lifecycle status. Any value may be set from any other.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    #[default]
    Pending,
    Confirmed,
    Shipped,
    Delivered,
    Cancelled,
}

impl OrderStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::Pending => "pending",
            OrderStatus::Confirmed => "confirmed",
            OrderStatus::Shipped => "shipped",
            OrderStatus::Delivered => "delivered",
            OrderStatus::Cancelled => "cancelled",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "pending" => Some(OrderStatus::Pending),
            "confirmed" => Some(OrderStatus::Confirmed),
            "shipped" => Some(OrderStatus::Shipped),
            "delivered" => Some(OrderStatus::Delivered),
            "cancelled" => Some(OrderStatus::Cancelled),
            _ => None,
        }
    }
}

/// Postal address an order ships to.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ShippingAddress {
    #[serde(default)]
    pub street: String,
    #[serde(default)]
    pub street2: Option<String>,
    #[serde(default)]
    pub city: String,
    #[serde(default)]
    pub state: String,
    #[serde(default)]
    pub zip: String,
    #[serde(default = "default_country")]
    pub country: String,
}

fn default_country() -> String {
    "USA".to_string()
}

impl Default for ShippingAddress {
    fn default() -> Self {
        Self {
            street: String::new(),
            street2: None,
            city: String::new(),
            state: String::new(),
            zip: String::new(),
            country: default_country(),
        }
    }
}

impl ShippingAddress {
    /// Non-empty address parts joined with ", ".
    pub fn one_line(&self) -> String {
        [
            Some(self.street.as_str()),
            self.street2.as_deref(),
            Some(self.city.as_str()),
            Some(self.state.as_str()),
            Some(self.zip.as_str()),
        ]
        .into_iter()
        .flatten()
        .filter(|part| !part.trim().is_empty())
        .collect::<Vec<_>>()
        .join(", ")
    }
}

/// A line on an order. `price` is the line total, not the unit price.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct OrderItem {
    #[serde(default)]
    pub product_id: Option<String>,
    pub name: String,
    pub quantity: i64,
    pub price: f64,
}

impl OrderItem {
    pub fn unit_price(&self) -> f64 {
        if self.quantity > 0 {
            self.price / self.quantity as f64
        } else {
            0.0
        }
    }
}

/// A submitted order.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub id: String,
    pub first_name: String,
    pub last_name: String,
    pub title: String,
    pub practice_name: String,
    pub email: String,
    pub phone: String,
    pub shipping_address: ShippingAddress,
    pub shipping_option: String,
    pub shipping_cost: f64,
    pub items: Vec<OrderItem>,
    pub subtotal: f64,
    pub processing_fee: f64,
    pub total: f64,
    pub status: OrderStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payment_link: Option<String>,
    pub notes: String,
    pub referral: String,
    pub created_at: String,
    pub updated_at: String,
}

impl Order {
    pub fn customer_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
            .trim()
            .to_string()
    }

    /// Short reference printed on invoices: the last `len` id characters, upper case.
    pub fn reference(&self, len: usize) -> String {
        let compact: String = self.id.chars().filter(|c| *c != '-').collect();
        let start = compact.len().saturating_sub(len);
        compact[start..].to_uppercase()
    }
}

/// Subtotal, fee and total for a set of line totals.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OrderTotals {
    pub subtotal: f64,
    pub processing_fee: f64,
    pub shipping_cost: f64,
    pub total: f64,
}

impl OrderTotals {
    pub fn compute(items: &[OrderItem], shipping_cost: f64) -> Self {
        let subtotal = round_cents(items.iter().map(|item| item.price).sum());
        Self::from_subtotal(subtotal, shipping_cost)
    }

    pub fn from_subtotal(subtotal: f64, shipping_cost: f64) -> Self {
        let processing_fee = round_cents(subtotal * PROCESSING_FEE_RATE);
        let shipping_cost = round_cents(shipping_cost);
        Self {
            subtotal,
            processing_fee,
            shipping_cost,
            total: round_cents(subtotal + processing_fee + shipping_cost),
        }
    }
}

/// Round a dollar amount to whole cents.
pub fn round_cents(amount: f64) -> f64 {
    (amount * 100.0).round() / 100.0
}

/// Format a dollar amount with thousands separators and two decimals, e.g. `1,234.50`.
pub fn format_money(amount: f64) -> String {
    let cents = (amount.abs() * 100.0).round() as u64;
    let whole = (cents / 100).to_string();
    let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
    for (i, ch) in whole.chars().enumerate() {
        if i > 0 && (whole.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    let sign = if amount < 0.0 && cents > 0 { "-" } else { "" };
    format!("{}{}.{:02}", sign, grouped, cents % 100)
}

/// Line item as submitted by the order form.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderItemInput {
    #[serde(default)]
    pub product_id: Option<String>,
    #[serde(default)]
    pub name: String,
    pub quantity: i64,
    #[serde(default)]
    pub price: f64,
}

/// Request body for submitting an order. Client-side totals are ignored.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateOrderRequest {
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub practice_name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub shipping_address: Option<ShippingAddress>,
    /// Either a shipping method id or a free-text option name
    #[serde(default)]
    pub shipping_option: Option<String>,
    #[serde(default)]
    pub shipping_cost: f64,
    #[serde(default)]
    pub items: Vec<OrderItemInput>,
    #[serde(default)]
    pub notes: String,
    #[serde(default)]
    pub referral: String,
}

/// Request body for a partial order update from the admin console.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateOrderRequest {
    #[serde(default)]
    pub status: Option<OrderStatus>,
    #[serde(default)]
    pub payment_link: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub referral: Option<String>,
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub practice_name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub shipping_address: Option<ShippingAddress>,
    #[serde(default)]
    pub shipping_option: Option<String>,
    /// Changing the shipping cost recomputes the total
    #[serde(default)]
    pub shipping_cost: Option<f64>,
}

/// Query parameters for listing orders.
#[derive(Debug, Default, Deserialize)]
pub struct OrderListQuery {
    #[serde(default)]
    pub status: Option<OrderStatus>,
}

/// Body of `POST /api/orders/{id}/send-payment-link`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SendPaymentLinkRequest {
    #[serde(default)]
    pub payment_link: String,
}

/// Body of `POST /api/orders/resend-invoice`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResendInvoiceRequest {
    #[serde(default)]
    pub order_id: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(price: f64, quantity: i64) -> OrderItem {
        OrderItem {
            product_id: None,
            name: "Item".to_string(),
            quantity,
            price,
        }
    }

    #[test]
    fn test_totals_include_fee_and_shipping() {
        let totals = OrderTotals::compute(&[item(100.0, 2), item(50.0, 1)], 15.0);
        assert_eq!(totals.subtotal, 150.0);
        assert_eq!(totals.processing_fee, 7.5);
        assert_eq!(totals.total, 172.5);
    }

    #[test]
    fn test_fee_rounds_to_cents() {
        let totals = OrderTotals::compute(&[item(12.34, 1)], 0.0);
        assert_eq!(totals.processing_fee, 0.62);
        assert_eq!(totals.total, 12.96);
    }

    #[test]
    fn test_format_money() {
        assert_eq!(format_money(0.0), "0.00");
        assert_eq!(format_money(7.5), "7.50");
        assert_eq!(format_money(1234.5), "1,234.50");
        assert_eq!(format_money(1234567.891), "1,234,567.89");
        assert_eq!(format_money(-12.0), "-12.00");
    }

    #[test]
    fn test_status_round_trip_names() {
        for status in [
            OrderStatus::Pending,
            OrderStatus::Confirmed,
            OrderStatus::Shipped,
            OrderStatus::Delivered,
            OrderStatus::Cancelled,
        ] {
            assert_eq!(OrderStatus::parse(status.as_str()), Some(status));
        }
        assert_eq!(OrderStatus::parse("refunded"), None);
    }

    #[test]
    fn test_address_one_line_skips_blanks() {
        let address = ShippingAddress {
            street: "1 Main St".to_string(),
            street2: Some(String::new()),
            city: "Austin".to_string(),
            state: "TX".to_string(),
            zip: "78701".to_string(),
            country: "USA".to_string(),
        };
        assert_eq!(address.one_line(), "1 Main St, Austin, TX, 78701");
    }

    #[test]
    fn test_reference_uses_id_tail() {
        let order: Order = serde_json::from_value(serde_json::json!({
            "id": "0f8fad5b-d9cb-469f-a165-70867728950e",
            "firstName": "Ada", "lastName": "Lovelace", "title": "", "practiceName": "Clinic",
            "email": "ada@example.com", "phone": "",
            "shippingAddress": {}, "shippingOption": "Standard Shipping", "shippingCost": 0.0,
            "items": [], "subtotal": 0.0, "processingFee": 0.0, "total": 0.0,
            "status": "pending", "notes": "", "referral": "",
            "createdAt": "2024-01-01T00:00:00Z", "updatedAt": "2024-01-01T00:00:00Z"
        }))
        .unwrap();
        assert_eq!(order.reference(8), "7728950E");
        assert_eq!(order.reference(6), "28950E");
        assert_eq!(order.customer_name(), "Ada Lovelace");
    }
}
