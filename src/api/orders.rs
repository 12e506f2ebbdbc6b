//! Order API endpoints: public checkout plus admin order management.

use axum::{
    extract::{Path, State},
    http::header,
    response::{IntoResponse, Response},
};

use super::{
    created, message, non_negative, require, success, ApiJson, ApiQuery, ApiResult,
    MessageResponse,
};
use crate::documents::{render_invoice, render_purchase_order};
use crate::errors::AppError;
use crate::models::{
    CreateOrderRequest, Order, OrderListQuery, ResendInvoiceRequest, SendPaymentLinkRequest,
    UpdateOrderRequest,
};
use crate::notify::{admin_alert_email, invoice_email, order_confirmation_email, payment_link_email};
use crate::AppState;

/// POST /api/orders - Submit an order from the secure order form.
pub async fn create_order(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<CreateOrderRequest>,
) -> ApiResult<Order> {
    validate_new_order(&request)?;

    let order = state.repo.place_order(&request).await?;
    tracing::info!(
        order_id = %order.id,
        total = order.total,
        items = order.items.len(),
        "Order placed"
    );

    // Stock changes may move products in or out of search results
    for product_id in order.items.iter().filter_map(|i| i.product_id.as_deref()) {
        if let Ok(Some(product)) = state.repo.get_product(product_id).await {
            if let Err(e) = state.search.index_product(&product).await {
                tracing::warn!("Failed to re-index product {}: {}", product_id, e);
            }
        }
    }

    // The order stands even when the confirmation cannot be delivered
    match order_confirmation_email(&order, &state.config.mail) {
        Ok(email) => {
            if let Err(e) = state.mailer.send(email).await {
                tracing::warn!(order_id = %order.id, "Failed to send order confirmation: {}", e);
            }
        }
        Err(e) => tracing::warn!(order_id = %order.id, "Failed to render order confirmation: {}", e),
    }

    let mailer = state.mailer.clone();
    let config = state.config.clone();
    let alert_order = order.clone();
    tokio::spawn(async move {
        let result = match admin_alert_email(&alert_order, &config.mail) {
            Ok(email) => mailer.send(email).await,
            Err(e) => Err(e),
        };
        if let Err(e) = result {
            tracing::error!(order_id = %alert_order.id, "Admin alert failed: {}", e);
        }
    });

    created(order)
}

/// GET /api/orders - List orders, newest first.
pub async fn list_orders(
    State(state): State<AppState>,
    ApiQuery(query): ApiQuery<OrderListQuery>,
) -> ApiResult<Vec<Order>> {
    success(state.repo.list_orders(query.status).await?)
}

/// GET /api/orders/:id - Get a single order.
pub async fn get_order(State(state): State<AppState>, Path(id): Path<String>) -> ApiResult<Order> {
    success(find_order(&state, &id).await?)
}

/// PATCH /api/orders/:id - Partially update an order.
pub async fn update_order(
    State(state): State<AppState>,
    Path(id): Path<String>,
    ApiJson(request): ApiJson<UpdateOrderRequest>,
) -> ApiResult<Order> {
    if let Some(cost) = request.shipping_cost {
        non_negative(cost, "Shipping cost")?;
    }
    if let Some(email) = &request.email {
        validate_email(email)?;
    }

    let order = state.repo.update_order(&id, &request).await?;
    tracing::info!(order_id = %id, status = order.status.as_str(), "Order updated");
    success(order)
}

/// DELETE /api/orders/:id - Delete an order. Stock is not restored.
pub async fn delete_order(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<serde_json::Value> {
    state.repo.delete_order(&id).await?;
    tracing::info!(order_id = %id, "Order deleted");
    success(serde_json::json!({}))
}

/// POST /api/orders/:id/send-payment-link - Store a payment link and email it.
pub async fn send_payment_link(
    State(state): State<AppState>,
    Path(id): Path<String>,
    ApiJson(request): ApiJson<SendPaymentLinkRequest>,
) -> ApiResult<MessageResponse> {
    require(&request.payment_link, "Payment link is required")?;
    let payment_link = request.payment_link.trim();

    let order = state.repo.set_payment_link(&id, payment_link).await?;
    let email = payment_link_email(&order, payment_link, &state.config.mail)?;
    state.mailer.send(email).await?;

    tracing::info!(order_id = %id, "Payment link sent");
    message("Payment link sent successfully")
}

/// POST /api/orders/resend-invoice - Email the invoice PDF to the customer.
pub async fn resend_invoice(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<ResendInvoiceRequest>,
) -> ApiResult<MessageResponse> {
    require(&request.order_id, "Order ID is required")?;

    let order = find_order(&state, request.order_id.trim()).await?;
    let vendor = state.repo.get_vendor_settings().await?;
    let pdf = render_invoice(&order, &vendor)?;
    let email = invoice_email(&order, pdf, &state.config.mail)?;
    state.mailer.send(email).await?;

    tracing::info!(order_id = %order.id, "Invoice resent");
    message("Invoice sent successfully")
}

/// GET /api/orders/:id/invoice.pdf - Download the invoice.
pub async fn invoice_pdf(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Response, AppError> {
    let order = find_order(&state, &id).await?;
    let vendor = state.repo.get_vendor_settings().await?;
    let pdf = render_invoice(&order, &vendor)?;
    Ok(pdf_response(pdf, &format!("Invoice-{}.pdf", order.reference(8))))
}

/// GET /api/orders/:id/purchase-order.pdf - Download the purchase order memo.
pub async fn purchase_order_pdf(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Response, AppError> {
    let order = find_order(&state, &id).await?;
    let vendor = state.repo.get_vendor_settings().await?;
    let pdf = render_purchase_order(&order, &vendor)?;
    Ok(pdf_response(
        pdf,
        &format!("PurchaseOrder-{}.pdf", order.reference(6)),
    ))
}

async fn find_order(state: &AppState, id: &str) -> Result<Order, AppError> {
    state
        .repo
        .get_order(id)
        .await?
        .ok_or_else(|| AppError::NotFound("Order not found".to_string()))
}

fn pdf_response(pdf: Vec<u8>, filename: &str) -> Response {
    (
        [
            (header::CONTENT_TYPE, "application/pdf".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{}\"", filename),
            ),
        ],
        pdf,
    )
        .into_response()
}

fn validate_email(email: &str) -> Result<(), AppError> {
    let email = email.trim();
    match email.split_once('@') {
        Some((local, domain)) if !local.is_empty() && domain.contains('.') => Ok(()),
        _ => Err(AppError::Validation("A valid email is required".to_string())),
    }
}

fn validate_new_order(request: &CreateOrderRequest) -> Result<(), AppError> {
    require(&request.practice_name, "Practice name is required")?;
    require(&request.email, "Email is required")?;
    validate_email(&request.email)?;
    non_negative(request.shipping_cost, "Shipping cost")?;

    if request.items.is_empty() {
        return Err(AppError::Validation(
            "Order must contain at least one item".to_string(),
        ));
    }

    for item in &request.items {
        if item.quantity <= 0 {
            return Err(AppError::Validation(
                "Item quantity must be at least 1".to_string(),
            ));
        }
        let linked = item
            .product_id
            .as_deref()
            .is_some_and(|id| !id.trim().is_empty());
        if !linked {
            require(&item.name, "Each item needs a product or a name")?;
            non_negative(item.price, "Item price")?;
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(body: serde_json::Value) -> CreateOrderRequest {
        serde_json::from_value(body).unwrap()
    }

    #[test]
    fn test_new_order_requires_items() {
        let req = request(serde_json::json!({
            "practiceName": "Clinic", "email": "a@example.com", "items": []
        }));
        assert!(matches!(validate_new_order(&req), Err(AppError::Validation(_))));
    }

    #[test]
    fn test_new_order_rejects_zero_quantity() {
        let req = request(serde_json::json!({
            "practiceName": "Clinic", "email": "a@example.com",
            "items": [{ "productId": "p1", "quantity": 0 }]
        }));
        assert!(validate_new_order(&req).is_err());
    }

    #[test]
    fn test_unlinked_item_needs_name() {
        let req = request(serde_json::json!({
            "practiceName": "Clinic", "email": "a@example.com",
            "items": [{ "quantity": 1, "price": 10.0 }]
        }));
        assert!(validate_new_order(&req).is_err());

        let req = request(serde_json::json!({
            "practiceName": "Clinic", "email": "a@example.com",
            "items": [{ "name": "Custom blend", "quantity": 1, "price": 10.0 }]
        }));
        assert!(validate_new_order(&req).is_ok());
    }

    #[test]
    fn test_validate_email() {
        assert!(validate_email("ada@example.com").is_ok());
        assert!(validate_email("ada@localhost").is_err());
        assert!(validate_email("@example.com").is_err());
        assert!(validate_email("ada").is_err());
    }
}
