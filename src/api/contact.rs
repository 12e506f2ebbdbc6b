//! Public contact form.

use axum::extract::State;

use super::{message, ApiJson, ApiResult, MessageResponse};
use crate::errors::AppError;
use crate::models::ContactRequest;
use crate::notify::contact_email;
use crate::AppState;

/// POST /api/contact - Forward a contact form message to the shop owner.
pub async fn submit_contact(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<ContactRequest>,
) -> ApiResult<MessageResponse> {
    let fields = [
        &request.first_name,
        &request.last_name,
        &request.email,
        &request.message,
    ];
    if fields.iter().any(|f| f.trim().is_empty()) {
        return Err(AppError::Validation("All fields are required".to_string()));
    }

    let delivered = match contact_email(&request, &state.config.mail) {
        Ok(email) => state.mailer.send(email).await,
        Err(e) => Err(e),
    };

    if let Err(e) = delivered {
        tracing::error!("Contact form error: {}", e);
        return Err(AppError::Mail("Failed to send message".to_string()));
    }

    message("Message sent successfully")
}
