//! Admin login, logout and credential management.

use axum::{
    extract::State,
    http::header,
    response::{IntoResponse, Response},
};

use super::{message, success, ApiJson, ApiResult, MessageResponse};
use crate::auth::{clear_cookie, hash_password, session_cookie, verify_password};
use crate::errors::AppError;
use crate::models::{CredentialsInfo, LoginRequest, UpdateCredentialsRequest};
use crate::AppState;

/// POST /api/auth/login - Check credentials and open an admin session.
pub async fn login(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<LoginRequest>,
) -> Result<Response, AppError> {
    let user = state.repo.find_user_by_email(request.email.trim()).await?;

    let verified = user
        .as_ref()
        .is_some_and(|u| verify_password(&request.password, &u.password_hash));
    if !verified {
        tracing::warn!(email = %request.email.trim(), "Failed admin login");
        return Err(AppError::Unauthorized("Invalid credentials".to_string()));
    }

    tracing::info!(email = %request.email.trim(), "Admin logged in");
    let cookie = session_cookie(&state.config.admin_token, state.config.cookie_secure);
    Ok((
        [(header::SET_COOKIE, cookie)],
        message("Logged in")?,
    )
        .into_response())
}

/// POST /api/auth/logout - End the admin session.
pub async fn logout() -> Result<Response, AppError> {
    Ok(([(header::SET_COOKIE, clear_cookie())], message("Logged out")?).into_response())
}

/// GET /api/auth/credentials - Email of the admin account.
pub async fn get_credentials(State(state): State<AppState>) -> ApiResult<CredentialsInfo> {
    let user = state
        .repo
        .get_admin_user()
        .await?
        .ok_or_else(|| AppError::NotFound("No admin user found".to_string()))?;

    success(CredentialsInfo { email: user.email })
}

/// PUT /api/auth/credentials - Change the admin email and/or password.
pub async fn update_credentials(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<UpdateCredentialsRequest>,
) -> ApiResult<MessageResponse> {
    let user = state
        .repo
        .get_admin_user()
        .await?
        .ok_or_else(|| AppError::NotFound("No admin user found".to_string()))?;

    if !verify_password(&request.current_password, &user.password_hash) {
        return Err(AppError::Unauthorized(
            "Current password is incorrect".to_string(),
        ));
    }

    let email = request
        .new_email
        .as_deref()
        .map(str::trim)
        .filter(|e| !e.is_empty())
        .unwrap_or(&user.email)
        .to_string();

    let password_hash = match request.new_password.as_deref().filter(|p| !p.is_empty()) {
        Some(new_password) => hash_password(new_password)?,
        None => user.password_hash.clone(),
    };

    state
        .repo
        .update_user_credentials(&user.id, &email, &password_hash)
        .await?;

    tracing::info!(email = %email, "Admin credentials updated");
    message("Credentials updated successfully")
}
