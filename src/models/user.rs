//! Admin user and auth request bodies.

use serde::{Deserialize, Serialize};

/// The admin account. The password hash never leaves the repository.
#[derive(Debug, Clone)]
pub struct AdminUser {
    pub id: String,
    pub email: String,
    pub password_hash: String,
}

/// Body of `POST /api/auth/login`.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

/// Body of `PUT /api/auth/credentials`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateCredentialsRequest {
    #[serde(default)]
    pub current_password: String,
    #[serde(default)]
    pub new_email: Option<String>,
    #[serde(default)]
    pub new_password: Option<String>,
}

/// Response of `GET /api/auth/credentials`.
#[derive(Debug, Serialize)]
pub struct CredentialsInfo {
    pub email: String,
}

/// Body of `POST /api/contact`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContactRequest {
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub message: String,
}
