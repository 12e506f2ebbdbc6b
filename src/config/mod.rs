//! Configuration module for the storefront backend.
//!
//! All configuration is loaded from environment variables with sensible defaults.

use std::env;
use std::net::{AddrParseError, SocketAddr};
use std::path::PathBuf;

/// Default value of the admin session cookie.
pub const DEFAULT_ADMIN_TOKEN: &str = "logged_in";

/// Outbound mail relay settings.
#[derive(Debug, Clone)]
pub struct MailConfig {
    /// SMTP relay host (implicit TLS)
    pub smtp_host: String,
    /// SMTP relay port
    pub smtp_port: u16,
    /// Relay username; mail is only logged when this or the password is missing
    pub smtp_user: Option<String>,
    pub smtp_pass: Option<String>,
    /// Sender address
    pub from_address: String,
    /// Sender display name
    pub from_name: String,
    /// Recipient of order alerts and contact form messages
    pub admin_alert_address: String,
}

impl MailConfig {
    /// Whether relay credentials are present.
    pub fn has_credentials(&self) -> bool {
        self.smtp_user.is_some() && self.smtp_pass.is_some()
    }
}

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    /// Path to SQLite database file
    pub db_path: PathBuf,
    /// Path to Tantivy product index directory
    pub index_path: PathBuf,
    /// Address to bind the server to
    pub bind_addr: SocketAddr,
    /// Log level (trace, debug, info, warn, error)
    pub log_level: String,
    /// Expected value of the `admin_token` cookie
    pub admin_token: String,
    /// Mark the session cookie `Secure`
    pub cookie_secure: bool,
    pub mail: MailConfig,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, AddrParseError> {
        dotenvy::dotenv().ok();

        let db_path = env::var("STOREFRONT_DB_PATH")
            .unwrap_or_else(|_| "./data/storefront.sqlite".to_string())
            .into();

        let index_path = env::var("STOREFRONT_INDEX_PATH")
            .unwrap_or_else(|_| "./data/index".to_string())
            .into();

        let bind_addr = env::var("STOREFRONT_BIND_ADDR")
            .unwrap_or_else(|_| "127.0.0.1:8080".to_string())
            .parse()?;

        let log_level = env::var("STOREFRONT_LOG_LEVEL").unwrap_or_else(|_| "info".to_string());

        let admin_token = env::var("STOREFRONT_ADMIN_TOKEN")
            .ok()
            .filter(|t| !t.is_empty())
            .unwrap_or_else(|| DEFAULT_ADMIN_TOKEN.to_string());

        let cookie_secure = env::var("STOREFRONT_COOKIE_SECURE")
            .map(|v| matches!(v.as_str(), "1" | "true" | "yes"))
            .unwrap_or(false);

        let smtp_port = env::var("SMTP_PORT")
            .ok()
            .and_then(|p| p.parse().ok())
            .unwrap_or(465);

        let mail = MailConfig {
            smtp_host: env::var("SMTP_HOST").unwrap_or_else(|_| "smtp0001.neo.space".to_string()),
            smtp_port,
            smtp_user: env::var("EMAIL_USER").ok(),
            smtp_pass: env::var("EMAIL_PASS").ok(),
            from_address: env::var("MAIL_FROM")
                .unwrap_or_else(|_| "support@biovibepeptides.com".to_string()),
            from_name: env::var("MAIL_FROM_NAME")
                .unwrap_or_else(|_| "BioVibe Peptides".to_string()),
            admin_alert_address: env::var("ADMIN_ALERT_EMAIL")
                .unwrap_or_else(|_| "support@biovibepeptides.com".to_string()),
        };

        Ok(Self {
            db_path,
            index_path,
            bind_addr,
            log_level,
            admin_token,
            cookie_secure,
            mail,
        })
    }
}
