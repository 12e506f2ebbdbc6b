//! BioVibe storefront backend
//!
//! REST backend for the peptide order form and admin console, with SQLite
//! persistence, Tantivy product search, SMTP email and PDF documents.

mod api;
mod auth;
mod config;
mod db;
mod documents;
mod errors;
mod models;
mod notify;
mod search;

use std::sync::Arc;

use axum::{
    middleware,
    routing::{get, post},
    Router,
};
use clap::{Parser, Subcommand};
use tower::ServiceBuilder;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use config::Config;
use db::Repository;
use notify::Mailer;
use search::SearchIndex;

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    pub repo: Arc<Repository>,
    pub search: Arc<SearchIndex>,
    pub config: Arc<Config>,
    pub mailer: Arc<dyn Mailer>,
}

#[derive(Parser)]
#[command(name = "storefront", about = "BioVibe storefront backend")]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Run the HTTP server (default)
    Serve,
    /// Create the admin user, or reset its password if the email exists
    CreateAdmin {
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // Load configuration
    let config = Config::from_env()?;

    // Initialize logging
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log_level));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer())
        .init();

    match cli.command.unwrap_or(Command::Serve) {
        Command::Serve => serve(config).await,
        Command::CreateAdmin { email, password } => create_admin(config, &email, &password).await,
    }
}

async fn serve(config: Config) -> Result<(), Box<dyn std::error::Error>> {
    tracing::info!("Starting storefront backend");
    tracing::info!("Database path: {:?}", config.db_path);
    tracing::info!("Index path: {:?}", config.index_path);
    tracing::info!("Bind address: {}", config.bind_addr);

    if !config.mail.has_credentials() {
        tracing::warn!("No SMTP credentials configured (EMAIL_USER/EMAIL_PASS). Emails will only be logged!");
    }

    // Initialize database
    let pool = db::init_database(&config.db_path).await?;
    let repo = Arc::new(Repository::new(pool));

    // Initialize search index
    let search = Arc::new(SearchIndex::open(&config.index_path)?);

    tracing::info!("Building search index...");
    let products = repo.list_products().await?;
    search.rebuild(&products).await?;

    let mailer = notify::mailer_from_config(&config.mail)?;

    let state = AppState {
        repo,
        search,
        config: Arc::new(config.clone()),
        mailer,
    };

    let app = create_router(state);

    let listener = tokio::net::TcpListener::bind(&config.bind_addr).await?;
    tracing::info!("Server listening on {}", config.bind_addr);

    axum::serve(listener, app).await?;

    Ok(())
}

async fn create_admin(
    config: Config,
    email: &str,
    password: &str,
) -> Result<(), Box<dyn std::error::Error>> {
    let email = email.trim();
    if email.is_empty() || password.is_empty() {
        return Err("Email and password are required".into());
    }

    let pool = db::init_database(&config.db_path).await?;
    let repo = Repository::new(pool);

    let hash = auth::hash_password(password)?;
    let user = repo.upsert_admin_user(email, &hash).await?;

    tracing::info!("Admin user ready: {}", user.email);
    Ok(())
}

/// Create the application router with all routes.
pub fn create_router(state: AppState) -> Router {
    // CORS configuration
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let admin_token = state.config.admin_token.clone();

    // Storefront routes (no session required)
    let public_routes = Router::new()
        .route("/products", get(api::list_products))
        .route("/products/search", get(api::search_products))
        .route("/products/{id}", get(api::get_product))
        .route("/categories", get(api::list_categories))
        .route("/shipping", get(api::list_shipping_methods))
        .route("/orders", post(api::create_order))
        .route("/settings", get(api::get_settings))
        .route("/site-content", get(api::get_site_content))
        .route("/contact", post(api::submit_contact))
        .route("/auth/login", post(api::login))
        .route("/auth/logout", post(api::logout));

    // Admin console routes
    let admin_routes = Router::new()
        // Products
        .route("/products", post(api::create_product))
        .route(
            "/products/{id}",
            axum::routing::patch(api::update_product).delete(api::delete_product),
        )
        // Categories
        .route("/categories", post(api::create_category))
        .route(
            "/categories/{id}",
            axum::routing::patch(api::update_category).delete(api::delete_category),
        )
        // Shipping
        .route("/shipping", post(api::create_shipping_method))
        .route(
            "/shipping/{id}",
            axum::routing::patch(api::update_shipping_method).delete(api::delete_shipping_method),
        )
        // Orders
        .route("/orders", get(api::list_orders))
        .route("/orders/resend-invoice", post(api::resend_invoice))
        .route(
            "/orders/{id}",
            get(api::get_order)
                .patch(api::update_order)
                .delete(api::delete_order),
        )
        .route("/orders/{id}/send-payment-link", post(api::send_payment_link))
        .route("/orders/{id}/invoice.pdf", get(api::invoice_pdf))
        .route("/orders/{id}/purchase-order.pdf", get(api::purchase_order_pdf))
        // Settings & content
        .route("/settings", post(api::save_settings))
        .route("/site-content", axum::routing::put(api::update_site_content))
        // Credentials
        .route(
            "/auth/credentials",
            get(api::get_credentials).put(api::update_credentials),
        )
        // Reports
        .route("/reports/inventory", get(api::inventory_report))
        .route("/reports/profit", get(api::profit_report))
        // Cookie gate applies to matched admin routes only
        .route_layer(middleware::from_fn(move |req, next| {
            auth::admin_auth_layer(admin_token.clone(), req, next)
        }));

    // Health check (no auth required)
    let health_routes = Router::new().route("/health", get(health_check));

    Router::new()
        .nest("/api", public_routes.merge(admin_routes))
        .merge(health_routes)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(cors),
        )
        .with_state(state)
}

/// Health check endpoint.
async fn health_check() -> &'static str {
    "OK"
}
