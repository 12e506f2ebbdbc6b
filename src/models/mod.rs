//! Data models for the storefront.
//!
//! Field names serialize in camelCase to match the order form and admin console.

mod category;
mod order;
mod product;
mod report;
mod settings;
mod shipping;
mod user;

pub use category::*;
pub use order::*;
pub use product::*;
pub use report::*;
pub use settings::*;
pub use shipping::*;
pub use user::*;
