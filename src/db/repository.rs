//! Database repository for CRUD operations.
//!
//! Uses prepared statements throughout; order placement runs in a single
//! transaction so stock and the order row change together.

use chrono::Utc;
use sqlx::{Row, SqlitePool};

use crate::errors::AppError;
use crate::models::{
    round_cents, AdminUser, Category, CreateCategoryRequest, CreateOrderRequest,
    CreateProductRequest, CreateShippingMethodRequest, Order, OrderItem, OrderStatus, OrderTotals,
    Product, ShippingAddress, ShippingMethod, SiteContent, StockStatus, UpdateCategoryRequest,
    UpdateOrderRequest, UpdateProductRequest, UpdateShippingMethodRequest, VendorSettings,
    DEFAULT_SHIPPING_OPTION, VENDOR_SETTINGS_KEY,
};

const PRODUCT_COLUMNS: &str = "id, name, sub, category, price, cost_price, stock_quantity, \
     low_stock_threshold, is_active, sort_order, created_at, updated_at";

const CATEGORY_COLUMNS: &str = "id, name, sort_order, is_active, created_at, updated_at";

const SHIPPING_COLUMNS: &str = "id, name, price, delivery_time, is_active, created_at, updated_at";

const ORDER_COLUMNS: &str = "id, first_name, last_name, title, practice_name, email, phone, \
     shipping_address, shipping_option, shipping_cost, items, subtotal, processing_fee, total, \
     status, payment_link, notes, referral, created_at, updated_at";

/// Database repository for all data operations.
#[derive(Clone)]
pub struct Repository {
    pool: SqlitePool,
}

impl Repository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    // ==================== PRODUCT OPERATIONS ====================

    /// List all products, display order first and newest first within an order slot.
    pub async fn list_products(&self) -> Result<Vec<Product>, AppError> {
        let rows = sqlx::query(&format!(
            "SELECT {} FROM products ORDER BY sort_order ASC, created_at DESC",
            PRODUCT_COLUMNS
        ))
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.iter().map(product_from_row).collect())
    }

    /// Get a product by ID.
    pub async fn get_product(&self, id: &str) -> Result<Option<Product>, AppError> {
        let row = sqlx::query(&format!(
            "SELECT {} FROM products WHERE id = ?",
            PRODUCT_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.as_ref().map(product_from_row))
    }

    /// Create a new product.
    pub async fn create_product(&self, request: &CreateProductRequest) -> Result<Product, AppError> {
        let id = uuid::Uuid::new_v4().to_string();
        let now = Utc::now().to_rfc3339();

        sqlx::query(
            "INSERT INTO products (id, name, sub, category, price, cost_price, stock_quantity, low_stock_threshold, is_active, sort_order, created_at, updated_at) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)"
        )
        .bind(&id)
        .bind(request.name.trim())
        .bind(request.sub.trim())
        .bind(request.category.trim())
        .bind(request.price)
        .bind(request.cost_price)
        .bind(request.stock_quantity)
        .bind(request.low_stock_threshold)
        .bind(request.is_active as i32)
        .bind(request.order)
        .bind(&now)
        .bind(&now)
        .execute(&self.pool)
        .await?;

        Ok(Product {
            id,
            name: request.name.trim().to_string(),
            sub: request.sub.trim().to_string(),
            category: request.category.trim().to_string(),
            price: request.price,
            cost_price: request.cost_price,
            stock_quantity: request.stock_quantity,
            low_stock_threshold: request.low_stock_threshold,
            is_active: request.is_active,
            order: request.order,
            created_at: now.clone(),
            updated_at: now,
            profit_margin: 0.0,
            stock_status: StockStatus::InStock,
        }
        .with_derived())
    }

    /// Apply a partial update to a product.
    pub async fn update_product(
        &self,
        id: &str,
        request: &UpdateProductRequest,
    ) -> Result<Product, AppError> {
        let existing = self
            .get_product(id)
            .await?
            .ok_or_else(|| AppError::NotFound("Product not found".to_string()))?;

        let now = Utc::now().to_rfc3339();
        let updated = Product {
            name: request
                .name
                .as_deref()
                .map(|s| s.trim().to_string())
                .unwrap_or(existing.name),
            sub: request
                .sub
                .as_deref()
                .map(|s| s.trim().to_string())
                .unwrap_or(existing.sub),
            category: request
                .category
                .as_deref()
                .map(|s| s.trim().to_string())
                .unwrap_or(existing.category),
            price: request.price.unwrap_or(existing.price),
            cost_price: request.cost_price.unwrap_or(existing.cost_price),
            stock_quantity: request.stock_quantity.unwrap_or(existing.stock_quantity),
            low_stock_threshold: request
                .low_stock_threshold
                .unwrap_or(existing.low_stock_threshold),
            is_active: request.is_active.unwrap_or(existing.is_active),
            order: request.order.unwrap_or(existing.order),
            updated_at: now,
            ..existing
        }
        .with_derived();

        sqlx::query(
            "UPDATE products SET name = ?, sub = ?, category = ?, price = ?, cost_price = ?, stock_quantity = ?, low_stock_threshold = ?, is_active = ?, sort_order = ?, updated_at = ? WHERE id = ?"
        )
        .bind(&updated.name)
        .bind(&updated.sub)
        .bind(&updated.category)
        .bind(updated.price)
        .bind(updated.cost_price)
        .bind(updated.stock_quantity)
        .bind(updated.low_stock_threshold)
        .bind(updated.is_active as i32)
        .bind(updated.order)
        .bind(&updated.updated_at)
        .bind(id)
        .execute(&self.pool)
        .await?;

        Ok(updated)
    }

    /// Delete a product.
    pub async fn delete_product(&self, id: &str) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM products WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Product not found".to_string()));
        }
        Ok(())
    }

    // ==================== CATEGORY OPERATIONS ====================

    /// List categories by display order then name.
    pub async fn list_categories(&self, include_inactive: bool) -> Result<Vec<Category>, AppError> {
        let filter = if include_inactive {
            ""
        } else {
            "WHERE is_active = 1"
        };
        let rows = sqlx::query(&format!(
            "SELECT {} FROM categories {} ORDER BY sort_order ASC, name ASC",
            CATEGORY_COLUMNS, filter
        ))
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.iter().map(category_from_row).collect())
    }

    /// Get a category by ID.
    pub async fn get_category(&self, id: &str) -> Result<Option<Category>, AppError> {
        let row = sqlx::query(&format!(
            "SELECT {} FROM categories WHERE id = ?",
            CATEGORY_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.as_ref().map(category_from_row))
    }

    /// Create a new category. Duplicate names are a conflict.
    pub async fn create_category(
        &self,
        request: &CreateCategoryRequest,
    ) -> Result<Category, AppError> {
        let id = uuid::Uuid::new_v4().to_string();
        let now = Utc::now().to_rfc3339();
        let name = request.name.trim().to_string();

        sqlx::query(
            "INSERT INTO categories (id, name, sort_order, is_active, created_at, updated_at) VALUES (?, ?, ?, ?, ?, ?)"
        )
        .bind(&id)
        .bind(&name)
        .bind(request.order)
        .bind(request.is_active as i32)
        .bind(&now)
        .bind(&now)
        .execute(&self.pool)
        .await
        .map_err(category_conflict)?;

        Ok(Category {
            id,
            name,
            order: request.order,
            is_active: request.is_active,
            created_at: now.clone(),
            updated_at: now,
        })
    }

    /// Apply a partial update to a category.
    pub async fn update_category(
        &self,
        id: &str,
        request: &UpdateCategoryRequest,
    ) -> Result<Category, AppError> {
        let existing = self
            .get_category(id)
            .await?
            .ok_or_else(|| AppError::NotFound("Category not found".to_string()))?;

        let updated = Category {
            name: request
                .name
                .as_deref()
                .map(|s| s.trim().to_string())
                .unwrap_or(existing.name),
            order: request.order.unwrap_or(existing.order),
            is_active: request.is_active.unwrap_or(existing.is_active),
            updated_at: Utc::now().to_rfc3339(),
            ..existing
        };

        sqlx::query(
            "UPDATE categories SET name = ?, sort_order = ?, is_active = ?, updated_at = ? WHERE id = ?",
        )
        .bind(&updated.name)
        .bind(updated.order)
        .bind(updated.is_active as i32)
        .bind(&updated.updated_at)
        .bind(id)
        .execute(&self.pool)
        .await
        .map_err(category_conflict)?;

        Ok(updated)
    }

    /// Delete a category and return it.
    pub async fn delete_category(&self, id: &str) -> Result<Category, AppError> {
        let existing = self
            .get_category(id)
            .await?
            .ok_or_else(|| AppError::NotFound("Category not found".to_string()))?;

        sqlx::query("DELETE FROM categories WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(existing)
    }

    // ==================== SHIPPING OPERATIONS ====================

    /// List shipping methods, cheapest first.
    pub async fn list_shipping_methods(&self) -> Result<Vec<ShippingMethod>, AppError> {
        let rows = sqlx::query(&format!(
            "SELECT {} FROM shipping_methods ORDER BY price ASC, name ASC",
            SHIPPING_COLUMNS
        ))
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.iter().map(shipping_from_row).collect())
    }

    /// Get a shipping method by ID.
    pub async fn get_shipping_method(&self, id: &str) -> Result<Option<ShippingMethod>, AppError> {
        let row = sqlx::query(&format!(
            "SELECT {} FROM shipping_methods WHERE id = ?",
            SHIPPING_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.as_ref().map(shipping_from_row))
    }

    /// Create a new shipping method.
    pub async fn create_shipping_method(
        &self,
        request: &CreateShippingMethodRequest,
    ) -> Result<ShippingMethod, AppError> {
        let id = uuid::Uuid::new_v4().to_string();
        let now = Utc::now().to_rfc3339();

        sqlx::query(
            "INSERT INTO shipping_methods (id, name, price, delivery_time, is_active, created_at, updated_at) VALUES (?, ?, ?, ?, ?, ?, ?)"
        )
        .bind(&id)
        .bind(request.name.trim())
        .bind(request.price)
        .bind(request.delivery_time.trim())
        .bind(request.is_active as i32)
        .bind(&now)
        .bind(&now)
        .execute(&self.pool)
        .await?;

        Ok(ShippingMethod {
            id,
            name: request.name.trim().to_string(),
            price: request.price,
            delivery_time: request.delivery_time.trim().to_string(),
            is_active: request.is_active,
            created_at: now.clone(),
            updated_at: now,
        })
    }

    /// Apply a partial update to a shipping method.
    pub async fn update_shipping_method(
        &self,
        id: &str,
        request: &UpdateShippingMethodRequest,
    ) -> Result<ShippingMethod, AppError> {
        let existing = self
            .get_shipping_method(id)
            .await?
            .ok_or_else(|| AppError::NotFound("Method not found".to_string()))?;

        let updated = ShippingMethod {
            name: request
                .name
                .as_deref()
                .map(|s| s.trim().to_string())
                .unwrap_or(existing.name),
            price: request.price.unwrap_or(existing.price),
            delivery_time: request
                .delivery_time
                .as_deref()
                .map(|s| s.trim().to_string())
                .unwrap_or(existing.delivery_time),
            is_active: request.is_active.unwrap_or(existing.is_active),
            updated_at: Utc::now().to_rfc3339(),
            ..existing
        };

        sqlx::query(
            "UPDATE shipping_methods SET name = ?, price = ?, delivery_time = ?, is_active = ?, updated_at = ? WHERE id = ?",
        )
        .bind(&updated.name)
        .bind(updated.price)
        .bind(&updated.delivery_time)
        .bind(updated.is_active as i32)
        .bind(&updated.updated_at)
        .bind(id)
        .execute(&self.pool)
        .await?;

        Ok(updated)
    }

    /// Delete a shipping method.
    pub async fn delete_shipping_method(&self, id: &str) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM shipping_methods WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Method not found".to_string()));
        }
        Ok(())
    }

    // ==================== ORDER OPERATIONS ====================

    /// List orders newest first, optionally filtered by status.
    pub async fn list_orders(&self, status: Option<OrderStatus>) -> Result<Vec<Order>, AppError> {
        let rows = match status {
            Some(status) => {
                sqlx::query(&format!(
                    "SELECT {} FROM orders WHERE status = ? ORDER BY created_at DESC",
                    ORDER_COLUMNS
                ))
                .bind(status.as_str())
                .fetch_all(&self.pool)
                .await?
            }
            None => {
                sqlx::query(&format!(
                    "SELECT {} FROM orders ORDER BY created_at DESC",
                    ORDER_COLUMNS
                ))
                .fetch_all(&self.pool)
                .await?
            }
        };

        Ok(rows.iter().map(order_from_row).collect())
    }

    /// Get an order by ID.
    pub async fn get_order(&self, id: &str) -> Result<Option<Order>, AppError> {
        let row = sqlx::query(&format!("SELECT {} FROM orders WHERE id = ?", ORDER_COLUMNS))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(row.as_ref().map(order_from_row))
    }

    /// Place an order: resolve shipping, snapshot product names and prices,
    /// decrement stock and insert the order in one transaction.
    ///
    /// A product without enough stock aborts the whole order with a conflict.
    pub async fn place_order(&self, request: &CreateOrderRequest) -> Result<Order, AppError> {
        // IMMEDIATE: concurrent checkouts wait on the write lock instead of failing
        let mut tx = self.pool.begin_with("BEGIN IMMEDIATE").await?;
        let now = Utc::now().to_rfc3339();

        // Resolve the shipping option when it names a stored method
        let requested_option = request
            .shipping_option
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty());
        let (shipping_option, shipping_cost) = match requested_option {
            Some(option) => {
                let method = sqlx::query("SELECT name, price FROM shipping_methods WHERE id = ?")
                    .bind(option)
                    .fetch_optional(&mut *tx)
                    .await?;
                match method {
                    Some(row) => (row.get::<String, _>("name"), row.get::<f64, _>("price")),
                    None => (option.to_string(), request.shipping_cost),
                }
            }
            None => (DEFAULT_SHIPPING_OPTION.to_string(), request.shipping_cost),
        };

        let mut items = Vec::with_capacity(request.items.len());
        for input in &request.items {
            let product_id = input
                .product_id
                .as_deref()
                .map(str::trim)
                .filter(|s| !s.is_empty());

            let Some(product_id) = product_id else {
                items.push(OrderItem {
                    product_id: None,
                    name: input.name.trim().to_string(),
                    quantity: input.quantity,
                    price: round_cents(input.price),
                });
                continue;
            };

            let product = sqlx::query("SELECT name, price FROM products WHERE id = ?")
                .bind(product_id)
                .fetch_optional(&mut *tx)
                .await?
                .ok_or_else(|| AppError::Validation(format!("Product {} not found", product_id)))?;
            let name: String = product.get("name");
            let unit_price: f64 = product.get("price");

            let decremented = sqlx::query(
                "UPDATE products SET stock_quantity = stock_quantity - ?, updated_at = ? WHERE id = ? AND stock_quantity >= ?",
            )
            .bind(input.quantity)
            .bind(&now)
            .bind(product_id)
            .bind(input.quantity)
            .execute(&mut *tx)
            .await?;

            if decremented.rows_affected() == 0 {
                return Err(AppError::Conflict(format!("Insufficient stock for {}", name)));
            }

            items.push(OrderItem {
                product_id: Some(product_id.to_string()),
                name,
                quantity: input.quantity,
                price: round_cents(unit_price * input.quantity as f64),
            });
        }

        let totals = OrderTotals::compute(&items, shipping_cost);
        let order = Order {
            id: uuid::Uuid::new_v4().to_string(),
            first_name: request.first_name.trim().to_string(),
            last_name: request.last_name.trim().to_string(),
            title: request.title.trim().to_string(),
            practice_name: request.practice_name.trim().to_string(),
            email: request.email.trim().to_string(),
            phone: request.phone.trim().to_string(),
            shipping_address: request.shipping_address.clone().unwrap_or_default(),
            shipping_option,
            shipping_cost: totals.shipping_cost,
            items,
            subtotal: totals.subtotal,
            processing_fee: totals.processing_fee,
            total: totals.total,
            status: OrderStatus::Pending,
            payment_link: None,
            notes: request.notes.trim().to_string(),
            referral: request.referral.trim().to_string(),
            created_at: now.clone(),
            updated_at: now,
        };

        insert_order(&mut tx, &order).await?;
        tx.commit().await?;

        Ok(order)
    }

    /// Apply a partial update to an order. Status changes are unrestricted.
    pub async fn update_order(
        &self,
        id: &str,
        request: &UpdateOrderRequest,
    ) -> Result<Order, AppError> {
        let existing = self
            .get_order(id)
            .await?
            .ok_or_else(|| AppError::NotFound("Order not found".to_string()))?;

        let mut updated = Order {
            status: request.status.unwrap_or(existing.status),
            payment_link: request
                .payment_link
                .clone()
                .or(existing.payment_link.clone()),
            notes: request.notes.clone().unwrap_or(existing.notes.clone()),
            referral: request.referral.clone().unwrap_or(existing.referral.clone()),
            first_name: request
                .first_name
                .clone()
                .unwrap_or(existing.first_name.clone()),
            last_name: request
                .last_name
                .clone()
                .unwrap_or(existing.last_name.clone()),
            title: request.title.clone().unwrap_or(existing.title.clone()),
            practice_name: request
                .practice_name
                .clone()
                .unwrap_or(existing.practice_name.clone()),
            email: request.email.clone().unwrap_or(existing.email.clone()),
            phone: request.phone.clone().unwrap_or(existing.phone.clone()),
            shipping_address: request
                .shipping_address
                .clone()
                .unwrap_or(existing.shipping_address.clone()),
            shipping_option: request
                .shipping_option
                .clone()
                .unwrap_or(existing.shipping_option.clone()),
            updated_at: Utc::now().to_rfc3339(),
            ..existing
        };

        if let Some(shipping_cost) = request.shipping_cost {
            let totals = OrderTotals::from_subtotal(updated.subtotal, shipping_cost);
            updated.shipping_cost = totals.shipping_cost;
            updated.processing_fee = totals.processing_fee;
            updated.total = totals.total;
        }

        sqlx::query(
            r#"UPDATE orders SET
                first_name = ?, last_name = ?, title = ?, practice_name = ?, email = ?, phone = ?,
                shipping_address = ?, shipping_option = ?, shipping_cost = ?, processing_fee = ?,
                total = ?, status = ?, payment_link = ?, notes = ?, referral = ?, updated_at = ?
            WHERE id = ?"#,
        )
        .bind(&updated.first_name)
        .bind(&updated.last_name)
        .bind(&updated.title)
        .bind(&updated.practice_name)
        .bind(&updated.email)
        .bind(&updated.phone)
        .bind(serde_json::to_string(&updated.shipping_address)?)
        .bind(&updated.shipping_option)
        .bind(updated.shipping_cost)
        .bind(updated.processing_fee)
        .bind(updated.total)
        .bind(updated.status.as_str())
        .bind(&updated.payment_link)
        .bind(&updated.notes)
        .bind(&updated.referral)
        .bind(&updated.updated_at)
        .bind(id)
        .execute(&self.pool)
        .await?;

        Ok(updated)
    }

    /// Store the payment link sent to the customer.
    pub async fn set_payment_link(&self, id: &str, payment_link: &str) -> Result<Order, AppError> {
        let request = UpdateOrderRequest {
            payment_link: Some(payment_link.to_string()),
            ..Default::default()
        };
        self.update_order(id, &request).await
    }

    /// Delete an order. Stock is not restored.
    pub async fn delete_order(&self, id: &str) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM orders WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Order not found".to_string()));
        }
        Ok(())
    }

    // ==================== SETTINGS & CONTENT ====================

    /// Vendor settings, stored with defaults on first read.
    pub async fn get_vendor_settings(&self) -> Result<VendorSettings, AppError> {
        let row = sqlx::query("SELECT value FROM settings WHERE key = ?")
            .bind(VENDOR_SETTINGS_KEY)
            .fetch_optional(&self.pool)
            .await?;

        match row {
            Some(row) => {
                let value: String = row.get("value");
                Ok(serde_json::from_str(&value)?)
            }
            None => self.save_vendor_settings(&VendorSettings::default()).await,
        }
    }

    /// Replace the vendor settings.
    pub async fn save_vendor_settings(
        &self,
        vendor: &VendorSettings,
    ) -> Result<VendorSettings, AppError> {
        let now = Utc::now().to_rfc3339();
        sqlx::query(
            "INSERT INTO settings (key, value, updated_at) VALUES (?, ?, ?) ON CONFLICT(key) DO UPDATE SET value = excluded.value, updated_at = excluded.updated_at",
        )
        .bind(VENDOR_SETTINGS_KEY)
        .bind(serde_json::to_string(vendor)?)
        .bind(&now)
        .execute(&self.pool)
        .await?;

        Ok(vendor.clone())
    }

    /// Homepage copy, stored with defaults on first read.
    pub async fn get_site_content(&self) -> Result<SiteContent, AppError> {
        let row = sqlx::query("SELECT content, updated_at FROM site_content WHERE id = 1")
            .fetch_optional(&self.pool)
            .await?;

        match row {
            Some(row) => {
                let content: String = row.get("content");
                let mut site: SiteContent = serde_json::from_str(&content)?;
                site.updated_at = Some(row.get("updated_at"));
                Ok(site)
            }
            None => self.save_site_content(&SiteContent::default()).await,
        }
    }

    /// Replace the homepage copy.
    pub async fn save_site_content(&self, content: &SiteContent) -> Result<SiteContent, AppError> {
        let now = Utc::now().to_rfc3339();
        let mut stored = content.clone();
        stored.updated_at = None;

        sqlx::query(
            "INSERT INTO site_content (id, content, updated_at) VALUES (1, ?, ?) ON CONFLICT(id) DO UPDATE SET content = excluded.content, updated_at = excluded.updated_at",
        )
        .bind(serde_json::to_string(&stored)?)
        .bind(&now)
        .execute(&self.pool)
        .await?;

        stored.updated_at = Some(now);
        Ok(stored)
    }

    // ==================== ADMIN USERS ====================

    /// The admin account (single-admin deployment: the oldest user).
    pub async fn get_admin_user(&self) -> Result<Option<AdminUser>, AppError> {
        let row = sqlx::query(
            "SELECT id, email, password_hash FROM users ORDER BY created_at ASC LIMIT 1",
        )
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.as_ref().map(user_from_row))
    }

    /// Find an admin by email.
    pub async fn find_user_by_email(&self, email: &str) -> Result<Option<AdminUser>, AppError> {
        let row = sqlx::query("SELECT id, email, password_hash FROM users WHERE email = ?")
            .bind(email)
            .fetch_optional(&self.pool)
            .await?;

        Ok(row.as_ref().map(user_from_row))
    }

    /// Create the admin, or reset the password when the email already exists.
    pub async fn upsert_admin_user(
        &self,
        email: &str,
        password_hash: &str,
    ) -> Result<AdminUser, AppError> {
        let now = Utc::now().to_rfc3339();
        sqlx::query(
            "INSERT INTO users (id, email, password_hash, created_at, updated_at) VALUES (?, ?, ?, ?, ?) ON CONFLICT(email) DO UPDATE SET password_hash = excluded.password_hash, updated_at = excluded.updated_at",
        )
        .bind(uuid::Uuid::new_v4().to_string())
        .bind(email)
        .bind(password_hash)
        .bind(&now)
        .bind(&now)
        .execute(&self.pool)
        .await?;

        self.find_user_by_email(email)
            .await?
            .ok_or_else(|| AppError::Internal("Admin user vanished after upsert".to_string()))
    }

    /// Overwrite the admin's email and password hash.
    pub async fn update_user_credentials(
        &self,
        id: &str,
        email: &str,
        password_hash: &str,
    ) -> Result<(), AppError> {
        let result = sqlx::query(
            "UPDATE users SET email = ?, password_hash = ?, updated_at = ? WHERE id = ?",
        )
        .bind(email)
        .bind(password_hash)
        .bind(Utc::now().to_rfc3339())
        .bind(id)
        .execute(&self.pool)
        .await
        .map_err(|e| match &e {
            sqlx::Error::Database(db) if db.is_unique_violation() => {
                AppError::Conflict("Email is already in use".to_string())
            }
            _ => AppError::from(e),
        })?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("No admin user found".to_string()));
        }
        Ok(())
    }
}

async fn insert_order(
    tx: &mut sqlx::Transaction<'_, sqlx::Sqlite>,
    order: &Order,
) -> Result<(), AppError> {
    sqlx::query(
        r#"INSERT INTO orders (
            id, first_name, last_name, title, practice_name, email, phone,
            shipping_address, shipping_option, shipping_cost, items, subtotal,
            processing_fee, total, status, payment_link, notes, referral, created_at, updated_at
        ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)"#,
    )
    .bind(&order.id)
    .bind(&order.first_name)
    .bind(&order.last_name)
    .bind(&order.title)
    .bind(&order.practice_name)
    .bind(&order.email)
    .bind(&order.phone)
    .bind(serde_json::to_string(&order.shipping_address)?)
    .bind(&order.shipping_option)
    .bind(order.shipping_cost)
    .bind(serde_json::to_string(&order.items)?)
    .bind(order.subtotal)
    .bind(order.processing_fee)
    .bind(order.total)
    .bind(order.status.as_str())
    .bind(&order.payment_link)
    .bind(&order.notes)
    .bind(&order.referral)
    .bind(&order.created_at)
    .bind(&order.updated_at)
    .execute(&mut **tx)
    .await?;

    Ok(())
}

fn category_conflict(err: sqlx::Error) -> AppError {
    match &err {
        sqlx::Error::Database(db) if db.is_unique_violation() => {
            AppError::Conflict("Category already exists".to_string())
        }
        _ => AppError::from(err),
    }
}

// Helper functions for row conversion

fn product_from_row(row: &sqlx::sqlite::SqliteRow) -> Product {
    let is_active: i64 = row.get("is_active");
    Product {
        id: row.get("id"),
        name: row.get("name"),
        sub: row.get("sub"),
        category: row.get("category"),
        price: row.get("price"),
        cost_price: row.get("cost_price"),
        stock_quantity: row.get("stock_quantity"),
        low_stock_threshold: row.get("low_stock_threshold"),
        is_active: is_active != 0,
        order: row.get("sort_order"),
        created_at: row.get("created_at"),
        updated_at: row.get("updated_at"),
        profit_margin: 0.0,
        stock_status: StockStatus::InStock,
    }
    .with_derived()
}

fn category_from_row(row: &sqlx::sqlite::SqliteRow) -> Category {
    let is_active: i64 = row.get("is_active");
    Category {
        id: row.get("id"),
        name: row.get("name"),
        order: row.get("sort_order"),
        is_active: is_active != 0,
        created_at: row.get("created_at"),
        updated_at: row.get("updated_at"),
    }
}

fn shipping_from_row(row: &sqlx::sqlite::SqliteRow) -> ShippingMethod {
    let is_active: i64 = row.get("is_active");
    ShippingMethod {
        id: row.get("id"),
        name: row.get("name"),
        price: row.get("price"),
        delivery_time: row.get("delivery_time"),
        is_active: is_active != 0,
        created_at: row.get("created_at"),
        updated_at: row.get("updated_at"),
    }
}

fn order_from_row(row: &sqlx::sqlite::SqliteRow) -> Order {
    let address_str: String = row.get("shipping_address");
    let items_str: String = row.get("items");
    let status_str: String = row.get("status");

    Order {
        id: row.get("id"),
        first_name: row.get("first_name"),
        last_name: row.get("last_name"),
        title: row.get("title"),
        practice_name: row.get("practice_name"),
        email: row.get("email"),
        phone: row.get("phone"),
        shipping_address: serde_json::from_str::<ShippingAddress>(&address_str).unwrap_or_default(),
        shipping_option: row.get("shipping_option"),
        shipping_cost: row.get("shipping_cost"),
        items: serde_json::from_str(&items_str).unwrap_or_default(),
        subtotal: row.get("subtotal"),
        processing_fee: row.get("processing_fee"),
        total: row.get("total"),
        status: OrderStatus::parse(&status_str).unwrap_or_default(),
        payment_link: row.get("payment_link"),
        notes: row.get("notes"),
        referral: row.get("referral"),
        created_at: row.get("created_at"),
        updated_at: row.get("updated_at"),
    }
}

fn user_from_row(row: &sqlx::sqlite::SqliteRow) -> AdminUser {
    AdminUser {
        id: row.get("id"),
        email: row.get("email"),
        password_hash: row.get("password_hash"),
    }
}
