//! Master data service: curated value lists and the product hierarchy

use serde::Deserialize;
use sqlx::PgPool;

use crate::error::{AppError, AppResult};
use shared::{validate_master_value, MasterData, MasterDataKind, ProductHierarchy};

#[derive(Clone)]
pub struct MasterDataService {
    db: PgPool,
}

/// A category under a product type
#[derive(Debug, Clone, Deserialize)]
pub struct CategoryInput {
    pub product_type: String,
    pub category: String,
}

/// A product name under a product type and category
#[derive(Debug, Clone, Deserialize)]
pub struct ProductNameInput {
    pub product_type: String,
    pub category: String,
    pub name: String,
}

fn checked(field: &str, value: &str) -> AppResult<String> {
    validate_master_value(value).map_err(|msg| AppError::validation(field, msg))?;
    Ok(value.trim().to_string())
}

/// Nest flat category and product rows into the hierarchy map
pub fn build_hierarchy(
    categories: Vec<(String, String)>,
    products: Vec<(String, String, String)>,
) -> ProductHierarchy {
    let mut hierarchy = ProductHierarchy::new();
    for (product_type, category) in categories {
        hierarchy
            .entry(product_type)
            .or_default()
            .entry(category)
            .or_default();
    }
    for (product_type, category, name) in products {
        hierarchy
            .entry(product_type)
            .or_default()
            .entry(category)
            .or_default()
            .push(name);
    }
    hierarchy
}

impl MasterDataService {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    /// Every list (empty ones included) and the hierarchy
    pub async fn get(&self) -> AppResult<MasterData> {
        let rows = sqlx::query_as::<_, (String, String)>(
            "SELECT kind, value FROM master_data_values ORDER BY kind, created_at, value",
        )
        .fetch_all(&self.db)
        .await?;

        let mut data = MasterData::default();
        for kind in MasterDataKind::ALL {
            data.lists.insert(kind, Vec::new());
        }
        for (kind, value) in rows {
            match MasterDataKind::parse(&kind) {
                Some(kind) => data.lists.entry(kind).or_default().push(value),
                None => tracing::warn!(%kind, "Skipping master data of unknown kind"),
            }
        }
        data.hierarchy = self.hierarchy().await?;
        Ok(data)
    }

    pub async fn values(&self, kind: MasterDataKind) -> AppResult<Vec<String>> {
        let values = sqlx::query_scalar::<_, String>(
            "SELECT value FROM master_data_values WHERE kind = $1 ORDER BY created_at, value",
        )
        .bind(kind.as_str())
        .fetch_all(&self.db)
        .await?;
        Ok(values)
    }

    pub async fn add(&self, kind: MasterDataKind, value: &str) -> AppResult<Vec<String>> {
        let value = checked("value", value)?;
        sqlx::query("INSERT INTO master_data_values (kind, value) VALUES ($1, $2)")
            .bind(kind.as_str())
            .bind(&value)
            .execute(&self.db)
            .await
            .map_err(|e| {
                AppError::from_unique_violation(e, "value", format!("'{}' already exists in {}", value, kind))
            })?;

        tracing::info!(%kind, %value, "Added master data value");
        self.values(kind).await
    }

    pub async fn rename(&self, kind: MasterDataKind, old: &str, new: &str) -> AppResult<Vec<String>> {
        let new = checked("value", new)?;
        let result = sqlx::query("UPDATE master_data_values SET value = $3 WHERE kind = $1 AND value = $2")
            .bind(kind.as_str())
            .bind(old)
            .bind(&new)
            .execute(&self.db)
            .await
            .map_err(|e| {
                AppError::from_unique_violation(e, "value", format!("'{}' already exists in {}", new, kind))
            })?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("{} value '{}'", kind, old)));
        }
        self.values(kind).await
    }

    pub async fn remove(&self, kind: MasterDataKind, value: &str) -> AppResult<Vec<String>> {
        let result = sqlx::query("DELETE FROM master_data_values WHERE kind = $1 AND value = $2")
            .bind(kind.as_str())
            .bind(value)
            .execute(&self.db)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("{} value '{}'", kind, value)));
        }
        tracing::info!(%kind, %value, "Removed master data value");
        self.values(kind).await
    }

    pub async fn hierarchy(&self) -> AppResult<ProductHierarchy> {
        let categories = sqlx::query_as::<_, (String, String)>(
            "SELECT product_type, category FROM hierarchy_categories ORDER BY product_type, category",
        )
        .fetch_all(&self.db)
        .await?;

        let products = sqlx::query_as::<_, (String, String, String)>(
            "SELECT product_type, category, name FROM hierarchy_products ORDER BY product_type, category, name",
        )
        .fetch_all(&self.db)
        .await?;

        Ok(build_hierarchy(categories, products))
    }

    pub async fn add_category(&self, input: CategoryInput) -> AppResult<ProductHierarchy> {
        let product_type = checked("product_type", &input.product_type)?;
        let category = checked("category", &input.category)?;

        sqlx::query("INSERT INTO hierarchy_categories (product_type, category) VALUES ($1, $2)")
            .bind(&product_type)
            .bind(&category)
            .execute(&self.db)
            .await
            .map_err(|e| {
                AppError::from_unique_violation(
                    e,
                    "category",
                    format!("Category '{}' already exists under '{}'", category, product_type),
                )
            })?;

        self.hierarchy().await
    }

    /// Removes the category's product names with it
    pub async fn remove_category(&self, input: CategoryInput) -> AppResult<ProductHierarchy> {
        let result = sqlx::query("DELETE FROM hierarchy_categories WHERE product_type = $1 AND category = $2")
            .bind(input.product_type.trim())
            .bind(input.category.trim())
            .execute(&self.db)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("Category '{}'", input.category)));
        }
        self.hierarchy().await
    }

    /// Adds the category too when it does not exist yet
    pub async fn add_product_name(&self, input: ProductNameInput) -> AppResult<ProductHierarchy> {
        let product_type = checked("product_type", &input.product_type)?;
        let category = checked("category", &input.category)?;
        let name = checked("name", &input.name)?;

        let mut tx = self.db.begin().await?;
        sqlx::query(
            "INSERT INTO hierarchy_categories (product_type, category) VALUES ($1, $2) ON CONFLICT DO NOTHING",
        )
        .bind(&product_type)
        .bind(&category)
        .execute(&mut *tx)
        .await?;

        sqlx::query("INSERT INTO hierarchy_products (product_type, category, name) VALUES ($1, $2, $3)")
            .bind(&product_type)
            .bind(&category)
            .bind(&name)
            .execute(&mut *tx)
            .await
            .map_err(|e| {
                AppError::from_unique_violation(
                    e,
                    "name",
                    format!("Product '{}' already exists under '{}'", name, category),
                )
            })?;
        tx.commit().await?;

        self.hierarchy().await
    }

    pub async fn remove_product_name(&self, input: ProductNameInput) -> AppResult<ProductHierarchy> {
        let result = sqlx::query(
            "DELETE FROM hierarchy_products WHERE product_type = $1 AND category = $2 AND name = $3",
        )
        .bind(input.product_type.trim())
        .bind(input.category.trim())
        .bind(input.name.trim())
        .execute(&self.db)
        .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("Product '{}'", input.name)));
        }
        self.hierarchy().await
    }
}
