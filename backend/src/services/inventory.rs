//! Inventory service: record CRUD, size-variant batches and read-only summaries

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Deserialize;
use sqlx::{FromRow, PgExecutor, PgPool};
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use shared::{
    brand_warehouses, validate_input, validate_patch, validate_variant_batch, BrandWarehouses,
    FabricSpecs, FilterOptions, Gender, InventoryInput, InventoryPatch, InventoryRecord,
    InventoryStats, ItemStatus, VariantBatch,
};

/// Inventory service for managing stock records
#[derive(Clone)]
pub struct InventoryService {
    db: PgPool,
}

/// Optional narrowing of the list endpoint; without parameters it returns everything
#[derive(Debug, Default, Deserialize)]
pub struct ListInventoryQuery {
    pub category: Option<String>,
    pub gender: Option<String>,
    pub status: Option<String>,
    /// Case-insensitive match on sku, name or design
    pub search: Option<String>,
}

/// Whether an upsert created or replaced a record
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpsertOutcome {
    Inserted,
    Updated,
}

const SELECT_COLUMNS: &str = r#"
    id, sku, name, brand, warehouse, product_type, category, design, gender,
    color, color_code, material, weight, composition, size,
    mrp, selling_price, cost_price, quantity, low_stock_threshold, status,
    created_at, updated_at, created_by, last_modified_by
"#;

/// Row as stored in `inventory_items`
#[derive(Debug, FromRow)]
struct InventoryRow {
    id: Uuid,
    sku: String,
    name: String,
    brand: String,
    warehouse: String,
    product_type: Option<String>,
    category: String,
    design: String,
    gender: Option<String>,
    color: String,
    color_code: Option<String>,
    material: Option<String>,
    weight: Option<String>,
    composition: Option<String>,
    size: String,
    mrp: Decimal,
    selling_price: Decimal,
    cost_price: Option<Decimal>,
    quantity: i32,
    low_stock_threshold: i32,
    status: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    created_by: Option<String>,
    last_modified_by: Option<String>,
}

impl From<InventoryRow> for InventoryRecord {
    fn from(row: InventoryRow) -> Self {
        InventoryRecord {
            id: row.id,
            sku: row.sku,
            name: row.name,
            brand: row.brand,
            warehouse: row.warehouse,
            product_type: row.product_type,
            category: row.category,
            design: row.design,
            gender: row.gender.as_deref().and_then(Gender::parse),
            color: row.color,
            color_code: row.color_code,
            fabric_specs: FabricSpecs {
                material: row.material,
                weight: row.weight,
                composition: row.composition,
            },
            size: row.size,
            mrp: row.mrp,
            selling_price: row.selling_price,
            cost_price: row.cost_price,
            quantity: row.quantity,
            low_stock_threshold: row.low_stock_threshold,
            status: ItemStatus::parse(&row.status).unwrap_or_default(),
            created_at: Some(row.created_at),
            updated_at: Some(row.updated_at),
            created_by: row.created_by,
            last_modified_by: row.last_modified_by,
        }
    }
}

fn duplicate_message(sku: &str, warehouse: &str) -> String {
    format!("SKU '{}' already exists in warehouse '{}'", sku, warehouse)
}

impl InventoryService {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    /// All records, newest first
    pub async fn list(&self, query: &ListInventoryQuery) -> AppResult<Vec<InventoryRecord>> {
        let sql = format!(
            r#"
            SELECT {}
            FROM inventory_items
            WHERE ($1::text IS NULL OR category = $1)
              AND ($2::text IS NULL OR gender = $2)
              AND ($3::text IS NULL OR status = $3)
              AND ($4::text IS NULL
                   OR sku ILIKE '%' || $4 || '%'
                   OR name ILIKE '%' || $4 || '%'
                   OR design ILIKE '%' || $4 || '%')
            ORDER BY created_at DESC
            "#,
            SELECT_COLUMNS
        );

        let rows = sqlx::query_as::<_, InventoryRow>(&sql)
            .bind(query.category.as_deref().filter(|v| !v.is_empty()))
            .bind(query.gender.as_deref().filter(|v| !v.is_empty()))
            .bind(query.status.as_deref().filter(|v| !v.is_empty()))
            .bind(query.search.as_deref().map(str::trim).filter(|v| !v.is_empty()))
            .fetch_all(&self.db)
            .await?;

        Ok(rows.into_iter().map(InventoryRecord::from).collect())
    }

    pub async fn all(&self) -> AppResult<Vec<InventoryRecord>> {
        self.list(&ListInventoryQuery::default()).await
    }

    pub async fn get(&self, id: Uuid) -> AppResult<InventoryRecord> {
        let sql = format!("SELECT {} FROM inventory_items WHERE id = $1", SELECT_COLUMNS);
        sqlx::query_as::<_, InventoryRow>(&sql)
            .bind(id)
            .fetch_optional(&self.db)
            .await?
            .map(InventoryRecord::from)
            .ok_or_else(|| AppError::NotFound("Item".to_string()))
    }

    /// Record holding `(sku, warehouse)`, if any
    pub async fn find_by_sku<'e, E: PgExecutor<'e>>(
        executor: E,
        sku: &str,
        warehouse: &str,
    ) -> AppResult<Option<InventoryRecord>> {
        let sql = format!(
            "SELECT {} FROM inventory_items WHERE sku = $1 AND warehouse = $2",
            SELECT_COLUMNS
        );
        let row = sqlx::query_as::<_, InventoryRow>(&sql)
            .bind(sku)
            .bind(warehouse)
            .fetch_optional(executor)
            .await?;
        Ok(row.map(InventoryRecord::from))
    }

    /// Create one record; `(sku, warehouse)` must be free
    pub async fn create(&self, input: InventoryInput, actor: &str) -> AppResult<InventoryRecord> {
        validate_input(&input)?;

        if Self::find_by_sku(&self.db, &input.sku, &input.warehouse).await?.is_some() {
            return Err(AppError::conflict("sku", duplicate_message(&input.sku, &input.warehouse)));
        }

        let record = input.into_record(actor, Utc::now());
        let saved = Self::insert(&self.db, &record).await?;
        tracing::info!(id = %saved.id, sku = %saved.sku, warehouse = %saved.warehouse, "Created inventory record");
        Ok(saved)
    }

    /// Create every size of a product in one transaction
    pub async fn create_variants(
        &self,
        batch: VariantBatch,
        actor: &str,
    ) -> AppResult<Vec<InventoryRecord>> {
        let inputs = validate_variant_batch(&batch)?;
        let now = Utc::now();
        let mut tx = self.db.begin().await?;
        let mut created = Vec::with_capacity(inputs.len());

        for input in inputs {
            if Self::find_by_sku(&mut *tx, &input.sku, &input.warehouse).await?.is_some() {
                return Err(AppError::conflict(
                    "sku",
                    duplicate_message(&input.sku, &input.warehouse),
                ));
            }
            let record = input.into_record(actor, now);
            created.push(Self::insert(&mut *tx, &record).await?);
        }

        tx.commit().await?;
        tracing::info!(count = created.len(), "Created size variants");
        Ok(created)
    }

    /// Apply a partial update; only supplied fields change
    pub async fn update(
        &self,
        id: Uuid,
        patch: InventoryPatch,
        actor: &str,
    ) -> AppResult<InventoryRecord> {
        validate_patch(&patch)?;
        let existing = self.get(id).await?;
        if patch.is_empty() {
            return Ok(existing);
        }

        let updated = patch.apply_to(&existing, actor, Utc::now());
        if updated.sku != existing.sku || updated.warehouse != existing.warehouse {
            if let Some(other) = Self::find_by_sku(&self.db, &updated.sku, &updated.warehouse).await? {
                if other.id != id {
                    return Err(AppError::conflict(
                        "sku",
                        duplicate_message(&updated.sku, &updated.warehouse),
                    ));
                }
            }
        }

        let saved = Self::replace(&self.db, &updated).await?;
        tracing::info!(id = %saved.id, "Updated inventory record");
        Ok(saved)
    }

    pub async fn delete(&self, id: Uuid) -> AppResult<()> {
        let result = sqlx::query("DELETE FROM inventory_items WHERE id = $1")
            .bind(id)
            .execute(&self.db)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Item".to_string()));
        }
        tracing::info!(%id, "Deleted inventory record");
        Ok(())
    }

    /// Insert, or overwrite the record already holding `(sku, warehouse)`
    ///
    /// An overwrite keeps the stored id and creation audit fields.
    pub async fn upsert(
        &self,
        input: InventoryInput,
        actor: &str,
        now: DateTime<Utc>,
    ) -> AppResult<UpsertOutcome> {
        let incoming = input.into_record(actor, now);
        match Self::find_by_sku(&self.db, &incoming.sku, &incoming.warehouse).await? {
            Some(existing) => {
                let replacement = InventoryRecord {
                    id: existing.id,
                    created_at: existing.created_at,
                    created_by: existing.created_by,
                    ..incoming
                };
                Self::replace(&self.db, &replacement).await?;
                Ok(UpsertOutcome::Updated)
            }
            None => {
                Self::insert(&self.db, &incoming).await?;
                Ok(UpsertOutcome::Inserted)
            }
        }
    }

    pub async fn filter_options(&self) -> AppResult<FilterOptions> {
        Ok(FilterOptions::from_records(&self.all().await?))
    }

    pub async fn brand_warehouses(&self) -> AppResult<BrandWarehouses> {
        Ok(brand_warehouses(&self.all().await?))
    }

    pub async fn stats(&self) -> AppResult<InventoryStats> {
        Ok(InventoryStats::compute(&self.all().await?))
    }

    async fn insert<'e, E: PgExecutor<'e>>(executor: E, record: &InventoryRecord) -> AppResult<InventoryRecord> {
        let sql = format!(
            r#"
            INSERT INTO inventory_items (
                id, sku, name, brand, warehouse, product_type, category, design, gender,
                color, color_code, material, weight, composition, size,
                mrp, selling_price, cost_price, quantity, low_stock_threshold, status,
                created_at, updated_at, created_by, last_modified_by
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15,
                    $16, $17, $18, $19, $20, $21, $22, $23, $24, $25)
            RETURNING {}
            "#,
            SELECT_COLUMNS
        );
        let now = Utc::now();

        let row = sqlx::query_as::<_, InventoryRow>(&sql)
            .bind(record.id)
            .bind(&record.sku)
            .bind(&record.name)
            .bind(&record.brand)
            .bind(&record.warehouse)
            .bind(&record.product_type)
            .bind(&record.category)
            .bind(&record.design)
            .bind(record.gender.map(|g| g.as_str()))
            .bind(&record.color)
            .bind(&record.color_code)
            .bind(&record.fabric_specs.material)
            .bind(&record.fabric_specs.weight)
            .bind(&record.fabric_specs.composition)
            .bind(&record.size)
            .bind(record.mrp)
            .bind(record.selling_price)
            .bind(record.cost_price)
            .bind(record.quantity)
            .bind(record.low_stock_threshold)
            .bind(record.status.as_str())
            .bind(record.created_at.unwrap_or(now))
            .bind(record.updated_at.unwrap_or(now))
            .bind(&record.created_by)
            .bind(&record.last_modified_by)
            .fetch_one(executor)
            .await
            .map_err(|e| {
                AppError::from_unique_violation(e, "sku", duplicate_message(&record.sku, &record.warehouse))
            })?;

        Ok(row.into())
    }

    async fn replace<'e, E: PgExecutor<'e>>(executor: E, record: &InventoryRecord) -> AppResult<InventoryRecord> {
        let sql = format!(
            r#"
            UPDATE inventory_items SET
                sku = $2, name = $3, brand = $4, warehouse = $5, product_type = $6,
                category = $7, design = $8, gender = $9, color = $10, color_code = $11,
                material = $12, weight = $13, composition = $14, size = $15,
                mrp = $16, selling_price = $17, cost_price = $18, quantity = $19,
                low_stock_threshold = $20, status = $21, updated_at = $22, last_modified_by = $23
            WHERE id = $1
            RETURNING {}
            "#,
            SELECT_COLUMNS
        );

        let row = sqlx::query_as::<_, InventoryRow>(&sql)
            .bind(record.id)
            .bind(&record.sku)
            .bind(&record.name)
            .bind(&record.brand)
            .bind(&record.warehouse)
            .bind(&record.product_type)
            .bind(&record.category)
            .bind(&record.design)
            .bind(record.gender.map(|g| g.as_str()))
            .bind(&record.color)
            .bind(&record.color_code)
            .bind(&record.fabric_specs.material)
            .bind(&record.fabric_specs.weight)
            .bind(&record.fabric_specs.composition)
            .bind(&record.size)
            .bind(record.mrp)
            .bind(record.selling_price)
            .bind(record.cost_price)
            .bind(record.quantity)
            .bind(record.low_stock_threshold)
            .bind(record.status.as_str())
            .bind(record.updated_at.unwrap_or_else(Utc::now))
            .bind(&record.last_modified_by)
            .fetch_optional(executor)
            .await
            .map_err(|e| {
                AppError::from_unique_violation(e, "sku", duplicate_message(&record.sku, &record.warehouse))
            })?
            .ok_or_else(|| AppError::NotFound("Item".to_string()))?;

        Ok(row.into())
    }
}
