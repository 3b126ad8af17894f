//! Inventory record models

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Product type assumed when a record carries none
pub const DEFAULT_PRODUCT_TYPE: &str = "Clothing";

/// Low-stock threshold assumed when a record carries none
pub const DEFAULT_LOW_STOCK_THRESHOLD: i32 = 10;

fn default_low_stock_threshold() -> i32 {
    DEFAULT_LOW_STOCK_THRESHOLD
}

/// One SKU stocked at one warehouse
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct InventoryRecord {
    pub id: Uuid,
    /// Unique within a warehouse, may repeat across warehouses
    pub sku: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub brand: String,
    #[serde(default)]
    pub warehouse: String,
    #[serde(default)]
    pub product_type: Option<String>,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub design: String,
    #[serde(default)]
    pub gender: Option<Gender>,
    #[serde(default)]
    pub color: String,
    #[serde(default)]
    pub color_code: Option<String>,
    #[serde(default)]
    pub fabric_specs: FabricSpecs,
    #[serde(default)]
    pub size: String,
    #[serde(default)]
    pub mrp: Decimal,
    #[serde(default)]
    pub selling_price: Decimal,
    #[serde(default)]
    pub cost_price: Option<Decimal>,
    #[serde(default)]
    pub quantity: i32,
    #[serde(default = "default_low_stock_threshold")]
    pub low_stock_threshold: i32,
    #[serde(default)]
    pub status: ItemStatus,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub created_by: Option<String>,
    #[serde(default)]
    pub last_modified_by: Option<String>,
}

impl Default for InventoryRecord {
    fn default() -> Self {
        Self {
            id: Uuid::new_v4(),
            sku: String::new(),
            name: String::new(),
            brand: String::new(),
            warehouse: String::new(),
            product_type: None,
            category: String::new(),
            design: String::new(),
            gender: None,
            color: String::new(),
            color_code: None,
            fabric_specs: FabricSpecs::default(),
            size: String::new(),
            mrp: Decimal::ZERO,
            selling_price: Decimal::ZERO,
            cost_price: None,
            quantity: 0,
            low_stock_threshold: DEFAULT_LOW_STOCK_THRESHOLD,
            status: ItemStatus::Active,
            created_at: None,
            updated_at: None,
            created_by: None,
            last_modified_by: None,
        }
    }
}

impl InventoryRecord {
    /// Product type, falling back to "Clothing"
    pub fn product_type(&self) -> &str {
        match self.product_type.as_deref() {
            Some(t) if !t.is_empty() => t,
            _ => DEFAULT_PRODUCT_TYPE,
        }
    }

    /// Fabric material, empty when absent
    pub fn material(&self) -> &str {
        self.fabric_specs.material.as_deref().unwrap_or("")
    }

    /// Fabric weight, empty when absent
    pub fn weight(&self) -> &str {
        self.fabric_specs.weight.as_deref().unwrap_or("")
    }

    /// Gender label, empty when absent
    pub fn gender_label(&self) -> &str {
        self.gender.map(|g| g.as_str()).unwrap_or("")
    }

    /// Stock value of this line: quantity × selling price
    pub fn line_value(&self) -> Decimal {
        Decimal::from(self.quantity) * self.selling_price
    }

    /// Quantity at or below the record's threshold
    pub fn is_low_stock(&self) -> bool {
        self.quantity <= self.low_stock_threshold
    }
}

/// Fabric specification, every part optional
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct FabricSpecs {
    #[serde(default)]
    pub material: Option<String>,
    #[serde(default)]
    pub weight: Option<String>,
    #[serde(default)]
    pub composition: Option<String>,
}

/// Target gender of a product
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Gender {
    Male,
    Female,
    Unisex,
}

impl Gender {
    pub fn as_str(&self) -> &'static str {
        match self {
            Gender::Male => "male",
            Gender::Female => "female",
            Gender::Unisex => "unisex",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "male" | "men" | "m" => Some(Gender::Male),
            "female" | "women" | "f" => Some(Gender::Female),
            "unisex" | "u" => Some(Gender::Unisex),
            _ => None,
        }
    }
}

impl std::fmt::Display for Gender {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Catalogue status of a record
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum ItemStatus {
    #[default]
    Active,
    Discontinued,
}

impl ItemStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ItemStatus::Active => "active",
            ItemStatus::Discontinued => "discontinued",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "active" => Some(ItemStatus::Active),
            "discontinued" => Some(ItemStatus::Discontinued),
            _ => None,
        }
    }
}

/// Payload for creating a record
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct InventoryInput {
    pub sku: String,
    pub name: String,
    pub brand: String,
    pub warehouse: String,
    #[serde(default)]
    pub product_type: Option<String>,
    pub category: String,
    #[serde(default)]
    pub design: String,
    #[serde(default)]
    pub gender: Option<Gender>,
    #[serde(default)]
    pub color: String,
    #[serde(default)]
    pub color_code: Option<String>,
    #[serde(default)]
    pub fabric_specs: FabricSpecs,
    #[serde(default)]
    pub size: String,
    pub mrp: Decimal,
    pub selling_price: Decimal,
    #[serde(default)]
    pub cost_price: Option<Decimal>,
    pub quantity: i32,
    #[serde(default)]
    pub low_stock_threshold: Option<i32>,
    #[serde(default)]
    pub status: Option<ItemStatus>,
}

impl InventoryInput {
    /// Materialise a new record owned by `actor`
    pub fn into_record(self, actor: &str, now: DateTime<Utc>) -> InventoryRecord {
        InventoryRecord {
            id: Uuid::new_v4(),
            sku: self.sku,
            name: self.name,
            brand: self.brand,
            warehouse: self.warehouse,
            product_type: self.product_type,
            category: self.category,
            design: self.design,
            gender: self.gender,
            color: self.color,
            color_code: self.color_code,
            fabric_specs: self.fabric_specs,
            size: self.size,
            mrp: self.mrp,
            selling_price: self.selling_price,
            cost_price: self.cost_price,
            quantity: self.quantity,
            low_stock_threshold: self
                .low_stock_threshold
                .unwrap_or(DEFAULT_LOW_STOCK_THRESHOLD),
            status: self.status.unwrap_or_default(),
            created_at: Some(now),
            updated_at: Some(now),
            created_by: Some(actor.to_string()),
            last_modified_by: Some(actor.to_string()),
        }
    }
}

impl From<&InventoryRecord> for InventoryInput {
    fn from(record: &InventoryRecord) -> Self {
        Self {
            sku: record.sku.clone(),
            name: record.name.clone(),
            brand: record.brand.clone(),
            warehouse: record.warehouse.clone(),
            product_type: record.product_type.clone(),
            category: record.category.clone(),
            design: record.design.clone(),
            gender: record.gender,
            color: record.color.clone(),
            color_code: record.color_code.clone(),
            fabric_specs: record.fabric_specs.clone(),
            size: record.size.clone(),
            mrp: record.mrp,
            selling_price: record.selling_price,
            cost_price: record.cost_price,
            quantity: record.quantity,
            low_stock_threshold: Some(record.low_stock_threshold),
            status: Some(record.status),
        }
    }
}

/// Payload for updating a record; only supplied fields change
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct InventoryPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sku: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub brand: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub warehouse: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub product_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub design: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gender: Option<Gender>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color_code: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fabric_specs: Option<FabricSpecs>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mrp: Option<Decimal>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub selling_price: Option<Decimal>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cost_price: Option<Decimal>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quantity: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub low_stock_threshold: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<ItemStatus>,
}

impl InventoryPatch {
    /// Produce the replacement record; `record` itself is left untouched
    pub fn apply_to(&self, record: &InventoryRecord, actor: &str, now: DateTime<Utc>) -> InventoryRecord {
        let mut next = record.clone();
        if let Some(v) = &self.sku {
            next.sku = v.clone();
        }
        if let Some(v) = &self.name {
            next.name = v.clone();
        }
        if let Some(v) = &self.brand {
            next.brand = v.clone();
        }
        if let Some(v) = &self.warehouse {
            next.warehouse = v.clone();
        }
        if let Some(v) = &self.product_type {
            next.product_type = Some(v.clone());
        }
        if let Some(v) = &self.category {
            next.category = v.clone();
        }
        if let Some(v) = &self.design {
            next.design = v.clone();
        }
        if let Some(v) = self.gender {
            next.gender = Some(v);
        }
        if let Some(v) = &self.color {
            next.color = v.clone();
        }
        if let Some(v) = &self.color_code {
            next.color_code = Some(v.clone());
        }
        if let Some(v) = &self.fabric_specs {
            next.fabric_specs = v.clone();
        }
        if let Some(v) = &self.size {
            next.size = v.clone();
        }
        if let Some(v) = self.mrp {
            next.mrp = v;
        }
        if let Some(v) = self.selling_price {
            next.selling_price = v;
        }
        if let Some(v) = self.cost_price {
            next.cost_price = Some(v);
        }
        if let Some(v) = self.quantity {
            next.quantity = v;
        }
        if let Some(v) = self.low_stock_threshold {
            next.low_stock_threshold = v;
        }
        if let Some(v) = self.status {
            next.status = v;
        }
        next.updated_at = Some(now);
        next.last_modified_by = Some(actor.to_string());
        next
    }

    pub fn is_empty(&self) -> bool {
        self == &InventoryPatch::default()
    }
}

/// One size line of a variant batch
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct VariantSpec {
    pub sku: String,
    pub size: String,
    /// Defaults to the base warehouse
    #[serde(default)]
    pub warehouse: Option<String>,
    pub quantity: i32,
    #[serde(default)]
    pub mrp: Option<Decimal>,
    #[serde(default)]
    pub selling_price: Option<Decimal>,
}

/// Several size variants of one product submitted together
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct VariantBatch {
    pub base: InventoryInput,
    pub variants: Vec<VariantSpec>,
}

impl VariantBatch {
    /// One create payload per variant line, inheriting everything else from `base`
    pub fn expand(&self) -> Vec<InventoryInput> {
        self.variants
            .iter()
            .map(|v| InventoryInput {
                sku: v.sku.clone(),
                size: v.size.clone(),
                warehouse: v
                    .warehouse
                    .clone()
                    .unwrap_or_else(|| self.base.warehouse.clone()),
                quantity: v.quantity,
                mrp: v.mrp.unwrap_or(self.base.mrp),
                selling_price: v.selling_price.unwrap_or(self.base.selling_price),
                ..self.base.clone()
            })
            .collect()
    }
}

/// Untyped record as typed into a form or read from an import row
///
/// Every field is raw text; [`crate::validation::parse_record_form`] turns it
/// into an [`InventoryInput`] or a list of field errors.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct RecordForm {
    #[serde(default)]
    pub sku: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub brand: String,
    #[serde(default)]
    pub warehouse: String,
    #[serde(default)]
    pub product_type: String,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub gender: String,
    #[serde(default)]
    pub color: String,
    #[serde(default)]
    pub color_code: String,
    #[serde(default)]
    pub material: String,
    #[serde(default)]
    pub weight: String,
    #[serde(default)]
    pub composition: String,
    #[serde(default)]
    pub size: String,
    #[serde(default)]
    pub design: String,
    #[serde(default)]
    pub mrp: String,
    #[serde(default)]
    pub selling_price: String,
    #[serde(default)]
    pub cost_price: String,
    #[serde(default)]
    pub quantity: String,
    #[serde(default)]
    pub low_stock_threshold: String,
    #[serde(default)]
    pub status: String,
}

/// Stock summary over the full inventory
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct InventoryStats {
    pub total_items: i64,
    pub total_quantity: i64,
    pub low_stock_items: i64,
    pub categories_count: i64,
    pub total_value: Decimal,
}

impl InventoryStats {
    pub fn compute(records: &[InventoryRecord]) -> Self {
        let categories: std::collections::BTreeSet<&str> =
            records.iter().map(|r| r.category.as_str()).collect();
        Self {
            total_items: records.len() as i64,
            total_quantity: records.iter().map(|r| i64::from(r.quantity)).sum(),
            low_stock_items: records.iter().filter(|r| r.is_low_stock()).count() as i64,
            categories_count: categories.len() as i64,
            total_value: records.iter().map(InventoryRecord::line_value).sum(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    #[test]
    fn test_product_type_defaults_to_clothing() {
        let record = InventoryRecord::default();
        assert_eq!(record.product_type(), "Clothing");

        let record = InventoryRecord {
            product_type: Some("Footwear".into()),
            ..Default::default()
        };
        assert_eq!(record.product_type(), "Footwear");
    }

    #[test]
    fn test_missing_nested_fields_read_as_empty() {
        let json = r#"{"id":"00000000-0000-0000-0000-000000000001","sku":"A1"}"#;
        let record: InventoryRecord = serde_json::from_str(json).unwrap();
        assert_eq!(record.material(), "");
        assert_eq!(record.gender_label(), "");
        assert_eq!(record.low_stock_threshold, DEFAULT_LOW_STOCK_THRESHOLD);
    }

    #[test]
    fn test_low_stock_is_inclusive() {
        let at = InventoryRecord { quantity: 10, ..Default::default() };
        let above = InventoryRecord { quantity: 11, ..Default::default() };
        assert!(at.is_low_stock());
        assert!(!above.is_low_stock());
    }

    #[test]
    fn test_patch_produces_replacement() {
        let original = InventoryRecord {
            sku: "A1".into(),
            quantity: 5,
            selling_price: dec("100"),
            ..Default::default()
        };
        let patch = InventoryPatch {
            quantity: Some(8),
            ..Default::default()
        };
        let next = patch.apply_to(&original, "staff@example.com", Utc::now());

        assert_eq!(original.quantity, 5);
        assert_eq!(next.quantity, 8);
        assert_eq!(next.id, original.id);
        assert_eq!(next.sku, "A1");
        assert_eq!(next.last_modified_by.as_deref(), Some("staff@example.com"));
    }

    #[test]
    fn test_variant_batch_inherits_base() {
        let base = InventoryInput {
            sku: "BASE".into(),
            name: "Jogger".into(),
            brand: "NOM".into(),
            warehouse: "W1".into(),
            product_type: None,
            category: "Bottoms".into(),
            design: "Plain".into(),
            gender: Some(Gender::Male),
            color: "Black".into(),
            color_code: None,
            fabric_specs: FabricSpecs::default(),
            size: String::new(),
            mrp: dec("999"),
            selling_price: dec("799"),
            cost_price: None,
            quantity: 0,
            low_stock_threshold: None,
            status: None,
        };
        let batch = VariantBatch {
            base,
            variants: vec![
                VariantSpec {
                    sku: "J-M".into(),
                    size: "M(40)".into(),
                    warehouse: None,
                    quantity: 4,
                    mrp: None,
                    selling_price: None,
                },
                VariantSpec {
                    sku: "J-M-2".into(),
                    size: "M(40)".into(),
                    warehouse: Some("W2".into()),
                    quantity: 2,
                    mrp: None,
                    selling_price: Some(dec("749")),
                },
            ],
        };

        let inputs = batch.expand();
        assert_eq!(inputs.len(), 2);
        assert_eq!(inputs[0].warehouse, "W1");
        assert_eq!(inputs[0].selling_price, dec("799"));
        assert_eq!(inputs[1].warehouse, "W2");
        assert_eq!(inputs[1].selling_price, dec("749"));
        assert_eq!(inputs[1].name, "Jogger");
    }

    #[test]
    fn test_stats_compute() {
        let records = vec![
            InventoryRecord {
                category: "Tops".into(),
                quantity: 5,
                selling_price: dec("100"),
                ..Default::default()
            },
            InventoryRecord {
                category: "Bottoms".into(),
                quantity: 20,
                selling_price: dec("50.50"),
                ..Default::default()
            },
        ];
        let stats = InventoryStats::compute(&records);
        assert_eq!(stats.total_items, 2);
        assert_eq!(stats.total_quantity, 25);
        assert_eq!(stats.low_stock_items, 1);
        assert_eq!(stats.categories_count, 2);
        assert_eq!(stats.total_value, dec("1510.00"));
    }
}
