//! Import and export models

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::InventoryRecord;
use crate::types::Selector;

/// Outcome of an import
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct ImportReport {
    pub inserted: i64,
    pub updated: i64,
    pub failed: i64,
    pub errors: Vec<ImportRowError>,
    pub total_rows: i64,
}

impl ImportReport {
    /// Completed, but some rows were rejected
    pub fn is_partial(&self) -> bool {
        self.failed > 0
    }

    pub fn record_failure(&mut self, row: i64, error: impl Into<String>) {
        self.failed += 1;
        self.errors.push(ImportRowError {
            row,
            error: error.into(),
        });
    }
}

/// A rejected import row; `row` counts the header as row 1
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ImportRowError {
    pub row: i64,
    pub error: String,
}

/// Requested export document type
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    Excel,
    Pdf,
    Word,
}

impl ExportFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            ExportFormat::Excel => "excel",
            ExportFormat::Pdf => "pdf",
            ExportFormat::Word => "word",
        }
    }
}

/// Only the top-level selectors travel with an export
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct ExportFilters {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub brand: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub warehouse: Option<String>,
}

impl ExportFilters {
    pub fn from_selectors(brand: &Selector, warehouse: &Selector) -> Self {
        Self {
            brand: brand.value().map(str::to_string),
            warehouse: warehouse.value().map(str::to_string),
        }
    }

    pub fn matches(&self, record: &InventoryRecord) -> bool {
        self.brand.as_deref().map_or(true, |b| record.brand == b)
            && self
                .warehouse
                .as_deref()
                .map_or(true, |w| record.warehouse == w)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ExportRequest {
    pub format: ExportFormat,
    pub fields: Vec<String>,
    #[serde(default)]
    pub filters: ExportFilters,
}

/// Field names accepted by exports, in the default column order
pub const EXPORT_FIELDS: &[&str] = &[
    "sku",
    "name",
    "brand",
    "warehouse",
    "product_type",
    "category",
    "gender",
    "size",
    "design",
    "color",
    "color_code",
    "material",
    "weight",
    "composition",
    "mrp",
    "selling_price",
    "cost_price",
    "quantity",
    "low_stock_threshold",
    "status",
];

/// Render one export cell; `None` for an unknown field name
pub fn export_value(record: &InventoryRecord, field: &str) -> Option<String> {
    let value = match field {
        "sku" => record.sku.clone(),
        "name" => record.name.clone(),
        "brand" => record.brand.clone(),
        "warehouse" => record.warehouse.clone(),
        "product_type" => record.product_type().to_string(),
        "category" => record.category.clone(),
        "gender" => record.gender_label().to_string(),
        "size" => record.size.clone(),
        "design" => record.design.clone(),
        "color" => record.color.clone(),
        "color_code" => record.color_code.clone().unwrap_or_default(),
        "material" => record.material().to_string(),
        "weight" => record.weight().to_string(),
        "composition" => record.fabric_specs.composition.clone().unwrap_or_default(),
        "mrp" => record.mrp.to_string(),
        "selling_price" => record.selling_price.to_string(),
        "cost_price" => record.cost_price.map(|c| c.to_string()).unwrap_or_default(),
        "quantity" => record.quantity.to_string(),
        "low_stock_threshold" => record.low_stock_threshold.to_string(),
        "status" => record.status.as_str().to_string(),
        _ => return None,
    };
    Some(value)
}

/// A saved column selection for exports
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ExportTemplate {
    pub id: String,
    pub name: String,
    pub fields: Vec<String>,
    #[serde(default)]
    pub is_default: bool,
    #[serde(default)]
    pub created_by: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportTemplateInput {
    pub name: String,
    pub fields: Vec<String>,
    #[serde(default)]
    pub is_default: bool,
}

fn builtin(id: &str, name: &str, fields: &[&str]) -> ExportTemplate {
    ExportTemplate {
        id: id.to_string(),
        name: name.to_string(),
        fields: fields.iter().map(|f| f.to_string()).collect(),
        is_default: true,
        created_by: None,
    }
}

/// Templates available to every user
pub fn builtin_export_templates() -> Vec<ExportTemplate> {
    vec![
        builtin(
            "basic",
            "Basic Info",
            &["sku", "name", "brand", "warehouse", "category", "quantity"],
        ),
        builtin(
            "full",
            "Full Details",
            &[
                "sku", "name", "brand", "warehouse", "category", "gender", "size", "design",
                "color", "mrp", "selling_price", "cost_price", "quantity", "material", "weight",
            ],
        ),
        builtin(
            "pricing",
            "Pricing Report",
            &[
                "sku", "name", "brand", "category", "mrp", "selling_price", "cost_price",
                "quantity",
            ],
        ),
        builtin(
            "stock",
            "Stock Report",
            &["sku", "name", "warehouse", "category", "size", "quantity", "status"],
        ),
    ]
}

/// Id of a stored (non-builtin) template
pub fn new_template_id() -> String {
    Uuid::new_v4().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_templates_use_known_fields() {
        for template in builtin_export_templates() {
            for field in &template.fields {
                assert!(EXPORT_FIELDS.contains(&field.as_str()), "{}", field);
            }
        }
    }

    #[test]
    fn test_export_filters_from_selectors() {
        let filters = ExportFilters::from_selectors(&Selector::only("Nike"), &Selector::All);
        assert_eq!(filters.brand.as_deref(), Some("Nike"));
        assert!(filters.warehouse.is_none());

        let nike = InventoryRecord {
            brand: "Nike".into(),
            warehouse: "W1".into(),
            ..Default::default()
        };
        let puma = InventoryRecord {
            brand: "Puma".into(),
            ..Default::default()
        };
        assert!(filters.matches(&nike));
        assert!(!filters.matches(&puma));
    }

    #[test]
    fn test_export_value_unknown_field() {
        let record = InventoryRecord::default();
        assert_eq!(export_value(&record, "product_type").as_deref(), Some("Clothing"));
        assert!(export_value(&record, "password_hash").is_none());
    }

    #[test]
    fn test_partial_import() {
        let mut report = ImportReport {
            total_rows: 3,
            inserted: 2,
            ..Default::default()
        };
        assert!(!report.is_partial());
        report.record_failure(4, "quantity: must be a whole number");
        assert!(report.is_partial());
        assert_eq!(report.errors[0].row, 4);
    }
}
