//! Filter engine: global search, per-column filters and the brand/warehouse selectors

use std::borrow::Cow;
use std::collections::BTreeMap;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::models::InventoryRecord;
use crate::types::Selector;

/// A column that accepts a per-column filter
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FilterField {
    ProductType,
    Category,
    Name,
    Sku,
    Design,
    Size,
    Brand,
    Warehouse,
    Color,
    Material,
    Gender,
    Quantity,
    SellingPrice,
}

impl FilterField {
    pub fn as_str(&self) -> &'static str {
        match self {
            FilterField::ProductType => "product_type",
            FilterField::Category => "category",
            FilterField::Name => "name",
            FilterField::Sku => "sku",
            FilterField::Design => "design",
            FilterField::Size => "size",
            FilterField::Brand => "brand",
            FilterField::Warehouse => "warehouse",
            FilterField::Color => "color",
            FilterField::Material => "material",
            FilterField::Gender => "gender",
            FilterField::Quantity => "quantity",
            FilterField::SellingPrice => "selling_price",
        }
    }

    /// The field's string form on `record`; absent values read as ""
    pub fn text<'a>(&self, record: &'a InventoryRecord) -> Cow<'a, str> {
        match self {
            FilterField::ProductType => Cow::Borrowed(record.product_type()),
            FilterField::Category => Cow::Borrowed(&record.category),
            FilterField::Name => Cow::Borrowed(&record.name),
            FilterField::Sku => Cow::Borrowed(&record.sku),
            FilterField::Design => Cow::Borrowed(&record.design),
            FilterField::Size => Cow::Borrowed(&record.size),
            FilterField::Brand => Cow::Borrowed(&record.brand),
            FilterField::Warehouse => Cow::Borrowed(&record.warehouse),
            FilterField::Color => Cow::Borrowed(&record.color),
            FilterField::Material => Cow::Borrowed(record.material()),
            FilterField::Gender => Cow::Borrowed(record.gender_label()),
            FilterField::Quantity => Cow::Owned(record.quantity.to_string()),
            FilterField::SellingPrice => Cow::Owned(render_decimal(record.selling_price)),
        }
    }
}

/// Text fields the global search looks at
const SEARCH_TEXT_FIELDS: [FilterField; 8] = [
    FilterField::Category,
    FilterField::Name,
    FilterField::Sku,
    FilterField::Design,
    FilterField::Size,
    FilterField::Brand,
    FilterField::Warehouse,
    FilterField::Color,
];

/// Shortest decimal rendering, e.g. `100.00` -> `100`
pub fn render_decimal(value: Decimal) -> String {
    value.normalize().to_string()
}

fn contains_ci(haystack: &str, needle_lower: &str) -> bool {
    haystack.to_lowercase().contains(needle_lower)
}

/// Active filters; every change produces a new value
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterState {
    #[serde(default)]
    pub search: String,
    #[serde(default)]
    pub columns: BTreeMap<FilterField, String>,
    #[serde(default)]
    pub brand: Selector,
    #[serde(default)]
    pub warehouse: Selector,
}

impl FilterState {
    pub fn with_search(mut self, term: impl Into<String>) -> Self {
        self.search = term.into();
        self
    }

    /// Set a column filter; an empty term removes it
    pub fn with_column(mut self, field: FilterField, term: impl Into<String>) -> Self {
        let term = term.into();
        if term.trim().is_empty() {
            self.columns.remove(&field);
        } else {
            self.columns.insert(field, term);
        }
        self
    }

    /// Select a brand; picking a specific brand resets the warehouse to ALL
    pub fn with_brand(mut self, brand: Selector) -> Self {
        if !brand.is_all() {
            self.warehouse = Selector::All;
        }
        self.brand = brand;
        self
    }

    pub fn with_warehouse(mut self, warehouse: Selector) -> Self {
        self.warehouse = warehouse;
        self
    }

    /// Back to ALL/empty everywhere
    pub fn cleared() -> Self {
        Self::default()
    }

    fn search_term(&self) -> Option<String> {
        let term = self.search.trim();
        (!term.is_empty()).then(|| term.to_lowercase())
    }

    pub fn is_active(&self) -> bool {
        self.search_term().is_some()
            || !self.columns.is_empty()
            || !self.brand.is_all()
            || !self.warehouse.is_all()
    }

    /// Whether `record` passes every active filter
    pub fn matches(&self, record: &InventoryRecord) -> bool {
        if !self.brand.matches(&record.brand) || !self.warehouse.matches(&record.warehouse) {
            return false;
        }
        if let Some(term) = self.search_term() {
            if !matches_search(record, &term) {
                return false;
            }
        }
        self.columns.iter().all(|(field, term)| {
            let term = term.trim().to_lowercase();
            term.is_empty() || contains_ci(&field.text(record), &term)
        })
    }
}

/// Any text field contains the term, or the numeric renderings do
fn matches_search(record: &InventoryRecord, term_lower: &str) -> bool {
    SEARCH_TEXT_FIELDS
        .iter()
        .any(|field| contains_ci(&field.text(record), term_lower))
        || record.quantity.to_string().contains(term_lower)
        || render_decimal(record.selling_price).contains(term_lower)
}

/// Records passing `filters`, in input order
pub fn apply(records: &[InventoryRecord], filters: &FilterState) -> Vec<InventoryRecord> {
    if !filters.is_active() {
        return records.to_vec();
    }
    records
        .iter()
        .filter(|r| filters.matches(r))
        .cloned()
        .collect()
}
