//! Grouping engine: collapse size/warehouse variants into product groups

use std::collections::HashMap;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::size::compare_sizes;
use crate::models::InventoryRecord;

/// A record field that can take part in the group identity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GroupField {
    ProductType,
    Category,
    Name,
    Design,
    Color,
    Material,
    Gender,
    Weight,
    Brand,
}

impl GroupField {
    pub fn value<'a>(&self, record: &'a InventoryRecord) -> &'a str {
        match self {
            GroupField::ProductType => record.product_type(),
            GroupField::Category => &record.category,
            GroupField::Name => &record.name,
            GroupField::Design => &record.design,
            GroupField::Color => &record.color,
            GroupField::Material => record.material(),
            GroupField::Gender => record.gender_label(),
            GroupField::Weight => record.weight(),
            GroupField::Brand => &record.brand,
        }
    }
}

/// Ordered list of fields forming the group identity
///
/// The default is product type, category, name, design, color, material and
/// gender. Fabric weight is deliberately left out, so records differing only
/// by weight share a group unless a caller adds [`GroupField::Weight`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GroupKeyFields(pub Vec<GroupField>);

impl Default for GroupKeyFields {
    fn default() -> Self {
        Self(vec![
            GroupField::ProductType,
            GroupField::Category,
            GroupField::Name,
            GroupField::Design,
            GroupField::Color,
            GroupField::Material,
            GroupField::Gender,
        ])
    }
}

impl GroupKeyFields {
    pub fn key_for(&self, record: &InventoryRecord) -> GroupKey {
        GroupKey::from_parts(self.0.iter().map(|f| f.value(record)))
    }
}

const KEY_SEPARATOR: char = '|';
const KEY_ESCAPE: char = '\\';

/// Identity of a product group
///
/// Components are joined with `|`; a literal `|` or `\` inside a component is
/// backslash-escaped, so distinct component lists never encode alike.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GroupKey(String);

impl GroupKey {
    pub fn from_parts<'a>(parts: impl IntoIterator<Item = &'a str>) -> Self {
        let mut encoded = String::new();
        for (i, part) in parts.into_iter().enumerate() {
            if i > 0 {
                encoded.push(KEY_SEPARATOR);
            }
            for c in part.chars() {
                if c == KEY_SEPARATOR || c == KEY_ESCAPE {
                    encoded.push(KEY_ESCAPE);
                }
                encoded.push(c);
            }
        }
        GroupKey(encoded)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<String> for GroupKey {
    fn from(encoded: String) -> Self {
        GroupKey(encoded)
    }
}

impl std::fmt::Display for GroupKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Variants sharing one group key
///
/// Only [`group`] builds these, so `variants` is never empty. Aggregates are
/// computed from `variants` on every call.
#[derive(Debug, Clone, PartialEq)]
pub struct ProductGroup {
    pub key: GroupKey,
    pub variants: Vec<InventoryRecord>,
}

impl ProductGroup {
    fn lead(&self) -> Option<&InventoryRecord> {
        self.variants.first()
    }

    pub fn product_type(&self) -> &str {
        self.lead().map(|r| r.product_type()).unwrap_or("")
    }

    pub fn category(&self) -> &str {
        self.lead().map(|r| r.category.as_str()).unwrap_or("")
    }

    pub fn name(&self) -> &str {
        self.lead().map(|r| r.name.as_str()).unwrap_or("")
    }

    pub fn design(&self) -> &str {
        self.lead().map(|r| r.design.as_str()).unwrap_or("")
    }

    pub fn color(&self) -> &str {
        self.lead().map(|r| r.color.as_str()).unwrap_or("")
    }

    pub fn material(&self) -> &str {
        self.lead().map(|r| r.material()).unwrap_or("")
    }

    pub fn gender(&self) -> &str {
        self.lead().map(|r| r.gender_label()).unwrap_or("")
    }

    pub fn is_singleton(&self) -> bool {
        self.variants.len() == 1
    }

    pub fn total_quantity(&self) -> i64 {
        self.variants.iter().map(|r| i64::from(r.quantity)).sum()
    }

    pub fn total_value(&self) -> Decimal {
        self.variants.iter().map(InventoryRecord::line_value).sum()
    }

    pub fn price_min(&self) -> Decimal {
        self.variants
            .iter()
            .map(|r| r.selling_price)
            .min()
            .unwrap_or(Decimal::ZERO)
    }

    pub fn price_max(&self) -> Decimal {
        self.variants
            .iter()
            .map(|r| r.selling_price)
            .max()
            .unwrap_or(Decimal::ZERO)
    }

    /// Any single variant at or below its threshold
    pub fn has_low_stock(&self) -> bool {
        self.variants.iter().any(InventoryRecord::is_low_stock)
    }

    pub fn summary(&self, expanded: bool) -> GroupSummary {
        GroupSummary {
            key: self.key.clone(),
            product_type: self.product_type().to_string(),
            category: self.category().to_string(),
            name: self.name().to_string(),
            design: self.design().to_string(),
            color: self.color().to_string(),
            material: self.material().to_string(),
            gender: self.gender().to_string(),
            sizes: self.variants.iter().map(|r| r.size.clone()).collect(),
            variant_count: self.variants.len(),
            total_quantity: self.total_quantity(),
            total_value: self.total_value(),
            price_min: self.price_min(),
            price_max: self.price_max(),
            has_low_stock: self.has_low_stock(),
            expanded,
        }
    }
}

/// Serialisable snapshot of a group for the summary row
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroupSummary {
    pub key: GroupKey,
    pub product_type: String,
    pub category: String,
    pub name: String,
    pub design: String,
    pub color: String,
    pub material: String,
    pub gender: String,
    pub sizes: Vec<String>,
    pub variant_count: usize,
    pub total_quantity: i64,
    pub total_value: Decimal,
    pub price_min: Decimal,
    pub price_max: Decimal,
    pub has_low_stock: bool,
    pub expanded: bool,
}

/// Partition `records` into groups
///
/// Groups appear in first-occurrence order of their key. Variants inside a
/// group are ordered by canonical size; equal sizes keep input order.
pub fn group(records: &[InventoryRecord], fields: &GroupKeyFields) -> Vec<ProductGroup> {
    let mut index: HashMap<GroupKey, usize> = HashMap::new();
    let mut groups: Vec<ProductGroup> = Vec::new();

    for record in records {
        let key = fields.key_for(record);
        match index.get(&key) {
            Some(&slot) => groups[slot].variants.push(record.clone()),
            None => {
                index.insert(key.clone(), groups.len());
                groups.push(ProductGroup {
                    key,
                    variants: vec![record.clone()],
                });
            }
        }
    }

    for group in &mut groups {
        group.variants.sort_by(|a, b| compare_sizes(&a.size, &b.size));
    }
    groups
}
