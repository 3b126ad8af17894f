//! Master data and selector reference data

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use super::InventoryRecord;

/// A curated list in the settings area
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "snake_case")]
pub enum MasterDataKind {
    Brands,
    Warehouses,
    Categories,
    Sizes,
    Colors,
    Materials,
    Designs,
    Weights,
    ProductTypes,
}

impl MasterDataKind {
    pub const ALL: [MasterDataKind; 9] = [
        MasterDataKind::Brands,
        MasterDataKind::Warehouses,
        MasterDataKind::Categories,
        MasterDataKind::Sizes,
        MasterDataKind::Colors,
        MasterDataKind::Materials,
        MasterDataKind::Designs,
        MasterDataKind::Weights,
        MasterDataKind::ProductTypes,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            MasterDataKind::Brands => "brands",
            MasterDataKind::Warehouses => "warehouses",
            MasterDataKind::Categories => "categories",
            MasterDataKind::Sizes => "sizes",
            MasterDataKind::Colors => "colors",
            MasterDataKind::Materials => "materials",
            MasterDataKind::Designs => "designs",
            MasterDataKind::Weights => "weights",
            MasterDataKind::ProductTypes => "product_types",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|k| k.as_str() == value)
    }
}

impl std::fmt::Display for MasterDataKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// product_type -> category -> product names
pub type ProductHierarchy = BTreeMap<String, BTreeMap<String, Vec<String>>>;

/// All curated lists plus the product hierarchy
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct MasterData {
    #[serde(flatten)]
    pub lists: BTreeMap<MasterDataKind, Vec<String>>,
    #[serde(default)]
    pub hierarchy: ProductHierarchy,
}

impl MasterData {
    pub fn values(&self, kind: MasterDataKind) -> &[String] {
        self.lists.get(&kind).map(Vec::as_slice).unwrap_or(&[])
    }
}

/// Reference values for the selectors and form dropdowns
///
/// Read-only: it never decides which values may appear in the inventory.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct FilterOptions {
    #[serde(default)]
    pub brands: Vec<String>,
    #[serde(default)]
    pub warehouses: Vec<String>,
    #[serde(default)]
    pub categories: Vec<String>,
    #[serde(default)]
    pub genders: Vec<String>,
    #[serde(default)]
    pub colors: Vec<String>,
    #[serde(default)]
    pub sizes: Vec<String>,
    #[serde(default)]
    pub designs: Vec<String>,
    #[serde(default)]
    pub materials: Vec<String>,
    #[serde(default)]
    pub weights: Vec<String>,
}

fn distinct<'a>(values: impl Iterator<Item = &'a str>) -> Vec<String> {
    values
        .filter(|v| !v.is_empty())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .map(str::to_string)
        .collect()
}

impl FilterOptions {
    /// Sorted distinct non-empty values seen in `records`
    pub fn from_records(records: &[InventoryRecord]) -> Self {
        Self {
            brands: distinct(records.iter().map(|r| r.brand.as_str())),
            warehouses: distinct(records.iter().map(|r| r.warehouse.as_str())),
            categories: distinct(records.iter().map(|r| r.category.as_str())),
            genders: distinct(records.iter().map(|r| r.gender_label())),
            colors: distinct(records.iter().map(|r| r.color.as_str())),
            sizes: distinct(records.iter().map(|r| r.size.as_str())),
            designs: distinct(records.iter().map(|r| r.design.as_str())),
            materials: distinct(records.iter().map(|r| r.material())),
            weights: distinct(records.iter().map(|r| r.weight())),
        }
    }
}

/// brand -> warehouses stocking it
pub type BrandWarehouses = BTreeMap<String, Vec<String>>;

pub fn brand_warehouses(records: &[InventoryRecord]) -> BrandWarehouses {
    let mut map: BTreeMap<String, BTreeSet<String>> = BTreeMap::new();
    for record in records {
        if record.brand.is_empty() || record.warehouse.is_empty() {
            continue;
        }
        map.entry(record.brand.clone())
            .or_default()
            .insert(record.warehouse.clone());
    }
    map.into_iter()
        .map(|(brand, warehouses)| (brand, warehouses.into_iter().collect()))
        .collect()
}
