//! Sort engine over flat records or product groups

use std::cmp::Ordering;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::grouping::ProductGroup;
use crate::models::InventoryRecord;

/// Sortable columns; anything else is rejected by [`SortKey::parse`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SortKey {
    #[serde(rename = "category")]
    Category,
    #[serde(rename = "name")]
    Name,
    #[serde(rename = "sku")]
    Sku,
    #[serde(rename = "design")]
    Design,
    #[serde(rename = "size")]
    Size,
    #[serde(rename = "quantity")]
    Quantity,
    #[serde(rename = "selling_price")]
    SellingPrice,
    #[serde(rename = "totalValue")]
    TotalValue,
}

impl SortKey {
    pub const ALL: [SortKey; 8] = [
        SortKey::Category,
        SortKey::Name,
        SortKey::Sku,
        SortKey::Design,
        SortKey::Size,
        SortKey::Quantity,
        SortKey::SellingPrice,
        SortKey::TotalValue,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            SortKey::Category => "category",
            SortKey::Name => "name",
            SortKey::Sku => "sku",
            SortKey::Design => "design",
            SortKey::Size => "size",
            SortKey::Quantity => "quantity",
            SortKey::SellingPrice => "selling_price",
            SortKey::TotalValue => "totalValue",
        }
    }

    pub fn parse(field: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|k| k.as_str() == field)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

impl SortDirection {
    pub fn toggled(self) -> Self {
        match self {
            SortDirection::Asc => SortDirection::Desc,
            SortDirection::Desc => SortDirection::Asc,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SortState {
    pub key: Option<SortKey>,
    #[serde(default)]
    pub direction: SortDirection,
}

impl SortState {
    pub fn by(key: SortKey, direction: SortDirection) -> Self {
        Self {
            key: Some(key),
            direction,
        }
    }

    /// Header click on `field`
    ///
    /// Same key flips the direction, a new key starts ascending. Fields
    /// outside the allow-list leave the state as it was.
    pub fn request(self, field: &str) -> Self {
        match SortKey::parse(field) {
            Some(key) => self.toggle(key),
            None => self,
        }
    }

    pub fn toggle(self, key: SortKey) -> Self {
        if self.key == Some(key) {
            Self {
                key: Some(key),
                direction: self.direction.toggled(),
            }
        } else {
            Self::by(key, SortDirection::Asc)
        }
    }
}

/// Comparable value of one item under a sort key
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub enum SortValue<'a> {
    Text(&'a str),
    Number(Decimal),
}

pub trait Sortable {
    fn sort_value(&self, key: SortKey) -> SortValue<'_>;
}

impl Sortable for InventoryRecord {
    fn sort_value(&self, key: SortKey) -> SortValue<'_> {
        match key {
            SortKey::Category => SortValue::Text(&self.category),
            SortKey::Name => SortValue::Text(&self.name),
            SortKey::Sku => SortValue::Text(&self.sku),
            SortKey::Design => SortValue::Text(&self.design),
            SortKey::Size => SortValue::Text(&self.size),
            SortKey::Quantity => SortValue::Number(Decimal::from(self.quantity)),
            SortKey::SellingPrice => SortValue::Number(self.selling_price),
            SortKey::TotalValue => SortValue::Number(self.line_value()),
        }
    }
}

/// Groups sort by their aggregates
///
/// `selling_price` uses the lower bound of the price range, so groups with
/// the cheapest variant come first when ascending. `sku` and `size` read
/// the first variant in size order.
impl Sortable for ProductGroup {
    fn sort_value(&self, key: SortKey) -> SortValue<'_> {
        match key {
            SortKey::Category => SortValue::Text(self.category()),
            SortKey::Name => SortValue::Text(self.name()),
            SortKey::Design => SortValue::Text(self.design()),
            SortKey::Sku => SortValue::Text(self.variants.first().map(|r| r.sku.as_str()).unwrap_or("")),
            SortKey::Size => SortValue::Text(self.variants.first().map(|r| r.size.as_str()).unwrap_or("")),
            SortKey::Quantity => SortValue::Number(Decimal::from(self.total_quantity())),
            SortKey::SellingPrice => SortValue::Number(self.price_min()),
            SortKey::TotalValue => SortValue::Number(self.total_value()),
        }
    }
}

fn compare<T: Sortable>(a: &T, b: &T, key: SortKey, direction: SortDirection) -> Ordering {
    let ordering = a.sort_value(key).cmp(&b.sort_value(key));
    match direction {
        SortDirection::Asc => ordering,
        SortDirection::Desc => ordering.reverse(),
    }
}

/// Stable in-place sort; no key means no reordering
pub fn sort_in_place<T: Sortable>(items: &mut [T], state: &SortState) {
    if let Some(key) = state.key {
        items.sort_by(|a, b| compare(a, b, key, state.direction));
    }
}

pub fn sort<T: Sortable + Clone>(items: &[T], state: &SortState) -> Vec<T> {
    let mut sorted = items.to_vec();
    sort_in_place(&mut sorted, state);
    sorted
}
