//! Footer totals over the filtered, sorted, unpaginated set

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::grouping::ProductGroup;
use crate::models::InventoryRecord;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Totals {
    pub count: usize,
    pub total_quantity: i64,
    pub total_value: Decimal,
}

impl Totals {
    pub fn add(&mut self, record: &InventoryRecord) {
        self.count += 1;
        self.total_quantity += i64::from(record.quantity);
        self.total_value += record.line_value();
    }
}

pub fn totals<'a>(records: impl IntoIterator<Item = &'a InventoryRecord>) -> Totals {
    let mut totals = Totals::default();
    for record in records {
        totals.add(record);
    }
    totals
}

/// Totals over groups, counted per variant
pub fn group_totals(groups: &[ProductGroup]) -> Totals {
    totals(groups.iter().flat_map(|g| g.variants.iter()))
}
