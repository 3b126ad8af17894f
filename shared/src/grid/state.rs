//! Immutable grid state and the full derivation pipeline
//!
//! records -> filter -> (group) -> sort -> paginate -> rows, with totals
//! taken from the sorted set before pagination.

use serde::{Deserialize, Serialize};

use super::expansion::ExpansionState;
use super::filter::{self, FilterField, FilterState};
use super::grouping::{group, GroupKey, GroupKeyFields, GroupSummary};
use super::pagination::{page_window, paginate, Page, PageLink, PageSize};
use super::sort::{sort_in_place, SortState};
use super::totals::{group_totals, totals, Totals};
use crate::models::InventoryRecord;
use crate::types::Selector;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DisplayMode {
    #[default]
    Flat,
    Grouped,
}

/// Everything the grid derives its view from
///
/// Each transition returns a new state. Filter, sort, page size, mode and
/// grouping changes send the user back to page 1.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GridState {
    #[serde(default)]
    pub filters: FilterState,
    #[serde(default)]
    pub sort: SortState,
    #[serde(default)]
    pub page_size: PageSize,
    #[serde(default = "first_page")]
    pub current_page: usize,
    #[serde(default)]
    pub expansion: ExpansionState,
    #[serde(default)]
    pub mode: DisplayMode,
    #[serde(default)]
    pub grouping: GroupKeyFields,
}

fn first_page() -> usize {
    1
}

impl Default for GridState {
    fn default() -> Self {
        Self {
            filters: FilterState::default(),
            sort: SortState::default(),
            page_size: PageSize::default(),
            current_page: 1,
            expansion: ExpansionState::default(),
            mode: DisplayMode::default(),
            grouping: GroupKeyFields::default(),
        }
    }
}

impl GridState {
    pub fn with_filters(self, filters: FilterState) -> Self {
        Self {
            filters,
            current_page: 1,
            ..self
        }
    }

    pub fn search(self, term: impl Into<String>) -> Self {
        let filters = self.filters.clone().with_search(term);
        self.with_filters(filters)
    }

    pub fn filter_column(self, field: FilterField, term: impl Into<String>) -> Self {
        let filters = self.filters.clone().with_column(field, term);
        self.with_filters(filters)
    }

    pub fn select_brand(self, brand: Selector) -> Self {
        let filters = self.filters.clone().with_brand(brand);
        self.with_filters(filters)
    }

    pub fn select_warehouse(self, warehouse: Selector) -> Self {
        let filters = self.filters.clone().with_warehouse(warehouse);
        self.with_filters(filters)
    }

    pub fn clear_filters(self) -> Self {
        self.with_filters(FilterState::cleared())
    }

    /// Header click; ignored fields leave the state, page included, untouched
    pub fn sort_by(self, field: &str) -> Self {
        let sort = self.sort.request(field);
        if sort == self.sort {
            return self;
        }
        Self {
            sort,
            current_page: 1,
            ..self
        }
    }

    pub fn with_page_size(self, page_size: PageSize) -> Self {
        Self {
            page_size,
            current_page: 1,
            ..self
        }
    }

    /// Clamped against the data when the view is computed
    pub fn go_to_page(self, page: usize) -> Self {
        Self {
            current_page: page.max(1),
            ..self
        }
    }

    pub fn with_mode(self, mode: DisplayMode) -> Self {
        Self {
            mode,
            current_page: 1,
            ..self
        }
    }

    pub fn with_grouping(self, grouping: GroupKeyFields) -> Self {
        Self {
            grouping,
            current_page: 1,
            ..self
        }
    }

    /// Expansion never moves the page
    pub fn toggle_group(self, key: &GroupKey) -> Self {
        let expansion = self.expansion.clone().toggle(key);
        Self { expansion, ..self }
    }

    pub fn view(&self, records: &[InventoryRecord]) -> GridView {
        let filtered = filter::apply(records, &self.filters);
        match self.mode {
            DisplayMode::Flat => self.flat_view(filtered),
            DisplayMode::Grouped => self.grouped_view(&filtered),
        }
    }

    fn flat_view(&self, mut records: Vec<InventoryRecord>) -> GridView {
        sort_in_place(&mut records, &self.sort);
        let totals = totals(&records);
        let page = paginate(&records, self.page_size, self.current_page);
        let rows = page.items.iter().cloned().map(GridRow::Item).collect();
        GridView::new(DisplayMode::Flat, rows, &page, totals)
    }

    fn grouped_view(&self, records: &[InventoryRecord]) -> GridView {
        let mut groups = group(records, &self.grouping);
        sort_in_place(&mut groups, &self.sort);
        let totals = group_totals(&groups);
        let page = paginate(&groups, self.page_size, self.current_page);

        let mut rows = Vec::new();
        for g in &page.items {
            if g.is_singleton() {
                rows.extend(g.variants.iter().cloned().map(GridRow::Item));
                continue;
            }
            let expanded = self.expansion.is_expanded(&g.key);
            rows.push(GridRow::Group(g.summary(expanded)));
            if expanded {
                rows.extend(g.variants.iter().map(|record| GridRow::Variant {
                    group_key: g.key.clone(),
                    record: record.clone(),
                }));
            }
        }
        GridView::new(DisplayMode::Grouped, rows, &page, totals)
    }
}

/// A rendered row
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum GridRow {
    /// Flat row, or the only member of a singleton group
    Item(InventoryRecord),
    /// Collapsed group, or the header of an expanded one
    Group(GroupSummary),
    Variant {
        group_key: GroupKey,
        record: InventoryRecord,
    },
}

/// What the table renders for one state over one record list
///
/// Page numbers count flat records in flat mode and groups in grouped mode.
/// `totals` always counts records.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GridView {
    pub mode: DisplayMode,
    pub rows: Vec<GridRow>,
    pub current_page: usize,
    pub total_pages: usize,
    pub start_index: usize,
    pub end_index: usize,
    pub total_items: usize,
    /// "Showing X to Y of Z entries"
    pub range: (usize, usize, usize),
    pub pages: Vec<PageLink>,
    pub totals: Totals,
}

impl GridView {
    fn new<T>(mode: DisplayMode, rows: Vec<GridRow>, page: &Page<T>, totals: Totals) -> Self {
        Self {
            mode,
            rows,
            current_page: page.current_page,
            total_pages: page.total_pages,
            start_index: page.start_index,
            end_index: page.end_index,
            total_items: page.total_items,
            range: page.range_label(),
            pages: page_window(page.current_page, page.total_pages),
            totals,
        }
    }

    pub fn range_label(&self) -> (usize, usize, usize) {
        self.range
    }

    /// Records on this page in row order, skipping group headers
    pub fn records(&self) -> Vec<&InventoryRecord> {
        self.rows
            .iter()
            .filter_map(|row| match row {
                GridRow::Item(record) => Some(record),
                GridRow::Variant { record, .. } => Some(record),
                GridRow::Group(_) => None,
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;

    fn record(sku: &str, brand: &str, warehouse: &str, quantity: i32, price: i64) -> InventoryRecord {
        InventoryRecord {
            sku: sku.into(),
            name: format!("Item {}", sku),
            brand: brand.into(),
            warehouse: warehouse.into(),
            quantity,
            selling_price: Decimal::from(price),
            ..Default::default()
        }
    }

    fn variant(name: &str, size: &str, quantity: i32) -> InventoryRecord {
        InventoryRecord {
            sku: format!("{}-{}", name, size),
            name: name.into(),
            size: size.into(),
            quantity,
            selling_price: Decimal::from(10),
            ..Default::default()
        }
    }

    fn skus(view: &GridView) -> Vec<&str> {
        view.records().iter().map(|r| r.sku.as_str()).collect()
    }

    #[test]
    fn test_brand_filter_then_total_value_sort() {
        let records = vec![
            record("A1", "Nike", "W1", 5, 100),
            record("A2", "Nike", "W2", 10, 200),
        ];
        let state = GridState::default()
            .select_brand(Selector::only("Nike"))
            .select_warehouse(Selector::All)
            .sort_by("totalValue")
            .sort_by("totalValue");

        let view = state.view(&records);
        assert_eq!(skus(&view), vec!["A2", "A1"]);
        assert_eq!(view.totals.count, 2);
        assert_eq!(view.totals.total_quantity, 15);
        assert_eq!(view.totals.total_value, Decimal::from(2500));
    }

    #[test]
    fn test_no_matches_is_empty_single_page() {
        let records = vec![record("A1", "Nike", "W1", 5, 100)];
        let view = GridState::default()
            .select_brand(Selector::only("Adidas"))
            .view(&records);

        assert_eq!(view.total_pages, 1);
        assert!(view.rows.is_empty());
        assert_eq!(view.totals, Totals::default());
        assert_eq!(view.range_label(), (0, 0, 0));
    }

    #[test]
    fn test_grouped_range_counts_groups() {
        let records = vec![
            variant("Tee", "S(38)", 1),
            variant("Tee", "M(40)", 1),
            variant("Polo", "M(40)", 1),
            variant("Cap", "M(40)", 1),
        ];
        let view = GridState::default()
            .with_mode(DisplayMode::Grouped)
            .with_page_size(PageSize::Entries(2))
            .go_to_page(2)
            .view(&records);

        assert_eq!(view.range_label(), (3, 3, 3));
        assert_eq!(view.range, (3, 3, 3));
        assert_eq!(view.totals.count, 4);
    }

    #[test]
    fn test_filter_change_resets_page() {
        let state = GridState::default().go_to_page(3).search("x");
        assert_eq!(state.current_page, 1);

        let state = state.go_to_page(3).sort_by("name");
        assert_eq!(state.current_page, 1);
    }

    #[test]
    fn test_ignored_sort_keeps_page() {
        let state = GridState::default().go_to_page(3).sort_by("warehouse");
        assert_eq!(state.current_page, 3);
        assert_eq!(state.sort, SortState::default());
    }

    #[test]
    fn test_totals_ignore_pagination() {
        let records: Vec<_> = (0..45)
            .map(|i| record(&format!("S{}", i), "Nike", "W1", 1, 2))
            .collect();
        let view = GridState::default().go_to_page(10).view(&records);
        assert_eq!(view.current_page, 3);
        assert_eq!(view.rows.len(), 5);
        assert_eq!(view.totals.count, 45);
        assert_eq!(view.totals.total_value, Decimal::from(90));
    }

    #[test]
    fn test_grouped_rows_follow_expansion() {
        let records = vec![
            variant("Tee", "M(40)", 1),
            variant("Tee", "S(38)", 2),
            variant("Polo", "L(42)", 3),
        ];
        let state = GridState::default().with_mode(DisplayMode::Grouped);
        let view = state.view(&records);

        assert_eq!(view.total_items, 2);
        assert_eq!(view.rows.len(), 2);
        let key = match &view.rows[0] {
            GridRow::Group(summary) => {
                assert!(!summary.expanded);
                assert_eq!(summary.total_quantity, 3);
                assert_eq!(summary.sizes, vec!["S(38)", "M(40)"]);
                summary.key.clone()
            }
            other => panic!("expected group row, got {:?}", other),
        };
        assert!(matches!(&view.rows[1], GridRow::Item(r) if r.name == "Polo"));

        let expanded = state.toggle_group(&key).view(&records);
        assert_eq!(expanded.rows.len(), 4);
        assert!(matches!(&expanded.rows[0], GridRow::Group(s) if s.expanded));
        assert_eq!(skus(&expanded), vec!["Tee-S(38)", "Tee-M(40)", "Polo-L(42)"]);
        assert_eq!(expanded.total_pages, view.total_pages);
    }

    #[test]
    fn test_singleton_group_ignores_expansion() {
        let records = vec![variant("Polo", "L(42)", 3)];
        let state = GridState::default().with_mode(DisplayMode::Grouped);
        let key = GroupKeyFields::default().key_for(&records[0]);

        let view = state.toggle_group(&key).view(&records);
        assert_eq!(view.rows.len(), 1);
        assert!(matches!(view.rows[0], GridRow::Item(_)));
    }

    #[test]
    fn test_grouped_mode_paginates_groups() {
        let records: Vec<_> = (0..5)
            .flat_map(|i| {
                let name = format!("P{}", i);
                vec![variant(&name, "S(38)", 1), variant(&name, "M(40)", 1)]
            })
            .collect();
        let view = GridState::default()
            .with_mode(DisplayMode::Grouped)
            .with_page_size(PageSize::Entries(2))
            .go_to_page(3)
            .view(&records);

        assert_eq!(view.total_pages, 3);
        assert_eq!(view.rows.len(), 1);
        assert_eq!(view.totals.count, 10);
    }

    #[test]
    fn test_column_filter_removes_variants_before_grouping() {
        let records = vec![
            variant("Tee", "S(38)", 1),
            variant("Tee", "M(40)", 5),
            variant("Polo", "S(38)", 7),
        ];
        let state = GridState::default()
            .with_mode(DisplayMode::Grouped)
            .filter_column(FilterField::Size, "m(");
        let view = state.view(&records);

        assert_eq!(view.total_items, 1);
        assert_eq!(skus(&view), vec!["Tee-M(40)"]);
        assert_eq!(view.totals.total_quantity, 5);

        let view = GridState::default()
            .with_mode(DisplayMode::Grouped)
            .filter_column(FilterField::Quantity, "7")
            .view(&records);
        assert_eq!(skus(&view), vec!["Polo-S(38)"]);
    }

    #[test]
    fn test_page_size_all() {
        let records: Vec<_> = (0..33)
            .map(|i| record(&format!("S{}", i), "Nike", "W1", 1, 1))
            .collect();
        let view = GridState::default()
            .with_page_size(PageSize::All)
            .view(&records);
        assert_eq!(view.total_pages, 1);
        assert_eq!(view.rows.len(), 33);
    }

    #[test]
    fn test_state_serializes() {
        let state = GridState::default().sort_by("quantity");
        let json = serde_json::to_string(&state).unwrap();
        let back: GridState = serde_json::from_str(&json).unwrap();
        assert_eq!(back, state);

        let minimal: GridState = serde_json::from_str("{}").unwrap();
        assert_eq!(minimal, GridState::default());
    }
}
