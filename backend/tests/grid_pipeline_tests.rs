//! Dashboard grid pipeline tests
//!
//! End-to-end runs of filter -> group -> sort -> paginate -> totals as the
//! dashboard drives them, plus the CSV path from export columns back to an
//! import payload.

use proptest::prelude::*;
use rust_decimal::Decimal;
use shared::{
    export_value, parse_record_form, DisplayMode, FilterField, GridRow, GridState, GroupField,
    GroupKeyFields, InventoryRecord, PageLink, PageSize, RecordForm, Selector,
};

fn record(sku: &str, name: &str, brand: &str, warehouse: &str, size: &str, qty: i32, price: i64) -> InventoryRecord {
    InventoryRecord {
        sku: sku.into(),
        name: name.into(),
        brand: brand.into(),
        warehouse: warehouse.into(),
        category: "Tops".into(),
        design: "Plain".into(),
        color: "Navy".into(),
        size: size.into(),
        mrp: Decimal::new(price, 0),
        selling_price: Decimal::new(price, 0),
        quantity: qty,
        ..Default::default()
    }
}

fn polo_and_tee() -> Vec<InventoryRecord> {
    vec![
        record("P-L", "Polo", "Nike", "W1", "L(42)", 4, 100),
        record("T-M", "Tee", "Puma", "W2", "M(40)", 7, 50),
        record("P-S", "Polo", "Nike", "W1", "S(38)", 2, 100),
        record("P-M", "Polo", "Nike", "W1", "M(40)", 3, 100),
    ]
}

// ============================================================================
// Unit Tests
// ============================================================================

#[cfg(test)]
mod unit_tests {
    use super::*;

    /// 45 records, 20 per page, page 10 requested: the last page is shown
    #[test]
    fn test_out_of_range_page_clamps_to_last() {
        let records: Vec<_> = (0..45)
            .map(|i| record(&format!("S{:02}", i), &format!("Item {}", i), "Nike", "W1", "M", 1, 10))
            .collect();

        let view = GridState::default().go_to_page(10).view(&records);

        assert_eq!(view.current_page, 3);
        assert_eq!(view.total_pages, 3);
        assert_eq!(view.rows.len(), 5);
        assert_eq!(view.range_label(), (41, 45, 45));
        assert_eq!(
            view.pages,
            vec![PageLink::Number(1), PageLink::Number(2), PageLink::Number(3)]
        );
    }

    #[test]
    fn test_empty_inventory_view() {
        let view = GridState::default().view(&[]);
        assert!(view.rows.is_empty());
        assert_eq!(view.total_pages, 1);
        assert_eq!(view.range_label(), (0, 0, 0));
        assert_eq!(view.totals.count, 0);
    }

    #[test]
    fn test_grouped_view_collapses_sizes() {
        let state = GridState::default().with_mode(DisplayMode::Grouped);
        let view = state.view(&polo_and_tee());

        assert_eq!(view.total_items, 2);
        assert_eq!(view.rows.len(), 2);
        match &view.rows[0] {
            GridRow::Group(summary) => {
                assert_eq!(summary.name, "Polo");
                assert_eq!(summary.variant_count, 3);
                assert_eq!(summary.total_quantity, 9);
                assert_eq!(summary.total_value, Decimal::new(900, 0));
                assert!(!summary.expanded);
            }
            other => panic!("expected a group row, got {:?}", other),
        }
        assert!(matches!(&view.rows[1], GridRow::Item(r) if r.sku == "T-M"));

        // Totals count records, not groups
        assert_eq!(view.totals.count, 4);
        assert_eq!(view.totals.total_quantity, 16);
    }

    #[test]
    fn test_expanding_group_lists_variants_in_size_order() {
        let records = polo_and_tee();
        let state = GridState::default().with_mode(DisplayMode::Grouped);
        let key = match &state.view(&records).rows[0] {
            GridRow::Group(summary) => summary.key.clone(),
            other => panic!("expected a group row, got {:?}", other),
        };

        let expanded = state.toggle_group(&key);
        let view = expanded.view(&records);
        let skus: Vec<&str> = view.records().iter().map(|r| r.sku.as_str()).collect();
        assert_eq!(skus, vec!["P-S", "P-M", "P-L", "T-M"]);
        assert!(matches!(&view.rows[0], GridRow::Group(s) if s.expanded));
        assert_eq!(view.total_items, 2);

        // Toggling again collapses it
        let collapsed = expanded.toggle_group(&key).view(&records);
        assert_eq!(collapsed.rows.len(), 2);
    }

    #[test]
    fn test_brand_selection_resets_warehouse() {
        let mut records = polo_and_tee();
        records.push(record("P-XL", "Polo", "Nike", "W3", "XL(44)", 1, 100));

        let state = GridState::default()
            .select_warehouse(Selector::only("W2"))
            .select_brand(Selector::only("Nike"));

        assert!(state.filters.warehouse.is_all());
        let view = state.view(&records);
        assert_eq!(view.totals.count, 4);
        assert!(view.records().iter().all(|r| r.brand == "Nike"));
    }

    #[test]
    fn test_search_matches_text_and_numbers() {
        let records = polo_and_tee();
        let by_name = GridState::default().search("tee").view(&records);
        assert_eq!(by_name.totals.count, 1);

        let by_quantity = GridState::default().search("7").view(&records);
        assert_eq!(by_quantity.records()[0].sku, "T-M");
    }

    #[test]
    fn test_size_filter_narrows_groups_to_matching_variants() {
        let state = GridState::default()
            .with_mode(DisplayMode::Grouped)
            .filter_column(FilterField::Size, "m(");

        let view = state.view(&polo_and_tee());
        // Each group keeps only its M variant, so both render as single items
        assert!(view.rows.iter().all(|row| matches!(row, GridRow::Item(_))));
        assert_eq!(view.totals.count, 2);
    }

    #[test]
    fn test_sort_toggle_and_mode_switch() {
        let records = polo_and_tee();
        let state = GridState::default().sort_by("quantity").sort_by("quantity");
        let view = state.view(&records);
        let quantities: Vec<i32> = view.records().iter().map(|r| r.quantity).collect();
        assert_eq!(quantities, vec![7, 4, 3, 2]);

        // Groups sort by their total quantity
        let grouped = state.with_mode(DisplayMode::Grouped).view(&records);
        assert!(matches!(&grouped.rows[0], GridRow::Group(s) if s.name == "Polo"));
    }

    #[test]
    fn test_weight_in_grouping_splits_groups() {
        let mut records = polo_and_tee();
        records[0].fabric_specs.weight = Some("180gsm".into());

        let default = GridState::default().with_mode(DisplayMode::Grouped);
        assert_eq!(default.view(&records).total_items, 2);

        let mut fields = GroupKeyFields::default();
        fields.0.push(GroupField::Weight);
        let with_weight = default.with_grouping(fields);
        assert_eq!(with_weight.view(&records).total_items, 3);
    }

    #[test]
    fn test_show_all_entries() {
        let records: Vec<_> = (0..30)
            .map(|i| record(&format!("S{}", i), &format!("Item {}", i), "Nike", "W1", "M", 1, 10))
            .collect();
        let view = GridState::default().with_page_size(PageSize::All).view(&records);
        assert_eq!(view.total_pages, 1);
        assert_eq!(view.rows.len(), 30);
    }

    /// Exported columns read back through the import form parser
    #[test]
    fn test_exported_row_parses_as_import_row() {
        let fields = [
            "sku", "name", "brand", "warehouse", "category", "size", "mrp", "selling_price", "quantity",
        ];
        let source = InventoryRecord {
            selling_price: Decimal::new(19999, 2),
            mrp: Decimal::new(24999, 2),
            ..record("A1", "Tee, Classic", "Nike", "W1", "M(40)", 12, 0)
        };

        let mut wtr = csv::Writer::from_writer(vec![]);
        wtr.write_record(fields).unwrap();
        wtr.write_record(fields.iter().map(|f| export_value(&source, f).unwrap_or_default()))
            .unwrap();
        let bytes = wtr.into_inner().unwrap();

        let mut rdr = csv::Reader::from_reader(bytes.as_slice());
        let form: RecordForm = rdr.deserialize().next().unwrap().unwrap();
        let input = parse_record_form(&form).unwrap();

        assert_eq!(input.sku, "A1");
        assert_eq!(input.name, "Tee, Classic");
        assert_eq!(input.quantity, 12);
        assert_eq!(input.selling_price, Decimal::new(19999, 2));
        assert_eq!(input.mrp, Decimal::new(24999, 2));
    }
}

// ============================================================================
// Property Tests
// ============================================================================

fn record_strategy() -> impl Strategy<Value = InventoryRecord> {
    (
        prop::sample::select(vec!["Polo", "Tee", "Hoodie"]),
        prop::sample::select(vec!["Nike", "Puma"]),
        prop::sample::select(vec!["W1", "W2"]),
        prop::sample::select(vec!["S(38)", "M(40)", "L(42)", "XL(44)", "Free"]),
        0i32..50,
        1i64..500,
    )
        .prop_map(|(name, brand, warehouse, size, qty, price)| {
            record(&format!("{}-{}", name, size), name, brand, warehouse, size, qty, price)
        })
}

fn state_strategy() -> impl Strategy<Value = GridState> {
    (
        prop::sample::select(vec!["", "polo", "nike", "4"]),
        prop::sample::select(vec![Selector::All, Selector::only("Nike"), Selector::only("Puma")]),
        prop::sample::select(vec!["quantity", "name", "size", "selling_price", "totalValue"]),
        prop::bool::ANY,
        1usize..6,
        1usize..5,
    )
        .prop_map(|(search, brand, sort, desc, size, page)| {
            let mut state = GridState::default()
                .search(search)
                .select_brand(brand)
                .sort_by(sort);
            if desc {
                state = state.sort_by(sort);
            }
            state.with_page_size(PageSize::Entries(size)).go_to_page(page)
        })
}

proptest! {
    /// Flat and grouped modes agree on the totals of the filtered set
    #[test]
    fn prop_totals_independent_of_mode(
        records in prop::collection::vec(record_strategy(), 0..40),
        state in state_strategy(),
    ) {
        let flat = state.clone().view(&records);
        let grouped = state.with_mode(DisplayMode::Grouped).view(&records);
        prop_assert_eq!(flat.totals, grouped.totals);
    }

    /// Every page stays within bounds and never exceeds the page size
    #[test]
    fn prop_page_within_bounds(
        records in prop::collection::vec(record_strategy(), 0..40),
        state in state_strategy(),
    ) {
        let size = match state.page_size { PageSize::Entries(n) => n, PageSize::All => usize::MAX };
        let view = state.view(&records);
        prop_assert!(view.current_page >= 1);
        prop_assert!(view.current_page <= view.total_pages);
        prop_assert!(view.rows.len() <= size);
        prop_assert!(view.end_index <= view.total_items);
    }

    /// Walking every grouped page with every group expanded visits each filtered record once
    #[test]
    fn prop_grouped_pages_cover_filtered_records(
        records in prop::collection::vec(record_strategy(), 0..40),
        state in state_strategy(),
    ) {
        let grouped = state.with_mode(DisplayMode::Grouped);
        let first = grouped.clone().go_to_page(1).view(&records);

        let mut seen = 0usize;
        for page in 1..=first.total_pages {
            let mut paged = grouped.clone().go_to_page(page);
            let keys: Vec<_> = paged
                .view(&records)
                .rows
                .iter()
                .filter_map(|row| match row {
                    GridRow::Group(s) => Some(s.key.clone()),
                    _ => None,
                })
                .collect();
            for key in &keys {
                paged = paged.toggle_group(key);
            }
            seen += paged.view(&records).records().len();
        }
        prop_assert_eq!(seen, first.totals.count);
    }
}
