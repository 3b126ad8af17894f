//! WebAssembly module for the Retail Inventory Manager
//!
//! Runs the grid pipeline in the browser. Every export takes and returns
//! JSON so the UI can hold the grid state as a plain object:
//! - grid view for a state over the loaded records
//! - state transitions (search, filters, sort, paging, mode, expansion)
//! - record form validation before a save
//! - size ordering for dropdowns

use serde::Deserialize;
use wasm_bindgen::prelude::*;

use shared::{
    compare_sizes, parse_record_form, DisplayMode, FilterField, FilterOptions, GridState,
    GroupKey, InventoryRecord, InventoryStats, PageSize, RecordForm, Selector,
};

/// One user action on the grid
#[derive(Debug, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum GridAction {
    Search { term: String },
    FilterColumn { field: FilterField, term: String },
    SelectBrand { value: Selector },
    SelectWarehouse { value: Selector },
    ClearFilters,
    SortBy { field: String },
    PageSize { size: PageSize },
    GoToPage { page: usize },
    Mode { mode: DisplayMode },
    ToggleGroup { key: GroupKey },
}

impl GridAction {
    pub fn apply(self, state: GridState) -> GridState {
        match self {
            GridAction::Search { term } => state.search(term),
            GridAction::FilterColumn { field, term } => state.filter_column(field, term),
            GridAction::SelectBrand { value } => state.select_brand(value),
            GridAction::SelectWarehouse { value } => state.select_warehouse(value),
            GridAction::ClearFilters => state.clear_filters(),
            GridAction::SortBy { field } => state.sort_by(&field),
            GridAction::PageSize { size } => state.with_page_size(size),
            GridAction::GoToPage { page } => state.go_to_page(page),
            GridAction::Mode { mode } => state.with_mode(mode),
            GridAction::ToggleGroup { key } => state.toggle_group(&key),
        }
    }
}

fn parse<'a, T: Deserialize<'a>>(what: &str, json: &'a str) -> Result<T, String> {
    serde_json::from_str(json).map_err(|e| format!("Invalid {} JSON: {}", what, e))
}

fn to_json<T: serde::Serialize>(value: &T) -> Result<String, String> {
    serde_json::to_string(value).map_err(|e| format!("Serialization failed: {}", e))
}

fn view_json(records_json: &str, state_json: &str) -> Result<String, String> {
    let records: Vec<InventoryRecord> = parse("records", records_json)?;
    let state: GridState = parse("state", state_json)?;
    to_json(&state.view(&records))
}

fn transition_json(state_json: &str, action_json: &str) -> Result<String, String> {
    let state: GridState = parse("state", state_json)?;
    let action: GridAction = parse("action", action_json)?;
    to_json(&action.apply(state))
}

fn validate_form_json(form_json: &str) -> Result<String, String> {
    let form: RecordForm = parse("form", form_json)?;
    match parse_record_form(&form) {
        Ok(input) => to_json(&input),
        Err(errors) => Err(to_json(&errors.0)?),
    }
}

/// Initial grid state
#[wasm_bindgen]
pub fn default_grid_state() -> Result<String, JsValue> {
    to_json(&GridState::default()).map_err(|e| JsValue::from_str(&e))
}

/// Rows, page strip and totals for `state` over `records`
#[wasm_bindgen]
pub fn grid_view(records_json: &str, state_json: &str) -> Result<String, JsValue> {
    view_json(records_json, state_json).map_err(|e| JsValue::from_str(&e))
}

/// New state after one action, e.g. `{"action":"sort_by","field":"quantity"}`
#[wasm_bindgen]
pub fn grid_transition(state_json: &str, action_json: &str) -> Result<String, JsValue> {
    transition_json(state_json, action_json).map_err(|e| JsValue::from_str(&e))
}

/// Parsed create payload, or a JSON list of `{field, message}` as the error
#[wasm_bindgen]
pub fn validate_record_form(form_json: &str) -> Result<String, JsValue> {
    validate_form_json(form_json).map_err(|e| JsValue::from_str(&e))
}

/// Selector choices derived from loaded records
#[wasm_bindgen]
pub fn filter_options(records_json: &str) -> Result<String, JsValue> {
    parse::<Vec<InventoryRecord>>("records", records_json)
        .and_then(|records| to_json(&FilterOptions::from_records(&records)))
        .map_err(|e| JsValue::from_str(&e))
}

#[wasm_bindgen]
pub fn inventory_stats(records_json: &str) -> Result<String, JsValue> {
    parse::<Vec<InventoryRecord>>("records", records_json)
        .and_then(|records| to_json(&InventoryStats::compute(&records)))
        .map_err(|e| JsValue::from_str(&e))
}

/// -1, 0 or 1 in canonical size order
#[wasm_bindgen]
pub fn compare_size_labels(a: &str, b: &str) -> i32 {
    compare_sizes(a, b) as i32
}
