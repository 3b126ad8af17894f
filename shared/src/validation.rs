//! Write-path validation for the Retail Inventory Manager
//!
//! Everything here runs before a create, update or import reaches the store.
//! The grid pipeline never calls into this module: it works on records that
//! were already validated when they were persisted.

use std::collections::HashSet;
use std::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::grid::normalize_size;
use crate::models::{
    FabricSpecs, Gender, InventoryInput, InventoryPatch, ItemStatus, RecordForm, VariantBatch,
};

/// A single rejected field
#[derive(Debug, Clone, Error, PartialEq, Eq, Serialize, Deserialize)]
#[error("{field}: {message}")]
pub struct ValidationError {
    pub field: String,
    pub message: String,
}

impl ValidationError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

/// Every field error found in one submission
#[derive(Debug, Clone, Default, Error, PartialEq, Eq, Serialize, Deserialize)]
#[error("{}", join_errors(.0))]
pub struct ValidationErrors(pub Vec<ValidationError>);

fn join_errors(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

impl ValidationErrors {
    pub fn push(&mut self, error: ValidationError) {
        self.0.push(error);
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn first(&self) -> Option<&ValidationError> {
        self.0.first()
    }

    fn into_result(self) -> Result<(), ValidationErrors> {
        if self.0.is_empty() {
            Ok(())
        } else {
            Err(self)
        }
    }
}

impl From<ValidationError> for ValidationErrors {
    fn from(error: ValidationError) -> Self {
        ValidationErrors(vec![error])
    }
}

// ============================================================================
// Field Validations
// ============================================================================

/// Reject empty or whitespace-only values
pub fn validate_required(field: &str, value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::new(field, "is required"));
    }
    Ok(())
}

/// Parse a non-negative decimal amount
pub fn parse_price(field: &str, raw: &str) -> Result<Decimal, ValidationError> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Err(ValidationError::new(field, "is required"));
    }
    let value = Decimal::from_str(raw)
        .map_err(|_| ValidationError::new(field, format!("'{}' is not a number", raw)))?;
    validate_price(field, value)?;
    Ok(value)
}

/// Parse an optional non-negative decimal amount; blank means absent
pub fn parse_optional_price(field: &str, raw: &str) -> Result<Option<Decimal>, ValidationError> {
    if raw.trim().is_empty() {
        return Ok(None);
    }
    parse_price(field, raw).map(Some)
}

/// Parse a non-negative whole number
pub fn parse_quantity(field: &str, raw: &str) -> Result<i32, ValidationError> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Err(ValidationError::new(field, "is required"));
    }
    let value = i32::from_str(raw)
        .map_err(|_| ValidationError::new(field, format!("'{}' is not a whole number", raw)))?;
    validate_quantity(field, value)?;
    Ok(value)
}

pub fn validate_price(field: &str, value: Decimal) -> Result<(), ValidationError> {
    if value < Decimal::ZERO {
        return Err(ValidationError::new(field, "cannot be negative"));
    }
    Ok(())
}

pub fn validate_quantity(field: &str, value: i32) -> Result<(), ValidationError> {
    if value < 0 {
        return Err(ValidationError::new(field, "cannot be negative"));
    }
    Ok(())
}

/// Validate a `#RRGGBB` or `#RGB` colour code
pub fn validate_color_code(code: &str) -> Result<(), &'static str> {
    let hex = code
        .strip_prefix('#')
        .ok_or("Color code must start with '#'")?;
    if hex.len() != 3 && hex.len() != 6 {
        return Err("Color code must have 3 or 6 hex digits");
    }
    if !hex.chars().all(|c| c.is_ascii_hexdigit()) {
        return Err("Color code must be hexadecimal");
    }
    Ok(())
}

/// Validate a master data entry
pub fn validate_master_value(value: &str) -> Result<(), &'static str> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err("Value cannot be empty");
    }
    if trimmed.len() > 100 {
        return Err("Value must be at most 100 characters");
    }
    Ok(())
}

/// Validate email format (basic check)
pub fn validate_email(email: &str) -> Result<(), &'static str> {
    if email.contains('@') && email.contains('.') && email.len() >= 5 {
        Ok(())
    } else {
        Err("Invalid email format")
    }
}

/// Validate password strength
pub fn validate_password(password: &str) -> Result<(), &'static str> {
    if password.len() < 6 {
        return Err("Password must be at least 6 characters");
    }
    Ok(())
}

// ============================================================================
// Record Validations
// ============================================================================

fn collect<T>(errors: &mut ValidationErrors, result: Result<T, ValidationError>) -> Option<T> {
    match result {
        Ok(v) => Some(v),
        Err(e) => {
            errors.push(e);
            None
        }
    }
}

/// Validate a create payload
pub fn validate_input(input: &InventoryInput) -> Result<(), ValidationErrors> {
    let mut errors = ValidationErrors::default();
    for (field, value) in [
        ("sku", &input.sku),
        ("name", &input.name),
        ("brand", &input.brand),
        ("warehouse", &input.warehouse),
        ("category", &input.category),
    ] {
        collect(&mut errors, validate_required(field, value));
    }
    collect(&mut errors, validate_price("mrp", input.mrp));
    collect(&mut errors, validate_price("selling_price", input.selling_price));
    if let Some(cost) = input.cost_price {
        collect(&mut errors, validate_price("cost_price", cost));
    }
    collect(&mut errors, validate_quantity("quantity", input.quantity));
    if let Some(threshold) = input.low_stock_threshold {
        collect(&mut errors, validate_quantity("low_stock_threshold", threshold));
    }
    if let Some(code) = input.color_code.as_deref().filter(|c| !c.is_empty()) {
        if let Err(msg) = validate_color_code(code) {
            errors.push(ValidationError::new("color_code", msg));
        }
    }
    errors.into_result()
}

/// Validate an update payload; absent fields are not checked
pub fn validate_patch(patch: &InventoryPatch) -> Result<(), ValidationErrors> {
    let mut errors = ValidationErrors::default();
    for (field, value) in [
        ("sku", &patch.sku),
        ("name", &patch.name),
        ("brand", &patch.brand),
        ("warehouse", &patch.warehouse),
        ("category", &patch.category),
    ] {
        if let Some(value) = value {
            collect(&mut errors, validate_required(field, value));
        }
    }
    for (field, value) in [
        ("mrp", patch.mrp),
        ("selling_price", patch.selling_price),
        ("cost_price", patch.cost_price),
    ] {
        if let Some(value) = value {
            collect(&mut errors, validate_price(field, value));
        }
    }
    for (field, value) in [
        ("quantity", patch.quantity),
        ("low_stock_threshold", patch.low_stock_threshold),
    ] {
        if let Some(value) = value {
            collect(&mut errors, validate_quantity(field, value));
        }
    }
    if let Some(code) = patch.color_code.as_deref().filter(|c| !c.is_empty()) {
        if let Err(msg) = validate_color_code(code) {
            errors.push(ValidationError::new("color_code", msg));
        }
    }
    errors.into_result()
}

/// Validate a size-variant batch
///
/// Besides validating every expanded record, a size may appear only once per
/// warehouse within the batch.
pub fn validate_variant_batch(batch: &VariantBatch) -> Result<Vec<InventoryInput>, ValidationErrors> {
    let mut errors = ValidationErrors::default();
    if batch.variants.is_empty() {
        errors.push(ValidationError::new("variants", "at least one variant is required"));
        return Err(errors);
    }

    let inputs = batch.expand();
    let mut seen = HashSet::new();
    for (index, input) in inputs.iter().enumerate() {
        let prefix = format!("variants[{}]", index);
        if let Err(field_errors) = validate_input(input) {
            for e in field_errors.0 {
                errors.push(ValidationError::new(format!("{}.{}", prefix, e.field), e.message));
            }
        }
        if let Err(e) = validate_required("size", &input.size) {
            errors.push(ValidationError::new(format!("{}.size", prefix), e.message));
            continue;
        }
        let key = (normalize_size(&input.size), input.warehouse.clone());
        if !seen.insert(key) {
            errors.push(ValidationError::new(
                format!("{}.size", prefix),
                format!(
                    "size '{}' appears more than once for warehouse '{}'",
                    input.size, input.warehouse
                ),
            ));
        }
    }
    errors.into_result().map(|_| inputs)
}

fn optional(value: &str) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

/// Turn raw form or import-row text into a validated create payload
pub fn parse_record_form(form: &RecordForm) -> Result<InventoryInput, ValidationErrors> {
    let mut errors = ValidationErrors::default();

    let mrp = collect(&mut errors, parse_price("mrp", &form.mrp));
    let selling_price = collect(&mut errors, parse_price("selling_price", &form.selling_price));
    let cost_price = collect(&mut errors, parse_optional_price("cost_price", &form.cost_price));
    let quantity = collect(&mut errors, parse_quantity("quantity", &form.quantity));
    let low_stock_threshold = if form.low_stock_threshold.trim().is_empty() {
        Some(None)
    } else {
        collect(
            &mut errors,
            parse_quantity("low_stock_threshold", &form.low_stock_threshold),
        )
        .map(Some)
    };

    let gender = match optional(&form.gender) {
        None => Some(None),
        Some(raw) => match Gender::parse(&raw) {
            Some(g) => Some(Some(g)),
            None => {
                errors.push(ValidationError::new("gender", format!("unknown gender '{}'", raw)));
                None
            }
        },
    };
    let status = match optional(&form.status) {
        None => Some(None),
        Some(raw) => match ItemStatus::parse(&raw) {
            Some(s) => Some(Some(s)),
            None => {
                errors.push(ValidationError::new("status", format!("unknown status '{}'", raw)));
                None
            }
        },
    };

    let (
        Some(mrp),
        Some(selling_price),
        Some(cost_price),
        Some(quantity),
        Some(low_stock_threshold),
        Some(gender),
        Some(status),
    ) = (mrp, selling_price, cost_price, quantity, low_stock_threshold, gender, status)
    else {
        // Typed values missing; still report the required text fields
        for (field, value) in [
            ("sku", &form.sku),
            ("name", &form.name),
            ("brand", &form.brand),
            ("warehouse", &form.warehouse),
            ("category", &form.category),
        ] {
            collect(&mut errors, validate_required(field, value));
        }
        return Err(errors);
    };

    let input = InventoryInput {
        sku: form.sku.trim().to_string(),
        name: form.name.trim().to_string(),
        brand: form.brand.trim().to_string(),
        warehouse: form.warehouse.trim().to_string(),
        product_type: optional(&form.product_type),
        category: form.category.trim().to_string(),
        design: form.design.trim().to_string(),
        gender,
        color: form.color.trim().to_string(),
        color_code: optional(&form.color_code),
        fabric_specs: FabricSpecs {
            material: optional(&form.material),
            weight: optional(&form.weight),
            composition: optional(&form.composition),
        },
        size: form.size.trim().to_string(),
        mrp,
        selling_price,
        cost_price,
        quantity,
        low_stock_threshold,
        status,
    };

    if let Err(more) = validate_input(&input) {
        errors.0.extend(more.0);
    }
    errors.into_result().map(|_| input)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::VariantSpec;

    fn form() -> RecordForm {
        RecordForm {
            sku: "NOM-JOG-M".into(),
            name: "Jogger".into(),
            brand: "NOM".into(),
            warehouse: "W1".into(),
            category: "Bottoms".into(),
            gender: "male".into(),
            size: "M(40)".into(),
            mrp: "1299".into(),
            selling_price: "999.50".into(),
            quantity: "12".into(),
            ..Default::default()
        }
    }

    #[test]
    fn test_parse_price_valid() {
        assert_eq!(parse_price("mrp", "12.50").unwrap(), Decimal::new(1250, 2));
        assert_eq!(parse_price("mrp", " 0 ").unwrap(), Decimal::ZERO);
    }

    #[test]
    fn test_parse_price_invalid() {
        assert!(parse_price("mrp", "abc").is_err());
        assert!(parse_price("mrp", "-1").is_err());
        assert!(parse_price("mrp", "").is_err());
    }

    #[test]
    fn test_parse_quantity_invalid() {
        assert!(parse_quantity("quantity", "1.5").is_err());
        assert!(parse_quantity("quantity", "-3").is_err());
        assert_eq!(parse_quantity("quantity", "7").unwrap(), 7);
    }

    #[test]
    fn test_validate_color_code() {
        assert!(validate_color_code("#FFAA00").is_ok());
        assert!(validate_color_code("#fa0").is_ok());
        assert!(validate_color_code("FFAA00").is_err());
        assert!(validate_color_code("#GGGGGG").is_err());
        assert!(validate_color_code("#FFFF").is_err());
    }

    #[test]
    fn test_validate_master_value() {
        assert!(validate_master_value("Nike").is_ok());
        assert!(validate_master_value("   ").is_err());
        assert!(validate_master_value(&"x".repeat(101)).is_err());
    }

    #[test]
    fn test_validate_email_and_password() {
        assert!(validate_email("admin@inventory.com").is_ok());
        assert!(validate_email("invalid").is_err());
        assert!(validate_password("admin123").is_ok());
        assert!(validate_password("short").is_err());
    }

    #[test]
    fn test_parse_record_form_valid() {
        let input = parse_record_form(&form()).unwrap();
        assert_eq!(input.sku, "NOM-JOG-M");
        assert_eq!(input.gender, Some(Gender::Male));
        assert_eq!(input.selling_price, Decimal::new(99950, 2));
        assert_eq!(input.quantity, 12);
        assert!(input.low_stock_threshold.is_none());
        assert!(input.fabric_specs.material.is_none());
    }

    #[test]
    fn test_parse_record_form_reports_every_bad_field() {
        let bad = RecordForm {
            sku: "".into(),
            selling_price: "ten".into(),
            quantity: "-1".into(),
            ..form()
        };
        let errors = parse_record_form(&bad).unwrap_err();
        let fields: Vec<_> = errors.0.iter().map(|e| e.field.as_str()).collect();
        assert!(fields.contains(&"selling_price"));
        assert!(fields.contains(&"quantity"));
        assert!(fields.contains(&"sku"));
    }

    #[test]
    fn test_validate_patch_only_checks_supplied_fields() {
        assert!(validate_patch(&InventoryPatch::default()).is_ok());
        let patch = InventoryPatch {
            quantity: Some(-2),
            name: Some(" ".into()),
            ..Default::default()
        };
        let errors = validate_patch(&patch).unwrap_err();
        assert_eq!(errors.0.len(), 2);
    }

    fn batch(variants: Vec<(&str, &str, Option<&str>)>) -> VariantBatch {
        let base = parse_record_form(&form()).unwrap();
        VariantBatch {
            base,
            variants: variants
                .into_iter()
                .map(|(sku, size, warehouse)| VariantSpec {
                    sku: sku.into(),
                    size: size.into(),
                    warehouse: warehouse.map(str::to_string),
                    quantity: 3,
                    mrp: None,
                    selling_price: None,
                })
                .collect(),
        }
    }

    #[test]
    fn test_variant_batch_duplicate_size_same_warehouse() {
        let result = validate_variant_batch(&batch(vec![
            ("J-S", "S(38)", None),
            ("J-M", "M(40)", None),
            ("J-M2", "m(40)", None),
        ]));
        let errors = result.unwrap_err();
        assert_eq!(errors.0.len(), 1);
        assert_eq!(errors.0[0].field, "variants[2].size");
    }

    #[test]
    fn test_variant_batch_same_size_other_warehouse() {
        let inputs = validate_variant_batch(&batch(vec![
            ("J-M", "M(40)", None),
            ("J-M", "M(40)", Some("W2")),
        ]))
        .unwrap();
        assert_eq!(inputs.len(), 2);
    }

    #[test]
    fn test_variant_batch_empty() {
        assert!(validate_variant_batch(&batch(vec![])).is_err());
    }
}
