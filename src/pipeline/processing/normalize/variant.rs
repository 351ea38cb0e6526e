use serde_json::{Map, Value};

use super::{integer_at, price_at, string_at};
use crate::domain::ProductVariant;

/// Keys consulted, in priority order, when resolving a variant's id.
///
/// Route construction downstream uses the same order to build deep links,
/// so changing it breaks existing links.
pub const VARIANT_ID_KEYS: &[&str] = &["id", "variant_id", "code", "option_code", "barcode1", "barcode"];

const STOCK_KEYS: &[&str] = &["stock", "stock_count", "quantity"];
const SELLING_PRICE_KEYS: &[&str] = &["selling_price", "sellingPrice", "price"];
const COST_PRICE_KEYS: &[&str] = &["cost_price", "costPrice"];
const SUPPLY_PRICE_KEYS: &[&str] = &["supply_price", "supplyPrice"];
const MEMO_KEYS: &[&str] = &["memos", "option_memos"];

// Variant attributes that historically lived at the top level of an option
// row but belong in the extra-fields bag
const VARIANT_EXTRA_KEYS: &[&str] = &[
    "color",
    "size",
    "width_mm",
    "length_mm",
    "height_mm",
    "manufacturer",
    "manufacture_date",
    "origin_country",
    "smartstore_code",
    "coupang_code",
    "wing_code",
    "safety_stock",
    "warehouse_location",
    "sale_status",
    "soldout_status",
    "grade",
];

/// Normalizes one raw variant row at `position` within its parent's list.
///
/// When the row carries none of the identity fields, the id falls back to
/// "index-{position}", which is deterministic for the same input sequence.
pub fn normalize_variant(raw: &Map<String, Value>, position: usize) -> ProductVariant {
    let id = string_at(raw, VARIANT_ID_KEYS).unwrap_or_else(|| format!("index-{}", position));

    ProductVariant {
        id,
        stock: integer_at(raw, STOCK_KEYS).unwrap_or(0),
        selling_price: price_at(raw, SELLING_PRICE_KEYS),
        cost_price: price_at(raw, COST_PRICE_KEYS),
        supply_price: price_at(raw, SUPPLY_PRICE_KEYS),
        extra_fields: merge_extra_fields(raw),
        memos: collect_memos(raw),
    }
}

/// Hoists recognized top-level variant attributes into the extra-fields bag,
/// then overlays the legacy `extra_fields` bag itself. Last write wins.
fn merge_extra_fields(raw: &Map<String, Value>) -> Map<String, Value> {
    let mut merged = Map::new();

    for key in VARIANT_EXTRA_KEYS {
        if let Some(value) = raw.get(*key) {
            if !value.is_null() {
                merged.insert((*key).to_string(), value.clone());
            }
        }
    }

    if let Some(Value::Object(bag)) = raw.get("extra_fields") {
        for (key, value) in bag {
            merged.insert(key.clone(), value.clone());
        }
    }

    merged
}

/// Collects memo slots into a single ordered list. Absent or non-string
/// entries become empty strings at their index so positions keep meaning.
fn collect_memos(raw: &Map<String, Value>) -> Vec<String> {
    let list = MEMO_KEYS
        .iter()
        .find_map(|key| raw.get(*key).and_then(Value::as_array));

    match list {
        Some(entries) => entries
            .iter()
            .map(|entry| entry.as_str().unwrap_or_default().to_string())
            .collect(),
        None => Vec::new(),
    }
}
