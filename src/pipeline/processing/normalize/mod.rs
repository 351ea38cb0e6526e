use serde_json::{Map, Value};
use thiserror::Error;

use crate::domain::ProductRecord;

mod variant;

pub use variant::{normalize_variant, VARIANT_ID_KEYS};

/// A canonical record together with the data-quality warnings collected
/// while producing it. Warnings are non-fatal: the record is always usable.
#[derive(Debug, Clone, PartialEq)]
pub struct NormalizedProduct {
    pub record: ProductRecord,
    pub warnings: Vec<NormalizationWarning>,
}

/// Non-fatal data-quality problems found during normalization.
///
/// Malformed pieces are substituted with defaults and reported here instead
/// of silently dropped, so callers can surface them without aborting.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum NormalizationWarning {
    #[error("record entry {index} is not an object and was skipped")]
    MalformedRecord { index: usize },

    #[error("product {id}: variants is not an array and was treated as empty")]
    MalformedVariantList { id: String },

    #[error("product {id}: variant entry {index} is not an object and was skipped")]
    MalformedVariant { id: String, index: usize },

    #[error("product {id}: {field} is not an object and was ignored")]
    MalformedFieldBag { id: String, field: &'static str },
}

// Fallback chains, highest priority first. Kept as named tables so the
// precedence order is testable on its own; the canonical struct serializes
// under the first key of each chain.
const ID_KEYS: &[&str] = &["id", "product_id", "product_no"];
const CODE_KEYS: &[&str] = &["code", "product_code"];
const NAME_KEYS: &[&str] = &["name", "product_name", "title"];
const BRAND_KEYS: &[&str] = &["brand", "brand_name"];
const SUPPLIER_KEYS: &[&str] = &["supplier_name", "supplier", "vendor_name"];
const SHIPPING_POLICY_KEYS: &[&str] = &["shipping_policy", "delivery_policy"];
const GROUP_ID_KEYS: &[&str] = &[
    "group_id",
    "groupId",
    "classification_id",
    "classificationId",
    "category_id",
    "categoryId",
];
const GROUP_NAME_KEYS: &[&str] = &[
    "group_name",
    "groupName",
    "group",
    "classification",
    "category_name",
    "category",
];
const SELLING_PRICE_KEYS: &[&str] = &["selling_price", "sellingPrice", "price"];
const COST_PRICE_KEYS: &[&str] = &["cost_price", "costPrice"];
const SUPPLY_PRICE_KEYS: &[&str] = &["supply_price", "supplyPrice"];
const MARGIN_KEYS: &[&str] = &["margin_amount", "marginAmount", "margin"];
const CREATED_AT_KEYS: &[&str] = &["created_at", "createdAt", "reg_date", "registered_at"];
const VARIANT_LIST_KEYS: &[&str] = &["variants", "options"];

/// Normalizes one raw product-like record into its canonical form.
///
/// Returns None for null or non-object input: absence is not an error, and
/// callers treat None uniformly as "no record". Normalization is idempotent;
/// feeding a serialized canonical record back in yields an equal record.
pub fn normalize_product(raw: &Value) -> Option<NormalizedProduct> {
    let obj = raw.as_object()?;
    let mut warnings = Vec::new();

    // A record with no resolvable identity is unusable downstream
    let id = record_identity(raw)?;

    let selling_price = price_at(obj, SELLING_PRICE_KEYS);
    let cost_price = price_at(obj, COST_PRICE_KEYS);
    let supply_price = price_at(obj, SUPPLY_PRICE_KEYS);

    // Margin always reflects current prices. Only when no selling price
    // exists at all do we trust a margin stored in the raw data.
    let margin_amount = match selling_price {
        Some(sell) => round2(sell - supply_price.or(cost_price).unwrap_or(0.0)),
        None => signed_number_at(obj, MARGIN_KEYS).unwrap_or(0.0),
    };

    let compliance = merge_compliance(obj, &id, &mut warnings);
    let variants = collect_variants(obj, &id, &mut warnings);

    let record = ProductRecord {
        id,
        code: string_at(obj, CODE_KEYS).unwrap_or_default(),
        name: string_at(obj, NAME_KEYS).unwrap_or_default(),
        brand: string_at(obj, BRAND_KEYS),
        supplier_name: string_at(obj, SUPPLIER_KEYS),
        shipping_policy: string_at(obj, SHIPPING_POLICY_KEYS),
        selling_price,
        cost_price,
        supply_price,
        margin_amount,
        group_id: string_at(obj, GROUP_ID_KEYS),
        group_name: string_at(obj, GROUP_NAME_KEYS),
        created_at: string_at(obj, CREATED_AT_KEYS),
        compliance,
        variants,
    };

    Some(NormalizedProduct { record, warnings })
}

/// Resolves a raw record's identity without normalizing the whole record.
/// The repository keys its entries on the same resolution the normalizer
/// uses, so merges and soft-deletes line up with canonical ids.
pub fn record_identity(raw: &Value) -> Option<String> {
    raw.as_object().and_then(|obj| string_at(obj, ID_KEYS))
}

/// Default compliance fields every canonical record carries, each mapped to
/// a type-appropriate zero value.
pub fn default_compliance() -> Map<String, Value> {
    let mut fields = Map::new();
    for key in [
        "origin_country",
        "manufacturer",
        "importer",
        "material",
        "certification_no",
        "as_contact",
        "release_date",
        "tax_type",
    ] {
        fields.insert(key.to_string(), Value::String(String::new()));
    }
    for key in ["display", "adult_only", "safety_certified"] {
        fields.insert(key.to_string(), Value::Bool(false));
    }
    for key in ["weight_g", "box_quantity"] {
        fields.insert(key.to_string(), Value::from(0));
    }
    fields
}

fn merge_compliance(
    obj: &Map<String, Value>,
    id: &str,
    warnings: &mut Vec<NormalizationWarning>,
) -> Map<String, Value> {
    let mut merged = default_compliance();
    overlay_bag(obj, "extra_fields", &mut merged, id, warnings);
    overlay_bag(obj, "compliance", &mut merged, id, warnings);
    merged
}

fn overlay_bag(
    obj: &Map<String, Value>,
    field: &'static str,
    target: &mut Map<String, Value>,
    id: &str,
    warnings: &mut Vec<NormalizationWarning>,
) {
    match obj.get(field) {
        Some(Value::Object(bag)) => {
            for (key, value) in bag {
                target.insert(key.clone(), value.clone());
            }
        }
        Some(Value::Null) | None => {}
        Some(_) => warnings.push(NormalizationWarning::MalformedFieldBag {
            id: id.to_string(),
            field,
        }),
    }
}

fn collect_variants(
    obj: &Map<String, Value>,
    id: &str,
    warnings: &mut Vec<NormalizationWarning>,
) -> Vec<crate::domain::ProductVariant> {
    let raw_list = VARIANT_LIST_KEYS
        .iter()
        .find_map(|key| obj.get(*key).filter(|v| !v.is_null()));

    match raw_list {
        Some(Value::Array(items)) => {
            let mut variants = Vec::with_capacity(items.len());
            for (index, item) in items.iter().enumerate() {
                match item.as_object() {
                    Some(raw_variant) => variants.push(normalize_variant(raw_variant, index)),
                    None => warnings.push(NormalizationWarning::MalformedVariant {
                        id: id.to_string(),
                        index,
                    }),
                }
            }
            variants
        }
        None => Vec::new(),
        Some(_) => {
            warnings.push(NormalizationWarning::MalformedVariantList { id: id.to_string() });
            Vec::new()
        }
    }
}

/// Resolves the first present key of `keys` to a string. Numbers are
/// stringified so numeric ids survive; other shapes are treated as absent.
pub(crate) fn string_at(obj: &Map<String, Value>, keys: &[&str]) -> Option<String> {
    keys.iter().find_map(|key| match obj.get(*key) {
        Some(Value::String(s)) => Some(s.clone()),
        Some(Value::Number(n)) => Some(n.to_string()),
        _ => None,
    })
}

/// Resolves the first present key of `keys` to a non-negative price.
/// Numeric strings are accepted; negatives clamp to zero.
pub(crate) fn price_at(obj: &Map<String, Value>, keys: &[&str]) -> Option<f64> {
    signed_number_at(obj, keys).map(|n| n.max(0.0))
}

pub(crate) fn signed_number_at(obj: &Map<String, Value>, keys: &[&str]) -> Option<f64> {
    keys.iter().find_map(|key| match obj.get(*key) {
        Some(Value::Number(n)) => n.as_f64(),
        Some(Value::String(s)) => s.trim().parse::<f64>().ok(),
        _ => None,
    })
}

/// Resolves the first present key of `keys` to a non-negative integer count.
pub(crate) fn integer_at(obj: &Map<String, Value>, keys: &[&str]) -> Option<u64> {
    signed_number_at(obj, keys).map(|n| if n.is_sign_negative() { 0 } else { n as u64 })
}

pub(crate) fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_null_input_yields_none() {
        assert!(normalize_product(&Value::Null).is_none());
        assert!(normalize_product(&json!("not an object")).is_none());
    }

    #[test]
    fn test_margin_recomputed_over_stale_raw_value() {
        let raw = json!({
            "id": "1",
            "selling_price": 10000,
            "supply_price": 8000,
            "margin_amount": 999999
        });

        let normalized = normalize_product(&raw).unwrap();
        assert_eq!(normalized.record.margin_amount, 2000.0);
    }

    #[test]
    fn test_margin_falls_back_to_cost_price() {
        let raw = json!({"id": "1", "selling_price": 20000, "cost_price": 15000});
        let normalized = normalize_product(&raw).unwrap();
        assert_eq!(normalized.record.margin_amount, 5000.0);
    }

    #[test]
    fn test_margin_trusted_only_without_selling_price() {
        let raw = json!({"id": "1", "margin_amount": 1234.5});
        let normalized = normalize_product(&raw).unwrap();
        assert_eq!(normalized.record.margin_amount, 1234.5);
    }

    #[test]
    fn test_margin_rounds_to_two_decimals() {
        let raw = json!({"id": "1", "selling_price": 10.005, "supply_price": 0.0011});
        let normalized = normalize_product(&raw).unwrap();
        assert_eq!(normalized.record.margin_amount, 10.0);
    }

    #[test]
    fn test_group_resolution_priority_order() {
        let raw = json!({
            "id": "1",
            "classification_id": "C10",
            "category_id": "CAT7",
            "category": "잡화"
        });

        let record = normalize_product(&raw).unwrap().record;
        // classification outranks category; nothing outranks an explicit group
        assert_eq!(record.group_id.as_deref(), Some("C10"));
        assert_eq!(record.group_name.as_deref(), Some("잡화"));

        let raw = json!({"id": "1", "group_id": "G1", "classification_id": "C10"});
        let record = normalize_product(&raw).unwrap().record;
        assert_eq!(record.group_id.as_deref(), Some("G1"));
    }

    #[test]
    fn test_unknown_group_is_none_not_empty() {
        let record = normalize_product(&json!({"id": "1"})).unwrap().record;
        assert_eq!(record.group_id, None);
        assert_eq!(record.group_name, None);
    }

    #[test]
    fn test_compliance_merge_precedence() {
        let raw = json!({
            "id": "1",
            "extra_fields": {"origin_country": "CN", "material": "면 100%"},
            "compliance": {"origin_country": "KR"}
        });

        let record = normalize_product(&raw).unwrap().record;
        // compliance wins over extra_fields wins over defaults
        assert_eq!(record.compliance["origin_country"], json!("KR"));
        assert_eq!(record.compliance["material"], json!("면 100%"));
        assert_eq!(record.compliance["manufacturer"], json!(""));
        assert_eq!(record.compliance["display"], json!(false));
        assert_eq!(record.compliance["weight_g"], json!(0));
    }

    #[test]
    fn test_malformed_variant_entries_skipped_with_warnings() {
        let raw = json!({
            "id": "1",
            "variants": [{"code": "V1"}, "garbage", {"code": "V3"}, null]
        });

        let normalized = normalize_product(&raw).unwrap();
        assert_eq!(normalized.record.variants.len(), 2);
        assert_eq!(normalized.record.variants[0].id, "V1");
        assert_eq!(normalized.record.variants[1].id, "V3");
        assert_eq!(
            normalized.warnings,
            vec![
                NormalizationWarning::MalformedVariant { id: "1".to_string(), index: 1 },
                NormalizationWarning::MalformedVariant { id: "1".to_string(), index: 3 },
            ]
        );
    }

    #[test]
    fn test_non_array_variants_treated_as_empty() {
        let raw = json!({"id": "1", "variants": "oops"});
        let normalized = normalize_product(&raw).unwrap();
        assert!(normalized.record.variants.is_empty());
        assert_eq!(
            normalized.warnings,
            vec![NormalizationWarning::MalformedVariantList { id: "1".to_string() }]
        );
    }

    #[test]
    fn test_numeric_id_is_stringified() {
        let record = normalize_product(&json!({"id": 42})).unwrap().record;
        assert_eq!(record.id, "42");
    }

    #[test]
    fn test_negative_prices_clamp_to_zero() {
        let raw = json!({"id": "1", "selling_price": -500, "cost_price": "-10"});
        let record = normalize_product(&raw).unwrap().record;
        assert_eq!(record.selling_price, Some(0.0));
        assert_eq!(record.cost_price, Some(0.0));
    }

    #[test]
    fn test_normalization_is_idempotent() {
        let raw = json!({
            "id": "1",
            "product_name": "오버핏 셔츠",
            "sellingPrice": 19900,
            "cost_price": 12000,
            "classification": "상의",
            "created_at": "2025-01-01",
            "extra_fields": {"origin_country": "KR"},
            "variants": [
                {"color": "black", "stock": 3},
                {"option_code": "OC-1", "memos": ["첫 입고", null, "재확인"]}
            ]
        });

        let first = normalize_product(&raw).unwrap().record;
        let reserialized = serde_json::to_value(&first).unwrap();
        let second = normalize_product(&reserialized).unwrap();

        assert_eq!(second.record, first);
        assert!(second.warnings.is_empty());
    }

    #[test]
    fn test_idempotent_when_margin_was_trusted() {
        // No selling price anywhere: margin comes from the raw value and
        // must survive a second pass unchanged
        let raw = json!({"id": "1", "margin": -250.75});
        let first = normalize_product(&raw).unwrap().record;
        assert_eq!(first.margin_amount, -250.75);

        let reserialized = serde_json::to_value(&first).unwrap();
        let second = normalize_product(&reserialized).unwrap().record;
        assert_eq!(second, first);
    }
}
