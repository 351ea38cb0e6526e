use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Canonical product record produced by the normalization stage.
///
/// Serialized key names are deliberately the highest-priority key of each
/// fallback chain the normalizer consults, so a canonical record fed back
/// through normalization resolves to an equal record. Price fields keep
/// their presence: an absent price and an explicit zero behave differently
/// in margin computation, and collapsing them would break re-normalization.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductRecord {
    pub id: String,
    #[serde(default)]
    pub code: String,
    #[serde(default)]
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub brand: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub supplier_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shipping_policy: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub selling_price: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cost_price: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub supply_price: Option<f64>,
    /// Derived on every normalization pass; see the normalizer for the rule.
    pub margin_amount: f64,
    /// None means "unknown", which callers must distinguish from an
    /// explicitly empty value.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub group_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub group_name: Option<String>,
    /// ISO-8601 timestamp or bare calendar date, kept verbatim.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
    /// Merged compliance/extra-fields bag: defaults < extra_fields < compliance.
    #[serde(default)]
    pub compliance: Map<String, Value>,
    /// Source order preserved; the first variant carries "first variant"
    /// defaults such as the stock-link flag.
    #[serde(default)]
    pub variants: Vec<ProductVariant>,
}

/// Canonical product variant (option row) nested under a product.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductVariant {
    /// Never empty: synthesized as "index-{position}" when the source row
    /// carries no identity at all. Deep links depend on this value.
    pub id: String,
    #[serde(default)]
    pub stock: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub selling_price: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cost_price: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub supply_price: Option<f64>,
    /// Merged variant-level attribute bag (dimensions, channel codes,
    /// warehouse location, sale/soldout/grade enums, ...).
    #[serde(default)]
    pub extra_fields: Map<String, Value>,
    /// Positional memo slots; absent source entries stay as empty strings
    /// so slot 3 remains slot 3 even when earlier slots are blank.
    #[serde(default)]
    pub memos: Vec<String>,
}

impl ProductRecord {
    /// Parses `created_at` into a timestamp, accepting RFC 3339 or a bare
    /// calendar date (taken as midnight UTC). Returns None for absent or
    /// unparseable values.
    pub fn created_at_timestamp(&self) -> Option<NaiveDateTime> {
        let raw = self.created_at.as_deref()?;

        if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
            return Some(dt.naive_utc());
        }
        if let Ok(dt) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f") {
            return Some(dt);
        }
        NaiveDate::parse_from_str(raw, "%Y-%m-%d")
            .ok()
            .and_then(|d| d.and_hms_opt(0, 0, 0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record_with_created_at(created_at: Option<&str>) -> ProductRecord {
        ProductRecord {
            id: "1".to_string(),
            code: String::new(),
            name: String::new(),
            brand: None,
            supplier_name: None,
            shipping_policy: None,
            selling_price: None,
            cost_price: None,
            supply_price: None,
            margin_amount: 0.0,
            group_id: None,
            group_name: None,
            created_at: created_at.map(|s| s.to_string()),
            compliance: Map::new(),
            variants: Vec::new(),
        }
    }

    #[test]
    fn test_created_at_accepts_rfc3339() {
        let record = record_with_created_at(Some("2025-03-01T09:30:00+09:00"));
        let ts = record.created_at_timestamp().unwrap();
        assert_eq!(ts.to_string(), "2025-03-01 00:30:00");
    }

    #[test]
    fn test_created_at_accepts_bare_date() {
        let record = record_with_created_at(Some("2025-01-01"));
        let ts = record.created_at_timestamp().unwrap();
        assert_eq!(ts.to_string(), "2025-01-01 00:00:00");
    }

    #[test]
    fn test_created_at_absent_or_garbage_is_none() {
        assert!(record_with_created_at(None).created_at_timestamp().is_none());
        assert!(record_with_created_at(Some("not a date"))
            .created_at_timestamp()
            .is_none());
    }
}
