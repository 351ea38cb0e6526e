use chrono::NaiveDateTime;
use std::cmp::Ordering;

use crate::domain::ProductRecord;

/// Sort keys the listing screens offer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortKey {
    /// Newest created-at first.
    #[default]
    Newest,
    /// Oldest created-at first.
    Oldest,
    /// Cheapest selling price first.
    PriceAsc,
    /// Most expensive selling price first.
    PriceDesc,
}

impl SortKey {
    /// Parses the CLI/config spelling of a sort key.
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "newest" => Some(Self::Newest),
            "oldest" => Some(Self::Oldest),
            "price_asc" => Some(Self::PriceAsc),
            "price_desc" => Some(Self::PriceDesc),
            _ => None,
        }
    }
}

/// Total order over canonical records for the given key.
///
/// Records without a usable created-at sort as the epoch, the oldest
/// possible moment, so unknown dates collect predictably at one end instead
/// of making the comparator non-deterministic. A comparator that is not
/// total corrupts pagination: a record could show on two pages or none.
pub fn compare(a: &ProductRecord, b: &ProductRecord, key: SortKey) -> Ordering {
    match key {
        SortKey::Newest => created_ts(b).cmp(&created_ts(a)),
        SortKey::Oldest => created_ts(a).cmp(&created_ts(b)),
        SortKey::PriceAsc => selling(a).total_cmp(&selling(b)),
        SortKey::PriceDesc => selling(b).total_cmp(&selling(a)),
    }
}

fn created_ts(record: &ProductRecord) -> NaiveDateTime {
    record
        .created_at_timestamp()
        .unwrap_or(NaiveDateTime::UNIX_EPOCH)
}

fn selling(record: &ProductRecord) -> f64 {
    record.selling_price.unwrap_or(0.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::processing::normalize::normalize_product;
    use serde_json::json;

    fn record(raw: serde_json::Value) -> ProductRecord {
        normalize_product(&raw).unwrap().record
    }

    #[test]
    fn test_newest_orders_descending_by_created_at() {
        let older = record(json!({"id": "1", "created_at": "2025-01-01"}));
        let newer = record(json!({"id": "2", "created_at": "2025-03-01"}));

        assert_eq!(compare(&newer, &older, SortKey::Newest), Ordering::Less);
        assert_eq!(compare(&newer, &older, SortKey::Oldest), Ordering::Greater);
    }

    #[test]
    fn test_missing_created_at_sorts_after_every_dated_record_on_newest() {
        let dated = record(json!({"id": "1", "created_at": "1971-01-01"}));
        let undated = record(json!({"id": "2"}));

        assert_eq!(compare(&dated, &undated, SortKey::Newest), Ordering::Less);
        assert_eq!(compare(&undated, &dated, SortKey::Newest), Ordering::Greater);
    }

    #[test]
    fn test_price_ordering_defaults_missing_price_to_zero() {
        let cheap = record(json!({"id": "1", "selling_price": 1000}));
        let pricey = record(json!({"id": "2", "selling_price": 90000}));
        let unpriced = record(json!({"id": "3"}));

        assert_eq!(compare(&cheap, &pricey, SortKey::PriceAsc), Ordering::Less);
        assert_eq!(compare(&cheap, &pricey, SortKey::PriceDesc), Ordering::Greater);
        assert_eq!(compare(&unpriced, &cheap, SortKey::PriceAsc), Ordering::Less);
    }

    #[test]
    fn test_parse_sort_key_spellings() {
        assert_eq!(SortKey::parse("newest"), Some(SortKey::Newest));
        assert_eq!(SortKey::parse("price_desc"), Some(SortKey::PriceDesc));
        assert_eq!(SortKey::parse("unknown"), None);
    }
}
