use chrono::NaiveDate;
use std::collections::HashSet;

use crate::constants::{FILTER_ALL, IN_HOUSE_SUPPLIER, SHIPPING_POLICY_UNSPECIFIED};
use crate::domain::ProductRecord;

/// Listing filter criteria. Every field is optional; an unset field always
/// matches. Criteria combine with logical AND, and each criterion is its own
/// predicate function so new ones can be added without touching the rest.
#[derive(Debug, Clone, Default)]
pub struct FilterCriteria {
    /// Case-insensitive substring match against name or code.
    pub search_text: Option<String>,
    /// Matches either the group id or the group display name; upstream data
    /// is inconsistent about which one is populated.
    pub group: Option<String>,
    pub brand: Option<String>,
    /// Empty set matches everything.
    pub suppliers: HashSet<String>,
    pub only_with_shipping_policy: bool,
    /// Inclusive, at day granularity.
    pub date_from: Option<NaiveDate>,
    pub date_to: Option<NaiveDate>,
}

/// Decides whether `record` passes every criterion in `criteria`.
pub fn matches(record: &ProductRecord, criteria: &FilterCriteria) -> bool {
    matches_search(record, criteria.search_text.as_deref())
        && matches_group(record, criteria.group.as_deref())
        && matches_brand(record, criteria.brand.as_deref())
        && matches_suppliers(record, &criteria.suppliers)
        && matches_shipping_policy(record, criteria.only_with_shipping_policy)
        && matches_date_range(record, criteria.date_from, criteria.date_to)
}

pub fn matches_search(record: &ProductRecord, search_text: Option<&str>) -> bool {
    let needle = match search_text {
        Some(text) if !text.trim().is_empty() => text.trim().to_lowercase(),
        _ => return true,
    };

    record.name.to_lowercase().contains(&needle) || record.code.to_lowercase().contains(&needle)
}

pub fn matches_group(record: &ProductRecord, group: Option<&str>) -> bool {
    match group {
        Some(value) if !value.is_empty() && value != FILTER_ALL => {
            record.group_id.as_deref() == Some(value) || record.group_name.as_deref() == Some(value)
        }
        _ => true,
    }
}

pub fn matches_brand(record: &ProductRecord, brand: Option<&str>) -> bool {
    match brand {
        Some(value) if !value.is_empty() && value != FILTER_ALL => {
            record.brand.as_deref() == Some(value)
        }
        _ => true,
    }
}

pub fn matches_suppliers(record: &ProductRecord, suppliers: &HashSet<String>) -> bool {
    if suppliers.is_empty() {
        return true;
    }

    // Records without a supplier are in-house
    let resolved = record.supplier_name.as_deref().unwrap_or(IN_HOUSE_SUPPLIER);
    suppliers.contains(resolved)
}

pub fn matches_shipping_policy(record: &ProductRecord, only_with_shipping_policy: bool) -> bool {
    if !only_with_shipping_policy {
        return true;
    }

    match record.shipping_policy.as_deref() {
        Some(policy) => !policy.trim().is_empty() && policy != SHIPPING_POLICY_UNSPECIFIED,
        None => false,
    }
}

/// Inclusive on both ends: `from` compares at 00:00:00.000 of that day and
/// `to` at 23:59:59.999. A record without a usable created-at timestamp
/// fails closed whenever either bound is set.
pub fn matches_date_range(
    record: &ProductRecord,
    date_from: Option<NaiveDate>,
    date_to: Option<NaiveDate>,
) -> bool {
    if date_from.is_none() && date_to.is_none() {
        return true;
    }

    let created = match record.created_at_timestamp() {
        Some(ts) => ts,
        None => return false,
    };

    if let Some(from) = date_from.and_then(|d| d.and_hms_opt(0, 0, 0)) {
        if created < from {
            return false;
        }
    }
    if let Some(to) = date_to.and_then(|d| d.and_hms_milli_opt(23, 59, 59, 999)) {
        if created > to {
            return false;
        }
    }

    true
}
