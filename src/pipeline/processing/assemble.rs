use serde_json::Value;
use tracing::debug;

use super::filter::{matches, FilterCriteria};
use super::normalize::{normalize_product, NormalizationWarning};
use super::paginate::paginate;
use super::sort::{compare, SortKey};
use crate::domain::ProductRecord;

/// Final view model handed to a presentation layer.
#[derive(Debug, Clone, PartialEq)]
pub struct ProductViewModel {
    pub visible: Vec<ProductRecord>,
    pub total: usize,
    pub range_start: usize,
    pub range_end: usize,
    /// Data-quality warnings collected across the whole batch.
    pub warnings: Vec<NormalizationWarning>,
}

/// Runs the full listing pipeline: normalize once up front, then filter,
/// sort, and paginate over canonical records. Stateless; invoked fresh on
/// every query.
///
/// Null entries in `raw_records` are legitimate absence and are skipped
/// quietly; non-null entries that cannot be normalized are reported as
/// warnings.
pub fn assemble(
    raw_records: &[Value],
    criteria: &FilterCriteria,
    sort_key: SortKey,
    page_index: usize,
    page_size: usize,
) -> ProductViewModel {
    let mut warnings = Vec::new();
    let mut records = Vec::with_capacity(raw_records.len());

    for (index, raw) in raw_records.iter().enumerate() {
        if raw.is_null() {
            continue;
        }
        match normalize_product(raw) {
            Some(normalized) => {
                warnings.extend(normalized.warnings);
                records.push(normalized.record);
            }
            None => warnings.push(NormalizationWarning::MalformedRecord { index }),
        }
    }

    let normalized_count = records.len();
    let mut filtered: Vec<ProductRecord> =
        records.into_iter().filter(|r| matches(r, criteria)).collect();

    // sort_by is stable, so records the comparator ties keep their order
    filtered.sort_by(|a, b| compare(a, b, sort_key));

    let page = paginate(&filtered, page_index, page_size);

    debug!(
        "assemble: {} raw -> {} normalized -> {} filtered, page {} ({} visible), {} warnings",
        raw_records.len(),
        normalized_count,
        page.total,
        page_index,
        page.visible.len(),
        warnings.len()
    );

    ProductViewModel {
        visible: page.visible,
        total: page.total,
        range_start: page.range_start,
        range_end: page.range_end,
        warnings,
    }
}
