/// One page of records plus the display metadata a listing screen needs to
/// render text like "showing 11–20 of 137" without re-deriving the math.
/// Range values are 1-based; an empty result uses 0 for both ends.
#[derive(Debug, Clone, PartialEq)]
pub struct Page<T> {
    pub visible: Vec<T>,
    pub total: usize,
    pub range_start: usize,
    pub range_end: usize,
}

/// Slices `records` into the requested page.
///
/// `page_index` is 0-based. A `page_size` of 0 is a caller error and is
/// clamped to 1 so pagination controls stay responsive under transient
/// invalid UI state. A page index past the end yields an empty page with
/// `total` still reflecting the full count; pagination controls race with
/// data changes, so this must never be an error.
pub fn paginate<T: Clone>(records: &[T], page_index: usize, page_size: usize) -> Page<T> {
    let page_size = page_size.max(1);
    let total = records.len();
    let offset = page_index.saturating_mul(page_size);

    let visible: Vec<T> = records.iter().skip(offset).take(page_size).cloned().collect();

    let range_start = if total == 0 { 0 } else { offset + 1 };
    let range_end = offset.saturating_add(page_size).min(total);

    Page {
        visible,
        total,
        range_start,
        range_end,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_middle_page_range() {
        let records: Vec<u32> = (0..137).collect();
        let page = paginate(&records, 6, 20);

        assert_eq!(page.visible.len(), 17);
        assert_eq!(page.total, 137);
        assert_eq!(page.range_start, 121);
        assert_eq!(page.range_end, 137);
    }

    #[test]
    fn test_first_page() {
        let records: Vec<u32> = (0..137).collect();
        let page = paginate(&records, 0, 20);

        assert_eq!(page.visible, (0..20).collect::<Vec<u32>>());
        assert_eq!(page.range_start, 1);
        assert_eq!(page.range_end, 20);
    }

    #[test]
    fn test_empty_input_yields_zero_range() {
        let page = paginate::<u32>(&[], 5, 20);

        assert!(page.visible.is_empty());
        assert_eq!(page.total, 0);
        assert_eq!(page.range_start, 0);
        assert_eq!(page.range_end, 0);
    }

    #[test]
    fn test_page_beyond_end_keeps_total() {
        let records: Vec<u32> = (0..10).collect();
        let page = paginate(&records, 99, 20);

        assert!(page.visible.is_empty());
        assert_eq!(page.total, 10);
    }

    #[test]
    fn test_zero_page_size_clamps_to_one() {
        let records: Vec<u32> = (0..3).collect();
        let page = paginate(&records, 1, 0);

        assert_eq!(page.visible, vec![1]);
        assert_eq!(page.range_start, 2);
        assert_eq!(page.range_end, 2);
    }
}
