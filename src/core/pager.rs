//! Statement pagination
//!
//! [`StatementPager`] turns an account's history into one ordered page. It
//! works on a snapshot slice and never touches the store.

use crate::types::{LedgerError, PageRequest, SortDirection, SortKey, Statement, StatementPage};

#[derive(Debug, Clone, Copy, Default)]
pub struct StatementPager;

impl StatementPager {
    /// Produce the requested page of `statements`
    ///
    /// With a date sort the whole history is stable-sorted before slicing, so
    /// statements sharing a timestamp keep their insertion order in both
    /// directions. Without a sort, insertion order is used as-is.
    ///
    /// A page past the end is empty, not an error.
    ///
    /// # Errors
    ///
    /// `InvalidPageRequest` when `request.size` is zero.
    pub fn paginate(
        statements: &[Statement],
        request: &PageRequest,
    ) -> Result<StatementPage, LedgerError> {
        if request.size == 0 {
            return Err(LedgerError::invalid_page_request(
                "page size must be greater than zero",
            ));
        }

        let total_items = statements.len();
        let total_pages = total_items.div_ceil(request.size);

        let start = request.index.saturating_mul(request.size);
        if start >= total_items {
            return Ok(StatementPage {
                items: Vec::new(),
                page_index: request.index,
                total_pages,
                total_items,
            });
        }
        let end = start.saturating_add(request.size).min(total_items);

        let items = match request.sort {
            Some(sort) => {
                let mut ordered: Vec<&Statement> = statements.iter().collect();
                match (sort.key, sort.direction) {
                    (SortKey::Date, SortDirection::Asc) => {
                        ordered.sort_by(|a, b| a.date.cmp(&b.date))
                    }
                    // Reversed comparator, still stable for equal dates
                    (SortKey::Date, SortDirection::Desc) => {
                        ordered.sort_by(|a, b| b.date.cmp(&a.date))
                    }
                }
                ordered[start..end].iter().map(|s| (*s).clone()).collect()
            }
            None => statements[start..end].to_vec(),
        };

        Ok(StatementPage {
            items,
            page_index: request.index,
            total_pages,
            total_items,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Sort, StatementType};
    use chrono::{DateTime, Duration, TimeZone, Utc};
    use rstest::rstest;
    use rust_decimal::Decimal;

    fn base() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2022, 1, 3, 11, 30, 0).unwrap()
    }

    /// Statement `n` has amount `n` and is dated `base + offsets[n - 1]` minutes
    fn history(offsets: &[i64]) -> Vec<Statement> {
        offsets
            .iter()
            .enumerate()
            .map(|(i, offset)| {
                Statement::new(
                    base() + Duration::minutes(*offset),
                    StatementType::Deposit,
                    Decimal::from(i as i64 + 1),
                )
            })
            .collect()
    }

    fn amounts(page: &StatementPage) -> Vec<i64> {
        page.items
            .iter()
            .map(|s| s.amount.mantissa() as i64)
            .collect()
    }

    #[test]
    fn test_ten_statements_page_of_two() {
        let statements = history(&[0, 1, 2, 3, 4, 5, 6, 7, 8, 9]);

        let page = StatementPager::paginate(&statements, &PageRequest::new(0, 2)).unwrap();

        assert_eq!(page.total_pages, 5);
        assert_eq!(page.total_items, 10);
        assert_eq!(page.page_index, 0);
        assert_eq!(amounts(&page), vec![1, 2]);
    }

    #[test]
    fn test_date_descending_puts_latest_first() {
        // Inserted out of chronological order
        let statements = history(&[5, 0, 9, 3, 1, 7, 2, 8, 4, 6]);
        let request = PageRequest::new(0, 5).sorted(Sort::by_date(SortDirection::Desc));

        let page = StatementPager::paginate(&statements, &request).unwrap();

        assert_eq!(page.items.len(), 5);
        assert_eq!(page.items[0].date, base() + Duration::minutes(9));
        assert_eq!(amounts(&page), vec![3, 8, 6, 10, 1]);
    }

    #[test]
    fn test_date_ascending_second_page() {
        let statements = history(&[5, 0, 9, 3, 1, 7, 2, 8, 4, 6]);
        let request = PageRequest::new(1, 4).sorted(Sort::by_date(SortDirection::Asc));

        let page = StatementPager::paginate(&statements, &request).unwrap();

        assert_eq!(page.total_pages, 3);
        assert_eq!(amounts(&page), vec![9, 1, 10, 6]);
    }

    #[rstest]
    #[case::ascending(SortDirection::Asc, vec![2, 4, 1, 3, 5])]
    #[case::descending(SortDirection::Desc, vec![1, 3, 5, 2, 4])]
    fn test_equal_dates_keep_insertion_order(
        #[case] direction: SortDirection,
        #[case] expected: Vec<i64>,
    ) {
        let statements = history(&[1, 0, 1, 0, 1]);
        let request = PageRequest::new(0, 10).sorted(Sort::by_date(direction));

        let page = StatementPager::paginate(&statements, &request).unwrap();

        assert_eq!(amounts(&page), expected);
    }

    #[test]
    fn test_unsorted_uses_insertion_order() {
        let statements = history(&[3, 2, 1]);

        let page = StatementPager::paginate(&statements, &PageRequest::new(0, 3)).unwrap();

        assert_eq!(amounts(&page), vec![1, 2, 3]);
    }

    #[rstest]
    #[case::last_partial_page(7, 3, 2, vec![7])]
    #[case::past_the_end(7, 3, 5, vec![])]
    #[case::huge_index(7, 3, usize::MAX, vec![])]
    fn test_slicing_bounds(
        #[case] count: usize,
        #[case] size: usize,
        #[case] index: usize,
        #[case] expected: Vec<i64>,
    ) {
        let offsets: Vec<i64> = (0..count as i64).collect();
        let statements = history(&offsets);

        let page = StatementPager::paginate(&statements, &PageRequest::new(index, size)).unwrap();

        assert_eq!(amounts(&page), expected);
        assert_eq!(page.total_pages, 3);
        assert_eq!(page.total_items, 7);
        assert_eq!(page.page_index, index);
    }

    #[test]
    fn test_empty_history_has_zero_pages() {
        let page = StatementPager::paginate(&[], &PageRequest::new(0, 10)).unwrap();

        assert!(page.items.is_empty());
        assert_eq!(page.total_pages, 0);
        assert_eq!(page.total_items, 0);
    }

    #[test]
    fn test_zero_page_size_is_rejected() {
        let result = StatementPager::paginate(&history(&[0]), &PageRequest::new(0, 0));
        assert!(matches!(result, Err(LedgerError::InvalidPageRequest { .. })));
    }

    #[test]
    fn test_source_history_is_not_reordered() {
        let statements = history(&[2, 1, 0]);
        let before = statements.clone();
        let request = PageRequest::new(0, 3).sorted(Sort::by_date(SortDirection::Asc));

        StatementPager::paginate(&statements, &request).unwrap();

        assert_eq!(statements, before);
    }
}
