use std::ops::Range;

/// Page cursor over a collection of known size, fetched or still in the database.
///
/// Pages are 1-indexed. An empty collection still has one (empty) page, so
/// `current_page` is always within `[1, total_pages]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Paginator {
    page_size: i64,
    total_items: i64,
    current_page: i64,
}

impl Paginator {
    pub fn new(total_items: i64, page_size: i64) -> Self {
        Self {
            page_size: page_size.max(1),
            total_items: total_items.max(0),
            current_page: 1,
        }
    }

    pub fn page_size(&self) -> i64 {
        self.page_size
    }

    pub fn total_items(&self) -> i64 {
        self.total_items
    }

    pub fn current_page(&self) -> i64 {
        self.current_page
    }

    pub fn total_pages(&self) -> i64 {
        let full = self.total_items / self.page_size;
        let partial = i64::from(self.total_items % self.page_size != 0);
        (full + partial).max(1)
    }

    /// Move to `page`, clamped into `[1, total_pages]`; returns the page landed on
    pub fn go_to_page(&mut self, page: i64) -> i64 {
        self.current_page = page.clamp(1, self.total_pages());
        self.current_page
    }

    /// SQL OFFSET of the current page
    pub fn offset(&self) -> i64 {
        (self.current_page - 1) * self.page_size
    }

    /// Index range of the current page within the collection
    pub fn range(&self) -> Range<usize> {
        let start = self.offset();
        let end = start.saturating_add(self.page_size).min(self.total_items);
        let start = start.min(end);
        start as usize..end as usize
    }

    /// Items on the current page
    pub fn slice<'a, T>(&self, items: &'a [T]) -> &'a [T] {
        let range = self.range();
        let end = range.end.min(items.len());
        let start = range.start.min(end);
        &items[start..end]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_total_pages() {
        assert_eq!(Paginator::new(0, 10).total_pages(), 1);
        assert_eq!(Paginator::new(10, 10).total_pages(), 1);
        assert_eq!(Paginator::new(11, 10).total_pages(), 2);
        assert_eq!(Paginator::new(95, 10).total_pages(), 10);
    }

    #[test]
    fn test_go_to_page_clamps() {
        let mut paginator = Paginator::new(25, 10);
        assert_eq!(paginator.go_to_page(2), 2);
        assert_eq!(paginator.go_to_page(99), 3);
        assert_eq!(paginator.go_to_page(0), 1);
        assert_eq!(paginator.go_to_page(-4), 1);

        let mut empty = Paginator::new(0, 10);
        assert_eq!(empty.go_to_page(5), 1);
    }

    #[test]
    fn test_offset_follows_clamped_page() {
        let mut paginator = Paginator::new(23, 10);
        paginator.go_to_page(50);
        assert_eq!(paginator.current_page(), 3);
        assert_eq!(paginator.offset(), 20);

        paginator.go_to_page(i64::MAX);
        assert_eq!(paginator.offset(), 20);

        let mut empty = Paginator::new(0, 10);
        empty.go_to_page(i64::MAX);
        assert_eq!(empty.offset(), 0);
    }

    #[test]
    fn test_total_pages_near_i64_max() {
        let paginator = Paginator::new(i64::MAX, 100);
        assert_eq!(paginator.total_pages(), i64::MAX / 100 + 1);
    }

    #[test]
    fn test_slice_returns_current_page() {
        let items: Vec<i32> = (1..=25).collect();
        let mut paginator = Paginator::new(items.len() as i64, 10);

        assert_eq!(paginator.slice(&items), &items[0..10]);
        paginator.go_to_page(3);
        assert_eq!(paginator.slice(&items), &[21, 22, 23, 24, 25]);
    }

    #[test]
    fn test_every_reachable_page_is_in_range() {
        for total in 0..40 {
            let mut paginator = Paginator::new(total, 7);
            for requested in -3..12 {
                let page = paginator.go_to_page(requested);
                assert!(page >= 1 && page <= paginator.total_pages());
                let range = paginator.range();
                assert!(range.end <= total as usize);
            }
        }
    }

    #[test]
    fn test_zero_page_size_treated_as_one() {
        let paginator = Paginator::new(3, 0);
        assert_eq!(paginator.page_size(), 1);
        assert_eq!(paginator.total_pages(), 3);
    }
}
