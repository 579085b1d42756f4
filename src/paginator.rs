/// Page math over a total row count. The store pages in SQL with
/// LIMIT/OFFSET, so the paginator only needs the count and the page size.
pub struct Paginator {
    total: i64,
    page_size: u32,
    page_count: u32,
}

impl Paginator {
    pub fn from(total: i64, page_size: u32) -> Self {
        if total <= 0 {
            return Paginator {
                total: 0,
                page_size,
                page_count: 0,
            };
        }
        let upper_bound = (total - 1) as u32;
        let page_count = (upper_bound / page_size) + 1;

        Paginator {
            total,
            page_size,
            page_count,
        }
    }

    pub fn total(&self) -> i64 {
        self.total
    }

    pub fn page_count(&self) -> u32 {
        self.page_count
    }

    /// Sanity check for the requested page: out-of-range requests land on
    /// page 1 rather than erroring.
    pub fn clamp(&self, page: u32) -> u32 {
        match page {
            0 => 1,
            x if x > self.page_count => 1,
            x => x,
        }
    }

    pub fn offset(&self, page: u32) -> i64 {
        ((page.saturating_sub(1)) as i64) * (self.page_size as i64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_happy_case() {
        let paginator = Paginator::from(13, 3);
        assert_eq!(paginator.page_count(), 5);
        assert_eq!(paginator.offset(1), 0);
        assert_eq!(paginator.offset(2), 3);
        assert_eq!(paginator.offset(5), 12);
        assert_eq!(paginator.clamp(3), 3);
        assert_eq!(paginator.clamp(0), 1);
        assert_eq!(paginator.clamp(6), 1);
    }

    #[test]
    fn test_exact_multiple() {
        let paginator = Paginator::from(12, 3);
        assert_eq!(paginator.page_count(), 4);
    }

    #[test]
    fn test_empty() {
        let paginator = Paginator::from(0, 3);
        assert_eq!(paginator.page_count(), 0);
        assert_eq!(paginator.total(), 0);
        assert_eq!(paginator.clamp(1), 1);
    }
}
