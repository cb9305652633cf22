//! Pagination cache.
//!
//! # Purpose
//! Accumulates fetched page envelopes in arrival order and derives the
//! flattened row view the rendering surface consumes. Owned by one session,
//! mutated only inside short critical sections; no persistence.
//!
//! # Invariants
//! - `flatten().count()` equals the sum of page data lengths after every
//!   mutation, including the empty-cache case.
//! - Pages are appended in the caller's order; the loader serializes fetches
//!   so arrival order is increasing page order by construction.
use crate::fetch::PageEnvelope;
use roster_common::Record;

#[derive(Debug)]
pub struct PaginationCache {
    pages: Vec<PageEnvelope>,
    page_size: u32,
}

impl PaginationCache {
    pub fn new(page_size: u32) -> Self {
        Self {
            pages: Vec::new(),
            page_size,
        }
    }

    pub fn pages(&self) -> &[PageEnvelope] {
        &self.pages
    }

    pub fn is_empty(&self) -> bool {
        self.pages.is_empty()
    }

    /// Append a fetched envelope. No page-number de-duplication: sequencing
    /// is the loader's responsibility.
    pub fn append_page(&mut self, envelope: PageEnvelope) {
        self.pages.push(envelope);
        metrics::gauge!("roster_client_rows_cached").set(self.total_fetched() as f64);
    }

    /// Insert a locally-created record at the front of the first page and
    /// bump that page's total. Returns `false` (leaving state untouched)
    /// when no page has been fetched yet.
    pub fn prepend_record(&mut self, record: Record) -> bool {
        let Some(first) = self.pages.first_mut() else {
            return false;
        };
        first.data.insert(0, record);
        first.total_count += 1;
        metrics::gauge!("roster_client_rows_cached").set(self.total_fetched() as f64);
        true
    }

    /// Flattened row view: page order, then within-page insertion order.
    /// A pure function of state — restartable, no iterator side effects.
    pub fn flatten(&self) -> impl Iterator<Item = &Record> + '_ {
        self.pages.iter().flat_map(|page| page.data.iter())
    }

    pub fn total_fetched(&self) -> usize {
        self.pages.iter().map(|page| page.data.len()).sum()
    }

    /// Authoritative total from the first page, once available.
    pub fn total_known(&self) -> Option<u64> {
        self.pages.first().map(|page| page.total_count)
    }

    /// Upper-bound row estimate: `total_pages(first) * page_size`. The last
    /// page may be partial, so this over-estimates by up to one page.
    pub fn known_row_bound(&self) -> u64 {
        self.pages
            .first()
            .map(|page| u64::from(page.total_pages) * u64::from(self.page_size))
            .unwrap_or(0)
    }

    /// Whether further fetching can ever yield rows. True once the cache is
    /// non-empty and either the row bound is met or the last envelope says
    /// there is no next page (which catches a partial final page early).
    pub fn is_exhausted(&self) -> bool {
        if self.pages.is_empty() {
            return false;
        }
        if self.total_fetched() as u64 >= self.known_row_bound() {
            return true;
        }
        self.pages
            .last()
            .is_some_and(|page| !page.has_next_page)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fetch::tests::sample_record;

    fn page(count: usize, page_number: u32, total_count: u64) -> PageEnvelope {
        let data = (0..count)
            .map(|i| sample_record(&format!("P{page_number} R{i}")))
            .collect();
        PageEnvelope::new(data, page_number, total_count, 10)
    }

    #[test]
    fn flatten_length_tracks_appends() {
        let mut cache = PaginationCache::new(10);
        assert_eq!(cache.flatten().count(), 0);

        cache.append_page(page(10, 1, 35));
        assert_eq!(cache.flatten().count(), 10);
        assert_eq!(cache.total_fetched(), 10);

        cache.append_page(page(10, 2, 35));
        assert_eq!(cache.flatten().count(), 20);

        cache.append_page(page(5, 3, 35));
        assert_eq!(cache.flatten().count(), 25);
        assert_eq!(
            cache.flatten().count(),
            cache.pages().iter().map(|p| p.data.len()).sum::<usize>()
        );
    }

    #[test]
    fn flatten_preserves_page_then_insertion_order() {
        let mut cache = PaginationCache::new(10);
        cache.append_page(page(2, 1, 4));
        cache.append_page(page(2, 2, 4));

        let names: Vec<_> = cache.flatten().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["P1 R0", "P1 R1", "P2 R0", "P2 R1"]);
    }

    #[test]
    fn prepend_on_empty_cache_is_a_safe_noop() {
        let mut cache = PaginationCache::new(10);
        assert!(!cache.prepend_record(sample_record("Early Bird")));
        assert!(cache.is_empty());
        assert_eq!(cache.flatten().count(), 0);
    }

    #[test]
    fn prepend_lands_at_front_and_bumps_total() {
        let mut cache = PaginationCache::new(10);
        cache.append_page(page(10, 1, 30));
        cache.append_page(page(10, 2, 30));

        let record = sample_record("New Row");
        assert!(cache.prepend_record(record.clone()));

        assert_eq!(cache.pages()[0].data.len(), 11);
        assert_eq!(cache.pages()[0].total_count, 31);
        assert_eq!(cache.pages()[1].data.len(), 10);
        assert_eq!(cache.flatten().next().map(|r| r.id), Some(record.id));
        assert_eq!(cache.flatten().count(), 21);
    }

    #[test]
    fn known_row_bound_uses_first_page() {
        let mut cache = PaginationCache::new(10);
        assert_eq!(cache.known_row_bound(), 0);

        cache.append_page(page(10, 1, 15));
        assert_eq!(cache.total_known(), Some(15));
        assert_eq!(cache.known_row_bound(), 20);
    }

    #[test]
    fn exhaustion_via_row_bound() {
        let mut cache = PaginationCache::new(10);
        assert!(!cache.is_exhausted());

        cache.append_page(page(10, 1, 20));
        assert!(!cache.is_exhausted());
        cache.append_page(page(10, 2, 20));
        assert!(cache.is_exhausted());
    }

    #[test]
    fn exhaustion_via_partial_last_page() {
        let mut cache = PaginationCache::new(10);
        cache.append_page(page(10, 1, 15));
        assert!(!cache.is_exhausted());

        // 15 rows fetched, bound is 20: the bound alone would keep fetching,
        // but page 2 of 2 reports no next page.
        cache.append_page(page(5, 2, 15));
        assert_eq!(cache.total_fetched(), 15);
        assert!(cache.is_exhausted());
    }
}
