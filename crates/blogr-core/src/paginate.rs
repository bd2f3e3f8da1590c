//! Deterministic windowing over an ordered result set.
//!
//! Out-of-range page numbers are clamped rather than rejected: a page below 1
//! becomes 1, and a page past the end becomes the last page. An empty input
//! produces an empty first page with `total_pages == 0`.

use std::num::NonZeroUsize;

use serde::Serialize;

/// Page size used when the caller does not configure one.
pub const DEFAULT_PAGE_SIZE: NonZeroUsize = NonZeroUsize::new(5).unwrap();

// ─── Window ──────────────────────────────────────────────────────────────────

/// The normalised position of one page within a result set of known size.
///
/// Backends that page in the database (`LIMIT`/`OFFSET`) compute a window from
/// a `COUNT(*)` and fetch only `offset..offset + page_size`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageWindow {
  /// 1-based page number after clamping.
  pub page:        usize,
  pub page_size:   usize,
  pub total_items: usize,
  pub total_pages: usize,
}

impl PageWindow {
  pub fn new(total_items: usize, requested_page: i64, page_size: NonZeroUsize) -> Self {
    let page_size   = page_size.get();
    let total_pages = total_items.div_ceil(page_size);

    let requested = usize::try_from(requested_page.max(1)).unwrap_or(usize::MAX);
    let page      = requested.min(total_pages.max(1));

    Self { page, page_size, total_items, total_pages }
  }

  /// Number of items preceding this page.
  pub fn offset(&self) -> usize { (self.page - 1) * self.page_size }

  /// Number of items this page actually holds.
  pub fn len(&self) -> usize {
    self
      .total_items
      .saturating_sub(self.offset())
      .min(self.page_size)
  }

  pub fn is_empty(&self) -> bool { self.len() == 0 }

  pub fn has_previous(&self) -> bool { self.page > 1 }

  pub fn has_next(&self) -> bool { self.page < self.total_pages }

  /// Attach the items of this window.
  pub fn with_items<T>(self, items: Vec<T>) -> Page<T> {
    Page {
      items,
      page: self.page,
      page_size: self.page_size,
      total_items: self.total_items,
      total_pages: self.total_pages,
    }
  }
}

// ─── Page ────────────────────────────────────────────────────────────────────

/// One page of an ordered result set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Page<T> {
  pub items:       Vec<T>,
  pub page:        usize,
  pub page_size:   usize,
  pub total_items: usize,
  pub total_pages: usize,
}

impl<T> Page<T> {
  pub fn window(&self) -> PageWindow {
    PageWindow {
      page:        self.page,
      page_size:   self.page_size,
      total_items: self.total_items,
      total_pages: self.total_pages,
    }
  }

  /// Transform each item, keeping the page metadata.
  pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
    let window = self.window();
    window.with_items(self.items.into_iter().map(f).collect())
  }
}

/// Slice `items` into the page numbered `page`.
///
/// The iterator is consumed exactly once, so lazy sources are safe to pass.
pub fn paginate<T>(
  items: impl IntoIterator<Item = T>,
  page: i64,
  page_size: NonZeroUsize,
) -> Page<T> {
  let all: Vec<T> = items.into_iter().collect();
  let window      = PageWindow::new(all.len(), page, page_size);
  let items       = all
    .into_iter()
    .skip(window.offset())
    .take(window.page_size)
    .collect();
  window.with_items(items)
}

#[cfg(test)]
mod tests {
  use super::*;

  fn size(n: usize) -> NonZeroUsize { NonZeroUsize::new(n).unwrap() }

  fn twelve() -> Vec<u32> { (1..=12).collect() }

  #[test]
  fn empty_input_has_no_pages() {
    let page = paginate(Vec::<u32>::new(), 1, size(5));
    assert!(page.items.is_empty());
    assert_eq!(page.total_pages, 0);
    assert_eq!(page.total_items, 0);
    assert_eq!(page.page, 1);
  }

  #[test]
  fn empty_input_with_large_page_stays_on_first() {
    let page = paginate(Vec::<u32>::new(), 7, size(5));
    assert_eq!(page.page, 1);
    assert!(page.items.is_empty());
  }

  #[test]
  fn first_page() {
    let page = paginate(twelve(), 1, size(5));
    assert_eq!(page.items, vec![1, 2, 3, 4, 5]);
    assert_eq!(page.total_pages, 3);
    assert_eq!(page.total_items, 12);
  }

  #[test]
  fn last_partial_page() {
    let page = paginate(twelve(), 3, size(5));
    assert_eq!(page.items, vec![11, 12]);
    assert_eq!(page.page, 3);
    assert_eq!(page.total_pages, 3);
  }

  #[test]
  fn page_past_end_clamps_to_last() {
    assert_eq!(paginate(twelve(), 99, size(5)), paginate(twelve(), 3, size(5)));
  }

  #[test]
  fn page_below_one_clamps_to_first() {
    assert_eq!(paginate(twelve(), 0, size(5)), paginate(twelve(), 1, size(5)));
    assert_eq!(paginate(twelve(), -4, size(5)), paginate(twelve(), 1, size(5)));
    assert_eq!(paginate(twelve(), i64::MIN, size(5)).page, 1);
  }

  #[test]
  fn huge_page_number_clamps() {
    let page = paginate(twelve(), i64::MAX, size(5));
    assert_eq!(page.page, 3);
  }

  #[test]
  fn exact_multiple_has_no_trailing_empty_page() {
    let page = paginate(1..=10, 2, size(5));
    assert_eq!(page.total_pages, 2);
    assert_eq!(page.items, vec![6, 7, 8, 9, 10]);
  }

  #[test]
  fn lazy_iterator_is_consumed_once() {
    let mut pulls = 0;
    let source = (1..=7).inspect(|_| pulls += 1);
    let page = paginate(source, 2, size(3));
    assert_eq!(page.items, vec![4, 5, 6]);
    assert_eq!(pulls, 7);
  }

  #[test]
  fn input_is_not_mutated() {
    let items = twelve();
    let page = paginate(items.iter(), 2, size(5));
    assert_eq!(page.items, vec![&6, &7, &8, &9, &10]);
    assert_eq!(items, twelve());
  }

  #[test]
  fn window_navigation() {
    let w = PageWindow::new(12, 2, size(5));
    assert_eq!(w.offset(), 5);
    assert_eq!(w.len(), 5);
    assert!(w.has_previous());
    assert!(w.has_next());

    let last = PageWindow::new(12, 3, size(5));
    assert_eq!(last.len(), 2);
    assert!(!last.has_next());
  }

  #[test]
  fn map_keeps_metadata() {
    let page = paginate(twelve(), 3, size(5)).map(|n| n * 10);
    assert_eq!(page.items, vec![110, 120]);
    assert_eq!(page.page, 3);
    assert_eq!(page.total_pages, 3);
  }
}
