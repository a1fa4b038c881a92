//! Memoized filtered views over fetched collections.

use taskboard_core::{Project, ProjectFilter, Task, TaskFilter};
use time::OffsetDateTime;

/// A filter that can derive a view from a slice.
pub trait ViewFilter<T> {
    /// Filtered (and possibly sorted) copy of `items`.
    fn derive(&self, items: &[T], now: OffsetDateTime) -> Vec<T>;
}

impl ViewFilter<Project> for ProjectFilter {
    fn derive(&self, items: &[Project], now: OffsetDateTime) -> Vec<Project> {
        self.apply(items, now)
    }
}

impl ViewFilter<Task> for TaskFilter {
    fn derive(&self, items: &[Task], now: OffsetDateTime) -> Vec<Task> {
        self.apply(items, now)
    }
}

/// Source collection plus filter, with the derived output cached.
///
/// The cache is invalidated when the source is replaced or the filter changes
/// value. The clock passed to [`DerivedView::view`] is only read on recompute.
#[derive(Debug, Clone)]
pub struct DerivedView<T, F> {
    source: Vec<T>,
    filter: F,
    cached: Option<Vec<T>>,
    recomputes: usize,
}

impl<T, F> DerivedView<T, F>
where
    T: Clone,
    F: ViewFilter<T> + PartialEq,
{
    /// Empty view with the given filter.
    pub const fn new(filter: F) -> Self {
        Self {
            source: Vec::new(),
            filter,
            cached: None,
            recomputes: 0,
        }
    }

    /// Replace the source collection.
    pub fn set_source(&mut self, source: Vec<T>) {
        self.source = source;
        self.cached = None;
    }

    /// The unfiltered collection.
    pub fn source(&self) -> &[T] {
        &self.source
    }

    /// Current filter.
    pub const fn filter(&self) -> &F {
        &self.filter
    }

    /// Replace the filter; an equal filter keeps the cache.
    pub fn set_filter(&mut self, filter: F) {
        if self.filter != filter {
            self.filter = filter;
            self.cached = None;
        }
    }

    /// Edit the filter in place; the cache survives edits that change nothing.
    pub fn update_filter(&mut self, edit: impl FnOnce(&mut F))
    where
        F: Clone,
    {
        let mut next = self.filter.clone();
        edit(&mut next);
        self.set_filter(next);
    }

    /// Derived output, recomputed only if stale.
    pub fn view(&mut self, now: OffsetDateTime) -> &[T] {
        if self.cached.is_none() {
            self.recomputes += 1;
        }
        self.cached
            .get_or_insert_with(|| self.filter.derive(&self.source, now))
    }

    /// How many times the output has been computed.
    pub const fn recompute_count(&self) -> usize {
        self.recomputes
    }
}
