//! Optimistic state controller
//!
//! Holds two immutable snapshots: the last state confirmed by the store and
//! the state currently shown. Local edits replace the shown snapshot at once.
//! A new confirmed snapshot replaces both, discarding whatever speculation was
//! still pending (last writer wins).

use std::sync::Arc;

#[derive(Debug, Clone)]
pub struct Optimistic<T> {
    confirmed: Arc<T>,
    displayed: Arc<T>,
    pending: usize,
}

impl<T> Optimistic<T> {
    pub fn new(confirmed: T) -> Self {
        let confirmed = Arc::new(confirmed);
        Self {
            displayed: Arc::clone(&confirmed),
            confirmed,
            pending: 0,
        }
    }

    /// What the board should render right now
    pub fn displayed(&self) -> &T {
        &self.displayed
    }

    /// Last snapshot delivered by the store
    pub fn confirmed(&self) -> &T {
        &self.confirmed
    }

    /// Replace the shown state with `transform(shown)`.
    ///
    /// Transforms compose: each one sees the result of the previous, never a
    /// stale pre-edit snapshot.
    pub fn apply<F>(&mut self, transform: F)
    where
        F: FnOnce(&T) -> T,
    {
        self.displayed = Arc::new(transform(&self.displayed));
        self.pending += 1;
    }

    /// Like `apply`, but a `None` from the transform leaves the shown
    /// snapshot untouched (same allocation). Returns whether it changed.
    pub fn try_apply<F>(&mut self, transform: F) -> bool
    where
        F: FnOnce(&T) -> Option<T>,
    {
        match transform(&self.displayed) {
            Some(next) => {
                self.displayed = Arc::new(next);
                self.pending += 1;
                true
            }
            None => false,
        }
    }

    /// Show `snapshot` again after an abandoned gesture. Reuses the
    /// confirmed allocation when they are equal, so nothing looks pending.
    pub fn restore(&mut self, snapshot: T)
    where
        T: PartialEq,
    {
        if *self.confirmed == snapshot {
            self.displayed = Arc::clone(&self.confirmed);
            self.pending = 0;
        } else {
            self.displayed = Arc::new(snapshot);
        }
    }

    /// Install a fresh confirmed snapshot; shown state becomes exactly it
    pub fn confirm(&mut self, confirmed: T) {
        let confirmed = Arc::new(confirmed);
        self.displayed = Arc::clone(&confirmed);
        self.confirmed = confirmed;
        self.pending = 0;
    }

    /// True while local edits are shown that the store has not echoed back
    pub fn is_speculative(&self) -> bool {
        !Arc::ptr_eq(&self.confirmed, &self.displayed)
    }

    /// Number of transforms applied since the last confirmation
    pub fn pending(&self) -> usize {
        self.pending
    }

    /// Shared handle on the shown snapshot
    pub fn displayed_snapshot(&self) -> Arc<T> {
        Arc::clone(&self.displayed)
    }
}

impl<T: Default> Default for Optimistic<T> {
    fn default() -> Self {
        Self::new(T::default())
    }
}
