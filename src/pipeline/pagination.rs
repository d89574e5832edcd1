//! Incremental pagination of the visible set.

use std::num::NonZeroUsize;

/// How much of the visible set is currently revealed.
///
/// Invariant: `revealed <= visible_len` for the `visible_len` last passed to
/// [`reset`](Self::reset) or [`advance`](Self::advance).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    page_size: Option<NonZeroUsize>,
    revealed: usize,
}

impl Pagination {
    /// `page_size` of `None` reveals the whole visible set at once.
    #[must_use]
    pub const fn new(page_size: Option<NonZeroUsize>) -> Self {
        Self {
            page_size,
            revealed: 0,
        }
    }

    #[must_use]
    pub const fn page_size(&self) -> Option<NonZeroUsize> {
        self.page_size
    }

    #[must_use]
    pub const fn revealed(&self) -> usize {
        self.revealed
    }

    /// Starts over at the first page of a freshly computed visible set.
    pub fn reset(&mut self, visible_len: usize) {
        self.revealed = match self.page_size {
            Some(size) => size.get().min(visible_len),
            None => visible_len,
        };
    }

    /// Reveals one more page, capped at `visible_len`. Returns whether
    /// anything new was revealed.
    pub fn advance(&mut self, visible_len: usize) -> bool {
        let before = self.revealed;
        self.revealed = match self.page_size {
            Some(size) => self.revealed.saturating_add(size.get()).min(visible_len),
            None => visible_len,
        };
        self.revealed != before
    }

    #[must_use]
    pub const fn has_more(&self, visible_len: usize) -> bool {
        self.revealed < visible_len
    }

    #[must_use]
    pub const fn remaining(&self, visible_len: usize) -> usize {
        visible_len.saturating_sub(self.revealed)
    }
}
