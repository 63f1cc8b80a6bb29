//! Paginated object listings.
//!
//! A [`ListingSource`] opens one [`ObjectListing`] per prefix. The listing is
//! single-pass: callers pull pages with [`ObjectListing::next_page`] until a
//! page reports `has_more == false`, then drop it.

use crate::error::Result;
use async_trait::async_trait;

/// One page of object keys.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListingPage {
    /// Object keys on this page, in store order
    pub keys: Vec<String>,
    /// Whether the store has further pages after this one
    pub has_more: bool,
}

impl ListingPage {
    /// A page followed by more pages.
    pub fn more(keys: Vec<String>) -> Self {
        Self {
            keys,
            has_more: true,
        }
    }

    /// The final page of a listing.
    pub fn last(keys: Vec<String>) -> Self {
        Self {
            keys,
            has_more: false,
        }
    }
}

/// A lazy, finite sequence of listing pages.
#[async_trait]
pub trait ObjectListing: Send {
    /// Fetch the next page.
    ///
    /// Must not be called again after a page with `has_more == false`.
    async fn next_page(&mut self) -> Result<ListingPage>;
}

/// Opens prefix-scoped listings.
pub trait ListingSource {
    type Listing: ObjectListing;

    /// Start a fresh listing of every object under `prefix`.
    fn list(&self, prefix: &str) -> Self::Listing;
}

/// Listing backed by pages held in memory.
///
/// Useful for dry runs and tests; an empty page list behaves like a prefix
/// with no objects.
#[derive(Debug, Clone, Default)]
pub struct MemoryListing {
    pages: std::collections::VecDeque<Vec<String>>,
}

impl MemoryListing {
    /// Create a listing that yields `pages` in order.
    pub fn new<I, P, K>(pages: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: IntoIterator<Item = K>,
        K: Into<String>,
    {
        Self {
            pages: pages
                .into_iter()
                .map(|page| page.into_iter().map(Into::into).collect())
                .collect(),
        }
    }

    /// Number of pages not yet fetched.
    pub fn remaining_pages(&self) -> usize {
        self.pages.len()
    }
}

#[async_trait]
impl ObjectListing for MemoryListing {
    async fn next_page(&mut self) -> Result<ListingPage> {
        let keys = self.pages.pop_front().unwrap_or_default();
        Ok(ListingPage {
            keys,
            has_more: !self.pages.is_empty(),
        })
    }
}
