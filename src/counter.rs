//! Streaming count of unique archived JSON records.

use crate::canonical::{canonical_filename, is_json_key};
use crate::error::Result;
use crate::listing::ObjectListing;
use crate::progress::Progress;
use std::collections::HashSet;
use tracing::debug;

/// Options for a single counting pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CountOptions {
    /// Number of records the API reports for this prefix
    pub expected_total: Option<u64>,
    /// Drive the progress indicator while counting
    pub show_progress: bool,
}

impl CountOptions {
    /// Count with progress reported against `expected_total`.
    pub fn with_progress(expected_total: u64) -> Self {
        Self {
            expected_total: Some(expected_total),
            show_progress: true,
        }
    }

    /// Expected total to report against, if progress is active.
    ///
    /// A missing or zero total disables progress even when requested.
    fn tracked_total(&self) -> Option<u64> {
        match self.expected_total {
            Some(total) if self.show_progress && total > 0 => Some(total),
            _ => None,
        }
    }
}

/// Count distinct canonical JSON filenames in a listing.
///
/// Pages are pulled one at a time until the listing reports no further
/// pages. Only canonical names are retained, so memory grows with the number
/// of distinct records rather than the number of objects. Every newly seen
/// name advances `progress` by one when progress is active; the indicator is
/// finished after the last page, or when a page fails.
pub async fn count_unique_json<L>(
    listing: &mut L,
    options: CountOptions,
    progress: &mut dyn Progress,
) -> Result<usize>
where
    L: ObjectListing + ?Sized,
{
    let tracked = options.tracked_total();
    if let Some(total) = tracked {
        progress.set_total(total);
    }

    let result = drain(listing, tracked.is_some(), progress).await;

    if tracked.is_some() {
        progress.finish();
    }
    result
}

async fn drain<L>(listing: &mut L, tracked: bool, progress: &mut dyn Progress) -> Result<usize>
where
    L: ObjectListing + ?Sized,
{
    let mut unique_names: HashSet<String> = HashSet::new();
    let mut page_number = 0usize;

    loop {
        let page = listing.next_page().await?;
        page_number += 1;

        for key in page.keys.iter().filter(|key| is_json_key(key)) {
            let name = canonical_filename(key);
            if unique_names.contains(name.as_ref()) {
                continue;
            }
            unique_names.insert(name.into_owned());
            if tracked {
                progress.increment(1);
            }
        }

        debug!(
            page = page_number,
            keys = page.keys.len(),
            unique = unique_names.len(),
            "listing page processed"
        );

        if !page.has_more {
            break;
        }
    }

    Ok(unique_names.len())
}
