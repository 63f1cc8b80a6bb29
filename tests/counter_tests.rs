//! Tests for the streaming unique counter

use async_trait::async_trait;
use docket_stats::{
    count_unique_json, CountOptions, DocketStatsError, ListingPage, MemoryListing, NoProgress,
    ObjectListing, Progress, Result,
};

/// Progress sink that records every call.
#[derive(Debug, Default)]
struct RecordingProgress {
    total: Option<u64>,
    position: u64,
    increments: usize,
    finished: usize,
}

impl Progress for RecordingProgress {
    fn set_total(&mut self, total: u64) {
        self.total = Some(total);
    }

    fn increment(&mut self, delta: u64) {
        self.position += delta;
        self.increments += 1;
    }

    fn finish(&mut self) {
        self.finished += 1;
    }
}

/// Listing that counts page requests and fails on a chosen page.
struct ScriptedListing {
    pages: Vec<Vec<String>>,
    served: usize,
    fail_on: Option<usize>,
}

impl ScriptedListing {
    fn new(pages: Vec<Vec<&str>>) -> Self {
        Self {
            pages: pages
                .into_iter()
                .map(|p| p.into_iter().map(String::from).collect())
                .collect(),
            served: 0,
            fail_on: None,
        }
    }

    fn failing_on(mut self, page: usize) -> Self {
        self.fail_on = Some(page);
        self
    }
}

#[async_trait]
impl ObjectListing for ScriptedListing {
    async fn next_page(&mut self) -> Result<ListingPage> {
        if self.fail_on == Some(self.served) {
            return Err(DocketStatsError::Listing("connection reset".to_string()));
        }
        assert!(
            self.served < self.pages.len().max(1),
            "page requested after the last page"
        );
        let keys = self.pages.get(self.served).cloned().unwrap_or_default();
        self.served += 1;
        Ok(ListingPage {
            keys,
            has_more: self.served < self.pages.len(),
        })
    }
}

#[tokio::test]
async fn test_versioned_names_count_once() -> Result<()> {
    let mut listing = MemoryListing::new(vec![vec!["a.json", "a(1).json", "b.json"]]);
    let count = count_unique_json(&mut listing, CountOptions::default(), &mut NoProgress).await?;
    assert_eq!(count, 2);
    Ok(())
}

#[tokio::test]
async fn test_empty_listing() -> Result<()> {
    let mut listing = ScriptedListing::new(vec![]);
    let count = count_unique_json(&mut listing, CountOptions::default(), &mut NoProgress).await?;
    assert_eq!(count, 0);
    assert_eq!(listing.served, 1);
    Ok(())
}

#[tokio::test]
async fn test_all_pages_consumed() -> Result<()> {
    let pages: Vec<Vec<String>> = (0..7)
        .map(|p| (0..3).map(|i| format!("raw/c/doc-{p}-{i}.json")).collect())
        .collect();
    let mut listing = ScriptedListing {
        pages,
        served: 0,
        fail_on: None,
    };

    let count = count_unique_json(&mut listing, CountOptions::default(), &mut NoProgress).await?;

    assert_eq!(listing.served, 7);
    assert_eq!(count, 21);
    Ok(())
}

#[tokio::test]
async fn test_progress_counts_new_names_only() -> Result<()> {
    let mut listing = ScriptedListing::new(vec![
        vec!["c/x.json", "c/x(1).json", "c/y.json"],
        vec!["c/x(2)(3).json", "c/z.json", "c/readme.txt"],
    ]);
    let mut progress = RecordingProgress::default();

    let count = count_unique_json(&mut listing, CountOptions::with_progress(5), &mut progress).await?;

    assert_eq!(count, 3);
    assert_eq!(progress.total, Some(5));
    assert_eq!(progress.position, 3);
    assert_eq!(progress.increments, 3);
    assert_eq!(progress.finished, 1);
    Ok(())
}

#[tokio::test]
async fn test_progress_may_overshoot_expected_total() -> Result<()> {
    let mut listing = MemoryListing::new(vec![vec!["a.json", "b.json", "c.json"]]);
    let mut progress = RecordingProgress::default();

    let count = count_unique_json(&mut listing, CountOptions::with_progress(2), &mut progress).await?;

    assert_eq!(count, 3);
    assert_eq!(progress.position, 3);
    assert_eq!(progress.finished, 1);
    Ok(())
}

#[tokio::test]
async fn test_progress_disabled() -> Result<()> {
    let mut progress = RecordingProgress::default();

    let mut listing = MemoryListing::new(vec![vec!["a.json"]]);
    let options = CountOptions {
        expected_total: Some(10),
        show_progress: false,
    };
    count_unique_json(&mut listing, options, &mut progress).await?;

    // a zero expected total also leaves the indicator untouched
    let mut listing = MemoryListing::new(vec![vec!["a.json"]]);
    count_unique_json(&mut listing, CountOptions::with_progress(0), &mut progress).await?;

    assert_eq!(progress.total, None);
    assert_eq!(progress.increments, 0);
    assert_eq!(progress.finished, 0);
    Ok(())
}

#[tokio::test]
async fn test_listing_error_propagates() {
    let mut listing = ScriptedListing::new(vec![vec!["a.json"], vec!["b.json"]]).failing_on(1);
    let mut progress = RecordingProgress::default();

    let err = count_unique_json(&mut listing, CountOptions::with_progress(2), &mut progress)
        .await
        .unwrap_err();

    assert!(matches!(err, DocketStatsError::Listing(_)));
    assert_eq!(progress.position, 1);
    assert_eq!(progress.finished, 1);
}
