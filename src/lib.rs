//! # docket-stats: Archive Completeness Audit for regulations.gov Dockets
//!
//! `docket-stats` compares the number of records regulations.gov reports for a
//! docket with the number of unique JSON files the
//! [mirrulations](https://registry.opendata.aws/mirrulations/) S3 archive holds
//! for it. Gaps point at records the archive has not mirrored yet.
//!
//! ## Features
//!
//! - **Streaming**: Listings are consumed page by page, never collected
//! - **Bounded Memory**: Only distinct canonical names are kept, not every object
//! - **Version Aware**: `c(1).json`, `c(1)(2).json` and `c.json` count once
//! - **Pluggable**: Listings, record counts and progress are traits, so the
//!   core runs against in-memory fakes as easily as against S3
//!
//! ## Quick Start
//!
//! ### Counting unique records under a prefix
//!
//! ```
//! use docket_stats::{count_unique_json, CountOptions, MemoryListing, NoProgress};
//!
//! # block_on(async {
//! let mut listing = MemoryListing::new(vec![
//!     vec!["comments/EPA-2020-0001-0002.json", "comments/EPA-2020-0001-0002(1).json"],
//!     vec!["comments/EPA-2020-0001-0003.json"],
//! ]);
//!
//! let unique = count_unique_json(&mut listing, CountOptions::default(), &mut NoProgress).await?;
//! assert_eq!(unique, 2);
//! # Ok::<(), docket_stats::DocketStatsError>(())
//! # }).unwrap();
//! # fn block_on<F: std::future::Future>(f: F) -> F::Output {
//! #     tokio::runtime::Builder::new_current_thread().build().unwrap().block_on(f)
//! # }
//! ```
//!
//! ### Auditing a docket against S3
//!
//! ```no_run
//! # #[cfg(feature = "cloud-s3")]
//! # async fn example() -> docket_stats::Result<()> {
//! use docket_stats::{Config, Reconciler, RegulationsClient, TerminalProgress};
//! use docket_stats::s3::S3ListingSource;
//!
//! let config = Config::from_env()?;
//! let api = RegulationsClient::from_config(&config)?;
//! let store = S3ListingSource::from_config(&config).await?;
//!
//! let mut progress = TerminalProgress::new("Comments");
//! let report = Reconciler::new(&api, &store)
//!     .run("EPA-HQ-OAR-2021-0317", &mut progress)
//!     .await?;
//! print!("{report}");
//! # Ok(())
//! # }
//! ```

pub mod api;
pub mod canonical;
pub mod config;
pub mod counter;
pub mod error;
pub mod listing;
pub mod progress;
pub mod report;

#[cfg(feature = "cloud-s3")]
pub mod s3;

pub use api::{DocketInfo, RecordCounts, RegulationsClient};
pub use canonical::canonical_filename;
pub use config::{Config, ConfigBuilder};
pub use counter::{count_unique_json, CountOptions};
pub use error::{DocketStatsError, Result};
pub use listing::{ListingPage, ListingSource, MemoryListing, ObjectListing};
pub use progress::{NoProgress, Progress, TerminalProgress};
pub use report::{Comparison, Reconciler, Report, SubResource};

#[cfg(feature = "cloud-s3")]
pub use s3::{S3Listing, S3ListingSource};
