//! Store-versus-API comparison for one docket.

use crate::api::RecordCounts;
use crate::counter::{count_unique_json, CountOptions};
use crate::error::Result;
use crate::listing::ListingSource;
use crate::progress::{NoProgress, Progress};
use std::fmt;
use tracing::{debug, info};

/// Line printed before any work starts.
pub const GATHERING_MESSAGE: &str =
    "Gathering information (this may take a while for large dockets)...";

/// Archived sub-resources of a docket, in report order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SubResource {
    Docket,
    Documents,
    Comments,
}

impl SubResource {
    /// All sub-resources in the fixed processing and report order.
    pub const ALL: [SubResource; 3] = [
        SubResource::Docket,
        SubResource::Documents,
        SubResource::Comments,
    ];

    /// Directory name in the archive.
    pub fn as_str(self) -> &'static str {
        match self {
            SubResource::Docket => "docket",
            SubResource::Documents => "documents",
            SubResource::Comments => "comments",
        }
    }

    /// Capitalized name used in the report.
    pub fn label(self) -> &'static str {
        match self {
            SubResource::Docket => "Docket",
            SubResource::Documents => "Documents",
            SubResource::Comments => "Comments",
        }
    }
}

/// Agency part of a docket identifier (text before the first `-`).
pub fn org_from_docket_id(docket_id: &str) -> &str {
    docket_id.split('-').next().unwrap_or(docket_id)
}

/// Archive prefix holding one sub-resource of a docket.
pub fn store_prefix(docket_id: &str, sub: SubResource) -> String {
    format!(
        "raw-data/{}/{}/text-{}/{}/",
        org_from_docket_id(docket_id),
        docket_id,
        docket_id,
        sub.as_str()
    )
}

/// Store and API counts for one sub-resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Comparison {
    pub sub: SubResource,
    pub store_count: u64,
    pub api_count: u64,
}

impl Comparison {
    /// Records the API knows about that the archive lacks.
    pub fn missing(&self) -> u64 {
        self.api_count.saturating_sub(self.store_count)
    }
}

impl fmt::Display for Comparison {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} JSON files (S3/API): {}/{}",
            self.sub.label(),
            self.store_count,
            self.api_count
        )
    }
}

/// Full comparison for one docket.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Report {
    pub docket_id: String,
    pub title: Option<String>,
    /// One entry per sub-resource, in [`SubResource::ALL`] order
    pub comparisons: Vec<Comparison>,
}

impl Report {
    /// Comparison for one sub-resource.
    pub fn get(&self, sub: SubResource) -> Option<&Comparison> {
        self.comparisons.iter().find(|c| c.sub == sub)
    }

    /// Whether the archive holds at least as many records as the API reports
    /// for every sub-resource.
    pub fn is_complete(&self) -> bool {
        self.comparisons.iter().all(|c| c.missing() == 0)
    }
}

impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Docket ID: {}", self.docket_id)?;
        writeln!(f, "Docket Title: {}", self.title.as_deref().unwrap_or("N/A"))?;
        for comparison in &self.comparisons {
            writeln!(f, "{comparison}")?;
        }
        Ok(())
    }
}

/// Pairs archive counts with record API counts.
pub struct Reconciler<'a, A, S> {
    api: &'a A,
    store: &'a S,
}

impl<'a, A, S> Reconciler<'a, A, S>
where
    A: RecordCounts,
    S: ListingSource,
{
    pub fn new(api: &'a A, store: &'a S) -> Self {
        Self { api, store }
    }

    /// Build the report for `docket_id`.
    ///
    /// API counts are fetched first, then each sub-resource prefix is listed
    /// in order. `comments_progress` is driven only while listing comments.
    /// Any failure aborts the whole run.
    pub async fn run(
        &self,
        docket_id: &str,
        comments_progress: &mut dyn Progress,
    ) -> Result<Report> {
        let docket = self.api.docket(docket_id).await?;
        let documents_total = self.api.documents_total(docket_id).await?;
        let comments_total = self.api.comments_total(docket_id).await?;
        info!(docket_id, documents_total, comments_total, "fetched API counts");

        let mut comparisons = Vec::with_capacity(SubResource::ALL.len());
        for sub in SubResource::ALL {
            let prefix = store_prefix(docket_id, sub);
            let mut listing = self.store.list(&prefix);

            let store_count = match sub {
                SubResource::Comments => {
                    count_unique_json(
                        &mut listing,
                        CountOptions::with_progress(comments_total),
                        comments_progress,
                    )
                    .await?
                }
                _ => count_unique_json(&mut listing, CountOptions::default(), &mut NoProgress)
                    .await?,
            };
            debug!(%prefix, store_count, "counted unique JSON files");

            let api_count = match sub {
                SubResource::Docket => 1,
                SubResource::Documents => documents_total,
                SubResource::Comments => comments_total,
            };

            comparisons.push(Comparison {
                sub,
                store_count: store_count as u64,
                api_count,
            });
        }

        Ok(Report {
            docket_id: docket_id.to_string(),
            title: docket.title,
            comparisons,
        })
    }
}
