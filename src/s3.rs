//! Anonymous S3 listings of the mirrulations archive.
//!
//! The archive bucket is public, so requests are sent unsigned. Each listing
//! walks ListObjectsV2 with continuation tokens, one request per page, and is
//! discarded once the last page has been read.
//!
//! ## Example
//!
//! ```no_run
//! use docket_stats::{count_unique_json, CountOptions, ListingSource, NoProgress};
//! use docket_stats::s3::S3ListingSource;
//!
//! # async fn example() -> docket_stats::Result<()> {
//! let source = S3ListingSource::builder()
//!     .bucket("mirrulations")
//!     .region("us-east-1")
//!     .build()
//!     .await?;
//!
//! let mut listing = source.list("raw-data/EPA/EPA-2020-0001/text-EPA-2020-0001/comments/");
//! let unique = count_unique_json(&mut listing, CountOptions::default(), &mut NoProgress).await?;
//! println!("{unique} unique comments archived");
//! # Ok(())
//! # }
//! ```

use crate::config::{Config, DEFAULT_BUCKET, DEFAULT_REGION};
use crate::error::{DocketStatsError, Result};
use crate::listing::{ListingPage, ListingSource, ObjectListing};
use async_trait::async_trait;
use aws_config::{BehaviorVersion, Region};
use aws_sdk_s3::error::DisplayErrorContext;
use aws_sdk_s3::Client;
use tracing::debug;

/// Opens unsigned listings against one bucket.
#[derive(Debug, Clone)]
pub struct S3ListingSource {
    client: Client,
    bucket: String,
}

/// Builder for [`S3ListingSource`].
#[derive(Debug)]
pub struct S3ListingSourceBuilder {
    bucket: String,
    region: String,
    endpoint_url: Option<String>,
}

impl S3ListingSource {
    /// Create a builder with the public archive defaults.
    pub fn builder() -> S3ListingSourceBuilder {
        S3ListingSourceBuilder {
            bucket: DEFAULT_BUCKET.to_string(),
            region: DEFAULT_REGION.to_string(),
            endpoint_url: None,
        }
    }

    /// Build an anonymous source from resolved configuration.
    pub async fn from_config(config: &Config) -> Result<Self> {
        let mut builder = Self::builder()
            .bucket(config.bucket.clone())
            .region(config.region.clone());
        if let Some(endpoint) = &config.s3_endpoint {
            builder = builder.endpoint_url(endpoint.clone());
        }
        builder.build().await
    }

    /// Bucket this source lists.
    pub fn bucket(&self) -> &str {
        &self.bucket
    }
}

impl S3ListingSourceBuilder {
    /// Set the bucket name.
    pub fn bucket(mut self, bucket: impl Into<String>) -> Self {
        self.bucket = bucket.into();
        self
    }

    /// Set the bucket region.
    pub fn region(mut self, region: impl Into<String>) -> Self {
        self.region = region.into();
        self
    }

    /// Use an S3-compatible endpoint (LocalStack, MinIO, ...).
    ///
    /// Path-style addressing is enabled for custom endpoints.
    pub fn endpoint_url(mut self, url: impl Into<String>) -> Self {
        self.endpoint_url = Some(url.into());
        self
    }

    /// Build the source with an unsigned client.
    pub async fn build(self) -> Result<S3ListingSource> {
        if self.bucket.is_empty() {
            return Err(DocketStatsError::Config(
                "S3 bucket name must not be empty".to_string(),
            ));
        }

        let mut loader = aws_config::defaults(BehaviorVersion::latest())
            .no_credentials()
            .region(Region::new(self.region));
        if let Some(endpoint) = &self.endpoint_url {
            loader = loader.endpoint_url(endpoint);
        }
        let sdk_config = loader.load().await;

        let s3_config = aws_sdk_s3::config::Builder::from(&sdk_config)
            .force_path_style(self.endpoint_url.is_some())
            .build();
        let client = Client::from_conf(s3_config);

        Ok(S3ListingSource {
            client,
            bucket: self.bucket,
        })
    }
}

impl ListingSource for S3ListingSource {
    type Listing = S3Listing;

    fn list(&self, prefix: &str) -> S3Listing {
        S3Listing {
            client: self.client.clone(),
            bucket: self.bucket.clone(),
            prefix: prefix.to_string(),
            continuation_token: None,
        }
    }
}

/// One pass over the objects under a prefix.
#[derive(Debug)]
pub struct S3Listing {
    client: Client,
    bucket: String,
    prefix: String,
    continuation_token: Option<String>,
}

#[async_trait]
impl ObjectListing for S3Listing {
    async fn next_page(&mut self) -> Result<ListingPage> {
        let mut req = self
            .client
            .list_objects_v2()
            .bucket(&self.bucket)
            .prefix(&self.prefix);

        if let Some(token) = self.continuation_token.take() {
            req = req.continuation_token(token);
        }

        let resp = req.send().await.map_err(|e| {
            DocketStatsError::Listing(format!(
                "s3://{}/{}: {}",
                self.bucket,
                self.prefix,
                DisplayErrorContext(&e)
            ))
        })?;

        let keys: Vec<String> = resp
            .contents
            .unwrap_or_default()
            .into_iter()
            .filter_map(|obj| obj.key)
            .filter(|key| !key.is_empty())
            .collect();

        let has_more = resp.is_truncated == Some(true) && resp.next_continuation_token.is_some();
        self.continuation_token = if has_more {
            resp.next_continuation_token
        } else {
            None
        };

        debug!(
            bucket = %self.bucket,
            prefix = %self.prefix,
            keys = keys.len(),
            has_more,
            "listed S3 page"
        );

        Ok(ListingPage { keys, has_more })
    }
}
