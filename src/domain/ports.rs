use crate::domain::model::{
    CompletionResult, PlaceCandidate, PlaceDetails, PlaceQuery, PromptPayload, ReviewExcerpt,
};
use crate::utils::error::Result;
use async_trait::async_trait;
use std::time::Duration;

/// Primary place provider: text search, detail lookup and photo download.
#[async_trait]
pub trait PlaceDirectory: Send + Sync {
    async fn resolve(&self, query: &PlaceQuery) -> Result<PlaceCandidate>;
    async fn details(&self, place: &PlaceCandidate) -> Result<PlaceDetails>;
    async fn photo_data_uri(&self, photo_reference: &str) -> Result<String>;

    /// Maximum number of reviews `details` hands back.
    fn review_cap(&self) -> usize;
}

/// Answer to the initial request against an asynchronous review provider.
#[derive(Debug, Clone, PartialEq)]
pub enum JobSubmission {
    Immediate(Vec<ReviewExcerpt>),
    Pending { results_location: String },
    Failed { reason: String },
}

/// One look at a results location.
#[derive(Debug, Clone, PartialEq)]
pub enum JobPoll {
    Ready(Vec<ReviewExcerpt>),
    NotReady,
}

/// Raw transport for the secondary provider. Errors are allowed here; the
/// fetcher built on top of it absorbs them.
#[async_trait]
pub trait ReviewJobApi: Send + Sync {
    async fn submit(&self, query: &PlaceQuery, request_cap: usize) -> Result<JobSubmission>;
    async fn poll(&self, results_location: &str) -> Result<JobPoll>;
}

/// Enrichment source that never fails: every problem yields an empty list.
#[async_trait]
pub trait SecondaryReviews: Send + Sync {
    async fn fetch(&self, query: &PlaceQuery) -> Vec<ReviewExcerpt>;

    /// Upper bound on how many excerpts `fetch` can contribute.
    fn limit(&self) -> usize;
}

#[async_trait]
pub trait CompletionModel: Send + Sync {
    async fn complete(&self, prompt: &PromptPayload) -> Result<CompletionResult>;
}

/// Clock used between poll attempts, swapped for a recording fake in tests.
#[async_trait]
pub trait Sleeper: Send + Sync {
    async fn sleep(&self, duration: Duration);
}
