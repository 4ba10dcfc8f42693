use crate::core::poll::{PollOutcome, PollPolicy};
use crate::domain::model::{PlaceQuery, ReviewExcerpt};
use crate::domain::ports::{JobPoll, JobSubmission, ReviewJobApi, SecondaryReviews, Sleeper};
use async_trait::async_trait;
use std::sync::Arc;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SecondaryLimits {
    /// Cap sent to the provider with the initial request.
    pub request_cap: usize,
    /// Cap on what survives filtering.
    pub limit: usize,
    pub min_text_chars: usize,
}

/// Drops thin reviews, puts the most detailed first and truncates.
pub fn select_substantive(
    reviews: Vec<ReviewExcerpt>,
    min_text_chars: usize,
    limit: usize,
) -> Vec<ReviewExcerpt> {
    let mut kept: Vec<ReviewExcerpt> = reviews
        .into_iter()
        .filter(|r| r.text_len() >= min_text_chars)
        .collect();

    // stable: equal lengths keep provider order (newest first)
    kept.sort_by(|a, b| b.text_len().cmp(&a.text_len()));
    kept.truncate(limit);
    kept
}

/// Secondary review source driven by an asynchronous job API.
///
/// The provider either answers right away, or accepts the job and hands back a
/// results location that is polled under `policy`. A failed poll only costs
/// that attempt. A rejected request or an exhausted budget contributes zero
/// reviews.
pub struct SecondaryReviewFetcher<A: ReviewJobApi> {
    api: A,
    policy: PollPolicy,
    sleeper: Arc<dyn Sleeper>,
    limits: SecondaryLimits,
}

impl<A: ReviewJobApi> SecondaryReviewFetcher<A> {
    pub fn new(
        api: A,
        policy: PollPolicy,
        sleeper: Arc<dyn Sleeper>,
        limits: SecondaryLimits,
    ) -> Self {
        Self {
            api,
            policy,
            sleeper,
            limits,
        }
    }

    async fn collect_raw(&self, query: &PlaceQuery) -> Vec<ReviewExcerpt> {
        let submission = match self.api.submit(query, self.limits.request_cap).await {
            Ok(submission) => submission,
            Err(e) => {
                tracing::warn!("⚠️ Secondary review request failed: {}", e);
                return Vec::new();
            }
        };

        match submission {
            JobSubmission::Immediate(reviews) => {
                tracing::debug!("Secondary reviews returned synchronously: {}", reviews.len());
                reviews
            }
            JobSubmission::Pending { results_location } => {
                tracing::info!("⏳ Secondary reviews pending, polling {}", results_location);
                self.wait_for_results(&results_location).await
            }
            JobSubmission::Failed { reason } => {
                tracing::warn!("⚠️ Secondary review request rejected: {}", reason);
                Vec::new()
            }
        }
    }

    async fn wait_for_results(&self, results_location: &str) -> Vec<ReviewExcerpt> {
        let api = &self.api;
        let outcome = self
            .policy
            .run(self.sleeper.as_ref(), move |_attempt| async move {
                match api.poll(results_location).await? {
                    JobPoll::Ready(reviews) => Ok(Some(reviews)),
                    JobPoll::NotReady => Ok(None),
                }
            })
            .await;

        match outcome {
            PollOutcome::Ready { value, attempts } => {
                tracing::info!(
                    attempts,
                    "✅ Secondary reviews ready ({} raw entries)",
                    value.len()
                );
                value
            }
            PollOutcome::Exhausted { attempts, failures } => {
                tracing::warn!(
                    attempts,
                    failures,
                    "⚠️ Secondary reviews not ready within {:?}, continuing without them",
                    self.policy.budget()
                );
                Vec::new()
            }
        }
    }
}

#[async_trait]
impl<A: ReviewJobApi> SecondaryReviews for SecondaryReviewFetcher<A> {
    async fn fetch(&self, query: &PlaceQuery) -> Vec<ReviewExcerpt> {
        let raw = self.collect_raw(query).await;
        let raw_count = raw.len();
        let selected = select_substantive(raw, self.limits.min_text_chars, self.limits.limit);
        tracing::debug!(
            "Secondary reviews kept {}/{} (min {} chars)",
            selected.len(),
            raw_count,
            self.limits.min_text_chars
        );
        selected
    }

    fn limit(&self) -> usize {
        self.limits.limit
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::ReviewSource;

    fn review(len: usize, author: &str) -> ReviewExcerpt {
        ReviewExcerpt {
            author: author.to_string(),
            rating: 5,
            text: "x".repeat(len),
            source: ReviewSource::Outscraper,
            timestamp: None,
        }
    }

    #[test]
    fn test_select_filters_sorts_and_truncates() {
        let input = vec![
            review(149, "short"),
            review(200, "mid"),
            review(150, "edge"),
            review(600, "long"),
            review(10, "tiny"),
        ];

        let out = select_substantive(input, 150, 2);

        let authors: Vec<&str> = out.iter().map(|r| r.author.as_str()).collect();
        assert_eq!(authors, vec!["long", "mid"]);
    }

    #[test]
    fn test_select_keeps_boundary_and_order_for_ties() {
        let input = vec![review(150, "first"), review(150, "second"), review(151, "top")];

        let out = select_substantive(input, 150, 10);

        let authors: Vec<&str> = out.iter().map(|r| r.author.as_str()).collect();
        assert_eq!(authors, vec!["top", "first", "second"]);
        assert!(out.iter().all(|r| r.text_len() >= 150));
        assert!(out.windows(2).all(|w| w[0].text_len() >= w[1].text_len()));
    }

    #[test]
    fn test_select_on_empty_input() {
        assert!(select_substantive(Vec::new(), 150, 5).is_empty());
        assert!(select_substantive(vec![review(400, "a")], 150, 0).is_empty());
    }
}
