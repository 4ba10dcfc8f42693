use crate::adapters::google_places::clamp_rating;
use crate::config::toml_config::SecondarySettings;
use crate::domain::model::{PlaceQuery, ReviewExcerpt, ReviewSource};
use crate::domain::ports::{JobPoll, JobSubmission, ReviewJobApi};
use crate::utils::error::{Result, ReviewError};
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::Deserialize;

const SERVICE: &str = "Outscraper";

#[derive(Debug, Default, Deserialize)]
struct Envelope {
    #[serde(default)]
    status: String,
    results_location: Option<String>,
    #[serde(default)]
    data: Vec<PlaceReviews>,
}

#[derive(Debug, Default, Deserialize)]
struct PlaceReviews {
    #[serde(default)]
    reviews_data: Vec<RawReview>,
}

#[derive(Debug, Deserialize)]
struct RawReview {
    author_title: Option<String>,
    review_rating: Option<f64>,
    review_text: Option<String>,
    review_timestamp: Option<i64>,
    review_datetime_utc: Option<String>,
}

impl RawReview {
    fn into_excerpt(self) -> ReviewExcerpt {
        let timestamp = self
            .review_timestamp
            .and_then(|t| chrono::DateTime::from_timestamp(t, 0))
            .or_else(|| {
                self.review_datetime_utc.as_deref().and_then(|s| {
                    chrono::NaiveDateTime::parse_from_str(s, "%m/%d/%Y %H:%M:%S")
                        .ok()
                        .map(|dt| dt.and_utc())
                })
            });

        ReviewExcerpt {
            author: self
                .author_title
                .filter(|a| !a.trim().is_empty())
                .unwrap_or_else(|| "Anónimo".to_string()),
            rating: clamp_rating(self.review_rating),
            text: self.review_text.unwrap_or_default(),
            source: ReviewSource::Outscraper,
            timestamp,
        }
    }
}

impl Envelope {
    fn is_success(&self) -> bool {
        self.status.eq_ignore_ascii_case("success")
    }

    fn into_excerpts(self) -> Vec<ReviewExcerpt> {
        self.data
            .into_iter()
            .flat_map(|place| place.reviews_data)
            .map(RawReview::into_excerpt)
            .collect()
    }
}

/// Reviews job API: newest-first, empty reviews filtered server side.
#[derive(Debug, Clone)]
pub struct OutscraperClient {
    client: Client,
    api_key: String,
    base_url: String,
}

impl OutscraperClient {
    pub fn new(api_key: &str, settings: &SecondarySettings) -> Result<Self> {
        let client = Client::builder().timeout(settings.timeout()).build()?;
        Ok(Self {
            client,
            api_key: api_key.to_string(),
            base_url: settings.base_url.trim_end_matches('/').to_string(),
        })
    }
}

#[async_trait]
impl ReviewJobApi for OutscraperClient {
    async fn submit(&self, query: &PlaceQuery, request_cap: usize) -> Result<JobSubmission> {
        let url = format!("{}/maps/reviews-v3", self.base_url);
        let cap = request_cap.to_string();
        tracing::debug!("Making {} request to: {}", SERVICE, url);

        let response = self
            .client
            .get(&url)
            .header("X-API-KEY", &self.api_key)
            .query(&[
                ("query", query.as_str()),
                ("reviewsLimit", cap.as_str()),
                ("sort", "newest"),
                ("ignoreEmpty", "true"),
                ("async", "true"),
            ])
            .send()
            .await?;

        let status = response.status();
        match status {
            StatusCode::ACCEPTED => {
                let envelope: Envelope = response.json().await?;
                Ok(match envelope.results_location {
                    Some(location) if !location.is_empty() => JobSubmission::Pending {
                        results_location: location,
                    },
                    _ => JobSubmission::Failed {
                        reason: "accepted without results_location".to_string(),
                    },
                })
            }
            s if s.is_success() => {
                let envelope: Envelope = response.json().await?;
                Ok(JobSubmission::Immediate(envelope.into_excerpts()))
            }
            _ => {
                let body = response.text().await.unwrap_or_default();
                Ok(JobSubmission::Failed {
                    reason: format!("HTTP {}: {}", status, body),
                })
            }
        }
    }

    async fn poll(&self, results_location: &str) -> Result<JobPoll> {
        let response = self
            .client
            .get(results_location)
            .header("X-API-KEY", &self.api_key)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(ReviewError::upstream(
                SERVICE,
                format!("results location answered HTTP {}", status),
            ));
        }

        let envelope: Envelope = response.json().await?;
        if envelope.is_success() && !envelope.data.is_empty() {
            Ok(JobPoll::Ready(envelope.into_excerpts()))
        } else {
            tracing::debug!("Results status: {}", envelope.status);
            Ok(JobPoll::NotReady)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_envelope_flattens_places() {
        let envelope: Envelope = serde_json::from_value(serde_json::json!({
            "status": "Success",
            "data": [
                {"reviews_data": [
                    {"author_title": "Rita", "review_rating": 5, "review_text": "Excelente"},
                    {"author_title": "", "review_rating": 2, "review_text": null}
                ]},
                {"reviews_data": [
                    {"author_title": "Luís", "review_rating": 4, "review_text": "Bom",
                     "review_datetime_utc": "03/14/2024 09:30:00"}
                ]}
            ]
        }))
        .unwrap();

        assert!(envelope.is_success());
        let excerpts = envelope.into_excerpts();

        assert_eq!(excerpts.len(), 3);
        assert_eq!(excerpts[0].author, "Rita");
        assert_eq!(excerpts[1].author, "Anónimo");
        assert_eq!(excerpts[1].text, "");
        assert!(excerpts.iter().all(|r| r.source == ReviewSource::Outscraper));
        assert_eq!(
            excerpts[2].timestamp.unwrap().to_rfc3339(),
            "2024-03-14T09:30:00+00:00"
        );
    }

    #[test]
    fn test_pending_envelope_is_not_success() {
        let envelope: Envelope = serde_json::from_value(serde_json::json!({
            "id": "a-b-c",
            "status": "Pending",
            "results_location": "https://api.app.outscraper.com/requests/a-b-c"
        }))
        .unwrap();

        assert!(!envelope.is_success());
        assert!(envelope.data.is_empty());
    }
}
