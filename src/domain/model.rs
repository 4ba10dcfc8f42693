use crate::utils::error::{Result, ReviewError};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

/// A hotel name that is guaranteed non-empty after trimming.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlaceQuery(String);

impl PlaceQuery {
    pub fn parse(raw: &str) -> Result<Self> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(ReviewError::InvalidInput(
                "Nome do hotel não pode estar vazio".to_string(),
            ));
        }
        Ok(Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PlaceQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PlaceCandidate {
    pub place_id: String,
    pub name: String,
    pub address: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ReviewSource {
    GooglePlaces,
    Outscraper,
}

impl ReviewSource {
    pub fn tag(&self) -> &'static str {
        match self {
            ReviewSource::GooglePlaces => "Google",
            ReviewSource::Outscraper => "Outscraper",
        }
    }
}

impl fmt::Display for ReviewSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReviewExcerpt {
    pub author: String,
    /// 0..=5
    pub rating: u8,
    pub text: String,
    pub source: ReviewSource,
    pub timestamp: Option<chrono::DateTime<chrono::Utc>>,
}

impl ReviewExcerpt {
    pub fn has_text(&self) -> bool {
        !self.text.trim().is_empty()
    }

    pub fn text_len(&self) -> usize {
        self.text.chars().count()
    }
}

/// Everything the primary provider returns about one place.
#[derive(Debug, Clone, Default)]
pub struct PlaceDetails {
    pub name: Option<String>,
    pub address: Option<String>,
    pub rating: Option<f64>,
    pub total_ratings: Option<u64>,
    pub reviews: Vec<ReviewExcerpt>,
    pub photo_reference: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct AggregatedReviewSet {
    reviews: Vec<ReviewExcerpt>,
    pub overall_rating: Option<f64>,
    pub total_ratings: Option<u64>,
}

impl AggregatedReviewSet {
    pub fn new(overall_rating: Option<f64>, total_ratings: Option<u64>) -> Self {
        Self {
            reviews: Vec::new(),
            overall_rating,
            total_ratings,
        }
    }

    /// Appends excerpts after the ones already present, keeping order.
    pub fn extend(&mut self, excerpts: impl IntoIterator<Item = ReviewExcerpt>) {
        self.reviews.extend(excerpts);
    }

    pub fn reviews(&self) -> &[ReviewExcerpt] {
        &self.reviews
    }

    pub fn len(&self) -> usize {
        self.reviews.len()
    }

    pub fn is_empty(&self) -> bool {
        self.reviews.is_empty()
    }

    pub fn with_text_count(&self) -> usize {
        self.reviews.iter().filter(|r| r.has_text()).count()
    }

    pub fn count_from(&self, source: ReviewSource) -> usize {
        self.reviews.iter().filter(|r| r.source == source).count()
    }
}

/// Process-wide instruction text, loaded once and shared read-only.
#[derive(Debug, Clone, PartialEq)]
pub struct InstructionTemplate(Arc<str>);

impl InstructionTemplate {
    pub fn new(text: impl Into<Arc<str>>) -> Self {
        Self(text.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PromptPayload(String);

impl PromptPayload {
    pub(crate) fn new(text: String) -> Self {
        Self(text)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct CompletionResult {
    pub text: String,
    pub input_tokens: u32,
    pub output_tokens: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnalysisMeta {
    pub requested_reviews: usize,
    pub received_reviews: usize,
    pub reviews_with_text: usize,
    pub estimated_reviews: usize,
    pub data_source: String,
    pub google_rating: Option<f64>,
    pub total_ratings: Option<u64>,
    pub google_reviews: usize,
    pub outscraper_reviews: usize,
    pub hotel_name: String,
    pub hotel_address: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub photo_data_uri: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnalysisReport {
    pub result_markdown: String,
    pub meta: AnalysisMeta,
}
