use crate::core::prompt;
use crate::domain::model::{
    AggregatedReviewSet, AnalysisMeta, AnalysisReport, InstructionTemplate, PlaceCandidate,
    PlaceDetails, PlaceQuery, ReviewSource,
};
use crate::domain::ports::{CompletionModel, PlaceDirectory, SecondaryReviews};
use crate::utils::error::{Result, ReviewError};
use std::sync::Arc;
use std::time::Instant;

pub const PRIMARY_SOURCE_LABEL: &str = "Google Places (Maps)";
pub const COMBINED_SOURCE_LABEL: &str = "Google Places (Maps) + Outscraper";

struct PrimaryData {
    place: PlaceCandidate,
    details: PlaceDetails,
    photo_data_uri: Option<String>,
}

/// Runs one analysis: place lookup, review aggregation, prompt, completion.
pub struct ReviewAnalyzer {
    places: Arc<dyn PlaceDirectory>,
    secondary: Option<Arc<dyn SecondaryReviews>>,
    completion: Arc<dyn CompletionModel>,
    template: InstructionTemplate,
}

impl ReviewAnalyzer {
    pub fn new(
        places: Arc<dyn PlaceDirectory>,
        secondary: Option<Arc<dyn SecondaryReviews>>,
        completion: Arc<dyn CompletionModel>,
        template: InstructionTemplate,
    ) -> Self {
        Self {
            places,
            secondary,
            completion,
            template,
        }
    }

    pub fn has_secondary_source(&self) -> bool {
        self.secondary.is_some()
    }

    pub async fn analyze(&self, hotel_name: &str) -> Result<AnalysisReport> {
        let started = Instant::now();
        let query = PlaceQuery::parse(hotel_name)?;
        tracing::info!("🔍 Analyzing reviews for \"{}\"", query);

        // The secondary source is independent of the primary chain; a primary
        // failure drops it mid-poll.
        let (primary, secondary_reviews) = tokio::try_join!(self.fetch_primary(&query), async {
            Ok::<_, ReviewError>(match &self.secondary {
                Some(source) => source.fetch(&query).await,
                None => Vec::new(),
            })
        })?;

        let PrimaryData {
            place,
            details,
            photo_data_uri,
        } = primary;

        let mut reviews = AggregatedReviewSet::new(details.rating, details.total_ratings);
        reviews.extend(details.reviews);
        reviews.extend(secondary_reviews);

        let google_reviews = reviews.count_from(ReviewSource::GooglePlaces);
        let outscraper_reviews = reviews.count_from(ReviewSource::Outscraper);
        tracing::info!(
            google_reviews,
            outscraper_reviews,
            "📦 Aggregated {} reviews ({} with text)",
            reviews.len(),
            reviews.with_text_count()
        );

        let payload = prompt::assemble(&self.template, &reviews);
        let llm_started = Instant::now();
        let completion = self.completion.complete(&payload).await?;
        tracing::info!(
            input_tokens = completion.input_tokens,
            output_tokens = completion.output_tokens,
            "🤖 Completion received in {}ms",
            llm_started.elapsed().as_millis()
        );

        let secondary_limit = self.secondary.as_ref().map(|s| s.limit()).unwrap_or(0);
        let with_text = reviews.with_text_count();
        let meta = AnalysisMeta {
            requested_reviews: self.places.review_cap() + secondary_limit,
            received_reviews: reviews.len(),
            reviews_with_text: with_text,
            estimated_reviews: with_text,
            data_source: if self.has_secondary_source() {
                COMBINED_SOURCE_LABEL.to_string()
            } else {
                PRIMARY_SOURCE_LABEL.to_string()
            },
            google_rating: reviews.overall_rating,
            total_ratings: reviews.total_ratings,
            google_reviews,
            outscraper_reviews,
            hotel_name: details.name.unwrap_or(place.name),
            hotel_address: details.address.unwrap_or(place.address),
            photo_data_uri,
        };

        tracing::info!(
            "✅ Analysis for \"{}\" finished in {}ms",
            query,
            started.elapsed().as_millis()
        );

        Ok(AnalysisReport {
            result_markdown: completion.text,
            meta,
        })
    }

    async fn fetch_primary(&self, query: &PlaceQuery) -> Result<PrimaryData> {
        let place = self.places.resolve(query).await?;
        tracing::debug!(place_id = %place.place_id, "Resolved place \"{}\"", place.name);

        let details = self.places.details(&place).await?;

        // Photo is best effort: a failure only leaves the field out.
        let photo_data_uri = match details.photo_reference.as_deref() {
            Some(reference) => match self.places.photo_data_uri(reference).await {
                Ok(uri) => Some(uri),
                Err(e) => {
                    tracing::warn!("⚠️ Photo download failed, omitting it: {}", e);
                    None
                }
            },
            None => None,
        };

        Ok(PrimaryData {
            place,
            details,
            photo_data_uri,
        })
    }
}
