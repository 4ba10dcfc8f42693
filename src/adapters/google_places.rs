use crate::config::toml_config::GoogleSettings;
use crate::domain::model::{PlaceCandidate, PlaceDetails, PlaceQuery, ReviewExcerpt, ReviewSource};
use crate::domain::ports::PlaceDirectory;
use crate::utils::error::{Result, ReviewError};
use async_trait::async_trait;
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use reqwest::Client;
use serde::Deserialize;

const SERVICE: &str = "Google Places";
const ANONYMOUS_AUTHOR: &str = "Anónimo";

#[derive(Debug, Deserialize)]
struct TextSearchResponse {
    #[serde(default)]
    status: String,
    #[serde(default)]
    results: Vec<TextSearchResult>,
    error_message: Option<String>,
}

#[derive(Debug, Deserialize)]
struct TextSearchResult {
    place_id: String,
    #[serde(default)]
    name: String,
    #[serde(default)]
    formatted_address: String,
}

#[derive(Debug, Deserialize)]
struct DetailsResponse {
    #[serde(default)]
    status: String,
    result: Option<DetailsResult>,
    error_message: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct DetailsResult {
    name: Option<String>,
    formatted_address: Option<String>,
    rating: Option<f64>,
    user_ratings_total: Option<u64>,
    #[serde(default)]
    reviews: Vec<RawReview>,
    #[serde(default)]
    photos: Vec<RawPhoto>,
}

#[derive(Debug, Deserialize)]
struct RawReview {
    author_name: Option<String>,
    rating: Option<f64>,
    text: Option<String>,
    time: Option<i64>,
}

#[derive(Debug, Deserialize)]
struct RawPhoto {
    photo_reference: String,
}

impl RawReview {
    fn into_excerpt(self) -> ReviewExcerpt {
        ReviewExcerpt {
            author: self
                .author_name
                .filter(|a| !a.trim().is_empty())
                .unwrap_or_else(|| ANONYMOUS_AUTHOR.to_string()),
            rating: clamp_rating(self.rating),
            text: self.text.unwrap_or_default(),
            source: ReviewSource::GooglePlaces,
            timestamp: self
                .time
                .and_then(|t| chrono::DateTime::from_timestamp(t, 0)),
        }
    }
}

pub(crate) fn clamp_rating(rating: Option<f64>) -> u8 {
    rating.unwrap_or(0.0).round().clamp(0.0, 5.0) as u8
}

/// Place Resolver and Detail Fetcher backed by the Places web service.
#[derive(Debug, Clone)]
pub struct GooglePlacesClient {
    client: Client,
    api_key: String,
    settings: GoogleSettings,
}

impl GooglePlacesClient {
    pub fn new(api_key: &str, settings: GoogleSettings) -> Result<Self> {
        let client = Client::builder().timeout(settings.timeout()).build()?;
        Ok(Self {
            client,
            api_key: api_key.to_string(),
            settings,
        })
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.settings.base_url.trim_end_matches('/'), path)
    }

    fn detail_fields(&self) -> &'static str {
        if self.settings.include_photo {
            "name,formatted_address,reviews,rating,user_ratings_total,photos"
        } else {
            "name,formatted_address,reviews,rating,user_ratings_total"
        }
    }

    async fn get_json<T: serde::de::DeserializeOwned>(
        &self,
        path: &str,
        params: &[(&str, &str)],
        context: &str,
    ) -> Result<T> {
        let url = self.endpoint(path);
        tracing::debug!("Making {} request to: {}", SERVICE, url);

        let response = self
            .client
            .get(&url)
            .query(params)
            .query(&[("key", self.api_key.as_str())])
            .send()
            .await
            .and_then(|r| r.error_for_status())
            .map_err(|e| ReviewError::upstream(SERVICE, format!("{}: {}", context, e.without_url())))?;

        response
            .json::<T>()
            .await
            .map_err(|e| ReviewError::upstream(SERVICE, format!("{}: {}", context, e.without_url())))
    }
}

#[async_trait]
impl PlaceDirectory for GooglePlacesClient {
    async fn resolve(&self, query: &PlaceQuery) -> Result<PlaceCandidate> {
        let search: TextSearchResponse = self
            .get_json(
                "/maps/api/place/textsearch/json",
                &[
                    ("query", query.as_str()),
                    ("type", self.settings.search_type.as_str()),
                ],
                "Erro ao pesquisar hotel",
            )
            .await?;

        match search.status.as_str() {
            "OK" | "ZERO_RESULTS" | "" => {}
            other => {
                return Err(ReviewError::upstream(
                    SERVICE,
                    format!(
                        "Erro ao pesquisar hotel: {}{}",
                        other,
                        search
                            .error_message
                            .map(|m| format!(" ({})", m))
                            .unwrap_or_default()
                    ),
                ))
            }
        }

        let first = search
            .results
            .into_iter()
            .next()
            .ok_or_else(|| ReviewError::NotFound("Hotel não encontrado".to_string()))?;

        tracing::info!("🏨 Found place {} ({})", first.name, first.place_id);

        Ok(PlaceCandidate {
            place_id: first.place_id,
            name: first.name,
            address: first.formatted_address,
        })
    }

    async fn details(&self, place: &PlaceCandidate) -> Result<PlaceDetails> {
        let response: DetailsResponse = self
            .get_json(
                "/maps/api/place/details/json",
                &[
                    ("place_id", place.place_id.as_str()),
                    ("fields", self.detail_fields()),
                ],
                "Erro ao obter detalhes",
            )
            .await?;

        if response.status != "OK" {
            return Err(ReviewError::upstream(
                SERVICE,
                format!(
                    "Erro da API: {}{}",
                    response.status,
                    response
                        .error_message
                        .map(|m| format!(" ({})", m))
                        .unwrap_or_default()
                ),
            ));
        }

        let result = response.result.unwrap_or_default();
        if result.reviews.is_empty() {
            return Err(ReviewError::NotFound(
                "Nenhuma review encontrada para este hotel".to_string(),
            ));
        }

        let reviews: Vec<ReviewExcerpt> = result
            .reviews
            .into_iter()
            .take(self.settings.review_cap)
            .map(RawReview::into_excerpt)
            .collect();

        tracing::debug!(
            "Details for {}: {} reviews, rating {:?}",
            place.place_id,
            reviews.len(),
            result.rating
        );

        let photo_reference = if self.settings.include_photo {
            result.photos.into_iter().next().map(|p| p.photo_reference)
        } else {
            None
        };

        Ok(PlaceDetails {
            name: result.name,
            address: result.formatted_address,
            rating: result.rating,
            total_ratings: result.user_ratings_total,
            reviews,
            photo_reference,
        })
    }

    async fn photo_data_uri(&self, photo_reference: &str) -> Result<String> {
        let max_width = self.settings.photo_max_width.to_string();
        let response = self
            .client
            .get(self.endpoint("/maps/api/place/photo"))
            .query(&[
                ("maxwidth", max_width.as_str()),
                ("photo_reference", photo_reference),
                ("key", self.api_key.as_str()),
            ])
            .send()
            .await
            .and_then(|r| r.error_for_status())
            .map_err(|e| ReviewError::Http(e.without_url()))?;

        let content_type = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .filter(|v| v.starts_with("image/"))
            .unwrap_or("image/jpeg")
            .to_string();

        let bytes = response
            .bytes()
            .await
            .map_err(|e| ReviewError::Http(e.without_url()))?;
        if bytes.is_empty() {
            return Err(ReviewError::upstream(SERVICE, "empty photo body"));
        }

        Ok(format!("data:{};base64,{}", content_type, STANDARD.encode(&bytes)))
    }

    fn review_cap(&self) -> usize {
        self.settings.review_cap
    }
}
