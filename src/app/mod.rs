// HTTP surface: router, handlers and wiring of the concrete adapters.

pub mod cors;
pub mod handlers;

use crate::adapters::{AnthropicClient, GooglePlacesClient, OutscraperClient};
use crate::config::toml_config::CorsSettings;
use crate::config::AppConfig;
use crate::core::analyzer::ReviewAnalyzer;
use crate::core::poll::{PollPolicy, TokioSleeper};
use crate::core::secondary::{SecondaryLimits, SecondaryReviewFetcher};
use crate::domain::ports::SecondaryReviews;
use crate::utils::error::Result;
use axum::{
    routing::{get, post},
    Router,
};
use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;

#[derive(Clone)]
pub struct AppState {
    pub analyzer: Arc<ReviewAnalyzer>,
}

impl AppState {
    pub fn new(analyzer: ReviewAnalyzer) -> Self {
        Self {
            analyzer: Arc::new(analyzer),
        }
    }
}

/// Builds the analyzer from the production adapters.
pub fn build_analyzer(config: &AppConfig) -> Result<ReviewAnalyzer> {
    let settings = &config.settings;

    let places = GooglePlacesClient::new(&config.keys.google_places, settings.google.clone())?;
    let completion = AnthropicClient::new(&config.keys.anthropic, settings.completion.clone())?;

    let secondary: Option<Arc<dyn SecondaryReviews>> = match config.secondary_key() {
        Some(key) => {
            let api = OutscraperClient::new(key, &settings.secondary)?;
            let policy = PollPolicy::fixed(
                settings.secondary.poll_attempts,
                settings.secondary.poll_delay(),
            );
            let limits = SecondaryLimits {
                request_cap: settings.secondary.request_cap,
                limit: settings.secondary.reviews_limit,
                min_text_chars: settings.secondary.min_text_chars,
            };
            tracing::info!(
                "🔗 Secondary reviews enabled (limit {}, poll budget {:?})",
                limits.limit,
                policy.budget()
            );
            let fetcher: Arc<dyn SecondaryReviews> = Arc::new(SecondaryReviewFetcher::new(
                api,
                policy,
                Arc::new(TokioSleeper),
                limits,
            ));
            Some(fetcher)
        }
        None => {
            tracing::info!("Secondary reviews disabled");
            None
        }
    };

    Ok(ReviewAnalyzer::new(
        Arc::new(places),
        secondary,
        Arc::new(completion),
        config.template.clone(),
    ))
}

pub fn build_router(state: AppState, cors: &CorsSettings) -> Result<Router> {
    Ok(Router::new()
        .route("/", get(handlers::index))
        .route("/health", get(handlers::health_check))
        .route("/analyze-apify", post(handlers::analyze))
        .route("/analyze", post(handlers::analyze))
        .with_state(state)
        .layer(cors::cors_layer(cors)?)
        .layer(TraceLayer::new_for_http()))
}

pub async fn serve<F>(router: Router, addr: SocketAddr, shutdown: F) -> std::io::Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    let listener = TcpListener::bind(addr).await?;
    tracing::info!("🚀 Listening on http://{}", listener.local_addr()?);

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown)
        .await
}
