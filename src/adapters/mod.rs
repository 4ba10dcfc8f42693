// Adapters layer: reqwest implementations of the domain ports.

pub mod anthropic;
pub mod google_places;
pub mod outscraper;

pub use anthropic::AnthropicClient;
pub use google_places::GooglePlacesClient;
pub use outscraper::OutscraperClient;
