pub mod analyzer;
pub mod poll;
pub mod prompt;
pub mod secondary;

pub use crate::domain::model::{AggregatedReviewSet, PlaceQuery, ReviewExcerpt};
pub use crate::domain::ports::{CompletionModel, PlaceDirectory, SecondaryReviews, Sleeper};
pub use crate::utils::error::Result;
