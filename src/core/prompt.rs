use crate::domain::model::{AggregatedReviewSet, InstructionTemplate, PromptPayload, ReviewExcerpt};

pub const REVIEWS_SEPARATOR: &str = "\n\nREVIEWS:\n";

pub fn render_review(index: usize, review: &ReviewExcerpt) -> String {
    format!(
        "Review {} ({}/5 - {} - {}): {}",
        index, review.rating, review.author, review.source, review.text
    )
}

/// Numbered excerpts, one block per review, separated by a blank line.
pub fn render_reviews(reviews: &[ReviewExcerpt]) -> String {
    reviews
        .iter()
        .enumerate()
        .map(|(i, r)| render_review(i + 1, r))
        .collect::<Vec<_>>()
        .join("\n\n")
}

pub fn assemble(template: &InstructionTemplate, reviews: &AggregatedReviewSet) -> PromptPayload {
    let rendered = render_reviews(reviews.reviews());
    let mut text =
        String::with_capacity(template.as_str().len() + REVIEWS_SEPARATOR.len() + rendered.len());
    text.push_str(template.as_str());
    text.push_str(REVIEWS_SEPARATOR);
    text.push_str(&rendered);
    PromptPayload::new(text)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::ReviewSource;

    fn set() -> AggregatedReviewSet {
        let mut set = AggregatedReviewSet::new(Some(4.2), Some(830));
        set.extend(vec![
            ReviewExcerpt {
                author: "Marta".into(),
                rating: 5,
                text: "Silencioso à noite.".into(),
                source: ReviewSource::GooglePlaces,
                timestamp: None,
            },
            ReviewExcerpt {
                author: "João".into(),
                rating: 2,
                text: "Check-in lento.".into(),
                source: ReviewSource::Outscraper,
                timestamp: None,
            },
        ]);
        set
    }

    #[test]
    fn test_assemble_layout() {
        let template = InstructionTemplate::new("Resume as reviews.");
        let payload = assemble(&template, &set());

        assert_eq!(
            payload.as_str(),
            "Resume as reviews.\n\nREVIEWS:\n\
             Review 1 (5/5 - Marta - Google): Silencioso à noite.\n\n\
             Review 2 (2/5 - João - Outscraper): Check-in lento."
        );
    }

    #[test]
    fn test_assemble_is_deterministic() {
        let template = InstructionTemplate::new("T");
        let reviews = set();
        assert_eq!(assemble(&template, &reviews), assemble(&template, &reviews));
    }

    #[test]
    fn test_no_escaping_of_review_text() {
        let mut reviews = AggregatedReviewSet::default();
        reviews.extend(vec![ReviewExcerpt {
            author: "**x**".into(),
            rating: 0,
            text: "### not a heading\n- bullet".into(),
            source: ReviewSource::GooglePlaces,
            timestamp: None,
        }]);

        let rendered = render_reviews(reviews.reviews());
        assert_eq!(rendered, "Review 1 (0/5 - **x** - Google): ### not a heading\n- bullet");
    }
}
