#![allow(dead_code)]

use async_trait::async_trait;
use hotel_review_digest::domain::model::{PlaceQuery, ReviewExcerpt, ReviewSource};
use hotel_review_digest::domain::ports::{JobPoll, JobSubmission, ReviewJobApi, Sleeper};
use hotel_review_digest::Result;
use serde_json::{json, Value};
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// Records requested naps without actually waiting.
#[derive(Default)]
pub struct RecordingSleeper {
    naps: Mutex<Vec<Duration>>,
}

impl RecordingSleeper {
    pub fn naps(&self) -> Vec<Duration> {
        self.naps.lock().unwrap().clone()
    }
}

#[async_trait]
impl Sleeper for RecordingSleeper {
    async fn sleep(&self, duration: Duration) {
        self.naps.lock().unwrap().push(duration);
    }
}

struct ScriptState {
    submission: Mutex<Option<Result<JobSubmission>>>,
    polls: Mutex<VecDeque<Result<JobPoll>>>,
    submit_calls: AtomicUsize,
    poll_calls: AtomicUsize,
}

/// Secondary job API that replays a fixed script. Once the poll script runs
/// out every further poll answers `NotReady`.
#[derive(Clone)]
pub struct ScriptedJobs {
    state: Arc<ScriptState>,
}

impl ScriptedJobs {
    pub fn new(submission: Result<JobSubmission>, polls: Vec<Result<JobPoll>>) -> Self {
        Self {
            state: Arc::new(ScriptState {
                submission: Mutex::new(Some(submission)),
                polls: Mutex::new(polls.into()),
                submit_calls: AtomicUsize::new(0),
                poll_calls: AtomicUsize::new(0),
            }),
        }
    }

    pub fn pending_then(polls: Vec<Result<JobPoll>>) -> Self {
        Self::new(
            Ok(JobSubmission::Pending {
                results_location: "https://jobs.test/requests/abc".to_string(),
            }),
            polls,
        )
    }

    pub fn submit_calls(&self) -> usize {
        self.state.submit_calls.load(Ordering::SeqCst)
    }

    pub fn poll_calls(&self) -> usize {
        self.state.poll_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ReviewJobApi for ScriptedJobs {
    async fn submit(&self, _query: &PlaceQuery, _request_cap: usize) -> Result<JobSubmission> {
        self.state.submit_calls.fetch_add(1, Ordering::SeqCst);
        self.state
            .submission
            .lock()
            .unwrap()
            .take()
            .unwrap_or(Ok(JobSubmission::Failed {
                reason: "script exhausted".to_string(),
            }))
    }

    async fn poll(&self, _results_location: &str) -> Result<JobPoll> {
        self.state.poll_calls.fetch_add(1, Ordering::SeqCst);
        self.state
            .polls
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or(Ok(JobPoll::NotReady))
    }
}

pub fn secondary_review(author: &str, chars: usize) -> ReviewExcerpt {
    ReviewExcerpt {
        author: author.to_string(),
        rating: 4,
        text: "a".repeat(chars),
        source: ReviewSource::Outscraper,
        timestamp: None,
    }
}

pub fn google_search_body() -> Value {
    json!({
        "status": "OK",
        "results": [
            {
                "place_id": "ChIJ-test-place",
                "name": "Hotel Avenida Palace",
                "formatted_address": "Rua 1º de Dezembro 123, Lisboa"
            },
            {
                "place_id": "ChIJ-other",
                "name": "Avenida Hostel",
                "formatted_address": "Avenida da Liberdade, Lisboa"
            }
        ]
    })
}

pub fn google_details_body(review_count: usize) -> Value {
    let reviews: Vec<Value> = (1..=review_count)
        .map(|i| {
            json!({
                "author_name": format!("Guest {}", i),
                "rating": (i % 5) + 1,
                "text": format!("Review text number {}: quarto limpo e staff simpático.", i),
                "time": 1_700_000_000 + i as i64
            })
        })
        .collect();

    json!({
        "status": "OK",
        "result": {
            "name": "Hotel Avenida Palace",
            "formatted_address": "Rua 1º de Dezembro 123, Lisboa",
            "rating": 4.6,
            "user_ratings_total": 2841,
            "reviews": reviews
        }
    })
}

pub fn anthropic_body(text: &str) -> Value {
    json!({
        "id": "msg_test",
        "type": "message",
        "role": "assistant",
        "content": [{"type": "text", "text": text}],
        "usage": {"input_tokens": 1200, "output_tokens": 300}
    })
}
