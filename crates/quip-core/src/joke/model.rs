//! Joke domain model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A single generated joke and its save status.
///
/// Only `is_saved` and `saved_at` change after creation; `saved_at` is
/// present iff `is_saved` is true.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Joke {
    /// Unique identifier (UUID format)
    pub id: String,
    pub setup: String,
    pub punchline: String,
    /// Topic exactly as the caller supplied it
    pub topic: String,
    pub is_saved: bool,
    /// When the joke was added to the collection
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub saved_at: Option<DateTime<Utc>>,
}

impl Joke {
    /// Creates an unsaved joke.
    pub fn new(
        id: impl Into<String>,
        setup: impl Into<String>,
        punchline: impl Into<String>,
        topic: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            setup: setup.into(),
            punchline: punchline.into(),
            topic: topic.into(),
            is_saved: false,
            saved_at: None,
        }
    }

    /// Returns a copy marked as saved at `at`.
    pub fn saved(&self, at: DateTime<Utc>) -> Self {
        Self {
            is_saved: true,
            saved_at: Some(at),
            ..self.clone()
        }
    }
}
