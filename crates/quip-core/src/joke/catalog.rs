//! Static joke table keyed by topic.
//!
//! Topic lookup is case-insensitive. A topic without a table entry resolves
//! according to [`FallbackPolicy`]: the default keeps the long-standing
//! behaviour of quietly serving general jokes, `Strict` reports
//! [`QuipError::UnknownTopic`] instead.

use rand::Rng;
use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};

use crate::error::{QuipError, Result};

/// Topic used when the caller does not pass one.
pub const DEFAULT_TOPIC: &str = "general";

/// Topic labels offered on the home view.
///
/// Only the first four have table entries; the rest resolve through the
/// fallback policy.
pub const SUGGESTED_TOPICS: [&str; 8] = [
    "General",
    "Programming",
    "Animals",
    "Food",
    "Work",
    "Dad Jokes",
    "Science",
    "Sports",
];

/// A (setup, punchline) pair from the table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct JokeTemplate {
    pub setup: &'static str,
    pub punchline: &'static str,
}

const fn template(setup: &'static str, punchline: &'static str) -> JokeTemplate {
    JokeTemplate { setup, punchline }
}

const GENERAL: [JokeTemplate; 3] = [
    template(
        "Why don't scientists trust atoms?",
        "Because they make up everything!",
    ),
    template("What do you call a fake noodle?", "An impasta!"),
    template(
        "Why did the scarecrow win an award?",
        "He was outstanding in his field!",
    ),
];

const PROGRAMMING: [JokeTemplate; 3] = [
    template(
        "Why do programmers prefer dark mode?",
        "Because light attracts bugs!",
    ),
    template(
        "How many programmers does it take to change a light bulb?",
        "None, that's a hardware problem!",
    ),
    template(
        "Why do Java developers wear glasses?",
        "Because they don't see sharp!",
    ),
];

const ANIMALS: [JokeTemplate; 3] = [
    template("What do you call a sleeping bull?", "A bulldozer!"),
    template(
        "Why don't elephants use computers?",
        "They're afraid of the mouse!",
    ),
    template("What do you call a bear with no teeth?", "A gummy bear!"),
];

const FOOD: [JokeTemplate; 3] = [
    template(
        "Why did the tomato turn red?",
        "Because it saw the salad dressing!",
    ),
    template("What do you call cheese that isn't yours?", "Nacho cheese!"),
    template("Why don't eggs tell jokes?", "They'd crack each other up!"),
];

/// Topics with a table entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Topic {
    General,
    Programming,
    Animals,
    Food,
}

impl Topic {
    pub const ALL: [Topic; 4] = [
        Topic::General,
        Topic::Programming,
        Topic::Animals,
        Topic::Food,
    ];

    /// Lower-case lookup key.
    pub fn key(self) -> &'static str {
        match self {
            Topic::General => "general",
            Topic::Programming => "programming",
            Topic::Animals => "animals",
            Topic::Food => "food",
        }
    }

    /// Case-insensitive lookup. Surrounding whitespace is not trimmed.
    pub fn from_key(requested: &str) -> Option<Self> {
        let normalized = requested.to_lowercase();
        Self::ALL.into_iter().find(|topic| topic.key() == normalized)
    }

    pub fn templates(self) -> &'static [JokeTemplate] {
        match self {
            Topic::General => &GENERAL,
            Topic::Programming => &PROGRAMMING,
            Topic::Animals => &ANIMALS,
            Topic::Food => &FOOD,
        }
    }

    /// Picks one template uniformly at random.
    pub fn pick<R: Rng + ?Sized>(self, rng: &mut R) -> Result<JokeTemplate> {
        self.templates()
            .choose(rng)
            .copied()
            .ok_or_else(|| QuipError::internal(format!("topic '{}' has no jokes", self.key())))
    }
}

/// What to do with a topic that has no table entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FallbackPolicy {
    /// Serve general jokes without signalling anything.
    #[default]
    General,
    /// Reject the request with `UnknownTopic`.
    Strict,
}

/// Outcome of resolving a requested topic string.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TopicResolution {
    pub topic: Topic,
    /// True when the requested topic was unknown and general was used
    pub fell_back: bool,
}

impl FallbackPolicy {
    pub fn resolve(self, requested: &str) -> Result<TopicResolution> {
        match (Topic::from_key(requested), self) {
            (Some(topic), _) => Ok(TopicResolution {
                topic,
                fell_back: false,
            }),
            (None, FallbackPolicy::General) => Ok(TopicResolution {
                topic: Topic::General,
                fell_back: true,
            }),
            (None, FallbackPolicy::Strict) => Err(QuipError::UnknownTopic(requested.to_string())),
        }
    }
}
