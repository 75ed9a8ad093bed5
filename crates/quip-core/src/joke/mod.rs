//! Joke domain module.
//!
//! - `model`: the [`Joke`] item
//! - `catalog`: the static topic table and fallback policy
//! - `stats`: profile statistics over a saved collection

pub mod catalog;
mod model;
mod stats;

pub use catalog::{
    DEFAULT_TOPIC, FallbackPolicy, JokeTemplate, SUGGESTED_TOPICS, Topic, TopicResolution,
};
pub use model::Joke;
pub use stats::{CollectionStats, FAVORITE_TOPIC_LIMIT};
