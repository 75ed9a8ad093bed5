//! Profile statistics over a saved collection.

use super::model::Joke;

/// How many favourite topics the profile view lists.
pub const FAVORITE_TOPIC_LIMIT: usize = 3;

/// Summary of a saved collection.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CollectionStats {
    pub total_jokes: usize,
    /// Up to three `(topic, count)` pairs, most saved first.
    /// Ties keep the order in which the topic was first saved.
    pub favorite_topics: Vec<(String, usize)>,
}

impl CollectionStats {
    /// Counts saved jokes per topic string. Topics are compared verbatim,
    /// so "Food" and "food" are counted separately.
    pub fn from_jokes(jokes: &[Joke]) -> Self {
        let mut counts: Vec<(String, usize)> = Vec::new();
        for joke in jokes {
            match counts.iter_mut().find(|(topic, _)| *topic == joke.topic) {
                Some((_, count)) => *count += 1,
                None => counts.push((joke.topic.clone(), 1)),
            }
        }

        // stable sort: ties stay in first-seen order
        counts.sort_by(|(_, a), (_, b)| b.cmp(a));
        counts.truncate(FAVORITE_TOPIC_LIMIT);

        Self {
            total_jokes: jokes.len(),
            favorite_topics: counts,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn joke(id: &str, topic: &str) -> Joke {
        Joke::new(id, "s", "p", topic)
    }

    #[test]
    fn test_empty_collection() {
        let stats = CollectionStats::from_jokes(&[]);
        assert_eq!(stats, CollectionStats::default());
    }

    #[test]
    fn test_top_three_by_count() {
        let jokes = vec![
            joke("1", "food"),
            joke("2", "animals"),
            joke("3", "programming"),
            joke("4", "programming"),
            joke("5", "general"),
            joke("6", "animals"),
            joke("7", "programming"),
        ];
        let stats = CollectionStats::from_jokes(&jokes);

        assert_eq!(stats.total_jokes, 7);
        assert_eq!(
            stats.favorite_topics,
            vec![
                ("programming".to_string(), 3),
                ("animals".to_string(), 2),
                ("food".to_string(), 1),
            ]
        );
    }

    #[test]
    fn test_topics_are_counted_verbatim() {
        let jokes = vec![joke("1", "Food"), joke("2", "food")];
        let stats = CollectionStats::from_jokes(&jokes);
        assert_eq!(stats.favorite_topics.len(), 2);
    }
}
