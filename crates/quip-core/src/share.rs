//! Share delivery seam.

use async_trait::async_trait;

use crate::error::Result;
use crate::joke::Joke;

/// Title passed to the platform share sheet.
pub const SHARE_TITLE: &str = "Check out this joke!";

/// Tag appended to every shared joke.
pub const SHARE_TAG: &str = "#JokeGenerator";

/// A joke formatted for sharing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShareMessage {
    pub title: String,
    pub text: String,
}

impl ShareMessage {
    /// `setup`, blank line, `punchline`, blank line, tag.
    pub fn for_joke(joke: &Joke) -> Self {
        Self {
            title: SHARE_TITLE.to_string(),
            text: format!("{}\n\n{}\n\n{}", joke.setup, joke.punchline, SHARE_TAG),
        }
    }
}

/// Which mechanism delivered a share.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShareChannel {
    Native,
    Clipboard,
}

/// A platform capability that can receive shared text.
#[async_trait]
pub trait ShareTarget: Send + Sync {
    /// Whether this target can be used on the current platform.
    fn is_available(&self) -> bool {
        true
    }

    async fn deliver(&self, message: &ShareMessage) -> Result<()>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_message_format() {
        let joke = Joke::new("1", "What do you call a fake noodle?", "An impasta!", "general");
        let message = ShareMessage::for_joke(&joke);

        assert_eq!(message.title, "Check out this joke!");
        assert_eq!(
            message.text,
            "What do you call a fake noodle?\n\nAn impasta!\n\n#JokeGenerator"
        );
    }
}
