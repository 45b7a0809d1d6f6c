//! Content classification for submitted turns

use serde::Serialize;

/// Violations after which a participant is banned from a session
pub const BAN_THRESHOLD: u32 = 3;

// Substring matching: entries must not occur inside everyday words
const DEFAULT_DENYLIST: &[&str] = &["damn", "idiot", "stupid", "imbecile", "bastard", "shut up"];

/// Outcome of classifying a piece of text
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Classification {
    pub flagged: bool,
}

/// Decides whether submitted content violates the session rules
pub trait Classifier: Send + Sync {
    fn classify(&self, text: &str) -> Classification;
}

/// Flags text containing any denylisted word as a case-insensitive substring
#[derive(Debug, Clone)]
pub struct DenylistClassifier {
    words: Vec<String>,
}

impl DenylistClassifier {
    pub fn new<I, S>(words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            words: words
                .into_iter()
                .map(|w| w.as_ref().trim().to_lowercase())
                .filter(|w| !w.is_empty())
                .collect(),
        }
    }
}

impl Default for DenylistClassifier {
    fn default() -> Self {
        Self::new(DEFAULT_DENYLIST)
    }
}

impl Classifier for DenylistClassifier {
    fn classify(&self, text: &str) -> Classification {
        let lowered = text.to_lowercase();
        Classification {
            flagged: self.words.iter().any(|w| lowered.contains(w.as_str())),
        }
    }
}
