//! Conversation summarizer
//!
//! Derives a short thematic digest over a trailing day window, giving the
//! AI long-horizon memory without replaying full history. Extraction is
//! purely lexical and deterministic: identical stored history always yields
//! byte-identical output.

use std::collections::HashMap;

use chrono::Utc;

use crate::db::{HistoryRepo, TurnKind};
use crate::Result;

/// Tuning for theme extraction
#[derive(Debug, Clone)]
pub struct SummaryConfig {
    /// Minimum turns in the window before any summary is attempted
    pub min_turns: usize,
    /// Maximum number of theme phrases emitted
    pub max_themes: usize,
    /// Minimum mentions for a word to count as a recurring theme
    pub min_mentions: usize,
}

impl Default for SummaryConfig {
    fn default() -> Self {
        Self {
            min_turns: 5,
            max_themes: 4,
            min_mentions: 2,
        }
    }
}

/// Words too common to carry a theme
const STOPWORDS: &[&str] = &[
    "about", "after", "again", "also", "always", "been", "before", "being", "could", "didnt",
    "does", "doing", "dont", "even", "every", "feel", "feeling", "from", "going", "good", "have",
    "having", "just", "know", "like", "little", "made", "make", "maybe", "more", "much", "need",
    "never", "okay", "only", "other", "over", "really", "right", "said", "should", "some",
    "something", "still", "than", "that", "thats", "them", "then", "there", "they", "thing",
    "things", "think", "this", "time", "today", "very", "want", "well", "were", "what", "when",
    "which", "will", "with", "would", "yeah", "your", "youre",
];

/// Derives thematic digests from conversation history
#[derive(Debug, Clone, Default)]
pub struct Summarizer {
    config: SummaryConfig,
}

impl Summarizer {
    /// Create a new summarizer
    #[must_use]
    pub const fn new(config: SummaryConfig) -> Self {
        Self { config }
    }

    /// Summarize recurring themes from the last `days` days of history
    ///
    /// Returns an empty string (not an error) when the window holds fewer
    /// than the minimum turn count or no word recurs often enough.
    ///
    /// # Errors
    ///
    /// Returns error if the history fetch fails
    pub fn summarize(&self, user_id: i64, days: u32, history: &HistoryRepo) -> Result<String> {
        let cutoff = Utc::now() - chrono::Duration::days(i64::from(days));
        let turns = history.since(user_id, cutoff)?;

        if turns.len() < self.config.min_turns {
            return Ok(String::new());
        }

        // Themes come from what the user said, not from replies or ambient context
        let messages: Vec<&str> = turns
            .iter()
            .filter(|t| t.kind == TurnKind::UserMessage)
            .map(|t| t.content.as_str())
            .collect();

        let themes = self.extract_themes(&messages);
        if themes.is_empty() {
            return Ok(String::new());
        }

        tracing::debug!(user = user_id, days, themes = themes.len(), "summarized history");
        Ok(format!(
            "Recent conversations have kept coming back to: {}.",
            themes.join(", ")
        ))
    }

    /// Rank recurring words across messages, newest mentions weighted higher
    ///
    /// Scoring is mention count plus a recency bonus for mentions in the
    /// newest third of the window. Ties keep first-encountered order, so the
    /// ranking is stable for a given input.
    fn extract_themes(&self, messages: &[&str]) -> Vec<String> {
        let recency_start = messages.len() - messages.len() / 3;

        let mut counts: HashMap<String, (usize, usize)> = HashMap::new();
        let mut order: Vec<String> = Vec::new();

        for (idx, message) in messages.iter().enumerate() {
            for word in tokenize(message) {
                let entry = counts.entry(word.clone()).or_insert_with(|| {
                    order.push(word);
                    (0, 0)
                });
                entry.0 += 1;
                if idx >= recency_start {
                    entry.1 += 1;
                }
            }
        }

        let mut ranked: Vec<(String, usize)> = order
            .into_iter()
            .filter_map(|word| {
                let (mentions, recent) = counts[&word];
                (mentions >= self.config.min_mentions).then_some((word, mentions + recent))
            })
            .collect();

        // Stable sort preserves first-encountered order on equal scores
        ranked.sort_by(|a, b| b.1.cmp(&a.1));
        ranked.truncate(self.config.max_themes);

        ranked.into_iter().map(|(word, _)| word).collect()
    }
}

/// Lowercased alphabetic words long enough to carry meaning
fn tokenize(text: &str) -> impl Iterator<Item = String> + '_ {
    text.split(|c: char| !c.is_alphanumeric())
        .filter(|w| w.len() >= 4)
        .map(str::to_lowercase)
        .filter(|w| !STOPWORDS.contains(&w.as_str()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{init_memory, HistoryRepo, TurnKind};

    fn setup() -> (Summarizer, HistoryRepo) {
        let pool = init_memory().unwrap();
        (Summarizer::default(), HistoryRepo::new(pool))
    }

    #[test]
    fn test_empty_history_gives_empty_summary() {
        let (summarizer, history) = setup();
        let summary = summarizer.summarize(1, 7, &history).unwrap();
        assert_eq!(summary, "");
    }

    #[test]
    fn test_below_min_turns_gives_empty_summary() {
        let (summarizer, history) = setup();

        history
            .append(1, "thinking about guitar practice", TurnKind::UserMessage)
            .unwrap();
        history
            .append(1, "guitar again today", TurnKind::UserMessage)
            .unwrap();

        assert_eq!(summarizer.summarize(1, 7, &history).unwrap(), "");
    }

    #[test]
    fn test_recurring_word_becomes_theme() {
        let (summarizer, history) = setup();

        for msg in [
            "work has been stressful lately",
            "another long day at work",
            "my manager piled on more work",
            "at least the weekend is close",
            "work deadlines keep slipping",
        ] {
            history.append(2, msg, TurnKind::UserMessage).unwrap();
        }

        let summary = summarizer.summarize(2, 7, &history).unwrap();
        assert!(summary.contains("work"), "summary was: {summary}");
    }

    #[test]
    fn test_single_mentions_produce_no_theme() {
        let (summarizer, history) = setup();

        for msg in [
            "started painting yesterday",
            "tried baking bread",
            "went hiking near the lake",
            "finally fixed the bicycle",
            "watched a documentary",
        ] {
            history.append(3, msg, TurnKind::UserMessage).unwrap();
        }

        assert_eq!(summarizer.summarize(3, 7, &history).unwrap(), "");
    }

    #[test]
    fn test_ai_responses_do_not_contribute_themes() {
        let (summarizer, history) = setup();

        for _ in 0..6 {
            history
                .append(4, "mindfulness mindfulness", TurnKind::AiResponse)
                .unwrap();
        }

        assert_eq!(summarizer.summarize(4, 7, &history).unwrap(), "");
    }

    #[test]
    fn test_identical_history_gives_identical_summary() {
        let (summarizer, history) = setup();

        for msg in [
            "guitar practice went badly",
            "work was fine, guitar later",
            "more guitar, less work stress",
            "band rehearsal tomorrow",
            "band setlist needs work",
        ] {
            history.append(5, msg, TurnKind::UserMessage).unwrap();
        }

        let first = summarizer.summarize(5, 7, &history).unwrap();
        let second = summarizer.summarize(5, 7, &history).unwrap();
        assert_eq!(first, second);
        assert!(!first.is_empty());
    }

    #[test]
    fn test_theme_cap_respected() {
        let summarizer = Summarizer::new(SummaryConfig {
            min_turns: 1,
            max_themes: 2,
            min_mentions: 2,
        });

        let messages = vec![
            "alpha alpha beta beta gamma gamma delta delta",
            "alpha beta gamma delta",
        ];
        let themes = summarizer.extract_themes(&messages);
        assert_eq!(themes.len(), 2);
    }

    #[test]
    fn test_tie_break_keeps_first_encountered_order() {
        let summarizer = Summarizer::default();

        let messages = vec!["zebra apple", "zebra apple", "zebra apple"];
        let themes = summarizer.extract_themes(&messages);
        // Equal scores; zebra was seen first
        assert_eq!(themes, vec!["zebra".to_string(), "apple".to_string()]);
    }
}
