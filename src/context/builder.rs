//! Context window builder
//!
//! Produces the bounded, ordered slice of a user's history supplied to the
//! AI service for one request. A two-stage cap decouples how far back to
//! look (`max_turns`) from how much is actually sent (`max_context_items`):
//! summarization callers can request a wide recency window while the AI
//! call itself stays bounded.

use crate::db::{HistoryRepo, TurnKind};
use crate::Result;

/// Default caps applied when a request leaves them unset
#[derive(Debug, Clone)]
pub struct ContextConfig {
    /// Maximum number of turns to fetch from history
    pub max_turns: usize,
    /// Maximum number of turns actually surfaced to the AI call
    pub max_context_items: usize,
}

impl Default for ContextConfig {
    fn default() -> Self {
        Self {
            max_turns: 50,
            max_context_items: 20,
        }
    }
}

/// Parameters for one context-building request
#[derive(Debug, Clone)]
pub struct ContextRequest {
    pub user_id: i64,
    /// Channel the triggering message arrived on; tags ambient context only
    pub channel_id: Option<String>,
    pub max_turns: usize,
    pub max_context_items: usize,
}

impl ContextRequest {
    /// Build a request from per-call identifiers and configured caps
    #[must_use]
    pub fn new(user_id: i64, channel_id: Option<String>, config: &ContextConfig) -> Self {
        Self {
            user_id,
            channel_id,
            max_turns: config.max_turns,
            max_context_items: config.max_context_items,
        }
    }
}

/// A role-tagged message ready for the AI request
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct ContextMessage {
    pub role: String,
    pub content: String,
}

/// Builds conversation context for AI requests
#[derive(Debug, Clone, Default)]
pub struct ContextBuilder {
    config: ContextConfig,
}

impl ContextBuilder {
    /// Create a new context builder
    #[must_use]
    pub const fn new(config: ContextConfig) -> Self {
        Self { config }
    }

    /// Configured caps
    #[must_use]
    pub const fn config(&self) -> &ContextConfig {
        &self.config
    }

    /// Build the context window for one request
    ///
    /// Fetches up to `max_turns` most-recent turns oldest-to-newest, then
    /// truncates from the oldest end down to `max_context_items` so recency
    /// wins over completeness. Returns an empty sequence (not an error) when
    /// the user has no history. Never mutates the store.
    ///
    /// # Errors
    ///
    /// Returns error if the history fetch fails
    pub fn build(
        &self,
        request: &ContextRequest,
        history: &HistoryRepo,
    ) -> Result<Vec<ContextMessage>> {
        let turns = history.recent(request.user_id, request.max_turns)?;

        let skip = turns.len().saturating_sub(request.max_context_items);
        let window: Vec<ContextMessage> = turns
            .into_iter()
            .skip(skip)
            .map(|turn| ContextMessage {
                role: role_for(turn.kind).to_string(),
                content: turn.content,
            })
            .collect();

        tracing::debug!(
            user = request.user_id,
            channel = request.channel_id.as_deref().unwrap_or("-"),
            items = window.len(),
            "built context window"
        );

        Ok(window)
    }
}

/// Map a stored turn kind to the AI request role
const fn role_for(kind: TurnKind) -> &'static str {
    match kind {
        TurnKind::UserMessage => "user",
        TurnKind::AiResponse => "assistant",
        TurnKind::ChannelContext => "system",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{init_memory, HistoryRepo, TurnKind};

    fn setup() -> (ContextBuilder, HistoryRepo) {
        let pool = init_memory().unwrap();
        (ContextBuilder::default(), HistoryRepo::new(pool))
    }

    fn request(user_id: i64, max_turns: usize, max_context_items: usize) -> ContextRequest {
        ContextRequest {
            user_id,
            channel_id: None,
            max_turns,
            max_context_items,
        }
    }

    #[test]
    fn test_empty_history_yields_empty_window() {
        let (builder, history) = setup();
        let window = builder.build(&request(1, 50, 20), &history).unwrap();
        assert!(window.is_empty());
    }

    #[test]
    fn test_all_turns_surface_when_caps_are_wide() {
        let (builder, history) = setup();

        history.append(1, "Hello", TurnKind::UserMessage).unwrap();
        history.append(1, "Hi there!", TurnKind::AiResponse).unwrap();

        let window = builder.build(&request(1, 50, 20), &history).unwrap();
        assert_eq!(window.len(), 2);
        assert_eq!(window[0].role, "user");
        assert_eq!(window[0].content, "Hello");
        assert_eq!(window[1].role, "assistant");
    }

    #[test]
    fn test_truncates_from_oldest_end() {
        let (builder, history) = setup();

        for i in 0..30 {
            history
                .append(2, &format!("msg {i}"), TurnKind::UserMessage)
                .unwrap();
        }

        let window = builder.build(&request(2, 100, 20), &history).unwrap();
        assert_eq!(window.len(), 20);
        // Most recent 20, oldest-first within the slice
        assert_eq!(window[0].content, "msg 10");
        assert_eq!(window[19].content, "msg 29");
    }

    #[test]
    fn test_max_turns_caps_the_fetch() {
        let (builder, history) = setup();

        for i in 0..10 {
            history
                .append(3, &format!("msg {i}"), TurnKind::UserMessage)
                .unwrap();
        }

        let window = builder.build(&request(3, 4, 20), &history).unwrap();
        assert_eq!(window.len(), 4);
        assert_eq!(window[0].content, "msg 6");
    }

    #[test]
    fn test_channel_context_maps_to_system_role() {
        let (builder, history) = setup();

        history
            .append(4, "[#general] topic changed", TurnKind::ChannelContext)
            .unwrap();

        let window = builder.build(&request(4, 50, 20), &history).unwrap();
        assert_eq!(window[0].role, "system");
    }
}
