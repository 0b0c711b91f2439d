//! Conversation flow integration tests
//!
//! Exercise the history store, context builder, and summarizer together
//! the way the chat flow drives them.

use solace_companion::{
    ContextBuilder, ContextConfig, ContextRequest, HistoryRepo, Summarizer, SummaryConfig,
    TurnKind,
};

mod common;
use common::setup_test_db;

fn request(user_id: i64, max_turns: usize, max_context_items: usize) -> ContextRequest {
    ContextRequest {
        user_id,
        channel_id: Some("general".to_string()),
        max_turns,
        max_context_items,
    }
}

#[test]
fn context_window_follows_conversation() {
    let pool = setup_test_db();
    let history = HistoryRepo::new(pool);
    let builder = ContextBuilder::new(ContextConfig::default());

    // A short back-and-forth with some ambient channel context
    history
        .append(10, "[#general] topic: weekend plans", TurnKind::ChannelContext)
        .unwrap();
    history.append(10, "any hike ideas?", TurnKind::UserMessage).unwrap();
    history
        .append(10, "The ridge trail is lovely this time of year.", TurnKind::AiResponse)
        .unwrap();

    let window = builder.build(&request(10, 50, 20), &history).unwrap();

    assert_eq!(window.len(), 3);
    assert_eq!(window[0].role, "system");
    assert_eq!(window[1].role, "user");
    assert_eq!(window[2].role, "assistant");
    assert_eq!(window[1].content, "any hike ideas?");
}

#[test]
fn thirty_turns_with_wide_fetch_keeps_twenty_newest() {
    let pool = setup_test_db();
    let history = HistoryRepo::new(pool);
    let builder = ContextBuilder::new(ContextConfig::default());

    for i in 0..30 {
        history
            .append(11, &format!("turn {i}"), TurnKind::UserMessage)
            .unwrap();
    }

    let window = builder.build(&request(11, 100, 20), &history).unwrap();

    assert_eq!(window.len(), 20);
    assert_eq!(window.first().unwrap().content, "turn 10");
    assert_eq!(window.last().unwrap().content, "turn 29");
}

#[test]
fn inbound_message_is_not_doubled_into_its_own_context() {
    let pool = setup_test_db();
    let history = HistoryRepo::new(pool);
    let builder = ContextBuilder::new(ContextConfig::default());

    history.append(16, "how was your day?", TurnKind::UserMessage).unwrap();
    history
        .append(16, "Quiet, mostly. How was yours?", TurnKind::AiResponse)
        .unwrap();

    // Chat flow: the window is built before the inbound turn is recorded,
    // because the AI request carries that turn separately as the prompt
    let inbound = "hello there";
    let window = builder.build(&request(16, 50, 20), &history).unwrap();
    history.append(16, inbound, TurnKind::UserMessage).unwrap();

    assert_eq!(window.len(), 2);
    assert_eq!(window.last().unwrap().role, "assistant");
    assert!(
        !window.iter().any(|m| m.content == inbound),
        "window must not already contain the prompt"
    );

    // The turn is still durably recorded for the next request's window
    let next = builder.build(&request(16, 50, 20), &history).unwrap();
    assert_eq!(next.last().unwrap().content, inbound);
}

#[test]
fn clear_then_build_yields_empty_window() {
    let pool = setup_test_db();
    let history = HistoryRepo::new(pool);
    let builder = ContextBuilder::new(ContextConfig::default());

    for i in 0..5 {
        history
            .append(12, &format!("turn {i}"), TurnKind::UserMessage)
            .unwrap();
    }

    let deleted = history.clear(12).unwrap();
    assert_eq!(deleted, 5);

    assert!(history.recent(12, 100).unwrap().is_empty());
    assert!(builder.build(&request(12, 50, 20), &history).unwrap().is_empty());
}

#[test]
fn summary_is_deterministic_across_calls() {
    let pool = setup_test_db();
    let history = HistoryRepo::new(pool);
    let summarizer = Summarizer::new(SummaryConfig::default());

    for msg in [
        "therapy session went better this week",
        "thinking a lot about therapy homework",
        "my sister visited, we cooked together",
        "cooking again tonight, pasta",
        "therapy tomorrow, a bit nervous",
        "tried a new pasta recipe from my sister",
    ] {
        history.append(13, msg, TurnKind::UserMessage).unwrap();
    }

    let first = summarizer.summarize(13, 7, &history).unwrap();
    let second = summarizer.summarize(13, 7, &history).unwrap();
    let third = summarizer.summarize(13, 7, &history).unwrap();

    assert!(!first.is_empty());
    assert_eq!(first, second);
    assert_eq!(second, third);
    assert!(first.contains("therapy"), "summary was: {first}");
}

#[test]
fn summary_reflects_only_trailing_window_users() {
    let pool = setup_test_db();
    let history = HistoryRepo::new(pool);
    let summarizer = Summarizer::new(SummaryConfig::default());

    // User 14 has rich history; user 15 has none
    for _ in 0..6 {
        history
            .append(14, "garden garden tomatoes", TurnKind::UserMessage)
            .unwrap();
    }

    assert!(!summarizer.summarize(14, 7, &history).unwrap().is_empty());
    assert_eq!(summarizer.summarize(15, 7, &history).unwrap(), "");
}
