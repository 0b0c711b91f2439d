//! Solace Companion - conversational companion core
//!
//! This library provides the stateful heart of the companion bot:
//! - Conversation history persistence (append-only turn log)
//! - Context window assembly for AI requests
//! - Deterministic conversation summaries for long-horizon memory
//! - Mood check-in analytics and insights
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────┐
//! │              Chat platform / CLI                     │
//! └────────────────────┬────────────────────────────────┘
//!                      │
//! ┌────────────────────▼────────────────────────────────┐
//! │                Solace Companion                      │
//! │  History │ Context Builder │ Summarizer │ Analytics │
//! └───────┬─────────────────────────────────┬───────────┘
//!         │                                 │
//! ┌───────▼────────┐               ┌────────▼───────────┐
//! │  SQLite store  │               │  AI completion API  │
//! └────────────────┘               └────────────────────┘
//! ```

pub mod agent;
pub mod config;
pub mod context;
pub mod db;
pub mod error;
pub mod mood;

pub use agent::{CompanionClient, FALLBACK_REPLY};
pub use config::{AiConfig, Config};
pub use context::{ContextBuilder, ContextConfig, ContextMessage, ContextRequest, Summarizer, SummaryConfig};
pub use db::{
    CheckInRepo, ConversationTurn, DbConn, DbPool, HistoryRepo, Mood, MoodCheckIn, Timeframe,
    TurnKind, UserRepo,
};
pub use error::{Error, Result};
pub use mood::{analyze, MoodAnalysis, MoodReport, MoodStat};
