//! Context assembly for AI conversations

pub mod builder;
pub mod summary;

pub use builder::{ContextBuilder, ContextConfig, ContextMessage, ContextRequest};
pub use summary::{Summarizer, SummaryConfig};
