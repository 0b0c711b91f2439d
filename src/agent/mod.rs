//! AI service integration

pub mod client;

pub use client::{CompanionClient, FALLBACK_REPLY};
