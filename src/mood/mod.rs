//! Mood analytics over recorded check-ins

pub mod analytics;

pub use analytics::{analyze, MoodAnalysis, MoodReport, MoodStat};
