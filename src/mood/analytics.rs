//! Mood analytics aggregator
//!
//! Turns a user's raw check-in log into a structured report: frequency
//! distribution, mean intensities, dominant mood, logged activities, and
//! derived insight strings. An empty window is a valid `NoData` result,
//! never an error; a failed fetch propagates unmodified.

use crate::db::{CheckInRepo, Mood, MoodCheckIn, Timeframe};
use crate::Result;

/// Outcome of an analytics run
#[derive(Debug, Clone)]
pub enum MoodAnalysis {
    /// No check-ins fell inside the requested window
    NoData,
    /// Full computed report; never partially filled
    Report(MoodReport),
}

/// Aggregated statistics for one timeframe
#[derive(Debug, Clone)]
pub struct MoodReport {
    pub timeframe: Timeframe,
    pub total: usize,
    /// Per-mood stats in first-encountered order
    pub distribution: Vec<MoodStat>,
    /// Mood with the highest count; ties keep the first-encountered label
    pub dominant: Mood,
    /// Mean intensity across all check-ins, one decimal
    pub average_intensity: f64,
    /// Distinct non-null activities in first-logged order
    pub activities: Vec<String>,
    pub insights: Vec<String>,
}

/// Stats for one mood label
#[derive(Debug, Clone)]
pub struct MoodStat {
    pub mood: Mood,
    pub count: usize,
    /// Share of total check-ins, rounded to the nearest whole percent
    pub percentage: u32,
    /// Mean intensity for this mood, one decimal
    pub average_intensity: f64,
}

/// Analyze a user's check-ins over a timeframe
///
/// Selection is inclusive of the window's lower bound; `Timeframe::All` is
/// unbounded. Absent intensities count as the default (3) in every mean.
///
/// # Errors
///
/// Returns error if the check-in fetch fails
pub fn analyze(user_id: i64, timeframe: Timeframe, checkins: &CheckInRepo) -> Result<MoodAnalysis> {
    let entries = checkins.in_timeframe(user_id, timeframe)?;

    if entries.is_empty() {
        tracing::debug!(user = user_id, %timeframe, "no check-ins in window");
        return Ok(MoodAnalysis::NoData);
    }

    Ok(MoodAnalysis::Report(build_report(timeframe, &entries)))
}

fn build_report(timeframe: Timeframe, entries: &[MoodCheckIn]) -> MoodReport {
    let total = entries.len();

    // First-encountered order makes the dominant-mood tie-break stable
    let mut moods: Vec<(Mood, usize, u32)> = Vec::new();
    let mut activities: Vec<String> = Vec::new();
    let mut intensity_sum: u32 = 0;

    for entry in entries {
        let intensity = u32::from(entry.effective_intensity());
        intensity_sum += intensity;

        match moods.iter_mut().find(|(mood, _, _)| *mood == entry.mood) {
            Some((_, count, sum)) => {
                *count += 1;
                *sum += intensity;
            }
            None => moods.push((entry.mood, 1, intensity)),
        }

        if let Some(activity) = entry.activity.as_deref() {
            if !activities.iter().any(|a| a == activity) {
                activities.push(activity.to_string());
            }
        }
    }

    let distribution: Vec<MoodStat> = moods
        .iter()
        .map(|&(mood, count, sum)| MoodStat {
            mood,
            count,
            percentage: percent(count, total),
            average_intensity: mean(sum, count),
        })
        .collect();

    // Strictly-greater keeps the first-encountered label on ties
    let dominant_stat = distribution
        .iter()
        .fold(&distribution[0], |best, stat| {
            if stat.count > best.count { stat } else { best }
        });
    let dominant = dominant_stat.mood;
    let dominant_count = dominant_stat.count;

    let average_intensity = mean(intensity_sum, total);

    let mut insights = vec![format!(
        "Most frequent mood: {dominant} ({dominant_count} of {total} check-ins)"
    )];
    if !activities.is_empty() {
        insights.push(format!(
            "Activities logged alongside check-ins: {}",
            activities.len()
        ));
    }
    insights.push(format!("Average intensity: {average_intensity:.1} out of 5"));

    MoodReport {
        timeframe,
        total,
        distribution,
        dominant,
        average_intensity,
        activities,
        insights,
    }
}

/// Share of total, rounded to the nearest whole percent
#[allow(clippy::cast_possible_truncation, clippy::cast_precision_loss, clippy::cast_sign_loss)]
fn percent(count: usize, total: usize) -> u32 {
    ((count as f64 / total as f64) * 100.0).round() as u32
}

/// Mean rounded to one decimal
#[allow(clippy::cast_precision_loss)]
fn mean(sum: u32, count: usize) -> f64 {
    (f64::from(sum) / count as f64 * 10.0).round() / 10.0
}
