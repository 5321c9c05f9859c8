use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::db::models::Observation;

pub const SEVERITY_MIN: u8 = 1;
pub const SEVERITY_MAX: u8 = 10;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum AnalysisError {
    #[error("severity {0} is outside the 1-10 scale")]
    InvalidSeverity(u8),
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum Trend {
    Increasing,
    Decreasing,
    Stable,
}

impl Trend {
    pub fn as_str(&self) -> &'static str {
        match self {
            Trend::Increasing => "increasing",
            Trend::Decreasing => "decreasing",
            Trend::Stable => "stable",
        }
    }
}

/// A subject's severity observations in insertion order (oldest first).
///
/// Insertion order is the canonical order for trend math; display ordering
/// (most recent first) is derived separately and never feeds back into the
/// aggregates. All operations return fresh values instead of mutating in
/// place, so callers own the only copy of the state they thread through.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SeverityHistory {
    observations: Vec<Observation>,
}

impl SeverityHistory {
    pub fn new(observations: Vec<Observation>) -> Self {
        Self { observations }
    }

    pub fn len(&self) -> usize {
        self.observations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.observations.is_empty()
    }

    pub fn observations(&self) -> &[Observation] {
        &self.observations
    }

    /// Observations sorted for display: most recent first.
    pub fn display_order(&self) -> Vec<Observation> {
        let mut sorted = self.observations.clone();
        sorted.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        sorted
    }

    /// Validates the observation's severity and appends it to the end of the
    /// insertion-ordered sequence. The only fallible operation on a history:
    /// a severity outside [1, 10] is a contract violation by whoever produced
    /// the score, and nothing is appended.
    pub fn record(&self, observation: Observation) -> Result<(Self, Observation), AnalysisError> {
        if !(SEVERITY_MIN..=SEVERITY_MAX).contains(&observation.severity) {
            return Err(AnalysisError::InvalidSeverity(observation.severity));
        }

        let mut observations = self.observations.clone();
        observations.push(observation.clone());
        Ok((Self { observations }, observation))
    }

    /// Removes the observation with the given id. Absent ids are a no-op,
    /// not an error; the input comes back unchanged.
    pub fn remove(&self, id: &str) -> Self {
        let observations = self
            .observations
            .iter()
            .filter(|obs| obs.id != id)
            .cloned()
            .collect();
        Self { observations }
    }

    /// Arithmetic mean of all severities, rounded to one decimal place.
    /// An empty history reads 0.0 on the dashboard rather than erroring.
    pub fn average(&self) -> f64 {
        if self.observations.is_empty() {
            return 0.0;
        }

        let sum: u32 = self
            .observations
            .iter()
            .map(|obs| u32::from(obs.severity))
            .sum();
        let mean = f64::from(sum) / self.observations.len() as f64;
        (mean * 10.0).round() / 10.0
    }

    /// Qualitative direction from comparing the earliest and latest
    /// observation only. A single early outlier anchors the result for the
    /// life of the history; that matches the product's existing behavior and
    /// is kept as-is rather than swapped for a windowed comparison.
    pub fn trend(&self) -> Trend {
        let (Some(first), Some(last)) = (self.observations.first(), self.observations.last())
        else {
            return Trend::Stable;
        };

        if self.observations.len() < 2 {
            return Trend::Stable;
        }

        if last.severity > first.severity {
            Trend::Increasing
        } else if last.severity < first.severity {
            Trend::Decreasing
        } else {
            Trend::Stable
        }
    }

    /// The summary line stored on a new observation, computed over the
    /// history as it will look once `severity` has been appended.
    pub fn projected_summary(&self, severity: u8) -> String {
        let mut severities: Vec<u8> = self.observations.iter().map(|obs| obs.severity).collect();
        severities.push(severity);

        let sum: u32 = severities.iter().map(|s| u32::from(*s)).sum();
        let mean = f64::from(sum) / severities.len() as f64;
        // A first-ever observation reads as a plain integer; once there is a
        // history the average always carries one decimal.
        let average = if severities.len() == 1 {
            severity.to_string()
        } else {
            format!("{:.1}", (mean * 10.0).round() / 10.0)
        };

        let trend = if severities.len() < 2 {
            Trend::Stable
        } else if severities[severities.len() - 1] > severities[0] {
            Trend::Increasing
        } else if severities[severities.len() - 1] < severities[0] {
            Trend::Decreasing
        } else {
            Trend::Stable
        };

        format!(
            "Average severity: {average}/10. Overall trend: {}.",
            trend.as_str()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, Utc};

    fn observation(id: &str, severity: u8, offset_secs: i64) -> Observation {
        Observation {
            id: id.to_string(),
            subject_uid: "subject-1".to_string(),
            severity,
            summary: "test".to_string(),
            image_ref: format!("photos/subject-1/{id}.png"),
            file_name: format!("{id}.png"),
            phash: None,
            created_at: Utc::now() + Duration::seconds(offset_secs),
        }
    }

    fn history_of(severities: &[u8]) -> SeverityHistory {
        let observations = severities
            .iter()
            .enumerate()
            .map(|(i, s)| observation(&format!("obs-{i}"), *s, i as i64))
            .collect();
        SeverityHistory::new(observations)
    }

    #[test]
    fn average_of_empty_history_is_zero() {
        assert_eq!(SeverityHistory::default().average(), 0.0);
    }

    #[test]
    fn average_of_single_observation_is_that_severity() {
        for s in 1..=10 {
            assert_eq!(history_of(&[s]).average(), f64::from(s));
        }
    }

    #[test]
    fn average_rounds_to_one_decimal() {
        // (2 + 4 + 9) / 3 = 5.0
        assert_eq!(history_of(&[2, 4, 9]).average(), 5.0);
        // (1 + 1 + 2) / 3 = 1.333...
        assert_eq!(history_of(&[1, 1, 2]).average(), 1.3);
    }

    #[test]
    fn average_is_order_independent_but_trend_is_not() {
        let forward = history_of(&[3, 5, 7]);
        let reversed = history_of(&[7, 5, 3]);

        assert_eq!(forward.average(), reversed.average());
        assert_eq!(forward.trend(), Trend::Increasing);
        assert_eq!(reversed.trend(), Trend::Decreasing);
    }

    #[test]
    fn trend_compares_first_and_last_only() {
        assert_eq!(history_of(&[3, 5, 7]).trend(), Trend::Increasing);
        assert_eq!(history_of(&[7, 5, 3]).trend(), Trend::Decreasing);
        assert_eq!(history_of(&[5]).trend(), Trend::Stable);
        assert_eq!(history_of(&[5, 5]).trend(), Trend::Stable);
        assert_eq!(SeverityHistory::default().trend(), Trend::Stable);
        // Middle values never matter.
        assert_eq!(history_of(&[2, 9, 1, 2]).trend(), Trend::Stable);
    }

    #[test]
    fn record_rejects_out_of_range_severity() {
        let history = history_of(&[5]);

        for bad in [0, 11, 200] {
            let err = history
                .record(observation("bad", bad, 10))
                .expect_err("severity outside 1-10 must be rejected");
            assert_eq!(err, AnalysisError::InvalidSeverity(bad));
        }

        assert!(history.record(observation("lo", 1, 10)).is_ok());
        assert!(history.record(observation("hi", 10, 10)).is_ok());
    }

    #[test]
    fn record_appends_at_the_end_without_touching_input() {
        let history = history_of(&[2, 4]);
        let (updated, recorded) = history
            .record(observation("new", 9, 10))
            .expect("valid severity");

        assert_eq!(history.len(), 2);
        assert_eq!(updated.len(), 3);
        assert_eq!(updated.observations().last().unwrap().id, recorded.id);
        assert_eq!(updated.trend(), Trend::Increasing);
        assert_eq!(updated.average(), 5.0);
    }

    #[test]
    fn remove_of_unknown_id_returns_history_unchanged() {
        let history = history_of(&[3, 5, 7]);
        let updated = history.remove("no-such-id");
        assert_eq!(updated, history);
        assert_eq!(updated.len(), 3);
    }

    #[test]
    fn record_then_remove_round_trips() {
        let history = history_of(&[2, 4, 9]);
        let (updated, recorded) = history
            .record(observation("extra", 6, 10))
            .expect("valid severity");
        assert_eq!(updated.remove(&recorded.id), history);
    }

    #[test]
    fn display_order_is_most_recent_first() {
        let history = history_of(&[3, 5, 7]);
        let display = history.display_order();

        assert_eq!(display.len(), 3);
        assert!(display[0].created_at >= display[1].created_at);
        assert!(display[1].created_at >= display[2].created_at);
        // Insertion order remains oldest first.
        assert_eq!(history.observations()[0].severity, 3);
    }

    #[test]
    fn projected_summary_includes_the_new_severity() {
        let history = history_of(&[2, 4]);
        assert_eq!(
            history.projected_summary(9),
            "Average severity: 5.0/10. Overall trend: increasing."
        );
        assert_eq!(
            SeverityHistory::default().projected_summary(7),
            "Average severity: 7/10. Overall trend: stable."
        );
    }
}
