//! Learner progress shown on the dashboard.
//!
//! Progress is not tracked yet, so the dashboard shows a fixed snapshot.

use crate::models::Level;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LevelStatus {
    Completed,
    InProgress,
    Locked,
}

impl LevelStatus {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Completed => "Completed",
            Self::InProgress => "In Progress",
            Self::Locked => "Locked",
        }
    }
}

#[derive(Debug, Clone)]
pub struct Topic {
    pub name: &'static str,
    pub completed: bool,
}

/// Scores are percentages.
#[derive(Debug, Clone)]
pub struct ProgressSummary {
    pub grammar: u8,
    pub vocabulary: u8,
    pub speaking: u8,
    pub streak_days: u32,
    pub topics: Vec<Topic>,
    pub levels: Vec<(Level, LevelStatus)>,
}

impl ProgressSummary {
    pub fn sample() -> Self {
        Self {
            grammar: 89,
            vocabulary: 75,
            speaking: 92,
            streak_days: 7,
            topics: vec![
                Topic { name: "Basic Conversations", completed: true },
                Topic { name: "Grammar Fundamentals", completed: true },
                Topic { name: "Vocabulary Building", completed: false },
                Topic { name: "Advanced Speaking", completed: false },
            ],
            levels: vec![
                (Level::Beginner, LevelStatus::Completed),
                (Level::Intermediate, LevelStatus::InProgress),
                (Level::Advanced, LevelStatus::Locked),
            ],
        }
    }

    pub fn scores(&self) -> [(&'static str, u8); 3] {
        [
            ("Grammar", self.grammar),
            ("Vocabulary", self.vocabulary),
            ("Speaking", self.speaking),
        ]
    }

    pub fn total_score(&self) -> u8 {
        total_score(&[self.grammar, self.vocabulary, self.speaking])
    }

    pub fn topics_completed(&self) -> usize {
        self.topics.iter().filter(|t| t.completed).count()
    }
}

/// Mean of percentage scores, rounded to the nearest whole percent.
pub fn total_score(scores: &[u8]) -> u8 {
    if scores.is_empty() {
        return 0;
    }
    let sum: u32 = scores.iter().map(|&s| u32::from(s)).sum();
    let max = scores.len() as f64 * 100.0;
    (f64::from(sum) / max * 100.0).round() as u8
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sample_total_is_rounded_mean() {
        assert_eq!(ProgressSummary::sample().total_score(), 85);
    }

    #[test]
    fn total_score_edges() {
        assert_eq!(total_score(&[]), 0);
        assert_eq!(total_score(&[100, 100]), 100);
        assert_eq!(total_score(&[0, 1]), 1);
        assert_eq!(total_score(&[50]), 50);
    }

    #[test]
    fn sample_has_two_completed_topics() {
        let summary = ProgressSummary::sample();
        assert_eq!(summary.topics_completed(), 2);
        assert_eq!(summary.levels[1], (Level::Intermediate, LevelStatus::InProgress));
    }
}
