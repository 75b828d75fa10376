use serde::{Deserialize, Serialize};
use std::fmt;

/// The six pipeline stages, in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StageId {
    Intake,
    Semantic,
    Interview,
    Human,
    Memory,
    Recommendation,
}

impl StageId {
    pub const ALL: [StageId; 6] = [
        StageId::Intake,
        StageId::Semantic,
        StageId::Interview,
        StageId::Human,
        StageId::Memory,
        StageId::Recommendation,
    ];

    pub fn index(self) -> usize {
        self as usize
    }

    /// Name the stage signs its audit entries with.
    pub fn agent_name(self) -> &'static str {
        match self {
            StageId::Intake => "Data Ingestion",
            StageId::Semantic => "Semantic Matcher",
            StageId::Interview => "Screening Interview",
            StageId::Human => "Human-in-Loop",
            StageId::Memory => "Memory & Learning",
            StageId::Recommendation => "Final Recommendation",
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            StageId::Intake => "intake",
            StageId::Semantic => "semantic",
            StageId::Interview => "interview",
            StageId::Human => "human",
            StageId::Memory => "memory",
            StageId::Recommendation => "recommendation",
        }
    }
}

impl fmt::Display for StageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum StageStatus {
    #[default]
    Idle,
    Processing,
    NeedsReview,
    Completed,
}

impl StageStatus {
    fn rank(self) -> u8 {
        match self {
            StageStatus::Idle => 0,
            StageStatus::Processing | StageStatus::NeedsReview => 1,
            StageStatus::Completed => 2,
        }
    }
}

/// Per-stage status board. Transitions only move forward.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct StageBoard {
    statuses: [StageStatus; 6],
}

impl StageBoard {
    pub fn get(&self, stage: StageId) -> StageStatus {
        self.statuses[stage.index()]
    }

    /// Returns false (and leaves the board untouched) for a backward move or
    /// for `NeedsReview` on anything but the human stage.
    pub fn advance(&mut self, stage: StageId, next: StageStatus) -> bool {
        if next == StageStatus::NeedsReview && stage != StageId::Human {
            return false;
        }
        let current = self.statuses[stage.index()];
        if next.rank() <= current.rank() && next != current {
            return false;
        }
        self.statuses[stage.index()] = next;
        true
    }

    pub fn completed(&self) -> usize {
        self.statuses
            .iter()
            .filter(|s| **s == StageStatus::Completed)
            .count()
    }

    /// Share of completed stages, 0.0..=100.0.
    pub fn progress_percent(&self) -> f32 {
        self.completed() as f32 / StageId::ALL.len() as f32 * 100.0
    }

    pub fn iter(&self) -> impl Iterator<Item = (StageId, StageStatus)> + '_ {
        StageId::ALL.iter().map(|s| (*s, self.get(*s)))
    }
}

impl Serialize for StageBoard {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        use serde::ser::SerializeMap;
        let mut map = serializer.serialize_map(Some(StageId::ALL.len()))?;
        for (stage, status) in self.iter() {
            map.serialize_entry(stage.as_str(), &status)?;
        }
        map.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn board_never_moves_backward() {
        let mut board = StageBoard::default();
        assert!(board.advance(StageId::Intake, StageStatus::Processing));
        assert!(board.advance(StageId::Intake, StageStatus::Completed));
        assert!(!board.advance(StageId::Intake, StageStatus::Processing));
        assert_eq!(board.get(StageId::Intake), StageStatus::Completed);
    }

    #[test]
    fn needs_review_only_on_human_stage() {
        let mut board = StageBoard::default();
        assert!(!board.advance(StageId::Semantic, StageStatus::NeedsReview));
        assert!(board.advance(StageId::Human, StageStatus::NeedsReview));
        assert!(board.advance(StageId::Human, StageStatus::Completed));
    }

    #[test]
    fn progress_counts_completed_stages() {
        let mut board = StageBoard::default();
        assert_eq!(board.progress_percent(), 0.0);
        board.advance(StageId::Intake, StageStatus::Completed);
        board.advance(StageId::Semantic, StageStatus::Completed);
        board.advance(StageId::Interview, StageStatus::Completed);
        assert_eq!(board.completed(), 3);
        assert!((board.progress_percent() - 50.0).abs() < f32::EPSILON);
    }
}
