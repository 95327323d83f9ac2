use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Advisory label describing how many races back a team's adjusted speed.
///
/// Used for display emphasis only; it never affects sort order or filtering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConfidenceTier {
    High,
    Medium,
    Low,
}

impl ConfidenceTier {
    pub fn from_sample_count(sample_count: u32) -> Self {
        match sample_count {
            10.. => ConfidenceTier::High,
            5..=9 => ConfidenceTier::Medium,
            _ => ConfidenceTier::Low,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            ConfidenceTier::High => "high",
            ConfidenceTier::Medium => "medium",
            ConfidenceTier::Low => "low",
        }
    }
}

impl fmt::Display for ConfidenceTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Movement of a team between the previous ranking snapshot and this one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "delta", rename_all = "snake_case")]
pub enum RankChange {
    /// No previous snapshot was supplied, so movement is unknown.
    Unavailable,
    /// A previous snapshot was supplied but the team was not in it.
    New,
    /// `previous_rank - current_rank`: positive is an improvement.
    Moved(i64),
}

impl RankChange {
    pub fn between(previous_supplied: bool, previous_rank: Option<u32>, current_rank: u32) -> Self {
        match (previous_supplied, previous_rank) {
            (false, _) => RankChange::Unavailable,
            (true, None) => RankChange::New,
            (true, Some(previous)) => RankChange::Moved(previous as i64 - current_rank as i64),
        }
    }

    /// The numeric delta, if one exists. `None` never means "no change".
    pub fn delta(&self) -> Option<i64> {
        match self {
            RankChange::Moved(delta) => Some(*delta),
            RankChange::Unavailable | RankChange::New => None,
        }
    }

    pub fn trend(&self) -> Trend {
        match self {
            RankChange::Unavailable => Trend::Unknown,
            RankChange::New => Trend::New,
            RankChange::Moved(delta) if *delta > 0 => Trend::Up,
            RankChange::Moved(delta) if *delta < 0 => Trend::Down,
            RankChange::Moved(_) => Trend::Same,
        }
    }
}

/// Direction of rank movement, for leaderboard display.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Trend {
    Up,
    Down,
    Same,
    New,
    Unknown,
}

impl Trend {
    pub fn symbol(&self) -> &'static str {
        match self {
            Trend::Up => "↑",
            Trend::Down => "↓",
            Trend::New => "★",
            Trend::Same | Trend::Unknown => "",
        }
    }
}

/// One team's row in a ranking table.
///
/// Rows are always produced by the ranking engine from a result set; they are
/// never edited in place.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TeamRanking {
    pub team_name: String,
    pub boat_class: String,
    pub rank: u32,
    pub adjusted_speed: Option<f64>, // None when the team has no usable timed result
    pub sample_count: u32,
    pub previous_rank: Option<u32>,
    pub rank_change: RankChange,
    pub last_calculated_at: DateTime<Utc>,
}

impl TeamRanking {
    pub fn confidence(&self) -> ConfidenceTier {
        ConfidenceTier::from_sample_count(self.sample_count)
    }
}

/// An ordered ranking for one boat class at one point in time.
///
/// Serialized tables are fed back into the engine as the previous snapshot of
/// the next run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RankingTable {
    pub boat_class: String,
    pub calculated_at: DateTime<Utc>,
    pub rankings: Vec<TeamRanking>,
}

impl RankingTable {
    pub fn rank_of(&self, team_name: &str) -> Option<u32> {
        self.rankings
            .iter()
            .find(|r| r.team_name == team_name)
            .map(|r| r.rank)
    }

    pub fn is_empty(&self) -> bool {
        self.rankings.is_empty()
    }

    pub fn len(&self) -> usize {
        self.rankings.len()
    }
}
