use crate::error::AnalyticsError;
use crate::margin::{calculate_margin, MarginResult};
use crate::speed::estimate_speed;
use chrono::{DateTime, Utc};
use core_types::{RaceResult, Side};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::BTreeMap;

/// One race in which both teams took part.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Meeting {
    pub race_id: String,
    pub recorded_at: DateTime<Utc>,
    pub distance_meters: f64,
    /// `None` when the race can't be decided from the recorded data (shared place,
    /// or one boat timed and the other only placed).
    pub winner: Option<Side>,
    /// Present only when both boats have a finish time.
    pub margin: Option<MarginResult>,
}

/// Direct-race record between two teams in one boat class.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HeadToHeadSummary {
    pub team_a: String,
    pub team_b: String,
    pub boat_class: String,
    /// Chronological, oldest first.
    pub meetings: Vec<Meeting>,
}

impl HeadToHeadSummary {
    pub fn is_empty(&self) -> bool {
        self.meetings.is_empty()
    }

    pub fn wins(&self, side: Side) -> usize {
        self.meetings.iter().filter(|m| m.winner == Some(side)).count()
    }

    /// Mean signed time gap over timed meetings; positive means team A was faster.
    pub fn mean_time_delta_seconds(&self) -> Option<f64> {
        let deltas: Vec<f64> = self
            .meetings
            .iter()
            .filter_map(|m| m.margin.as_ref())
            .map(|margin| match margin.leader {
                Side::A => margin.time_delta_seconds,
                Side::B => -margin.time_delta_seconds,
            })
            .collect();

        if deltas.is_empty() {
            return None;
        }
        Some(deltas.iter().sum::<f64>() / deltas.len() as f64)
    }

    pub fn latest(&self) -> Option<&Meeting> {
        self.meetings.last()
    }
}

/// Builds the direct head-to-head record of two teams in one boat class.
///
/// Only races in which both teams recorded a result count. Nothing is inferred
/// through common opponents: two teams that never met produce an empty summary.
///
/// Team names are trimmed and then matched exactly, as the ranking engine groups
/// them; only the boat class code compares case-insensitively.
pub fn head_to_head(
    results: &[RaceResult],
    boat_class: &str,
    team_a: &str,
    team_b: &str,
) -> Result<HeadToHeadSummary, AnalyticsError> {
    let team_a = team_a.trim();
    let team_b = team_b.trim();
    if team_a == team_b {
        return Err(AnalyticsError::SameTeam(team_a.to_string()));
    }

    // race id -> (best entry of A, best entry of B)
    let mut races: BTreeMap<&str, (Option<&RaceResult>, Option<&RaceResult>)> = BTreeMap::new();
    for result in results.iter().filter(|r| r.is_class(boat_class)) {
        let slot = if result.team_name == team_a {
            &mut races.entry(result.race_id.as_str()).or_default().0
        } else if result.team_name == team_b {
            &mut races.entry(result.race_id.as_str()).or_default().1
        } else {
            continue;
        };
        *slot = Some(match slot.take() {
            Some(current) if compare_entries(current, result) != Ordering::Greater => current,
            _ => result,
        });
    }

    let mut meetings: Vec<Meeting> = races
        .into_iter()
        .filter_map(|(race_id, entries)| match entries {
            (Some(a), Some(b)) => Some(meeting(race_id, a, b, team_a, team_b)),
            _ => None,
        })
        .collect();
    meetings.sort_by_key(|m| m.recorded_at);

    tracing::debug!(team_a, team_b, boat_class, meetings = meetings.len(), "Built head-to-head record.");

    Ok(HeadToHeadSummary {
        team_a: team_a.to_string(),
        team_b: team_b.to_string(),
        boat_class: boat_class.trim().to_string(),
        meetings,
    })
}

fn meeting(race_id: &str, a: &RaceResult, b: &RaceResult, team_a: &str, team_b: &str) -> Meeting {
    let recorded_at = a.recorded_at.min(b.recorded_at);
    let distance_meters = a.distance_meters;

    let (winner, margin) = match (a.finish_time_seconds, b.finish_time_seconds) {
        (Some(time_a), Some(time_b)) => {
            let reference_speed = estimate_speed(time_a.min(time_b), distance_meters);
            let margin = calculate_margin(time_a, time_b, reference_speed, team_a, team_b);
            (Some(margin.leader), Some(margin))
        }
        _ => {
            let winner = match (a.place, b.place) {
                (Some(pa), Some(pb)) if pa < pb => Some(Side::A),
                (Some(pa), Some(pb)) if pb < pa => Some(Side::B),
                _ => None,
            };
            (winner, None)
        }
    };

    Meeting {
        race_id: race_id.to_string(),
        recorded_at,
        distance_meters,
        winner,
        margin,
    }
}

/// Orders two entries of the same team in the same race: timed before untimed,
/// then faster time, then better place.
fn compare_entries(x: &RaceResult, y: &RaceResult) -> Ordering {
    match (x.finish_time_seconds, y.finish_time_seconds) {
        (Some(tx), Some(ty)) => tx.partial_cmp(&ty).unwrap_or(Ordering::Equal),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => x.place.cmp(&y.place),
    }
}
