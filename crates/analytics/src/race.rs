use core_types::RaceResult;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// A boat's finishing position within one race, with its gaps to the boats around it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FinishMargin {
    pub team_name: String,
    pub position: u32,
    pub finish_time_seconds: Option<f64>,
    /// Seconds behind the winner; `None` for the winner and for untimed boats.
    pub behind_leader_seconds: Option<f64>,
    /// Seconds ahead of the next boat; `None` when either boat is untimed.
    pub ahead_of_next_seconds: Option<f64>,
}

impl FinishMargin {
    /// A short caption in the style of a result card.
    pub fn caption(&self) -> String {
        match (self.position, self.ahead_of_next_seconds, self.behind_leader_seconds) {
            (1, Some(ahead), _) => format!("Won by {:.1}s", ahead),
            (_, _, Some(behind)) if self.position > 1 => format!("{:.1}s behind leader", behind),
            _ => String::new(),
        }
    }
}

/// Orders the finishers of a single race and derives the gaps between them.
///
/// Timed boats come first by time; untimed boats follow by recorded place.
/// Ties keep input order.
pub fn race_margins(results: &[RaceResult], race_id: &str) -> Vec<FinishMargin> {
    let mut finishers: Vec<&RaceResult> = results.iter().filter(|r| r.race_id == race_id).collect();
    finishers.sort_by(|x, y| finish_order(x, y));

    let leader_time = finishers.first().and_then(|r| r.finish_time_seconds);

    finishers
        .iter()
        .enumerate()
        .map(|(index, result)| {
            let time = result.finish_time_seconds;
            let next_time = finishers.get(index + 1).and_then(|next| next.finish_time_seconds);
            let behind_leader_seconds = match (index, time, leader_time) {
                (0, _, _) => None,
                (_, Some(t), Some(lead)) => Some(t - lead),
                _ => None,
            };
            FinishMargin {
                team_name: result.team_name.clone(),
                position: index as u32 + 1,
                finish_time_seconds: time,
                behind_leader_seconds,
                ahead_of_next_seconds: time.zip(next_time).map(|(t, next)| next - t),
            }
        })
        .collect()
}

fn finish_order(x: &RaceResult, y: &RaceResult) -> Ordering {
    match (x.finish_time_seconds, y.finish_time_seconds) {
        (Some(tx), Some(ty)) => tx.partial_cmp(&ty).unwrap_or(Ordering::Equal),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => match (x.place, y.place) {
            (Some(px), Some(py)) => px.cmp(&py),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => Ordering::Equal,
        },
    }
}

/// English ordinal for a finishing place: 1st, 2nd, 3rd, 4th, 11th, 21st.
pub fn ordinal(place: u32) -> String {
    let suffix = match (place % 10, place % 100) {
        (1, n) if n != 11 => "st",
        (2, n) if n != 12 => "nd",
        (3, n) if n != 13 => "rd",
        _ => "th",
    };
    format!("{}{}", place, suffix)
}
