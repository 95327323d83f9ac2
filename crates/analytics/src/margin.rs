use core_types::{shell_length_for, ShellClass, Side};
use rust_decimal::prelude::*;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

// Exclusive upper bounds, in boat lengths, of each margin label.
pub const DEAD_HEAT_MAX: f64 = 0.10;
pub const CANVAS_MAX: f64 = 0.25;
pub const QUARTER_LENGTH_MAX: f64 = 0.50;
pub const HALF_LENGTH_MAX: f64 = 1.0;

/// The gap between two boats, derived from their finish times and a reference speed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MarginResult {
    pub distance_meters: f64,
    pub time_delta_seconds: f64,
    pub leader: Side,
    pub faster_name: String,
    pub slower_name: String,
}

/// How a margin should be presented.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MarginDisplay {
    /// Sport terminology: "Canvas", "1/2 length", "2.3 lengths".
    #[default]
    Qualitative,
    /// Exact seconds and boat lengths.
    Exact,
}

/// Computes the margin between boat A and boat B.
///
/// The distance gap assumes the leader held `reference_speed` over the whole
/// time delta, which is how race margins are conventionally reported. Equal
/// times resolve to boat A as the leader.
pub fn calculate_margin(
    time_a: f64,
    time_b: f64,
    reference_speed: f64,
    name_a: &str,
    name_b: &str,
) -> MarginResult {
    let time_delta_seconds = (time_a - time_b).abs();
    let speed = if reference_speed > 0.0 { reference_speed } else { 0.0 };

    let leader = if time_b < time_a { Side::B } else { Side::A };
    let (faster_name, slower_name) = match leader {
        Side::A => (name_a, name_b),
        Side::B => (name_b, name_a),
    };

    MarginResult {
        distance_meters: time_delta_seconds * speed,
        time_delta_seconds,
        leader,
        faster_name: faster_name.to_string(),
        slower_name: slower_name.to_string(),
    }
}

/// Converts a distance gap into shell lengths of the given class.
///
/// Unrecognised class codes use the 10.0 m default shell length.
pub fn boat_lengths(distance_meters: f64, boat_class: &str) -> f64 {
    distance_meters / shell_length_for(boat_class)
}

/// Strict variant of [`boat_lengths`] for callers that hold a parsed class.
pub fn boat_lengths_for(distance_meters: f64, class: ShellClass) -> f64 {
    distance_meters / class.length_meters()
}

/// Buckets a margin in boat lengths into its conventional label.
///
/// Margins of a full length or more are shown with one decimal, truncated
/// toward zero ("2.35" becomes "2.3 lengths").
pub fn format_margin(boat_lengths: f64) -> String {
    if boat_lengths < DEAD_HEAT_MAX {
        "Dead heat".to_string()
    } else if boat_lengths < CANVAS_MAX {
        "Canvas".to_string()
    } else if boat_lengths < QUARTER_LENGTH_MAX {
        "1/4 length".to_string()
    } else if boat_lengths < HALF_LENGTH_MAX {
        "1/2 length".to_string()
    } else {
        format!("{} lengths", one_decimal_truncated(boat_lengths))
    }
}

fn one_decimal_truncated(value: f64) -> String {
    match Decimal::from_f64(value) {
        Some(d) => {
            let mut truncated = d.round_dp_with_strategy(1, RoundingStrategy::ToZero);
            truncated.rescale(1);
            truncated.to_string()
        }
        // Out of Decimal range; only reachable with absurd inputs.
        None => format!("{:.1}", value),
    }
}

impl MarginResult {
    /// The margin in shell lengths for the given class code.
    pub fn boat_lengths(&self, boat_class: &str) -> f64 {
        boat_lengths(self.distance_meters, boat_class)
    }

    /// Renders this margin in either display mode.
    ///
    /// Both modes read the same stored fields, so toggling never recomputes anything.
    pub fn render(&self, mode: MarginDisplay, boat_class: &str) -> String {
        let lengths = self.boat_lengths(boat_class);
        match mode {
            MarginDisplay::Qualitative => format_margin(lengths),
            MarginDisplay::Exact => {
                format!("{:.2}s ({:.2} lengths)", self.time_delta_seconds, lengths)
            }
        }
    }
}
