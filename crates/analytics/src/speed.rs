use core_types::RaceResult;

/// Converts a finish time over a distance into an average speed in m/s.
///
/// A non-positive (or non-finite) time or distance yields `0.0`. A returned zero
/// means "no usable speed" and must not be read as a boat that stood still.
pub fn estimate_speed(time_seconds: f64, distance_meters: f64) -> f64 {
    if !(time_seconds > 0.0 && time_seconds.is_finite()) {
        return 0.0;
    }
    if !(distance_meters > 0.0 && distance_meters.is_finite()) {
        return 0.0;
    }
    distance_meters / time_seconds
}

/// The usable speed of a single result, if it has one.
///
/// Place-only results and results that hit the zero-speed guard return `None`.
pub fn result_speed(result: &RaceResult) -> Option<f64> {
    let time = result.finish_time_seconds?;
    let speed = estimate_speed(time, result.distance_meters);
    (speed > 0.0).then_some(speed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    #[test]
    fn speed_is_distance_over_time() {
        assert_eq!(estimate_speed(400.0, 2000.0), 5.0);
        assert_eq!(estimate_speed(100.0, 520.0), 5.2);
    }

    #[test]
    fn non_positive_time_yields_zero() {
        assert_eq!(estimate_speed(0.0, 2000.0), 0.0);
        assert_eq!(estimate_speed(-12.0, 2000.0), 0.0);
        assert_eq!(estimate_speed(f64::NAN, 2000.0), 0.0);
        assert_eq!(estimate_speed(f64::INFINITY, 2000.0), 0.0);
    }

    #[test]
    fn non_positive_distance_yields_zero() {
        assert_eq!(estimate_speed(400.0, 0.0), 0.0);
    }

    #[test]
    fn speed_is_positive_and_decreasing_in_time() {
        let distance = 2000.0;
        let mut last = f64::INFINITY;
        for step in 1..5000 {
            let time = step as f64 * 0.5;
            let speed = estimate_speed(time, distance);
            assert!(speed > 0.0);
            assert!(speed < last, "speed must fall as time grows (t = {time})");
            last = speed;
        }
    }

    #[test]
    fn result_speed_ignores_place_only_results() {
        let mut result = RaceResult {
            race_id: "r1".to_string(),
            team_name: "Acme".to_string(),
            boat_class: "8+".to_string(),
            distance_meters: 2000.0,
            finish_time_seconds: None,
            place: Some(3),
            is_own_team: false,
            recorded_at: Utc.with_ymd_and_hms(2024, 5, 1, 9, 0, 0).unwrap(),
        };
        assert_eq!(result_speed(&result), None);

        result.finish_time_seconds = Some(400.0);
        assert_eq!(result_speed(&result), Some(5.0));
    }
}
