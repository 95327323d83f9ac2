use crate::error::CoreError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A single boat's finish in a single race, as accepted by the engine.
///
/// Values of this type have passed ingestion validation: the distance is
/// positive, any finish time is positive, any place is at least 1, and at least
/// one of `finish_time_seconds` and `place` is present.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RaceResult {
    pub race_id: String,
    pub team_name: String,
    pub boat_class: String,
    pub distance_meters: f64,
    pub finish_time_seconds: Option<f64>,
    pub place: Option<u32>,
    #[serde(default)]
    pub is_own_team: bool,
    pub recorded_at: DateTime<Utc>,
}

impl RaceResult {
    /// True when this result belongs to the given boat class (codes compare case-insensitively).
    pub fn is_class(&self, boat_class: &str) -> bool {
        self.boat_class.trim().eq_ignore_ascii_case(boat_class.trim())
    }
}

/// A race result exactly as an external producer (CSV import, API) hands it over.
///
/// Nothing is trusted here; convert with `RaceResult::try_from` to validate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RaceResultRecord {
    pub race_id: String,
    pub team_name: String,
    pub boat_class: String,
    pub distance_meters: f64,
    #[serde(default)]
    pub finish_time_seconds: Option<f64>,
    #[serde(default)]
    pub place: Option<u32>,
    #[serde(default)]
    pub is_own_team: bool,
    pub recorded_at: DateTime<Utc>,
}

impl TryFrom<RaceResultRecord> for RaceResult {
    type Error = CoreError;

    fn try_from(record: RaceResultRecord) -> Result<Self, Self::Error> {
        let race_id = non_blank("raceId", &record.race_id)?;
        let team_name = non_blank("teamName", &record.team_name)?;
        let boat_class = non_blank("boatClass", &record.boat_class)?;

        if !(record.distance_meters.is_finite() && record.distance_meters > 0.0) {
            return Err(CoreError::invalid(
                "distanceMeters",
                format!("must be a positive number, got {}", record.distance_meters),
            ));
        }

        if let Some(time) = record.finish_time_seconds {
            if !(time.is_finite() && time > 0.0) {
                return Err(CoreError::invalid(
                    "finishTimeSeconds",
                    format!("must be a positive number, got {}", time),
                ));
            }
        }

        if record.place == Some(0) {
            return Err(CoreError::invalid("place", "must be 1 or greater"));
        }

        if record.finish_time_seconds.is_none() && record.place.is_none() {
            return Err(CoreError::invalid(
                "result",
                "either finishTimeSeconds or place is required",
            ));
        }

        Ok(RaceResult {
            race_id,
            team_name,
            boat_class,
            distance_meters: record.distance_meters,
            finish_time_seconds: record.finish_time_seconds,
            place: record.place,
            is_own_team: record.is_own_team,
            recorded_at: record.recorded_at,
        })
    }
}

fn non_blank(field: &str, value: &str) -> Result<String, CoreError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(CoreError::invalid(field, "must not be blank"));
    }
    Ok(trimmed.to_string())
}

/// A record that failed validation, with its position in the submitted batch.
#[derive(Debug, Clone, PartialEq)]
pub struct RejectedRecord {
    pub index: usize,
    pub error: CoreError,
}

/// Outcome of validating a batch of raw records.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct IngestReport {
    pub accepted: Vec<RaceResult>,
    pub rejected: Vec<RejectedRecord>,
}

/// Validates a batch of raw records at the ingestion boundary.
///
/// Invalid records are reported individually; they never abort the batch.
pub fn validate_records(records: Vec<RaceResultRecord>) -> IngestReport {
    let mut report = IngestReport::default();

    for (index, record) in records.into_iter().enumerate() {
        match RaceResult::try_from(record) {
            Ok(result) => report.accepted.push(result),
            Err(error) => {
                tracing::warn!(index, %error, "Rejected race result at ingestion.");
                report.rejected.push(RejectedRecord { index, error });
            }
        }
    }

    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn record() -> RaceResultRecord {
        RaceResultRecord {
            race_id: "henley-2024-final".to_string(),
            team_name: " Acme ".to_string(),
            boat_class: "8+".to_string(),
            distance_meters: 2000.0,
            finish_time_seconds: Some(360.0),
            place: Some(1),
            is_own_team: true,
            recorded_at: Utc.with_ymd_and_hms(2024, 5, 1, 10, 0, 0).unwrap(),
        }
    }

    #[test]
    fn accepts_valid_record_and_trims_names() {
        let result = RaceResult::try_from(record()).unwrap();
        assert_eq!(result.team_name, "Acme");
        assert_eq!(result.finish_time_seconds, Some(360.0));
    }

    #[test]
    fn accepts_place_only_and_time_only_records() {
        let mut place_only = record();
        place_only.finish_time_seconds = None;
        assert!(RaceResult::try_from(place_only).is_ok());

        let mut time_only = record();
        time_only.place = None;
        assert!(RaceResult::try_from(time_only).is_ok());
    }

    #[test]
    fn rejects_record_with_neither_time_nor_place() {
        let mut bad = record();
        bad.finish_time_seconds = None;
        bad.place = None;
        let err = RaceResult::try_from(bad).unwrap_err();
        assert!(matches!(err, CoreError::InvalidInput(field, _) if field == "result"));
    }

    #[test]
    fn rejects_non_positive_numbers() {
        let mut bad_distance = record();
        bad_distance.distance_meters = 0.0;
        assert!(RaceResult::try_from(bad_distance).is_err());

        let mut bad_time = record();
        bad_time.finish_time_seconds = Some(-1.0);
        assert!(RaceResult::try_from(bad_time).is_err());

        let mut nan_time = record();
        nan_time.finish_time_seconds = Some(f64::NAN);
        assert!(RaceResult::try_from(nan_time).is_err());

        let mut zero_place = record();
        zero_place.place = Some(0);
        assert!(RaceResult::try_from(zero_place).is_err());
    }

    #[test]
    fn rejects_blank_team() {
        let mut bad = record();
        bad.team_name = "   ".to_string();
        let err = RaceResult::try_from(bad).unwrap_err();
        assert_eq!(err, CoreError::invalid("teamName", "must not be blank"));
    }

    #[test]
    fn batch_validation_keeps_good_records() {
        let mut bad = record();
        bad.place = None;
        bad.finish_time_seconds = None;

        let report = validate_records(vec![record(), bad, record()]);
        assert_eq!(report.accepted.len(), 2);
        assert_eq!(report.rejected.len(), 1);
        assert_eq!(report.rejected[0].index, 1);
    }

    #[test]
    fn deserializes_camel_case_json() {
        let json = r#"{
            "raceId": "r1",
            "teamName": "Acme",
            "boatClass": "4+",
            "distanceMeters": 1500,
            "place": 2,
            "recordedAt": "2024-05-01T10:00:00Z"
        }"#;
        let record: RaceResultRecord = serde_json::from_str(json).unwrap();
        assert_eq!(record.finish_time_seconds, None);
        assert!(!record.is_own_team);
        assert!(RaceResult::try_from(record).is_ok());
    }

    #[test]
    fn class_match_is_case_insensitive() {
        let result = RaceResult::try_from(record()).unwrap();
        assert!(result.is_class("8+"));
        assert!(!result.is_class("4+"));
    }
}
