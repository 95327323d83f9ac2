use crate::error::AnalyticsError;
use crate::report::{RankChange, RankingTable, TeamRanking};
use crate::speed::result_speed;
use chrono::{DateTime, Utc};
use core_types::{AggregationRule, RaceResult};
use std::cmp::Ordering;
use std::collections::{BTreeMap, HashMap};

/// A stateless calculator that turns a result history into a ranking table.
///
/// The engine holds only its aggregation rule. Every call is a pure function of
/// its arguments, so a table can always be rebuilt from the authoritative
/// result store.
#[derive(Debug, Clone, Copy, Default)]
pub struct RankingEngine {
    rule: AggregationRule,
}

/// The best timed performance a team produced in one race.
#[derive(Debug, Clone, Copy)]
struct RaceSample {
    speed: f64,
    distance_meters: f64,
}

/// Everything gathered for one team before ranking.
#[derive(Debug)]
struct TeamSamples {
    team_name: String,
    boat_class: String,
    // Keyed by race id. BTreeMap keeps the summation order independent of input order.
    races: BTreeMap<String, RaceSample>,
}

impl RankingEngine {
    pub fn new(rule: AggregationRule) -> Self {
        Self { rule }
    }

    pub fn rule(&self) -> AggregationRule {
        self.rule
    }

    /// The main entry point for ranking a boat class.
    ///
    /// # Arguments
    ///
    /// * `boat_class` - The class to rank. Results for other classes are ignored.
    /// * `results` - The validated result history.
    /// * `previous` - The last published table for this class, if any. Without it
    ///   every row reports `RankChange::Unavailable`.
    /// * `calculated_at` - Timestamp stamped on every row.
    ///
    /// # Returns
    ///
    /// The ordered `RankingTable`, which is empty when the class has no results.
    pub fn rank(
        &self,
        boat_class: &str,
        results: &[RaceResult],
        previous: Option<&RankingTable>,
        calculated_at: DateTime<Utc>,
    ) -> Result<RankingTable, AnalyticsError> {
        if let Some(snapshot) = previous {
            if !snapshot.boat_class.trim().eq_ignore_ascii_case(boat_class.trim()) {
                return Err(AnalyticsError::SnapshotMismatch {
                    expected: boat_class.to_string(),
                    found: snapshot.boat_class.clone(),
                });
            }
        }

        let teams = self.collect_samples(boat_class, results);

        let mut scored: Vec<(TeamSamples, Option<f64>)> = teams
            .into_iter()
            .map(|team| {
                let speed = self.aggregate(&team.races);
                tracing::debug!(
                    team = %team.team_name,
                    races = team.races.len(),
                    adjusted_speed = ?speed,
                    "Aggregated team speed."
                );
                (team, speed)
            })
            .collect();

        // Stable sort: equal speeds and all speedless teams keep first-appearance order.
        scored.sort_by(|(_, a), (_, b)| compare_speeds(*a, *b));

        let rankings: Vec<TeamRanking> = scored
            .into_iter()
            .enumerate()
            .map(|(index, (team, adjusted_speed))| {
                let rank = index as u32 + 1;
                let previous_rank = previous.and_then(|p| p.rank_of(&team.team_name));
                TeamRanking {
                    sample_count: team.races.len() as u32,
                    team_name: team.team_name,
                    boat_class: team.boat_class,
                    rank,
                    adjusted_speed,
                    previous_rank,
                    rank_change: RankChange::between(previous.is_some(), previous_rank, rank),
                    last_calculated_at: calculated_at,
                }
            })
            .collect();

        tracing::info!(
            boat_class,
            teams = rankings.len(),
            unranked = rankings.iter().filter(|r| r.adjusted_speed.is_none()).count(),
            rule = ?self.rule,
            "Calculated rankings."
        );

        Ok(RankingTable {
            boat_class: boat_class.trim().to_string(),
            calculated_at,
            rankings,
        })
    }

    /// Groups the class's results by team, in order of first appearance.
    fn collect_samples(&self, boat_class: &str, results: &[RaceResult]) -> Vec<TeamSamples> {
        let mut teams: Vec<TeamSamples> = Vec::new();
        let mut index_by_name: HashMap<&str, usize> = HashMap::new();

        for result in results.iter().filter(|r| r.is_class(boat_class)) {
            let index = *index_by_name
                .entry(result.team_name.as_str())
                .or_insert_with(|| {
                    teams.push(TeamSamples {
                        team_name: result.team_name.clone(),
                        boat_class: result.boat_class.clone(),
                        races: BTreeMap::new(),
                    });
                    teams.len() - 1
                });

            let Some(speed) = result_speed(result) else {
                continue;
            };

            // A team with several boats in one race is represented by its fastest.
            teams[index]
                .races
                .entry(result.race_id.clone())
                .and_modify(|sample| {
                    if speed > sample.speed {
                        *sample = RaceSample { speed, distance_meters: result.distance_meters };
                    }
                })
                .or_insert(RaceSample { speed, distance_meters: result.distance_meters });
        }

        teams
    }

    /// Applies the configured aggregation rule. `None` when there are no samples.
    fn aggregate(&self, races: &BTreeMap<String, RaceSample>) -> Option<f64> {
        if races.is_empty() {
            return None;
        }

        match self.rule {
            AggregationRule::ArithmeticMean => {
                let sum: f64 = races.values().map(|s| s.speed).sum();
                Some(sum / races.len() as f64)
            }
            AggregationRule::DistanceWeighted => {
                let total_distance: f64 = races.values().map(|s| s.distance_meters).sum();
                let weighted: f64 = races.values().map(|s| s.speed * s.distance_meters).sum();
                Some(weighted / total_distance)
            }
        }
    }
}

/// Orders faster teams first and teams without a speed last.
fn compare_speeds(a: Option<f64>, b: Option<f64>) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => b.partial_cmp(&a).unwrap_or(Ordering::Equal),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(day: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 5, day, 9, 0, 0).unwrap()
    }

    fn timed(race: &str, team: &str, distance: f64, time: f64) -> RaceResult {
        RaceResult {
            race_id: race.to_string(),
            team_name: team.to_string(),
            boat_class: "8+".to_string(),
            distance_meters: distance,
            finish_time_seconds: Some(time),
            place: None,
            is_own_team: false,
            recorded_at: at(1),
        }
    }

    fn place_only(race: &str, team: &str, place: u32) -> RaceResult {
        RaceResult {
            finish_time_seconds: None,
            place: Some(place),
            ..timed(race, team, 2000.0, 1.0)
        }
    }

    fn assert_close(actual: f64, expected: f64) {
        assert!((actual - expected).abs() < 1e-9, "{actual} != {expected}");
    }

    #[test]
    fn empty_history_gives_empty_table() {
        let table = RankingEngine::default().rank("8+", &[], None, at(2)).unwrap();
        assert!(table.is_empty());
        assert_eq!(table.boat_class, "8+");
    }

    #[test]
    fn ranks_by_descending_adjusted_speed() {
        let results = vec![
            timed("r1", "TeamA", 500.0, 100.0),
            timed("r2", "TeamB", 520.0, 100.0),
            timed("r3", "TeamC", 480.0, 100.0),
        ];
        let table = RankingEngine::default().rank("8+", &results, None, at(2)).unwrap();

        let order: Vec<(&str, u32)> = table
            .rankings
            .iter()
            .map(|r| (r.team_name.as_str(), r.rank))
            .collect();
        assert_eq!(order, vec![("TeamB", 1), ("TeamA", 2), ("TeamC", 3)]);
        assert_eq!(table.rankings[0].adjusted_speed, Some(5.2));
        assert_eq!(table.rankings[0].last_calculated_at, at(2));
    }

    #[test]
    fn team_without_speed_ranks_last_regardless_of_input_order() {
        let results = vec![
            place_only("r0", "TeamD", 1),
            timed("r1", "TeamA", 500.0, 100.0),
            timed("r2", "TeamB", 520.0, 100.0),
            timed("r3", "TeamC", 480.0, 100.0),
        ];
        let table = RankingEngine::default().rank("8+", &results, None, at(2)).unwrap();

        let last = &table.rankings[3];
        assert_eq!(last.team_name, "TeamD");
        assert_eq!(last.rank, 4);
        assert_eq!(last.adjusted_speed, None);
        assert_eq!(last.sample_count, 0);
    }

    #[test]
    fn speedless_teams_keep_input_order() {
        let results = vec![
            place_only("r1", "Zulu", 2),
            place_only("r1", "Alpha", 1),
            timed("r2", "Mike", 2000.0, 400.0),
        ];
        let table = RankingEngine::default().rank("8+", &results, None, at(2)).unwrap();
        let names: Vec<&str> = table.rankings.iter().map(|r| r.team_name.as_str()).collect();
        assert_eq!(names, vec!["Mike", "Zulu", "Alpha"]);
    }

    #[test]
    fn arithmetic_mean_over_distinct_races() {
        let results = vec![
            timed("r1", "Acme", 2000.0, 400.0), // 5.0
            timed("r2", "Acme", 1000.0, 250.0), // 4.0
            timed("r3", "Acme", 1500.0, 250.0), // 6.0
        ];
        let table = RankingEngine::default().rank("8+", &results, None, at(2)).unwrap();
        assert_close(table.rankings[0].adjusted_speed.unwrap(), 5.0);
        assert_eq!(table.rankings[0].sample_count, 3);
    }

    #[test]
    fn distance_weighted_mean() {
        let results = vec![
            timed("r1", "Acme", 2000.0, 400.0), // 5.0 over 2000
            timed("r2", "Acme", 1000.0, 250.0), // 4.0 over 1000
        ];
        let engine = RankingEngine::new(AggregationRule::DistanceWeighted);
        let table = engine.rank("8+", &results, None, at(2)).unwrap();
        // (5.0 * 2000 + 4.0 * 1000) / 3000
        assert_close(table.rankings[0].adjusted_speed.unwrap(), 14.0 / 3.0);
    }

    #[test]
    fn fastest_entry_represents_a_team_in_one_race() {
        let results = vec![
            timed("r1", "Acme", 2000.0, 400.0), // 5.0
            timed("r1", "Acme", 2000.0, 500.0), // 4.0, second boat
        ];
        let table = RankingEngine::default().rank("8+", &results, None, at(2)).unwrap();
        assert_eq!(table.rankings[0].sample_count, 1);
        assert_eq!(table.rankings[0].adjusted_speed, Some(5.0));
    }

    #[test]
    fn other_boat_classes_are_ignored() {
        let mut four = timed("r9", "Bravo", 2000.0, 380.0);
        four.boat_class = "4+".to_string();
        let results = vec![timed("r1", "Acme", 2000.0, 400.0), four];
        let table = RankingEngine::default().rank("8+", &results, None, at(2)).unwrap();
        assert_eq!(table.len(), 1);
        assert_eq!(table.rankings[0].team_name, "Acme");
    }

    #[test]
    fn rank_change_against_previous_snapshot() {
        let engine = RankingEngine::default();
        let first = engine
            .rank(
                "8+",
                &[
                    timed("r1", "A", 2000.0, 380.0),
                    timed("r1", "B", 2000.0, 390.0),
                    timed("r1", "C", 2000.0, 400.0),
                ],
                None,
                at(1),
            )
            .unwrap();
        assert!(first.rankings.iter().all(|r| r.rank_change == RankChange::Unavailable));

        let second = engine
            .rank(
                "8+",
                &[
                    timed("r2", "C", 2000.0, 370.0),
                    timed("r2", "A", 2000.0, 375.0),
                    timed("r2", "B", 2000.0, 376.0),
                    timed("r2", "D", 2000.0, 420.0),
                ],
                Some(&first),
                at(8),
            )
            .unwrap();

        let row = |name: &str| second.rankings.iter().find(|r| r.team_name == name).unwrap();
        assert_eq!(row("C").previous_rank, Some(3));
        assert_eq!(row("C").rank_change, RankChange::Moved(2));
        assert_eq!(row("A").rank_change, RankChange::Moved(-1));
        assert_eq!(row("B").rank_change, RankChange::Moved(-1));
        assert_eq!(row("D").rank_change, RankChange::New);
    }

    #[test]
    fn snapshot_for_another_class_is_rejected() {
        let engine = RankingEngine::default();
        let previous = RankingTable { boat_class: "4+".to_string(), calculated_at: at(1), rankings: vec![] };
        let err = engine.rank("8+", &[], Some(&previous), at(2)).unwrap_err();
        assert!(matches!(err, AnalyticsError::SnapshotMismatch { .. }));
    }
}
