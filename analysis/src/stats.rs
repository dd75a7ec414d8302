use std::collections::HashMap;

use crate::outcome::{self, ratio, TeamRoundStats};
use crate::sides::HALF_LENGTH;
use crate::{EndReason, MatchData};

/// Leaderboards show at most this many groups.
pub const LEADERBOARD_SIZE: usize = 5;

#[derive(Debug, Default, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct MatchFilter {
    /// Map name, compared case-insensitively.
    pub map: Option<String>,
    /// Exact stored team name.
    pub team: Option<String>,
    /// Exact display date.
    pub date: Option<String>,
}

impl MatchFilter {
    pub fn accepts(&self, data: &MatchData) -> bool {
        if let Some(map) = self.map.as_deref() {
            if !data.map_name.eq_ignore_ascii_case(map) {
                return false;
            }
        }
        if let Some(team) = self.team.as_deref() {
            if data.team_a.name != team && data.team_b.name != team {
                return false;
            }
        }
        if let Some(date) = self.date.as_deref() {
            if data.date != date {
                return false;
            }
        }
        true
    }
}

pub fn filtered<'m>(matches: &'m [MatchData], filter: &MatchFilter) -> Vec<&'m MatchData> {
    matches.iter().filter(|data| filter.accepts(data)).collect()
}

#[derive(Debug, Default, Clone, PartialEq, Eq, serde::Serialize)]
pub struct TeamStats {
    pub team_name: String,
    pub matches_played: usize,
    pub match_wins: usize,
    pub match_losses: usize,
    pub rounds: TeamRoundStats,
}

/// Sums the per-match round tallies for every match `team_name` appears in.
///
/// A tie on round wins lands in the loss bucket; only outscoring the
/// opponent counts as a match win.
#[tracing::instrument(skip(matches))]
pub fn team_stats(matches: &[&MatchData], team_name: &str) -> TeamStats {
    let mut stats = TeamStats {
        team_name: team_name.to_owned(),
        ..Default::default()
    };

    for data in matches {
        let starting_side = match data.starting_side_of(team_name) {
            Some(side) => side,
            None => continue,
        };

        stats.matches_played += 1;

        let per_match = outcome::aggregate(&data.rounds, starting_side);
        let opponent_wins = data.rounds.len() - per_match.round_wins;
        if per_match.round_wins > opponent_wins {
            stats.match_wins += 1;
        } else {
            stats.match_losses += 1;
        }
        stats.rounds.merge(&per_match);
    }

    stats
}

#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct Comparison {
    pub team_a: TeamStats,
    pub team_b: TeamStats,
}

pub fn comparison(matches: &[&MatchData], team_a: &str, team_b: &str) -> Comparison {
    Comparison {
        team_a: team_stats(matches, team_a),
        team_b: team_stats(matches, team_b),
    }
}

/// Occurrences of round 1 or round 13 across the filtered matches.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, serde::Serialize)]
pub struct PistolBucket {
    pub rounds: usize,
    pub ct_wins: usize,
    pub t_wins: usize,
    pub plants: usize,
    pub detonations: usize,
    pub defuses: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct RoundTrend {
    pub number: u32,
    pub samples: usize,
    pub kills: usize,
    pub plants: usize,
    pub detonations: usize,
    pub defuses: usize,
    pub time_outs: usize,
}

impl RoundTrend {
    pub fn avg_kills(&self) -> f64 {
        ratio(self.kills, self.samples)
    }
}

/// Side-agnostic aggregate over a filtered match set, the numbers behind the
/// dashboard tiles.
#[derive(Debug, Default, Clone, PartialEq, Eq, serde::Serialize)]
pub struct Overview {
    pub total_matches: usize,
    pub total_rounds: usize,
    pub ct_wins: usize,
    pub t_wins: usize,
    pub total_kills: usize,
    pub plants: usize,
    pub detonations: usize,
    pub defuses: usize,
    pub pistol_round_1: PistolBucket,
    pub pistol_round_13: PistolBucket,
    /// Ascending by round number.
    pub round_trend: Vec<RoundTrend>,
}

impl Overview {
    pub fn ct_win_rate(&self) -> f64 {
        ratio(self.ct_wins, self.total_rounds)
    }

    pub fn t_win_rate(&self) -> f64 {
        ratio(self.t_wins, self.total_rounds)
    }

    pub fn plant_rate(&self) -> f64 {
        ratio(self.plants, self.total_rounds)
    }

    pub fn detonation_rate(&self) -> f64 {
        ratio(self.detonations, self.total_rounds)
    }

    pub fn defuse_rate(&self) -> f64 {
        ratio(self.defuses, self.total_rounds)
    }

    /// Plants that went on to detonate.
    pub fn plant_to_detonation_rate(&self) -> f64 {
        ratio(self.detonations, self.plants)
    }

    pub fn defuse_per_plant_rate(&self) -> f64 {
        ratio(self.defuses, self.plants)
    }

    pub fn avg_kills_per_round(&self) -> f64 {
        ratio(self.total_kills, self.total_rounds)
    }

    pub fn most_detonations(&self) -> Option<(u32, usize)> {
        self.peak(|trend| trend.detonations)
    }

    pub fn most_defuses(&self) -> Option<(u32, usize)> {
        self.peak(|trend| trend.defuses)
    }

    pub fn most_time_outs(&self) -> Option<(u32, usize)> {
        self.peak(|trend| trend.time_outs)
    }

    /// Highest average kills among regulation rounds; small-sample overtime
    /// rounds are excluded.
    pub fn highest_avg_kills(&self) -> Option<(u32, f64)> {
        let mut best: Option<(u32, f64)> = None;
        for trend in self
            .round_trend
            .iter()
            .filter(|trend| trend.number <= HALF_LENGTH * 2)
        {
            let avg = trend.avg_kills();
            if avg > 0.0 && best.map(|(_, value)| avg > value).unwrap_or(true) {
                best = Some((trend.number, avg));
            }
        }
        best
    }

    fn peak<F>(&self, value: F) -> Option<(u32, usize)>
    where
        F: Fn(&RoundTrend) -> usize,
    {
        let mut best: Option<(u32, usize)> = None;
        for trend in self.round_trend.iter() {
            let count = value(trend);
            if count > 0 && best.map(|(_, value)| count > value).unwrap_or(true) {
                best = Some((trend.number, count));
            }
        }
        best
    }
}

#[tracing::instrument(skip(matches))]
pub fn overview(matches: &[&MatchData]) -> Overview {
    let mut result = Overview {
        total_matches: matches.len(),
        ..Default::default()
    };
    let mut trend = HashMap::<u32, RoundTrend>::new();

    for data in matches {
        for round in data.rounds.iter() {
            result.total_rounds += 1;
            result.total_kills += round.total_kills as usize;
            match round.winner {
                crate::Side::CT => result.ct_wins += 1,
                crate::Side::T => result.t_wins += 1,
            };

            if round.bomb_planted {
                result.plants += 1;
            }
            if round.reason == EndReason::TargetBombed {
                result.detonations += 1;
            }
            if round.reason == EndReason::BombDefused {
                result.defuses += 1;
            }

            if round.number == 1 || round.number == HALF_LENGTH + 1 {
                let bucket = if round.number == 1 {
                    &mut result.pistol_round_1
                } else {
                    &mut result.pistol_round_13
                };
                bucket.rounds += 1;
                match round.winner {
                    crate::Side::CT => bucket.ct_wins += 1,
                    crate::Side::T => bucket.t_wins += 1,
                };
                if round.bomb_planted {
                    bucket.plants += 1;
                }
                if round.reason == EndReason::TargetBombed {
                    bucket.detonations += 1;
                }
                if round.reason == EndReason::BombDefused {
                    bucket.defuses += 1;
                }
            }

            let entry = trend.entry(round.number).or_insert_with(|| RoundTrend {
                number: round.number,
                samples: 0,
                kills: 0,
                plants: 0,
                detonations: 0,
                defuses: 0,
                time_outs: 0,
            });
            entry.samples += 1;
            entry.kills += round.total_kills as usize;
            if round.bomb_planted {
                entry.plants += 1;
            }
            match round.reason {
                EndReason::TargetBombed => entry.detonations += 1,
                EndReason::BombDefused => entry.defuses += 1,
                EndReason::TargetSaved => entry.time_outs += 1,
                _ => {}
            };
        }
    }

    let mut round_trend: Vec<RoundTrend> = trend.into_values().collect();
    round_trend.sort_by_key(|entry| entry.number);
    result.round_trend = round_trend;

    result
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LeaderboardMetric {
    Plants,
    Detonations,
    Defuses,
    AvgKills,
}

#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct MapObjectives {
    pub map_name: String,
    pub rounds: usize,
    pub kills: usize,
    pub plants: usize,
    pub detonations: usize,
    pub defuses: usize,
    /// Plants that ended in a detonation.
    pub plants_converted: usize,
}

impl MapObjectives {
    pub fn plant_ratio(&self) -> f64 {
        ratio(self.plants, self.rounds)
    }

    pub fn detonation_ratio(&self) -> f64 {
        ratio(self.detonations, self.rounds)
    }

    pub fn defuse_ratio(&self) -> f64 {
        ratio(self.defuses, self.rounds)
    }

    pub fn plant_conversion(&self) -> f64 {
        ratio(self.plants_converted, self.plants)
    }

    pub fn avg_kills(&self) -> f64 {
        ratio(self.kills, self.rounds)
    }

    fn metric(&self, metric: LeaderboardMetric) -> f64 {
        match metric {
            LeaderboardMetric::Plants => self.plant_ratio(),
            LeaderboardMetric::Detonations => self.detonation_ratio(),
            LeaderboardMetric::Defuses => self.defuse_ratio(),
            LeaderboardMetric::AvgKills => self.avg_kills(),
        }
    }
}

/// Top maps by per-round objective ratio.
///
/// The sort is stable, so tied maps stay in first-seen order, and the result
/// holds at most [`LEADERBOARD_SIZE`] entries without padding.
#[tracing::instrument(skip(matches))]
pub fn map_leaderboard(matches: &[&MatchData], metric: LeaderboardMetric) -> Vec<MapObjectives> {
    let mut order = Vec::<MapObjectives>::new();
    let mut index = HashMap::<String, usize>::new();

    for data in matches {
        let idx = match index.get(&data.map_name) {
            Some(idx) => *idx,
            None => {
                index.insert(data.map_name.clone(), order.len());
                order.push(MapObjectives {
                    map_name: data.map_name.clone(),
                    rounds: 0,
                    kills: 0,
                    plants: 0,
                    detonations: 0,
                    defuses: 0,
                    plants_converted: 0,
                });
                order.len() - 1
            }
        };

        let entry = &mut order[idx];
        for round in data.rounds.iter() {
            entry.rounds += 1;
            entry.kills += round.total_kills as usize;
            if round.bomb_planted {
                entry.plants += 1;
            }
            match round.reason {
                EndReason::TargetBombed => {
                    entry.detonations += 1;
                    if round.bomb_planted {
                        entry.plants_converted += 1;
                    }
                }
                EndReason::BombDefused => entry.defuses += 1,
                _ => {}
            };
        }
    }

    order.sort_by(|a, b| b.metric(metric).total_cmp(&a.metric(metric)));
    order.truncate(LEADERBOARD_SIZE);
    order
}

#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct RoundObjectives {
    pub number: u32,
    pub samples: usize,
    pub kills: usize,
    pub plants: usize,
    pub detonations: usize,
    pub defuses: usize,
}

impl RoundObjectives {
    pub fn avg_kills(&self) -> f64 {
        ratio(self.kills, self.samples)
    }
}

/// Top round numbers by raw objective count, or by average kills for
/// [`LeaderboardMetric::AvgKills`] (regulation rounds 1-24 only).
///
/// Groups are ordered by round number before the stable metric sort, so ties
/// resolve to the lower round number.
#[tracing::instrument(skip(matches))]
pub fn round_leaderboard(matches: &[&MatchData], metric: LeaderboardMetric) -> Vec<RoundObjectives> {
    let mut buckets = HashMap::<u32, RoundObjectives>::new();

    for data in matches {
        for round in data.rounds.iter() {
            let entry = buckets.entry(round.number).or_insert_with(|| RoundObjectives {
                number: round.number,
                samples: 0,
                kills: 0,
                plants: 0,
                detonations: 0,
                defuses: 0,
            });
            entry.samples += 1;
            entry.kills += round.total_kills as usize;
            if round.bomb_planted {
                entry.plants += 1;
            }
            match round.reason {
                EndReason::TargetBombed => entry.detonations += 1,
                EndReason::BombDefused => entry.defuses += 1,
                _ => {}
            };
        }
    }

    let mut order: Vec<RoundObjectives> = buckets.into_values().collect();
    order.sort_by_key(|entry| entry.number);

    match metric {
        LeaderboardMetric::Plants => order.sort_by(|a, b| b.plants.cmp(&a.plants)),
        LeaderboardMetric::Detonations => order.sort_by(|a, b| b.detonations.cmp(&a.detonations)),
        LeaderboardMetric::Defuses => order.sort_by(|a, b| b.defuses.cmp(&a.defuses)),
        LeaderboardMetric::AvgKills => {
            order.retain(|entry| entry.number <= HALF_LENGTH * 2);
            order.sort_by(|a, b| b.avg_kills().total_cmp(&a.avg_kills()));
        }
    };

    order.truncate(LEADERBOARD_SIZE);
    order
}
