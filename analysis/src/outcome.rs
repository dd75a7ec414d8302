use crate::sides::{self, Phase};
use crate::{EndReason, MatchData, MatchTeam, Round, Side};

/// Counters for one team's rounds within a single match.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct TeamRoundStats {
    pub rounds_played: usize,
    pub round_wins: usize,
    pub pistol_rounds: usize,
    pub pistol_wins: usize,
    pub t_side_rounds: usize,
    pub ct_side_rounds: usize,
    pub plants: usize,
    pub detonations: usize,
    pub defuses: usize,
    pub time_outs: usize,
    pub total_kills: usize,
    pub first_half_wins: usize,
    pub second_half_wins: usize,
    pub overtime_wins: usize,
}

pub fn aggregate(rounds: &[Round], starting_side: Side) -> TeamRoundStats {
    let mut stats = TeamRoundStats::default();

    for round in rounds {
        let side = sides::side_for_round(starting_side, round.number);

        stats.rounds_played += 1;
        stats.total_kills += round.total_kills as usize;
        match side {
            Side::T => stats.t_side_rounds += 1,
            Side::CT => stats.ct_side_rounds += 1,
        };

        let won = round.winner == side;
        if won {
            stats.round_wins += 1;
            match Phase::of(round.number) {
                Phase::FirstHalf => stats.first_half_wins += 1,
                Phase::SecondHalf => stats.second_half_wins += 1,
                Phase::Overtime => stats.overtime_wins += 1,
            };
        }

        if sides::is_pistol_round(round.number) {
            stats.pistol_rounds += 1;
            if won {
                stats.pistol_wins += 1;
            }
        }

        if side == Side::T && round.bomb_planted {
            stats.plants += 1;
        }
        if side == Side::T && round.reason == EndReason::TargetBombed {
            stats.detonations += 1;
        }
        if side == Side::CT && round.reason == EndReason::BombDefused {
            stats.defuses += 1;
        }
        // Counted for both teams, not attributed to a side.
        if round.reason == EndReason::TargetSaved {
            stats.time_outs += 1;
        }
    }

    stats
}

impl TeamRoundStats {
    pub fn win_rate(&self) -> f64 {
        ratio(self.round_wins, self.rounds_played)
    }

    pub fn pistol_win_rate(&self) -> f64 {
        ratio(self.pistol_wins, self.pistol_rounds)
    }

    pub fn plant_rate(&self) -> f64 {
        ratio(self.plants, self.t_side_rounds)
    }

    pub fn detonation_rate(&self) -> f64 {
        ratio(self.detonations, self.t_side_rounds)
    }

    pub fn defuse_rate(&self) -> f64 {
        ratio(self.defuses, self.ct_side_rounds)
    }

    pub fn avg_kills(&self) -> f64 {
        ratio(self.total_kills, self.rounds_played)
    }

    pub fn merge(&mut self, other: &TeamRoundStats) {
        self.rounds_played += other.rounds_played;
        self.round_wins += other.round_wins;
        self.pistol_rounds += other.pistol_rounds;
        self.pistol_wins += other.pistol_wins;
        self.t_side_rounds += other.t_side_rounds;
        self.ct_side_rounds += other.ct_side_rounds;
        self.plants += other.plants;
        self.detonations += other.detonations;
        self.defuses += other.defuses;
        self.time_outs += other.time_outs;
        self.total_kills += other.total_kills;
        self.first_half_wins += other.first_half_wins;
        self.second_half_wins += other.second_half_wins;
        self.overtime_wins += other.overtime_wins;
    }
}

/// Rate with the zero-denominator policy: nothing played means a rate of 0,
/// never NaN or a division error.
pub fn ratio(numerator: usize, denominator: usize) -> f64 {
    if denominator == 0 {
        0.0
    } else {
        numerator as f64 / denominator as f64
    }
}

/// Rounds won from this team's perspective.
pub fn derived_score(rounds: &[Round], starting_side: Side) -> usize {
    rounds
        .iter()
        .filter(|round| round.winner == sides::side_for_round(starting_side, round.number))
        .count()
}

/// Stored manual override wins over the round-derived score.
pub fn display_score(team: &MatchTeam, rounds: &[Round]) -> usize {
    match team.score {
        Some(score) => score as usize,
        None => derived_score(rounds, team.starting_side),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
pub struct MatchBreakdown {
    pub team_a: TeamRoundStats,
    pub team_b: TeamRoundStats,
    pub overtime_rounds: usize,
}

/// Both teams' tallies over the same rounds, for score lines like
/// `(7:5) (6:6) (4:2)`.
pub fn breakdown(data: &MatchData) -> MatchBreakdown {
    MatchBreakdown {
        team_a: aggregate(&data.rounds, data.team_a.starting_side),
        team_b: aggregate(&data.rounds, data.team_b.starting_side),
        overtime_rounds: data
            .rounds
            .iter()
            .filter(|round| Phase::of(round.number) == Phase::Overtime)
            .count(),
    }
}
