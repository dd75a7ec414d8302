use analysis::{outcome, EndReason, MatchData, MatchTeam, Round, Side};
use pretty_assertions::assert_eq;

fn round(number: u32, winner: Side) -> Round {
    Round {
        number,
        winner,
        reason: match winner {
            Side::CT => EndReason::TerroristsEliminated,
            Side::T => EndReason::CtsEliminated,
        },
        duration: "1:45".to_owned(),
        bomb_planted: false,
        total_kills: 5,
        first_kill: winner,
    }
}

fn team(name: &str, starting_side: Side) -> MatchTeam {
    MatchTeam {
        name: name.to_owned(),
        starting_side,
        score: None,
        logo: None,
    }
}

fn match_data(rounds: Vec<Round>) -> MatchData {
    MatchData {
        map_name: "Mirage".to_owned(),
        date: "12/01/2025".to_owned(),
        duration: "46m".to_owned(),
        team_a: team("Imperial", Side::CT),
        team_b: team("Shinden", Side::T),
        rounds,
    }
}

#[test]
fn empty_rounds_yield_zero_counters_and_zero_rates() {
    let stats = outcome::aggregate(&[], Side::CT);

    assert_eq!(outcome::TeamRoundStats::default(), stats);
    assert_eq!(0.0, stats.win_rate());
    assert_eq!(0.0, stats.pistol_win_rate());
    assert_eq!(0.0, stats.plant_rate());
    assert_eq!(0.0, stats.detonation_rate());
    assert_eq!(0.0, stats.defuse_rate());
    assert_eq!(0.0, stats.avg_kills());
}

#[test]
fn round_wins_of_both_teams_cover_every_round() {
    let rounds: Vec<Round> = (1..=27)
        .map(|n| round(n, if n % 3 == 0 { Side::T } else { Side::CT }))
        .collect();

    let team_a = outcome::aggregate(&rounds, Side::CT);
    let team_b = outcome::aggregate(&rounds, Side::T);

    assert_eq!(rounds.len(), team_a.round_wins + team_b.round_wins);
    assert_eq!(rounds.len(), team_a.rounds_played);
    assert_eq!(rounds.len(), team_b.rounds_played);
}

#[test]
fn first_half_sweep_by_starting_ct_team() {
    let rounds: Vec<Round> = (1..=12).map(|n| round(n, Side::CT)).collect();

    let stats = outcome::aggregate(&rounds, Side::CT);

    assert_eq!(12, stats.round_wins);
    assert_eq!(12, stats.first_half_wins);
    assert_eq!(0, stats.second_half_wins);
    assert_eq!(0, stats.overtime_wins);
    assert_eq!(1.0, stats.win_rate());
}

#[test]
fn pistol_rounds_counted_on_one_and_thirteen() {
    let mut rounds: Vec<Round> = (1..=24).map(|n| round(n, Side::CT)).collect();
    // Round 13 is won by T, which is the CT-starting team after the swap.
    rounds[12].winner = Side::T;
    rounds[12].reason = EndReason::CtsEliminated;

    let stats = outcome::aggregate(&rounds, Side::CT);

    assert_eq!(2, stats.pistol_rounds);
    assert_eq!(2, stats.pistol_wins);

    let opponent = outcome::aggregate(&rounds, Side::T);
    assert_eq!(2, opponent.pistol_rounds);
    assert_eq!(0, opponent.pistol_wins);
}

#[test]
fn objective_counters_follow_the_resolved_side() {
    let rounds = vec![
        // Round 3: the CT-starting team defends, a defused plant is theirs.
        Round {
            number: 3,
            winner: Side::CT,
            reason: EndReason::BombDefused,
            duration: "1:58".to_owned(),
            bomb_planted: true,
            total_kills: 8,
            first_kill: Side::CT,
        },
        // Round 14: after the swap the CT-starting team attacks and detonates.
        Round {
            number: 14,
            winner: Side::T,
            reason: EndReason::TargetBombed,
            duration: "1:31".to_owned(),
            bomb_planted: true,
            total_kills: 7,
            first_kill: Side::T,
        },
        // Round 15: time expires, counted for both teams.
        Round {
            number: 15,
            winner: Side::CT,
            reason: EndReason::TargetSaved,
            duration: "1:55".to_owned(),
            bomb_planted: false,
            total_kills: 3,
            first_kill: Side::CT,
        },
    ];

    let ct_start = outcome::aggregate(&rounds, Side::CT);
    assert_eq!(1, ct_start.defuses);
    assert_eq!(1, ct_start.detonations);
    assert_eq!(1, ct_start.plants);
    assert_eq!(1, ct_start.time_outs);
    assert_eq!(1, ct_start.ct_side_rounds);
    assert_eq!(2, ct_start.t_side_rounds);
    assert_eq!(18, ct_start.total_kills);

    let t_start = outcome::aggregate(&rounds, Side::T);
    assert_eq!(0, t_start.defuses);
    assert_eq!(0, t_start.detonations);
    assert_eq!(1, t_start.plants);
    assert_eq!(1, t_start.time_outs);
}

#[test]
fn display_score_prefers_manual_override() {
    let data = match_data((1..=12).map(|n| round(n, Side::CT)).collect());

    assert_eq!(12, outcome::display_score(&data.team_a, &data.rounds));
    assert_eq!(0, outcome::display_score(&data.team_b, &data.rounds));

    let mut adjusted = data.clone();
    adjusted.team_a.score = Some(9);
    assert_eq!(9, outcome::display_score(&adjusted.team_a, &adjusted.rounds));
}

#[test]
fn breakdown_splits_halves_and_overtime() {
    // 12 CT-won rounds, 12 T-won rounds, then a 4-2 overtime.
    let mut rounds: Vec<Round> = (1..=12).map(|n| round(n, Side::CT)).collect();
    rounds.extend((13..=24).map(|n| round(n, Side::T)));
    rounds.extend((25..=30).map(|n| round(n, if n <= 28 { Side::T } else { Side::CT })));

    let data = match_data(rounds);
    let breakdown = outcome::breakdown(&data);

    assert_eq!(12, breakdown.team_a.first_half_wins);
    assert_eq!(0, breakdown.team_b.first_half_wins);
    // Team A plays T in the second half and keeps winning.
    assert_eq!(12, breakdown.team_a.second_half_wins);
    assert_eq!(0, breakdown.team_b.second_half_wins);
    // OT rounds 25-27 team A is T, 28-30 team A is CT: T,T,T,T,CT,CT winners
    // give team A rounds 25,26,27 plus 29,30.
    assert_eq!(5, breakdown.team_a.overtime_wins);
    assert_eq!(1, breakdown.team_b.overtime_wins);
    assert_eq!(6, breakdown.overtime_rounds);
    assert_eq!(
        data.rounds.len(),
        breakdown.team_a.round_wins + breakdown.team_b.round_wins
    );
}
