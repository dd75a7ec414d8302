use analysis::combine::{self, CombineError, Winner};
use analysis::{EndReason, MatchData, MatchTeam, Round, Side};
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
        total_kills: 6,
        first_kill: winner,
    }
}

fn part(rounds: Vec<Round>) -> MatchData {
    MatchData {
        map_name: "Nuke".to_owned(),
        date: "12/01/2025".to_owned(),
        duration: "50m".to_owned(),
        team_a: MatchTeam {
            name: "Imperial".to_owned(),
            starting_side: Side::CT,
            score: None,
            logo: None,
        },
        team_b: MatchTeam {
            name: "Shinden".to_owned(),
            starting_side: Side::T,
            score: None,
            logo: None,
        },
        rounds,
    }
}

#[test]
fn no_parts_is_an_error() {
    assert_eq!(Err(CombineError::NoParts), combine::combine(Vec::new()));
}

#[test]
fn single_part_is_returned_unchanged() {
    let data = part((1..=21).map(|n| round(n, Side::CT)).collect());

    let combined = combine::combine(vec![data.clone()]).unwrap();

    assert_eq!(data, combined);
}

#[test]
fn parts_are_concatenated_and_renumbered_from_one() {
    // Recording split mid-match: the second file restarts its numbering.
    let part_one = part((1..=12).map(|n| round(n, Side::CT)).collect());
    let part_two = part((1..=15).map(|n| round(n, Side::T)).collect());

    let combined = combine::combine(vec![part_one, part_two]).unwrap();

    let numbers: Vec<u32> = combined.rounds.iter().map(|r| r.number).collect();
    let expected: Vec<u32> = (1..=27).collect();
    assert_eq!(expected, numbers);
}

#[test]
fn scores_are_rederived_against_the_combined_numbering() {
    // All of part one goes to CT, all of part two to T. After renumbering,
    // team A (starting CT) is CT for rounds 1-12, T for 13-24 and 25-27.
    let part_one = part((1..=12).map(|n| round(n, Side::CT)).collect());
    let part_two = part((1..=15).map(|n| round(n, Side::T)).collect());

    let combined = combine::combine(vec![part_one, part_two]).unwrap();

    assert_eq!(Some(27), combined.team_a.score);
    assert_eq!(Some(0), combined.team_b.score);
    assert_eq!(Some(Winner::TeamA), combine::winner(&combined));
}

#[test]
fn side_swap_inside_a_later_part_is_honoured() {
    // Part two covers rounds 13+ where team A has swapped to T, so CT wins
    // there belong to team B. The naive compare against the starting side
    // would credit them to team A.
    let part_one = part((1..=12).map(|n| round(n, Side::CT)).collect());
    let part_two = part((1..=12).map(|n| round(n, Side::CT)).collect());

    let combined = combine::combine(vec![part_one, part_two]).unwrap();

    assert_eq!(Some(12), combined.team_a.score);
    assert_eq!(Some(12), combined.team_b.score);
}

#[test]
fn equal_scores_leave_the_winner_undetermined() {
    let part_one = part((1..=12).map(|n| round(n, Side::CT)).collect());
    let part_two = part((1..=12).map(|n| round(n, Side::CT)).collect());

    let combined = combine::combine(vec![part_one, part_two]).unwrap();

    assert_eq!(None, combine::winner(&combined));
}

#[test]
fn winner_respects_manual_score_overrides() {
    let mut data = part((1..=12).map(|n| round(n, Side::CT)).collect());
    assert_eq!(Some(Winner::TeamA), combine::winner(&data));

    data.team_a.score = Some(3);
    data.team_b.score = Some(13);
    assert_eq!(Some(Winner::TeamB), combine::winner(&data));
}

#[test]
fn three_part_overtime_match() {
    let part_one = part((1..=10).map(|n| round(n, Side::CT)).collect());
    let part_two = part((1..=10).map(|n| round(n, Side::T)).collect());
    let part_three = part((1..=10).map(|n| round(n, Side::T)).collect());

    let combined = combine::combine(vec![part_one, part_two, part_three]).unwrap();

    assert_eq!(30, combined.rounds.len());
    // Rounds 1-10 CT wins: team A. Rounds 11-12 T wins: team B. Rounds 13-24
    // T wins while team A plays T: team A. Overtime 25-27 (team A on T): team
    // A again; 28-30 (team A back on CT): team B.
    assert_eq!(Some(10 + 12 + 3), combined.team_a.score);
    assert_eq!(Some(2 + 3), combined.team_b.score);
}
