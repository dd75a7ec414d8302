use analysis::sides::{self, Phase, HALF_LENGTH};
use analysis::Side;
use pretty_assertions::assert_eq;

#[test]
fn defined_and_complementary_for_both_teams() {
    for starting in [Side::CT, Side::T] {
        for round_number in 1..=100 {
            let own = sides::side_for_round(starting, round_number);
            let opponent = sides::side_for_round(starting.opposite(), round_number);

            assert_eq!(
                own,
                opponent.opposite(),
                "round {} from {:?} start",
                round_number,
                starting
            );
        }
    }
}

#[test]
fn half_boundaries() {
    assert_eq!(Side::CT, sides::side_for_round(Side::CT, 1));
    assert_eq!(Side::CT, sides::side_for_round(Side::CT, 12));
    assert_eq!(Side::T, sides::side_for_round(Side::CT, 13));
    assert_eq!(Side::T, sides::side_for_round(Side::CT, 24));
}

#[test]
fn overtime_keeps_second_half_sides_then_swaps_every_three() {
    // First OT block: 25-27 continue the second-half side, 28-30 swap back.
    assert_eq!(Side::T, sides::side_for_round(Side::CT, 25));
    assert_eq!(Side::T, sides::side_for_round(Side::CT, 26));
    assert_eq!(Side::T, sides::side_for_round(Side::CT, 27));
    assert_eq!(Side::CT, sides::side_for_round(Side::CT, 28));
    assert_eq!(Side::CT, sides::side_for_round(Side::CT, 29));
    assert_eq!(Side::CT, sides::side_for_round(Side::CT, 30));

    // Second OT block repeats the pattern.
    assert_eq!(Side::T, sides::side_for_round(Side::CT, 31));
    assert_eq!(Side::CT, sides::side_for_round(Side::CT, 34));
    assert_eq!(Side::CT, sides::side_for_round(Side::T, 31));
    assert_eq!(Side::T, sides::side_for_round(Side::T, 34));
}

#[test]
fn phases() {
    assert_eq!(Phase::FirstHalf, Phase::of(1));
    assert_eq!(Phase::FirstHalf, Phase::of(HALF_LENGTH));
    assert_eq!(Phase::SecondHalf, Phase::of(HALF_LENGTH + 1));
    assert_eq!(Phase::SecondHalf, Phase::of(HALF_LENGTH * 2));
    assert_eq!(Phase::Overtime, Phase::of(HALF_LENGTH * 2 + 1));
    assert_eq!(Phase::Overtime, Phase::of(40));
}

#[test]
fn pistol_rounds_are_one_and_thirteen() {
    let pistols: Vec<u32> = (1..=40).filter(|n| sides::is_pistol_round(*n)).collect();
    assert_eq!(vec![1, 13], pistols);
}
