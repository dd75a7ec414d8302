use crate::Side;

/// Rounds per regulation half in the MR12 format.
pub const HALF_LENGTH: u32 = 12;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    FirstHalf,
    SecondHalf,
    Overtime,
}

impl Phase {
    pub fn of(round_number: u32) -> Self {
        if round_number <= HALF_LENGTH {
            Phase::FirstHalf
        } else if round_number <= HALF_LENGTH * 2 {
            Phase::SecondHalf
        } else {
            Phase::Overtime
        }
    }
}

/// Which side a team occupies in `round_number`, given the side it started
/// the match on.
///
/// Overtime keeps the second-half sides for its first 3 rounds, then swaps
/// every 3 rounds, so each 6-round block is split 3+3.
pub fn side_for_round(starting: Side, round_number: u32) -> Side {
    match Phase::of(round_number) {
        Phase::FirstHalf => starting,
        Phase::SecondHalf => starting.opposite(),
        Phase::Overtime => {
            let ot_index = round_number - HALF_LENGTH * 2 - 1;
            let offset_in_block = ot_index % 6;
            if offset_in_block < 3 {
                starting.opposite()
            } else {
                starting
            }
        }
    }
}

/// Rounds 1 and 13 are played on starting-pistol economy.
pub fn is_pistol_round(round_number: u32) -> bool {
    round_number == 1 || round_number == HALF_LENGTH + 1
}
