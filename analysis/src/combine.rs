use crate::outcome;
use crate::MatchData;

#[derive(Debug, PartialEq, Eq, thiserror::Error)]
pub enum CombineError {
    #[error("no demo parts to combine")]
    NoParts,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
pub enum Winner {
    TeamA,
    TeamB,
}

/// Merge sequentially recorded demo parts of one match into a single record.
///
/// The caller passes `parts` in part order; all parts share the same teams
/// and map. Part 1 provides the match metadata; rounds are concatenated and
/// renumbered from 1, since the per-part numbering restarts in every file
/// and is meaningless for side resolution. Scores are then rederived against
/// the combined numbering.
#[tracing::instrument(skip(parts), fields(count = parts.len()))]
pub fn combine(mut parts: Vec<MatchData>) -> Result<MatchData, CombineError> {
    if parts.is_empty() {
        return Err(CombineError::NoParts);
    }
    if parts.len() == 1 {
        return Ok(parts.pop().expect("checked len"));
    }

    let mut combined = parts.remove(0);

    let mut rounds = std::mem::take(&mut combined.rounds);
    for part in parts {
        rounds.extend(part.rounds);
    }
    for (idx, round) in rounds.iter_mut().enumerate() {
        round.number = idx as u32 + 1;
    }

    let team_a_score = outcome::derived_score(&rounds, combined.team_a.starting_side);
    let team_b_score = rounds.len() - team_a_score;
    combined.team_a.score = Some(team_a_score as u32);
    combined.team_b.score = Some(team_b_score as u32);
    combined.rounds = rounds;

    tracing::debug!(
        "Combined demo parts: {} {} - {} {}",
        combined.team_a.name,
        team_a_score,
        team_b_score,
        combined.team_b.name
    );

    Ok(combined)
}

/// Team with the higher display score; equal scores leave the match without
/// a winner, which is a legitimate state rather than an error.
pub fn winner(data: &MatchData) -> Option<Winner> {
    let team_a = outcome::display_score(&data.team_a, &data.rounds);
    let team_b = outcome::display_score(&data.team_b, &data.rounds);

    match team_a.cmp(&team_b) {
        std::cmp::Ordering::Greater => Some(Winner::TeamA),
        std::cmp::Ordering::Less => Some(Winner::TeamB),
        std::cmp::Ordering::Equal => None,
    }
}
