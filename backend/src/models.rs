use diesel::prelude::*;

#[derive(Queryable, Selectable, Debug, Clone)]
#[diesel(table_name = crate::schema::matches)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct MatchRow {
    pub match_id: String,
    pub map_name: String,
    pub match_date: String,
    pub duration: String,
    pub created_at: chrono::NaiveDateTime,
}

#[derive(Insertable, Debug, Clone)]
#[diesel(table_name = crate::schema::matches)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct NewMatch {
    pub match_id: String,
    pub map_name: String,
    pub match_date: String,
    pub duration: String,
}

#[derive(Queryable, Selectable, Insertable, Debug, Clone)]
#[diesel(table_name = crate::schema::match_teams)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct MatchTeamRow {
    pub match_id: String,
    pub slot: i16,
    pub name: String,
    pub starting_side: String,
    pub score: Option<i16>,
    pub logo: Option<String>,
}

#[derive(Queryable, Selectable, Insertable, Debug, Clone)]
#[diesel(table_name = crate::schema::match_rounds)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct MatchRoundRow {
    pub match_id: String,
    pub round_number: i16,
    pub winner_side: String,
    pub end_reason: String,
    pub round_duration: String,
    pub bomb_planted: bool,
    pub total_kills: i16,
    pub first_kill_side: String,
}

#[derive(Queryable, Selectable, Debug, Clone)]
#[diesel(table_name = crate::schema::processing_status)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct ProcessingStatusRow {
    pub upload_id: String,
    pub file_name: String,
    pub state: i16,
    pub detail: Option<String>,
    pub created_at: chrono::NaiveDateTime,
}

#[derive(Insertable, Debug, Clone)]
#[diesel(table_name = crate::schema::processing_status)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct NewProcessingStatus {
    pub upload_id: String,
    pub file_name: String,
    pub state: i16,
    pub detail: Option<String>,
}

/// `processing_status.state` values.
pub mod import_state {
    pub const QUEUED: i16 = 0;
    pub const PROCESSING: i16 = 1;
    pub const COMPLETED: i16 = 2;
    pub const ERROR: i16 = 3;
}

#[derive(Queryable, Selectable, Insertable, Debug)]
#[diesel(table_name = crate::schema::sessions)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct Session {
    pub id: String,
    pub username: Option<String>,
    pub role: Option<String>,
    pub expiry_date: String,
}

#[derive(Queryable, Selectable, Insertable, Debug)]
#[diesel(table_name = crate::schema::users)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct User {
    pub username: String,
    pub role: String,
}

pub fn side_to_db(side: analysis::Side) -> &'static str {
    match side {
        analysis::Side::CT => "CT",
        analysis::Side::T => "T",
    }
}

pub fn side_from_db(raw: &str) -> Option<analysis::Side> {
    match raw {
        "CT" => Some(analysis::Side::CT),
        "T" => Some(analysis::Side::T),
        _ => None,
    }
}

/// Rows for one freshly imported match.
pub fn match_rows(
    match_id: &str,
    data: &analysis::MatchData,
) -> (NewMatch, Vec<MatchTeamRow>, Vec<MatchRoundRow>) {
    let row = NewMatch {
        match_id: match_id.to_owned(),
        map_name: data.map_name.clone(),
        match_date: data.date.clone(),
        duration: data.duration.clone(),
    };

    let teams = [(0, &data.team_a), (1, &data.team_b)]
        .into_iter()
        .map(|(slot, team)| MatchTeamRow {
            match_id: match_id.to_owned(),
            slot,
            name: team.name.clone(),
            starting_side: side_to_db(team.starting_side).to_owned(),
            score: team.score.map(|score| score as i16),
            logo: team.logo.clone(),
        })
        .collect();

    let rounds = data
        .rounds
        .iter()
        .map(|round| MatchRoundRow {
            match_id: match_id.to_owned(),
            round_number: round.number as i16,
            winner_side: side_to_db(round.winner).to_owned(),
            end_reason: round.reason.label().to_owned(),
            round_duration: round.duration.clone(),
            bomb_planted: round.bomb_planted,
            total_kills: round.total_kills as i16,
            first_kill_side: side_to_db(round.first_kill).to_owned(),
        })
        .collect();

    (row, teams, rounds)
}

/// Rebuilds the in-memory match from its rows. `None` when the stored data
/// is unusable (missing team slots, unknown side or end-reason labels), so a
/// partially written match degrades to being excluded instead of failing the
/// whole query.
pub fn assemble_match(
    row: &MatchRow,
    teams: &[MatchTeamRow],
    rounds: &[MatchRoundRow],
) -> Option<analysis::MatchData> {
    let team = |slot: i16| -> Option<analysis::MatchTeam> {
        let team_row = teams.iter().find(|team| team.slot == slot)?;
        Some(analysis::MatchTeam {
            name: team_row.name.clone(),
            starting_side: side_from_db(&team_row.starting_side)?,
            score: team_row.score.map(|score| score as u32),
            logo: team_row.logo.clone(),
        })
    };

    let team_a = team(0)?;
    let team_b = team(1)?;

    let mut round_data = Vec::with_capacity(rounds.len());
    for round in rounds {
        round_data.push(analysis::Round {
            number: round.round_number as u32,
            winner: side_from_db(&round.winner_side)?,
            reason: analysis::EndReason::from_label(&round.end_reason)?,
            duration: round.round_duration.clone(),
            bomb_planted: round.bomb_planted,
            total_kills: round.total_kills as u32,
            first_kill: side_from_db(&round.first_kill_side)?,
        });
    }
    round_data.sort_by_key(|round| round.number);

    Some(analysis::MatchData {
        map_name: row.map_name.clone(),
        date: row.match_date.clone(),
        duration: row.duration.clone(),
        team_a,
        team_b,
        rounds: round_data,
    })
}
