//! Persistence operations for match records and the import queue state.

use std::collections::HashMap;

use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::models::{
    MatchRoundRow, MatchRow, MatchTeamRow, NewProcessingStatus, ProcessingStatusRow,
};

#[derive(Debug, thiserror::Error)]
pub enum InsertError {
    #[error("database error: {0}")]
    Diesel(#[from] diesel::result::Error),
    #[error("only {found} of {expected} rounds were persisted")]
    RoundCount { expected: usize, found: usize },
}

/// All matches with their teams and rounds, newest first. Matches whose
/// stored rows cannot be assembled are skipped so one corrupt record does
/// not take the dashboards down.
#[tracing::instrument(skip(con))]
pub async fn load_matches(
    con: &mut diesel_async::AsyncPgConnection,
) -> Result<Vec<(String, analysis::MatchData)>, diesel::result::Error> {
    let match_rows: Vec<MatchRow> = crate::schema::matches::dsl::matches
        .order(crate::schema::matches::dsl::created_at.desc())
        .select(MatchRow::as_select())
        .load(con)
        .await?;
    let team_rows: Vec<MatchTeamRow> = crate::schema::match_teams::dsl::match_teams
        .select(MatchTeamRow::as_select())
        .load(con)
        .await?;
    let round_rows: Vec<MatchRoundRow> = crate::schema::match_rounds::dsl::match_rounds
        .select(MatchRoundRow::as_select())
        .load(con)
        .await?;

    let mut teams_by_match = HashMap::<String, Vec<MatchTeamRow>>::new();
    for team in team_rows {
        teams_by_match
            .entry(team.match_id.clone())
            .or_default()
            .push(team);
    }
    let mut rounds_by_match = HashMap::<String, Vec<MatchRoundRow>>::new();
    for round in round_rows {
        rounds_by_match
            .entry(round.match_id.clone())
            .or_default()
            .push(round);
    }

    let mut result = Vec::with_capacity(match_rows.len());
    for row in match_rows {
        let teams = teams_by_match.remove(&row.match_id).unwrap_or_default();
        let rounds = rounds_by_match.remove(&row.match_id).unwrap_or_default();

        match crate::models::assemble_match(&row, &teams, &rounds) {
            Some(data) => result.push((row.match_id, data)),
            None => {
                tracing::warn!("Skipping unreadable match {:?}", row.match_id);
            }
        };
    }

    Ok(result)
}

#[tracing::instrument(skip(con))]
pub async fn load_match(
    con: &mut diesel_async::AsyncPgConnection,
    match_id: &str,
) -> Result<Option<analysis::MatchData>, diesel::result::Error> {
    let mut match_rows: Vec<MatchRow> = crate::schema::matches::dsl::matches
        .filter(crate::schema::matches::dsl::match_id.eq(match_id))
        .select(MatchRow::as_select())
        .load(con)
        .await?;
    let row = match match_rows.pop() {
        Some(row) => row,
        None => return Ok(None),
    };

    let teams: Vec<MatchTeamRow> = crate::schema::match_teams::dsl::match_teams
        .filter(crate::schema::match_teams::dsl::match_id.eq(match_id))
        .select(MatchTeamRow::as_select())
        .load(con)
        .await?;
    let rounds: Vec<MatchRoundRow> = crate::schema::match_rounds::dsl::match_rounds
        .filter(crate::schema::match_rounds::dsl::match_id.eq(match_id))
        .order(crate::schema::match_rounds::dsl::round_number.asc())
        .select(MatchRoundRow::as_select())
        .load(con)
        .await?;

    Ok(crate::models::assemble_match(&row, &teams, &rounds))
}

/// Inserts a match with its teams and rounds in one transaction and
/// re-counts the rounds before committing, so a partial write rolls back
/// instead of leaving a match without rounds behind.
#[tracing::instrument(skip(con, data))]
pub async fn insert_match(
    con: &mut diesel_async::AsyncPgConnection,
    match_id: &str,
    data: &analysis::MatchData,
) -> Result<(), InsertError> {
    let (match_row, team_rows, round_rows) = crate::models::match_rows(match_id, data);
    let expected = round_rows.len();
    let match_id = match_id.to_owned();

    con.build_transaction()
        .run::<_, InsertError, _>(move |conn| {
            Box::pin(async move {
                diesel::dsl::insert_into(crate::schema::matches::dsl::matches)
                    .values(match_row)
                    .execute(conn)
                    .await?;

                diesel::dsl::insert_into(crate::schema::match_teams::dsl::match_teams)
                    .values(team_rows)
                    .execute(conn)
                    .await?;

                diesel::dsl::insert_into(crate::schema::match_rounds::dsl::match_rounds)
                    .values(round_rows)
                    .execute(conn)
                    .await?;

                let found: i64 = crate::schema::match_rounds::dsl::match_rounds
                    .filter(crate::schema::match_rounds::dsl::match_id.eq(&match_id))
                    .count()
                    .get_result(conn)
                    .await?;

                if found as usize != expected {
                    return Err(InsertError::RoundCount {
                        expected,
                        found: found as usize,
                    });
                }

                Ok(())
            })
        })
        .await
}

/// Removes the match and everything hanging off it. Returns whether a match
/// row was actually deleted.
#[tracing::instrument(skip(con))]
pub async fn delete_match(
    con: &mut diesel_async::AsyncPgConnection,
    match_id: &str,
) -> Result<bool, diesel::result::Error> {
    let match_id = match_id.to_owned();

    con.build_transaction()
        .run::<_, diesel::result::Error, _>(move |conn| {
            Box::pin(async move {
                diesel::dsl::delete(
                    crate::schema::match_rounds::dsl::match_rounds
                        .filter(crate::schema::match_rounds::dsl::match_id.eq(&match_id)),
                )
                .execute(conn)
                .await?;

                diesel::dsl::delete(
                    crate::schema::match_teams::dsl::match_teams
                        .filter(crate::schema::match_teams::dsl::match_id.eq(&match_id)),
                )
                .execute(conn)
                .await?;

                let deleted = diesel::dsl::delete(
                    crate::schema::matches::dsl::matches
                        .filter(crate::schema::matches::dsl::match_id.eq(&match_id)),
                )
                .execute(conn)
                .await?;

                Ok(deleted > 0)
            })
        })
        .await
}

/// Applies a manual score/side override to the stored team rows, bypassing
/// the round-derived values. Pass `None` to leave a field untouched.
#[tracing::instrument(skip(con))]
pub async fn adjust_team(
    con: &mut diesel_async::AsyncPgConnection,
    match_id: &str,
    slot: i16,
    score: Option<i16>,
    side: Option<analysis::Side>,
) -> Result<(), diesel::result::Error> {
    if let Some(score) = score {
        diesel::dsl::update(
            crate::schema::match_teams::dsl::match_teams
                .filter(crate::schema::match_teams::dsl::match_id.eq(match_id))
                .filter(crate::schema::match_teams::dsl::slot.eq(slot)),
        )
        .set(crate::schema::match_teams::dsl::score.eq(Some(score)))
        .execute(con)
        .await?;
    }

    if let Some(side) = side {
        diesel::dsl::update(
            crate::schema::match_teams::dsl::match_teams
                .filter(crate::schema::match_teams::dsl::match_id.eq(match_id))
                .filter(crate::schema::match_teams::dsl::slot.eq(slot)),
        )
        .set(crate::schema::match_teams::dsl::starting_side.eq(crate::models::side_to_db(side)))
        .execute(con)
        .await?;
    }

    Ok(())
}

/// Matches that have no persisted rounds at all, for operator remediation.
#[tracing::instrument(skip(con))]
pub async fn matches_missing_rounds(
    con: &mut diesel_async::AsyncPgConnection,
) -> Result<Vec<String>, diesel::result::Error> {
    let ids: Vec<String> = crate::schema::matches::dsl::matches
        .order(crate::schema::matches::dsl::created_at.desc())
        .select(crate::schema::matches::dsl::match_id)
        .load(con)
        .await?;

    let with_rounds: Vec<String> = crate::schema::match_rounds::dsl::match_rounds
        .select(crate::schema::match_rounds::dsl::match_id)
        .distinct()
        .load(con)
        .await?;
    let with_rounds: std::collections::HashSet<String> = with_rounds.into_iter().collect();

    Ok(ids
        .into_iter()
        .filter(|id| !with_rounds.contains(id))
        .collect())
}

pub async fn insert_status(
    con: &mut diesel_async::AsyncPgConnection,
    status: NewProcessingStatus,
) -> Result<(), diesel::result::Error> {
    diesel::dsl::insert_into(crate::schema::processing_status::dsl::processing_status)
        .values(status)
        .execute(con)
        .await?;

    Ok(())
}

pub async fn set_status(
    con: &mut diesel_async::AsyncPgConnection,
    upload_id: &str,
    state: i16,
    detail: Option<String>,
) -> Result<(), diesel::result::Error> {
    diesel::dsl::update(
        crate::schema::processing_status::dsl::processing_status
            .filter(crate::schema::processing_status::dsl::upload_id.eq(upload_id)),
    )
    .set((
        crate::schema::processing_status::dsl::state.eq(state),
        crate::schema::processing_status::dsl::detail.eq(detail),
    ))
    .execute(con)
    .await?;

    Ok(())
}

pub async fn list_statuses(
    con: &mut diesel_async::AsyncPgConnection,
) -> Result<Vec<ProcessingStatusRow>, diesel::result::Error> {
    crate::schema::processing_status::dsl::processing_status
        .order(crate::schema::processing_status::dsl::created_at.desc())
        .select(ProcessingStatusRow::as_select())
        .load(con)
        .await
}
