use common::match_stats as dto;

fn side_dto(side: analysis::Side) -> common::Side {
    match side {
        analysis::Side::CT => common::Side::CT,
        analysis::Side::T => common::Side::T,
    }
}

fn side_from_dto(side: common::Side) -> analysis::Side {
    match side {
        common::Side::CT => analysis::Side::CT,
        common::Side::T => analysis::Side::T,
    }
}

fn reason_dto(reason: analysis::EndReason) -> dto::RoundEndReason {
    match reason {
        analysis::EndReason::TargetBombed => dto::RoundEndReason::TargetBombed,
        analysis::EndReason::BombDefused => dto::RoundEndReason::BombDefused,
        analysis::EndReason::TerroristsEliminated => dto::RoundEndReason::TerroristsEliminated,
        analysis::EndReason::CtsEliminated => dto::RoundEndReason::CtsEliminated,
        analysis::EndReason::TargetSaved => dto::RoundEndReason::TargetSaved,
    }
}

#[derive(Debug, Default, serde::Deserialize)]
pub struct FilterParams {
    pub map: Option<String>,
    pub team: Option<String>,
    pub date: Option<String>,
}

impl From<FilterParams> for analysis::stats::MatchFilter {
    fn from(params: FilterParams) -> Self {
        Self {
            map: params.map,
            team: params.team,
            date: params.date,
        }
    }
}

/// Resolves the sides of a manual adjustment so the stored teams always end
/// up on opposite sides. Giving only one team's side implies the complement
/// for the other.
pub fn resolved_sides(
    adjustment: &dto::MatchAdjustment,
) -> Result<Option<(common::Side, common::Side)>, &'static str> {
    match (adjustment.team_a_side, adjustment.team_b_side) {
        (None, None) => Ok(None),
        (Some(a), Some(b)) if a == b => Err("Teams cannot play the same side"),
        (Some(a), Some(b)) => Ok(Some((a, b))),
        (Some(common::Side::CT), None) => Ok(Some((common::Side::CT, common::Side::T))),
        (Some(common::Side::T), None) => Ok(Some((common::Side::T, common::Side::CT))),
        (None, Some(common::Side::CT)) => Ok(Some((common::Side::T, common::Side::CT))),
        (None, Some(common::Side::T)) => Ok(Some((common::Side::CT, common::Side::T))),
    }
}

pub mod imports {
    use axum::extract::State;
    use futures::StreamExt;
    use std::sync::Arc;

    use crate::models::import_state;

    pub struct ImportsState {
        pub storage: Box<dyn crate::storage::DemoStorage>,
        pub tasks: tokio::sync::mpsc::UnboundedSender<crate::importer::ImportTask>,
    }

    pub fn router(state: Arc<ImportsState>) -> axum::Router {
        axum::Router::new()
            .route(
                "/upload",
                axum::routing::post(upload)
                    .layer(axum::extract::DefaultBodyLimit::max(500 * 1024 * 1024)),
            )
            .route("/status", axum::routing::get(status))
            .with_state(state)
    }

    #[tracing::instrument(skip(state, session, form))]
    async fn upload(
        State(state): State<Arc<ImportsState>>,
        session: crate::UserSession,
        form: axum::extract::Multipart,
    ) -> Result<axum::response::Json<common::UploadAccepted>, (axum::http::StatusCode, &'static str)>
    {
        if session.data().role.is_none() {
            return Err((axum::http::StatusCode::UNAUTHORIZED, "Not logged in"));
        }

        let files = crate::demo_files_from_upload("demo", form).await;
        if files.is_empty() {
            return Err((
                axum::http::StatusCode::BAD_REQUEST,
                "No demo files in upload",
            ));
        }

        let mut db_con = crate::db_connection().await;

        let mut upload_ids = Vec::new();
        for (file_name, content) in files {
            let upload_id = uuid::Uuid::now_v7().to_string();
            tracing::info!("Queueing demo upload {} as {}", file_name, upload_id);

            let stream = futures::stream::iter([content]).boxed();
            if let Err(e) = state.storage.upload(upload_id.clone(), stream).await {
                tracing::error!("Storing upload: {:?}", e);
                return Err((
                    axum::http::StatusCode::INTERNAL_SERVER_ERROR,
                    "Failed to store upload",
                ));
            }

            let status_insert = crate::store::insert_status(
                &mut db_con,
                crate::models::NewProcessingStatus {
                    upload_id: upload_id.clone(),
                    file_name: file_name.clone(),
                    state: import_state::QUEUED,
                    detail: None,
                },
            )
            .await;
            if let Err(e) = status_insert {
                tracing::error!("Recording upload status: {:?}", e);
                return Err((
                    axum::http::StatusCode::INTERNAL_SERVER_ERROR,
                    "Failed to record upload",
                ));
            }

            if state
                .tasks
                .send(crate::importer::ImportTask {
                    upload_id: upload_id.clone(),
                    file_name,
                })
                .is_err()
            {
                tracing::error!("Import worker is gone");
                return Err((
                    axum::http::StatusCode::INTERNAL_SERVER_ERROR,
                    "Import pipeline unavailable",
                ));
            }

            upload_ids.push(upload_id);
        }

        Ok(axum::Json(common::UploadAccepted { upload_ids }))
    }

    #[tracing::instrument(skip(_session))]
    async fn status(
        _session: crate::UserSession,
    ) -> Result<axum::response::Json<Vec<common::ImportStatus>>, axum::http::StatusCode> {
        let mut db_con = crate::db_connection().await;

        let rows = crate::store::list_statuses(&mut db_con).await.map_err(|e| {
            tracing::error!("Querying DB: {:?}", e);
            axum::http::StatusCode::INTERNAL_SERVER_ERROR
        })?;

        Ok(axum::Json(
            rows.into_iter()
                .map(|row| common::ImportStatus {
                    state: match row.state {
                        import_state::QUEUED => common::ImportState::Queued,
                        import_state::PROCESSING => common::ImportState::Processing,
                        import_state::COMPLETED => common::ImportState::Completed,
                        _ => common::ImportState::Error,
                    },
                    upload_id: row.upload_id,
                    file_name: row.file_name,
                    detail: row.detail,
                })
                .collect(),
        ))
    }
}

pub mod matches {
    use axum::extract::Path;

    use super::{dto, resolved_sides, side_dto, side_from_dto};

    pub fn router() -> axum::Router {
        axum::Router::new()
            .route("/list", axum::routing::get(list))
            .route("/integrity/missing-rounds", axum::routing::get(missing_rounds))
            .route(
                "/:id",
                axum::routing::get(detail).delete(delete),
            )
            .route("/:id/adjust", axum::routing::put(adjust))
    }

    fn overview_dto(match_id: &str, data: &analysis::MatchData) -> dto::MatchOverview {
        let team = |team: &analysis::MatchTeam| dto::TeamOverview {
            name: team.name.clone(),
            starting_side: side_dto(team.starting_side),
            score: analysis::outcome::display_score(team, &data.rounds) as u32,
            logo: team.logo.clone(),
        };

        dto::MatchOverview {
            id: match_id.to_owned(),
            map_name: data.map_name.clone(),
            date: data.date.clone(),
            duration: data.duration.clone(),
            team_a: team(&data.team_a),
            team_b: team(&data.team_b),
            round_count: data.rounds.len(),
        }
    }

    #[tracing::instrument(skip(_session))]
    async fn list(
        _session: crate::UserSession,
    ) -> Result<axum::response::Json<Vec<dto::MatchOverview>>, axum::http::StatusCode> {
        let mut db_con = crate::db_connection().await;

        let matches = crate::store::load_matches(&mut db_con).await.map_err(|e| {
            tracing::error!("Querying DB: {:?}", e);
            axum::http::StatusCode::INTERNAL_SERVER_ERROR
        })?;

        Ok(axum::Json(
            matches
                .iter()
                .map(|(match_id, data)| overview_dto(match_id, data))
                .collect(),
        ))
    }

    #[tracing::instrument(skip(_session))]
    async fn detail(
        _session: crate::UserSession,
        Path(match_id): Path<String>,
    ) -> Result<axum::response::Json<dto::MatchDetail>, axum::http::StatusCode> {
        let mut db_con = crate::db_connection().await;

        let data = crate::store::load_match(&mut db_con, &match_id)
            .await
            .map_err(|e| {
                tracing::error!("Querying DB: {:?}", e);
                axum::http::StatusCode::INTERNAL_SERVER_ERROR
            })?
            .ok_or(axum::http::StatusCode::NOT_FOUND)?;

        let breakdown = analysis::outcome::breakdown(&data);
        let winner = analysis::combine::winner(&data).map(|winner| match winner {
            analysis::combine::Winner::TeamA => data.team_a.name.clone(),
            analysis::combine::Winner::TeamB => data.team_b.name.clone(),
        });

        let rounds = data
            .rounds
            .iter()
            .map(|round| dto::RoundEntry {
                number: round.number,
                winner_side: side_dto(round.winner),
                end_reason: super::reason_dto(round.reason),
                duration: round.duration.clone(),
                bomb_planted: round.bomb_planted,
                total_kills: round.total_kills,
                first_kill_side: side_dto(round.first_kill),
            })
            .collect();

        Ok(axum::Json(dto::MatchDetail {
            overview: overview_dto(&match_id, &data),
            rounds,
            breakdown: dto::HalfBreakdown {
                first_half: dto::ScorePair {
                    team_a: breakdown.team_a.first_half_wins as u32,
                    team_b: breakdown.team_b.first_half_wins as u32,
                },
                second_half: dto::ScorePair {
                    team_a: breakdown.team_a.second_half_wins as u32,
                    team_b: breakdown.team_b.second_half_wins as u32,
                },
                overtime: (breakdown.overtime_rounds > 0).then(|| dto::ScorePair {
                    team_a: breakdown.team_a.overtime_wins as u32,
                    team_b: breakdown.team_b.overtime_wins as u32,
                }),
            },
            winner,
        }))
    }

    #[tracing::instrument(skip(session))]
    async fn delete(
        session: crate::UserSession,
        Path(match_id): Path<String>,
    ) -> Result<axum::http::StatusCode, (axum::http::StatusCode, &'static str)> {
        if !session.is_admin() {
            return Err((axum::http::StatusCode::FORBIDDEN, "Admin role required"));
        }

        let mut db_con = crate::db_connection().await;

        let deleted = crate::store::delete_match(&mut db_con, &match_id)
            .await
            .map_err(|e| {
                tracing::error!("Deleting match: {:?}", e);
                (
                    axum::http::StatusCode::INTERNAL_SERVER_ERROR,
                    "Failed to delete match",
                )
            })?;

        if !deleted {
            return Err((axum::http::StatusCode::NOT_FOUND, "No such match"));
        }

        Ok(axum::http::StatusCode::NO_CONTENT)
    }

    #[tracing::instrument(skip(session))]
    async fn adjust(
        session: crate::UserSession,
        Path(match_id): Path<String>,
        axum::Json(adjustment): axum::Json<dto::MatchAdjustment>,
    ) -> Result<axum::http::StatusCode, (axum::http::StatusCode, &'static str)> {
        if !session.is_admin() {
            return Err((axum::http::StatusCode::FORBIDDEN, "Admin role required"));
        }

        let sides = resolved_sides(&adjustment)
            .map_err(|msg| (axum::http::StatusCode::BAD_REQUEST, msg))?;

        let mut db_con = crate::db_connection().await;

        let exists = crate::store::load_match(&mut db_con, &match_id)
            .await
            .map_err(|e| {
                tracing::error!("Querying DB: {:?}", e);
                (
                    axum::http::StatusCode::INTERNAL_SERVER_ERROR,
                    "Failed to load match",
                )
            })?
            .is_some();
        if !exists {
            return Err((axum::http::StatusCode::NOT_FOUND, "No such match"));
        }

        let result = async {
            crate::store::adjust_team(
                &mut db_con,
                &match_id,
                0,
                adjustment.team_a_score,
                sides.map(|(a, _)| side_from_dto(a)),
            )
            .await?;
            crate::store::adjust_team(
                &mut db_con,
                &match_id,
                1,
                adjustment.team_b_score,
                sides.map(|(_, b)| side_from_dto(b)),
            )
            .await
        }
        .await;

        result.map_err(|e| {
            tracing::error!("Adjusting match: {:?}", e);
            (
                axum::http::StatusCode::INTERNAL_SERVER_ERROR,
                "Failed to adjust match",
            )
        })?;

        Ok(axum::http::StatusCode::NO_CONTENT)
    }

    #[tracing::instrument(skip(_session))]
    async fn missing_rounds(
        _session: crate::UserSession,
    ) -> Result<axum::response::Json<Vec<String>>, axum::http::StatusCode> {
        let mut db_con = crate::db_connection().await;

        let missing = crate::store::matches_missing_rounds(&mut db_con)
            .await
            .map_err(|e| {
                tracing::error!("Querying DB: {:?}", e);
                axum::http::StatusCode::INTERNAL_SERVER_ERROR
            })?;

        Ok(axum::Json(missing))
    }
}

pub mod stats {
    use axum::extract::{Path, Query};

    use super::{dto, FilterParams};

    pub fn router() -> axum::Router {
        axum::Router::new()
            .route("/overview", axum::routing::get(overview))
            .route("/team/:name", axum::routing::get(team))
            .route("/compare", axum::routing::get(compare))
            .route("/leaderboards", axum::routing::get(leaderboards))
    }

    async fn load_filtered(
        filter: analysis::stats::MatchFilter,
    ) -> Result<Vec<analysis::MatchData>, axum::http::StatusCode> {
        let mut db_con = crate::db_connection().await;

        let matches = crate::store::load_matches(&mut db_con).await.map_err(|e| {
            tracing::error!("Querying DB: {:?}", e);
            axum::http::StatusCode::INTERNAL_SERVER_ERROR
        })?;

        Ok(matches
            .into_iter()
            .map(|(_, data)| data)
            .filter(|data| filter.accepts(data))
            .collect())
    }

    fn team_stats_dto(stats: &analysis::stats::TeamStats) -> dto::TeamStatsResponse {
        dto::TeamStatsResponse {
            team_name: stats.team_name.clone(),
            matches_played: stats.matches_played,
            match_wins: stats.match_wins,
            match_losses: stats.match_losses,
            rounds_played: stats.rounds.rounds_played,
            round_wins: stats.rounds.round_wins,
            pistol_rounds: stats.rounds.pistol_rounds,
            pistol_wins: stats.rounds.pistol_wins,
            t_side_rounds: stats.rounds.t_side_rounds,
            ct_side_rounds: stats.rounds.ct_side_rounds,
            plants: stats.rounds.plants,
            detonations: stats.rounds.detonations,
            defuses: stats.rounds.defuses,
            time_outs: stats.rounds.time_outs,
            total_kills: stats.rounds.total_kills,
            round_win_rate: stats.rounds.win_rate(),
            pistol_win_rate: stats.rounds.pistol_win_rate(),
            plant_rate: stats.rounds.plant_rate(),
            detonation_rate: stats.rounds.detonation_rate(),
            defuse_rate: stats.rounds.defuse_rate(),
            avg_kills: stats.rounds.avg_kills(),
        }
    }

    fn pistol_dto(bucket: &analysis::stats::PistolBucket) -> dto::PistolBucket {
        dto::PistolBucket {
            rounds: bucket.rounds,
            ct_wins: bucket.ct_wins,
            t_wins: bucket.t_wins,
            plants: bucket.plants,
            detonations: bucket.detonations,
            defuses: bucket.defuses,
        }
    }

    #[tracing::instrument(skip(_session))]
    async fn overview(
        _session: crate::UserSession,
        Query(params): Query<FilterParams>,
    ) -> Result<axum::response::Json<dto::OverviewResponse>, axum::http::StatusCode> {
        let matches = load_filtered(params.into()).await?;
        let refs: Vec<&analysis::MatchData> = matches.iter().collect();

        let overview = analysis::stats::overview(&refs);

        let highlight =
            |peak: Option<(u32, usize)>| peak.map(|(number, count)| dto::RoundHighlight {
                number,
                value: count as f64,
            });

        Ok(axum::Json(dto::OverviewResponse {
            total_matches: overview.total_matches,
            total_rounds: overview.total_rounds,
            ct_win_rate: overview.ct_win_rate(),
            t_win_rate: overview.t_win_rate(),
            total_plants: overview.plants,
            total_detonations: overview.detonations,
            total_defuses: overview.defuses,
            plant_rate: overview.plant_rate(),
            detonation_rate: overview.detonation_rate(),
            defuse_rate: overview.defuse_rate(),
            plant_to_detonation_rate: overview.plant_to_detonation_rate(),
            defuse_per_plant_rate: overview.defuse_per_plant_rate(),
            avg_kills_per_round: overview.avg_kills_per_round(),
            pistol_round_1: pistol_dto(&overview.pistol_round_1),
            pistol_round_13: pistol_dto(&overview.pistol_round_13),
            round_trend: overview
                .round_trend
                .iter()
                .map(|trend| dto::RoundTrendPoint {
                    number: trend.number,
                    samples: trend.samples,
                    avg_kills: trend.avg_kills(),
                    detonations: trend.detonations,
                    defuses: trend.defuses,
                    time_outs: trend.time_outs,
                    plants: trend.plants,
                })
                .collect(),
            most_detonations: highlight(overview.most_detonations()),
            most_defuses: highlight(overview.most_defuses()),
            most_time_outs: highlight(overview.most_time_outs()),
            highest_avg_kills: overview.highest_avg_kills().map(|(number, value)| {
                dto::RoundHighlight { number, value }
            }),
        }))
    }

    #[tracing::instrument(skip(_session))]
    async fn team(
        _session: crate::UserSession,
        Path(team_name): Path<String>,
        Query(params): Query<FilterParams>,
    ) -> Result<axum::response::Json<dto::TeamStatsResponse>, axum::http::StatusCode> {
        let matches = load_filtered(params.into()).await?;
        let refs: Vec<&analysis::MatchData> = matches.iter().collect();

        let stats = analysis::stats::team_stats(&refs, &team_name);

        Ok(axum::Json(team_stats_dto(&stats)))
    }

    #[derive(Debug, serde::Deserialize)]
    struct CompareParams {
        team_a: String,
        team_b: String,
        map: Option<String>,
        date: Option<String>,
    }

    #[tracing::instrument(skip(_session))]
    async fn compare(
        _session: crate::UserSession,
        Query(params): Query<CompareParams>,
    ) -> Result<axum::response::Json<dto::ComparisonResponse>, axum::http::StatusCode> {
        let filter = analysis::stats::MatchFilter {
            map: params.map,
            team: None,
            date: params.date,
        };
        let matches = load_filtered(filter).await?;
        let refs: Vec<&analysis::MatchData> = matches.iter().collect();

        let comparison = analysis::stats::comparison(&refs, &params.team_a, &params.team_b);

        Ok(axum::Json(dto::ComparisonResponse {
            team_a: team_stats_dto(&comparison.team_a),
            team_b: team_stats_dto(&comparison.team_b),
        }))
    }

    fn map_board_dto(entries: Vec<analysis::stats::MapObjectives>) -> Vec<dto::MapLeaderboardEntry> {
        entries
            .into_iter()
            .map(|entry| dto::MapLeaderboardEntry {
                plant_ratio: entry.plant_ratio(),
                detonation_ratio: entry.detonation_ratio(),
                defuse_ratio: entry.defuse_ratio(),
                plant_conversion: entry.plant_conversion(),
                map_name: entry.map_name,
                rounds: entry.rounds,
                plants: entry.plants,
                detonations: entry.detonations,
                defuses: entry.defuses,
            })
            .collect()
    }

    fn round_board_dto(
        entries: Vec<analysis::stats::RoundObjectives>,
    ) -> Vec<dto::RoundLeaderboardEntry> {
        entries
            .into_iter()
            .map(|entry| dto::RoundLeaderboardEntry {
                avg_kills: entry.avg_kills(),
                number: entry.number,
                plants: entry.plants,
                detonations: entry.detonations,
                defuses: entry.defuses,
            })
            .collect()
    }

    #[tracing::instrument(skip(_session))]
    async fn leaderboards(
        _session: crate::UserSession,
        Query(params): Query<FilterParams>,
    ) -> Result<axum::response::Json<dto::LeaderboardsResponse>, axum::http::StatusCode> {
        use analysis::stats::LeaderboardMetric;

        let matches = load_filtered(params.into()).await?;
        let refs: Vec<&analysis::MatchData> = matches.iter().collect();

        Ok(axum::Json(dto::LeaderboardsResponse {
            maps_by_detonations: map_board_dto(analysis::stats::map_leaderboard(
                &refs,
                LeaderboardMetric::Detonations,
            )),
            maps_by_defuses: map_board_dto(analysis::stats::map_leaderboard(
                &refs,
                LeaderboardMetric::Defuses,
            )),
            maps_by_plants: map_board_dto(analysis::stats::map_leaderboard(
                &refs,
                LeaderboardMetric::Plants,
            )),
            rounds_by_detonations: round_board_dto(analysis::stats::round_leaderboard(
                &refs,
                LeaderboardMetric::Detonations,
            )),
            rounds_by_defuses: round_board_dto(analysis::stats::round_leaderboard(
                &refs,
                LeaderboardMetric::Defuses,
            )),
            rounds_by_plants: round_board_dto(analysis::stats::round_leaderboard(
                &refs,
                LeaderboardMetric::Plants,
            )),
            rounds_by_avg_kills: round_board_dto(analysis::stats::round_leaderboard(
                &refs,
                LeaderboardMetric::AvgKills,
            )),
        }))
    }
}

pub mod auth {
    use diesel::prelude::*;
    use diesel_async::RunQueryDsl;

    fn role_from_db(raw: &str) -> common::UserRole {
        match raw {
            "ADMIN" => common::UserRole::Admin,
            _ => common::UserRole::User,
        }
    }

    pub fn router() -> axum::Router {
        axum::Router::new()
            .route("/login", axum::routing::post(login))
            .route("/status", axum::routing::get(status))
    }

    #[tracing::instrument(skip(session, request))]
    async fn login(
        mut session: crate::UserSession,
        axum::Json(request): axum::Json<common::LoginRequest>,
    ) -> Result<axum::response::Json<common::UserStatus>, axum::http::StatusCode> {
        let mut db_con = crate::db_connection().await;

        let query = crate::schema::users::dsl::users
            .filter(crate::schema::users::dsl::username.eq(&request.username));

        let mut result = match query.load::<crate::models::User>(&mut db_con).await {
            Ok(r) => r,
            Err(e) => {
                tracing::error!("Querying DB: {:?}", e);
                return Err(axum::http::StatusCode::INTERNAL_SERVER_ERROR);
            }
        };
        if result.len() != 1 {
            return Err(axum::http::StatusCode::UNAUTHORIZED);
        }

        let user_entry = result.pop().unwrap();
        let role = role_from_db(&user_entry.role);

        session
            .modify_data(|data| {
                data.username = Some(user_entry.username.clone());
                data.role = Some(role);
            })
            .await;

        Ok(axum::Json(common::UserStatus {
            username: user_entry.username,
            role,
        }))
    }

    #[tracing::instrument(skip(session))]
    async fn status(
        session: crate::UserSession,
    ) -> Result<axum::response::Json<common::UserStatus>, axum::http::StatusCode> {
        let data = session.data();

        match (data.username.clone(), data.role) {
            (Some(username), Some(role)) => {
                Ok(axum::Json(common::UserStatus { username, role }))
            }
            _ => Err(axum::http::StatusCode::UNAUTHORIZED),
        }
    }
}

pub fn router(
    storage: Box<dyn crate::storage::DemoStorage>,
    tasks: tokio::sync::mpsc::UnboundedSender<crate::importer::ImportTask>,
) -> axum::Router {
    axum::Router::new()
        .nest(
            "/imports/",
            imports::router(std::sync::Arc::new(imports::ImportsState { storage, tasks })),
        )
        .nest("/matches/", matches::router())
        .nest("/stats/", stats::router())
        .nest("/auth/", auth::router())
}
