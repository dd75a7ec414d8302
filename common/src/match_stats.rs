use crate::Side;

#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum RoundEndReason {
    #[serde(rename = "Bomba Detonada")]
    TargetBombed,
    #[serde(rename = "Bomba Desarmada")]
    BombDefused,
    #[serde(rename = "Terroristas Eliminados")]
    TerroristsEliminated,
    #[serde(rename = "CTs Eliminados")]
    CtsEliminated,
    #[serde(rename = "Tempo Esgotado")]
    TargetSaved,
}

#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct TeamOverview {
    pub name: String,
    pub starting_side: Side,
    /// Stored manual override when present, otherwise derived from rounds.
    pub score: u32,
    pub logo: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct MatchOverview {
    pub id: String,
    pub map_name: String,
    pub date: String,
    pub duration: String,
    pub team_a: TeamOverview,
    pub team_b: TeamOverview,
    pub round_count: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct RoundEntry {
    pub number: u32,
    pub winner_side: Side,
    pub end_reason: RoundEndReason,
    pub duration: String,
    pub bomb_planted: bool,
    pub total_kills: u32,
    pub first_kill_side: Side,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct ScorePair {
    pub team_a: u32,
    pub team_b: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct HalfBreakdown {
    pub first_half: ScorePair,
    pub second_half: ScorePair,
    pub overtime: Option<ScorePair>,
}

#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct MatchDetail {
    pub overview: MatchOverview,
    pub rounds: Vec<RoundEntry>,
    pub breakdown: HalfBreakdown,
    /// Name of the team with the higher score, if the scores differ.
    pub winner: Option<String>,
}

#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct TeamStatsResponse {
    pub team_name: String,
    pub matches_played: usize,
    pub match_wins: usize,
    pub match_losses: usize,
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
    pub round_win_rate: f64,
    pub pistol_win_rate: f64,
    pub plant_rate: f64,
    pub detonation_rate: f64,
    pub defuse_rate: f64,
    pub avg_kills: f64,
}

#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct ComparisonResponse {
    pub team_a: TeamStatsResponse,
    pub team_b: TeamStatsResponse,
}

#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct PistolBucket {
    pub rounds: usize,
    pub ct_wins: usize,
    pub t_wins: usize,
    pub plants: usize,
    pub detonations: usize,
    pub defuses: usize,
}

#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct RoundTrendPoint {
    pub number: u32,
    pub samples: usize,
    pub avg_kills: f64,
    pub detonations: usize,
    pub defuses: usize,
    pub time_outs: usize,
    pub plants: usize,
}

#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct RoundHighlight {
    pub number: u32,
    pub value: f64,
}

#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct OverviewResponse {
    pub total_matches: usize,
    pub total_rounds: usize,
    pub ct_win_rate: f64,
    pub t_win_rate: f64,
    pub total_plants: usize,
    pub total_detonations: usize,
    pub total_defuses: usize,
    pub plant_rate: f64,
    pub detonation_rate: f64,
    pub defuse_rate: f64,
    pub plant_to_detonation_rate: f64,
    pub defuse_per_plant_rate: f64,
    pub avg_kills_per_round: f64,
    pub pistol_round_1: PistolBucket,
    pub pistol_round_13: PistolBucket,
    pub round_trend: Vec<RoundTrendPoint>,
    pub most_detonations: Option<RoundHighlight>,
    pub most_defuses: Option<RoundHighlight>,
    pub most_time_outs: Option<RoundHighlight>,
    pub highest_avg_kills: Option<RoundHighlight>,
}

#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct MapLeaderboardEntry {
    pub map_name: String,
    pub rounds: usize,
    pub plants: usize,
    pub detonations: usize,
    pub defuses: usize,
    pub plant_ratio: f64,
    pub detonation_ratio: f64,
    pub defuse_ratio: f64,
    pub plant_conversion: f64,
}

#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct RoundLeaderboardEntry {
    pub number: u32,
    pub plants: usize,
    pub detonations: usize,
    pub defuses: usize,
    pub avg_kills: f64,
}

/// Manual score/side override. Every field is optional; absent fields stay
/// untouched.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct MatchAdjustment {
    pub team_a_score: Option<i16>,
    pub team_b_score: Option<i16>,
    pub team_a_side: Option<Side>,
    pub team_b_side: Option<Side>,
}

#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct LeaderboardsResponse {
    pub maps_by_detonations: Vec<MapLeaderboardEntry>,
    pub maps_by_defuses: Vec<MapLeaderboardEntry>,
    pub maps_by_plants: Vec<MapLeaderboardEntry>,
    pub rounds_by_detonations: Vec<RoundLeaderboardEntry>,
    pub rounds_by_defuses: Vec<RoundLeaderboardEntry>,
    pub rounds_by_plants: Vec<RoundLeaderboardEntry>,
    pub rounds_by_avg_kills: Vec<RoundLeaderboardEntry>,
}
