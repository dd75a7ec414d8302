pub mod combine;
pub mod outcome;
pub mod sides;
pub mod stats;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum Side {
    CT,
    T,
}

impl Side {
    pub fn opposite(self) -> Self {
        match self {
            Side::CT => Side::T,
            Side::T => Side::CT,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum EndReason {
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

// Labels as emitted by the external demo parser, see its map_reason_to_end
pub static END_REASON_LABELS: phf::Map<&'static str, EndReason> = phf::phf_map! {
    "Bomba Detonada" => EndReason::TargetBombed,
    "Bomba Desarmada" => EndReason::BombDefused,
    "Terroristas Eliminados" => EndReason::TerroristsEliminated,
    "CTs Eliminados" => EndReason::CtsEliminated,
    "Tempo Esgotado" => EndReason::TargetSaved,
};

impl EndReason {
    pub fn from_label(label: &str) -> Option<Self> {
        END_REASON_LABELS.get(label).copied()
    }

    pub fn label(&self) -> &'static str {
        match self {
            EndReason::TargetBombed => "Bomba Detonada",
            EndReason::BombDefused => "Bomba Desarmada",
            EndReason::TerroristsEliminated => "Terroristas Eliminados",
            EndReason::CtsEliminated => "CTs Eliminados",
            EndReason::TargetSaved => "Tempo Esgotado",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Round {
    pub number: u32,
    pub winner: Side,
    pub reason: EndReason,
    pub duration: String,
    pub bomb_planted: bool,
    pub total_kills: u32,
    pub first_kill: Side,
}

#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct MatchTeam {
    pub name: String,
    /// Side the team played in round 1, fixed for the whole match.
    pub starting_side: Side,
    /// Manual override; `None` means the score is derived from the rounds.
    pub score: Option<u32>,
    pub logo: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct MatchData {
    pub map_name: String,
    pub date: String,
    pub duration: String,
    pub team_a: MatchTeam,
    pub team_b: MatchTeam,
    pub rounds: Vec<Round>,
}

impl MatchData {
    pub fn starting_side_of(&self, team_name: &str) -> Option<Side> {
        if self.team_a.name == team_name {
            Some(self.team_a.starting_side)
        } else if self.team_b.name == team_name {
            Some(self.team_b.starting_side)
        } else {
            None
        }
    }
}
