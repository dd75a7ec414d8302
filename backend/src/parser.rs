//! Invocation of the external demo parser.
//!
//! The binary `.dem` decoding lives in a separate Python program that prints
//! one JSON document per demo to stdout. This module runs it and converts
//! its output into the domain types.

use std::path::Path;

#[derive(Debug, Clone, PartialEq, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParsedDemo {
    pub map_name: String,
    pub duration: String,
    pub team_a: ParsedTeam,
    pub team_b: ParsedTeam,
    pub rounds: Vec<ParsedRound>,
}

#[derive(Debug, Clone, PartialEq, serde::Deserialize)]
pub struct ParsedTeam {
    pub name: String,
    pub side: String,
    #[serde(default)]
    pub logo: Option<String>,
}

#[derive(Debug, Clone, PartialEq, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParsedRound {
    pub number: u32,
    pub winner_side: String,
    pub end_reason: String,
    pub duration: String,
    pub bomb_planted: bool,
    pub total_kills: u32,
    pub first_kill_side: String,
}

#[derive(Debug, thiserror::Error)]
pub enum ParseError {
    #[error("failed to launch the demo parser: {0}")]
    Spawn(std::io::Error),
    #[error("demo parser exited with {code:?}: {stderr}")]
    Process { code: Option<i32>, stderr: String },
    #[error("demo parser produced invalid output: {0}")]
    Decode(#[from] serde_json::Error),
    #[error("unknown side {0:?}")]
    UnknownSide(String),
    #[error("unknown end reason {0:?}")]
    UnknownEndReason(String),
    #[error("both teams start on the same side")]
    SameStartingSides,
}

#[derive(Debug, Clone)]
pub struct ExternalParser {
    command: String,
    script: std::path::PathBuf,
}

impl ExternalParser {
    pub fn new<P>(command: String, script: P) -> Self
    where
        P: Into<std::path::PathBuf>,
    {
        Self {
            command,
            script: script.into(),
        }
    }

    /// Runs the parser on one demo file. The original upload name is passed
    /// through so the parser can derive team names from it.
    #[tracing::instrument(skip(self))]
    pub async fn parse(
        &self,
        demo_path: &Path,
        original_name: &str,
    ) -> Result<ParsedDemo, ParseError> {
        let output = tokio::process::Command::new(&self.command)
            .arg(&self.script)
            .arg(demo_path)
            .arg(original_name)
            .output()
            .await
            .map_err(ParseError::Spawn)?;

        if !output.status.success() {
            return Err(ParseError::Process {
                code: output.status.code(),
                stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
            });
        }

        let parsed: ParsedDemo = serde_json::from_slice(&output.stdout)?;
        tracing::info!(
            "Parsed demo on {} with {} rounds",
            parsed.map_name,
            parsed.rounds.len()
        );

        Ok(parsed)
    }
}

fn side(raw: &str) -> Result<analysis::Side, ParseError> {
    match raw {
        "CT" => Ok(analysis::Side::CT),
        "T" => Ok(analysis::Side::T),
        other => Err(ParseError::UnknownSide(other.to_owned())),
    }
}

/// Converts the parser document into a match record dated `date`.
///
/// Scores stay unset: they are derived from the rounds on read, and only a
/// manual adjustment ever stores one.
pub fn to_match_data(parsed: ParsedDemo, date: String) -> Result<analysis::MatchData, ParseError> {
    let team = |parsed_team: ParsedTeam| -> Result<analysis::MatchTeam, ParseError> {
        Ok(analysis::MatchTeam {
            starting_side: side(&parsed_team.side)?,
            name: parsed_team.name,
            score: None,
            logo: parsed_team.logo,
        })
    };

    let team_a = team(parsed.team_a)?;
    let team_b = team(parsed.team_b)?;
    if team_a.starting_side == team_b.starting_side {
        return Err(ParseError::SameStartingSides);
    }

    let mut rounds = Vec::with_capacity(parsed.rounds.len());
    for parsed_round in parsed.rounds {
        rounds.push(analysis::Round {
            number: parsed_round.number,
            winner: side(&parsed_round.winner_side)?,
            reason: analysis::EndReason::from_label(&parsed_round.end_reason)
                .ok_or_else(|| ParseError::UnknownEndReason(parsed_round.end_reason.clone()))?,
            duration: parsed_round.duration,
            bomb_planted: parsed_round.bomb_planted,
            total_kills: parsed_round.total_kills,
            first_kill: side(&parsed_round.first_kill_side)?,
        });
    }

    Ok(analysis::MatchData {
        map_name: parsed.map_name,
        date,
        duration: parsed.duration,
        team_a,
        team_b,
        rounds,
    })
}
