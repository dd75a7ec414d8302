use backend::parser::{self, ParsedDemo, ParseError};
use pretty_assertions::assert_eq;

static SAMPLE: &str = r#"{
    "matchId": "m-123",
    "mapName": "Mirage",
    "duration": "48m",
    "teamA": { "name": "Imperial", "side": "CT", "score": 0 },
    "teamB": { "name": "Shinden", "side": "T", "score": 0 },
    "players": [],
    "rounds": [
        {
            "number": 1,
            "winnerSide": "CT",
            "endReason": "Bomba Desarmada",
            "duration": "1:52",
            "bombPlanted": true,
            "totalKills": 8,
            "firstKillSide": "CT"
        },
        {
            "number": 2,
            "winnerSide": "T",
            "endReason": "Bomba Detonada",
            "duration": "1:34",
            "bombPlanted": true,
            "totalKills": 9,
            "firstKillSide": "T"
        }
    ]
}"#;

#[test]
fn decodes_the_parser_document() {
    let parsed: ParsedDemo = serde_json::from_str(SAMPLE).unwrap();

    assert_eq!("Mirage", parsed.map_name);
    assert_eq!("Imperial", parsed.team_a.name);
    assert_eq!("CT", parsed.team_a.side);
    assert_eq!(2, parsed.rounds.len());
    assert_eq!("Bomba Desarmada", parsed.rounds[0].end_reason);
    assert_eq!(true, parsed.rounds[1].bomb_planted);
}

#[test]
fn converts_to_match_data() {
    let parsed: ParsedDemo = serde_json::from_str(SAMPLE).unwrap();

    let data = parser::to_match_data(parsed, "12/01/2025".to_owned()).unwrap();

    assert_eq!("12/01/2025", data.date);
    assert_eq!(analysis::Side::CT, data.team_a.starting_side);
    assert_eq!(analysis::Side::T, data.team_b.starting_side);
    // Scores are derived from rounds until a manual adjustment stores one.
    assert_eq!(None, data.team_a.score);
    assert_eq!(analysis::EndReason::BombDefused, data.rounds[0].reason);
    assert_eq!(analysis::EndReason::TargetBombed, data.rounds[1].reason);
    assert_eq!(9, data.rounds[1].total_kills);
}

#[test]
fn unknown_end_reason_is_a_parse_failure() {
    let mut parsed: ParsedDemo = serde_json::from_str(SAMPLE).unwrap();
    parsed.rounds[0].end_reason = "Refém Resgatado".to_owned();

    let result = parser::to_match_data(parsed, "12/01/2025".to_owned());

    assert!(matches!(result, Err(ParseError::UnknownEndReason(_))));
}

#[test]
fn unknown_side_is_a_parse_failure() {
    let mut parsed: ParsedDemo = serde_json::from_str(SAMPLE).unwrap();
    parsed.team_a.side = "SPEC".to_owned();

    let result = parser::to_match_data(parsed, "12/01/2025".to_owned());

    assert!(matches!(result, Err(ParseError::UnknownSide(_))));
}

#[test]
fn teams_on_the_same_side_are_rejected() {
    let mut parsed: ParsedDemo = serde_json::from_str(SAMPLE).unwrap();
    parsed.team_b.side = "CT".to_owned();

    let result = parser::to_match_data(parsed, "12/01/2025".to_owned());

    assert!(matches!(result, Err(ParseError::SameStartingSides)));
}
