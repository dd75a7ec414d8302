use backend::importer;
use pretty_assertions::assert_eq;

fn match_data(team_a: &str, team_b: &str, map: &str, date: &str) -> analysis::MatchData {
    analysis::MatchData {
        map_name: map.to_owned(),
        date: date.to_owned(),
        duration: "40m".to_owned(),
        team_a: analysis::MatchTeam {
            name: team_a.to_owned(),
            starting_side: analysis::Side::CT,
            score: None,
            logo: None,
        },
        team_b: analysis::MatchTeam {
            name: team_b.to_owned(),
            starting_side: analysis::Side::T,
            score: None,
            logo: None,
        },
        rounds: Vec::new(),
    }
}

#[test]
fn part_names_follow_the_base_p_number_pattern() {
    assert_eq!(
        Some(("liquid-vs-falcons-m1-nuke", 2)),
        importer::split_part_name("liquid-vs-falcons-m1-nuke-p2.dem")
    );
    assert_eq!(
        Some(("imperial_vs_shinden", 10)),
        importer::split_part_name("imperial_vs_shinden-p10.dem")
    );

    assert_eq!(None, importer::split_part_name("liquid-vs-falcons-m1-nuke.dem"));
    assert_eq!(None, importer::split_part_name("match-p2.demo"));
    assert_eq!(None, importer::split_part_name("-p2.dem"));
}

#[test]
fn duplicates_ignore_team_order_and_case() {
    let stored = vec![(
        "existing".to_owned(),
        match_data("Imperial", "Shinden", "Mirage", "12/01/2025"),
    )];

    let swapped = match_data("shinden", "IMPERIAL", "mirage", "12/01/2025");
    assert!(importer::is_duplicate(&stored, &swapped));

    let padded = match_data(" Imperial ", "Shinden", "Mirage", "12/01/2025");
    assert!(importer::is_duplicate(&stored, &padded));
}

#[test]
fn different_date_or_map_is_not_a_duplicate() {
    let stored = vec![(
        "existing".to_owned(),
        match_data("Imperial", "Shinden", "Mirage", "12/01/2025"),
    )];

    let other_day = match_data("Imperial", "Shinden", "Mirage", "13/01/2025");
    assert!(!importer::is_duplicate(&stored, &other_day));

    let other_map = match_data("Imperial", "Shinden", "Nuke", "12/01/2025");
    assert!(!importer::is_duplicate(&stored, &other_map));

    let other_opponent = match_data("Imperial", "Legacy", "Mirage", "12/01/2025");
    assert!(!importer::is_duplicate(&stored, &other_opponent));
}
