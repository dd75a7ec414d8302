use analysis::{EndReason, MatchData, MatchTeam, Round, Side};

fn main() {
    divan::main();
}

fn synthetic_matches(count: usize) -> Vec<MatchData> {
    (0..count)
        .map(|i| {
            let rounds = (1..=24)
                .map(|number| {
                    let winner = if (number + i as u32) % 3 == 0 {
                        Side::T
                    } else {
                        Side::CT
                    };
                    Round {
                        number,
                        winner,
                        reason: match (number + i as u32) % 4 {
                            0 => EndReason::TargetBombed,
                            1 => EndReason::BombDefused,
                            2 => EndReason::TargetSaved,
                            _ => EndReason::TerroristsEliminated,
                        },
                        duration: "1:45".to_owned(),
                        bomb_planted: number % 2 == 0,
                        total_kills: 3 + number % 7,
                        first_kill: winner,
                    }
                })
                .collect();

            MatchData {
                map_name: ["Mirage", "Nuke", "Inferno", "Ancient"][i % 4].to_owned(),
                date: "12/01/2025".to_owned(),
                duration: "40m".to_owned(),
                team_a: MatchTeam {
                    name: "Imperial".to_owned(),
                    starting_side: Side::CT,
                    score: None,
                    logo: None,
                },
                team_b: MatchTeam {
                    name: "Shinden".to_owned(),
                    starting_side: Side::T,
                    score: None,
                    logo: None,
                },
                rounds,
            }
        })
        .collect()
}

#[divan::bench(args = [16, 128, 1024])]
fn team_stats(bencher: divan::Bencher, count: usize) {
    let matches = synthetic_matches(count);
    let refs: Vec<&MatchData> = matches.iter().collect();

    bencher.bench(|| analysis::stats::team_stats(divan::black_box(&refs), "Imperial"));
}

#[divan::bench(args = [16, 128, 1024])]
fn overview(bencher: divan::Bencher, count: usize) {
    let matches = synthetic_matches(count);
    let refs: Vec<&MatchData> = matches.iter().collect();

    bencher.bench(|| analysis::stats::overview(divan::black_box(&refs)));
}

#[divan::bench(args = [2, 4, 8])]
fn combine(bencher: divan::Bencher, parts: usize) {
    let matches = synthetic_matches(parts);

    bencher.bench(|| analysis::combine::combine(divan::black_box(matches.clone())));
}
