use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;

use anyhow::Result;
use serde_json::Value;

use statpull::payload::{
    boxscore_url, dig, matchup_url, parse_embedded_state, schedule_url, PayloadSource,
};
use statpull::records::ScheduleRow;
use statpull::{game_info, pipeline, player_stats, schedule, team_stats};

fn read_fixture(name: &str) -> String {
    let mut path = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    path.push("tests");
    path.push("fixtures");
    path.push(name);
    fs::read_to_string(path).expect("fixture file should be readable")
}

fn fixture_json(name: &str) -> Value {
    serde_json::from_str(&read_fixture(name)).expect("fixture should be valid json")
}

struct FixtureSource {
    pages: HashMap<String, Value>,
}

impl FixtureSource {
    fn with(pages: &[(String, &str)]) -> Self {
        FixtureSource {
            pages: pages
                .iter()
                .map(|(url, fixture)| (url.clone(), fixture_json(fixture)))
                .collect(),
        }
    }
}

impl PayloadSource for FixtureSource {
    fn fetch(&self, url: &str) -> Result<Option<Value>> {
        Ok(self.pages.get(url).cloned())
    }
}

#[test]
fn embedded_state_extracts_from_rendered_page() {
    let html = read_fixture("matchup_page.html");
    let payload = parse_embedded_state(&html).expect("page should carry embedded state");
    let home = dig(
        &payload,
        &["page", "content", "gamepackage", "tmStats", "home", "t"],
    )
    .expect("home team present");
    assert_eq!(home["dspNm"], "Buffalo Bills");
}

#[test]
fn team_stats_from_matchup_fixture() {
    let source = FixtureSource::with(&[(matchup_url("401547321"), "matchup.json")]);
    let records = team_stats::extract(&source, "401547321", 4, 2023, "2").expect("extract");

    // Home: completionAttempts (2) + thirdDownEff (2) + possessionTime (1)
    // + totalYards + yardsPerPass. Away: completionAttempts (2) + totalYards.
    assert_eq!(records.len(), 10);
    assert!(records
        .iter()
        .all(|r| r.week == 4 && r.year == 2023 && r.game_type == "2"));

    let completions: Vec<_> = records
        .iter()
        .filter(|r| r.statistic_name == "completions")
        .collect();
    assert_eq!(completions.len(), 2);
    let home = completions
        .iter()
        .find(|r| r.team == "Buffalo Bills")
        .expect("home record");
    assert_eq!(home.statistic_value, 31.0);
    assert_eq!(home.opponent, "Miami Dolphins");
    assert_eq!(
        home.team_url,
        "https://www.espn.com/nfl/team/_/name/buf/buffalo-bills"
    );

    let possession = records
        .iter()
        .find(|r| r.statistic_name == "possessiontime")
        .expect("possession record");
    assert_eq!(possession.statistic_value, 33.0 * 60.0 + 29.0);

    let third_down: Vec<_> = records
        .iter()
        .filter(|r| r.statistic_name.starts_with("thirddown"))
        .collect();
    assert_eq!(third_down.len(), 2);
    assert_eq!(third_down[0].statistic_value, 7.0);
    assert_eq!(third_down[1].statistic_value, 14.0);
}

#[test]
fn team_stats_missing_payload_is_empty() {
    let source = FixtureSource { pages: HashMap::new() };
    let records = team_stats::extract(&source, "401547321", 4, 2023, "2").expect("extract");
    assert!(records.is_empty());
}

#[test]
fn player_stats_from_boxscore_fixture() {
    let source = FixtureSource::with(&[(boxscore_url("401547321"), "boxscore.json")]);
    let records = player_stats::extract(&source, "401547321", 4, 2023, "2").expect("extract");

    // Allen: C/ATT splits into 2 + yds. Bass: FG and XP each split into 2.
    // Mostert: 2 plain rushing stats.
    assert_eq!(records.len(), 9);
    assert!(records
        .iter()
        .all(|r| r.week == 4 && r.year == 2023 && r.game_type == "2"));

    let passing_yards = records
        .iter()
        .find(|r| r.statistic_code == "passingyards")
        .expect("passing yards record");
    assert_eq!(passing_yards.statistic_name, "yds");
    assert_eq!(passing_yards.statistic_value, 241.0);
    assert_eq!(passing_yards.player_name, "Josh Allen");
    assert_eq!(passing_yards.team, "Buffalo Bills");
    assert_eq!(passing_yards.opponent, "Miami Dolphins");
    assert_eq!(passing_yards.statistic_type, "passing");

    let kicking_codes: Vec<_> = records
        .iter()
        .filter(|r| r.statistic_type == "kicking")
        .map(|r| r.statistic_code.as_str())
        .collect();
    assert_eq!(kicking_codes, vec!["fgm", "fga", "xpm", "xpa"]);

    let mostert: Vec<_> = records
        .iter()
        .filter(|r| r.player_name == "Raheem Mostert")
        .collect();
    assert_eq!(mostert.len(), 2);
    assert!(mostert.iter().all(|r| r.team == "Miami Dolphins"
        && r.opponent == "Buffalo Bills"));
}

#[test]
fn schedule_from_fixture_resolves_sides_and_skips_malformed() {
    let source = FixtureSource::with(&[(schedule_url(4, 2023, 2), "schedule.json")]);
    let records = schedule::extract(&source, 4, 2023, 2).expect("extract");

    // Three events in the fixture; the Jets event has no away side.
    assert_eq!(records.len(), 2);
    let bills = records
        .iter()
        .find(|r| r.game_id == "401547321")
        .expect("bills game");
    assert_eq!(bills.home_team_code, "BUF");
    assert_eq!(bills.away_team_code, "MIA");
    assert_eq!(bills.game_date, "2023-10-01");
    assert_eq!(bills.year, 2023);
    assert_eq!(bills.week, 4);
    assert_eq!(bills.game_type, 2);

    let giants = records
        .iter()
        .find(|r| r.game_id == "401547330")
        .expect("giants game");
    assert_eq!(giants.game_date, "2023-10-02");
}

#[test]
fn game_info_from_matchup_fixture() {
    let source = FixtureSource::with(&[(matchup_url("401547321"), "matchup.json")]);
    let record = game_info::extract(&source, "401547321", 4, 2023, "2")
        .expect("extract")
        .expect("record");

    assert_eq!(record.home_team, "Buffalo Bills");
    assert_eq!(record.away_team, "Miami Dolphins");
    assert_eq!(record.home_score, 48);
    assert_eq!(record.away_score, 20);
    assert_eq!(record.location, "Highmark Stadium");
    assert_eq!(record.city, "Orchard Park");
    assert_eq!(record.state, "NY");
    assert_eq!(record.line, "-4.5");
    assert_eq!(record.over_under, 48.5);
    assert!(record.is_conference);
}

#[test]
fn pipeline_concatenates_across_rows() {
    let source = FixtureSource::with(&[(matchup_url("401547321"), "matchup.json")]);
    let rows = vec![
        ScheduleRow {
            game_id: "401547321".to_string(),
            year: 2023,
            week: 4,
            game_type: "2".to_string(),
        },
        ScheduleRow {
            game_id: "missing".to_string(),
            year: 2023,
            week: 4,
            game_type: "2".to_string(),
        },
    ];
    let outcome = pipeline::run(&source, &rows, "games").expect("run");
    assert_eq!(outcome.rows_processed, 2);
    assert_eq!(outcome.rows_empty, 1);
    assert_eq!(outcome.batch.games.len(), 1);
    assert_eq!(outcome.batch.games[0].game_id, "401547321");
}
