//! Single-record game metadata: venue, score, betting line. Every leaf
//! defaults when absent; the only hard requirement is one scored team per
//! side in the game strip.

use anyhow::Result;
use log::warn;
use serde_json::Value;

use crate::payload::{dig_or_null, matchup_url, pick_bool, pick_f64, pick_str, PayloadSource};
use crate::records::GameInfoRecord;

pub fn extract(
    source: &dyn PayloadSource,
    game_id: &str,
    week: i64,
    year: i64,
    game_type: &str,
) -> Result<Option<GameInfoRecord>> {
    let Some(payload) = source.fetch(&matchup_url(game_id))? else {
        warn!("no stats payload returned for {game_id}");
        return Ok(None);
    };
    Ok(build_info(&payload, game_id, week, year, game_type))
}

fn build_info(
    payload: &Value,
    game_id: &str,
    week: i64,
    year: i64,
    game_type: &str,
) -> Option<GameInfoRecord> {
    let game_info = dig_or_null(payload, &["page", "content", "gamepackage", "gmInfo"]);
    let team_stats = dig_or_null(payload, &["page", "content", "gamepackage", "tmStats"]);
    let game_strip = dig_or_null(payload, &["page", "content", "gamepackage", "gmStrp"]);

    let teams = game_strip.get("tms").and_then(Value::as_array);
    let Some(home_score) = side_score(teams, true) else {
        warn!("game strip for {game_id} has no home team score");
        return None;
    };
    let Some(away_score) = side_score(teams, false) else {
        warn!("game strip for {game_id} has no away team score");
        return None;
    };

    let address = dig_or_null(game_info, &["locAddr"]);

    Some(GameInfoRecord {
        game_id: game_id.to_string(),
        home_team: pick_str(dig_or_null(team_stats, &["home", "t"]), "dspNm"),
        away_team: pick_str(dig_or_null(team_stats, &["away", "t"]), "dspNm"),
        location: pick_str(game_info, "loc"),
        city: pick_str(address, "city"),
        state: pick_str(address, "state"),
        game_date: pick_str(game_info, "dtTm"),
        week,
        year,
        game_type: game_type.to_string(),
        is_conference: pick_bool(game_strip, "isConferenceGame"),
        note: pick_str(game_strip, "nte"),
        home_score,
        away_score,
        line: last_token(&pick_str(game_info, "lne")),
        over_under: pick_f64(game_info, "ovUnd"),
    })
}

/// Score of the first team matching the home flag, `None` when no team on
/// that side exists. Unparseable scores read as 0.
fn side_score(teams: Option<&Vec<Value>>, is_home: bool) -> Option<i64> {
    let side = teams?
        .iter()
        .find(|team| pick_bool(team, "isHome") == is_home)?;
    Some(match side.get("score") {
        Some(Value::Number(n)) => n.as_i64().unwrap_or(0),
        Some(Value::String(s)) => s.trim().parse().unwrap_or(0),
        _ => 0,
    })
}

/// The spread arrives as free text ("BUF -4.5"); the number is the last
/// whitespace-delimited token.
fn last_token(text: &str) -> String {
    text.split_whitespace().last().unwrap_or_default().to_string()
}
