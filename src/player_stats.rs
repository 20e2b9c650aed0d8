//! Player-level box-score statistics. The payload carries two team blocks,
//! each holding stat categories with parallel `keys`/`lbls` arrays and a list
//! of athletes whose value arrays align positionally against them.

use anyhow::Result;
use log::warn;
use serde_json::Value;

use crate::payload::{boxscore_url, dig, dig_or_null, pick_bool, pick_str, string_list, PayloadSource};
use crate::records::PlayerStatRecord;
use crate::splitter::numeric_or_zero;

pub fn extract(
    source: &dyn PayloadSource,
    game_id: &str,
    week: i64,
    year: i64,
    game_type: &str,
) -> Result<Vec<PlayerStatRecord>> {
    let Some(payload) = source.fetch(&boxscore_url(game_id))? else {
        warn!("no stats payload returned for {game_id}");
        return Ok(Vec::new());
    };

    let mut records = build_stats(&payload);
    for record in &mut records {
        record.week = week;
        record.year = year;
        record.game_type = game_type.to_string();
    }
    Ok(records)
}

fn build_stats(payload: &Value) -> Vec<PlayerStatRecord> {
    let blocks = dig(payload, &["page", "content", "gamepackage", "bxscr"]).and_then(Value::as_array);
    let Some(blocks) = blocks else {
        warn!("home and away team stats not specified");
        return Vec::new();
    };
    if blocks.len() != 2 {
        warn!("home and away team stats not specified");
        return Vec::new();
    }

    let home_block = blocks.iter().find(|b| pick_bool(dig_or_null(b, &["tm"]), "hm"));
    let away_block = blocks.iter().find(|b| !pick_bool(dig_or_null(b, &["tm"]), "hm"));
    let (Some(home_block), Some(away_block)) = (home_block, away_block) else {
        warn!("box score is missing a home or away team block");
        return Vec::new();
    };

    let home_team = pick_str(dig_or_null(home_block, &["tm"]), "dspNm");
    let away_team = pick_str(dig_or_null(away_block, &["tm"]), "dspNm");

    let mut records = team_block_stats(home_block, &home_team, &away_team);
    records.extend(team_block_stats(away_block, &away_team, &home_team));
    records
}

fn team_block_stats(block: &Value, team: &str, opponent: &str) -> Vec<PlayerStatRecord> {
    let mut records = Vec::new();
    let Some(categories) = block.get("stats").and_then(Value::as_array) else {
        return records;
    };

    for category in categories {
        let keys = string_list(category.get("keys"));
        let labels = string_list(category.get("lbls"));
        let stat_type = pick_str(category, "type");
        if keys.len() != labels.len() {
            warn!("labels and key list not the same size for {stat_type}");
        }

        let Some(athletes) = category.get("athlts").and_then(Value::as_array) else {
            continue;
        };
        for athlete in athletes {
            records.extend(athlete_stats(athlete, &keys, &labels, &stat_type));
        }
    }

    for record in &mut records {
        record.team = team.to_string();
        record.opponent = opponent.to_string();
    }
    records
}

fn athlete_stats(
    athlete: &Value,
    keys: &[String],
    labels: &[String],
    stat_type: &str,
) -> Vec<PlayerStatRecord> {
    let identity = dig_or_null(athlete, &["athlt"]);
    let player_name = pick_str(identity, "dspNm");
    let player_url = pick_str(identity, "lnk");

    let values = string_list(athlete.get("stats"));
    let mut records = Vec::new();
    for (index, value) in values.iter().enumerate() {
        // Value arrays can run longer than the key/label arrays; extra
        // positions have no name to attach to and are skipped.
        let (Some(key), Some(label)) = (keys.get(index), labels.get(index)) else {
            continue;
        };

        if value.contains('/') {
            records.extend(split_composite(&player_name, &player_url, value, label, key));
        } else {
            records.push(PlayerStatRecord {
                player_name: player_name.clone(),
                player_url: player_url.clone(),
                statistic_code: label.to_lowercase(),
                statistic_name: key.to_lowercase(),
                statistic_value: numeric_or_zero(value),
                ..PlayerStatRecord::default()
            });
        }
    }

    for record in &mut records {
        record.statistic_type = stat_type.to_string();
    }
    records
}

/// Splits a slash-joined value into one record per segment. Kicking codes
/// have fixed made/attempted expansions; any other code splits on '/'. The
/// code, label and value segments must agree in count or the stat is dropped.
fn split_composite(
    player_name: &str,
    player_url: &str,
    value: &str,
    code: &str,
    label: &str,
) -> Vec<PlayerStatRecord> {
    let codes: Vec<&str> = match code {
        "XP" => vec!["XPM", "XPA"],
        "FG" => vec!["FGM", "FGA"],
        _ => code.split('/').collect(),
    };
    let labels: Vec<&str> = label.split('/').collect();
    let values: Vec<&str> = value.split('/').collect();

    if codes.len() != labels.len() || labels.len() != values.len() {
        warn!("mismatched segments splitting stat: {code} | {label} | {value}");
        return Vec::new();
    }

    codes
        .iter()
        .zip(&labels)
        .zip(&values)
        .map(|((c, l), v)| PlayerStatRecord {
            player_name: player_name.to_string(),
            player_url: player_url.to_string(),
            statistic_code: c.to_lowercase(),
            statistic_name: l.to_lowercase(),
            statistic_value: numeric_or_zero(v),
            ..PlayerStatRecord::default()
        })
        .collect()
}
