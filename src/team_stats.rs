//! Team-level matchup statistics: walks the payload's home/away stat blocks
//! and flattens each entry into one or two records.

use std::collections::HashMap;

use anyhow::Result;
use log::warn;
use once_cell::sync::Lazy;
use serde_json::Value;

use crate::payload::{dig_or_null, matchup_url, pick_f64, pick_str, PayloadSource, SITE_ORIGIN};
use crate::records::TeamStatRecord;
use crate::splitter::split_stat;

/// Composite source fields and the pair of output names their halves map to,
/// in order.
static STAT_SPLITS: Lazy<HashMap<&'static str, [&'static str; 2]>> = Lazy::new(|| {
    HashMap::from([
        ("completionAttempts", ["completions", "attempts"]),
        (
            "fourthDownEff",
            ["fourthdowncompletions", "fourthdownattempts"],
        ),
        ("redZoneAttempts", ["redzonecompletions", "redzoneattempts"]),
        ("sacksYardsLost", ["sacks", "sackyards"]),
        ("thirdDownEff", ["thirddowncompletions", "thirddownattempts"]),
        ("totalPenaltiesYards", ["penalties", "penaltyyards"]),
    ])
});

#[derive(Debug, Clone, Default)]
pub struct TeamIdentity {
    pub name: String,
    pub url: String,
}

impl TeamIdentity {
    fn from_entry(entry: &Value) -> Self {
        let team = dig_or_null(entry, &["t"]);
        TeamIdentity {
            name: pick_str(team, "dspNm"),
            url: format!("{SITE_ORIGIN}{}", pick_str(team, "lnk")),
        }
    }
}

pub fn extract(
    source: &dyn PayloadSource,
    game_id: &str,
    week: i64,
    year: i64,
    game_type: &str,
) -> Result<Vec<TeamStatRecord>> {
    let Some(payload) = source.fetch(&matchup_url(game_id))? else {
        warn!("no stats payload returned for {game_id}");
        return Ok(Vec::new());
    };

    let stats_block = dig_or_null(&payload, &["page", "content", "gamepackage", "tmStats"]);
    let home_entry = dig_or_null(stats_block, &["home"]);
    let away_entry = dig_or_null(stats_block, &["away"]);

    let home = TeamIdentity::from_entry(home_entry);
    let away = TeamIdentity::from_entry(away_entry);

    let mut records = normalize(&home, &away.name, dig_or_null(home_entry, &["s"]));
    records.extend(normalize(&away, &home.name, dig_or_null(away_entry, &["s"])));

    for record in &mut records {
        record.week = week;
        record.year = year;
        record.game_type = game_type.to_string();
    }
    Ok(records)
}

/// Flattens one team's raw stats map. Mapped composite fields must split into
/// exactly two numeric parts or they contribute nothing; possession time
/// collapses to total seconds; everything else passes through with the
/// entry's label lower-cased.
pub fn normalize(team: &TeamIdentity, opponent: &str, stats: &Value) -> Vec<TeamStatRecord> {
    let Some(entries) = stats.as_object() else {
        return Vec::new();
    };

    let mut records = Vec::new();
    for (field, entry) in entries {
        if let Some(names) = STAT_SPLITS.get(field.as_str()) {
            let parts = split_stat(&pick_str(entry, "d"));
            if parts.len() == 2 {
                for (name, part) in names.iter().zip(parts) {
                    records.push(stat_record(team, opponent, name, part));
                }
            }
            continue;
        }

        if field == "possessionTime" {
            let parts = split_stat(&pick_str(entry, "d"));
            if parts.len() == 2 {
                let total_seconds = parts[0] * 60.0 + parts[1];
                records.push(stat_record(team, opponent, "possessiontime", total_seconds));
            }
            continue;
        }

        let name = pick_str(entry, "n").to_lowercase();
        records.push(stat_record(team, opponent, &name, pick_f64(entry, "d")));
    }
    records
}

fn stat_record(team: &TeamIdentity, opponent: &str, name: &str, value: f64) -> TeamStatRecord {
    TeamStatRecord {
        team: team.name.clone(),
        team_url: team.url.clone(),
        opponent: opponent.to_string(),
        statistic_name: name.to_string(),
        statistic_value: value,
        ..TeamStatRecord::default()
    }
}
