//! Weekly schedule extraction: the payload groups events under date keys and
//! each event names its competitors with a home flag.

use anyhow::Result;
use log::warn;
use serde_json::Value;

use crate::payload::{dig, pick_bool, pick_str, schedule_url, PayloadSource};
use crate::records::ScheduleRecord;

pub fn extract(
    source: &dyn PayloadSource,
    week: i64,
    year: i64,
    game_type: i64,
) -> Result<Vec<ScheduleRecord>> {
    let Some(payload) = source.fetch(&schedule_url(week, year, game_type))? else {
        warn!("no schedule payload returned for week {week} year {year} type {game_type}");
        return Ok(Vec::new());
    };

    let Some(groups) = dig(&payload, &["page", "content", "events"]).and_then(Value::as_object)
    else {
        return Ok(Vec::new());
    };

    let mut records = Vec::new();
    for (date, events) in groups {
        let Some(events) = events.as_array() else {
            continue;
        };
        for event in events {
            let Some(mut record) = event_record(event) else {
                warn!("event in {date} group is missing a home or away competitor");
                continue;
            };
            record.year = year;
            record.week = week;
            record.game_type = game_type;
            record.game_date = date.clone();
            records.push(record);
        }
    }
    Ok(records)
}

/// Weeks played for a season type. Preseason runs four weeks; the
/// postseason dropped week 4 (the bye before the final) after 2009; the
/// regular season grew to 18 weeks in 2021.
pub fn season_weeks(year: i64, game_type: i64) -> Vec<i64> {
    match game_type {
        1 => (1..=4).collect(),
        3 => {
            if year <= 2009 {
                (1..=4).collect()
            } else {
                vec![1, 2, 3, 5]
            }
        }
        _ => {
            if year <= 2020 {
                (1..=17).collect()
            } else {
                (1..=18).collect()
            }
        }
    }
}

/// One record per event, `None` when either side is absent. The first
/// competitor flagged home and the first not flagged home are taken.
fn event_record(event: &Value) -> Option<ScheduleRecord> {
    let competitors = event.get("competitors")?.as_array()?;
    let home = competitors.iter().find(|c| pick_bool(c, "isHome"))?;
    let away = competitors.iter().find(|c| !pick_bool(c, "isHome"))?;

    Some(ScheduleRecord {
        game_id: pick_str(event, "id"),
        home_team_code: pick_str(home, "abbrev"),
        home_team: pick_str(home, "displayName"),
        away_team_code: pick_str(away, "abbrev"),
        away_team: pick_str(away, "displayName"),
        ..ScheduleRecord::default()
    })
}
