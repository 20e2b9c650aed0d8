use serde::{Deserialize, Serialize};

/// One input row from a schedule parquet file, identifying a game to process.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScheduleRow {
    pub game_id: String,
    pub year: i64,
    pub week: i64,
    pub game_type: String,
}

/// Partition fields attached uniformly to every record of one extraction
/// call: all records for a game carry the same week/year/game_type.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TeamStatRecord {
    pub team: String,
    pub team_url: String,
    pub opponent: String,
    pub statistic_name: String,
    pub statistic_value: f64,
    pub week: i64,
    pub year: i64,
    pub game_type: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PlayerStatRecord {
    pub player_name: String,
    pub player_url: String,
    pub team: String,
    pub opponent: String,
    pub statistic_type: String,
    pub statistic_code: String,
    pub statistic_name: String,
    pub statistic_value: f64,
    pub week: i64,
    pub year: i64,
    pub game_type: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ScheduleRecord {
    pub game_id: String,
    pub home_team_code: String,
    pub home_team: String,
    pub away_team_code: String,
    pub away_team: String,
    pub year: i64,
    pub week: i64,
    pub game_type: i64,
    pub game_date: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GameInfoRecord {
    pub game_id: String,
    pub home_team: String,
    pub away_team: String,
    pub location: String,
    pub city: String,
    pub state: String,
    pub game_date: String,
    pub week: i64,
    pub year: i64,
    pub game_type: String,
    pub is_conference: bool,
    pub note: String,
    pub home_score: i64,
    pub away_score: i64,
    pub line: String,
    pub over_under: f64,
}
