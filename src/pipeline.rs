//! Schedule-driven extraction: one schedule row at a time, fully processed
//! before the next, accumulating into a single output batch.

use anyhow::Result;
use log::warn;

use crate::game_info;
use crate::payload::PayloadSource;
use crate::player_stats;
use crate::records::{GameInfoRecord, PlayerStatRecord, ScheduleRow, TeamStatRecord};
use crate::team_stats;

pub const STAT_KINDS: &[&str] = &["teams", "players", "games"];

/// Accumulated output of one pipeline run; only the collection matching the
/// requested kind is populated.
#[derive(Debug, Default)]
pub struct StatBatch {
    pub teams: Vec<TeamStatRecord>,
    pub players: Vec<PlayerStatRecord>,
    pub games: Vec<GameInfoRecord>,
}

impl StatBatch {
    pub fn len(&self) -> usize {
        self.teams.len() + self.players.len() + self.games.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[derive(Debug, Default)]
pub struct Outcome {
    pub batch: StatBatch,
    pub rows_processed: usize,
    pub rows_empty: usize,
}

/// Processes every schedule row sequentially through the extractor selected
/// by `kind`. Rows that yield nothing are counted and skipped; an
/// unrecognized kind yields no results at all. Transport errors propagate
/// and end the run.
pub fn run(source: &dyn PayloadSource, rows: &[ScheduleRow], kind: &str) -> Result<Outcome> {
    if !STAT_KINDS.contains(&kind) {
        warn!("unrecognized stat kind: {kind}");
    }

    let mut outcome = Outcome::default();
    for row in rows {
        let before = outcome.batch.len();
        match kind {
            "teams" => outcome.batch.teams.extend(team_stats::extract(
                source,
                &row.game_id,
                row.week,
                row.year,
                &row.game_type,
            )?),
            "players" => outcome.batch.players.extend(player_stats::extract(
                source,
                &row.game_id,
                row.week,
                row.year,
                &row.game_type,
            )?),
            "games" => {
                if let Some(record) = game_info::extract(
                    source,
                    &row.game_id,
                    row.week,
                    row.year,
                    &row.game_type,
                )? {
                    outcome.batch.games.push(record);
                }
            }
            _ => {}
        }
        outcome.rows_processed += 1;
        if outcome.batch.len() == before {
            outcome.rows_empty += 1;
        }
    }
    Ok(outcome)
}
