//! Parquet persistence: schedule files in, one combined stat file out per
//! schedule file. Reading goes through the row API so column order in the
//! input does not matter; writing builds arrow record batches.

use std::collections::HashMap;
use std::ffi::OsStr;
use std::fs::{self, File};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use log::warn;
use arrow_array::{BooleanArray, Float64Array, Int64Array, RecordBatch, StringArray};
use arrow_schema::{DataType, Field, Schema};
use parquet::arrow::ArrowWriter;
use parquet::file::reader::{FileReader, SerializedFileReader};
use parquet::record::{Row, RowAccessor};

use crate::records::{GameInfoRecord, PlayerStatRecord, ScheduleRecord, ScheduleRow, TeamStatRecord};

pub fn read_schedule_rows(path: &Path) -> Result<Vec<ScheduleRow>> {
    let file =
        File::open(path).with_context(|| format!("open schedule file {}", path.display()))?;
    let reader = SerializedFileReader::new(file)
        .with_context(|| format!("open parquet reader {}", path.display()))?;

    let columns: HashMap<String, usize> = reader
        .metadata()
        .file_metadata()
        .schema_descr()
        .columns()
        .iter()
        .enumerate()
        .map(|(idx, col)| (col.name().to_string(), idx))
        .collect();
    let game_id_idx = *columns
        .get("game_id")
        .context("schedule file missing game_id column")?;
    let year_idx = *columns
        .get("year")
        .context("schedule file missing year column")?;
    let week_idx = *columns
        .get("week")
        .context("schedule file missing week column")?;
    let game_type_idx = *columns
        .get("game_type")
        .context("schedule file missing game_type column")?;

    let iter = reader.get_row_iter(None).context("iterate schedule rows")?;
    let mut rows = Vec::new();
    for row in iter {
        let Ok(row) = row else {
            warn!("skipping unreadable row in {}", path.display());
            continue;
        };
        let game_id = read_string(&row, game_id_idx);
        if game_id.trim().is_empty() {
            continue;
        }
        rows.push(ScheduleRow {
            game_id,
            year: read_long(&row, year_idx),
            week: read_long(&row, week_idx),
            game_type: read_string(&row, game_type_idx),
        });
    }
    Ok(rows)
}

fn read_string(row: &Row, idx: usize) -> String {
    if let Ok(v) = row.get_string(idx) {
        return v.clone();
    }
    if let Ok(v) = row.get_long(idx) {
        return v.to_string();
    }
    if let Ok(v) = row.get_int(idx) {
        return v.to_string();
    }
    String::new()
}

fn read_long(row: &Row, idx: usize) -> i64 {
    if let Ok(v) = row.get_long(idx) {
        return v;
    }
    if let Ok(v) = row.get_int(idx) {
        return v as i64;
    }
    if let Ok(v) = row.get_string(idx) {
        return v.trim().parse().unwrap_or(0);
    }
    0
}

/// Output key for a stat batch: the schedule file's own partition path with
/// the "schedules" segment swapped for the stat kind. Schedule paths without
/// that segment land under `out_dir/kind/`.
pub fn stat_output_path(schedule_path: &Path, out_dir: &Path, kind: &str) -> PathBuf {
    let components: Vec<&OsStr> = schedule_path.iter().collect();
    if let Some(pos) = components.iter().position(|c| *c == "schedules") {
        let mut path = out_dir.join(kind);
        for part in &components[pos + 1..] {
            path.push(part);
        }
        return path;
    }
    let file_name = schedule_path.file_name().unwrap_or_default();
    out_dir.join(kind).join(file_name)
}

pub fn schedule_output_path(out_dir: &Path, year: i64, game_type: i64, week: i64) -> PathBuf {
    out_dir
        .join("schedules")
        .join(format!("year={year}"))
        .join(format!("type={game_type}"))
        .join(format!("week_{week}.parquet"))
}

fn write_batch(path: &Path, batch: RecordBatch) -> Result<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent)
            .with_context(|| format!("creating output directory {}", parent.display()))?;
    }
    let file = File::create(path).with_context(|| format!("creating {}", path.display()))?;
    let mut writer = ArrowWriter::try_new(file, batch.schema(), None)
        .with_context(|| format!("opening parquet writer {}", path.display()))?;
    writer
        .write(&batch)
        .with_context(|| format!("writing record batch {}", path.display()))?;
    writer
        .close()
        .with_context(|| format!("closing parquet writer {}", path.display()))?;
    Ok(())
}

fn strings(values: Vec<&str>) -> Arc<StringArray> {
    Arc::new(StringArray::from(values))
}

pub fn write_schedule_records(path: &Path, records: &[ScheduleRecord]) -> Result<()> {
    let schema = Arc::new(Schema::new(vec![
        Field::new("game_id", DataType::Utf8, false),
        Field::new("home_team_code", DataType::Utf8, false),
        Field::new("home_team", DataType::Utf8, false),
        Field::new("away_team_code", DataType::Utf8, false),
        Field::new("away_team", DataType::Utf8, false),
        Field::new("year", DataType::Int64, false),
        Field::new("week", DataType::Int64, false),
        Field::new("game_type", DataType::Int64, false),
        Field::new("game_date", DataType::Utf8, false),
    ]));
    let batch = RecordBatch::try_new(
        schema,
        vec![
            strings(records.iter().map(|r| r.game_id.as_str()).collect()),
            strings(records.iter().map(|r| r.home_team_code.as_str()).collect()),
            strings(records.iter().map(|r| r.home_team.as_str()).collect()),
            strings(records.iter().map(|r| r.away_team_code.as_str()).collect()),
            strings(records.iter().map(|r| r.away_team.as_str()).collect()),
            Arc::new(Int64Array::from(
                records.iter().map(|r| r.year).collect::<Vec<_>>(),
            )),
            Arc::new(Int64Array::from(
                records.iter().map(|r| r.week).collect::<Vec<_>>(),
            )),
            Arc::new(Int64Array::from(
                records.iter().map(|r| r.game_type).collect::<Vec<_>>(),
            )),
            strings(records.iter().map(|r| r.game_date.as_str()).collect()),
        ],
    )
    .context("building schedule record batch")?;
    write_batch(path, batch)
}

pub fn write_team_stats(path: &Path, records: &[TeamStatRecord]) -> Result<()> {
    let schema = Arc::new(Schema::new(vec![
        Field::new("team", DataType::Utf8, false),
        Field::new("team_url", DataType::Utf8, false),
        Field::new("opponent", DataType::Utf8, false),
        Field::new("statistic_name", DataType::Utf8, false),
        Field::new("statistic_value", DataType::Float64, false),
        Field::new("week", DataType::Int64, false),
        Field::new("year", DataType::Int64, false),
        Field::new("game_type", DataType::Utf8, false),
    ]));
    let batch = RecordBatch::try_new(
        schema,
        vec![
            strings(records.iter().map(|r| r.team.as_str()).collect()),
            strings(records.iter().map(|r| r.team_url.as_str()).collect()),
            strings(records.iter().map(|r| r.opponent.as_str()).collect()),
            strings(records.iter().map(|r| r.statistic_name.as_str()).collect()),
            Arc::new(Float64Array::from(
                records.iter().map(|r| r.statistic_value).collect::<Vec<_>>(),
            )),
            Arc::new(Int64Array::from(
                records.iter().map(|r| r.week).collect::<Vec<_>>(),
            )),
            Arc::new(Int64Array::from(
                records.iter().map(|r| r.year).collect::<Vec<_>>(),
            )),
            strings(records.iter().map(|r| r.game_type.as_str()).collect()),
        ],
    )
    .context("building team stats record batch")?;
    write_batch(path, batch)
}

pub fn write_player_stats(path: &Path, records: &[PlayerStatRecord]) -> Result<()> {
    let schema = Arc::new(Schema::new(vec![
        Field::new("player_name", DataType::Utf8, false),
        Field::new("player_url", DataType::Utf8, false),
        Field::new("team", DataType::Utf8, false),
        Field::new("opponent", DataType::Utf8, false),
        Field::new("statistic_type", DataType::Utf8, false),
        Field::new("statistic_code", DataType::Utf8, false),
        Field::new("statistic_name", DataType::Utf8, false),
        Field::new("statistic_value", DataType::Float64, false),
        Field::new("week", DataType::Int64, false),
        Field::new("year", DataType::Int64, false),
        Field::new("game_type", DataType::Utf8, false),
    ]));
    let batch = RecordBatch::try_new(
        schema,
        vec![
            strings(records.iter().map(|r| r.player_name.as_str()).collect()),
            strings(records.iter().map(|r| r.player_url.as_str()).collect()),
            strings(records.iter().map(|r| r.team.as_str()).collect()),
            strings(records.iter().map(|r| r.opponent.as_str()).collect()),
            strings(records.iter().map(|r| r.statistic_type.as_str()).collect()),
            strings(records.iter().map(|r| r.statistic_code.as_str()).collect()),
            strings(records.iter().map(|r| r.statistic_name.as_str()).collect()),
            Arc::new(Float64Array::from(
                records.iter().map(|r| r.statistic_value).collect::<Vec<_>>(),
            )),
            Arc::new(Int64Array::from(
                records.iter().map(|r| r.week).collect::<Vec<_>>(),
            )),
            Arc::new(Int64Array::from(
                records.iter().map(|r| r.year).collect::<Vec<_>>(),
            )),
            strings(records.iter().map(|r| r.game_type.as_str()).collect()),
        ],
    )
    .context("building player stats record batch")?;
    write_batch(path, batch)
}

pub fn write_game_info(path: &Path, records: &[GameInfoRecord]) -> Result<()> {
    let schema = Arc::new(Schema::new(vec![
        Field::new("game_id", DataType::Utf8, false),
        Field::new("home_team", DataType::Utf8, false),
        Field::new("away_team", DataType::Utf8, false),
        Field::new("location", DataType::Utf8, false),
        Field::new("city", DataType::Utf8, false),
        Field::new("state", DataType::Utf8, false),
        Field::new("game_date", DataType::Utf8, false),
        Field::new("week", DataType::Int64, false),
        Field::new("year", DataType::Int64, false),
        Field::new("game_type", DataType::Utf8, false),
        Field::new("is_conference", DataType::Boolean, false),
        Field::new("note", DataType::Utf8, false),
        Field::new("home_score", DataType::Int64, false),
        Field::new("away_score", DataType::Int64, false),
        Field::new("line", DataType::Utf8, false),
        Field::new("over_under", DataType::Float64, false),
    ]));
    let batch = RecordBatch::try_new(
        schema,
        vec![
            strings(records.iter().map(|r| r.game_id.as_str()).collect()),
            strings(records.iter().map(|r| r.home_team.as_str()).collect()),
            strings(records.iter().map(|r| r.away_team.as_str()).collect()),
            strings(records.iter().map(|r| r.location.as_str()).collect()),
            strings(records.iter().map(|r| r.city.as_str()).collect()),
            strings(records.iter().map(|r| r.state.as_str()).collect()),
            strings(records.iter().map(|r| r.game_date.as_str()).collect()),
            Arc::new(Int64Array::from(
                records.iter().map(|r| r.week).collect::<Vec<_>>(),
            )),
            Arc::new(Int64Array::from(
                records.iter().map(|r| r.year).collect::<Vec<_>>(),
            )),
            strings(records.iter().map(|r| r.game_type.as_str()).collect()),
            Arc::new(BooleanArray::from(
                records.iter().map(|r| r.is_conference).collect::<Vec<_>>(),
            )),
            strings(records.iter().map(|r| r.note.as_str()).collect()),
            Arc::new(Int64Array::from(
                records.iter().map(|r| r.home_score).collect::<Vec<_>>(),
            )),
            Arc::new(Int64Array::from(
                records.iter().map(|r| r.away_score).collect::<Vec<_>>(),
            )),
            strings(records.iter().map(|r| r.line.as_str()).collect()),
            Arc::new(Float64Array::from(
                records.iter().map(|r| r.over_under).collect::<Vec<_>>(),
            )),
        ],
    )
    .context("building game info record batch")?;
    write_batch(path, batch)
}
