use std::path::{Path, PathBuf};

use anyhow::{Context, Result, anyhow};
use log::{info, warn};

use statpull::payload::PageSource;
use statpull::pipeline;
use statpull::store;

fn main() -> Result<()> {
    env_logger::init();

    let schedule_path = parse_arg("schedule")
        .map(PathBuf::from)
        .context("--schedule <file> is required")?;
    let out_dir = parse_arg("output")
        .map(PathBuf::from)
        .context("--output <dir> is required")?;
    let kind = parse_arg("stat").context("--stat <teams|players|games> is required")?;

    if !schedule_path.exists() {
        return Err(anyhow!(
            "schedule file not found: {}",
            schedule_path.display()
        ));
    }

    info!(
        "processing schedule file for {kind} stats: {}",
        schedule_path.display()
    );
    let rows = store::read_schedule_rows(&schedule_path)?;
    if rows.is_empty() {
        return Err(anyhow!(
            "no schedule records in {}",
            schedule_path.display()
        ));
    }

    let source = PageSource;
    let outcome = pipeline::run(&source, &rows, &kind)?;
    if outcome.rows_empty > 0 {
        info!(
            "{} of {} schedule rows produced no records",
            outcome.rows_empty, outcome.rows_processed
        );
    }
    if outcome.batch.is_empty() {
        warn!("no {kind} stats loaded from schedule file");
        return Ok(());
    }

    let output_path = store::stat_output_path(&schedule_path, &out_dir, &kind);
    info!("writing output to {}", output_path.display());
    write_batch(&output_path, &kind, &outcome.batch)?;
    info!("done");
    Ok(())
}

fn write_batch(path: &Path, kind: &str, batch: &pipeline::StatBatch) -> Result<()> {
    match kind {
        "teams" => store::write_team_stats(path, &batch.teams),
        "players" => store::write_player_stats(path, &batch.players),
        "games" => store::write_game_info(path, &batch.games),
        other => Err(anyhow!("unrecognized stat kind: {other}")),
    }
}

fn parse_arg(name: &str) -> Option<String> {
    let args = std::env::args().skip(1).collect::<Vec<_>>();
    let flag = format!("--{name}");
    let prefixed = format!("--{name}=");
    for (idx, arg) in args.iter().enumerate() {
        if let Some(v) = arg.strip_prefix(&prefixed)
            && !v.trim().is_empty()
        {
            return Some(v.to_string());
        }
        if *arg == flag
            && let Some(next) = args.get(idx + 1)
            && !next.trim().is_empty()
        {
            return Some(next.clone());
        }
    }
    None
}
