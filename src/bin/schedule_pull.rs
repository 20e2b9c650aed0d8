use std::path::PathBuf;

use anyhow::{Context, Result};
use log::{error, info};

use statpull::payload::PageSource;
use statpull::schedule;
use statpull::store;

fn main() -> Result<()> {
    env_logger::init();

    let year: i64 = parse_arg("year")
        .and_then(|v| v.parse().ok())
        .context("--year <season> is required")?;
    let out_dir = parse_arg("output")
        .map(PathBuf::from)
        .context("--output <dir> is required")?;
    let week: Option<i64> = parse_arg("week").and_then(|v| v.parse().ok());
    let game_type: Option<i64> = parse_arg("type").and_then(|v| v.parse().ok());

    let game_types = game_type.map(|t| vec![t]).unwrap_or_else(|| vec![1, 2, 3]);
    let source = PageSource;

    info!("retrieving schedule for {year}");
    for gt in game_types {
        let weeks = week
            .map(|w| vec![w])
            .unwrap_or_else(|| schedule::season_weeks(year, gt));
        for wk in weeks {
            let output_path = store::schedule_output_path(&out_dir, year, gt, wk);
            let records = schedule::extract(&source, wk, year, gt)?;
            if records.is_empty() {
                error!("failed to retrieve schedule for type {gt} : week {wk}");
                continue;
            }
            info!("writing output {}", output_path.display());
            store::write_schedule_records(&output_path, &records)?;
        }
    }
    info!("done");
    Ok(())
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
