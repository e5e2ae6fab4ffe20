//! The `academy sessions` command.

use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::NaiveDate;

use academy_core::config::load_config_from;
use academy_core::model::{format_session_date, Session};
use academy_core::report::{load_sessions, ReportFilters};
use academy_core::roster::validate_roster;

pub fn execute(
    roster_path: PathBuf,
    batch: Option<String>,
    from: NaiveDate,
    to: NaiveDate,
    seed: Option<u64>,
    output: Option<PathBuf>,
    config_path: Option<PathBuf>,
) -> Result<()> {
    let config = load_config_from(config_path.as_deref())?;

    let students = super::read_students(&roster_path, batch.as_deref())?;
    for warning in validate_roster(&students) {
        tracing::warn!("{}", warning.message);
    }

    let filters = ReportFilters {
        batch,
        from: Some(from),
        to: Some(to),
        ..Default::default()
    };
    let mut rng = super::make_rng(seed.or(config.seed));
    let sessions = load_sessions(&students, &filters, &mut rng)?;

    print_sessions(&sessions);

    if let Some(path) = output {
        save_sessions(&sessions, &path)?;
        eprintln!("Sessions saved to: {}", path.display());
    }

    Ok(())
}

fn save_sessions(sessions: &[Session], path: &std::path::Path) -> Result<()> {
    let json = serde_json::to_string_pretty(sessions).context("failed to serialize sessions")?;
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, json)
        .with_context(|| format!("failed to write sessions to {}", path.display()))?;
    Ok(())
}

fn print_sessions(sessions: &[Session]) {
    use comfy_table::{Cell, Table};

    let mut table = Table::new();
    table.set_header(vec!["Session", "Date", "Students"]);
    for s in sessions {
        table.add_row(vec![
            Cell::new(s.session_id),
            Cell::new(format_session_date(s.date)),
            Cell::new(s.results.len()),
        ]);
    }
    println!("{table}");
}
