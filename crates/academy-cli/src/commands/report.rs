//! The `academy report` command.

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use chrono::NaiveDate;

use academy_core::config::load_config_from;
use academy_core::model::{Exercise, Session};
use academy_core::report::{format_average, load_sessions, AssessmentReport, ReportFilters, ReportScope};

pub struct ReportArgs {
    pub sessions: Option<PathBuf>,
    pub roster: Option<PathBuf>,
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
    pub session: Option<u32>,
    pub summary: bool,
    pub school: Option<String>,
    pub batch: Option<String>,
    pub seed: Option<u64>,
    pub format: Option<String>,
    pub output: Option<PathBuf>,
    pub save: bool,
    pub config: Option<PathBuf>,
}

pub fn execute(args: ReportArgs) -> Result<()> {
    let config = load_config_from(args.config.as_deref())?;
    let format = args.format.unwrap_or(config.default_format);

    let filters = ReportFilters {
        school: args.school,
        batch: args.batch,
        from: args.from,
        to: args.to,
    };

    let sessions = match (&args.sessions, &args.roster) {
        (Some(path), _) => read_sessions(path)?,
        (None, Some(path)) => {
            let students = super::read_students(path, filters.batch.as_deref())?;
            let mut rng = super::make_rng(args.seed.or(config.seed));
            load_sessions(&students, &filters, &mut rng)?
        }
        (None, None) => bail!("either --sessions or --roster is required"),
    };

    let scope = if args.summary {
        Some(ReportScope::Summary)
    } else {
        args.session.map(ReportScope::Session)
    };

    let report = AssessmentReport::build(&sessions, scope, &filters)?;

    match format.as_str() {
        "json" => println!("{}", serde_json::to_string_pretty(&report)?),
        "markdown" | "md" => println!("{}", report.to_markdown()),
        "text" => print_report(&report),
        other => bail!("unknown format '{other}' (expected text, json or markdown)"),
    }

    let output = if args.save {
        Some(config.output_dir.join(format!("report-{}.json", report.id)))
    } else {
        args.output
    };
    if let Some(path) = output {
        report.save_json(&path)?;
        eprintln!("Report saved to: {}", path.display());
    }

    Ok(())
}

fn read_sessions(path: &Path) -> Result<Vec<Session>> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read sessions file: {}", path.display()))?;
    let sessions: Vec<Session> = serde_json::from_str(&content)
        .with_context(|| format!("failed to parse sessions: {}", path.display()))?;
    tracing::info!(count = sessions.len(), "sessions loaded");
    Ok(sessions)
}

fn print_report(report: &AssessmentReport) {
    use comfy_table::{Cell, Table};

    let a = &report.analytics;
    println!("{}", report.headline());
    println!(
        "Session Average: {} | Session Count: {} | Student Count: {}",
        format_average(a.session_average),
        a.session_count,
        a.student_count
    );
    println!(
        "Best student: {} ({:.2}) | Weakest student: {} ({:.2})",
        a.best_student.name, a.best_student.average, a.weakest_student.name, a.weakest_student.average
    );
    println!(
        "Best exercise: {} | Weakest exercise: {}",
        a.best_exercise.exercise_name.label(),
        a.weakest_exercise.exercise_name.label()
    );

    let mut exercises = Table::new();
    exercises.set_header(vec!["Exercise", "Unit", "Average"]);
    for ex in Exercise::ALL {
        exercises.add_row(vec![
            Cell::new(ex.label()),
            Cell::new(ex.unit()),
            Cell::new(format!("{:.2}", a.exercise_average(ex))),
        ]);
    }
    println!("{exercises}");

    let mut students = Table::new();
    students.set_header(vec!["#", "Student", "Average"]);
    for (idx, s) in a.students.iter().enumerate() {
        students.add_row(vec![
            Cell::new(idx + 1),
            Cell::new(&s.name),
            Cell::new(format!("{:.2}", s.average)),
        ]);
    }
    println!("{students}");
}
