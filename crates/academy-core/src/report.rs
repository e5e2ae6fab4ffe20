//! Physical-assessment report workflow with JSON persistence.
//!
//! Validates the report filters, generates sessions for the roster, selects
//! either one session or the summary of all sessions, and wraps the
//! resulting analytics in a report that can be saved, reloaded and rendered.

use std::path::Path;

use anyhow::{Context, Result};
use chrono::{DateTime, NaiveDate, Utc};
use rand::Rng;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::analytics::{compute_analytics, Analytics, StudentAverage};
use crate::error::AcademyError;
use crate::generator::generate_sessions_with_rng;
use crate::model::{format_session_date, Exercise, Session, Student, StudentResult};

/// What the report covers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReportScope {
    /// A single session, by `session_id`.
    Session(u32),
    /// Every session's rows pooled together.
    Summary,
}

/// Filters chosen before sessions are loaded.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ReportFilters {
    #[serde(default)]
    pub school: Option<String>,
    #[serde(default)]
    pub batch: Option<String>,
    #[serde(default)]
    pub from: Option<NaiveDate>,
    #[serde(default)]
    pub to: Option<NaiveDate>,
}

impl ReportFilters {
    /// The validated `(from, to)` pair.
    pub fn date_range(&self) -> Result<(NaiveDate, NaiveDate), AcademyError> {
        match (self.from, self.to) {
            (Some(from), Some(to)) if to < from => Err(AcademyError::InvalidDateRange { from, to }),
            (Some(from), Some(to)) => Ok((from, to)),
            _ => Err(AcademyError::MissingDateRange),
        }
    }
}

/// Generate the sessions a report will choose from.
pub fn load_sessions<R: Rng + ?Sized>(
    students: &[Student],
    filters: &ReportFilters,
    rng: &mut R,
) -> Result<Vec<Session>, AcademyError> {
    let (from, to) = filters.date_range()?;
    if students.is_empty() {
        return Err(AcademyError::EmptyRoster);
    }
    let sessions = generate_sessions_with_rng(students, from, to, rng);
    tracing::info!(count = sessions.len(), "sessions generated");
    Ok(sessions)
}

/// The result rows a scope refers to.
pub fn select_results(
    sessions: &[Session],
    scope: Option<ReportScope>,
) -> Result<Vec<StudentResult>, AcademyError> {
    match scope {
        Some(ReportScope::Summary) => Ok(sessions
            .iter()
            .flat_map(|s| s.results.iter().cloned())
            .collect()),
        Some(ReportScope::Session(id)) => sessions
            .iter()
            .find(|s| s.session_id == id)
            .map(|s| s.results.clone())
            .ok_or(AcademyError::SessionNotFound(id)),
        None => Err(AcademyError::NoSelection),
    }
}

/// A complete physical-assessment report.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssessmentReport {
    /// Unique report identifier.
    pub id: Uuid,
    /// When the report was created.
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub school: Option<String>,
    #[serde(default)]
    pub batch: Option<String>,
    pub scope: ReportScope,
    /// Date of the selected session, for single-session reports.
    #[serde(default)]
    pub session_date: Option<NaiveDate>,
    pub analytics: Analytics,
}

impl AssessmentReport {
    /// Build a report for `scope` over `sessions`.
    pub fn build(
        sessions: &[Session],
        scope: Option<ReportScope>,
        filters: &ReportFilters,
    ) -> Result<Self, AcademyError> {
        let results = select_results(sessions, scope)?;
        let scope = scope.ok_or(AcademyError::NoSelection)?;
        let mut analytics = compute_analytics(&results).ok_or(AcademyError::NoResults)?;

        let session_date = match scope {
            ReportScope::Summary => {
                analytics.session_count = sessions.len();
                None
            }
            ReportScope::Session(id) => sessions.iter().find(|s| s.session_id == id).map(|s| s.date),
        };

        tracing::info!(
            avg = analytics.session_average,
            students = analytics.student_count,
            "analytics computed"
        );

        Ok(Self {
            id: Uuid::new_v4(),
            created_at: Utc::now(),
            school: filters.school.clone(),
            batch: filters.batch.clone(),
            scope,
            session_date,
            analytics,
        })
    }

    /// Report subtitle, e.g. `School: X | Batch: Y | Summary of All Sessions`.
    pub fn headline(&self) -> String {
        match (&self.school, &self.batch) {
            (Some(school), Some(batch)) => {
                let scope = match self.scope {
                    ReportScope::Summary => "Summary of All Sessions".to_string(),
                    ReportScope::Session(_) => format!(
                        "Session: {}",
                        self.session_date
                            .map(format_session_date)
                            .unwrap_or_else(|| "Unknown".to_string())
                    ),
                };
                format!("School: {school} | Batch: {batch} | {scope}")
            }
            _ => "Assessment Report".to_string(),
        }
    }

    /// Save the report as JSON to a file.
    pub fn save_json(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self).context("failed to serialize report")?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, json)
            .with_context(|| format!("failed to write report to {}", path.display()))?;
        tracing::info!(path = %path.display(), "report saved");
        Ok(())
    }

    /// Load a report from a JSON file.
    pub fn load_json(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read report from {}", path.display()))?;
        let report: AssessmentReport =
            serde_json::from_str(&content).context("failed to parse report JSON")?;
        Ok(report)
    }

    /// Format the report as markdown.
    pub fn to_markdown(&self) -> String {
        let a = &self.analytics;
        let mut md = String::new();

        md.push_str("# Physical Assessment Report\n\n");
        md.push_str(&format!("_{}_\n\n", self.headline()));

        md.push_str(&format!(
            "**Session Average:** {} | **Session Count:** {} | **Student Count:** {}\n\n",
            format_average(a.session_average),
            a.session_count,
            a.student_count
        ));

        md.push_str("### Top Performers\n\n");
        md.push_str(&format!(
            "Best student: {} ({:.2})\n\n",
            a.best_student.name, a.best_student.average
        ));
        push_ranking(&mut md, &a.top_3_best);

        md.push_str("### Needs Improvement\n\n");
        md.push_str(&format!(
            "Weakest student: {} ({:.2})\n\n",
            a.weakest_student.name, a.weakest_student.average
        ));
        push_ranking(&mut md, &a.top_3_worst);

        md.push_str("### Exercise Analysis\n\n");
        md.push_str(&format!(
            "Best exercise: {} ({:.2})\n\nWeakest exercise: {} ({:.2})\n\n",
            a.best_exercise.exercise_name.label(),
            a.best_exercise.average,
            a.weakest_exercise.exercise_name.label(),
            a.weakest_exercise.average
        ));

        md.push_str("| Exercise | Unit | Average |\n");
        md.push_str("|----------|------|---------|\n");
        for ex in Exercise::ALL {
            md.push_str(&format!(
                "| {} | {} | {:.2} |\n",
                ex.label(),
                ex.unit(),
                a.exercise_average(ex)
            ));
        }
        md.push('\n');

        md.push_str("### Students\n\n");
        md.push_str("| # | Student | Average |\n");
        md.push_str("|---|---------|---------|\n");
        for (idx, s) in a.students.iter().enumerate() {
            md.push_str(&format!("| {} | {} | {:.2} |\n", idx + 1, s.name, s.average));
        }

        md
    }
}

/// Session averages of exactly zero render as "N/A", like the report cards.
pub fn format_average(average: f64) -> String {
    if average == 0.0 {
        "N/A".to_string()
    } else {
        format!("{average:.2}")
    }
}

fn push_ranking(md: &mut String, ranking: &[StudentAverage]) {
    for (idx, s) in ranking.iter().enumerate() {
        md.push_str(&format!("{}. {} ({:.2})\n", idx + 1, s.name, s.average));
    }
    md.push('\n');
}
