//! Assessment analytics: averages, rankings and best/weakest exercises.
//!
//! The engine treats its input as one flat pool of result rows. A summary
//! over several sessions is therefore a per-(student, session) rollup: a
//! student who appears in three sessions contributes three rows.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::model::{Exercise, Session, StudentId, StudentResult};

/// How many students the top/bottom lists hold.
pub const PODIUM_SIZE: usize = 3;

/// A student row's mean over its present exercise scores.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StudentAverage {
    pub student_id: StudentId,
    pub name: String,
    pub average: f64,
}

/// Mean score of one exercise across all rows that recorded it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExerciseAverage {
    pub exercise_name: Exercise,
    pub average: f64,
}

/// Aggregate statistics for one session, or for several sessions pooled.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Analytics {
    /// Number of underlying sessions (1 unless set by a summary).
    pub session_count: usize,
    /// Number of result rows analysed.
    pub student_count: usize,
    /// Mean of every row's average, zero-score rows included.
    pub session_average: f64,
    pub best_student: StudentAverage,
    pub weakest_student: StudentAverage,
    /// Highest averages first.
    pub top_3_best: Vec<StudentAverage>,
    /// Lowest averages first.
    pub top_3_worst: Vec<StudentAverage>,
    /// Per-exercise means in canonical exercise order.
    pub exercise_averages: BTreeMap<Exercise, f64>,
    pub best_exercise: ExerciseAverage,
    pub weakest_exercise: ExerciseAverage,
    /// Per-row averages in input order.
    pub students: Vec<StudentAverage>,
}

fn mean(values: impl Iterator<Item = f64>) -> f64 {
    let (sum, count) = values.fold((0.0f64, 0usize), |(s, c), v| (s + v, c + 1));
    if count == 0 {
        0.0
    } else {
        sum / count as f64
    }
}

/// Average of a row's present scores, 0 when none are present.
pub fn student_average(result: &StudentResult) -> f64 {
    mean(result.present_scores().map(|(_, v)| v))
}

/// Stable descending sort by average, so equal averages keep input order.
fn rank_descending(students: &[StudentAverage]) -> Vec<StudentAverage> {
    let mut ranked = students.to_vec();
    ranked.sort_by(|a, b| b.average.total_cmp(&a.average));
    ranked
}

/// Compute analytics over `results`.
///
/// Returns `None` for empty input, which callers should treat as "nothing
/// to display" rather than as a failure.
pub fn compute_analytics(results: &[StudentResult]) -> Option<Analytics> {
    if results.is_empty() {
        return None;
    }

    let students: Vec<StudentAverage> = results
        .iter()
        .map(|r| StudentAverage {
            student_id: r.student_id.clone(),
            name: r.name.clone(),
            average: student_average(r),
        })
        .collect();

    let session_average = mean(students.iter().map(|s| s.average));

    let ranked = rank_descending(&students);
    let n = ranked.len();
    let best_student = ranked[0].clone();
    let weakest_student = ranked[n - 1].clone();
    let top_3_best: Vec<StudentAverage> = ranked.iter().take(PODIUM_SIZE).cloned().collect();
    let top_3_worst: Vec<StudentAverage> = ranked
        .iter()
        .rev()
        .take(PODIUM_SIZE)
        .cloned()
        .collect();

    let exercise_averages: BTreeMap<Exercise, f64> = Exercise::ALL
        .iter()
        .map(|&ex| (ex, mean(results.iter().filter_map(|r| r.score(ex)))))
        .collect();

    // Canonical order in, stable sort, so ties keep canonical order.
    let mut exercises_ranked: Vec<(Exercise, f64)> =
        exercise_averages.iter().map(|(&ex, &avg)| (ex, avg)).collect();
    exercises_ranked.sort_by(|a, b| b.1.total_cmp(&a.1));
    let (best_ex, best_avg) = exercises_ranked[0];
    let (weak_ex, weak_avg) = exercises_ranked[exercises_ranked.len() - 1];

    tracing::debug!(
        rows = n,
        session_average,
        best = %best_student.name,
        "computed assessment analytics"
    );

    Some(Analytics {
        session_count: 1,
        student_count: n,
        session_average,
        best_student,
        weakest_student,
        top_3_best,
        top_3_worst,
        exercise_averages,
        best_exercise: ExerciseAverage {
            exercise_name: best_ex,
            average: best_avg,
        },
        weakest_exercise: ExerciseAverage {
            exercise_name: weak_ex,
            average: weak_avg,
        },
        students,
    })
}

/// Analytics over every session's rows, with `session_count` set to the
/// number of sessions.
pub fn compute_summary(sessions: &[Session]) -> Option<Analytics> {
    let pooled: Vec<StudentResult> = sessions
        .iter()
        .flat_map(|s| s.results.iter().cloned())
        .collect();
    let mut analytics = compute_analytics(&pooled)?;
    analytics.session_count = sessions.len();
    Some(analytics)
}

impl Analytics {
    /// Average for one exercise, 0 when no row recorded it.
    pub fn exercise_average(&self, exercise: Exercise) -> f64 {
        self.exercise_averages.get(&exercise).copied().unwrap_or(0.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Student;
    use chrono::NaiveDate;

    fn row(id: i64, name: &str, scores: &[(Exercise, f64)]) -> StudentResult {
        scores
            .iter()
            .fold(StudentResult::for_student(&Student::new(id, name)), |r, &(ex, v)| {
                r.with_score(ex, v)
            })
    }

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn empty_input_is_none() {
        assert!(compute_analytics(&[]).is_none());
        assert!(compute_summary(&[]).is_none());
    }

    #[test]
    fn two_student_example() {
        let results = vec![
            row(1, "A", &[(Exercise::CurlUp, 10.0), (Exercise::PushUp, 10.0)]),
            row(2, "B", &[(Exercise::CurlUp, 20.0), (Exercise::PushUp, 20.0)]),
        ];
        let a = compute_analytics(&results).unwrap();

        assert_eq!(a.session_count, 1);
        assert_eq!(a.student_count, 2);
        assert!(approx(a.students[0].average, 10.0));
        assert!(approx(a.students[1].average, 20.0));
        assert!(approx(a.session_average, 15.0));
        assert_eq!(a.best_student.name, "B");
        assert!(approx(a.best_student.average, 20.0));
        assert_eq!(a.weakest_student.name, "A");
        assert!(approx(a.weakest_student.average, 10.0));
        assert!(approx(a.exercise_average(Exercise::CurlUp), 15.0));
        assert!(approx(a.exercise_average(Exercise::PushUp), 15.0));
        assert!(approx(a.exercise_average(Exercise::Plank), 0.0));
        assert_eq!(a.exercise_averages.len(), 7);
    }

    #[test]
    fn student_without_scores_counts_as_zero() {
        let results = vec![
            row(1, "A", &[(Exercise::Plank, 30.0)]),
            row(2, "Absent", &[]),
        ];
        let a = compute_analytics(&results).unwrap();
        assert_eq!(a.students.len(), 2);
        assert!(approx(a.students[1].average, 0.0));
        assert!(approx(a.session_average, 15.0));
        assert_eq!(a.weakest_student.name, "Absent");
    }

    #[test]
    fn missing_values_are_excluded_from_averages() {
        let results = vec![
            row(1, "A", &[(Exercise::CurlUp, 10.0), (Exercise::PushUp, f64::NAN)]),
            row(2, "B", &[(Exercise::PushUp, 6.0)]),
        ];
        let a = compute_analytics(&results).unwrap();
        assert!(approx(a.students[0].average, 10.0));
        assert!(approx(a.exercise_average(Exercise::CurlUp), 10.0));
        assert!(approx(a.exercise_average(Exercise::PushUp), 6.0));
    }

    #[test]
    fn ties_keep_input_order() {
        let results = vec![
            row(1, "First", &[(Exercise::CurlUp, 10.0)]),
            row(2, "Second", &[(Exercise::CurlUp, 10.0)]),
            row(3, "Top", &[(Exercise::CurlUp, 25.0)]),
            row(4, "Third", &[(Exercise::CurlUp, 10.0)]),
        ];
        let a = compute_analytics(&results).unwrap();

        let best: Vec<&str> = a.top_3_best.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(best, vec!["Top", "First", "Second"]);

        let worst: Vec<&str> = a.top_3_worst.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(worst, vec!["Third", "Second", "First"]);
        assert_eq!(a.weakest_student.name, "Third");
    }

    #[test]
    fn single_student_is_best_and_weakest() {
        let a = compute_analytics(&[row(1, "Solo", &[(Exercise::BowHold, 20.0)])]).unwrap();
        assert_eq!(a.best_student, a.weakest_student);
        assert_eq!(a.top_3_best.len(), 1);
        assert_eq!(a.top_3_worst.len(), 1);
    }

    #[test]
    fn exercise_ranking_uses_canonical_order_on_ties() {
        // No data at all: every exercise averages 0.
        let a = compute_analytics(&[row(1, "A", &[])]).unwrap();
        assert_eq!(a.best_exercise.exercise_name, Exercise::CurlUp);
        assert_eq!(a.weakest_exercise.exercise_name, Exercise::Plank);
        assert!(approx(a.best_exercise.average, 0.0));

        let a = compute_analytics(&[row(
            1,
            "A",
            &[(Exercise::Walk600m, 200.0), (Exercise::Dash50m, 9.0)],
        )])
        .unwrap();
        assert_eq!(a.best_exercise.exercise_name, Exercise::Walk600m);
        assert!(approx(a.best_exercise.average, 200.0));
        // Zero-average exercises tie for last; the last in canonical order wins.
        assert_eq!(a.weakest_exercise.exercise_name, Exercise::Plank);
    }

    #[test]
    fn compute_is_idempotent() {
        let results = vec![
            row(1, "A", &[(Exercise::CurlUp, 12.0), (Exercise::SitAndReach, 22.0)]),
            row(2, "B", &[(Exercise::CurlUp, 18.0)]),
            row(3, "C", &[(Exercise::Plank, 40.0)]),
        ];
        assert_eq!(compute_analytics(&results), compute_analytics(&results));
    }

    #[test]
    fn summary_pools_rows_and_counts_sessions() {
        let day = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let sessions = vec![
            Session {
                session_id: 1,
                date: day,
                results: vec![row(1, "A", &[(Exercise::CurlUp, 10.0)])],
            },
            Session {
                session_id: 2,
                date: day,
                results: vec![row(1, "A", &[(Exercise::CurlUp, 20.0)])],
            },
        ];
        let a = compute_summary(&sessions).unwrap();
        assert_eq!(a.session_count, 2);
        // The same student appears once per session.
        assert_eq!(a.student_count, 2);
        assert!(approx(a.session_average, 15.0));
    }

    #[test]
    fn analytics_serializes_exercise_keys_by_wire_name() {
        let a = compute_analytics(&[row(1, "A", &[(Exercise::Dash50m, 8.0)])]).unwrap();
        let json = serde_json::to_value(&a).unwrap();
        assert_eq!(json["exercise_averages"]["dash_50m"], 8.0);
        assert_eq!(json["best_exercise"]["exercise_name"], "dash_50m");
        assert_eq!(json["best_student"]["student_id"], 1);
    }
}
