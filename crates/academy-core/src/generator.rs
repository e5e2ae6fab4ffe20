//! Synthetic assessment sessions.
//!
//! Produces 3 to 6 sessions with random dates inside a range and random,
//! realistic exercise scores for every student on the roster. The random
//! source is injectable so that callers (and tests) can seed it.

use chrono::{Duration, NaiveDate};
use rand::Rng;

use crate::model::{Exercise, Session, Student, StudentResult};

/// Inclusive bounds on how many sessions are generated.
pub const MIN_SESSIONS: u32 = 3;
pub const MAX_SESSIONS: u32 = 6;

/// Uniform random integer in `range`, both ends inclusive.
pub fn random_score<R: Rng + ?Sized>(rng: &mut R, range: std::ops::RangeInclusive<u32>) -> u32 {
    rng.gen_range(range)
}

/// A uniformly random date in `[from, to)`.
///
/// When the range spans zero whole days (or is reversed) the result is
/// always `from`.
pub fn random_date_in_range<R: Rng + ?Sized>(rng: &mut R, from: NaiveDate, to: NaiveDate) -> NaiveDate {
    let span = (to - from).num_days();
    if span <= 0 {
        return from;
    }
    from + Duration::days(rng.gen_range(0..span))
}

/// One result row for `student` with every exercise scored.
pub fn generate_results_for_student<R: Rng + ?Sized>(rng: &mut R, student: &Student) -> StudentResult {
    let mut result = StudentResult::for_student(student);
    for exercise in Exercise::ALL {
        let score = random_score(rng, exercise.score_range());
        result.set_score(exercise, Some(f64::from(score)));
    }
    result
}

/// Generate sessions for `students` between `from` and `to` using the
/// thread-local RNG.
pub fn generate_sessions(students: &[Student], from: NaiveDate, to: NaiveDate) -> Vec<Session> {
    generate_sessions_with_rng(students, from, to, &mut rand::thread_rng())
}

/// Generate sessions for `students` between `from` and `to`.
///
/// Session ids follow generation order and are assigned before the sessions
/// are sorted by date, so after sorting they need not be increasing.
pub fn generate_sessions_with_rng<R: Rng + ?Sized>(
    students: &[Student],
    from: NaiveDate,
    to: NaiveDate,
    rng: &mut R,
) -> Vec<Session> {
    if students.is_empty() {
        return Vec::new();
    }

    let count = rng.gen_range(MIN_SESSIONS..=MAX_SESSIONS);
    let mut sessions = Vec::with_capacity(count as usize);
    for session_id in 1..=count {
        let date = random_date_in_range(rng, from, to);
        let mut results = Vec::with_capacity(students.len());
        for student in students {
            results.push(generate_results_for_student(rng, student));
        }
        sessions.push(Session {
            session_id,
            date,
            results,
        });
    }

    // Stable, so same-day sessions keep generation order.
    sessions.sort_by_key(|s| s.date);

    tracing::debug!(
        sessions = sessions.len(),
        students = students.len(),
        %from,
        %to,
        "generated assessment sessions"
    );

    sessions
}
