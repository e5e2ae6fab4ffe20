//! Core data model types for academy.
//!
//! Students come from the academy backend, sessions are produced by the
//! generator, and both flow into the analytics engine as plain data.

use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::ops::RangeInclusive;
use std::str::FromStr;

/// Student identifier as emitted by the backend, which uses both numeric and
/// string ids.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(untagged)]
pub enum StudentId {
    Number(i64),
    Text(String),
}

impl fmt::Display for StudentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StudentId::Number(n) => write!(f, "{n}"),
            StudentId::Text(s) => write!(f, "{s}"),
        }
    }
}

impl From<i64> for StudentId {
    fn from(n: i64) -> Self {
        StudentId::Number(n)
    }
}

impl From<&str> for StudentId {
    fn from(s: &str) -> Self {
        StudentId::Text(s.to_string())
    }
}

/// A student on a batch roster.
///
/// Backend records may carry `id`, `student_id` or both; `student_id` wins.
/// Likewise `name` wins over `student_name`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawStudent")]
pub struct Student {
    /// Backend identifier.
    pub id: StudentId,
    /// Display name.
    pub name: String,
}

#[derive(Deserialize)]
struct RawStudent {
    #[serde(default)]
    id: Option<StudentId>,
    #[serde(default)]
    student_id: Option<StudentId>,
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    student_name: Option<String>,
}

impl TryFrom<RawStudent> for Student {
    type Error = String;

    fn try_from(raw: RawStudent) -> Result<Self, Self::Error> {
        let id = raw
            .student_id
            .or(raw.id)
            .ok_or_else(|| "student record has neither `student_id` nor `id`".to_string())?;
        Ok(Self {
            id,
            name: pick_name(raw.name, raw.student_name),
        })
    }
}

/// First non-empty name, else "Unknown".
fn pick_name(primary: Option<String>, fallback: Option<String>) -> String {
    primary
        .filter(|n| !n.is_empty())
        .or(fallback.filter(|n| !n.is_empty()))
        .unwrap_or_else(unknown_name)
}

impl Student {
    pub fn new(id: impl Into<StudentId>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
        }
    }
}

fn unknown_name() -> String {
    "Unknown".to_string()
}

/// One of the seven fitness metrics tracked per student per session.
///
/// Variant order is the canonical exercise order used by reports and by the
/// tie-breaking of exercise rankings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Exercise {
    #[serde(rename = "curl_up")]
    CurlUp,
    #[serde(rename = "push_up")]
    PushUp,
    #[serde(rename = "sit_and_reach")]
    SitAndReach,
    #[serde(rename = "walk_600m")]
    Walk600m,
    #[serde(rename = "dash_50m", alias = "sprint50m")]
    Dash50m,
    #[serde(rename = "bow_hold")]
    BowHold,
    #[serde(rename = "plank")]
    Plank,
}

impl Exercise {
    /// All exercises in canonical order.
    pub const ALL: [Exercise; 7] = [
        Exercise::CurlUp,
        Exercise::PushUp,
        Exercise::SitAndReach,
        Exercise::Walk600m,
        Exercise::Dash50m,
        Exercise::BowHold,
        Exercise::Plank,
    ];

    /// Wire name, as used in result rows and report keys.
    pub fn as_str(&self) -> &'static str {
        match self {
            Exercise::CurlUp => "curl_up",
            Exercise::PushUp => "push_up",
            Exercise::SitAndReach => "sit_and_reach",
            Exercise::Walk600m => "walk_600m",
            Exercise::Dash50m => "dash_50m",
            Exercise::BowHold => "bow_hold",
            Exercise::Plank => "plank",
        }
    }

    /// Human-readable label for report tables.
    pub fn label(&self) -> &'static str {
        match self {
            Exercise::CurlUp => "Curl Up",
            Exercise::PushUp => "Push Up",
            Exercise::SitAndReach => "Sit and Reach",
            Exercise::Walk600m => "600m Walk",
            Exercise::Dash50m => "50m Dash",
            Exercise::BowHold => "Bow Hold",
            Exercise::Plank => "Plank",
        }
    }

    /// Unit the score is recorded in.
    pub fn unit(&self) -> &'static str {
        match self {
            Exercise::CurlUp | Exercise::PushUp => "reps",
            Exercise::SitAndReach => "cm",
            Exercise::Walk600m | Exercise::Dash50m | Exercise::BowHold | Exercise::Plank => {
                "seconds"
            }
        }
    }

    /// Inclusive range of realistic scores used when generating sessions.
    pub fn score_range(&self) -> RangeInclusive<u32> {
        match self {
            Exercise::CurlUp => 5..=30,
            Exercise::PushUp => 5..=25,
            Exercise::SitAndReach => 10..=30,
            Exercise::Walk600m => 150..=250,
            Exercise::Dash50m => 7..=15,
            Exercise::BowHold => 10..=40,
            Exercise::Plank => 15..=60,
        }
    }
}

impl fmt::Display for Exercise {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Exercise {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "curl_up" => Ok(Exercise::CurlUp),
            "push_up" => Ok(Exercise::PushUp),
            "sit_and_reach" => Ok(Exercise::SitAndReach),
            "walk_600m" => Ok(Exercise::Walk600m),
            "dash_50m" | "sprint50m" => Ok(Exercise::Dash50m),
            "bow_hold" => Ok(Exercise::BowHold),
            "plank" => Ok(Exercise::Plank),
            other => Err(format!("unknown exercise: {other}")),
        }
    }
}

/// A student's scores for one session.
///
/// Every exercise is optional; absent, null, non-numeric and non-finite
/// values count as missing and are left out of averages.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawStudentResult")]
pub struct StudentResult {
    pub student_id: StudentId,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub curl_up: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub push_up: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sit_and_reach: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub walk_600m: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dash_50m: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bow_hold: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub plank: Option<f64>,
}

#[derive(Deserialize)]
struct RawStudentResult {
    #[serde(default)]
    student_id: Option<StudentId>,
    #[serde(default)]
    id: Option<StudentId>,
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    student_name: Option<String>,
    #[serde(default, deserialize_with = "lenient_score")]
    curl_up: Option<f64>,
    #[serde(default, deserialize_with = "lenient_score")]
    push_up: Option<f64>,
    #[serde(default, deserialize_with = "lenient_score")]
    sit_and_reach: Option<f64>,
    #[serde(default, deserialize_with = "lenient_score")]
    walk_600m: Option<f64>,
    #[serde(default, deserialize_with = "lenient_score")]
    dash_50m: Option<f64>,
    #[serde(default, deserialize_with = "lenient_score")]
    sprint50m: Option<f64>,
    #[serde(default, deserialize_with = "lenient_score")]
    bow_hold: Option<f64>,
    #[serde(default, deserialize_with = "lenient_score")]
    plank: Option<f64>,
}

impl TryFrom<RawStudentResult> for StudentResult {
    type Error = String;

    fn try_from(raw: RawStudentResult) -> Result<Self, Self::Error> {
        let student_id = raw
            .student_id
            .or(raw.id)
            .ok_or_else(|| "result row has neither `student_id` nor `id`".to_string())?;
        Ok(Self {
            student_id,
            name: pick_name(raw.name, raw.student_name),
            curl_up: raw.curl_up,
            push_up: raw.push_up,
            sit_and_reach: raw.sit_and_reach,
            walk_600m: raw.walk_600m,
            dash_50m: raw.dash_50m.or(raw.sprint50m),
            bow_hold: raw.bow_hold,
            plank: raw.plank,
        })
    }
}

/// A score field that never fails: numbers and numeric strings are kept,
/// anything else (`"n/a"`, `true`, objects) becomes `None`.
fn lenient_score<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(match value {
        serde_json::Value::Number(n) => n.as_f64(),
        serde_json::Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }
    .filter(|v| v.is_finite()))
}

impl StudentResult {
    /// An empty row for `student` with every exercise missing.
    pub fn for_student(student: &Student) -> Self {
        Self {
            student_id: student.id.clone(),
            name: student.name.clone(),
            curl_up: None,
            push_up: None,
            sit_and_reach: None,
            walk_600m: None,
            dash_50m: None,
            bow_hold: None,
            plank: None,
        }
    }

    fn slot(&self, exercise: Exercise) -> Option<f64> {
        match exercise {
            Exercise::CurlUp => self.curl_up,
            Exercise::PushUp => self.push_up,
            Exercise::SitAndReach => self.sit_and_reach,
            Exercise::Walk600m => self.walk_600m,
            Exercise::Dash50m => self.dash_50m,
            Exercise::BowHold => self.bow_hold,
            Exercise::Plank => self.plank,
        }
    }

    /// The recorded score, or `None` if it is missing or not a finite number.
    pub fn score(&self, exercise: Exercise) -> Option<f64> {
        self.slot(exercise).filter(|v| v.is_finite())
    }

    pub fn set_score(&mut self, exercise: Exercise, value: Option<f64>) {
        let slot = match exercise {
            Exercise::CurlUp => &mut self.curl_up,
            Exercise::PushUp => &mut self.push_up,
            Exercise::SitAndReach => &mut self.sit_and_reach,
            Exercise::Walk600m => &mut self.walk_600m,
            Exercise::Dash50m => &mut self.dash_50m,
            Exercise::BowHold => &mut self.bow_hold,
            Exercise::Plank => &mut self.plank,
        };
        *slot = value;
    }

    /// Builder-style variant of [`StudentResult::set_score`].
    pub fn with_score(mut self, exercise: Exercise, value: f64) -> Self {
        self.set_score(exercise, Some(value));
        self
    }

    /// Present scores in canonical exercise order.
    pub fn present_scores(&self) -> impl Iterator<Item = (Exercise, f64)> + '_ {
        Exercise::ALL
            .iter()
            .filter_map(move |&ex| self.score(ex).map(|v| (ex, v)))
    }
}

/// One physical-assessment event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    /// 1-based index in generation order.
    pub session_id: u32,
    /// Assessment date, serialized as `YYYY-MM-DD`.
    pub date: NaiveDate,
    /// One row per student, in roster order.
    pub results: Vec<StudentResult>,
}

/// Render a session date the way report headers show it, e.g. `05 Mar 2024`.
pub fn format_session_date(date: NaiveDate) -> String {
    date.format("%d %b %Y").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exercise_display_and_parse() {
        assert_eq!(Exercise::Walk600m.to_string(), "walk_600m");
        assert_eq!("dash_50m".parse::<Exercise>().unwrap(), Exercise::Dash50m);
        assert_eq!("sprint50m".parse::<Exercise>().unwrap(), Exercise::Dash50m);
        assert_eq!("PLANK".parse::<Exercise>().unwrap(), Exercise::Plank);
        assert!("burpee".parse::<Exercise>().is_err());
    }

    #[test]
    fn exercise_ranges_are_fixed() {
        assert_eq!(Exercise::CurlUp.score_range(), 5..=30);
        assert_eq!(Exercise::Walk600m.score_range(), 150..=250);
        assert_eq!(Exercise::Plank.score_range(), 15..=60);
        assert_eq!(Exercise::ALL.len(), 7);
    }

    #[test]
    fn student_accepts_backend_field_names() {
        let s: Student = serde_json::from_str(r#"{"student_id": 7, "student_name": "Asha"}"#).unwrap();
        assert_eq!(s.id, StudentId::Number(7));
        assert_eq!(s.name, "Asha");

        let s: Student = serde_json::from_str(r#"{"id": "S-12"}"#).unwrap();
        assert_eq!(s.id, StudentId::Text("S-12".into()));
        assert_eq!(s.name, "Unknown");
    }

    #[test]
    fn result_missing_and_null_fields() {
        let r: StudentResult = serde_json::from_str(
            r#"{"student_id": 1, "name": "A", "curl_up": 12, "push_up": null, "sprint50m": 9}"#,
        )
        .unwrap();
        assert_eq!(r.score(Exercise::CurlUp), Some(12.0));
        assert_eq!(r.score(Exercise::PushUp), None);
        assert_eq!(r.score(Exercise::Dash50m), Some(9.0));
        assert_eq!(r.present_scores().count(), 2);
    }

    #[test]
    fn student_with_both_id_keys() {
        let s: Student = serde_json::from_str(r#"{"id": 5, "student_id": 6, "name": "A"}"#).unwrap();
        assert_eq!(s, Student::new(6, "A"));

        let s: Student =
            serde_json::from_str(r#"{"id": 5, "name": "", "student_name": "Asha"}"#).unwrap();
        assert_eq!(s.name, "Asha");

        let s: Student =
            serde_json::from_str(r#"{"id": 5, "name": "Asha", "student_name": "Other"}"#).unwrap();
        assert_eq!(s.name, "Asha");

        assert!(serde_json::from_str::<Student>(r#"{"name": "No Id"}"#).is_err());
    }

    #[test]
    fn malformed_scores_are_missing() {
        let sessions: Vec<Session> = serde_json::from_str(
            r#"[{"session_id": 1, "date": "2024-03-05", "results": [
                {"student_id": 1, "name": "A", "curl_up": 10, "push_up": "n/a"},
                {"id": 2, "student_id": 2, "name": "B", "plank": "45", "bow_hold": true, "sit_and_reach": {}}
            ]}]"#,
        )
        .unwrap();
        let rows = &sessions[0].results;
        assert_eq!(rows[0].score(Exercise::CurlUp), Some(10.0));
        assert_eq!(rows[0].score(Exercise::PushUp), None);
        assert_eq!(rows[1].student_id, StudentId::Number(2));
        assert_eq!(rows[1].score(Exercise::Plank), Some(45.0));
        assert_eq!(rows[1].score(Exercise::BowHold), None);
        assert_eq!(rows[1].score(Exercise::SitAndReach), None);
    }

    #[test]
    fn dash_prefers_current_key() {
        let r: StudentResult =
            serde_json::from_str(r#"{"id": 1, "dash_50m": 8, "sprint50m": 12}"#).unwrap();
        assert_eq!(r.score(Exercise::Dash50m), Some(8.0));
        assert_eq!(r.name, "Unknown");
    }

    #[test]
    fn result_roundtrips_through_json() {
        let r = StudentResult::for_student(&Student::new("S1", "Meera"))
            .with_score(Exercise::Walk600m, 200.0);
        let back: StudentResult = serde_json::from_str(&serde_json::to_string(&r).unwrap()).unwrap();
        assert_eq!(back, r);
    }

    #[test]
    fn non_finite_scores_are_missing() {
        let student = Student::new(1, "A");
        let r = StudentResult::for_student(&student)
            .with_score(Exercise::Plank, f64::NAN)
            .with_score(Exercise::BowHold, f64::INFINITY)
            .with_score(Exercise::CurlUp, 10.0);
        assert_eq!(r.score(Exercise::Plank), None);
        assert_eq!(r.score(Exercise::BowHold), None);
        assert_eq!(r.present_scores().collect::<Vec<_>>(), vec![(Exercise::CurlUp, 10.0)]);
    }

    #[test]
    fn session_date_serializes_as_iso() {
        let session = Session {
            session_id: 1,
            date: NaiveDate::from_ymd_opt(2024, 3, 5).unwrap(),
            results: vec![],
        };
        let json = serde_json::to_value(&session).unwrap();
        assert_eq!(json["date"], "2024-03-05");
        assert_eq!(format_session_date(session.date), "05 Mar 2024");
    }
}
