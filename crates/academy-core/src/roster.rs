//! JSON roster loader.
//!
//! The students endpoint returns either a bare array or an object wrapping
//! the array under `students`; both shapes are accepted here.

use std::collections::HashSet;
use std::path::Path;

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::model::{Student, StudentId};

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RosterFile {
    Bare(Vec<Student>),
    Wrapped {
        #[serde(default)]
        students: Vec<Student>,
    },
}

/// Parse a roster file.
pub fn load_roster(path: &Path) -> Result<Vec<Student>> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read roster file: {}", path.display()))?;

    let students = parse_roster_str(&content)
        .with_context(|| format!("failed to parse roster: {}", path.display()))?;
    tracing::info!(count = students.len(), path = %path.display(), "roster loaded");
    Ok(students)
}

/// Parse a roster from a JSON string (useful for testing).
pub fn parse_roster_str(content: &str) -> Result<Vec<Student>> {
    let parsed: RosterFile =
        serde_json::from_str(content).context("roster must be an array or {\"students\": [...]}")?;
    Ok(match parsed {
        RosterFile::Bare(students) => students,
        RosterFile::Wrapped { students } => students,
    })
}

/// Load every `.json` roster in a directory, skipping files that fail to
/// parse.
pub fn load_roster_directory(dir: &Path) -> Result<Vec<(String, Vec<Student>)>> {
    if !dir.is_dir() {
        anyhow::bail!("not a directory: {}", dir.display());
    }

    let mut rosters = Vec::new();
    let mut entries: Vec<_> = std::fs::read_dir(dir)
        .with_context(|| format!("failed to read directory: {}", dir.display()))?
        .collect::<std::io::Result<_>>()?;
    entries.sort_by_key(|e| e.path());

    for entry in entries {
        let path = entry.path();
        if !path.extension().is_some_and(|ext| ext == "json") {
            continue;
        }
        let batch = path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();
        match load_roster(&path) {
            Ok(students) => rosters.push((batch, students)),
            Err(e) => tracing::warn!("skipping {}: {:#}", path.display(), e),
        }
    }

    Ok(rosters)
}

/// A warning from roster validation.
#[derive(Debug, Clone)]
pub struct RosterWarning {
    /// The student concerned, if any.
    pub student_id: Option<StudentId>,
    pub message: String,
}

/// Check a roster for issues that would make reports confusing.
pub fn validate_roster(students: &[Student]) -> Vec<RosterWarning> {
    let mut warnings = Vec::new();

    if students.is_empty() {
        warnings.push(RosterWarning {
            student_id: None,
            message: "roster is empty".into(),
        });
    }

    let mut seen = HashSet::new();
    for s in students {
        if !seen.insert(&s.id) {
            warnings.push(RosterWarning {
                student_id: Some(s.id.clone()),
                message: format!("duplicate student id: {}", s.id),
            });
        }
        if s.name.trim().is_empty() || s.name == "Unknown" {
            warnings.push(RosterWarning {
                student_id: Some(s.id.clone()),
                message: "student has no name".into(),
            });
        }
    }

    warnings
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_bare_array() {
        let students =
            parse_roster_str(r#"[{"id": 1, "name": "Asha"}, {"id": 2, "name": "Ravi"}]"#).unwrap();
        assert_eq!(students.len(), 2);
        assert_eq!(students[1].name, "Ravi");
    }

    #[test]
    fn parse_wrapped_object() {
        let students = parse_roster_str(
            r#"{"students": [{"student_id": "S1", "student_name": "Meera"}], "count": 1}"#,
        )
        .unwrap();
        assert_eq!(students, vec![Student::new("S1", "Meera")]);
    }

    #[test]
    fn wrapped_object_without_students_is_empty() {
        assert!(parse_roster_str(r#"{"detail": "ok"}"#).unwrap().is_empty());
    }

    #[test]
    fn records_with_both_key_spellings() {
        let students = parse_roster_str(
            r#"[{"id": 5, "student_id": 5, "name": "A"},
                {"id": 6, "name": "B", "student_name": "Bee"}]"#,
        )
        .unwrap();
        assert_eq!(students, vec![Student::new(5, "A"), Student::new(6, "B")]);
    }

    #[test]
    fn parse_garbage_fails() {
        assert!(parse_roster_str("42").is_err());
        assert!(parse_roster_str("not json").is_err());
    }

    #[test]
    fn load_from_file_and_directory() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("u12.json"), r#"[{"id": 1, "name": "A"}]"#).unwrap();
        std::fs::write(dir.path().join("u14.json"), r#"{"students": []}"#).unwrap();
        std::fs::write(dir.path().join("broken.json"), "{").unwrap();
        std::fs::write(dir.path().join("notes.txt"), "ignored").unwrap();

        let one = load_roster(&dir.path().join("u12.json")).unwrap();
        assert_eq!(one.len(), 1);

        let all = load_roster_directory(dir.path()).unwrap();
        let names: Vec<&str> = all.iter().map(|(b, _)| b.as_str()).collect();
        assert_eq!(names, vec!["u12", "u14"]);
    }

    #[test]
    fn missing_file_has_context() {
        let err = load_roster(Path::new("no-such-roster.json")).unwrap_err();
        assert!(format!("{err:#}").contains("no-such-roster.json"));
    }

    #[test]
    fn validation_flags_duplicates_and_names() {
        let students = vec![
            Student::new(1, "A"),
            Student::new(1, "B"),
            Student::new(2, "Unknown"),
        ];
        let warnings = validate_roster(&students);
        assert_eq!(warnings.len(), 2);
        assert!(warnings[0].message.contains("duplicate"));
        assert!(validate_roster(&[]).iter().any(|w| w.message == "roster is empty"));
    }
}
