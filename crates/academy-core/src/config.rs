//! Academy configuration.
//!
//! Loaded from `academy.toml` in the current directory, then
//! `~/.config/academy/config.toml`, or from an explicit path.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// Letterhead printed on invoices.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Organisation {
    #[serde(default = "default_organisation_name")]
    pub name: String,
    #[serde(default = "default_address")]
    pub address: Vec<String>,
}

impl Default for Organisation {
    fn default() -> Self {
        Self {
            name: default_organisation_name(),
            address: default_address(),
        }
    }
}

fn default_organisation_name() -> String {
    "BAFL Foundation".to_string()
}

fn default_address() -> Vec<String> {
    vec![
        "FLC/5 Siddhivinayak Vihars No 72/2E, Hadapsar,".to_string(),
        "Pune, 411028 Maharashtra, India".to_string(),
    ]
}

/// Top-level academy configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AcademyConfig {
    #[serde(default)]
    pub organisation: Organisation,
    /// Where reports and generated sessions are written.
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,
    /// Default report format: text, json or markdown.
    #[serde(default = "default_format")]
    pub default_format: String,
    /// Fixed RNG seed for session generation (None = random).
    #[serde(default)]
    pub seed: Option<u64>,
    /// Line item label for coaching on generated invoices.
    #[serde(default = "default_coaching_description")]
    pub coaching_description: String,
    /// Line item label for tournament fees on generated invoices.
    #[serde(default = "default_tournament_description")]
    pub tournament_description: String,
}

fn default_output_dir() -> PathBuf {
    PathBuf::from("./academy-reports")
}
fn default_format() -> String {
    "text".to_string()
}
fn default_coaching_description() -> String {
    "Archery coaching".to_string()
}
fn default_tournament_description() -> String {
    "Tournament Day".to_string()
}

impl Default for AcademyConfig {
    fn default() -> Self {
        Self {
            organisation: Organisation::default(),
            output_dir: default_output_dir(),
            default_format: default_format(),
            seed: None,
            coaching_description: default_coaching_description(),
            tournament_description: default_tournament_description(),
        }
    }
}

/// Resolve environment variable references like `${VAR_NAME}` in a string.
///
/// Substituted values are not scanned again.
fn resolve_env_vars(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    let mut rest = s;
    while let Some(start) = rest.find("${") {
        let Some(end) = rest[start..].find('}') else {
            break;
        };
        result.push_str(&rest[..start]);
        let var_name = &rest[start + 2..start + end];
        result.push_str(&std::env::var(var_name).unwrap_or_default());
        rest = &rest[start + end + 1..];
    }
    result.push_str(rest);
    result
}

fn resolve_config(mut config: AcademyConfig) -> AcademyConfig {
    config.organisation.name = resolve_env_vars(&config.organisation.name);
    config.organisation.address = config
        .organisation
        .address
        .iter()
        .map(|line| resolve_env_vars(line))
        .collect();
    config.output_dir = PathBuf::from(resolve_env_vars(&config.output_dir.to_string_lossy()));
    config
}

/// Load configuration from the well-known paths.
///
/// Environment variable overrides: `ACADEMY_OUTPUT_DIR`, `ACADEMY_SEED`.
pub fn load_config() -> Result<AcademyConfig> {
    load_config_from(None)
}

/// Load config from an explicit path, or search the default locations.
pub fn load_config_from(path: Option<&Path>) -> Result<AcademyConfig> {
    let config_path = if let Some(p) = path {
        if p.exists() {
            Some(p.to_path_buf())
        } else {
            anyhow::bail!("config file not found: {}", p.display());
        }
    } else {
        let local = PathBuf::from("academy.toml");
        if local.exists() {
            Some(local)
        } else {
            dirs_path()
                .map(|home| home.join("config.toml"))
                .filter(|global| global.exists())
        }
    };

    let mut config = match config_path {
        Some(path) => {
            let content = std::fs::read_to_string(&path)
                .with_context(|| format!("failed to read config: {}", path.display()))?;
            let config = toml::from_str::<AcademyConfig>(&content)
                .with_context(|| format!("failed to parse config: {}", path.display()))?;
            tracing::debug!(path = %path.display(), "config loaded");
            config
        }
        None => AcademyConfig::default(),
    };

    if let Ok(dir) = std::env::var("ACADEMY_OUTPUT_DIR") {
        config.output_dir = PathBuf::from(dir);
    }
    if let Ok(seed) = std::env::var("ACADEMY_SEED") {
        let seed = seed
            .trim()
            .parse::<u64>()
            .with_context(|| format!("ACADEMY_SEED is not a number: '{seed}'"))?;
        config.seed = Some(seed);
    }

    Ok(resolve_config(config))
}

fn dirs_path() -> Option<PathBuf> {
    std::env::var("HOME")
        .ok()
        .map(|h| PathBuf::from(h).join(".config").join("academy"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolve_env_vars_basic() {
        std::env::set_var("_ACADEMY_TEST_VAR", "hello");
        assert_eq!(resolve_env_vars("${_ACADEMY_TEST_VAR}"), "hello");
        assert_eq!(
            resolve_env_vars("prefix_${_ACADEMY_TEST_VAR}_suffix"),
            "prefix_hello_suffix"
        );
        assert_eq!(resolve_env_vars("${unterminated"), "${unterminated");
        assert_eq!(
            resolve_env_vars("${_ACADEMY_TEST_VAR} ${unterminated"),
            "hello ${unterminated"
        );
        std::env::remove_var("_ACADEMY_TEST_VAR");
    }

    #[test]
    fn self_referencing_value_is_not_expanded_again() {
        std::env::set_var("_ACADEMY_TEST_LOOP", "${_ACADEMY_TEST_LOOP}!");
        assert_eq!(
            resolve_env_vars("a ${_ACADEMY_TEST_LOOP} b"),
            "a ${_ACADEMY_TEST_LOOP}! b"
        );
        std::env::remove_var("_ACADEMY_TEST_LOOP");
    }

    #[test]
    fn default_config() {
        let config = AcademyConfig::default();
        assert_eq!(config.organisation.name, "BAFL Foundation");
        assert_eq!(config.default_format, "text");
        assert_eq!(config.coaching_description, "Archery coaching");
        assert!(config.seed.is_none());
    }

    #[test]
    fn parse_partial_config() {
        let toml_str = r#"
default_format = "markdown"
seed = 42

[organisation]
name = "Riverside Archery Club"
"#;
        let config: AcademyConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.default_format, "markdown");
        assert_eq!(config.seed, Some(42));
        assert_eq!(config.organisation.name, "Riverside Archery Club");
        assert_eq!(config.organisation.address.len(), 2);
        assert_eq!(config.tournament_description, "Tournament Day");
    }

    #[test]
    fn explicit_missing_path_is_an_error() {
        let err = load_config_from(Some(Path::new("definitely-missing.toml"))).unwrap_err();
        assert!(err.to_string().contains("config file not found"));
    }

    #[test]
    fn explicit_path_is_loaded() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("academy.toml");
        std::fs::write(&path, "output_dir = \"out\"\n").unwrap();
        let config = load_config_from(Some(&path)).unwrap();
        // ACADEMY_OUTPUT_DIR may be set by the environment running the tests.
        if std::env::var("ACADEMY_OUTPUT_DIR").is_err() {
            assert_eq!(config.output_dir, PathBuf::from("out"));
        }
    }
}
