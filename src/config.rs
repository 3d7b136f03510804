//! Configuration file support for snipe.
//!
//! Loads optional `.snipe/config.toml` from the repository root.

use serde::Deserialize;
use std::path::Path;

/// Root configuration structure.
#[derive(Debug, Default, Clone, Deserialize)]
#[serde(default)]
pub struct SnipeConfig {
    /// Extra path segments to exclude from a full scan, on top of the
    /// built-in ignore list (`.git`, `.snipe`, `__pycache__`, ...).
    #[serde(default)]
    pub ignore_paths: Vec<String>,
    /// Rule codes to disable entirely (e.g. `"SNIPE_UNUSED_EXTERN"`).
    #[serde(default)]
    pub disabled_rules: Vec<String>,
    #[serde(default)]
    pub unsafe_functions: UnsafeFunctionsConfig,
}

/// Extensions to the closed R-UNSAFE table (spec §4.4).
#[derive(Debug, Default, Clone, Deserialize)]
#[serde(default)]
pub struct UnsafeFunctionsConfig {
    /// Additional function names to flag as `SNIPE_UNSAFE_FUNCTION` warnings.
    #[serde(default)]
    pub extra_warn: Vec<String>,
}

impl SnipeConfig {
    /// Load config from `.snipe/config.toml` under `root`. Returns the
    /// default config if the file is absent or fails to parse —
    /// configuration is never a hard failure (spec §7).
    pub fn load(root: &Path) -> Self {
        let config_path = root.join(".snipe").join("config.toml");
        Self::load_from_path(&config_path)
    }

    pub fn load_from_path(path: &Path) -> Self {
        if !path.exists() {
            return Self::default();
        }

        match std::fs::read_to_string(path) {
            Ok(content) => match toml::from_str(&content) {
                Ok(config) => config,
                Err(e) => {
                    tracing::warn!(path = %path.display(), error = %e, "failed to parse snipe config");
                    Self::default()
                }
            },
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "failed to read snipe config");
                Self::default()
            }
        }
    }

    pub fn rule_enabled(&self, code: &str) -> bool {
        !self.disabled_rules.iter().any(|r| r == code)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::TempDir;

    #[test]
    fn default_config_has_no_overrides() {
        let config = SnipeConfig::default();
        assert!(config.ignore_paths.is_empty());
        assert!(config.disabled_rules.is_empty());
        assert!(config.rule_enabled("SNIPE_UNUSED_EXTERN"));
    }

    #[test]
    fn load_missing_file_returns_default() {
        let temp = TempDir::new().expect("temp dir");
        let config = SnipeConfig::load(temp.path());
        assert!(config.ignore_paths.is_empty());
    }

    #[test]
    fn load_valid_config() {
        let temp = TempDir::new().expect("temp dir");
        let dir = temp.path().join(".snipe");
        std::fs::create_dir_all(&dir).expect("create .snipe");

        let config_path = dir.join("config.toml");
        let mut file = std::fs::File::create(&config_path).expect("create config");
        writeln!(
            file,
            r#"
ignore_paths = ["vendor", "third_party"]
disabled_rules = ["SNIPE_UNUSED_EXTERN"]

[unsafe_functions]
extra_warn = ["my_unsafe_copy"]
"#
        )
        .expect("write config");

        let config = SnipeConfig::load(temp.path());
        assert_eq!(config.ignore_paths, vec!["vendor", "third_party"]);
        assert!(!config.rule_enabled("SNIPE_UNUSED_EXTERN"));
        assert!(config.rule_enabled("SNIPE_ARRAY_BOUNDS"));
        assert_eq!(config.unsafe_functions.extra_warn, vec!["my_unsafe_copy"]);
    }

    #[test]
    fn load_invalid_toml_falls_back_to_default() {
        let temp = TempDir::new().expect("temp dir");
        let dir = temp.path().join(".snipe");
        std::fs::create_dir_all(&dir).expect("create .snipe");
        std::fs::write(dir.join("config.toml"), "not = [valid toml").expect("write config");

        let config = SnipeConfig::load(temp.path());
        assert!(config.ignore_paths.is_empty());
    }
}
