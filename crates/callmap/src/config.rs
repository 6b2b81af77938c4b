//! Indexer configuration.
//!
//! Configuration is plain data with a default for every field, so an empty
//! YAML document (or no file at all) yields the stock behavior. The CLI layers
//! its flags on top of whatever was loaded.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::languages::{JavaLanguage, LanguageSupport};

/// Directories never descended into, in addition to hidden ones.
pub const DEFAULT_EXCLUDED_DIRS: &[&str] = &[
    "target",
    "build",
    "out",
    "bin",
    "obj",
    "node_modules",
    "vendor",
    "dist",
];

/// What to do when the same FQCN is declared more than once.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DuplicatePolicy {
    /// Keep the first `ClassInfo`; drop methods found under later occurrences.
    #[default]
    FirstWins,
    /// Keep the first `ClassInfo`; append methods from later occurrences to it.
    Merge,
}

/// What to do with a method-like declaration that has no enclosing class.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum OrphanPolicy {
    /// Drop it without a trace beyond the run counters.
    #[default]
    Skip,
    /// Drop it and log a warning.
    Warn,
    /// Fail the unit with a structural anomaly.
    Error,
}

impl std::str::FromStr for OrphanPolicy {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "skip" => Ok(Self::Skip),
            "warn" => Ok(Self::Warn),
            "error" => Ok(Self::Error),
            other => Err(Error::Config(format!(
                "unknown orphan policy `{other}` (expected skip, warn or error)"
            ))),
        }
    }
}

/// Settings for an indexing session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct IndexerConfig {
    /// File extensions (without the dot) treated as compilation units
    pub extensions: Vec<String>,
    /// Directory names skipped during discovery
    pub excluded_dirs: Vec<String>,
    /// Follow symbolic links while walking
    pub follow_links: bool,
    /// Parse units on the rayon pool
    pub parallel: bool,
    /// Per-unit parse budget in milliseconds
    pub unit_timeout_ms: Option<u64>,
    /// Duplicate FQCN handling
    pub duplicate_classes: DuplicatePolicy,
    /// Orphan method handling
    pub orphan_methods: OrphanPolicy,
}

impl Default for IndexerConfig {
    fn default() -> Self {
        Self {
            extensions: JavaLanguage
                .extensions()
                .iter()
                .map(|ext| (*ext).to_string())
                .collect(),
            excluded_dirs: DEFAULT_EXCLUDED_DIRS
                .iter()
                .map(|d| (*d).to_string())
                .collect(),
            follow_links: false,
            parallel: true,
            unit_timeout_ms: None,
            duplicate_classes: DuplicatePolicy::default(),
            orphan_methods: OrphanPolicy::default(),
        }
    }
}

impl IndexerConfig {
    /// Parse configuration from YAML text.
    pub fn from_yaml(content: &str) -> Result<Self> {
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        let config: Self =
            serde_yaml::from_str(content).map_err(|e| Error::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a YAML file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }

    /// Serialize to YAML.
    pub fn to_yaml(&self) -> Result<String> {
        serde_yaml::to_string(self).map_err(|e| Error::Config(format!("YAML error: {e}")))
    }

    /// Reject settings that would make a run meaningless.
    pub fn validate(&self) -> Result<()> {
        if self.extensions.is_empty() {
            return Err(Error::Config(
                "at least one source extension is required".to_string(),
            ));
        }
        if self.extensions.iter().any(|e| e.starts_with('.')) {
            return Err(Error::Config(
                "extensions are given without the leading dot".to_string(),
            ));
        }
        if self.unit_timeout_ms == Some(0) {
            return Err(Error::Config(
                "unit-timeout-ms must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }

    /// Whether a file extension names a compilation unit.
    #[must_use]
    pub fn is_source_extension(&self, ext: &str) -> bool {
        self.extensions.iter().any(|e| e.eq_ignore_ascii_case(ext))
    }

    /// Whether a directory name is skipped during discovery.
    #[must_use]
    pub fn is_excluded_dir(&self, name: &str) -> bool {
        name.starts_with('.') || self.excluded_dirs.iter().any(|d| d == name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn empty_yaml_gives_defaults() {
        let config = IndexerConfig::from_yaml("").expect("empty config should load");
        assert_eq!(config, IndexerConfig::default());
        assert_eq!(config.duplicate_classes, DuplicatePolicy::FirstWins);
        assert_eq!(config.orphan_methods, OrphanPolicy::Skip);
    }

    #[test]
    fn partial_yaml_keeps_other_defaults() {
        let yaml = "duplicate-classes: merge\norphan-methods: warn\nunit-timeout-ms: 500\n";
        let config = IndexerConfig::from_yaml(yaml).expect("config should load");

        assert_eq!(config.duplicate_classes, DuplicatePolicy::Merge);
        assert_eq!(config.orphan_methods, OrphanPolicy::Warn);
        assert_eq!(config.unit_timeout_ms, Some(500));
        assert_eq!(config.extensions, vec!["java".to_string()]);
        assert!(config.parallel);
    }

    #[test]
    fn default_extensions_come_from_the_language() {
        let config = IndexerConfig::default();

        assert_eq!(config.extensions, JavaLanguage.extensions());
        assert!(config.is_source_extension("java"));
    }

    #[test]
    fn yaml_round_trips() {
        let config = IndexerConfig {
            parallel: false,
            orphan_methods: OrphanPolicy::Error,
            ..IndexerConfig::default()
        };
        let yaml = config.to_yaml().expect("serialize");
        let back = IndexerConfig::from_yaml(&yaml).expect("deserialize");
        assert_eq!(back, config);
    }

    #[rstest]
    #[case::no_extensions("extensions: []")]
    #[case::dotted_extension("extensions: ['.java']")]
    #[case::zero_timeout("unit-timeout-ms: 0")]
    #[case::unknown_policy("orphan-methods: explode")]
    fn invalid_yaml_is_rejected(#[case] yaml: &str) {
        let result = IndexerConfig::from_yaml(yaml);
        assert!(matches!(result, Err(Error::Config(_))), "{yaml} should fail");
    }

    #[rstest]
    #[case::hidden(".git", true)]
    #[case::build_output("target", true)]
    #[case::gradle_output("build", true)]
    #[case::source_dir("src", false)]
    fn excluded_dirs(#[case] name: &str, #[case] excluded: bool) {
        assert_eq!(IndexerConfig::default().is_excluded_dir(name), excluded);
    }

    #[test]
    fn extension_match_ignores_case() {
        let config = IndexerConfig::default();
        assert!(config.is_source_extension("java"));
        assert!(config.is_source_extension("JAVA"));
        assert!(!config.is_source_extension("kt"));
    }

    #[rstest]
    #[case("skip", OrphanPolicy::Skip)]
    #[case("Warn", OrphanPolicy::Warn)]
    #[case("ERROR", OrphanPolicy::Error)]
    fn orphan_policy_from_str(#[case] input: &str, #[case] expected: OrphanPolicy) {
        assert_eq!(input.parse::<OrphanPolicy>().expect("valid policy"), expected);
    }
}
