//! Synthesis configuration.
//!
//! Sources, highest precedence first:
//! 1. Environment variables (`GSDEPTH_` prefix)
//! 2. Configuration file (YAML)
//! 3. Default values

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::encoding::{EncodeOptions, EncodingKind};
use crate::error::{SynthError, SynthResult};
use crate::search::SearchStrategy;

/// Upper limit on retries; each retry doubles the solver budget.
const MAX_RETRIES: u32 = 16;

/// Knobs for a [`Synthesizer`](crate::Synthesizer).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SynthesisConfig {
    /// CNF model used for every probe.
    #[serde(default)]
    pub encoding: EncodingKind,

    /// Depth search order (ignored by the parallel search).
    #[serde(default)]
    pub strategy: SearchStrategy,

    /// Pin the edges of a maximum-degree vertex to the first layers.
    #[serde(default)]
    pub symmetry_breaking: bool,

    /// Per-call solver budget in milliseconds; unbounded when absent.
    #[serde(default)]
    pub solver_timeout_ms: Option<u64>,

    /// Extra attempts for an inconclusive depth.
    #[serde(default = "default_retries")]
    pub max_inconclusive_retries: u32,

    /// Probe all candidate depths concurrently.
    #[serde(default)]
    pub parallel: bool,
}

fn default_retries() -> u32 {
    2
}

impl Default for SynthesisConfig {
    fn default() -> Self {
        Self {
            encoding: EncodingKind::default(),
            strategy: SearchStrategy::default(),
            symmetry_breaking: false,
            solver_timeout_ms: None,
            max_inconclusive_retries: default_retries(),
            parallel: false,
        }
    }
}

impl SynthesisConfig {
    /// Load from a YAML file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> SynthResult<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path)
            .map_err(|e| SynthError::Config(format!("{}: {e}", path.display())))?;
        Self::from_yaml(&contents)
    }

    /// Parse YAML text.
    pub fn from_yaml(contents: &str) -> SynthResult<Self> {
        let config: Self =
            serde_yaml_ng::from_str(contents).map_err(|e| SynthError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Defaults overridden by the environment.
    pub fn from_env() -> SynthResult<Self> {
        Self::default().merge_env()
    }

    /// File (or defaults) first, then environment overrides.
    pub fn load(config_file: Option<&Path>) -> SynthResult<Self> {
        let config = match config_file {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };
        config.merge_env()
    }

    /// Apply `GSDEPTH_*` variables that are set.
    pub fn merge_env(self) -> SynthResult<Self> {
        self.merge_vars(|key| std::env::var(key).ok())
    }

    /// Apply overrides from `lookup`, keyed by environment variable name.
    pub fn merge_vars(mut self, lookup: impl Fn(&str) -> Option<String>) -> SynthResult<Self> {
        if let Some(v) = lookup("GSDEPTH_ENCODING") {
            self.encoding = v.parse()?;
        }
        if let Some(v) = lookup("GSDEPTH_STRATEGY") {
            self.strategy = v.parse()?;
        }
        if let Some(v) = lookup("GSDEPTH_SYMMETRY_BREAKING") {
            self.symmetry_breaking = parse_flag("GSDEPTH_SYMMETRY_BREAKING", &v)?;
        }
        if let Some(v) = lookup("GSDEPTH_TIMEOUT_MS") {
            self.solver_timeout_ms = match v.trim() {
                "" | "none" => None,
                ms => Some(parse_number("GSDEPTH_TIMEOUT_MS", ms)?),
            };
        }
        if let Some(v) = lookup("GSDEPTH_RETRIES") {
            self.max_inconclusive_retries = parse_number("GSDEPTH_RETRIES", &v)?;
        }
        if let Some(v) = lookup("GSDEPTH_PARALLEL") {
            self.parallel = parse_flag("GSDEPTH_PARALLEL", &v)?;
        }
        self.validate()?;
        Ok(self)
    }

    /// Reject values the search cannot honour.
    pub fn validate(&self) -> SynthResult<()> {
        if self.solver_timeout_ms == Some(0) {
            return Err(SynthError::Config(
                "solver_timeout_ms must be positive when set".into(),
            ));
        }
        if self.max_inconclusive_retries > MAX_RETRIES {
            return Err(SynthError::Config(format!(
                "max_inconclusive_retries must be at most {MAX_RETRIES}, got {}",
                self.max_inconclusive_retries
            )));
        }
        Ok(())
    }

    /// Per-call solver budget for the first attempt.
    pub fn solver_timeout(&self) -> Option<Duration> {
        self.solver_timeout_ms.map(Duration::from_millis)
    }

    /// Encoding options derived from this configuration.
    pub fn encode_options(&self) -> EncodeOptions {
        EncodeOptions {
            symmetry_breaking: self.symmetry_breaking,
        }
    }
}

fn parse_flag(key: &str, value: &str) -> SynthResult<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        other => Err(SynthError::Config(format!("{key}: expected a boolean, got '{other}'"))),
    }
}

fn parse_number<T: std::str::FromStr>(key: &str, value: &str) -> SynthResult<T> {
    value
        .trim()
        .parse()
        .map_err(|_| SynthError::Config(format!("{key}: expected a number, got '{value}'")))
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn vars(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = SynthesisConfig::default();
        assert_eq!(config.encoding, EncodingKind::EdgeColoring);
        assert_eq!(config.strategy, SearchStrategy::Binary);
        assert!(!config.symmetry_breaking);
        assert_eq!(config.solver_timeout(), None);
        assert_eq!(config.max_inconclusive_retries, 2);
        config.validate().unwrap();
    }

    #[test]
    fn test_yaml_partial() {
        let config = SynthesisConfig::from_yaml(
            "encoding: tableau\nstrategy: linear\nsolver_timeout_ms: 1500\n",
        )
        .unwrap();
        assert_eq!(config.encoding, EncodingKind::Tableau);
        assert_eq!(config.strategy, SearchStrategy::Linear);
        assert_eq!(config.solver_timeout(), Some(Duration::from_millis(1500)));
        assert_eq!(config.max_inconclusive_retries, 2);
    }

    #[test]
    fn test_yaml_rejects_unknown_encoding() {
        assert!(SynthesisConfig::from_yaml("encoding: bdd\n").is_err());
    }

    #[test]
    fn test_env_overrides() {
        let config = SynthesisConfig::default()
            .merge_vars(vars(&[
                ("GSDEPTH_ENCODING", "tableau"),
                ("GSDEPTH_SYMMETRY_BREAKING", "yes"),
                ("GSDEPTH_TIMEOUT_MS", "250"),
                ("GSDEPTH_RETRIES", "4"),
            ]))
            .unwrap();
        assert_eq!(config.encoding, EncodingKind::Tableau);
        assert!(config.symmetry_breaking);
        assert_eq!(config.solver_timeout_ms, Some(250));
        assert_eq!(config.max_inconclusive_retries, 4);
        assert_eq!(config.strategy, SearchStrategy::Binary);
    }

    #[test]
    fn test_env_errors() {
        let bad_flag = SynthesisConfig::default().merge_vars(vars(&[("GSDEPTH_PARALLEL", "maybe")]));
        assert!(matches!(bad_flag, Err(SynthError::Config(_))));

        let zero = SynthesisConfig::default().merge_vars(vars(&[("GSDEPTH_TIMEOUT_MS", "0")]));
        assert!(matches!(zero, Err(SynthError::Config(_))));

        let many = SynthesisConfig::default().merge_vars(vars(&[("GSDEPTH_RETRIES", "99")]));
        assert!(matches!(many, Err(SynthError::Config(_))));
    }
}
