// SPDX-License-Identifier: MIT OR Apache-2.0
//! Configuration loading, validation, and merging for Serum error encoding.
//!
//! [`SerumConfig`] holds the knobs the `serum` crate leaves to the
//! application: how far cause chains are followed and whether JSON output is
//! indented.  It loads from TOML, takes `SERUM_*` environment overrides, and
//! produces a [`serum::json::Codec`].
#![deny(unsafe_code)]
#![warn(missing_docs)]

use std::path::Path;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serum::json::Codec;

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Errors that can occur during configuration loading or validation.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// The requested configuration file was not found.
    #[error("config file not found: {path}")]
    FileNotFound {
        /// Path that was requested.
        path: String,
    },

    /// The file, or an environment override, could not be parsed.
    #[error("failed to parse config: {reason}")]
    ParseError {
        /// Human-readable parse error detail.
        reason: String,
    },

    /// Semantic validation failed (one or more problems).
    #[error("config validation failed: {reasons:?}")]
    ValidationError {
        /// Individual validation failure messages.
        reasons: Vec<String>,
    },
}

// ---------------------------------------------------------------------------
// Warnings
// ---------------------------------------------------------------------------

/// Advisory-level issues that do not prevent operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigWarning {
    /// A field was left unset and its default will be used.
    MissingOptionalField {
        /// Name of the missing field.
        field: String,
        /// What the default means.
        hint: String,
    },
    /// Chains this deep encode fine but exceed what the JSON decoder accepts.
    LargeDepth {
        /// Configured depth.
        depth: usize,
    },
}

impl std::fmt::Display for ConfigWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigWarning::MissingOptionalField { field, hint } => {
                write!(f, "missing optional field '{field}': {hint}")
            }
            ConfigWarning::LargeDepth { depth } => write!(
                f,
                "max_cause_depth {depth} exceeds {DECODABLE_CAUSE_DEPTH}; \
                 encoded chains that deep cannot be decoded"
            ),
        }
    }
}

// ---------------------------------------------------------------------------
// Config types
// ---------------------------------------------------------------------------

/// Encoding and traversal settings.
#[derive(Debug, Clone, Deserialize, Serialize, JsonSchema, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct SerumConfig {
    /// How many causes of non-canonical errors are followed when encoding.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_cause_depth: Option<usize>,

    /// Indent encoded JSON.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pretty_json: Option<bool>,
}

impl Default for SerumConfig {
    fn default() -> Self {
        Self {
            max_cause_depth: Some(serum::DEFAULT_MAX_CAUSE_DEPTH),
            pretty_json: Some(false),
        }
    }
}

impl SerumConfig {
    /// Codec options for this configuration.  Unset fields take the
    /// library defaults.
    pub fn codec(&self) -> Codec {
        let defaults = Codec::default();
        Codec {
            max_cause_depth: self.max_cause_depth.unwrap_or(defaults.max_cause_depth),
            pretty: self.pretty_json.unwrap_or(defaults.pretty),
        }
    }
}

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Hard upper bound on `max_cause_depth`.
const MAX_CAUSE_DEPTH_LIMIT: usize = 4_096;

/// Deepest chain whose encoding stays inside serde_json's default recursion
/// limit of 128 (one level for the root, one for a details object).
const DECODABLE_CAUSE_DEPTH: usize = 126;

/// Environment variable overriding [`SerumConfig::max_cause_depth`].
pub const ENV_MAX_CAUSE_DEPTH: &str = "SERUM_MAX_CAUSE_DEPTH";

/// Environment variable overriding [`SerumConfig::pretty_json`].
pub const ENV_PRETTY_JSON: &str = "SERUM_PRETTY_JSON";

// ---------------------------------------------------------------------------
// Loading
// ---------------------------------------------------------------------------

/// Load a [`SerumConfig`] from an optional TOML file path.
///
/// * If `path` is `Some`, reads and parses the file.
/// * If `path` is `None`, returns [`SerumConfig::default()`].
///
/// Environment variable overrides are applied on top in both cases.
pub fn load_config(path: Option<&Path>) -> Result<SerumConfig, ConfigError> {
    let mut config = match path {
        Some(p) => {
            let content = std::fs::read_to_string(p).map_err(|_| ConfigError::FileNotFound {
                path: p.display().to_string(),
            })?;
            parse_toml(&content)?
        }
        None => SerumConfig::default(),
    };
    apply_env_overrides(&mut config)?;
    Ok(config)
}

/// Parse a TOML string into a [`SerumConfig`].
pub fn parse_toml(content: &str) -> Result<SerumConfig, ConfigError> {
    toml::from_str::<SerumConfig>(content).map_err(|e| ConfigError::ParseError {
        reason: e.to_string(),
    })
}

// ---------------------------------------------------------------------------
// Env overrides
// ---------------------------------------------------------------------------

/// Apply environment variable overrides.
///
/// Recognised variables:
/// - `SERUM_MAX_CAUSE_DEPTH` (an unsigned integer)
/// - `SERUM_PRETTY_JSON` (`true`/`false`, `1`/`0`)
///
/// A variable that is set but unparseable is a [`ConfigError::ParseError`].
pub fn apply_env_overrides(config: &mut SerumConfig) -> Result<(), ConfigError> {
    if let Ok(val) = std::env::var(ENV_MAX_CAUSE_DEPTH) {
        let depth = val.trim().parse().map_err(|e| ConfigError::ParseError {
            reason: format!("{ENV_MAX_CAUSE_DEPTH}={val:?}: {e}"),
        })?;
        config.max_cause_depth = Some(depth);
    }
    if let Ok(val) = std::env::var(ENV_PRETTY_JSON) {
        config.pretty_json = Some(parse_flag(&val).ok_or_else(|| ConfigError::ParseError {
            reason: format!("{ENV_PRETTY_JSON}={val:?}: expected true, false, 1 or 0"),
        })?);
    }
    Ok(())
}

fn parse_flag(val: &str) -> Option<bool> {
    match val.trim().to_ascii_lowercase().as_str() {
        "true" | "1" => Some(true),
        "false" | "0" => Some(false),
        _ => None,
    }
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

/// Validate a parsed configuration, returning advisory warnings.
///
/// A depth of zero or above the hard limit is a
/// [`ConfigError::ValidationError`]; unset fields and depths the decoder
/// cannot read back come back as warnings.
pub fn validate_config(config: &SerumConfig) -> Result<Vec<ConfigWarning>, ConfigError> {
    let mut errors: Vec<String> = Vec::new();
    let mut warnings: Vec<ConfigWarning> = Vec::new();

    match config.max_cause_depth {
        Some(0) => errors.push("max_cause_depth must be at least 1".into()),
        Some(d) if d > MAX_CAUSE_DEPTH_LIMIT => errors.push(format!(
            "max_cause_depth {d} out of range (1..={MAX_CAUSE_DEPTH_LIMIT})"
        )),
        Some(d) if d > DECODABLE_CAUSE_DEPTH => {
            warnings.push(ConfigWarning::LargeDepth { depth: d });
        }
        Some(_) => {}
        None => warnings.push(ConfigWarning::MissingOptionalField {
            field: "max_cause_depth".into(),
            hint: format!("defaults to {}", serum::DEFAULT_MAX_CAUSE_DEPTH),
        }),
    }

    if config.pretty_json.is_none() {
        warnings.push(ConfigWarning::MissingOptionalField {
            field: "pretty_json".into(),
            hint: "output will be compact".into(),
        });
    }

    if errors.is_empty() {
        Ok(warnings)
    } else {
        Err(ConfigError::ValidationError { reasons: errors })
    }
}

// ---------------------------------------------------------------------------
// Merging
// ---------------------------------------------------------------------------

/// Merge two configurations.  Values in `overlay` take precedence over `base`.
pub fn merge_configs(base: SerumConfig, overlay: SerumConfig) -> SerumConfig {
    SerumConfig {
        max_cause_depth: overlay.max_cause_depth.or(base.max_cause_depth),
        pretty_json: overlay.pretty_json.or(base.pretty_json),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn unset() -> SerumConfig {
        SerumConfig {
            max_cause_depth: None,
            pretty_json: None,
        }
    }

    // -- 1. Default config is valid and quiet -------------------------------

    #[test]
    fn default_config_is_valid() {
        let warnings = validate_config(&SerumConfig::default()).unwrap();
        assert!(warnings.is_empty(), "{warnings:?}");
    }

    // -- 2. Default codec matches the library default -----------------------

    #[test]
    fn default_codec_matches_library() {
        assert_eq!(SerumConfig::default().codec(), Codec::default());
        assert_eq!(unset().codec(), Codec::default());
    }

    // -- 3. TOML parsing ----------------------------------------------------

    #[test]
    fn parse_valid_toml_string() {
        let cfg = parse_toml("max_cause_depth = 8\npretty_json = true\n").unwrap();
        assert_eq!(cfg.max_cause_depth, Some(8));
        assert_eq!(cfg.pretty_json, Some(true));
        assert_eq!(
            cfg.codec(),
            Codec {
                max_cause_depth: 8,
                pretty: true
            }
        );
    }

    #[test]
    fn empty_toml_leaves_fields_unset() {
        assert_eq!(parse_toml("").unwrap(), unset());
    }

    #[test]
    fn parse_wrong_types_gives_parse_error() {
        let err = parse_toml("max_cause_depth = \"deep\"").unwrap_err();
        assert!(matches!(err, ConfigError::ParseError { .. }));
    }

    #[test]
    fn unknown_keys_are_rejected() {
        let err = parse_toml("log_format = \"json\"").unwrap_err();
        assert!(matches!(err, ConfigError::ParseError { .. }));
    }

    // -- 4. Validation ------------------------------------------------------

    #[test]
    fn zero_depth_is_an_error() {
        let cfg = SerumConfig {
            max_cause_depth: Some(0),
            ..Default::default()
        };
        match validate_config(&cfg).unwrap_err() {
            ConfigError::ValidationError { reasons } => {
                assert_eq!(reasons, vec!["max_cause_depth must be at least 1"]);
            }
            other => panic!("expected ValidationError, got {other:?}"),
        }
    }

    #[test]
    fn huge_depth_is_an_error() {
        let cfg = SerumConfig {
            max_cause_depth: Some(MAX_CAUSE_DEPTH_LIMIT + 1),
            ..Default::default()
        };
        assert!(matches!(
            validate_config(&cfg),
            Err(ConfigError::ValidationError { .. })
        ));
    }

    #[test]
    fn undecodable_depth_warns() {
        let cfg = SerumConfig {
            max_cause_depth: Some(500),
            ..Default::default()
        };
        let warnings = validate_config(&cfg).unwrap();
        assert_eq!(warnings, vec![ConfigWarning::LargeDepth { depth: 500 }]);
        assert!(warnings[0].to_string().contains("cannot be decoded"));
    }

    #[test]
    fn unset_fields_warn() {
        let warnings = validate_config(&unset()).unwrap();
        assert_eq!(warnings.len(), 2);
        assert!(warnings.iter().all(|w| matches!(w, ConfigWarning::MissingOptionalField { .. })));
    }

    // -- 5. Merging ---------------------------------------------------------

    #[test]
    fn overlay_wins_where_set() {
        let base = SerumConfig {
            max_cause_depth: Some(10),
            pretty_json: Some(true),
        };
        let overlay = SerumConfig {
            max_cause_depth: Some(3),
            pretty_json: None,
        };
        let merged = merge_configs(base, overlay);
        assert_eq!(merged.max_cause_depth, Some(3));
        assert_eq!(merged.pretty_json, Some(true));
    }

    // -- 6. Flag parsing ----------------------------------------------------

    #[test]
    fn flags() {
        assert_eq!(parse_flag("TRUE"), Some(true));
        assert_eq!(parse_flag(" 0 "), Some(false));
        assert_eq!(parse_flag("yes"), None);
    }
}
