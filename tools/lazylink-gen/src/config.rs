// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Binding generator configuration.
//!
//! Every key is optional; the defaults produce the libclang wrapper.
//!
//! ```yaml
//! marker: CINDEX_LINKAGE
//! denylist: [CXCursorAndRangeVisitorBlock, CXCursorVisitorBlock]
//! include_prefix: "clang-c/"
//! wrapper_name: LibClang
//! interface_include: libclang/libclang.h
//! ```

use crate::extract::{ExtractError, Extractor};
use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML parse error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Binding generator configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct BindingConfig {
    /// Linkage marker preceding exported declarations.
    #[serde(default = "default_marker")]
    pub marker: String,

    /// Argument type substrings that disqualify a declaration.
    #[serde(default = "default_denylist")]
    pub denylist: Vec<String>,

    /// Prefix of the rewritten header includes.
    #[serde(default = "default_include_prefix")]
    pub include_prefix: String,

    /// Name of the generated wrapper struct.
    #[serde(default = "default_wrapper_name")]
    pub wrapper_name: String,

    /// Include path of the interface artifact used by the logic artifact.
    /// Falls back to the interface file name.
    #[serde(default)]
    pub interface_include: Option<String>,
}

fn default_marker() -> String {
    "CINDEX_LINKAGE".to_string()
}

fn default_denylist() -> Vec<String> {
    vec![
        "CXCursorAndRangeVisitorBlock".to_string(),
        "CXCursorVisitorBlock".to_string(),
    ]
}

fn default_include_prefix() -> String {
    "clang-c/".to_string()
}

fn default_wrapper_name() -> String {
    "LibClang".to_string()
}

impl Default for BindingConfig {
    fn default() -> Self {
        Self {
            marker: default_marker(),
            denylist: default_denylist(),
            include_prefix: default_include_prefix(),
            wrapper_name: default_wrapper_name(),
            interface_include: None,
        }
    }
}

impl BindingConfig {
    /// Load configuration from a YAML file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }

    /// Parse configuration from YAML text.
    pub fn from_yaml(content: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_yaml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.marker.trim().is_empty() {
            return Err(ConfigError::Invalid("Marker must not be empty".into()));
        }
        if self.marker.contains(';') {
            return Err(ConfigError::Invalid(format!(
                "Marker `{}` must not contain ';'",
                self.marker
            )));
        }
        if !is_c_identifier(&self.wrapper_name) {
            return Err(ConfigError::Invalid(format!(
                "Wrapper name `{}` is not a C identifier",
                self.wrapper_name
            )));
        }
        if let Some(i) = self.denylist.iter().position(|entry| entry.is_empty()) {
            return Err(ConfigError::Invalid(format!(
                "Denylist entry {} is empty",
                i
            )));
        }
        if !is_include_path(&self.include_prefix, true) {
            return Err(ConfigError::Invalid(format!(
                "Include prefix `{}` is not a valid include path",
                self.include_prefix
            )));
        }
        if let Some(include) = &self.interface_include {
            if !is_include_path(include, false) {
                return Err(ConfigError::Invalid(format!(
                    "Interface include `{}` is not a valid include path",
                    include
                )));
            }
        }
        Ok(())
    }

    /// Build the extractor for this configuration.
    pub fn extractor(&self) -> Result<Extractor, ExtractError> {
        Extractor::new(&self.marker, self.denylist.clone())
    }
}

/// Text that can sit between the quotes of an `#include` line.
fn is_include_path(path: &str, allow_empty: bool) -> bool {
    (allow_empty || !path.trim().is_empty())
        && !path.contains(|c: char| c == '"' || c.is_control())
}

/// `[A-Za-z_][A-Za-z0-9_]*`
pub(crate) fn is_c_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_libclang() {
        let config = BindingConfig::default();
        assert_eq!(config.marker, "CINDEX_LINKAGE");
        assert_eq!(config.wrapper_name, "LibClang");
        assert_eq!(config.include_prefix, "clang-c/");
        assert_eq!(config.denylist.len(), 2);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_empty_yaml_uses_defaults() {
        let config = BindingConfig::from_yaml("{}").unwrap();
        assert_eq!(config, BindingConfig::default());
    }

    #[test]
    fn test_partial_yaml() {
        let config = BindingConfig::from_yaml(
            "marker: MYLIB_API\nwrapper_name: MyLib\ninterface_include: mylib/api.h\n",
        )
        .unwrap();
        assert_eq!(config.marker, "MYLIB_API");
        assert_eq!(config.wrapper_name, "MyLib");
        assert_eq!(config.interface_include.as_deref(), Some("mylib/api.h"));
        assert_eq!(config.denylist, default_denylist());
    }

    #[test]
    fn test_unknown_key_rejected() {
        assert!(matches!(
            BindingConfig::from_yaml("markr: X\n"),
            Err(ConfigError::Yaml(_))
        ));
    }

    #[test]
    fn test_invalid_wrapper_name() {
        let config = BindingConfig {
            wrapper_name: "2Lib".into(),
            ..Default::default()
        };
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn test_invalid_marker() {
        let config = BindingConfig {
            marker: "  ".into(),
            ..Default::default()
        };
        assert!(config.validate().is_err());

        let config = BindingConfig {
            marker: "API;".into(),
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_empty_denylist_entry_rejected() {
        let config = BindingConfig {
            denylist: vec!["Block".into(), String::new()],
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_invalid_include_prefix() {
        for prefix in ["clang\"-c/", "clang-c/\n", "\r"] {
            let config = BindingConfig {
                include_prefix: prefix.into(),
                ..Default::default()
            };
            assert!(
                matches!(config.validate(), Err(ConfigError::Invalid(_))),
                "{prefix:?}"
            );
        }

        let config = BindingConfig {
            include_prefix: String::new(),
            ..Default::default()
        };
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_invalid_interface_include() {
        let config = BindingConfig {
            interface_include: Some("gen/\nlib.h".into()),
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_identifier() {
        assert!(is_c_identifier("LibClang"));
        assert!(is_c_identifier("_x9"));
        assert!(!is_c_identifier(""));
        assert!(!is_c_identifier("a-b"));
        assert!(!is_c_identifier("9a"));
    }
}
