// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Terminal color table generator.
//!
//! Turns a YAML table of `name: [FOREGROUND, BACKGROUND]` into a `ColorID`
//! enum header and an `InitColors()` routine registering one curses color pair
//! per entry. Table order is preserved; `unused` occupies pair 0.

use crate::codegen::templates;
use crate::config::is_c_identifier;
use serde::Serialize;
use std::path::Path;
use tera::Tera;
use thiserror::Error;

/// Color table errors.
#[derive(Debug, Error)]
pub enum ColorError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML parse error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Color table must be a mapping of name to [foreground, background]")]
    NotAMapping,

    #[error("Color `{name}`: {reason}")]
    InvalidEntry { name: String, reason: String },

    #[error("Template error: {0}")]
    Template(#[from] tera::Error),
}

/// One color pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ColorPair {
    pub name: String,
    pub foreground: String,
    pub background: String,
}

/// Ordered color table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColorTable {
    pub colors: Vec<ColorPair>,
}

impl ColorTable {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ColorError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }

    pub fn from_yaml(content: &str) -> Result<Self, ColorError> {
        if content.trim().is_empty() {
            return Ok(Self { colors: Vec::new() });
        }

        let value: serde_yaml::Value = serde_yaml::from_str(content)?;
        let mapping = match value {
            serde_yaml::Value::Mapping(mapping) => mapping,
            serde_yaml::Value::Null => serde_yaml::Mapping::new(),
            _ => return Err(ColorError::NotAMapping),
        };

        let mut colors = Vec::with_capacity(mapping.len());
        for (key, value) in mapping {
            let name = match key {
                serde_yaml::Value::String(name) => name,
                other => {
                    return Err(ColorError::InvalidEntry {
                        name: format!("{:?}", other),
                        reason: "name must be a string".into(),
                    })
                }
            };
            colors.push(parse_entry(name, value)?);
        }

        Ok(Self { colors })
    }

    pub fn names(&self) -> Vec<&str> {
        self.colors.iter().map(|c| c.name.as_str()).collect()
    }

    pub fn render_header(&self) -> Result<String, ColorError> {
        let mut ctx = tera::Context::new();
        ctx.insert("names", &self.names());
        render(templates::COLORS_HEADER_NAME, templates::COLORS_HEADER, &ctx)
    }

    pub fn render_source(&self, header_include: &str) -> Result<String, ColorError> {
        let mut ctx = tera::Context::new();
        ctx.insert("header_include", header_include);
        ctx.insert("colors", &self.colors);
        render(templates::COLORS_SOURCE_NAME, templates::COLORS_SOURCE, &ctx)
    }
}

fn parse_entry(name: String, value: serde_yaml::Value) -> Result<ColorPair, ColorError> {
    let invalid = |reason: &str| ColorError::InvalidEntry {
        name: name.clone(),
        reason: reason.to_string(),
    };

    if !is_c_identifier(&name) {
        return Err(invalid("name is not a C identifier"));
    }
    if name == "unused" {
        return Err(invalid("`unused` is reserved for color pair 0"));
    }

    let serde_yaml::Value::Sequence(pair) = value else {
        return Err(invalid("expected [foreground, background]"));
    };
    let [fg, bg] = pair.as_slice() else {
        return Err(invalid("expected exactly two colors"));
    };

    let color = |v: &serde_yaml::Value| match v.as_str() {
        Some(c) if is_c_identifier(c) => Ok(c.to_string()),
        _ => Err(invalid("colors must be curses color names such as RED or DEFAULT")),
    };

    Ok(ColorPair {
        foreground: color(fg)?,
        background: color(bg)?,
        name,
    })
}

fn render(name: &str, template: &str, ctx: &tera::Context) -> Result<String, ColorError> {
    let mut tera = Tera::default();
    tera.add_raw_template(name, template)?;
    Ok(tera.render(name, ctx)?)
}
