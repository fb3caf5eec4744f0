// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! C++ wrapper emission.
//!
//! The interface artifact declares the wrapper struct with one nullable
//! function pointer per API; the logic artifact resolves each pointer with
//! `dlsym`. Each artifact runs its own extraction pass, so the i-th field of
//! the interface lines up with the i-th resolution in the logic only because
//! extraction is a pure function of the header text.

use super::templates;
use crate::config::{BindingConfig, ConfigError};
use crate::extract::{ApiDeclaration, ExtractError, Extractor, HeaderSource};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tera::Tera;
use thiserror::Error;

/// Emission errors.
#[derive(Debug, Error)]
pub enum EmitError {
    #[error(transparent)]
    Extract(#[from] ExtractError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("Template error: {0}")]
    Template(#[from] tera::Error),

    #[error(
        "API `{name}` is declared in both {} and {}",
        .first.display(),
        .second.display()
    )]
    Duplicate {
        name: String,
        first: PathBuf,
        second: PathBuf,
    },

    #[error("Interface pass bound {interface} APIs but logic pass bound {logic}")]
    PassMismatch { interface: usize, logic: usize },
}

/// Rendered interface and logic text, plus the bound symbols in order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BindingArtifactPair {
    pub interface: String,
    pub logic: String,
    pub symbols: Vec<String>,
}

/// Renders the wrapper artifacts for a header set.
pub struct BindingGenerator {
    config: BindingConfig,
    extractor: Extractor,
    tera: Tera,
}

impl BindingGenerator {
    pub fn new(config: BindingConfig) -> Result<Self, EmitError> {
        config.validate()?;
        let extractor = config.extractor()?;

        let mut tera = Tera::default();
        tera.add_raw_template(templates::INTERFACE_NAME, templates::INTERFACE)?;
        tera.add_raw_template(templates::LOGIC_NAME, templates::LOGIC)?;

        Ok(Self {
            config,
            extractor,
            tera,
        })
    }

    pub fn config(&self) -> &BindingConfig {
        &self.config
    }

    /// Include path the logic artifact uses to reach the interface artifact.
    pub fn interface_include(&self, interface_path: &Path) -> String {
        match &self.config.interface_include {
            Some(include) => include.clone(),
            None => interface_path
                .file_name()
                .map(|name| name.to_string_lossy().into_owned())
                .unwrap_or_else(|| interface_path.to_string_lossy().into_owned()),
        }
    }

    /// Render the interface artifact.
    pub fn render_interface(&self, headers: &[HeaderSource]) -> Result<String, EmitError> {
        self.interface_pass(headers).map(|(text, _)| text)
    }

    /// Render the logic artifact.
    pub fn render_logic(
        &self,
        headers: &[HeaderSource],
        interface_include: &str,
    ) -> Result<String, EmitError> {
        self.logic_pass(headers, interface_include)
            .map(|(text, _)| text)
    }

    /// Render both artifacts, checking the two passes agree.
    pub fn generate(
        &self,
        headers: &[HeaderSource],
        interface_path: &Path,
    ) -> Result<BindingArtifactPair, EmitError> {
        let (interface, interface_symbols) = self.interface_pass(headers)?;
        let include = self.interface_include(interface_path);
        let (logic, logic_symbols) = self.logic_pass(headers, &include)?;

        if interface_symbols != logic_symbols {
            return Err(EmitError::PassMismatch {
                interface: interface_symbols.len(),
                logic: logic_symbols.len(),
            });
        }

        tracing::info!(
            "[OK] Bound {} APIs from {} headers",
            interface_symbols.len(),
            headers.len()
        );

        Ok(BindingArtifactPair {
            interface,
            logic,
            symbols: interface_symbols,
        })
    }

    fn interface_pass(
        &self,
        headers: &[HeaderSource],
    ) -> Result<(String, Vec<String>), EmitError> {
        let apis = self.collect(headers)?;
        let includes: Vec<String> = headers
            .iter()
            .map(|header| format!("{}{}", self.config.include_prefix, header.base_name()))
            .collect();

        let mut ctx = tera::Context::new();
        ctx.insert("wrapper", &self.config.wrapper_name);
        ctx.insert("includes", &includes);
        ctx.insert("apis", &apis);

        let text = self.tera.render(templates::INTERFACE_NAME, &ctx)?;
        Ok((text, symbol_names(&apis)))
    }

    fn logic_pass(
        &self,
        headers: &[HeaderSource],
        interface_include: &str,
    ) -> Result<(String, Vec<String>), EmitError> {
        let apis = self.collect(headers)?;

        let mut ctx = tera::Context::new();
        ctx.insert("wrapper", &self.config.wrapper_name);
        ctx.insert("interface_include", interface_include);
        ctx.insert("apis", &apis);

        let text = self.tera.render(templates::LOGIC_NAME, &ctx)?;
        Ok((text, symbol_names(&apis)))
    }

    /// One full extraction pass. Duplicate names would produce two fields
    /// with the same name, so they are rejected.
    fn collect(&self, headers: &[HeaderSource]) -> Result<Vec<ApiDeclaration>, EmitError> {
        let apis = self.extractor.extract_all(headers)?;

        let mut seen: HashMap<&str, &Path> = HashMap::new();
        for api in &apis {
            if let Some(first) = seen.insert(&api.name, &api.header) {
                return Err(EmitError::Duplicate {
                    name: api.name.clone(),
                    first: first.to_path_buf(),
                    second: api.header.clone(),
                });
            }
        }

        Ok(apis)
    }
}

fn symbol_names(apis: &[ApiDeclaration]) -> Vec<String> {
    apis.iter().map(|api| api.name.clone()).collect()
}
