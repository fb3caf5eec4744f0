// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com
//
// Generation runs
//
// bindings: headers -> <interface>.h + <logic>.cc
// colors:   colors.yaml -> <header>.h + <source>.cc
//
// Inputs are read and rendered in memory first; outputs are only touched once
// everything rendered.

use crate::codegen::BindingGenerator;
use crate::colors::ColorTable;
use crate::config::BindingConfig;
use crate::extract::HeaderSource;
use crate::output::ArtifactWriter;
use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

/// Inputs of a bindings run.
#[derive(Debug, Clone)]
pub struct BindingRequest {
    pub headers: Vec<PathBuf>,
    pub interface: PathBuf,
    pub logic: PathBuf,
    pub config: BindingConfig,
}

/// Inputs of a colors run.
#[derive(Debug, Clone)]
pub struct ColorRequest {
    pub table: PathBuf,
    pub header: PathBuf,
    pub source: PathBuf,
}

/// Generate the wrapper interface and logic artifacts.
pub fn generate_bindings(request: &BindingRequest) -> Result<GenerationReport> {
    tracing::info!("Stage 1: Reading {} headers", request.headers.len());
    let headers = request
        .headers
        .iter()
        .map(|path| {
            HeaderSource::read(path).with_context(|| format!("Failed to read {}", path.display()))
        })
        .collect::<Result<Vec<_>>>()?;

    tracing::info!("Stage 2: Rendering {}", request.config.wrapper_name);
    let generator = BindingGenerator::new(request.config.clone())
        .context("Invalid binding configuration")?;
    let pair = generator
        .generate(&headers, &request.interface)
        .context("Failed to generate bindings")?;

    tracing::info!("Stage 3: Writing artifacts");
    let mut writer = ArtifactWriter::new();
    writer
        .add(&request.interface, pair.interface)
        .add(&request.logic, pair.logic);
    let files_written = writer.commit().context("Failed to write bindings")?;

    Ok(GenerationReport {
        title: "Binding Generation Report",
        headers_scanned: headers.len(),
        apis_bound: pair.symbols,
        colors: 0,
        files_written,
    })
}

/// Generate the color enum header and initialization source.
pub fn generate_colors(request: &ColorRequest) -> Result<GenerationReport> {
    tracing::info!("Loading color table from: {:?}", request.table);
    let table = ColorTable::from_file(&request.table)
        .with_context(|| format!("Failed to load {}", request.table.display()))?;

    let header = table.render_header().context("Failed to render color header")?;
    let source = table
        .render_source(&file_name(&request.header))
        .context("Failed to render color source")?;

    let mut writer = ArtifactWriter::new();
    writer
        .add(&request.header, header)
        .add(&request.source, source);
    let files_written = writer.commit().context("Failed to write color artifacts")?;

    Ok(GenerationReport {
        title: "Color Generation Report",
        headers_scanned: 0,
        apis_bound: Vec::new(),
        colors: table.colors.len(),
        files_written,
    })
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.to_string_lossy().into_owned())
}

/// Generation report
#[derive(Debug, Default)]
pub struct GenerationReport {
    pub title: &'static str,
    pub headers_scanned: usize,
    pub apis_bound: Vec<String>,
    pub colors: usize,
    pub files_written: Vec<PathBuf>,
}

impl GenerationReport {
    pub fn summary(&self) {
        println!("\n{}", "=".repeat(60));
        println!("  {}", self.title);
        println!("{}", "=".repeat(60));
        println!();
        if self.headers_scanned > 0 {
            println!("  [OK] Headers scanned: {}", self.headers_scanned);
            println!("  [OK] APIs bound:      {}", self.apis_bound.len());
        }
        if self.colors > 0 {
            println!("  [OK] Color pairs:     {}", self.colors);
        }
        println!();
        println!("  Generated:");
        for path in &self.files_written {
            println!("    - {}", path.display());
        }
        println!();
        println!("{}", "=".repeat(60));
    }
}
