// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Build-time generator for lazily-bound C API wrappers.
//!
//! Scans C headers for declarations tagged with a linkage marker and emits a
//! C++ interface/logic pair: a wrapper struct holding one nullable function
//! pointer per API, and a constructor resolving each one with `dlsym`.
//!
//! The crate also hosts the terminal color table generator used alongside the
//! bindings.

pub mod codegen;
pub mod colors;
pub mod config;
pub mod extract;
pub mod generator;
pub mod output;

pub use codegen::{BindingArtifactPair, BindingGenerator, EmitError};
pub use config::{BindingConfig, ConfigError};
pub use extract::{ApiDeclaration, Declarations, ExtractError, Extractor, HeaderSource};
pub use generator::{
    generate_bindings, generate_colors, BindingRequest, ColorRequest, GenerationReport,
};
pub use output::ArtifactWriter;
