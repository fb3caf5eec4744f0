// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

pub mod cxx_backend;
pub(crate) mod templates;

pub use cxx_backend::{BindingArtifactPair, BindingGenerator, EmitError};
