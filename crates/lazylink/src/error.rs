// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

use thiserror::Error;

/// Errors raised when using an entry of a [`crate::SymbolTable`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SymbolError {
    #[error("Symbol `{symbol}` is unresolved in {library}: {reason}")]
    Unresolved {
        symbol: String,
        library: String,
        reason: String,
    },

    #[error("Symbol `{symbol}` was not requested when {library} was opened")]
    Unknown { symbol: String, library: String },

    #[error("Type requested for `{symbol}` is {size} bytes, not a function pointer")]
    SizeMismatch { symbol: String, size: usize },
}
