// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Fuzz target for the declaration scan and C++ emission.
//!
//! Arbitrary header text must never panic: every input either yields
//! declarations and renders, or fails with an `ExtractError`/`EmitError`.
//! Successful renders must bind the same symbols in both artifacts.

#![no_main]

use libfuzzer_sys::fuzz_target;
use lazylink_gen::{BindingConfig, BindingGenerator, HeaderSource};
use std::path::Path;

fuzz_target!(|data: &[u8]| {
    let Ok(text) = std::str::from_utf8(data) else {
        return;
    };

    // Phase 1: raw scan, restarted twice
    let config = BindingConfig::default();
    let Ok(extractor) = config.extractor() else {
        return;
    };
    let header = HeaderSource::new("fuzz/Index.h", text);
    let first: Vec<_> = extractor
        .declarations(&header)
        .map(|r| r.map_err(|e| e.to_string()))
        .collect();
    let second: Vec<_> = extractor
        .declarations(&header)
        .map(|r| r.map_err(|e| e.to_string()))
        .collect();
    assert_eq!(first, second);

    // Phase 2: both artifacts from the same input
    let Ok(generator) = BindingGenerator::new(config) else {
        return;
    };
    if let Ok(pair) = generator.generate(&[header], Path::new("libclang.h")) {
        for symbol in &pair.symbols {
            assert!(pair.interface.contains(symbol.as_str()));
            assert!(pair.logic.contains(symbol.as_str()));
        }
    }
});
