// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! lazylink-gen CLI
//!
//! # Usage
//!
//! ```bash
//! # libclang wrapper from the clang-c headers
//! lazylink-gen bindings --interface gen/libclang.h --logic gen/libclang.cc \
//!     /usr/lib/llvm/include/clang-c/Index.h /usr/lib/llvm/include/clang-c/CXString.h
//!
//! # Another library, settings from a YAML file
//! lazylink-gen bindings --config zstd.yaml --interface zstd_dyn.h --logic zstd_dyn.cc zstd.h
//!
//! # Terminal color table
//! lazylink-gen colors --table colors.yaml --header gen/colors.h --source gen/colors.cc
//! ```

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use lazylink_gen::{generate_bindings, generate_colors, BindingConfig, BindingRequest, ColorRequest};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "lazylink-gen")]
#[command(about = "Generate lazily-bound C++ wrappers for C APIs declared in headers")]
#[command(version)]
struct Args {
    /// Log level (trace, debug, info, warn, error)
    #[arg(long, global = true, default_value = "info")]
    log_level: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Generate the wrapper interface and logic from C headers
    Bindings {
        /// Interface artifact (wrapper declaration)
        #[arg(long)]
        interface: PathBuf,

        /// Logic artifact (constructor/destructor)
        #[arg(long)]
        logic: PathBuf,

        /// YAML configuration file
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Linkage marker preceding exported declarations
        #[arg(long)]
        marker: Option<String>,

        /// Name of the generated wrapper struct
        #[arg(long)]
        wrapper: Option<String>,

        /// Prefix for the rewritten header includes
        #[arg(long)]
        include_prefix: Option<String>,

        /// Headers to scan, in order
        #[arg(required = true)]
        headers: Vec<PathBuf>,
    },

    /// Generate the terminal color enum and initialization routine
    Colors {
        /// YAML table of name: [FOREGROUND, BACKGROUND]
        #[arg(long)]
        table: PathBuf,

        /// Header artifact (ColorID enum)
        #[arg(long)]
        header: PathBuf,

        /// Source artifact (InitColors)
        #[arg(long)]
        source: PathBuf,
    },
}

fn main() {
    let args = Args::parse();

    let filter = EnvFilter::try_new(&args.log_level).unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();

    if let Err(e) = run(args.command) {
        eprintln!("[ERROR] {:#}", e);
        std::process::exit(1);
    }
}

fn run(command: Commands) -> Result<()> {
    let report = match command {
        Commands::Bindings {
            interface,
            logic,
            config,
            marker,
            wrapper,
            include_prefix,
            headers,
        } => {
            let mut config = match config {
                Some(path) => BindingConfig::from_file(&path)
                    .with_context(|| format!("Failed to load {}", path.display()))?,
                None => BindingConfig::default(),
            };
            if let Some(marker) = marker {
                config.marker = marker;
            }
            if let Some(wrapper) = wrapper {
                config.wrapper_name = wrapper;
            }
            if let Some(prefix) = include_prefix {
                config.include_prefix = prefix;
            }

            generate_bindings(&BindingRequest {
                headers,
                interface,
                logic,
                config,
            })?
        }
        Commands::Colors {
            table,
            header,
            source,
        } => generate_colors(&ColorRequest {
            table,
            header,
            source,
        })?,
    };

    report.summary();
    Ok(())
}
