// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Runtime symbol tables for lazily-bound C libraries.
//!
//! [`SymbolTable`] is the Rust counterpart of the wrappers emitted by
//! `lazylink-gen`: it opens a shared library once (lazy, local, never
//! unloaded) and resolves a fixed list of symbols by name. Neither a failed
//! load nor a missing symbol is an error at open time; the entry simply stays
//! unresolved, and using it yields a [`SymbolError`] instead of a call through
//! a null pointer.
//!
//! ```no_run
//! use lazylink::SymbolTable;
//!
//! let table = SymbolTable::open("libm.so.6", &["cos", "cospi"]);
//! type Cos = unsafe extern "C" fn(f64) -> f64;
//! // SAFETY: matches the C prototype `double cos(double)`.
//! let cos = unsafe { table.bind::<Cos>("cos") };
//! match cos.get() {
//!     Ok(f) => println!("{}", unsafe { f(0.0) }),
//!     Err(e) => eprintln!("{e}"),
//! }
//! ```

mod error;
mod table;

pub use error::SymbolError;
pub use table::{LazyFn, SymbolTable};
