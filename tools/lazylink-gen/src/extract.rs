// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Declaration extraction from C headers.
//!
//! A declaration is the text between a linkage marker and the first `;` that
//! follows it. The span is whitespace-normalized and split textually into a
//! return type, a name and a raw argument list. This is a heuristic over a
//! small regular subset of C, not a parser: the return type and name are split
//! at the later of the last space and the last `*` before the opening paren.

use regex::{CaptureMatches, Regex};
use serde::Serialize;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Extraction errors.
///
/// Every parse failure names the header and the byte offset of the marker
/// occurrence so the offending declaration can be located.
#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("failed to read header {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{}:{offset}: no '(' in declaration `{text}`", .path.display())]
    MissingOpenParen {
        path: PathBuf,
        offset: usize,
        text: String,
    },

    #[error("{}:{offset}: no ')' closing the argument list of `{text}`", .path.display())]
    MissingCloseParen {
        path: PathBuf,
        offset: usize,
        text: String,
    },

    #[error("{}:{offset}: unbalanced parentheses in `{text}`", .path.display())]
    UnbalancedParens {
        path: PathBuf,
        offset: usize,
        text: String,
    },

    #[error("{}:{offset}: unexpected text after the argument list of `{text}`", .path.display())]
    TrailingText {
        path: PathBuf,
        offset: usize,
        text: String,
    },

    #[error("{}:{offset}: cannot find a function name in `{text}`", .path.display())]
    MissingName {
        path: PathBuf,
        offset: usize,
        text: String,
    },

    #[error("{}:{offset}: cannot find a return type in `{text}`", .path.display())]
    MissingReturnType {
        path: PathBuf,
        offset: usize,
        text: String,
    },

    #[error("{}:{offset}: `{marker}` is not followed by a ';'", .path.display())]
    Unterminated {
        path: PathBuf,
        offset: usize,
        marker: String,
    },

    #[error("invalid declaration pattern: {0}")]
    Pattern(#[from] regex::Error),
}

/// One header file, read in full.
#[derive(Debug, Clone)]
pub struct HeaderSource {
    pub path: PathBuf,
    pub text: String,
}

impl HeaderSource {
    pub fn new(path: impl Into<PathBuf>, text: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            text: text.into(),
        }
    }

    /// Read a header from disk.
    pub fn read<P: AsRef<Path>>(path: P) -> Result<Self, ExtractError> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|source| ExtractError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(Self::new(path, text))
    }

    /// File name without directories, used for rewritten include directives.
    pub fn base_name(&self) -> String {
        self.path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.path.to_string_lossy().into_owned())
    }
}

/// One parsed C function signature.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ApiDeclaration {
    pub header: PathBuf,
    pub return_type: String,
    pub name: String,
    pub arguments: String,
}

impl ApiDeclaration {
    /// Name of the generated function pointer typedef.
    pub fn alias_name(&self) -> String {
        format!("{}_type", self.name)
    }

    /// Anonymous pointer-to-function type, e.g. `CXString (*)(CXCursor C)`.
    pub fn function_pointer_type(&self) -> String {
        format!("{} (*)({})", self.return_type, self.arguments)
    }
}

impl fmt::Display for ApiDeclaration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}({})", self.return_type, self.name, self.arguments)
    }
}

/// Compiled scan pattern plus the argument denylist.
#[derive(Debug, Clone)]
pub struct Extractor {
    marker: String,
    pattern: Regex,
    whitespace: Regex,
    denylist: Vec<String>,
}

impl Extractor {
    pub fn new(marker: &str, denylist: Vec<String>) -> Result<Self, ExtractError> {
        let pattern = Regex::new(&format!("(?:{})([^;]*);", regex::escape(marker)))?;
        let whitespace = Regex::new(r"[ \t\r\n]+")?;

        Ok(Self {
            marker: marker.to_string(),
            pattern,
            whitespace,
            denylist,
        })
    }

    pub fn marker(&self) -> &str {
        &self.marker
    }

    pub fn denylist(&self) -> &[String] {
        &self.denylist
    }

    /// Lazily scan one header. Each call starts a fresh scan.
    pub fn declarations<'a>(&'a self, header: &'a HeaderSource) -> Declarations<'a> {
        Declarations {
            extractor: self,
            header,
            matches: self.pattern.captures_iter(&header.text),
            last_end: 0,
            done: false,
        }
    }

    /// Extract every declaration, in file order then source order.
    ///
    /// Stops at the first error.
    pub fn extract_all(
        &self,
        headers: &[HeaderSource],
    ) -> Result<Vec<ApiDeclaration>, ExtractError> {
        headers
            .iter()
            .flat_map(|header| self.declarations(header))
            .collect()
    }

    /// Split one matched span. `Ok(None)` means the declaration is denylisted.
    fn decompose(
        &self,
        header: &HeaderSource,
        offset: usize,
        body: &str,
    ) -> Result<Option<ApiDeclaration>, ExtractError> {
        // A second marker inside the span means this one never saw its `;`.
        if body.contains(&self.marker) {
            return Err(ExtractError::Unterminated {
                path: header.path.clone(),
                offset,
                marker: self.marker.clone(),
            });
        }

        let normalized = self.whitespace.replace_all(body, " ");
        let text = || normalized.trim().to_string();

        let (type_and_name, args_and_close) =
            normalized
                .split_once('(')
                .ok_or_else(|| ExtractError::MissingOpenParen {
                    path: header.path.clone(),
                    offset,
                    text: text(),
                })?;

        let close = args_and_close
            .rfind(')')
            .ok_or_else(|| ExtractError::MissingCloseParen {
                path: header.path.clone(),
                offset,
                text: text(),
            })?;
        if !args_and_close[close + 1..].trim().is_empty() {
            return Err(ExtractError::TrailingText {
                path: header.path.clone(),
                offset,
                text: text(),
            });
        }
        let arguments = args_and_close[..close].trim();
        if !is_balanced(arguments) {
            return Err(ExtractError::UnbalancedParens {
                path: header.path.clone(),
                offset,
                text: text(),
            });
        }

        // `int foo (void)` leaves a space before the paren
        let type_and_name = type_and_name.trim_end();
        let type_end = type_and_name.rfind(' ').max(type_and_name.rfind('*'));
        let split = type_end.map_or(0, |end| end + 1);
        let return_type = type_and_name[..split].trim();
        let name = type_and_name[split..].trim();

        if name.is_empty() {
            return Err(ExtractError::MissingName {
                path: header.path.clone(),
                offset,
                text: text(),
            });
        }
        if return_type.is_empty() {
            return Err(ExtractError::MissingReturnType {
                path: header.path.clone(),
                offset,
                text: text(),
            });
        }

        if let Some(blocked) = self
            .denylist
            .iter()
            .find(|entry| arguments.contains(entry.as_str()))
        {
            tracing::debug!(
                "Skipping {} ({}): argument type {} is denylisted",
                name,
                header.path.display(),
                blocked
            );
            return Ok(None);
        }

        Ok(Some(ApiDeclaration {
            header: header.path.clone(),
            return_type: return_type.to_string(),
            name: name.to_string(),
            arguments: arguments.to_string(),
        }))
    }
}

/// Parentheses never close below depth 0 and all close by the end.
fn is_balanced(text: &str) -> bool {
    let mut depth = 0usize;
    for c in text.chars() {
        match c {
            '(' => depth += 1,
            ')' => match depth.checked_sub(1) {
                Some(d) => depth = d,
                None => return false,
            },
            _ => {}
        }
    }
    depth == 0
}

/// Lazy scan over one header.
///
/// Yields at most one error, after which the iterator is exhausted.
pub struct Declarations<'a> {
    extractor: &'a Extractor,
    header: &'a HeaderSource,
    matches: CaptureMatches<'a, 'a>,
    last_end: usize,
    done: bool,
}

impl<'a> Iterator for Declarations<'a> {
    type Item = Result<ApiDeclaration, ExtractError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }

        for caps in self.matches.by_ref() {
            let (Some(span), Some(body)) = (caps.get(0), caps.get(1)) else {
                continue;
            };
            self.last_end = span.end();

            match self
                .extractor
                .decompose(self.header, span.start(), body.as_str())
            {
                Ok(Some(decl)) => return Some(Ok(decl)),
                Ok(None) => continue,
                Err(e) => {
                    self.done = true;
                    return Some(Err(e));
                }
            }
        }

        self.done = true;
        let tail = &self.header.text[self.last_end..];
        tail.find(&self.extractor.marker).map(|pos| {
            Err(ExtractError::Unterminated {
                path: self.header.path.clone(),
                offset: self.last_end + pos,
                marker: self.extractor.marker.clone(),
            })
        })
    }
}
