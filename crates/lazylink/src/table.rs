// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Library handle plus name-indexed optional symbols.

use crate::error::SymbolError;
use libloading::Library;
use std::collections::HashMap;
use std::ffi::{c_void, CString};
use std::marker::PhantomData;
use std::mem;
use std::path::{Path, PathBuf};
use std::ptr::NonNull;

struct Entry {
    name: String,
    address: Option<NonNull<c_void>>,
}

/// A shared library opened once, with a fixed set of resolved-or-not symbols.
///
/// The library handle is released when the table is dropped, and only if the
/// load succeeded.
pub struct SymbolTable {
    path: PathBuf,
    library: Option<Library>,
    load_error: Option<String>,
    entries: Vec<Entry>,
    index: HashMap<String, usize>,
}

// SAFETY: entries are addresses inside `library`, which the table owns; they
// are never dereferenced by the table itself.
unsafe impl Send for SymbolTable {}
unsafe impl Sync for SymbolTable {}

impl SymbolTable {
    /// Open `path` and resolve every name in `names`.
    ///
    /// Never fails. A library that cannot be opened leaves every entry
    /// unresolved; the reason is kept in [`SymbolTable::load_error`].
    /// Repeated names are resolved once.
    pub fn open<P: AsRef<Path>, S: AsRef<str>>(path: P, names: &[S]) -> Self {
        let path = path.as_ref().to_path_buf();

        let (library, load_error) = match load(&path) {
            Ok(library) => (Some(library), None),
            Err(e) => {
                tracing::warn!("Failed to load {}: {}", path.display(), e);
                (None, Some(e.to_string()))
            }
        };

        let mut entries = Vec::with_capacity(names.len());
        let mut index = HashMap::with_capacity(names.len());
        for name in names {
            let name = name.as_ref();
            if index.contains_key(name) {
                continue;
            }

            let address = library.as_ref().and_then(|lib| resolve(lib, name));
            if library.is_some() && address.is_none() {
                tracing::debug!("Symbol {} not found in {}", name, path.display());
            }

            index.insert(name.to_string(), entries.len());
            entries.push(Entry {
                name: name.to_string(),
                address,
            });
        }

        if library.is_some() {
            tracing::debug!(
                "Loaded {}: {}/{} symbols resolved",
                path.display(),
                entries.iter().filter(|e| e.address.is_some()).count(),
                entries.len()
            );
        }

        Self {
            path,
            library,
            load_error,
            entries,
            index,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn is_loaded(&self) -> bool {
        self.library.is_some()
    }

    /// Why the library could not be opened, if it could not.
    pub fn load_error(&self) -> Option<&str> {
        self.load_error.as_deref()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Requested names, in request order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|e| e.name.as_str())
    }

    pub fn is_resolved(&self, name: &str) -> bool {
        self.entry(name).is_some_and(|e| e.address.is_some())
    }

    /// Unresolved names, in request order.
    pub fn missing(&self) -> impl Iterator<Item = &str> {
        self.entries
            .iter()
            .filter(|e| e.address.is_none())
            .map(|e| e.name.as_str())
    }

    /// Raw address of a resolved symbol.
    pub fn address(&self, name: &str) -> Result<NonNull<c_void>, SymbolError> {
        let entry = self.entry(name).ok_or_else(|| SymbolError::Unknown {
            symbol: name.to_string(),
            library: self.path.display().to_string(),
        })?;

        entry.address.ok_or_else(|| SymbolError::Unresolved {
            symbol: name.to_string(),
            library: self.path.display().to_string(),
            reason: match &self.load_error {
                Some(e) => format!("library not loaded ({})", e),
                None => "symbol not exported by the library".to_string(),
            },
        })
    }

    /// Typed function pointer for `name`.
    ///
    /// # Safety
    ///
    /// `F` must be a function pointer type matching the symbol's actual
    /// signature and calling convention.
    pub unsafe fn function<F: Copy>(&self, name: &str) -> Result<F, SymbolError> {
        check_size::<F>(name)?;
        let address = self.address(name)?;
        Ok(mem::transmute_copy::<*mut c_void, F>(&address.as_ptr()))
    }

    /// Named optional function pointer tied to this table.
    ///
    /// Unlike [`SymbolTable::function`], an unresolved or unknown name is not
    /// reported here but on every [`LazyFn::get`].
    ///
    /// # Safety
    ///
    /// Same contract as [`SymbolTable::function`].
    pub unsafe fn bind<F: Copy>(&self, name: &str) -> LazyFn<'_, F> {
        let pointer = self.function::<F>(name);
        LazyFn {
            name: name.to_string(),
            pointer,
            _table: PhantomData,
        }
    }

    fn entry(&self, name: &str) -> Option<&Entry> {
        self.index.get(name).map(|&i| &self.entries[i])
    }
}

impl std::fmt::Debug for SymbolTable {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SymbolTable")
            .field("path", &self.path)
            .field("loaded", &self.is_loaded())
            .field("symbols", &self.entries.len())
            .field("missing", &self.missing().count())
            .finish()
    }
}

/// A function pointer that may not have been resolved.
pub struct LazyFn<'lib, F> {
    name: String,
    pointer: Result<F, SymbolError>,
    _table: PhantomData<&'lib SymbolTable>,
}

impl<F: Copy> LazyFn<'_, F> {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn is_resolved(&self) -> bool {
        self.pointer.is_ok()
    }

    /// The pointer, or the reason it is unavailable.
    pub fn get(&self) -> Result<F, SymbolError> {
        self.pointer.clone()
    }
}

fn check_size<F>(name: &str) -> Result<(), SymbolError> {
    let size = mem::size_of::<F>();
    if size != mem::size_of::<*mut c_void>() {
        return Err(SymbolError::SizeMismatch {
            symbol: name.to_string(),
            size,
        });
    }
    Ok(())
}

fn resolve(library: &Library, name: &str) -> Option<NonNull<c_void>> {
    let c_name = CString::new(name).ok()?;
    // SAFETY: the symbol is only read as an address here.
    let symbol = unsafe { library.get::<*mut c_void>(c_name.as_bytes_with_nul()) }.ok()?;
    NonNull::new(*symbol)
}

#[cfg(unix)]
fn load(path: &Path) -> Result<Library, libloading::Error> {
    use libloading::os::unix::{Library as UnixLibrary, RTLD_LAZY, RTLD_LOCAL};

    // SAFETY: loading runs the library's initializers; callers choose which
    // library to trust.
    let library =
        unsafe { UnixLibrary::open(Some(path), RTLD_LAZY | RTLD_LOCAL | libc::RTLD_NODELETE) }?;
    Ok(library.into())
}

#[cfg(not(unix))]
fn load(path: &Path) -> Result<Library, libloading::Error> {
    // SAFETY: see the unix variant.
    unsafe { Library::new(path) }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_size_check() {
        assert!(check_size::<fn()>("f").is_ok());
        assert!(check_size::<extern "C" fn(i32) -> i32>("f").is_ok());
        assert_eq!(
            check_size::<[u8; 3]>("f"),
            Err(SymbolError::SizeMismatch {
                symbol: "f".into(),
                size: 3
            })
        );
    }
}
