// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! All-or-nothing artifact writing.
//!
//! Each artifact is staged in a temporary file next to its destination. Files
//! are renamed into place only after every artifact has been staged, so a
//! failed run leaves the previous outputs untouched. If a rename fails part
//! way, the artifacts already moved into place are restored from the copies
//! read before the first rename (or removed if they did not exist).

use std::io::Write;
use std::path::{Component, Path, PathBuf};
use tempfile::NamedTempFile;
use thiserror::Error;

/// Output errors.
#[derive(Debug, Error)]
pub enum OutputError {
    #[error("Failed to write {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{} is listed as more than one output", .0.display())]
    DuplicatePath(PathBuf),
}

/// Collects rendered artifacts and writes them together.
#[derive(Debug, Default)]
pub struct ArtifactWriter {
    pending: Vec<(PathBuf, String)>,
}

impl ArtifactWriter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, path: impl Into<PathBuf>, contents: impl Into<String>) -> &mut Self {
        self.pending.push((path.into(), contents.into()));
        self
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    /// Stage every artifact, then move them all into place.
    pub fn commit(self) -> Result<Vec<PathBuf>, OutputError> {
        let keys: Vec<PathBuf> = self
            .pending
            .iter()
            .map(|(path, _)| same_file_key(path))
            .collect();
        for (i, key) in keys.iter().enumerate() {
            if keys[..i].contains(key) {
                return Err(OutputError::DuplicatePath(self.pending[i].0.clone()));
            }
        }

        let mut staged = Vec::with_capacity(self.pending.len());
        for (path, contents) in &self.pending {
            let file = stage(path, contents)?;
            staged.push((path, file, backup(path)?));
        }

        let mut written: Vec<(&PathBuf, Option<Vec<u8>>)> = Vec::with_capacity(staged.len());
        for (path, file, previous) in staged {
            if let Err(e) = file.persist(path) {
                rollback(written);
                return Err(OutputError::Io {
                    path: path.clone(),
                    source: e.error,
                });
            }
            tracing::debug!("Wrote {}", path.display());
            written.push((path, previous));
        }
        Ok(written.into_iter().map(|(path, _)| path.clone()).collect())
    }
}

/// Lexically cleaned path with its parent directory canonicalized when it
/// exists, so `gen/a.h` and `./gen/a.h` compare equal.
fn same_file_key(path: &Path) -> PathBuf {
    let cleaned: PathBuf = path
        .components()
        .filter(|c| !matches!(c, Component::CurDir))
        .collect();
    let parent = match cleaned.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    };
    let parent = parent.canonicalize().unwrap_or(parent);
    match cleaned.file_name() {
        Some(name) => parent.join(name),
        None => cleaned,
    }
}

/// Current contents of a destination that is a regular file.
fn backup(path: &Path) -> Result<Option<Vec<u8>>, OutputError> {
    if !path.is_file() {
        return Ok(None);
    }
    std::fs::read(path)
        .map(Some)
        .map_err(|source| OutputError::Io {
            path: path.to_path_buf(),
            source,
        })
}

fn rollback(written: Vec<(&PathBuf, Option<Vec<u8>>)>) {
    for (path, previous) in written.into_iter().rev() {
        let restored = match previous {
            Some(contents) => std::fs::write(path, contents),
            None => std::fs::remove_file(path),
        };
        match restored {
            Ok(()) => tracing::debug!("Restored {}", path.display()),
            Err(e) => tracing::warn!("Failed to restore {}: {}", path.display(), e),
        }
    }
}

fn stage(path: &Path, contents: &str) -> Result<NamedTempFile, OutputError> {
    let io_err = |source| OutputError::Io {
        path: path.to_path_buf(),
        source,
    };

    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    std::fs::create_dir_all(dir).map_err(io_err)?;

    let mut file = NamedTempFile::new_in(dir).map_err(io_err)?;
    file.write_all(contents.as_bytes()).map_err(io_err)?;
    file.flush().map_err(io_err)?;
    Ok(file)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_commit_writes_all() {
        let dir = tempfile::tempdir().unwrap();
        let a = dir.path().join("a.h");
        let b = dir.path().join("nested/b.cc");

        let mut writer = ArtifactWriter::new();
        writer.add(&a, "header").add(&b, "source");
        assert_eq!(writer.len(), 2);

        let written = writer.commit().unwrap();
        assert_eq!(written, vec![a.clone(), b.clone()]);
        assert_eq!(std::fs::read_to_string(&a).unwrap(), "header");
        assert_eq!(std::fs::read_to_string(&b).unwrap(), "source");
    }

    #[test]
    fn test_commit_replaces_existing() {
        let dir = tempfile::tempdir().unwrap();
        let a = dir.path().join("a.h");
        std::fs::write(&a, "old").unwrap();

        let mut writer = ArtifactWriter::new();
        writer.add(&a, "new");
        writer.commit().unwrap();
        assert_eq!(std::fs::read_to_string(&a).unwrap(), "new");
    }

    #[test]
    fn test_duplicate_path_writes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let a = dir.path().join("a.h");

        let mut writer = ArtifactWriter::new();
        writer.add(&a, "one").add(&a, "two");
        assert!(matches!(
            writer.commit(),
            Err(OutputError::DuplicatePath(_))
        ));
        assert!(!a.exists());
    }

    #[test]
    fn test_equivalent_paths_are_duplicates() {
        let dir = tempfile::tempdir().unwrap();
        let a = dir.path().join("gen/a.h");
        let same = dir.path().join("gen/./a.h");

        let mut writer = ArtifactWriter::new();
        writer.add(&a, "interface").add(&same, "logic");
        assert!(matches!(
            writer.commit(),
            Err(OutputError::DuplicatePath(_))
        ));
        assert!(!a.exists());

        std::fs::create_dir_all(dir.path().join("gen/sub")).unwrap();
        let via_parent = dir.path().join("gen/sub/../a.h");
        let mut writer = ArtifactWriter::new();
        writer.add(&a, "interface").add(&via_parent, "logic");
        assert!(matches!(
            writer.commit(),
            Err(OutputError::DuplicatePath(_))
        ));
    }

    #[test]
    fn test_rename_failure_restores_earlier_outputs() {
        let dir = tempfile::tempdir().unwrap();
        let kept = dir.path().join("kept.h");
        std::fs::write(&kept, "previous").unwrap();
        let fresh = dir.path().join("fresh.h");

        // Renaming a file over a directory fails after staging succeeded.
        let occupied = dir.path().join("occupied.cc");
        std::fs::create_dir(&occupied).unwrap();
        std::fs::write(occupied.join("inner"), "x").unwrap();

        let mut writer = ArtifactWriter::new();
        writer
            .add(&kept, "replacement")
            .add(&fresh, "new")
            .add(&occupied, "never");
        assert!(matches!(writer.commit(), Err(OutputError::Io { .. })));

        assert_eq!(std::fs::read_to_string(&kept).unwrap(), "previous");
        assert!(!fresh.exists());
        assert!(occupied.is_dir());
    }

    #[test]
    fn test_staging_failure_leaves_other_outputs_untouched() {
        let dir = tempfile::tempdir().unwrap();
        let good = dir.path().join("good.h");
        std::fs::write(&good, "previous").unwrap();

        // A regular file where a directory is needed.
        let blocker = dir.path().join("blocker");
        std::fs::write(&blocker, "").unwrap();
        let bad = blocker.join("bad.cc");

        let mut writer = ArtifactWriter::new();
        writer.add(&good, "replacement").add(&bad, "never");
        assert!(writer.commit().is_err());
        assert_eq!(std::fs::read_to_string(&good).unwrap(), "previous");
    }
}
