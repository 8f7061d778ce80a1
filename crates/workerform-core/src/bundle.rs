//! Module bundle scanning.
//!
//! A bundle is the set of module files found directly inside a script
//! directory. Files are classified by name and anything unrecognized is left
//! out of the bundle entirely.
//!
//! Entries are returned in the order the filesystem lists them. The bundle
//! digest is computed over that order, so it is only stable for as long as the
//! directory listing order is.

use std::path::{Path, PathBuf};

use crate::digest::{bundle_digest, file_digest};
use crate::error::{CoreError, Result};

/// Kind of content held by a module file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ContentKind {
    Script,
    Binary,
    SourceMap,
}

impl ContentKind {
    /// MIME type sent with the module part. Also seeds the file digest.
    pub fn mime_type(self) -> &'static str {
        match self {
            Self::Script => "application/javascript+module",
            Self::Binary => "application/wasm",
            Self::SourceMap => "application/source-map",
        }
    }
}

impl std::fmt::Display for ContentKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.mime_type())
    }
}

/// Classify a filename, case-insensitively. `None` means not part of a bundle.
pub fn classify(filename: &str) -> Option<ContentKind> {
    let lower = filename.to_ascii_lowercase();
    if lower.ends_with(".js") || lower.ends_with(".mjs") {
        Some(ContentKind::Script)
    } else if lower.ends_with(".wasm") {
        Some(ContentKind::Binary)
    } else if lower.ends_with(".js.map") {
        Some(ContentKind::SourceMap)
    } else {
        None
    }
}

/// A file eligible for upload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModuleFile {
    pub filename: String,
    pub kind: ContentKind,
}

/// A module file together with its bytes and digest.
#[derive(Debug, Clone)]
pub struct LoadedModule {
    pub file: ModuleFile,
    pub bytes: Vec<u8>,
    pub digest: String,
}

/// Every module of a bundle, read in scan order, plus the bundle digest.
#[derive(Debug, Clone)]
pub struct LoadedBundle {
    pub dir: PathBuf,
    pub modules: Vec<LoadedModule>,
    pub digest: String,
}

impl LoadedBundle {
    pub fn contains(&self, filename: &str) -> bool {
        self.modules.iter().any(|m| m.file.filename == filename)
    }

    pub fn filenames(&self) -> impl Iterator<Item = &str> {
        self.modules.iter().map(|m| m.file.filename.as_str())
    }
}

/// List the module files directly inside `dir`.
///
/// Only regular files are considered; directories and symlinks are skipped.
pub async fn scan(dir: impl AsRef<Path>) -> Result<Vec<ModuleFile>> {
    let dir = dir.as_ref();
    let mut entries = tokio::fs::read_dir(dir)
        .await
        .map_err(|e| CoreError::io(dir, e))?;

    let mut files = Vec::new();
    while let Some(entry) = entries
        .next_entry()
        .await
        .map_err(|e| CoreError::io(dir, e))?
    {
        let file_type = entry
            .file_type()
            .await
            .map_err(|e| CoreError::io(entry.path(), e))?;
        if !file_type.is_file() {
            continue;
        }

        let filename = entry.file_name().to_string_lossy().into_owned();
        match classify(&filename) {
            Some(kind) => files.push(ModuleFile { filename, kind }),
            None => tracing::trace!(file = %filename, "Skipping unrecognized file"),
        }
    }

    tracing::debug!(dir = %dir.display(), files = files.len(), "Scanned module bundle");
    Ok(files)
}

/// Scan `dir` and read every module, one at a time, in scan order.
pub async fn load(dir: impl AsRef<Path>) -> Result<LoadedBundle> {
    let dir = dir.as_ref();
    let files = scan(dir).await?;

    let mut modules = Vec::with_capacity(files.len());
    for file in files {
        let path = dir.join(&file.filename);
        let bytes = tokio::fs::read(&path)
            .await
            .map_err(|e| CoreError::io(&path, e))?;
        let digest = file_digest(&bytes, file.kind);
        modules.push(LoadedModule {
            file,
            bytes,
            digest,
        });
    }

    let digest = bundle_digest(modules.iter().map(|m| m.digest.as_str()));
    Ok(LoadedBundle {
        dir: dir.to_path_buf(),
        modules,
        digest,
    })
}

/// Bundle digest of `dir`.
pub async fn digest(dir: impl AsRef<Path>) -> Result<String> {
    Ok(load(dir).await?.digest)
}
