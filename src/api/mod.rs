//! High-level library API: derivatives for stored files via explicit storage
//! and mime-type collaborators, and batch helpers for whole directories. Prefer
//! these entrypoints over the low-level `core` modules when integrating derivgen.
use std::collections::{HashMap, HashSet};
use std::fs;
use std::path::{Path, PathBuf};

use image::ImageFormat;
use tracing::{info, warn};

use crate::core::args::derivative_filename;
use crate::core::creator::DerivativeImageCreator;
use crate::error::{Error, Result};
use crate::types::{DerivativeOutcome, DerivativeSpec};

/// The parts of a stored file record needed to derive images from it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredFile {
    /// Name of the original within storage, e.g. `a1b2c3.png`
    pub filename: String,
    pub mime_type: String,
}

/// Maps a stored file to the filesystem path of its original.
pub trait StorageResolver {
    fn source_path(&self, file: &StoredFile) -> PathBuf;
}

/// Originals kept flat under one root directory
#[derive(Debug, Clone)]
pub struct LocalStorage {
    pub root: PathBuf,
}

impl LocalStorage {
    pub fn new<P: Into<PathBuf>>(root: P) -> Self {
        Self { root: root.into() }
    }
}

impl StorageResolver for LocalStorage {
    fn source_path(&self, file: &StoredFile) -> PathBuf {
        self.root.join(&file.filename)
    }
}

/// Supplies a mime type for a path when no metadata record is at hand.
pub trait MimeTypeSource {
    fn mime_type(&self, path: &Path) -> Option<String>;
}

/// Mime type guessed from the file extension
#[derive(Debug, Default, Clone, Copy)]
pub struct ExtensionMimeTypes;

impl MimeTypeSource for ExtensionMimeTypes {
    fn mime_type(&self, path: &Path) -> Option<String> {
        ImageFormat::from_path(path)
            .ok()
            .map(|format| format.to_mime_type().to_string())
    }
}

/// Create all registered derivatives for a stored file.
pub fn create_for_stored_file<S: StorageResolver>(
    creator: &DerivativeImageCreator,
    storage: &S,
    file: &StoredFile,
) -> Result<DerivativeOutcome> {
    let source = storage.source_path(file);
    let name = derivative_filename(&file.filename);
    creator.create(&source, &name, &file.mime_type)
}

/// Counters from a directory run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BatchReport {
    pub processed: usize,
    pub skipped: usize,
    pub errors: usize,
}

/// Every filename the registered derivatives would write for `names`.
fn derivative_outputs(names: &[String], specs: &[DerivativeSpec]) -> HashSet<String> {
    names
        .iter()
        .flat_map(|name| {
            let base = derivative_filename(name);
            specs.iter().map(move |spec| spec.output_filename(&base))
        })
        .collect()
}

/// Create derivatives for every original in `dir` (non-recursive, sorted by name).
///
/// A file is a derivative, and skipped, when its name is one the registered
/// classes would write for another file in `dir`. Files with no known mime
/// type or that are not derivable are skipped too. Two originals that map to
/// the same derivative filename (`photo.jpg`, `photo.png`) are an error for
/// the later one. With `continue_on_error == false` the first error is
/// returned; otherwise it is logged and counted.
pub fn process_directory<M: MimeTypeSource>(
    creator: &DerivativeImageCreator,
    dir: &Path,
    mime_types: &M,
    continue_on_error: bool,
) -> Result<BatchReport> {
    let mut entries: Vec<(PathBuf, String)> = Vec::new();
    for entry in fs::read_dir(dir)? {
        let path = entry?.path();
        if !path.is_file() {
            continue;
        }
        if let Some(name) = path.file_name().map(|n| n.to_string_lossy().into_owned()) {
            entries.push((path, name));
        }
    }
    entries.sort();

    let names: Vec<String> = entries.iter().map(|(_, name)| name.clone()).collect();
    let outputs = derivative_outputs(&names, creator.derivatives());
    let mut claimed: HashMap<String, PathBuf> = HashMap::new();

    let mut report = BatchReport::default();
    for (path, name) in entries {
        if outputs.contains(&name) {
            warn!("Skipping derivative file: {:?}", path);
            report.skipped += 1;
            continue;
        }
        let Some(mime_type) = mime_types.mime_type(&path) else {
            warn!("Skipping file with unknown mime type: {:?}", path);
            report.skipped += 1;
            continue;
        };

        let base = derivative_filename(&name);
        let result = match claimed.get(&base) {
            Some(first) => Err(Error::DerivativeNameTaken {
                name: base,
                original: path.clone(),
                claimed_by: first.clone(),
            }),
            None => {
                claimed.insert(base.clone(), path.clone());
                creator.create(&path, &base, &mime_type)
            }
        };

        match result {
            Ok(DerivativeOutcome::Produced(outputs)) => {
                info!("Processed {:?}: {} derivative(s)", path, outputs.len());
                report.processed += 1;
            }
            Ok(DerivativeOutcome::Skipped(reason)) => {
                warn!("Skipping {:?}: {}", path, reason);
                report.skipped += 1;
            }
            Err(e) if continue_on_error => {
                warn!("Error processing {:?}: {}", path, e);
                report.errors += 1;
            }
            Err(e) => return Err(e),
        }
    }

    info!(
        "Batch complete: processed={} skipped={} errors={}",
        report.processed, report.skipped, report.errors
    );
    Ok(report)
}
