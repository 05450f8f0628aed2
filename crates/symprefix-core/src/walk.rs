//! Source tree traversal and dispatch.
//!
//! Mirrors a source directory into a destination directory. Files whose
//! extension is a recognized source extension are read, rewritten by the
//! [`Renamer`] and written to the same relative path; every other file is
//! copied byte for byte with its permissions and timestamps.
//!
//! Processing is sequential and fail-fast: the first read, write or copy
//! error aborts the walk.

use std::fs::{self, File, FileTimes};
use std::path::{Path, PathBuf};

use tracing::{debug, info};
use walkdir::WalkDir;

use crate::engine::Renamer;
use crate::error::{PrefixError, PrefixResult};

/// Source extensions rewritten by default (without the dot).
pub const DEFAULT_SOURCE_EXTENSIONS: &[&str] = &["c", "cpp", "h", "hpp", "cc", "hxx", "cxx"];

// ============================================================================
// Source Extensions
// ============================================================================

/// Set of file extensions routed through the renamer. Case-sensitive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceExtensions {
    extensions: Vec<String>,
}

impl SourceExtensions {
    /// Build from a list of extensions; a leading dot is accepted and
    /// stripped, empty entries are dropped.
    pub fn new<I, S>(extensions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut extensions: Vec<String> = extensions
            .into_iter()
            .map(|ext| ext.as_ref().trim().trim_start_matches('.').to_string())
            .filter(|ext| !ext.is_empty())
            .collect();
        extensions.sort();
        extensions.dedup();
        SourceExtensions { extensions }
    }

    /// Parse a comma separated list such as `c,h,.cpp`.
    pub fn parse_list(list: &str) -> Self {
        SourceExtensions::new(list.split(','))
    }

    /// Check whether `path` carries one of the extensions.
    pub fn matches(&self, path: &Path) -> bool {
        path.extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| self.extensions.iter().any(|known| known == ext))
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.extensions.iter().map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.extensions.is_empty()
    }
}

impl Default for SourceExtensions {
    fn default() -> Self {
        SourceExtensions::new(DEFAULT_SOURCE_EXTENSIONS)
    }
}

// ============================================================================
// Walk Options and Statistics
// ============================================================================

/// Options controlling a tree walk.
#[derive(Debug, Clone, Default)]
pub struct WalkOptions {
    /// Extensions routed through the renamer.
    pub extensions: SourceExtensions,
    /// Compute everything but write nothing.
    pub dry_run: bool,
}

/// Counters accumulated over a walk.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WalkStats {
    /// Source files passed through the renamer.
    pub files_rewritten: usize,
    /// Rewritten files with at least one replacement.
    pub files_changed: usize,
    /// Files copied verbatim.
    pub files_copied: usize,
    /// Total replacements across all files.
    pub replacements: usize,
}

// ============================================================================
// Tree Walk
// ============================================================================

/// Mirror `src_dir` into `dst_dir`, rewriting source files with `renamer`.
pub fn process_tree(
    renamer: &Renamer<'_>,
    src_dir: &Path,
    dst_dir: &Path,
    options: &WalkOptions,
) -> PrefixResult<WalkStats> {
    if !src_dir.is_dir() {
        return Err(PrefixError::invalid_args(format!(
            "source directory not found: {}",
            src_dir.display()
        )));
    }
    if same_file(src_dir, dst_dir) {
        return Err(PrefixError::invalid_args(format!(
            "destination directory is the source directory: {}",
            dst_dir.display()
        )));
    }

    info!("Processing directory: {}", src_dir.display());
    info!("Output directory: {}", dst_dir.display());

    if !options.dry_run {
        fs::create_dir_all(dst_dir).map_err(|e| PrefixError::io(dst_dir, e))?;
    }
    let skip_root = nested_destination(src_dir, dst_dir);

    let mut stats = WalkStats::default();
    let walker = WalkDir::new(src_dir)
        .min_depth(1)
        .follow_links(false)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|entry| {
            skip_root
                .as_deref()
                .is_none_or(|skip| !same_location(entry.path(), skip))
        });

    for entry in walker {
        let entry = entry.map_err(|e| {
            let path = e.path().unwrap_or(src_dir).to_path_buf();
            PrefixError::io(&path, e.into())
        })?;
        let src_path = entry.path();
        if !src_path.is_file() {
            continue;
        }

        let rel_path = src_path.strip_prefix(src_dir).map_err(|_| {
            PrefixError::internal(format!("{} escaped the source tree", src_path.display()))
        })?;
        let dst_path = dst_dir.join(rel_path);

        if options.extensions.matches(src_path) {
            info!("Processing: {}", rel_path.display());
            let replacements = process_file(renamer, src_path, &dst_path, options.dry_run)?;
            stats.files_rewritten += 1;
            stats.replacements += replacements;
            if replacements > 0 {
                stats.files_changed += 1;
            }
        } else {
            debug!("Copying: {}", rel_path.display());
            if !options.dry_run {
                copy_file(src_path, &dst_path)?;
            }
            stats.files_copied += 1;
        }
    }

    Ok(stats)
}

/// Rewrite one source file into `dst_path`, returning the replacement count.
///
/// Invalid UTF-8 is replaced with U+FFFD before renaming.
pub fn process_file(
    renamer: &Renamer<'_>,
    src_path: &Path,
    dst_path: &Path,
    dry_run: bool,
) -> PrefixResult<usize> {
    debug!("Processing file: {}", src_path.display());

    let bytes = fs::read(src_path).map_err(|e| PrefixError::io(src_path, e))?;
    let content = String::from_utf8_lossy(&bytes);
    let rewrite = renamer.rewrite(&content);

    if dry_run {
        return Ok(rewrite.replacements);
    }

    ensure_parent(dst_path)?;
    fs::write(dst_path, rewrite.text.as_bytes()).map_err(|e| PrefixError::io(dst_path, e))?;
    debug!("Wrote modified content to: {}", dst_path.display());

    Ok(rewrite.replacements)
}

/// Copy a file verbatim, preserving permissions and access/modification times.
///
/// Copying a file onto itself is refused; it would truncate the source.
pub fn copy_file(src_path: &Path, dst_path: &Path) -> PrefixResult<()> {
    if same_file(src_path, dst_path) {
        return Err(PrefixError::invalid_args(format!(
            "{} and {} are the same file",
            src_path.display(),
            dst_path.display()
        )));
    }
    ensure_parent(dst_path)?;
    fs::copy(src_path, dst_path).map_err(|e| PrefixError::copy(src_path, dst_path, e))?;

    let metadata = fs::metadata(src_path).map_err(|e| PrefixError::io(src_path, e))?;
    let mut times = FileTimes::new();
    if let Ok(accessed) = metadata.accessed() {
        times = times.set_accessed(accessed);
    }
    if let Ok(modified) = metadata.modified() {
        times = times.set_modified(modified);
    }
    // Read-only copies cannot be opened for writing; the owner may still
    // set timestamps through a read handle on unix.
    File::options()
        .write(true)
        .open(dst_path)
        .or_else(|_| File::open(dst_path))
        .and_then(|file| file.set_times(times))
        .map_err(|e| PrefixError::io(dst_path, e))
}

fn ensure_parent(path: &Path) -> PrefixResult<()> {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => {
            fs::create_dir_all(parent).map_err(|e| PrefixError::io(parent, e))
        }
        _ => Ok(()),
    }
}

/// The destination directory, when it lies strictly inside the source tree.
fn nested_destination(src_dir: &Path, dst_dir: &Path) -> Option<PathBuf> {
    let src = src_dir.canonicalize().ok()?;
    let dst = dst_dir.canonicalize().ok()?;
    (dst != src && dst.starts_with(&src)).then_some(dst)
}

fn same_location(path: &Path, canonical: &Path) -> bool {
    path.canonicalize().is_ok_and(|p| p == canonical)
}

/// Both paths exist and resolve to the same filesystem entry.
fn same_file(a: &Path, b: &Path) -> bool {
    a.canonicalize()
        .is_ok_and(|a| b.canonicalize().is_ok_and(|b| a == b))
}

// ============================================================================
// Tests
// ============================================================================
