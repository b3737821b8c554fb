//! File collection and reading utilities.
//!
//! Handles walking directories with gitignore support, applying exclude
//! patterns, and reading file bytes with size limits.

use std::io::Read;
use std::path::{Path, PathBuf};

use anyhow::Context as _;
use ignore::WalkBuilder;
use ignore::overrides::OverrideBuilder;

/// Extensions that never contain scannable text.
const BINARY_EXTENSIONS: &[&str] = &[
    "png", "jpg", "jpeg", "gif", "bmp", "ico", "webp", "pdf", "zip", "gz", "tar", "bz2", "xz",
    "zst", "7z", "jar", "war", "class", "exe", "dll", "so", "dylib", "a", "o", "bin", "wasm",
    "woff", "woff2", "ttf", "otf", "eot", "mp3", "mp4", "avi", "mov", "mkv", "webm", "sqlite",
    "db",
];

fn has_binary_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| {
            let lowered = ext.to_lowercase();
            BINARY_EXTENSIONS.contains(&lowered.as_str())
        })
}

/// Walks the given paths, collecting scannable files while honouring
/// exclude globs, gitignore rules, and binary-extension filtering.
///
/// The result is sorted so output ordering is stable across runs.
pub fn collect_files(
    paths: &[PathBuf],
    excludes: &[String],
    respect_gitignore: bool,
) -> anyhow::Result<Vec<PathBuf>> {
    let mut files = Vec::new();

    for path in paths {
        if path.is_file() {
            if !has_binary_extension(path) {
                files.push(path.clone());
            }
            continue;
        }

        let overrides = build_overrides(path, excludes)?;
        let walker = build_walker(path, overrides, respect_gitignore);

        let (tx, rx) = std::sync::mpsc::channel();
        walker.run(|| {
            let tx = tx.clone();
            Box::new(move |result| {
                if let Ok(entry) = result
                    && is_scannable_file(&entry)
                {
                    let _ = tx.send(entry.into_path());
                }
                ignore::WalkState::Continue
            })
        });
        drop(tx);
        files.extend(rx);
    }

    files.sort();
    Ok(files)
}

fn is_scannable_file(entry: &ignore::DirEntry) -> bool {
    entry.file_type().is_some_and(|ft| ft.is_file()) && !has_binary_extension(entry.path())
}

/// Files at or above this size are memory-mapped instead of heap-read.
const MMAP_THRESHOLD: u64 = 32 * 1024;

/// Reads a file's bytes, returning `None` if it exceeds `max_size` or cannot
/// be opened. Decode errors are left to the scan engine so they show up as
/// per-unit errors rather than silent skips.
///
/// Small files (< 32 KB) are read with a single `read` syscall. Large files
/// are memory-mapped so the OS page cache is used directly.
#[must_use]
pub fn read_file_bytes(path: &Path, max_size: Option<u64>) -> Option<Vec<u8>> {
    let mut file = std::fs::File::open(path).ok()?;
    let len = file.metadata().ok()?.len();

    if let Some(max) = max_size
        && len > max
    {
        return None;
    }

    if len >= MMAP_THRESHOLD {
        read_large_file_mmap(&file)
    } else {
        read_small_file(&mut file, len)
    }
}

#[expect(
    clippy::cast_possible_truncation,
    reason = "files above max_size are already rejected; remaining sizes fit in usize"
)]
fn read_small_file(file: &mut std::fs::File, len: u64) -> Option<Vec<u8>> {
    let mut bytes = Vec::with_capacity(len as usize);
    file.read_to_end(&mut bytes).ok()?;
    Some(bytes)
}

fn read_large_file_mmap(file: &std::fs::File) -> Option<Vec<u8>> {
    // SAFETY: The map is read-only and dropped before this function returns.
    // Concurrent file truncation could cause SIGBUS, but this is the same
    // risk `git` and `ripgrep` accept for mmap-based file reading.
    #[expect(unsafe_code, reason = "mmap requires unsafe; lifetime is scoped to this function")]
    let mmap = unsafe { memmap2::Mmap::map(file) }.ok()?;
    Some(mmap.to_vec())
}

fn build_overrides(path: &Path, excludes: &[String]) -> anyhow::Result<ignore::overrides::Override> {
    let mut builder = OverrideBuilder::new(path);

    for pattern in excludes {
        builder
            .add(&format!("!{pattern}"))
            .with_context(|| format!("invalid exclude pattern '{pattern}'"))?;
    }

    builder.build().context("building exclude overrides")
}

fn build_walker(
    path: &Path,
    overrides: ignore::overrides::Override,
    respect_gitignore: bool,
) -> ignore::WalkParallel {
    WalkBuilder::new(path)
        .hidden(false)
        .git_ignore(respect_gitignore)
        .git_global(respect_gitignore)
        .git_exclude(respect_gitignore)
        .overrides(overrides)
        .build_parallel()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn binary_extensions_are_rejected_case_insensitively() {
        assert!(has_binary_extension(Path::new("logo.PNG")));
        assert!(has_binary_extension(Path::new("archive.tar")));
        assert!(!has_binary_extension(Path::new("main.rs")));
        assert!(!has_binary_extension(Path::new("Makefile")));
    }

    #[test]
    fn oversized_files_are_skipped() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("big.txt");
        std::fs::write(&path, vec![b'a'; 100]).unwrap();

        assert!(read_file_bytes(&path, Some(50)).is_none());
        assert_eq!(read_file_bytes(&path, Some(200)).unwrap().len(), 100);
        assert_eq!(read_file_bytes(&path, None).unwrap().len(), 100);
    }

    #[test]
    fn missing_file_reads_as_none() {
        assert!(read_file_bytes(Path::new("/nonexistent/nope.txt"), None).is_none());
    }

    #[test]
    fn collect_respects_exclude_globs() {
        let dir = tempfile::TempDir::new().unwrap();
        std::fs::write(dir.path().join("keep.rs"), "fn main() {}").unwrap();
        std::fs::write(dir.path().join("skip.log"), "noise").unwrap();

        let files = collect_files(
            &[dir.path().to_path_buf()],
            &["*.log".to_string()],
            true,
        )
        .unwrap();

        assert_eq!(files.len(), 1);
        assert!(files[0].ends_with("keep.rs"));
    }
}
