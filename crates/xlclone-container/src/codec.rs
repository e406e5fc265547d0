//! Zip package codec
//!
//! A workbook package is treated as an ordered list of named parts. Parts
//! are opaque bytes; the codec checks nothing about them beyond what the
//! zip structure itself requires.

use std::fs::File;
use std::io::{Read, Write};
use std::path::Path;

use tracing::debug;
use walkdir::WalkDir;

use crate::error::{ContainerError, ContainerResult};

/// The package part whose presence marks a plausible workbook package.
pub const CONTENT_TYPES_PART: &str = "[Content_Types].xml";

/// An unpacked package: part names with their bytes, archive order
/// preserved.
pub type Parts = Vec<(String, Vec<u8>)>;

/// Unpack a zip package into its parts, archive order preserved.
///
/// Directory entries are dropped; only file parts carry bytes. Any failure
/// to open or read the package is an [`ContainerError::InvalidContainer`]:
/// callers probing a candidate file get one error class to match on.
pub fn unpack(path: &Path) -> ContainerResult<Parts> {
    let invalid = |reason: String| ContainerError::InvalidContainer {
        path: path.to_path_buf(),
        reason,
    };

    let file = File::open(path).map_err(|e| invalid(e.to_string()))?;
    let mut archive = zip::ZipArchive::new(file).map_err(|e| invalid(e.to_string()))?;

    let mut parts = Vec::with_capacity(archive.len());
    for index in 0..archive.len() {
        let mut entry = archive.by_index(index).map_err(|e| invalid(e.to_string()))?;
        if entry.is_dir() {
            continue;
        }
        let name = entry.name().to_string();
        let mut bytes = Vec::with_capacity(entry.size() as usize);
        entry
            .read_to_end(&mut bytes)
            .map_err(|e| invalid(format!("part {name}: {e}")))?;
        parts.push((name, bytes));
    }

    debug!(path = %path.display(), parts = parts.len(), "unpacked package");
    Ok(parts)
}

/// Pack parts into a zip package at `dest`, in the order given.
///
/// An existing file at `dest` is overwritten. Repacking the output of
/// [`unpack`] reproduces every part byte for byte.
pub fn pack_parts(dest: &Path, parts: &[(String, Vec<u8>)]) -> ContainerResult<()> {
    let pack_write = |reason: String| ContainerError::PackWrite {
        path: dest.to_path_buf(),
        reason,
    };

    let file = File::create(dest).map_err(|e| pack_write(e.to_string()))?;
    let mut zip = zip::ZipWriter::new(file);
    let options = zip::write::SimpleFileOptions::default();

    for (name, bytes) in parts {
        zip.start_file(name.as_str(), options)
            .map_err(|e| pack_write(format!("part {name}: {e}")))?;
        zip.write_all(bytes)
            .map_err(|e| pack_write(format!("part {name}: {e}")))?;
    }
    zip.finish().map_err(|e| pack_write(e.to_string()))?;

    debug!(dest = %dest.display(), parts = parts.len(), "packed package");
    Ok(())
}

/// Pack a directory tree into a zip package at `dest`.
///
/// Part names are the paths relative to `root`, always `/`-separated.
/// Traversal is depth-first with names sorted per directory, so the same
/// tree always packs to the same part order.
pub fn pack_tree(dest: &Path, root: &Path) -> ContainerResult<()> {
    let pack_write = |reason: String| ContainerError::PackWrite {
        path: dest.to_path_buf(),
        reason,
    };

    let file = File::create(dest).map_err(|e| pack_write(e.to_string()))?;
    let mut zip = zip::ZipWriter::new(file);
    let options = zip::write::SimpleFileOptions::default();

    let mut count = 0usize;
    for entry in WalkDir::new(root).sort_by_file_name() {
        let entry = entry.map_err(|e| pack_write(e.to_string()))?;
        if !entry.file_type().is_file() {
            continue;
        }
        let name = match entry.path().strip_prefix(root) {
            Ok(rel) => zip_entry_name(rel),
            Err(e) => return Err(pack_write(e.to_string())),
        };
        let bytes = std::fs::read(entry.path()).map_err(|e| pack_write(format!("{name}: {e}")))?;
        zip.start_file(name.as_str(), options)
            .map_err(|e| pack_write(format!("part {name}: {e}")))?;
        zip.write_all(&bytes)
            .map_err(|e| pack_write(format!("part {name}: {e}")))?;
        count += 1;
    }
    zip.finish().map_err(|e| pack_write(e.to_string()))?;

    debug!(dest = %dest.display(), parts = count, "packed tree");
    Ok(())
}

/// Relative path to a zip entry name, `/`-separated on every platform.
fn zip_entry_name(rel: &Path) -> String {
    let mut name = String::new();
    for component in rel.components() {
        if !name.is_empty() {
            name.push('/');
        }
        name.push_str(&component.as_os_str().to_string_lossy());
    }
    name
}
