//! Gzip-compressed tar containers

use crate::archiver::Archiver;
use crate::error::{Error, Result};
use flate2::Compression;
use flate2::read::GzDecoder;
use flate2::write::GzEncoder;
use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::{Component, Path};
use walkdir::WalkDir;

/// [`Archiver`] producing `.tar.gz` streams.
///
/// Archives are written deterministically: entries are sorted by name and
/// carry no ownership or timestamps, so packing the same tree twice yields
/// identical bytes. The owner-exec bit survives a round trip.
#[derive(Debug, Clone, Copy)]
pub struct TarGzArchiver {
    compression: Compression,
}

impl TarGzArchiver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Use a specific gzip level (0-9).
    pub fn with_level(level: u32) -> Self {
        Self {
            compression: Compression::new(level.min(9)),
        }
    }
}

impl Default for TarGzArchiver {
    fn default() -> Self {
        Self {
            compression: Compression::default(),
        }
    }
}

impl Archiver for TarGzArchiver {
    fn name(&self) -> &'static str {
        "tar.gz"
    }

    fn extract(&self, archive: &Path, dest: &Path) -> Result<()> {
        if !archive.is_file() {
            return Err(Error::ArchiveNotFound {
                path: archive.to_path_buf(),
            });
        }
        runpkg_fs::io::ensure_dir(dest)?;

        let file = File::open(archive).map_err(|e| Error::io(archive, e))?;
        let mut tar = tar::Archive::new(GzDecoder::new(BufReader::new(file)));
        tar.set_preserve_permissions(true);
        tar.set_overwrite(true);

        let corrupt = |e: std::io::Error| Error::Corrupt {
            path: archive.to_path_buf(),
            message: e.to_string(),
        };

        let mut count = 0usize;
        for entry in tar.entries().map_err(corrupt)? {
            let mut entry = entry.map_err(corrupt)?;
            let path = entry.path().map_err(corrupt)?.into_owned();
            check_entry(&path, entry.header().entry_type())?;

            let unpacked = entry
                .unpack_in(dest)
                .map_err(|e| Error::io(dest.join(&path), e))?;
            if !unpacked {
                return Err(Error::UnsafeEntry {
                    entry: path.display().to_string(),
                    reason: "resolves outside the destination".to_string(),
                });
            }
            count += 1;
        }

        tracing::debug!(
            archive = %archive.display(),
            dest = %dest.display(),
            entries = count,
            "Extracted archive"
        );
        Ok(())
    }

    fn create(&self, source_dir: &Path, archive: &Path) -> Result<()> {
        if !source_dir.is_dir() {
            return Err(Error::SourceNotDirectory {
                path: source_dir.to_path_buf(),
            });
        }

        let parent = archive
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .unwrap_or_else(|| Path::new("."));
        runpkg_fs::io::ensure_dir(parent)?;

        // Stage next to the destination so the final rename stays on one filesystem.
        let staged = tempfile::NamedTempFile::new_in(parent).map_err(|e| Error::io(parent, e))?;
        let encoder = GzEncoder::new(BufWriter::new(staged.as_file()), self.compression);
        let mut builder = tar::Builder::new(encoder);
        builder.mode(tar::HeaderMode::Deterministic);
        builder.follow_symlinks(false);

        let mut count = 0usize;
        for entry in WalkDir::new(source_dir).min_depth(1).sort_by_file_name() {
            let entry = entry.map_err(|e| {
                let path = e.path().unwrap_or(source_dir).to_path_buf();
                Error::io(path, e.into())
            })?;
            let path = entry.path();
            let relative = path
                .strip_prefix(source_dir)
                .map_err(|e| Error::io(path, std::io::Error::other(e)))?;

            let file_type = entry.file_type();
            if file_type.is_dir() {
                builder
                    .append_dir(relative, path)
                    .map_err(|e| Error::io(path, e))?;
            } else if file_type.is_file() {
                builder
                    .append_path_with_name(path, relative)
                    .map_err(|e| Error::io(path, e))?;
            } else {
                tracing::warn!(path = %path.display(), "Skipping entry that is not a file or directory");
                continue;
            }
            count += 1;
        }

        let encoder = builder.into_inner().map_err(|e| Error::io(archive, e))?;
        let mut writer = encoder.finish().map_err(|e| Error::io(archive, e))?;
        writer.flush().map_err(|e| Error::io(archive, e))?;
        drop(writer);

        staged
            .persist(archive)
            .map_err(|e| Error::io(archive, e.error))?;

        tracing::debug!(
            source = %source_dir.display(),
            archive = %archive.display(),
            entries = count,
            "Created archive"
        );
        Ok(())
    }
}

fn check_entry(path: &Path, entry_type: tar::EntryType) -> Result<()> {
    let unsafe_entry = |reason: &str| Error::UnsafeEntry {
        entry: path.display().to_string(),
        reason: reason.to_string(),
    };

    if entry_type.is_symlink() || entry_type.is_hard_link() {
        return Err(unsafe_entry("links are not allowed"));
    }

    for component in path.components() {
        match component {
            Component::Normal(_) | Component::CurDir => {}
            Component::ParentDir => return Err(unsafe_entry("contains a parent directory reference")),
            Component::RootDir | Component::Prefix(_) => return Err(unsafe_entry("is an absolute path")),
        }
    }
    Ok(())
}
