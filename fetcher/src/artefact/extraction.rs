//! Zip archive inspection and extraction for downloaded artefacts.
//!
//! Archives are held in memory. Entry paths are checked before anything is
//! written so that no entry can escape the destination directory
//! (zip-slip), and existing files are overwritten.

use std::fmt;
use std::io::Cursor;
use std::path::{Path, PathBuf};

use zip::ZipArchive;

/// Whether an archive entry is a directory or a file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    /// A directory entry (name ends with `/`).
    Directory,
    /// A regular file entry.
    File,
}

impl EntryKind {
    /// Progress verb logged for this kind of entry.
    #[must_use]
    pub const fn verb(self) -> &'static str {
        match self {
            Self::Directory => "creating",
            Self::File => "inflating",
        }
    }
}

/// An archive entry with its validated relative path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArchiveEntry {
    /// Entry path relative to the extraction root.
    pub path: PathBuf,
    /// Directory or file.
    pub kind: EntryKind,
}

impl ArchiveEntry {
    /// Path the entry is written to under `dest_dir`.
    #[must_use]
    pub fn destination(&self, dest_dir: &Path) -> PathBuf {
        dest_dir.join(&self.path)
    }

    /// The progress line for this entry when extracted under `dest_dir`.
    ///
    /// # Examples
    ///
    /// ```
    /// use artefact_fetcher::artefact::extraction::{ArchiveEntry, EntryKind};
    /// use std::path::{Path, PathBuf};
    ///
    /// let entry = ArchiveEntry { path: PathBuf::from("bin/tool"), kind: EntryKind::File };
    /// assert_eq!(
    ///     entry.progress_line(Path::new("out")),
    ///     format!("  inflating: {}", Path::new("out").join("bin/tool").display())
    /// );
    /// ```
    #[must_use]
    pub fn progress_line(&self, dest_dir: &Path) -> String {
        format!(
            "  {}: {}",
            self.kind.verb(),
            self.destination(dest_dir).display()
        )
    }
}

impl fmt::Display for ArchiveEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.kind.verb(), self.path.display())
    }
}

/// Trait for inspecting and extracting artefact archives, enabling test
/// mocking.
///
/// # Examples
///
/// ```
/// use artefact_fetcher::artefact::extraction::ZipExtractor;
///
/// let extractor = ZipExtractor;
/// // Use extractor.list_entries(&bytes) and extractor.extract(&bytes, dest) in production
/// ```
#[cfg_attr(test, mockall::automock)]
pub trait ArtefactExtractor {
    /// List the entries of the in-memory `archive` without writing anything.
    ///
    /// # Errors
    ///
    /// Returns [`ExtractionError::Zip`] if the archive is malformed and
    /// [`ExtractionError::PathTraversal`] if an entry escapes the root.
    fn list_entries(&self, archive: &[u8]) -> Result<Vec<ArchiveEntry>, ExtractionError>;

    /// Extract every entry of `archive` into `dest_dir`, overwriting existing
    /// files.
    ///
    /// Returns the paths that were written.
    ///
    /// # Errors
    ///
    /// Returns [`ExtractionError::Zip`] if the archive is malformed,
    /// [`ExtractionError::PathTraversal`] if an entry escapes `dest_dir`, and
    /// [`ExtractionError::Io`] on write failures.
    fn extract(&self, archive: &[u8], dest_dir: &Path) -> Result<Vec<PathBuf>, ExtractionError>;
}

/// Errors arising from archive extraction.
#[derive(Debug, thiserror::Error)]
pub enum ExtractionError {
    /// I/O error during extraction.
    #[error("extraction I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The archive could not be read as zip.
    #[error("invalid zip archive: {0}")]
    Zip(#[from] zip::result::ZipError),

    /// A path in the archive attempts to traverse outside the destination.
    #[error("path traversal detected: {path}")]
    PathTraversal {
        /// The offending path from the archive entry.
        path: String,
    },
}

/// Default extractor backed by the `zip` crate.
pub struct ZipExtractor;

impl ArtefactExtractor for ZipExtractor {
    fn list_entries(&self, archive: &[u8]) -> Result<Vec<ArchiveEntry>, ExtractionError> {
        let mut zip = ZipArchive::new(Cursor::new(archive))?;
        let mut entries = Vec::with_capacity(zip.len());
        for index in 0..zip.len() {
            let entry = zip.by_index(index)?;
            entries.push(ArchiveEntry {
                path: enclosed_path(entry.name(), entry.enclosed_name())?,
                kind: if entry.is_dir() {
                    EntryKind::Directory
                } else {
                    EntryKind::File
                },
            });
        }
        Ok(entries)
    }

    fn extract(&self, archive: &[u8], dest_dir: &Path) -> Result<Vec<PathBuf>, ExtractionError> {
        let mut zip = ZipArchive::new(Cursor::new(archive))?;
        let mut written = Vec::with_capacity(zip.len());
        for index in 0..zip.len() {
            let mut entry = zip.by_index(index)?;
            let out_path = dest_dir.join(enclosed_path(entry.name(), entry.enclosed_name())?);

            if entry.is_dir() {
                std::fs::create_dir_all(&out_path)?;
            } else {
                if let Some(parent) = out_path.parent() {
                    std::fs::create_dir_all(parent)?;
                }
                let mut out_file = create_overwriting(&out_path)?;
                std::io::copy(&mut entry, &mut out_file)?;
                restore_permissions(&out_path, entry.unix_mode())?;
            }

            written.push(out_path);
        }
        Ok(written)
    }
}

/// Create or truncate `path`, replacing an existing file that is read-only.
fn create_overwriting(path: &Path) -> std::io::Result<std::fs::File> {
    match std::fs::File::create(path) {
        Err(err) if err.kind() == std::io::ErrorKind::PermissionDenied && path.is_file() => {
            std::fs::remove_file(path)?;
            std::fs::File::create(path)
        }
        result => result,
    }
}

/// Return the entry's path if it stays inside the extraction root.
fn enclosed_path<P: AsRef<Path>>(
    name: &str,
    enclosed: Option<P>,
) -> Result<PathBuf, ExtractionError> {
    enclosed
        .map(|path| path.as_ref().to_path_buf())
        .ok_or_else(|| ExtractionError::PathTraversal {
            path: name.to_owned(),
        })
}

#[cfg(unix)]
fn restore_permissions(path: &Path, mode: Option<u32>) -> std::io::Result<()> {
    use std::os::unix::fs::PermissionsExt;

    match mode.map(|mode| mode & 0o7777) {
        Some(bits) if bits != 0 => {
            std::fs::set_permissions(path, std::fs::Permissions::from_mode(bits))
        }
        _ => Ok(()),
    }
}

#[cfg(not(unix))]
fn restore_permissions(_path: &Path, _mode: Option<u32>) -> std::io::Result<()> {
    Ok(())
}
