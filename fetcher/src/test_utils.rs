//! Shared test utilities for the fetcher crate.
//!
//! Builders for listing JSON and in-memory zip archives, plus a canned
//! lister and downloader for driving the fetch flow without a network.

use crate::artefact::download::{ArchiveFormat, ArtefactDownloader, DownloadError};
use crate::artefact::listing::{ArtefactLister, ArtefactPage};
use crate::artefact::record::{Artefact, ArtefactId};
use crate::config::RepoIdentity;
use serde_json::{Value, json};
use std::cell::RefCell;
use std::collections::HashMap;
use std::io::{Cursor, Write};
use zip::ZipWriter;
use zip::write::SimpleFileOptions;

/// An entry to place in a test archive.
#[derive(Debug, Clone)]
pub struct ZipEntry {
    name: String,
    contents: Option<Vec<u8>>,
    mode: Option<u32>,
}

impl ZipEntry {
    /// A directory entry; `name` should end with `/`.
    pub fn dir(name: &str) -> Self {
        Self {
            name: name.to_owned(),
            contents: None,
            mode: None,
        }
    }

    /// A file entry with the given contents.
    pub fn file(name: &str, contents: &[u8]) -> Self {
        Self {
            name: name.to_owned(),
            contents: Some(contents.to_vec()),
            mode: None,
        }
    }

    /// Record `mode` as the entry's Unix permissions instead of the default.
    #[must_use]
    pub fn with_mode(mut self, mode: u32) -> Self {
        self.mode = Some(mode);
        self
    }
}

/// Build a zip archive in memory from `entries`, in order.
///
/// # Panics
///
/// Panics if the zip writer rejects an entry.
pub fn zip_archive(entries: &[ZipEntry]) -> Vec<u8> {
    let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
    for entry in entries {
        match &entry.contents {
            None => {
                let options =
                    SimpleFileOptions::default().unix_permissions(entry.mode.unwrap_or(0o755));
                writer
                    .add_directory(entry.name.as_str(), options)
                    .expect("add directory entry");
            }
            Some(contents) => {
                let options =
                    SimpleFileOptions::default().unix_permissions(entry.mode.unwrap_or(0o644));
                writer
                    .start_file(entry.name.as_str(), options)
                    .expect("start file entry");
                writer.write_all(contents).expect("write file entry");
            }
        }
    }
    writer.finish().expect("finish zip archive").into_inner()
}

/// JSON for one listing record.
pub fn artefact_json(id: u64, name: &str, updated_at: Option<&str>, expired: bool) -> Value {
    json!({
        "id": id,
        "node_id": format!("MDg6QXJ0aWZhY3Q{id}"),
        "name": name,
        "size_in_bytes": 1024,
        "url": format!("https://api.github.com/repos/octo/hello/actions/artifacts/{id}"),
        "archive_download_url":
            format!("https://api.github.com/repos/octo/hello/actions/artifacts/{id}/zip"),
        "expired": expired,
        "created_at": updated_at,
        "updated_at": updated_at,
    })
}

/// JSON body for one listing page.
pub fn listing_json(total_count: u64, artefacts: &[Value]) -> String {
    json!({
        "total_count": total_count,
        "artifacts": artefacts,
    })
    .to_string()
}

/// A lister that serves a fixed sequence of pages.
///
/// Page `n` (1-based) of the listing is `pages[n - 1]`; requests past the end
/// return an empty final page.
#[derive(Debug, Default)]
pub struct StubLister {
    pages: Vec<Vec<Artefact>>,
    calls: RefCell<Vec<u32>>,
}

impl StubLister {
    /// Serve `pages` in order.
    pub fn new(pages: Vec<Vec<Artefact>>) -> Self {
        Self {
            pages,
            calls: RefCell::new(Vec::new()),
        }
    }

    /// Page numbers requested so far.
    pub fn requested_pages(&self) -> Vec<u32> {
        self.calls.borrow().clone()
    }
}

impl ArtefactLister for StubLister {
    fn list_page(&self, _repo: &RepoIdentity, page: u32) -> Result<ArtefactPage, DownloadError> {
        self.calls.borrow_mut().push(page);
        let index = usize::try_from(page.saturating_sub(1)).unwrap_or(usize::MAX);
        let artefacts = self.pages.get(index).cloned().unwrap_or_default();
        let has_next = index.saturating_add(1) < self.pages.len();
        Ok(ArtefactPage {
            artefacts,
            has_next,
        })
    }
}

/// A downloader that serves canned archives keyed by artefact identifier.
///
/// Resolved URLs have the form `stub://<id>`; unknown identifiers resolve to
/// [`DownloadError::NotFound`].
#[derive(Debug, Default)]
pub struct StubDownloader {
    archives: HashMap<String, Vec<u8>>,
    fetched: RefCell<Vec<String>>,
}

impl StubDownloader {
    /// Register `archive` as the content of artefact `id`.
    #[must_use]
    pub fn with_archive(mut self, id: impl Into<ArtefactId>, archive: Vec<u8>) -> Self {
        self.archives.insert(id.into().as_str().to_owned(), archive);
        self
    }

    /// Identifiers whose archives were fetched, in order.
    pub fn fetched_ids(&self) -> Vec<String> {
        self.fetched.borrow().clone()
    }
}

impl ArtefactDownloader for StubDownloader {
    fn resolve_download_url(
        &self,
        _repo: &RepoIdentity,
        id: &ArtefactId,
        _format: ArchiveFormat,
    ) -> Result<String, DownloadError> {
        if self.archives.contains_key(id.as_str()) {
            Ok(format!("stub://{id}"))
        } else {
            Err(DownloadError::NotFound {
                url: format!("stub://{id}"),
            })
        }
    }

    fn fetch_archive(&self, url: &str) -> Result<Vec<u8>, DownloadError> {
        let id = url.trim_start_matches("stub://");
        self.fetched.borrow_mut().push(id.to_owned());
        self.archives
            .get(id)
            .cloned()
            .ok_or_else(|| DownloadError::NotFound {
                url: url.to_owned(),
            })
    }
}
