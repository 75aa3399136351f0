//! Orchestration of a fetch run.
//!
//! The flow lists every artefact, filters and selects them, then for each
//! selected artefact resolves its download URL, fetches the archive, creates
//! the destination directory, logs the archive entries and extracts them.
//! Artefacts are processed strictly one after another and the first error
//! ends the run.

use camino::{Utf8Path, Utf8PathBuf};
use log::{debug, info};
use std::io::Write;
use std::path::PathBuf;

use crate::artefact::destination::destination_dir;
use crate::artefact::download::{ArchiveFormat, ArtefactDownloader};
use crate::artefact::extraction::{ArtefactExtractor, ZipExtractor};
use crate::artefact::filter::filter_artefacts;
use crate::artefact::github::GithubClient;
use crate::artefact::listing::{ArtefactLister, ArtefactPages};
use crate::artefact::record::Artefact;
use crate::artefact::selection::select_artefacts;
use crate::config::FetchConfig;
use crate::error::{FetchError, Result};
use crate::output::{StepOutputs, write_progress_line};

/// Progress line written when the selection is empty.
pub const NOTHING_FOUND_MESSAGE: &str = "No artifacts found";

/// One artefact that was downloaded and extracted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchedArtefact {
    /// The selected artefact.
    pub artefact: Artefact,
    /// Directory the archive was extracted into.
    pub destination: Utf8PathBuf,
    /// Number of archive entries written.
    pub entries: usize,
}

/// The result of a completed run.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FetchOutcome {
    /// Artefacts fetched, in selection order.
    pub fetched: Vec<FetchedArtefact>,
    /// Absolute configured destination; `None` when nothing was selected.
    pub resolved_path: Option<Utf8PathBuf>,
}

impl FetchOutcome {
    /// Whether at least one artefact was selected.
    #[must_use]
    pub fn found(&self) -> bool {
        !self.fetched.is_empty()
    }

    /// The step outputs for this outcome.
    ///
    /// # Examples
    ///
    /// ```
    /// use artefact_fetcher::fetch_flow::FetchOutcome;
    ///
    /// let outputs = FetchOutcome::default().step_outputs();
    /// assert!(!outputs.found_artifact);
    /// assert_eq!(outputs.path, "");
    /// ```
    #[must_use]
    pub fn step_outputs(&self) -> StepOutputs {
        match &self.resolved_path {
            Some(path) if self.found() => StepOutputs::found(path.as_str()),
            _ => StepOutputs::not_found(),
        }
    }
}

/// Run a fetch against the GitHub API rooted at `api_url`, extracting with
/// the zip extractor.
///
/// # Errors
///
/// Returns the first listing, download, extraction, or filesystem error.
pub fn run_fetch(
    config: &FetchConfig,
    api_url: &str,
    progress: &mut dyn Write,
) -> Result<FetchOutcome> {
    let client = GithubClient::new(api_url, config.token().clone());
    run_fetch_with(config, &client, &client, &ZipExtractor, progress)
}

/// Testable inner function with injected collaborators.
///
/// The production entry point [`run_fetch`] delegates here with the GitHub
/// client and zip extractor; tests inject mocks and stubs.
///
/// # Errors
///
/// Returns the first listing, download, extraction, or filesystem error.
/// Artefacts after a failing one are not processed.
pub fn run_fetch_with(
    config: &FetchConfig,
    lister: &dyn ArtefactLister,
    downloader: &dyn ArtefactDownloader,
    extractor: &dyn ArtefactExtractor,
    progress: &mut dyn Write,
) -> Result<FetchOutcome> {
    let listed = ArtefactPages::new(lister, config.repo()).collect_all()?;
    debug!("listed {} artefact(s) for {}", listed.len(), config.repo());

    let filtered = filter_artefacts(listed, config.name_filter());
    let selected = select_artefacts(filtered, config.latest_only());
    if selected.is_empty() {
        write_progress_line(progress, NOTHING_FOUND_MESSAGE);
        return Ok(FetchOutcome::default());
    }
    info!("selected {} artefact(s)", selected.len());

    let mut fetched = Vec::with_capacity(selected.len());
    for artefact in selected {
        fetched.push(fetch_one(config, artefact, downloader, extractor, progress)?);
    }

    Ok(FetchOutcome {
        fetched,
        resolved_path: Some(resolve_absolute(config.destination())?),
    })
}

/// Download and extract a single artefact.
fn fetch_one(
    config: &FetchConfig,
    artefact: Artefact,
    downloader: &dyn ArtefactDownloader,
    extractor: &dyn ArtefactExtractor,
    progress: &mut dyn Write,
) -> Result<FetchedArtefact> {
    write_progress_line(progress, format!("Downloading {artefact}"));
    let destination = destination_dir(config.destination(), config.name_filter(), &artefact)?;
    let url = downloader.resolve_download_url(config.repo(), artefact.id(), ArchiveFormat::Zip)?;
    let archive = downloader.fetch_archive(&url)?;
    debug!("{}: fetched {} byte(s)", artefact.name(), archive.len());

    std::fs::create_dir_all(destination.as_std_path()).map_err(|source| {
        FetchError::CreateDestination {
            path: destination.clone(),
            source,
        }
    })?;

    let entries = extractor.list_entries(&archive)?;
    for entry in &entries {
        write_progress_line(progress, entry.progress_line(destination.as_std_path()));
    }
    let written = extractor.extract(&archive, destination.as_std_path())?;
    write_progress_line(
        progress,
        format!("Extracted {} into {destination}", artefact.name()),
    );

    Ok(FetchedArtefact {
        artefact,
        destination,
        entries: written.len(),
    })
}

/// Make `path` absolute against the working directory and drop `.`
/// components.
fn resolve_absolute(path: &Utf8Path) -> Result<Utf8PathBuf> {
    let absolute = std::path::absolute(path.as_std_path()).map_err(|e| FetchError::ResolvePath {
        path: path.to_owned(),
        reason: e.to_string(),
    })?;
    let normalised: PathBuf = absolute.components().collect();
    Utf8PathBuf::try_from(normalised).map_err(|e| FetchError::ResolvePath {
        path: path.to_owned(),
        reason: format!("path is not valid UTF-8: {e}"),
    })
}

#[cfg(test)]
#[path = "fetch_flow_tests.rs"]
mod tests;
