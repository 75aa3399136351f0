//! Artefact fetcher library.
//!
//! This crate lists the artefacts stored for a GitHub repository, narrows
//! them down to the newest artefact per name, downloads each selected zip
//! archive and extracts it into a destination directory. It is used by the
//! `artefact-fetcher` binary, which runs as a GitHub Actions step, and can be
//! driven programmatically with injected collaborators for testing.
//!
//! # Modules
//!
//! - [`artefact`] - Artefact records, listing, selection, download, and extraction
//! - [`cli`] - Command-line argument definitions
//! - [`config`] - Validated, immutable run configuration
//! - [`error`] - Top-level error type for a fetch run
//! - [`fetch_flow`] - Orchestration of the list, select, fetch, extract pipeline
//! - [`logging`] - `log` backend that emits workflow commands
//! - [`output`] - Step outputs and progress line helpers

pub mod artefact;
pub mod cli;
pub mod config;
pub mod error;
pub mod fetch_flow;
pub mod logging;
pub mod output;

#[cfg(any(test, feature = "test-support"))]
pub mod test_utils;
