//! Artefact domain model and the stages that operate on it.
//!
//! # Sub-modules
//!
//! - [`record`] - The validated artefact record (`Artefact`, `ArtefactId`, `UpdatedAt`).
//! - [`listing`] - Paginated listing trait and the lazy page iterator.
//! - [`filter`] - Expiry and name filtering.
//! - [`selection`] - Latest-by-timestamp selection passes.
//! - [`destination`] - Destination directory derivation.
//! - [`download`] - Download URL resolution and archive fetch trait.
//! - [`github`] - `ureq`-backed client for the GitHub Actions artifacts API.
//! - [`extraction`] - Zip archive inspection and extraction.

pub mod destination;
pub mod download;
pub mod extraction;
pub mod filter;
pub mod github;
pub mod listing;
pub mod record;
pub mod selection;
