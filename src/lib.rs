//! # docref
//!
//! Keeps cross-document links in a Markdown documentation tree pointing at canonical paths, and
//! generates the toc page a Sphinx build needs to reach every document.
//!
//! ## Overview
//!
//! A run is three phases over one source tree:
//!
//! 1. **[`catalog`]**: walk the tree and map every document basename to its canonical url (its
//!    path below the source root, extension stripped). Basenames must be unique across the
//!    whole tree; a repeat is a [`DocrefError::DuplicateDocumentName`].
//! 2. **[`relink`]**: rewrite inline `[text](target)` links and `[text]: target` reference
//!    definitions whose target names a cataloged document, keeping any `#anchor`. Files are only
//!    written when their content changes.
//! 3. **[`toc`]**: write the toc page listing every cataloged url, followed by a hidden
//!    `toctree` that includes the toc page itself.
//!
//! Authors can therefore link to `[setup](setup.md)` from anywhere and move documents between
//! folders freely; the next run fixes the paths.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use docref::{config::DocrefConfig, pipeline::run, relink::RelinkMode};
//!
//! fn main() -> Result<(), docref::DocrefError> {
//!     let config = DocrefConfig::discover("./docs")?;
//!     let summary = run(&config, RelinkMode::Write)?;
//!     println!("Relinked {} documents", summary.modified.len());
//!     Ok(())
//! }
//! ```
//!
//! Link resolution is a pure function of the catalog, usable without touching the filesystem:
//!
//! ```rust
//! use docref::{catalog::Catalog, relink::resolve_target};
//!
//! let catalog: Catalog = [("foo".to_string(), "a/b/foo".to_string())]
//!     .into_iter()
//!     .collect();
//! assert_eq!(resolve_target(&catalog, "../foo.md#sec1"), "a/b/foo#sec1");
//! assert_eq!(resolve_target(&catalog, "https://example.com/foo"), "https://example.com/foo");
//! ```
//!
//! ## Features
//!
//! - **default**: the library
//! - **bin**: the `docref` command-line tool

pub mod catalog;
pub mod config;
pub mod error;
pub mod paths;
pub mod pipeline;
pub mod relink;
#[cfg(test)]
mod tests;
pub mod toc;

pub use error::*;
pub use pipeline::{create_toctree, run, RunSummary};
