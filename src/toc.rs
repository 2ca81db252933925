//! Phase three: the generated toc page.
//!
//! Sphinx only renders documents reachable from some `toctree`. The toc page lists every
//! cataloged document, and then registers itself in a hidden toctree so it is reachable too
//! without showing up twice in the navigation.

use crate::{catalog::Catalog, config::set_content, error::DocrefError};
use std::{fmt::Write, path::Path};

/// Render the toc. `toc_name` is the toc's own url; it is left out of the visible list and is
/// the single entry of the trailing hidden toctree.
pub fn render_toc(catalog: &Catalog, toc_name: &str, title: &str) -> String {
    let mut out = format!("# {title}\n");
    for url in catalog.urls() {
        if url == toc_name {
            continue;
        }
        let linkname = url.replace('-', " ");
        // Writing to a String cannot fail
        let _ = write!(out, "\n- [{linkname}]({url})");
    }
    let _ = write!(out, "\n\n```toctree::\n  :hidden:\n\n  {toc_name}\n```");
    out
}

/// Overwrite the toc file, creating parent directories as needed.
pub fn write_toc<P: AsRef<Path>>(path: P, content: &str) -> Result<(), DocrefError> {
    if let Some(parent) = path.as_ref().parent() {
        std::fs::create_dir_all(parent)?;
    }
    tracing::debug!("Writing toc to {:?}", path.as_ref());
    set_content(path, content)
}
