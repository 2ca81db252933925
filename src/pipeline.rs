use crate::{
    catalog::{discover_documents, Catalog},
    config::DocrefConfig,
    error::DocrefError,
    relink::{relink_documents, RelinkMode, RelinkOptions, UnresolvedLink},
    toc::{render_toc, write_toc},
};
use serde::Serialize;
use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RunSummary {
    pub cataloged: usize,
    pub modified: Vec<PathBuf>,
    pub remapped: usize,
    pub toc_path: PathBuf,
    /// Whether the toc file was (re)written. False in dry-run mode.
    pub toc_written: bool,
    pub unresolved: Vec<UnresolvedLink>,
}

/// Catalog, relink and write the toc.
///
/// The catalog is complete before any document is touched, so a duplicate name aborts the run
/// with the tree unmodified.
pub fn run(config: &DocrefConfig, mode: RelinkMode) -> Result<RunSummary, DocrefError> {
    let catalog = Catalog::from_config(config)?;
    tracing::info!(
        "Cataloged {} documents under {}",
        catalog.len(),
        config.source_dir.display()
    );

    // Ignored files are left out of the catalog only; their outgoing links are still relinked.
    let documents = discover_documents(&config.source_dir, &config.extension)?;
    let options = RelinkOptions {
        mode,
        warn_unresolved: config.warn_unresolved,
        extension: config.extension.clone(),
    };
    let report = relink_documents(&catalog, &documents, &options)?;
    if !report.modified.is_empty() {
        match mode {
            RelinkMode::Write => tracing::info!(
                "Auto-corrected links in {} documents.",
                report.modified.len()
            ),
            RelinkMode::DryRun => tracing::info!(
                "Links would be corrected in {} documents.",
                report.modified.len()
            ),
        }
    }

    let toc_path = config.toc_path();
    let toc_written = mode == RelinkMode::Write;
    if toc_written {
        let toc = render_toc(&catalog, &config.toc_name(), &config.toc_title);
        write_toc(&toc_path, &toc)?;
    }

    Ok(RunSummary {
        cataloged: catalog.len(),
        modified: report.modified,
        remapped: report.remapped,
        toc_path,
        toc_written,
        unresolved: report.unresolved,
    })
}

/// Run the whole pipeline with the configuration discovered in the working directory.
pub fn create_toctree() -> Result<RunSummary, DocrefError> {
    let config = DocrefConfig::discover(std::env::current_dir()?)?;
    run(&config, RelinkMode::Write)
}
