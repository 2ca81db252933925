//! Phase one: map every document basename in the source tree to its canonical url.
//!
//! The catalog is the only state shared by the later phases and it is never mutated after
//! [`Catalog::build`] returns. Basenames must be unique across the whole tree so that a bare
//! `[text](name.md)` link can be resolved without knowing which folder it was written in.

use crate::{
    config::DocrefConfig,
    error::DocrefError,
    paths::{os_path_to_string, strip_extension},
};
use serde::Serialize;
use std::{
    collections::{btree_map::Entry, BTreeMap},
    path::{Path, PathBuf},
};
use walkdir::{DirEntry, WalkDir};

/// A cataloged source file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Document {
    pub path: PathBuf,
    pub basename: String,
    pub url: String,
}

impl Document {
    pub fn new<R: AsRef<Path>, P: AsRef<Path>>(root: R, path: P) -> Result<Document, DocrefError> {
        let path = path.as_ref();
        let basename = path
            .file_name()
            .map(|name| strip_extension(&name.to_string_lossy()).to_string())
            .ok_or_else(|| DocrefError::NotFound(format!("{path:?} has no file name")))?;
        Ok(Document {
            path: path.to_path_buf(),
            basename,
            url: canonical_url(root, path)?,
        })
    }
}

/// Iterates through a directory subtree, returning a sorted list of files with the given
/// extension. Hidden entries below `root` are skipped. Symlinks are followed, so a linked
/// document is listed under its path inside the tree.
pub fn discover_documents<P: AsRef<Path>>(
    root: P,
    extension: &str,
) -> Result<Vec<PathBuf>, DocrefError> {
    fn is_hidden(entry: &DirEntry) -> bool {
        entry
            .file_name()
            .to_str()
            .map(|s| s.starts_with("."))
            .unwrap_or(false)
    }
    let root = root.as_ref();
    if !root.is_dir() {
        return Err(DocrefError::NotFound(format!(
            "source directory {root:?} does not exist"
        )));
    }
    let mut sorted_files = Vec::new();
    for entry in WalkDir::new(root)
        .follow_links(true)
        .into_iter()
        .filter_entry(|e| !is_hidden(e) || e.path() == root)
    {
        let entry = entry?;
        if entry.file_type().is_file()
            && entry.path().extension().and_then(|ext| ext.to_str()) == Some(extension)
        {
            sorted_files.push(entry.into_path());
        }
    }
    sorted_files.sort_by(|a, b| a.components().cmp(b.components()));
    tracing::debug!("Discovered {} documents under {:?}", sorted_files.len(), root);
    Ok(sorted_files)
}

/// The document's path below `root`, `/`-joined, extension stripped.
pub fn canonical_url<R: AsRef<Path>, P: AsRef<Path>>(
    root: R,
    path: P,
) -> Result<String, DocrefError> {
    let relative = path.as_ref().strip_prefix(root.as_ref())?;
    let relative = os_path_to_string(relative);
    Ok(strip_extension(&relative).to_string())
}

/// Basename to canonical url.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Catalog(BTreeMap<String, String>);

impl Catalog {
    /// Walk `root` and catalog every document whose filename is not in `ignore_files`.
    ///
    /// Fails with [`DocrefError::DuplicateDocumentName`] on the first basename seen twice.
    pub fn build<P: AsRef<Path>>(
        root: P,
        extension: &str,
        ignore_files: &[String],
    ) -> Result<Catalog, DocrefError> {
        let mut catalog = Catalog::default();
        for path in discover_documents(root.as_ref(), extension)? {
            let ignored = path
                .file_name()
                .and_then(|name| name.to_str())
                .map(|name| ignore_files.iter().any(|ignored| ignored == name))
                .unwrap_or(false);
            if ignored {
                tracing::debug!("Ignoring {:?}", path);
                continue;
            }
            catalog.insert(Document::new(root.as_ref(), &path)?)?;
        }
        tracing::debug!("Cataloged {} documents", catalog.len());
        Ok(catalog)
    }

    /// Validate `config` and build the catalog of its source tree.
    pub fn from_config(config: &DocrefConfig) -> Result<Catalog, DocrefError> {
        config.validate()?;
        Catalog::build(&config.source_dir, &config.extension, &config.ignore_files)
    }

    pub fn insert(&mut self, doc: Document) -> Result<(), DocrefError> {
        match self.0.entry(doc.basename) {
            Entry::Occupied(existing) if *existing.get() != doc.url => {
                Err(DocrefError::DuplicateDocumentName {
                    url: doc.url,
                    existing: existing.get().clone(),
                })
            }
            Entry::Occupied(_) => Ok(()),
            Entry::Vacant(slot) => {
                tracing::trace!("{} -> {}", slot.key(), doc.url);
                slot.insert(doc.url);
                Ok(())
            }
        }
    }

    pub fn get(&self, basename: &str) -> Option<&str> {
        self.0.get(basename).map(String::as_str)
    }

    /// All canonical urls, sorted lexicographically.
    pub fn urls(&self) -> Vec<&str> {
        let mut urls = self.0.values().map(String::as_str).collect::<Vec<_>>();
        urls.sort_unstable();
        urls
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromIterator<(String, String)> for Catalog {
    fn from_iter<I: IntoIterator<Item = (String, String)>>(iter: I) -> Self {
        Catalog(iter.into_iter().collect())
    }
}
