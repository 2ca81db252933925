use crate::{error::DocrefError, paths::strip_extension};
use serde::{Deserialize, Serialize};
use std::{
    fs::{read_to_string, write},
    path::{Component, Path, PathBuf},
};

/// Config file looked up by [`DocrefConfig::discover`].
pub const CONFIG_NAME: &str = "docref.toml";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DocrefConfig {
    /// Root of the documentation tree. Canonical urls are relative to this directory.
    pub source_dir: PathBuf,
    /// Document extension, without the dot.
    pub extension: String,
    /// Toc output path, relative to `source_dir`.
    pub toc_file: PathBuf,
    /// Heading written at the top of the toc.
    pub toc_title: String,
    /// Filenames (with extension) left out of the catalog.
    pub ignore_files: Vec<String>,
    /// Report internal-looking link targets that match no cataloged document.
    pub warn_unresolved: bool,
}

impl Default for DocrefConfig {
    fn default() -> Self {
        DocrefConfig {
            source_dir: PathBuf::from("source"),
            extension: "md".to_string(),
            toc_file: PathBuf::from("toc.md"),
            toc_title: "Toc".to_string(),
            ignore_files: Vec::new(),
            warn_unresolved: false,
        }
    }
}

impl DocrefConfig {
    /// Read a TOML config file. A relative `source_dir` is resolved against the file's directory.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<DocrefConfig, DocrefError> {
        tracing::debug!("Reading config from: {:?}", path.as_ref());
        let content = read_to_string(path.as_ref())?;
        let mut config: DocrefConfig = toml::from_str(&content)?;
        if config.source_dir.is_relative() {
            if let Some(parent) = path.as_ref().parent() {
                config.source_dir = parent.join(&config.source_dir);
            }
        }
        config.validate()?;
        Ok(config)
    }

    /// Load `docref.toml` from `dir` if it exists, otherwise use defaults rooted at `dir`.
    pub fn discover<P: AsRef<Path>>(dir: P) -> Result<DocrefConfig, DocrefError> {
        let candidate = dir.as_ref().join(CONFIG_NAME);
        if candidate.is_file() {
            return DocrefConfig::from_file(candidate);
        }
        tracing::debug!(
            "No {} in {:?}, using default configuration.",
            CONFIG_NAME,
            dir.as_ref()
        );
        let mut config = DocrefConfig::default();
        config.source_dir = dir.as_ref().join(&config.source_dir);
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), DocrefError> {
        if self.extension.is_empty() || self.extension.contains(['.', '/']) {
            return Err(DocrefError::Config(format!(
                "extension must be a bare extension such as 'md', got '{}'",
                self.extension
            )));
        }
        if self.toc_file.is_absolute()
            || self
                .toc_file
                .components()
                .any(|c| !matches!(c, Component::Normal(_) | Component::CurDir))
        {
            return Err(DocrefError::Config(format!(
                "toc_file {:?} must be a relative path inside source_dir",
                self.toc_file
            )));
        }
        if self.toc_name().is_empty() {
            return Err(DocrefError::Config(format!(
                "toc_file {:?} has no file name",
                self.toc_file
            )));
        }
        Ok(())
    }

    /// Where the toc document is written.
    pub fn toc_path(&self) -> PathBuf {
        self.source_dir.join(&self.toc_file)
    }

    /// Toc file path relative to the source root with its extension stripped, as it appears in
    /// the catalog and in the toctree directive.
    pub fn toc_name(&self) -> String {
        let toc = self.toc_file.to_string_lossy().replace('\\', "/");
        strip_extension(&toc).to_string()
    }
}

pub fn get_content<P: AsRef<Path>>(path: P) -> Result<String, DocrefError> {
    tracing::trace!("Reading {:?}", path.as_ref());
    read_to_string(path.as_ref()).map_err(|e| DocrefError::io_at(e, path))
}

pub fn set_content<P: AsRef<Path>>(path: P, text: &str) -> Result<(), DocrefError> {
    tracing::trace!("Writing {:?}", path.as_ref());
    write(path.as_ref(), text).map_err(|e| DocrefError::io_at(e, path))
}
