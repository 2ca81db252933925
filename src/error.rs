use std::{
    io,
    path::{Path, StripPrefixError},
};

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Error)]
pub enum DocrefError {
    #[error("Configuration error: {0}")]
    Config(String),
    #[error(
        "Tried to add '{url}.md' when '{existing}.md' already exists. \
         Documents may not share a name, even in different folders. Rename one."
    )]
    DuplicateDocumentName { url: String, existing: String },
    #[error("File System error: {0}")]
    Io(String),
    #[error("Item Not Found: {0}")]
    NotFound(String),
    #[error("You do not have permission to access this resource")]
    PermissionDenied,
    #[error("(De)Serialization error: {0}")]
    Serialization(String),
}

impl From<StripPrefixError> for DocrefError {
    fn from(src: StripPrefixError) -> DocrefError {
        DocrefError::NotFound(format!("Strip prefix failed for path. Error: {src}"))
    }
}

impl DocrefError {
    /// Like the `From<io::Error>` conversion, but names the file the error happened on.
    pub fn io_at<P: AsRef<Path>>(x: io::Error, path: P) -> Self {
        let path = path.as_ref().display();
        match x.kind() {
            io::ErrorKind::NotFound => DocrefError::NotFound(format!("{path}: {x}")),
            io::ErrorKind::PermissionDenied => DocrefError::PermissionDenied,
            kind => DocrefError::Io(format!("IOError: {kind} in {path}: {x}")),
        }
    }
}

impl From<toml::de::Error> for DocrefError {
    fn from(src: toml::de::Error) -> DocrefError {
        DocrefError::Serialization(format!("Toml deserialization error: {src}"))
    }
}

impl From<io::Error> for DocrefError {
    fn from(x: io::Error) -> Self {
        match x.kind() {
            io::ErrorKind::NotFound => DocrefError::NotFound(format!("{x}")),
            io::ErrorKind::PermissionDenied => DocrefError::PermissionDenied,
            _ => DocrefError::Io(format!("IOError: {}", x.kind())),
        }
    }
}

impl From<walkdir::Error> for DocrefError {
    fn from(x: walkdir::Error) -> Self {
        let path = x.path().map(|p| p.display().to_string());
        match x.into_io_error() {
            Some(io_error) => io_error.into(),
            None => DocrefError::Io(format!(
                "Directory walk failed (filesystem loop) at {}",
                path.unwrap_or_default()
            )),
        }
    }
}
