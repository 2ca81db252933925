//! Shared test utilities for catalog, relink and pipeline testing

use crate::catalog::Catalog;
use std::path::Path;

/// Initialize logging for tests
pub fn init_logging() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init()
        .ok();
}

/// Write `(relative path, content)` pairs below `root`, creating directories as needed.
pub fn write_tree(root: &Path, files: &[(&str, &str)]) {
    for (rel, content) in files {
        let path = root.join(rel);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).unwrap();
        }
        std::fs::write(path, content).unwrap();
    }
}

/// A catalog with `foo -> a/b/foo` and `setup -> guides/setup`.
pub fn sample_catalog() -> Catalog {
    init_logging();
    [("foo", "a/b/foo"), ("setup", "guides/setup")]
        .into_iter()
        .map(|(basename, url)| (basename.to_string(), url.to_string()))
        .collect()
}
