use std::fs::read_to_string;
use tempfile::TempDir;
use test_log::test;

use docref::{
    catalog::Catalog,
    config::{DocrefConfig, CONFIG_NAME},
    error::DocrefError,
    pipeline::run,
    relink::RelinkMode,
};

mod common;
use common::{generate_test_root, write_tree};

const EXPECTED_TOC: &str = "# Toc\n\
\n- [guides/getting started](guides/getting-started)\
\n- [guides/installation](guides/installation)\
\n- [index](index)\
\n- [reference/advanced/configuration](reference/advanced/configuration)\
\n- [reference/api reference](reference/api-reference)\
\n\n```toctree::\n  :hidden:\n\n  toc\n```";

fn fixture_config(temp_dir: &TempDir) -> DocrefConfig {
    DocrefConfig {
        source_dir: temp_dir.path().join("source"),
        ..Default::default()
    }
}

#[test]
fn test_fixture_tree_is_relinked() {
    let temp_dir = generate_test_root("source").unwrap();
    let source = temp_dir.path().join("source");
    let summary = run(&fixture_config(&temp_dir), RelinkMode::Write).unwrap();

    assert_eq!(summary.cataloged, 5);
    assert_eq!(summary.remapped, 6);
    assert_eq!(
        summary.modified,
        vec![
            source.join("guides/getting-started.md"),
            source.join("index.md"),
            source.join("reference/api-reference.md"),
        ]
    );

    assert_eq!(
        read_to_string(source.join("index.md")).unwrap(),
        "# Project docs\n\
\n\
Start with the [Getting Started](guides/getting-started) page, then read about\n\
[configuration](reference/advanced/configuration#options).\n\
\n\
The [API reference][api] is generated. See also [Python](https://www.python.org/).\n\
\n\
[api]: reference/api-reference\n"
    );
    assert_eq!(
        read_to_string(source.join("guides/getting-started.md")).unwrap(),
        "# Getting Started\n\
\n\
Install first: [Installation](guides/installation#linux).\n\
Back to [the index](index).\n\
Not written yet: [missing page](missing-page.md)\n"
    );
    assert_eq!(
        read_to_string(source.join("reference/api-reference.md")).unwrap(),
        "# API reference\n\
\n\
Options are described in [configuration][config].\n\
\n\
[config]: reference/advanced/configuration\n"
    );
    assert_eq!(read_to_string(&summary.toc_path).unwrap(), EXPECTED_TOC);
}

#[test]
fn test_second_run_changes_nothing() {
    let temp_dir = generate_test_root("source").unwrap();
    let config = fixture_config(&temp_dir);
    run(&config, RelinkMode::Write).unwrap();
    let index_after_first =
        read_to_string(temp_dir.path().join("source").join("index.md")).unwrap();

    let summary = run(&config, RelinkMode::Write).unwrap();
    assert!(summary.modified.is_empty());
    assert_eq!(summary.remapped, 0);
    // The toc from the first run is now cataloged but stays out of its own list
    assert_eq!(summary.cataloged, 6);
    assert_eq!(read_to_string(&summary.toc_path).unwrap(), EXPECTED_TOC);
    assert_eq!(
        read_to_string(temp_dir.path().join("source").join("index.md")).unwrap(),
        index_after_first
    );
}

#[test]
fn test_duplicate_names_in_different_folders() {
    let temp_dir = generate_test_root("source").unwrap();
    let source = temp_dir.path().join("source");
    write_tree(&source, &[("reference/installation.md", "# Clash")]);

    let err = run(&fixture_config(&temp_dir), RelinkMode::Write).unwrap_err();
    assert_eq!(
        err,
        DocrefError::DuplicateDocumentName {
            url: "reference/installation".to_string(),
            existing: "guides/installation".to_string(),
        }
    );
    let message = err.to_string();
    assert!(message.contains("reference/installation.md"), "{message}");
    assert!(message.contains("guides/installation.md"), "{message}");

    // Nothing was rewritten
    assert_eq!(
        read_to_string(source.join("index.md")).unwrap(),
        read_to_string("tests/fixtures/source/index.md").unwrap()
    );
    assert!(!source.join("toc.md").exists());
}

#[test]
fn test_links_by_property() {
    let temp_dir = tempfile::tempdir().unwrap();
    let source = temp_dir.path().join("source");
    let doc = "[x](foo.md)\n\
[x](foo.md#sec1)\n\
[x](https://example.com/foo)\n\
[x](unknown.md)\n\
[x]: foo.md\n";
    write_tree(&source, &[("a/b/foo.md", "# Foo"), ("page.md", doc)]);

    let summary = run(&fixture_config(&temp_dir), RelinkMode::Write).unwrap();
    assert_eq!(summary.remapped, 3);
    assert_eq!(
        read_to_string(source.join("page.md")).unwrap(),
        "[x](a/b/foo)\n\
[x](a/b/foo#sec1)\n\
[x](https://example.com/foo)\n\
[x](unknown.md)\n\
[x]: a/b/foo\n"
    );
}

#[test]
fn test_config_file_drives_the_run() {
    let temp_dir = generate_test_root("source").unwrap();
    std::fs::write(
        temp_dir.path().join(CONFIG_NAME),
        r#"
source_dir = "source"
toc_file = "contents.md"
toc_title = "Contents"
ignore_files = ["configuration.md"]
"#,
    )
    .unwrap();
    let config = DocrefConfig::discover(temp_dir.path()).unwrap();
    let summary = run(&config, RelinkMode::Write).unwrap();

    assert_eq!(summary.cataloged, 4);
    let toc = read_to_string(temp_dir.path().join("source/contents.md")).unwrap();
    assert!(toc.starts_with("# Contents\n"), "{toc}");
    assert!(!toc.contains("configuration"), "{toc}");
    assert!(toc.ends_with("\n\n```toctree::\n  :hidden:\n\n  contents\n```"));

    // configuration.md is ignored, so the link to it stays as written
    let index = read_to_string(temp_dir.path().join("source/index.md")).unwrap();
    assert!(index.contains("[configuration](../old-layout/configuration.md#options)"));
}

#[test]
fn test_catalog_of_fixture() {
    let temp_dir = generate_test_root("source").unwrap();
    let catalog = Catalog::build(temp_dir.path().join("source"), "md", &[]).unwrap();
    let entries = catalog.iter().collect::<Vec<_>>();
    assert_eq!(
        entries,
        vec![
            ("api-reference", "reference/api-reference"),
            ("configuration", "reference/advanced/configuration"),
            ("getting-started", "guides/getting-started"),
            ("index", "index"),
            ("installation", "guides/installation"),
        ]
    );
    let json = serde_json::to_value(&catalog).unwrap();
    assert_eq!(json["installation"], "guides/installation");
}

#[test]
fn test_dotted_document_names_are_stable_across_runs() {
    let temp_dir = tempfile::tempdir().unwrap();
    let source = temp_dir.path().join("source");
    write_tree(
        &source,
        &[
            ("notes/v1.2-release.md", "# 1.2"),
            ("old/v1.md", "# 1.0"),
            ("index.md", "[rel](v1.2-release.md) [old](v1.md)"),
        ],
    );
    let config = fixture_config(&temp_dir);

    let first = run(&config, RelinkMode::Write).unwrap();
    assert_eq!(first.modified, vec![source.join("index.md")]);
    assert_eq!(
        read_to_string(source.join("index.md")).unwrap(),
        "[rel](notes/v1.2-release) [old](old/v1)"
    );

    let second = run(&config, RelinkMode::Write).unwrap();
    assert!(second.modified.is_empty(), "{:?}", second.modified);
    assert_eq!(
        read_to_string(source.join("index.md")).unwrap(),
        "[rel](notes/v1.2-release) [old](old/v1)"
    );
}

#[cfg(unix)]
#[test]
fn test_symlinked_document_is_cataloged_and_listed() {
    let temp_dir = tempfile::tempdir().unwrap();
    let source = temp_dir.path().join("source");
    write_tree(
        temp_dir.path(),
        &[
            ("CHANGELOG.md", "# Changelog"),
            ("source/index.md", "[c](changelog.md)"),
        ],
    );
    std::os::unix::fs::symlink("../CHANGELOG.md", source.join("changelog.md")).unwrap();

    let summary = run(&fixture_config(&temp_dir), RelinkMode::Write).unwrap();
    assert_eq!(summary.cataloged, 2);
    assert_eq!(
        read_to_string(source.join("index.md")).unwrap(),
        "[c](changelog)"
    );
    let toc = read_to_string(&summary.toc_path).unwrap();
    assert!(toc.contains("\n- [changelog](changelog)"), "{toc}");
}
