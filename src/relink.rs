//! Phase two: point cross-document links at canonical urls.
//!
//! Two independent passes run over each document, inline links first and then reference
//! definitions (over the output of the inline pass):
//!
//! ```markdown
//! [Install guide](../setup/install.md#linux)     inline form
//! [install]: install.md                          reference-definition form
//! ```
//!
//! Any target whose basename is in the [`Catalog`] is replaced by the cataloged url with its
//! `#anchor` kept. Everything else (external urls, unknown names, same-document anchors) is left
//! exactly as written, so a second run over relinked documents changes nothing.

use crate::{
    catalog::Catalog,
    config::{get_content, set_content},
    error::DocrefError,
    paths::LinkTarget,
};
use once_cell::sync::Lazy;
use regex::{Captures, Regex};
use serde::Serialize;
use std::{
    fmt,
    path::{Path, PathBuf},
};

/// `[text](target)`. Text may contain word characters, spaces, hyphens and brackets; the target
/// is the shortest run up to a closing parenthesis and may cross line breaks.
static INLINE_LINK: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?is)\[(?P<txt>[\w\- \[\]]+?)\]\((?P<url>.+?)\)")
        .expect("inline link pattern compiles")
});

/// `[text]: target`. The target runs to the end of the line; trailing whitespace (including a
/// CRLF carriage return) stays outside the match.
static REFERENCE_DEF: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\[(?P<txt>[\w\- ]+?)\]:(?P<sep>[ \t]+)(?P<url>[^\r\n]*[^\s])")
        .expect("reference definition pattern compiles")
});

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum LinkForm {
    Inline,
    Reference,
}

/// One rewritten link target.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LinkRemap {
    pub form: LinkForm,
    pub text: String,
    pub from: String,
    pub to: String,
}

impl fmt::Display for LinkRemap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (text, from, to) = (&self.text, &self.from, &self.to);
        match self.form {
            LinkForm::Inline => write!(f, "[{text}]({from}) -> [{text}]({to})"),
            LinkForm::Reference => write!(f, "[{text}]: {from} -> [{text}]: {to}"),
        }
    }
}

/// Resolve a raw link target against the catalog.
///
/// External urls and targets whose basename is not cataloged come back unchanged. A cataloged
/// basename comes back as its canonical url plus the original `#anchor`, if there was one.
pub fn resolve_target(catalog: &Catalog, raw: &str) -> String {
    let target = LinkTarget::new(raw);
    if target.is_external() {
        return raw.to_string();
    }
    match lookup(catalog, &target) {
        Some(url) => target.with_url(url),
        None => raw.to_string(),
    }
}

/// The full final segment is tried before the extension-stripped one, so an already canonical
/// url such as `notes/v1.2-release` resolves to itself rather than to a document named `v1`.
fn lookup<'c>(catalog: &'c Catalog, target: &LinkTarget<'_>) -> Option<&'c str> {
    catalog
        .get(target.filename())
        .or_else(|| catalog.get(target.basename()))
}

/// True when `raw` looks like it was meant to reach another document but nothing answered.
fn is_unresolved(catalog: &Catalog, raw: &str) -> bool {
    let target = LinkTarget::new(raw);
    !target.is_external()
        && !target.is_anchor_only()
        && !target.basename().is_empty()
        && !raw.contains(':')
        && lookup(catalog, &target).is_none()
}

/// The result of relinking one document's text.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RelinkedText {
    pub content: String,
    pub remaps: Vec<LinkRemap>,
    /// Internal-looking targets that matched no cataloged document.
    pub unresolved: Vec<String>,
}

impl RelinkedText {
    pub fn changed(&self, original: &str) -> bool {
        self.content != original
    }
}

/// Apply the inline pass, then the reference-definition pass, to `text`.
pub fn relink_text(catalog: &Catalog, text: &str) -> RelinkedText {
    let mut remaps = Vec::new();
    let mut unresolved = Vec::new();

    let inline = INLINE_LINK.replace_all(text, |caps: &Captures| {
        let url = &caps["url"];
        let resolved = resolve_target(catalog, url);
        if resolved == url {
            if is_unresolved(catalog, url) {
                unresolved.push(url.to_string());
            }
            return caps[0].to_string();
        }
        let remap = LinkRemap {
            form: LinkForm::Inline,
            text: caps["txt"].to_string(),
            from: url.to_string(),
            to: resolved,
        };
        tracing::info!("  Remapped link {remap}");
        let out = format!("[{}]({})", remap.text, remap.to);
        remaps.push(remap);
        out
    });

    let content = REFERENCE_DEF
        .replace_all(&inline, |caps: &Captures| {
            let url = &caps["url"];
            let resolved = resolve_target(catalog, url);
            if resolved == url {
                if is_unresolved(catalog, url) {
                    unresolved.push(url.to_string());
                }
                return caps[0].to_string();
            }
            let remap = LinkRemap {
                form: LinkForm::Reference,
                text: caps["txt"].to_string(),
                from: url.to_string(),
                to: resolved,
            };
            tracing::info!("  Remapped link {remap}");
            let out = format!("[{}]:{}{}", remap.text, &caps["sep"], remap.to);
            remaps.push(remap);
            out
        })
        .into_owned();

    RelinkedText {
        content,
        remaps,
        unresolved,
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum RelinkMode {
    #[default]
    Write,
    /// Compute the report but leave every file untouched.
    DryRun,
}

#[derive(Debug, Clone, Default)]
pub struct RelinkOptions {
    pub mode: RelinkMode,
    pub warn_unresolved: bool,
    /// Only targets with this extension (or none) are reported as unresolved.
    pub extension: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UnresolvedLink {
    pub path: PathBuf,
    pub target: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RelinkReport {
    /// Documents whose content changed (and were rewritten, unless in dry-run mode).
    pub modified: Vec<PathBuf>,
    /// Links rewritten across all documents.
    pub remapped: usize,
    /// Filled only when [`RelinkOptions::warn_unresolved`] is set.
    pub unresolved: Vec<UnresolvedLink>,
}

/// Relink one document on disk. Returns the relinked text and whether its content changed.
pub fn relink_document<P: AsRef<Path>>(
    catalog: &Catalog,
    path: P,
    mode: RelinkMode,
) -> Result<(RelinkedText, bool), DocrefError> {
    let original = get_content(path.as_ref())?;
    let relinked = relink_text(catalog, &original);
    let changed = relinked.changed(&original);
    if changed && mode == RelinkMode::Write {
        set_content(path.as_ref(), &relinked.content)?;
    }
    Ok((relinked, changed))
}

/// Relink every document in `paths`, writing back only the ones whose content changed.
pub fn relink_documents<P: AsRef<Path>>(
    catalog: &Catalog,
    paths: &[P],
    options: &RelinkOptions,
) -> Result<RelinkReport, DocrefError> {
    let mut report = RelinkReport::default();
    for path in paths {
        let path = path.as_ref();
        let (relinked, changed) = relink_document(catalog, path, options.mode)?;
        report.remapped += relinked.remaps.len();
        if options.warn_unresolved {
            for target in relinked.unresolved {
                let ext = LinkTarget::new(&target).ext();
                if !ext.is_empty() && ext != options.extension {
                    continue;
                }
                tracing::warn!("Unresolved link '{}' in {}", target, path.display());
                report.unresolved.push(UnresolvedLink {
                    path: path.to_path_buf(),
                    target,
                });
            }
        }
        if changed {
            let name = path
                .file_name()
                .map(|name| name.to_string_lossy().into_owned())
                .unwrap_or_default();
            match options.mode {
                RelinkMode::Write => tracing::info!("Auto-relinked links in {name}"),
                RelinkMode::DryRun => tracing::info!("Would relink links in {name}"),
            }
            report.modified.push(path.to_path_buf());
        }
    }
    Ok(report)
}
