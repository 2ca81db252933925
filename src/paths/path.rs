use std::{
    borrow::Cow,
    fmt::{Display, Formatter},
    path::{Component, Path},
};

/// Utility function to replace separators and convert to unicode (via to_string_lossy) on os path.
pub fn os_path_to_string<P: AsRef<Path>>(os_path_ref: P) -> String {
    let res = os_path_ref
        .as_ref()
        .components()
        .map(|c| match c {
            Component::RootDir => Cow::from("".to_string()),
            _ => c.as_os_str().to_string_lossy(),
        })
        .collect::<Vec<_>>()
        .join("/");
    tracing::trace!(
        "os_path_to_string: turned {:?} into {}",
        os_path_ref.as_ref().components(),
        res
    );
    res
}

/// Strip a trailing `.ext` from the last segment of a `/`-separated path. A leading dot (hidden
/// file) is not treated as an extension marker.
pub fn strip_extension(path: &str) -> &str {
    let seg_start = path.rfind('/').map(|idx| idx + 1).unwrap_or(0);
    match path[seg_start..].rfind('.') {
        Some(0) | None => path,
        Some(dot_idx) => &path[0..seg_start + dot_idx],
    }
}

/// Absolute external links are recognized the same loose way for both link forms: the target
/// mentions both a scheme-ish `http` and a `://` separator.
pub fn is_external(target: &str) -> bool {
    target.contains("http") && target.contains("://")
}

/// A raw link target split into (dir, filename, anchor) pieces.
///
/// ```text
/// dir/sub/file.md#anchor
/// ^dir   ^       ^      ^anchor
///        dir_sep ext_sep anc_sep
/// ```
///
/// The anchor is split off before anything else, so dots or slashes inside a fragment never
/// affect the filename.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LinkTarget<'a> {
    pub target: &'a str,
    /// Index of the last '/' before the anchor
    dir_sep: Option<usize>,
    /// Index of '.' separating filename from extension
    ext_sep: Option<usize>,
    /// Index of the '#' separating the file path from the anchor
    anc_sep: Option<usize>,
}

impl<'a> LinkTarget<'a> {
    pub fn new(target: &'a str) -> LinkTarget<'a> {
        let anc_sep = target.find('#');
        let path_end = anc_sep.unwrap_or(target.len());
        let dir_sep = target[0..path_end].rfind('/');
        let file_start = dir_sep.map(|idx| idx + 1).unwrap_or(0);
        let ext_sep = match target[file_start..path_end].rfind('.') {
            // Hidden files and bare dots have no extension
            Some(0) | None => None,
            Some(dot_idx) => Some(file_start + dot_idx),
        };
        LinkTarget {
            target,
            dir_sep,
            ext_sep,
            anc_sep,
        }
    }

    fn path_end(&self) -> usize {
        self.anc_sep.unwrap_or(self.target.len())
    }

    fn file_start(&self) -> usize {
        self.dir_sep.map(|idx| idx + 1).unwrap_or(0)
    }

    pub fn is_external(&self) -> bool {
        is_external(self.target)
    }

    /// True for same-document links such as `#section`.
    pub fn is_anchor_only(&self) -> bool {
        self.anc_sep == Some(0)
    }

    pub fn dir(&self) -> &'a str {
        &self.target[0..self.dir_sep.unwrap_or(0)]
    }

    /// Final path segment including any extension.
    pub fn filename(&self) -> &'a str {
        &self.target[self.file_start()..self.path_end()]
    }

    /// Final path segment with its extension removed. Looked up when `filename` misses.
    pub fn basename(&self) -> &'a str {
        &self.target[self.file_start()..self.ext_sep.unwrap_or(self.path_end())]
    }

    pub fn ext(&self) -> &'a str {
        let stop_idx = self.path_end();
        let start_idx = self.ext_sep.map(|idx| idx + 1).unwrap_or(stop_idx);
        &self.target[start_idx..stop_idx]
    }

    /// Fragment after the first '#', without the '#'. `None` when the target has no '#'.
    pub fn anchor(&self) -> Option<&'a str> {
        self.anc_sep.map(|idx| &self.target[idx + 1..])
    }

    /// Point this target at `url`, keeping the anchor (if any).
    pub fn with_url(&self, url: &str) -> String {
        match self.anchor() {
            Some(anchor) => format!("{url}#{anchor}"),
            None => url.to_string(),
        }
    }
}

impl<'a, T: AsRef<str> + ?Sized> From<&'a T> for LinkTarget<'a> {
    fn from(s: &'a T) -> LinkTarget<'a> {
        LinkTarget::new(s.as_ref())
    }
}

impl<'a> AsRef<str> for LinkTarget<'a> {
    fn as_ref(&self) -> &str {
        self.target
    }
}

impl<'a> Display for LinkTarget<'a> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.target)
    }
}
