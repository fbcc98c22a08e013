//! Link resolver — renders see-also entries as relative Markdown links.
//!
//! Pages follow a fixed layout: one page per source directory, one page per
//! class under the class docs directory. Links are written relative to the
//! page of the file being documented.

use crate::config::Config;
use crate::model::Reference;
use std::collections::BTreeMap;
use std::path::{Component, Path, PathBuf};
use tracing::debug;

const INDENT: &str = "    ";

/// Finds the source file a standalone reference names.
pub trait ReferenceIndex {
    /// Path, relative to the source tree, of the file whose stem is `name`.
    fn lookup(&self, name: &str) -> Option<&Path>;
}

impl ReferenceIndex for BTreeMap<String, PathBuf> {
    fn lookup(&self, name: &str) -> Option<&Path> {
        self.get(name).map(PathBuf::as_path)
    }
}

/// The file whose documentation is being written.
#[derive(Debug, Clone)]
pub struct LinkTarget {
    /// Path relative to the source tree.
    pub rel_path: PathBuf,
    /// Whether the file lives in the stimulus-generation area.
    pub in_class_area: bool,
}

impl LinkTarget {
    pub fn new(rel_path: impl Into<PathBuf>, config: &Config) -> Self {
        let rel_path = rel_path.into();
        let in_class_area = rel_path
            .components()
            .any(|c| c.as_os_str() == config.class_area.as_str());
        Self {
            rel_path,
            in_class_area,
        }
    }

    fn dir(&self) -> &Path {
        self.rel_path.parent().unwrap_or(Path::new(""))
    }
}

/// Classify one normalized see-also line.
pub fn parse_reference(text: &str) -> Reference<'_> {
    if text.contains("* [") {
        return Reference::Preformatted(text);
    }
    if text.contains('.') {
        let mut parts = text.split('.');
        let class = parts.next().unwrap_or_default().trim();
        let method = parts.next().unwrap_or_default().trim();
        return Reference::Method { class, method };
    }
    Reference::Standalone(text.trim())
}

/// Render a see-also line as an indented list item.
///
/// Returns `None` when a standalone reference names no known file.
pub fn resolve(
    text: &str,
    target: &LinkTarget,
    index: &dyn ReferenceIndex,
    config: &Config,
) -> Option<String> {
    let label = text.trim();
    let link = match parse_reference(text) {
        Reference::Preformatted(line) => return Some(format!("{INDENT}{line}")),
        Reference::Method { class, method } => {
            let prefix = if target.in_class_area {
                "../".to_owned()
            } else {
                format!("../{}/", config.class_docs_dir)
            };
            format!("{prefix}{class}/#{}", method.to_lowercase())
        }
        Reference::Standalone(name) => {
            let found = index.lookup(name)?;
            let anchor = name.to_lowercase();
            let found_dir = found.parent().unwrap_or(Path::new(""));
            if found_dir == target.dir() {
                format!("./#{anchor}")
            } else {
                let up = if target.in_class_area { "../../" } else { "../" };
                match url_path(found_dir) {
                    dir if dir.is_empty() => format!("{up}#{anchor}"),
                    dir => format!("{up}{dir}/#{anchor}"),
                }
            }
        }
    };
    debug!(reference = label, link = %link, "resolved see-also entry");
    Some(format!("{INDENT}* [{label}]({link})"))
}

/// Join path components with `/` regardless of platform.
fn url_path(path: &Path) -> String {
    path.components()
        .filter_map(|c| match c {
            Component::Normal(part) => Some(part.to_string_lossy()),
            _ => None,
        })
        .collect::<Vec<_>>()
        .join("/")
}
