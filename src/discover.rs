//! Source discovery, classification and page layout.

use crate::config::Config;
use crate::error::Result;
use crate::extract::links::ReferenceIndex;
use crate::model::FileKind;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Component, Path, PathBuf};

/// All script files below `source_root`, recursively, sorted.
pub fn discover(source_root: &Path, config: &Config) -> Result<Vec<PathBuf>> {
    let pattern = source_root
        .join("**")
        .join(format!("*.{}", config.extension));
    let mut files: Vec<PathBuf> = glob::glob(&pattern.to_string_lossy())?
        .filter_map(|r| r.ok())
        .filter(|p| p.is_file())
        .collect();
    files.sort();
    files.dedup();
    Ok(files)
}

/// File stem as UTF-8, or an empty string.
pub fn stem(path: &Path) -> &str {
    path.file_stem().and_then(|s| s.to_str()).unwrap_or_default()
}

/// `path` relative to `base`, ignoring `.` components on either side.
///
/// When one side is relative to the working directory and the other is
/// absolute, both are made absolute first. Falls back to `path` itself
/// when it is not below `base`.
pub fn relative_path(path: &Path, base: &Path) -> PathBuf {
    let clean = |p: &Path| -> PathBuf {
        p.components()
            .filter(|c| !matches!(c, Component::CurDir))
            .collect()
    };
    let path = clean(path);
    let base = clean(base);
    if let Ok(rel) = path.strip_prefix(&base) {
        return rel.to_path_buf();
    }
    if let (Ok(abs_path), Ok(abs_base)) =
        (std::path::absolute(&path), std::path::absolute(&base))
    {
        if let Ok(rel) = clean(&abs_path).strip_prefix(clean(&abs_base)) {
            return rel.to_path_buf();
        }
    }
    // Symlinked working directories (e.g. /tmp on macOS) need resolving.
    if let (Ok(real_path), Ok(real_base)) = (fs::canonicalize(&path), fs::canonicalize(&base)) {
        if let Ok(rel) = real_path.strip_prefix(&real_base) {
            return rel.to_path_buf();
        }
    }
    path
}

/// Decide how a file's blocks are located, from its stem.
pub fn classify(path: &Path, config: &Config) -> FileKind {
    let marker = config.class_marker.to_lowercase();
    if !marker.is_empty() && stem(path).to_lowercase().contains(&marker) {
        FileKind::ClassFile
    } else {
        FileKind::PlainScript
    }
}

/// Documentation page for a source file, relative to the output directory.
///
/// Each class gets its own page; plain scripts share one page per source
/// directory.
pub fn page_for(rel_path: &Path, kind: FileKind, config: &Config) -> PathBuf {
    match kind {
        FileKind::ClassFile => {
            Path::new(&config.class_docs_dir).join(format!("{}.md", stem(rel_path)))
        }
        FileKind::PlainScript => match rel_path.parent() {
            Some(dir) if !dir.as_os_str().is_empty() => {
                let mut page = dir.as_os_str().to_owned();
                page.push(".md");
                PathBuf::from(page)
            }
            _ => PathBuf::from("index.md"),
        },
    }
}

/// Stem-to-path lookup over the discovered sources.
#[derive(Debug, Default)]
pub struct ScriptIndex {
    entries: BTreeMap<String, PathBuf>,
}

impl ScriptIndex {
    /// Index `files` by stem, storing paths relative to `source_root`.
    /// On duplicate stems the first file in sorted order wins.
    pub fn build(source_root: &Path, files: &[PathBuf]) -> Self {
        let mut entries = BTreeMap::new();
        for path in files {
            entries
                .entry(stem(path).to_owned())
                .or_insert_with(|| relative_path(path, source_root));
        }
        Self { entries }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl ReferenceIndex for ScriptIndex {
    fn lookup(&self, name: &str) -> Option<&Path> {
        self.entries.lookup(name)
    }
}
