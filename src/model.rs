//! Data model for documentation extraction — format-agnostic.

use std::fmt;
use std::ops::Range;

/// Which boundary-detection strategy applies to a source file.
///
/// Decided once by the caller (see [`crate::discover::classify`]); the
/// extractor never looks at path text to tell the two apart.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileKind {
    /// A script documented by a single block headed by its own name.
    PlainScript,
    /// A class whose methods each carry their own block.
    ClassFile,
}

/// One source file, read once and loaned to the extractor.
#[derive(Debug)]
pub struct SourceFile<'a> {
    /// Base name without extension (`foo` for `utils/foo.m`).
    pub name: &'a str,
    pub lines: Vec<&'a str>,
    pub kind: FileKind,
}

impl<'a> SourceFile<'a> {
    pub fn new(name: &'a str, content: &'a str, kind: FileKind) -> Self {
        Self {
            name,
            lines: content.lines().collect(),
            kind,
        }
    }
}

/// A function definition found in a class file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FunctionSignature {
    /// Zero-based line index of the `function` line.
    pub line: usize,
    /// Lowercased function name.
    pub name: String,
}

/// Half-open line range `[start, end)` of one documentation block.
///
/// `start` is the header line naming the script or function. `end` is one
/// past the last substantive comment line, so the end marker and trailing
/// bare comment lines are never part of the block.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DocBlock {
    pub start: usize,
    pub end: usize,
}

impl DocBlock {
    /// Build a block, clamping `end` so that `start <= end` always holds.
    pub fn new(start: usize, end: usize) -> Self {
        Self {
            start,
            end: end.max(start),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    pub fn range(&self) -> Range<usize> {
        self.start..self.end
    }
}

/// One entry of a "see also" section.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reference<'a> {
    /// Already a Markdown list item / link; copied through.
    Preformatted(&'a str),
    /// `ClassName.methodName`
    Method { class: &'a str, method: &'a str },
    /// Another script, named without its extension.
    Standalone(&'a str),
}

/// Advisory, non-fatal findings scoped to one file or one line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Diagnostic {
    /// No documentation block could be located; the file was skipped.
    MissingBlock { file: String },
    /// A see-also entry matched no known file and was dropped.
    UnresolvedReference { file: String, line: usize },
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Diagnostic::MissingBlock { file } => {
                write!(f, "no documentation found for {file}, skipping")
            }
            Diagnostic::UnresolvedReference { file, line } => write!(
                f,
                "see-also entry not properly formatted in {file} at line {line}"
            ),
        }
    }
}

/// Result of extracting every block of one file.
#[derive(Debug, Default)]
pub struct Outcome {
    /// Number of blocks appended to the sink.
    pub blocks: usize,
    /// Start line of the last block located, usable as a resume index.
    pub resume: Option<usize>,
    pub diagnostics: Vec<Diagnostic>,
}
