//! Boundary locator — finds where each documentation block starts and ends.
//!
//! Plain scripts are headed by a comment line naming the script itself.
//! Class files carry one block per method, headed by a comment line naming
//! the method; the scan restarts after the previous block's header.

use crate::config::Config;
use crate::model::{DocBlock, FileKind, FunctionSignature, SourceFile};
use regex::Regex;
use std::sync::LazyLock;
use tracing::debug;

// `function name(..)`, `function out = name(..)`, `function [a, b] = name(..)`
static RE_FUNCTION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^function\b(?:[^=(]*=)?\s*([A-Za-z][A-Za-z0-9_.]*)").unwrap()
});

/// Whether a trimmed line opens a function definition.
fn is_function_line(trimmed: &str) -> bool {
    RE_FUNCTION.is_match(trimmed)
}

/// Collect every function defined in the file, in source order.
pub fn function_signatures(lines: &[&str]) -> Vec<FunctionSignature> {
    lines
        .iter()
        .enumerate()
        .filter_map(|(line, text)| {
            let caps = RE_FUNCTION.captures(text.trim())?;
            Some(FunctionSignature {
                line,
                name: caps[1].to_lowercase(),
            })
        })
        .collect()
}

/// Reduce a line to the bare name it may carry: heading hashes, comment
/// markers and spaces removed, lowercased.
fn header_name(line: &str, comment: char) -> String {
    line.chars()
        .filter(|&c| c != '#' && c != ' ' && c != comment)
        .collect::<String>()
        .trim()
        .to_lowercase()
}

fn is_comment(line: &str, comment: char) -> bool {
    line.trim_start().starts_with(comment)
}

/// First line naming the script, e.g. `% ### foo` in `foo.m`.
pub fn find_script_start(lines: &[&str], name: &str, comment: char) -> Option<usize> {
    let name = name.to_lowercase();
    lines
        .iter()
        .position(|line| header_name(line, comment) == name)
}

/// Next method header strictly after `resume`.
///
/// A comment line naming a known function only counts once a code line has
/// been seen since the resume position. The see-also entries trailing the
/// previous block are all comments, so a method name listed there is never
/// mistaken for that method's own header.
pub fn find_class_start(
    lines: &[&str],
    functions: &[FunctionSignature],
    resume: Option<usize>,
    comment: char,
) -> Option<usize> {
    let from = resume.map_or(0, |r| r + 1);
    let mut comments_only = true;

    for (i, line) in lines.iter().enumerate().skip(from) {
        let trimmed = line.trim_start();
        if !trimmed.is_empty() && !trimmed.starts_with(comment) {
            comments_only = false;
            continue;
        }
        if comments_only || !is_comment(line, comment) {
            continue;
        }
        let name = header_name(line, comment);
        if functions.iter().any(|f| f.name == name) {
            return Some(i);
        }
    }
    None
}

/// Scan from `from` to the first stopping line and return one past the
/// last substantive comment line seen on the way.
///
/// Stopping lines: a function definition, any non-blank non-comment line,
/// or a line containing the end marker. Returns `None` when the file ends
/// before any stopping line.
pub fn find_end(lines: &[&str], from: usize, config: &Config) -> Option<usize> {
    let marker = config.end_marker_lower();
    let bare = config.comment.to_string();
    let mut last_comment = None;

    for (i, line) in lines.iter().enumerate().skip(from) {
        let trimmed = line.trim().to_lowercase();
        let has_marker = trimmed.contains(&marker);

        if trimmed.starts_with(config.comment) && trimmed != bare && !has_marker {
            last_comment = Some(i);
        }

        if is_function_line(&trimmed)
            || (!trimmed.is_empty() && !trimmed.starts_with(config.comment))
            || has_marker
        {
            return Some(last_comment.map_or(from, |l| l + 1));
        }
    }
    None
}

/// Locate the next block of `source` after `resume`.
///
/// Returns `None` when no header is found. A header without a usable end
/// yields an empty block, so class scanning can still move past it.
pub fn locate(
    source: &SourceFile<'_>,
    functions: &[FunctionSignature],
    resume: Option<usize>,
    config: &Config,
) -> Option<DocBlock> {
    let lines = &source.lines;
    let (start, scan_from) = match source.kind {
        FileKind::PlainScript => (find_script_start(lines, source.name, config.comment)?, 0),
        FileKind::ClassFile => {
            let start = find_class_start(lines, functions, resume, config.comment)?;
            (start, start)
        }
    };
    let end = find_end(lines, scan_from, config).unwrap_or(start);
    let block = DocBlock::new(start, end);
    debug!(file = source.name, start, end = block.end, "located documentation block");
    Some(block)
}
