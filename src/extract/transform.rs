//! Content transformer — turns raw comment lines into Markdown text.

use crate::config::Config;

/// Admonition opening a see-also section.
pub const SEE_ALSO_HEADER: &str = "!!! info \"See Also\"";

const INDENT: &str = "    ";

/// A block line after normalization.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Line {
    Blank,
    /// The "see also" line itself; never emitted verbatim.
    SeeAlso,
    Text(String),
}

/// Strip comment syntax from one raw line.
///
/// Removes block-comment closers, leading comment markers and whitespace,
/// trailing whitespace, then expands the indent placeholder. Markers at the
/// end of a line are prose (`50%`) and stay.
pub fn normalize(raw: &str, config: &Config) -> String {
    let comment = config.comment;
    let closer = format!("{comment}}}");
    let line = raw.replace(&closer, "");
    let line = line
        .trim_start_matches(|c: char| c == ' ' || c == comment)
        .trim();
    if config.placeholder.is_empty() {
        return line.to_owned();
    }
    line.replace(&config.placeholder, INDENT)
}

/// Normalize and classify one raw line.
pub fn transform(raw: &str, config: &Config) -> Line {
    let text = normalize(raw, config);
    if text.is_empty() {
        Line::Blank
    } else if text.to_lowercase().contains("see also") {
        Line::SeeAlso
    } else {
        Line::Text(text)
    }
}
