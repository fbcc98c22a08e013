//! Extraction pipeline — boundary, transform and link stages.
//!
//! Blocks are located one at a time. A class file yields one block per
//! documented method; each step resumes after the previous block's header
//! until the last function definition has been passed.

pub mod boundary;
pub mod links;
pub mod transform;

use crate::config::Config;
use crate::error::Result;
use crate::model::{DocBlock, Diagnostic, FileKind, FunctionSignature, Outcome, SourceFile};
use links::{LinkTarget, ReferenceIndex};
use std::io::Write;
use tracing::debug;
use transform::{Line, SEE_ALSO_HEADER};

/// Horizontal rule separating consecutive blocks on one page.
pub const SEPARATOR: &str = "-------";

/// One located block and whether it produced output.
#[derive(Debug)]
pub struct Step {
    pub block: DocBlock,
    pub written: bool,
    pub diagnostics: Vec<Diagnostic>,
}

impl Step {
    /// Resume index for the following step.
    pub fn resume(&self) -> usize {
        self.block.start
    }
}

/// Renders documentation blocks of source files into a Markdown sink.
///
/// The sink is only ever appended to; opening and closing it is the
/// caller's business, once per page.
pub struct Extractor<'a> {
    config: &'a Config,
    index: &'a dyn ReferenceIndex,
}

impl<'a> Extractor<'a> {
    pub fn new(config: &'a Config, index: &'a dyn ReferenceIndex) -> Self {
        Self { config, index }
    }

    /// Append every block of `source` to `sink`.
    ///
    /// `first` tells whether the sink has not received a block yet; only
    /// later blocks are preceded by a separator.
    pub fn extract<W: Write>(
        &self,
        source: &SourceFile<'_>,
        target: &LinkTarget,
        sink: &mut W,
        first: bool,
    ) -> Result<Outcome> {
        let functions = match source.kind {
            FileKind::ClassFile => boundary::function_signatures(&source.lines),
            FileKind::PlainScript => Vec::new(),
        };
        let mut outcome = Outcome::default();
        let mut first = first;

        while let Some(step) = self.step(source, &functions, target, sink, first, outcome.resume)? {
            if step.written {
                outcome.blocks += 1;
                first = false;
            }
            outcome.resume = Some(step.resume());
            let more = match (source.kind, functions.last()) {
                (FileKind::ClassFile, Some(last)) => step.block.start < last.line,
                _ => false,
            };
            outcome.diagnostics.extend(step.diagnostics);
            if !more {
                break;
            }
        }

        if outcome.blocks == 0 {
            outcome.diagnostics.push(Diagnostic::MissingBlock {
                file: source.name.to_owned(),
            });
        }
        Ok(outcome)
    }

    /// Locate and render the single next block after `resume`.
    ///
    /// Returns `None` once no further block header exists.
    pub fn extract_from<W: Write>(
        &self,
        source: &SourceFile<'_>,
        target: &LinkTarget,
        sink: &mut W,
        first: bool,
        resume: Option<usize>,
    ) -> Result<Option<Step>> {
        let functions = match source.kind {
            FileKind::ClassFile => boundary::function_signatures(&source.lines),
            FileKind::PlainScript => Vec::new(),
        };
        self.step(source, &functions, target, sink, first, resume)
    }

    fn step<W: Write>(
        &self,
        source: &SourceFile<'_>,
        functions: &[FunctionSignature],
        target: &LinkTarget,
        sink: &mut W,
        first: bool,
        resume: Option<usize>,
    ) -> Result<Option<Step>> {
        let Some(block) = boundary::locate(source, functions, resume, self.config) else {
            return Ok(None);
        };
        let mut diagnostics = Vec::new();
        let written = !block.is_empty();
        if written {
            self.render_block(source, block, target, sink, first, &mut diagnostics)?;
        } else {
            debug!(file = source.name, start = block.start, "block has no content");
        }
        Ok(Some(Step {
            block,
            written,
            diagnostics,
        }))
    }

    fn render_block<W: Write>(
        &self,
        source: &SourceFile<'_>,
        block: DocBlock,
        target: &LinkTarget,
        sink: &mut W,
        first: bool,
        diagnostics: &mut Vec<Diagnostic>,
    ) -> Result<()> {
        sink.write_all(b"\n\n")?;
        if !first {
            write!(sink, "{SEPARATOR}\n\n")?;
        }

        let mut see_also = false;
        for i in block.range() {
            match transform::transform(source.lines[i], self.config) {
                Line::Blank => writeln!(sink)?,
                Line::SeeAlso => {
                    write!(sink, "\n\n{SEE_ALSO_HEADER}\n")?;
                    see_also = true;
                }
                Line::Text(text) if see_also => {
                    match links::resolve(&text, target, self.index, self.config) {
                        Some(link) => writeln!(sink, "{link}")?,
                        None => diagnostics.push(Diagnostic::UnresolvedReference {
                            file: source.name.to_owned(),
                            line: i + 1,
                        }),
                    }
                }
                Line::Text(text) => writeln!(sink, "{text}")?,
            }
        }

        sink.write_all(b"\n\n\n")?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::collections::BTreeMap;
    use std::path::PathBuf;

    fn index() -> BTreeMap<String, PathBuf> {
        BTreeMap::from([
            ("bar".to_owned(), PathBuf::from("utils/bar.m")),
            ("play".to_owned(), PathBuf::from("experiment/play.m")),
        ])
    }

    fn run(name: &str, rel: &str, content: &str, kind: FileKind, first: bool) -> (String, Outcome) {
        let config = Config::default();
        let index = index();
        let extractor = Extractor::new(&config, &index);
        let source = SourceFile::new(name, content, kind);
        let target = LinkTarget::new(rel, &config);
        let mut sink = Vec::new();
        let outcome = extractor.extract(&source, &target, &mut sink, first).unwrap();
        (String::from_utf8(sink).unwrap(), outcome)
    }

    #[test]
    fn plain_script_block() {
        let (out, outcome) = run(
            "foo",
            "utils/foo.m",
            "% foo\n% Does a thing.\n% end of documentation\nx = 1;\n",
            FileKind::PlainScript,
            true,
        );
        assert_eq!(out, "\n\nfoo\nDoes a thing.\n\n\n\n");
        assert_eq!(outcome.blocks, 1);
        assert_eq!(outcome.resume, Some(0));
        assert!(outcome.diagnostics.is_empty());
    }

    #[test]
    fn later_blocks_get_separator() {
        let (out, _) = run(
            "foo",
            "utils/foo.m",
            "% foo\n% Does a thing.\n% end of documentation\n",
            FileKind::PlainScript,
            false,
        );
        assert!(out.starts_with("\n\n-------\n\nfoo\n"));
    }

    #[test]
    fn missing_header_is_reported() {
        let (out, outcome) = run(
            "foo",
            "utils/foo.m",
            "x = 1;\n% just a comment\n",
            FileKind::PlainScript,
            true,
        );
        assert!(out.is_empty());
        assert_eq!(
            outcome.diagnostics,
            vec![Diagnostic::MissingBlock { file: "foo".into() }]
        );
    }

    #[test]
    fn see_also_section() {
        let content = concat!(
            "% ### foo\n",
            "% Does a thing.\n",
            "%\n",
            "% See also:\n",
            "% bar\n",
            "% missingfile\n",
            "% Stim.generate\n",
            "% * [Guide](https://example.com)\n",
            "% end of documentation\n",
        );
        let (out, outcome) = run("foo", "experiment/foo.m", content, FileKind::PlainScript, true);
        let expected = concat!(
            "\n\n",
            "### foo\n",
            "Does a thing.\n",
            "\n",
            "\n\n!!! info \"See Also\"\n",
            "    * [bar](../utils/#bar)\n",
            "    * [Stim.generate](../stimgen/Stim/#generate)\n",
            "    * [Guide](https://example.com)\n",
            "\n\n\n",
        );
        assert_eq!(out, expected);
        assert_eq!(
            outcome.diagnostics,
            vec![Diagnostic::UnresolvedReference {
                file: "foo".into(),
                line: 6
            }]
        );
    }

    const CLASS: &str = concat!(
        "classdef FooStimulusGeneration < AbstractStimulusGenerationMethod\n", // 0
        "    methods\n",                                                     // 1
        "        function self = FooStimulusGeneration(options)\n",          // 2
        "            % ### FooStimulusGeneration\n",                         // 3
        "            % Constructor.\n",                                      // 4
        "            % See also:\n",                                         // 5
        "            % FooStimulusGeneration.generate_stimulus\n",           // 6
        "            % end of documentation\n",                              // 7
        "            self.n = 1;\n",                                         // 8
        "        end\n",                                                     // 9
        "        function [y, s] = generate_stimulus(self)\n",               // 10
        "            % ### generate_stimulus\n",                             // 11
        "            % Builds one stimulus.\n",                              // 12
        "            % end of documentation\n",                              // 13
        "            y = 1;\n",                                              // 14
        "        end\n",                                                     // 15
        "    end\n",                                                         // 16
        "end\n",                                                            // 17
    );

    #[test]
    fn class_file_yields_block_per_method() {
        let (out, outcome) = run(
            "FooStimulusGeneration",
            "stimulus_generation/FooStimulusGeneration.m",
            CLASS,
            FileKind::ClassFile,
            true,
        );
        let expected = concat!(
            "\n\n",
            "### FooStimulusGeneration\n",
            "Constructor.\n",
            "\n\n!!! info \"See Also\"\n",
            "    * [FooStimulusGeneration.generate_stimulus](../FooStimulusGeneration/#generate_stimulus)\n",
            "\n\n\n",
            "\n\n-------\n\n",
            "### generate_stimulus\n",
            "Builds one stimulus.\n",
            "\n\n\n",
        );
        assert_eq!(out, expected);
        assert_eq!(outcome.blocks, 2);
        assert_eq!(outcome.resume, Some(11));
        assert!(outcome.diagnostics.is_empty());
    }

    #[test]
    fn see_also_name_never_starts_a_block() {
        let content = concat!(
            "x = 0;\n",
            "function a = first(x)\n",
            "% ### first\n",
            "% See also:\n",
            "% second\n",
            "% end of documentation\n",
            "a = x;\n",
            "function b = second(x)\n",
            "% ### second\n",
            "% Second one.\n",
            "% end of documentation\n",
            "b = x;\n",
        );
        let config = Config::default();
        let index = index();
        let extractor = Extractor::new(&config, &index);
        let source = SourceFile::new("Both", content, FileKind::ClassFile);
        let target = LinkTarget::new("stimulus_generation/Both.m", &config);
        let mut sink = Vec::new();

        let step = extractor
            .extract_from(&source, &target, &mut sink, true, None)
            .unwrap()
            .unwrap();
        assert_eq!(step.block, DocBlock { start: 2, end: 5 });
        let step = extractor
            .extract_from(&source, &target, &mut sink, false, Some(step.resume()))
            .unwrap()
            .unwrap();
        assert_eq!(step.block, DocBlock { start: 8, end: 10 });
        assert!(extractor
            .extract_from(&source, &target, &mut sink, false, Some(step.resume()))
            .unwrap()
            .is_none());
    }

    #[test]
    fn diagnostics_collected_across_blocks() {
        let content = concat!(
            "classdef QuxStimulusGeneration\n",
            "    function a = first(self)\n",
            "        % ### first\n",
            "        % See also:\n",
            "        % nowhere\n",
            "        % end of documentation\n",
            "    end\n",
            "    function b = second(self)\n",
            "        % ### second\n",
            "        % See also:\n",
            "        % elsewhere\n",
            "        % end of documentation\n",
            "    end\n",
        );
        let (_, outcome) = run(
            "QuxStimulusGeneration",
            "stimulus_generation/QuxStimulusGeneration.m",
            content,
            FileKind::ClassFile,
            true,
        );
        assert_eq!(outcome.blocks, 2);
        assert_eq!(outcome.resume, Some(8));
        assert_eq!(
            outcome.diagnostics,
            vec![
                Diagnostic::UnresolvedReference { file: "QuxStimulusGeneration".into(), line: 5 },
                Diagnostic::UnresolvedReference { file: "QuxStimulusGeneration".into(), line: 11 },
            ]
        );
    }

    #[test]
    fn class_without_documented_methods() {
        let (out, outcome) = run(
            "BareStimulusGeneration",
            "stimulus_generation/BareStimulusGeneration.m",
            "classdef Bare\n    function run(self)\n    end\nend\n",
            FileKind::ClassFile,
            true,
        );
        assert!(out.is_empty());
        assert_eq!(outcome.blocks, 0);
        assert_eq!(outcome.diagnostics.len(), 1);
    }

    #[test]
    fn placeholder_lines_keep_indent() {
        let (out, _) = run(
            "foo",
            "utils/foo.m",
            "% foo\n% Example:\n% XXXXy = foo(1);\n% end of documentation\n",
            FileKind::PlainScript,
            true,
        );
        assert!(out.contains("Example:\n    y = foo(1);\n"));
    }
}
