//! comment2md — generate Markdown documentation from commented MATLAB sources.
//!
//! Two modes:
//!
//! - **site mode**: `comment2md -r . -o docs` renders every script under
//!   `<root>/code` into one page per directory and one page per class.
//! - **stdout mode**: `comment2md code/utils/foo.m` prints the rendered
//!   blocks of the given files.

use anyhow::{Context, Result};
use clap::Parser;
use comment2md::discover::{self, ScriptIndex};
use comment2md::{Config, Extractor, FileKind, LinkTarget, Outcome, SourceFile};
use std::collections::BTreeMap;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "comment2md",
    version,
    about = "Generate Markdown documentation from comment blocks in MATLAB scripts and classes"
)]
struct Cli {
    /// Files to render to stdout (glob patterns supported). If omitted, the
    /// whole source tree is rendered into --output.
    files: Vec<String>,

    /// Repository root; sources are searched below <root>/<source_dir>
    #[arg(short = 'r', long, default_value = ".")]
    root: PathBuf,

    /// Output directory for generated pages (required without files)
    #[arg(short = 'o', long)]
    output: Option<PathBuf>,

    /// TOML configuration file
    #[arg(short = 'c', long)]
    config: Option<PathBuf>,

    /// Treat the given files as class files
    #[arg(long)]
    class: bool,

    /// Log progress at info level
    #[arg(short = 'v', long)]
    verbose: bool,
}

/// A source file queued for rendering.
struct Entry {
    path: PathBuf,
    rel: PathBuf,
    kind: FileKind,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // --verbose forces INFO, otherwise RUST_LOG or WARN
    let filter = if cli.verbose {
        EnvFilter::new("info")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();

    let config = match cli.config.as_deref() {
        Some(path) => Config::load(path)
            .with_context(|| format!("failed to load config: {}", path.display()))?,
        None => Config::default(),
    };

    let source_root = cli.root.join(&config.source_dir);
    let sources = if source_root.is_dir() {
        discover::discover(&source_root, &config)?
    } else {
        Vec::new()
    };
    let index = ScriptIndex::build(&source_root, &sources);
    debug!(scripts = index.len(), root = %source_root.display(), "indexed sources");
    let extractor = Extractor::new(&config, &index);

    if cli.files.is_empty() {
        return site_mode(&cli, &config, &extractor, &source_root, sources);
    }

    stdout_mode(&cli, &config, &extractor, &source_root)
}

/// site mode: one sink per page, written once all its files are rendered.
fn site_mode(
    cli: &Cli,
    config: &Config,
    extractor: &Extractor<'_>,
    source_root: &Path,
    sources: Vec<PathBuf>,
) -> Result<()> {
    let output_dir = cli
        .output
        .as_deref()
        .context("--output is required when no files are given")?;

    if sources.is_empty() {
        warn!("no .{} files found under {}", config.extension, source_root.display());
    }

    let mut pages: BTreeMap<PathBuf, Vec<Entry>> = BTreeMap::new();
    for path in sources {
        let rel = discover::relative_path(&path, source_root);
        let kind = discover::classify(&path, config);
        let page = discover::page_for(&rel, kind, config);
        pages.entry(page).or_default().push(Entry { path, rel, kind });
    }

    for (page, entries) in pages {
        let mut sink = Vec::new();
        render_entries(config, extractor, &entries, &mut sink)?;

        if sink.is_empty() {
            debug!(page = %page.display(), "no documentation, page not written");
            continue;
        }

        let out_path = output_dir.join(&page);
        if let Some(parent) = out_path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("failed to create directory: {}", parent.display()))?;
        }
        fs::write(&out_path, &sink)
            .with_context(|| format!("failed to write {}", out_path.display()))?;
        info!(page = %out_path.display(), files = entries.len(), "wrote page");
    }

    Ok(())
}

/// stdout mode: render the named files in order to stdout.
fn stdout_mode(
    cli: &Cli,
    config: &Config,
    extractor: &Extractor<'_>,
    source_root: &Path,
) -> Result<()> {
    let entries: Vec<Entry> = expand_globs(&cli.files)?
        .into_iter()
        .map(|path| {
            let rel = discover::relative_path(&path, source_root);
            let kind = if cli.class {
                FileKind::ClassFile
            } else {
                discover::classify(&path, config)
            };
            Entry { path, rel, kind }
        })
        .collect();

    let stdout = io::stdout();
    let mut out = stdout.lock();
    render_entries(config, extractor, &entries, &mut out)?;
    out.flush().context("failed to flush stdout")?;
    Ok(())
}

/// Render `entries` into one sink; the first block written is "first".
fn render_entries<W: Write>(
    config: &Config,
    extractor: &Extractor<'_>,
    entries: &[Entry],
    sink: &mut W,
) -> Result<()> {
    let mut first = true;
    for entry in entries {
        let content = match fs::read_to_string(&entry.path) {
            Ok(content) => content,
            Err(e) => {
                warn!("skipping {}: {}", entry.path.display(), e);
                continue;
            }
        };
        let source = SourceFile::new(discover::stem(&entry.path), &content, entry.kind);
        let target = LinkTarget::new(entry.rel.clone(), config);
        let outcome = extractor
            .extract(&source, &target, &mut *sink, first)
            .with_context(|| format!("failed to render {}", entry.path.display()))?;
        report(&entry.path, &outcome);
        if outcome.blocks > 0 {
            first = false;
        }
    }
    Ok(())
}

fn report(path: &Path, outcome: &Outcome) {
    for diagnostic in &outcome.diagnostics {
        warn!(file = %path.display(), "{diagnostic}");
    }
    debug!(file = %path.display(), blocks = outcome.blocks, "rendered");
}

/// Expand glob patterns into a list of real file paths.
fn expand_globs(patterns: &[String]) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for pattern in patterns {
        let path = Path::new(pattern);
        if path.is_file() {
            files.push(path.to_path_buf());
            continue;
        }
        let matches: Vec<_> = glob::glob(pattern)
            .with_context(|| format!("invalid glob pattern: {}", pattern))?
            .filter_map(|r| r.ok())
            .filter(|p| p.is_file())
            .collect();
        if matches.is_empty() {
            warn!("no files matched: {}", pattern);
        }
        files.extend(matches);
    }
    Ok(files)
}
