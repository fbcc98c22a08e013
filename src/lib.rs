//! comment2md — generate Markdown documentation pages from the comment
//! blocks of MATLAB scripts and classes.
//!
//! The [`extract`] pipeline locates each documentation block, strips the
//! comment syntax and turns "see also" entries into links relative to the
//! generated page layout. [`discover`] finds the sources and decides which
//! page each one belongs to.

pub mod config;
pub mod discover;
pub mod error;
pub mod extract;
pub mod model;

pub use config::Config;
pub use error::{Error, Result};
pub use extract::links::{LinkTarget, ReferenceIndex};
pub use extract::Extractor;
pub use model::{Diagnostic, DocBlock, FileKind, Outcome, SourceFile};
