//! Library error type.
//!
//! Only conditions that stop a run are errors. Missing documentation and
//! unresolved see-also entries are reported as
//! [`Diagnostic`](crate::model::Diagnostic)s instead. Configuration
//! loading has its own [`ConfigError`](crate::config::ConfigError).

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid glob pattern: {0}")]
    Pattern(#[from] glob::PatternError),
}

pub type Result<T> = std::result::Result<T, Error>;
