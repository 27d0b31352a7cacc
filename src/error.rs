// src/error.rs
use thiserror::Error;

/// Failures while interpreting the results page.
///
/// `ShapeMismatch` is the only recoverable kind: dispatch in
/// `results::collect` answers it by handing the pair to the next parser.
/// Everything else aborts the batch.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ScrapeError {
    #[error("job type {label:?} does not match this parser")]
    ShapeMismatch { label: String },

    #[error("job kind {label:?} is known but not supported")]
    Unimplemented { label: String },

    #[error("job {job:?}: {detail}")]
    MalformedField { job: String, detail: String },

    #[error("results page structure violated: {detail}")]
    StructuralMismatch { detail: String },
}

/// Failures at the session/network boundary.
#[derive(Debug, Error)]
pub enum SessionError {
    #[error("http request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("form with action {action:?} not found")]
    FormNotFound { action: String },

    #[error("cannot resolve form action {action:?} against {base:?}")]
    BadUrl { action: String, base: String },

    #[error(transparent)]
    Scrape(#[from] ScrapeError),
}
