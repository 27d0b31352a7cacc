// src/results/forward.rs

// Forward-design jobs appear on the results page, but their details format
// has never been mapped. Parsing one is an explicit capability gap: dispatch
// surfaces these pairs as `Unimplemented` instead of dropping them.

use crate::core::markup::Fragment;
use crate::error::ScrapeError;
use crate::results::JobRecord;

/// Always fails with `Unimplemented`, naming the pair's type label.
pub fn parse(summary: &Fragment, _details: &Fragment) -> Result<JobRecord, ScrapeError> {
    let label = summary.cell_text(1).unwrap_or_default();
    Err(ScrapeError::Unimplemented { label })
}
