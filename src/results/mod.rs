// src/results/mod.rs

// Results page extraction. The page pairs a one-line summary row with a
// multi-row details block per job, joined by a shared numeric id suffix;
// this module pairs them up and dispatches each pair to a record parser.

pub mod forward;
pub mod reverse;

use std::fmt;
use std::sync::LazyLock;

use regex::Regex;

use crate::core::markup::Page;
use crate::error::ScrapeError;
use crate::params::{DETAILS_ID_PATTERN, RESULTS_CONTAINER_ID, SUMMARY_ID_PATTERN};

pub use reverse::{ReverseJob, StartSite};

static SUMMARY_ID: LazyLock<Regex> = LazyLock::new(|| Regex::new(SUMMARY_ID_PATTERN).unwrap());
static DETAILS_ID: LazyLock<Regex> = LazyLock::new(|| Regex::new(DETAILS_ID_PATTERN).unwrap());

/// One parsed job from the results page.
///
/// Forward-design jobs exist on the service but have no parser yet; they
/// surface as [`ScrapeError::Unimplemented`] rather than a variant here.
#[derive(Debug, Clone, PartialEq)]
pub enum JobRecord {
    Reverse(ReverseJob),
}

impl JobRecord {
    pub fn name(&self) -> &str {
        match self {
            JobRecord::Reverse(job) => &job.name,
        }
    }

    pub fn completed(&self) -> bool {
        match self {
            JobRecord::Reverse(job) => job.completed,
        }
    }
}

impl fmt::Display for JobRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            JobRecord::Reverse(job) => job.fmt(f),
        }
    }
}

/// Parse every job on the results page, in page order.
///
/// Summary and details fragments are paired by position; the two
/// pattern-matched sets mirror each other's numeric id suffixes, and a
/// count mismatch means the page no longer looks like we expect, which is
/// fatal for the whole call. Per-record failures other than the
/// shape-mismatch fallback propagate immediately, so the caller gets
/// either the full ordered list or one error naming the failing job.
pub fn collect(page: &Page) -> Result<Vec<JobRecord>, ScrapeError> {
    let container = page
        .find_by_attr("id", RESULTS_CONTAINER_ID)
        .into_iter()
        .next()
        .ok_or_else(|| structural(format!("no element with id {RESULTS_CONTAINER_ID:?}")))?;

    let summaries = container.find_by_id_pattern(&SUMMARY_ID);
    let details = container.find_by_id_pattern(&DETAILS_ID);
    if summaries.len() != details.len() {
        return Err(structural(format!(
            "{} summary rows vs {} detail blocks",
            summaries.len(),
            details.len()
        )));
    }
    logd!("results page lists {} jobs", summaries.len());

    let mut records = Vec::with_capacity(summaries.len());
    for (summary, detail) in summaries.iter().zip(details.iter()) {
        // Supported parser first; a shape mismatch means some other job
        // kind, which only the placeholder parser can claim.
        let record = match reverse::parse(summary, detail) {
            Ok(job) => JobRecord::Reverse(job),
            Err(ScrapeError::ShapeMismatch { .. }) => forward::parse(summary, detail)?,
            Err(e) => {
                loge!("results scrape failed: {e}");
                return Err(e);
            }
        };
        records.push(record);
    }
    Ok(records)
}

fn structural(detail: String) -> ScrapeError {
    ScrapeError::StructuralMismatch { detail }
}
