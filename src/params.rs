// src/params.rs
use std::path::PathBuf;

use crate::core::session::JobRequest;
use crate::csv::Delim;

// Net config
pub const BASE_URL: &str = "https://salislab.net/software/reverse";
pub const RESULTS_URL: &str = "https://salislab.net/software/Results?method=all&resultsPerPage=50";
pub const HTTP_TIMEOUT_SECS: u64 = 15;
pub const USER_AGENT: &str = concat!("rbscalc/", env!("CARGO_PKG_VERSION"));

// Form actions on the reverse-engineering page
pub const LOGIN_ACTION: &str = "doLogin";
pub const SUBMIT_ACTION: &str = "doReverseRBS";

// Results page structure
pub const RESULTS_CONTAINER_ID: &str = "ResultsContainer";
pub const SUMMARY_ID_PATTERN: &str = r"^result_summary_\d+$";
pub const DETAILS_ID_PATTERN: &str = r"^result_details_\d+$";
pub const START_CODON_ID_PATTERN: &str = r"^start_codon_\d+_\d+$";

// Submission defaults
pub const DEFAULT_ALGORITHM_VERSION: &str = "v2.0";

// Credential env vars (CLI fallback when --user/--pass are absent)
pub const USER_ENV: &str = "RBSCALC_USER";
pub const PASS_ENV: &str = "RBSCALC_PASS";

#[derive(Clone)]
pub struct Params {
    pub user: Option<String>,       // account user name
    pub pass: Option<String>,       // account password
    pub submit: Option<JobRequest>, // submit a job instead of fetching results
    pub out: Option<PathBuf>,       // write start-site table here instead of stdout
    pub format: Delim,
}

impl Params {
    pub fn new() -> Self {
        Self {
            user: None,
            pass: None,
            submit: None,
            out: None,
            format: Delim::Csv,
        }
    }
}

impl Default for Params {
    fn default() -> Self {
        Self::new()
    }
}
