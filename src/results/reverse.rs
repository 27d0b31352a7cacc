// src/results/reverse.rs

// Parser for "RBS Rev. Eng." jobs: one summary row plus one details block
// per job, as rendered on the service's results page.

use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

use regex::Regex;

use crate::core::markup::Fragment;
use crate::error::ScrapeError;
use crate::params::START_CODON_ID_PATTERN;

/// Type label the service prints in the second summary cell.
pub const TYPE_LABEL: &str = "RBS Rev. Eng.";

/// Summary text of a job the service has not finished computing.
const NOT_COMPLETED: &str = "Not Completed Yet";

// Fixed screen labels on the details metadata cells. Wording is part of
// the page contract; tests pin the exact literals.
const SUBMITTED_LABEL: &str = "Submitted: ";
const CPU_TIME_LABEL: &str = "CPU Time: ";
const ORGANISM_LABEL: &str = "Organism: ";
const VERSION_LABEL: &str = "Version: ";

/// A start-site row carries exactly this many cells.
const START_SITE_CELLS: usize = 11;

static START_CODON_ID: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(START_CODON_ID_PATTERN).unwrap());

/// One reverse-engineering job as listed on the results page.
#[derive(Debug, Clone, PartialEq)]
pub struct ReverseJob {
    pub name: String,
    /// One-line result, e.g. "8 start codons from 3.50 to 4077.50 T.I.R",
    /// or the literal "Not Completed Yet" while the job is queued.
    pub summary: String,
    pub completed: bool,
    pub submitted_date: String,
    pub cpu_time: String,
    pub organism: String,
    pub algorithm_version: String,
    /// Present only once the job completed.
    pub sequence: Option<String>,
    /// One entry per predicted start site, in page order. Empty unless
    /// the job completed.
    pub start_sites: Vec<StartSite>,
}

/// One predicted translation initiation site of a completed job.
#[derive(Debug, Clone, PartialEq)]
pub struct StartSite {
    pub position: i64,
    /// Translation initiation rate (au).
    pub tir: f64,
    pub delta_g_total: f64,
    pub delta_g_mrna_rrna: f64,
    pub delta_g_spacing: f64,
    pub delta_g_standby: f64,
    pub delta_g_start: f64,
    pub delta_g_mrna: f64,
}

/// Parse one (summary, details) pair into a `ReverseJob`.
///
/// Fails `ShapeMismatch` when the pair's type label is not
/// [`TYPE_LABEL`]; any other failure is fatal for the record.
pub fn parse(summary: &Fragment, details: &Fragment) -> Result<ReverseJob, ScrapeError> {
    // Summary row cells:
    //   0  expand/collapse control
    //   1  job type label
    //   2  job name
    //   3  one-line result summary
    //   4  delete button
    let label = summary.cell_text(1).unwrap_or_default();
    if label != TYPE_LABEL {
        return Err(ScrapeError::ShapeMismatch { label });
    }

    let name = summary
        .cell_text(2)
        .ok_or_else(|| malformed(TYPE_LABEL, "summary row has no name cell"))?;
    let summary_text = summary
        .cell_text(3)
        .ok_or_else(|| malformed(&name, "summary row has no result cell"))?;
    let completed = summary_text != NOT_COMPLETED;

    // Details rows:
    //   0  submitted date / CPU time / organism (three cells)
    //   1  algorithm version
    //   2  "mRNA sequence" heading          | present only once
    //   3  the mRNA sequence                | the job completed
    //   4  column headings
    //   5+ one row per start site, id start_codon_<job>_<n>
    // An unfinished job renders only the first two rows.
    let rows = details.child_rows();
    let meta = rows
        .first()
        .ok_or_else(|| malformed(&name, "details block has no metadata row"))?;

    let submitted_date = strip_label(&name, meta.cell_text(0), SUBMITTED_LABEL)?;
    let cpu_time = strip_label(&name, meta.cell_text(1), CPU_TIME_LABEL)?;
    let organism = strip_label(&name, meta.cell_text(2), ORGANISM_LABEL)?;
    let algorithm_version = strip_label(&name, rows.get(1).map(|r| r.text()), VERSION_LABEL)?;

    let (sequence, start_sites) = if completed {
        let sequence = rows
            .get(3)
            .map(|r| r.text())
            .ok_or_else(|| malformed(&name, "completed job has no sequence row"))?;
        let start_sites = details
            .find_by_id_pattern(&START_CODON_ID)
            .iter()
            .map(|row| parse_start_site(&name, row))
            .collect::<Result<Vec<_>, _>>()?;
        (Some(sequence), start_sites)
    } else {
        (None, Vec::new())
    };

    Ok(ReverseJob {
        name,
        summary: summary_text,
        completed,
        submitted_date,
        cpu_time,
        organism,
        algorithm_version,
        sequence,
        start_sites,
    })
}

/// Parse one start-site row.
fn parse_start_site(job: &str, row: &Fragment) -> Result<StartSite, ScrapeError> {
    // Start-site row cells:
    //   0  spacer
    //   1  start position
    //   2  translation initiation rate (au)
    //   3  dG total
    //   4  dG mRNA-rRNA
    //   5  dG spacing
    //   6  dG standby
    //   7  dG start
    //   8  dG mRNA
    //   9  mRNA structure link
    //  10  accuracy details and warnings
    let cells = row.cells();
    if cells.len() != START_SITE_CELLS {
        return Err(malformed(
            job,
            format!("start-site row has {} cells, expected {START_SITE_CELLS}", cells.len()),
        ));
    }

    Ok(StartSite {
        position: parse_num(job, "start position", &cells[1])?,
        tir: parse_num(job, "translation initiation rate", &cells[2])?,
        delta_g_total: parse_num(job, "dG total", &cells[3])?,
        delta_g_mrna_rrna: parse_num(job, "dG mRNA-rRNA", &cells[4])?,
        delta_g_spacing: parse_num(job, "dG spacing", &cells[5])?,
        delta_g_standby: parse_num(job, "dG standby", &cells[6])?,
        delta_g_start: parse_num(job, "dG start", &cells[7])?,
        delta_g_mrna: parse_num(job, "dG mRNA", &cells[8])?,
    })
}

/* ---------- field extraction ---------- */

/// Cut the fixed screen label off a cell. If the wording drifted, fail
/// loudly instead of shipping truncated data.
fn strip_label(job: &str, cell: Option<String>, label: &str) -> Result<String, ScrapeError> {
    let text = cell.ok_or_else(|| malformed(job, format!("missing cell for {label:?}")))?;
    match text.strip_prefix(label) {
        Some(rest) => Ok(s!(rest)),
        None => Err(malformed(job, format!("expected text starting with {label:?}, got {text:?}"))),
    }
}

fn parse_num<T: FromStr>(job: &str, field: &str, text: &str) -> Result<T, ScrapeError> {
    text.parse()
        .map_err(|_| malformed(job, format!("{field} cell {text:?} is not numeric")))
}

fn malformed(job: &str, detail: impl Into<String>) -> ScrapeError {
    ScrapeError::MalformedField { job: s!(job), detail: detail.into() }
}

/* ---------- text rendering ---------- */

impl fmt::Display for ReverseJob {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Name: {}", self.name)?;
        if self.completed {
            writeln!(f, "Summary: {}", self.summary)?;
            writeln!(f, "Submitted: {}", self.submitted_date)?;
            writeln!(f, "CPU Time: {}", self.cpu_time)?;
            writeln!(f, "Organism: {}", self.organism)?;
            writeln!(f, "Version: {}", self.algorithm_version)?;
            writeln!(f, "mRNA Sequence: {}", self.sequence.as_deref().unwrap_or(""))?;
            write!(f, "Start codons: (list of {})", self.start_sites.len())
        } else {
            writeln!(f, "(Job has not been completed)")?;
            writeln!(f, "CPU Time: {}", self.cpu_time)?;
            writeln!(f, "Organism: {}", self.organism)?;
            write!(f, "Version: {}", self.algorithm_version)
        }
    }
}

impl fmt::Display for StartSite {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Start Position: {}", self.position)?;
        writeln!(f, "Translation Initiation Rate (au): {}", self.tir)?;
        writeln!(f, "DeltaG_total: {}", self.delta_g_total)?;
        writeln!(f, "DeltaG_mRNA_rRNA: {}", self.delta_g_mrna_rrna)?;
        writeln!(f, "DeltaG_spacing: {}", self.delta_g_spacing)?;
        writeln!(f, "DeltaG_standby: {}", self.delta_g_standby)?;
        writeln!(f, "DeltaG_start: {}", self.delta_g_start)?;
        write!(f, "DeltaG_mRNA: {}", self.delta_g_mrna)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::markup::Page;

    fn first_pair(page: &Page) -> (Fragment<'_>, Fragment<'_>) {
        let summary = page.find_by_attr("id", "s")[0];
        let details = page.find_by_attr("id", "d")[0];
        (summary, details)
    }

    fn summary_row(label: &str, name: &str, result: &str) -> String {
        format!(
            r#"<tr id="s"><td>+</td><td>{label}</td><td>{name}</td><td>{result}</td><td>X</td></tr>"#
        )
    }

    const PENDING_DETAILS: &str = r#"
        <tr id="d"><td><table>
          <tr><td>Submitted: 2021-01-01</td><td>CPU Time: 3.2s</td><td>Organism: E. coli</td></tr>
          <tr><td>Version: v2.0</td></tr>
        </table></td></tr>
    "#;

    fn page(summary: &str, details: &str) -> Page {
        Page::parse(&format!("<table>{summary}{details}</table>"))
    }

    fn site_row(id: &str, cells: &[&str]) -> String {
        let tds: String = cells.iter().map(|c| format!("<td>{c}</td>")).collect();
        format!(r#"<tr id="{id}">{tds}</tr>"#)
    }

    #[test]
    fn label_literals_are_pinned() {
        // Positional contract with the page: fixed wording, fixed lengths.
        assert_eq!(SUBMITTED_LABEL, "Submitted: ");
        assert_eq!(SUBMITTED_LABEL.len(), 11);
        assert_eq!(CPU_TIME_LABEL, "CPU Time: ");
        assert_eq!(CPU_TIME_LABEL.len(), 10);
        assert_eq!(ORGANISM_LABEL, "Organism: ");
        assert_eq!(ORGANISM_LABEL.len(), 10);
        assert_eq!(VERSION_LABEL, "Version: ");
        assert_eq!(VERSION_LABEL.len(), 9);
    }

    #[test]
    fn pending_job_has_no_sequence_or_sites() {
        let page = page(
            &summary_row(TYPE_LABEL, "JobX", "Not Completed Yet"),
            PENDING_DETAILS,
        );
        let (s, d) = first_pair(&page);
        let job = parse(&s, &d).unwrap();
        assert_eq!(job.name, "JobX");
        assert!(!job.completed);
        assert_eq!(job.sequence, None);
        assert!(job.start_sites.is_empty());
    }

    #[test]
    fn metadata_labels_are_stripped() {
        let page = page(
            &summary_row(TYPE_LABEL, "JobX", "Not Completed Yet"),
            PENDING_DETAILS,
        );
        let (s, d) = first_pair(&page);
        let job = parse(&s, &d).unwrap();
        assert_eq!(job.submitted_date, "2021-01-01");
        assert_eq!(job.cpu_time, "3.2s");
        assert_eq!(job.organism, "E. coli");
        assert_eq!(job.algorithm_version, "v2.0");
    }

    #[test]
    fn completed_job_parses_sites_in_order() {
        let details = format!(
            r#"<tr id="d"><td><table>
                <tr><td>Submitted: 2021-01-01</td><td>CPU Time: 3.2s</td><td>Organism: E. coli</td></tr>
                <tr><td>Version: v2.0</td></tr>
                <tr><td>mRNA sequence</td></tr>
                <tr><td>ATGGCTAGCAAAGGAG</td></tr>
                <tr><td>headings</td></tr>
                {}
                {}
                <tr><td>All Gibbs free energies are in kcal/mol</td></tr>
            </table></td></tr>"#,
            site_row("start_codon_7_1", &["", "120", "450000.0", "-5.1", "-3.2", "-1.0", "-0.5", "-2.0", "-4.4", "view", "ok"]),
            site_row("start_codon_7_2", &["", "201", "12.5", "1.0", "0.2", "0.0", "-0.1", "0.4", "0.5", "view", "ok"]),
        );
        let page = page(
            &summary_row(TYPE_LABEL, "JobY", "2 start codons from 12.50 to 450000.00 T.I.R"),
            &details,
        );
        let (s, d) = first_pair(&page);
        let job = parse(&s, &d).unwrap();
        assert!(job.completed);
        assert_eq!(job.sequence.as_deref(), Some("ATGGCTAGCAAAGGAG"));
        assert_eq!(job.start_sites.len(), 2);

        let site = &job.start_sites[0];
        assert_eq!(site.position, 120);
        assert_eq!(site.tir, 450000.0);
        assert_eq!(site.delta_g_total, -5.1);
        assert_eq!(site.delta_g_mrna_rrna, -3.2);
        assert_eq!(site.delta_g_spacing, -1.0);
        assert_eq!(site.delta_g_standby, -0.5);
        assert_eq!(site.delta_g_start, -2.0);
        assert_eq!(site.delta_g_mrna, -4.4);
        assert_eq!(job.start_sites[1].position, 201);
    }

    #[test]
    fn foreign_type_label_is_shape_mismatch() {
        let page = page(
            &summary_row("RBS Forward Design", "JobZ", "done"),
            PENDING_DETAILS,
        );
        let (s, d) = first_pair(&page);
        let err = parse(&s, &d).unwrap_err();
        assert_eq!(err, ScrapeError::ShapeMismatch { label: s!("RBS Forward Design") });
    }

    #[test]
    fn short_start_site_row_is_malformed() {
        let details = format!(
            r#"<tr id="d"><td><table>
                <tr><td>Submitted: 2021-01-01</td><td>CPU Time: 3.2s</td><td>Organism: E. coli</td></tr>
                <tr><td>Version: v2.0</td></tr>
                <tr><td>mRNA sequence</td></tr>
                <tr><td>ATG</td></tr>
                <tr><td>headings</td></tr>
                {}
            </table></td></tr>"#,
            site_row("start_codon_7_1", &["", "120", "450000.0", "-5.1", "-3.2", "-1.0", "-0.5", "-2.0", "-4.4"]),
        );
        let page = page(&summary_row(TYPE_LABEL, "JobY", "1 start codon"), &details);
        let (s, d) = first_pair(&page);
        let err = parse(&s, &d).unwrap_err();
        assert!(matches!(err, ScrapeError::MalformedField { ref job, .. } if job == "JobY"));
        assert!(err.to_string().contains("9 cells"));
    }

    #[test]
    fn non_numeric_cell_is_malformed() {
        let details = format!(
            r#"<tr id="d"><td><table>
                <tr><td>Submitted: 2021-01-01</td><td>CPU Time: 3.2s</td><td>Organism: E. coli</td></tr>
                <tr><td>Version: v2.0</td></tr>
                <tr><td>mRNA sequence</td></tr>
                <tr><td>ATG</td></tr>
                <tr><td>headings</td></tr>
                {}
            </table></td></tr>"#,
            site_row("start_codon_7_1", &["", "abc", "450000.0", "-5.1", "-3.2", "-1.0", "-0.5", "-2.0", "-4.4", "view", "ok"]),
        );
        let page = page(&summary_row(TYPE_LABEL, "JobY", "1 start codon"), &details);
        let (s, d) = first_pair(&page);
        let err = parse(&s, &d).unwrap_err();
        assert!(err.to_string().contains("start position"));
    }

    #[test]
    fn drifted_label_wording_is_malformed() {
        let details = r#"
            <tr id="d"><td><table>
              <tr><td>Sent: 2021-01-01</td><td>CPU Time: 3.2s</td><td>Organism: E. coli</td></tr>
              <tr><td>Version: v2.0</td></tr>
            </table></td></tr>
        "#;
        let page = page(&summary_row(TYPE_LABEL, "JobX", "Not Completed Yet"), details);
        let (s, d) = first_pair(&page);
        let err = parse(&s, &d).unwrap_err();
        assert!(matches!(err, ScrapeError::MalformedField { .. }));
        assert!(err.to_string().contains("Submitted: "));
    }

    #[test]
    fn display_forms_differ_by_completion() {
        let page = page(&summary_row(TYPE_LABEL, "JobX", "Not Completed Yet"), PENDING_DETAILS);
        let (s, d) = first_pair(&page);
        let job = parse(&s, &d).unwrap();
        let text = job.to_string();
        assert!(text.contains("(Job has not been completed)"));
        assert!(!text.contains("mRNA Sequence"));
    }
}
