// src/export.rs

// Start-site table export: one merged table over all completed jobs,
// one row per predicted start site.

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

use crate::csv::{Delim, write_row};
use crate::results::JobRecord;

const HEADERS: [&str; 9] = [
    "Job",
    "Position",
    "TIR (au)",
    "dG total",
    "dG mRNA-rRNA",
    "dG spacing",
    "dG standby",
    "dG start",
    "dG mRNA",
];

pub fn export_start_sites(
    path: &Path,
    records: &[JobRecord],
    delim: Delim,
) -> io::Result<()> {
    let mut w = BufWriter::new(File::create(path)?);
    write_start_sites(&mut w, records, delim)
}

pub fn write_start_sites<W: Write>(
    w: &mut W,
    records: &[JobRecord],
    delim: Delim,
) -> io::Result<()> {
    let sep = delim.sep();
    let headers: Vec<String> = HEADERS.iter().map(|h| s!(*h)).collect();
    write_row(&mut *w, &headers, sep)?;

    for record in records {
        let JobRecord::Reverse(job) = record;
        for site in &job.start_sites {
            let row = vec![
                job.name.clone(),
                site.position.to_string(),
                site.tir.to_string(),
                site.delta_g_total.to_string(),
                site.delta_g_mrna_rrna.to_string(),
                site.delta_g_spacing.to_string(),
                site.delta_g_standby.to_string(),
                site.delta_g_start.to_string(),
                site.delta_g_mrna.to_string(),
            ];
            write_row(&mut *w, &row, sep)?;
        }
    }
    Ok(())
}
