// src/cli.rs
use std::{env, path::PathBuf};

use color_eyre::eyre::{Result, bail, eyre};

use crate::core::session::{Credentials, JobRequest, Session};
use crate::csv::Delim;
use crate::export;
use crate::params::{DEFAULT_ALGORITHM_VERSION, PASS_ENV, Params, USER_ENV};

pub fn run() -> Result<()> {
    let params = parse_cli(env::args().skip(1))?;
    let credentials = resolve_credentials(&params)?;
    let session = Session::login(&credentials)?;

    if let Some(job) = &params.submit {
        session.submit_reverse_job(job)?;
        println!("Submitted job {:?}; fetch results once it has computed.", job.title);
        return Ok(());
    }

    let records = session.fetch_results()?;

    match &params.out {
        Some(path) => {
            export::export_start_sites(path, &records, params.format)?;
            println!("Wrote {}", path.display());
        }
        None => {
            for record in &records {
                println!("{record}");
                println!();
            }
        }
    }
    Ok(())
}

fn parse_cli(args: impl Iterator<Item = String>) -> Result<Params> {
    let mut params = Params::new();
    let mut args = args;

    let mut submit = false;
    let mut title: Option<String> = None;
    let mut mrna: Option<String> = None;
    let mut organism: Option<String> = None;
    let mut algo_version: Option<String> = None;

    while let Some(a) = args.next() {
        match a.as_str() {
            "-u" | "--user" => params.user = Some(args.next().ok_or_else(|| eyre!("Missing value for --user"))?),
            "-p" | "--pass" => params.pass = Some(args.next().ok_or_else(|| eyre!("Missing value for --pass"))?),
            "-o" | "--out" => {
                params.out = Some(PathBuf::from(args.next().ok_or_else(|| eyre!("Missing output path"))?));
            }
            "--format" => {
                let v = args.next().ok_or_else(|| eyre!("Missing value for --format"))?;
                params.format = match v.to_ascii_lowercase().as_str() {
                    "csv" => Delim::Csv,
                    "tsv" => Delim::Tsv,
                    other => bail!("Unknown format: {}", other),
                };
            }
            "--submit" => submit = true,
            "--title" => title = Some(args.next().ok_or_else(|| eyre!("Missing value for --title"))?),
            "--mrna" => mrna = Some(args.next().ok_or_else(|| eyre!("Missing value for --mrna"))?),
            "--organism" => organism = Some(args.next().ok_or_else(|| eyre!("Missing value for --organism"))?),
            "--algo-version" => {
                algo_version = Some(args.next().ok_or_else(|| eyre!("Missing value for --algo-version"))?);
            }
            "-h" | "--help" => {
                eprintln!(include_str!("cli_help.txt"));
                std::process::exit(0);
            }
            _ => bail!("Unknown arg: {}", a),
        }
    }

    if submit {
        let (Some(title), Some(mrna), Some(organism)) = (title, mrna, organism) else {
            bail!("--submit requires --title, --mrna and --organism");
        };
        params.submit = Some(JobRequest {
            title,
            mrna,
            organism,
            algorithm_version: algo_version.unwrap_or_else(|| s!(DEFAULT_ALGORITHM_VERSION)),
        });
    } else if title.is_some() || mrna.is_some() || organism.is_some() || algo_version.is_some() {
        bail!("--title/--mrna/--organism/--algo-version only apply with --submit");
    }

    Ok(params)
}

fn resolve_credentials(params: &Params) -> Result<Credentials> {
    let user = params
        .user
        .clone()
        .or_else(|| env::var(USER_ENV).ok())
        .ok_or_else(|| eyre!("No user name: pass --user or set {USER_ENV}"))?;
    let pass = params
        .pass
        .clone()
        .or_else(|| env::var(PASS_ENV).ok())
        .ok_or_else(|| eyre!("No password: pass --pass or set {PASS_ENV}"))?;
    Ok(Credentials { user, pass })
}
