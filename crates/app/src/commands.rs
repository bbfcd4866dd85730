use std::io::{self, BufRead};
use std::path::PathBuf;

use anyhow::Context;
use clap::Args;
use taxsort_convert::{ConvertEngine, DestinationIndex};
use taxsort_core::TaxYear;
use taxsort_import::{group_households, load_cc_rows, ClientRoster, RosterSchema, DEFAULT_CUSTODIAN};

use crate::prompt;

#[derive(Args)]
pub struct ConvertOpts {
    /// CPA roster CSV (prompted for if omitted)
    #[arg(long)]
    pub roster: Option<PathBuf>,
    /// Folder of input PDFs named by account number
    #[arg(long)]
    pub input: Option<PathBuf>,
    /// Output root containing the per-client folder trees
    #[arg(long)]
    pub output: Option<PathBuf>,
    /// Filing year; the destination folders end with it
    #[arg(long)]
    pub year: Option<String>,
    /// TOML file describing a custom roster column layout
    #[arg(long)]
    pub schema: Option<PathBuf>,
    /// Custodian whose roster rows are kept
    #[arg(long, default_value = DEFAULT_CUSTODIAN)]
    pub custodian: String,
    /// Skip the confirmation step
    #[arg(long)]
    pub yes: bool,
}

#[derive(Args)]
pub struct CoversOpts {
    /// CC details CSV (prompted for if omitted)
    #[arg(long)]
    pub details: Option<PathBuf>,
    /// Where the cover PDFs are written
    #[arg(long, default_value = "results")]
    pub out_dir: PathBuf,
}

pub fn run_convert(opts: ConvertOpts) -> anyhow::Result<()> {
    let stdin = io::stdin();
    let mut input = stdin.lock();

    let input_dir = match opts.input {
        Some(path) => path,
        None => prompt::ask_until(
            &mut input,
            "Full path to the input files",
            prompt::existing_path,
        )?,
    };
    let output_root = match opts.output {
        Some(path) => path,
        None => prompt::ask_until(
            &mut input,
            "Full path to the final output folder (all CPA folders should be here)",
            prompt::existing_path,
        )?,
    };
    let year = match opts.year {
        Some(raw) => TaxYear::parse(&raw)?,
        None => prompt::ask_until(
            &mut input,
            "What year are we filing in? (matches the year on the destination folders; \
             empty for the current year)",
            prompt::filing_year,
        )?,
    };

    println!("{}", "-".repeat(50));
    println!("Input location:  {}", input_dir.display());
    println!("Output location: {}", output_root.display());
    println!("Filing year:     {year}");
    println!("{}", "-".repeat(50));
    if !opts.yes {
        let go = prompt::ask_until(
            &mut input,
            "Is this information correct? [Y]/n",
            prompt::yes_no_default_yes,
        )?;
        if !go {
            println!("Nothing copied.");
            return Ok(());
        }
    }

    let schema = match &opts.schema {
        Some(path) => {
            let text = std::fs::read_to_string(path)
                .with_context(|| format!("cannot read schema file {}", path.display()))?;
            Some(RosterSchema::from_toml(&text)?)
        }
        None => None,
    };

    let roster = load_roster(&mut input, opts.roster, schema, &opts.custodian)?;
    tracing::info!(rows = roster.len(), custodian = %opts.custodian, "roster loaded");

    let destinations = DestinationIndex::scan(&output_root, year)
        .context("could not inspect the client folders")?;
    tracing::info!(folders = destinations.len(), "year folders discovered");

    let report = ConvertEngine::new(roster, destinations).run(&input_dir)?;

    println!("Done converting {} files!", report.copied.len());
    if !report.failed.is_empty() {
        println!(
            "The following {} files failed to be processed:",
            report.failed.len()
        );
        for failed in &report.failed {
            println!("  {} -- {}", failed.source.display(), failed.reason);
        }
    }
    Ok(())
}

/// Load the roster, starting from the `--roster` flag when given and
/// re-prompting (bounded) when a file cannot be used.
fn load_roster(
    input: &mut impl BufRead,
    flag: Option<PathBuf>,
    schema: Option<RosterSchema>,
    custodian: &str,
) -> anyhow::Result<ClientRoster> {
    let mut flag = flag;
    for _ in 0..prompt::MAX_ATTEMPTS {
        let path = match flag.take() {
            Some(path) => path,
            None => prompt::ask_until(
                input,
                "Full path and file name of the CPA tax spreadsheet",
                prompt::existing_path,
            )?,
        };
        match ClientRoster::load(&path, schema.clone(), custodian) {
            Ok(roster) => return Ok(roster),
            Err(e) => eprintln!("There was an issue opening the roster: {e}"),
        }
    }
    anyhow::bail!(
        "could not load a usable roster after {} attempts",
        prompt::MAX_ATTEMPTS
    )
}

pub fn run_covers(opts: CoversOpts) -> anyhow::Result<()> {
    let stdin = io::stdin();
    let mut input = stdin.lock();

    let rows = {
        let mut flag = opts.details;
        let mut loaded = None;
        for _ in 0..prompt::MAX_ATTEMPTS {
            let path = match flag.take() {
                Some(path) => path,
                None => prompt::ask_until(
                    &mut input,
                    "Full path (including file name) to the CC details CSV",
                    prompt::existing_path,
                )?,
            };
            match load_cc_rows(&path) {
                Ok(rows) => {
                    loaded = Some(rows);
                    break;
                }
                Err(e) => eprintln!(
                    "There was an issue opening the file (expected columns \
                     'Full Name', 'Statement CC Details', 'HH ID'): {e}"
                ),
            }
        }
        loaded.with_context(|| {
            format!(
                "could not load a usable CC details file after {} attempts",
                prompt::MAX_ATTEMPTS
            )
        })?
    };

    let households = group_households(&rows);
    std::fs::create_dir_all(&opts.out_dir)
        .with_context(|| format!("cannot create {}", opts.out_dir.display()))?;

    let mut written = 0usize;
    let mut failures = Vec::new();
    for household in &households {
        let path = opts.out_dir.join(household.file_name());
        match taxsort_pdf::write_cover(&path, &household.names) {
            Ok(()) => {
                tracing::info!(file = %path.display(), "cover sheet written");
                written += 1;
            }
            Err(e) => failures.push((household.file_name(), e)),
        }
    }

    println!(
        "Done. {written} cover sheets placed in {}.",
        opts.out_dir.display()
    );
    if !failures.is_empty() {
        println!("The following {} cover sheets failed:", failures.len());
        for (name, error) in &failures {
            println!("  {name} -- {error}");
        }
    }
    Ok(())
}
