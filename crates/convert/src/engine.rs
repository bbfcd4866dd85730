use std::fs;
use std::path::{Path, PathBuf};

use taxsort_core::{AccountNumber, HouseholdId};
use taxsort_import::{ClientRoster, HouseholdIndex};
use thiserror::Error;

use crate::filename;
use crate::locate::DestinationIndex;

/// Errors that prevent establishing the batch at all.
#[derive(Debug, Error)]
pub enum ConvertError {
    #[error("cannot read input folder {path}: {source}")]
    ReadInput {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Why one file could not be processed. A single file's failure never
/// stops the batch; these collect into [`ConvertReport::failed`].
#[derive(Debug, Error)]
pub enum FileFailure {
    #[error("file name is not valid UTF-8")]
    NonUnicodeName,
    #[error("account {0} not found in the roster")]
    UnknownAccount(AccountNumber),
    #[error("account {0} has no household mapping")]
    UnknownHousehold(AccountNumber),
    #[error("no output folder matches household {0}")]
    NoDestination(HouseholdId),
    #[error("copy to {dest} failed: {source}")]
    Copy {
        dest: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

#[derive(Debug, Clone)]
pub struct CopiedFile {
    pub source: PathBuf,
    pub destination: PathBuf,
    pub renamed: String,
}

#[derive(Debug)]
pub struct FailedFile {
    pub source: PathBuf,
    pub reason: FileFailure,
}

#[derive(Debug, Default)]
pub struct ConvertReport {
    pub copied: Vec<CopiedFile>,
    pub failed: Vec<FailedFile>,
}

/// Matches each input PDF to its client and household, then copies it —
/// renamed and redacted — into the household's year folder.
pub struct ConvertEngine {
    roster: ClientRoster,
    households: HouseholdIndex,
    destinations: DestinationIndex,
}

impl ConvertEngine {
    pub fn new(roster: ClientRoster, destinations: DestinationIndex) -> Self {
        let households = HouseholdIndex::build(&roster);
        ConvertEngine { roster, households, destinations }
    }

    /// Process every PDF directly inside `input_dir` (non-recursive), in
    /// filename order so reruns on identical inputs report identically.
    pub fn run(&self, input_dir: &Path) -> Result<ConvertReport, ConvertError> {
        let files = list_input_files(input_dir)?;
        tracing::info!(count = files.len(), "processing input files");

        let mut report = ConvertReport::default();
        for source in files {
            match self.convert_one(&source) {
                Ok(copied) => {
                    tracing::info!(
                        from = %copied.source.display(),
                        to = %copied.destination.display(),
                        "copied"
                    );
                    report.copied.push(copied);
                }
                Err(reason) => {
                    tracing::warn!(file = %source.display(), %reason, "file failed");
                    report.failed.push(FailedFile { source, reason });
                }
            }
        }
        Ok(report)
    }

    fn convert_one(&self, source: &Path) -> Result<CopiedFile, FileFailure> {
        let name = source
            .file_name()
            .and_then(|n| n.to_str())
            .ok_or(FileFailure::NonUnicodeName)?;

        // 1. Parse the account token and the rest of the name.
        let parsed = filename::parse(name);
        if !parsed.account.is_well_formed() {
            tracing::debug!(token = %parsed.account, "account token is not 8 digits");
        }

        // 2. Resolve the client and household.
        let record = self
            .roster
            .find(&parsed.account)
            .ok_or_else(|| FileFailure::UnknownAccount(parsed.account.clone()))?;
        let household = self
            .households
            .get(&parsed.account)
            .ok_or_else(|| FileFailure::UnknownHousehold(parsed.account.clone()))?;

        // 3. Resolve the destination folder.
        let dest_dir = self
            .destinations
            .resolve(household)
            .ok_or_else(|| FileFailure::NoDestination(household.clone()))?;

        // 4. Compose the redacted name and copy. Overwrites an existing
        //    output of the same name; the source is never touched.
        let renamed = filename::compose(&record.client, &parsed.account, &parsed.rest);
        let destination = dest_dir.path.join(&renamed);
        fs::copy(source, &destination).map_err(|source| FileFailure::Copy {
            dest: destination.clone(),
            source,
        })?;

        Ok(CopiedFile {
            source: source.to_path_buf(),
            destination,
            renamed,
        })
    }
}

/// Regular `.pdf` files directly inside `dir`, sorted by name.
fn list_input_files(dir: &Path) -> Result<Vec<PathBuf>, ConvertError> {
    let read_dir = fs::read_dir(dir).map_err(|source| ConvertError::ReadInput {
        path: dir.to_path_buf(),
        source,
    })?;

    let mut files = Vec::new();
    for entry in read_dir {
        let entry = entry.map_err(|source| ConvertError::ReadInput {
            path: dir.to_path_buf(),
            source,
        })?;
        let path = entry.path();
        if !path.is_file() {
            continue;
        }
        let is_pdf = path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("pdf"));
        if is_pdf {
            files.push(path);
        }
    }
    files.sort();
    Ok(files)
}
