use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use regex::Regex;
use taxsort_core::{HouseholdId, TaxYear};
use thiserror::Error;
use walkdir::WalkDir;

#[derive(Debug, Error)]
pub enum LocateError {
    #[error("output root {0} is not a directory")]
    NotADirectory(PathBuf),
    #[error("cannot enumerate output folders under {path}: {source}")]
    Walk {
        path: PathBuf,
        #[source]
        source: walkdir::Error,
    },
}

fn re_numeric() -> &'static Regex {
    static R: OnceLock<Regex> = OnceLock::new();
    R.get_or_init(|| Regex::new(r"^\d+$").expect("invalid regex"))
}

/// A year folder discovered under the output root, with the numeric tokens
/// parsed out of its path.
#[derive(Debug, Clone)]
pub struct CandidateDir {
    pub path: PathBuf,
    /// Underscore-delimited numeric tokens from the root-relative path,
    /// excluding the filing year itself. One of these is the household
    /// number when the folder follows the office convention
    /// (`.../Smith_4521/Taxes 2023/` or `.../Smith_4521_2023/`).
    household_tokens: Vec<String>,
}

impl CandidateDir {
    pub fn matches(&self, household: &HouseholdId) -> bool {
        self.household_tokens
            .iter()
            .any(|token| token == household.as_str())
    }
}

/// All year folders under the output root, in sorted traversal order.
/// Built once per run; resolution is first-match in that order.
pub struct DestinationIndex {
    candidates: Vec<CandidateDir>,
}

impl DestinationIndex {
    /// Walk `root` for directories whose name ends with the filing year.
    /// Any traversal error is fatal: without the full folder list the run
    /// cannot place files correctly.
    pub fn scan(root: &Path, year: TaxYear) -> Result<Self, LocateError> {
        if !root.is_dir() {
            return Err(LocateError::NotADirectory(root.to_path_buf()));
        }

        let mut candidates = Vec::new();
        for entry in WalkDir::new(root).min_depth(1).sort_by_file_name() {
            let entry = entry.map_err(|source| LocateError::Walk {
                path: root.to_path_buf(),
                source,
            })?;
            if !entry.file_type().is_dir() {
                continue;
            }
            let name = entry.file_name().to_string_lossy();
            if !year.matches_dir_name(&name) {
                continue;
            }
            candidates.push(CandidateDir {
                household_tokens: household_tokens(root, entry.path(), year),
                path: entry.into_path(),
            });
        }

        tracing::debug!(count = candidates.len(), %year, "discovered year folders");
        Ok(DestinationIndex { candidates })
    }

    /// First candidate, in enumeration order, carrying the household number.
    pub fn resolve(&self, household: &HouseholdId) -> Option<&CandidateDir> {
        self.candidates.iter().find(|c| c.matches(household))
    }

    pub fn candidates(&self) -> &[CandidateDir] {
        &self.candidates
    }

    pub fn len(&self) -> usize {
        self.candidates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.candidates.is_empty()
    }
}

/// Numeric tokens from every `_`-delimited component segment below the
/// root. Token equality (not substring search) keeps household `452` from
/// matching a `Smith_4521_2023` folder; the year's own token is excluded.
fn household_tokens(root: &Path, dir: &Path, year: TaxYear) -> Vec<String> {
    let year_digits = year.to_string();
    let relative = dir.strip_prefix(root).unwrap_or(dir);

    let mut tokens = Vec::new();
    for component in relative.iter() {
        let component = component.to_string_lossy();
        for token in component.split('_') {
            if re_numeric().is_match(token) && token != year_digits {
                tokens.push(token.to_string());
            }
        }
    }
    tokens
}
