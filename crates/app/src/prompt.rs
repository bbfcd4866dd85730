use std::io::{self, BufRead, Write};
use std::path::PathBuf;

use taxsort_core::TaxYear;
use thiserror::Error;

/// How many bad answers a prompt tolerates before giving up instead of
/// asking forever.
pub const MAX_ATTEMPTS: usize = 3;

#[derive(Debug, Error)]
pub enum PromptError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
    #[error("no usable answer after {0} attempts")]
    Exhausted(usize),
    #[error("input closed before an answer was given")]
    Closed,
}

/// Ask `question` and parse the answer, retrying up to [`MAX_ATTEMPTS`].
pub fn ask_until<T, F>(
    input: &mut impl BufRead,
    question: &str,
    parse: F,
) -> Result<T, PromptError>
where
    F: Fn(&str) -> Result<T, String>,
{
    for _ in 0..MAX_ATTEMPTS {
        print!("{question}: ");
        io::stdout().flush()?;

        let mut line = String::new();
        if input.read_line(&mut line)? == 0 {
            return Err(PromptError::Closed);
        }
        match parse(line.trim()) {
            Ok(value) => return Ok(value),
            Err(message) => eprintln!("{message}"),
        }
    }
    Err(PromptError::Exhausted(MAX_ATTEMPTS))
}

/// Parser for prompts that expect a path that already exists.
pub fn existing_path(answer: &str) -> Result<PathBuf, String> {
    let path = PathBuf::from(answer);
    if path.exists() {
        Ok(path)
    } else {
        Err(format!("'{answer}' does not exist, try again"))
    }
}

/// Parser for the filing-year prompt. An empty answer takes the current
/// calendar year.
pub fn filing_year(answer: &str) -> Result<TaxYear, String> {
    if answer.is_empty() {
        return Ok(TaxYear::current());
    }
    TaxYear::parse(answer).map_err(|e| e.to_string())
}

/// Parser for a `[Y]/n` confirmation.
pub fn yes_no_default_yes(answer: &str) -> Result<bool, String> {
    match answer.to_ascii_lowercase().as_str() {
        "" | "y" | "yes" => Ok(true),
        "n" | "no" => Ok(false),
        other => Err(format!("please answer y or n, not '{other}'")),
    }
}
