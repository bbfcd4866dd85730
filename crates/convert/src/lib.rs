pub mod engine;
pub mod filename;
pub mod locate;

pub use engine::{ConvertEngine, ConvertError, ConvertReport, CopiedFile, FailedFile, FileFailure};
pub use filename::{compose, parse, ParsedName};
pub use locate::{CandidateDir, DestinationIndex, LocateError};
