use csv;

use std::error::Error;
use std::fmt;

/// Failures surfaced by the library. Numeric degeneracies (empty overlap,
/// zero variance, zero neighbor weight) are not errors; they resolve to the
/// fallback values defined in `similarity` and `predict`.
#[derive(Debug, PartialEq)]
pub enum CfError {
    /// The mode argument was neither "user" nor "item".
    InvalidMode(String),
    /// A malformed record in the input dataset. Fatal, no partial recovery.
    DatasetFormat(String),
    /// A lookup for an identifier that is not part of the rating matrix.
    UnknownEntity(String),
    /// A parameter outside its documented domain, e.g. a self-similarity
    /// query or a fold count larger than the entity count.
    InvalidArgument(String),
    /// An error metric was requested over zero comparable entries.
    EmptyInput,
}

impl fmt::Display for CfError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            CfError::InvalidMode(ref mode) =>
                write!(f, "Invalid mode={}. Use user or item", mode),
            CfError::DatasetFormat(ref details) =>
                write!(f, "Malformed dataset record: {}", details),
            CfError::UnknownEntity(ref entity) =>
                write!(f, "Unknown entity: {}", entity),
            CfError::InvalidArgument(ref details) =>
                write!(f, "Invalid argument: {}", details),
            CfError::EmptyInput =>
                write!(f, "No comparable entries to compute an error metric over"),
        }
    }
}

impl Error for CfError {}

impl From<csv::Error> for CfError {
    fn from(failure: csv::Error) -> Self {
        CfError::DatasetFormat(failure.to_string())
    }
}
