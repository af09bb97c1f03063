//! Error types for message metadata resolution

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Parse error: {0}")]
    Parse(#[from] mailparse::MailParseError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Summary error on line {line}: {source}")]
    Summary {
        line: usize,
        #[source]
        source: serde_json::Error,
    },

    #[error("Summary encoding failed: {0}")]
    SummaryEncode(#[from] serde_json::Error),
}
