use crate::boxes::FourCC;
use std::path::PathBuf;

#[derive(thiserror::Error, Debug)]
pub enum ParseError {
    /// A read or seek could not be satisfied; box boundaries can no longer be trusted.
    #[error("truncated stream: {0}")]
    TruncatedStream(#[from] std::io::Error),
    /// A box whose declared extent disagrees with what its fields require.
    #[error("malformed {typ} box: {reason}")]
    MalformedPayload { typ: FourCC, reason: String },
    /// A reduction needed a record that no box ever supplied.
    #[error("missing {what} in {owner}")]
    MissingDependency { what: &'static str, owner: String },
    #[error("cannot open {}: {source}", path.display())]
    Open {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("{typ} box at offset {offset} is not inside a {parent}")]
    UnexpectedBox {
        typ: FourCC,
        offset: u64,
        parent: &'static str,
    },
}

impl ParseError {
    pub(crate) fn malformed(typ: FourCC, reason: impl Into<String>) -> Self {
        ParseError::MalformedPayload {
            typ,
            reason: reason.into(),
        }
    }

    pub(crate) fn missing(what: &'static str, owner: impl Into<String>) -> Self {
        ParseError::MissingDependency {
            what,
            owner: owner.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, ParseError>;
