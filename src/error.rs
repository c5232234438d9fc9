use std::sync::Arc;

use thiserror::Error;

use crate::io::compress::CompressionKind;

/// Errors surfaced by the reader. Every failure propagates to the caller of
/// `next`, `create_row_batch`, or an accessor; nothing is retried internally.
///
/// The enum is `Clone` (the I/O source lives behind an `Arc`) so a poisoned
/// reader can return the same error from every subsequent `next`.
#[derive(Error, Debug, Clone)]
pub enum OrcError {
    /// I/O failure from the byte source, including short reads.
    #[error("IO error: {0}")]
    Io(#[source] Arc<std::io::Error>),
    /// Structurally invalid file contents.
    #[error("parse error: {what}{}", fmt_offset(.offset))]
    Parse { what: String, offset: Option<u64> },
    /// A compressed block that the codec rejected or that ends early.
    #[error("{kind:?} decompression error: {what}{}", fmt_offset(.offset))]
    Compression {
        kind: CompressionKind,
        what: String,
        offset: Option<u64>,
    },
    /// A declared but unsupported feature (column kind, codec, operation).
    #[error("not implemented: {feature}")]
    NotImplemented { feature: String },
    /// An index or key outside the valid range.
    #[error("{field} out of range")]
    OutOfRange { field: String },
    /// A statistics accessor whose field is absent from the message.
    #[error("{field} is not defined")]
    StatsUndefined { field: String },
    /// A run whose header fields contradict each other.
    #[error("corrupt {encoding} run: {detail}")]
    CorruptEncoding { encoding: String, detail: String },
}

fn fmt_offset(offset: &Option<u64>) -> String {
    match offset {
        Some(off) => format!(" at offset {off}"),
        None => String::new(),
    }
}

impl From<std::io::Error> for OrcError {
    fn from(err: std::io::Error) -> Self {
        OrcError::Io(Arc::new(err))
    }
}

impl OrcError {
    pub(crate) fn parse(what: impl Into<String>) -> Self {
        OrcError::Parse {
            what: what.into(),
            offset: None,
        }
    }

    pub(crate) fn parse_at(what: impl Into<String>, offset: u64) -> Self {
        OrcError::Parse {
            what: what.into(),
            offset: Some(offset),
        }
    }

    pub(crate) fn not_implemented(feature: impl Into<String>) -> Self {
        OrcError::NotImplemented {
            feature: feature.into(),
        }
    }

    pub(crate) fn out_of_range(field: impl Into<String>) -> Self {
        OrcError::OutOfRange {
            field: field.into(),
        }
    }

    pub(crate) fn eof(what: &str) -> Self {
        OrcError::Parse {
            what: format!("unexpected end of stream in {what}"),
            offset: None,
        }
    }
}

impl From<prost::DecodeError> for OrcError {
    fn from(err: prost::DecodeError) -> Self {
        OrcError::parse(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, OrcError>;
