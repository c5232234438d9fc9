//! Per-stripe column readers.
//!
//! A reader tree mirrors the selected part of the schema. Every reader owns
//! its PRESENT decoder (when the stripe carries one) plus the data streams
//! of its kind, and fills caller-supplied batches honoring the null mask
//! inherited from its parent.

pub mod integer;
pub mod nested;
pub mod string;

use crate::error::{OrcError, Result};
use crate::io::stream::SeekableStream;
use crate::proto;
use crate::rle::byte_rle::BooleanRleDecoder;
use crate::rle::RleVersion;
use crate::schema::{Type, TypeKind};
use crate::vector::ColumnVectorBatch;

/// Access to one stripe's encodings and streams, keyed by column id.
pub trait StripeStreams {
    fn selected_columns(&self) -> &[bool];

    fn encoding(&self, column_id: u32) -> Result<proto::ColumnEncoding>;

    /// The decompressed stream for `(column_id, kind)`, or `None` when the
    /// stripe has no such stream.
    fn stream(
        &self,
        column_id: u32,
        kind: proto::stream::Kind,
    ) -> Result<Option<Box<dyn SeekableStream>>>;
}

/// Fills `num_values` rows of `batch`, leaving slots that are null under the
/// combined mask undefined. `skip` consumes rows without materializing and
/// returns the number of present rows skipped, which is what child streams
/// advance by.
pub trait ColumnReader {
    fn next(
        &mut self,
        batch: &mut ColumnVectorBatch,
        num_values: usize,
        incoming_mask: Option<&[u8]>,
    ) -> Result<()>;

    fn skip(&mut self, num_values: u64) -> Result<u64>;
}

/// Build the reader for `column` and, recursively, its selected children.
pub fn build_reader(
    column: &Type,
    stripe: &dyn StripeStreams,
) -> Result<Box<dyn ColumnReader>> {
    match column.kind() {
        TypeKind::Short | TypeKind::Int | TypeKind::Long => Ok(Box::new(
            integer::LongColumnReader::new(column, stripe)?,
        )),
        TypeKind::Byte => Ok(Box::new(integer::ByteColumnReader::new(column, stripe)?)),
        TypeKind::String | TypeKind::Binary | TypeKind::Varchar | TypeKind::Char => {
            let encoding = stripe.encoding(column.column_id())?;
            match encoding.kind() {
                proto::column_encoding::Kind::Dictionary
                | proto::column_encoding::Kind::DictionaryV2 => Ok(Box::new(
                    string::StringDictionaryColumnReader::new(column, stripe)?,
                )),
                proto::column_encoding::Kind::Direct
                | proto::column_encoding::Kind::DirectV2 => Ok(Box::new(
                    string::StringDirectColumnReader::new(column, stripe)?,
                )),
            }
        }
        TypeKind::Struct => Ok(Box::new(nested::StructColumnReader::new(column, stripe)?)),
        other => Err(OrcError::not_implemented(format!(
            "reading {other} columns"
        ))),
    }
}

/// The integer RLE generation implied by a column encoding.
pub(crate) fn rle_version(encoding: proto::column_encoding::Kind) -> RleVersion {
    match encoding {
        proto::column_encoding::Kind::Direct | proto::column_encoding::Kind::Dictionary => {
            RleVersion::V1
        }
        proto::column_encoding::Kind::DirectV2
        | proto::column_encoding::Kind::DictionaryV2 => RleVersion::V2,
    }
}

pub(crate) fn require_stream(
    stripe: &dyn StripeStreams,
    column_id: u32,
    kind: proto::stream::Kind,
) -> Result<Box<dyn SeekableStream>> {
    stripe.stream(column_id, kind)?.ok_or_else(|| {
        OrcError::parse(format!("column {column_id} has no {kind:?} stream"))
    })
}

/// The PRESENT bitmap of one column, shared by every reader kind.
pub(crate) struct PresentStream {
    decoder: Option<BooleanRleDecoder>,
}

impl PresentStream {
    pub fn open(column_id: u32, stripe: &dyn StripeStreams) -> Result<PresentStream> {
        let decoder = stripe
            .stream(column_id, proto::stream::Kind::Present)?
            .map(BooleanRleDecoder::new);
        Ok(PresentStream { decoder })
    }

    /// Decode the row mask for this batch: the column's PRESENT bits ANDed
    /// with the inherited mask (a row null in the parent is null here and
    /// consumes no PRESENT bit). Sets `num_elements`, and `has_nulls` to
    /// whether the resulting mask really contains a null.
    pub fn read(
        &mut self,
        batch: &mut ColumnVectorBatch,
        num_values: usize,
        incoming_mask: Option<&[u8]>,
    ) -> Result<()> {
        batch.num_elements = num_values;
        match &mut self.decoder {
            Some(decoder) => {
                decoder.next(&mut batch.not_null[..num_values], incoming_mask)?;
            }
            None => match incoming_mask {
                Some(mask) => {
                    batch.not_null[..num_values].copy_from_slice(&mask[..num_values]);
                }
                None => {
                    batch.has_nulls = false;
                    return Ok(());
                }
            },
        }
        batch.has_nulls = batch.not_null[..num_values].iter().any(|&bit| bit == 0);
        Ok(())
    }

    /// Page through `num_values` PRESENT bits and return how many rows are
    /// present; without a PRESENT stream every row is.
    pub fn count_present(&mut self, num_values: u64) -> Result<u64> {
        let decoder = match &mut self.decoder {
            Some(decoder) => decoder,
            None => return Ok(num_values),
        };
        let mut buffer = [0u8; 1024];
        let mut present = num_values;
        let mut remaining = num_values;
        while remaining > 0 {
            let chunk = remaining.min(buffer.len() as u64) as usize;
            decoder.next(&mut buffer[..chunk], None)?;
            present -= buffer[..chunk].iter().filter(|&&bit| bit == 0).count() as u64;
            remaining -= chunk as u64;
        }
        Ok(present)
    }
}

pub(crate) fn batch_mismatch(expected: &str) -> OrcError {
    OrcError::parse(format!("row batch does not match the schema: expected {expected}"))
}
