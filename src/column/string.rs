//! Readers for string, binary, varchar, and char columns.
//!
//! Direct columns carry a LENGTH stream plus a raw DATA byte stream; each
//! `next` gathers the bytes for the batch into a fresh blob and hands out
//! views into it. Dictionary columns materialize the whole dictionary once
//! at stripe start and decode one code per row; their views point into the
//! stable dictionary blob. Varchar and char decode identically here, with
//! no truncation or padding.

use bytes::{Bytes, BytesMut};

use crate::column::{
    batch_mismatch, require_stream, rle_version, ColumnReader, PresentStream, StripeStreams,
};
use crate::error::{OrcError, Result};
use crate::io::stream::SeekableStream;
use crate::proto;
use crate::rle::{create_rle_decoder, IntRleDecoder};
use crate::schema::Type;
use crate::vector::{BatchContent, ColumnVectorBatch};

pub struct StringDirectColumnReader {
    present: PresentStream,
    lengths: Box<dyn IntRleDecoder>,
    blob_stream: Box<dyn SeekableStream>,
    /// Unconsumed tail of the blob stream's current window.
    pending: Bytes,
    length_scratch: Vec<i64>,
}

impl StringDirectColumnReader {
    pub fn new(column: &Type, stripe: &dyn StripeStreams) -> Result<StringDirectColumnReader> {
        let column_id = column.column_id();
        let present = PresentStream::open(column_id, stripe)?;
        let version = rle_version(stripe.encoding(column_id)?.kind());
        let lengths = require_stream(stripe, column_id, proto::stream::Kind::Length)?;
        let blob_stream = require_stream(stripe, column_id, proto::stream::Kind::Data)?;
        Ok(StringDirectColumnReader {
            present,
            lengths: create_rle_decoder(lengths, false, version),
            blob_stream,
            pending: Bytes::new(),
            length_scratch: Vec::new(),
        })
    }

    /// The next `count` bytes of the DATA stream as one contiguous blob.
    fn gather(&mut self, count: usize) -> Result<Bytes> {
        if self.pending.len() >= count {
            let blob = self.pending.slice(..count);
            self.pending = self.pending.slice(count..);
            return Ok(blob);
        }
        let mut assembled = BytesMut::with_capacity(count);
        assembled.extend_from_slice(&self.pending);
        self.pending = Bytes::new();
        while assembled.len() < count {
            match self.blob_stream.next()? {
                Some(window) => {
                    let take = window.len().min(count - assembled.len());
                    assembled.extend_from_slice(&window[..take]);
                    if take < window.len() {
                        self.pending = window.slice(take..);
                    }
                }
                None => {
                    return Err(OrcError::parse(
                        "string DATA stream ends before the declared lengths",
                    ))
                }
            }
        }
        Ok(assembled.freeze())
    }
}

impl ColumnReader for StringDirectColumnReader {
    fn next(
        &mut self,
        batch: &mut ColumnVectorBatch,
        num_values: usize,
        incoming_mask: Option<&[u8]>,
    ) -> Result<()> {
        self.present.read(batch, num_values, incoming_mask)?;
        self.length_scratch.resize(num_values.max(self.length_scratch.len()), 0);
        let not_null = if batch.has_nulls {
            Some(&batch.not_null[..num_values])
        } else {
            None
        };
        self.lengths
            .next(&mut self.length_scratch[..num_values], not_null)?;

        let mut total: usize = 0;
        for i in 0..num_values {
            if not_null.map_or(true, |mask| mask[i] != 0) {
                let length = self.length_scratch[i];
                if length < 0 {
                    return Err(OrcError::parse(format!("negative string length {length}")));
                }
                total += length as usize;
            }
        }

        let blob = self.gather(total)?;
        let values = match &mut batch.content {
            BatchContent::String { values } => values,
            _ => return Err(batch_mismatch("a string batch")),
        };
        let mut cursor = 0;
        for i in 0..num_values {
            if not_null.map_or(true, |mask| mask[i] != 0) {
                let length = self.length_scratch[i] as usize;
                values[i] = blob.slice(cursor..cursor + length);
                cursor += length;
            }
        }
        Ok(())
    }

    fn skip(&mut self, num_values: u64) -> Result<u64> {
        let present = self.present.count_present(num_values)?;
        const CHUNK: usize = 1024;
        let mut scratch = [0i64; CHUNK];
        let mut remaining = present;
        let mut total: u64 = 0;
        while remaining > 0 {
            let step = remaining.min(CHUNK as u64) as usize;
            self.lengths.next(&mut scratch[..step], None)?;
            for &length in &scratch[..step] {
                if length < 0 {
                    return Err(OrcError::parse(format!("negative string length {length}")));
                }
                total += length as u64;
            }
            remaining -= step as u64;
        }

        let buffered = self.pending.len() as u64;
        if total <= buffered {
            self.pending = self.pending.slice(total as usize..);
        } else {
            self.pending = Bytes::new();
            if !self.blob_stream.skip(total - buffered)? {
                return Err(OrcError::parse("string DATA stream ends during skip"));
            }
        }
        Ok(present)
    }
}

pub struct StringDictionaryColumnReader {
    present: PresentStream,
    codes: Box<dyn IntRleDecoder>,
    blob: Bytes,
    /// `dictionary_size + 1` offsets into `blob`.
    offsets: Vec<usize>,
    code_scratch: Vec<i64>,
}

impl StringDictionaryColumnReader {
    pub fn new(
        column: &Type,
        stripe: &dyn StripeStreams,
    ) -> Result<StringDictionaryColumnReader> {
        let column_id = column.column_id();
        let present = PresentStream::open(column_id, stripe)?;
        let encoding = stripe.encoding(column_id)?;
        let version = rle_version(encoding.kind());
        let dictionary_size = encoding.dictionary_size.unwrap_or(0) as usize;

        let codes = create_rle_decoder(
            require_stream(stripe, column_id, proto::stream::Kind::Data)?,
            false,
            version,
        );

        let mut lengths = create_rle_decoder(
            require_stream(stripe, column_id, proto::stream::Kind::Length)?,
            false,
            version,
        );
        let mut raw_lengths = vec![0i64; dictionary_size];
        lengths.next(&mut raw_lengths, None)?;

        let mut offsets = Vec::with_capacity(dictionary_size + 1);
        let mut total: usize = 0;
        offsets.push(0);
        for &length in &raw_lengths {
            if length < 0 {
                return Err(OrcError::parse(format!(
                    "negative dictionary entry length {length}"
                )));
            }
            total += length as usize;
            offsets.push(total);
        }

        let mut blob_stream =
            require_stream(stripe, column_id, proto::stream::Kind::DictionaryData)?;
        let mut assembled = BytesMut::with_capacity(total);
        while assembled.len() < total {
            match blob_stream.next()? {
                Some(window) => {
                    let take = window.len().min(total - assembled.len());
                    assembled.extend_from_slice(&window[..take]);
                }
                None => {
                    return Err(OrcError::parse(
                        "dictionary blob ends before the declared lengths",
                    ))
                }
            }
        }

        Ok(StringDictionaryColumnReader {
            present,
            codes,
            blob: assembled.freeze(),
            offsets,
            code_scratch: Vec::new(),
        })
    }
}

impl ColumnReader for StringDictionaryColumnReader {
    fn next(
        &mut self,
        batch: &mut ColumnVectorBatch,
        num_values: usize,
        incoming_mask: Option<&[u8]>,
    ) -> Result<()> {
        self.present.read(batch, num_values, incoming_mask)?;
        self.code_scratch.resize(num_values.max(self.code_scratch.len()), 0);
        let not_null = if batch.has_nulls {
            Some(&batch.not_null[..num_values])
        } else {
            None
        };
        self.codes
            .next(&mut self.code_scratch[..num_values], not_null)?;

        let values = match &mut batch.content {
            BatchContent::String { values } => values,
            _ => return Err(batch_mismatch("a string batch")),
        };
        for i in 0..num_values {
            if not_null.map_or(true, |mask| mask[i] != 0) {
                let entry = self.code_scratch[i];
                if entry < 0 || entry as usize + 1 >= self.offsets.len() {
                    return Err(OrcError::parse(format!(
                        "dictionary code {entry} out of range"
                    )));
                }
                let entry = entry as usize;
                values[i] = self.blob.slice(self.offsets[entry]..self.offsets[entry + 1]);
            }
        }
        Ok(())
    }

    fn skip(&mut self, num_values: u64) -> Result<u64> {
        let present = self.present.count_present(num_values)?;
        self.codes.skip(present)?;
        Ok(present)
    }
}
