//! Readers for the integer column kinds.

use crate::column::{
    batch_mismatch, require_stream, rle_version, ColumnReader, PresentStream, StripeStreams,
};
use crate::error::Result;
use crate::proto;
use crate::rle::byte_rle::ByteRleDecoder;
use crate::rle::{create_rle_decoder, IntRleDecoder};
use crate::schema::Type;
use crate::vector::{BatchContent, ColumnVectorBatch};

/// SHORT, INT, and LONG columns: one signed integer RLE stream.
pub struct LongColumnReader {
    present: PresentStream,
    rle: Box<dyn IntRleDecoder>,
}

impl LongColumnReader {
    pub fn new(column: &Type, stripe: &dyn StripeStreams) -> Result<LongColumnReader> {
        let column_id = column.column_id();
        let present = PresentStream::open(column_id, stripe)?;
        let version = rle_version(stripe.encoding(column_id)?.kind());
        let data = require_stream(stripe, column_id, proto::stream::Kind::Data)?;
        Ok(LongColumnReader {
            present,
            rle: create_rle_decoder(data, true, version),
        })
    }
}

impl ColumnReader for LongColumnReader {
    fn next(
        &mut self,
        batch: &mut ColumnVectorBatch,
        num_values: usize,
        incoming_mask: Option<&[u8]>,
    ) -> Result<()> {
        self.present.read(batch, num_values, incoming_mask)?;
        let not_null = if batch.has_nulls {
            Some(&batch.not_null[..num_values])
        } else {
            None
        };
        match &mut batch.content {
            BatchContent::Long { data } => self.rle.next(&mut data[..num_values], not_null),
            _ => Err(batch_mismatch("a long batch")),
        }
    }

    fn skip(&mut self, num_values: u64) -> Result<u64> {
        let present = self.present.count_present(num_values)?;
        self.rle.skip(present)?;
        Ok(present)
    }
}

/// TINYINT columns: the data stream is byte RLE, widened from `i8`.
pub struct ByteColumnReader {
    present: PresentStream,
    data: ByteRleDecoder,
    scratch: Vec<u8>,
}

impl ByteColumnReader {
    pub fn new(column: &Type, stripe: &dyn StripeStreams) -> Result<ByteColumnReader> {
        let column_id = column.column_id();
        let present = PresentStream::open(column_id, stripe)?;
        let data = require_stream(stripe, column_id, proto::stream::Kind::Data)?;
        Ok(ByteColumnReader {
            present,
            data: ByteRleDecoder::new(data),
            scratch: Vec::new(),
        })
    }
}

impl ColumnReader for ByteColumnReader {
    fn next(
        &mut self,
        batch: &mut ColumnVectorBatch,
        num_values: usize,
        incoming_mask: Option<&[u8]>,
    ) -> Result<()> {
        self.present.read(batch, num_values, incoming_mask)?;
        self.scratch.resize(num_values, 0);
        let not_null = if batch.has_nulls {
            Some(&batch.not_null[..num_values])
        } else {
            None
        };
        self.data.next(&mut self.scratch[..num_values], not_null)?;
        let data = match &mut batch.content {
            BatchContent::Long { data } => data,
            _ => return Err(batch_mismatch("a long batch")),
        };
        for i in 0..num_values {
            if not_null.map_or(true, |mask| mask[i] != 0) {
                data[i] = i64::from(self.scratch[i] as i8);
            }
        }
        Ok(())
    }

    fn skip(&mut self, num_values: u64) -> Result<u64> {
        let present = self.present.count_present(num_values)?;
        self.data.skip(present)?;
        Ok(present)
    }
}
