//! The struct column reader.

use crate::column::{batch_mismatch, build_reader, ColumnReader, PresentStream, StripeStreams};
use crate::error::Result;
use crate::schema::Type;
use crate::vector::{BatchContent, ColumnVectorBatch};

/// Owns one child reader per selected field. Children always produce
/// `num_values` rows; a row that is null at this level is null in every
/// child and consumes nothing from the child's streams.
pub struct StructColumnReader {
    present: PresentStream,
    children: Vec<Box<dyn ColumnReader>>,
}

impl StructColumnReader {
    pub fn new(column: &Type, stripe: &dyn StripeStreams) -> Result<StructColumnReader> {
        let present = PresentStream::open(column.column_id(), stripe)?;
        let selected = stripe.selected_columns();
        let mut children = Vec::new();
        for i in 0..column.subtype_count() {
            let child = column.subtype(i);
            if selected
                .get(child.column_id() as usize)
                .copied()
                .unwrap_or(false)
            {
                children.push(build_reader(child, stripe)?);
            }
        }
        Ok(StructColumnReader { present, children })
    }
}

impl ColumnReader for StructColumnReader {
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
        let fields = match &mut batch.content {
            BatchContent::Struct { fields } => fields,
            _ => return Err(batch_mismatch("a struct batch")),
        };
        for (reader, field) in self.children.iter_mut().zip(fields.iter_mut()) {
            reader.next(field, num_values, not_null)?;
        }
        Ok(())
    }

    fn skip(&mut self, num_values: u64) -> Result<u64> {
        let present = self.present.count_present(num_values)?;
        for child in &mut self.children {
            child.skip(present)?;
        }
        Ok(present)
    }
}
