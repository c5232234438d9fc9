//! Columnar batches filled by the reader.
//!
//! A batch is created by [`crate::reader::Reader::create_row_batch`], mutated
//! only by `next`, and owned by the caller. The shared bookkeeping
//! (`num_elements`, `not_null`, `has_nulls`) lives on the batch itself; the
//! per-kind buffers live in the tagged [`BatchContent`]. `not_null` contents
//! are meaningful only while `has_nulls` is true.
//!
//! String rows are [`Bytes`] views into buffers owned by the column reader
//! that produced them: a stable per-stripe dictionary blob, or a per-call
//! blob rebuilt by every `next` on a direct stream. The views stay valid for
//! as long as the caller holds them.

use std::fmt;

use bytes::Bytes;

/// A typed columnar batch.
#[derive(Debug, Clone)]
pub struct ColumnVectorBatch {
    capacity: usize,
    pub num_elements: usize,
    /// Byte per row, non-zero meaning the row is present.
    pub not_null: Vec<u8>,
    pub has_nulls: bool,
    pub content: BatchContent,
}

#[derive(Debug, Clone)]
pub enum BatchContent {
    Long { data: Vec<i64> },
    Double { data: Vec<f64> },
    String { values: Vec<Bytes> },
    Struct { fields: Vec<ColumnVectorBatch> },
    List {
        /// `offsets[i]..offsets[i + 1]` bounds list `i`; length is
        /// `num_elements + 1` and non-decreasing.
        offsets: Vec<i64>,
        elements: Option<Box<ColumnVectorBatch>>,
    },
    Map {
        offsets: Vec<i64>,
        keys: Option<Box<ColumnVectorBatch>>,
        elements: Option<Box<ColumnVectorBatch>>,
    },
    Decimal64(Decimal64Content),
    Decimal128(Decimal128Content),
}

#[derive(Debug, Clone)]
pub struct Decimal64Content {
    pub values: Vec<i64>,
    pub precision: i32,
    pub scale: i32,
}

#[derive(Debug, Clone)]
pub struct Decimal128Content {
    pub values: Vec<i128>,
    pub precision: i32,
    pub scale: i32,
}

impl ColumnVectorBatch {
    fn with_content(capacity: usize, content: BatchContent) -> ColumnVectorBatch {
        ColumnVectorBatch {
            capacity,
            num_elements: 0,
            not_null: vec![1; capacity],
            has_nulls: false,
            content,
        }
    }

    pub fn long(capacity: usize) -> ColumnVectorBatch {
        Self::with_content(
            capacity,
            BatchContent::Long {
                data: vec![0; capacity],
            },
        )
    }

    pub fn double(capacity: usize) -> ColumnVectorBatch {
        Self::with_content(
            capacity,
            BatchContent::Double {
                data: vec![0.0; capacity],
            },
        )
    }

    pub fn string(capacity: usize) -> ColumnVectorBatch {
        Self::with_content(
            capacity,
            BatchContent::String {
                values: vec![Bytes::new(); capacity],
            },
        )
    }

    pub fn structs(capacity: usize, fields: Vec<ColumnVectorBatch>) -> ColumnVectorBatch {
        Self::with_content(capacity, BatchContent::Struct { fields })
    }

    pub fn list(capacity: usize, elements: Option<ColumnVectorBatch>) -> ColumnVectorBatch {
        Self::with_content(
            capacity,
            BatchContent::List {
                offsets: vec![0; capacity + 1],
                elements: elements.map(Box::new),
            },
        )
    }

    pub fn map(
        capacity: usize,
        keys: Option<ColumnVectorBatch>,
        elements: Option<ColumnVectorBatch>,
    ) -> ColumnVectorBatch {
        Self::with_content(
            capacity,
            BatchContent::Map {
                offsets: vec![0; capacity + 1],
                keys: keys.map(Box::new),
                elements: elements.map(Box::new),
            },
        )
    }

    pub fn decimal64(capacity: usize, precision: i32, scale: i32) -> ColumnVectorBatch {
        Self::with_content(
            capacity,
            BatchContent::Decimal64(Decimal64Content {
                values: vec![0; capacity],
                precision,
                scale,
            }),
        )
    }

    pub fn decimal128(capacity: usize, precision: i32, scale: i32) -> ColumnVectorBatch {
        Self::with_content(
            capacity,
            BatchContent::Decimal128(Decimal128Content {
                values: vec![0; capacity],
                precision,
                scale,
            }),
        )
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Grow the batch to hold at least `capacity` rows. Shrinking keeps the
    /// existing buffers. Not recursive into struct fields.
    pub fn resize(&mut self, capacity: usize) {
        if capacity <= self.capacity {
            return;
        }
        self.capacity = capacity;
        self.not_null.resize(capacity, 1);
        match &mut self.content {
            BatchContent::Long { data } => data.resize(capacity, 0),
            BatchContent::Double { data } => data.resize(capacity, 0.0),
            BatchContent::String { values } => values.resize(capacity, Bytes::new()),
            BatchContent::Struct { .. } => {}
            BatchContent::List { offsets, .. } => offsets.resize(capacity + 1, 0),
            BatchContent::Map { offsets, .. } => offsets.resize(capacity + 1, 0),
            BatchContent::Decimal64(content) => content.values.resize(capacity, 0),
            BatchContent::Decimal128(content) => content.values.resize(capacity, 0),
        }
    }

    pub fn as_longs(&self) -> Option<&[i64]> {
        match &self.content {
            BatchContent::Long { data } => Some(data),
            _ => None,
        }
    }

    pub fn as_doubles(&self) -> Option<&[f64]> {
        match &self.content {
            BatchContent::Double { data } => Some(data),
            _ => None,
        }
    }

    pub fn as_strings(&self) -> Option<&[Bytes]> {
        match &self.content {
            BatchContent::String { values } => Some(values),
            _ => None,
        }
    }

    pub fn fields(&self) -> Option<&[ColumnVectorBatch]> {
        match &self.content {
            BatchContent::Struct { fields } => Some(fields),
            _ => None,
        }
    }

    pub fn fields_mut(&mut self) -> Option<&mut [ColumnVectorBatch]> {
        match &mut self.content {
            BatchContent::Struct { fields } => Some(fields),
            _ => None,
        }
    }
}

impl fmt::Display for ColumnVectorBatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let kind = match &self.content {
            BatchContent::Long { .. } => "Long",
            BatchContent::Double { .. } => "Double",
            BatchContent::String { .. } => "String",
            BatchContent::Struct { .. } => "Struct",
            BatchContent::List { .. } => "List",
            BatchContent::Map { .. } => "Map",
            BatchContent::Decimal64(_) => "Decimal64",
            BatchContent::Decimal128(_) => "Decimal128",
        };
        write!(f, "{kind} vector <{} of {}>", self.num_elements, self.capacity)?;
        if let BatchContent::Struct { fields } = &self.content {
            write!(f, " with {} fields", fields.len())?;
        }
        Ok(())
    }
}
