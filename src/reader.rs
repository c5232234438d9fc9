//! The public reader: trailer recovery, stripe iteration, batch filling.
//!
//! Layout of the trailer, back to front: the last byte is the postscript
//! length `L`; the postscript occupies `[len - 1 - L, len - 1)`; the magic
//! `"ORC"` sits immediately before the postscript (pre-0.12 files carry it
//! at offset 0 instead); the footer precedes the postscript by its declared
//! length, and the metadata section precedes the footer.

use std::cell::RefCell;
use std::rc::Rc;

use derive_builder::Builder;
use log::{debug, warn};
use prost::Message;

use crate::column::{build_reader, ColumnReader, StripeStreams};
use crate::error::{OrcError, Result};
use crate::io::compress::{create_decompressor, CompressionKind};
use crate::io::source::InputSource;
use crate::io::stream::{SeekableArrayStream, SeekableFileStream, SeekableStream};
use crate::proto;
use crate::schema::{Type, TypeKind};
use crate::stats::{ColumnStatistics, StripeStatistics};
use crate::vector::ColumnVectorBatch;

const MAGIC: &[u8] = b"ORC";
const DIRECTORY_SIZE_GUESS: u64 = 16 * 1024;
const DEFAULT_BLOCK_SIZE: u64 = 256 * 1024;

/// Options recognized by [`open`].
#[derive(Builder, Debug, Clone)]
#[builder(pattern = "owned", build_fn(skip))]
pub struct ReaderOptions {
    /// Columns to materialize, by column id. Ancestors and descendants of
    /// every listed column are included automatically.
    #[builder(setter(into), default)]
    include: Vec<u32>,
    /// Only stripes whose offset lies in `[offset, offset + length)` are
    /// read.
    #[builder(default)]
    offset: u64,
    #[builder(default)]
    length: u64,
    /// Logical file length override.
    #[builder(setter(strip_option), default)]
    tail_location: Option<u64>,
    /// Raise instead of silently truncating on Hive-0.11 decimal overflow.
    #[builder(default)]
    throw_on_hive11_decimal_overflow: bool,
    /// Target scale for Hive-0.11 decimal adjustment.
    #[builder(default)]
    forced_scale_on_hive11_decimal: i32,
}

impl ReaderOptionsBuilder {
    /// Restrict reading to stripes starting in `[offset, offset + length)`.
    pub fn range(self, offset: u64, length: u64) -> Self {
        self.offset(offset).length(length)
    }

    pub fn build(self) -> ReaderOptions {
        let Self {
            include,
            offset,
            length,
            tail_location,
            throw_on_hive11_decimal_overflow,
            forced_scale_on_hive11_decimal,
        } = self;
        ReaderOptions {
            include: include.unwrap_or_else(|| vec![0]),
            offset: offset.unwrap_or(0),
            length: length.unwrap_or(u64::MAX),
            tail_location: tail_location.unwrap_or(None),
            throw_on_hive11_decimal_overflow: throw_on_hive11_decimal_overflow.unwrap_or(true),
            forced_scale_on_hive11_decimal: forced_scale_on_hive11_decimal.unwrap_or(6),
        }
    }
}

impl ReaderOptions {
    pub fn builder() -> ReaderOptionsBuilder {
        ReaderOptionsBuilder::default()
    }

    pub fn include(&self) -> &[u32] {
        &self.include
    }

    pub fn offset(&self) -> u64 {
        self.offset
    }

    pub fn length(&self) -> u64 {
        self.length
    }

    pub fn tail_location(&self) -> Option<u64> {
        self.tail_location
    }

    pub fn throw_on_hive11_decimal_overflow(&self) -> bool {
        self.throw_on_hive11_decimal_overflow
    }

    pub fn forced_scale_on_hive11_decimal(&self) -> i32 {
        self.forced_scale_on_hive11_decimal
    }
}

impl Default for ReaderOptions {
    fn default() -> ReaderOptions {
        ReaderOptions::builder().build()
    }
}

/// The directory entry of one stripe.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StripeInformation {
    offset: u64,
    index_length: u64,
    data_length: u64,
    footer_length: u64,
    number_of_rows: u64,
}

impl StripeInformation {
    pub fn offset(&self) -> u64 {
        self.offset
    }

    pub fn index_length(&self) -> u64 {
        self.index_length
    }

    pub fn data_length(&self) -> u64 {
        self.data_length
    }

    pub fn footer_length(&self) -> u64 {
        self.footer_length
    }

    pub fn number_of_rows(&self) -> u64 {
        self.number_of_rows
    }

    pub fn length(&self) -> u64 {
        self.index_length + self.data_length + self.footer_length
    }
}

impl From<&proto::StripeInformation> for StripeInformation {
    fn from(info: &proto::StripeInformation) -> StripeInformation {
        StripeInformation {
            offset: info.offset.unwrap_or(0),
            index_length: info.index_length.unwrap_or(0),
            data_length: info.data_length.unwrap_or(0),
            footer_length: info.footer_length.unwrap_or(0),
            number_of_rows: info.number_of_rows.unwrap_or(0),
        }
    }
}

/// Open a reader over `source`. Parses the whole trailer eagerly; stripe
/// footers are read lazily on the first `next` that touches the stripe.
pub fn open(source: Box<dyn InputSource>, options: ReaderOptions) -> Result<Reader> {
    Reader::open_impl(source, options)
}

pub struct Reader {
    source: Rc<RefCell<dyn InputSource>>,
    name: String,
    compression: CompressionKind,
    block_size: u64,
    footer: proto::Footer,
    metadata: proto::Metadata,
    schema: Type,
    selected_columns: Vec<bool>,
    first_row_of_stripe: Vec<u64>,
    previous_row: u64,
    current_stripe: u64,
    last_stripe: u64,
    current_row_in_stripe: u64,
    rows_in_current_stripe: u64,
    row_reader: Option<Box<dyn ColumnReader>>,
    poisoned: Option<OrcError>,
}

impl std::fmt::Debug for Reader {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Reader")
            .field("name", &self.name)
            .field("compression", &self.compression)
            .field("current_stripe", &self.current_stripe)
            .field("last_stripe", &self.last_stripe)
            .finish_non_exhaustive()
    }
}

impl Reader {
    fn open_impl(mut source: Box<dyn InputSource>, options: ReaderOptions) -> Result<Reader> {
        let name = source.name().to_owned();
        let file_length = source.len();
        let size = options.tail_location.unwrap_or(u64::MAX).min(file_length);
        let read_size = size.min(DIRECTORY_SIZE_GUESS);
        if read_size < 1 {
            return Err(OrcError::parse("file size too small"));
        }

        let mut tail = vec![0u8; read_size as usize];
        source.read(&mut tail, size - read_size)?;

        // postscript
        let postscript_length = u64::from(*tail.last().unwrap_or(&0));
        ensure_magic(source.as_mut(), &tail, postscript_length)?;
        let postscript_start = tail.len() - 1 - postscript_length as usize;
        let postscript =
            proto::PostScript::decode(&tail[postscript_start..tail.len() - 1]).map_err(
                |err| OrcError::parse(format!("failed to parse the postscript: {err}")),
            )?;
        check_version(&name, &postscript);
        let block_size = postscript
            .compression_block_size
            .unwrap_or(DEFAULT_BLOCK_SIZE);
        let compression = CompressionKind::try_from(postscript.compression.unwrap_or(0))
            .map_err(|_| OrcError::parse("unknown compression kind"))?;
        let footer_length = postscript.footer_length.unwrap_or(0);
        let metadata_length = postscript.metadata_length.unwrap_or(0);

        // footer, issuing a second read when the tail guess fell short
        let tail_size = 1 + postscript_length + footer_length;
        if tail_size > size {
            return Err(OrcError::parse("footer length runs past the file start"));
        }
        let footer_bytes: Vec<u8> = if tail_size <= read_size {
            let start = (read_size - tail_size) as usize;
            tail[start..start + footer_length as usize].to_vec()
        } else {
            let missing = (tail_size - read_size) as usize;
            let mut assembled = vec![0u8; footer_length as usize];
            source.read(&mut assembled[..missing], size - tail_size)?;
            assembled[missing..].copy_from_slice(&tail[..footer_length as usize - missing]);
            assembled
        };
        let footer: proto::Footer =
            decode_section(compression, block_size, footer_bytes, "footer")?;

        // metadata (per-stripe statistics)
        let metadata = if metadata_length == 0 {
            proto::Metadata::default()
        } else {
            let position = size
                .checked_sub(tail_size + metadata_length)
                .ok_or_else(|| OrcError::parse("metadata length runs past the file start"))?;
            let mut metadata_bytes = vec![0u8; metadata_length as usize];
            source.read(&mut metadata_bytes, position)?;
            decode_section(compression, block_size, metadata_bytes, "metadata")?
        };

        // stripe directory and the range clamp
        let mut first_row_of_stripe = Vec::with_capacity(footer.stripes.len());
        let mut current_stripe = footer.stripes.len() as u64;
        let mut last_stripe: u64 = 0;
        let mut row_total: u64 = 0;
        let range_end = options.offset.saturating_add(options.length);
        for (i, info) in footer.stripes.iter().enumerate() {
            first_row_of_stripe.push(row_total);
            row_total += info.number_of_rows.unwrap_or(0);
            let stripe_offset = info.offset.unwrap_or(0);
            if stripe_offset >= options.offset && stripe_offset < range_end {
                current_stripe = current_stripe.min(i as u64);
                last_stripe = last_stripe.max(i as u64);
            }
        }

        let schema = Type::from_footer(&footer)?;

        let mut selected_columns = vec![false; footer.types.len()];
        for &column in &options.include {
            if (column as usize) < footer.types.len() {
                select_parents(&mut selected_columns, &footer, column);
                select_children(&mut selected_columns, &footer, column);
            }
        }

        debug!(
            "opened {name}: {} rows in {} stripes, {compression:?} compression",
            footer.number_of_rows.unwrap_or(0),
            footer.stripes.len()
        );

        Ok(Reader {
            source: Rc::new(RefCell::new(SourceCell(source))),
            name,
            compression,
            block_size,
            footer,
            metadata,
            schema,
            selected_columns,
            first_row_of_stripe,
            previous_row: u64::MAX,
            current_stripe,
            last_stripe,
            current_row_in_stripe: 0,
            rows_in_current_stripe: 0,
            row_reader: None,
            poisoned: None,
        })
    }

    /// The schema tree recovered from the footer.
    pub fn schema(&self) -> &Type {
        &self.schema
    }

    pub fn number_of_rows(&self) -> u64 {
        self.footer.number_of_rows.unwrap_or(0)
    }

    pub fn compression(&self) -> CompressionKind {
        self.compression
    }

    pub fn compression_size(&self) -> u64 {
        self.block_size
    }

    pub fn row_index_stride(&self) -> u32 {
        self.footer.row_index_stride.unwrap_or(0)
    }

    pub fn content_length(&self) -> u64 {
        self.footer.content_length.unwrap_or(0)
    }

    pub fn number_of_stripes(&self) -> usize {
        self.footer.stripes.len()
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn stripe(&self, index: usize) -> Result<StripeInformation> {
        self.footer
            .stripes
            .get(index)
            .map(StripeInformation::from)
            .ok_or_else(|| OrcError::out_of_range("stripe index"))
    }

    pub fn selected_columns(&self) -> &[bool] {
        &self.selected_columns
    }

    pub fn metadata_keys(&self) -> Vec<&str> {
        self.footer
            .metadata
            .iter()
            .filter_map(|item| item.name.as_deref())
            .collect()
    }

    pub fn has_metadata_value(&self, key: &str) -> bool {
        self.footer
            .metadata
            .iter()
            .any(|item| item.name.as_deref() == Some(key))
    }

    pub fn metadata_value(&self, key: &str) -> Result<&[u8]> {
        self.footer
            .metadata
            .iter()
            .find(|item| item.name.as_deref() == Some(key))
            .and_then(|item| item.value.as_deref())
            .ok_or_else(|| OrcError::out_of_range("metadata"))
    }

    /// File-level statistics, one entry per column of the root struct.
    pub fn statistics(&self) -> Vec<ColumnStatistics> {
        let mut result = Vec::new();
        for i in 0..self.schema.subtype_count() {
            if let Some(message) = self.footer.statistics.get(i + 1) {
                result.push(ColumnStatistics::from_proto(self.schema.subtype(i), message));
            }
        }
        result
    }

    pub fn column_statistics(&self, index: usize) -> Result<ColumnStatistics> {
        if index >= self.schema.subtype_count() {
            return Err(OrcError::out_of_range("column index"));
        }
        let message = self
            .footer
            .statistics
            .get(index + 1)
            .ok_or_else(|| OrcError::out_of_range("column index"))?;
        Ok(ColumnStatistics::from_proto(self.schema.subtype(index), message))
    }

    pub fn stripe_statistics(&self, stripe_index: usize) -> Result<StripeStatistics> {
        let stripe = self
            .metadata
            .stripe_stats
            .get(stripe_index)
            .ok_or_else(|| OrcError::out_of_range("stripe index"))?;
        let mut columns = Vec::new();
        for i in 0..self.schema.subtype_count() {
            if let Some(message) = stripe.col_stats.get(i + 1) {
                columns.push(ColumnStatistics::from_proto(self.schema.subtype(i), message));
            }
        }
        Ok(StripeStatistics::new(columns))
    }

    /// Build a batch tree matching the selected part of the schema.
    pub fn create_row_batch(&self, capacity: usize) -> Result<ColumnVectorBatch> {
        self.batch_for(&self.schema, capacity)
    }

    fn batch_for(&self, column: &Type, capacity: usize) -> Result<ColumnVectorBatch> {
        match column.kind() {
            TypeKind::Boolean
            | TypeKind::Byte
            | TypeKind::Short
            | TypeKind::Int
            | TypeKind::Long
            | TypeKind::Timestamp
            | TypeKind::Date => Ok(ColumnVectorBatch::long(capacity)),
            TypeKind::Float | TypeKind::Double => Ok(ColumnVectorBatch::double(capacity)),
            TypeKind::String | TypeKind::Binary | TypeKind::Char | TypeKind::Varchar => {
                Ok(ColumnVectorBatch::string(capacity))
            }
            TypeKind::Struct => {
                let mut fields = Vec::new();
                for i in 0..column.subtype_count() {
                    let child = column.subtype(i);
                    if self.is_selected(child.column_id()) {
                        fields.push(self.batch_for(child, capacity)?);
                    }
                }
                Ok(ColumnVectorBatch::structs(capacity, fields))
            }
            TypeKind::List => {
                let child = column.subtype(0);
                let elements = if self.is_selected(child.column_id()) {
                    Some(self.batch_for(child, capacity)?)
                } else {
                    None
                };
                Ok(ColumnVectorBatch::list(capacity, elements))
            }
            TypeKind::Map => {
                let keys = if self.is_selected(column.subtype(0).column_id()) {
                    Some(self.batch_for(column.subtype(0), capacity)?)
                } else {
                    None
                };
                let elements = if self.is_selected(column.subtype(1).column_id()) {
                    Some(self.batch_for(column.subtype(1), capacity)?)
                } else {
                    None
                };
                Ok(ColumnVectorBatch::map(capacity, keys, elements))
            }
            TypeKind::Decimal => {
                let precision = column.precision();
                if precision == 0 || precision > 18 {
                    Ok(ColumnVectorBatch::decimal128(
                        capacity,
                        precision as i32,
                        column.scale() as i32,
                    ))
                } else {
                    Ok(ColumnVectorBatch::decimal64(
                        capacity,
                        precision as i32,
                        column.scale() as i32,
                    ))
                }
            }
            TypeKind::Union => Err(OrcError::not_implemented("union row batches")),
        }
    }

    fn is_selected(&self, column_id: u32) -> bool {
        self.selected_columns
            .get(column_id as usize)
            .copied()
            .unwrap_or(false)
    }

    /// Fill `batch` with the next rows. Returns false once every stripe in
    /// range is consumed. A failed stripe poisons the reader: every
    /// subsequent call replays the same error.
    pub fn next(&mut self, batch: &mut ColumnVectorBatch) -> Result<bool> {
        if let Some(error) = &self.poisoned {
            batch.num_elements = 0;
            return Err(error.clone());
        }
        match self.advance(batch) {
            Ok(more) => Ok(more),
            Err(error) => {
                batch.num_elements = 0;
                self.poisoned = Some(error.clone());
                Err(error)
            }
        }
    }

    fn advance(&mut self, batch: &mut ColumnVectorBatch) -> Result<bool> {
        if self.footer.stripes.is_empty() || self.current_stripe > self.last_stripe {
            batch.num_elements = 0;
            self.previous_row = match self.footer.stripes.get(self.last_stripe as usize) {
                Some(last) => {
                    self.first_row_of_stripe[self.last_stripe as usize]
                        + last.number_of_rows.unwrap_or(0)
                }
                None => 0,
            };
            return Ok(false);
        }
        if self.current_row_in_stripe == 0 {
            self.start_next_stripe()?;
        }
        let rows_to_read = (batch.capacity() as u64)
            .min(self.rows_in_current_stripe - self.current_row_in_stripe)
            as usize;
        batch.num_elements = rows_to_read;
        let reader = self
            .row_reader
            .as_mut()
            .ok_or_else(|| OrcError::parse("stripe reader missing"))?;
        reader.next(batch, rows_to_read, None)?;
        self.previous_row =
            self.first_row_of_stripe[self.current_stripe as usize] + self.current_row_in_stripe;
        self.current_row_in_stripe += rows_to_read as u64;
        if self.current_row_in_stripe >= self.rows_in_current_stripe {
            self.current_stripe += 1;
            self.current_row_in_stripe = 0;
        }
        Ok(rows_to_read != 0)
    }

    fn start_next_stripe(&mut self) -> Result<()> {
        let info = self.footer.stripes[self.current_stripe as usize].clone();
        let stripe_footer = self.read_stripe_footer(&info)?;
        self.rows_in_current_stripe = info.number_of_rows.unwrap_or(0);
        let streams = StripeStreamsImpl {
            source: Rc::clone(&self.source),
            stripe_footer: &stripe_footer,
            stripe_start: info.offset.unwrap_or(0),
            compression: self.compression,
            block_size: self.block_size,
            selected: &self.selected_columns,
        };
        self.row_reader = Some(build_reader(&self.schema, &streams)?);
        Ok(())
    }

    fn read_stripe_footer(&self, info: &proto::StripeInformation) -> Result<proto::StripeFooter> {
        let footer_start = info.offset.unwrap_or(0)
            + info.index_length.unwrap_or(0)
            + info.data_length.unwrap_or(0);
        let raw = SeekableFileStream::new(
            Rc::clone(&self.source),
            footer_start,
            info.footer_length.unwrap_or(0),
            self.block_size,
        );
        let mut stream = create_decompressor(self.compression, Box::new(raw), self.block_size)?;
        let bytes = drain(stream.as_mut())?;
        proto::StripeFooter::decode(bytes.as_slice()).map_err(|err| {
            OrcError::parse_at(
                format!("bad stripe footer in {}: {err}", self.name),
                footer_start,
            )
        })
    }

    /// The row number of the first row in the most recent batch.
    pub fn row_number(&self) -> u64 {
        self.previous_row
    }

    pub fn seek_to_row(&mut self, _row_number: u64) -> Result<()> {
        Err(OrcError::not_implemented("seek_to_row"))
    }
}

/// Newtype so the boxed source can live behind `Rc<RefCell<dyn InputSource>>`.
struct SourceCell(Box<dyn InputSource>);

impl InputSource for SourceCell {
    fn read(&mut self, dst: &mut [u8], offset: u64) -> Result<()> {
        self.0.read(dst, offset)
    }

    fn len(&self) -> u64 {
        self.0.len()
    }

    fn name(&self) -> &str {
        self.0.name()
    }
}

struct StripeStreamsImpl<'a> {
    source: Rc<RefCell<dyn InputSource>>,
    stripe_footer: &'a proto::StripeFooter,
    stripe_start: u64,
    compression: CompressionKind,
    block_size: u64,
    selected: &'a [bool],
}

impl StripeStreams for StripeStreamsImpl<'_> {
    fn selected_columns(&self) -> &[bool] {
        self.selected
    }

    fn encoding(&self, column_id: u32) -> Result<proto::ColumnEncoding> {
        self.stripe_footer
            .columns
            .get(column_id as usize)
            .cloned()
            .ok_or_else(|| {
                OrcError::parse(format!("stripe footer has no encoding for column {column_id}"))
            })
    }

    fn stream(
        &self,
        column_id: u32,
        kind: proto::stream::Kind,
    ) -> Result<Option<Box<dyn SeekableStream>>> {
        let mut offset = self.stripe_start;
        for stream in &self.stripe_footer.streams {
            let length = stream.length.unwrap_or(0);
            if stream.kind() == kind && stream.column() == column_id {
                let raw =
                    SeekableFileStream::new(Rc::clone(&self.source), offset, length, self.block_size);
                return create_decompressor(self.compression, Box::new(raw), self.block_size)
                    .map(Some);
            }
            offset += length;
        }
        Ok(None)
    }
}

/// Check the trailing magic and fall back to the file head for pre-0.12
/// files; only the trailing position avoids an extra read.
fn ensure_magic(
    source: &mut dyn InputSource,
    tail: &[u8],
    postscript_length: u64,
) -> Result<()> {
    if postscript_length as usize + 1 + MAGIC.len() > tail.len() {
        return Err(OrcError::parse("invalid postscript length"));
    }
    let postscript_start = tail.len() - 1 - postscript_length as usize;
    if &tail[postscript_start - MAGIC.len()..postscript_start] == MAGIC {
        return Ok(());
    }
    let mut head = [0u8; 3];
    source.read(&mut head, 0)?;
    if head != MAGIC {
        return Err(OrcError::parse(format!("{} is not an ORC file", source.name())));
    }
    Ok(())
}

fn check_version(name: &str, postscript: &proto::PostScript) {
    let version = &postscript.version;
    if version.first().copied().unwrap_or(0) > 0
        || version.get(1).copied().unwrap_or(0) > 12
    {
        warn!(
            "{name} was written by a newer format version {:?} than this reader understands",
            version
        );
    }
}

fn drain(stream: &mut dyn SeekableStream) -> Result<Vec<u8>> {
    let mut bytes = Vec::new();
    while let Some(window) = stream.next()? {
        bytes.extend_from_slice(&window);
    }
    Ok(bytes)
}

fn decode_section<M: Message + Default>(
    compression: CompressionKind,
    block_size: u64,
    bytes: Vec<u8>,
    what: &str,
) -> Result<M> {
    let raw = SeekableArrayStream::new(bytes);
    let mut stream = create_decompressor(compression, Box::new(raw), block_size)?;
    let decoded = drain(stream.as_mut())?;
    M::decode(decoded.as_slice())
        .map_err(|err| OrcError::parse(format!("failed to parse the {what}: {err}")))
}

/// Mark every ancestor of `column_id` selected, walking each possible parent
/// through its subtype list.
fn select_parents(selected: &mut [bool], footer: &proto::Footer, column_id: u32) {
    for parent in 0..column_id {
        let parent_type = &footer.types[parent as usize];
        if parent_type.subtypes.contains(&column_id) && !selected[parent as usize] {
            selected[parent as usize] = true;
            select_parents(selected, footer, parent);
            return;
        }
    }
}

/// Mark `column_id` and all of its descendants selected.
fn select_children(selected: &mut [bool], footer: &proto::Footer, column_id: u32) {
    let index = column_id as usize;
    if index >= selected.len() || selected[index] {
        return;
    }
    selected[index] = true;
    for &child in &footer.types[index].subtypes {
        select_children(selected, footer, child);
    }
}
