//! The first-generation integer run-length encoding.
//!
//! A control byte below 0x80 starts a run of `control + 3` values built from
//! a base varint and a signed single-byte delta; otherwise `256 - control`
//! literal varints follow. Signed streams zig-zag their varints.

use crate::error::Result;
use crate::io::stream::{PositionProvider, SeekableStream};
use crate::rle::{ByteReader, IntRleDecoder};

const MIN_REPEAT: u64 = 3;

pub struct RleDecoderV1 {
    reader: ByteReader,
    signed: bool,
    remaining_values: u64,
    value: i64,
    delta: i64,
    repeating: bool,
}

impl RleDecoderV1 {
    pub fn new(input: Box<dyn SeekableStream>, signed: bool) -> RleDecoderV1 {
        RleDecoderV1 {
            reader: ByteReader::new(input),
            signed,
            remaining_values: 0,
            value: 0,
            delta: 0,
            repeating: false,
        }
    }

    fn read_header(&mut self) -> Result<()> {
        let control = self.reader.read_byte()?;
        if control < 0x80 {
            self.remaining_values = u64::from(control) + MIN_REPEAT;
            self.repeating = true;
            self.delta = i64::from(self.reader.read_byte()? as i8);
            self.value = self.read_long()?;
        } else {
            self.remaining_values = 0x100 - u64::from(control);
            self.repeating = false;
        }
        Ok(())
    }

    fn read_long(&mut self) -> Result<i64> {
        if self.signed {
            self.reader.read_vslong()
        } else {
            Ok(self.reader.read_vulong()? as i64)
        }
    }

    fn skip_longs(&mut self, count: u64) -> Result<()> {
        for _ in 0..count {
            self.read_long()?;
        }
        Ok(())
    }
}

impl IntRleDecoder for RleDecoderV1 {
    fn seek(&mut self, position: &mut PositionProvider) -> Result<()> {
        self.reader.seek(position)?;
        self.remaining_values = 0;
        self.skip(position.next())
    }

    fn skip(&mut self, mut count: u64) -> Result<()> {
        while count > 0 {
            if self.remaining_values == 0 {
                self.read_header()?;
            }
            let consumed = count.min(self.remaining_values);
            self.remaining_values -= consumed;
            count -= consumed;
            if self.repeating {
                self.value = self.value.wrapping_add(self.delta.wrapping_mul(consumed as i64));
            } else {
                self.skip_longs(consumed)?;
            }
        }
        Ok(())
    }

    fn next(&mut self, data: &mut [i64], not_null: Option<&[u8]>) -> Result<()> {
        let num_values = data.len();
        let mut position = 0;
        while position < num_values {
            if self.remaining_values == 0 {
                self.read_header()?;
            }
            let count = (num_values - position).min(self.remaining_values as usize);
            let mut consumed: u64 = 0;
            if self.repeating {
                match not_null {
                    Some(mask) => {
                        for i in position..position + count {
                            if mask[i] != 0 {
                                data[i] = self
                                    .value
                                    .wrapping_add(self.delta.wrapping_mul(consumed as i64));
                                consumed += 1;
                            }
                        }
                    }
                    None => {
                        for (i, slot) in data[position..position + count].iter_mut().enumerate() {
                            *slot = self.value.wrapping_add(self.delta.wrapping_mul(i as i64));
                        }
                        consumed = count as u64;
                    }
                }
                self.value = self.value.wrapping_add(self.delta.wrapping_mul(consumed as i64));
            } else {
                match not_null {
                    Some(mask) => {
                        for i in position..position + count {
                            if mask[i] != 0 {
                                data[i] = self.read_long()?;
                                consumed += 1;
                            }
                        }
                    }
                    None => {
                        for i in position..position + count {
                            data[i] = self.read_long()?;
                        }
                        consumed = count as u64;
                    }
                }
            }
            self.remaining_values -= consumed;
            position += count;
        }
        Ok(())
    }
}
