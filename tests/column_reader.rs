//! Column reader scenarios driven through a scripted stripe.
//!
//! Each test wires byte-exact streams into a fake stripe and checks the
//! decoded batches row by row, including null masks, dictionary and direct
//! strings, nested structs, and skipping.

use std::collections::HashMap;

use orclite::column::{build_reader, StripeStreams};
use orclite::error::{OrcError, Result};
use orclite::io::stream::{SeekableArrayStream, SeekableStream};
use orclite::proto;
use orclite::proto::column_encoding::Kind as EncodingKind;
use orclite::proto::stream::Kind as StreamKind;
use orclite::schema::{Type, TypeKind};
use orclite::vector::ColumnVectorBatch;

struct ScriptedStripe {
    selected: Vec<bool>,
    encodings: HashMap<u32, proto::ColumnEncoding>,
    streams: HashMap<(u32, StreamKind), (Vec<u8>, usize)>,
}

impl ScriptedStripe {
    fn new(selected: Vec<bool>) -> ScriptedStripe {
        ScriptedStripe {
            selected,
            encodings: HashMap::new(),
            streams: HashMap::new(),
        }
    }

    fn set_encoding(&mut self, column: u32, kind: EncodingKind, dictionary_size: u32) {
        self.encodings.insert(
            column,
            proto::ColumnEncoding {
                kind: Some(kind as i32),
                dictionary_size: Some(dictionary_size),
            },
        );
    }

    fn set_stream(&mut self, column: u32, kind: StreamKind, bytes: Vec<u8>) {
        self.streams.insert((column, kind), (bytes, usize::MAX));
    }

    fn set_chunked_stream(&mut self, column: u32, kind: StreamKind, bytes: Vec<u8>, chunk: usize) {
        self.streams.insert((column, kind), (bytes, chunk));
    }
}

impl StripeStreams for ScriptedStripe {
    fn selected_columns(&self) -> &[bool] {
        &self.selected
    }

    fn encoding(&self, column_id: u32) -> Result<proto::ColumnEncoding> {
        Ok(self.encodings.get(&column_id).cloned().unwrap_or(
            proto::ColumnEncoding {
                kind: Some(EncodingKind::Direct as i32),
                dictionary_size: None,
            },
        ))
    }

    fn stream(
        &self,
        column_id: u32,
        kind: StreamKind,
    ) -> Result<Option<Box<dyn SeekableStream>>> {
        Ok(self.streams.get(&(column_id, kind)).map(|(bytes, chunk)| {
            let chunk = (*chunk).min(bytes.len().max(1));
            Box::new(SeekableArrayStream::with_chunk_size(bytes.clone(), chunk))
                as Box<dyn SeekableStream>
        }))
    }
}

fn int_schema() -> Type {
    let mut schema = Type::struct_type(vec![("myInt", Type::primitive(TypeKind::Int))]);
    schema.assign_ids(0);
    schema
}

fn string_schema(kind: TypeKind) -> Type {
    let mut schema = Type::struct_type(vec![("col0", Type::primitive(kind))]);
    schema.assign_ids(0);
    schema
}

#[test]
fn integer_with_nulls() {
    let mut stripe = ScriptedStripe::new(vec![true, true]);
    stripe.set_stream(1, StreamKind::Present, vec![0x19, 0xf0]);
    stripe.set_stream(1, StreamKind::Data, vec![0x64, 0x01, 0x00]);

    let schema = int_schema();
    let mut reader = build_reader(&schema, &stripe).unwrap();
    let mut batch = ColumnVectorBatch::structs(1024, vec![ColumnVectorBatch::long(1024)]);
    reader.next(&mut batch, 200, None).unwrap();

    assert_eq!(batch.num_elements, 200);
    assert!(!batch.has_nulls);
    let longs = &batch.fields().unwrap()[0];
    assert_eq!(longs.num_elements, 200);
    assert!(longs.has_nulls);
    let data = longs.as_longs().unwrap();
    let mut next = 0;
    for i in 0..200 {
        if i & 4 != 0 {
            assert_eq!(longs.not_null[i], 0, "row {i} should be null");
        } else {
            assert_eq!(longs.not_null[i], 1, "row {i} should be present");
            assert_eq!(data[i], next, "row {i}");
            next += 1;
        }
    }
}

#[test]
fn dictionary_with_nulls() {
    let mut stripe = ScriptedStripe::new(vec![true, true]);
    stripe.set_encoding(1, EncodingKind::Dictionary, 2);
    stripe.set_stream(1, StreamKind::Present, vec![0x19, 0xf0]);
    stripe.set_stream(1, StreamKind::Data, vec![0x2f, 0x00, 0x00, 0x2f, 0x00, 0x01]);
    stripe.set_stream(1, StreamKind::DictionaryData, b"ORCOwen".to_vec());
    stripe.set_stream(1, StreamKind::Length, vec![0x02, 0x01, 0x03]);

    let schema = string_schema(TypeKind::String);
    let mut reader = build_reader(&schema, &stripe).unwrap();
    let mut batch = ColumnVectorBatch::structs(1024, vec![ColumnVectorBatch::string(1024)]);
    reader.next(&mut batch, 200, None).unwrap();

    assert_eq!(batch.num_elements, 200);
    assert!(!batch.has_nulls);
    let strings = &batch.fields().unwrap()[0];
    assert_eq!(strings.num_elements, 200);
    assert!(strings.has_nulls);
    let values = strings.as_strings().unwrap();
    for i in 0..200 {
        if i & 4 != 0 {
            assert_eq!(strings.not_null[i], 0, "row {i} should be null");
        } else {
            assert_eq!(strings.not_null[i], 1, "row {i} should be present");
            let expected: &[u8] = if i < 98 { b"ORC" } else { b"Owen" };
            assert_eq!(values[i].as_ref(), expected, "row {i}");
        }
    }
}

#[test]
fn varchar_and_char_decode_through_the_dictionary() {
    let mut stripe = ScriptedStripe::new(vec![true, true, true, false]);
    stripe.set_encoding(1, EncodingKind::Dictionary, 2);
    stripe.set_encoding(2, EncodingKind::Dictionary, 0);
    stripe.set_encoding(3, EncodingKind::Dictionary, 0);
    stripe.set_stream(1, StreamKind::Present, vec![0x16, 0xff]);
    stripe.set_stream(
        1,
        StreamKind::Data,
        vec![0x61, 0x00, 0x01, 0x61, 0x00, 0x00],
    );
    stripe.set_stream(1, StreamKind::DictionaryData, b"ORCOwen".to_vec());
    stripe.set_stream(1, StreamKind::Length, vec![0x02, 0x01, 0x03]);
    stripe.set_stream(2, StreamKind::Present, vec![0x16, 0x00]);
    stripe.set_stream(2, StreamKind::Data, vec![]);
    stripe.set_stream(2, StreamKind::DictionaryData, vec![]);
    stripe.set_stream(2, StreamKind::Length, vec![]);

    let mut schema = Type::struct_type(vec![
        ("col0", Type::char_type(TypeKind::Varchar, 10)),
        ("col1", Type::char_type(TypeKind::Char, 10)),
        ("col2", Type::primitive(TypeKind::String)),
    ]);
    schema.assign_ids(0);

    let mut reader = build_reader(&schema, &stripe).unwrap();
    let mut batch = ColumnVectorBatch::structs(
        1024,
        vec![
            ColumnVectorBatch::string(1024),
            ColumnVectorBatch::string(1024),
        ],
    );
    reader.next(&mut batch, 200, None).unwrap();

    assert_eq!(batch.num_elements, 200);
    assert!(!batch.has_nulls);
    let fields = batch.fields().unwrap();
    let strings = &fields[0];
    let nulls = &fields[1];
    assert_eq!(strings.num_elements, 200);
    assert!(!strings.has_nulls);
    assert_eq!(nulls.num_elements, 200);
    assert!(nulls.has_nulls);
    let values = strings.as_strings().unwrap();
    for i in 0..200 {
        assert_eq!(strings.not_null[i], 1);
        assert_eq!(nulls.not_null[i], 0);
        let expected: &[u8] = if i < 100 { b"Owen" } else { b"ORC" };
        assert_eq!(values[i].as_ref(), expected, "row {i}");
    }
}

#[test]
fn substructs_with_nulls() {
    let mut stripe = ScriptedStripe::new(vec![true, true, true, true]);
    stripe.set_stream(1, StreamKind::Present, vec![0x16, 0x0f]);
    stripe.set_stream(2, StreamKind::Present, vec![0x0a, 0x55]);
    stripe.set_stream(3, StreamKind::Present, vec![0x04, 0xf0]);
    stripe.set_stream(3, StreamKind::Data, vec![0x17, 0x01, 0x00]);

    let mut schema = Type::struct_type(vec![(
        "col0",
        Type::struct_type(vec![(
            "col1",
            Type::struct_type(vec![("col2", Type::primitive(TypeKind::Long))]),
        )]),
    )]);
    schema.assign_ids(0);

    let mut reader = build_reader(&schema, &stripe).unwrap();
    let longs_batch = ColumnVectorBatch::long(1024);
    let inner = ColumnVectorBatch::structs(1024, vec![longs_batch]);
    let middle = ColumnVectorBatch::structs(1024, vec![inner]);
    let mut batch = ColumnVectorBatch::structs(1024, vec![middle]);
    reader.next(&mut batch, 200, None).unwrap();

    assert_eq!(batch.num_elements, 200);
    assert!(!batch.has_nulls);
    let middle = &batch.fields().unwrap()[0];
    assert_eq!(middle.num_elements, 200);
    assert!(middle.has_nulls);
    let inner = &middle.fields().unwrap()[0];
    assert_eq!(inner.num_elements, 200);
    assert!(inner.has_nulls);
    let longs = &inner.fields().unwrap()[0];
    assert_eq!(longs.num_elements, 200);
    assert!(longs.has_nulls);

    let data = longs.as_longs().unwrap();
    let mut middle_count = 0;
    let mut inner_count = 0;
    let mut long_count = 0;
    for i in 0..200 {
        if i & 4 != 0 {
            assert_eq!(middle.not_null[i], 1, "row {i}");
            let was_middle = middle_count;
            middle_count += 1;
            if was_middle & 1 != 0 {
                assert_eq!(inner.not_null[i], 1, "row {i}");
                let was_inner = inner_count;
                inner_count += 1;
                if was_inner & 4 != 0 {
                    assert_eq!(longs.not_null[i], 0, "row {i}");
                } else {
                    assert_eq!(longs.not_null[i], 1, "row {i}");
                    assert_eq!(data[i], long_count, "row {i}");
                    long_count += 1;
                }
            } else {
                assert_eq!(inner.not_null[i], 0, "row {i}");
                assert_eq!(longs.not_null[i], 0, "row {i}");
            }
        } else {
            assert_eq!(middle.not_null[i], 0, "row {i}");
            assert_eq!(inner.not_null[i], 0, "row {i}");
            assert_eq!(longs.not_null[i], 0, "row {i}");
        }
    }
}

#[test]
fn child_without_present_inherits_the_parent_mask() {
    // only the outer struct carries a PRESENT stream; the long column
    // inherits its mask
    let mut stripe = ScriptedStripe::new(vec![true, true, true]);
    stripe.set_stream(1, StreamKind::Present, vec![0x16, 0x0f]);
    stripe.set_stream(2, StreamKind::Data, vec![0x61, 0x01, 0x00]);

    let mut schema = Type::struct_type(vec![(
        "col0",
        Type::struct_type(vec![("col1", Type::primitive(TypeKind::Long))]),
    )]);
    schema.assign_ids(0);

    let mut reader = build_reader(&schema, &stripe).unwrap();
    let longs_batch = ColumnVectorBatch::long(1024);
    let outer = ColumnVectorBatch::structs(1024, vec![longs_batch]);
    let mut batch = ColumnVectorBatch::structs(1024, vec![outer]);
    reader.next(&mut batch, 200, None).unwrap();

    assert!(!batch.has_nulls);
    let outer = &batch.fields().unwrap()[0];
    assert!(outer.has_nulls);
    let longs = &outer.fields().unwrap()[0];
    assert_eq!(longs.num_elements, 200);
    assert!(longs.has_nulls, "the inherited mask carries real nulls");
    let data = longs.as_longs().unwrap();
    let mut next = 0;
    for i in 0..200 {
        assert_eq!(
            longs.not_null[i], outer.not_null[i],
            "row {i} mask must match the parent"
        );
        if i & 4 != 0 {
            assert_eq!(longs.not_null[i], 1, "row {i}");
            assert_eq!(data[i], next, "row {i}");
            next += 1;
        } else {
            assert_eq!(longs.not_null[i], 0, "row {i}");
        }
    }
}

#[test]
fn all_present_inherited_mask_reports_no_nulls() {
    let mut stripe = ScriptedStripe::new(vec![true, true]);
    stripe.set_stream(1, StreamKind::Data, vec![0x61, 0x01, 0x00]);

    let schema = int_schema();
    let mut reader = build_reader(&schema, &stripe).unwrap();
    let mut batch = ColumnVectorBatch::structs(100, vec![ColumnVectorBatch::long(100)]);
    let mask = vec![1u8; 100];
    reader.next(&mut batch, 100, Some(&mask)).unwrap();

    assert!(!batch.has_nulls, "an all-present mask holds no nulls");
    let longs = &batch.fields().unwrap()[0];
    assert!(!longs.has_nulls);
    assert_eq!(&longs.as_longs().unwrap()[..3], &[0, 1, 2]);
}

#[test]
fn skip_with_nulls_lands_on_the_present_run() {
    let present = vec![0x03, 0x00, 0xff, 0x3f, 0x08, 0xff, 0xff, 0xfc, 0x03, 0x00];
    let mut stripe = ScriptedStripe::new(vec![true, true, true]);
    stripe.set_encoding(2, EncodingKind::Dictionary, 100);
    stripe.set_stream(1, StreamKind::Present, present.clone());
    stripe.set_stream(2, StreamKind::Present, present);
    stripe.set_stream(1, StreamKind::Data, vec![0x61, 0x01, 0x00]);
    stripe.set_stream(2, StreamKind::Data, vec![0x61, 0x01, 0x00]);

    // dictionary of "00" through "99"
    let mut digits = Vec::with_capacity(200);
    for i in 0..10u8 {
        for j in 0..10u8 {
            digits.push(b'0' + i);
            digits.push(b'0' + j);
        }
    }
    stripe.set_stream(2, StreamKind::DictionaryData, digits);
    stripe.set_stream(2, StreamKind::Length, vec![0x61, 0x00, 0x02]);

    let mut schema = Type::struct_type(vec![
        ("myInt", Type::primitive(TypeKind::Int)),
        ("myString", Type::primitive(TypeKind::String)),
    ]);
    schema.assign_ids(0);

    let mut reader = build_reader(&schema, &stripe).unwrap();
    let mut batch = ColumnVectorBatch::structs(
        100,
        vec![
            ColumnVectorBatch::long(100),
            ColumnVectorBatch::string(100),
        ],
    );

    reader.next(&mut batch, 20, None).unwrap();
    assert_eq!(batch.num_elements, 20);
    assert!(!batch.has_nulls);
    {
        let fields = batch.fields().unwrap();
        assert!(fields[0].has_nulls);
        assert!(fields[1].has_nulls);
        for i in 0..20 {
            assert_eq!(fields[0].not_null[i], 0, "row {i}");
            assert_eq!(fields[1].not_null[i], 0, "row {i}");
        }
    }

    reader.skip(30).unwrap();
    reader.next(&mut batch, 100, None).unwrap();
    assert_eq!(batch.num_elements, 100);
    assert!(!batch.has_nulls);
    let fields = batch.fields().unwrap();
    assert!(!fields[0].has_nulls);
    assert!(!fields[1].has_nulls);
    let longs = fields[0].as_longs().unwrap();
    let strings = fields[1].as_strings().unwrap();
    for i in 0..10u8 {
        for j in 0..10u8 {
            let k = usize::from(10 * i + j);
            assert_eq!(fields[0].not_null[k], 1, "row {k}");
            assert_eq!(longs[k], k as i64, "row {k}");
            assert_eq!(
                strings[k].as_ref(),
                &[b'0' + i, b'0' + j],
                "row {k}"
            );
        }
    }

    reader.skip(50).unwrap();
}

#[test]
fn binary_direct() {
    let mut stripe = ScriptedStripe::new(vec![true, true]);
    let mut blob = Vec::with_capacity(200);
    for i in 0..10u8 {
        for j in 0..10u8 {
            blob.push(i);
            blob.push(j);
        }
    }
    stripe.set_stream(1, StreamKind::Data, blob);
    stripe.set_stream(1, StreamKind::Length, vec![0x61, 0x00, 0x02]);

    let schema = string_schema(TypeKind::Binary);
    let mut reader = build_reader(&schema, &stripe).unwrap();
    let mut batch = ColumnVectorBatch::structs(1024, vec![ColumnVectorBatch::string(1024)]);
    for pass in 0..2usize {
        reader.next(&mut batch, 50, None).unwrap();
        assert_eq!(batch.num_elements, 50);
        assert!(!batch.has_nulls);
        let strings = &batch.fields().unwrap()[0];
        assert_eq!(strings.num_elements, 50);
        assert!(!strings.has_nulls);
        let values = strings.as_strings().unwrap();
        for j in 0..50 {
            let item = (50 * pass + j) as u8;
            assert_eq!(
                values[j].as_ref(),
                &[item / 10, item % 10],
                "item {item}"
            );
        }
    }
}

#[test]
fn binary_direct_with_nulls() {
    let mut stripe = ScriptedStripe::new(vec![true, true]);
    stripe.set_stream(1, StreamKind::Present, vec![0x1d, 0xf0]);
    let mut blob = Vec::with_capacity(256);
    for i in 0..8u8 {
        for j in 0..16u8 {
            blob.push(b'A' + i);
            blob.push(b'A' + j);
        }
    }
    stripe.set_stream(1, StreamKind::Data, blob);
    stripe.set_stream(1, StreamKind::Length, vec![0x7d, 0x00, 0x02]);

    let schema = string_schema(TypeKind::Binary);
    let mut reader = build_reader(&schema, &stripe).unwrap();
    let mut batch = ColumnVectorBatch::structs(1024, vec![ColumnVectorBatch::string(1024)]);
    let mut next = 0u8;
    for pass in 0..2usize {
        reader.next(&mut batch, 128, None).unwrap();
        assert_eq!(batch.num_elements, 128);
        assert!(!batch.has_nulls);
        let strings = &batch.fields().unwrap()[0];
        assert_eq!(strings.num_elements, 128);
        assert!(strings.has_nulls);
        let values = strings.as_strings().unwrap();
        for j in 0..128 {
            let row = 128 * pass + j;
            assert_eq!(strings.not_null[j], u8::from(row & 4 == 0), "row {row}");
            if strings.not_null[j] != 0 {
                assert_eq!(
                    values[j].as_ref(),
                    &[b'A' + next / 16, b'A' + next % 16],
                    "row {row}"
                );
                next += 1;
            }
        }
    }
}

#[test]
fn short_blob_fails_with_a_parse_error() {
    let mut stripe = ScriptedStripe::new(vec![true, true]);
    stripe.set_stream(1, StreamKind::Data, vec![0u8; 100]);
    stripe.set_stream(1, StreamKind::Length, vec![0x61, 0x00, 0x02]);

    let schema = string_schema(TypeKind::String);
    let mut reader = build_reader(&schema, &stripe).unwrap();
    let mut batch = ColumnVectorBatch::structs(1024, vec![ColumnVectorBatch::string(1024)]);
    assert!(matches!(
        reader.next(&mut batch, 100, None),
        Err(OrcError::Parse { .. })
    ));
}

#[test]
fn string_direct_survives_window_boundaries() {
    let mut stripe = ScriptedStripe::new(vec![true, true]);
    let mut blob = Vec::with_capacity(200);
    for i in 0..10u8 {
        for j in 0..10u8 {
            blob.push(i);
            blob.push(j);
        }
    }
    stripe.set_chunked_stream(1, StreamKind::Data, blob, 3);
    stripe.set_stream(1, StreamKind::Length, vec![0x61, 0x00, 0x02]);

    let schema = string_schema(TypeKind::String);
    let mut reader = build_reader(&schema, &stripe).unwrap();
    let mut batch = ColumnVectorBatch::structs(25, vec![ColumnVectorBatch::string(25)]);
    for pass in 0..4usize {
        reader.next(&mut batch, 25, None).unwrap();
        assert_eq!(batch.num_elements, 25);
        let strings = &batch.fields().unwrap()[0];
        assert!(!strings.has_nulls);
        let values = strings.as_strings().unwrap();
        for j in 0..25 {
            let item = (25 * pass + j) as u8;
            assert_eq!(
                values[j].as_ref(),
                &[item / 10, item % 10],
                "item {item}"
            );
        }
    }
}

#[test]
fn string_direct_short_windows_with_nulls() {
    let mut stripe = ScriptedStripe::new(vec![true, true]);
    stripe.set_stream(1, StreamKind::Present, vec![0x3d, 0xf0]);
    let mut blob = Vec::with_capacity(512);
    for i in 0..16u8 {
        for j in 0..16u8 {
            blob.push(b'A' + i);
            blob.push(b'A' + j);
        }
    }
    stripe.set_chunked_stream(1, StreamKind::Data, blob, 30);
    stripe.set_stream(
        1,
        StreamKind::Length,
        vec![0x7d, 0x00, 0x02, 0x7d, 0x00, 0x02],
    );

    let schema = string_schema(TypeKind::String);
    let mut reader = build_reader(&schema, &stripe).unwrap();
    let mut batch = ColumnVectorBatch::structs(64, vec![ColumnVectorBatch::string(64)]);
    let mut next = 0usize;
    for _ in 0..8 {
        reader.next(&mut batch, 64, None).unwrap();
        assert_eq!(batch.num_elements, 64);
        let strings = &batch.fields().unwrap()[0];
        assert!(strings.has_nulls);
        let values = strings.as_strings().unwrap();
        for j in 0..64 {
            assert_eq!(strings.not_null[j], u8::from(j & 4 == 0));
            if strings.not_null[j] != 0 {
                assert_eq!(
                    values[j].as_ref(),
                    &[b'A' + (next / 16) as u8, b'A' + (next % 16) as u8]
                );
                next += 1;
            }
        }
    }
}

/// Lengths 0 through 1199 as run-length bytes: nine full 130-value runs and
/// one 30-value run, delta 1 throughout.
fn ascending_lengths() -> Vec<u8> {
    vec![
        0x7f, 0x01, 0x00, //
        0x7f, 0x01, 0x82, 0x01, //
        0x7f, 0x01, 0x84, 0x02, //
        0x7f, 0x01, 0x86, 0x03, //
        0x7f, 0x01, 0x88, 0x04, //
        0x7f, 0x01, 0x8a, 0x05, //
        0x7f, 0x01, 0x8c, 0x06, //
        0x7f, 0x01, 0x8e, 0x07, //
        0x7f, 0x01, 0x90, 0x08, //
        0x1b, 0x01, 0x92, 0x09,
    ]
}

/// Item `k` is the bytes `0, 1, …, k-1` truncated to `u8`.
fn ascending_blob() -> Vec<u8> {
    let mut blob = Vec::with_capacity(719_400);
    for item in 0..1200usize {
        for ch in 0..item {
            blob.push(ch as u8);
        }
    }
    blob
}

fn expect_ascending_item(strings: &ColumnVectorBatch, row: usize, item: usize) {
    let values = strings.as_strings().unwrap();
    assert_eq!(values[row].len(), item, "length of item {item}");
    for (j, &byte) in values[row].as_ref().iter().enumerate() {
        assert_eq!(byte, j as u8, "byte {j} of item {item}");
    }
}

#[test]
fn string_direct_skip() {
    let mut stripe = ScriptedStripe::new(vec![true, true]);
    stripe.set_chunked_stream(1, StreamKind::Data, ascending_blob(), 200);
    stripe.set_stream(1, StreamKind::Length, ascending_lengths());

    let schema = string_schema(TypeKind::String);
    let mut reader = build_reader(&schema, &stripe).unwrap();
    let mut batch = ColumnVectorBatch::structs(2, vec![ColumnVectorBatch::string(2)]);

    reader.next(&mut batch, 2, None).unwrap();
    expect_ascending_item(&batch.fields().unwrap()[0], 0, 0);
    expect_ascending_item(&batch.fields().unwrap()[0], 1, 1);

    reader.skip(14).unwrap();
    reader.next(&mut batch, 2, None).unwrap();
    expect_ascending_item(&batch.fields().unwrap()[0], 0, 16);
    expect_ascending_item(&batch.fields().unwrap()[0], 1, 17);

    reader.skip(1180).unwrap();
    reader.next(&mut batch, 2, None).unwrap();
    expect_ascending_item(&batch.fields().unwrap()[0], 0, 1198);
    expect_ascending_item(&batch.fields().unwrap()[0], 1, 1199);
}

#[test]
fn string_direct_skip_with_nulls() {
    let mut stripe = ScriptedStripe::new(vec![true, true]);
    // 2400 rows alternating four present and four null
    stripe.set_stream(
        1,
        StreamKind::Present,
        vec![0x7f, 0xf0, 0x7f, 0xf0, 0x25, 0xf0],
    );
    stripe.set_chunked_stream(1, StreamKind::Data, ascending_blob(), 200);
    stripe.set_stream(1, StreamKind::Length, ascending_lengths());

    let schema = string_schema(TypeKind::String);
    let mut reader = build_reader(&schema, &stripe).unwrap();
    let mut batch = ColumnVectorBatch::structs(2, vec![ColumnVectorBatch::string(2)]);

    reader.next(&mut batch, 2, None).unwrap();
    expect_ascending_item(&batch.fields().unwrap()[0], 0, 0);
    expect_ascending_item(&batch.fields().unwrap()[0], 1, 1);

    reader.skip(30).unwrap();
    reader.next(&mut batch, 2, None).unwrap();
    expect_ascending_item(&batch.fields().unwrap()[0], 0, 16);
    expect_ascending_item(&batch.fields().unwrap()[0], 1, 17);

    reader.skip(2364).unwrap();
    reader.next(&mut batch, 2, None).unwrap();
    let strings = &batch.fields().unwrap()[0];
    assert!(strings.has_nulls);
    assert_eq!(strings.not_null[0], 0);
    assert_eq!(strings.not_null[1], 0);
}

#[test]
fn unsupported_kinds_are_rejected() {
    let stripe = ScriptedStripe::new(vec![true; 8]);
    let unsupported = vec![
        Type::primitive(TypeKind::Float),
        Type::primitive(TypeKind::Double),
        Type::primitive(TypeKind::Boolean),
        Type::primitive(TypeKind::Timestamp),
        Type::list(Type::primitive(TypeKind::Int)),
        Type::map(
            Type::primitive(TypeKind::String),
            Type::primitive(TypeKind::Int),
        ),
        Type::union_type(vec![Type::primitive(TypeKind::Int)]),
        Type::decimal(12, 2),
        Type::primitive(TypeKind::Date),
    ];
    for column in unsupported {
        let kind = column.kind();
        let mut schema = Type::struct_type(vec![("col0", column)]);
        schema.assign_ids(0);
        assert!(
            matches!(
                build_reader(&schema, &stripe),
                Err(OrcError::NotImplemented { .. })
            ),
            "{kind} columns should be rejected"
        );
    }
}
