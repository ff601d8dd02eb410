// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com
//
// Golden wire vectors: byte-exact checks for every strategy.
//
// Fixed-width payloads are expressed through to_ne_bytes so the vectors
// hold on both little- and big-endian hosts. Each case also verifies that
// decode -> re-encode reproduces the original bytes.

#![allow(clippy::float_cmp)]

use std::mem::offset_of;
use std::sync::Arc;
use typewire::{
    ByteOrder, Codec, CodecConfig, MultiArray, PrimitiveKind, RecordBuilder, TextEncoding,
    Timestamp, TypeDescriptor, TypeRegistry,
};

use bytemuck::{Pod, Zeroable};
use uuid::Uuid;

fn builtin_codec() -> Codec {
    Codec::new(Arc::new(TypeRegistry::with_builtins()))
}

/// Encode, compare against the expected bytes, then prove the decoded
/// value re-encodes byte-identically.
fn golden<T>(codec: &Codec, name: &str, value: &T, expected: &[u8])
where
    T: PartialEq + std::fmt::Debug + 'static,
{
    let encoded = codec.encode_to_vec(value).expect("encode");
    assert_eq!(
        encoded, expected,
        "{name}: encoded bytes differ from golden vector"
    );

    let decoded: T = codec.decode_from_slice(&encoded).expect("decode");
    assert_eq!(&decoded, value, "{name}: roundtrip value mismatch");

    let re_encoded = codec.encode_to_vec(&decoded).expect("re-encode");
    assert_eq!(
        re_encoded, encoded,
        "{name}: re-encoded bytes differ from original"
    );
}

#[test]
fn golden_fixed_width_primitives() {
    let codec = builtin_codec();
    golden(&codec, "u8", &0xA5u8, &[0xA5]);
    golden(&codec, "u16", &0xBEEFu16, &0xBEEFu16.to_ne_bytes());
    golden(&codec, "u32", &0xDEAD_BEEFu32, &0xDEAD_BEEFu32.to_ne_bytes());
    golden(&codec, "i64", &(-40i64), &(-40i64).to_ne_bytes());
    golden(&codec, "f32", &1.25f32, &1.25f32.to_ne_bytes());
    golden(&codec, "f64", &-0.5f64, &(-0.5f64).to_ne_bytes());
}

#[test]
fn golden_bool_single_byte() {
    let codec = builtin_codec();
    golden(&codec, "bool_true", &true, &[0x01]);
    golden(&codec, "bool_false", &false, &[0x00]);
}

#[test]
fn golden_utf8_strings() {
    let codec = builtin_codec();
    golden(&codec, "string_ok", &"ok".to_string(), &[0x6F, 0x6B, 0x00]);
    golden(&codec, "string_empty", &String::new(), &[0x00]);
    golden(
        &codec,
        "string_multibyte",
        &"héllo".to_string(),
        &[0x68, 0xC3, 0xA9, 0x6C, 0x6C, 0x6F, 0x00],
    );
}

#[test]
fn golden_utf16_string() {
    let codec = Codec::with_config(
        Arc::new(TypeRegistry::with_builtins()),
        CodecConfig {
            text: TextEncoding::Utf16Le,
        },
    );
    // Code units free of zero bytes, so the sentinel scan is unambiguous.
    golden(
        &codec,
        "string_utf16",
        &"\u{0101}\u{0142}".to_string(),
        &[0x01, 0x01, 0x42, 0x01, 0x00],
    );
}

#[test]
fn golden_guid_raw_bytes() {
    let codec = builtin_codec();
    let id = Uuid::from_bytes([
        0x00, 0x11, 0x22, 0x33, 0x44, 0x55, 0x66, 0x77, 0x88, 0x99, 0xAA, 0xBB, 0xCC, 0xDD,
        0xEE, 0xFF,
    ]);
    golden(
        &codec,
        "guid",
        &id,
        &[
            0x00, 0x11, 0x22, 0x33, 0x44, 0x55, 0x66, 0x77, 0x88, 0x99, 0xAA, 0xBB, 0xCC, 0xDD,
            0xEE, 0xFF,
        ],
    );
}

#[test]
fn golden_timestamp_ticks() {
    let codec = builtin_codec();
    let at = Timestamp::from_ticks(638_704_224_000_000_000);
    golden(&codec, "timestamp", &at, &at.ticks().to_ne_bytes());
}

#[test]
fn golden_vector_extents_header() {
    let codec = builtin_codec();
    let mut expected = 3i32.to_ne_bytes().to_vec();
    expected.extend_from_slice(&[5, 6, 7]);
    golden(&codec, "vec_u8", &vec![5u8, 6, 7], &expected);

    golden(
        &codec,
        "vec_empty",
        &Vec::<u8>::new(),
        &0i32.to_ne_bytes(),
    );
}

#[test]
fn golden_rank_two_array_row_major() {
    let registry = TypeRegistry::with_builtins();
    let u8_desc = registry.descriptor_of::<u8>().expect("builtin");
    registry.register(TypeDescriptor::multi_of::<u8>(&u8_desc, 2));
    let codec = Codec::new(Arc::new(registry));

    let grid = MultiArray::from_vec(vec![2, 3], vec![1u8, 2, 3, 4, 5, 6]).expect("shape");
    let mut expected = Vec::new();
    expected.extend_from_slice(&2i32.to_ne_bytes());
    expected.extend_from_slice(&3i32.to_ne_bytes());
    expected.extend_from_slice(&[1, 2, 3, 4, 5, 6]);
    golden(&codec, "grid_2x3", &grid, &expected);
}

#[test]
fn golden_rank_three_array_row_major() {
    let registry = TypeRegistry::with_builtins();
    let u16_desc = registry.descriptor_of::<u16>().expect("builtin");
    registry.register(TypeDescriptor::multi_of::<u16>(&u16_desc, 3));
    let codec = Codec::new(Arc::new(registry));

    // Extents stream most significant dimension first; the last index
    // varies fastest, so cells 1..=24 are already in stream order.
    let cells: Vec<u16> = (1..=24).collect();
    let grid = MultiArray::from_vec(vec![2, 3, 4], cells.clone()).expect("shape");
    let mut expected = Vec::new();
    expected.extend_from_slice(&2i32.to_ne_bytes());
    expected.extend_from_slice(&3i32.to_ne_bytes());
    expected.extend_from_slice(&4i32.to_ne_bytes());
    for cell in &cells {
        expected.extend_from_slice(&cell.to_ne_bytes());
    }
    golden(&codec, "grid_2x3x4", &grid, &expected);
}

#[test]
fn golden_rank_four_array_row_major() {
    let registry = TypeRegistry::with_builtins();
    let f64_desc = registry.descriptor_of::<f64>().expect("builtin");
    registry.register(TypeDescriptor::multi_of::<f64>(&f64_desc, 4));
    let codec = Codec::new(Arc::new(registry));

    let cells: Vec<f64> = (0..16).map(|i| f64::from(i) * 0.25 - 2.0).collect();
    let grid = MultiArray::from_vec(vec![2, 2, 2, 2], cells.clone()).expect("shape");
    let mut expected = Vec::new();
    for extent in [2i32; 4] {
        expected.extend_from_slice(&extent.to_ne_bytes());
    }
    for cell in &cells {
        expected.extend_from_slice(&cell.to_ne_bytes());
    }
    golden(&codec, "grid_2x2x2x2", &grid, &expected);
}

#[test]
fn golden_enum_discriminant() {
    #[derive(Debug, Clone, Copy, PartialEq)]
    enum Level {
        Low,
        High,
    }

    let registry = TypeRegistry::with_builtins();
    registry.register(TypeDescriptor::enum_of::<Level>(
        "Level",
        PrimitiveKind::U16,
        |level| match level {
            Level::Low => 100,
            Level::High => 200,
        },
        |raw| match raw {
            100 => Some(Level::Low),
            200 => Some(Level::High),
            _ => None,
        },
    ));
    let codec = Codec::new(Arc::new(registry));
    golden(&codec, "enum_u16", &Level::High, &200u16.to_ne_bytes());
}

#[derive(Debug, Clone, PartialEq, Default)]
struct Fix {
    id: u32,
    tag: String,
}

fn register_fix(registry: &TypeRegistry) {
    let u32_desc = registry.descriptor_of::<u32>().expect("builtin");
    let string_desc = registry.descriptor_of::<String>().expect("builtin");
    let desc = RecordBuilder::<Fix>::new("Fix")
        .assignable("id", &u32_desc, |f: &Fix| &f.id, |f, v| f.id = v)
        .assignable("tag", &string_desc, |f: &Fix| &f.tag, |f, v| f.tag = v)
        .zero_init()
        .build()
        .expect("descriptor");
    registry.register(desc);
}

#[test]
fn golden_record_by_field() {
    let registry = TypeRegistry::with_builtins();
    register_fix(&registry);
    let codec = Codec::new(Arc::new(registry));

    let value = Fix {
        id: 0x0102_0304,
        tag: "go".to_string(),
    };
    let mut expected = 0x0102_0304u32.to_ne_bytes().to_vec();
    expected.extend_from_slice(&[0x67, 0x6F, 0x00]);
    golden(&codec, "record_by_field", &value, &expected);
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Pod, Zeroable)]
#[repr(C)]
struct Frame {
    seq: u32,
    len: u32,
}

fn register_frame(registry: &TypeRegistry, seq_order: ByteOrder) {
    let u32_desc = registry.descriptor_of::<u32>().expect("builtin");
    let desc = RecordBuilder::<Frame>::new("Frame")
        .assignable("seq", &u32_desc, |f: &Frame| &f.seq, |f, v| f.seq = v)
        .byte_order(seq_order)
        .at_offset(offset_of!(Frame, seq))
        .assignable("len", &u32_desc, |f: &Frame| &f.len, |f, v| f.len = v)
        .at_offset(offset_of!(Frame, len))
        .zero_init()
        .fixed_layout()
        .build()
        .expect("descriptor");
    registry.register(desc);
}

#[test]
fn golden_raw_record_is_memory_image() {
    let registry = TypeRegistry::with_builtins();
    register_frame(&registry, ByteOrder::Native);
    let codec = Codec::new(Arc::new(registry));

    let value = Frame {
        seq: 0x0A0B_0C0D,
        len: 32,
    };
    golden(
        &codec,
        "raw_record",
        &value,
        bytemuck::bytes_of(&value),
    );
}

#[test]
fn golden_raw_record_foreign_order_reverses_field() {
    let foreign = if ByteOrder::host() == ByteOrder::Little {
        ByteOrder::Big
    } else {
        ByteOrder::Little
    };
    let registry = TypeRegistry::with_builtins();
    register_frame(&registry, foreign);
    let codec = Codec::new(Arc::new(registry));

    let value = Frame {
        seq: 0x0A0B_0C0D,
        len: 32,
    };
    let plain = bytemuck::bytes_of(&value);
    let mut expected = plain.to_vec();
    expected[0..4].reverse();
    golden(&codec, "raw_record_foreign", &value, &expected);
}

#[test]
fn golden_block_concatenates_raw_records() {
    let registry = TypeRegistry::with_builtins();
    register_frame(&registry, ByteOrder::Native);
    let codec = Codec::new(Arc::new(registry));

    let items = [
        Frame { seq: 1, len: 10 },
        Frame { seq: 2, len: 20 },
        Frame { seq: 3, len: 30 },
    ];
    let mut sink = Vec::new();
    codec.encode_block(&mut sink, &items).expect("encode block");

    let mut expected = Vec::new();
    for item in &items {
        expected.extend_from_slice(bytemuck::bytes_of(item));
    }
    assert_eq!(sink, expected, "block bytes are the concatenated images");

    let back = codec
        .decode_block::<Frame>(&mut typewire::Cursor::new(&sink), items.len())
        .expect("decode block");
    assert_eq!(back, items);
}
