// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Fuzz target for the decoder.
//!
//! Feeds arbitrary bytes to every decode strategy through registered
//! descriptors. None of these operations may panic on any input; they fail
//! with a codec error or succeed.

#![no_main]

use libfuzzer_sys::fuzz_target;
use std::mem::offset_of;
use std::sync::{Arc, OnceLock};
use typewire::{
    Codec, CodecConfig, Cursor, MultiArray, PrimitiveKind, RecordBuilder, TextEncoding, TimeSpan,
    Timestamp, TypeDescriptor, TypeRegistry,
};

use bytemuck::{Pod, Zeroable};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq)]
enum Mode {
    Off,
    On,
}

#[derive(Debug, Clone, PartialEq, Default)]
struct Probe {
    id: u32,
    label: String,
    samples: Vec<f64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Pod, Zeroable)]
#[repr(C)]
struct Packed {
    key: u64,
    flags: u32,
    crc: u32,
}

fn build_codec() -> Codec {
    let registry = TypeRegistry::with_builtins();

    registry.register(TypeDescriptor::enum_of::<Mode>(
        "Mode",
        PrimitiveKind::U8,
        |mode| match mode {
            Mode::Off => 0,
            Mode::On => 1,
        },
        |raw| match raw {
            0 => Some(Mode::Off),
            1 => Some(Mode::On),
            _ => None,
        },
    ));

    let u8_desc = registry.descriptor_of::<u8>().expect("builtin");
    registry.register(TypeDescriptor::multi_of::<u8>(&u8_desc, 2));

    let u32_desc = registry.descriptor_of::<u32>().expect("builtin");
    let string_desc = registry.descriptor_of::<String>().expect("builtin");
    let samples_desc = registry.descriptor_of::<Vec<f64>>().expect("builtin");
    registry.register(
        RecordBuilder::<Probe>::new("Probe")
            .assignable("id", &u32_desc, |p: &Probe| &p.id, |p, v| p.id = v)
            .assignable("label", &string_desc, |p: &Probe| &p.label, |p, v| {
                p.label = v;
            })
            .assignable(
                "samples",
                &samples_desc,
                |p: &Probe| &p.samples,
                |p, v| p.samples = v,
            )
            .zero_init()
            .build()
            .expect("descriptor"),
    );

    let u64_desc = registry.descriptor_of::<u64>().expect("builtin");
    registry.register(
        RecordBuilder::<Packed>::new("Packed")
            .assignable("key", &u64_desc, |p: &Packed| &p.key, |p, v| p.key = v)
            .at_offset(offset_of!(Packed, key))
            .assignable("flags", &u32_desc, |p: &Packed| &p.flags, |p, v| {
                p.flags = v;
            })
            .at_offset(offset_of!(Packed, flags))
            .assignable("crc", &u32_desc, |p: &Packed| &p.crc, |p, v| p.crc = v)
            .at_offset(offset_of!(Packed, crc))
            .zero_init()
            .fixed_layout()
            .build()
            .expect("descriptor"),
    );

    Codec::new(Arc::new(registry))
}

fn shared_codec() -> &'static Codec {
    static CODEC: OnceLock<Codec> = OnceLock::new();
    CODEC.get_or_init(build_codec)
}

fn utf16_codec() -> &'static Codec {
    static CODEC: OnceLock<Codec> = OnceLock::new();
    CODEC.get_or_init(|| {
        Codec::with_config(
            shared_codec().registry().clone(),
            CodecConfig {
                text: TextEncoding::Utf16Le,
            },
        )
    })
}

fuzz_target!(|data: &[u8]| {
    let codec = shared_codec();

    // Low-level cursor reads must not panic.
    {
        let mut cursor = Cursor::new(data);
        let _ = cursor.read_u8();
        let _ = cursor.read_u16();
        let _ = cursor.read_u32();
        let _ = cursor.read_u64();
        let _ = cursor.read_i32();
        let _ = cursor.read_f64();
        let _ = cursor.take_bytes(4);
    }
    {
        let mut cursor = Cursor::new(data);
        while cursor.remaining() > 0 {
            if cursor.read_u8().is_err() {
                break;
            }
        }
    }

    // Every primitive strategy.
    let _ = codec.decode_from_slice::<bool>(data);
    let _ = codec.decode_from_slice::<u8>(data);
    let _ = codec.decode_from_slice::<u16>(data);
    let _ = codec.decode_from_slice::<u32>(data);
    let _ = codec.decode_from_slice::<u64>(data);
    let _ = codec.decode_from_slice::<i8>(data);
    let _ = codec.decode_from_slice::<i16>(data);
    let _ = codec.decode_from_slice::<i32>(data);
    let _ = codec.decode_from_slice::<i64>(data);
    let _ = codec.decode_from_slice::<f32>(data);
    let _ = codec.decode_from_slice::<f64>(data);
    let _ = codec.decode_from_slice::<char>(data);
    let _ = codec.decode_from_slice::<String>(data);
    let _ = codec.decode_from_slice::<Uuid>(data);
    let _ = codec.decode_from_slice::<Timestamp>(data);
    let _ = codec.decode_from_slice::<TimeSpan>(data);

    // Array strategies, including hostile extents headers.
    let _ = codec.decode_from_slice::<Vec<u8>>(data);
    let _ = codec.decode_from_slice::<Vec<u64>>(data);
    let _ = codec.decode_from_slice::<Vec<String>>(data);
    let _ = codec.decode_from_slice::<MultiArray<u8>>(data);

    // Enum, record, and fixed-layout strategies.
    let _ = codec.decode_from_slice::<Mode>(data);
    let _ = codec.decode_from_slice::<Probe>(data);
    let _ = codec.decode_from_slice::<Packed>(data);

    // Text strategies under the alternate encoding.
    let utf16 = utf16_codec();
    let _ = utf16.decode_from_slice::<char>(data);
    let _ = utf16.decode_from_slice::<String>(data);
    let _ = utf16.decode_from_slice::<Probe>(data);
});
