// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Codec roundtrip benchmarks
//!
//! Measures encode and decode cost per strategy:
//! - Plain records (field walk plus recursion)
//! - Fixed-layout records (single block transcription)
//! - Vectors by payload size
//!
//! No I/O is involved; sinks are in-memory buffers.

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use std::hint::black_box as bb;
use std::mem::offset_of;
use std::sync::Arc;
use typewire::{Codec, Cursor, RecordBuilder, TypeRegistry};

use bytemuck::{Pod, Zeroable};

#[derive(Debug, Clone, PartialEq, Default)]
struct Message {
    seq: u64,
    stamp_ns: u64,
    payload: Vec<u8>,
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Pod, Zeroable)]
#[repr(C)]
struct Quote {
    bid: f64,
    ask: f64,
    size: u32,
    venue: u32,
}

fn bench_codec() -> Codec {
    let registry = TypeRegistry::with_builtins();

    let u64_desc = registry.descriptor_of::<u64>().expect("builtin");
    let payload_desc = registry.descriptor_of::<Vec<u8>>().expect("builtin");
    registry.register(
        RecordBuilder::<Message>::new("Message")
            .assignable("seq", &u64_desc, |m: &Message| &m.seq, |m, v| m.seq = v)
            .assignable(
                "stamp_ns",
                &u64_desc,
                |m: &Message| &m.stamp_ns,
                |m, v| m.stamp_ns = v,
            )
            .assignable(
                "payload",
                &payload_desc,
                |m: &Message| &m.payload,
                |m, v| m.payload = v,
            )
            .zero_init()
            .build()
            .expect("descriptor"),
    );

    let f64_desc = registry.descriptor_of::<f64>().expect("builtin");
    let u32_desc = registry.descriptor_of::<u32>().expect("builtin");
    registry.register(
        RecordBuilder::<Quote>::new("Quote")
            .assignable("bid", &f64_desc, |q: &Quote| &q.bid, |q, v| q.bid = v)
            .at_offset(offset_of!(Quote, bid))
            .assignable("ask", &f64_desc, |q: &Quote| &q.ask, |q, v| q.ask = v)
            .at_offset(offset_of!(Quote, ask))
            .assignable("size", &u32_desc, |q: &Quote| &q.size, |q, v| q.size = v)
            .at_offset(offset_of!(Quote, size))
            .assignable("venue", &u32_desc, |q: &Quote| &q.venue, |q, v| {
                q.venue = v;
            })
            .at_offset(offset_of!(Quote, venue))
            .zero_init()
            .fixed_layout()
            .build()
            .expect("descriptor"),
    );

    Codec::new(Arc::new(registry))
}

fn bench_encode_by_payload_size(c: &mut Criterion) {
    let mut group = c.benchmark_group("encode_by_payload_size");
    let codec = bench_codec();

    for size in [64, 256, 1024, 4096, 16384] {
        let msg = Message {
            seq: 42,
            stamp_ns: 1_700_000_000,
            payload: vec![0xAB; size],
        };
        let mut sink = Vec::with_capacity(size + 64);
        group.bench_with_input(BenchmarkId::from_parameter(size), &size, |b, _size| {
            b.iter(|| {
                sink.clear();
                codec.encode(&mut sink, bb(&msg)).expect("encode");
            });
        });
    }

    group.finish();
}

fn bench_decode_by_payload_size(c: &mut Criterion) {
    let mut group = c.benchmark_group("decode_by_payload_size");
    let codec = bench_codec();

    for size in [64, 1024, 16384] {
        let msg = Message {
            seq: 42,
            stamp_ns: 1_700_000_000,
            payload: vec![0xAB; size],
        };
        let bytes = codec.encode_to_vec(&msg).expect("encode");
        group.bench_with_input(BenchmarkId::from_parameter(size), &size, |b, _size| {
            b.iter(|| {
                let back: Message = codec.decode_from_slice(bb(&bytes)).expect("decode");
                bb(back)
            });
        });
    }

    group.finish();
}

fn bench_record_strategies(c: &mut Criterion) {
    let mut group = c.benchmark_group("record_strategies");
    let codec = bench_codec();

    let quote = Quote {
        bid: 101.25,
        ask: 101.26,
        size: 500,
        venue: 3,
    };
    let quote_bytes = codec.encode_to_vec(&quote).expect("encode");
    let mut sink = Vec::with_capacity(64);

    group.bench_function("raw_encode", |b| {
        b.iter(|| {
            sink.clear();
            codec.encode(&mut sink, bb(&quote)).expect("encode");
        });
    });

    group.bench_function("raw_decode", |b| {
        b.iter(|| {
            let back: Quote = codec.decode_from_slice(bb(&quote_bytes)).expect("decode");
            bb(back)
        });
    });

    let quotes = vec![quote; 1024];
    group.bench_function("raw_block_1024", |b| {
        let mut block = Vec::with_capacity(1024 * std::mem::size_of::<Quote>());
        b.iter(|| {
            block.clear();
            codec.encode_block(&mut block, bb(&quotes)).expect("encode block");
        });
    });

    let mut block = Vec::new();
    codec.encode_block(&mut block, &quotes).expect("encode block");
    group.bench_function("raw_block_decode_1024", |b| {
        b.iter(|| {
            let back = codec
                .decode_block::<Quote>(&mut Cursor::new(bb(&block)), quotes.len())
                .expect("decode block");
            bb(back)
        });
    });

    group.finish();
}

criterion_group!(
    roundtrip_benches,
    bench_encode_by_payload_size,
    bench_decode_by_payload_size,
    bench_record_strategies
);
criterion_main!(roundtrip_benches);
