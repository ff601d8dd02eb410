// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Record strategies.
//!
//! Plain records stream field by field in declaration order, on both sides.
//! Reconstruction resolves once per descriptor: a paired constructor, the
//! zero-init factory, or a hard error. Fixed-layout records skip the field
//! walk entirely and transcribe the in-memory block, with byte-order fixups
//! applied on the wire side.

use crate::codec::Codec;
use crate::descriptor::record::RecordDescriptor;
use crate::descriptor::resolve::ReconstructPath;
use crate::descriptor::{mismatch_of, TypeDescriptor};
use crate::error::{CodecError, CodecResult};
use crate::stream::{ByteSink, ByteSource};
use std::any::Any;

fn record_of(desc: &TypeDescriptor) -> CodecResult<&RecordDescriptor> {
    desc.record().ok_or_else(|| CodecError::UnsupportedType {
        type_name: desc.name.clone(),
    })
}

pub(crate) fn encode_by_field(
    codec: &Codec,
    sink: &mut dyn ByteSink,
    value: &dyn Any,
    desc: &TypeDescriptor,
) -> CodecResult<()> {
    let record = record_of(desc)?;
    for field in record.fields() {
        let field_value = field.get_from(value)?;
        codec.encode_value(sink, field_value, &field.type_desc)?;
    }
    Ok(())
}

pub(crate) fn decode_by_field(
    codec: &Codec,
    source: &mut dyn ByteSource,
    desc: &TypeDescriptor,
) -> CodecResult<Box<dyn Any>> {
    let record = record_of(desc)?;
    match record.reconstruct_path() {
        ReconstructPath::Unavailable { reason } => {
            Err(CodecError::AmbiguousOrMissingConstructor {
                type_name: desc.name.clone(),
                reason: reason.clone(),
            })
        }
        ReconstructPath::ZeroInit => {
            let mut value =
                record
                    .zero_value()
                    .ok_or_else(|| CodecError::AmbiguousOrMissingConstructor {
                        type_name: desc.name.clone(),
                        reason: "zero-init path resolved without a factory".to_string(),
                    })?;
            for field in record.fields() {
                let field_value = codec.decode_value(source, &field.type_desc)?;
                field.set_on(&desc.name, value.as_mut(), field_value)?;
            }
            Ok(value)
        }
        ReconstructPath::Constructor { order } => {
            let ctor = record.constructor().ok_or_else(|| {
                CodecError::AmbiguousOrMissingConstructor {
                    type_name: desc.name.clone(),
                    reason: "constructor path resolved without a constructor".to_string(),
                }
            })?;

            // The stream always carries declaration order; the constructor
            // receives its arguments reordered afterwards.
            let mut decoded: Vec<Option<Box<dyn Any>>> =
                Vec::with_capacity(record.fields().len());
            for field in record.fields() {
                decoded.push(Some(codec.decode_value(source, &field.type_desc)?));
            }

            let mut args = Vec::with_capacity(order.len());
            for &field_index in order {
                match decoded.get_mut(field_index).and_then(Option::take) {
                    Some(arg) => args.push(arg),
                    None => {
                        return Err(CodecError::AmbiguousOrMissingConstructor {
                            type_name: desc.name.clone(),
                            reason: "constructor pairing is not one-to-one".to_string(),
                        })
                    }
                }
            }
            let mut value = ctor.invoke(args)?;

            for (index, field) in record.fields().iter().enumerate() {
                if let Some(field_value) = decoded[index].take() {
                    field.set_on(&desc.name, value.as_mut(), field_value)?;
                }
            }
            Ok(value)
        }
    }
}

pub(crate) fn encode_raw(
    _codec: &Codec,
    sink: &mut dyn ByteSink,
    value: &dyn Any,
    desc: &TypeDescriptor,
) -> CodecResult<()> {
    let record = record_of(desc)?;
    let raw = record
        .raw_layout()
        .ok_or_else(|| CodecError::UnsupportedType {
            type_name: desc.name.clone(),
        })?;
    let bytes = raw.bytes_of(value)?;
    if raw.has_fixups() {
        let mut block = bytes.to_vec();
        raw.apply_fixups(&mut block);
        sink.write_bytes(&block)
    } else {
        sink.write_bytes(bytes)
    }
}

pub(crate) fn decode_raw(
    _codec: &Codec,
    source: &mut dyn ByteSource,
    desc: &TypeDescriptor,
) -> CodecResult<Box<dyn Any>> {
    let record = record_of(desc)?;
    let raw = record
        .raw_layout()
        .ok_or_else(|| CodecError::UnsupportedType {
            type_name: desc.name.clone(),
        })?;
    let mut block = vec![0u8; raw.size];
    source.read_exact(&mut block)?;
    raw.apply_fixups(&mut block);
    raw.value_of(&block)
}

pub(crate) fn encode_block<T: 'static>(
    codec: &Codec,
    sink: &mut dyn ByteSink,
    items: &[T],
    desc: &TypeDescriptor,
) -> CodecResult<()> {
    if !desc.is_fixed_layout_record() {
        return Err(CodecError::UnsupportedType {
            type_name: desc.name.clone(),
        });
    }
    for item in items {
        encode_raw(codec, sink, item, desc)?;
    }
    Ok(())
}

pub(crate) fn decode_block<T: 'static>(
    codec: &Codec,
    source: &mut dyn ByteSource,
    count: usize,
    desc: &TypeDescriptor,
) -> CodecResult<Vec<T>> {
    if !desc.is_fixed_layout_record() {
        return Err(CodecError::UnsupportedType {
            type_name: desc.name.clone(),
        });
    }
    let mut out = Vec::with_capacity(count.min(1024));
    for _ in 0..count {
        let value = decode_raw(codec, source, desc)?;
        match value.downcast::<T>() {
            Ok(boxed) => out.push(*boxed),
            Err(_) => return Err(mismatch_of::<T>()),
        }
    }
    Ok(out)
}
