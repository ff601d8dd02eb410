// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Primitive strategies, plus the integer-backed enum strategies.
//!
//! Fixed-width values travel in host byte order. `char` and `String` follow
//! the configured [`TextEncoding`]: UTF-8 chars are self-delimiting through
//! their leading byte, UTF-16 chars are exactly one code unit, and strings
//! always end with a single zero byte regardless of encoding.

use crate::codec::{Codec, TextEncoding};
use crate::descriptor::{mismatch_of, PrimitiveKind, TypeDescriptor};
use crate::error::{CodecError, CodecResult};
use crate::stream::{ByteSink, ByteSource};
use crate::time::{TimeSpan, Timestamp};
use std::any::Any;
use uuid::Uuid;

fn downcast<T: 'static>(value: &dyn Any) -> CodecResult<&T> {
    value.downcast_ref::<T>().ok_or_else(mismatch_of::<T>)
}

fn kind_of(desc: &TypeDescriptor) -> CodecResult<PrimitiveKind> {
    desc.primitive_kind()
        .ok_or_else(|| CodecError::UnsupportedType {
            type_name: desc.name.clone(),
        })
}

pub(crate) fn encode(
    codec: &Codec,
    sink: &mut dyn ByteSink,
    value: &dyn Any,
    desc: &TypeDescriptor,
) -> CodecResult<()> {
    match kind_of(desc)? {
        PrimitiveKind::Bool => sink.write_u8(u8::from(*downcast::<bool>(value)?)),
        PrimitiveKind::U8 => sink.write_u8(*downcast::<u8>(value)?),
        PrimitiveKind::U16 => sink.write_u16(*downcast::<u16>(value)?),
        PrimitiveKind::U32 => sink.write_u32(*downcast::<u32>(value)?),
        PrimitiveKind::U64 => sink.write_u64(*downcast::<u64>(value)?),
        PrimitiveKind::I8 => sink.write_i8(*downcast::<i8>(value)?),
        PrimitiveKind::I16 => sink.write_i16(*downcast::<i16>(value)?),
        PrimitiveKind::I32 => sink.write_i32(*downcast::<i32>(value)?),
        PrimitiveKind::I64 => sink.write_i64(*downcast::<i64>(value)?),
        PrimitiveKind::F32 => sink.write_f32(*downcast::<f32>(value)?),
        PrimitiveKind::F64 => sink.write_f64(*downcast::<f64>(value)?),
        PrimitiveKind::Char => write_char(codec, sink, *downcast::<char>(value)?),
        PrimitiveKind::Guid => sink.write_bytes(downcast::<Uuid>(value)?.as_bytes()),
        PrimitiveKind::Timestamp => sink.write_i64(downcast::<Timestamp>(value)?.ticks()),
        PrimitiveKind::TimeSpan => sink.write_i64(downcast::<TimeSpan>(value)?.ticks()),
        PrimitiveKind::String => write_text(codec, sink, downcast::<String>(value)?),
    }
}

pub(crate) fn decode(
    codec: &Codec,
    source: &mut dyn ByteSource,
    desc: &TypeDescriptor,
) -> CodecResult<Box<dyn Any>> {
    let boxed: Box<dyn Any> = match kind_of(desc)? {
        PrimitiveKind::Bool => Box::new(read_bool(source)?),
        PrimitiveKind::U8 => Box::new(source.read_u8()?),
        PrimitiveKind::U16 => Box::new(source.read_u16()?),
        PrimitiveKind::U32 => Box::new(source.read_u32()?),
        PrimitiveKind::U64 => Box::new(source.read_u64()?),
        PrimitiveKind::I8 => Box::new(source.read_i8()?),
        PrimitiveKind::I16 => Box::new(source.read_i16()?),
        PrimitiveKind::I32 => Box::new(source.read_i32()?),
        PrimitiveKind::I64 => Box::new(source.read_i64()?),
        PrimitiveKind::F32 => Box::new(source.read_f32()?),
        PrimitiveKind::F64 => Box::new(source.read_f64()?),
        PrimitiveKind::Char => Box::new(read_char(codec, source)?),
        PrimitiveKind::Guid => {
            let mut raw = [0u8; 16];
            source.read_exact(&mut raw)?;
            Box::new(Uuid::from_bytes(raw))
        }
        PrimitiveKind::Timestamp => Box::new(Timestamp::from_ticks(source.read_i64()?)),
        PrimitiveKind::TimeSpan => Box::new(TimeSpan::from_ticks(source.read_i64()?)),
        PrimitiveKind::String => Box::new(read_text(codec, source)?),
    };
    Ok(boxed)
}

fn read_bool(source: &mut dyn ByteSource) -> CodecResult<bool> {
    match source.read_u8()? {
        0 => Ok(false),
        1 => Ok(true),
        other => Err(CodecError::InvalidData {
            reason: format!("boolean byte must be 0 or 1, got {}", other),
        }),
    }
}

fn write_char(codec: &Codec, sink: &mut dyn ByteSink, value: char) -> CodecResult<()> {
    match codec.config().text {
        TextEncoding::Utf8 => {
            let mut buf = [0u8; 4];
            sink.write_bytes(value.encode_utf8(&mut buf).as_bytes())
        }
        TextEncoding::Utf16Le => {
            let mut units = [0u16; 2];
            let units = value.encode_utf16(&mut units);
            if units.len() != 1 {
                return Err(CodecError::InvalidData {
                    reason: format!(
                        "char {:?} does not fit a single UTF-16 code unit",
                        value
                    ),
                });
            }
            sink.write_bytes(&units[0].to_le_bytes())
        }
    }
}

fn read_char(codec: &Codec, source: &mut dyn ByteSource) -> CodecResult<char> {
    match codec.config().text {
        TextEncoding::Utf8 => {
            let first = source.read_u8()?;
            // The leading byte announces the sequence length.
            let len = match first {
                0x00..=0x7F => 1,
                0xC0..=0xDF => 2,
                0xE0..=0xEF => 3,
                0xF0..=0xF7 => 4,
                other => {
                    return Err(CodecError::InvalidData {
                        reason: format!("invalid UTF-8 leading byte 0x{:02X}", other),
                    })
                }
            };
            let mut buf = [0u8; 4];
            buf[0] = first;
            source.read_exact(&mut buf[1..len])?;
            let text = std::str::from_utf8(&buf[..len]).map_err(|_| CodecError::InvalidData {
                reason: "malformed UTF-8 char sequence".to_string(),
            })?;
            text.chars().next().ok_or_else(|| CodecError::InvalidData {
                reason: "empty UTF-8 char sequence".to_string(),
            })
        }
        TextEncoding::Utf16Le => {
            let unit = source.read_u16()?;
            char::from_u32(u32::from(unit)).ok_or_else(|| CodecError::InvalidData {
                reason: format!("UTF-16 code unit 0x{:04X} is a surrogate half", unit),
            })
        }
    }
}

/// Write `text` in the configured encoding, followed by one zero byte.
pub(crate) fn write_text(codec: &Codec, sink: &mut dyn ByteSink, text: &str) -> CodecResult<()> {
    match codec.config().text {
        TextEncoding::Utf8 => sink.write_bytes(text.as_bytes())?,
        TextEncoding::Utf16Le => {
            let mut bytes = Vec::with_capacity(text.len() * 2);
            for unit in text.encode_utf16() {
                bytes.extend_from_slice(&unit.to_le_bytes());
            }
            sink.write_bytes(&bytes)?;
        }
    }
    sink.write_u8(0)
}

/// Accumulate bytes up to the zero sentinel, then validate as one string.
pub(crate) fn read_text(codec: &Codec, source: &mut dyn ByteSource) -> CodecResult<String> {
    let mut payload = Vec::new();
    loop {
        let byte = source.read_u8()?;
        if byte == 0 {
            break;
        }
        payload.push(byte);
    }
    match codec.config().text {
        TextEncoding::Utf8 => String::from_utf8(payload).map_err(|err| CodecError::InvalidData {
            reason: format!("string payload is not valid UTF-8: {}", err),
        }),
        TextEncoding::Utf16Le => {
            if payload.len() % 2 != 0 {
                return Err(CodecError::InvalidData {
                    reason: format!("UTF-16 string payload has odd length {}", payload.len()),
                });
            }
            let units: Vec<u16> = payload
                .chunks_exact(2)
                .map(|pair| u16::from_le_bytes([pair[0], pair[1]]))
                .collect();
            String::from_utf16(&units).map_err(|_| CodecError::InvalidData {
                reason: "string payload is not valid UTF-16".to_string(),
            })
        }
    }
}

pub(crate) fn encode_enum(
    _codec: &Codec,
    sink: &mut dyn ByteSink,
    value: &dyn Any,
    desc: &TypeDescriptor,
) -> CodecResult<()> {
    let shape = desc.enum_shape().ok_or_else(|| CodecError::UnsupportedType {
        type_name: desc.name.clone(),
    })?;
    let raw = shape.raw_of(value)?;
    write_discriminant(sink, shape.underlying, raw, &desc.name)
}

fn out_of_range(type_name: &str, kind: PrimitiveKind, raw: i128) -> CodecError {
    CodecError::InvalidData {
        reason: format!(
            "{}: discriminant {} does not fit underlying {:?}",
            type_name, raw, kind
        ),
    }
}

fn write_discriminant(
    sink: &mut dyn ByteSink,
    kind: PrimitiveKind,
    raw: i128,
    type_name: &str,
) -> CodecResult<()> {
    match kind {
        PrimitiveKind::U8 => {
            sink.write_u8(u8::try_from(raw).map_err(|_| out_of_range(type_name, kind, raw))?)
        }
        PrimitiveKind::U16 => {
            sink.write_u16(u16::try_from(raw).map_err(|_| out_of_range(type_name, kind, raw))?)
        }
        PrimitiveKind::U32 => {
            sink.write_u32(u32::try_from(raw).map_err(|_| out_of_range(type_name, kind, raw))?)
        }
        PrimitiveKind::U64 => {
            sink.write_u64(u64::try_from(raw).map_err(|_| out_of_range(type_name, kind, raw))?)
        }
        PrimitiveKind::I8 => {
            sink.write_i8(i8::try_from(raw).map_err(|_| out_of_range(type_name, kind, raw))?)
        }
        PrimitiveKind::I16 => {
            sink.write_i16(i16::try_from(raw).map_err(|_| out_of_range(type_name, kind, raw))?)
        }
        PrimitiveKind::I32 => {
            sink.write_i32(i32::try_from(raw).map_err(|_| out_of_range(type_name, kind, raw))?)
        }
        PrimitiveKind::I64 => {
            sink.write_i64(i64::try_from(raw).map_err(|_| out_of_range(type_name, kind, raw))?)
        }
        other => Err(CodecError::InvalidData {
            reason: format!(
                "{}: enum underlying kind {:?} is not an integer",
                type_name, other
            ),
        }),
    }
}

pub(crate) fn decode_enum(
    _codec: &Codec,
    source: &mut dyn ByteSource,
    desc: &TypeDescriptor,
) -> CodecResult<Box<dyn Any>> {
    let shape = desc.enum_shape().ok_or_else(|| CodecError::UnsupportedType {
        type_name: desc.name.clone(),
    })?;
    let raw: i128 = match shape.underlying {
        PrimitiveKind::U8 => i128::from(source.read_u8()?),
        PrimitiveKind::U16 => i128::from(source.read_u16()?),
        PrimitiveKind::U32 => i128::from(source.read_u32()?),
        PrimitiveKind::U64 => i128::from(source.read_u64()?),
        PrimitiveKind::I8 => i128::from(source.read_i8()?),
        PrimitiveKind::I16 => i128::from(source.read_i16()?),
        PrimitiveKind::I32 => i128::from(source.read_i32()?),
        PrimitiveKind::I64 => i128::from(source.read_i64()?),
        other => {
            return Err(CodecError::InvalidData {
                reason: format!(
                    "{}: enum underlying kind {:?} is not an integer",
                    desc.name, other
                ),
            })
        }
    };
    shape.value_of(raw)
}
