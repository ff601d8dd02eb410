// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! The dispatcher: ordered strategy tables keyed on type shape.
//!
//! Encoding walks `WRITE_RULES` and decoding walks `READ_RULES`; the first
//! rule whose predicate accepts the descriptor handles the value. Order is
//! significant. The read table carries no generic record rule; the decoder
//! falls back to by-field record decoding before giving up.

pub mod array;
pub mod contract;
pub mod primitive;
pub mod record;

pub use contract::TextContract;

use crate::descriptor::{mismatch_of, TypeDescriptor};
use crate::error::{CodecError, CodecResult};
use crate::registry::TypeRegistry;
use crate::stream::{ByteSink, ByteSource, Cursor};
use std::any::Any;
use std::sync::Arc;

/// Text encoding applied to `char` and `String` values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TextEncoding {
    #[default]
    Utf8,
    Utf16Le,
}

/// Codec configuration, threaded explicitly through every `Codec` value.
/// There is no process-wide mutable default.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CodecConfig {
    pub text: TextEncoding,
}

type WriteFn = fn(&Codec, &mut dyn ByteSink, &dyn Any, &TypeDescriptor) -> CodecResult<()>;
type ReadFn = fn(&Codec, &mut dyn ByteSource, &TypeDescriptor) -> CodecResult<Box<dyn Any>>;

struct WriteRule {
    name: &'static str,
    applies: fn(&TypeDescriptor) -> bool,
    run: WriteFn,
}

struct ReadRule {
    name: &'static str,
    applies: fn(&TypeDescriptor) -> bool,
    run: ReadFn,
}

/// Write strategies, most specific first; the first match wins.
static WRITE_RULES: &[WriteRule] = &[
    WriteRule {
        name: "primitive",
        applies: TypeDescriptor::is_primitive,
        run: primitive::encode,
    },
    WriteRule {
        name: "array",
        applies: TypeDescriptor::is_array,
        run: array::encode,
    },
    WriteRule {
        name: "enum",
        applies: TypeDescriptor::is_enum,
        run: primitive::encode_enum,
    },
    WriteRule {
        name: "self-describing",
        applies: TypeDescriptor::is_self_describing,
        run: contract::encode,
    },
    WriteRule {
        name: "fixed-layout record",
        applies: TypeDescriptor::is_fixed_layout_record,
        run: record::encode_raw,
    },
    WriteRule {
        name: "record",
        applies: TypeDescriptor::is_record,
        run: record::encode_by_field,
    },
];

/// Read strategies. Plain records have no rule here on purpose; see the
/// fallback in [`Codec::decode_value`].
static READ_RULES: &[ReadRule] = &[
    ReadRule {
        name: "primitive",
        applies: TypeDescriptor::is_primitive,
        run: primitive::decode,
    },
    ReadRule {
        name: "array",
        applies: TypeDescriptor::is_array,
        run: array::decode,
    },
    ReadRule {
        name: "enum",
        applies: TypeDescriptor::is_enum,
        run: primitive::decode_enum,
    },
    ReadRule {
        name: "self-describing",
        applies: TypeDescriptor::is_self_describing,
        run: contract::decode,
    },
    ReadRule {
        name: "fixed-layout record",
        applies: TypeDescriptor::is_fixed_layout_record,
        run: record::decode_raw,
    },
];

/// Shape-driven encoder/decoder over a shared type registry.
#[derive(Clone)]
pub struct Codec {
    registry: Arc<TypeRegistry>,
    config: CodecConfig,
}

impl Codec {
    pub fn new(registry: Arc<TypeRegistry>) -> Self {
        Self::with_config(registry, CodecConfig::default())
    }

    pub fn with_config(registry: Arc<TypeRegistry>, config: CodecConfig) -> Self {
        Self { registry, config }
    }

    pub fn config(&self) -> CodecConfig {
        self.config
    }

    pub fn registry(&self) -> &Arc<TypeRegistry> {
        &self.registry
    }

    fn descriptor_for<T: 'static>(&self) -> CodecResult<Arc<TypeDescriptor>> {
        self.registry
            .descriptor_of::<T>()
            .ok_or_else(|| CodecError::UnsupportedType {
                type_name: std::any::type_name::<T>().to_string(),
            })
    }

    /// Encode `value` through its registered descriptor.
    pub fn encode<T: 'static>(&self, sink: &mut dyn ByteSink, value: &T) -> CodecResult<()> {
        let desc = self.descriptor_for::<T>()?;
        self.encode_value(sink, value, &desc)
    }

    /// `encode` into a fresh buffer.
    pub fn encode_to_vec<T: 'static>(&self, value: &T) -> CodecResult<Vec<u8>> {
        let mut out = Vec::new();
        self.encode(&mut out, value)?;
        Ok(out)
    }

    /// Decode a `T` through its registered descriptor.
    pub fn decode<T: 'static>(&self, source: &mut dyn ByteSource) -> CodecResult<T> {
        let desc = self.descriptor_for::<T>()?;
        let value = self.decode_value(source, &desc)?;
        match value.downcast::<T>() {
            Ok(boxed) => Ok(*boxed),
            Err(_) => Err(mismatch_of::<T>()),
        }
    }

    /// `decode` from a byte slice.
    pub fn decode_from_slice<T: 'static>(&self, bytes: &[u8]) -> CodecResult<T> {
        let mut cursor = Cursor::new(bytes);
        self.decode(&mut cursor)
    }

    /// Encode a type-erased value with an explicit descriptor.
    ///
    /// When no rule matches, nothing is written and the call fails with
    /// `UnsupportedType`.
    pub fn encode_value(
        &self,
        sink: &mut dyn ByteSink,
        value: &dyn Any,
        desc: &TypeDescriptor,
    ) -> CodecResult<()> {
        for rule in WRITE_RULES {
            if (rule.applies)(desc) {
                log::trace!("write rule '{}' handles '{}'", rule.name, desc.name);
                return (rule.run)(self, sink, value, desc);
            }
        }
        Err(CodecError::UnsupportedType {
            type_name: desc.name.clone(),
        })
    }

    /// Decode a type-erased value with an explicit descriptor.
    pub fn decode_value(
        &self,
        source: &mut dyn ByteSource,
        desc: &TypeDescriptor,
    ) -> CodecResult<Box<dyn Any>> {
        for rule in READ_RULES {
            if (rule.applies)(desc) {
                log::trace!("read rule '{}' handles '{}'", rule.name, desc.name);
                return (rule.run)(self, source, desc);
            }
        }
        if desc.is_record() {
            log::debug!("decode falls back to by-field record decode for '{}'", desc.name);
            return record::decode_by_field(self, source, desc);
        }
        Err(CodecError::UnsupportedType {
            type_name: desc.name.clone(),
        })
    }

    /// Transcribe a contiguous run of fixed-layout records. No header is
    /// written; the element count travels out of band.
    pub fn encode_block<T: 'static>(
        &self,
        sink: &mut dyn ByteSink,
        items: &[T],
    ) -> CodecResult<()> {
        let desc = self.descriptor_for::<T>()?;
        record::encode_block(self, sink, items, &desc)
    }

    /// Read back `count` fixed-layout records written by `encode_block`.
    pub fn decode_block<T: 'static>(
        &self,
        source: &mut dyn ByteSource,
        count: usize,
    ) -> CodecResult<Vec<T>> {
        let desc = self.descriptor_for::<T>()?;
        record::decode_block(self, source, count, &desc)
    }
}
