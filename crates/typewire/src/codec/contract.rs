// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Self-describing objects.
//!
//! Some types refuse field-level inspection and instead carry their whole
//! state as one contract string. The codec treats them as closed boxes: the
//! string is the entire wire representation, written exactly like a string
//! primitive in the configured text encoding.

use crate::codec::{primitive, Codec};
use crate::descriptor::{mismatch_of, ContractShape, TypeDescriptor, TypeShape};
use crate::error::{CodecError, CodecResult};
use crate::stream::{ByteSink, ByteSource};
use std::any::{Any, TypeId};

/// Types that serialize themselves through a single contract string.
pub trait TextContract: Sized {
    /// Render the full state as one string.
    fn contract_string(&self) -> CodecResult<String>;

    /// Rebuild a value from a previously rendered string.
    fn from_contract_string(text: &str) -> CodecResult<Self>;
}

impl TypeDescriptor {
    /// Descriptor for a self-describing `T`.
    pub fn contract_of<T: TextContract + 'static>(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            type_id: TypeId::of::<T>(),
            shape: TypeShape::SelfDescribing(ContractShape::new(
                Box::new(|value: &dyn Any| {
                    let typed = value.downcast_ref::<T>().ok_or_else(mismatch_of::<T>)?;
                    typed.contract_string()
                }),
                Box::new(|text: &str| {
                    let value = T::from_contract_string(text)?;
                    Ok(Box::new(value) as Box<dyn Any>)
                }),
            )),
        }
    }
}

pub(crate) fn encode(
    codec: &Codec,
    sink: &mut dyn ByteSink,
    value: &dyn Any,
    desc: &TypeDescriptor,
) -> CodecResult<()> {
    let shape = desc.contract().ok_or_else(|| CodecError::UnsupportedType {
        type_name: desc.name.clone(),
    })?;
    let text = shape.text_of(value)?;
    primitive::write_text(codec, sink, &text)
}

pub(crate) fn decode(
    codec: &Codec,
    source: &mut dyn ByteSource,
    desc: &TypeDescriptor,
) -> CodecResult<Box<dyn Any>> {
    let shape = desc.contract().ok_or_else(|| CodecError::UnsupportedType {
        type_name: desc.name.clone(),
    })?;
    let text = primitive::read_text(codec, source)?;
    shape.value_of(&text)
}
