// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Array strategies: an extents header followed by row-major elements.
//!
//! The header carries one signed 32-bit extent per dimension, most
//! significant dimension first. Any zero extent makes the element payload
//! empty while the header still travels in full.

use crate::codec::Codec;
use crate::descriptor::TypeDescriptor;
use crate::error::{CodecError, CodecResult};
use crate::multi_array::element_count;
use crate::stream::{ByteSink, ByteSource};
use std::any::Any;

/// Row-major index walker. The last dimension varies fastest; a carry past
/// the first dimension ends the walk.
pub(crate) struct Odometer {
    extents: Vec<usize>,
    counters: Vec<usize>,
    exhausted: bool,
}

impl Odometer {
    pub(crate) fn new(extents: &[usize]) -> Self {
        let exhausted = extents.iter().any(|&extent| extent == 0);
        Self {
            extents: extents.to_vec(),
            counters: vec![0; extents.len()],
            exhausted,
        }
    }

    /// Current counter vector, or `None` once the walk is complete.
    pub(crate) fn counters(&self) -> Option<&[usize]> {
        if self.exhausted {
            None
        } else {
            Some(&self.counters)
        }
    }

    pub(crate) fn advance(&mut self) {
        if self.exhausted {
            return;
        }
        for dim in (0..self.counters.len()).rev() {
            self.counters[dim] += 1;
            if self.counters[dim] < self.extents[dim] {
                return;
            }
            self.counters[dim] = 0;
        }
        self.exhausted = true;
    }
}

fn shape_of(desc: &TypeDescriptor) -> CodecResult<&crate::descriptor::ArrayShape> {
    desc.array().ok_or_else(|| CodecError::UnsupportedType {
        type_name: desc.name.clone(),
    })
}

pub(crate) fn encode(
    codec: &Codec,
    sink: &mut dyn ByteSink,
    value: &dyn Any,
    desc: &TypeDescriptor,
) -> CodecResult<()> {
    let shape = shape_of(desc)?;
    let extents = shape.extents_of(value)?;
    if extents.len() != shape.rank {
        return Err(CodecError::TypeMismatch {
            expected: format!("rank-{} array", shape.rank),
            found: format!("rank-{} value", extents.len()),
        });
    }
    for &extent in &extents {
        let header = i32::try_from(extent).map_err(|_| CodecError::InvalidData {
            reason: format!("array extent {} exceeds the i32 header range", extent),
        })?;
        sink.write_i32(header)?;
    }

    let mut flat = 0usize;
    let mut odometer = Odometer::new(&extents);
    while odometer.counters().is_some() {
        let element = shape.element(value, flat)?;
        codec.encode_value(sink, element, &shape.element)?;
        flat += 1;
        odometer.advance();
    }
    Ok(())
}

pub(crate) fn decode(
    codec: &Codec,
    source: &mut dyn ByteSource,
    desc: &TypeDescriptor,
) -> CodecResult<Box<dyn Any>> {
    let shape = shape_of(desc)?;
    let mut extents = Vec::with_capacity(shape.rank);
    for _ in 0..shape.rank {
        let header = source.read_i32()?;
        if header < 0 {
            return Err(CodecError::InvalidData {
                reason: format!("negative array extent {}", header),
            });
        }
        extents.push(header as usize);
    }
    let total = element_count(&extents)?;

    // Preallocation is capped; hostile extents must earn their memory by
    // actually decoding elements.
    let mut elements: Vec<Box<dyn Any>> = Vec::with_capacity(total.min(1024));
    let mut odometer = Odometer::new(&extents);
    while odometer.counters().is_some() {
        elements.push(codec.decode_value(source, &shape.element)?);
        odometer.advance();
    }
    shape.assemble(extents, elements)
}
