// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Record descriptors and the fluent builder that produces them.
//!
//! A record is reconstructed on decode through one of three paths:
//! a registered constructor paired to the read-only fields, a zero-init
//! factory followed by field assignment, or not at all. Resolution of the
//! path is lazy and memoized per descriptor.

use crate::descriptor::resolve::{self, ReconstructPath};
use crate::descriptor::{
    mismatch_of, ByteOrder, FieldDescriptor, FieldGetter, FieldSetter, TypeDescriptor, TypeShape,
};
use crate::error::{CodecError, CodecResult};
use bytemuck::{AnyBitPattern, NoUninit};
use std::any::{Any, TypeId};
use std::marker::PhantomData;
use std::sync::{Arc, OnceLock};

type InvokeFn = Box<dyn Fn(Vec<Box<dyn Any>>) -> CodecResult<Box<dyn Any>> + Send + Sync>;
type ZeroInitFn = Box<dyn Fn() -> Box<dyn Any> + Send + Sync>;

/// One constructor parameter: pairing matches name and type exactly.
#[derive(Debug, Clone)]
pub struct ParamDescriptor {
    pub name: String,
    pub type_desc: Arc<TypeDescriptor>,
}

impl ParamDescriptor {
    pub fn new(name: impl Into<String>, type_desc: &Arc<TypeDescriptor>) -> Self {
        Self {
            name: name.into(),
            type_desc: type_desc.clone(),
        }
    }
}

/// Registered constructor: ordered parameters plus the invoker.
pub struct ConstructorDescriptor {
    params: Vec<ParamDescriptor>,
    invoke: InvokeFn,
}

impl ConstructorDescriptor {
    pub fn params(&self) -> &[ParamDescriptor] {
        &self.params
    }

    pub(crate) fn invoke(&self, args: Vec<Box<dyn Any>>) -> CodecResult<Box<dyn Any>> {
        (self.invoke)(args)
    }
}

/// Decoded constructor arguments, taken by parameter position.
pub struct ArgList {
    args: Vec<Option<Box<dyn Any>>>,
}

impl ArgList {
    pub(crate) fn new(args: Vec<Box<dyn Any>>) -> Self {
        Self {
            args: args.into_iter().map(Some).collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.args.len()
    }

    pub fn is_empty(&self) -> bool {
        self.args.is_empty()
    }

    /// Move argument `index` out as a `V`.
    pub fn take<V: 'static>(&mut self, index: usize) -> CodecResult<V> {
        let slot = self
            .args
            .get_mut(index)
            .ok_or_else(|| CodecError::InvalidData {
                reason: format!("constructor argument {} out of range", index),
            })?;
        let boxed = slot.take().ok_or_else(|| CodecError::InvalidData {
            reason: format!("constructor argument {} taken twice", index),
        })?;
        let boxed = boxed.downcast::<V>().map_err(|_| mismatch_of::<V>())?;
        Ok(*boxed)
    }
}

fn raw_access<F>(f: F) -> F
where
    F: for<'a> Fn(&'a dyn Any) -> CodecResult<&'a [u8]>,
{
    f
}

/// Fixed in-memory layout of a record, transcribed as one block.
pub struct RawLayout {
    /// Block size in bytes (`size_of::<T>()`).
    pub size: usize,
    /// Byte ranges reversed on write and read because the field's order
    /// override conflicts with the host. `(offset, len)` pairs.
    pub(crate) fixups: Vec<(usize, usize)>,
    to_bytes: Box<dyn for<'a> Fn(&'a dyn Any) -> CodecResult<&'a [u8]> + Send + Sync>,
    from_bytes: Box<dyn Fn(&[u8]) -> CodecResult<Box<dyn Any>> + Send + Sync>,
}

impl RawLayout {
    pub(crate) fn of<T: NoUninit + AnyBitPattern + 'static>() -> Self {
        Self {
            size: std::mem::size_of::<T>(),
            fixups: Vec::new(),
            to_bytes: Box::new(raw_access(move |value: &dyn Any| {
                let typed = value.downcast_ref::<T>().ok_or_else(mismatch_of::<T>)?;
                Ok(bytemuck::bytes_of(typed))
            })),
            from_bytes: Box::new(move |bytes: &[u8]| {
                let value: T = bytemuck::try_pod_read_unaligned(bytes).map_err(|err| {
                    CodecError::InvalidData {
                        reason: format!("fixed-layout block rejected: {:?}", err),
                    }
                })?;
                Ok(Box::new(value) as Box<dyn Any>)
            }),
        }
    }

    /// In-memory bytes of `value`, before any order correction.
    pub(crate) fn bytes_of<'a>(&self, value: &'a dyn Any) -> CodecResult<&'a [u8]> {
        (self.to_bytes)(value)
    }

    /// Rebuild the record value from an order-corrected block.
    pub(crate) fn value_of(&self, bytes: &[u8]) -> CodecResult<Box<dyn Any>> {
        (self.from_bytes)(bytes)
    }

    pub(crate) fn has_fixups(&self) -> bool {
        !self.fixups.is_empty()
    }

    /// Reverse every conflicting field's byte range in place. The pass is
    /// its own inverse, so the same call serves encode and decode.
    pub(crate) fn apply_fixups(&self, block: &mut [u8]) {
        for &(offset, len) in &self.fixups {
            log::trace!("byte order fixup at {}..{}", offset, offset + len);
            block[offset..offset + len].reverse();
        }
    }
}

/// Record shape: fields in declaration order plus reconstruction hooks.
pub struct RecordDescriptor {
    type_name: String,
    fields: Vec<FieldDescriptor>,
    constructor: Option<ConstructorDescriptor>,
    zero_init: Option<ZeroInitFn>,
    raw: Option<RawLayout>,
    resolved: OnceLock<ReconstructPath>,
}

impl RecordDescriptor {
    pub fn type_name(&self) -> &str {
        &self.type_name
    }

    pub fn fields(&self) -> &[FieldDescriptor] {
        &self.fields
    }

    pub fn field(&self, name: &str) -> Option<&FieldDescriptor> {
        self.fields.iter().find(|f| f.name == name)
    }

    pub fn field_index(&self, name: &str) -> Option<usize> {
        self.fields.iter().position(|f| f.name == name)
    }

    pub fn constructor(&self) -> Option<&ConstructorDescriptor> {
        self.constructor.as_ref()
    }

    pub fn raw_layout(&self) -> Option<&RawLayout> {
        self.raw.as_ref()
    }

    pub fn has_zero_init(&self) -> bool {
        self.zero_init.is_some()
    }

    pub(crate) fn zero_value(&self) -> Option<Box<dyn Any>> {
        self.zero_init.as_ref().map(|init| init())
    }

    /// The memoized reconstruction path for this record.
    pub(crate) fn reconstruct_path(&self) -> &ReconstructPath {
        self.resolved.get_or_init(|| resolve::resolve(self))
    }
}

fn field_access<F>(f: F) -> F
where
    F: for<'a> Fn(&'a dyn Any) -> CodecResult<&'a dyn Any>,
{
    f
}

/// Fluent builder for record descriptors over a concrete `T`.
pub struct RecordBuilder<T> {
    name: String,
    fields: Vec<FieldDescriptor>,
    constructor: Option<ConstructorDescriptor>,
    zero_init: Option<ZeroInitFn>,
    raw: Option<RawLayout>,
    defect: Option<String>,
    _marker: PhantomData<fn() -> T>,
}

impl<T: 'static> RecordBuilder<T> {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            fields: Vec::new(),
            constructor: None,
            zero_init: None,
            raw: None,
            defect: None,
            _marker: PhantomData,
        }
    }

    fn make_getter<F: 'static>(
        get: impl for<'a> Fn(&'a T) -> &'a F + Send + Sync + 'static,
    ) -> FieldGetter {
        Box::new(field_access(move |record: &dyn Any| {
            let typed = record.downcast_ref::<T>().ok_or_else(mismatch_of::<T>)?;
            Ok(get(typed) as &dyn Any)
        }))
    }

    /// Add a read-only field. Decoding a record containing one requires a
    /// constructor parameter pairing it.
    pub fn field<F: 'static>(
        mut self,
        name: &str,
        type_desc: &Arc<TypeDescriptor>,
        get: impl for<'a> Fn(&'a T) -> &'a F + Send + Sync + 'static,
    ) -> Self {
        self.fields.push(FieldDescriptor::new(
            name.to_string(),
            type_desc.clone(),
            Self::make_getter(get),
            None,
        ));
        self
    }

    /// Add a field with both a getter and a setter.
    pub fn assignable<F: 'static>(
        mut self,
        name: &str,
        type_desc: &Arc<TypeDescriptor>,
        get: impl for<'a> Fn(&'a T) -> &'a F + Send + Sync + 'static,
        set: impl Fn(&mut T, F) + Send + Sync + 'static,
    ) -> Self {
        let setter: FieldSetter = Box::new(move |record: &mut dyn Any, value: Box<dyn Any>| {
            let typed = record.downcast_mut::<T>().ok_or_else(mismatch_of::<T>)?;
            let value = value.downcast::<F>().map_err(|_| mismatch_of::<F>())?;
            set(typed, *value);
            Ok(())
        });
        self.fields.push(FieldDescriptor::new(
            name.to_string(),
            type_desc.clone(),
            Self::make_getter(get),
            Some(setter),
        ));
        self
    }

    /// Override the byte order of the most recently added field.
    pub fn byte_order(mut self, order: ByteOrder) -> Self {
        match self.fields.last_mut() {
            Some(field) => field.byte_order = order,
            None => self.note_defect("byte_order() called before any field"),
        }
        self
    }

    /// Set the fixed-layout offset of the most recently added field.
    pub fn at_offset(mut self, offset: usize) -> Self {
        match self.fields.last_mut() {
            Some(field) => field.raw_offset = Some(offset),
            None => self.note_defect("at_offset() called before any field"),
        }
        self
    }

    /// Register the constructor used to rebuild values on decode.
    pub fn constructor(
        mut self,
        params: Vec<ParamDescriptor>,
        make: impl Fn(&mut ArgList) -> CodecResult<T> + Send + Sync + 'static,
    ) -> Self {
        let invoke: InvokeFn = Box::new(move |args: Vec<Box<dyn Any>>| {
            let mut args = ArgList::new(args);
            Ok(Box::new(make(&mut args)?) as Box<dyn Any>)
        });
        self.constructor = Some(ConstructorDescriptor { params, invoke });
        self
    }

    /// Register `T::default()` as the zero-init reconstruction fallback.
    pub fn zero_init(mut self) -> Self
    where
        T: Default,
    {
        self.zero_init = Some(Box::new(|| Box::new(T::default()) as Box<dyn Any>));
        self
    }

    /// Opt into fixed-layout transcription of the whole record.
    ///
    /// Every field then needs `at_offset()` and a fixed wire size; `build`
    /// verifies both.
    pub fn fixed_layout(mut self) -> Self
    where
        T: NoUninit + AnyBitPattern,
    {
        self.raw = Some(RawLayout::of::<T>());
        self
    }

    fn note_defect(&mut self, what: &str) {
        if self.defect.is_none() {
            self.defect = Some(what.to_string());
        }
    }

    /// Finish the descriptor, validating the fixed layout if one was
    /// requested.
    pub fn build(self) -> CodecResult<TypeDescriptor> {
        if let Some(defect) = self.defect {
            return Err(CodecError::InvalidData {
                reason: format!("{}: {}", self.name, defect),
            });
        }
        for (i, field) in self.fields.iter().enumerate() {
            if self.fields[..i].iter().any(|f| f.name == field.name) {
                return Err(CodecError::InvalidData {
                    reason: format!("{}: duplicate field '{}'", self.name, field.name),
                });
            }
        }
        let raw = match self.raw {
            Some(mut raw) => {
                let mut fixups = Vec::new();
                for field in &self.fields {
                    let offset = field.raw_offset.ok_or_else(|| CodecError::InvalidData {
                        reason: format!(
                            "{}: field '{}' needs at_offset() for the fixed layout",
                            self.name, field.name
                        ),
                    })?;
                    let size =
                        field
                            .type_desc
                            .wire_size()
                            .ok_or_else(|| CodecError::InvalidData {
                                reason: format!(
                                    "{}: field '{}' has no fixed wire size",
                                    self.name, field.name
                                ),
                            })?;
                    match offset.checked_add(size) {
                        Some(end) if end <= raw.size => {}
                        _ => {
                            return Err(CodecError::InvalidData {
                                reason: format!(
                                    "{}: field '{}' at {}..{} exceeds the {}-byte block",
                                    self.name,
                                    field.name,
                                    offset,
                                    offset.saturating_add(size),
                                    raw.size
                                ),
                            });
                        }
                    }
                    if field.byte_order.conflicts_with_host() && size > 1 {
                        fixups.push((offset, size));
                    }
                }
                raw.fixups = fixups;
                Some(raw)
            }
            None => None,
        };
        Ok(TypeDescriptor {
            name: self.name.clone(),
            type_id: TypeId::of::<T>(),
            shape: TypeShape::Record(RecordDescriptor {
                type_name: self.name,
                fields: self.fields,
                constructor: self.constructor,
                zero_init: self.zero_init,
                raw,
                resolved: OnceLock::new(),
            }),
        })
    }
}
