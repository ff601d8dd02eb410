// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Type descriptors: the runtime shape model driving codec dispatch.
//!
//! A [`TypeDescriptor`] binds a Rust type (by `TypeId`) to a [`TypeShape`],
//! and the shape carries whatever monomorphized accessors the codec needs
//! to walk values of that type behind `dyn Any`. Descriptors are immutable,
//! shared via `Arc`, and safe to use from any thread.

pub mod record;
pub(crate) mod resolve;

pub use record::{
    ArgList, ConstructorDescriptor, ParamDescriptor, RawLayout, RecordBuilder, RecordDescriptor,
};

use crate::error::{CodecError, CodecResult};
use crate::multi_array::MultiArray;
use std::any::{Any, TypeId};
use std::fmt;
use std::sync::Arc;

/// Well-known primitive kinds with a dedicated wire strategy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PrimitiveKind {
    Bool,
    U8,
    U16,
    U32,
    U64,
    I8,
    I16,
    I32,
    I64,
    F32,
    F64,
    Char,
    Guid,
    Timestamp,
    TimeSpan,
    String,
}

impl PrimitiveKind {
    /// Fixed wire footprint in bytes (None for text, whose length depends
    /// on the encoding and the value).
    pub fn wire_size(&self) -> Option<usize> {
        match self {
            Self::Bool | Self::U8 | Self::I8 => Some(1),
            Self::U16 | Self::I16 => Some(2),
            Self::U32 | Self::I32 | Self::F32 => Some(4),
            Self::U64 | Self::I64 | Self::F64 | Self::Timestamp | Self::TimeSpan => Some(8),
            Self::Guid => Some(16),
            Self::Char | Self::String => None,
        }
    }

    /// True for the integer kinds usable as an enum underlying width.
    pub fn is_integer(&self) -> bool {
        matches!(
            self,
            Self::U8
                | Self::U16
                | Self::U32
                | Self::U64
                | Self::I8
                | Self::I16
                | Self::I32
                | Self::I64
        )
    }
}

/// Byte order requested for one field of a fixed-layout record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ByteOrder {
    /// Whatever the host uses; never corrected.
    #[default]
    Native,
    Little,
    Big,
}

impl ByteOrder {
    /// The host's own order.
    pub const fn host() -> Self {
        if cfg!(target_endian = "little") {
            Self::Little
        } else {
            Self::Big
        }
    }

    /// True when a field with this override needs its bytes reversed on
    /// the current host.
    pub fn conflicts_with_host(self) -> bool {
        match self {
            Self::Native => false,
            Self::Little => cfg!(target_endian = "big"),
            Self::Big => cfg!(target_endian = "little"),
        }
    }
}

/// Type-erased getter: borrows one field out of a record value.
pub type FieldGetter = Box<dyn for<'a> Fn(&'a dyn Any) -> CodecResult<&'a dyn Any> + Send + Sync>;

/// Type-erased setter: stores a decoded value into a record field.
pub type FieldSetter = Box<dyn Fn(&mut dyn Any, Box<dyn Any>) -> CodecResult<()> + Send + Sync>;

/// Downcast failure against an expected Rust type.
pub(crate) fn mismatch_of<T>() -> CodecError {
    CodecError::TypeMismatch {
        expected: std::any::type_name::<T>().to_string(),
        found: "a value of a different runtime type".to_string(),
    }
}

/// The shape classification the dispatcher keys on.
pub enum TypeShape {
    Primitive(PrimitiveKind),
    Array(ArrayShape),
    Enum(EnumShape),
    Record(RecordDescriptor),
    SelfDescribing(ContractShape),
    /// Known type with no codec strategy; encoding or decoding it fails.
    Opaque,
}

impl TypeShape {
    pub fn kind_name(&self) -> &'static str {
        match self {
            Self::Primitive(_) => "primitive",
            Self::Array(_) => "array",
            Self::Enum(_) => "enum",
            Self::Record(_) => "record",
            Self::SelfDescribing(_) => "self-describing",
            Self::Opaque => "opaque",
        }
    }
}

impl fmt::Debug for TypeShape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.kind_name())
    }
}

/// A complete type descriptor.
pub struct TypeDescriptor {
    /// Display name used in errors and logs.
    pub name: String,
    /// The Rust type this descriptor speaks for.
    pub type_id: TypeId,
    /// Shape classification plus shape-specific accessors.
    pub shape: TypeShape,
}

impl fmt::Debug for TypeDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TypeDescriptor")
            .field("name", &self.name)
            .field("shape", &self.shape)
            .finish_non_exhaustive()
    }
}

impl TypeDescriptor {
    /// Descriptor for a well-known primitive `T`.
    pub fn primitive<T: 'static>(name: impl Into<String>, kind: PrimitiveKind) -> Self {
        Self {
            name: name.into(),
            type_id: TypeId::of::<T>(),
            shape: TypeShape::Primitive(kind),
        }
    }

    /// Descriptor for a type the codec knowingly refuses to handle.
    pub fn opaque<T: 'static>(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            type_id: TypeId::of::<T>(),
            shape: TypeShape::Opaque,
        }
    }

    /// Rank-1 array descriptor over `Vec<E>`.
    ///
    /// `element` must describe `E`; a mismatch surfaces as `TypeMismatch`
    /// the first time the descriptor is used.
    pub fn vec_of<E: 'static>(element: &Arc<TypeDescriptor>) -> Self {
        Self {
            name: format!("Vec<{}>", element.name),
            type_id: TypeId::of::<Vec<E>>(),
            shape: TypeShape::Array(ArrayShape::for_vec::<E>(element.clone())),
        }
    }

    /// Rank-`rank` array descriptor over `MultiArray<E>`.
    pub fn multi_of<E: 'static>(element: &Arc<TypeDescriptor>, rank: usize) -> Self {
        Self {
            name: format!("MultiArray<{}, {}>", element.name, rank),
            type_id: TypeId::of::<MultiArray<E>>(),
            shape: TypeShape::Array(ArrayShape::for_multi::<E>(element.clone(), rank)),
        }
    }

    /// Enumeration descriptor for `T` over an integer `underlying` width.
    ///
    /// `from_raw` returning `None` marks an unknown discriminant and fails
    /// the decode with `InvalidData`. A non-integer `underlying` fails in
    /// the same way the first time the descriptor is used.
    pub fn enum_of<T: 'static>(
        name: impl Into<String>,
        underlying: PrimitiveKind,
        to_raw: impl Fn(&T) -> i128 + Send + Sync + 'static,
        from_raw: impl Fn(i128) -> Option<T> + Send + Sync + 'static,
    ) -> Self {
        let name = name.into();
        let type_name = name.clone();
        Self {
            name,
            type_id: TypeId::of::<T>(),
            shape: TypeShape::Enum(EnumShape {
                underlying,
                to_raw: Box::new(move |value: &dyn Any| {
                    let typed = value.downcast_ref::<T>().ok_or_else(mismatch_of::<T>)?;
                    Ok(to_raw(typed))
                }),
                from_raw: Box::new(move |raw: i128| match from_raw(raw) {
                    Some(value) => Ok(Box::new(value) as Box<dyn Any>),
                    None => Err(CodecError::InvalidData {
                        reason: format!("unknown {} discriminant {}", type_name, raw),
                    }),
                }),
            }),
        }
    }

    pub fn is_primitive(&self) -> bool {
        matches!(self.shape, TypeShape::Primitive(_))
    }

    pub fn is_array(&self) -> bool {
        matches!(self.shape, TypeShape::Array(_))
    }

    pub fn is_enum(&self) -> bool {
        matches!(self.shape, TypeShape::Enum(_))
    }

    pub fn is_record(&self) -> bool {
        matches!(self.shape, TypeShape::Record(_))
    }

    /// True for records with a registered fixed layout.
    pub fn is_fixed_layout_record(&self) -> bool {
        self.record().is_some_and(|r| r.raw_layout().is_some())
    }

    pub fn is_self_describing(&self) -> bool {
        matches!(self.shape, TypeShape::SelfDescribing(_))
    }

    pub fn is_opaque(&self) -> bool {
        matches!(self.shape, TypeShape::Opaque)
    }

    pub fn primitive_kind(&self) -> Option<PrimitiveKind> {
        match &self.shape {
            TypeShape::Primitive(kind) => Some(*kind),
            _ => None,
        }
    }

    pub fn array(&self) -> Option<&ArrayShape> {
        match &self.shape {
            TypeShape::Array(shape) => Some(shape),
            _ => None,
        }
    }

    pub fn enum_shape(&self) -> Option<&EnumShape> {
        match &self.shape {
            TypeShape::Enum(shape) => Some(shape),
            _ => None,
        }
    }

    pub fn record(&self) -> Option<&RecordDescriptor> {
        match &self.shape {
            TypeShape::Record(record) => Some(record),
            _ => None,
        }
    }

    pub fn contract(&self) -> Option<&ContractShape> {
        match &self.shape {
            TypeShape::SelfDescribing(shape) => Some(shape),
            _ => None,
        }
    }

    /// Fixed wire footprint in bytes, where one exists.
    ///
    /// Fixed-layout records report their block size; by-field records
    /// report the sum of their field footprints when every field is fixed.
    /// Arrays, text and self-describing objects have no fixed footprint.
    pub fn wire_size(&self) -> Option<usize> {
        match &self.shape {
            TypeShape::Primitive(kind) => kind.wire_size(),
            TypeShape::Enum(shape) => shape.underlying.wire_size(),
            TypeShape::Record(record) => match record.raw_layout() {
                Some(raw) => Some(raw.size),
                None => record
                    .fields()
                    .iter()
                    .map(|f| f.type_desc.wire_size())
                    .sum::<Option<usize>>(),
            },
            TypeShape::Array(_) | TypeShape::SelfDescribing(_) | TypeShape::Opaque => None,
        }
    }
}

/// Field descriptor for record members, in declaration order.
pub struct FieldDescriptor {
    /// Field name (constructor pairing matches on it exactly).
    pub name: String,
    /// Declared field type.
    pub type_desc: Arc<TypeDescriptor>,
    /// Byte order the field must have inside a fixed-layout block.
    pub byte_order: ByteOrder,
    /// Offset of the field inside the fixed-layout block.
    pub raw_offset: Option<usize>,
    getter: FieldGetter,
    setter: Option<FieldSetter>,
}

impl fmt::Debug for FieldDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FieldDescriptor")
            .field("name", &self.name)
            .field("type", &self.type_desc.name)
            .field("assignable", &self.is_assignable())
            .finish_non_exhaustive()
    }
}

impl FieldDescriptor {
    pub(crate) fn new(
        name: String,
        type_desc: Arc<TypeDescriptor>,
        getter: FieldGetter,
        setter: Option<FieldSetter>,
    ) -> Self {
        Self {
            name,
            type_desc,
            byte_order: ByteOrder::Native,
            raw_offset: None,
            getter,
            setter,
        }
    }

    /// A field without a setter is excluded from assignment and must be
    /// covered by a constructor parameter instead.
    pub fn is_assignable(&self) -> bool {
        self.setter.is_some()
    }

    /// Borrow this field out of `record`.
    pub fn get_from<'a>(&self, record: &'a dyn Any) -> CodecResult<&'a dyn Any> {
        (self.getter)(record)
    }

    /// Store `value` into this field of `record`, or fail with
    /// `FieldAssignmentRejected` when the field has no setter.
    pub fn set_on(
        &self,
        owner: &str,
        record: &mut dyn Any,
        value: Box<dyn Any>,
    ) -> CodecResult<()> {
        match &self.setter {
            Some(setter) => setter(record, value),
            None => Err(CodecError::FieldAssignmentRejected {
                type_name: owner.to_string(),
                field: self.name.clone(),
            }),
        }
    }
}

/// Shape accessors for array values behind `dyn Any`.
pub struct ArrayShape {
    /// Element type, recursively dispatched.
    pub element: Arc<TypeDescriptor>,
    /// Number of dimensions (1 for `Vec<E>`).
    pub rank: usize,
    extents: Box<dyn Fn(&dyn Any) -> CodecResult<Vec<usize>> + Send + Sync>,
    element_at: Box<dyn for<'a> Fn(&'a dyn Any, usize) -> CodecResult<&'a dyn Any> + Send + Sync>,
    assemble: Box<dyn Fn(Vec<usize>, Vec<Box<dyn Any>>) -> CodecResult<Box<dyn Any>> + Send + Sync>,
}

fn element_access<F>(f: F) -> F
where
    F: for<'a> Fn(&'a dyn Any, usize) -> CodecResult<&'a dyn Any>,
{
    f
}

impl ArrayShape {
    fn for_vec<E: 'static>(element: Arc<TypeDescriptor>) -> Self {
        Self {
            element,
            rank: 1,
            extents: Box::new(|value: &dyn Any| {
                let vec = value.downcast_ref::<Vec<E>>().ok_or_else(mismatch_of::<Vec<E>>)?;
                Ok(vec![vec.len()])
            }),
            element_at: Box::new(element_access(|value: &dyn Any, index: usize| {
                let vec = value.downcast_ref::<Vec<E>>().ok_or_else(mismatch_of::<Vec<E>>)?;
                vec.get(index)
                    .map(|e| e as &dyn Any)
                    .ok_or_else(|| CodecError::InvalidData {
                        reason: format!("array element index {} out of bounds", index),
                    })
            })),
            assemble: Box::new(|_extents: Vec<usize>, elements: Vec<Box<dyn Any>>| {
                let mut out = Vec::with_capacity(elements.len());
                for element in elements {
                    out.push(*element.downcast::<E>().map_err(|_| mismatch_of::<E>())?);
                }
                Ok(Box::new(out) as Box<dyn Any>)
            }),
        }
    }

    fn for_multi<E: 'static>(element: Arc<TypeDescriptor>, rank: usize) -> Self {
        Self {
            element,
            rank,
            extents: Box::new(|value: &dyn Any| {
                let arr = value
                    .downcast_ref::<MultiArray<E>>()
                    .ok_or_else(mismatch_of::<MultiArray<E>>)?;
                Ok(arr.extents().to_vec())
            }),
            element_at: Box::new(element_access(|value: &dyn Any, index: usize| {
                let arr = value
                    .downcast_ref::<MultiArray<E>>()
                    .ok_or_else(mismatch_of::<MultiArray<E>>)?;
                arr.as_slice()
                    .get(index)
                    .map(|e| e as &dyn Any)
                    .ok_or_else(|| CodecError::InvalidData {
                        reason: format!("array element index {} out of bounds", index),
                    })
            })),
            assemble: Box::new(|extents: Vec<usize>, elements: Vec<Box<dyn Any>>| {
                let mut out = Vec::with_capacity(elements.len());
                for element in elements {
                    out.push(*element.downcast::<E>().map_err(|_| mismatch_of::<E>())?);
                }
                Ok(Box::new(MultiArray::from_vec(extents, out)?) as Box<dyn Any>)
            }),
        }
    }

    /// Per-dimension extents of `value`, most significant first.
    pub fn extents_of(&self, value: &dyn Any) -> CodecResult<Vec<usize>> {
        (self.extents)(value)
    }

    /// Borrow the element at row-major flat `index`.
    pub fn element<'a>(&self, value: &'a dyn Any, index: usize) -> CodecResult<&'a dyn Any> {
        (self.element_at)(value, index)
    }

    /// Rebuild the array value from extents plus row-major elements.
    pub fn assemble(
        &self,
        extents: Vec<usize>,
        elements: Vec<Box<dyn Any>>,
    ) -> CodecResult<Box<dyn Any>> {
        (self.assemble)(extents, elements)
    }
}

/// Shape accessors for enumeration values behind `dyn Any`.
pub struct EnumShape {
    /// Integer width the discriminant travels as.
    pub underlying: PrimitiveKind,
    to_raw: Box<dyn Fn(&dyn Any) -> CodecResult<i128> + Send + Sync>,
    from_raw: Box<dyn Fn(i128) -> CodecResult<Box<dyn Any>> + Send + Sync>,
}

impl EnumShape {
    pub fn raw_of(&self, value: &dyn Any) -> CodecResult<i128> {
        (self.to_raw)(value)
    }

    pub fn value_of(&self, raw: i128) -> CodecResult<Box<dyn Any>> {
        (self.from_raw)(raw)
    }
}

/// Shape accessors for self-describing objects behind `dyn Any`.
pub struct ContractShape {
    to_text: Box<dyn Fn(&dyn Any) -> CodecResult<String> + Send + Sync>,
    from_text: Box<dyn Fn(&str) -> CodecResult<Box<dyn Any>> + Send + Sync>,
}

impl ContractShape {
    pub(crate) fn new(
        to_text: Box<dyn Fn(&dyn Any) -> CodecResult<String> + Send + Sync>,
        from_text: Box<dyn Fn(&str) -> CodecResult<Box<dyn Any>> + Send + Sync>,
    ) -> Self {
        Self { to_text, from_text }
    }

    pub fn text_of(&self, value: &dyn Any) -> CodecResult<String> {
        (self.to_text)(value)
    }

    pub fn value_of(&self, text: &str) -> CodecResult<Box<dyn Any>> {
        (self.from_text)(text)
    }
}
