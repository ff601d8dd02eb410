// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Process-wide descriptor registry keyed by Rust `TypeId`.

use crate::descriptor::{PrimitiveKind, TypeDescriptor};
use crate::time::{TimeSpan, Timestamp};
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use std::any::TypeId;
use std::sync::Arc;
use uuid::Uuid;

/// Concurrent map from `TypeId` to its shared descriptor.
///
/// Registration is idempotent: re-registering a type returns the
/// descriptor already stored, so racing registrations of the same type
/// are harmless duplicate work, never an error.
pub struct TypeRegistry {
    types: DashMap<TypeId, Arc<TypeDescriptor>>,
}

macro_rules! install_builtin {
    ($registry:expr, $ty:ty, $name:literal, $kind:expr) => {{
        let element = $registry.register(TypeDescriptor::primitive::<$ty>($name, $kind));
        $registry.register(TypeDescriptor::vec_of::<$ty>(&element));
    }};
}

impl TypeRegistry {
    /// Empty registry.
    pub fn new() -> Self {
        Self {
            types: DashMap::new(),
        }
    }

    /// Registry pre-populated with every primitive descriptor and its
    /// `Vec` form, so primitives work without manual registration.
    pub fn with_builtins() -> Self {
        let registry = Self::new();
        install_builtin!(registry, bool, "bool", PrimitiveKind::Bool);
        install_builtin!(registry, u8, "u8", PrimitiveKind::U8);
        install_builtin!(registry, u16, "u16", PrimitiveKind::U16);
        install_builtin!(registry, u32, "u32", PrimitiveKind::U32);
        install_builtin!(registry, u64, "u64", PrimitiveKind::U64);
        install_builtin!(registry, i8, "i8", PrimitiveKind::I8);
        install_builtin!(registry, i16, "i16", PrimitiveKind::I16);
        install_builtin!(registry, i32, "i32", PrimitiveKind::I32);
        install_builtin!(registry, i64, "i64", PrimitiveKind::I64);
        install_builtin!(registry, f32, "f32", PrimitiveKind::F32);
        install_builtin!(registry, f64, "f64", PrimitiveKind::F64);
        install_builtin!(registry, char, "char", PrimitiveKind::Char);
        install_builtin!(registry, String, "String", PrimitiveKind::String);
        install_builtin!(registry, Uuid, "Guid", PrimitiveKind::Guid);
        install_builtin!(registry, Timestamp, "Timestamp", PrimitiveKind::Timestamp);
        install_builtin!(registry, TimeSpan, "TimeSpan", PrimitiveKind::TimeSpan);
        registry
    }

    /// Store `descriptor` unless its type is already registered; either
    /// way, return the descriptor the registry holds.
    pub fn register(&self, descriptor: TypeDescriptor) -> Arc<TypeDescriptor> {
        self.register_arc(Arc::new(descriptor))
    }

    /// `register` for descriptors already wrapped in `Arc`.
    pub fn register_arc(&self, descriptor: Arc<TypeDescriptor>) -> Arc<TypeDescriptor> {
        match self.types.entry(descriptor.type_id) {
            Entry::Occupied(existing) => existing.get().clone(),
            Entry::Vacant(slot) => {
                log::debug!(
                    "registered type descriptor '{}' ({})",
                    descriptor.name,
                    descriptor.shape.kind_name()
                );
                slot.insert(descriptor).clone()
            }
        }
    }

    pub fn lookup(&self, type_id: TypeId) -> Option<Arc<TypeDescriptor>> {
        self.types.get(&type_id).map(|entry| entry.value().clone())
    }

    pub fn descriptor_of<T: 'static>(&self) -> Option<Arc<TypeDescriptor>> {
        self.lookup(TypeId::of::<T>())
    }

    pub fn contains<T: 'static>(&self) -> bool {
        self.types.contains_key(&TypeId::of::<T>())
    }

    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }
}

impl Default for TypeRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtins_cover_primitives_and_vec_forms() {
        let registry = TypeRegistry::with_builtins();
        assert_eq!(registry.len(), 32);
        assert!(registry.contains::<u32>());
        assert!(registry.contains::<Vec<u32>>());
        assert!(registry.contains::<String>());
        assert!(registry.contains::<Vec<String>>());
        assert!(registry.contains::<Uuid>());
        assert!(registry.contains::<Timestamp>());
        assert!(!registry.contains::<Vec<Vec<u32>>>());

        let desc = registry.descriptor_of::<Vec<f64>>().unwrap();
        assert_eq!(desc.name, "Vec<f64>");
        assert_eq!(desc.array().map(|a| a.rank), Some(1));
    }

    #[test]
    fn test_register_is_idempotent() {
        let registry = TypeRegistry::new();
        let first = registry.register(TypeDescriptor::primitive::<u32>(
            "u32",
            PrimitiveKind::U32,
        ));
        let second = registry.register(TypeDescriptor::primitive::<u32>(
            "u32 (duplicate)",
            PrimitiveKind::U32,
        ));
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(second.name, "u32");
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_concurrent_registration_keeps_one_descriptor() {
        let registry = Arc::new(TypeRegistry::new());
        let mut handles = Vec::new();
        for _ in 0..4 {
            let registry = registry.clone();
            handles.push(std::thread::spawn(move || {
                registry.register(TypeDescriptor::primitive::<u64>("u64", PrimitiveKind::U64))
            }));
        }
        let descriptors: Vec<_> = handles.into_iter().map(|h| h.join().unwrap()).collect();
        assert_eq!(registry.len(), 1);
        for desc in &descriptors[1..] {
            assert!(Arc::ptr_eq(&descriptors[0], desc));
        }
    }

    #[test]
    fn test_lookup_misses_cleanly() {
        let registry = TypeRegistry::new();
        assert!(registry.is_empty());
        assert!(registry.descriptor_of::<u32>().is_none());
    }
}
