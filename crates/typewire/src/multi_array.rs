// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Rectangular multi-dimensional array value with flat row-major storage.

use crate::error::{CodecError, CodecResult};

/// Rectangular array of any rank >= 1.
///
/// Elements live in one flat `Vec` in row-major order (last dimension
/// varies fastest). Every row of a dimension has the same extent; jagged
/// shapes are not representable.
#[derive(Debug, Clone, PartialEq)]
pub struct MultiArray<E> {
    extents: Vec<usize>,
    data: Vec<E>,
}

/// Product of all extents, or `InvalidData` on overflow.
pub(crate) fn element_count(extents: &[usize]) -> CodecResult<usize> {
    extents
        .iter()
        .try_fold(1usize, |acc, &e| acc.checked_mul(e))
        .ok_or_else(|| CodecError::InvalidData {
            reason: format!("array extents {:?} overflow element count", extents),
        })
}

impl<E> MultiArray<E> {
    /// Wrap row-major `data` with the given shape.
    ///
    /// Fails when the rank is zero or `data.len()` does not equal the
    /// product of the extents.
    pub fn from_vec(extents: Vec<usize>, data: Vec<E>) -> CodecResult<Self> {
        if extents.is_empty() {
            return Err(CodecError::InvalidData {
                reason: "multi array rank must be at least 1".into(),
            });
        }
        let expected = element_count(&extents)?;
        if data.len() != expected {
            return Err(CodecError::InvalidData {
                reason: format!(
                    "extents {:?} require {} elements, got {}",
                    extents,
                    expected,
                    data.len()
                ),
            });
        }
        Ok(Self { extents, data })
    }

    /// Build by calling `f` once per element in row-major order.
    pub fn from_fn(extents: Vec<usize>, mut f: impl FnMut() -> E) -> CodecResult<Self> {
        if extents.is_empty() {
            return Err(CodecError::InvalidData {
                reason: "multi array rank must be at least 1".into(),
            });
        }
        let count = element_count(&extents)?;
        let mut data = Vec::with_capacity(count);
        for _ in 0..count {
            data.push(f());
        }
        Ok(Self { extents, data })
    }

    pub fn rank(&self) -> usize {
        self.extents.len()
    }

    pub fn extents(&self) -> &[usize] {
        &self.extents
    }

    /// Total element count.
    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Row-major flat index for `indices`, `None` when out of bounds or
    /// of the wrong rank.
    pub fn linear_index(&self, indices: &[usize]) -> Option<usize> {
        if indices.len() != self.extents.len() {
            return None;
        }
        let mut linear = 0usize;
        for (&index, &extent) in indices.iter().zip(&self.extents) {
            if index >= extent {
                return None;
            }
            linear = linear * extent + index;
        }
        Some(linear)
    }

    pub fn get(&self, indices: &[usize]) -> Option<&E> {
        self.linear_index(indices).map(|i| &self.data[i])
    }

    pub fn get_mut(&mut self, indices: &[usize]) -> Option<&mut E> {
        self.linear_index(indices).map(move |i| &mut self.data[i])
    }

    /// Flat row-major view.
    pub fn as_slice(&self) -> &[E] {
        &self.data
    }

    pub fn as_mut_slice(&mut self) -> &mut [E] {
        &mut self.data
    }

    pub fn into_vec(self) -> Vec<E> {
        self.data
    }
}

impl<E: Clone> MultiArray<E> {
    /// Fill every slot with a copy of `value`.
    pub fn filled(extents: Vec<usize>, value: E) -> CodecResult<Self> {
        Self::from_fn(extents, || value.clone())
    }
}
