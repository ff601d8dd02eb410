// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Pairing of constructor parameters to record fields.
//!
//! The stream always carries fields in declaration order; a constructor
//! merely receives the already-decoded values reordered into its own
//! parameter order. Pairing is by exact name and exact Rust type, one
//! parameter per distinct read-only field.

use crate::descriptor::record::{ConstructorDescriptor, RecordDescriptor};

/// How a record value is rebuilt on decode.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum ReconstructPath {
    /// Invoke the constructor; `order[i]` is the index of the field whose
    /// decoded value becomes parameter `i`. Remaining fields are assigned
    /// through their setters afterwards.
    Constructor { order: Vec<usize> },
    /// Start from the zero-init factory and assign every field.
    ZeroInit,
    /// The record cannot be rebuilt; decoding fails.
    Unavailable { reason: String },
}

/// Decide the reconstruction path for `record`. Called once per
/// descriptor; the result is memoized by the caller.
pub(crate) fn resolve(record: &RecordDescriptor) -> ReconstructPath {
    if let Some(ctor) = record.constructor() {
        match pair_constructor(record, ctor) {
            Ok(order) => return ReconstructPath::Constructor { order },
            Err(why) => {
                if record.has_zero_init() {
                    log::debug!(
                        "{}: constructor rejected ({}); using zero-init path",
                        record.type_name(),
                        why
                    );
                    return ReconstructPath::ZeroInit;
                }
                return ReconstructPath::Unavailable { reason: why };
            }
        }
    }
    if record.has_zero_init() {
        return ReconstructPath::ZeroInit;
    }
    ReconstructPath::Unavailable {
        reason: "no constructor or zero-init factory registered".into(),
    }
}

fn pair_constructor(
    record: &RecordDescriptor,
    ctor: &ConstructorDescriptor,
) -> Result<Vec<usize>, String> {
    let fields = record.fields();
    let read_only = fields.iter().filter(|f| !f.is_assignable()).count();
    if ctor.params().len() != read_only {
        return Err(format!(
            "constructor takes {} parameters but the record has {} read-only fields",
            ctor.params().len(),
            read_only
        ));
    }

    let mut order = Vec::with_capacity(ctor.params().len());
    let mut used = vec![false; fields.len()];
    for param in ctor.params() {
        let index = fields
            .iter()
            .position(|f| !f.is_assignable() && f.name == param.name)
            .ok_or_else(|| format!("parameter '{}' matches no read-only field", param.name))?;
        if used[index] {
            return Err(format!("parameter '{}' pairs a field twice", param.name));
        }
        if fields[index].type_desc.type_id != param.type_desc.type_id {
            return Err(format!(
                "parameter '{}' is declared {} but the field is {}",
                param.name, param.type_desc.name, fields[index].type_desc.name
            ));
        }
        used[index] = true;
        order.push(index);
    }
    Ok(order)
}
