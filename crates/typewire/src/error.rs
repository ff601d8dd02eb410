// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Error taxonomy shared by every codec stage.

use std::fmt;

/// Codec error raised by descriptor registration, encoding or decoding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CodecError {
    /// No dispatch rule accepts the value's type shape.
    UnsupportedType { type_name: String },
    /// The stream ended before the requested number of bytes could be
    /// transferred.
    UnexpectedEndOfStream { need: usize, have: usize },
    /// A record requires reconstruction but no usable path exists.
    AmbiguousOrMissingConstructor { type_name: String, reason: String },
    /// A decoded field value could not be stored on the target record.
    FieldAssignmentRejected { type_name: String, field: String },
    /// Runtime value and descriptor disagree about the concrete type.
    TypeMismatch { expected: String, found: String },
    /// Malformed wire data or descriptor (negative extents, bad text
    /// payloads, unknown enum discriminants).
    InvalidData { reason: String },
}

impl fmt::Display for CodecError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CodecError::UnsupportedType { type_name } => {
                write!(f, "unsupported type: {}", type_name)
            }
            CodecError::UnexpectedEndOfStream { need, have } => {
                write!(
                    f,
                    "unexpected end of stream: need {} bytes, have {}",
                    need, have
                )
            }
            CodecError::AmbiguousOrMissingConstructor { type_name, reason } => {
                write!(
                    f,
                    "ambiguous or missing constructor for {}: {}",
                    type_name, reason
                )
            }
            CodecError::FieldAssignmentRejected { type_name, field } => {
                write!(f, "field assignment rejected: {}.{}", type_name, field)
            }
            CodecError::TypeMismatch { expected, found } => {
                write!(f, "type mismatch: expected {}, found {}", expected, found)
            }
            CodecError::InvalidData { reason } => write!(f, "invalid data: {}", reason),
        }
    }
}

impl std::error::Error for CodecError {}

pub type CodecResult<T> = core::result::Result<T, CodecError>;
