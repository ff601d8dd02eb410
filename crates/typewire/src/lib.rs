// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! # typewire - Shape-driven binary object codec
//!
//! A reflection-style codec for types that are only known at runtime.
//! Every type is described by a [`TypeDescriptor`] that names it and
//! classifies its [`TypeShape`]; encoding and decoding walk ordered
//! strategy tables and the first strategy whose predicate accepts the
//! shape handles the value.
//!
//! ## Quick Start
//!
//! ```rust
//! use std::sync::Arc;
//! use typewire::{Codec, CodecResult, RecordBuilder, TypeRegistry};
//!
//! #[derive(Debug, Clone, PartialEq, Default)]
//! struct Point {
//!     x: f64,
//!     y: f64,
//! }
//!
//! fn main() -> CodecResult<()> {
//!     let registry = TypeRegistry::with_builtins();
//!     let f64_desc = registry.descriptor_of::<f64>().expect("builtin");
//!     registry.register(
//!         RecordBuilder::<Point>::new("Point")
//!             .assignable("x", &f64_desc, |p: &Point| &p.x, |p, v| p.x = v)
//!             .assignable("y", &f64_desc, |p: &Point| &p.y, |p, v| p.y = v)
//!             .zero_init()
//!             .build()?,
//!     );
//!
//!     let codec = Codec::new(Arc::new(registry));
//!     let point = Point { x: 1.0, y: -2.5 };
//!     let bytes = codec.encode_to_vec(&point)?;
//!     let back: Point = codec.decode_from_slice(&bytes)?;
//!     assert_eq!(back, point);
//!     Ok(())
//! }
//! ```
//!
//! ## Architecture
//!
//! ```text
//! +---------------------------------------------------------------+
//! |                         Typed Facade                          |
//! |   Codec::encode / decode  |  encode_block / decode_block      |
//! +---------------------------------------------------------------+
//! |                      Strategy Dispatch                        |
//! |   WRITE_RULES / READ_RULES, first shape predicate wins        |
//! +---------------------------------------------------------------+
//! |                         Strategies                            |
//! |   primitive | array | enum | self-describing | record | raw   |
//! +---------------------------------------------------------------+
//! |                       Descriptor Model                        |
//! |   TypeRegistry -> TypeDescriptor -> TypeShape + accessors     |
//! +---------------------------------------------------------------+
//! |                        Byte Streams                           |
//! |   ByteSink / ByteSource  |  Cursor / CursorMut  |  Vec<u8>    |
//! +---------------------------------------------------------------+
//! ```
//!
//! ## Key Types
//!
//! | Type | Description |
//! |------|-------------|
//! | [`Codec`] | Strategy dispatcher with typed and type-erased entry points |
//! | [`TypeRegistry`] | Concurrent descriptor store keyed by `TypeId` |
//! | [`TypeDescriptor`] | Name, runtime identity, and shape of one type |
//! | [`RecordBuilder`] | Fluent registration of fields, constructors, raw layouts |
//! | [`MultiArray`] | Rank-n rectangular array with row-major storage |
//!
//! ## Modules Overview
//!
//! - [`codec`] - Strategy tables and per-shape codecs (start here)
//! - [`descriptor`] - Type model: shapes, fields, constructors, raw layouts
//! - [`registry`] - Shared descriptor store with the builtin primitives
//! - [`stream`] - Byte sink/source abstractions and slice cursors
//! - [`multi_array`] - Rectangular multi-dimensional arrays
//! - [`time`] - Tick-based timestamp and duration values
//! - [`error`] - Codec error taxonomy

/// Strategy dispatch plus the per-shape encoders and decoders.
pub mod codec;
/// Runtime type model (descriptors, shapes, record builders).
pub mod descriptor;
/// Error taxonomy shared by every codec operation.
pub mod error;
/// Rank-n rectangular arrays with row-major element storage.
pub mod multi_array;
/// Concurrent descriptor registry keyed by `TypeId`.
pub mod registry;
/// Byte stream abstractions and in-memory cursors.
pub mod stream;
/// Tick-based time values with fixed wire width.
pub mod time;

pub use codec::{Codec, CodecConfig, TextContract, TextEncoding};
pub use descriptor::{
    ArgList, ByteOrder, ParamDescriptor, PrimitiveKind, RecordBuilder, TypeDescriptor, TypeShape,
};
pub use error::{CodecError, CodecResult};
pub use multi_array::MultiArray;
pub use registry::TypeRegistry;
pub use stream::{ByteSink, ByteSource, Cursor, CursorMut};
pub use time::{TimeSpan, Timestamp, TICKS_PER_MILLISECOND, TICKS_PER_SECOND};

/// typewire version string.
pub const VERSION: &str = "0.3.2";
