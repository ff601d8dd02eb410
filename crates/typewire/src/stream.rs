// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Byte stream traits plus bounds-checked slice cursors.
//!
//! Streams are sequential and forward-only; there is no seek. Fixed-width
//! helpers transfer native byte order, matching in-memory representation.

use crate::error::{CodecError, CodecResult};

/// Generate write methods for primitive types (eliminates code duplication)
///
/// Each generated method converts the value via `to_ne_bytes()` and hands
/// the result to `write_bytes`.
macro_rules! impl_write_ne {
    ($name:ident, $type:ty) => {
        fn $name(&mut self, value: $type) -> CodecResult<()> {
            self.write_bytes(&value.to_ne_bytes())
        }
    };
}

/// Generate read methods for primitive types (eliminates code duplication)
///
/// Each generated method fills a stack buffer via `read_exact` and converts
/// it with `from_ne_bytes()`.
macro_rules! impl_read_ne {
    ($name:ident, $type:ty, $size:expr) => {
        fn $name(&mut self) -> CodecResult<$type> {
            let mut bytes = [0u8; $size];
            self.read_exact(&mut bytes)?;
            Ok(<$type>::from_ne_bytes(bytes))
        }
    };
}

/// Destination for encoded bytes.
pub trait ByteSink {
    /// Append `data` in full or fail without a partial transfer.
    fn write_bytes(&mut self, data: &[u8]) -> CodecResult<()>;

    impl_write_ne!(write_u8, u8);
    impl_write_ne!(write_u16, u16);
    impl_write_ne!(write_u32, u32);
    impl_write_ne!(write_u64, u64);
    impl_write_ne!(write_i8, i8);
    impl_write_ne!(write_i16, i16);
    impl_write_ne!(write_i32, i32);
    impl_write_ne!(write_i64, i64);
    impl_write_ne!(write_f32, f32);
    impl_write_ne!(write_f64, f64);
}

/// Source of encoded bytes.
pub trait ByteSource {
    /// Fill `buf` in full or fail with `UnexpectedEndOfStream`.
    fn read_exact(&mut self, buf: &mut [u8]) -> CodecResult<()>;

    impl_read_ne!(read_u8, u8, 1);
    impl_read_ne!(read_u16, u16, 2);
    impl_read_ne!(read_u32, u32, 4);
    impl_read_ne!(read_u64, u64, 8);
    impl_read_ne!(read_i8, i8, 1);
    impl_read_ne!(read_i16, i16, 2);
    impl_read_ne!(read_i32, i32, 4);
    impl_read_ne!(read_i64, i64, 8);
    impl_read_ne!(read_f32, f32, 4);
    impl_read_ne!(read_f64, f64, 8);
}

/// Immutable cursor for reading (bounds-checked, zero-copy)
pub struct Cursor<'a> {
    buffer: &'a [u8],
    offset: usize,
}

impl<'a> Cursor<'a> {
    pub fn new(buffer: &'a [u8]) -> Self {
        Self { buffer, offset: 0 }
    }

    pub fn offset(&self) -> usize {
        self.offset
    }

    pub fn remaining(&self) -> usize {
        self.buffer.len().saturating_sub(self.offset)
    }

    pub fn is_eof(&self) -> bool {
        self.offset >= self.buffer.len()
    }

    /// Borrow the next `len` bytes without copying.
    pub fn take_bytes(&mut self, len: usize) -> CodecResult<&'a [u8]> {
        if len > self.remaining() {
            return Err(CodecError::UnexpectedEndOfStream {
                need: len,
                have: self.remaining(),
            });
        }
        let slice = &self.buffer[self.offset..self.offset + len];
        self.offset += len;
        Ok(slice)
    }
}

impl ByteSource for Cursor<'_> {
    fn read_exact(&mut self, buf: &mut [u8]) -> CodecResult<()> {
        let src = self.take_bytes(buf.len())?;
        buf.copy_from_slice(src);
        Ok(())
    }
}

/// Mutable cursor for writing into a caller-owned slice (bounds-checked)
pub struct CursorMut<'a> {
    buffer: &'a mut [u8],
    offset: usize,
}

impl<'a> CursorMut<'a> {
    pub fn new(buffer: &'a mut [u8]) -> Self {
        Self { buffer, offset: 0 }
    }

    pub fn offset(&self) -> usize {
        self.offset
    }

    pub fn remaining(&self) -> usize {
        self.buffer.len().saturating_sub(self.offset)
    }
}

impl ByteSink for CursorMut<'_> {
    fn write_bytes(&mut self, data: &[u8]) -> CodecResult<()> {
        if data.len() > self.remaining() {
            return Err(CodecError::UnexpectedEndOfStream {
                need: data.len(),
                have: self.remaining(),
            });
        }
        self.buffer[self.offset..self.offset + data.len()].copy_from_slice(data);
        self.offset += data.len();
        Ok(())
    }
}

impl ByteSink for Vec<u8> {
    fn write_bytes(&mut self, data: &[u8]) -> CodecResult<()> {
        self.extend_from_slice(data);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TEST_U16: u16 = 0xCDEF;
    const TEST_U32: u32 = 0x1234_5678;
    const TEST_U64: u64 = 0x1122_3344_5566_7788;

    #[test]
    fn test_cursor_read_overflow_reports_need_and_have() {
        let buffer = [0u8; 3];
        let mut cursor = Cursor::new(&buffer);
        cursor.read_u16().expect("Read u16 should succeed");

        let err = cursor.read_u32().unwrap_err();
        match err {
            CodecError::UnexpectedEndOfStream { need, have } => {
                assert_eq!(need, 4);
                assert_eq!(have, 1);
            }
            other => panic!("unexpected error {:?}", other),
        }
        // The failed read must not advance the cursor.
        assert_eq!(cursor.offset(), 2);
    }

    #[test]
    fn test_cursor_mut_write_overflow_reports_need_and_have() {
        let mut buffer = [0u8; 2];
        let mut cursor = CursorMut::new(&mut buffer);
        cursor.write_u16(TEST_U16).expect("Write u16 should succeed");

        let err = cursor.write_u8(0xFF).unwrap_err();
        match err {
            CodecError::UnexpectedEndOfStream { need, have } => {
                assert_eq!(need, 1);
                assert_eq!(have, 0);
            }
            other => panic!("unexpected error {:?}", other),
        }
    }

    #[test]
    fn test_roundtrip_across_numeric_types() {
        let mut sink = Vec::new();
        sink.write_u8(0xAB).expect("Write u8 should succeed");
        sink.write_u16(TEST_U16).expect("Write u16 should succeed");
        sink.write_u32(TEST_U32).expect("Write u32 should succeed");
        sink.write_u64(TEST_U64).expect("Write u64 should succeed");
        sink.write_i32(-42).expect("Write i32 should succeed");
        sink.write_f64(6.25).expect("Write f64 should succeed");
        sink.write_bytes(&[1, 2, 3, 4])
            .expect("Write bytes should succeed");

        let mut reader = Cursor::new(&sink);
        assert_eq!(reader.read_u8().expect("Read u8 should succeed"), 0xAB);
        assert_eq!(
            reader.read_u16().expect("Read u16 should succeed"),
            TEST_U16
        );
        assert_eq!(
            reader.read_u32().expect("Read u32 should succeed"),
            TEST_U32
        );
        assert_eq!(
            reader.read_u64().expect("Read u64 should succeed"),
            TEST_U64
        );
        assert_eq!(reader.read_i32().expect("Read i32 should succeed"), -42);
        assert!((reader.read_f64().expect("Read f64 should succeed") - 6.25).abs() < f64::EPSILON);
        assert_eq!(
            reader.take_bytes(4).expect("Take bytes should succeed"),
            &[1, 2, 3, 4]
        );
        assert!(reader.is_eof());
    }

    #[test]
    fn test_native_order_matches_memory_representation() {
        let mut sink = Vec::new();
        sink.write_u32(TEST_U32).expect("Write u32 should succeed");
        assert_eq!(sink, TEST_U32.to_ne_bytes());
    }

    #[test]
    fn test_cursor_mut_writes_into_borrowed_slice() {
        let mut buffer = [0u8; 8];
        {
            let mut cursor = CursorMut::new(&mut buffer);
            cursor.write_u32(TEST_U32).expect("Write u32 should succeed");
            assert_eq!(cursor.offset(), 4);
            assert_eq!(cursor.remaining(), 4);
        }
        assert_eq!(&buffer[..4], &TEST_U32.to_ne_bytes());
        assert_eq!(&buffer[4..], &[0, 0, 0, 0]);
    }

    #[test]
    fn test_take_bytes_at_exact_boundary() {
        let buffer = [9u8, 8, 7];
        let mut cursor = Cursor::new(&buffer);
        assert_eq!(
            cursor.take_bytes(3).expect("Take bytes should succeed"),
            &[9, 8, 7]
        );
        assert!(cursor.is_eof());
        let err = cursor.take_bytes(1).unwrap_err();
        assert_eq!(err, CodecError::UnexpectedEndOfStream { need: 1, have: 0 });
    }
}
