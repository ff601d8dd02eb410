// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Tick-count time values with a fixed 8-byte wire form.
//!
//! One tick is 100 nanoseconds. Both types transfer as a signed 64-bit
//! tick count and stay usable inside fixed-layout records.

use bytemuck::{Pod, Zeroable};

/// Ticks per second (100 ns resolution).
pub const TICKS_PER_SECOND: i64 = 10_000_000;

/// Ticks per millisecond.
pub const TICKS_PER_MILLISECOND: i64 = TICKS_PER_SECOND / 1_000;

/// Absolute point in time as ticks since an epoch chosen by the caller.
#[repr(transparent)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Pod, Zeroable)]
pub struct Timestamp {
    ticks: i64,
}

impl Timestamp {
    /// Epoch itself.
    pub const ZERO: Self = Self { ticks: 0 };

    pub const fn from_ticks(ticks: i64) -> Self {
        Self { ticks }
    }

    pub const fn ticks(self) -> i64 {
        self.ticks
    }

    /// Signed distance from `earlier` to `self`.
    pub const fn since(self, earlier: Timestamp) -> TimeSpan {
        TimeSpan::from_ticks(self.ticks - earlier.ticks)
    }
}

/// Signed length of time in ticks.
#[repr(transparent)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Pod, Zeroable)]
pub struct TimeSpan {
    ticks: i64,
}

impl TimeSpan {
    /// Zero-length span.
    pub const ZERO: Self = Self { ticks: 0 };

    pub const fn from_ticks(ticks: i64) -> Self {
        Self { ticks }
    }

    pub const fn from_seconds(seconds: i64) -> Self {
        Self {
            ticks: seconds * TICKS_PER_SECOND,
        }
    }

    pub const fn from_millis(millis: i64) -> Self {
        Self {
            ticks: millis * TICKS_PER_MILLISECOND,
        }
    }

    pub const fn ticks(self) -> i64 {
        self.ticks
    }
}
