// Copyright 2025 eraflo
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Defines types for representing 2D dimensions.

use super::checked_next_power_of_two;

/// A 2D extent, representing width and height in texels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Extent2D {
    /// The width component of the extent.
    pub width: u32,
    /// The height component of the extent.
    pub height: u32,
}

impl Extent2D {
    /// Creates a new extent.
    #[inline]
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Returns the extent with each axis rounded up to the next power of two, or
    /// `None` when an axis is past `2^31`.
    #[inline]
    pub fn checked_next_power_of_two(self) -> Option<Self> {
        Some(Self {
            width: checked_next_power_of_two(self.width)?,
            height: checked_next_power_of_two(self.height)?,
        })
    }

    /// Returns `true` if `other` fits inside this extent on both axes.
    #[inline]
    pub fn contains(self, other: Extent2D) -> bool {
        other.width <= self.width && other.height <= self.height
    }
}
