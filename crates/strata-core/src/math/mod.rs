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

//! Provides the small set of mathematics primitives the texture subsystem needs.

pub mod dimension;

pub use self::dimension::Extent2D;

/// Rounds `value` up to the next power of two, or `None` past `2^31`.
///
/// `0` rounds up to `1`, since a texture axis is never allocated empty.
#[inline]
pub fn checked_next_power_of_two(value: u32) -> Option<u32> {
    value.max(1).checked_next_power_of_two()
}
