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

//! Defines the error types for the texture subsystem.

use crate::math::Extent2D;
use std::fmt;

/// An error related to the creation or use of a GPU texture resource.
#[derive(Debug)]
pub enum ResourceError {
    /// The graphics backend refused the operation.
    BackendError(String),
    /// The texture cannot be padded to power-of-two dimensions that fit in a `u32`.
    TooLarge(Extent2D),
}

impl fmt::Display for ResourceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResourceError::BackendError(msg) => write!(f, "Texture backend error: {msg}"),
            ResourceError::TooLarge(size) => write!(
                f,
                "Texture of {}x{} has no power-of-two padding",
                size.width, size.height
            ),
        }
    }
}

impl std::error::Error for ResourceError {}
