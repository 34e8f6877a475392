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

//! Errors raised by pixel buffer operations.

use super::PixelFormat;
use crate::math::Extent2D;
use std::fmt;

/// An error related to the layout or format of a [`PixelBuffer`](super::PixelBuffer).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImageError {
    /// The raw byte storage does not match the declared dimensions and format.
    SizeMismatch {
        /// The number of bytes the dimensions and format require.
        expected: usize,
        /// The number of bytes that were supplied.
        actual: usize,
    },
    /// The operation needs per-pixel access, which block-compressed formats lack.
    CompressedFormat(PixelFormat),
    /// Two buffers taking part in the same operation disagree on their format.
    FormatMismatch {
        /// The format of the destination buffer.
        destination: PixelFormat,
        /// The format of the source buffer.
        source: PixelFormat,
    },
    /// The destination buffer cannot hold the source buffer.
    DestinationTooSmall {
        /// The size of the destination buffer.
        destination: Extent2D,
        /// The size of the source buffer.
        source: Extent2D,
    },
}

impl fmt::Display for ImageError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ImageError::SizeMismatch { expected, actual } => {
                write!(f, "Pixel data holds {actual} bytes, expected {expected}")
            }
            ImageError::CompressedFormat(format) => {
                write!(f, "Operation not supported on compressed format {format:?}")
            }
            ImageError::FormatMismatch {
                destination,
                source,
            } => {
                write!(
                    f,
                    "Format mismatch: destination is {destination:?}, source is {source:?}"
                )
            }
            ImageError::DestinationTooSmall {
                destination,
                source,
            } => {
                write!(
                    f,
                    "Destination {}x{} cannot hold source {}x{}",
                    destination.width, destination.height, source.width, source.height
                )
            }
        }
    }
}

impl std::error::Error for ImageError {}
