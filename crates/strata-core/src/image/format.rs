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

//! Pixel formats understood by [`PixelBuffer`](super::PixelBuffer).

/// The channel layout and bit depth of a pixel buffer.
///
/// Uncompressed formats store 8 bits per channel, in the channel order spelled
/// out by the variant name. The `Dxt*` variants are block-compressed in 4x4 texel
/// blocks and cannot be converted, extended, or uploaded through the texture object.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PixelFormat {
    /// Single 8-bit luminance channel.
    L8,
    /// Single 8-bit alpha channel.
    A8,
    /// 8-bit luminance followed by 8-bit alpha.
    L8A8,
    /// Three 8-bit channels, red first.
    R8G8B8,
    /// Three 8-bit channels, blue first.
    B8G8R8,
    /// Four 8-bit channels, red first, alpha last.
    R8G8B8A8,
    /// Four 8-bit channels, blue first, alpha last.
    B8G8R8A8,
    /// BC1 block compression, 8 bytes per block.
    Dxt1,
    /// BC2 block compression, 16 bytes per block.
    Dxt3,
    /// BC3 block compression, 16 bytes per block.
    Dxt5,
}

impl PixelFormat {
    /// Returns the size in bytes of a single pixel, or `0` for block-compressed formats.
    pub const fn bytes_per_pixel(self) -> usize {
        match self {
            PixelFormat::L8 | PixelFormat::A8 => 1,
            PixelFormat::L8A8 => 2,
            PixelFormat::R8G8B8 | PixelFormat::B8G8R8 => 3,
            PixelFormat::R8G8B8A8 | PixelFormat::B8G8R8A8 => 4,
            PixelFormat::Dxt1 | PixelFormat::Dxt3 | PixelFormat::Dxt5 => 0,
        }
    }

    /// Returns `true` for blue-green-red ordered formats.
    pub const fn is_bgr(self) -> bool {
        matches!(self, PixelFormat::B8G8R8 | PixelFormat::B8G8R8A8)
    }

    /// Returns `true` for block-compressed formats.
    pub const fn is_compressed(self) -> bool {
        matches!(
            self,
            PixelFormat::Dxt1 | PixelFormat::Dxt3 | PixelFormat::Dxt5
        )
    }

    /// Returns the format with red and blue swapped, if it has a counterpart.
    pub const fn swapped_red_blue(self) -> Option<PixelFormat> {
        match self {
            PixelFormat::R8G8B8 => Some(PixelFormat::B8G8R8),
            PixelFormat::B8G8R8 => Some(PixelFormat::R8G8B8),
            PixelFormat::R8G8B8A8 => Some(PixelFormat::B8G8R8A8),
            PixelFormat::B8G8R8A8 => Some(PixelFormat::R8G8B8A8),
            _ => None,
        }
    }

    /// Returns the number of bytes needed to store a `width` x `height` image.
    pub fn size_in_bytes(self, width: u32, height: u32) -> usize {
        match self {
            PixelFormat::Dxt1 => block_count(width, height) * 8,
            PixelFormat::Dxt3 | PixelFormat::Dxt5 => block_count(width, height) * 16,
            _ => width as usize * height as usize * self.bytes_per_pixel(),
        }
    }

    /// Decodes one pixel of this format into RGBA.
    ///
    /// Luminance expands to grey, missing alpha reads as opaque, and alpha-only
    /// pixels read as white.
    pub(crate) fn read_rgba(self, px: &[u8]) -> [u8; 4] {
        match self {
            PixelFormat::L8 => [px[0], px[0], px[0], 255],
            PixelFormat::A8 => [255, 255, 255, px[0]],
            PixelFormat::L8A8 => [px[0], px[0], px[0], px[1]],
            PixelFormat::R8G8B8 => [px[0], px[1], px[2], 255],
            PixelFormat::B8G8R8 => [px[2], px[1], px[0], 255],
            PixelFormat::R8G8B8A8 => [px[0], px[1], px[2], px[3]],
            PixelFormat::B8G8R8A8 => [px[2], px[1], px[0], px[3]],
            PixelFormat::Dxt1 | PixelFormat::Dxt3 | PixelFormat::Dxt5 => {
                unreachable!("compressed formats are rejected before per-pixel access")
            }
        }
    }

    /// Encodes an RGBA pixel into this format.
    pub(crate) fn write_rgba(self, [r, g, b, a]: [u8; 4], out: &mut [u8]) {
        let luminance = ((r as u16 + g as u16 + b as u16) / 3) as u8;
        match self {
            PixelFormat::L8 => out[0] = luminance,
            PixelFormat::A8 => out[0] = a,
            PixelFormat::L8A8 => out.copy_from_slice(&[luminance, a]),
            PixelFormat::R8G8B8 => out.copy_from_slice(&[r, g, b]),
            PixelFormat::B8G8R8 => out.copy_from_slice(&[b, g, r]),
            PixelFormat::R8G8B8A8 => out.copy_from_slice(&[r, g, b, a]),
            PixelFormat::B8G8R8A8 => out.copy_from_slice(&[b, g, r, a]),
            PixelFormat::Dxt1 | PixelFormat::Dxt3 | PixelFormat::Dxt5 => {
                unreachable!("compressed formats are rejected before per-pixel access")
            }
        }
    }
}

fn block_count(width: u32, height: u32) -> usize {
    width.div_ceil(4) as usize * height.div_ceil(4) as usize
}
