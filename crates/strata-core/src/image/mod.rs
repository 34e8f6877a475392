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

//! CPU-side pixel storage used as the source of texture uploads.
//!
//! A [`PixelBuffer`] is a tightly packed, row-major image tagged with a
//! [`PixelFormat`]. Besides plain storage it knows the handful of transforms the
//! texture object needs when a backend lacks a capability: red/blue swapping,
//! intensity expansion, generic format conversion, and edge-clamp border
//! extension for padded textures.

mod error;
mod format;
mod loader;

pub use self::error::ImageError;
pub use self::format::PixelFormat;

use crate::math::Extent2D;

/// An in-memory image with a pixel format tag, dimensions, and raw byte storage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PixelBuffer {
    width: u32,
    height: u32,
    format: PixelFormat,
    data: Vec<u8>,
}

impl PixelBuffer {
    /// Allocates a zero-filled buffer.
    pub fn new(width: u32, height: u32, format: PixelFormat) -> Self {
        Self {
            width,
            height,
            format,
            data: vec![0; format.size_in_bytes(width, height)],
        }
    }

    /// Wraps existing pixel data, checking that its length matches the layout.
    pub fn from_raw(
        width: u32,
        height: u32,
        format: PixelFormat,
        data: Vec<u8>,
    ) -> Result<Self, ImageError> {
        let expected = format.size_in_bytes(width, height);
        if data.len() != expected {
            return Err(ImageError::SizeMismatch {
                expected,
                actual: data.len(),
            });
        }
        Ok(Self {
            width,
            height,
            format,
            data,
        })
    }

    /// Reallocates the buffer for new dimensions and format, zero-filling its contents.
    pub fn create(&mut self, width: u32, height: u32, format: PixelFormat) {
        self.width = width;
        self.height = height;
        self.format = format;
        self.data.clear();
        self.data.resize(format.size_in_bytes(width, height), 0);
    }

    /// The width in pixels.
    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    /// The height in pixels.
    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    /// The dimensions of the buffer.
    #[inline]
    pub fn size(&self) -> Extent2D {
        Extent2D::new(self.width, self.height)
    }

    /// The format of the stored pixels.
    #[inline]
    pub fn format(&self) -> PixelFormat {
        self.format
    }

    /// The raw pixel bytes, row-major without padding.
    #[inline]
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Mutable access to the raw pixel bytes.
    #[inline]
    pub fn data_mut(&mut self) -> &mut [u8] {
        &mut self.data
    }

    /// Swaps the red and blue channels of every pixel in place and retags the buffer
    /// with the counterpart format (`B8G8R8` <-> `R8G8B8`, `B8G8R8A8` <-> `R8G8B8A8`).
    ///
    /// Alpha is left untouched. Returns `false` and leaves the buffer alone when the
    /// format has no red/blue counterpart.
    pub fn swap_red_blue(&mut self) -> bool {
        let Some(swapped) = self.format.swapped_red_blue() else {
            return false;
        };
        for px in self.data.chunks_exact_mut(self.format.bytes_per_pixel()) {
            px.swap(0, 2);
        }
        self.format = swapped;
        true
    }

    /// Turns an `L8` buffer into `L8A8` by duplicating every byte, so the luminance
    /// doubles as alpha. Returns `false` for any other format.
    pub fn expand_intensity(&mut self) -> bool {
        if self.format != PixelFormat::L8 {
            return false;
        }
        let expanded: Vec<u8> = self.data.iter().flat_map(|&i| [i, i]).collect();
        self.data = expanded;
        self.format = PixelFormat::L8A8;
        true
    }

    /// Converts the buffer in place to another uncompressed format.
    pub fn convert_to(&mut self, format: PixelFormat) -> Result<(), ImageError> {
        if format == self.format {
            return Ok(());
        }
        if self.format.is_compressed() {
            return Err(ImageError::CompressedFormat(self.format));
        }
        if format.is_compressed() {
            return Err(ImageError::CompressedFormat(format));
        }
        if self.format.swapped_red_blue() == Some(format) {
            self.swap_red_blue();
            return Ok(());
        }

        let mut converted = vec![0; format.size_in_bytes(self.width, self.height)];
        let src_pixels = self.data.chunks_exact(self.format.bytes_per_pixel());
        let dst_pixels = converted.chunks_exact_mut(format.bytes_per_pixel());
        for (src, dst) in src_pixels.zip(dst_pixels) {
            format.write_rgba(self.format.read_rgba(src), dst);
        }

        log::debug!(
            "PixelBuffer: Converted {}x{} from {:?} to {:?}",
            self.width,
            self.height,
            self.format,
            format
        );
        self.data = converted;
        self.format = format;
        Ok(())
    }

    /// Copies `source` into the top-left corner of this buffer and fills the
    /// remaining columns and rows with the nearest source edge pixel.
    ///
    /// This buffer must share the source's format and be at least as large on both
    /// axes. An empty source leaves the destination untouched.
    pub fn extend_clamp_to_edge_border(&mut self, source: &PixelBuffer) -> Result<(), ImageError> {
        if self.format != source.format {
            return Err(ImageError::FormatMismatch {
                destination: self.format,
                source: source.format,
            });
        }
        if self.format.is_compressed() {
            return Err(ImageError::CompressedFormat(self.format));
        }
        if !self.size().contains(source.size()) {
            return Err(ImageError::DestinationTooSmall {
                destination: self.size(),
                source: source.size(),
            });
        }
        if source.width == 0 || source.height == 0 {
            return Ok(());
        }

        let bpp = self.format.bytes_per_pixel();
        let src_row = source.width as usize * bpp;
        let dst_row = self.width as usize * bpp;
        let last_row = source.height as usize - 1;

        for (y, dst) in self.data.chunks_exact_mut(dst_row).enumerate() {
            let sy = y.min(last_row);
            let src = &source.data[sy * src_row..(sy + 1) * src_row];
            let (head, tail) = dst.split_at_mut(src_row);
            head.copy_from_slice(src);
            let edge = &src[src_row - bpp..];
            for px in tail.chunks_exact_mut(bpp) {
                px.copy_from_slice(edge);
            }
        }
        Ok(())
    }

    /// Returns a copy of this buffer grown to `size` with an edge-clamped border.
    pub fn extended_to(&self, size: Extent2D) -> Result<PixelBuffer, ImageError> {
        let mut extended = PixelBuffer::new(size.width, size.height, self.format);
        extended.extend_clamp_to_edge_border(self)?;
        Ok(extended)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_raw_checks_length() {
        let err = PixelBuffer::from_raw(2, 2, PixelFormat::R8G8B8, vec![0; 11]).unwrap_err();
        assert_eq!(
            err,
            ImageError::SizeMismatch {
                expected: 12,
                actual: 11
            }
        );
        assert!(PixelBuffer::from_raw(2, 2, PixelFormat::R8G8B8, vec![0; 12]).is_ok());
    }

    #[test]
    fn test_create_resizes_storage() {
        let mut buffer = PixelBuffer::from_raw(1, 1, PixelFormat::L8, vec![9]).unwrap();
        buffer.create(4, 2, PixelFormat::R8G8B8A8);
        assert_eq!(buffer.size(), Extent2D::new(4, 2));
        assert_eq!(buffer.data().len(), 32);
        assert!(buffer.data().iter().all(|&b| b == 0));
    }

    #[test]
    fn test_swap_red_blue_keeps_alpha() {
        let mut buffer =
            PixelBuffer::from_raw(2, 1, PixelFormat::B8G8R8A8, vec![1, 2, 3, 4, 5, 6, 7, 8])
                .unwrap();
        assert!(buffer.swap_red_blue());
        assert_eq!(buffer.format(), PixelFormat::R8G8B8A8);
        assert_eq!(buffer.data(), &[3, 2, 1, 4, 7, 6, 5, 8]);
    }

    #[test]
    fn test_swap_red_blue_ignores_luminance() {
        let mut buffer = PixelBuffer::from_raw(1, 1, PixelFormat::L8A8, vec![1, 2]).unwrap();
        assert!(!buffer.swap_red_blue());
        assert_eq!(buffer.data(), &[1, 2]);
    }

    #[test]
    fn test_expand_intensity_duplicates_bytes() {
        let mut buffer = PixelBuffer::from_raw(3, 1, PixelFormat::L8, vec![10, 20, 30]).unwrap();
        assert!(buffer.expand_intensity());
        assert_eq!(buffer.format(), PixelFormat::L8A8);
        assert_eq!(buffer.data(), &[10, 10, 20, 20, 30, 30]);
    }

    #[test]
    fn test_convert_rgb_to_luminance_alpha() {
        let mut buffer =
            PixelBuffer::from_raw(1, 2, PixelFormat::R8G8B8, vec![30, 60, 90, 0, 0, 255]).unwrap();
        buffer.convert_to(PixelFormat::L8A8).unwrap();
        assert_eq!(buffer.data(), &[60, 255, 85, 255]);
    }

    #[test]
    fn test_convert_rejects_compressed() {
        let mut buffer = PixelBuffer::new(4, 4, PixelFormat::Dxt1);
        assert_eq!(
            buffer.convert_to(PixelFormat::R8G8B8A8),
            Err(ImageError::CompressedFormat(PixelFormat::Dxt1))
        );
    }

    #[test]
    fn test_extend_clamp_to_edge_border() {
        // 2x2 source:
        //   1 2
        //   3 4
        let source = PixelBuffer::from_raw(2, 2, PixelFormat::L8, vec![1, 2, 3, 4]).unwrap();
        let extended = source.extended_to(Extent2D::new(4, 3)).unwrap();
        assert_eq!(
            extended.data(),
            &[
                1, 2, 2, 2, //
                3, 4, 4, 4, //
                3, 4, 4, 4, //
            ]
        );
    }

    #[test]
    fn test_extend_rejects_smaller_destination() {
        let source = PixelBuffer::new(4, 4, PixelFormat::R8G8B8);
        let mut destination = PixelBuffer::new(2, 8, PixelFormat::R8G8B8);
        assert!(matches!(
            destination.extend_clamp_to_edge_border(&source),
            Err(ImageError::DestinationTooSmall { .. })
        ));
    }
}
