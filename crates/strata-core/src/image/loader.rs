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

//! Decoding of encoded image files into pixel buffers.

use super::{PixelBuffer, PixelFormat};
use ::image::DynamicImage;
use anyhow::{Context, Result};

impl PixelBuffer {
    /// Decodes an encoded image (PNG) into a pixel buffer.
    ///
    /// 8-bit grey, grey+alpha, RGB and RGBA images keep their layout; every other
    /// colour type is converted to `R8G8B8A8`.
    pub fn decode(bytes: &[u8]) -> Result<PixelBuffer> {
        let img = ::image::load_from_memory(bytes).context("Failed to decode image from memory")?;
        let (width, height) = (img.width(), img.height());

        let (format, data) = match img {
            DynamicImage::ImageLuma8(buf) => (PixelFormat::L8, buf.into_raw()),
            DynamicImage::ImageLumaA8(buf) => (PixelFormat::L8A8, buf.into_raw()),
            DynamicImage::ImageRgb8(buf) => (PixelFormat::R8G8B8, buf.into_raw()),
            DynamicImage::ImageRgba8(buf) => (PixelFormat::R8G8B8A8, buf.into_raw()),
            other => (PixelFormat::R8G8B8A8, other.to_rgba8().into_raw()),
        };

        let buffer = PixelBuffer::from_raw(width, height, format, data)
            .context("Decoded image does not match its dimensions")?;
        log::debug!("PixelBuffer: Decoded {width}x{height} image as {format:?}");
        Ok(buffer)
    }
}
