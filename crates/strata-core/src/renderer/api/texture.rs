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

//! Defines data structures related to texture resources and their sampler state.

use crate::image::PixelFormat;
use crate::math::Extent2D;
use bitflags::bitflags;
use std::num::NonZeroU32;
use std::sync::atomic::{AtomicU64, Ordering};

/// Defines how texture coordinates are handled when sampling outside the `[0, 1]` range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum AddressMode {
    /// Coordinates wrap around. `1.1` becomes `0.1`.
    #[default]
    Repeat,
    /// Coordinates wrap around, mirroring at each integer boundary.
    MirrorRepeat,
    /// Coordinates are clamped to the edge. `1.1` becomes `1.0`.
    ClampToEdge,
}

/// Defines the filtering mode requested for texture sampling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum FilterMode {
    /// Point sampling. Returns the value of the nearest texel.
    Nearest,
    /// Linear interpolation. Returns a weighted average of the four nearest texels.
    #[default]
    Linear,
}

/// The filter actually programmed into the backend, with the mipmap variant resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TextureFilter {
    /// Point sampling on the base level.
    Nearest,
    /// Bilinear sampling on the base level.
    Linear,
    /// Point sampling, linearly blended between the two nearest mip levels.
    NearestMipmapLinear,
    /// Bilinear sampling, linearly blended between the two nearest mip levels.
    LinearMipmapLinear,
}

impl TextureFilter {
    /// Resolves the minification filter for a texture with or without mipmaps.
    pub const fn minification(filter: FilterMode, mipmapped: bool) -> Self {
        match (mipmapped, filter) {
            (false, FilterMode::Nearest) => TextureFilter::Nearest,
            (false, FilterMode::Linear) => TextureFilter::Linear,
            (true, FilterMode::Nearest) => TextureFilter::NearestMipmapLinear,
            (true, FilterMode::Linear) => TextureFilter::LinearMipmapLinear,
        }
    }

    /// Resolves the magnification filter. Magnification never samples mip levels.
    pub const fn magnification(filter: FilterMode) -> Self {
        Self::minification(filter, false)
    }
}

bitflags! {
    /// Per-texture feature flags.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct TextureFlags: u32 {
        /// The texture wants an automatically generated mip chain.
        const HAS_MIPMAPS = 1 << 0;
        /// The single channel of an `L8` source is an intensity (replicated into every
        /// channel, alpha included) rather than a luminance.
        const INTENSITY = 1 << 1;
    }
}

/// An opaque handle to a backend texture resource. Never zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TextureHandle(pub NonZeroU32);

/// A process-unique identity for a [`Texture2D`](crate::renderer::Texture2D).
///
/// Texture stages refer to textures through keys so that they never own them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TextureKey(u64);

static NEXT_TEXTURE_KEY: AtomicU64 = AtomicU64::new(1);

impl TextureKey {
    /// Allocates a fresh key.
    pub fn next() -> Self {
        TextureKey(NEXT_TEXTURE_KEY.fetch_add(1, Ordering::Relaxed))
    }

    /// The raw key value.
    pub fn id(self) -> u64 {
        self.0
    }
}

/// A sampler or mip parameter applied to the texture currently bound on the active stage.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TextureParameter {
    /// Wrap mode for both the S and T coordinates.
    Wrap(AddressMode),
    /// Minification filter.
    MinFilter(TextureFilter),
    /// Magnification filter.
    MagFilter(TextureFilter),
    /// Requests automatic mip chain generation on upload.
    GenerateMipmap(bool),
    /// The highest mip level that may be sampled.
    MaxLevel(u32),
    /// The anisotropic filtering level.
    MaxAnisotropy(f32),
}

/// Internal (storage) formats a backend may allocate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InternalFormat {
    /// Unsized intensity.
    Intensity,
    /// 8-bit intensity.
    Intensity8,
    /// Unsized luminance.
    Luminance,
    /// 8-bit luminance.
    Luminance8,
    /// Unsized alpha.
    Alpha,
    /// 8-bit alpha.
    Alpha8,
    /// Unsized luminance and alpha.
    LuminanceAlpha,
    /// 8-bit luminance and alpha.
    Luminance8Alpha8,
    /// Unsized RGB.
    Rgb,
    /// 8-bit RGB.
    Rgb8,
    /// Unsized RGBA.
    Rgba,
    /// 8-bit RGBA.
    Rgba8,
}

/// Channel layouts pixel data can be transferred in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TransferFormat {
    /// One red (or intensity) channel.
    Red,
    /// One luminance channel.
    Luminance,
    /// One alpha channel.
    Alpha,
    /// Luminance followed by alpha.
    LuminanceAlpha,
    /// Red, green, blue.
    Rgb,
    /// Blue, green, red.
    Bgr,
    /// Red, green, blue, alpha.
    Rgba,
    /// Blue, green, red, alpha.
    Bgra,
}

/// The backend-facing descriptors for one pixel format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FormatDescriptor {
    /// The internal format when the backend does not accept sized formats.
    pub internal_unsized: InternalFormat,
    /// The internal format when the backend accepts sized formats.
    pub internal_sized: InternalFormat,
    /// The layout of the transferred bytes.
    pub transfer: TransferFormat,
}

impl FormatDescriptor {
    const fn new(
        internal_unsized: InternalFormat,
        internal_sized: InternalFormat,
        transfer: TransferFormat,
    ) -> Self {
        Self {
            internal_unsized,
            internal_sized,
            transfer,
        }
    }

    /// Looks up the descriptors for a pixel format.
    ///
    /// The intensity flag takes precedence over the format. Block-compressed formats
    /// have no entry and yield `None`.
    pub const fn resolve(format: PixelFormat, intensity: bool) -> Option<Self> {
        use InternalFormat as I;
        use TransferFormat as T;

        if intensity {
            return Some(Self::new(I::Intensity, I::Intensity8, T::Red));
        }
        match format {
            PixelFormat::L8 => Some(Self::new(I::Luminance, I::Luminance8, T::Luminance)),
            PixelFormat::A8 => Some(Self::new(I::Alpha, I::Alpha8, T::Alpha)),
            PixelFormat::L8A8 => Some(Self::new(
                I::LuminanceAlpha,
                I::Luminance8Alpha8,
                T::LuminanceAlpha,
            )),
            PixelFormat::R8G8B8 => Some(Self::new(I::Rgb, I::Rgb8, T::Rgb)),
            PixelFormat::B8G8R8 => Some(Self::new(I::Rgb, I::Rgb8, T::Bgr)),
            PixelFormat::R8G8B8A8 => Some(Self::new(I::Rgba, I::Rgba8, T::Rgba)),
            PixelFormat::B8G8R8A8 => Some(Self::new(I::Rgba, I::Rgba8, T::Bgra)),
            PixelFormat::Dxt1 | PixelFormat::Dxt3 | PixelFormat::Dxt5 => None,
        }
    }

    /// Picks the sized or unsized internal format.
    pub const fn internal(&self, sized: bool) -> InternalFormat {
        if sized {
            self.internal_sized
        } else {
            self.internal_unsized
        }
    }
}

/// A level-0 image transfer into the texture bound on the active stage.
#[derive(Debug, Clone, Copy)]
pub struct TextureUpload<'a> {
    /// The internal format to allocate.
    pub internal_format: InternalFormat,
    /// The layout of `data`.
    pub transfer_format: TransferFormat,
    /// The dimensions of the image in `data`.
    pub size: Extent2D,
    /// Tightly packed pixel rows, one byte per channel.
    pub data: &'a [u8],
}
