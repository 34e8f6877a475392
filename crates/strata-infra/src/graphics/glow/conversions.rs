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

use strata_core::renderer::{AddressMode, InternalFormat, TextureFilter, TransferFormat};

/// Enums from fixed-function and extension headers that `glow` does not export.
pub mod compat {
    /// `GL_ALPHA`
    pub const ALPHA: u32 = 0x1906;
    /// `GL_LUMINANCE`
    pub const LUMINANCE: u32 = 0x1909;
    /// `GL_LUMINANCE_ALPHA`
    pub const LUMINANCE_ALPHA: u32 = 0x190A;
    /// `GL_ALPHA8`
    pub const ALPHA8: u32 = 0x803C;
    /// `GL_LUMINANCE8`
    pub const LUMINANCE8: u32 = 0x8040;
    /// `GL_LUMINANCE8_ALPHA8`
    pub const LUMINANCE8_ALPHA8: u32 = 0x8045;
    /// `GL_INTENSITY`
    pub const INTENSITY: u32 = 0x8049;
    /// `GL_INTENSITY8`
    pub const INTENSITY8: u32 = 0x804B;
    /// `GL_GENERATE_MIPMAP`, a texture parameter in compatibility contexts.
    pub const GENERATE_MIPMAP: u32 = 0x8191;
    /// `GL_TEXTURE_MAX_ANISOTROPY(_EXT)`
    pub const TEXTURE_MAX_ANISOTROPY: u32 = 0x84FE;
    /// `GL_MAX_TEXTURE_MAX_ANISOTROPY(_EXT)`
    pub const MAX_TEXTURE_MAX_ANISOTROPY: u32 = 0x84FF;
    /// `GL_CONTEXT_PROFILE_MASK`
    pub const CONTEXT_PROFILE_MASK: u32 = 0x9126;
    /// `GL_CONTEXT_COMPATIBILITY_PROFILE_BIT`
    pub const CONTEXT_COMPATIBILITY_PROFILE_BIT: i32 = 0x2;
}

/// A local extension trait to convert texture API types into GL enums.
/// This avoids Rust's orphan rules while keeping an idiomatic `.into_gl()` syntax.
pub trait IntoGl<T> {
    /// Consumes self and converts it into a GL-compatible value.
    fn into_gl(self) -> T;
}

impl IntoGl<u32> for AddressMode {
    fn into_gl(self) -> u32 {
        match self {
            AddressMode::Repeat => glow::REPEAT,
            AddressMode::MirrorRepeat => glow::MIRRORED_REPEAT,
            AddressMode::ClampToEdge => glow::CLAMP_TO_EDGE,
        }
    }
}

impl IntoGl<u32> for TextureFilter {
    fn into_gl(self) -> u32 {
        match self {
            TextureFilter::Nearest => glow::NEAREST,
            TextureFilter::Linear => glow::LINEAR,
            TextureFilter::NearestMipmapLinear => glow::NEAREST_MIPMAP_LINEAR,
            TextureFilter::LinearMipmapLinear => glow::LINEAR_MIPMAP_LINEAR,
        }
    }
}

impl IntoGl<u32> for InternalFormat {
    fn into_gl(self) -> u32 {
        match self {
            InternalFormat::Intensity => compat::INTENSITY,
            InternalFormat::Intensity8 => compat::INTENSITY8,
            InternalFormat::Luminance => compat::LUMINANCE,
            InternalFormat::Luminance8 => compat::LUMINANCE8,
            InternalFormat::Alpha => compat::ALPHA,
            InternalFormat::Alpha8 => compat::ALPHA8,
            InternalFormat::LuminanceAlpha => compat::LUMINANCE_ALPHA,
            InternalFormat::Luminance8Alpha8 => compat::LUMINANCE8_ALPHA8,
            InternalFormat::Rgb => glow::RGB,
            InternalFormat::Rgb8 => glow::RGB8,
            InternalFormat::Rgba => glow::RGBA,
            InternalFormat::Rgba8 => glow::RGBA8,
        }
    }
}

impl IntoGl<u32> for TransferFormat {
    fn into_gl(self) -> u32 {
        match self {
            TransferFormat::Red => glow::RED,
            TransferFormat::Luminance => compat::LUMINANCE,
            TransferFormat::Alpha => compat::ALPHA,
            TransferFormat::LuminanceAlpha => compat::LUMINANCE_ALPHA,
            TransferFormat::Rgb => glow::RGB,
            TransferFormat::Bgr => glow::BGR,
            TransferFormat::Rgba => glow::RGBA,
            TransferFormat::Bgra => glow::BGRA,
        }
    }
}

/// Which family of texture formats a context accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FormatProfile {
    /// Legacy and compatibility-profile desktop contexts, which still take
    /// luminance, alpha and intensity formats directly.
    Legacy,
    /// Desktop core profiles. Single and dual channel formats become red and
    /// red-green textures with a swizzle mask.
    Core,
    /// OpenGL ES, which keeps unsized luminance and alpha but has no intensity.
    Es,
}

/// The GL enums for one `glTexImage2D` call, plus the swizzle mask the texture
/// needs to read back like the requested format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GlUpload {
    /// The `internalformat` argument.
    pub internal_format: u32,
    /// The `format` argument.
    pub transfer_format: u32,
    /// `GL_TEXTURE_SWIZZLE_{R,G,B,A}`, when the format is emulated.
    pub swizzle: Option<[u32; 4]>,
}

const LUMINANCE_SWIZZLE: [u32; 4] = [glow::RED, glow::RED, glow::RED, glow::ONE];
const ALPHA_SWIZZLE: [u32; 4] = [glow::ZERO, glow::ZERO, glow::ZERO, glow::RED];
const LUMINANCE_ALPHA_SWIZZLE: [u32; 4] = [glow::RED, glow::RED, glow::RED, glow::GREEN];
const INTENSITY_SWIZZLE: [u32; 4] = [glow::RED; 4];

/// The swizzle that undoes any earlier mask on a reused texture name.
pub const IDENTITY_SWIZZLE: [u32; 4] = [glow::RED, glow::GREEN, glow::BLUE, glow::ALPHA];

/// Maps an upload's formats onto the enums `profile` accepts.
pub fn resolve_upload(
    internal: InternalFormat,
    transfer: TransferFormat,
    profile: FormatProfile,
) -> GlUpload {
    let direct = GlUpload {
        internal_format: internal.into_gl(),
        transfer_format: transfer.into_gl(),
        swizzle: None,
    };
    let emulated = |internal_format, transfer_format, swizzle| GlUpload {
        internal_format,
        transfer_format,
        swizzle: Some(swizzle),
    };

    match (profile, internal) {
        (FormatProfile::Legacy, _) => direct,

        (FormatProfile::Core, InternalFormat::Luminance) => {
            emulated(glow::RED, glow::RED, LUMINANCE_SWIZZLE)
        }
        (FormatProfile::Core, InternalFormat::Luminance8) => {
            emulated(glow::R8, glow::RED, LUMINANCE_SWIZZLE)
        }
        (FormatProfile::Core, InternalFormat::Alpha) => {
            emulated(glow::RED, glow::RED, ALPHA_SWIZZLE)
        }
        (FormatProfile::Core, InternalFormat::Alpha8) => {
            emulated(glow::R8, glow::RED, ALPHA_SWIZZLE)
        }
        (FormatProfile::Core, InternalFormat::LuminanceAlpha) => {
            emulated(glow::RG, glow::RG, LUMINANCE_ALPHA_SWIZZLE)
        }
        (FormatProfile::Core, InternalFormat::Luminance8Alpha8) => {
            emulated(glow::RG8, glow::RG, LUMINANCE_ALPHA_SWIZZLE)
        }
        (FormatProfile::Core, InternalFormat::Intensity) => {
            emulated(glow::RED, glow::RED, INTENSITY_SWIZZLE)
        }
        (FormatProfile::Core | FormatProfile::Es, InternalFormat::Intensity8) => {
            emulated(glow::R8, glow::RED, INTENSITY_SWIZZLE)
        }
        (FormatProfile::Es, InternalFormat::Intensity) => {
            emulated(glow::R8, glow::RED, INTENSITY_SWIZZLE)
        }

        // ES only takes the luminance family unsized, with matching transfer enums.
        (FormatProfile::Es, InternalFormat::Luminance | InternalFormat::Luminance8) => {
            GlUpload {
                internal_format: compat::LUMINANCE,
                transfer_format: compat::LUMINANCE,
                swizzle: None,
            }
        }
        (FormatProfile::Es, InternalFormat::Alpha | InternalFormat::Alpha8) => GlUpload {
            internal_format: compat::ALPHA,
            transfer_format: compat::ALPHA,
            swizzle: None,
        },
        (
            FormatProfile::Es,
            InternalFormat::LuminanceAlpha | InternalFormat::Luminance8Alpha8,
        ) => GlUpload {
            internal_format: compat::LUMINANCE_ALPHA,
            transfer_format: compat::LUMINANCE_ALPHA,
            swizzle: None,
        },

        (
            FormatProfile::Core | FormatProfile::Es,
            InternalFormat::Rgb | InternalFormat::Rgb8 | InternalFormat::Rgba | InternalFormat::Rgba8,
        ) => direct,
    }
}
