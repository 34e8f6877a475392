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

//! Describes what a texture backend can do.

/// Texture-related capabilities reported by a [`TextureDevice`](crate::renderer::TextureDevice).
///
/// None of these are errors when missing: the texture object falls back to
/// padding, channel conversion, or unsized formats as needed.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TextureCapabilities {
    /// Textures with non-power-of-two dimensions can be allocated and sampled.
    pub npot_textures: bool,
    /// Single-channel intensity textures are supported natively.
    pub intensity_textures: bool,
    /// Pixel data can be transferred in blue-green-red order.
    pub bgr_texture_transfer: bool,
    /// Sized internal formats (e.g. `RGBA8` rather than `RGBA`) are accepted.
    pub sized_texture_formats: bool,
    /// The maximum anisotropic filtering level. `1.0` means no anisotropic filtering.
    pub max_anisotropy: f32,
    /// The number of texture units that can be bound simultaneously.
    pub max_texture_units: u32,
}

impl TextureCapabilities {
    /// Returns `true` if anisotropic filtering beyond 1x is available.
    pub fn supports_anisotropy(&self) -> bool {
        self.max_anisotropy > 1.0
    }
}

impl Default for TextureCapabilities {
    /// A fully featured backend: the fallback paths stay dormant.
    fn default() -> Self {
        Self {
            npot_textures: true,
            intensity_textures: true,
            bgr_texture_transfer: true,
            sized_texture_formats: true,
            max_anisotropy: 16.0,
            max_texture_units: 16,
        }
    }
}
