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

use super::capabilities::{detect_capabilities, has_anisotropic_filtering};
use super::conversions::{compat, resolve_upload, FormatProfile, IntoGl, IDENTITY_SWIZZLE};
use super::version::GlVersion;
use glow::HasContext;
use std::collections::HashSet;
use std::fmt;
use std::rc::Rc;
use strata_core::renderer::{
    ResourceError, TextureCapabilities, TextureDevice, TextureHandle, TextureParameter,
    TextureUpload,
};

/// A [`TextureDevice`] that drives a live OpenGL context through `glow`.
///
/// The context must stay current on the calling thread for the lifetime of the
/// device. Handles map one-to-one onto GL texture names.
pub struct GlowTextureDevice {
    gl: Rc<glow::Context>,
    version: GlVersion,
    capabilities: TextureCapabilities,
    compatibility_profile: bool,
    profile: FormatProfile,
    live: HashSet<TextureHandle>,
    /// Textures that regenerate their mip chain with `glGenerateMipmap` after
    /// each upload, for contexts without `GL_GENERATE_MIPMAP`.
    mipmapped: HashSet<TextureHandle>,
    /// Textures whose last upload set a non-identity swizzle mask.
    swizzled: HashSet<TextureHandle>,
    bindings: Vec<Option<TextureHandle>>,
    active_stage: usize,
}

impl fmt::Debug for GlowTextureDevice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GlowTextureDevice")
            .field("version", &self.version)
            .field("capabilities", &self.capabilities)
            .field("compatibility_profile", &self.compatibility_profile)
            .field("profile", &self.profile)
            .field("live_textures", &self.live.len())
            .field("active_stage", &self.active_stage)
            .finish()
    }
}

impl GlowTextureDevice {
    /// Wraps `gl` and queries its texture capabilities.
    pub fn new(gl: Rc<glow::Context>) -> Self {
        let version = GlVersion::read(&gl);
        let compatibility_profile = Self::query_compatibility_profile(&gl, version);

        let extensions = gl.supported_extensions();
        let (max_anisotropy, texture_units) = unsafe {
            let anisotropy = if has_anisotropic_filtering(version, extensions) {
                gl.get_parameter_f32(compat::MAX_TEXTURE_MAX_ANISOTROPY)
            } else {
                1.0
            };
            let units = gl.get_parameter_i32(glow::MAX_TEXTURE_IMAGE_UNITS);
            (anisotropy, u32::try_from(units).unwrap_or(1))
        };
        let capabilities = detect_capabilities(
            version,
            extensions,
            compatibility_profile,
            max_anisotropy,
            texture_units,
        );

        log::info!(
            "GlowTextureDevice: OpenGL{} {}.{} ({} profile)",
            if version.is_es { " ES" } else { "" },
            version.major,
            version.minor,
            if compatibility_profile {
                "compatibility"
            } else {
                "core"
            }
        );
        log::info!("GlowTextureDevice: {capabilities:?}");

        let profile = if version.is_es {
            FormatProfile::Es
        } else if compatibility_profile {
            FormatProfile::Legacy
        } else {
            FormatProfile::Core
        };

        // Pixel buffers store tightly packed 8-bit rows.
        unsafe { gl.pixel_store_i32(glow::UNPACK_ALIGNMENT, 1) };

        Self {
            gl,
            version,
            capabilities,
            compatibility_profile,
            profile,
            live: HashSet::new(),
            mipmapped: HashSet::new(),
            swizzled: HashSet::new(),
            bindings: Vec::new(),
            active_stage: 0,
        }
    }

    fn query_compatibility_profile(gl: &glow::Context, version: GlVersion) -> bool {
        if version.is_es {
            return false;
        }
        if !version.at_least(3, 2) {
            return true;
        }
        let mask = unsafe { gl.get_parameter_i32(compat::CONTEXT_PROFILE_MASK) };
        mask & compat::CONTEXT_COMPATIBILITY_PROFILE_BIT != 0
    }

    /// The detected context version.
    pub fn version(&self) -> GlVersion {
        self.version
    }

    /// Returns `true` for legacy and compatibility-profile desktop contexts.
    pub fn is_compatibility_profile(&self) -> bool {
        self.compatibility_profile
    }

    /// The underlying `glow` context.
    pub fn gl(&self) -> &Rc<glow::Context> {
        &self.gl
    }

    fn bound(&self) -> Option<TextureHandle> {
        self.bindings.get(self.active_stage).copied().flatten()
    }

    fn native(handle: TextureHandle) -> glow::NativeTexture {
        glow::NativeTexture(handle.0)
    }

    fn tex_parameter(&self, parameter: u32, value: i32) {
        unsafe {
            self.gl.tex_parameter_i32(glow::TEXTURE_2D, parameter, value);
        }
    }

    fn swizzle(&self, mask: [u32; 4]) {
        let channels = [
            glow::TEXTURE_SWIZZLE_R,
            glow::TEXTURE_SWIZZLE_G,
            glow::TEXTURE_SWIZZLE_B,
            glow::TEXTURE_SWIZZLE_A,
        ];
        for (channel, source) in channels.into_iter().zip(mask) {
            self.tex_parameter(channel, source as i32);
        }
    }
}

impl TextureDevice for GlowTextureDevice {
    fn capabilities(&self) -> TextureCapabilities {
        self.capabilities
    }

    fn create_texture(&mut self) -> Result<TextureHandle, ResourceError> {
        let texture = unsafe { self.gl.create_texture() }.map_err(|e| {
            log::warn!("GlowTextureDevice: glGenTextures failed: {e}");
            ResourceError::BackendError(e)
        })?;
        let handle = TextureHandle(texture.0);
        self.live.insert(handle);
        log::trace!("GlowTextureDevice: Created texture {}", handle.0);
        Ok(handle)
    }

    fn destroy_texture(&mut self, handle: TextureHandle) {
        if !self.live.remove(&handle) {
            log::warn!("GlowTextureDevice: Destroying unknown texture {}", handle.0);
            return;
        }
        self.mipmapped.remove(&handle);
        self.swizzled.remove(&handle);
        for binding in &mut self.bindings {
            if *binding == Some(handle) {
                *binding = None;
            }
        }
        unsafe { self.gl.delete_texture(Self::native(handle)) };
    }

    fn bind_texture(&mut self, stage: usize, handle: Option<TextureHandle>) {
        if self.bindings.len() <= stage {
            self.bindings.resize(stage + 1, None);
        }
        let unit = u32::try_from(stage).unwrap_or(u32::MAX);
        unsafe {
            self.gl.active_texture(glow::TEXTURE0 + unit);
            self.gl.bind_texture(glow::TEXTURE_2D, handle.map(Self::native));
        }
        self.bindings[stage] = handle;
        self.active_stage = stage;
    }

    fn set_parameter(&mut self, parameter: TextureParameter) {
        match parameter {
            TextureParameter::Wrap(mode) => {
                let mode: u32 = mode.into_gl();
                self.tex_parameter(glow::TEXTURE_WRAP_S, mode as i32);
                self.tex_parameter(glow::TEXTURE_WRAP_T, mode as i32);
            }
            TextureParameter::MinFilter(filter) => {
                let filter: u32 = filter.into_gl();
                self.tex_parameter(glow::TEXTURE_MIN_FILTER, filter as i32);
            }
            TextureParameter::MagFilter(filter) => {
                let filter: u32 = filter.into_gl();
                self.tex_parameter(glow::TEXTURE_MAG_FILTER, filter as i32);
            }
            TextureParameter::GenerateMipmap(enabled) => {
                if self.compatibility_profile {
                    self.tex_parameter(compat::GENERATE_MIPMAP, i32::from(enabled));
                } else if let Some(handle) = self.bound() {
                    if enabled {
                        self.mipmapped.insert(handle);
                    } else {
                        self.mipmapped.remove(&handle);
                    }
                }
            }
            TextureParameter::MaxLevel(level) => {
                let level = i32::try_from(level).unwrap_or(i32::MAX);
                self.tex_parameter(glow::TEXTURE_MAX_LEVEL, level);
            }
            TextureParameter::MaxAnisotropy(level) => {
                if !self.capabilities.supports_anisotropy() {
                    log::debug!(
                        "GlowTextureDevice: Anisotropic filtering unavailable, ignoring {level}x"
                    );
                    return;
                }
                unsafe {
                    self.gl.tex_parameter_f32(
                        glow::TEXTURE_2D,
                        compat::TEXTURE_MAX_ANISOTROPY,
                        level,
                    )
                };
            }
        }
    }

    fn upload_image(&mut self, upload: &TextureUpload<'_>) {
        let width = i32::try_from(upload.size.width).unwrap_or(i32::MAX);
        let height = i32::try_from(upload.size.height).unwrap_or(i32::MAX);
        let gl_upload = resolve_upload(upload.internal_format, upload.transfer_format, self.profile);
        unsafe {
            self.gl.tex_image_2d(
                glow::TEXTURE_2D,
                0,
                gl_upload.internal_format as i32,
                width,
                height,
                0,
                gl_upload.transfer_format,
                glow::UNSIGNED_BYTE,
                glow::PixelUnpackData::Slice(Some(upload.data)),
            );
        }

        let Some(handle) = self.bound() else {
            return;
        };
        match gl_upload.swizzle {
            Some(mask) => {
                self.swizzle(mask);
                self.swizzled.insert(handle);
            }
            None if self.swizzled.remove(&handle) => self.swizzle(IDENTITY_SWIZZLE),
            None => {}
        }
        if self.mipmapped.contains(&handle) {
            unsafe { self.gl.generate_mipmap(glow::TEXTURE_2D) };
        }
    }
}

impl Drop for GlowTextureDevice {
    fn drop(&mut self) {
        if !self.live.is_empty() {
            log::warn!(
                "GlowTextureDevice: Dropped with {} live textures",
                self.live.len()
            );
        }
    }
}
