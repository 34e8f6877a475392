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

//! The render context shared by every texture object.

use super::api::{
    TextureCapabilities, TextureKey, TextureSettings, TextureStage, TextureStageRegistry,
};
use super::traits::TextureDevice;
use std::cell::RefCell;
use std::rc::Rc;

/// A render context shared between its owner and the textures created against it.
///
/// Textures keep a `Weak` reference, so the context is never kept alive by them.
pub type SharedRenderContext = Rc<RefCell<RenderContext>>;

/// Owns the texture device and the texture stage registry, and answers capability
/// queries for the texture objects.
#[derive(Debug)]
pub struct RenderContext {
    device: Box<dyn TextureDevice>,
    stages: TextureStageRegistry,
    capabilities: TextureCapabilities,
    max_anisotropy: f32,
}

impl RenderContext {
    /// Creates a context around `device`, narrowing its capabilities by `settings`.
    pub fn new(device: Box<dyn TextureDevice>, settings: &TextureSettings) -> Self {
        let mut capabilities = device.capabilities();
        if !settings.npot_textures {
            capabilities.npot_textures = false;
        }

        let unit_count = usize::try_from(capabilities.max_texture_units).unwrap_or(usize::MAX);
        let stage_count = settings.texture_stages.min(unit_count).max(1);
        let max_anisotropy = clamp_anisotropy(settings.max_anisotropy, &capabilities);

        log::info!(
            "RenderContext: {} texture stages, NPOT: {}, intensity: {}, BGR transfer: {}, sized formats: {}, anisotropy: {}x (device max {}x)",
            stage_count,
            capabilities.npot_textures,
            capabilities.intensity_textures,
            capabilities.bgr_texture_transfer,
            capabilities.sized_texture_formats,
            max_anisotropy,
            capabilities.max_anisotropy
        );

        Self {
            device,
            stages: TextureStageRegistry::new(stage_count),
            capabilities,
            max_anisotropy,
        }
    }

    /// Wraps the context for sharing with texture objects.
    pub fn into_shared(self) -> SharedRenderContext {
        Rc::new(RefCell::new(self))
    }

    /// The effective capabilities (device capabilities narrowed by the settings).
    pub fn capabilities(&self) -> &TextureCapabilities {
        &self.capabilities
    }

    /// Returns `true` if textures may keep non-power-of-two dimensions.
    pub fn has_texture_npot(&self) -> bool {
        self.capabilities.npot_textures
    }

    /// Returns `true` if intensity textures are supported natively.
    pub fn has_intensity_textures(&self) -> bool {
        self.capabilities.intensity_textures
    }

    /// Returns `true` if BGR-ordered pixel data can be transferred directly.
    pub fn has_bgr_texture_transfer(&self) -> bool {
        self.capabilities.bgr_texture_transfer
    }

    /// Returns `true` if sized internal formats are accepted.
    pub fn has_sized_texture_formats(&self) -> bool {
        self.capabilities.sized_texture_formats
    }

    /// The anisotropy level currently applied to mipmapped textures.
    pub fn max_anisotropy(&self) -> f32 {
        self.max_anisotropy
    }

    /// Changes the anisotropy level, clamped to `[1, device max]`, and returns the
    /// level actually stored.
    ///
    /// Existing textures keep their old level until
    /// [`Texture2D::update_max_anisotropy`](crate::renderer::Texture2D::update_max_anisotropy)
    /// is called on them.
    pub fn set_max_anisotropy(&mut self, level: f32) -> f32 {
        self.max_anisotropy = clamp_anisotropy(level, &self.capabilities);
        log::debug!("RenderContext: Max anisotropy set to {}x", self.max_anisotropy);
        self.max_anisotropy
    }

    /// Requests `texture` (or nothing) on `stage`.
    ///
    /// # Panics
    /// Panics if `stage` is out of range.
    pub fn set_texture(&mut self, stage: usize, texture: Option<TextureKey>) {
        self.stages[stage].set_bound_texture(texture);
    }

    /// Returns the stage at `index`.
    ///
    /// # Panics
    /// Panics if `index` is out of range.
    pub fn stage(&self, index: usize) -> &TextureStage {
        &self.stages[index]
    }

    /// Returns the stage at `index` mutably.
    ///
    /// # Panics
    /// Panics if `index` is out of range.
    pub fn stage_mut(&mut self, index: usize) -> &mut TextureStage {
        &mut self.stages[index]
    }

    /// The texture stage registry.
    pub fn stages(&self) -> &TextureStageRegistry {
        &self.stages
    }

    /// The texture stage registry, mutably.
    pub fn stages_mut(&mut self) -> &mut TextureStageRegistry {
        &mut self.stages
    }

    /// The number of texture stages.
    pub fn stage_count(&self) -> usize {
        self.stages.len()
    }

    /// The backend device.
    pub fn device_mut(&mut self) -> &mut dyn TextureDevice {
        self.device.as_mut()
    }
}

fn clamp_anisotropy(level: f32, capabilities: &TextureCapabilities) -> f32 {
    let max = capabilities.max_anisotropy.max(1.0);
    if level.is_nan() {
        return 1.0;
    }
    level.clamp(1.0, max)
}
