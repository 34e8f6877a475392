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

//! A named collection of textures sharing one render context.

use super::api::TextureFlags;
use super::context::SharedRenderContext;
use super::texture2d::Texture2D;
use crate::image::PixelBuffer;
use anyhow::{Context, Result};
use std::collections::HashMap;

/// Owns textures by name and fans global changes out to all of them.
#[derive(Debug)]
pub struct TextureCache {
    // Declared first so textures are destroyed while the context is still alive.
    textures: HashMap<String, Texture2D>,
    context: SharedRenderContext,
}

impl TextureCache {
    /// Creates an empty cache for `context`.
    pub fn new(context: &SharedRenderContext) -> Self {
        Self {
            textures: HashMap::new(),
            context: context.clone(),
        }
    }

    /// Creates a texture from `image` and stores it under `name`, replacing (and
    /// destroying) any previous texture with that name.
    ///
    /// `image` may be transformed by the upload.
    pub fn insert(
        &mut self,
        name: impl Into<String>,
        image: &mut PixelBuffer,
        flags: TextureFlags,
    ) -> Result<&mut Texture2D> {
        let name = name.into();
        let texture = Texture2D::from_pixel_buffer(&self.context, image, flags)
            .with_context(|| format!("Failed to create texture '{name}'"))?;
        log::debug!(
            "TextureCache: Stored '{name}' ({}x{})",
            texture.size().width,
            texture.size().height
        );

        // The replaced texture, if any, is dropped (and destroyed) here.
        self.textures.insert(name.clone(), texture);
        self.textures
            .get_mut(&name)
            .context("Texture vanished right after insertion")
    }

    /// Decodes `bytes` and stores the result under `name`.
    pub fn load(
        &mut self,
        name: impl Into<String>,
        bytes: &[u8],
        flags: TextureFlags,
    ) -> Result<&mut Texture2D> {
        let name = name.into();
        let mut image =
            PixelBuffer::decode(bytes).with_context(|| format!("Failed to load texture '{name}'"))?;
        self.insert(name, &mut image, flags)
    }

    /// Returns the texture stored under `name`.
    pub fn get(&self, name: &str) -> Option<&Texture2D> {
        self.textures.get(name)
    }

    /// Returns the texture stored under `name` mutably.
    pub fn get_mut(&mut self, name: &str) -> Option<&mut Texture2D> {
        self.textures.get_mut(name)
    }

    /// Removes the texture stored under `name` and hands it back to the caller.
    pub fn remove(&mut self, name: &str) -> Option<Texture2D> {
        self.textures.remove(name)
    }

    /// Returns `true` if a texture is stored under `name`.
    pub fn contains(&self, name: &str) -> bool {
        self.textures.contains_key(name)
    }

    /// The number of stored textures.
    pub fn len(&self) -> usize {
        self.textures.len()
    }

    /// Returns `true` if the cache holds no texture.
    pub fn is_empty(&self) -> bool {
        self.textures.is_empty()
    }

    /// The names of the stored textures, in no particular order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.textures.keys().map(String::as_str)
    }

    /// Changes the context's anisotropy level and re-applies it to every mipmapped
    /// texture. Returns the level actually applied.
    pub fn set_max_anisotropy(&mut self, level: f32) -> f32 {
        let applied = self.context.borrow_mut().set_max_anisotropy(level);
        for texture in self.textures.values_mut() {
            texture.update_max_anisotropy();
        }
        applied
    }

    /// Destroys every stored texture.
    pub fn clear(&mut self) {
        self.textures.clear();
    }
}
