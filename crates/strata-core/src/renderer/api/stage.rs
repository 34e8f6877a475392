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

//! The texture stage registry: binding slots textures are attached to for rendering.

use super::texture::{AddressMode, FilterMode, TextureKey};
use std::ops::{Index, IndexMut};

/// One binding slot.
///
/// `bound` is the texture the renderer wants on this stage; `current` is the texture
/// the backend actually has bound on it. Both are weak references by key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextureStage {
    index: usize,
    bound: Option<TextureKey>,
    current: Option<TextureKey>,
    wrap_mode: AddressMode,
    min_filter: FilterMode,
    mag_filter: FilterMode,
}

impl TextureStage {
    /// Creates an empty stage with repeat wrapping and linear filtering.
    pub fn new(index: usize) -> Self {
        Self {
            index,
            bound: None,
            current: None,
            wrap_mode: AddressMode::Repeat,
            min_filter: FilterMode::Linear,
            mag_filter: FilterMode::Linear,
        }
    }

    /// The position of this stage in the registry.
    pub fn index(&self) -> usize {
        self.index
    }

    /// The texture requested on this stage.
    pub fn bound_texture(&self) -> Option<TextureKey> {
        self.bound
    }

    /// Sets the texture requested on this stage.
    pub fn set_bound_texture(&mut self, texture: Option<TextureKey>) {
        self.bound = texture;
    }

    /// The texture the backend currently has bound on this stage.
    pub fn current_texture(&self) -> Option<TextureKey> {
        self.current
    }

    /// Records which texture the backend has bound on this stage.
    pub fn set_current_texture(&mut self, texture: Option<TextureKey>) {
        self.current = texture;
    }

    /// The requested wrap mode.
    pub fn wrap_mode(&self) -> AddressMode {
        self.wrap_mode
    }

    /// Sets the requested wrap mode.
    pub fn set_wrap_mode(&mut self, mode: AddressMode) {
        self.wrap_mode = mode;
    }

    /// The requested minification filter.
    pub fn min_filter(&self) -> FilterMode {
        self.min_filter
    }

    /// Sets the requested minification filter.
    pub fn set_min_filter(&mut self, filter: FilterMode) {
        self.min_filter = filter;
    }

    /// The requested magnification filter.
    pub fn mag_filter(&self) -> FilterMode {
        self.mag_filter
    }

    /// Sets the requested magnification filter.
    pub fn set_mag_filter(&mut self, filter: FilterMode) {
        self.mag_filter = filter;
    }

    /// Returns `true` if this stage refers to `texture` as bound or current.
    pub fn references(&self, texture: TextureKey) -> bool {
        self.bound == Some(texture) || self.current == Some(texture)
    }
}

/// A fixed-size table of [`TextureStage`]s.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextureStageRegistry {
    stages: Vec<TextureStage>,
}

impl TextureStageRegistry {
    /// Creates `count` empty stages.
    pub fn new(count: usize) -> Self {
        Self {
            stages: (0..count).map(TextureStage::new).collect(),
        }
    }

    /// The number of stages.
    pub fn len(&self) -> usize {
        self.stages.len()
    }

    /// Returns `true` if the registry has no stages.
    pub fn is_empty(&self) -> bool {
        self.stages.is_empty()
    }

    /// Returns the stage at `index`, if any.
    pub fn get(&self, index: usize) -> Option<&TextureStage> {
        self.stages.get(index)
    }

    /// Returns the stage at `index` mutably, if any.
    pub fn get_mut(&mut self, index: usize) -> Option<&mut TextureStage> {
        self.stages.get_mut(index)
    }

    /// Iterates over the stages in index order.
    pub fn iter(&self) -> impl Iterator<Item = &TextureStage> {
        self.stages.iter()
    }

    /// Iterates mutably over the stages in index order.
    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut TextureStage> {
        self.stages.iter_mut()
    }

    /// Clears every bound and current reference to `texture`.
    ///
    /// Returns the number of references cleared.
    pub fn release(&mut self, texture: TextureKey) -> usize {
        let mut cleared = 0;
        for stage in &mut self.stages {
            if stage.bound == Some(texture) {
                stage.bound = None;
                cleared += 1;
            }
            if stage.current == Some(texture) {
                stage.current = None;
                cleared += 1;
            }
        }
        cleared
    }

    /// Returns `true` if any stage refers to `texture`.
    pub fn references(&self, texture: TextureKey) -> bool {
        self.stages.iter().any(|stage| stage.references(texture))
    }
}

impl Index<usize> for TextureStageRegistry {
    type Output = TextureStage;

    fn index(&self, index: usize) -> &Self::Output {
        &self.stages[index]
    }
}

impl IndexMut<usize> for TextureStageRegistry {
    fn index_mut(&mut self, index: usize) -> &mut Self::Output {
        &mut self.stages[index]
    }
}
