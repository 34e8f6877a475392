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

//! The 2D texture object.
//!
//! A [`Texture2D`] owns exactly one backend texture handle. It remembers the sampler
//! state it last programmed so that [`Texture2D::apply`] only talks to the backend
//! when the effective state changes, and it scrubs itself out of the texture stage
//! registry when destroyed.
//!
//! Lifecycle: [`new`](Texture2D::new) (no handle) -> [`create`](Texture2D::create)
//! -> [`upload`](Texture2D::upload) (any number of times) -> [`apply`](Texture2D::apply)
//! -> [`destroy`](Texture2D::destroy). Dropping a texture destroys it.

use super::api::{
    AddressMode, FilterMode, FormatDescriptor, TextureFilter, TextureFlags, TextureHandle,
    TextureKey, TextureParameter, TextureUpload,
};
use super::context::{RenderContext, SharedRenderContext};
use super::error::ResourceError;
use crate::image::{PixelBuffer, PixelFormat};
use crate::math::Extent2D;
use std::cell::RefCell;
use std::rc::{Rc, Weak};

/// A 2D texture resource backed by a [`TextureDevice`](super::TextureDevice) handle.
#[derive(Debug)]
pub struct Texture2D {
    context: Weak<RefCell<RenderContext>>,
    key: TextureKey,
    handle: Option<TextureHandle>,
    size: Extent2D,
    stored_size: Extent2D,
    is_padded: bool,
    format: PixelFormat,
    flags: TextureFlags,
    wrap_mode: AddressMode,
    min_filter: FilterMode,
    mag_filter: FilterMode,
}

impl Texture2D {
    /// Creates a texture description without allocating a backend handle.
    pub fn new(
        context: &SharedRenderContext,
        size: Extent2D,
        format: PixelFormat,
        flags: TextureFlags,
    ) -> Self {
        Self {
            context: Rc::downgrade(context),
            key: TextureKey::next(),
            handle: None,
            size,
            stored_size: size,
            is_padded: false,
            format,
            flags,
            wrap_mode: AddressMode::Repeat,
            min_filter: FilterMode::Linear,
            mag_filter: FilterMode::Nearest,
        }
    }

    /// Creates and uploads a texture sized after `image`.
    ///
    /// `image` may be transformed by the upload, see [`Texture2D::upload`].
    pub fn from_pixel_buffer(
        context: &SharedRenderContext,
        image: &mut PixelBuffer,
        flags: TextureFlags,
    ) -> Result<Self, ResourceError> {
        let mut texture = Self::new(context, image.size(), image.format(), flags);
        texture.create()?;
        texture.upload(image);
        Ok(texture)
    }

    fn context(&self) -> SharedRenderContext {
        match self.context.upgrade() {
            Some(context) => context,
            None => panic!(
                "Texture2D {:?} used after its render context was dropped",
                self.key
            ),
        }
    }

    /// Allocates the backend handle and computes the stored (padded) size.
    ///
    /// The cached sampler state is reset to the backend defaults: repeat wrapping,
    /// nearest minification and linear magnification. Fails with
    /// [`ResourceError::TooLarge`] before allocating anything when an axis must be
    /// padded past the largest `u32` power of two.
    ///
    /// # Panics
    /// Panics if the texture already holds a live handle, which would leak it.
    pub fn create(&mut self) -> Result<(), ResourceError> {
        assert!(
            self.handle.is_none(),
            "leaking texture: Texture2D {:?} created over live handle {:?}",
            self.key,
            self.handle
        );

        let context = self.context();
        let mut ctx = context.borrow_mut();
        let stored_size = if ctx.has_texture_npot() {
            self.size
        } else {
            self.size
                .checked_next_power_of_two()
                .ok_or(ResourceError::TooLarge(self.size))?
        };

        let handle = ctx.device_mut().create_texture()?;
        self.handle = Some(handle);

        self.wrap_mode = AddressMode::Repeat;
        self.min_filter = FilterMode::Nearest;
        self.mag_filter = FilterMode::Linear;

        self.stored_size = stored_size;
        self.is_padded = self.stored_size != self.size;

        log::debug!(
            "Texture2D: Created {:?} as {:?}, size {}x{}, stored {}x{}",
            self.key,
            handle,
            self.size.width,
            self.size.height,
            self.stored_size.width,
            self.stored_size.height
        );
        Ok(())
    }

    /// Transfers `image` into the texture.
    ///
    /// When the backend lacks intensity textures or BGR transfers, `image` is
    /// converted **in place** (`L8` intensity -> `L8A8`, BGR(A) -> RGB(A)) and the
    /// texture format follows it. Do not rely on the buffer's pre-upload contents
    /// afterwards. Padded textures lose [`TextureFlags::HAS_MIPMAPS`] and receive an
    /// edge-clamped copy of the image.
    ///
    /// # Panics
    /// Panics if the texture has no live handle, if `image` does not match the
    /// texture's logical size, if an intensity texture must be expanded on the CPU
    /// but `image` is not `L8`, or if its format has no backend descriptor
    /// (block-compressed formats).
    pub fn upload(&mut self, image: &mut PixelBuffer) {
        let Some(handle) = self.handle else {
            panic!("Texture2D {:?} uploaded without a live handle", self.key);
        };
        assert_eq!(
            image.size(),
            self.size,
            "Texture2D {:?}: pixel buffer size does not match the texture size",
            self.key
        );

        let context = self.context();
        let mut ctx = context.borrow_mut();
        ctx.device_mut().bind_texture(0, Some(handle));
        ctx.stage_mut(0).set_current_texture(Some(self.key));

        self.format = image.format();

        if self.flags.contains(TextureFlags::INTENSITY) && !ctx.has_intensity_textures() {
            assert!(
                image.expand_intensity(),
                "Texture2D {:?}: intensity fallback needs an L8 image, got {:?}",
                self.key,
                image.format()
            );
            self.format = image.format();
            self.flags.remove(TextureFlags::INTENSITY);
            log::debug!("Texture2D: Expanded intensity of {:?} to L8A8", self.key);
        }

        if self.format.is_bgr() && !ctx.has_bgr_texture_transfer() && image.swap_red_blue() {
            self.format = image.format();
            log::debug!(
                "Texture2D: Converted {:?} to {:?} for transfer",
                self.key,
                self.format
            );
        }

        let intensity = self.flags.contains(TextureFlags::INTENSITY);
        let Some(descriptor) = FormatDescriptor::resolve(self.format, intensity) else {
            panic!(
                "Texture2D {:?}: unsupported pixel format {:?}",
                self.key, self.format
            );
        };
        let internal_format = descriptor.internal(ctx.has_sized_texture_formats());

        if self.is_padded {
            self.flags.remove(TextureFlags::HAS_MIPMAPS);
        }

        if self.has_mipmaps() {
            let anisotropy = ctx.max_anisotropy();
            let device = ctx.device_mut();
            device.set_parameter(TextureParameter::GenerateMipmap(true));
            if anisotropy > 1.0 {
                device.set_parameter(TextureParameter::MaxAnisotropy(anisotropy));
            }
        } else {
            ctx.device_mut().set_parameter(TextureParameter::MaxLevel(0));
        }

        if self.is_padded {
            let extended = match image.extended_to(self.stored_size) {
                Ok(extended) => extended,
                Err(err) => panic!("Texture2D {:?}: border extension failed: {err}", self.key),
            };
            ctx.device_mut().upload_image(&TextureUpload {
                internal_format,
                transfer_format: descriptor.transfer,
                size: self.stored_size,
                data: extended.data(),
            });
        } else {
            ctx.device_mut().upload_image(&TextureUpload {
                internal_format,
                transfer_format: descriptor.transfer,
                size: self.size,
                data: image.data(),
            });
        }

        log::debug!(
            "Texture2D: Uploaded {:?} as {:?}/{:?}, mipmaps: {}",
            self.key,
            internal_format,
            descriptor.transfer,
            self.has_mipmaps()
        );
    }

    /// Releases the backend handle, if any, and clears every texture stage reference
    /// to this texture.
    pub fn destroy(&mut self) {
        let Some(context) = self.context.upgrade() else {
            if let Some(handle) = self.handle.take() {
                log::debug!(
                    "Texture2D: Render context gone, forgetting {handle:?} of {:?}",
                    self.key
                );
            }
            return;
        };
        let mut ctx = context.borrow_mut();
        self.release(&mut ctx);
    }

    fn release(&mut self, ctx: &mut RenderContext) {
        if let Some(handle) = self.handle.take() {
            ctx.device_mut().destroy_texture(handle);
            log::debug!("Texture2D: Destroyed {:?} ({handle:?})", self.key);
        }
        ctx.stages_mut().release(self.key);
    }

    /// Reconciles the backend sampler state with the state requested on `stage`.
    ///
    /// Padded textures are always clamped to the edge. A parameter is only sent to
    /// the backend when its effective value differs from the cached one, so applying
    /// twice with the same request costs nothing the second time.
    ///
    /// # Panics
    /// Panics if `stage` is not bound to this texture or the texture has no live handle.
    pub fn apply(&mut self, stage: usize) {
        let context = self.context();
        let mut ctx = context.borrow_mut();

        let requested = ctx.stage(stage);
        assert_eq!(
            requested.bound_texture(),
            Some(self.key),
            "Texture2D {:?} applied to stage {stage}, which is not bound to it",
            self.key
        );
        let Some(handle) = self.handle else {
            panic!("Texture2D {:?} applied without a live handle", self.key);
        };

        let wrap_mode = if self.is_padded {
            AddressMode::ClampToEdge
        } else {
            requested.wrap_mode()
        };
        let min_filter = requested.min_filter();
        let mag_filter = requested.mag_filter();
        let is_current = requested.current_texture() == Some(self.key);

        let dirty = wrap_mode != self.wrap_mode
            || min_filter != self.min_filter
            || mag_filter != self.mag_filter;
        if !is_current || dirty {
            ctx.device_mut().bind_texture(stage, Some(handle));
            ctx.stage_mut(stage).set_current_texture(Some(self.key));
        }

        let device = ctx.device_mut();
        if wrap_mode != self.wrap_mode {
            self.wrap_mode = wrap_mode;
            device.set_parameter(TextureParameter::Wrap(wrap_mode));
        }
        if min_filter != self.min_filter {
            self.min_filter = min_filter;
            let filter = TextureFilter::minification(min_filter, self.has_mipmaps());
            device.set_parameter(TextureParameter::MinFilter(filter));
        }
        if mag_filter != self.mag_filter {
            self.mag_filter = mag_filter;
            device.set_parameter(TextureParameter::MagFilter(TextureFilter::magnification(
                mag_filter,
            )));
        }
    }

    /// Re-applies the context's current anisotropy level to a mipmapped texture.
    ///
    /// Does nothing for textures without mipmaps or without a live handle.
    pub fn update_max_anisotropy(&mut self) {
        if !self.has_mipmaps() {
            return;
        }
        let Some(handle) = self.handle else {
            return;
        };

        let context = self.context();
        let mut ctx = context.borrow_mut();
        let level = ctx.max_anisotropy();
        ctx.device_mut().bind_texture(0, Some(handle));
        ctx.stage_mut(0).set_current_texture(Some(self.key));
        ctx.device_mut()
            .set_parameter(TextureParameter::MaxAnisotropy(level));
    }

    /// Recreates the texture from `image`: destroy, create, upload.
    ///
    /// The logical size and format follow the new image. Used to restore textures
    /// after the backend lost its resources.
    pub fn reload(&mut self, image: &mut PixelBuffer) -> Result<(), ResourceError> {
        self.destroy();
        self.size = image.size();
        self.stored_size = self.size;
        self.is_padded = false;
        self.format = image.format();
        self.create()?;
        self.upload(image);
        Ok(())
    }

    /// The identity stages use to refer to this texture.
    pub fn key(&self) -> TextureKey {
        self.key
    }

    /// The backend handle, if created.
    pub fn handle(&self) -> Option<TextureHandle> {
        self.handle
    }

    /// Returns `true` if the texture holds a live backend handle.
    pub fn is_created(&self) -> bool {
        self.handle.is_some()
    }

    /// The logical size requested by the caller.
    pub fn size(&self) -> Extent2D {
        self.size
    }

    /// The allocated size, padded to powers of two when the backend requires it.
    pub fn stored_size(&self) -> Extent2D {
        self.stored_size
    }

    /// Returns `true` if the stored size differs from the logical size.
    pub fn is_padded(&self) -> bool {
        self.is_padded
    }

    /// The pixel format of the last upload (after any conversion).
    pub fn format(&self) -> PixelFormat {
        self.format
    }

    /// The current feature flags.
    pub fn flags(&self) -> TextureFlags {
        self.flags
    }

    /// Replaces the feature flags. Takes effect on the next upload.
    pub fn set_flags(&mut self, flags: TextureFlags) {
        self.flags = flags;
    }

    /// Returns `true` if the texture has (or will get) a generated mip chain.
    pub fn has_mipmaps(&self) -> bool {
        self.flags.contains(TextureFlags::HAS_MIPMAPS)
    }

    /// The cached wrap mode.
    pub fn wrap_mode(&self) -> AddressMode {
        self.wrap_mode
    }

    /// The cached minification filter.
    pub fn min_filter(&self) -> FilterMode {
        self.min_filter
    }

    /// The cached magnification filter.
    pub fn mag_filter(&self) -> FilterMode {
        self.mag_filter
    }
}

impl Drop for Texture2D {
    fn drop(&mut self) {
        let Some(context) = self.context.upgrade() else {
            return;
        };
        let borrowed = context.try_borrow_mut();
        match borrowed {
            Ok(mut ctx) => self.release(&mut ctx),
            // Unwinding already; a second panic would abort.
            Err(_) if std::thread::panicking() => log::error!(
                "Texture2D {:?} dropped while its render context is borrowed; leaking {:?}",
                self.key,
                self.handle
            ),
            Err(_) => panic!(
                "Texture2D {:?} dropped while its render context is borrowed",
                self.key
            ),
        };
    }
}
