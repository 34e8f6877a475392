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

use crate::renderer::api::*;
use crate::renderer::error::ResourceError;
use std::fmt::Debug;

/// The backend contract behind every [`Texture2D`](crate::renderer::Texture2D).
///
/// All calls happen on the thread owning the graphics context. Parameter and upload
/// calls act on the texture bound on the most recently bound stage, mirroring
/// fixed-function APIs.
pub trait TextureDevice: Debug {
    /// Reports what this backend can do.
    /// ## Returns
    /// The capabilities as detected when the device was created.
    fn capabilities(&self) -> TextureCapabilities;

    /// Allocates a new texture handle.
    /// ## Returns
    /// A `Result` containing the handle of the created texture or an error if the creation fails.
    /// ## Errors
    /// * `ResourceError::BackendError` - If the backend could not allocate a texture.
    fn create_texture(&mut self) -> Result<TextureHandle, ResourceError>;

    /// Releases a texture handle.
    /// ## Arguments
    /// * `handle` - The handle to release. It must not be used afterwards.
    fn destroy_texture(&mut self, handle: TextureHandle);

    /// Makes `stage` the active stage and binds `handle` (or nothing) on it.
    /// ## Arguments
    /// * `stage` - The index of the texture stage.
    /// * `handle` - The texture to bind, or `None` to unbind.
    fn bind_texture(&mut self, stage: usize, handle: Option<TextureHandle>);

    /// Applies a sampler or mip parameter to the currently bound texture.
    fn set_parameter(&mut self, parameter: TextureParameter);

    /// Transfers a level-0 image into the currently bound texture.
    fn upload_image(&mut self, upload: &TextureUpload<'_>);
}
