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

//! # Strata Core
//!
//! Foundational crate containing the texture object, pixel buffers, texture stage
//! bookkeeping, and the backend contracts a graphics device has to fulfil.
//!
//! The concrete OpenGL device lives in `strata-infra`; everything here is
//! backend-agnostic and can be driven by the [`HeadlessDevice`](renderer::HeadlessDevice).

#![warn(missing_docs)]

pub mod image;
pub mod math;
pub mod renderer;

pub use self::image::{ImageError, PixelBuffer, PixelFormat};
pub use self::renderer::{RenderContext, SharedRenderContext, Texture2D};
