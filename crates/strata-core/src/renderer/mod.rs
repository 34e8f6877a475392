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

//! Provides the backend-agnostic texture contracts and the texture object itself.
//!
//! This module defines the "common language" of the texture subsystem: the
//! [`TextureDevice`] trait a graphics backend implements, the data structures that
//! travel through it, the [`TextureStageRegistry`] of binding slots, and the
//! [`Texture2D`] resource wrapper built on top of them.
//!
//! The 'what' lives here, while the 'how' is handled by a concrete backend in the
//! `strata-infra` crate (an OpenGL device) or by the [`HeadlessDevice`] defined
//! below.

pub mod api;
pub mod context;
pub mod error;
pub mod headless;
pub mod texture2d;
pub mod texture_cache;
pub mod traits;

pub use self::api::*;
pub use self::context::{RenderContext, SharedRenderContext};
pub use self::error::ResourceError;
pub use self::headless::{CallLog, DeviceCall, HeadlessDevice};
pub use self::texture2d::Texture2D;
pub use self::texture_cache::TextureCache;
pub use self::traits::TextureDevice;
