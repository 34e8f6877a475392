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

use super::version::GlVersion;
use std::collections::HashSet;
use strata_core::renderer::TextureCapabilities;

const NPOT_EXTENSIONS: &[&str] = &["GL_ARB_texture_non_power_of_two", "GL_OES_texture_npot"];
const ANISOTROPY_EXTENSIONS: &[&str] = &[
    "GL_EXT_texture_filter_anisotropic",
    "GL_ARB_texture_filter_anisotropic",
];

/// Returns `true` if the context exposes anisotropic filtering, either through an
/// extension or as core GL 4.6 functionality.
pub fn has_anisotropic_filtering(version: GlVersion, extensions: &HashSet<String>) -> bool {
    ANISOTROPY_EXTENSIONS
        .iter()
        .any(|name| extensions.contains(*name))
        || (!version.is_es && version.at_least(4, 6))
}

/// Derives texture capabilities from what a GL context reports.
///
/// `max_anisotropy` is the queried `GL_MAX_TEXTURE_MAX_ANISOTROPY`; it is ignored
/// unless anisotropic filtering is available.
pub fn detect_capabilities(
    version: GlVersion,
    extensions: &HashSet<String>,
    compatibility_profile: bool,
    max_anisotropy: f32,
    texture_units: u32,
) -> TextureCapabilities {
    let desktop = !version.is_es;

    let npot_core = if desktop {
        version.at_least(2, 0)
    } else {
        version.at_least(3, 0)
    };
    let npot_textures = npot_core || NPOT_EXTENSIONS.iter().any(|name| extensions.contains(*name));

    let max_anisotropy = if has_anisotropic_filtering(version, extensions)
        && max_anisotropy.is_finite()
    {
        max_anisotropy.max(1.0)
    } else {
        1.0
    };

    TextureCapabilities {
        npot_textures,
        intensity_textures: desktop && compatibility_profile,
        bgr_texture_transfer: desktop,
        sized_texture_formats: desktop || version.at_least(3, 0),
        max_anisotropy,
        max_texture_units: texture_units.max(1),
    }
}
