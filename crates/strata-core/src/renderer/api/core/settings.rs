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

//! Defines user-configurable settings for the texture subsystem.

use serde::{Deserialize, Serialize};

/// A collection of user-configurable settings that influence texture creation and sampling.
///
/// Missing fields fall back to their defaults when deserialised.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TextureSettings {
    /// The requested anisotropic filtering level, clamped to what the device supports.
    pub max_anisotropy: f32,
    /// The number of texture stages to track, clamped to the device's texture units.
    pub texture_stages: usize,
    /// If `false`, non-power-of-two textures are padded even when the device could
    /// sample them directly.
    pub npot_textures: bool,
}

impl Default for TextureSettings {
    fn default() -> Self {
        Self {
            max_anisotropy: 16.0,
            texture_stages: 8,
            npot_textures: true,
        }
    }
}

impl TextureSettings {
    /// Parses settings from a JSON document.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_settings_defaults_fill_missing_fields() {
        let settings = TextureSettings::from_json(r#"{ "npot_textures": false }"#).unwrap();
        assert!(!settings.npot_textures);
        assert_eq!(settings.texture_stages, 8);
        assert_eq!(settings.max_anisotropy, 16.0);
    }

    #[test]
    fn test_settings_rejects_malformed_json() {
        assert!(TextureSettings::from_json("{ max_anisotropy: ").is_err());
    }
}
