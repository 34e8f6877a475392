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

//! OpenGL version parsing.

use glow::HasContext;

/// The version of the current GL context.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GlVersion {
    /// Major version number.
    pub major: u32,
    /// Minor version number.
    pub minor: u32,
    /// `true` for OpenGL ES and WebGL contexts.
    pub is_es: bool,
}

impl GlVersion {
    /// Reads the version of `gl`.
    pub fn read(gl: &glow::Context) -> Self {
        let version = unsafe { gl.get_parameter_string(glow::VERSION) };
        Self::parse(&version)
    }

    /// Parses a `GL_VERSION` string such as `"4.6.0 NVIDIA 550.54"` or
    /// `"OpenGL ES 3.2 Mesa 24.0"`.
    ///
    /// Unparseable strings fall back to the oldest version of the detected flavour.
    pub fn parse(version: &str) -> Self {
        let is_es = version.contains("OpenGL ES") || version.contains("WebGL");
        let (major, minor) = if version.contains("WebGL 2.0") {
            (3, 0)
        } else if version.contains("WebGL 1.0") {
            (2, 0)
        } else {
            version
                .split_whitespace()
                .find_map(parse_number_pair)
                .unwrap_or(if is_es { (2, 0) } else { (1, 1) })
        };
        Self {
            major,
            minor,
            is_es,
        }
    }

    /// Returns `true` if this version is at least `major.minor`.
    pub fn at_least(self, major: u32, minor: u32) -> bool {
        (self.major, self.minor) >= (major, minor)
    }
}

fn parse_number_pair(word: &str) -> Option<(u32, u32)> {
    let mut parts = word.split('.');
    let major = parts.next()?.parse().ok()?;
    let minor = parts.next()?.parse().ok()?;
    Some((major, minor))
}
