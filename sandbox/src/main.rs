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

// Strata Sandbox
// Drives a handful of textures through a legacy-looking headless device.

use anyhow::{Context, Result};
use strata_core::renderer::{
    AddressMode, CallLog, DeviceCall, FilterMode, HeadlessDevice, TextureCache,
    TextureCapabilities, TextureFlags, TextureSettings,
};
use strata_core::{PixelBuffer, PixelFormat, RenderContext, SharedRenderContext};

struct Sandbox {
    context: SharedRenderContext,
    textures: TextureCache,
    log: CallLog,
}

impl Sandbox {
    fn new(settings: &TextureSettings) -> Self {
        // An old fixed-function card: no NPOT, no intensity, no BGR transfers.
        let device = HeadlessDevice::new(TextureCapabilities {
            npot_textures: false,
            intensity_textures: false,
            bgr_texture_transfer: false,
            sized_texture_formats: true,
            max_anisotropy: 8.0,
            max_texture_units: 4,
        });
        let log = device.call_log();
        let context = RenderContext::new(Box::new(device), settings).into_shared();
        let textures = TextureCache::new(&context);
        Self {
            context,
            textures,
            log,
        }
    }

    fn setup(&mut self) -> Result<()> {
        let mut checker = checkerboard(100, 60);
        self.textures
            .insert("checker", &mut checker, TextureFlags::HAS_MIPMAPS)?;

        let mut glow = radial_intensity(64);
        self.textures
            .insert("glow", &mut glow, TextureFlags::INTENSITY | TextureFlags::HAS_MIPMAPS)?;

        for name in self.textures.names() {
            if let Some(texture) = self.textures.get(name) {
                log::info!(
                    "Sandbox: '{name}' {}x{} stored as {}x{} {:?}, flags {:?}",
                    texture.size().width,
                    texture.size().height,
                    texture.stored_size().width,
                    texture.stored_size().height,
                    texture.format(),
                    texture.flags()
                );
            }
        }
        Ok(())
    }

    fn run(&mut self) -> Result<()> {
        for (stage, name) in ["checker", "glow"].into_iter().enumerate() {
            let texture = self
                .textures
                .get_mut(name)
                .with_context(|| format!("texture '{name}' missing"))?;
            {
                let mut ctx = self.context.borrow_mut();
                ctx.set_texture(stage, Some(texture.key()));
                let requested = ctx.stage_mut(stage);
                requested.set_wrap_mode(AddressMode::Repeat);
                requested.set_min_filter(FilterMode::Linear);
            }
            self.log.clear();
            texture.apply(stage);
            log::info!(
                "Sandbox: First apply of '{name}' on stage {stage}: {} device calls",
                self.log.len()
            );

            self.log.clear();
            texture.apply(stage);
            log::info!(
                "Sandbox: Second apply of '{name}': {} device calls",
                self.log.len()
            );
        }

        self.log.clear();
        let level = self.textures.set_max_anisotropy(4.0);
        log::info!(
            "Sandbox: Anisotropy set to {level}x, {} parameters re-applied",
            self.log.parameters().len()
        );

        self.textures.remove("checker");
        let ctx = self.context.borrow();
        for stage in ctx.stages().iter() {
            log::debug!(
                "Sandbox: Stage {} bound {:?}, current {:?}",
                stage.index(),
                stage.bound_texture(),
                stage.current_texture()
            );
        }
        Ok(())
    }

    fn shutdown(&mut self) {
        self.textures.clear();
        let destroyed = self
            .log
            .calls()
            .iter()
            .filter(|call| matches!(call, DeviceCall::DestroyTexture(_)))
            .count();
        log::info!(
            "Sandbox: Shut down, {} textures destroyed since last clear, {} live",
            destroyed,
            self.log.live_textures()
        );
    }
}

fn checkerboard(width: u32, height: u32) -> PixelBuffer {
    let mut image = PixelBuffer::new(width, height, PixelFormat::B8G8R8A8);
    let row = width as usize * 4;
    for (y, line) in image.data_mut().chunks_exact_mut(row).enumerate() {
        for (x, px) in line.chunks_exact_mut(4).enumerate() {
            let light = (x / 10 + y / 10) % 2 == 0;
            let shade = if light { 220 } else { 40 };
            px.copy_from_slice(&[shade, shade / 2, 255 - shade, 255]);
        }
    }
    image
}

fn radial_intensity(size: u32) -> PixelBuffer {
    let mut image = PixelBuffer::new(size, size, PixelFormat::L8);
    let center = size as f32 / 2.0;
    for (i, px) in image.data_mut().iter_mut().enumerate() {
        let x = (i as u32 % size) as f32 + 0.5 - center;
        let y = (i as u32 / size) as f32 + 0.5 - center;
        let falloff = 1.0 - ((x * x + y * y).sqrt() / center).min(1.0);
        *px = (falloff * 255.0) as u8;
    }
    image
}

fn load_settings() -> Result<TextureSettings> {
    let Some(path) = std::env::args().nth(1) else {
        return Ok(TextureSettings::default());
    };
    let json = std::fs::read_to_string(&path)
        .with_context(|| format!("failed to read settings file '{path}'"))?;
    TextureSettings::from_json(&json).with_context(|| format!("invalid settings in '{path}'"))
}

fn main() -> Result<()> {
    use env_logger::{Builder, Env};

    Builder::from_env(Env::default().default_filter_or("info")).init();

    let settings = load_settings()?;
    let mut sandbox = Sandbox::new(&settings);
    sandbox.setup()?;
    sandbox.run()?;
    sandbox.shutdown();
    Ok(())
}
