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

use approx::assert_relative_eq;
use strata_core::math::Extent2D;
use strata_core::renderer::{
    AddressMode, CallLog, DeviceCall, FilterMode, HeadlessDevice, TextureCapabilities,
    TextureFilter, TextureFlags, TextureParameter, TextureSettings,
};
use strata_core::{PixelBuffer, PixelFormat, RenderContext, SharedRenderContext, Texture2D};

fn headless_context(capabilities: TextureCapabilities) -> (SharedRenderContext, CallLog) {
    let device = HeadlessDevice::new(capabilities);
    let log = device.call_log();
    let ctx = RenderContext::new(Box::new(device), &TextureSettings::default()).into_shared();
    (ctx, log)
}

fn uploaded_texture(ctx: &SharedRenderContext, size: Extent2D, flags: TextureFlags) -> Texture2D {
    let mut image = PixelBuffer::new(size.width, size.height, PixelFormat::R8G8B8A8);
    Texture2D::from_pixel_buffer(ctx, &mut image, flags).unwrap()
}

#[test]
fn test_first_apply_binds_and_sends_only_changed_parameters() {
    // --- ARRANGE ---
    let (ctx, log) = headless_context(TextureCapabilities::default());
    let mut texture = uploaded_texture(&ctx, Extent2D::new(8, 8), TextureFlags::empty());
    ctx.borrow_mut().set_texture(1, Some(texture.key()));
    log.clear();

    // --- ACT ---
    texture.apply(1);

    // --- ASSERT ---
    // Stage defaults are Repeat/Linear/Linear; only minification differs from the
    // Repeat/Nearest/Linear state left by create.
    let handle = texture.handle();
    assert_eq!(
        log.calls(),
        vec![
            DeviceCall::BindTexture { stage: 1, handle },
            DeviceCall::SetParameter {
                handle,
                parameter: TextureParameter::MinFilter(TextureFilter::Linear),
            },
        ]
    );
    assert_eq!(ctx.borrow().stage(1).current_texture(), Some(texture.key()));
    assert_eq!(texture.min_filter(), FilterMode::Linear);
}

#[test]
fn test_apply_is_idempotent() {
    let (ctx, log) = headless_context(TextureCapabilities::default());
    let mut texture = uploaded_texture(&ctx, Extent2D::new(8, 8), TextureFlags::empty());
    ctx.borrow_mut().set_texture(0, Some(texture.key()));
    texture.apply(0);
    log.clear();

    texture.apply(0);
    texture.apply(0);

    assert!(log.is_empty(), "unexpected calls: {:?}", log.calls());
}

#[test]
fn test_apply_sends_each_changed_parameter_once() {
    let (ctx, log) = headless_context(TextureCapabilities::default());
    let mut texture = uploaded_texture(&ctx, Extent2D::new(8, 8), TextureFlags::empty());
    ctx.borrow_mut().set_texture(0, Some(texture.key()));
    texture.apply(0);
    log.clear();

    {
        let mut ctx = ctx.borrow_mut();
        let stage = ctx.stage_mut(0);
        stage.set_wrap_mode(AddressMode::MirrorRepeat);
        stage.set_mag_filter(FilterMode::Nearest);
    }
    texture.apply(0);

    assert_eq!(
        log.parameters(),
        vec![
            TextureParameter::Wrap(AddressMode::MirrorRepeat),
            TextureParameter::MagFilter(TextureFilter::Nearest),
        ]
    );
    assert_eq!(texture.wrap_mode(), AddressMode::MirrorRepeat);
    assert_eq!(texture.mag_filter(), FilterMode::Nearest);
}

#[test]
fn test_apply_rebinds_when_another_texture_became_current() {
    let (ctx, log) = headless_context(TextureCapabilities::default());
    let mut first = uploaded_texture(&ctx, Extent2D::new(4, 4), TextureFlags::empty());
    ctx.borrow_mut().set_texture(0, Some(first.key()));
    first.apply(0);

    // Uploading another texture takes over stage 0.
    let _second = uploaded_texture(&ctx, Extent2D::new(4, 4), TextureFlags::empty());
    log.clear();

    first.apply(0);

    assert_eq!(
        log.calls(),
        vec![DeviceCall::BindTexture {
            stage: 0,
            handle: first.handle()
        }]
    );
}

#[test]
fn test_padded_texture_is_clamped_to_edge() {
    // --- ARRANGE ---
    let caps = TextureCapabilities {
        npot_textures: false,
        ..Default::default()
    };
    let (ctx, log) = headless_context(caps);
    let mut texture = uploaded_texture(&ctx, Extent2D::new(6, 6), TextureFlags::empty());
    ctx.borrow_mut().set_texture(0, Some(texture.key()));
    assert_eq!(ctx.borrow().stage(0).wrap_mode(), AddressMode::Repeat);
    log.clear();

    // --- ACT ---
    texture.apply(0);

    // --- ASSERT ---
    assert!(log
        .parameters()
        .contains(&TextureParameter::Wrap(AddressMode::ClampToEdge)));
    assert_eq!(texture.wrap_mode(), AddressMode::ClampToEdge);

    // Asking for repeat again changes nothing.
    log.clear();
    ctx.borrow_mut()
        .stage_mut(0)
        .set_wrap_mode(AddressMode::Repeat);
    texture.apply(0);
    assert!(log.is_empty());
}

#[test]
fn test_mipmapped_minification_uses_mipmap_filter() {
    let (ctx, log) = headless_context(TextureCapabilities::default());
    let mut texture = uploaded_texture(&ctx, Extent2D::new(16, 16), TextureFlags::HAS_MIPMAPS);
    ctx.borrow_mut().set_texture(0, Some(texture.key()));
    log.clear();

    texture.apply(0);

    assert_eq!(
        log.parameters(),
        vec![TextureParameter::MinFilter(
            TextureFilter::LinearMipmapLinear
        )]
    );
}

#[test]
#[should_panic(expected = "not bound to it")]
fn test_apply_on_foreign_stage_panics() {
    let (ctx, _log) = headless_context(TextureCapabilities::default());
    let mut texture = uploaded_texture(&ctx, Extent2D::new(4, 4), TextureFlags::empty());
    texture.apply(0);
}

#[test]
fn test_destroy_scrubs_every_stage_reference() {
    // --- ARRANGE ---
    let (ctx, log) = headless_context(TextureCapabilities::default());
    let mut doomed = uploaded_texture(&ctx, Extent2D::new(4, 4), TextureFlags::empty());
    let mut survivor = uploaded_texture(&ctx, Extent2D::new(4, 4), TextureFlags::empty());
    {
        let mut ctx = ctx.borrow_mut();
        ctx.set_texture(0, Some(doomed.key()));
        ctx.set_texture(2, Some(doomed.key()));
        ctx.set_texture(1, Some(survivor.key()));
    }
    doomed.apply(0);
    doomed.apply(2);
    survivor.apply(1);

    // --- ACT ---
    doomed.destroy();

    // --- ASSERT ---
    let ctx = ctx.borrow();
    assert!(!ctx.stages().references(doomed.key()));
    assert_eq!(ctx.stage(0).bound_texture(), None);
    assert_eq!(ctx.stage(0).current_texture(), None);
    assert_eq!(ctx.stage(2).bound_texture(), None);
    assert_eq!(ctx.stage(1).bound_texture(), Some(survivor.key()));
    assert_eq!(ctx.stage(1).current_texture(), Some(survivor.key()));
    assert_eq!(log.live_textures(), 1);
}

#[test]
fn test_drop_scrubs_stage_references() {
    let (ctx, _log) = headless_context(TextureCapabilities::default());
    let key = {
        let mut texture = uploaded_texture(&ctx, Extent2D::new(4, 4), TextureFlags::empty());
        ctx.borrow_mut().set_texture(3, Some(texture.key()));
        texture.apply(3);
        texture.key()
    };

    assert!(!ctx.borrow().stages().references(key));
}

#[test]
fn test_update_max_anisotropy_reapplies_context_level() {
    // --- ARRANGE ---
    let (ctx, log) = headless_context(TextureCapabilities::default());
    let mut texture = uploaded_texture(&ctx, Extent2D::new(8, 8), TextureFlags::HAS_MIPMAPS);
    let stored = ctx.borrow_mut().set_max_anisotropy(4.0);
    assert_relative_eq!(stored, 4.0);
    log.clear();

    // --- ACT ---
    texture.update_max_anisotropy();

    // --- ASSERT ---
    assert_eq!(
        log.calls(),
        vec![
            DeviceCall::BindTexture {
                stage: 0,
                handle: texture.handle()
            },
            DeviceCall::SetParameter {
                handle: texture.handle(),
                parameter: TextureParameter::MaxAnisotropy(4.0),
            },
        ]
    );
}

#[test]
fn test_update_max_anisotropy_ignores_plain_textures() {
    let (ctx, log) = headless_context(TextureCapabilities::default());
    let mut texture = uploaded_texture(&ctx, Extent2D::new(8, 8), TextureFlags::empty());
    ctx.borrow_mut().set_max_anisotropy(2.0);
    log.clear();

    texture.update_max_anisotropy();

    assert!(log.is_empty());
}

#[test]
fn test_anisotropy_is_clamped_to_device_maximum() {
    let caps = TextureCapabilities {
        max_anisotropy: 8.0,
        ..Default::default()
    };
    let (ctx, _log) = headless_context(caps);

    assert_relative_eq!(ctx.borrow().max_anisotropy(), 8.0);
    assert_relative_eq!(ctx.borrow_mut().set_max_anisotropy(100.0), 8.0);
    assert_relative_eq!(ctx.borrow_mut().set_max_anisotropy(0.25), 1.0);
}
