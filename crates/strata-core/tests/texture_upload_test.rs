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

use strata_core::math::Extent2D;
use strata_core::renderer::{
    CallLog, DeviceCall, HeadlessDevice, InternalFormat, TextureCapabilities, TextureFlags,
    TextureParameter, TextureSettings, TransferFormat,
};
use strata_core::{PixelBuffer, PixelFormat, RenderContext, SharedRenderContext, Texture2D};

fn context_with(
    capabilities: TextureCapabilities,
    settings: TextureSettings,
) -> (SharedRenderContext, CallLog) {
    let device = HeadlessDevice::new(capabilities);
    let log = device.call_log();
    let ctx = RenderContext::new(Box::new(device), &settings).into_shared();
    (ctx, log)
}

fn headless_context(capabilities: TextureCapabilities) -> (SharedRenderContext, CallLog) {
    context_with(capabilities, TextureSettings::default())
}

fn created_texture(
    ctx: &SharedRenderContext,
    image: &PixelBuffer,
    flags: TextureFlags,
) -> Texture2D {
    let mut texture = Texture2D::new(ctx, image.size(), image.format(), flags);
    texture.create().unwrap();
    texture
}

#[test]
fn test_intensity_is_expanded_without_intensity_support() {
    // --- ARRANGE ---
    let caps = TextureCapabilities {
        intensity_textures: false,
        ..Default::default()
    };
    let (ctx, log) = headless_context(caps);
    let mut image = PixelBuffer::from_raw(2, 2, PixelFormat::L8, vec![10, 20, 30, 40]).unwrap();
    let mut texture = created_texture(&ctx, &image, TextureFlags::INTENSITY);

    // --- ACT ---
    texture.upload(&mut image);

    // --- ASSERT ---
    assert_eq!(image.format(), PixelFormat::L8A8);
    assert_eq!(image.data(), &[10, 10, 20, 20, 30, 30, 40, 40]);
    assert_eq!(texture.format(), PixelFormat::L8A8);
    assert!(!texture.flags().contains(TextureFlags::INTENSITY));

    let uploads = log.uploads();
    assert_eq!(uploads.len(), 1);
    assert_eq!(uploads[0].internal_format, InternalFormat::Luminance8Alpha8);
    assert_eq!(uploads[0].transfer_format, TransferFormat::LuminanceAlpha);
    assert_eq!(uploads[0].data, vec![10, 10, 20, 20, 30, 30, 40, 40]);
}

#[test]
fn test_intensity_is_native_when_supported() {
    let (ctx, log) = headless_context(TextureCapabilities::default());
    let mut image = PixelBuffer::from_raw(2, 1, PixelFormat::L8, vec![7, 9]).unwrap();
    let mut texture = created_texture(&ctx, &image, TextureFlags::INTENSITY);

    texture.upload(&mut image);

    assert_eq!(image.format(), PixelFormat::L8);
    assert!(texture.flags().contains(TextureFlags::INTENSITY));
    let upload = &log.uploads()[0];
    assert_eq!(upload.internal_format, InternalFormat::Intensity8);
    assert_eq!(upload.transfer_format, TransferFormat::Red);
    assert_eq!(upload.data, vec![7, 9]);
}

#[test]
#[should_panic(expected = "intensity fallback needs an L8 image")]
fn test_intensity_fallback_rejects_non_luminance_image() {
    // --- ARRANGE ---
    let caps = TextureCapabilities {
        intensity_textures: false,
        ..Default::default()
    };
    let (ctx, _log) = headless_context(caps);
    let mut image = PixelBuffer::from_raw(2, 2, PixelFormat::R8G8B8A8, vec![255; 16]).unwrap();
    let mut texture = created_texture(&ctx, &image, TextureFlags::INTENSITY);

    // --- ACT ---
    // Without native intensity textures, only an L8 source can be widened to L8A8.
    texture.upload(&mut image);
}

#[test]
fn test_bgr_is_swapped_without_bgr_transfer() {
    // --- ARRANGE ---
    let caps = TextureCapabilities {
        bgr_texture_transfer: false,
        ..Default::default()
    };
    let (ctx, log) = headless_context(caps);
    let mut image =
        PixelBuffer::from_raw(2, 1, PixelFormat::B8G8R8, vec![1, 2, 3, 4, 5, 6]).unwrap();
    let mut texture = created_texture(&ctx, &image, TextureFlags::empty());

    // --- ACT ---
    texture.upload(&mut image);

    // --- ASSERT ---
    assert_eq!(image.format(), PixelFormat::R8G8B8);
    assert_eq!(image.data(), &[3, 2, 1, 6, 5, 4]);
    assert_eq!(texture.format(), PixelFormat::R8G8B8);

    let upload = &log.uploads()[0];
    assert_eq!(upload.internal_format, InternalFormat::Rgb8);
    assert_eq!(upload.transfer_format, TransferFormat::Rgb);
    assert_eq!(upload.data, vec![3, 2, 1, 6, 5, 4]);
}

#[test]
fn test_bgra_is_swapped_without_bgr_transfer() {
    let caps = TextureCapabilities {
        bgr_texture_transfer: false,
        ..Default::default()
    };
    let (ctx, log) = headless_context(caps);
    let mut image =
        PixelBuffer::from_raw(1, 1, PixelFormat::B8G8R8A8, vec![10, 20, 30, 40]).unwrap();
    let mut texture = created_texture(&ctx, &image, TextureFlags::empty());

    texture.upload(&mut image);

    assert_eq!(texture.format(), PixelFormat::R8G8B8A8);
    let upload = &log.uploads()[0];
    assert_eq!(upload.transfer_format, TransferFormat::Rgba);
    assert_eq!(upload.data, vec![30, 20, 10, 40]);
}

#[test]
fn test_bgr_is_transferred_natively_when_supported() {
    let (ctx, log) = headless_context(TextureCapabilities::default());
    let mut image =
        PixelBuffer::from_raw(1, 1, PixelFormat::B8G8R8A8, vec![10, 20, 30, 40]).unwrap();
    let mut texture = created_texture(&ctx, &image, TextureFlags::empty());

    texture.upload(&mut image);

    assert_eq!(image.data(), &[10, 20, 30, 40]);
    let upload = &log.uploads()[0];
    assert_eq!(upload.internal_format, InternalFormat::Rgba8);
    assert_eq!(upload.transfer_format, TransferFormat::Bgra);
}

#[test]
fn test_unsized_internal_formats_without_sized_support() {
    let caps = TextureCapabilities {
        sized_texture_formats: false,
        ..Default::default()
    };
    let (ctx, log) = headless_context(caps);
    let mut image = PixelBuffer::new(2, 2, PixelFormat::L8A8);
    let mut texture = created_texture(&ctx, &image, TextureFlags::empty());

    texture.upload(&mut image);

    assert_eq!(
        log.uploads()[0].internal_format,
        InternalFormat::LuminanceAlpha
    );
}

#[test]
fn test_mipmapped_upload_requests_generation_and_anisotropy() {
    let (ctx, log) = headless_context(TextureCapabilities::default());
    let mut image = PixelBuffer::new(4, 4, PixelFormat::R8G8B8A8);
    let mut texture = created_texture(&ctx, &image, TextureFlags::HAS_MIPMAPS);
    log.clear();

    texture.upload(&mut image);

    assert_eq!(
        log.parameters(),
        vec![
            TextureParameter::GenerateMipmap(true),
            TextureParameter::MaxAnisotropy(16.0),
        ]
    );
    assert!(texture.has_mipmaps());
}

#[test]
fn test_mipmapped_upload_skips_anisotropy_at_one() {
    let settings = TextureSettings {
        max_anisotropy: 1.0,
        ..Default::default()
    };
    let (ctx, log) = context_with(TextureCapabilities::default(), settings);
    let mut image = PixelBuffer::new(4, 4, PixelFormat::R8G8B8A8);
    let mut texture = created_texture(&ctx, &image, TextureFlags::HAS_MIPMAPS);

    texture.upload(&mut image);

    assert_eq!(
        log.parameters(),
        vec![TextureParameter::GenerateMipmap(true)]
    );
}

#[test]
fn test_plain_upload_limits_mip_levels() {
    let (ctx, log) = headless_context(TextureCapabilities::default());
    let mut image = PixelBuffer::new(4, 4, PixelFormat::R8G8B8);
    let mut texture = created_texture(&ctx, &image, TextureFlags::empty());

    texture.upload(&mut image);

    assert_eq!(log.parameters(), vec![TextureParameter::MaxLevel(0)]);
}

#[test]
fn test_upload_binds_stage_zero() {
    let (ctx, log) = headless_context(TextureCapabilities::default());
    let mut image = PixelBuffer::new(2, 2, PixelFormat::R8G8B8);
    let mut texture = created_texture(&ctx, &image, TextureFlags::empty());
    let handle = texture.handle();
    log.clear();

    texture.upload(&mut image);

    assert_eq!(
        log.calls()[0],
        DeviceCall::BindTexture { stage: 0, handle }
    );
    assert_eq!(ctx.borrow().stage(0).current_texture(), Some(texture.key()));
    assert!(log.uploads().iter().all(|u| u.handle == handle));
}

#[test]
fn test_padded_upload_extends_border_and_drops_mipmaps() {
    // --- ARRANGE ---
    let caps = TextureCapabilities {
        npot_textures: false,
        ..Default::default()
    };
    let (ctx, log) = headless_context(caps);
    let mut image = PixelBuffer::from_raw(3, 3, PixelFormat::L8, (1..=9).collect()).unwrap();
    let mut texture = created_texture(&ctx, &image, TextureFlags::HAS_MIPMAPS);

    // --- ACT ---
    texture.upload(&mut image);

    // --- ASSERT ---
    assert!(texture.is_padded());
    assert!(!texture.has_mipmaps());
    assert_eq!(log.parameters(), vec![TextureParameter::MaxLevel(0)]);

    let upload = &log.uploads()[0];
    assert_eq!(upload.size, Extent2D::new(4, 4));
    #[rustfmt::skip]
    let expected = vec![
        1, 2, 3, 3,
        4, 5, 6, 6,
        7, 8, 9, 9,
        7, 8, 9, 9,
    ];
    assert_eq!(upload.data, expected);
    // The caller's buffer keeps its logical size.
    assert_eq!(image.size(), Extent2D::new(3, 3));
}

#[test]
fn test_unpadded_upload_transfers_image_as_is() {
    let (ctx, log) = headless_context(TextureCapabilities::default());
    let mut image = PixelBuffer::from_raw(3, 1, PixelFormat::L8, vec![5, 6, 7]).unwrap();
    let mut texture = created_texture(&ctx, &image, TextureFlags::empty());

    texture.upload(&mut image);

    let upload = &log.uploads()[0];
    assert_eq!(upload.size, Extent2D::new(3, 1));
    assert_eq!(upload.data, vec![5, 6, 7]);
}

#[test]
fn test_from_pixel_buffer_creates_and_uploads() {
    let (ctx, log) = headless_context(TextureCapabilities::default());
    let mut image = PixelBuffer::new(8, 4, PixelFormat::R8G8B8A8);

    let texture = Texture2D::from_pixel_buffer(&ctx, &mut image, TextureFlags::empty()).unwrap();

    assert!(texture.is_created());
    assert_eq!(texture.size(), Extent2D::new(8, 4));
    assert_eq!(log.uploads().len(), 1);
}

#[test]
fn test_reload_recreates_from_new_image() {
    let (ctx, log) = headless_context(TextureCapabilities::default());
    let mut first = PixelBuffer::new(4, 4, PixelFormat::R8G8B8);
    let mut texture = Texture2D::from_pixel_buffer(&ctx, &mut first, TextureFlags::empty()).unwrap();
    let old_handle = texture.handle();

    let mut second = PixelBuffer::new(2, 8, PixelFormat::L8);
    texture.reload(&mut second).unwrap();

    assert_ne!(texture.handle(), old_handle);
    assert_eq!(texture.size(), Extent2D::new(2, 8));
    assert_eq!(texture.format(), PixelFormat::L8);
    assert_eq!(log.live_textures(), 1);
    assert_eq!(log.uploads().last().map(|u| u.size), Some(Extent2D::new(2, 8)));
}

#[test]
#[should_panic(expected = "unsupported pixel format")]
fn test_compressed_upload_panics() {
    let (ctx, _log) = headless_context(TextureCapabilities::default());
    let mut image = PixelBuffer::new(4, 4, PixelFormat::Dxt1);
    let mut texture = created_texture(&ctx, &image, TextureFlags::empty());
    texture.upload(&mut image);
}

#[test]
#[should_panic(expected = "does not match the texture size")]
fn test_mismatched_image_size_panics() {
    let (ctx, _log) = headless_context(TextureCapabilities::default());
    let mut texture = Texture2D::new(
        &ctx,
        Extent2D::new(4, 4),
        PixelFormat::L8,
        TextureFlags::empty(),
    );
    texture.create().unwrap();
    let mut image = PixelBuffer::new(2, 2, PixelFormat::L8);
    texture.upload(&mut image);
}

#[test]
#[should_panic(expected = "without a live handle")]
fn test_upload_before_create_panics() {
    let (ctx, _log) = headless_context(TextureCapabilities::default());
    let mut image = PixelBuffer::new(2, 2, PixelFormat::L8);
    let mut texture = Texture2D::new(&ctx, image.size(), image.format(), TextureFlags::empty());
    texture.upload(&mut image);
}
