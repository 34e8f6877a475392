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

//! A recording texture device that needs no graphics context.
//!
//! [`HeadlessDevice`] fulfils the [`TextureDevice`] contract by appending every call
//! to a [`CallLog`] shared with whoever created it. The sandbox uses it to run
//! without a window, and the tests use the log to check exactly which backend calls
//! the texture object issued.

use super::api::{
    InternalFormat, TextureCapabilities, TextureHandle, TextureParameter, TextureUpload,
    TransferFormat,
};
use super::error::ResourceError;
use super::traits::TextureDevice;
use crate::math::Extent2D;
use std::cell::RefCell;
use std::collections::HashSet;
use std::num::NonZeroU32;
use std::rc::Rc;

/// A copy of an image transfer as seen by the device.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedUpload {
    /// The texture bound when the upload happened.
    pub handle: Option<TextureHandle>,
    /// The requested internal format.
    pub internal_format: InternalFormat,
    /// The layout of `data`.
    pub transfer_format: TransferFormat,
    /// The transferred dimensions.
    pub size: Extent2D,
    /// The transferred bytes.
    pub data: Vec<u8>,
}

/// One call received by a [`HeadlessDevice`].
#[derive(Debug, Clone, PartialEq)]
pub enum DeviceCall {
    /// A texture handle was allocated.
    CreateTexture(TextureHandle),
    /// A texture handle was released.
    DestroyTexture(TextureHandle),
    /// A texture (or nothing) was bound on a stage.
    BindTexture {
        /// The stage index.
        stage: usize,
        /// The bound texture.
        handle: Option<TextureHandle>,
    },
    /// A parameter was applied to the bound texture.
    SetParameter {
        /// The texture bound when the parameter was applied.
        handle: Option<TextureHandle>,
        /// The parameter.
        parameter: TextureParameter,
    },
    /// An image was transferred into the bound texture.
    UploadImage(RecordedUpload),
}

/// The shared, append-only record of a [`HeadlessDevice`]'s calls.
#[derive(Debug, Clone, Default)]
pub struct CallLog {
    calls: Rc<RefCell<Vec<DeviceCall>>>,
}

impl CallLog {
    fn push(&self, call: DeviceCall) {
        self.calls.borrow_mut().push(call);
    }

    /// A snapshot of every call so far.
    pub fn calls(&self) -> Vec<DeviceCall> {
        self.calls.borrow().clone()
    }

    /// The number of calls so far.
    pub fn len(&self) -> usize {
        self.calls.borrow().len()
    }

    /// Returns `true` if no call was recorded.
    pub fn is_empty(&self) -> bool {
        self.calls.borrow().is_empty()
    }

    /// Forgets every recorded call.
    pub fn clear(&self) {
        self.calls.borrow_mut().clear();
    }

    /// The parameters applied so far, in order.
    pub fn parameters(&self) -> Vec<TextureParameter> {
        self.calls
            .borrow()
            .iter()
            .filter_map(|call| match call {
                DeviceCall::SetParameter { parameter, .. } => Some(*parameter),
                _ => None,
            })
            .collect()
    }

    /// The image transfers so far, in order.
    pub fn uploads(&self) -> Vec<RecordedUpload> {
        self.calls
            .borrow()
            .iter()
            .filter_map(|call| match call {
                DeviceCall::UploadImage(upload) => Some(upload.clone()),
                _ => None,
            })
            .collect()
    }

    /// The number of handles created and not yet destroyed.
    pub fn live_textures(&self) -> usize {
        let calls = self.calls.borrow();
        let created = calls
            .iter()
            .filter(|c| matches!(c, DeviceCall::CreateTexture(_)))
            .count();
        let destroyed = calls
            .iter()
            .filter(|c| matches!(c, DeviceCall::DestroyTexture(_)))
            .count();
        created.saturating_sub(destroyed)
    }
}

/// A [`TextureDevice`] that records calls instead of talking to a GPU.
#[derive(Debug)]
pub struct HeadlessDevice {
    capabilities: TextureCapabilities,
    log: CallLog,
    next_handle: u32,
    live: HashSet<TextureHandle>,
    bindings: Vec<Option<TextureHandle>>,
    active_stage: usize,
}

impl HeadlessDevice {
    /// Creates a device reporting `capabilities`.
    pub fn new(capabilities: TextureCapabilities) -> Self {
        Self {
            capabilities,
            log: CallLog::default(),
            next_handle: 1,
            live: HashSet::new(),
            bindings: Vec::new(),
            active_stage: 0,
        }
    }

    /// Returns a handle to this device's call log. Clones share the same record.
    pub fn call_log(&self) -> CallLog {
        self.log.clone()
    }

    fn bound(&self) -> Option<TextureHandle> {
        self.bindings.get(self.active_stage).copied().flatten()
    }
}

impl Default for HeadlessDevice {
    fn default() -> Self {
        Self::new(TextureCapabilities::default())
    }
}

impl TextureDevice for HeadlessDevice {
    fn capabilities(&self) -> TextureCapabilities {
        self.capabilities
    }

    fn create_texture(&mut self) -> Result<TextureHandle, ResourceError> {
        let raw = NonZeroU32::new(self.next_handle).ok_or_else(|| {
            ResourceError::BackendError("headless texture handles exhausted".to_string())
        })?;
        self.next_handle = self.next_handle.wrapping_add(1);

        let handle = TextureHandle(raw);
        self.live.insert(handle);
        self.log.push(DeviceCall::CreateTexture(handle));
        Ok(handle)
    }

    fn destroy_texture(&mut self, handle: TextureHandle) {
        if !self.live.remove(&handle) {
            log::warn!("HeadlessDevice: Destroying unknown texture {handle:?}");
        }
        for binding in &mut self.bindings {
            if *binding == Some(handle) {
                *binding = None;
            }
        }
        self.log.push(DeviceCall::DestroyTexture(handle));
    }

    fn bind_texture(&mut self, stage: usize, handle: Option<TextureHandle>) {
        if self.bindings.len() <= stage {
            self.bindings.resize(stage + 1, None);
        }
        self.bindings[stage] = handle;
        self.active_stage = stage;
        self.log.push(DeviceCall::BindTexture { stage, handle });
    }

    fn set_parameter(&mut self, parameter: TextureParameter) {
        self.log.push(DeviceCall::SetParameter {
            handle: self.bound(),
            parameter,
        });
    }

    fn upload_image(&mut self, upload: &TextureUpload<'_>) {
        self.log.push(DeviceCall::UploadImage(RecordedUpload {
            handle: self.bound(),
            internal_format: upload.internal_format,
            transfer_format: upload.transfer_format,
            size: upload.size,
            data: upload.data.to_vec(),
        }));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::renderer::api::AddressMode;

    #[test]
    fn test_handles_start_at_one_and_are_tracked() {
        let mut device = HeadlessDevice::default();
        let log = device.call_log();

        let first = device.create_texture().unwrap();
        let second = device.create_texture().unwrap();
        assert_eq!(first.0.get(), 1);
        assert_eq!(second.0.get(), 2);
        assert_eq!(log.live_textures(), 2);

        device.destroy_texture(first);
        assert_eq!(log.live_textures(), 1);
    }

    #[test]
    fn test_parameters_target_the_active_binding() {
        let mut device = HeadlessDevice::default();
        let log = device.call_log();
        let handle = device.create_texture().unwrap();

        device.bind_texture(2, Some(handle));
        device.set_parameter(TextureParameter::Wrap(AddressMode::ClampToEdge));

        assert_eq!(
            log.calls().last(),
            Some(&DeviceCall::SetParameter {
                handle: Some(handle),
                parameter: TextureParameter::Wrap(AddressMode::ClampToEdge),
            })
        );
        assert_eq!(
            log.parameters(),
            vec![TextureParameter::Wrap(AddressMode::ClampToEdge)]
        );
    }
}
