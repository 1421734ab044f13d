// Copyright 2017 The ChromiumOS Authors
// Use of this source code is governed by a BSD-style license that can be
// found in the LICENSE file.

//! Implements virtio devices, queues, and transport mechanisms.

mod descriptor_chain;
mod descriptor_utils;
mod queue;
mod virtio_device;

pub mod snd;

pub use self::descriptor_chain::Descriptor;
pub use self::descriptor_chain::DescriptorAccess;
pub use self::descriptor_chain::DescriptorChain;
pub use self::descriptor_utils::Reader;
pub use self::descriptor_utils::Writer;
pub use self::queue::ControlTransport;
pub use self::virtio_device::VirtioDevice;

use std::cmp;
use std::convert::TryFrom;

/// Feature bit indicating compliance with virtio 1.0 or later.
pub const VIRTIO_F_VERSION_1: u32 = 32;
/// Feature bit indicating the device uses buffers in the order they were made available.
pub const VIRTIO_F_IN_ORDER: u32 = 35;

const VIRTIO_ID_SOUND: u32 = 25;

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
#[repr(u32)]
pub enum DeviceType {
    Sound = VIRTIO_ID_SOUND,
}

/// Prints a string representation of the given virtio device type.
impl std::fmt::Display for DeviceType {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match &self {
            DeviceType::Sound => write!(f, "snd"),
        }
    }
}

/// Copy virtio device configuration data from a subslice of `src` to a subslice of `dst`.
/// Unlike std::slice::copy_from_slice(), this function copies as much as possible within
/// the common subset of the two slices, truncating the requested range instead of
/// panicking if the slices do not match in size.
///
/// `dst_offset` and `src_offset` specify the starting indexes of the `dst` and `src`
/// slices, respectively; if either index is out of bounds, this function is a no-op
/// rather than panicking.  This makes it safe to call with arbitrary user-controlled
/// inputs.
pub fn copy_config(dst: &mut [u8], dst_offset: u64, src: &[u8], src_offset: u64) {
    if let Ok(dst_offset) = usize::try_from(dst_offset) {
        if let Ok(src_offset) = usize::try_from(src_offset) {
            if let Some(dst_slice) = dst.get_mut(dst_offset..) {
                if let Some(src_slice) = src.get(src_offset..) {
                    let len = cmp::min(dst_slice.len(), src_slice.len());
                    let dst_subslice = &mut dst_slice[0..len];
                    let src_subslice = &src_slice[0..len];
                    dst_subslice.copy_from_slice(src_subslice);
                }
            }
        }
    }
}
