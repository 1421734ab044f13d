// Copyright 2017 The ChromiumOS Authors
// Use of this source code is governed by a BSD-style license that can be
// found in the LICENSE file.

use crate::virtio::DescriptorChain;

/// The guest-facing side of a virtqueue as seen by a device's queue handler.
///
/// Methods take `&self` so that an implementation may call back into the device (for example to
/// report newly available buffers) while a previous notification is still being handled.
pub trait ControlTransport {
    /// Removes and returns every descriptor chain the guest has made available since the last call,
    /// in the order the guest made them available.
    fn pop_available(&self) -> Vec<DescriptorChain>;

    /// Returns the descriptor chain at `index` to the guest with `reply` written to its writable
    /// part.
    fn deliver(&self, index: u16, reply: &[u8]);

    /// Signals the guest that used buffers are ready.
    fn notify_guest(&self);
}
