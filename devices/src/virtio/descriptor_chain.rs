// Copyright 2023 The ChromiumOS Authors
// Use of this source code is governed by a BSD-style license that can be
// found in the LICENSE file.

//! Virtqueue descriptor chain abstraction

#![deny(missing_docs)]

use anyhow::bail;
use anyhow::Context;
use anyhow::Result;
use log::trace;
use smallvec::SmallVec;

use crate::virtio::descriptor_utils::MemRegion;
use crate::virtio::descriptor_utils::Reader;
use crate::virtio::descriptor_utils::Writer;

/// Type of access allowed for a single virtio descriptor within a descriptor chain.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum DescriptorAccess {
    /// Descriptor is readable by the device (written by the driver before putting the descriptor
    /// chain on the available queue).
    DeviceRead,
    /// Descriptor is writable by the device (read by the driver after the device puts the
    /// descriptor chain on the used queue).
    DeviceWrite,
}

/// A single descriptor within a [`DescriptorChain`].
#[derive(Clone, Debug)]
pub struct Descriptor {
    /// Access type of this descriptor.
    pub access: DescriptorAccess,
    /// Contents of a device-readable descriptor, or zeroed space of a device-writable one.
    pub data: Vec<u8>,
}

impl Descriptor {
    /// Creates a device-readable descriptor holding `data`.
    pub fn readable(data: impl Into<Vec<u8>>) -> Descriptor {
        Descriptor {
            access: DescriptorAccess::DeviceRead,
            data: data.into(),
        }
    }

    /// Creates a device-writable descriptor with room for `len` bytes.
    pub fn writable(len: usize) -> Descriptor {
        Descriptor {
            access: DescriptorAccess::DeviceWrite,
            data: vec![0; len],
        }
    }
}

/// A virtio descriptor chain.
///
/// Most code should use the [`Reader`] and [`Writer`] halves rather than working with the
/// descriptors directly.
pub struct DescriptorChain {
    /// Index into the descriptor table.
    index: u16,

    /// The readable memory regions that make up the descriptor chain.
    pub reader: Reader,

    /// The writable memory regions that make up the descriptor chain.
    pub writer: Writer,
}

impl DescriptorChain {
    /// Gather `descriptors` into a new `DescriptorChain` instance.
    ///
    /// This function validates the following properties of the descriptor chain:
    /// * The chain contains at least one descriptor.
    /// * Each descriptor has a non-zero length.
    /// * No device-readable descriptor follows a device-writable one.
    /// * The total length of the descriptor chain data is representable in `u32`.
    ///
    /// If these properties do not hold, `Err` will be returned.
    ///
    /// # Arguments
    ///
    /// * `descriptors` - The descriptors of the chain, in order.
    /// * `index` - The index of the first descriptor in the chain.
    pub fn new(
        descriptors: impl IntoIterator<Item = Descriptor>,
        index: u16,
    ) -> Result<DescriptorChain> {
        let mut readable_mem = Vec::new();
        let mut writable_mem = Vec::new();
        let mut readable_regions = SmallVec::new();
        let mut writable_regions = SmallVec::new();
        let mut total_len: u32 = 0;
        let mut count: u16 = 0;

        for desc in descriptors {
            if desc.data.is_empty() {
                bail!("invalid zero-length descriptor");
            }

            let len = u32::try_from(desc.data.len()).context("descriptor length overflow")?;
            total_len = total_len
                .checked_add(len)
                .context("descriptor chain length overflow")?;
            count = count
                .checked_add(1)
                .context("descriptor chain too long")?;

            match desc.access {
                DescriptorAccess::DeviceRead => {
                    if !writable_regions.is_empty() {
                        bail!("device-readable descriptor after device-writable descriptor");
                    }
                    Self::add_descriptor(&mut readable_mem, &mut readable_regions, desc.data);
                }
                DescriptorAccess::DeviceWrite => {
                    Self::add_descriptor(&mut writable_mem, &mut writable_regions, desc.data);
                }
            }
        }

        if total_len == 0 {
            bail!("invalid zero-length descriptor chain");
        }

        trace!(
            "Descriptor chain created, index:{index}, count:{count}, readable:{}, writable:{}",
            readable_regions.len(),
            writable_regions.len()
        );

        Ok(DescriptorChain {
            index,
            reader: Reader::new_from_regions(readable_mem, readable_regions),
            writer: Writer::new_from_regions(writable_mem, writable_regions),
        })
    }

    fn add_descriptor(mem: &mut Vec<u8>, regions: &mut SmallVec<[MemRegion; 2]>, data: Vec<u8>) {
        regions.push(MemRegion {
            offset: mem.len(),
            len: data.len(),
        });
        mem.extend(data);
    }

    /// Returns the index of the first descriptor in the chain.
    pub fn index(&self) -> u16 {
        self.index
    }
}
