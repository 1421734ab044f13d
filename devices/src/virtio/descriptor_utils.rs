// Copyright 2019 The ChromiumOS Authors
// Use of this source code is governed by a BSD-style license that can be
// found in the LICENSE file.

use std::cmp;
use std::io;
use std::io::Write;
use std::mem::size_of;

use smallvec::SmallVec;
use zerocopy::FromBytes;
use zerocopy::Immutable;
use zerocopy::IntoBytes;

/// A contiguous span of a descriptor chain's backing buffer.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct MemRegion {
    pub offset: usize,
    pub len: usize,
}

struct DescriptorChainRegions {
    regions: SmallVec<[MemRegion; 2]>,

    // Index of the current region in `regions`.
    current_region_index: usize,

    // Number of bytes consumed in the current region.
    current_region_offset: usize,

    // Total bytes consumed in the entire descriptor chain.
    bytes_consumed: usize,
}

impl DescriptorChainRegions {
    fn new(regions: SmallVec<[MemRegion; 2]>) -> Self {
        DescriptorChainRegions {
            regions,
            current_region_index: 0,
            current_region_offset: 0,
            bytes_consumed: 0,
        }
    }

    fn available_bytes(&self) -> usize {
        self.get_remaining_regions()
            .fold(0usize, |count, region| count + region.len)
    }

    fn bytes_consumed(&self) -> usize {
        self.bytes_consumed
    }

    /// Returns all the remaining regions. Calling this function does not consume any bytes; callers
    /// should use `consume` to advance. Multiple calls with no intervening calls to `consume` will
    /// return the same regions.
    fn get_remaining_regions(&self) -> impl Iterator<Item = MemRegion> + '_ {
        let skip = self.current_region_offset;
        self.regions
            .get(self.current_region_index..)
            .unwrap_or_default()
            .iter()
            .enumerate()
            .map(move |(i, region)| {
                if i == 0 {
                    MemRegion {
                        offset: region.offset + skip,
                        len: region.len - skip,
                    }
                } else {
                    *region
                }
            })
    }

    /// Consumes `count` bytes. If `count` is larger than `self.available_bytes()` then all
    /// remaining bytes will be consumed.
    fn consume(&mut self, mut count: usize) {
        while let Some(region) = self.regions.get(self.current_region_index) {
            let region_remaining = region.len - self.current_region_offset;
            if count < region_remaining {
                self.current_region_offset += count;
                self.bytes_consumed += count;
                return;
            }

            // The current region has been exhausted. Advance to the next region.
            self.current_region_index += 1;
            self.current_region_offset = 0;

            self.bytes_consumed += region_remaining;
            count -= region_remaining;
        }
    }
}

/// Copies bytes out of `regions` of `mem` into `dst`, skipping the first `skip` bytes.
///
/// Returns the total number of bytes copied.
fn copy_from_regions(
    mem: &[u8],
    regions: impl Iterator<Item = MemRegion>,
    mut skip: usize,
    dst: &mut [u8],
) -> usize {
    let mut copied = 0;
    for region in regions {
        if copied >= dst.len() {
            break;
        }
        if skip >= region.len {
            skip -= region.len;
            continue;
        }

        let start = region.offset + skip;
        let count = cmp::min(dst.len() - copied, region.len - skip);
        skip = 0;
        dst[copied..copied + count].copy_from_slice(&mem[start..start + count]);
        copied += count;
    }
    copied
}

/// Provides high-level interface over the sequence of memory regions
/// defined by readable descriptors in the descriptor chain.
///
/// Note that virtio spec requires driver to place any device-writable
/// descriptors after any device-readable descriptors (2.6.4.2 in Virtio Spec v1.1).
/// Reader will skip iterating over descriptor chain when first writable
/// descriptor is encountered.
pub struct Reader {
    mem: Vec<u8>,
    regions: DescriptorChainRegions,
}

impl Reader {
    /// Construct a new Reader wrapper over `readable_regions` of `mem`.
    pub fn new_from_regions(mem: Vec<u8>, readable_regions: SmallVec<[MemRegion; 2]>) -> Reader {
        Reader {
            mem,
            regions: DescriptorChainRegions::new(readable_regions),
        }
    }

    /// Reads an object located `offset` bytes into the readable part of the chain.
    pub fn peek_obj_at<T: FromBytes>(&self, offset: usize) -> io::Result<T> {
        let mut buf: SmallVec<[u8; 64]> = SmallVec::from_elem(0, size_of::<T>());
        let copied = copy_from_regions(
            &self.mem,
            self.regions.get_remaining_regions(),
            offset,
            &mut buf,
        );
        if copied != size_of::<T>() {
            return Err(io::Error::from(io::ErrorKind::UnexpectedEof));
        }

        T::read_from_bytes(&buf[..]).map_err(|_| io::Error::from(io::ErrorKind::InvalidData))
    }

    /// Returns number of bytes available for reading.
    pub fn available_bytes(&self) -> usize {
        self.regions.available_bytes()
    }
}

/// Provides high-level interface over the sequence of memory regions
/// defined by writable descriptors in the descriptor chain.
///
/// Note that virtio spec requires driver to place any device-writable
/// descriptors after any device-readable descriptors (2.6.4.2 in Virtio Spec v1.1).
/// Writer will start iterating the descriptors from the first writable one and will
/// assume that all following descriptors are writable.
pub struct Writer {
    mem: Vec<u8>,
    regions: DescriptorChainRegions,
}

impl Writer {
    /// Construct a new Writer wrapper over `writable_regions` of `mem`.
    pub fn new_from_regions(mem: Vec<u8>, writable_regions: SmallVec<[MemRegion; 2]>) -> Writer {
        Writer {
            mem,
            regions: DescriptorChainRegions::new(writable_regions),
        }
    }

    /// Writes an object to the descriptor chain buffer.
    pub fn write_obj<T: Immutable + IntoBytes>(&mut self, val: T) -> io::Result<()> {
        self.write_all(val.as_bytes())
    }

    /// Returns number of bytes available for writing.
    pub fn available_bytes(&self) -> usize {
        self.regions.available_bytes()
    }

    /// Returns number of bytes already written to the descriptor chain buffer.
    pub fn bytes_written(&self) -> usize {
        self.regions.bytes_consumed()
    }

    /// Returns the bytes written so far, in order.
    pub fn written(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(self.bytes_written());
        let mut rem = self.bytes_written();
        for region in self.regions.regions.iter() {
            if rem == 0 {
                break;
            }
            let count = cmp::min(rem, region.len);
            out.extend_from_slice(&self.mem[region.offset..region.offset + count]);
            rem -= count;
        }
        out
    }
}

impl io::Write for Writer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let mut rem = buf;
        let mut total = 0;
        let regions: SmallVec<[MemRegion; 2]> = self.regions.get_remaining_regions().collect();
        for region in regions {
            if rem.is_empty() {
                break;
            }

            let count = cmp::min(rem.len(), region.len);
            self.mem[region.offset..region.offset + count].copy_from_slice(&rem[..count]);
            rem = &rem[count..];
            total += count;
        }

        self.regions.consume(total);
        Ok(total)
    }

    fn flush(&mut self) -> io::Result<()> {
        // Nothing to flush since the writes go straight into the buffer.
        Ok(())
    }
}
