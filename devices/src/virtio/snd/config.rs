// Copyright 2022 The ChromiumOS Authors
// Use of this source code is governed by a BSD-style license that can be
// found in the LICENSE file.

use data_model::Le32;
use log::warn;
use remain::sorted;
use thiserror::Error as ThisError;
use zerocopy::IntoBytes;

use crate::virtio::copy_config;
use crate::virtio::snd::constants::*;
use crate::virtio::snd::layout::virtio_snd_config;

#[sorted]
#[derive(ThisError, Debug, PartialEq, Eq)]
pub enum Error {
    #[error("invalid number of channel maps {0}, must be at most 18")]
    InvalidChmaps(u32),
    #[error("invalid number of jacks {0}, must be at most 8")]
    InvalidJacks(u32),
    #[error("invalid number of streams {0}, must be between 1 and 10")]
    InvalidStreams(u32),
}

/// The guest-visible device configuration space.
pub struct DeviceConfig {
    config: virtio_snd_config,
}

impl DeviceConfig {
    /// Checks the device-wide counts and builds the configuration space holding them.
    pub fn validate_and_apply(jacks: u32, streams: u32, chmaps: u32) -> Result<Self, Error> {
        if jacks > VIRTIO_SND_MAX_JACKS {
            return Err(Error::InvalidJacks(jacks));
        }
        if !(VIRTIO_SND_MIN_STREAMS..=VIRTIO_SND_MAX_STREAMS).contains(&streams) {
            return Err(Error::InvalidStreams(streams));
        }
        if chmaps > VIRTIO_SND_MAX_CHMAPS {
            return Err(Error::InvalidChmaps(chmaps));
        }

        Ok(DeviceConfig {
            config: virtio_snd_config {
                jacks: Le32::from(jacks),
                streams: Le32::from(streams),
                chmaps: Le32::from(chmaps),
            },
        })
    }

    pub fn jacks(&self) -> u32 {
        self.config.jacks.to_native()
    }

    pub fn streams(&self) -> u32 {
        self.config.streams.to_native()
    }

    pub fn chmaps(&self) -> u32 {
        self.config.chmaps.to_native()
    }

    pub fn read_config(&self, offset: u64, data: &mut [u8]) {
        copy_config(data, 0, self.config.as_bytes(), offset);
    }

    /// Overwrites the configuration space. The new counts are not validated and do not resize
    /// the stream table.
    pub fn write_config(&mut self, offset: u64, data: &[u8]) {
        warn!(
            "virtio-snd: driver wrote {} bytes to config space at offset {}",
            data.len(),
            offset
        );
        copy_config(self.config.as_mut_bytes(), offset, data, 0);
    }
}
