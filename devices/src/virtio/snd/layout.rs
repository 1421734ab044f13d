// Copyright 2020 The ChromiumOS Authors
// Use of this source code is governed by a BSD-style license that can be
// found in the LICENSE file.

#![allow(non_camel_case_types)]

use data_model::Le32;
use data_model::Le64;
use static_assertions::const_assert_eq;
use zerocopy::FromBytes;
use zerocopy::Immutable;
use zerocopy::IntoBytes;
use zerocopy::KnownLayout;

use crate::virtio::snd::constants::StatusCode;

#[derive(
    Copy, Clone, Default, Debug, PartialEq, Eq, FromBytes, Immutable, IntoBytes, KnownLayout,
)]
#[repr(C)]
pub struct virtio_snd_hdr {
    pub code: Le32,
}

impl virtio_snd_hdr {
    pub fn from_status(status: StatusCode) -> Self {
        virtio_snd_hdr {
            code: Le32::from(status as u32),
        }
    }
}

#[derive(
    Copy, Clone, Default, Debug, PartialEq, Eq, FromBytes, Immutable, IntoBytes, KnownLayout,
)]
#[repr(C)]
pub struct virtio_snd_query_info {
    pub hdr: virtio_snd_hdr,
    pub start_id: Le32,
    pub count: Le32,
    pub size: Le32,
}

#[derive(
    Copy, Clone, Default, Debug, PartialEq, Eq, FromBytes, Immutable, IntoBytes, KnownLayout,
)]
#[repr(C)]
pub struct virtio_snd_info {
    pub hda_fn_nid: Le32,
}

#[derive(
    Copy, Clone, Default, Debug, PartialEq, Eq, FromBytes, Immutable, IntoBytes, KnownLayout,
)]
#[repr(C)]
pub struct virtio_snd_pcm_hdr {
    pub hdr: virtio_snd_hdr,
    pub stream_id: Le32,
}

#[derive(
    Copy, Clone, Default, Debug, PartialEq, Eq, FromBytes, Immutable, IntoBytes, KnownLayout,
)]
#[repr(C)]
pub struct virtio_snd_pcm_set_params {
    pub hdr: virtio_snd_pcm_hdr,
    pub buffer_bytes: Le32,
    pub period_bytes: Le32,
    pub features: Le32,
    pub channels: u8,
    pub format: u8,
    pub rate: u8,
    pub padding: u8,
}

#[derive(
    Copy, Clone, Default, Debug, PartialEq, Eq, FromBytes, Immutable, IntoBytes, KnownLayout,
)]
#[repr(C)]
pub struct virtio_snd_pcm_info {
    pub hdr: virtio_snd_info,
    pub features: Le32, /* 1 << VIRTIO_SND_PCM_F_XXX */
    pub formats: Le64,  /* 1 << VIRTIO_SND_PCM_FMT_XXX */
    pub rates: Le64,    /* 1 << VIRTIO_SND_PCM_RATE_XXX */
    pub direction: u8,
    pub channels_min: u8,
    pub channels_max: u8,

    pub padding: [u8; 5],
}

#[derive(
    Copy, Clone, Default, Debug, PartialEq, Eq, FromBytes, Immutable, IntoBytes, KnownLayout,
)]
#[repr(C)]
pub struct virtio_snd_config {
    pub jacks: Le32,
    pub streams: Le32,
    pub chmaps: Le32,
}

const_assert_eq!(std::mem::size_of::<virtio_snd_hdr>(), 4);
const_assert_eq!(std::mem::size_of::<virtio_snd_pcm_hdr>(), 8);
const_assert_eq!(std::mem::size_of::<virtio_snd_query_info>(), 16);
const_assert_eq!(std::mem::size_of::<virtio_snd_pcm_set_params>(), 24);
const_assert_eq!(std::mem::size_of::<virtio_snd_pcm_info>(), 32);
const_assert_eq!(std::mem::size_of::<virtio_snd_config>(), 12);
