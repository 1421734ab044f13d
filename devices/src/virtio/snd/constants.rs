// Copyright 2020 The ChromiumOS Authors
// Use of this source code is governed by a BSD-style license that can be
// found in the LICENSE file.

/* jack control request types */
pub const VIRTIO_SND_R_JACK_INFO: u32 = 1;
pub const VIRTIO_SND_R_JACK_REMAP: u32 = 2;

/* PCM control request types */
pub const VIRTIO_SND_R_PCM_INFO: u32 = 0x0100;
pub const VIRTIO_SND_R_PCM_SET_PARAMS: u32 = 0x0101;
pub const VIRTIO_SND_R_PCM_PREPARE: u32 = 0x0102;
pub const VIRTIO_SND_R_PCM_RELEASE: u32 = 0x0103;
pub const VIRTIO_SND_R_PCM_START: u32 = 0x0104;
pub const VIRTIO_SND_R_PCM_STOP: u32 = 0x0105;

/* channel map control request types */
pub const VIRTIO_SND_R_CHMAP_INFO: u32 = 0x0200;

/* common status codes */
pub const VIRTIO_SND_S_OK: u32 = 0x8000;
pub const VIRTIO_SND_S_BAD_MSG: u32 = 0x8001;
pub const VIRTIO_SND_S_NOT_SUPP: u32 = 0x8002;
pub const VIRTIO_SND_S_IO_ERR: u32 = 0x8003;

/// Status written in the header of every control queue reply.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[repr(u32)]
pub enum StatusCode {
    Ok = VIRTIO_SND_S_OK,
    BadMsg = VIRTIO_SND_S_BAD_MSG,
    NotSupp = VIRTIO_SND_S_NOT_SUPP,
    IoErr = VIRTIO_SND_S_IO_ERR,
}

/* stream direction */
pub const VIRTIO_SND_D_OUTPUT: u8 = 0;
pub const VIRTIO_SND_D_INPUT: u8 = 1;

/* supported PCM sample formats */
pub const VIRTIO_SND_PCM_FMT_S8: u8 = 3;
pub const VIRTIO_SND_PCM_FMT_U8: u8 = 4;
pub const VIRTIO_SND_PCM_FMT_S16: u8 = 5;
pub const VIRTIO_SND_PCM_FMT_U16: u8 = 6;
pub const VIRTIO_SND_PCM_FMT_S32: u8 = 17;
pub const VIRTIO_SND_PCM_FMT_U32: u8 = 18;
pub const VIRTIO_SND_PCM_FMT_FLOAT: u8 = 19;

/* supported PCM frame rates */
pub const VIRTIO_SND_PCM_RATE_5512: u8 = 0;
pub const VIRTIO_SND_PCM_RATE_8000: u8 = 1;
pub const VIRTIO_SND_PCM_RATE_11025: u8 = 2;
pub const VIRTIO_SND_PCM_RATE_16000: u8 = 3;
pub const VIRTIO_SND_PCM_RATE_22050: u8 = 4;
pub const VIRTIO_SND_PCM_RATE_32000: u8 = 5;
pub const VIRTIO_SND_PCM_RATE_44100: u8 = 6;
pub const VIRTIO_SND_PCM_RATE_48000: u8 = 7;
pub const VIRTIO_SND_PCM_RATE_64000: u8 = 8;
pub const VIRTIO_SND_PCM_RATE_88200: u8 = 9;
pub const VIRTIO_SND_PCM_RATE_96000: u8 = 10;
pub const VIRTIO_SND_PCM_RATE_176400: u8 = 11;
pub const VIRTIO_SND_PCM_RATE_192000: u8 = 12;
pub const VIRTIO_SND_PCM_RATE_384000: u8 = 13;

/* standard channel position definition */
pub const VIRTIO_SND_CHMAP_FL: u8 = 3; /* front left */
pub const VIRTIO_SND_CHMAP_FR: u8 = 4; /* front right */

pub const VIRTIO_SND_CHMAP_MAX_SIZE: usize = 18;

/// Bitmask of the sample formats advertised in every PCM info record.
pub const SUPPORTED_FORMATS: u64 = 1 << VIRTIO_SND_PCM_FMT_S8
    | 1 << VIRTIO_SND_PCM_FMT_U8
    | 1 << VIRTIO_SND_PCM_FMT_S16
    | 1 << VIRTIO_SND_PCM_FMT_U16
    | 1 << VIRTIO_SND_PCM_FMT_S32
    | 1 << VIRTIO_SND_PCM_FMT_U32
    | 1 << VIRTIO_SND_PCM_FMT_FLOAT;

/// Bitmask of the frame rates advertised in every PCM info record.
pub const SUPPORTED_RATES: u64 = 1 << VIRTIO_SND_PCM_RATE_5512
    | 1 << VIRTIO_SND_PCM_RATE_8000
    | 1 << VIRTIO_SND_PCM_RATE_11025
    | 1 << VIRTIO_SND_PCM_RATE_16000
    | 1 << VIRTIO_SND_PCM_RATE_22050
    | 1 << VIRTIO_SND_PCM_RATE_32000
    | 1 << VIRTIO_SND_PCM_RATE_44100
    | 1 << VIRTIO_SND_PCM_RATE_48000
    | 1 << VIRTIO_SND_PCM_RATE_64000
    | 1 << VIRTIO_SND_PCM_RATE_88200
    | 1 << VIRTIO_SND_PCM_RATE_96000
    | 1 << VIRTIO_SND_PCM_RATE_176400
    | 1 << VIRTIO_SND_PCM_RATE_192000
    | 1 << VIRTIO_SND_PCM_RATE_384000;

/// Highest channel count a stream may negotiate.
pub const AUDIO_MAX_CHANNELS: u8 = 16;

/* device configuration limits */
pub const VIRTIO_SND_MAX_JACKS: u32 = 8;
pub const VIRTIO_SND_MIN_STREAMS: u32 = 1;
pub const VIRTIO_SND_MAX_STREAMS: u32 = 10;
pub const VIRTIO_SND_MAX_CHMAPS: u32 = VIRTIO_SND_CHMAP_MAX_SIZE as u32;

/* default stream parameters applied when the device is created */
pub const DEFAULT_BUFFER_BYTES: u32 = 8192;
pub const DEFAULT_PERIOD_BYTES: u32 = 4096;
pub const DEFAULT_CHANNELS: u8 = 2;
pub const DEFAULT_FORMAT: u8 = VIRTIO_SND_PCM_FMT_S16;
pub const DEFAULT_RATE: u8 = VIRTIO_SND_PCM_RATE_44100;

// control, event, tx, rx
pub const QUEUE_SIZES: &[u16] = &[64, 64, 64, 64];
