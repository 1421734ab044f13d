// Copyright 2021 The ChromiumOS Authors
// Use of this source code is governed by a BSD-style license that can be
// found in the LICENSE file.

use remain::sorted;
use thiserror::Error as ThisError;

use crate::virtio::snd::backend::AudioFormat;
use crate::virtio::snd::backend::AudioSettings;
use crate::virtio::snd::constants::*;

#[sorted]
#[derive(ThisError, Debug, PartialEq, Eq)]
pub enum Error {
    #[error("Unsupported virtio frame rate: {0}")]
    UnsupportedVirtioFrameRate(u8),
    #[error("Unsupported virtio pcm format: {0}")]
    UnsupportedVirtioPcmFormat(u8),
}

type Result<T> = std::result::Result<T, Error>;

/// Converts VIRTIO_SND_PCM_RATE_* enum to frame rate
pub fn from_virtio_frame_rate(virtio_frame_rate: u8) -> Result<u32> {
    Ok(match virtio_frame_rate {
        VIRTIO_SND_PCM_RATE_5512 => 5512u32,
        VIRTIO_SND_PCM_RATE_8000 => 8000u32,
        VIRTIO_SND_PCM_RATE_11025 => 11025u32,
        VIRTIO_SND_PCM_RATE_16000 => 16000u32,
        VIRTIO_SND_PCM_RATE_22050 => 22050u32,
        VIRTIO_SND_PCM_RATE_32000 => 32000u32,
        VIRTIO_SND_PCM_RATE_44100 => 44100u32,
        VIRTIO_SND_PCM_RATE_48000 => 48000u32,
        VIRTIO_SND_PCM_RATE_64000 => 64000u32,
        VIRTIO_SND_PCM_RATE_88200 => 88200u32,
        VIRTIO_SND_PCM_RATE_96000 => 96000u32,
        VIRTIO_SND_PCM_RATE_176400 => 176400u32,
        VIRTIO_SND_PCM_RATE_192000 => 192000u32,
        VIRTIO_SND_PCM_RATE_384000 => 384000u32,
        _ => {
            return Err(Error::UnsupportedVirtioFrameRate(virtio_frame_rate));
        }
    })
}

/// Converts VIRTIO_SND_PCM_FMT_* enum to AudioFormat
pub fn from_virtio_sample_format(virtio_pcm_format: u8) -> Result<AudioFormat> {
    Ok(match virtio_pcm_format {
        VIRTIO_SND_PCM_FMT_S8 => AudioFormat::S8,
        VIRTIO_SND_PCM_FMT_U8 => AudioFormat::U8,
        VIRTIO_SND_PCM_FMT_S16 => AudioFormat::S16,
        VIRTIO_SND_PCM_FMT_U16 => AudioFormat::U16,
        VIRTIO_SND_PCM_FMT_S32 => AudioFormat::S32,
        VIRTIO_SND_PCM_FMT_U32 => AudioFormat::U32,
        VIRTIO_SND_PCM_FMT_FLOAT => AudioFormat::F32,
        _ => {
            return Err(Error::UnsupportedVirtioPcmFormat(virtio_pcm_format));
        }
    })
}

/// Builds the host voice settings for a stream negotiated with `channels`, `format` and `rate`.
///
/// Samples are exchanged in host byte order.
pub fn audio_settings(channels: u8, format: u8, rate: u8) -> Result<AudioSettings> {
    Ok(AudioSettings {
        nchannels: channels,
        format: from_virtio_sample_format(format)?,
        freq: from_virtio_frame_rate(rate)?,
        big_endian: cfg!(target_endian = "big"),
    })
}

/// Get the name of VIRTIO_SND_R_* enums
pub fn get_virtio_snd_r_cmd_name(cmd_code: u32) -> &'static str {
    match cmd_code {
        VIRTIO_SND_R_JACK_INFO => "VIRTIO_SND_R_JACK_INFO",
        VIRTIO_SND_R_JACK_REMAP => "VIRTIO_SND_R_JACK_REMAP",
        VIRTIO_SND_R_PCM_INFO => "VIRTIO_SND_R_PCM_INFO",
        VIRTIO_SND_R_PCM_SET_PARAMS => "VIRTIO_SND_R_PCM_SET_PARAMS",
        VIRTIO_SND_R_PCM_PREPARE => "VIRTIO_SND_R_PCM_PREPARE",
        VIRTIO_SND_R_PCM_START => "VIRTIO_SND_R_PCM_START",
        VIRTIO_SND_R_PCM_STOP => "VIRTIO_SND_R_PCM_STOP",
        VIRTIO_SND_R_PCM_RELEASE => "VIRTIO_SND_R_PCM_RELEASE",
        VIRTIO_SND_R_CHMAP_INFO => "VIRTIO_SND_R_CHMAP_INFO",
        _ => "UNKNOWN",
    }
}
