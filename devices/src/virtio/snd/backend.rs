// Copyright 2022 The ChromiumOS Authors
// Use of this source code is governed by a BSD-style license that can be
// found in the LICENSE file.

//! Host audio interface used by the PCM stream lifecycle.
//!
//! A prepared stream owns one backend voice. The voice is opened on PREPARE, switched on and off
//! by START and STOP, and closed on RELEASE, on a repeated PREPARE, or when the device goes away.

use std::error;
use std::fmt;

use crate::virtio::snd::constants::VIRTIO_SND_D_INPUT;
use crate::virtio::snd::constants::VIRTIO_SND_D_OUTPUT;

pub type BoxError = Box<dyn error::Error + Send + Sync>;

/// Direction of a PCM stream as seen from the guest.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Direction {
    /// Playback: the guest produces samples.
    Output,
    /// Capture: the guest consumes samples.
    Input,
}

impl Direction {
    /// Returns the VIRTIO_SND_D_* value of this direction.
    pub fn to_virtio(self) -> u8 {
        match self {
            Direction::Output => VIRTIO_SND_D_OUTPUT,
            Direction::Input => VIRTIO_SND_D_INPUT,
        }
    }

    /// HDA function node id advertised for streams of this direction.
    pub fn hda_fn_nid(self) -> u32 {
        match self {
            Direction::Output => 0,
            Direction::Input => 1,
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Direction::Output => write!(f, "output"),
            Direction::Input => write!(f, "input"),
        }
    }
}

/// Host-side sample format.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum AudioFormat {
    U8,
    S8,
    U16,
    S16,
    U32,
    S32,
    F32,
}

/// Settings a host voice is opened with.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct AudioSettings {
    pub nchannels: u8,
    pub format: AudioFormat,
    pub freq: u32,
    pub big_endian: bool,
}

/// Opaque identifier of a voice opened by an `AudioBackend`.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct VoiceHandle(pub u64);

/// The host audio subsystem that actually plays or captures samples.
///
/// Calls are synchronous and made with the stream table locked.
pub trait AudioBackend: Send {
    /// Opens a voice for a stream of `direction` with `settings`.
    fn open_voice(
        &mut self,
        direction: Direction,
        settings: &AudioSettings,
    ) -> Result<VoiceHandle, BoxError>;

    /// Closes a voice previously returned by `open_voice`.
    fn close_voice(&mut self, voice: VoiceHandle);

    /// Starts or stops sample flow on `voice`.
    fn set_running(&mut self, voice: VoiceHandle, running: bool);
}
