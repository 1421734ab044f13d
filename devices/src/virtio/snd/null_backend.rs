// Copyright 2022 The ChromiumOS Authors
// Use of this source code is governed by a BSD-style license that can be
// found in the LICENSE file.

use std::collections::BTreeMap;

use log::debug;
use log::warn;

use crate::virtio::snd::backend::AudioBackend;
use crate::virtio::snd::backend::AudioSettings;
use crate::virtio::snd::backend::BoxError;
use crate::virtio::snd::backend::Direction;
use crate::virtio::snd::backend::VoiceHandle;

/// An audio backend that accepts every voice and discards all samples.
#[derive(Default)]
pub struct NullBackend {
    next_voice: u64,
    // open voices and whether they are running
    voices: BTreeMap<VoiceHandle, bool>,
}

impl NullBackend {
    pub fn new() -> Self {
        Default::default()
    }

    /// Number of voices currently open.
    pub fn open_voices(&self) -> usize {
        self.voices.len()
    }
}

impl AudioBackend for NullBackend {
    fn open_voice(
        &mut self,
        direction: Direction,
        settings: &AudioSettings,
    ) -> Result<VoiceHandle, BoxError> {
        let voice = VoiceHandle(self.next_voice);
        self.next_voice += 1;
        self.voices.insert(voice, false);
        debug!(
            "null audio: opened {} voice {} ({} ch, {:?}, {} Hz)",
            direction, voice.0, settings.nchannels, settings.format, settings.freq
        );
        Ok(voice)
    }

    fn close_voice(&mut self, voice: VoiceHandle) {
        if self.voices.remove(&voice).is_none() {
            warn!("null audio: close of unknown voice {}", voice.0);
        }
    }

    fn set_running(&mut self, voice: VoiceHandle, running: bool) {
        match self.voices.get_mut(&voice) {
            Some(state) => *state = running,
            None => warn!("null audio: set_running on unknown voice {}", voice.0),
        }
    }
}

pub(crate) fn create_null_backend() -> Box<dyn AudioBackend> {
    Box::new(NullBackend::new())
}
