// Copyright 2021 The ChromiumOS Authors
// Use of this source code is governed by a BSD-style license that can be
// found in the LICENSE file.

//! Per-stream state of the PCM streams the device exposes.
//!
//! The table is sized once when the device is created; a `StreamId` can only be obtained from the
//! table and is therefore always a valid index into it.

use std::fmt;

use data_model::Le32;
use data_model::Le64;

use crate::virtio::snd::backend::AudioSettings;
use crate::virtio::snd::backend::Direction;
use crate::virtio::snd::backend::VoiceHandle;
use crate::virtio::snd::constants::*;
use crate::virtio::snd::layout::virtio_snd_info;
use crate::virtio::snd::layout::virtio_snd_pcm_info;
use crate::virtio::snd::layout::virtio_snd_pcm_set_params;

/// Index of a stream known to exist in its `StreamTable`.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub struct StreamId(u32);

impl StreamId {
    fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for StreamId {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Lifecycle state of a stream.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum StreamState {
    /// No parameters were ever set.
    New,
    /// Parameters are set but no host voice exists.
    ParamsSet,
    Prepared,
    Started,
    Stopped,
}

/// Parameters negotiated with VIRTIO_SND_R_PCM_SET_PARAMS.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct PcmParams {
    pub features: u32,
    pub buffer_bytes: u32,
    pub period_bytes: u32,
    pub channels: u8,
    pub format: u8,
    pub rate: u8,
}

impl Default for PcmParams {
    fn default() -> Self {
        PcmParams {
            features: 0,
            buffer_bytes: DEFAULT_BUFFER_BYTES,
            period_bytes: DEFAULT_PERIOD_BYTES,
            channels: DEFAULT_CHANNELS,
            format: DEFAULT_FORMAT,
            rate: DEFAULT_RATE,
        }
    }
}

impl From<&virtio_snd_pcm_set_params> for PcmParams {
    fn from(req: &virtio_snd_pcm_set_params) -> Self {
        PcmParams {
            features: req.features.to_native(),
            buffer_bytes: req.buffer_bytes.to_native(),
            period_bytes: req.period_bytes.to_native(),
            channels: req.channels,
            format: req.format,
            rate: req.rate,
        }
    }
}

/// A prepared stream bound to a host voice.
#[derive(Clone, Debug)]
pub struct PcmStream {
    pub direction: Direction,
    pub info: virtio_snd_pcm_info,
    pub buffer_bytes: u32,
    pub period_bytes: u32,
    pub positions: [u8; VIRTIO_SND_CHMAP_MAX_SIZE],
    pub settings: AudioSettings,
    pub voice: VoiceHandle,
    pub state: StreamState,
}

impl PcmStream {
    pub fn new(
        direction: Direction,
        params: &PcmParams,
        settings: AudioSettings,
        voice: VoiceHandle,
    ) -> Self {
        let mut positions = [0u8; VIRTIO_SND_CHMAP_MAX_SIZE];
        positions[0] = VIRTIO_SND_CHMAP_FL;
        positions[1] = VIRTIO_SND_CHMAP_FR;

        PcmStream {
            direction,
            info: virtio_snd_pcm_info {
                hdr: virtio_snd_info {
                    hda_fn_nid: Le32::from(direction.hda_fn_nid()),
                },
                features: Le32::from(0),
                formats: Le64::from(SUPPORTED_FORMATS),
                rates: Le64::from(SUPPORTED_RATES),
                direction: direction.to_virtio(),
                channels_min: 1,
                channels_max: AUDIO_MAX_CHANNELS,
                padding: [0; 5],
            },
            buffer_bytes: params.buffer_bytes,
            period_bytes: params.period_bytes,
            positions,
            settings,
            voice,
            state: StreamState::Prepared,
        }
    }
}

/// Direction of stream `id` on a device exposing `stream_count` streams.
///
/// The first half of the streams, rounded up, play back; the rest capture.
pub fn stream_direction(id: StreamId, stream_count: usize) -> Direction {
    if id.index() < stream_count / 2 + stream_count % 2 {
        Direction::Output
    } else {
        Direction::Input
    }
}

#[derive(Default)]
struct StreamSlot {
    params: Option<PcmParams>,
    stream: Option<PcmStream>,
}

pub(crate) struct StreamTable {
    slots: Box<[StreamSlot]>,
}

impl StreamTable {
    pub fn new(len: usize) -> Self {
        StreamTable {
            slots: (0..len).map(|_| StreamSlot::default()).collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    /// Validates a guest-provided stream id.
    pub fn stream_id(&self, raw: u32) -> Option<StreamId> {
        if (raw as usize) < self.slots.len() {
            Some(StreamId(raw))
        } else {
            None
        }
    }

    pub fn params(&self, id: StreamId) -> Option<&PcmParams> {
        self.slots[id.index()].params.as_ref()
    }

    /// Replaces the parameters of `id` wholesale.
    pub fn set_params(&mut self, id: StreamId, params: PcmParams) {
        self.slots[id.index()].params = Some(params);
    }

    pub fn stream(&self, id: StreamId) -> Option<&PcmStream> {
        self.slots[id.index()].stream.as_ref()
    }

    pub fn stream_mut(&mut self, id: StreamId) -> Option<&mut PcmStream> {
        self.slots[id.index()].stream.as_mut()
    }

    /// Binds `stream` to `id`. Any stream bound before must have been taken out first.
    pub fn insert_stream(&mut self, id: StreamId, stream: PcmStream) {
        let slot = &mut self.slots[id.index()];
        debug_assert!(slot.stream.is_none(), "stream {} is still bound", id);
        slot.stream = Some(stream);
    }

    pub fn take_stream(&mut self, id: StreamId) -> Option<PcmStream> {
        self.slots[id.index()].stream.take()
    }

    /// Removes every stream, leaving parameters in place.
    pub fn take_all_streams(&mut self) -> Vec<PcmStream> {
        self.slots
            .iter_mut()
            .filter_map(|slot| slot.stream.take())
            .collect()
    }

    pub fn state(&self, id: StreamId) -> StreamState {
        let slot = &self.slots[id.index()];
        match (&slot.params, &slot.stream) {
            (_, Some(stream)) => stream.state,
            (Some(_), None) => StreamState::ParamsSet,
            (None, None) => StreamState::New,
        }
    }
}
