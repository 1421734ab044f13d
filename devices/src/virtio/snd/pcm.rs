// Copyright 2021 The ChromiumOS Authors
// Use of this source code is governed by a BSD-style license that can be
// found in the LICENSE file.

//! PCM stream lifecycle: parameter negotiation, voice setup and teardown.

use log::debug;
use remain::sorted;
use thiserror::Error as ThisError;

use crate::virtio::snd::backend::AudioBackend;
use crate::virtio::snd::backend::BoxError;
use crate::virtio::snd::common;
use crate::virtio::snd::common::audio_settings;
use crate::virtio::snd::common::from_virtio_frame_rate;
use crate::virtio::snd::common::from_virtio_sample_format;
use crate::virtio::snd::constants::StatusCode;
use crate::virtio::snd::constants::AUDIO_MAX_CHANNELS;
use crate::virtio::snd::layout::virtio_snd_pcm_info;
use crate::virtio::snd::stream_table::stream_direction;
use crate::virtio::snd::stream_table::PcmParams;
use crate::virtio::snd::stream_table::PcmStream;
use crate::virtio::snd::stream_table::StreamId;
use crate::virtio::snd::stream_table::StreamState;
use crate::virtio::snd::stream_table::StreamTable;

#[sorted]
#[derive(ThisError, Debug)]
pub enum Error {
    #[error("failed to open a host voice for stream {0}: {1}")]
    BackendOpen(u32, BoxError),
    #[error("streams {start_id}..{start_id}+{count} exceed the {streams} streams of the device")]
    InfoRangeOutOfBounds {
        start_id: u32,
        count: u32,
        streams: usize,
    },
    #[error("invalid stream id {0}")]
    InvalidStreamId(u32),
    #[error("stream {0} has no parameters set")]
    NoParams(u32),
    #[error("stream {0} is not prepared")]
    NotPrepared(u32),
    #[error("unsupported channel count {0}")]
    UnsupportedChannels(u8),
    #[error("unsupported format: {0}")]
    UnsupportedFormat(common::Error),
    #[error("unsupported rate: {0}")]
    UnsupportedRate(common::Error),
}

impl Error {
    /// Status reported to the guest for a request that failed with this error.
    pub fn status_code(&self) -> StatusCode {
        use Error::*;
        match self {
            BackendOpen(..) => StatusCode::IoErr,
            InfoRangeOutOfBounds { .. } | InvalidStreamId(_) | NoParams(_) | NotPrepared(_) => {
                StatusCode::BadMsg
            }
            UnsupportedChannels(_) | UnsupportedFormat(_) | UnsupportedRate(_) => {
                StatusCode::NotSupp
            }
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;

/// Applies guest PCM requests to the stream table and drives the host audio backend.
pub struct PcmManager {
    table: StreamTable,
    backend: Box<dyn AudioBackend>,
}

impl PcmManager {
    pub fn new(streams: usize, backend: Box<dyn AudioBackend>) -> Self {
        PcmManager {
            table: StreamTable::new(streams),
            backend,
        }
    }

    pub fn stream_count(&self) -> usize {
        self.table.len()
    }

    fn stream_id(&self, raw: u32) -> Result<StreamId> {
        self.table.stream_id(raw).ok_or(Error::InvalidStreamId(raw))
    }

    pub fn state(&self, stream_id: u32) -> Option<StreamState> {
        self.table.stream_id(stream_id).map(|id| self.table.state(id))
    }

    pub fn params(&self, stream_id: u32) -> Option<PcmParams> {
        self.table
            .stream_id(stream_id)
            .and_then(|id| self.table.params(id).copied())
    }

    pub fn stream(&self, stream_id: u32) -> Option<&PcmStream> {
        self.table
            .stream_id(stream_id)
            .and_then(|id| self.table.stream(id))
    }

    /// Validates `params` and stores them for `stream_id`, replacing any previous parameters.
    ///
    /// Nothing is stored if validation fails.
    pub fn set_params(&mut self, stream_id: u32, params: PcmParams) -> Result<()> {
        let id = self.stream_id(stream_id)?;

        if params.channels < 1 || params.channels > AUDIO_MAX_CHANNELS {
            return Err(Error::UnsupportedChannels(params.channels));
        }
        from_virtio_sample_format(params.format).map_err(Error::UnsupportedFormat)?;
        from_virtio_frame_rate(params.rate).map_err(Error::UnsupportedRate)?;

        debug!("virtio-snd: stream {} params set to {:?}", id, params);
        self.table.set_params(id, params);
        Ok(())
    }

    /// (Re)creates the stream bound to `stream_id` from its current parameters.
    pub fn prepare(&mut self, stream_id: u32) -> Result<()> {
        let id = self.stream_id(stream_id)?;
        let params = *self.table.params(id).ok_or(Error::NoParams(stream_id))?;

        if let Some(old) = self.table.take_stream(id) {
            self.backend.close_voice(old.voice);
        }

        let settings = audio_settings(params.channels, params.format, params.rate).map_err(
            |e| match e {
                common::Error::UnsupportedVirtioFrameRate(_) => Error::UnsupportedRate(e),
                common::Error::UnsupportedVirtioPcmFormat(_) => Error::UnsupportedFormat(e),
            },
        )?;
        let direction = stream_direction(id, self.table.len());
        let voice = self
            .backend
            .open_voice(direction, &settings)
            .map_err(|e| Error::BackendOpen(stream_id, e))?;

        debug!(
            "virtio-snd: stream {} prepared as {} voice {}",
            id, direction, voice.0
        );
        self.table
            .insert_stream(id, PcmStream::new(direction, &params, settings, voice));
        Ok(())
    }

    fn set_running(&mut self, stream_id: u32, running: bool) -> Result<()> {
        let id = self.stream_id(stream_id)?;
        let stream = self
            .table
            .stream_mut(id)
            .ok_or(Error::NotPrepared(stream_id))?;
        self.backend.set_running(stream.voice, running);
        stream.state = if running {
            StreamState::Started
        } else {
            StreamState::Stopped
        };
        debug!("virtio-snd: stream {} {:?}", id, stream.state);
        Ok(())
    }

    pub fn start(&mut self, stream_id: u32) -> Result<()> {
        self.set_running(stream_id, true)
    }

    pub fn stop(&mut self, stream_id: u32) -> Result<()> {
        self.set_running(stream_id, false)
    }

    /// Destroys the stream bound to `stream_id`. Its parameters are kept so it can be prepared
    /// again.
    pub fn release(&mut self, stream_id: u32) -> Result<()> {
        let id = self.stream_id(stream_id)?;
        let stream = self
            .table
            .take_stream(id)
            .ok_or(Error::NotPrepared(stream_id))?;
        self.backend.close_voice(stream.voice);
        debug!("virtio-snd: stream {} released", id);
        Ok(())
    }

    /// Returns the info records of streams `start_id..start_id + count`.
    ///
    /// Fails without returning any record if the range leaves the table or a stream in it is not
    /// prepared.
    pub fn pcm_info(&self, start_id: u32, count: u32) -> Result<Vec<virtio_snd_pcm_info>> {
        let in_bounds = start_id
            .checked_add(count)
            .is_some_and(|end| end as usize <= self.table.len());
        if !in_bounds {
            return Err(Error::InfoRangeOutOfBounds {
                start_id,
                count,
                streams: self.table.len(),
            });
        }

        (start_id..start_id + count)
            .map(|raw| {
                let id = self.stream_id(raw)?;
                self.table
                    .stream(id)
                    .map(|stream| stream.info)
                    .ok_or(Error::NotPrepared(raw))
            })
            .collect()
    }
}

impl Drop for PcmManager {
    fn drop(&mut self) {
        for stream in self.table.take_all_streams() {
            self.backend.close_voice(stream.voice);
        }
    }
}
