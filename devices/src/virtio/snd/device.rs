// Copyright 2021 The ChromiumOS Authors
// Use of this source code is governed by a BSD-style license that can be
// found in the LICENSE file.

use log::debug;
use log::trace;
use log::warn;
use remain::sorted;
use sync::Mutex;
use thiserror::Error as ThisError;

use crate::virtio::snd::backend::AudioBackend;
use crate::virtio::snd::config;
use crate::virtio::snd::config::DeviceConfig;
use crate::virtio::snd::constants::QUEUE_SIZES;
use crate::virtio::snd::control::ControlQueue;
use crate::virtio::snd::null_backend::create_null_backend;
use crate::virtio::snd::parameters::Parameters;
use crate::virtio::snd::parameters::StreamSourceBackend;
use crate::virtio::snd::pcm;
use crate::virtio::snd::pcm::PcmManager;
use crate::virtio::snd::stream_table::PcmParams;
use crate::virtio::snd::stream_table::StreamState;
use crate::virtio::ControlTransport;
use crate::virtio::DeviceType;
use crate::virtio::VirtioDevice;
use crate::virtio::VIRTIO_F_IN_ORDER;
use crate::virtio::VIRTIO_F_VERSION_1;

#[sorted]
#[derive(ThisError, Debug)]
pub enum Error {
    #[error("invalid device configuration: {0}")]
    Config(config::Error),
    #[error("failed to prepare default stream {0}: {1}")]
    PrepareDefaultStream(u32, pcm::Error),
    #[error("failed to set default parameters of stream {0}: {1}")]
    SetDefaultParams(u32, pcm::Error),
}

fn create_backend(backend: StreamSourceBackend) -> Box<dyn AudioBackend> {
    match backend {
        StreamSourceBackend::NULL => create_null_backend(),
    }
}

/// Virtio sound device.
///
/// The transport calls `handle_ctrl`, `handle_event` and `handle_xfer` when the guest notifies the
/// corresponding queue.
pub struct VirtioSnd {
    config: DeviceConfig,
    avail_features: u64,
    acked_features: u64,
    control: ControlQueue,
    pcm: Mutex<PcmManager>,
}

impl VirtioSnd {
    /// Creates a sound device with the audio backend named by `params`.
    pub fn new(base_features: u64, params: Parameters) -> Result<VirtioSnd, Error> {
        let backend = create_backend(params.backend);
        Self::with_backend(base_features, &params, backend)
    }

    /// Creates a sound device that plays and captures through `backend`.
    ///
    /// Every stream is given the default parameters and prepared before this returns; if any of
    /// that fails, the voices opened so far are closed and no device is created.
    pub fn with_backend(
        base_features: u64,
        params: &Parameters,
        backend: Box<dyn AudioBackend>,
    ) -> Result<VirtioSnd, Error> {
        let config = DeviceConfig::validate_and_apply(params.jacks, params.streams, params.chmaps)
            .map_err(Error::Config)?;

        let mut pcm = PcmManager::new(config.streams() as usize, backend);
        for stream_id in 0..config.streams() {
            pcm.set_params(stream_id, PcmParams::default())
                .map_err(|e| Error::SetDefaultParams(stream_id, e))?;
            pcm.prepare(stream_id)
                .map_err(|e| Error::PrepareDefaultStream(stream_id, e))?;
        }

        debug!(
            "virtio-snd: created with {} jacks, {} streams, {} chmaps",
            config.jacks(),
            config.streams(),
            config.chmaps()
        );

        Ok(VirtioSnd {
            config,
            avail_features: base_features | 1 << VIRTIO_F_VERSION_1 | 1 << VIRTIO_F_IN_ORDER,
            acked_features: 0,
            control: ControlQueue::new(),
            pcm: Mutex::new(pcm),
        })
    }

    /// Handles a notification of the control queue: queues every newly available request and
    /// answers pending requests in order.
    ///
    /// May be called again from within `transport`; the nested call only queues requests.
    pub fn handle_ctrl(&self, transport: &dyn ControlTransport) {
        self.control.enqueue_available(transport);
        self.control.drain(&self.pcm, transport);
    }

    /// Handles a notification of the event queue. The device never emits events.
    pub fn handle_event(&self) {
        trace!("virtio-snd: event queue notified");
    }

    /// Handles a notification of the tx or rx queue. Sample transfer is not implemented.
    pub fn handle_xfer(&self) {
        trace!("virtio-snd: transfer queue notified");
    }

    /// Number of control requests waiting to be answered.
    pub fn pending_requests(&self) -> usize {
        self.control.len()
    }

    /// Feature bits acknowledged by the driver.
    pub fn acked_features(&self) -> u64 {
        self.acked_features
    }

    /// Lifecycle state of `stream_id`, or `None` if no such stream exists.
    pub fn stream_state(&self, stream_id: u32) -> Option<StreamState> {
        self.pcm.lock().state(stream_id)
    }

    /// Parameters currently stored for `stream_id`.
    pub fn stream_params(&self, stream_id: u32) -> Option<PcmParams> {
        self.pcm.lock().params(stream_id)
    }
}

impl VirtioDevice for VirtioSnd {
    fn device_type(&self) -> DeviceType {
        DeviceType::Sound
    }

    fn queue_max_sizes(&self) -> &[u16] {
        QUEUE_SIZES
    }

    fn features(&self) -> u64 {
        self.avail_features
    }

    fn ack_features(&mut self, mut v: u64) {
        // Check if the guest is ACK'ing a feature that we didn't claim to have.
        let unrequested_features = v & !self.avail_features;
        if unrequested_features != 0 {
            warn!("virtio-snd got unknown feature ack: {:x}", v);

            // Don't count these features as acked.
            v &= !unrequested_features;
        }
        self.acked_features |= v;
    }

    fn read_config(&self, offset: u64, data: &mut [u8]) {
        self.config.read_config(offset, data)
    }

    fn write_config(&mut self, offset: u64, data: &[u8]) {
        self.config.write_config(offset, data)
    }

    fn reset(&mut self) -> anyhow::Result<()> {
        let dropped = self.control.clear();
        if dropped > 0 {
            debug!("virtio-snd: reset dropped {} pending control requests", dropped);
        }
        self.acked_features = 0;
        Ok(())
    }
}
