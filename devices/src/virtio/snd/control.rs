// Copyright 2021 The ChromiumOS Authors
// Use of this source code is governed by a BSD-style license that can be
// found in the LICENSE file.

//! The control queue: pending request bookkeeping, serialized draining and request dispatch.
//!
//! Requests are answered strictly in the order the guest made them available. A single draining
//! pass runs at a time; a notification that arrives while a pass is running (for example from a
//! transport or backend callback) only appends to the pending queue and returns, and the running
//! pass picks the new requests up.

use std::collections::VecDeque;
use std::mem::size_of;
use std::sync::atomic::AtomicBool;
use std::sync::atomic::Ordering;

use data_model::Le32;
use enumn::N;
use log::error;
use log::warn;
use remain::sorted;
use sync::Mutex;
use thiserror::Error as ThisError;

use crate::virtio::snd::codec;
use crate::virtio::snd::codec::decode_at;
use crate::virtio::snd::codec::decode_header;
use crate::virtio::snd::codec::encode_response;
use crate::virtio::snd::common::get_virtio_snd_r_cmd_name;
use crate::virtio::snd::constants::*;
use crate::virtio::snd::layout::virtio_snd_hdr;
use crate::virtio::snd::layout::virtio_snd_pcm_hdr;
use crate::virtio::snd::layout::virtio_snd_pcm_info;
use crate::virtio::snd::layout::virtio_snd_pcm_set_params;
use crate::virtio::snd::layout::virtio_snd_query_info;
use crate::virtio::snd::pcm;
use crate::virtio::snd::pcm::PcmManager;
use crate::virtio::snd::stream_table::PcmParams;
use crate::virtio::ControlTransport;
use crate::virtio::DescriptorChain;

/// Control request codes understood by the device.
#[derive(Copy, Clone, Debug, PartialEq, Eq, N)]
#[repr(u32)]
pub enum ControlRequest {
    JackInfo = VIRTIO_SND_R_JACK_INFO,
    JackRemap = VIRTIO_SND_R_JACK_REMAP,
    PcmInfo = VIRTIO_SND_R_PCM_INFO,
    PcmSetParams = VIRTIO_SND_R_PCM_SET_PARAMS,
    PcmPrepare = VIRTIO_SND_R_PCM_PREPARE,
    PcmRelease = VIRTIO_SND_R_PCM_RELEASE,
    PcmStart = VIRTIO_SND_R_PCM_START,
    PcmStop = VIRTIO_SND_R_PCM_STOP,
    ChmapInfo = VIRTIO_SND_R_CHMAP_INFO,
}

#[sorted]
#[derive(ThisError, Debug)]
pub enum Error {
    #[error("malformed request: {0}")]
    Codec(codec::Error),
    #[error("PCM_INFO reply needs {needed} bytes but the guest provided {available}")]
    InfoReplyTooSmall { needed: usize, available: usize },
    #[error("{0}")]
    Pcm(pcm::Error),
    #[error("unknown request code {0:#x}")]
    UnknownRequest(u32),
    #[error("{0:?} is not supported")]
    Unsupported(ControlRequest),
}

impl Error {
    pub fn status_code(&self) -> StatusCode {
        match self {
            Error::Codec(_) | Error::InfoReplyTooSmall { .. } | Error::UnknownRequest(_) => {
                StatusCode::BadMsg
            }
            Error::Pcm(e) => e.status_code(),
            Error::Unsupported(_) => StatusCode::NotSupp,
        }
    }
}

type Result<T> = std::result::Result<T, Error>;

/// Runs the request held by `chain` against `pcm`.
///
/// Returns the records that follow the status header in a successful reply.
pub fn dispatch(pcm: &mut PcmManager, chain: &DescriptorChain) -> Result<Vec<virtio_snd_pcm_info>> {
    let reader = &chain.reader;
    let code = decode_header(reader).map_err(Error::Codec)?;
    let request = ControlRequest::n(code).ok_or(Error::UnknownRequest(code))?;

    match request {
        ControlRequest::JackInfo | ControlRequest::JackRemap | ControlRequest::ChmapInfo => {
            Err(Error::Unsupported(request))
        }
        ControlRequest::PcmInfo => {
            let query: virtio_snd_query_info = decode_at(reader, 0).map_err(Error::Codec)?;
            let start_id = query.start_id.to_native();
            let count = query.count.to_native();
            let size = query.size.to_native();
            if size as usize != size_of::<virtio_snd_pcm_info>() {
                warn!(
                    "virtio-snd: PCM_INFO record size {} differs from {}",
                    size,
                    size_of::<virtio_snd_pcm_info>()
                );
            }

            let available = chain.writer.available_bytes();
            let needed = (count as usize)
                .checked_mul(size_of::<virtio_snd_pcm_info>())
                .and_then(|n| n.checked_add(size_of::<virtio_snd_hdr>()))
                .unwrap_or(usize::MAX);
            if needed > available {
                return Err(Error::InfoReplyTooSmall { needed, available });
            }

            pcm.pcm_info(start_id, count).map_err(Error::Pcm)
        }
        ControlRequest::PcmSetParams => {
            let req: virtio_snd_pcm_set_params = decode_at(reader, 0).map_err(Error::Codec)?;
            pcm.set_params(req.hdr.stream_id.to_native(), PcmParams::from(&req))
                .map_err(Error::Pcm)?;
            Ok(Vec::new())
        }
        ControlRequest::PcmPrepare | ControlRequest::PcmRelease => {
            let stream_id: Le32 =
                decode_at(reader, size_of::<virtio_snd_hdr>()).map_err(Error::Codec)?;
            let stream_id = stream_id.to_native();
            let result = if request == ControlRequest::PcmPrepare {
                pcm.prepare(stream_id)
            } else {
                pcm.release(stream_id)
            };
            result.map_err(Error::Pcm)?;
            Ok(Vec::new())
        }
        ControlRequest::PcmStart | ControlRequest::PcmStop => {
            let hdr: virtio_snd_pcm_hdr = decode_at(reader, 0).map_err(Error::Codec)?;
            let stream_id = hdr.stream_id.to_native();
            let result = if request == ControlRequest::PcmStart {
                pcm.start(stream_id)
            } else {
                pcm.stop(stream_id)
            };
            result.map_err(Error::Pcm)?;
            Ok(Vec::new())
        }
    }
}

/// Pending control requests and the guard that serializes their processing.
pub struct ControlQueue {
    pending: Mutex<VecDeque<DescriptorChain>>,
    processing: AtomicBool,
}

impl ControlQueue {
    pub fn new() -> Self {
        ControlQueue {
            pending: Mutex::new(VecDeque::new()),
            processing: AtomicBool::new(false),
        }
    }

    /// Number of requests waiting to be answered.
    pub fn len(&self) -> usize {
        self.pending.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.lock().is_empty()
    }

    /// Moves every newly available request from `transport` to the back of the pending queue.
    ///
    /// Returns the number of requests queued.
    pub fn enqueue_available(&self, transport: &dyn ControlTransport) -> usize {
        let available = transport.pop_available();
        let mut pending = self.pending.lock();
        let mut queued = 0;
        for chain in available {
            if pending.iter().any(|c| c.index() == chain.index()) {
                error!(
                    "virtio-snd: descriptor {} made available while still pending, ignoring",
                    chain.index()
                );
                continue;
            }
            pending.push_back(chain);
            queued += 1;
        }
        queued
    }

    fn pop_front(&self) -> Option<DescriptorChain> {
        self.pending.lock().pop_front()
    }

    /// Answers pending requests in order until none are left.
    ///
    /// Returns immediately if another pass is already running.
    pub fn drain(&self, pcm: &Mutex<PcmManager>, transport: &dyn ControlTransport) {
        loop {
            if self.processing.swap(true, Ordering::AcqRel) {
                return;
            }

            while let Some(chain) = self.pop_front() {
                self.process(chain, pcm, transport);
            }

            self.processing.store(false, Ordering::Release);

            // A request queued between the last pop and clearing the flag would otherwise wait
            // for the next notification.
            if self.is_empty() {
                return;
            }
        }
    }

    fn process(
        &self,
        mut chain: DescriptorChain,
        pcm: &Mutex<PcmManager>,
        transport: &dyn ControlTransport,
    ) {
        let result = {
            let mut pcm = pcm.lock();
            dispatch(&mut pcm, &chain)
        };

        let (status, records) = match result {
            Ok(records) => (StatusCode::Ok, records),
            Err(e) => {
                let code = decode_header(&chain.reader).unwrap_or(0);
                match e {
                    Error::Unsupported(_) => {
                        warn!("virtio-snd: request {}: {}", chain.index(), e)
                    }
                    _ => error!(
                        "virtio-snd: {} request {} failed: {}",
                        get_virtio_snd_r_cmd_name(code),
                        chain.index(),
                        e
                    ),
                }
                (e.status_code(), Vec::new())
            }
        };

        if let Err(e) = encode_response(&mut chain.writer, status, &records) {
            error!(
                "virtio-snd: failed to write reply to request {}: {}",
                chain.index(),
                e
            );
        }

        transport.deliver(chain.index(), &chain.writer.written());
        transport.notify_guest();
    }

    /// Drops every pending request without answering it.
    ///
    /// Returns the number of requests dropped.
    pub fn clear(&self) -> usize {
        let mut pending = self.pending.lock();
        let dropped = pending.len();
        pending.clear();
        dropped
    }
}

impl Default for ControlQueue {
    fn default() -> Self {
        Self::new()
    }
}
