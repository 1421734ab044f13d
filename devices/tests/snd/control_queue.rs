// Copyright 2024 The ChromiumOS Authors
// Use of this source code is governed by a BSD-style license that can be
// found in the LICENSE file.

use std::cell::RefCell;

use devices::virtio::snd::constants::*;
use devices::virtio::snd::control::ControlQueue;
use devices::virtio::snd::null_backend::NullBackend;
use devices::virtio::snd::pcm::PcmManager;
use devices::virtio::snd::PcmParams;
use devices::virtio::snd::StreamState;
use devices::virtio::snd::VirtioSnd;
use devices::virtio::ControlTransport;
use devices::virtio::DescriptorChain;
use sync::Mutex;

use crate::create_device;
use crate::header;
use crate::init_logging;
use crate::pcm_request;
use crate::request_chain;
use crate::roundtrip;
use crate::set_params_request;
use crate::status;
use crate::MockTransport;
use crate::RecordingBackend;

#[test]
fn replies_in_order() {
    let backend = RecordingBackend::default();
    let snd = create_device(2, &backend);
    let transport = MockTransport::default();

    let a = transport.push(&pcm_request(VIRTIO_SND_R_PCM_START, 0), 4);
    let b = transport.push(&pcm_request(VIRTIO_SND_R_PCM_STOP, 5), 4);
    let c = transport.push(&header(VIRTIO_SND_R_JACK_INFO), 4);
    snd.handle_ctrl(&transport);

    let replies = transport.replies();
    let order: Vec<u16> = replies.iter().map(|(index, _)| *index).collect();
    assert_eq!(order, vec![a, b, c]);
    assert_eq!(status(&replies[0].1), VIRTIO_SND_S_OK);
    assert_eq!(status(&replies[1].1), VIRTIO_SND_S_BAD_MSG);
    assert_eq!(status(&replies[2].1), VIRTIO_SND_S_NOT_SUPP);
    assert_eq!(transport.notifications(), 3);
    assert_eq!(snd.pending_requests(), 0);
}

#[test]
fn unsupported_and_unknown_requests() {
    let backend = RecordingBackend::default();
    let snd = create_device(1, &backend);

    for code in [
        VIRTIO_SND_R_JACK_INFO,
        VIRTIO_SND_R_JACK_REMAP,
        VIRTIO_SND_R_CHMAP_INFO,
    ] {
        assert_eq!(
            status(&roundtrip(&snd, &header(code), 4)),
            VIRTIO_SND_S_NOT_SUPP
        );
    }
    assert_eq!(
        status(&roundtrip(&snd, &header(0x0300), 4)),
        VIRTIO_SND_S_BAD_MSG
    );
    // Too short to hold a request code.
    assert_eq!(
        status(&roundtrip(&snd, &[0x01, 0x01], 4)),
        VIRTIO_SND_S_BAD_MSG
    );
}

#[test]
fn reply_without_room_is_empty() {
    let backend = RecordingBackend::default();
    let snd = create_device(1, &backend);
    let reply = roundtrip(&snd, &pcm_request(VIRTIO_SND_R_PCM_START, 0), 0);
    assert!(reply.is_empty());
    assert_eq!(snd.stream_state(0), Some(StreamState::Started));
}

/// Transport whose guest makes more requests available whenever a reply is delivered, and which
/// notifies the device right away.
struct ReentrantTransport<'a> {
    inner: MockTransport,
    snd: &'a VirtioSnd,
    follow_ups: RefCell<Vec<Vec<u8>>>,
}

impl ControlTransport for ReentrantTransport<'_> {
    fn pop_available(&self) -> Vec<DescriptorChain> {
        self.inner.pop_available()
    }

    fn deliver(&self, index: u16, reply: &[u8]) {
        self.inner.deliver(index, reply);
        let next = self.follow_ups.borrow_mut().pop();
        if let Some(request) = next {
            self.inner.push(&request, 4);
            self.snd.handle_ctrl(self);
        }
    }

    fn notify_guest(&self) {
        self.inner.notify_guest()
    }
}

#[test]
fn notification_during_processing() {
    let backend = RecordingBackend::default();
    let snd = create_device(1, &backend);
    let transport = ReentrantTransport {
        inner: MockTransport::default(),
        snd: &snd,
        // Popped from the back.
        follow_ups: RefCell::new(vec![
            pcm_request(VIRTIO_SND_R_PCM_START, 0),
            pcm_request(VIRTIO_SND_R_PCM_STOP, 0),
        ]),
    };

    transport
        .inner
        .push(&pcm_request(VIRTIO_SND_R_PCM_START, 0), 4);
    snd.handle_ctrl(&transport);

    let replies = transport.inner.replies();
    let order: Vec<u16> = replies.iter().map(|(index, _)| *index).collect();
    assert_eq!(order, vec![0, 1, 2]);
    assert!(replies
        .iter()
        .all(|(_, reply)| status(reply) == VIRTIO_SND_S_OK));
    assert_eq!(snd.stream_state(0), Some(StreamState::Started));
    assert_eq!(snd.pending_requests(), 0);
}

#[test]
fn duplicate_pending_index_is_skipped() {
    init_logging();
    let queue = ControlQueue::new();
    let transport = MockTransport::default();
    transport.push(&pcm_request(VIRTIO_SND_R_PCM_START, 0), 4);

    struct Duplicates<'a>(&'a MockTransport);
    impl ControlTransport for Duplicates<'_> {
        fn pop_available(&self) -> Vec<DescriptorChain> {
            let request = pcm_request(VIRTIO_SND_R_PCM_STOP, 0);
            let mut chains = self.0.pop_available();
            chains.push(request_chain(0, &request, 4));
            chains
        }

        fn deliver(&self, index: u16, reply: &[u8]) {
            self.0.deliver(index, reply)
        }

        fn notify_guest(&self) {
            self.0.notify_guest()
        }
    }

    assert_eq!(queue.enqueue_available(&Duplicates(&transport)), 1);
    assert_eq!(queue.len(), 1);
}

#[test]
fn reset_drops_pending_requests() {
    init_logging();
    let mut manager = PcmManager::new(1, Box::new(NullBackend::new()));
    manager.set_params(0, PcmParams::default()).unwrap();
    manager.prepare(0).unwrap();
    let pcm = Mutex::new(manager);

    let queue = ControlQueue::new();
    let transport = MockTransport::default();
    transport.push(&pcm_request(VIRTIO_SND_R_PCM_START, 0), 4);
    transport.push(&set_params_request(0, 1, VIRTIO_SND_PCM_FMT_S16, 7), 4);
    assert_eq!(queue.enqueue_available(&transport), 2);

    assert_eq!(queue.clear(), 2);
    queue.drain(&pcm, &transport);
    assert!(transport.replies().is_empty());
    assert_eq!(transport.notifications(), 0);
    assert_eq!(pcm.lock().state(0), Some(StreamState::Prepared));

    // The queue keeps working afterwards.
    transport.push(&pcm_request(VIRTIO_SND_R_PCM_START, 0), 4);
    queue.enqueue_available(&transport);
    queue.drain(&pcm, &transport);
    assert_eq!(transport.replies().len(), 1);
    assert_eq!(pcm.lock().state(0), Some(StreamState::Started));
}
