// Copyright 2024 The ChromiumOS Authors
// Use of this source code is governed by a BSD-style license that can be
// found in the LICENSE file.

use devices::virtio::snd::backend::Direction;
use devices::virtio::snd::backend::VoiceHandle;
use devices::virtio::snd::constants::*;
use devices::virtio::snd::PcmParams;
use devices::virtio::snd::StreamState;

use crate::create_device;
use crate::info_records;
use crate::pcm_info_request;
use crate::pcm_request;
use crate::roundtrip;
use crate::send;
use crate::set_params_request;
use crate::BackendEvent;
use crate::RecordingBackend;

fn directions(backend: &RecordingBackend) -> Vec<Direction> {
    backend
        .events()
        .into_iter()
        .filter_map(|e| match e {
            BackendEvent::Open { direction, .. } => Some(direction),
            _ => None,
        })
        .collect()
}

#[test]
fn streams_prepared_with_defaults() {
    let backend = RecordingBackend::default();
    let snd = create_device(3, &backend);

    for id in 0..3 {
        assert_eq!(snd.stream_state(id), Some(StreamState::Prepared));
        assert_eq!(snd.stream_params(id), Some(PcmParams::default()));
    }
    assert_eq!(snd.stream_state(3), None);
    assert_eq!(backend.open_voices().len(), 3);

    let params = PcmParams::default();
    assert_eq!(params.buffer_bytes, 8192);
    assert_eq!(params.period_bytes, 4096);
    assert_eq!(params.channels, 2);
    assert_eq!(params.format, VIRTIO_SND_PCM_FMT_S16);
    assert_eq!(params.rate, VIRTIO_SND_PCM_RATE_44100);
    assert_eq!(params.features, 0);
}

#[test]
fn direction_split_odd() {
    let backend = RecordingBackend::default();
    let _snd = create_device(5, &backend);
    assert_eq!(
        directions(&backend),
        vec![
            Direction::Output,
            Direction::Output,
            Direction::Output,
            Direction::Input,
            Direction::Input
        ]
    );
}

#[test]
fn direction_split_even() {
    let backend = RecordingBackend::default();
    let snd = create_device(4, &backend);
    assert_eq!(
        directions(&backend),
        vec![
            Direction::Output,
            Direction::Output,
            Direction::Input,
            Direction::Input
        ]
    );

    let reply = roundtrip(&snd, &pcm_info_request(0, 4), 4 + 4 * 32);
    assert_eq!(crate::status(&reply), VIRTIO_SND_S_OK);
    let infos = info_records(&reply);
    assert_eq!(infos.len(), 4);
    let dirs: Vec<u8> = infos.iter().map(|i| i.direction).collect();
    assert_eq!(
        dirs,
        vec![
            VIRTIO_SND_D_OUTPUT,
            VIRTIO_SND_D_OUTPUT,
            VIRTIO_SND_D_INPUT,
            VIRTIO_SND_D_INPUT
        ]
    );
    assert_eq!(infos[0].hdr.hda_fn_nid.to_native(), 0);
    assert_eq!(infos[3].hdr.hda_fn_nid.to_native(), 1);
    for info in &infos {
        assert_eq!(info.channels_min, 1);
        assert_eq!(info.channels_max, 16);
        assert_eq!(info.formats.to_native(), SUPPORTED_FORMATS);
        assert_eq!(info.rates.to_native(), SUPPORTED_RATES);
    }
}

#[test]
fn set_params_channel_limits() {
    let backend = RecordingBackend::default();
    let snd = create_device(1, &backend);
    let s16 = VIRTIO_SND_PCM_FMT_S16;
    let rate = VIRTIO_SND_PCM_RATE_48000;

    assert_eq!(
        send(&snd, &set_params_request(0, 0, s16, rate)),
        VIRTIO_SND_S_NOT_SUPP
    );
    assert_eq!(
        send(&snd, &set_params_request(0, 17, s16, rate)),
        VIRTIO_SND_S_NOT_SUPP
    );
    assert_eq!(snd.stream_params(0), Some(PcmParams::default()));

    assert_eq!(
        send(&snd, &set_params_request(0, 16, s16, rate)),
        VIRTIO_SND_S_OK
    );
    let params = snd.stream_params(0).unwrap();
    assert_eq!(params.channels, 16);
    assert_eq!(params.rate, rate);
}

#[test]
fn set_params_format_and_rate() {
    let backend = RecordingBackend::default();
    let snd = create_device(1, &backend);

    // Formats below S8 are not supported.
    assert_eq!(
        send(&snd, &set_params_request(0, 2, 0, VIRTIO_SND_PCM_RATE_48000)),
        VIRTIO_SND_S_NOT_SUPP
    );
    assert_eq!(
        send(&snd, &set_params_request(0, 2, VIRTIO_SND_PCM_FMT_S16, 14)),
        VIRTIO_SND_S_NOT_SUPP
    );
    assert_eq!(
        send(&snd, &set_params_request(7, 2, VIRTIO_SND_PCM_FMT_S16, 6)),
        VIRTIO_SND_S_BAD_MSG
    );
}

#[test]
fn prepare_applies_new_params() {
    let backend = RecordingBackend::default();
    let snd = create_device(1, &backend);
    backend.clear_events();

    let request = set_params_request(0, 1, VIRTIO_SND_PCM_FMT_U8, VIRTIO_SND_PCM_RATE_8000);
    assert_eq!(send(&snd, &request), VIRTIO_SND_S_OK);
    // The running stream is untouched until the next PREPARE.
    assert!(backend.events().is_empty());
    assert_eq!(snd.stream_state(0), Some(StreamState::Prepared));

    assert_eq!(
        send(&snd, &pcm_request(VIRTIO_SND_R_PCM_PREPARE, 0)),
        VIRTIO_SND_S_OK
    );
    assert_eq!(
        backend.events(),
        vec![
            BackendEvent::Close(VoiceHandle(0)),
            BackendEvent::Open {
                voice: VoiceHandle(1),
                direction: Direction::Output,
                nchannels: 1,
            },
        ]
    );
}

#[test]
fn start_stop_start() {
    let backend = RecordingBackend::default();
    let snd = create_device(1, &backend);
    backend.clear_events();

    assert_eq!(
        send(&snd, &pcm_request(VIRTIO_SND_R_PCM_START, 0)),
        VIRTIO_SND_S_OK
    );
    assert_eq!(snd.stream_state(0), Some(StreamState::Started));
    assert_eq!(
        send(&snd, &pcm_request(VIRTIO_SND_R_PCM_STOP, 0)),
        VIRTIO_SND_S_OK
    );
    assert_eq!(snd.stream_state(0), Some(StreamState::Stopped));
    assert_eq!(
        send(&snd, &pcm_request(VIRTIO_SND_R_PCM_START, 0)),
        VIRTIO_SND_S_OK
    );
    assert_eq!(snd.stream_state(0), Some(StreamState::Started));

    let voice = VoiceHandle(0);
    assert_eq!(
        backend.events(),
        vec![
            BackendEvent::Running(voice, true),
            BackendEvent::Running(voice, false),
            BackendEvent::Running(voice, true),
        ]
    );
}

#[test]
fn release_twice() {
    let backend = RecordingBackend::default();
    let snd = create_device(2, &backend);

    assert_eq!(
        send(&snd, &pcm_request(VIRTIO_SND_R_PCM_RELEASE, 1)),
        VIRTIO_SND_S_OK
    );
    assert_eq!(snd.stream_state(1), Some(StreamState::ParamsSet));
    assert_eq!(backend.open_voices(), vec![VoiceHandle(0)]);

    assert_eq!(
        send(&snd, &pcm_request(VIRTIO_SND_R_PCM_RELEASE, 1)),
        VIRTIO_SND_S_BAD_MSG
    );
    assert_eq!(
        send(&snd, &pcm_request(VIRTIO_SND_R_PCM_START, 1)),
        VIRTIO_SND_S_BAD_MSG
    );

    // Released streams keep their parameters and can be prepared again.
    assert_eq!(
        send(&snd, &pcm_request(VIRTIO_SND_R_PCM_PREPARE, 1)),
        VIRTIO_SND_S_OK
    );
    assert_eq!(snd.stream_state(1), Some(StreamState::Prepared));
}

#[test]
fn invalid_stream_ids() {
    let backend = RecordingBackend::default();
    let snd = create_device(2, &backend);
    for code in [
        VIRTIO_SND_R_PCM_PREPARE,
        VIRTIO_SND_R_PCM_RELEASE,
        VIRTIO_SND_R_PCM_START,
        VIRTIO_SND_R_PCM_STOP,
    ] {
        assert_eq!(send(&snd, &pcm_request(code, 2)), VIRTIO_SND_S_BAD_MSG);
    }
}

#[test]
fn pcm_info_out_of_range() {
    let backend = RecordingBackend::default();
    let snd = create_device(2, &backend);

    let reply = roundtrip(&snd, &pcm_info_request(1, 2), 4 + 2 * 32);
    assert_eq!(reply.len(), 4);
    assert_eq!(crate::status(&reply), VIRTIO_SND_S_BAD_MSG);

    let reply = roundtrip(&snd, &pcm_info_request(1, 1), 4 + 32);
    assert_eq!(crate::status(&reply), VIRTIO_SND_S_OK);
    assert_eq!(info_records(&reply)[0].direction, VIRTIO_SND_D_INPUT);

    // No room for the records.
    let reply = roundtrip(&snd, &pcm_info_request(0, 2), 4 + 32);
    assert_eq!(reply.len(), 4);
    assert_eq!(crate::status(&reply), VIRTIO_SND_S_BAD_MSG);
}

#[test]
fn backend_failure_on_prepare() {
    let backend = RecordingBackend::default();
    let snd = create_device(1, &backend);
    backend.set_fail_open(true);

    assert_eq!(
        send(&snd, &pcm_request(VIRTIO_SND_R_PCM_PREPARE, 0)),
        VIRTIO_SND_S_IO_ERR
    );
    assert_eq!(snd.stream_state(0), Some(StreamState::ParamsSet));
    assert!(backend.open_voices().is_empty());

    backend.set_fail_open(false);
    assert_eq!(
        send(&snd, &pcm_request(VIRTIO_SND_R_PCM_PREPARE, 0)),
        VIRTIO_SND_S_OK
    );
    assert_eq!(snd.stream_state(0), Some(StreamState::Prepared));
}

#[test]
fn drop_closes_voices() {
    let backend = RecordingBackend::default();
    let snd = create_device(4, &backend);
    assert_eq!(
        send(&snd, &pcm_request(VIRTIO_SND_R_PCM_START, 2)),
        VIRTIO_SND_S_OK
    );
    assert_eq!(backend.open_voices().len(), 4);
    drop(snd);
    assert!(backend.open_voices().is_empty());
}
