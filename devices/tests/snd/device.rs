// Copyright 2024 The ChromiumOS Authors
// Use of this source code is governed by a BSD-style license that can be
// found in the LICENSE file.

use std::io::Write;

use devices::virtio::snd::device::Error;
use devices::virtio::snd::Parameters;
use devices::virtio::snd::VirtioSnd;
use devices::virtio::DeviceType;
use devices::virtio::VIRTIO_F_IN_ORDER;
use devices::virtio::VIRTIO_F_VERSION_1;
use devices::VirtioDevice;
use tempfile::NamedTempFile;

use crate::create_device;
use crate::init_logging;
use crate::RecordingBackend;

fn params(jacks: u32, streams: u32, chmaps: u32) -> Parameters {
    Parameters {
        jacks,
        streams,
        chmaps,
        ..Default::default()
    }
}

#[test]
fn config_space() {
    init_logging();
    let snd = VirtioSnd::new(0, params(2, 4, 1)).unwrap();
    let mut data = [0u8; 12];
    snd.read_config(0, &mut data);
    assert_eq!(data, [2, 0, 0, 0, 4, 0, 0, 0, 1, 0, 0, 0]);

    let mut streams = [0u8; 4];
    snd.read_config(4, &mut streams);
    assert_eq!(u32::from_le_bytes(streams), 4);
}

#[test]
fn config_write_does_not_resize() {
    let backend = RecordingBackend::default();
    let mut snd = create_device(2, &backend);
    snd.write_config(4, &5u32.to_le_bytes());

    let mut streams = [0u8; 4];
    snd.read_config(4, &mut streams);
    assert_eq!(u32::from_le_bytes(streams), 5);
    assert!(snd.stream_state(1).is_some());
    assert!(snd.stream_state(2).is_none());
}

#[test]
fn creation_limits() {
    init_logging();
    for (jacks, streams, chmaps) in [(0, 0, 0), (0, 11, 0), (9, 1, 0), (0, 1, 19)] {
        assert!(
            matches!(
                VirtioSnd::new(0, params(jacks, streams, chmaps)),
                Err(Error::Config(_))
            ),
            "{jacks} jacks, {streams} streams, {chmaps} chmaps should be rejected"
        );
    }
    assert!(VirtioSnd::new(0, params(8, 10, 18)).is_ok());
}

#[test]
fn creation_fails_without_host_audio() {
    init_logging();
    let backend = RecordingBackend::default();
    backend.set_fail_open(true);
    let result = VirtioSnd::with_backend(0, &params(0, 2, 0), backend.boxed());
    assert!(matches!(result, Err(Error::PrepareDefaultStream(0, _))));
    assert!(backend.open_voices().is_empty());
}

#[test]
fn features_and_queues() {
    init_logging();
    let base = 1 << 28;
    let mut snd = VirtioSnd::new(base, Parameters::default()).unwrap();
    let expected = base | 1 << VIRTIO_F_VERSION_1 | 1 << VIRTIO_F_IN_ORDER;
    assert_eq!(snd.features(), expected);
    assert_eq!(snd.device_type(), DeviceType::Sound);
    assert_eq!(snd.queue_max_sizes(), &[64; 4]);

    snd.ack_features(u64::MAX);
    assert_eq!(snd.acked_features(), expected);
    snd.reset().unwrap();
    assert_eq!(snd.acked_features(), 0);
}

#[test]
fn parameters_from_file() {
    init_logging();
    let mut file = NamedTempFile::new().unwrap();
    write!(file, r#"{{"streams": 6, "backend": "null"}}"#).unwrap();
    let params = Parameters::from_file(file.path()).unwrap();
    let snd = VirtioSnd::new(0, params).unwrap();
    assert!(snd.stream_state(5).is_some());
    assert!(snd.stream_state(6).is_none());
}
