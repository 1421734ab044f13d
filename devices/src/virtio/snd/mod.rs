// Copyright 2020 The ChromiumOS Authors
// Use of this source code is governed by a BSD-style license that can be
// found in the LICENSE file.

//! Virtio sound device control plane.

pub mod backend;
pub mod codec;
pub mod common;
pub mod config;
pub mod constants;
pub mod control;
pub mod device;
pub mod layout;
pub mod null_backend;
pub mod parameters;
pub mod pcm;
pub mod stream_table;

pub use self::backend::AudioBackend;
pub use self::backend::AudioFormat;
pub use self::backend::AudioSettings;
pub use self::backend::BoxError;
pub use self::backend::Direction;
pub use self::backend::VoiceHandle;
pub use self::device::VirtioSnd;
pub use self::parameters::Parameters;
pub use self::parameters::StreamSourceBackend;
pub use self::stream_table::PcmParams;
pub use self::stream_table::StreamState;
