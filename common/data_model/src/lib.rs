// Copyright 2017 The ChromiumOS Authors
// Use of this source code is governed by a BSD-style license that can be
// found in the LICENSE file.

//! Data types shared between the device model and guest-visible memory layouts.

mod endian;

pub use crate::endian::*;
