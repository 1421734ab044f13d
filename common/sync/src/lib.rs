// Copyright 2018 The ChromiumOS Authors
// Use of this source code is governed by a BSD-style license that can be
// found in the LICENSE file.

//! Sync primitive types whose methods panic rather than returning error in case of poison.
//!
//! The Mutex type in this crate wraps the standard library version and mirrors the same methods,
//! except that they panic where the standard library would return an Error. Release builds use
//! panic=abort, so a panic while a mutex is held takes down the whole process and callers never
//! have to consider a poisoned lock.
//!
//! Use this type anywhere in the workspace that would otherwise use `std::sync::Mutex`.

mod mutex;

pub use crate::mutex::Mutex;
