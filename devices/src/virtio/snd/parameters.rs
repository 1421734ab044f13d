// Copyright 2022 The ChromiumOS Authors
// Use of this source code is governed by a BSD-style license that can be
// found in the LICENSE file.

use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use anyhow::Context;
use serde::Deserialize;
use thiserror::Error as ThisError;

#[derive(ThisError, Debug)]
pub enum Error {
    // Invalid backend.
    #[error("Backend is not implemented: {0}")]
    InvalidBackend(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(try_from = "String")]
pub enum StreamSourceBackend {
    NULL,
}

impl TryFrom<&str> for StreamSourceBackend {
    type Error = Error;

    fn try_from(s: &str) -> Result<Self, Self::Error> {
        match s {
            "null" => Ok(StreamSourceBackend::NULL),
            _ => Err(Error::InvalidBackend(s.to_owned())),
        }
    }
}

impl TryFrom<String> for StreamSourceBackend {
    type Error = Error;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        StreamSourceBackend::try_from(s.as_str())
    }
}

/// Holds the parameters for a virtio sound device
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields, default)]
pub struct Parameters {
    pub jacks: u32,
    pub streams: u32,
    pub chmaps: u32,
    pub backend: StreamSourceBackend,
}

impl Default for Parameters {
    fn default() -> Self {
        Parameters {
            jacks: 0,
            streams: 1,
            chmaps: 0,
            backend: StreamSourceBackend::NULL,
        }
    }
}

impl Parameters {
    /// Loads parameters from the JSON file at `path`. Fields missing from the file keep their
    /// default value.
    pub fn from_file(path: &Path) -> anyhow::Result<Parameters> {
        let file = File::open(path)
            .with_context(|| format!("failed to open snd config {}", path.display()))?;
        serde_json::from_reader(BufReader::new(file))
            .with_context(|| format!("failed to parse snd config {}", path.display()))
    }
}
