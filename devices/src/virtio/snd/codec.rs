// Copyright 2021 The ChromiumOS Authors
// Use of this source code is governed by a BSD-style license that can be
// found in the LICENSE file.

//! Marshalling of control queue requests and replies.
//!
//! Requests are read without consuming the descriptor chain, so a handler may decode the same
//! bytes as a bare header first and as the full request afterwards. Surplus bytes past the end of a
//! request are ignored.

use std::io;
use std::io::Write;
use std::mem::size_of;
use std::mem::size_of_val;

use remain::sorted;
use thiserror::Error as ThisError;
use zerocopy::FromBytes;
use zerocopy::Immutable;
use zerocopy::IntoBytes;

use crate::virtio::snd::constants::StatusCode;
use crate::virtio::snd::layout::virtio_snd_hdr;
use crate::virtio::Reader;
use crate::virtio::Writer;

#[sorted]
#[derive(ThisError, Debug)]
pub enum Error {
    #[error("reply needs {needed} bytes but the guest provided {available}")]
    ReplyTooLarge { needed: usize, available: usize },
    #[error("request too short: need {needed} bytes at offset {offset}, have {available}")]
    ShortRequest {
        needed: usize,
        offset: usize,
        available: usize,
    },
    #[error("failed to write reply: {0}")]
    WriteReply(io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;

/// Reads the request code from the start of `reader`.
pub fn decode_header(reader: &Reader) -> Result<u32> {
    decode_at::<virtio_snd_hdr>(reader, 0).map(|hdr| hdr.code.to_native())
}

/// Reads a `T` located `offset` bytes into the request held by `reader`.
pub fn decode_at<T: FromBytes>(reader: &Reader, offset: usize) -> Result<T> {
    reader
        .peek_obj_at::<T>(offset)
        .map_err(|_| Error::ShortRequest {
            needed: size_of::<T>(),
            offset,
            available: reader.available_bytes(),
        })
}

/// Writes a reply header with `status` followed by `records` into `writer`.
///
/// If the reply does not fit in the writable space the guest provided, only a `BAD_MSG` header
/// is written (when at least that fits) and `ReplyTooLarge` is returned.
pub fn encode_response<T: Immutable + IntoBytes>(
    writer: &mut Writer,
    status: StatusCode,
    records: &[T],
) -> Result<()> {
    let needed = size_of::<virtio_snd_hdr>() + size_of_val(records);
    let available = writer.available_bytes();
    if needed > available {
        if available >= size_of::<virtio_snd_hdr>() {
            writer
                .write_obj(virtio_snd_hdr::from_status(StatusCode::BadMsg))
                .map_err(Error::WriteReply)?;
        }
        return Err(Error::ReplyTooLarge { needed, available });
    }

    writer
        .write_obj(virtio_snd_hdr::from_status(status))
        .map_err(Error::WriteReply)?;
    writer
        .write_all(records.as_bytes())
        .map_err(Error::WriteReply)
}
