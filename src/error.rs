// Copyright 2019 Intel Corporation. All Rights Reserved.
// SPDX-License-Identifier: Apache-2.0

use std::io;
use std::result;

/// Error type for capturing and decoding the MCH configuration space.
#[derive(thiserror::Error, Debug)]
pub enum Error {
    /// The operating system refused access to an I/O port.
    #[error("Failed to acquire I/O privileges for port {port:#x}: {source}")]
    Privilege {
        port: u16,
        #[source]
        source: io::Error,
    },
    /// The layout needs more bytes than the captured buffer holds.
    #[error("Can't unpack {field} up to byte {end:#x} from a buffer of {len:#x} bytes")]
    BufferTooShort {
        field: &'static str,
        end: usize,
        len: usize,
    },
    /// A field was looked up that the layout did not produce.
    #[error("Field {0} is missing from the decoded configuration")]
    MissingField(String),
    /// Reading or writing a raw dump, or writing the report, failed.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
    /// Port I/O is not available on this target.
    #[error("Port I/O configuration access is not supported on this platform")]
    Unsupported,
}

/// Simplify the `Result` type.
pub type Result<T> = result::Result<T, Error>;
