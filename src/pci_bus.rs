// Copyright 2019 Intel Corporation. All Rights Reserved.
// SPDX-License-Identifier: Apache-2.0

//! Capturing a raw configuration space through the address/data port pair.

use std::fs;
use std::path::Path;

use byteorder::{LittleEndian, WriteBytesExt};
use log::{debug, info};

use crate::error::Result;
use crate::pci_configuration::{Bdf, CONFIG_SPACE_SIZE};

/// Access to a configuration address register and its data register.
///
/// A read is only valid right after the `seek` that selected it, so callers
/// must not interleave seeks and reads for different registers. Nothing here
/// protects the ports from other processes.
pub trait ConfigAccess {
    /// Selects the dword at `register` of `bdf`. `register` must be a
    /// multiple of 4.
    fn seek(&mut self, bdf: Bdf, register: u8) -> Result<()>;
    /// Reads the dword selected by the last `seek`.
    fn read_u32(&mut self) -> Result<u32>;
}

/// Reads the whole configuration space of `bdf`, one dword at a time, from
/// offset 0x00 through 0xfc.
pub fn capture<A: ConfigAccess + ?Sized>(access: &mut A, bdf: Bdf) -> Result<Vec<u8>> {
    let mut buf = Vec::with_capacity(CONFIG_SPACE_SIZE);
    for register in (0..CONFIG_SPACE_SIZE).step_by(4) {
        access.seek(bdf, register as u8)?;
        let value = access.read_u32()?;
        buf.write_u32::<LittleEndian>(value)?;
    }
    debug!("captured {:#x} bytes of config space from {}", buf.len(), bdf);
    Ok(buf)
}

/// Loads a raw configuration space dump, e.g. a copy of the sysfs `config`
/// node. The length is not checked here, decoding does that.
pub fn read_dump<P: AsRef<Path>>(path: P) -> Result<Vec<u8>> {
    let buf = fs::read(path.as_ref())?;
    info!("read {:#x} bytes from {}", buf.len(), path.as_ref().display());
    Ok(buf)
}

/// Saves a raw capture so it can be decoded again later with [`read_dump`].
pub fn write_dump<P: AsRef<Path>>(path: P, buf: &[u8]) -> Result<()> {
    fs::write(path.as_ref(), buf)?;
    info!("saved {:#x} bytes to {}", buf.len(), path.as_ref().display());
    Ok(())
}
