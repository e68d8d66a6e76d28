// Copyright 2019 Intel Corporation. All Rights Reserved.
// SPDX-License-Identifier: Apache-2.0

//! Configuration access through the legacy x86 I/O ports.
//!
//! The process needs `ioperm(2)` rights on both ports before the first access,
//! see [`acquire_io_privileges`].

use std::io;

use log::debug;
use x86_64::instructions::port::Port;

use crate::error::{Error, Result};
use crate::pci_bus::ConfigAccess;
use crate::pci_configuration::{
    encode_config_address, Bdf, PCI_CONFIG_ADDRESS, PCI_CONFIG_DATA, PCI_CONFIG_ENABLE,
};

// Access width requested for each port.
const IOPERM_LONG: libc::c_ulong = 4;
const IOPERM_ENABLE: libc::c_int = 1;

/// Asks the kernel for access to the configuration data and address ports.
///
/// Fails on the first port that is refused, usually because the process is
/// not running as root.
pub fn acquire_io_privileges() -> Result<()> {
    for port in [PCI_CONFIG_DATA, PCI_CONFIG_ADDRESS].iter() {
        // SAFETY: ioperm only changes this process's I/O permission bitmap.
        let ret = unsafe { libc::ioperm(libc::c_ulong::from(*port), IOPERM_LONG, IOPERM_ENABLE) };
        if ret != 0 {
            return Err(Error::Privilege {
                port: *port,
                source: io::Error::last_os_error(),
            });
        }
        debug!("acquired I/O permission for port {:#x}", port);
    }
    Ok(())
}

/// Port I/O backed [`ConfigAccess`].
pub struct PortIo {
    address: Port<u32>,
    data: Port<u32>,
}

impl PortIo {
    /// Creates the accessor.
    ///
    /// # Safety
    ///
    /// [`acquire_io_privileges`] must have succeeded, otherwise the first
    /// port access faults. The caller must also have exclusive use of the two
    /// ports for as long as the accessor is used.
    pub unsafe fn new() -> Self {
        PortIo {
            address: Port::new(PCI_CONFIG_ADDRESS),
            data: Port::new(PCI_CONFIG_DATA),
        }
    }
}

impl ConfigAccess for PortIo {
    fn seek(&mut self, bdf: Bdf, register: u8) -> Result<()> {
        let address =
            PCI_CONFIG_ENABLE | encode_config_address(bdf.bus, bdf.device, bdf.function, register);
        // SAFETY: port access was granted before this accessor was built.
        unsafe { self.address.write(address) };
        Ok(())
    }

    fn read_u32(&mut self) -> Result<u32> {
        // SAFETY: as above.
        Ok(unsafe { self.data.read() })
    }
}
