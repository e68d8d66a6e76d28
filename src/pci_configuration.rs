// Copyright 2019 Intel Corporation. All Rights Reserved.
// SPDX-License-Identifier: Apache-2.0

//! PCI configuration mechanism #1: addressing a function's registers through
//! the 0xcf8 address port and the 0xcfc data port.

use std::fmt;

/// Port the configuration address is written to.
pub const PCI_CONFIG_ADDRESS: u16 = 0xcf8;
/// Port the selected configuration dword is read from.
pub const PCI_CONFIG_DATA: u16 = 0xcfc;
/// Bit 31 of the address register enables the configuration cycle.
pub const PCI_CONFIG_ENABLE: u32 = 0x8000_0000;

// The number of 32bit registers in the config space, 256 bytes.
pub const NUM_CONFIGURATION_REGISTERS: usize = 64;
pub const CONFIG_SPACE_SIZE: usize = NUM_CONFIGURATION_REGISTERS * 4;

const BUS_NUMBER_OFFSET: u32 = 16;
const BUS_NUMBER_MASK: u32 = 0x00ff;
const DEVICE_NUMBER_OFFSET: u32 = 11;
const DEVICE_NUMBER_MASK: u32 = 0x1f;
const FUNCTION_NUMBER_OFFSET: u32 = 8;
const FUNCTION_NUMBER_MASK: u32 = 0x07;
const REGISTER_NUMBER_OFFSET: u32 = 2;
const REGISTER_NUMBER_MASK: u32 = 0x3f;

/// Bus/device/function coordinates of a PCI function.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct Bdf {
    pub bus: u8,
    pub device: u8,
    pub function: u8,
}

impl Bdf {
    /// Intel memory controllers are located at bus 0, device 0 and function 0.
    pub const MCH: Bdf = Bdf::new(0, 0, 0);

    pub const fn new(bus: u8, device: u8, function: u8) -> Self {
        Bdf {
            bus,
            device,
            function,
        }
    }

    /// Path of the kernel's config space node for this function on segment 0.
    pub fn sysfs_config_path(&self) -> String {
        format!("/sys/bus/pci/devices/0000:{}/config", self)
    }
}

impl fmt::Display for Bdf {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{:02x}:{:02x}.{:x}", self.bus, self.device, self.function)
    }
}

/// Packs bus, device, function and register into the address port layout.
///
/// Bus lands in bits 23:16, device in 15:11, function in 10:8 and the
/// register offset in 7:2. The register must be dword aligned; this is not
/// checked. The enable bit is not included.
pub const fn encode_config_address(bus: u8, device: u8, function: u8, register: u8) -> u32 {
    (bus as u32) << BUS_NUMBER_OFFSET
        | (device as u32) << DEVICE_NUMBER_OFFSET
        | (function as u32) << FUNCTION_NUMBER_OFFSET
        | register as u32
}

/// Splits an address port value back into its function and register number.
///
/// The register number is the dword index, not the byte offset.
pub fn parse_config_address(config_address: u32) -> (Bdf, usize) {
    let bus_number = ((config_address >> BUS_NUMBER_OFFSET) & BUS_NUMBER_MASK) as u8;
    let device_number = ((config_address >> DEVICE_NUMBER_OFFSET) & DEVICE_NUMBER_MASK) as u8;
    let function_number =
        ((config_address >> FUNCTION_NUMBER_OFFSET) & FUNCTION_NUMBER_MASK) as u8;
    let register_number =
        ((config_address >> REGISTER_NUMBER_OFFSET) & REGISTER_NUMBER_MASK) as usize;

    (
        Bdf::new(bus_number, device_number, function_number),
        register_number,
    )
}
