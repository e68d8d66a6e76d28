// Copyright 2019 Intel Corporation. All Rights Reserved.
// SPDX-License-Identifier: Apache-2.0

use byteorder::{ByteOrder, LittleEndian};
use log::warn;

use crate::error::Result;
use crate::pci_bus::ConfigAccess;
use crate::pci_configuration::{
    encode_config_address, parse_config_address, Bdf, NUM_CONFIGURATION_REGISTERS,
    PCI_CONFIG_ENABLE,
};

/// An in-memory host bridge answering on the emulated address/data ports.
///
/// Reads of any other function, or with the enable bit clear, return all ones
/// like a bus without a device behind it.
pub struct DummyMch {
    pub bdf: Bdf,
    pub config_regs: [u32; NUM_CONFIGURATION_REGISTERS],
    config_address_reg: u32,
}

impl DummyMch {
    pub fn new(bdf: Bdf) -> Self {
        DummyMch {
            bdf,
            config_regs: [0; NUM_CONFIGURATION_REGISTERS],
            config_address_reg: 0,
        }
    }

    /// Builds a device whose config space starts with the bytes of `raw`.
    /// Missing bytes read as zero and bytes past 256 are dropped.
    pub fn from_bytes(bdf: Bdf, raw: &[u8]) -> Self {
        let mut dev = DummyMch::new(bdf);
        for (reg, chunk) in dev.config_regs.iter_mut().zip(raw.chunks(4)) {
            let mut dword = [0u8; 4];
            dword[..chunk.len()].copy_from_slice(chunk);
            *reg = LittleEndian::read_u32(&dword);
        }
        if raw.len() > dev.config_regs.len() * 4 {
            warn!("ignoring {} bytes past the config space", raw.len() - dev.config_regs.len() * 4);
        }
        dev
    }

    /// Writes `data` little-endian at byte `offset` of the config space.
    pub fn set_bytes(&mut self, offset: usize, data: &[u8]) {
        for (i, byte) in data.iter().enumerate() {
            let pos = offset + i;
            if let Some(r) = self.config_regs.get_mut(pos / 4) {
                let shift = (pos % 4) * 8;
                *r = (*r & !(0xffu32 << shift)) | (u32::from(*byte) << shift);
            }
        }
    }
}

impl ConfigAccess for DummyMch {
    fn seek(&mut self, bdf: Bdf, register: u8) -> Result<()> {
        self.config_address_reg =
            PCI_CONFIG_ENABLE | encode_config_address(bdf.bus, bdf.device, bdf.function, register);
        Ok(())
    }

    fn read_u32(&mut self) -> Result<u32> {
        let enabled = (self.config_address_reg & PCI_CONFIG_ENABLE) != 0;
        if !enabled {
            return Ok(0xffff_ffff);
        }
        let (bdf, register) = parse_config_address(self.config_address_reg & !PCI_CONFIG_ENABLE);
        if bdf != self.bdf {
            return Ok(0xffff_ffff);
        }
        Ok(self.config_regs[register])
    }
}
