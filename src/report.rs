// Copyright 2019 Intel Corporation. All Rights Reserved.
// SPDX-License-Identifier: Apache-2.0

//! Human readable rendering of a decoded MCH configuration.

use std::fmt;

use crate::decode::FieldMap;
use crate::error::Result;
use crate::identity::Identity;
use crate::layout::Layout;

/// Memory map boundaries of the host bridge.
///
/// Values are raw register contents. Bit 0 of each is the lock flag set by
/// firmware; it is not masked off.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct MchConfig {
    pub identity: Identity,
    /// Top of the TSEG (SMM) region.
    pub tsegmb: u32,
    /// Base of graphics data stolen memory.
    pub bdsm: u32,
    /// Base of GTT stolen memory.
    pub bgsm: u32,
    /// Top of low usable DRAM.
    pub tolud: u32,
    pub remap_base: u64,
    pub remap_limit: u64,
    /// Top of upper usable DRAM.
    pub touud: u64,
    /// Top of memory.
    pub tom: u64,
}

impl MchConfig {
    pub fn from_fields(fields: &FieldMap) -> Result<Self> {
        Ok(MchConfig {
            identity: Identity::from_fields(fields)?,
            tsegmb: fields.require("tsegmb")? as u32,
            bdsm: fields.require("bdsm")? as u32,
            bgsm: fields.require("bgsm")? as u32,
            tolud: fields.require("tolud")? as u32,
            remap_base: fields.require("remap_base")?,
            remap_limit: fields.require("remap_limit")?,
            touud: fields.require("touud")?,
            tom: fields.require("tom")?,
        })
    }
}

impl fmt::Display for MchConfig {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let lines: [(&str, u64); 8] = [
            ("Top Segment Memory Base:", u64::from(self.tsegmb)),
            ("Base of GFX stolen Memory:", u64::from(self.bdsm)),
            ("Base of GTT stolen Memory:", u64::from(self.bgsm)),
            ("Top of Low Usable DRAM:", u64::from(self.tolud)),
            ("Remap Base:", self.remap_base),
            ("Remap Limit:", self.remap_limit),
            ("Top of Upper Usable DRAM:", self.touud),
            ("Top of Memory:", self.tom),
        ];
        writeln!(f, "MCH configuration:")?;
        for (label, value) in lines.iter() {
            writeln!(f, "{:<26} 0x{:016x}", label, value)?;
        }
        write!(f, "(least significant bit is lock flag)")
    }
}

/// Every decoded field with its offset, in layout order.
pub struct FieldDump<'a> {
    layout: &'a Layout<'a>,
    fields: &'a FieldMap,
}

impl<'a> FieldDump<'a> {
    pub fn new(layout: &'a Layout<'a>, fields: &'a FieldMap) -> Self {
        FieldDump { layout, fields }
    }
}

impl fmt::Display for FieldDump<'_> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        for (offset, field) in self.layout.offsets() {
            if let Some(value) = self.fields.get(field.name()) {
                let digits = field.width() * 2;
                writeln!(
                    f,
                    "{:#04x} {:<20} 0x{:0width$x}",
                    offset,
                    field.name(),
                    value,
                    width = digits
                )?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::decode::decode;
    use crate::dummy_device::DummyMch;
    use crate::error::Error;
    use crate::layout::{Field, MCH_LAYOUT};
    use crate::pci_bus::capture;
    use crate::pci_configuration::Bdf;

    fn sandy_bridge() -> DummyMch {
        let mut dev = DummyMch::new(Bdf::MCH);
        dev.set_bytes(0x00, &[0x86, 0x80, 0x00, 0x01]);
        dev.set_bytes(0x90, &0x0000_0001_0000_0001u64.to_le_bytes());
        dev.set_bytes(0x98, &0x0000_0001_3fe0_0001u64.to_le_bytes());
        dev.set_bytes(0xa0, &0x0000_0001_0000_0001u64.to_le_bytes());
        dev.set_bytes(0xa8, &0x0000_0001_4000_0001u64.to_le_bytes());
        dev.set_bytes(0xb0, &0xbc00_0001u32.to_le_bytes());
        dev.set_bytes(0xb4, &0xbb80_0001u32.to_le_bytes());
        dev.set_bytes(0xb8, &0xbb00_0001u32.to_le_bytes());
        dev.set_bytes(0xbc, &0xc000_0001u32.to_le_bytes());
        dev
    }

    #[test]
    fn report_from_emulated_capture() {
        let mut dev = sandy_bridge();
        let raw = capture(&mut dev, Bdf::MCH).unwrap();
        let fields = decode(&MCH_LAYOUT, &raw).unwrap();
        let config = MchConfig::from_fields(&fields).unwrap();

        assert_eq!(config.identity.vendor_id, 0x8086);
        assert_eq!(config.identity.device_id, 0x0100);
        assert_eq!(config.tolud, 0xc000_0001);
        assert_eq!(config.touud & !1, 0x0000_0001_4000_0000);

        let expected = "MCH configuration:\n\
            Top Segment Memory Base:   0x00000000bb000001\n\
            Base of GFX stolen Memory: 0x00000000bc000001\n\
            Base of GTT stolen Memory: 0x00000000bb800001\n\
            Top of Low Usable DRAM:    0x00000000c0000001\n\
            Remap Base:                0x0000000100000001\n\
            Remap Limit:               0x000000013fe00001\n\
            Top of Upper Usable DRAM:  0x0000000140000001\n\
            Top of Memory:             0x0000000100000001\n\
            (least significant bit is lock flag)";
        assert_eq!(config.to_string(), expected);
    }

    #[test]
    fn report_needs_every_boundary() {
        let fields = [Field::u16("vendor_id"), Field::u16("device_id"), Field::u32("tsegmb")];
        let layout = Layout::new(&fields);
        let decoded = decode(&layout, &[0; 8]).unwrap();
        match MchConfig::from_fields(&decoded) {
            Err(Error::MissingField(name)) => assert_eq!(name, "bdsm"),
            other => panic!("unexpected result {:?}", other),
        }
    }

    #[test]
    fn dump_lists_fields_with_offsets() {
        let fields = [
            Field::u16("vendor_id"),
            Field::reserved("reserved_0", 2),
            Field::u32("bar"),
        ];
        let layout = Layout::new(&fields);
        let decoded = decode(&layout, &[0x86, 0x80, 0xff, 0xff, 0x01, 0x00, 0x00, 0xfe]).unwrap();
        let dump = FieldDump::new(&layout, &decoded).to_string();
        assert_eq!(
            dump,
            "0x00 vendor_id            0x8086\n0x04 bar                  0xfe000001\n"
        );
    }
}
