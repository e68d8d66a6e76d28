// Copyright 2019 Intel Corporation. All Rights Reserved.
// SPDX-License-Identifier: Apache-2.0

//! Positional register layouts.
//!
//! A [`Layout`] is an ordered list of [`Field`]s. Offsets are never stored:
//! the offset of a field is the sum of the widths of every field before it,
//! so entries must stay in hardware order.

/// Any field whose name contains this marker is padding.
pub const RESERVED: &str = "reserved";

/// One entry of a register layout.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct Field {
    name: &'static str,
    width: usize,
    reserved: bool,
}

impl Field {
    /// An 8-bit little-endian register.
    pub const fn u8(name: &'static str) -> Self {
        Field {
            name,
            width: 1,
            reserved: false,
        }
    }

    /// A 16-bit little-endian register.
    pub const fn u16(name: &'static str) -> Self {
        Field {
            name,
            width: 2,
            reserved: false,
        }
    }

    /// A 32-bit little-endian register.
    pub const fn u32(name: &'static str) -> Self {
        Field {
            name,
            width: 4,
            reserved: false,
        }
    }

    /// A 64-bit little-endian register.
    pub const fn u64(name: &'static str) -> Self {
        Field {
            name,
            width: 8,
            reserved: false,
        }
    }

    /// Padding of `len` bytes. Its bytes are consumed but never decoded.
    pub const fn reserved(name: &'static str, len: usize) -> Self {
        Field {
            name,
            width: len,
            reserved: true,
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Number of bytes the field occupies.
    pub fn width(&self) -> usize {
        self.width
    }

    /// Padding built with [`Field::reserved`], or any field named with the
    /// [`RESERVED`] marker.
    pub fn is_reserved(&self) -> bool {
        self.reserved || self.name.contains(RESERVED)
    }
}

/// An ordered sequence of fields starting at byte 0.
#[derive(Copy, Clone, Debug)]
pub struct Layout<'a> {
    fields: &'a [Field],
}

impl<'a> Layout<'a> {
    pub const fn new(fields: &'a [Field]) -> Self {
        Layout { fields }
    }

    pub fn fields(&self) -> &'a [Field] {
        self.fields
    }

    /// Total number of bytes covered by the layout.
    pub const fn size(&self) -> usize {
        let mut total = 0;
        let mut i = 0;
        while i < self.fields.len() {
            total += self.fields[i].width;
            i += 1;
        }
        total
    }

    /// Iterates over `(offset, field)` pairs in layout order.
    pub fn offsets(&self) -> Offsets<'a> {
        Offsets {
            fields: self.fields.iter(),
            cursor: 0,
        }
    }

    /// Byte offset of the first field called `name`.
    pub fn offset_of(&self, name: &str) -> Option<usize> {
        self.offsets()
            .find(|(_, field)| field.name == name)
            .map(|(offset, _)| offset)
    }
}

/// Iterator returned by [`Layout::offsets`].
pub struct Offsets<'a> {
    fields: std::slice::Iter<'a, Field>,
    cursor: usize,
}

impl<'a> Iterator for Offsets<'a> {
    type Item = (usize, &'a Field);

    fn next(&mut self) -> Option<Self::Item> {
        let field = self.fields.next()?;
        let offset = self.cursor;
        self.cursor += field.width;
        Some((offset, field))
    }
}

// Host bridge (device 0:0.0) configuration registers of 2nd to 5th generation
// Core processors, see Volume 2 of the processor datasheets.
const MCH_FIELDS: &[Field] = &[
    Field::u16("vendor_id"),
    Field::u16("device_id"),
    Field::u16("command"),
    Field::u16("status"),
    Field::u8("revision_id"),
    Field::reserved("reserved_class_code", 0x3),
    Field::reserved("reserved_0", 0x2),
    Field::u8("header_type"),
    Field::reserved("reserved_1", 0x1d),
    Field::u16("svid"),
    Field::u16("sid"),
    Field::reserved("reserved_2", 0x10),
    Field::u64("pxpepbar"),
    Field::u64("mchbar"),
    Field::u16("ggc"),
    Field::reserved("reserved_3", 0x2),
    Field::u32("device_enable"),
    Field::u32("pavpc"),
    Field::u32("dma_protected_range"),
    Field::u64("pxiexbar"),
    Field::u64("dmibar"),
    Field::reserved("reserved_4", 0x10),
    Field::u8("pam0"),
    Field::u8("pam1"),
    Field::u8("pam2"),
    Field::u8("pam3"),
    Field::u8("pam4"),
    Field::u8("pam5"),
    Field::u8("pam6"),
    Field::u8("lac"),
    Field::reserved("reserved_5", 0x8),
    Field::u64("remap_base"),
    Field::u64("remap_limit"),
    Field::u64("tom"),
    Field::u64("touud"),
    Field::u32("bdsm"),
    Field::u32("bgsm"),
    Field::u32("tsegmb"),
    Field::u32("tolud"),
    // Layout ends at 0xec; the rest of the 256 byte capture is ignored.
    Field::reserved("reserved_6", 0x2c),
];

/// Memory controller hub layout, Sandy Bridge through Broadwell.
pub static MCH_LAYOUT: Layout<'static> = Layout::new(MCH_FIELDS);

/// Number of bytes [`MCH_LAYOUT`] decodes.
pub const MCH_LAYOUT_SIZE: usize = Layout::new(MCH_FIELDS).size();

const _: () = assert!(MCH_LAYOUT_SIZE <= crate::pci_configuration::CONFIG_SPACE_SIZE);
