// Copyright 2019 Intel Corporation. All Rights Reserved.
// SPDX-License-Identifier: Apache-2.0

//! Walks a [`Layout`] over a raw register buffer.

use byteorder::{ByteOrder, LittleEndian};
use log::debug;

use crate::error::{Error, Result};
use crate::layout::Layout;

/// Decoded register values keyed by field name, in layout order.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct FieldMap {
    fields: Vec<(&'static str, u64)>,
}

impl FieldMap {
    pub fn new() -> Self {
        FieldMap { fields: Vec::new() }
    }

    fn insert(&mut self, name: &'static str, value: u64) {
        self.fields.push((name, value));
    }

    /// Returns the value of `name`, if the layout produced it.
    pub fn get(&self, name: &str) -> Option<u64> {
        self.fields
            .iter()
            .find(|(field, _)| *field == name)
            .map(|(_, value)| *value)
    }

    /// Like [`get`](Self::get), but a missing field is an error.
    pub fn require(&self, name: &str) -> Result<u64> {
        self.get(name)
            .ok_or_else(|| Error::MissingField(name.to_string()))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Iterates over `(name, value)` in the order the fields were decoded.
    pub fn iter(&self) -> impl Iterator<Item = (&'static str, u64)> + '_ {
        self.fields.iter().copied()
    }
}

/// Decodes every non-reserved field of `layout` from `buf`.
///
/// Fields are unsigned little-endian integers. Reserved fields advance the
/// cursor without being recorded. Bytes past the end of the layout are
/// ignored. If a field would run past the end of `buf` nothing is returned.
pub fn decode(layout: &Layout, buf: &[u8]) -> Result<FieldMap> {
    let mut map = FieldMap::new();
    let mut cursor = 0;

    for field in layout.fields() {
        let end = cursor + field.width();
        if end > buf.len() {
            return Err(Error::BufferTooShort {
                field: field.name(),
                end,
                len: buf.len(),
            });
        }
        if !field.is_reserved() {
            let value = LittleEndian::read_uint(&buf[cursor..end], field.width());
            map.insert(field.name(), value);
        }
        cursor = end;
    }

    debug!(
        "decoded {} fields from {:#x} of {:#x} bytes",
        map.len(),
        cursor,
        buf.len()
    );
    Ok(map)
}
