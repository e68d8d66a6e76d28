// Copyright 2019 Intel Corporation. All Rights Reserved.
// SPDX-License-Identifier: Apache-2.0

//! Sanity check of the decoded vendor and device id.
//!
//! The layout in [`crate::layout`] only holds for the host bridges of a known
//! range of processors. An unknown id does not stop decoding, it only means
//! the values printed may be meaningless.

use std::fmt;

use log::debug;

use crate::decode::FieldMap;
use crate::error::Result;

/// Vendors whose host bridges use the MCH layout.
pub static VENDOR_IDS: &[u16] = &[0x8086];

/// Host bridge device ids known to use the MCH layout.
pub static DEVICE_IDS: &[u16] = &[
    // Sandy Bridge
    0x0100, 0x0104,
    // Ivy Bridge
    0x0150, 0x0154,
    // Haswell
    0x0c00, 0x0c04, 0x0a04,
    // Broadwell
    0x1604,
];

/// Vendor and device id of a decoded configuration space.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct Identity {
    pub vendor_id: u16,
    pub device_id: u16,
}

impl Identity {
    pub fn from_fields(fields: &FieldMap) -> Result<Self> {
        Ok(Identity {
            vendor_id: fields.require("vendor_id")? as u16,
            device_id: fields.require("device_id")? as u16,
        })
    }

    pub fn vendor_known(&self) -> bool {
        VENDOR_IDS.contains(&self.vendor_id)
    }

    pub fn device_known(&self) -> bool {
        DEVICE_IDS.contains(&self.device_id)
    }

    /// Every mismatch against the allowlists, vendor first.
    pub fn warnings(&self) -> Vec<IdentityWarning> {
        let mut warnings = Vec::new();
        if !self.vendor_known() {
            warnings.push(IdentityWarning::UnknownVendor(self.vendor_id));
        }
        if !self.device_known() {
            warnings.push(IdentityWarning::UnknownDevice(self.device_id));
        }
        warnings
    }
}

/// A non-fatal identity mismatch.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum IdentityWarning {
    UnknownVendor(u16),
    UnknownDevice(u16),
}

impl fmt::Display for IdentityWarning {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            IdentityWarning::UnknownVendor(id) => write!(f, "MCH vendor id {:#06x} unknown", id),
            IdentityWarning::UnknownDevice(id) => write!(f, "MCH device id {:#06x} unknown", id),
        }
    }
}

/// Checks the decoded ids against the allowlists. Callers show the returned
/// warnings to the user.
pub fn check_identity(fields: &FieldMap) -> Result<Vec<IdentityWarning>> {
    let identity = Identity::from_fields(fields)?;
    let warnings = identity.warnings();
    for warning in &warnings {
        debug!("{}, register layout may not match this machine", warning);
    }
    Ok(warnings)
}
