// Copyright 2019 Intel Corporation. All Rights Reserved.
// SPDX-License-Identifier: Apache-2.0

//! Decoding of the Intel memory controller hub (host bridge, device 0:0.0)
//! configuration space for 2nd to 5th generation Core processors.
//!
//! The raw 256 byte configuration space is captured through the
//! [`pci_bus::ConfigAccess`] port pair, walked with a positional
//! [`layout::Layout`] by [`decode::decode`], and rendered by [`report`].
//! [`run::run`] ties the steps together for the command line tool.

pub mod decode;
pub mod dummy_device;
pub mod error;
pub mod identity;
pub mod layout;
pub mod pci_bus;
pub mod pci_configuration;
#[cfg(all(target_os = "linux", target_arch = "x86_64"))]
pub mod pio;
pub mod report;
pub mod run;

pub use crate::error::{Error, Result};
