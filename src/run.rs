// Copyright 2019 Intel Corporation. All Rights Reserved.
// SPDX-License-Identifier: Apache-2.0

//! One capture, decode and report pass of the `mch-config` tool.

use std::io::Write;
use std::path::PathBuf;

use log::info;

use crate::decode::decode;
use crate::error::Result;
use crate::identity::{check_identity, IdentityWarning};
use crate::layout::MCH_LAYOUT;
use crate::pci_bus::{read_dump, write_dump};
use crate::pci_configuration::Bdf;
use crate::report::{FieldDump, MchConfig};

/// Where the raw configuration space comes from.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Source {
    /// A raw dump file, such as a saved capture or the sysfs `config` node.
    Dump(PathBuf),
    /// The 0xcf8/0xcfc I/O ports. Needs root.
    Hardware,
}

impl Source {
    /// The kernel's sysfs config node of `bdf`.
    pub fn sysfs(bdf: Bdf) -> Self {
        Source::Dump(PathBuf::from(bdf.sysfs_config_path()))
    }

    /// Reads the configuration space of `bdf`.
    pub fn load(&self, bdf: Bdf) -> Result<Vec<u8>> {
        match self {
            Source::Dump(path) => read_dump(path),
            Source::Hardware => read_hardware(bdf),
        }
    }
}

#[cfg(all(target_os = "linux", target_arch = "x86_64"))]
fn read_hardware(bdf: Bdf) -> Result<Vec<u8>> {
    use crate::pci_bus::capture;
    use crate::pio::{acquire_io_privileges, PortIo};

    acquire_io_privileges()?;
    // SAFETY: both ports were granted above and nothing else in this
    // process touches them.
    let mut access = unsafe { PortIo::new() };
    capture(&mut access, bdf)
}

#[cfg(not(all(target_os = "linux", target_arch = "x86_64")))]
fn read_hardware(_bdf: Bdf) -> Result<Vec<u8>> {
    Err(crate::error::Error::Unsupported)
}

/// What one run of the tool does.
#[derive(Clone, Debug)]
pub struct Options {
    pub source: Source,
    /// Save the raw capture here before decoding.
    pub save: Option<PathBuf>,
    /// Print every decoded register after the report.
    pub all: bool,
}

/// Loads the MCH configuration space, decodes it and writes the report to
/// `out`.
///
/// Identity mismatches are written to `out` ahead of the report and returned;
/// they never stop the report.
pub fn run<W: Write>(options: &Options, out: &mut W) -> Result<Vec<IdentityWarning>> {
    let bdf = Bdf::MCH;
    let raw = options.source.load(bdf)?;
    if let Some(path) = &options.save {
        write_dump(path, &raw)?;
    }

    let fields = decode(&MCH_LAYOUT, &raw)?;
    info!("decoded {} registers of {}", fields.len(), bdf);

    let warnings = check_identity(&fields)?;
    for warning in &warnings {
        writeln!(out, "warning: {}", warning)?;
    }

    let config = MchConfig::from_fields(&fields)?;
    writeln!(out, "{}", config)?;
    if options.all {
        writeln!(out)?;
        write!(out, "{}", FieldDump::new(&MCH_LAYOUT, &fields))?;
    }
    Ok(warnings)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::path::Path;

    use crate::dummy_device::DummyMch;
    use crate::error::Error;
    use crate::pci_bus::capture;

    fn temp_path(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!("mch-config-{}-{}", name, std::process::id()))
    }

    fn write_capture(path: &Path, vendor: [u8; 2]) -> Vec<u8> {
        let mut dev = DummyMch::new(Bdf::MCH);
        dev.set_bytes(0x00, &vendor);
        dev.set_bytes(0x02, &[0x04, 0x01]);
        dev.set_bytes(0xa0, &0x0000_0002_0000_0001u64.to_le_bytes());
        dev.set_bytes(0xbc, &0xa000_0001u32.to_le_bytes());
        let raw = capture(&mut dev, Bdf::MCH).unwrap();
        fs::write(path, &raw).unwrap();
        raw
    }

    fn dump_options(path: &Path) -> Options {
        Options {
            source: Source::Dump(path.to_path_buf()),
            save: None,
            all: false,
        }
    }

    #[test]
    fn dump_is_decoded_and_saved() {
        let input = temp_path("input");
        let saved = temp_path("saved");
        let raw = write_capture(&input, [0x86, 0x80]);

        let mut options = dump_options(&input);
        options.save = Some(saved.clone());
        let mut out = Vec::new();
        let warnings = run(&options, &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();

        assert!(warnings.is_empty());
        assert!(text.starts_with("MCH configuration:\n"));
        assert!(text.contains("Top of Low Usable DRAM:    0x00000000a0000001\n"));
        assert!(text.contains("Top of Memory:             0x0000000200000001\n"));
        assert!(text.ends_with("(least significant bit is lock flag)\n"));
        assert_eq!(fs::read(&saved).unwrap(), raw);

        fs::remove_file(&input).unwrap();
        fs::remove_file(&saved).unwrap();
    }

    #[test]
    fn unknown_vendor_is_reported_before_the_report() {
        let input = temp_path("foreign");
        write_capture(&input, [0xff, 0xff]);

        let mut out = Vec::new();
        let warnings = run(&dump_options(&input), &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();

        assert_eq!(warnings, vec![IdentityWarning::UnknownVendor(0xffff)]);
        assert!(text.starts_with("warning: MCH vendor id 0xffff unknown\nMCH configuration:\n"));
        assert!(text.contains("Top of Memory:             0x0000000200000001\n"));

        fs::remove_file(&input).unwrap();
    }

    #[test]
    fn unprivileged_sysfs_dump_is_too_short() {
        let input = temp_path("sysfs");
        let raw = write_capture(&input, [0x86, 0x80]);
        fs::write(&input, &raw[..64]).unwrap();

        let mut out = Vec::new();
        match run(&dump_options(&input), &mut out) {
            Err(Error::BufferTooShort { field, end, len }) => {
                assert_eq!(field, "pxpepbar");
                assert_eq!(end, 0x48);
                assert_eq!(len, 64);
            }
            other => panic!("unexpected result {:?}", other),
        }
        assert!(out.is_empty());

        fs::remove_file(&input).unwrap();
    }

    #[test]
    fn all_appends_the_field_dump() {
        let input = temp_path("all");
        write_capture(&input, [0x86, 0x80]);

        let mut options = dump_options(&input);
        options.all = true;
        let mut out = Vec::new();
        run(&options, &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();

        assert!(text.contains("flag)\n\n0x00 vendor_id            0x8086\n"));
        assert!(text.contains("0xbc tolud                0xa0000001\n"));

        fs::remove_file(&input).unwrap();
    }

    #[test]
    fn sysfs_source_points_at_config_node() {
        assert_eq!(
            Source::sysfs(Bdf::MCH),
            Source::Dump(PathBuf::from("/sys/bus/pci/devices/0000:00:00.0/config"))
        );
    }
}
