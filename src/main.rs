// Copyright 2019 Intel Corporation. All Rights Reserved.
// SPDX-License-Identifier: Apache-2.0

use std::io;
use std::path::PathBuf;
use std::process;

use clap::Parser;
use env_logger::Env;

use mch_config::pci_configuration::Bdf;
use mch_config::run::{run, Options, Source};

/// Print the memory map of an Intel memory controller (Sandy Bridge to
/// Broadwell) read from its PCI configuration space.
///
/// Without options the configuration space of 00:00.0 is read through the
/// 0xcf8/0xcfc I/O ports, which requires root.
#[derive(Parser, Debug)]
#[command(version)]
struct Cli {
    /// Decode a raw configuration space dump instead of reading hardware.
    #[arg(long, value_name = "FILE", conflicts_with = "sysfs")]
    input: Option<PathBuf>,

    /// Read the kernel's sysfs config node instead of using port I/O.
    #[arg(long)]
    sysfs: bool,

    /// Save the raw configuration space to FILE before decoding.
    #[arg(long, value_name = "FILE")]
    save: Option<PathBuf>,

    /// Also print every decoded register.
    #[arg(long)]
    all: bool,
}

impl Cli {
    fn options(self) -> Options {
        let source = match self.input {
            Some(path) => Source::Dump(path),
            None if self.sysfs => Source::sysfs(Bdf::MCH),
            None => Source::Hardware,
        };
        Options {
            source,
            save: self.save,
            all: self.all,
        }
    }
}

fn main() {
    env_logger::Builder::from_env(Env::default().default_filter_or("warn")).init();

    let options = Cli::parse().options();
    let stdout = io::stdout();
    if let Err(e) = run(&options, &mut stdout.lock()) {
        eprintln!("{}", e);
        process::exit(1);
    }
}
