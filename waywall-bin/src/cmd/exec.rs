// SPDX-License-Identifier: GPL-3.0-only

//! `waywall exec`: run a command against the already-running compositor.

use std::{os::unix::process::CommandExt, process::Command};

use anyhow::{bail, Context, Result};

use crate::display_file;

/// Reads `/tmp/waywall-display`, exports the display variables and
/// execs. Only returns on error.
pub fn run(command: &[String]) -> Result<()> {
    if command.is_empty() {
        bail!("no command given");
    }

    let (socket, x11) = display_file::read()?;

    let mut exec = Command::new(&command[0]);
    exec.args(&command[1..]).env("WAYLAND_DISPLAY", socket);
    if let Some(x11) = x11 {
        exec.env("DISPLAY", x11);
    }

    Err(exec.exec()).with_context(|| format!("failed to exec {:?}", command[0]))
}
