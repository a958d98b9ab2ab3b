// SPDX-License-Identifier: GPL-3.0-only

//! Standalone launch helper: exec a command with the display variables
//! of the running compositor. Kept dependency-light so it can live on a
//! PATH without the compositor.

use std::{
    fs,
    os::unix::process::CommandExt,
    process::{Command, ExitCode},
};

const DISPLAY_FILE_PATH: &str = "/tmp/waywall-display";

fn main() -> ExitCode {
    let args: Vec<String> = std::env::args().collect();
    if args.len() < 2 {
        eprintln!("USAGE: {} COMMAND [ARGS...]", args.first().map(String::as_str).unwrap_or("waywall-launch"));
        return ExitCode::FAILURE;
    }

    let data = match fs::read_to_string(DISPLAY_FILE_PATH) {
        Ok(data) => data,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            eprintln!("waywall is not running");
            return ExitCode::FAILURE;
        }
        Err(err) => {
            eprintln!("failed to read waywall-display: {err}");
            return ExitCode::FAILURE;
        }
    };

    let mut lines = data.lines();
    let socket = match lines.next() {
        Some(socket) if !socket.is_empty() => socket,
        _ => {
            eprintln!("waywall-display is empty");
            return ExitCode::FAILURE;
        }
    };

    let mut command = Command::new(&args[1]);
    command.args(&args[2..]).env("WAYLAND_DISPLAY", socket);
    if let Some(x11) = lines.next().filter(|l| !l.is_empty()) {
        command.env("DISPLAY", x11);
    }

    let err = command.exec();
    eprintln!("execvp failed: {err}");
    ExitCode::FAILURE
}
