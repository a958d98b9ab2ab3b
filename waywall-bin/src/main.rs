// SPDX-License-Identifier: GPL-3.0-only

use std::process::ExitCode;

use tracing::error;
use tracing_subscriber::EnvFilter;

mod cmd;
mod config_watch;
mod cpu;
mod display_file;
mod env_reexec;
mod gl;
mod input;
mod instance;
mod remote;
mod server;
mod state;
mod subproc;
mod ui;
mod util;
mod xwayland;

const USAGE: &str = "\
USAGE: waywall <subcommand>

  run  [PROFILE]                enter wall mode
  wrap [PROFILE] -- COMMAND...  run COMMAND inside the compositor
  exec [launch] COMMAND...      run COMMAND against the running compositor
  cpu                           prepare the cgroup tree (needs root)
";

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();
    log_panics::init();

    let args: Vec<String> = std::env::args().collect();

    let result = match args.get(1).map(String::as_str) {
        Some("run") => {
            let profile = args.get(2).filter(|a| !a.starts_with('-')).map(String::as_str);
            cmd::run::run(profile)
        }
        Some("wrap") => {
            let rest = &args[2..];
            let split = rest.iter().position(|a| a == "--");
            let (head, command) = match split {
                Some(index) => (&rest[..index], rest[index + 1..].to_vec()),
                None => (&rest[..0], rest.to_vec()),
            };
            let profile = head
                .iter()
                .find(|a| !a.starts_with('-'))
                .map(String::as_str);

            if command.is_empty() {
                eprintln!("{USAGE}");
                return ExitCode::FAILURE;
            }
            // Flags for waywall itself live before the `--`.
            let no_env_reexec = head.iter().any(|a| a == "--no-env-reexec");
            cmd::wrap::run(profile, command, &args, no_env_reexec)
        }
        Some("exec") => {
            let mut rest = &args[2..];
            if rest.first().map(String::as_str) == Some("launch") {
                rest = &rest[1..];
            }
            cmd::exec::run(rest)
        }
        Some("cpu") => cmd::cpu::run(),
        Some("--help") | Some("-h") | None => {
            eprintln!("{USAGE}");
            return ExitCode::FAILURE;
        }
        Some(other) => {
            eprintln!("unknown subcommand {other:?}\n{USAGE}");
            return ExitCode::FAILURE;
        }
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!("{err:#}");
            ExitCode::FAILURE
        }
    }
}
