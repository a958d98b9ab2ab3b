// SPDX-License-Identifier: GPL-3.0-only

//! Environment passthrough for `wrap`.
//!
//! PrismLauncher wraps the game command with LD_PRELOAD, Nvidia PRIME
//! and Zink overrides that are meant for the game, not the compositor.
//! `wrap` therefore copies its own environment into a memfd, re-executes
//! itself with the environment of its parent process, and later starts
//! the game with the preserved environment from the memfd.

use std::{
    ffi::{OsStr, OsString},
    fs::File,
    io::{Read, Seek, Write},
    os::{
        fd::{FromRawFd, IntoRawFd, OwnedFd},
        unix::ffi::{OsStrExt, OsStringExt},
        unix::process::CommandExt,
    },
    process::Command,
};

use anyhow::{Context, Result};
use rustix::fs::{memfd_create, MemfdFlags};
use tracing::{info, warn};

pub const PASSTHROUGH_FD_ENV: &str = "__WAYWALL_ENV_PASSTHROUGH_FD";
const ENV_SIZE_LIMIT: u64 = 1 << 20;
const SKIP_VARS: [&str; 2] = ["WAYLAND_DISPLAY", "DISPLAY"];

/// Serializes `K=V` pairs the way `/proc/<pid>/environ` stores them:
/// NUL-terminated entries with a trailing empty entry.
fn encode_env<'a>(vars: impl Iterator<Item = (&'a OsStr, &'a OsStr)>) -> Vec<u8> {
    let mut buf = Vec::new();
    for (key, value) in vars {
        buf.extend_from_slice(key.as_bytes());
        buf.push(b'=');
        buf.extend_from_slice(value.as_bytes());
        buf.push(0);
    }
    buf.push(0);
    buf
}

/// Parses an environ blob. `skip_displays` drops the display variables
/// so they can be re-authored for the compositor's own sockets.
fn decode_env(buf: &[u8], skip_displays: bool) -> Vec<(OsString, OsString)> {
    buf.split(|&b| b == 0)
        .filter(|entry| !entry.is_empty())
        .filter_map(|entry| {
            let eq = entry.iter().position(|&b| b == b'=')?;
            Some((
                OsString::from_vec(entry[..eq].to_vec()),
                OsString::from_vec(entry[eq + 1..].to_vec()),
            ))
        })
        .filter(|(key, _)| {
            !(skip_displays && SKIP_VARS.iter().any(|skip| OsStr::new(skip) == key.as_os_str()))
        })
        .collect()
}

/// Re-executes the process with the parent's environment, leaving the
/// original environment behind in a memfd. Returns `Ok(())` when no
/// re-exec is needed; on success it does not return.
pub fn maybe_reexec(args: &[String]) -> Result<()> {
    if std::env::var_os(PASSTHROUGH_FD_ENV).is_some() {
        info!("skipping env re-exec (got passthrough fd)");
        return Ok(());
    }

    let parent = rustix::process::getppid()
        .map(|pid| pid.as_raw_nonzero().get())
        .context("no parent process")?;
    let path = format!("/proc/{parent}/environ");
    let parent_env = std::fs::read(&path)
        .with_context(|| format!("failed to read parent environment {path}"))?;
    if parent_env.len() as u64 >= ENV_SIZE_LIMIT {
        warn!("parent process environment too large, skipping env re-exec");
        return Ok(());
    }

    // The memfd must survive exec, so it is created without CLOEXEC and
    // leaked into the new process image.
    let memfd: OwnedFd = memfd_create("waywall_env_reexec", MemfdFlags::empty())
        .context("failed to create environ passthrough fd")?;
    let mut file = File::from(memfd);
    let own_env: Vec<(OsString, OsString)> = std::env::vars_os().collect();
    file.write_all(&encode_env(
        own_env.iter().map(|(k, v)| (k.as_os_str(), v.as_os_str())),
    ))
    .context("failed to write environment passthrough fd")?;

    let fd = file.into_raw_fd();
    info!("set passthrough environment fd to {fd}, restarting");

    let mut command = Command::new("/proc/self/exe");
    command
        .args(&args[1..])
        .env_clear()
        .envs(decode_env(&parent_env, false))
        .env(PASSTHROUGH_FD_ENV, fd.to_string());

    let err = command.exec();
    // SAFETY: exec failed, the fd is still ours to close.
    drop(unsafe { OwnedFd::from_raw_fd(fd) });
    Err(err).context("env re-exec failed")
}

/// The environment preserved by a previous [`maybe_reexec`], with the
/// display variables stripped. Consumes and unsets the fd variable.
pub fn passthrough_env() -> Option<Vec<(OsString, OsString)>> {
    let value = std::env::var_os(PASSTHROUGH_FD_ENV)?;
    std::env::remove_var(PASSTHROUGH_FD_ENV);

    let fd: i32 = value.to_str()?.parse().ok()?;
    if fd <= 0 {
        warn!("failed to parse passthrough fd {value:?}");
        return None;
    }

    // SAFETY: the fd number was placed in the environment by our own
    // re-exec and is owned by nobody else.
    let mut file = File::from(unsafe { OwnedFd::from_raw_fd(fd) });
    let mut buf = Vec::new();
    if let Err(err) = file.rewind().and_then(|()| file.read_to_end(&mut buf)) {
        warn!("failed to read passthrough environment: {err}");
        return None;
    }

    Some(decode_env(&buf, true))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pairs(entries: &[(&str, &str)]) -> Vec<(OsString, OsString)> {
        entries.iter().map(|(k, v)| (OsString::from(k), OsString::from(v))).collect()
    }

    #[test]
    fn round_trip() {
        let env = pairs(&[("PATH", "/usr/bin"), ("HOME", "/home/u"), ("EMPTY", "")]);
        let encoded = encode_env(env.iter().map(|(k, v)| (k.as_os_str(), v.as_os_str())));
        assert_eq!(decode_env(&encoded, false), env);
    }

    #[test]
    fn displays_are_stripped() {
        let env = pairs(&[
            ("WAYLAND_DISPLAY", "wayland-1"),
            ("PATH", "/usr/bin"),
            ("DISPLAY", ":0"),
        ]);
        let encoded = encode_env(env.iter().map(|(k, v)| (k.as_os_str(), v.as_os_str())));
        assert_eq!(decode_env(&encoded, true), pairs(&[("PATH", "/usr/bin")]));
    }

    #[test]
    fn values_may_contain_equals() {
        let env = pairs(&[("LD_PRELOAD", "a=b:c=d")]);
        let encoded = encode_env(env.iter().map(|(k, v)| (k.as_os_str(), v.as_os_str())));
        assert_eq!(decode_env(&encoded, false), env);
    }

    #[test]
    fn garbage_entries_are_dropped() {
        assert!(decode_env(b"no-equals-here\0\0", false).is_empty());
    }
}
