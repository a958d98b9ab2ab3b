// SPDX-License-Identifier: GPL-3.0-only

//! The X server child process.

use std::{
    os::{
        fd::{AsFd, AsRawFd, OwnedFd, RawFd},
        unix::{net::UnixStream, process::CommandExt},
    },
    process::{Child, Command, Stdio},
    rc::Rc,
};

use anyhow::{Context, Result};
use calloop::{generic::Generic, Interest, LoopHandle, Mode, PostAction, RegistrationToken};
use rustix::{
    io::Errno,
    net::{socketpair, AddressFamily, SocketFlags, SocketType},
    pipe::{pipe_with, PipeFlags},
    process::{pidfd_open, pidfd_send_signal, waitpid, Pid, PidfdFlags, Signal, WaitOptions},
};
use tracing::{error, info};
use wayland_server::{
    backend::{ClientData, ClientId, DisconnectReason},
    Client, DisplayHandle,
};

use crate::state::State;

/// Extracts the display number from the readiness pipe contents once a
/// full line has arrived.
pub fn parse_display_line(buf: &[u8]) -> Option<u32> {
    let newline = buf.iter().position(|&b| b == b'\n')?;
    std::str::from_utf8(&buf[..newline]).ok()?.trim().parse().ok()
}

/// Client data marking the Xwayland connection; also the gate for the
/// xwayland-shell global.
pub struct XWaylandClientMarker;

impl ClientData for XWaylandClientMarker {
    fn initialized(&self, _client_id: ClientId) {}

    fn disconnected(&self, _client_id: ClientId, _reason: DisconnectReason) {
        info!("Xwayland dropped wayland connection");
    }
}

pub struct XServer {
    pub display: Option<u32>,
    pub ready: bool,

    // Our ends of the transports. The child ends are dropped once the
    // process holds them.
    fd_wl: Option<OwnedFd>,
    fd_wl_child: Option<OwnedFd>,
    fd_xwm: Option<OwnedFd>,
    fd_xwm_child: Option<OwnedFd>,

    client: Option<Client>,
    child: Option<Child>,
    pidfd: Option<Rc<OwnedFd>>,
    pipe_buf: Vec<u8>,

    sources: Vec<RegistrationToken>,
}

impl XServer {
    /// Creates the socket pairs and schedules startup on the next idle
    /// dispatch.
    pub fn new(handle: &LoopHandle<'static, State>) -> Result<Self> {
        let (wl_ours, wl_child) =
            socketpair(AddressFamily::UNIX, SocketType::STREAM, SocketFlags::CLOEXEC, None)
                .context("failed to create wayland socket pair")?;
        let (xwm_ours, xwm_child) =
            socketpair(AddressFamily::UNIX, SocketType::STREAM, SocketFlags::CLOEXEC, None)
                .context("failed to create xwm socket pair")?;

        handle.insert_idle(|state| state.xwayland_start());

        Ok(Self {
            display: None,
            ready: false,
            fd_wl: Some(wl_ours),
            fd_wl_child: Some(wl_child),
            fd_xwm: Some(xwm_ours),
            fd_xwm_child: Some(xwm_child),
            client: None,
            child: None,
            pidfd: None,
            pipe_buf: Vec::new(),
            sources: Vec::new(),
        })
    }

    /// The window-manager transport, handed to the XWM endpoint.
    pub fn take_xwm_socket(&mut self) -> Option<OwnedFd> {
        self.fd_xwm.take()
    }

    pub fn start(
        &mut self,
        dh: &DisplayHandle,
        handle: &LoopHandle<'static, State>,
    ) -> Result<()> {
        // The Wayland client must exist before the child connects.
        let fd_wl = self.fd_wl.take().context("xserver already started")?;
        let client = dh
            .insert_client(UnixStream::from(fd_wl), std::sync::Arc::new(XWaylandClientMarker))
            .context("failed to create wayland client for xserver")?;
        self.client = Some(client);

        let (pipe_read, pipe_write) =
            pipe_with(PipeFlags::CLOEXEC).context("failed to create readiness pipe")?;

        let fd_wl_child = self.fd_wl_child.take().context("wayland child fd missing")?;
        let fd_xwm_child = self.fd_xwm_child.take().context("xwm child fd missing")?;

        let child = spawn_xwayland(
            fd_wl_child.as_raw_fd(),
            fd_xwm_child.as_raw_fd(),
            pipe_write.as_raw_fd(),
        )
        .context("failed to spawn Xwayland")?;

        // Child-owned fds close here; the child keeps its duplicates.
        drop(fd_wl_child);
        drop(fd_xwm_child);
        drop(pipe_write);

        let pid = Pid::from_child(&child);
        let pidfd = Rc::new(
            pidfd_open(pid, PidfdFlags::empty()).context("failed to open pidfd for Xwayland")?,
        );
        self.child = Some(child);
        self.pidfd = Some(pidfd.clone());

        let raw_pid = self.child.as_ref().unwrap().id() as i32;
        let token = handle
            .insert_source(
                Generic::new(pidfd, Interest::READ, Mode::Level),
                move |_, _, state| {
                    if let Some(pid) = Pid::from_raw(raw_pid) {
                        let _ = waitpid(Some(pid), WaitOptions::empty());
                    }
                    state.xwayland_exited();
                    Ok(PostAction::Remove)
                },
            )
            .map_err(|err| anyhow::anyhow!("failed to watch Xwayland pidfd: {err}"))?;
        self.sources.push(token);

        let token = handle
            .insert_source(
                Generic::new(pipe_read, Interest::READ, Mode::Level),
                |_, fd, state| Ok(state.xwayland_pipe_readable(fd.as_raw_fd())),
            )
            .map_err(|err| anyhow::anyhow!("failed to watch readiness pipe: {err}"))?;
        self.sources.push(token);

        info!("running Xwayland");
        Ok(())
    }

    /// Shutdown: SIGKILL through the pidfd (ESRCH tolerated), close all
    /// transports, destroy the attached client.
    pub fn destroy(&mut self, dh: &DisplayHandle) {
        if let Some(pidfd) = self.pidfd.take() {
            match pidfd_send_signal(&*pidfd, Signal::KILL) {
                Ok(()) | Err(Errno::SRCH) => {}
                Err(err) => error!("failed to kill Xwayland: {err}"),
            }
        }
        if let Some(mut child) = self.child.take() {
            let _ = child.wait();
        }

        if let Some(client) = self.client.take() {
            dh.backend_handle().kill_client(client.id(), DisconnectReason::ConnectionClosed);
        }

        self.fd_wl = None;
        self.fd_wl_child = None;
        self.fd_xwm = None;
        self.fd_xwm_child = None;
    }
}

impl State {
    /// Reads from the readiness pipe. Short reads are tolerated; EINTR
    /// retries; a hangup before a full line is a fatal startup failure.
    pub fn xwayland_pipe_readable(&mut self, fd: RawFd) -> PostAction {
        let mut buf = [0u8; 64];
        let n = loop {
            // SAFETY: the fd is owned by the calloop source that invoked
            // us and stays open for the duration of the callback.
            let borrowed = unsafe { std::os::fd::BorrowedFd::borrow_raw(fd) };
            match rustix::io::read(borrowed, &mut buf) {
                Ok(n) => break n,
                Err(Errno::INTR) => continue,
                Err(err) => {
                    error!("failed to read from xwayland displayfd: {err}");
                    self.shutdown();
                    return PostAction::Remove;
                }
            }
        };

        if n == 0 {
            // Hangup without a complete line.
            if let Some(xwayland) = self.xwayland.as_ref() {
                if !xwayland.ready {
                    error!("xwayland startup failed");
                    self.shutdown();
                }
            }
            return PostAction::Remove;
        }

        if let Some(xwayland) = self.xwayland.as_mut() {
            xwayland.pipe_buf.extend_from_slice(&buf[..n]);
            if let Some(display) = parse_display_line(&xwayland.pipe_buf) {
                self.xwayland_ready(display);
                return PostAction::Remove;
            }
        }
        PostAction::Continue
    }
}

fn spawn_xwayland(fd_wl: RawFd, fd_xwm: RawFd, notify_fd: RawFd) -> std::io::Result<Child> {
    let mut command = Command::new("Xwayland");
    command
        .arg("-rootless")
        .arg("-core")
        .arg("-noreset")
        .arg("-displayfd")
        .arg(notify_fd.to_string())
        .arg("-wm")
        .arg(fd_xwm.to_string())
        .env("WAYLAND_SOCKET", fd_wl.to_string())
        .stdin(Stdio::null());

    unsafe {
        command.pre_exec(move || {
            // The child keeps exactly these fds across exec.
            for fd in [fd_wl, fd_xwm, notify_fd] {
                let borrowed = std::os::fd::BorrowedFd::borrow_raw(fd);
                rustix::io::fcntl_setfd(borrowed, rustix::io::FdFlags::empty())?;
            }
            Ok(())
        });
    }

    command.spawn()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_complete_line() {
        assert_eq!(parse_display_line(b"42\n"), Some(42));
        assert_eq!(parse_display_line(b"0\n"), Some(0));
    }

    #[test]
    fn waits_for_newline() {
        assert_eq!(parse_display_line(b""), None);
        assert_eq!(parse_display_line(b"4"), None);
        assert_eq!(parse_display_line(b"42"), None);
    }

    #[test]
    fn tolerates_split_reads() {
        let mut buf = Vec::new();
        buf.extend_from_slice(b"1");
        assert_eq!(parse_display_line(&buf), None);
        buf.extend_from_slice(b"2\n");
        assert_eq!(parse_display_line(&buf), Some(12));
    }

    #[test]
    fn rejects_garbage() {
        assert_eq!(parse_display_line(b"abc\n"), None);
        assert_eq!(parse_display_line(b"-3\n"), None);
    }
}
