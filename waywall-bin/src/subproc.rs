// SPDX-License-Identifier: GPL-3.0-only

//! Supervision of subprocesses launched by configuration actions.
//!
//! Every child gets a pidfd registered on the event loop; exit handling
//! reaps the child, signals the pidfd once more (tolerating ESRCH) and
//! compacts the table.

use std::{
    os::fd::OwnedFd,
    process::{Command, Stdio},
    rc::Rc,
};

use calloop::{generic::Generic, Interest, LoopHandle, Mode, PostAction, RegistrationToken};
use rustix::{
    io::Errno,
    process::{pidfd_open, pidfd_send_signal, waitpid, Pid, PidfdFlags, Signal, WaitOptions},
};
use tracing::{error, info};

use crate::state::State;

struct Entry {
    pid: i32,
    pidfd: Rc<OwnedFd>,
    token: RegistrationToken,
}

#[derive(Default)]
pub struct Subproc {
    entries: Vec<Entry>,
}

impl Subproc {
    pub fn new() -> Self {
        Self::default()
    }

    /// Splits a configured command line and executes it; the entry point
    /// for configuration-driven actions.
    pub fn exec_line(&mut self, handle: &LoopHandle<'static, State>, line: &str) {
        match shlex::split(line) {
            Some(argv) if !argv.is_empty() => self.exec(handle, &argv),
            _ => error!("failed to parse command line {line:?}"),
        }
    }

    /// Forks and execs `argv`, with stdout pointed at /dev/null. Spawn
    /// failures are logged, not fatal.
    pub fn exec(&mut self, handle: &LoopHandle<'static, State>, argv: &[String]) {
        let Some((program, args)) = argv.split_first() else {
            error!("refusing to exec an empty command");
            return;
        };

        let child = match Command::new(program).args(args).stdout(Stdio::null()).spawn() {
            Ok(child) => child,
            Err(err) => {
                error!("failed to spawn {program:?}: {err}");
                return;
            }
        };

        let pid = child.id() as i32;
        let pidfd = match Pid::from_raw(pid).ok_or(Errno::SRCH).and_then(|p| {
            pidfd_open(p, PidfdFlags::empty())
        }) {
            Ok(pidfd) => Rc::new(pidfd),
            Err(err) => {
                error!("failed to open pidfd for subprocess {pid}: {err}");
                return;
            }
        };

        let source_fd = pidfd.clone();
        let token = match handle.insert_source(
            Generic::new(source_fd, Interest::READ, Mode::Level),
            move |_, _, state: &mut State| {
                state.subproc.reap(pid);
                Ok(PostAction::Remove)
            },
        ) {
            Ok(token) => token,
            Err(err) => {
                error!("failed to watch subprocess {pid}: {err}");
                return;
            }
        };

        info!("launched {program:?} (pid {pid})");
        self.entries.push(Entry { pid, pidfd, token });
    }

    /// pidfd became readable: the child exited.
    fn reap(&mut self, pid: i32) {
        let Some(index) = self.entries.iter().position(|e| e.pid == pid) else {
            return;
        };
        let entry = self.entries.remove(index);

        if let Some(pid) = Pid::from_raw(entry.pid) {
            if let Err(err) = waitpid(Some(pid), WaitOptions::empty()) {
                error!("failed to waitpid on child process {}: {err}", entry.pid);
            }
        }
        match pidfd_send_signal(&*entry.pidfd, Signal::KILL) {
            Ok(()) | Err(Errno::SRCH) => {}
            Err(err) => error!("failed to kill child process {}: {err}", entry.pid),
        }

        info!("subprocess {} exited", entry.pid);
    }

    /// Shutdown path: every child is killed and its source removed.
    pub fn kill_all(&mut self, handle: &LoopHandle<'static, State>) {
        for entry in self.entries.drain(..) {
            match pidfd_send_signal(&*entry.pidfd, Signal::KILL) {
                Ok(()) | Err(Errno::SRCH) => {}
                Err(err) => error!("failed to kill child process {}: {err}", entry.pid),
            }
            handle.remove(entry.token);
        }
    }
}
