// SPDX-License-Identifier: GPL-3.0-only

//! `waywall wrap`: run a single command inside the compositor and shut
//! down when it exits.

use std::{
    os::fd::OwnedFd,
    process::{Child, Command},
    rc::Rc,
};

use anyhow::{Context, Result};
use calloop::{generic::Generic, Interest, Mode, PostAction};
use rustix::process::{pidfd_open, waitpid, Pid, PidfdFlags, WaitOptions};
use tracing::{error, info};
use waywall_config::Profile;

use crate::{config_watch, env_reexec, state::State};

pub fn run(
    profile_name: Option<&str>,
    command: Vec<String>,
    args: &[String],
    no_env_reexec: bool,
) -> Result<()> {
    if !no_env_reexec {
        env_reexec::maybe_reexec(args)?;
    }

    let profile = Profile::load_or_default(profile_name)?;
    let (event_loop, mut state) = super::create_compositor(profile)?;

    let _watcher = config_watch::watch_config(
        &event_loop.handle(),
        profile_name.map(str::to_owned),
    )?;

    state.wrap_child = Some(command);

    super::run_event_loop(event_loop, &mut state)?;

    info!("done");
    Ok(())
}

impl State {
    /// Starts the wrapped command once the compositor's sockets exist;
    /// called from the Xwayland ready path so DISPLAY is complete.
    pub fn spawn_wrap_child(&mut self) {
        let Some(argv) = self.wrap_child.take() else {
            return;
        };
        let Some((program, args)) = argv.split_first() else {
            error!("wrap: empty command");
            self.shutdown();
            return;
        };

        let mut command = Command::new(program);
        command.args(args);

        // The preserved pre-re-exec environment, with our own displays
        // layered on top.
        if let Some(env) = env_reexec::passthrough_env() {
            command.env_clear().envs(env);
        }
        command.env("WAYLAND_DISPLAY", &self.server.socket_name);
        if let Some(display) = self.xwayland.as_ref().and_then(|x| x.display) {
            command.env("DISPLAY", format!(":{display}"));
        }

        let child = match command.spawn() {
            Ok(child) => child,
            Err(err) => {
                error!("failed to exec {program:?}: {err}");
                self.shutdown();
                return;
            }
        };

        info!("wrapped command running (pid {})", child.id());
        if let Err(err) = self.watch_wrap_child(child) {
            error!("failed to watch wrapped command: {err}");
            self.shutdown();
        }
    }

    fn watch_wrap_child(&mut self, child: Child) -> Result<()> {
        let pid = child.id() as i32;
        let pidfd: Rc<OwnedFd> = Rc::new(
            pidfd_open(Pid::from_child(&child), PidfdFlags::empty())
                .context("failed to open pidfd for child process")?,
        );

        self.loop_handle
            .insert_source(
                Generic::new(pidfd, Interest::READ, Mode::Level),
                move |_, _, state: &mut State| {
                    if let Some(pid) = Pid::from_raw(pid) {
                        let _ = waitpid(Some(pid), WaitOptions::empty());
                    }
                    info!("child process ended, shutting down");
                    state.shutdown();
                    Ok(PostAction::Remove)
                },
            )
            .map_err(|err| anyhow::anyhow!("failed to insert child source: {err}"))?;

        Ok(())
    }
}
