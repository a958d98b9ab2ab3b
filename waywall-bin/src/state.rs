// SPDX-License-Identifier: GPL-3.0-only

//! Global compositor state threaded through the event loop.

use std::{cell::RefCell, rc::Rc};

use calloop::{LoopHandle, LoopSignal};
use tracing::info;
use wayland_server::Display;
use waywall_config::Profile;

use crate::{
    cpu::CpuManager,
    display_file::DisplayFile,
    gl::GlState,
    input::Router,
    instance::InstanceManager,
    remote::{buffer_pool::BufferPool, Remote},
    server::Server,
    subproc::Subproc,
    ui::Ui,
    xwayland::XServer,
};

pub struct State {
    pub profile: Profile,
    pub loop_handle: LoopHandle<'static, State>,
    pub loop_signal: LoopSignal,

    pub remote: Remote,
    pub pool: BufferPool,
    pub server: Server,
    pub ui: Ui,
    pub router: Router,
    pub gl: Option<GlState>,

    pub cpu: Option<Box<dyn CpuManager>>,
    pub instances: InstanceManager,
    pub subproc: Subproc,
    pub xwayland: Option<XServer>,

    /// The guest display, shared with its calloop source.
    pub display: Rc<RefCell<Display<State>>>,
    pub display_file: Option<DisplayFile>,

    /// Command to spawn once the compositor is ready (`wrap` mode).
    pub wrap_child: Option<Vec<String>>,

    pub shutting_down: bool,
}

impl State {
    /// Cooperative shutdown: the event loop stops at its next iteration.
    pub fn shutdown(&mut self) {
        if self.shutting_down {
            return;
        }
        self.shutting_down = true;
        info!("shutting down");

        if let Some(mut xwayland) = self.xwayland.take() {
            xwayland.destroy(&self.server.dh);
        }
        self.subproc.kill_all(&self.loop_handle);
        self.loop_signal.stop();
    }

    /// Flushes both protocol directions; called after every loop
    /// iteration.
    pub fn flush(&mut self) {
        let _ = self.remote.conn.flush();
        let _ = self.display.clone().borrow_mut().flush_clients();
    }
}
