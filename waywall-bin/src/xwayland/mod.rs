// SPDX-License-Identifier: GPL-3.0-only

//! Xwayland supervision.
//!
//! The X server is spawned lazily from an idle source, attached to the
//! guest display as an ordinary `wl_client` over a socket pair, and
//! supervised through a pidfd. The window-manager socket is owned here
//! but driven by the XWM endpoint, which lives outside the kernel.

mod xserver;

pub use xserver::{parse_display_line, XServer, XWaylandClientMarker};

use tracing::{error, info};

use crate::state::State;

impl State {
    /// Idle-deferred startup.
    pub fn xwayland_start(&mut self) {
        let Some(mut xwayland) = self.xwayland.take() else {
            return;
        };

        if let Err(err) = xwayland.start(&self.server.dh, &self.loop_handle) {
            error!("failed to start Xwayland: {err}");
            self.shutdown();
            return;
        }
        self.xwayland = Some(xwayland);
    }

    /// The readiness pipe produced a display number; fires at most once
    /// per supervisor lifetime.
    pub fn xwayland_ready(&mut self, display: u32) {
        let Some(xwayland) = self.xwayland.as_mut() else {
            return;
        };
        if xwayland.ready {
            return;
        }
        xwayland.ready = true;
        xwayland.display = Some(display);

        info!("using X11 display :{display}");
        std::env::set_var("DISPLAY", format!(":{display}"));

        if let Some(display_file) = self.display_file.as_mut() {
            if let Err(err) = display_file.append_x11_display(display) {
                error!("failed to record X11 display: {err}");
            }
        }

        // The wrapped command waits for the full environment.
        self.spawn_wrap_child();
    }

    /// The X server died: the compositor cannot continue without it.
    pub fn xwayland_exited(&mut self) {
        info!("Xwayland process died");
        self.shutdown();
    }
}
