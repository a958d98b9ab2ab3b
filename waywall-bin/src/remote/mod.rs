// SPDX-License-Identifier: GPL-3.0-only

//! The connection to the host compositor.
//!
//! waywall is itself an ordinary Wayland client of the host. This module
//! binds the host globals the kernel depends on; every one of them is
//! required, and startup fails when the host lacks one.

pub mod buffer_pool;
pub mod handlers;

use anyhow::{Context, Result};
use wayland_client::{
    globals::GlobalList,
    protocol::{
        wl_compositor::WlCompositor, wl_keyboard::WlKeyboard, wl_pointer::WlPointer,
        wl_seat::WlSeat, wl_shm::{Format, WlShm}, wl_subcompositor::WlSubcompositor,
    },
    Connection, QueueHandle,
};
use wayland_protocols::{
    wp::{
        linux_dmabuf::zv1::client::{
            zwp_linux_dmabuf_feedback_v1::ZwpLinuxDmabufFeedbackV1,
            zwp_linux_dmabuf_v1::ZwpLinuxDmabufV1,
        },
        pointer_constraints::zv1::client::{
            zwp_confined_pointer_v1::ZwpConfinedPointerV1,
            zwp_locked_pointer_v1::ZwpLockedPointerV1,
            zwp_pointer_constraints_v1::ZwpPointerConstraintsV1,
        },
        relative_pointer::zv1::client::{
            zwp_relative_pointer_manager_v1::ZwpRelativePointerManagerV1,
            zwp_relative_pointer_v1::ZwpRelativePointerV1,
        },
        viewporter::client::wp_viewporter::WpViewporter,
    },
    xdg::shell::client::xdg_wm_base::XdgWmBase,
};
use crate::state::State;

pub struct Remote {
    pub conn: Connection,
    pub qh: QueueHandle<State>,

    pub compositor: WlCompositor,
    pub subcompositor: WlSubcompositor,
    pub shm: WlShm,
    pub seat: WlSeat,
    pub viewporter: WpViewporter,
    pub dmabuf: ZwpLinuxDmabufV1,
    pub pointer_constraints: ZwpPointerConstraintsV1,
    pub relative_pointer_manager: ZwpRelativePointerManagerV1,
    pub xdg_wm_base: XdgWmBase,

    /// Created once the host seat advertises the matching capability.
    pub pointer: Option<WlPointer>,
    pub keyboard: Option<WlKeyboard>,
    /// Created lazily when a guest first asks for relative motion.
    pub relative_pointer: Option<ZwpRelativePointerV1>,

    pub locked_pointers: Vec<ZwpLockedPointerV1>,
    pub confined_pointers: Vec<ZwpConfinedPointerV1>,
    pub feedbacks: Vec<ZwpLinuxDmabufFeedbackV1>,

    /// Formats collected from the host during startup.
    pub shm_formats: Vec<Format>,
    pub dmabuf_formats: Vec<(u32, u64)>,

    pub last_pointer_serial: u32,
}

impl Remote {
    /// Binds every required host global. Versions are capped at what the
    /// kernel implements; guests are advertised the effective versions.
    pub fn bind(conn: &Connection, globals: &GlobalList, qh: &QueueHandle<State>) -> Result<Self> {
        Ok(Self {
            conn: conn.clone(),
            qh: qh.clone(),
            compositor: globals
                .bind(qh, 4..=6, ())
                .context("host compositor is missing wl_compositor")?,
            subcompositor: globals
                .bind(qh, 1..=1, ())
                .context("host compositor is missing wl_subcompositor")?,
            shm: globals.bind(qh, 1..=1, ()).context("host compositor is missing wl_shm")?,
            seat: globals.bind(qh, 5..=7, ()).context("host compositor is missing wl_seat")?,
            viewporter: globals
                .bind(qh, 1..=1, ())
                .context("host compositor is missing wp_viewporter")?,
            dmabuf: globals
                .bind(qh, 3..=4, ())
                .context("host compositor is missing zwp_linux_dmabuf_v1")?,
            pointer_constraints: globals
                .bind(qh, 1..=1, ())
                .context("host compositor is missing zwp_pointer_constraints_v1")?,
            relative_pointer_manager: globals
                .bind(qh, 1..=1, ())
                .context("host compositor is missing zwp_relative_pointer_manager_v1")?,
            xdg_wm_base: globals
                .bind(qh, 1..=5, ())
                .context("host compositor is missing xdg_wm_base")?,
            pointer: None,
            keyboard: None,
            relative_pointer: None,
            locked_pointers: Vec::new(),
            confined_pointers: Vec::new(),
            feedbacks: Vec::new(),
            shm_formats: Vec::new(),
            dmabuf_formats: Vec::new(),
            last_pointer_serial: 0,
        })
    }

    /// The dmabuf version guests may bind.
    pub fn dmabuf_version(&self) -> u32 {
        wayland_client::Proxy::version(&self.dmabuf)
    }

    pub fn locked_pointer_for(
        &self,
        server: &wayland_protocols::wp::pointer_constraints::zv1::server::zwp_locked_pointer_v1::ZwpLockedPointerV1,
    ) -> Option<ZwpLockedPointerV1> {
        use wayland_client::Proxy;
        self.locked_pointers
            .iter()
            .find(|remote| {
                remote
                    .data::<wayland_protocols::wp::pointer_constraints::zv1::server::zwp_locked_pointer_v1::ZwpLockedPointerV1>()
                    == Some(server)
            })
            .cloned()
    }

    pub fn destroy_feedback_for(
        &mut self,
        server: &wayland_protocols::wp::linux_dmabuf::zv1::server::zwp_linux_dmabuf_feedback_v1::ZwpLinuxDmabufFeedbackV1,
    ) {
        use wayland_client::Proxy;
        self.feedbacks.retain(|remote| {
            if remote
                .data::<wayland_protocols::wp::linux_dmabuf::zv1::server::zwp_linux_dmabuf_feedback_v1::ZwpLinuxDmabufFeedbackV1>()
                == Some(server)
            {
                remote.destroy();
                false
            } else {
                true
            }
        });
    }

    /// ARGB8888 must be available for the shared buffer pool.
    pub fn check_shm_formats(&self) -> Result<()> {
        if self.shm_formats.contains(&Format::Argb8888) {
            Ok(())
        } else {
            anyhow::bail!("host does not support the ARGB8888 shm format");
        }
    }
}

/// Marker user data for the root window's host-side objects.
#[derive(Debug, Clone, Copy)]
pub struct RootWindow;
