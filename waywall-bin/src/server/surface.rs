// SPDX-License-Identifier: GPL-3.0-only

//! The per-surface state machine.
//!
//! Every guest `wl_surface` owns a remote twin on the host connection.
//! Requests accumulate in a pending block; `commit` replays the block
//! onto the twin in protocol order and replaces it with a fresh one.

use bitflags::bitflags;
use tracing::warn;
use wayland_client::protocol::{
    wl_callback as c_wl_callback, wl_subsurface as c_wl_subsurface, wl_surface as c_wl_surface,
};
use wayland_protocols::wp::viewporter::client::wp_viewport as c_wp_viewport;
use wayland_server::{
    backend::protocol::ProtocolError,
    protocol::{
        wl_callback::WlCallback,
        wl_output::Transform,
        wl_surface::{self, WlSurface},
    },
    Dispatch, DisplayHandle, Resource, WEnum,
};

use crate::{
    server::buffer::BufferKey,
    state::State,
    util::{Key, Rect},
};

pub type SurfaceKey = Key<Surface>;

bitflags! {
    /// Which fields of a pending block were set since the last commit.
    #[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
    pub struct Present: u8 {
        const BUFFER = 1 << 0;
        const DAMAGE = 1 << 1;
        const BUFFER_DAMAGE = 1 << 2;
    }
}

/// The role bound to a surface. At most one role is ever assigned; a
/// different role can never replace it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    None,
    XdgToplevel,
    XdgPopup,
    Subsurface,
    Cursor,
    X11,
}

#[derive(Debug, Default)]
pub struct PendingState {
    pub present: Present,
    pub buffer: Option<BufferKey>,
    pub damage: Vec<Rect>,
    pub buffer_damage: Vec<Rect>,
    pub frame_callbacks: Vec<WlCallback>,
}

#[derive(Debug)]
pub struct Surface {
    pub resource: WlSurface,
    pub remote: c_wl_surface::WlSurface,

    pub role: Role,
    /// Set while a role-specific resource is alive. The role tag itself
    /// is permanent.
    pub role_active: bool,

    pub pending: PendingState,
    pub current_buffer: Option<BufferKey>,
    pub mapped: bool,

    /// Remote subsurface placing the twin inside the host window; created
    /// when the layout gives the surface a view rectangle.
    pub remote_subsurface: Option<c_wl_subsurface::WlSubsurface>,
    /// Remote viewport scaling the twin to its view rectangle.
    pub remote_viewport: Option<c_wp_viewport::WpViewport>,
    /// Server-side xdg state for surfaces with an xdg role.
    pub xdg: Option<crate::server::xdg_shell::XdgSurfaceData>,
    /// Association serial from the xwayland-shell handshake.
    pub x11_serial: Option<u64>,
}

impl Surface {
    pub fn new(resource: WlSurface, remote: c_wl_surface::WlSurface) -> Self {
        Self {
            resource,
            remote,
            role: Role::None,
            role_active: false,
            pending: PendingState::default(),
            current_buffer: None,
            mapped: false,
            remote_subsurface: None,
            remote_viewport: None,
            xdg: None,
            x11_serial: None,
        }
    }

    /// Assigns a role, upholding the exclusivity invariant.
    pub fn set_role(&mut self, role: Role) -> Result<(), ()> {
        if self.role != Role::None && self.role != role {
            return Err(());
        }
        if self.role_active {
            return Err(());
        }

        self.role = role;
        self.role_active = true;
        Ok(())
    }
}

impl State {
    /// Replays the pending block onto the remote twin. See the ordering
    /// contract in the module docs: attach, damage, damage_buffer, frame,
    /// commit.
    pub fn surface_commit(&mut self, key: SurfaceKey) {
        let qh = self.remote.qh.clone();

        let pending = {
            let surface = &mut self.server.surfaces[key];
            std::mem::take(&mut surface.pending)
        };

        if pending.present.contains(Present::BUFFER) {
            let (remote, old_buffer) = {
                let surface = &mut self.server.surfaces[key];
                (surface.remote.clone(), surface.current_buffer.take())
            };

            let remote_buffer = pending
                .buffer
                .and_then(|b| self.server.buffers.get(b))
                .and_then(|b| b.remote.clone());
            remote.attach(remote_buffer.as_ref(), 0, 0);

            if let Some(old) = old_buffer {
                self.buffer_unref(old);
            }

            self.server.surfaces[key].current_buffer = pending.buffer;
            if let Some(current) = pending.buffer {
                self.server.buffers[current].release_pending = true;
            }
        }

        let surface = &self.server.surfaces[key];
        if pending.present.contains(Present::DAMAGE) {
            for rect in &pending.damage {
                surface.remote.damage(rect.x, rect.y, rect.width, rect.height);
            }
        }
        if pending.present.contains(Present::BUFFER_DAMAGE) {
            for rect in &pending.buffer_damage {
                surface.remote.damage_buffer(rect.x, rect.y, rect.width, rect.height);
            }
        }

        for callback in pending.frame_callbacks {
            surface.remote.frame(&qh, callback);
        }

        surface.remote.commit();

        let was_mapped = self.server.surfaces[key].mapped;
        let mapped = self.server.surfaces[key].current_buffer.is_some();
        self.server.surfaces[key].mapped = mapped;

        if mapped != was_mapped {
            if mapped {
                self.surface_mapped(key);
            } else {
                self.surface_unmapped(key);
            }
        }

        self.gl_capture_commit(key);
        self.xdg_after_commit(key);
    }

    fn surface_attach(
        &mut self,
        key: SurfaceKey,
        dh: &DisplayHandle,
        buffer: Option<&wayland_server::protocol::wl_buffer::WlBuffer>,
        x: i32,
        y: i32,
    ) {
        let resource = self.server.surfaces[key].resource.clone();

        let Some(buffer) = buffer else {
            if let Some(old) = self.server.surfaces[key].pending.buffer.take() {
                self.buffer_unref(old);
            }
            let pending = &mut self.server.surfaces[key].pending;
            pending.buffer = None;
            pending.present |= Present::BUFFER;
            return;
        };

        // Attach offsets would desynchronize the layout's view rectangles
        // from what the host displays.
        if x != 0 || y != 0 {
            if resource.version() >= 5 {
                resource.post_error(
                    wl_surface::Error::InvalidOffset,
                    "non-zero offset provided to wl_surface.attach",
                );
            } else if let Some(client) = resource.client() {
                dh.backend_handle().kill_client(
                    client.id(),
                    wayland_server::backend::DisconnectReason::ProtocolError(ProtocolError {
                        code: 0,
                        object_id: resource.id().protocol_id(),
                        object_interface: "wl_surface".into(),
                        message: "non-zero offset provided to wl_surface.attach".into(),
                    }),
                );
            }
            return;
        }

        let buffer_key = *buffer.data::<BufferKey>().expect("buffer without key");
        if let Some(old) = self.server.surfaces[key].pending.buffer.take() {
            self.buffer_unref(old);
        }
        self.buffer_ref(buffer_key);

        let pending = &mut self.server.surfaces[key].pending;
        pending.buffer = Some(buffer_key);
        pending.present |= Present::BUFFER;
    }

    /// Full teardown when the guest resource goes away. Buffers are
    /// released before the remote twin is destroyed.
    fn surface_destroyed(&mut self, key: SurfaceKey) {
        self.surface_pre_destroy(key);

        let Some(surface) = self.server.surfaces.remove(key) else {
            return;
        };

        if let Some(buffer) = surface.pending.buffer {
            self.buffer_unref(buffer);
        }
        if let Some(buffer) = surface.current_buffer {
            self.buffer_unref(buffer);
        }

        if let Some(viewport) = surface.remote_viewport {
            viewport.destroy();
        }
        if let Some(subsurface) = surface.remote_subsurface {
            subsurface.destroy();
        }
        surface.remote.destroy();
    }
}

impl Dispatch<WlSurface, SurfaceKey> for State {
    fn request(
        state: &mut Self,
        _client: &wayland_server::Client,
        resource: &WlSurface,
        request: wl_surface::Request,
        key: &SurfaceKey,
        dh: &DisplayHandle,
        data_init: &mut wayland_server::DataInit<'_, Self>,
    ) {
        let key = *key;

        match request {
            wl_surface::Request::Attach { buffer, x, y } => {
                state.surface_attach(key, dh, buffer.as_ref(), x, y);
            }
            wl_surface::Request::Damage { x, y, width, height } => {
                let pending = &mut state.server.surfaces[key].pending;
                pending.damage.push(Rect::new(x, y, width, height));
                pending.present |= Present::DAMAGE;
            }
            wl_surface::Request::DamageBuffer { x, y, width, height } => {
                let pending = &mut state.server.surfaces[key].pending;
                pending.buffer_damage.push(Rect::new(x, y, width, height));
                pending.present |= Present::BUFFER_DAMAGE;
            }
            wl_surface::Request::Frame { callback } => {
                let callback = data_init.init(callback, ());
                state.server.surfaces[key].pending.frame_callbacks.push(callback);
            }
            wl_surface::Request::Commit => {
                state.surface_commit(key);
            }
            wl_surface::Request::SetBufferScale { scale } => {
                if scale <= 0 {
                    resource.post_error(wl_surface::Error::InvalidScale, "scale not positive");
                    return;
                }
                if scale != 1 {
                    warn!("non-default buffer scale {scale} for surface {key:?}");
                }
            }
            wl_surface::Request::SetBufferTransform { transform } => {
                // The NVIDIA userspace driver issues this; warn and move on.
                if transform != WEnum::Value(Transform::Normal) {
                    warn!("client requested non-normal buffer transform");
                }
            }
            wl_surface::Request::Offset { x, y } => {
                // Also seen from the NVIDIA driver.
                if x != 0 || y != 0 {
                    warn!("wl_surface.offset called with non-zero offset");
                }
            }
            wl_surface::Request::SetInputRegion { .. } => {
                // Guest input regions are ignored; every twin carries an
                // empty input region so the root surface receives all
                // host input.
            }
            wl_surface::Request::SetOpaqueRegion { .. } => {}
            wl_surface::Request::Destroy => {}
            _ => {}
        }
    }

    fn destroyed(
        state: &mut Self,
        _client: wayland_server::backend::ClientId,
        _resource: &WlSurface,
        key: &SurfaceKey,
    ) {
        state.surface_destroyed(*key);
    }
}

/// Guest frame callbacks never issue requests.
impl Dispatch<WlCallback, ()> for State {
    fn request(
        _state: &mut Self,
        _client: &wayland_server::Client,
        _resource: &WlCallback,
        _request: <WlCallback as Resource>::Request,
        _data: &(),
        _dh: &DisplayHandle,
        _data_init: &mut wayland_server::DataInit<'_, Self>,
    ) {
        unreachable!("wl_callback has no requests");
    }
}

/// Remote frame callbacks carry the guest callback they complete.
impl wayland_client::Dispatch<c_wl_callback::WlCallback, WlCallback> for State {
    fn event(
        _state: &mut Self,
        _proxy: &c_wl_callback::WlCallback,
        event: c_wl_callback::Event,
        guest: &WlCallback,
        _conn: &wayland_client::Connection,
        _qh: &wayland_client::QueueHandle<Self>,
    ) {
        if let c_wl_callback::Event::Done { callback_data } = event {
            guest.done(callback_data);
        }
    }
}
