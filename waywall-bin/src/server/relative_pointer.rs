// SPDX-License-Identifier: GPL-3.0-only

//! `zwp_relative_pointer_manager_v1` façade. Relative motion is only
//! meaningful for the focused guest, so remote events fan out through
//! the router's focus state.

use tracing::warn;
use wayland_protocols::wp::relative_pointer::zv1::server::{
    zwp_relative_pointer_manager_v1::{self, ZwpRelativePointerManagerV1},
    zwp_relative_pointer_v1::{self, ZwpRelativePointerV1},
};
use wayland_server::{Dispatch, DisplayHandle, GlobalDispatch};

use crate::state::State;

impl GlobalDispatch<ZwpRelativePointerManagerV1, ()> for State {
    fn bind(
        _state: &mut Self,
        _dh: &DisplayHandle,
        _client: &wayland_server::Client,
        resource: wayland_server::New<ZwpRelativePointerManagerV1>,
        _global_data: &(),
        data_init: &mut wayland_server::DataInit<'_, Self>,
    ) {
        data_init.init(resource, ());
    }
}

impl Dispatch<ZwpRelativePointerManagerV1, ()> for State {
    fn request(
        state: &mut Self,
        _client: &wayland_server::Client,
        _resource: &ZwpRelativePointerManagerV1,
        request: zwp_relative_pointer_manager_v1::Request,
        _data: &(),
        _dh: &DisplayHandle,
        data_init: &mut wayland_server::DataInit<'_, Self>,
    ) {
        match request {
            zwp_relative_pointer_manager_v1::Request::GetRelativePointer { id, pointer: _ } => {
                let relative = data_init.init(id, ());
                state.router.relative_pointers.push(relative);
                state.ensure_remote_relative_pointer();
            }
            zwp_relative_pointer_manager_v1::Request::Destroy => {}
            _ => {}
        }
    }
}

impl State {
    /// Lazily creates the remote relative pointer once any guest wants
    /// relative motion.
    fn ensure_remote_relative_pointer(&mut self) {
        if self.remote.relative_pointer.is_some() {
            return;
        }

        let manager = self.remote.relative_pointer_manager.clone();
        let Some(pointer) = self.remote.pointer.clone() else {
            warn!("relative pointer requested before the host seat has a pointer");
            return;
        };

        let qh = self.remote.qh.clone();
        self.remote.relative_pointer = Some(manager.get_relative_pointer(&pointer, &qh, ()));
    }
}

impl Dispatch<ZwpRelativePointerV1, ()> for State {
    fn request(
        _state: &mut Self,
        _client: &wayland_server::Client,
        _resource: &ZwpRelativePointerV1,
        request: zwp_relative_pointer_v1::Request,
        _data: &(),
        _dh: &DisplayHandle,
        _data_init: &mut wayland_server::DataInit<'_, Self>,
    ) {
        if let zwp_relative_pointer_v1::Request::Destroy = request {}
    }

    fn destroyed(
        state: &mut Self,
        _client: wayland_server::backend::ClientId,
        resource: &ZwpRelativePointerV1,
        _data: &(),
    ) {
        state.router.relative_pointers.retain(|r| r != resource);
    }
}
