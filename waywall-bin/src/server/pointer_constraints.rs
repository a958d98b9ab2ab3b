// SPDX-License-Identifier: GPL-3.0-only

//! `zwp_pointer_constraints_v1` façade.
//!
//! The guest constrains its own surface; the matching remote constraint
//! targets the root window surface, which is where host input actually
//! arrives. Constraint regions are dropped for the same reason input
//! regions are.

use tracing::warn;
use wayland_client::Proxy;
use wayland_protocols::wp::pointer_constraints::zv1::{
    client as c_pc,
    server::{
        zwp_confined_pointer_v1::{self, ZwpConfinedPointerV1},
        zwp_locked_pointer_v1::{self, ZwpLockedPointerV1},
        zwp_pointer_constraints_v1::{self, Lifetime, ZwpPointerConstraintsV1},
    },
};
use wayland_server::{Dispatch, DisplayHandle, GlobalDispatch, WEnum};

use crate::state::State;

fn remote_lifetime(lifetime: WEnum<Lifetime>) -> c_pc::zwp_pointer_constraints_v1::Lifetime {
    match lifetime {
        WEnum::Value(Lifetime::Persistent) => {
            c_pc::zwp_pointer_constraints_v1::Lifetime::Persistent
        }
        _ => c_pc::zwp_pointer_constraints_v1::Lifetime::Oneshot,
    }
}

impl GlobalDispatch<ZwpPointerConstraintsV1, ()> for State {
    fn bind(
        _state: &mut Self,
        _dh: &DisplayHandle,
        _client: &wayland_server::Client,
        resource: wayland_server::New<ZwpPointerConstraintsV1>,
        _global_data: &(),
        data_init: &mut wayland_server::DataInit<'_, Self>,
    ) {
        data_init.init(resource, ());
    }
}

impl Dispatch<ZwpPointerConstraintsV1, ()> for State {
    fn request(
        state: &mut Self,
        _client: &wayland_server::Client,
        _resource: &ZwpPointerConstraintsV1,
        request: zwp_pointer_constraints_v1::Request,
        _data: &(),
        _dh: &DisplayHandle,
        data_init: &mut wayland_server::DataInit<'_, Self>,
    ) {
        let qh = state.remote.qh.clone();
        let constraints = state.remote.pointer_constraints.clone();
        let Some(remote_pointer) = state.remote.pointer.clone() else {
            warn!("pointer constraint requested before the host seat has a pointer");
            return;
        };

        match request {
            zwp_pointer_constraints_v1::Request::LockPointer {
                id,
                surface: _,
                pointer: _,
                region: _,
                lifetime,
            } => {
                let server = data_init.init(id, ());
                let remote = constraints.lock_pointer(
                    &state.ui.root,
                    &remote_pointer,
                    None,
                    remote_lifetime(lifetime),
                    &qh,
                    server,
                );
                state.remote.locked_pointers.push(remote);
            }
            zwp_pointer_constraints_v1::Request::ConfinePointer {
                id,
                surface: _,
                pointer: _,
                region: _,
                lifetime,
            } => {
                let server = data_init.init(id, ());
                let remote = constraints.confine_pointer(
                    &state.ui.root,
                    &remote_pointer,
                    None,
                    remote_lifetime(lifetime),
                    &qh,
                    server,
                );
                state.remote.confined_pointers.push(remote);
            }
            zwp_pointer_constraints_v1::Request::Destroy => {}
            _ => {}
        }
    }
}

impl Dispatch<ZwpLockedPointerV1, ()> for State {
    fn request(
        state: &mut Self,
        _client: &wayland_server::Client,
        resource: &ZwpLockedPointerV1,
        request: zwp_locked_pointer_v1::Request,
        _data: &(),
        _dh: &DisplayHandle,
        _data_init: &mut wayland_server::DataInit<'_, Self>,
    ) {
        match request {
            zwp_locked_pointer_v1::Request::SetCursorPositionHint { surface_x, surface_y } => {
                if let Some(remote) = state.remote.locked_pointer_for(resource) {
                    remote.set_cursor_position_hint(surface_x, surface_y);
                }
            }
            zwp_locked_pointer_v1::Request::SetRegion { .. } => {}
            zwp_locked_pointer_v1::Request::Destroy => {}
            _ => {}
        }
    }

    fn destroyed(
        state: &mut Self,
        _client: wayland_server::backend::ClientId,
        resource: &ZwpLockedPointerV1,
        _data: &(),
    ) {
        state.remote.locked_pointers.retain(|remote| {
            if remote.data::<ZwpLockedPointerV1>() == Some(resource) {
                remote.destroy();
                false
            } else {
                true
            }
        });
    }
}

impl Dispatch<ZwpConfinedPointerV1, ()> for State {
    fn request(
        _state: &mut Self,
        _client: &wayland_server::Client,
        _resource: &ZwpConfinedPointerV1,
        request: zwp_confined_pointer_v1::Request,
        _data: &(),
        _dh: &DisplayHandle,
        _data_init: &mut wayland_server::DataInit<'_, Self>,
    ) {
        match request {
            zwp_confined_pointer_v1::Request::SetRegion { .. } => {}
            zwp_confined_pointer_v1::Request::Destroy => {}
            _ => {}
        }
    }

    fn destroyed(
        state: &mut Self,
        _client: wayland_server::backend::ClientId,
        resource: &ZwpConfinedPointerV1,
        _data: &(),
    ) {
        state.remote.confined_pointers.retain(|remote| {
            if remote.data::<ZwpConfinedPointerV1>() == Some(resource) {
                remote.destroy();
                false
            } else {
                true
            }
        });
    }
}
