// SPDX-License-Identifier: GPL-3.0-only

//! The guest seat: one keyboard and one pointer, with synthetic
//! capabilities independent of the host seat. Event delivery lives in the
//! input router; this module only manages the resources.

use std::os::fd::AsFd;

use tracing::warn;
use wayland_server::{
    protocol::{
        wl_keyboard::{self, KeymapFormat, WlKeyboard},
        wl_pointer::{self, WlPointer},
        wl_seat::{self, Capability, WlSeat},
    },
    Dispatch, DisplayHandle, GlobalDispatch, Resource,
};

use crate::{
    server::surface::{Role, SurfaceKey},
    state::State,
};

pub const SEAT_NAME: &str = "waywall";

impl GlobalDispatch<WlSeat, ()> for State {
    fn bind(
        _state: &mut Self,
        _dh: &DisplayHandle,
        _client: &wayland_server::Client,
        resource: wayland_server::New<WlSeat>,
        _global_data: &(),
        data_init: &mut wayland_server::DataInit<'_, Self>,
    ) {
        let seat = data_init.init(resource, ());
        seat.capabilities(Capability::Keyboard | Capability::Pointer);
        if seat.version() >= 2 {
            seat.name(SEAT_NAME.into());
        }
    }
}

impl Dispatch<WlSeat, ()> for State {
    fn request(
        state: &mut Self,
        _client: &wayland_server::Client,
        resource: &WlSeat,
        request: wl_seat::Request,
        _data: &(),
        _dh: &DisplayHandle,
        data_init: &mut wayland_server::DataInit<'_, Self>,
    ) {
        match request {
            wl_seat::Request::GetKeyboard { id } => {
                let keyboard = data_init.init(id, ());

                let (fd, size) = state.router.keymap();
                keyboard.keymap(KeymapFormat::XkbV1, fd.as_fd(), size);
                if keyboard.version() >= 4 {
                    keyboard.repeat_info(
                        state.profile.input.repeat_rate,
                        state.profile.input.repeat_delay,
                    );
                }

                state.router.keyboards.push(keyboard);
            }
            wl_seat::Request::GetPointer { id } => {
                let pointer = data_init.init(id, ());
                state.router.pointers.push(pointer);
            }
            wl_seat::Request::GetTouch { id: _ } => {
                resource.post_error(
                    wl_seat::Error::MissingCapability,
                    "seat has no touch capability",
                );
            }
            wl_seat::Request::Release => {}
            _ => {}
        }
    }
}

impl Dispatch<WlKeyboard, ()> for State {
    fn request(
        _state: &mut Self,
        _client: &wayland_server::Client,
        _resource: &WlKeyboard,
        request: wl_keyboard::Request,
        _data: &(),
        _dh: &DisplayHandle,
        _data_init: &mut wayland_server::DataInit<'_, Self>,
    ) {
        if let wl_keyboard::Request::Release = request {}
    }

    fn destroyed(
        state: &mut Self,
        _client: wayland_server::backend::ClientId,
        resource: &WlKeyboard,
        _data: &(),
    ) {
        state.router.keyboards.retain(|k| k != resource);
    }
}

impl Dispatch<WlPointer, ()> for State {
    fn request(
        state: &mut Self,
        _client: &wayland_server::Client,
        resource: &WlPointer,
        request: wl_pointer::Request,
        _data: &(),
        _dh: &DisplayHandle,
        _data_init: &mut wayland_server::DataInit<'_, Self>,
    ) {
        match request {
            wl_pointer::Request::SetCursor { surface, .. } => {
                // The compositor renders its own cursor; the role is
                // still bound so reuse as a toplevel stays an error.
                if let Some(surface) = surface {
                    let key = *surface.data::<SurfaceKey>().expect("surface without key");
                    if let Some(entry) = state.server.surfaces.get_mut(key) {
                        if entry.set_role(Role::Cursor).is_err() {
                            resource.post_error(
                                wl_pointer::Error::Role,
                                "cursor surface already has another role",
                            );
                        }
                    }
                }
            }
            wl_pointer::Request::Release => {}
            _ => {
                warn!("unhandled wl_pointer request");
            }
        }
    }

    fn destroyed(
        state: &mut Self,
        _client: wayland_server::backend::ClientId,
        resource: &WlPointer,
        _data: &(),
    ) {
        state.router.pointers.retain(|p| p != resource);
    }
}
