// SPDX-License-Identifier: GPL-3.0-only

//! `xwayland_shell_v1`: the association channel between Xwayland and
//! the kernel. Only the Xwayland client may see the global. The XWM
//! pairs X11 windows to the serials recorded here; the pairing logic
//! itself lives at the XWM endpoint.

use wayland_protocols::xwayland::shell::v1::server::{
    xwayland_shell_v1::{self, XwaylandShellV1},
    xwayland_surface_v1::{self, XwaylandSurfaceV1},
};
use wayland_server::{Dispatch, DisplayHandle, GlobalDispatch, Resource};

use crate::{
    server::surface::{Role, SurfaceKey},
    state::State,
    xwayland::XWaylandClientMarker,
};

impl GlobalDispatch<XwaylandShellV1, ()> for State {
    fn bind(
        _state: &mut Self,
        _dh: &DisplayHandle,
        _client: &wayland_server::Client,
        resource: wayland_server::New<XwaylandShellV1>,
        _global_data: &(),
        data_init: &mut wayland_server::DataInit<'_, Self>,
    ) {
        data_init.init(resource, ());
    }

    fn can_view(client: wayland_server::Client, _global_data: &()) -> bool {
        client.get_data::<XWaylandClientMarker>().is_some()
    }
}

impl Dispatch<XwaylandShellV1, ()> for State {
    fn request(
        state: &mut Self,
        _client: &wayland_server::Client,
        resource: &XwaylandShellV1,
        request: xwayland_shell_v1::Request,
        _data: &(),
        _dh: &DisplayHandle,
        data_init: &mut wayland_server::DataInit<'_, Self>,
    ) {
        match request {
            xwayland_shell_v1::Request::GetXwaylandSurface { id, surface } => {
                let key = *surface.data::<SurfaceKey>().expect("surface without key");

                if state.server.surfaces[key].set_role(Role::X11).is_err() {
                    resource.post_error(
                        xwayland_shell_v1::Error::Role,
                        "surface already has another role",
                    );
                    return;
                }

                data_init.init(id, key);
            }
            xwayland_shell_v1::Request::Destroy => {}
            _ => {}
        }
    }
}

impl Dispatch<XwaylandSurfaceV1, SurfaceKey> for State {
    fn request(
        state: &mut Self,
        _client: &wayland_server::Client,
        _resource: &XwaylandSurfaceV1,
        request: xwayland_surface_v1::Request,
        key: &SurfaceKey,
        _dh: &DisplayHandle,
        _data_init: &mut wayland_server::DataInit<'_, Self>,
    ) {
        match request {
            xwayland_surface_v1::Request::SetSerial { serial_lo, serial_hi } => {
                if let Some(surface) = state.server.surfaces.get_mut(*key) {
                    surface.x11_serial = Some(((serial_hi as u64) << 32) | serial_lo as u64);
                }
            }
            xwayland_surface_v1::Request::Destroy => {}
            _ => {}
        }
    }

    fn destroyed(
        state: &mut Self,
        _client: wayland_server::backend::ClientId,
        _resource: &XwaylandSurfaceV1,
        key: &SurfaceKey,
    ) {
        if let Some(surface) = state.server.surfaces.get_mut(*key) {
            surface.role_active = false;
            surface.x11_serial = None;
        }
    }
}
