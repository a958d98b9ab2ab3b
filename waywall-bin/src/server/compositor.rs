// SPDX-License-Identifier: GPL-3.0-only

//! `wl_compositor`, `wl_subcompositor` and `wl_region` façades.

use tracing::warn;
use wayland_server::{
    protocol::{
        wl_compositor::{self, WlCompositor},
        wl_region::{self, WlRegion},
        wl_subcompositor::{self, WlSubcompositor},
    },
    Dispatch, DisplayHandle, GlobalDispatch, Resource,
};

use crate::{
    server::surface::{Role, Surface, SurfaceKey},
    state::State,
};

impl GlobalDispatch<WlCompositor, ()> for State {
    fn bind(
        _state: &mut Self,
        _dh: &DisplayHandle,
        _client: &wayland_server::Client,
        resource: wayland_server::New<WlCompositor>,
        _global_data: &(),
        data_init: &mut wayland_server::DataInit<'_, Self>,
    ) {
        data_init.init(resource, ());
    }
}

impl Dispatch<WlCompositor, ()> for State {
    fn request(
        state: &mut Self,
        _client: &wayland_server::Client,
        _resource: &WlCompositor,
        request: wl_compositor::Request,
        _data: &(),
        _dh: &DisplayHandle,
        data_init: &mut wayland_server::DataInit<'_, Self>,
    ) {
        match request {
            wl_compositor::Request::CreateSurface { id } => {
                let qh = state.remote.qh.clone();
                let compositor = state.remote.compositor.clone();

                state.server.surfaces.insert_with(|key| {
                    let remote = compositor.create_surface(&qh, key);

                    // Guest twins must never take host input away from
                    // the root surface.
                    let region = compositor.create_region(&qh, ());
                    remote.set_input_region(Some(&region));
                    region.destroy();

                    let resource = data_init.init(id, key);
                    Surface::new(resource, remote)
                });
            }
            wl_compositor::Request::CreateRegion { id } => {
                data_init.init(id, ());
            }
            _ => {}
        }
    }
}

/// Guest regions are accepted and ignored; input regions are overridden
/// on the twins and opaque regions are an optimization hint.
impl Dispatch<WlRegion, ()> for State {
    fn request(
        _state: &mut Self,
        _client: &wayland_server::Client,
        _resource: &WlRegion,
        request: wl_region::Request,
        _data: &(),
        _dh: &DisplayHandle,
        _data_init: &mut wayland_server::DataInit<'_, Self>,
    ) {
        match request {
            wl_region::Request::Add { .. }
            | wl_region::Request::Subtract { .. }
            | wl_region::Request::Destroy => {}
            _ => {}
        }
    }
}

impl GlobalDispatch<WlSubcompositor, ()> for State {
    fn bind(
        _state: &mut Self,
        _dh: &DisplayHandle,
        _client: &wayland_server::Client,
        resource: wayland_server::New<WlSubcompositor>,
        _global_data: &(),
        data_init: &mut wayland_server::DataInit<'_, Self>,
    ) {
        data_init.init(resource, ());
    }
}

impl Dispatch<WlSubcompositor, ()> for State {
    fn request(
        state: &mut Self,
        _client: &wayland_server::Client,
        resource: &WlSubcompositor,
        request: wl_subcompositor::Request,
        _data: &(),
        _dh: &DisplayHandle,
        data_init: &mut wayland_server::DataInit<'_, Self>,
    ) {
        match request {
            wl_subcompositor::Request::GetSubsurface { id, surface, parent } => {
                let key = *surface.data::<SurfaceKey>().expect("surface without key");
                let parent_key = *parent.data::<SurfaceKey>().expect("surface without key");

                if state.server.surfaces[key].set_role(Role::Subsurface).is_err() {
                    resource.post_error(
                        wl_subcompositor::Error::BadSurface,
                        "surface already has a role",
                    );
                    return;
                }

                let qh = state.remote.qh.clone();
                let (remote_surface, remote_parent) = (
                    state.server.surfaces[key].remote.clone(),
                    state.server.surfaces[parent_key].remote.clone(),
                );
                let remote = state.remote.subcompositor.get_subsurface(
                    &remote_surface,
                    &remote_parent,
                    &qh,
                    (),
                );

                state.server.surfaces[key].remote_subsurface = Some(remote);
                data_init.init(id, key);
            }
            wl_subcompositor::Request::Destroy => {}
            _ => {}
        }
    }
}

impl Dispatch<wayland_server::protocol::wl_subsurface::WlSubsurface, SurfaceKey> for State {
    fn request(
        state: &mut Self,
        _client: &wayland_server::Client,
        _resource: &wayland_server::protocol::wl_subsurface::WlSubsurface,
        request: wayland_server::protocol::wl_subsurface::Request,
        key: &SurfaceKey,
        _dh: &DisplayHandle,
        _data_init: &mut wayland_server::DataInit<'_, Self>,
    ) {
        use wayland_server::protocol::wl_subsurface::Request;

        let Some(surface) = state.server.surfaces.get(*key) else {
            return;
        };
        let Some(remote) = surface.remote_subsurface.clone() else {
            warn!("subsurface request for surface without remote subsurface");
            return;
        };

        match request {
            Request::SetPosition { x, y } => remote.set_position(x, y),
            Request::PlaceAbove { sibling } => {
                let sibling_key = *sibling.data::<SurfaceKey>().expect("surface without key");
                if let Some(sibling) = state.server.surfaces.get(sibling_key) {
                    remote.place_above(&sibling.remote);
                }
            }
            Request::PlaceBelow { sibling } => {
                let sibling_key = *sibling.data::<SurfaceKey>().expect("surface without key");
                if let Some(sibling) = state.server.surfaces.get(sibling_key) {
                    remote.place_below(&sibling.remote);
                }
            }
            Request::SetSync => remote.set_sync(),
            Request::SetDesync => remote.set_desync(),
            Request::Destroy => {}
            _ => {}
        }
    }

    fn destroyed(
        state: &mut Self,
        _client: wayland_server::backend::ClientId,
        _resource: &wayland_server::protocol::wl_subsurface::WlSubsurface,
        key: &SurfaceKey,
    ) {
        if let Some(surface) = state.server.surfaces.get_mut(*key) {
            surface.role_active = false;
            if let Some(remote) = surface.remote_subsurface.take() {
                remote.destroy();
            }
        }
    }
}
