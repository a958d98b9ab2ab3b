// SPDX-License-Identifier: GPL-3.0-only

//! `wp_viewporter` façade: viewports apply directly to the remote twin.

use wayland_protocols::wp::viewporter::{
    client as c_vp,
    server::{
        wp_viewport::{self, WpViewport},
        wp_viewporter::{self, WpViewporter},
    },
};
use wayland_server::{Dispatch, DisplayHandle, GlobalDispatch, Resource};

use crate::{server::surface::SurfaceKey, state::State};

impl GlobalDispatch<WpViewporter, ()> for State {
    fn bind(
        _state: &mut Self,
        _dh: &DisplayHandle,
        _client: &wayland_server::Client,
        resource: wayland_server::New<WpViewporter>,
        _global_data: &(),
        data_init: &mut wayland_server::DataInit<'_, Self>,
    ) {
        data_init.init(resource, ());
    }
}

impl Dispatch<WpViewporter, ()> for State {
    fn request(
        state: &mut Self,
        _client: &wayland_server::Client,
        _resource: &WpViewporter,
        request: wp_viewporter::Request,
        _data: &(),
        _dh: &DisplayHandle,
        data_init: &mut wayland_server::DataInit<'_, Self>,
    ) {
        match request {
            wp_viewporter::Request::GetViewport { id, surface } => {
                let key = *surface.data::<SurfaceKey>().expect("surface without key");
                let qh = state.remote.qh.clone();

                let remote = state.remote.viewporter.get_viewport(
                    &state.server.surfaces[key].remote,
                    &qh,
                    (),
                );
                data_init.init(id, remote);
            }
            wp_viewporter::Request::Destroy => {}
            _ => {}
        }
    }
}

impl Dispatch<WpViewport, c_vp::wp_viewport::WpViewport> for State {
    fn request(
        _state: &mut Self,
        _client: &wayland_server::Client,
        _resource: &WpViewport,
        request: wp_viewport::Request,
        remote: &c_vp::wp_viewport::WpViewport,
        _dh: &DisplayHandle,
        _data_init: &mut wayland_server::DataInit<'_, Self>,
    ) {
        match request {
            wp_viewport::Request::SetSource { x, y, width, height } => {
                remote.set_source(x, y, width, height);
            }
            wp_viewport::Request::SetDestination { width, height } => {
                remote.set_destination(width, height);
            }
            wp_viewport::Request::Destroy => {}
            _ => {}
        }
    }

    fn destroyed(
        _state: &mut Self,
        _client: wayland_server::backend::ClientId,
        _resource: &WpViewport,
        remote: &c_vp::wp_viewport::WpViewport,
    ) {
        remote.destroy();
    }
}
