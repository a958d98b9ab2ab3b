// SPDX-License-Identifier: GPL-3.0-only

//! Minimal data-device support: a single seat-wide selection shared
//! between guests. Drag-and-drop is not offered.

use std::{os::fd::AsFd, sync::Mutex};

use tracing::debug;
use wayland_server::{
    protocol::{
        wl_data_device::{self, WlDataDevice},
        wl_data_device_manager::{self, WlDataDeviceManager},
        wl_data_offer::{self, WlDataOffer},
        wl_data_source::{self, WlDataSource},
    },
    Dispatch, DisplayHandle, GlobalDispatch, Resource,
};

use crate::state::State;

/// Mime types offered by a guest data source.
#[derive(Debug, Default)]
pub struct DataSourceData {
    pub mime_types: Mutex<Vec<String>>,
}

impl State {
    /// Presents the current selection to the client owning `focus`.
    /// Called on every keyboard focus transfer.
    pub fn offer_selection(&mut self, focus: &wayland_server::protocol::wl_surface::WlSurface) {
        let Some(client) = focus.client() else {
            return;
        };

        let devices: Vec<WlDataDevice> = self
            .server
            .data_devices
            .iter()
            .filter(|d| d.client().map(|c| c.id()) == Some(client.id()))
            .cloned()
            .collect();
        if devices.is_empty() {
            return;
        }

        let Some(source) = self.server.selection.clone() else {
            for device in &devices {
                device.selection(None);
            }
            return;
        };

        // Guests never see each other's source objects; each focused
        // client gets a fresh offer mirroring the mime types.
        let mime_types = source
            .data::<DataSourceData>()
            .map(|d| d.mime_types.lock().unwrap().clone())
            .unwrap_or_default();

        for device in &devices {
            let Ok(offer) = client.create_resource::<WlDataOffer, WlDataSource, State>(
                &self.server.dh,
                device.version(),
                source.clone(),
            ) else {
                continue;
            };

            device.data_offer(&offer);
            for mime in &mime_types {
                offer.offer(mime.clone());
            }
            device.selection(Some(&offer));
        }
    }

    fn clear_selection(&mut self, source: &WlDataSource) {
        if self.server.selection.as_ref() == Some(source) {
            self.server.selection = None;
            for device in &self.server.data_devices {
                device.selection(None);
            }
        }
    }
}

impl GlobalDispatch<WlDataDeviceManager, ()> for State {
    fn bind(
        _state: &mut Self,
        _dh: &DisplayHandle,
        _client: &wayland_server::Client,
        resource: wayland_server::New<WlDataDeviceManager>,
        _global_data: &(),
        data_init: &mut wayland_server::DataInit<'_, Self>,
    ) {
        data_init.init(resource, ());
    }
}

impl Dispatch<WlDataDeviceManager, ()> for State {
    fn request(
        state: &mut Self,
        _client: &wayland_server::Client,
        _resource: &WlDataDeviceManager,
        request: wl_data_device_manager::Request,
        _data: &(),
        _dh: &DisplayHandle,
        data_init: &mut wayland_server::DataInit<'_, Self>,
    ) {
        match request {
            wl_data_device_manager::Request::CreateDataSource { id } => {
                data_init.init(id, DataSourceData::default());
            }
            wl_data_device_manager::Request::GetDataDevice { id, seat: _ } => {
                let device = data_init.init(id, ());
                state.server.data_devices.push(device);
            }
            _ => {}
        }
    }
}

impl Dispatch<WlDataSource, DataSourceData> for State {
    fn request(
        _state: &mut Self,
        _client: &wayland_server::Client,
        _resource: &WlDataSource,
        request: wl_data_source::Request,
        data: &DataSourceData,
        _dh: &DisplayHandle,
        _data_init: &mut wayland_server::DataInit<'_, Self>,
    ) {
        match request {
            wl_data_source::Request::Offer { mime_type } => {
                data.mime_types.lock().unwrap().push(mime_type);
            }
            wl_data_source::Request::SetActions { .. } => {}
            wl_data_source::Request::Destroy => {}
            _ => {}
        }
    }

    fn destroyed(
        state: &mut Self,
        _client: wayland_server::backend::ClientId,
        resource: &WlDataSource,
        _data: &DataSourceData,
    ) {
        state.clear_selection(resource);
    }
}

impl Dispatch<WlDataDevice, ()> for State {
    fn request(
        state: &mut Self,
        _client: &wayland_server::Client,
        _resource: &WlDataDevice,
        request: wl_data_device::Request,
        _data: &(),
        _dh: &DisplayHandle,
        _data_init: &mut wayland_server::DataInit<'_, Self>,
    ) {
        match request {
            wl_data_device::Request::SetSelection { source, serial: _ } => {
                if let Some(source) = &source {
                    if let Some(old) = state.server.selection.clone() {
                        if &old != source {
                            old.cancelled();
                        }
                    }
                }
                state.server.selection = source;

                // Refresh the offer for the currently focused client.
                if let Some(focus) = state.router.keyboard_focus {
                    if let Some(surface) = state.server.surfaces.get(focus) {
                        let resource = surface.resource.clone();
                        state.offer_selection(&resource);
                    }
                }
            }
            wl_data_device::Request::StartDrag { .. } => {
                debug!("ignoring start_drag; drag-and-drop is not offered");
            }
            wl_data_device::Request::Release => {}
            _ => {}
        }
    }

    fn destroyed(
        state: &mut Self,
        _client: wayland_server::backend::ClientId,
        resource: &WlDataDevice,
        _data: &(),
    ) {
        state.server.data_devices.retain(|d| d != resource);
    }
}

/// Offers carry their originating source so `receive` can be relayed.
impl Dispatch<WlDataOffer, WlDataSource> for State {
    fn request(
        _state: &mut Self,
        _client: &wayland_server::Client,
        _resource: &WlDataOffer,
        request: wl_data_offer::Request,
        source: &WlDataSource,
        _dh: &DisplayHandle,
        _data_init: &mut wayland_server::DataInit<'_, Self>,
    ) {
        match request {
            wl_data_offer::Request::Receive { mime_type, fd } => {
                if source.is_alive() {
                    source.send(mime_type, fd.as_fd());
                }
            }
            wl_data_offer::Request::Accept { .. }
            | wl_data_offer::Request::Finish
            | wl_data_offer::Request::SetActions { .. }
            | wl_data_offer::Request::Destroy => {}
            _ => {}
        }
    }
}
