// SPDX-License-Identifier: GPL-3.0-only

//! `wl_shm` façade: pools and pool buffers are proxied to the remote,
//! with the pool size tracked server-side.

use std::{
    os::fd::AsFd,
    sync::atomic::{AtomicI32, Ordering},
};

use tracing::warn;
use wayland_client::protocol::{wl_shm as c_wl_shm, wl_shm_pool as c_wl_shm_pool};
use wayland_server::{
    protocol::{
        wl_shm::{self, WlShm},
        wl_shm_pool::{self, WlShmPool},
    },
    Dispatch, DisplayHandle, GlobalDispatch, Resource, WEnum,
};

use crate::{
    server::buffer::{Buffer, BufferKind},
    state::State,
};

pub struct ShmPoolData {
    remote: c_wl_shm_pool::WlShmPool,
    size: AtomicI32,
}

impl GlobalDispatch<WlShm, ()> for State {
    fn bind(
        state: &mut Self,
        _dh: &DisplayHandle,
        _client: &wayland_server::Client,
        resource: wayland_server::New<WlShm>,
        _global_data: &(),
        data_init: &mut wayland_server::DataInit<'_, Self>,
    ) {
        let shm = data_init.init(resource, ());

        // Advertise exactly what the remote supports.
        for format in &state.remote.shm_formats {
            if let Ok(format) = wl_shm::Format::try_from(*format as u32) {
                shm.format(format);
            }
        }
    }
}

impl Dispatch<WlShm, ()> for State {
    fn request(
        state: &mut Self,
        _client: &wayland_server::Client,
        resource: &WlShm,
        request: wl_shm::Request,
        _data: &(),
        _dh: &DisplayHandle,
        data_init: &mut wayland_server::DataInit<'_, Self>,
    ) {
        match request {
            wl_shm::Request::CreatePool { id, fd, size } => {
                if size <= 0 {
                    resource.post_error(wl_shm::Error::InvalidStride, "pool size not positive");
                    return;
                }

                let qh = state.remote.qh.clone();
                let remote = state.remote.shm.create_pool(fd.as_fd(), size, &qh, ());
                data_init.init(id, ShmPoolData { remote, size: AtomicI32::new(size) });
            }
            _ => {}
        }
    }
}

impl Dispatch<WlShmPool, ShmPoolData> for State {
    fn request(
        state: &mut Self,
        _client: &wayland_server::Client,
        resource: &WlShmPool,
        request: wl_shm_pool::Request,
        data: &ShmPoolData,
        _dh: &DisplayHandle,
        data_init: &mut wayland_server::DataInit<'_, Self>,
    ) {
        match request {
            wl_shm_pool::Request::CreateBuffer { id, offset, width, height, stride, format } => {
                let raw_format = match format {
                    WEnum::Value(value) => value as u32,
                    WEnum::Unknown(value) => value,
                };
                let Ok(remote_format) = c_wl_shm::Format::try_from(raw_format) else {
                    resource.post_error(
                        wl_shm::Error::InvalidFormat,
                        format!("unknown format 0x{raw_format:x}"),
                    );
                    return;
                };

                if offset < 0
                    || width <= 0
                    || height <= 0
                    || stride <= 0
                    || offset.checked_add(stride.saturating_mul(height)).map_or(true, |end| {
                        end > data.size.load(Ordering::Relaxed)
                    })
                {
                    resource.post_error(
                        wl_shm::Error::InvalidStride,
                        "buffer does not fit in pool",
                    );
                    return;
                }

                let qh = state.remote.qh.clone();
                let remote_pool = data.remote.clone();
                state.server.buffers.insert_with(|key| {
                    let remote = remote_pool.create_buffer(
                        offset,
                        width,
                        height,
                        stride,
                        remote_format,
                        &qh,
                        key,
                    );

                    // Created invalid, then validated with its twin; the
                    // backing contents stay opaque to the server.
                    let mut buffer = Buffer::new(data_init.init(id, key));
                    buffer.validate(remote, BufferKind::Shm { width, height });
                    buffer
                });
            }
            wl_shm_pool::Request::Resize { size } => {
                let old = data.size.load(Ordering::Relaxed);
                if size < old {
                    warn!("ignoring wl_shm_pool.resize shrinking {old} -> {size}");
                    return;
                }
                data.size.store(size, Ordering::Relaxed);
                data.remote.resize(size);
            }
            wl_shm_pool::Request::Destroy => {}
            _ => {}
        }
    }

    fn destroyed(
        _state: &mut Self,
        _client: wayland_server::backend::ClientId,
        _resource: &WlShmPool,
        data: &ShmPoolData,
    ) {
        data.remote.destroy();
    }
}
