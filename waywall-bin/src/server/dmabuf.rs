// SPDX-License-Identifier: GPL-3.0-only

//! `zwp_linux_dmabuf_v1` façade.
//!
//! Format and modifier advertisement comes from the host; buffer params
//! are forwarded plane by plane, with a duplicated fd kept server-side
//! so GL capture can import the buffer later. The async `create` request
//! is answered from the immediate remote path: the kernel decides
//! success, the host would kill us on a malformed buffer either way.

use std::{os::fd::AsFd, sync::Mutex};

use rustix::io::fcntl_dupfd_cloexec;
use tracing::warn;
use wayland_protocols::wp::linux_dmabuf::zv1::{
    client as c_dmabuf,
    server::{
        zwp_linux_buffer_params_v1::{self, ZwpLinuxBufferParamsV1},
        zwp_linux_dmabuf_feedback_v1::{self, ZwpLinuxDmabufFeedbackV1},
        zwp_linux_dmabuf_v1::{self, ZwpLinuxDmabufV1},
    },
};
use wayland_server::{
    protocol::wl_buffer::WlBuffer, Dispatch, DisplayHandle, GlobalDispatch, Resource, WEnum,
};

use crate::{
    server::{
        buffer::{Buffer, BufferKey, BufferKind, DmabufPlane},
        surface::SurfaceKey,
    },
    state::State,
};

/// Accumulated params state: the remote params object plus our own copy
/// of the planes and modifier.
pub struct ParamsData {
    pub remote: c_dmabuf::zwp_linux_buffer_params_v1::ZwpLinuxBufferParamsV1,
    pub planes: Mutex<Vec<DmabufPlane>>,
    pub modifier: Mutex<u64>,
}

fn remote_flags(
    resource: &ZwpLinuxBufferParamsV1,
    flags: WEnum<zwp_linux_buffer_params_v1::Flags>,
) -> Option<c_dmabuf::zwp_linux_buffer_params_v1::Flags> {
    let raw = match flags {
        WEnum::Value(flags) => flags.bits(),
        WEnum::Unknown(raw) => raw,
    };
    match c_dmabuf::zwp_linux_buffer_params_v1::Flags::from_bits(raw) {
        Some(flags) => Some(flags),
        None => {
            resource.post_error(
                zwp_linux_buffer_params_v1::Error::InvalidFormat,
                "unknown buffer flags",
            );
            None
        }
    }
}

impl GlobalDispatch<ZwpLinuxDmabufV1, ()> for State {
    fn bind(
        state: &mut Self,
        _dh: &DisplayHandle,
        _client: &wayland_server::Client,
        resource: wayland_server::New<ZwpLinuxDmabufV1>,
        _global_data: &(),
        data_init: &mut wayland_server::DataInit<'_, Self>,
    ) {
        let dmabuf = data_init.init(resource, ());

        // Version 4 clients use feedback objects instead of events.
        if dmabuf.version() <= 3 {
            for &(format, modifier) in &state.remote.dmabuf_formats {
                if dmabuf.version() == 3 {
                    dmabuf.modifier(format, (modifier >> 32) as u32, modifier as u32);
                } else {
                    dmabuf.format(format);
                }
            }
        }
    }
}

impl Dispatch<ZwpLinuxDmabufV1, ()> for State {
    fn request(
        state: &mut Self,
        _client: &wayland_server::Client,
        _resource: &ZwpLinuxDmabufV1,
        request: zwp_linux_dmabuf_v1::Request,
        _data: &(),
        _dh: &DisplayHandle,
        data_init: &mut wayland_server::DataInit<'_, Self>,
    ) {
        let qh = state.remote.qh.clone();

        match request {
            zwp_linux_dmabuf_v1::Request::CreateParams { params_id } => {
                let remote = state.remote.dmabuf.create_params(&qh, ());
                data_init.init(
                    params_id,
                    ParamsData {
                        remote,
                        planes: Mutex::new(Vec::new()),
                        modifier: Mutex::new(0),
                    },
                );
            }
            zwp_linux_dmabuf_v1::Request::GetDefaultFeedback { id } => {
                let server = data_init.init(id, ());
                let remote = state.remote.dmabuf.get_default_feedback(&qh, server);
                state.remote.feedbacks.push(remote);
            }
            zwp_linux_dmabuf_v1::Request::GetSurfaceFeedback { id, surface } => {
                let key = *surface.data::<SurfaceKey>().expect("surface without key");
                let server = data_init.init(id, ());
                let remote_surface = state.server.surfaces[key].remote.clone();
                let remote =
                    state.remote.dmabuf.get_surface_feedback(&remote_surface, &qh, server);
                state.remote.feedbacks.push(remote);
            }
            zwp_linux_dmabuf_v1::Request::Destroy => {}
            _ => {}
        }
    }
}

impl Dispatch<ZwpLinuxBufferParamsV1, ParamsData> for State {
    fn request(
        state: &mut Self,
        client: &wayland_server::Client,
        resource: &ZwpLinuxBufferParamsV1,
        request: zwp_linux_buffer_params_v1::Request,
        data: &ParamsData,
        dh: &DisplayHandle,
        data_init: &mut wayland_server::DataInit<'_, Self>,
    ) {
        let qh = state.remote.qh.clone();

        match request {
            zwp_linux_buffer_params_v1::Request::Add {
                fd,
                plane_idx,
                offset,
                stride,
                modifier_hi,
                modifier_lo,
            } => {
                match fcntl_dupfd_cloexec(&fd, 0) {
                    Ok(dup) => {
                        data.planes.lock().unwrap().push(DmabufPlane { fd: dup, offset, stride });
                        *data.modifier.lock().unwrap() =
                            ((modifier_hi as u64) << 32) | modifier_lo as u64;
                    }
                    Err(err) => warn!("failed to duplicate dmabuf plane fd: {err}"),
                }
                data.remote.add(fd.as_fd(), plane_idx, offset, stride, modifier_hi, modifier_lo);
            }
            zwp_linux_buffer_params_v1::Request::Create { width, height, format, flags } => {
                let Some(flags) = remote_flags(resource, flags) else {
                    return;
                };

                let planes = std::mem::take(&mut *data.planes.lock().unwrap());
                let modifier = *data.modifier.lock().unwrap();
                let remote_params = data.remote.clone();

                let key = state.server.buffers.insert_with(|key| {
                    let remote = remote_params.create_immed(width, height, format, flags, &qh, key);

                    let server = client
                        .create_resource::<WlBuffer, BufferKey, State>(dh, 1, key)
                        .expect("failed to create wl_buffer resource");
                    let mut buffer = Buffer::new(server);
                    buffer.validate(
                        remote,
                        BufferKind::Dmabuf { width, height, format, modifier, planes },
                    );
                    buffer
                });

                resource.created(&state.server.buffers[key].resource);
            }
            zwp_linux_buffer_params_v1::Request::CreateImmed {
                buffer_id,
                width,
                height,
                format,
                flags,
            } => {
                let Some(flags) = remote_flags(resource, flags) else {
                    return;
                };

                let planes = std::mem::take(&mut *data.planes.lock().unwrap());
                let modifier = *data.modifier.lock().unwrap();
                let remote_params = data.remote.clone();

                state.server.buffers.insert_with(|key| {
                    let remote = remote_params.create_immed(width, height, format, flags, &qh, key);
                    let mut buffer = Buffer::new(data_init.init(buffer_id, key));
                    buffer.validate(
                        remote,
                        BufferKind::Dmabuf { width, height, format, modifier, planes },
                    );
                    buffer
                });
            }
            zwp_linux_buffer_params_v1::Request::Destroy => {}
            _ => {}
        }
    }

    fn destroyed(
        _state: &mut Self,
        _client: wayland_server::backend::ClientId,
        _resource: &ZwpLinuxBufferParamsV1,
        data: &ParamsData,
    ) {
        data.remote.destroy();
    }
}

impl Dispatch<ZwpLinuxDmabufFeedbackV1, ()> for State {
    fn request(
        state: &mut Self,
        _client: &wayland_server::Client,
        resource: &ZwpLinuxDmabufFeedbackV1,
        request: zwp_linux_dmabuf_feedback_v1::Request,
        _data: &(),
        _dh: &DisplayHandle,
        _data_init: &mut wayland_server::DataInit<'_, Self>,
    ) {
        if let zwp_linux_dmabuf_feedback_v1::Request::Destroy = request {
            state.remote.destroy_feedback_for(resource);
        }
    }
}
