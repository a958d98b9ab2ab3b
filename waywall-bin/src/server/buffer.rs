// SPDX-License-Identifier: GPL-3.0-only

//! Guest buffer bookkeeping.
//!
//! A buffer is referenced by every pending or current surface state that
//! points at it. The guest handle and the reference count are released
//! independently; the remote twin is destroyed once both are gone, so a
//! commit can never reach the host with a freed buffer.

use std::os::fd::OwnedFd;

use tracing::warn;
use wayland_client::protocol::wl_buffer as c_wl_buffer;
use wayland_server::{protocol::wl_buffer::WlBuffer, Dispatch, Resource};

use crate::{state::State, util::Key};

pub type BufferKey = Key<Buffer>;

/// One plane of a dmabuf buffer, kept for GL capture.
#[derive(Debug)]
pub struct DmabufPlane {
    pub fd: OwnedFd,
    pub offset: u32,
    pub stride: u32,
}

#[derive(Debug)]
pub enum BufferKind {
    /// Created but not yet backed; attaching it is a client error.
    Invalid,
    Shm { width: i32, height: i32 },
    Dmabuf { width: i32, height: i32, format: u32, modifier: u64, planes: Vec<DmabufPlane> },
}

#[derive(Debug)]
pub struct Buffer {
    pub resource: WlBuffer,
    pub remote: Option<c_wl_buffer::WlBuffer>,
    pub kind: BufferKind,
    /// Number of surface states (pending or current) holding this buffer.
    pub refcount: u32,
    /// The guest has destroyed its handle.
    pub destroyed: bool,
    /// The host holds the buffer; at most one `release` is forwarded per
    /// attach cycle.
    pub release_pending: bool,
}

impl Buffer {
    pub fn new(resource: WlBuffer) -> Self {
        Self {
            resource,
            remote: None,
            kind: BufferKind::Invalid,
            refcount: 0,
            destroyed: false,
            release_pending: false,
        }
    }

    /// Attaches the backing data and remote twin to a buffer created
    /// ahead of its storage.
    pub fn validate(&mut self, remote: c_wl_buffer::WlBuffer, kind: BufferKind) {
        debug_assert!(matches!(self.kind, BufferKind::Invalid));
        self.remote = Some(remote);
        self.kind = kind;
    }

    pub fn is_invalid(&self) -> bool {
        matches!(self.kind, BufferKind::Invalid)
    }

    pub fn size(&self) -> Option<(i32, i32)> {
        match self.kind {
            BufferKind::Invalid => None,
            BufferKind::Shm { width, height } => Some((width, height)),
            BufferKind::Dmabuf { width, height, .. } => Some((width, height)),
        }
    }
}

impl State {
    pub fn buffer_ref(&mut self, key: BufferKey) {
        self.server.buffers[key].refcount += 1;
    }

    pub fn buffer_unref(&mut self, key: BufferKey) {
        let buffer = &mut self.server.buffers[key];
        assert!(buffer.refcount > 0, "buffer refcount underflow");
        buffer.refcount -= 1;
        self.buffer_maybe_finalize(key);
    }

    /// Destroys the remote twin once neither the guest handle nor any
    /// surface state references the buffer.
    pub fn buffer_maybe_finalize(&mut self, key: BufferKey) {
        let buffer = &self.server.buffers[key];
        if buffer.refcount > 0 || !buffer.destroyed {
            return;
        }

        let buffer = self.server.buffers.remove(key).unwrap();
        if let Some(remote) = buffer.remote {
            remote.destroy();
        }
    }

    /// Host released the buffer: forward at most one release per attach
    /// cycle to the guest, if it still holds its handle.
    pub fn buffer_remote_release(&mut self, key: BufferKey) {
        let Some(buffer) = self.server.buffers.get_mut(key) else {
            return;
        };

        if buffer.release_pending {
            buffer.release_pending = false;
            if !buffer.destroyed {
                buffer.resource.release();
            }
        }
    }
}

impl Dispatch<WlBuffer, BufferKey> for State {
    fn request(
        _state: &mut Self,
        _client: &wayland_server::Client,
        _resource: &WlBuffer,
        request: <WlBuffer as Resource>::Request,
        key: &BufferKey,
        _dh: &wayland_server::DisplayHandle,
        _data_init: &mut wayland_server::DataInit<'_, Self>,
    ) {
        use wayland_server::protocol::wl_buffer::Request;

        match request {
            Request::Destroy => {
                // Teardown happens in `destroyed`.
            }
            _ => {
                warn!("unhandled wl_buffer request on {key:?}");
            }
        }
    }

    fn destroyed(
        state: &mut Self,
        _client: wayland_server::backend::ClientId,
        _resource: &WlBuffer,
        key: &BufferKey,
    ) {
        if let Some(buffer) = state.server.buffers.get_mut(*key) {
            buffer.destroyed = true;
            state.buffer_maybe_finalize(*key);
        }
    }
}
