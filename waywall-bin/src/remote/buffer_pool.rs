// SPDX-License-Identifier: GPL-3.0-only

//! The shared buffer pool.
//!
//! One grow-only memfd backs every internal buffer: 1×1 solid colors for
//! backgrounds and decoded PNG images for overlays. Colors are
//! deduplicated inside chunks of 64 four-byte slots; every slot carries a
//! reference count and panics on over-release.

use std::{fs::File, io::Read, os::fd::{AsFd, OwnedFd}, path::Path};

use anyhow::{bail, Context, Result};
use rustix::{
    fs::{ftruncate, memfd_create, MemfdFlags},
    mm::{mmap, munmap, MapFlags, ProtFlags},
};
use tracing::debug;
use wayland_client::{
    protocol::{wl_buffer::WlBuffer, wl_shm::Format, wl_shm_pool::WlShmPool},
    Proxy, QueueHandle,
};

use crate::{remote::Remote, state::State};

const COLOR_CHUNK_SLOTS: usize = 64;
const POOL_INITIAL_SIZE: usize = 16384;

/// Identifies a pool slot from a `wl_buffer`'s user data.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SlotRef {
    Color { chunk: usize, slot: usize },
    Image { index: usize },
}

#[derive(Debug, Clone, Copy, Default)]
struct Slot {
    offset: usize,
    refcount: usize,
}

#[derive(Debug)]
struct ColorChunk {
    offset: usize,
    colors: [u32; COLOR_CHUNK_SLOTS],
    slots: [Slot; COLOR_CHUNK_SLOTS],
}

#[derive(Debug)]
struct ImageSlot {
    slot: Slot,
    width: i32,
    height: i32,
}

/// Allocation state, independent of the Wayland objects so the layout
/// logic is testable in isolation.
#[derive(Debug, Default)]
pub struct PoolAlloc {
    size: usize,
    head: usize,
    chunks: Vec<ColorChunk>,
    images: Vec<ImageSlot>,
}

/// What [`PoolAlloc::take_color_slot`] decided.
#[derive(Debug, PartialEq, Eq)]
enum ColorSlot {
    /// An existing slot already holds this color.
    Existing { chunk: usize, slot: usize },
    /// A free slot was claimed; the caller must write the pixel.
    Claimed { chunk: usize, slot: usize, offset: usize },
    /// A new chunk is required; `grow_to` may exceed the current size.
    NeedChunk { grow_to: usize },
}

impl PoolAlloc {
    fn new(size: usize) -> Self {
        Self { size, head: 0, chunks: Vec::new(), images: Vec::new() }
    }

    fn take_color_slot(&mut self, argb: u32) -> ColorSlot {
        let mut empty = None;
        for (ci, chunk) in self.chunks.iter().enumerate() {
            for si in 0..COLOR_CHUNK_SLOTS {
                if chunk.colors[si] == argb && chunk.slots[si].refcount > 0 {
                    return ColorSlot::Existing { chunk: ci, slot: si };
                }
                if chunk.slots[si].refcount == 0 && empty.is_none() {
                    empty = Some((ci, si));
                }
            }
        }

        if let Some((ci, si)) = empty {
            let offset = self.chunks[ci].offset + si * 4;
            return ColorSlot::Claimed { chunk: ci, slot: si, offset };
        }

        ColorSlot::NeedChunk { grow_to: self.head + COLOR_CHUNK_SLOTS * 4 }
    }

    fn push_chunk(&mut self) -> usize {
        let chunk = ColorChunk {
            offset: self.head,
            colors: [0; COLOR_CHUNK_SLOTS],
            slots: [Slot::default(); COLOR_CHUNK_SLOTS],
        };
        self.head += COLOR_CHUNK_SLOTS * 4;
        self.chunks.push(chunk);
        self.chunks.len() - 1
    }

    fn claim(&mut self, reference: SlotRef, argb: u32) {
        match reference {
            SlotRef::Color { chunk, slot } => {
                let chunk = &mut self.chunks[chunk];
                chunk.colors[slot] = argb;
                chunk.slots[slot].offset = chunk.offset + slot * 4;
                chunk.slots[slot].refcount += 1;
            }
            SlotRef::Image { index } => {
                self.images[index].slot.refcount += 1;
            }
        }
    }

    fn release(&mut self, reference: SlotRef) {
        let slot = match reference {
            SlotRef::Color { chunk, slot } => &mut self.chunks[chunk].slots[slot],
            SlotRef::Image { index } => &mut self.images[index].slot,
        };
        assert!(slot.refcount > 0, "pool slot released twice");
        slot.refcount -= 1;
    }

    fn push_image(&mut self, width: i32, height: i32) -> (usize, usize) {
        let offset = self.head;
        self.head += (width * height * 4) as usize;
        self.images.push(ImageSlot {
            slot: Slot { offset, refcount: 1 },
            width,
            height,
        });
        (self.images.len() - 1, offset)
    }

    /// Doubles the tracked size until `min` fits. Returns the new size if
    /// growth is needed.
    fn grow_for(&mut self, min: usize) -> Option<usize> {
        if min <= self.size {
            return None;
        }
        let mut size = self.size;
        while size < min {
            size *= 2;
        }
        self.size = size;
        Some(size)
    }

    #[cfg(test)]
    fn live_slots(&self) -> usize {
        self.chunks
            .iter()
            .flat_map(|c| c.slots.iter())
            .chain(self.images.iter().map(|i| &i.slot))
            .filter(|s| s.refcount > 0)
            .count()
    }
}

pub struct BufferPool {
    fd: OwnedFd,
    pool: WlShmPool,
    alloc: PoolAlloc,
    mapping: *mut std::ffi::c_void,
    mapped_len: usize,
}

impl BufferPool {
    pub fn new(remote: &Remote, qh: &QueueHandle<State>) -> Result<Self> {
        let fd = memfd_create("waywall-shm", MemfdFlags::CLOEXEC)
            .context("failed to create shm memfd")?;
        ftruncate(&fd, POOL_INITIAL_SIZE as u64).context("failed to expand shm memfd")?;

        // SAFETY: mapping a fresh memfd of the given length.
        let mapping = unsafe {
            mmap(
                std::ptr::null_mut(),
                POOL_INITIAL_SIZE,
                ProtFlags::READ | ProtFlags::WRITE,
                MapFlags::SHARED,
                &fd,
                0,
            )
            .context("failed to mmap shm pool")?
        };

        let pool = remote.shm.create_pool(fd.as_fd(), POOL_INITIAL_SIZE as i32, qh, ());

        Ok(Self {
            fd,
            pool,
            alloc: PoolAlloc::new(POOL_INITIAL_SIZE),
            mapping,
            mapped_len: POOL_INITIAL_SIZE,
        })
    }

    fn remap(&mut self, size: usize) -> Result<()> {
        ftruncate(&self.fd, size as u64).context("failed to grow shm memfd")?;

        // SAFETY: the old mapping is unmapped exactly once and replaced
        // with a mapping of the grown file.
        unsafe {
            munmap(self.mapping, self.mapped_len).context("failed to unmap old shm pool")?;
            self.mapping = mmap(
                std::ptr::null_mut(),
                size,
                ProtFlags::READ | ProtFlags::WRITE,
                MapFlags::SHARED,
                &self.fd,
                0,
            )
            .context("failed to mmap grown shm pool")?;
        }
        self.mapped_len = size;

        self.pool.resize(size as i32);
        Ok(())
    }

    fn write_bytes(&mut self, offset: usize, data: &[u8]) {
        assert!(offset + data.len() <= self.mapped_len);
        // SAFETY: bounds checked above; the region is private to this
        // process and the host only reads it.
        unsafe {
            std::slice::from_raw_parts_mut(self.mapping.cast::<u8>().add(offset), data.len())
                .copy_from_slice(data);
        }
    }

    /// Returns a 1×1 ARGB8888 buffer of the given color; equal colors
    /// share one slot.
    pub fn color(&mut self, qh: &QueueHandle<State>, rgba: [u8; 4]) -> Result<WlBuffer> {
        let argb = u32::from_le_bytes([rgba[2], rgba[1], rgba[0], rgba[3]]);

        let (reference, write_offset) = match self.alloc.take_color_slot(argb) {
            ColorSlot::Existing { chunk, slot } => (SlotRef::Color { chunk, slot }, None),
            ColorSlot::Claimed { chunk, slot, offset } => {
                (SlotRef::Color { chunk, slot }, Some(offset))
            }
            ColorSlot::NeedChunk { grow_to } => {
                if let Some(size) = self.alloc.grow_for(grow_to) {
                    self.remap(size)?;
                }
                let chunk = self.alloc.push_chunk();
                let offset = self.alloc.chunks[chunk].offset;
                (SlotRef::Color { chunk, slot: 0 }, Some(offset))
            }
        };

        self.alloc.claim(reference, argb);
        if let Some(offset) = write_offset {
            self.write_bytes(offset, &argb.to_le_bytes());
        }

        let offset = match reference {
            SlotRef::Color { chunk, slot } => self.alloc.chunks[chunk].slots[slot].offset,
            SlotRef::Image { .. } => unreachable!(),
        };
        Ok(self.pool.create_buffer(offset as i32, 1, 1, 4, Format::Argb8888, qh, reference))
    }

    /// Decodes a PNG into a fresh pool slot and returns its buffer.
    pub fn png(&mut self, qh: &QueueHandle<State>, path: &Path) -> Result<WlBuffer> {
        let mut reader = png::Decoder::new(
            File::open(path).with_context(|| format!("failed to open {}", path.display()))?,
        )
        .read_info()
        .with_context(|| format!("failed to read {}", path.display()))?;

        let mut data = vec![0; reader.output_buffer_size()];
        let info = reader
            .next_frame(&mut data)
            .with_context(|| format!("failed to decode {}", path.display()))?;
        data.truncate(info.buffer_size());

        if info.color_type != png::ColorType::Rgba || info.bit_depth != png::BitDepth::Eight {
            bail!("{} is not 8-bit RGBA", path.display());
        }

        // RGBA -> little-endian ARGB8888 (swap the red and blue bytes).
        for pixel in bytemuck::cast_slice_mut::<u8, u32>(&mut data) {
            let v = *pixel;
            *pixel = (v & 0xff00_ff00) | ((v & 0xff) << 16) | ((v >> 16) & 0xff);
        }

        let (width, height) = (info.width as i32, info.height as i32);
        let needed = self.alloc.head + (width * height * 4) as usize;
        if let Some(size) = self.alloc.grow_for(needed) {
            self.remap(size)?;
        }

        let (index, offset) = self.alloc.push_image(width, height);
        self.write_bytes(offset, &data);
        debug!("decoded {} ({}x{})", path.display(), width, height);

        Ok(self.pool.create_buffer(
            offset as i32,
            width,
            height,
            width * 4,
            Format::Argb8888,
            qh,
            SlotRef::Image { index },
        ))
    }

    /// Drops a reference taken by [`BufferPool::color`] or
    /// [`BufferPool::png`] and destroys the buffer.
    pub fn release(&mut self, buffer: &WlBuffer) {
        let reference = *buffer.data::<SlotRef>().expect("pool buffer without slot");
        self.alloc.release(reference);
        buffer.destroy();
    }
}

impl Drop for BufferPool {
    fn drop(&mut self) {
        self.pool.destroy();
        // SAFETY: the mapping is valid and unused after this point.
        unsafe {
            let _ = munmap(self.mapping, self.mapped_len);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn colors_are_deduplicated() {
        let mut alloc = PoolAlloc::new(POOL_INITIAL_SIZE);

        assert_eq!(
            alloc.take_color_slot(0xff00ffff),
            ColorSlot::NeedChunk { grow_to: COLOR_CHUNK_SLOTS * 4 }
        );
        let chunk = alloc.push_chunk();
        alloc.claim(SlotRef::Color { chunk, slot: 0 }, 0xff00ffff);

        // Second allocation of the same color shares the slot.
        let second = alloc.take_color_slot(0xff00ffff);
        assert_eq!(second, ColorSlot::Existing { chunk: 0, slot: 0 });
        alloc.claim(SlotRef::Color { chunk: 0, slot: 0 }, 0xff00ffff);
        assert_eq!(alloc.live_slots(), 1);
        assert_eq!(alloc.chunks[0].slots[0].refcount, 2);

        // Releasing both drops the refcount to zero.
        alloc.release(SlotRef::Color { chunk: 0, slot: 0 });
        alloc.release(SlotRef::Color { chunk: 0, slot: 0 });
        assert_eq!(alloc.live_slots(), 0);
    }

    #[test]
    #[should_panic(expected = "released twice")]
    fn over_release_panics() {
        let mut alloc = PoolAlloc::new(POOL_INITIAL_SIZE);
        let chunk = alloc.push_chunk();
        alloc.claim(SlotRef::Color { chunk, slot: 0 }, 1);
        alloc.release(SlotRef::Color { chunk, slot: 0 });
        alloc.release(SlotRef::Color { chunk, slot: 0 });
    }

    #[test]
    fn distinct_colors_use_distinct_slots() {
        let mut alloc = PoolAlloc::new(POOL_INITIAL_SIZE);
        let chunk = alloc.push_chunk();
        alloc.claim(SlotRef::Color { chunk, slot: 0 }, 0x11111111);

        match alloc.take_color_slot(0x22222222) {
            ColorSlot::Claimed { chunk: 0, slot, .. } => {
                assert_ne!(slot, 0);
            }
            other => panic!("unexpected slot decision: {other:?}"),
        }
    }

    #[test]
    fn freed_slots_are_reused() {
        let mut alloc = PoolAlloc::new(POOL_INITIAL_SIZE);
        let chunk = alloc.push_chunk();
        alloc.claim(SlotRef::Color { chunk, slot: 0 }, 0x11111111);
        alloc.release(SlotRef::Color { chunk, slot: 0 });

        // A stale color in a freed slot must not be treated as live.
        match alloc.take_color_slot(0x11111111) {
            ColorSlot::Claimed { chunk: 0, slot: 0, .. } => {}
            other => panic!("unexpected slot decision: {other:?}"),
        }
    }

    #[test]
    fn growth_is_monotonic_and_bounded() {
        let mut alloc = PoolAlloc::new(POOL_INITIAL_SIZE);

        // Many chunks fit in the initial size without growth.
        for _ in 0..(POOL_INITIAL_SIZE / (COLOR_CHUNK_SLOTS * 4)) {
            assert!(alloc.grow_for(alloc.head + COLOR_CHUNK_SLOTS * 4).is_none());
            alloc.push_chunk();
        }

        let grown = alloc.grow_for(alloc.head + COLOR_CHUNK_SLOTS * 4).unwrap();
        assert_eq!(grown, POOL_INITIAL_SIZE * 2);

        // An image larger than the pool doubles until it fits.
        let huge = alloc.head + 3 * POOL_INITIAL_SIZE;
        let grown = alloc.grow_for(huge).unwrap();
        assert!(grown >= huge);
        assert_eq!(grown % POOL_INITIAL_SIZE, 0);
    }
}
