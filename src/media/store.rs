// SPDX-License-Identifier: GPL-3.0-only

//! Reusable scratch buffers for the frame processor
//!
//! The store is a small arena: one byte buffer per [`ScratchSlot`] plus the
//! typed workspace the edge detector needs. Everything is sized in
//! [`FrameStore::resize`] and reused for every frame with the same
//! dimensions, so steady-state processing performs no allocation.

use super::types::FrameDimensions;
use crate::errors::ProcessResult;
use tracing::{debug, info};

/// Named byte buffers owned by the store
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScratchSlot {
    /// Padding-free 4:2:0 frame (luma followed by chroma)
    Planar,
    /// Colour-converted RGBA frame
    Packed,
    /// Mode-transformed RGBA frame
    Output,
    /// Single-channel luminance / edge map
    Gray,
}

impl ScratchSlot {
    pub const ALL: [ScratchSlot; 4] = [
        ScratchSlot::Planar,
        ScratchSlot::Packed,
        ScratchSlot::Output,
        ScratchSlot::Gray,
    ];

    const COUNT: usize = Self::ALL.len();

    fn index(self) -> usize {
        self as usize
    }

    /// Buffer length in bytes for the given dimensions
    pub fn byte_len(self, dims: FrameDimensions) -> usize {
        match self {
            ScratchSlot::Planar => dims.planar_len(),
            ScratchSlot::Packed | ScratchSlot::Output => dims.packed_len(),
            ScratchSlot::Gray => dims.pixel_count(),
        }
    }
}

/// Working memory for Gaussian smoothing and Canny edge detection
#[derive(Debug, Default)]
pub struct EdgeWorkspace {
    /// Horizontal blur pass, 8 fractional bits
    pub(crate) smooth: Vec<u16>,
    pub(crate) grad_x: Vec<i16>,
    pub(crate) grad_y: Vec<i16>,
    /// L1 gradient magnitude
    pub(crate) magnitude: Vec<i32>,
    /// Hysteresis state per pixel
    pub(crate) state: Vec<u8>,
    /// Pending strong pixels; capacity covers every pixel so pushes never grow it
    pub(crate) stack: Vec<u32>,
}

impl EdgeWorkspace {
    fn allocate(dims: FrameDimensions) -> Self {
        let n = dims.pixel_count();
        Self {
            smooth: vec![0; n],
            grad_x: vec![0; n],
            grad_y: vec![0; n],
            magnitude: vec![0; n],
            state: vec![0; n],
            stack: Vec::with_capacity(n),
        }
    }
}

/// Disjoint mutable borrows of every buffer, valid for one frame
pub struct ScratchViews<'a> {
    pub planar: &'a mut [u8],
    pub packed: &'a mut [u8],
    pub output: &'a mut [u8],
    pub gray: &'a mut [u8],
    pub edges: &'a mut EdgeWorkspace,
}

/// Owner of every scratch buffer used by the processor
#[derive(Debug, Default)]
pub struct FrameStore {
    dims: Option<FrameDimensions>,
    slots: [Vec<u8>; ScratchSlot::COUNT],
    edges: EdgeWorkspace,
    /// Number of times buffers were (re)allocated
    allocations: u64,
}

impl FrameStore {
    /// Create an empty, uninitialized store (allocates nothing)
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_initialized(&self) -> bool {
        self.dims.is_some()
    }

    pub fn dimensions(&self) -> Option<FrameDimensions> {
        self.dims
    }

    /// Number of (re)allocations performed since creation
    pub fn allocation_count(&self) -> u64 {
        self.allocations
    }

    /// Size every buffer for `width` x `height`
    ///
    /// Invalid dimensions leave the current buffers untouched. Unchanged
    /// dimensions are a no-op.
    pub fn resize(&mut self, width: u32, height: u32) -> ProcessResult<FrameDimensions> {
        let dims = FrameDimensions::new(width, height)?;

        if self.dims == Some(dims) {
            return Ok(dims);
        }

        match self.dims {
            Some(old) => info!(from = %old, to = %dims, "Resizing frame buffers"),
            None => info!(dims = %dims, "Allocating frame buffers"),
        }

        // Fresh vectors rather than Vec::resize so shrinking returns memory
        for slot in ScratchSlot::ALL {
            self.slots[slot.index()] = vec![0; slot.byte_len(dims)];
        }
        self.edges = EdgeWorkspace::allocate(dims);
        self.dims = Some(dims);
        self.allocations += 1;

        Ok(dims)
    }

    /// Free every buffer and mark the store uninitialized
    pub fn release(&mut self) {
        if self.dims.take().is_some() {
            debug!("Releasing frame buffers");
        }
        for slot in &mut self.slots {
            *slot = Vec::new();
        }
        self.edges = EdgeWorkspace::default();
    }

    /// Read access to one slot (empty when uninitialized)
    pub fn slot(&self, slot: ScratchSlot) -> &[u8] {
        &self.slots[slot.index()]
    }

    /// Borrow all buffers at once for a processing pass
    pub fn views(&mut self) -> ScratchViews<'_> {
        let [planar, packed, output, gray] = &mut self.slots;
        ScratchViews {
            planar: planar.as_mut_slice(),
            packed: packed.as_mut_slice(),
            output: output.as_mut_slice(),
            gray: gray.as_mut_slice(),
            edges: &mut self.edges,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::ProcessError;

    #[test]
    fn test_new_store_is_empty() {
        let store = FrameStore::new();
        assert!(!store.is_initialized());
        assert_eq!(store.allocation_count(), 0);
        for slot in ScratchSlot::ALL {
            assert!(store.slot(slot).is_empty());
        }
    }

    #[test]
    fn test_resize_sizes_every_slot() {
        let mut store = FrameStore::new();
        let dims = store.resize(8, 4).unwrap();

        assert_eq!(store.slot(ScratchSlot::Planar).len(), 48);
        assert_eq!(store.slot(ScratchSlot::Packed).len(), 128);
        assert_eq!(store.slot(ScratchSlot::Output).len(), 128);
        assert_eq!(store.slot(ScratchSlot::Gray).len(), 32);

        let views = store.views();
        assert_eq!(views.edges.magnitude.len(), dims.pixel_count());
        assert!(views.edges.stack.capacity() >= dims.pixel_count());
    }

    #[test]
    fn test_resize_same_dimensions_does_not_reallocate() {
        let mut store = FrameStore::new();
        store.resize(16, 16).unwrap();
        let ptr = store.slot(ScratchSlot::Packed).as_ptr();

        store.resize(16, 16).unwrap();
        assert_eq!(store.allocation_count(), 1);
        assert_eq!(store.slot(ScratchSlot::Packed).as_ptr(), ptr);
    }

    #[test]
    fn test_invalid_resize_keeps_buffers() {
        let mut store = FrameStore::new();
        store.resize(4, 4).unwrap();

        let err = store.resize(0, 4).unwrap_err();
        assert_eq!(
            err,
            ProcessError::InvalidDimensions {
                width: 0,
                height: 4
            }
        );
        assert_eq!(store.dimensions(), FrameDimensions::new(4, 4).ok());
        assert_eq!(store.slot(ScratchSlot::Gray).len(), 16);
    }

    #[test]
    fn test_release_is_repeatable() {
        let mut store = FrameStore::new();
        store.resize(4, 2).unwrap();
        store.release();
        store.release();

        assert!(!store.is_initialized());
        assert!(store.slot(ScratchSlot::Planar).is_empty());
    }
}
