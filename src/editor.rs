//! Block editor — the erase/restore core.
//!
//! Owns two pixel buffers (`original`, the read-only baseline, and `working`,
//! the buffer that gets rendered and saved) plus the block list. The block
//! list is kept partitioned in place: the prefix `[0, displayed_count)` holds
//! blocks still showing original pixels, the suffix holds erased blocks with
//! the most recent erasure at index `displayed_count`. Erasing swaps a
//! uniformly-chosen active block to the boundary and shrinks the prefix;
//! restoring re-reads the boundary block and grows it. That one moving cursor
//! gives O(1) random selection and structural LIFO undo — no candidate
//! rescans, no separate history stack.

use std::path::Path;

use image::{Rgba, RgbaImage};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::block::{Block, partition};
use crate::io::{self, EditorError};

/// Color painted into erased blocks: opaque black.
pub const ERASE_COLOR: Rgba<u8> = Rgba([0, 0, 0, 255]);

pub struct BlockEditor {
    /// Baseline pixels, untouched after construction.
    original: RgbaImage,
    /// The buffer erase/restore mutate; what `export`/`save` expose.
    working: RgbaImage,
    block_list: Vec<Block>,
    /// Number of active (unerased) blocks; the active prefix is
    /// `block_list[..displayed_count]`.
    displayed_count: usize,
    block_size: u32,
    rng: StdRng,
}

impl BlockEditor {
    /// Build an editor over `image` tiled at `block_size`, with an
    /// entropy-seeded block picker.
    pub fn new(image: RgbaImage, block_size: u32) -> Result<Self, EditorError> {
        Self::build(image, block_size, StdRng::from_entropy())
    }

    /// Like [`BlockEditor::new`] but with a fixed RNG seed, so the erase
    /// sequence is reproducible.
    pub fn with_seed(image: RgbaImage, block_size: u32, seed: u64) -> Result<Self, EditorError> {
        Self::build(image, block_size, StdRng::seed_from_u64(seed))
    }

    /// Decode the file at `path` and build an editor over it.
    pub fn open(path: &Path, block_size: u32) -> Result<Self, EditorError> {
        Self::new(io::decode_image(path)?, block_size)
    }

    fn build(image: RgbaImage, block_size: u32, rng: StdRng) -> Result<Self, EditorError> {
        if block_size == 0 {
            return Err(EditorError::InvalidArgument(
                "block size must be a positive integer".into(),
            ));
        }
        if image.width() == 0 || image.height() == 0 {
            return Err(EditorError::InvalidArgument(
                "image has zero width or height".into(),
            ));
        }

        let block_list = partition(image.width(), image.height(), block_size);
        let displayed_count = block_list.len();
        Ok(Self {
            working: image.clone(),
            original: image,
            block_list,
            displayed_count,
            block_size,
            rng,
        })
    }

    /// Re-tile the retained original at a new block size. All erasure state
    /// is discarded: `working` reverts to the original and every block of the
    /// new partition starts active. Old block boundaries are meaningless at
    /// the new granularity, so there is nothing to carry over.
    pub fn rebin(&mut self, block_size: u32) -> Result<(), EditorError> {
        if block_size == 0 {
            return Err(EditorError::InvalidArgument(
                "block size must be a positive integer".into(),
            ));
        }
        self.working = self.original.clone();
        self.block_list = partition(self.original.width(), self.original.height(), block_size);
        self.displayed_count = self.block_list.len();
        self.block_size = block_size;
        Ok(())
    }

    /// Erase one uniformly-random active block. Returns `false` without
    /// touching anything when no active block remains.
    pub fn erase_one(&mut self) -> bool {
        if self.displayed_count == 0 {
            return false;
        }
        let i = self.rng.gen_range(0..self.displayed_count);
        self.block_list.swap(i, self.displayed_count - 1);
        self.displayed_count -= 1;
        self.paint_erased(self.block_list[self.displayed_count]);
        true
    }

    /// Erase up to `n` random blocks, one at a time. Stops early at the
    /// floor; returns how many blocks were actually erased. Not atomic —
    /// every completed step stays applied.
    pub fn erase_n(&mut self, n: usize) -> usize {
        let mut done = 0;
        while done < n && self.erase_one() {
            done += 1;
        }
        done
    }

    /// Restore the most recently erased block. Returns `false` when nothing
    /// is erased. The boundary block is always the last one swapped out, so
    /// repeated calls unwind erasures in exact reverse order.
    pub fn restore_one(&mut self) -> bool {
        if self.displayed_count == self.block_list.len() {
            return false;
        }
        self.paint_restored(self.block_list[self.displayed_count]);
        self.displayed_count += 1;
        true
    }

    /// Restore up to `n` blocks in LIFO order. Returns the actual count
    /// performed; same non-atomic semantics as [`BlockEditor::erase_n`].
    pub fn restore_n(&mut self, n: usize) -> usize {
        let mut done = 0;
        while done < n && self.restore_one() {
            done += 1;
        }
        done
    }

    /// Read-only view of the working buffer for rendering or saving.
    pub fn export(&self) -> &RgbaImage {
        &self.working
    }

    /// Encode the working buffer to `path`, format implied by the extension.
    /// The in-memory buffer is unaffected by a failed save.
    pub fn save(&self, path: &Path) -> Result<(), EditorError> {
        io::encode_and_write(&self.working, path, io::DEFAULT_JPEG_QUALITY)
    }

    /// [`BlockEditor::save`] with an explicit JPEG/WEBP quality (1–100).
    pub fn save_with_quality(&self, path: &Path, quality: u8) -> Result<(), EditorError> {
        io::encode_and_write(&self.working, path, quality)
    }

    // ---- accessors ----------------------------------------------------------

    pub fn block_count(&self) -> usize {
        self.block_list.len()
    }

    pub fn active_count(&self) -> usize {
        self.displayed_count
    }

    pub fn erased_count(&self) -> usize {
        self.block_list.len() - self.displayed_count
    }

    pub fn block_size(&self) -> u32 {
        self.block_size
    }

    pub fn dimensions(&self) -> (u32, u32) {
        self.original.dimensions()
    }

    // ---- pixel painting -----------------------------------------------------

    /// Fill `block`'s pixels in the working buffer with the erase color.
    fn paint_erased(&mut self, block: Block) {
        let stride = self.working.width() as usize * 4;
        let raw = self.working.as_mut();
        for y in block.y0..block.y1 {
            let start = y as usize * stride + block.x0 as usize * 4;
            let end = start + block.width() as usize * 4;
            for px in raw[start..end].chunks_exact_mut(4) {
                px.copy_from_slice(&ERASE_COLOR.0);
            }
        }
    }

    /// Copy `block`'s pixels from the original back into the working buffer.
    fn paint_restored(&mut self, block: Block) {
        let stride = self.working.width() as usize * 4;
        let src = self.original.as_raw();
        let dst = self.working.as_mut();
        for y in block.y0..block.y1 {
            let start = y as usize * stride + block.x0 as usize * 4;
            let end = start + block.width() as usize * 4;
            dst[start..end].copy_from_slice(&src[start..end]);
        }
    }
}
