//! Handoff of "new frame available" from the video thread to the renderer
//!
//! The decoder side publishes when its surface has a new image; the render
//! thread takes at most one update per publication before its next draw.
//! Only the latest frame matters, so an unsampled update is overwritten.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use glam::Mat4;
use log::warn;

/// What the render thread needs to sample a freshly decoded frame
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameUpdate {
    /// Counts publications; gaps mean frames were dropped unsampled
    pub generation: u64,
    /// Decoder's texture-coordinate transform for this frame
    pub texture_matrix: Mat4,
}

struct Pending {
    generation: u64,
    texture_matrix: Mat4,
    has_new_frame: bool,
}

/// Single-producer/single-consumer mailbox for frame availability.
/// Cloning yields another handle to the same slot.
#[derive(Clone)]
pub struct FrameSlot {
    pending: Arc<Mutex<Pending>>,
    closed: Arc<AtomicBool>,
}

impl Default for FrameSlot {
    fn default() -> Self {
        Self::new()
    }
}

impl FrameSlot {
    pub fn new() -> Self {
        Self {
            pending: Arc::new(Mutex::new(Pending {
                generation: 0,
                texture_matrix: Mat4::IDENTITY,
                has_new_frame: false,
            })),
            closed: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Producer side: a new frame is ready on the external texture.
    /// Returns the generation assigned to it, or `None` once closed.
    pub fn publish(&self, texture_matrix: Mat4) -> Option<u64> {
        if self.closed.load(Ordering::SeqCst) {
            return None;
        }
        match self.pending.lock() {
            Ok(mut pending) => {
                pending.generation += 1;
                pending.texture_matrix = texture_matrix;
                pending.has_new_frame = true;
                Some(pending.generation)
            }
            Err(_) => {
                warn!("FrameSlot: lock poisoned, dropping frame");
                None
            }
        }
    }

    /// Consumer side: the newest unsampled frame, if any
    pub fn take(&self) -> Option<FrameUpdate> {
        let mut pending = self.pending.lock().ok()?;
        if !pending.has_new_frame {
            return None;
        }
        pending.has_new_frame = false;
        Some(FrameUpdate {
            generation: pending.generation,
            texture_matrix: pending.texture_matrix,
        })
    }

    /// Number of frames published so far
    pub fn generation(&self) -> u64 {
        self.pending.lock().map(|p| p.generation).unwrap_or(0)
    }

    /// Stops accepting frames, e.g. when the surface is being torn down
    pub fn close(&self) {
        self.closed.store(true, Ordering::SeqCst);
    }

    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::SeqCst)
    }
}
