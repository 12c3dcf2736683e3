//! Fixed-size frame reassembly window.

use sessionlink_proto::packet::{Packet, BUFFER_SIZE};

use crate::error::BufferError;

/// Absorbs out-of-order/duplicate fragments into a fixed `BUFFER_SIZE`
/// window and tracks how much of it has been written.
pub struct ReassemblyBuffer {
    frames: Box<[u8; BUFFER_SIZE]>,
    received: usize,
    size: usize,
}

impl ReassemblyBuffer {
    /// A fresh, empty buffer.
    #[must_use]
    pub fn new() -> Self {
        Self { frames: Box::new([0u8; BUFFER_SIZE]), received: 0, size: 0 }
    }

    /// Write one fragment's payload into `[frame_begin, frame_end]`.
    ///
    /// # Errors
    /// [`BufferError::RangeOutOfBounds`] if the range falls outside
    /// `[0, BUFFER_SIZE)` or is inverted; [`BufferError::LengthMismatch`] if
    /// the payload length doesn't match the declared span.
    pub fn write(&mut self, packet: &Packet) -> Result<(), BufferError> {
        let begin = packet.frame_begin;
        let end = packet.frame_end;

        if begin < 0 || end < 0 || (end as usize) >= BUFFER_SIZE || begin > end {
            return Err(BufferError::RangeOutOfBounds { begin, end });
        }

        let begin = begin as usize;
        let end = end as usize;
        let expected = end - begin + 1;

        if packet.payload.len() != expected {
            return Err(BufferError::LengthMismatch { expected, actual: packet.payload.len() });
        }

        self.frames[begin..=end].copy_from_slice(&packet.payload);
        self.received += packet.payload.len();
        self.size = self.size.max(end + 1);
        Ok(())
    }

    /// Zero the window and reset counters.
    pub fn flush(&mut self) {
        self.frames.fill(0);
        self.received = 0;
        self.size = 0;
    }

    /// Current high-water mark: one past the highest byte offset written.
    #[must_use]
    pub fn size(&self) -> usize {
        self.size
    }

    /// Total bytes written across all fragments (duplicates count twice).
    #[must_use]
    pub fn received(&self) -> usize {
        self.received
    }

    /// The written window, `[0, size())`.
    #[must_use]
    pub fn contents(&self) -> &[u8] {
        &self.frames[..self.size]
    }
}

impl Default for ReassemblyBuffer {
    fn default() -> Self {
        Self::new()
    }
}
