//! FIFO worklist for light propagation.
//!
//! A ring buffer over a power-of-two sized slice, so wrapping is a mask.

use super::{queue_entry::QueueEntry, region::Voxel};

/// A FIFO queue of `(Voxel, QueueEntry)` pairs waiting to be processed.
#[derive(Debug)]
pub struct LightQueue {
    buffer: Box<[(Voxel, QueueEntry)]>,
    head: usize,
    tail: usize,
    size: usize,
}

impl LightQueue {
    /// Creates an empty queue with room for 4096 entries, one section's worth.
    #[must_use]
    pub fn new() -> Self {
        Self::with_capacity(4096)
    }

    /// Creates an empty queue with at least `capacity` slots.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        let capacity = capacity.max(16).next_power_of_two();
        Self {
            buffer: vec![(Voxel::default(), QueueEntry::default()); capacity].into_boxed_slice(),
            head: 0,
            tail: 0,
            size: 0,
        }
    }

    /// Enqueues a voxel and its entry.
    #[inline]
    pub fn enqueue(&mut self, voxel: Voxel, entry: QueueEntry) {
        if self.size == self.buffer.len() {
            self.grow();
        }
        self.buffer[self.tail] = (voxel, entry);
        self.tail = (self.tail + 1) & (self.buffer.len() - 1);
        self.size += 1;
    }

    /// Dequeues the oldest pair, or `None` if the queue is empty.
    #[inline]
    pub fn dequeue(&mut self) -> Option<(Voxel, QueueEntry)> {
        if self.size == 0 {
            return None;
        }
        let item = self.buffer[self.head];
        self.head = (self.head + 1) & (self.buffer.len() - 1);
        self.size -= 1;
        Some(item)
    }

    /// Checks if the queue is empty.
    #[must_use]
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.size == 0
    }

    /// Returns the number of queued pairs.
    #[must_use]
    #[inline]
    pub fn len(&self) -> usize {
        self.size
    }

    fn grow(&mut self) {
        let old_capacity = self.buffer.len();
        let mut grown = Vec::with_capacity(old_capacity * 2);
        for i in 0..self.size {
            grown.push(self.buffer[(self.head + i) & (old_capacity - 1)]);
        }
        grown.resize(old_capacity * 2, (Voxel::default(), QueueEntry::default()));
        self.buffer = grown.into_boxed_slice();
        self.head = 0;
        self.tail = self.size;
    }
}

impl Default for LightQueue {
    fn default() -> Self {
        Self::new()
    }
}
