use std::ops::Index;

use crate::Sample;

/// Fixed-capacity ring buffer of samples.
///
/// Storage lives inline (`[Sample; N]`) and never reallocates. Writing to a
/// full buffer overwrites the oldest sample.
#[derive(Debug, Clone)]
pub struct CircularBuffer<const N: usize> {
    buffer: [Sample; N],
    write_pos: usize, // next slot to write
    read_pos: usize,  // oldest retained sample
    count: usize,
}

impl<const N: usize> CircularBuffer<N> {
    pub const fn new() -> Self {
        assert!(N > 0, "CircularBuffer capacity must be non-zero");
        Self {
            buffer: [0.0; N],
            write_pos: 0,
            read_pos: 0,
            count: 0,
        }
    }

    pub const fn capacity(&self) -> usize {
        N
    }

    /// Number of samples currently retained.
    pub fn count(&self) -> usize {
        self.count
    }

    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    pub fn is_full(&self) -> bool {
        self.count == N
    }

    /// Append a sample, overwriting the oldest one once full.
    #[inline]
    pub fn write(&mut self, sample: Sample) {
        self.buffer[self.write_pos] = sample;
        self.write_pos = (self.write_pos + 1) % N;

        if self.count == N {
            self.read_pos = (self.read_pos + 1) % N;
        } else {
            self.count += 1;
        }
    }

    /// Sample `offset` positions behind the most recent write.
    ///
    /// `read(0)` is the latest sample. Offsets wrap modulo the capacity.
    #[inline]
    pub fn read(&self, offset: usize) -> Sample {
        let offset = offset % N;
        let idx = (self.write_pos + N - 1 - offset) % N;
        self.buffer[idx]
    }

    /// Remove and return the oldest sample.
    pub fn pop(&mut self) -> Option<Sample> {
        if self.count == 0 {
            return None;
        }

        let sample = self.buffer[self.read_pos];
        self.read_pos = (self.read_pos + 1) % N;
        self.count -= 1;
        Some(sample)
    }

    /// Oldest sample without removing it.
    pub fn peek(&self) -> Option<Sample> {
        (self.count > 0).then(|| self.buffer[self.read_pos])
    }

    /// Fill every slot with `value`; the buffer is full afterwards.
    pub fn fill(&mut self, value: Sample) {
        self.buffer.fill(value);
        self.count = N;
        self.read_pos = self.write_pos;
    }

    /// Zero the contents.
    pub fn reset(&mut self) {
        self.fill(0.0);
    }
}

impl<const N: usize> Default for CircularBuffer<N> {
    fn default() -> Self {
        Self::new()
    }
}

/// Index relative to the oldest retained sample (0 = oldest).
impl<const N: usize> Index<usize> for CircularBuffer<N> {
    type Output = Sample;

    fn index(&self, idx: usize) -> &Sample {
        &self.buffer[(self.read_pos + idx) % N]
    }
}
