use crate::Sample;

/// Linear ramp from `start` to `end` over a fixed number of samples.
///
/// Once the end is reached the value is held.
#[derive(Debug, Clone)]
pub struct Line {
    start: Sample,
    end: Sample,
    increment: Sample,
    value: Sample,
    length: usize,
    remaining: usize,
}

impl Line {
    pub fn new(start: Sample, end: Sample, samples: usize) -> Self {
        let mut line = Self {
            start,
            end,
            increment: 0.0,
            value: start,
            length: 0,
            remaining: 0,
        };
        line.set(start, end, samples);
        line
    }

    /// Restart the ramp with new endpoints. A zero-length ramp jumps
    /// straight to `end`.
    pub fn set(&mut self, start: Sample, end: Sample, samples: usize) {
        self.start = start;
        self.end = end;
        self.value = if samples == 0 { end } else { start };
        self.length = samples;
        self.remaining = samples;
        self.increment = (end - start) / samples.max(1) as Sample;
    }

    /// Ramp from the current value to `end`.
    pub fn ramp_to(&mut self, end: Sample, samples: usize) {
        self.set(self.value, end, samples);
    }

    pub fn value(&self) -> Sample {
        self.value
    }

    pub fn is_finished(&self) -> bool {
        self.remaining == 0
    }

    #[inline]
    pub fn next_sample(&mut self) -> Sample {
        let out = self.value;
        if self.remaining > 0 {
            self.remaining -= 1;
            self.value = if self.remaining == 0 {
                self.end
            } else {
                self.value + self.increment
            };
        }
        out
    }

    pub fn render(&mut self, buffer: &mut [Sample]) {
        for sample in buffer.iter_mut() {
            *sample = self.next_sample();
        }
    }

    /// Jump back to the start of the ramp.
    pub fn reset(&mut self) {
        self.set(self.start, self.end, self.length);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ramps_linearly_then_holds() {
        let mut line = Line::new(0.0, 1.0, 4);
        let out: Vec<Sample> = (0..7).map(|_| line.next_sample()).collect();
        assert_eq!(out, vec![0.0, 0.25, 0.5, 0.75, 1.0, 1.0, 1.0]);
        assert!(line.is_finished());
    }

    #[test]
    fn zero_length_jumps_to_end() {
        let mut line = Line::new(0.3, -0.3, 0);
        assert!(line.is_finished());
        assert_eq!(line.next_sample(), -0.3);

        line.ramp_to(0.5, 1);
        assert_eq!(line.next_sample(), -0.3);
        assert_eq!(line.value(), 0.5);
    }

    #[test]
    fn reset_restarts_ramp() {
        let mut line = Line::new(1.0, 0.0, 8);
        let mut block = [0.0; 8];
        line.render(&mut block);
        assert_eq!(line.value(), 0.0);

        line.reset();
        assert_eq!(line.value(), 1.0);
        assert!(!line.is_finished());
    }
}
