use std::ops::{Index, IndexMut};

use crate::dsp::delay::DelayLine;
use crate::dsp::interpolation::InterpolationType;
use crate::waveguide::junction::Junction;
use crate::{ConfigError, Sample};

/*
Waveguide Layout
================

  nut                                                     bridge
   |  pos 1   pos 2   ...                      pos L          |
   |  ------------------ Right line ------------------->      |
   |  <----------------- Left line --------------------       |

The right line is fed at the nut and empties at the bridge, so the sample at
position x has been in it for x ticks. The left line is fed at the bridge and
empties at the nut: position x holds the sample that entered L + 1 - x ticks
ago. Both lines read out at age L, so a disturbance needs 2L ticks for a
round trip and the fundamental is sample_rate / 2L.

A fractional length L = n + f is folded into the right line (n + 2f) while
the left line keeps the integer part n, which preserves the round trip
without needing two interpolated reads.
*/

/// Which of the two travelling-wave lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// Nut to bridge.
    Right,
    /// Bridge to nut.
    Left,
}

impl Direction {
    const fn index(self) -> usize {
        match self {
            Direction::Right => 0,
            Direction::Left => 1,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Waveguide {
    lines: [DelayLine; 2],
    delay: f32,
    junction: Option<Junction>,
}

impl Waveguide {
    pub const MIN_DELAY: f32 = 2.0;

    /// Two lines of `max_size` samples. The delay starts at the largest
    /// integer length that fits.
    pub fn new(max_size: usize, interpolation: InterpolationType) -> Result<Self, ConfigError> {
        let right = DelayLine::new(max_size, interpolation)?;
        let left = DelayLine::new(max_size, interpolation)?;
        let mut waveguide = Self {
            lines: [right, left],
            delay: 0.0,
            junction: None,
        };
        waveguide.set_delay(waveguide.max_delay())?;
        Ok(waveguide)
    }

    /// Largest length accepted by `set_delay`.
    pub fn max_delay(&self) -> f32 {
        self.lines[0].max_delay()
    }

    /// One-way length in samples.
    pub fn set_delay(&mut self, delay: f32) -> Result<(), ConfigError> {
        let max = self.max_delay();
        if !delay.is_finite() || delay < Self::MIN_DELAY {
            return Err(ConfigError::DelayOutOfRange { delay, max });
        }

        let whole = delay.floor();
        let right = whole + 2.0 * (delay - whole);
        if right > max {
            return Err(ConfigError::DelayOutOfRange { delay, max });
        }

        if let Some(junction) = &self.junction {
            if junction.position() + 1 >= whole as usize {
                return Err(ConfigError::DelayOutOfRange {
                    delay,
                    max: junction.position() as f32 + 1.0,
                });
            }
        }

        self.lines[Direction::Right.index()].set_delay(right)?;
        self.lines[Direction::Left.index()].set_delay(whole)?;
        self.delay = delay;
        Ok(())
    }

    pub fn delay(&self) -> f32 {
        self.delay
    }

    /// Last integer position, next to the bridge.
    pub fn length(&self) -> usize {
        self.delay as usize
    }

    /// Install or remove a scattering junction.
    ///
    /// The junction sits between `position` and `position + 1`, so it must
    /// leave at least one sample on each side.
    pub fn set_junction(&mut self, junction: Option<Junction>) -> Result<(), ConfigError> {
        if let Some(junction) = &junction {
            let position = junction.position();
            let last = self.length().saturating_sub(1);
            if position < 1 || position >= last {
                return Err(ConfigError::DelayOutOfRange {
                    delay: position as f32,
                    max: last as f32,
                });
            }
        }
        self.junction = junction;
        Ok(())
    }

    pub fn junction(&self) -> Option<&Junction> {
        self.junction.as_ref()
    }

    fn clamp_position(&self, position: f32) -> f32 {
        position.clamp(1.0, self.delay.floor())
    }

    /// Age of the sample at `position` inside the line for `direction`.
    fn age(&self, direction: Direction, position: f32) -> f32 {
        match direction {
            Direction::Right => position,
            Direction::Left => self.delay.floor() + 1.0 - position,
        }
    }

    /// Waves about to leave the lines: `(at_bridge, at_nut)`.
    #[inline]
    pub fn next_out(&mut self) -> (Sample, Sample) {
        let at_bridge = self.lines[Direction::Right.index()].next_out();
        let at_nut = self.lines[Direction::Left.index()].next_out();
        (at_bridge, at_nut)
    }

    /// Advance both lines. `into_right` enters at the nut, `into_left` at
    /// the bridge. The junction, if any, scatters first.
    #[inline]
    pub fn tick(&mut self, into_right: Sample, into_left: Sample) {
        if let Some(junction) = self.junction {
            let position = junction.position();
            let forward = self.get(Direction::Right, position);
            let backward = self.get(Direction::Left, position + 1);
            let (forward, backward) = junction.scatter(forward, backward);
            self.set(Direction::Right, position, forward);
            self.set(Direction::Left, position + 1, backward);
        }

        self.lines[Direction::Right.index()].tick(into_right);
        self.lines[Direction::Left.index()].tick(into_left);
    }

    /// Add `value` to both lines at `position` (clamped to `1..=length`).
    #[inline]
    pub fn tap_in(&mut self, position: f32, value: Sample) {
        self.tap_in_split(position, value, value);
    }

    #[inline]
    pub fn tap_in_split(&mut self, position: f32, right: Sample, left: Sample) {
        let position = self.clamp_position(position);
        let right_age = self.age(Direction::Right, position);
        let left_age = self.age(Direction::Left, position);
        self.lines[Direction::Right.index()].tap_in(right_age, right);
        self.lines[Direction::Left.index()].tap_in(left_age, left);
    }

    /// Sum of both travelling waves at `position`.
    #[inline]
    pub fn tap_out(&self, position: f32) -> Sample {
        let (right, left) = self.tap_out_split(position);
        right + left
    }

    /// `(right, left)` travelling waves at `position`.
    #[inline]
    pub fn tap_out_split(&self, position: f32) -> (Sample, Sample) {
        let position = self.clamp_position(position);
        let right = self.lines[Direction::Right.index()].tap_out(self.age(Direction::Right, position));
        let left = self.lines[Direction::Left.index()].tap_out(self.age(Direction::Left, position));
        (right, left)
    }

    /// Sample at an integer position of one line.
    #[inline]
    pub fn get(&self, direction: Direction, position: usize) -> Sample {
        let age = self.age(direction, position as f32) as usize;
        self[direction].get(age)
    }

    #[inline]
    pub fn set(&mut self, direction: Direction, position: usize, value: Sample) {
        let age = self.age(direction, position as f32) as usize;
        self[direction].set(age, value);
    }

    pub fn reset(&mut self) {
        for line in self.lines.iter_mut() {
            line.reset();
        }
    }
}

impl Index<Direction> for Waveguide {
    type Output = DelayLine;

    fn index(&self, direction: Direction) -> &DelayLine {
        &self.lines[direction.index()]
    }
}

impl IndexMut<Direction> for Waveguide {
    fn index_mut(&mut self, direction: Direction) -> &mut DelayLine {
        &mut self.lines[direction.index()]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn waveguide(delay: f32) -> Waveguide {
        let mut guide = Waveguide::new(64, InterpolationType::Linear).unwrap();
        guide.set_delay(delay).unwrap();
        guide
    }

    #[test]
    fn right_wave_reaches_bridge_after_travelling_the_rest() {
        let mut guide = waveguide(10.0);
        // Position 4 is six ticks away from leaving at position 10
        guide.tap_in_split(4.0, 1.0, 0.0);

        let mut arrivals = Vec::new();
        for _ in 0..8 {
            let (at_bridge, at_nut) = guide.next_out();
            arrivals.push((at_bridge, at_nut));
            guide.tick(0.0, 0.0);
        }
        assert_eq!(arrivals[6], (1.0, 0.0));
        assert!(arrivals.iter().filter(|(b, n)| *b != 0.0 || *n != 0.0).count() == 1);
    }

    #[test]
    fn left_wave_reaches_nut_after_travelling_to_position_one() {
        let mut guide = waveguide(10.0);
        guide.tap_in_split(4.0, 0.0, 1.0);

        let arrival = (0..8)
            .position(|_| {
                let (_, at_nut) = guide.next_out();
                guide.tick(0.0, 0.0);
                at_nut != 0.0
            })
            .unwrap();
        // Position 4 to position 1 is three ticks; it leaves on the fourth
        assert_eq!(arrival, 3);
    }

    #[test]
    fn round_trip_with_inverting_ends_takes_twice_the_length() {
        let mut guide = waveguide(12.0);
        guide.tap_in_split(1.0, 1.0, 0.0);

        let mut times = Vec::new();
        for n in 0..60 {
            let (at_bridge, at_nut) = guide.next_out();
            if at_bridge != 0.0 {
                times.push(n);
            }
            guide.tick(-at_nut, -at_bridge);
        }
        // Leaves at the bridge every 2L = 24 ticks
        assert_eq!(times[1] - times[0], 24);
        assert_eq!(times[2] - times[1], 24);
    }

    #[test]
    fn tap_out_sums_both_directions() {
        let mut guide = waveguide(8.0);
        guide.tap_in_split(3.0, 0.25, 0.5);
        assert_eq!(guide.tap_out_split(3.0), (0.25, 0.5));
        assert_eq!(guide.tap_out(3.0), 0.75);
    }

    #[test]
    fn positions_are_clamped_to_the_string() {
        let mut guide = waveguide(8.0);
        guide.tap_in(42.0, 1.0);
        assert_eq!(guide.tap_out_split(8.0), (1.0, 1.0));
        guide.tap_in(-3.0, 1.0);
        assert_eq!(guide.get(Direction::Left, 1), 1.0);
    }

    #[test]
    fn delay_must_fit_the_lines() {
        let mut guide = Waveguide::new(16, InterpolationType::Allpass).unwrap();
        assert_eq!(guide.delay(), 15.0);
        // 14.6 folds into a right line of 15.2
        assert!(guide.set_delay(14.6).is_err());
        assert!(guide.set_delay(14.5).is_ok());
        assert!(guide.set_delay(14.4).is_ok());
        assert!(guide.set_delay(1.0).is_err());
        assert!(guide.set_delay(f32::INFINITY).is_err());
        assert_eq!(guide.delay(), 14.4);
    }

    #[test]
    fn junction_must_sit_inside_the_string() {
        let mut guide = waveguide(10.0);
        assert!(guide.set_junction(Some(Junction::new(0, 0.5).unwrap())).is_err());
        assert!(guide.set_junction(Some(Junction::new(9, 0.5).unwrap())).is_err());
        assert!(guide.set_junction(Some(Junction::new(5, 0.5).unwrap())).is_ok());
        // Shortening past the junction is refused
        assert!(guide.set_delay(5.0).is_err());
        guide.set_junction(None).unwrap();
        assert!(guide.set_delay(5.0).is_ok());
    }

    #[test]
    fn transparent_junction_changes_nothing() {
        let mut plain = waveguide(16.0);
        let mut scattered = waveguide(16.0);
        scattered
            .set_junction(Some(Junction::new(7, 0.0).unwrap()))
            .unwrap();

        for guide in [&mut plain, &mut scattered] {
            guide.tap_in(5.0, 1.0);
            guide.tap_in(11.0, -0.5);
        }

        for _ in 0..100 {
            let a = plain.next_out();
            let b = scattered.next_out();
            assert_eq!(a, b);
            plain.tick(-0.9 * a.1, -0.9 * a.0);
            scattered.tick(-0.9 * b.1, -0.9 * b.0);
        }
    }

    #[test]
    fn reflecting_junction_sends_energy_back() {
        let mut guide = waveguide(16.0);
        guide
            .set_junction(Some(Junction::new(8, -1.0).unwrap()))
            .unwrap();
        // A right-going pulse between the nut and the junction
        guide.tap_in_split(2.0, 1.0, 0.0);

        let mut at_nut_total = 0.0;
        for _ in 0..30 {
            let (_, at_nut) = guide.next_out();
            at_nut_total += at_nut.abs();
            guide.tick(0.0, 0.0);
        }
        assert!(at_nut_total > 0.5, "{at_nut_total}");
    }
}
