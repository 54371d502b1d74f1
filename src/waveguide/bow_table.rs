use crate::Sample;

/*
Bow Friction
============

A bowed string alternates between sticking to the bow hair and slipping
against it. The bow table is the memoryless curve that decides how much of
the bow/string velocity difference is transmitted:

  reflection(dv) = ( |(dv + offset) * slope| + 0.75 ) ^ -4

clamped to [0.01, 0.98]. Near dv = 0 the curve is high (stick: the string
follows the bow); as |dv| grows it drops off quickly (slip).

  reflection
    0.98 |      ___
         |     /   \
         |    /     \
    0.01 |___/       \___
         +----------------- dv
                 0

Higher slope means a narrower peak, which is what a lighter bow does: the
string breaks away at a smaller velocity difference. Force maps onto slope
as `5 - 4.5 * force`, so full force gives the widest sticking region.
*/

const MIN_REFLECTION: f32 = 0.01;
const MAX_REFLECTION: f32 = 0.98;

#[derive(Debug, Clone, PartialEq)]
pub struct BowTable {
    offset: f32,
    slope: f32,
}

impl BowTable {
    pub fn new() -> Self {
        Self {
            offset: 0.001,
            slope: 5.0,
        }
    }

    /// Bow force in `[0, 1]`. Values outside are clamped, so this is safe
    /// to drive from a smoothed parameter every sample.
    #[inline]
    pub fn set_force(&mut self, force: f32) {
        self.slope = 5.0 - 4.5 * force.clamp(0.0, 1.0);
    }

    pub fn set_slope(&mut self, slope: f32) {
        self.slope = slope;
    }

    pub fn slope(&self) -> f32 {
        self.slope
    }

    pub fn set_offset(&mut self, offset: f32) {
        self.offset = offset;
    }

    pub fn offset(&self) -> f32 {
        self.offset
    }

    /// Reflection coefficient for a bow/string velocity difference.
    #[inline]
    pub fn tick(&self, delta_v: Sample) -> Sample {
        let sample = (delta_v + self.offset) * self.slope;
        (sample.abs() + 0.75)
            .powi(-4)
            .clamp(MIN_REFLECTION, MAX_REFLECTION)
    }
}

impl Default for BowTable {
    fn default() -> Self {
        Self::new()
    }
}
