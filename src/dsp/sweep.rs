/// Linear ramp from one value to another over a fixed time, then hold.
///
/// Drums use two of these per hit: one on amplitude (decay to silence) and,
/// for the kick, one on frequency (the downward pitch "thump").
pub struct Sweep {
    sample_rate: f32,
    value: f32,
    end: f32,
    step: f32,
    remaining: u32,
}

impl Sweep {
    /// A sweep resting at `value` until the first `activate`.
    pub fn new(value: f32, sample_rate: f32) -> Self {
        Self {
            sample_rate,
            value,
            end: value,
            step: 0.0,
            remaining: 0,
        }
    }

    /// Restart the ramp: `start` now, `end` after `duration` seconds.
    pub fn activate(&mut self, duration: f32, start: f32, end: f32) {
        let samples = (duration.max(0.0) * self.sample_rate).round() as u32;
        self.value = start;
        self.end = end;
        if samples == 0 {
            self.value = end;
            self.step = 0.0;
            self.remaining = 0;
        } else {
            self.step = (end - start) / samples as f32;
            self.remaining = samples;
        }
    }

    /// Current value, then advance one sample.
    #[inline]
    pub fn next_value(&mut self) -> f32 {
        let current = self.value;
        if self.remaining > 0 {
            self.remaining -= 1;
            self.value = if self.remaining == 0 {
                self.end
            } else {
                self.value + self.step
            };
        }
        current
    }
}
