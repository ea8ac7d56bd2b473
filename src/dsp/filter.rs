use std::f32::consts::TAU;

/*
Topology-preserving state-variable high-pass (trapezoidal integration).

Passes content above the cutoff and rejects what is below it. The snare
(200Hz) and hat (10kHz) run their noise through it.

Coefficients are computed once at construction; the drums never move their
cutoff, so the per-sample path is a handful of multiplies.
*/

pub struct SVFilter {
    ic1eq: f32, // First integrator's memory
    ic2eq: f32, // Second integrator's memory

    g: f32,
    k: f32,
}

impl SVFilter {
    pub fn highpass(cutoff_hz: f32, resonance: f32, sample_rate: f32) -> Self {
        // Keep the cutoff below Nyquist or tan() blows up.
        let nyquist = sample_rate * 0.5;
        let cutoff = cutoff_hz.clamp(1.0, nyquist * 0.99);
        let wd = TAU * cutoff;
        let wa = (2.0 * sample_rate) * (wd / (2.0 * sample_rate)).tan();

        Self {
            ic1eq: 0.0,
            ic2eq: 0.0,
            g: wa / (2.0 * sample_rate),
            k: 2.0 - (2.0 * resonance.clamp(0.0, 0.99)),
        }
    }

    #[inline]
    pub fn process(&mut self, sample: f32) -> f32 {
        let (g, k) = (self.g, self.k);
        let h = 1.0 / (1.0 + g * (g + k));
        let v3 = sample - self.ic2eq;
        let v1 = h * (self.ic1eq + g * v3);
        let v2 = self.ic2eq + g * v1;

        self.ic1eq = 2.0 * v1 - self.ic1eq;
        self.ic2eq = 2.0 * v2 - self.ic2eq;

        sample - k * v1 - v2
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE_RATE: f32 = 48_000.0;

    fn sine(freq: f32, len: usize) -> Vec<f32> {
        (0..len)
            .map(|n| (TAU * freq * n as f32 / SAMPLE_RATE).sin())
            .collect()
    }

    fn peak_after_transient(filter: &mut SVFilter, input: &[f32]) -> f32 {
        input
            .iter()
            .map(|&x| filter.process(x))
            .skip(256)
            .fold(0.0f32, |acc, x| acc.max(x.abs()))
    }

    #[test]
    fn highpass_blocks_dc() {
        let mut filter = SVFilter::highpass(500.0, 0.0, SAMPLE_RATE);
        let mut last = 1.0;
        for _ in 0..2048 {
            last = filter.process(1.0);
        }
        assert!(last.abs() < 0.001, "dc should be rejected, got {last}");
    }

    #[test]
    fn hat_filter_attenuates_low_content() {
        let low = peak_after_transient(
            &mut SVFilter::highpass(10_000.0, 0.1, SAMPLE_RATE),
            &sine(200.0, 4096),
        );
        let high = peak_after_transient(
            &mut SVFilter::highpass(10_000.0, 0.1, SAMPLE_RATE),
            &sine(15_000.0, 4096),
        );

        assert!(
            high > low * 10.0,
            "high-pass should favour 15kHz over 200Hz: high={high}, low={low}"
        );
    }

    #[test]
    fn snare_filter_passes_its_band() {
        let mut filter = SVFilter::highpass(200.0, 0.5, SAMPLE_RATE);
        let peak = peak_after_transient(&mut filter, &sine(2_000.0, 4096));
        assert!((0.8..1.3).contains(&peak), "2kHz should pass near unity, got {peak}");
    }

    #[test]
    fn cutoff_above_nyquist_stays_stable() {
        let mut filter = SVFilter::highpass(40_000.0, 0.5, SAMPLE_RATE);
        let out: Vec<f32> = sine(1_000.0, 1024).iter().map(|&x| filter.process(x)).collect();
        assert!(out.iter().all(|x| x.is_finite()));
    }
}
