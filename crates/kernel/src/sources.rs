//! Stimuli that feed the wave field through [`WaveField::inject_disturbance`].

use std::time::Duration;

use ripple_common::{CellCoord, GridDims};

use crate::field::WaveField;

/// A single disturbance ready to be injected.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Disturbance {
    pub at: CellCoord,
    pub strength: f32,
    pub radius: f32,
}

impl Disturbance {
    pub fn apply(&self, field: &mut WaveField) {
        field.inject_disturbance(self.at.x, self.at.y, self.strength, self.radius);
    }
}

/// Seeded splitmix64 generator. Same seed, same drop sequence.
#[derive(Debug, Clone)]
pub struct DropRng {
    state: u64,
}

impl DropRng {
    pub fn new(seed: u64) -> Self {
        Self { state: seed }
    }

    pub fn next_u64(&mut self) -> u64 {
        self.state = self.state.wrapping_add(0x9e37_79b9_7f4a_7c15);
        let mut z = self.state;
        z = (z ^ (z >> 30)).wrapping_mul(0xbf58_476d_1ce4_e5b9);
        z = (z ^ (z >> 27)).wrapping_mul(0x94d0_49bb_1331_11eb);
        z ^ (z >> 31)
    }

    /// Uniform in `[0, 1)`, from the top 24 bits.
    pub fn next_f32(&mut self) -> f32 {
        (self.next_u64() >> 40) as f32 / (1u32 << 24) as f32
    }

    /// Uniform integer in `[lo, hi)`. Returns `lo` for an empty range.
    pub fn range(&mut self, lo: usize, hi: usize) -> usize {
        if hi <= lo {
            return lo;
        }
        lo + (self.next_u64() % (hi - lo) as u64) as usize
    }
}

/// Tuning for the idle-time drops.
#[derive(Debug, Clone, PartialEq)]
pub struct AmbientSettings {
    pub interval: Duration,
    /// Cells kept clear of the grid edge.
    pub margin: usize,
    pub strength_min: f32,
    pub strength_max: f32,
    pub radius: f32,
}

impl Default for AmbientSettings {
    fn default() -> Self {
        Self {
            interval: Duration::from_millis(500),
            margin: 2,
            strength_min: 0.15,
            strength_max: 0.45,
            radius: 3.0,
        }
    }
}

/// Timer emitting a random drop every `interval`.
///
/// Driven by the frame clock: after a long pause only one drop is due, the
/// missed ones are not replayed.
#[derive(Debug, Clone)]
pub struct AmbientDrops {
    settings: AmbientSettings,
    rng: DropRng,
    last: Option<Duration>,
}

impl AmbientDrops {
    pub fn new(settings: AmbientSettings, seed: u64) -> Self {
        Self {
            settings,
            rng: DropRng::new(seed),
            last: None,
        }
    }

    pub fn settings(&self) -> &AmbientSettings {
        &self.settings
    }

    /// Return a drop if the interval has elapsed since the previous one.
    ///
    /// The first poll only arms the timer. Grids too small to keep the margin
    /// produce nothing but still consume the tick.
    pub fn poll(&mut self, now: Duration, dims: GridDims) -> Option<Disturbance> {
        let Some(last) = self.last else {
            self.last = Some(now);
            return None;
        };
        if now.saturating_sub(last) < self.settings.interval {
            return None;
        }
        self.last = Some(now);

        let m = self.settings.margin;
        let span = m.saturating_mul(2);
        if dims.width <= span || dims.height <= span {
            return None;
        }
        let x = self.rng.range(m, dims.width - m);
        let y = self.rng.range(m, dims.height - m);
        let (lo, hi) = (self.settings.strength_min, self.settings.strength_max);
        let strength = lo + (hi - lo) * self.rng.next_f32();
        Some(Disturbance {
            at: CellCoord::new(x as i32, y as i32),
            strength,
            radius: self.settings.radius,
        })
    }
}

/// Fixed-strength ripple following the pointer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerRipple {
    pub strength: f32,
    pub radius: f32,
}

impl Default for PointerRipple {
    fn default() -> Self {
        Self {
            strength: 0.6,
            radius: 2.0,
        }
    }
}

impl PointerRipple {
    /// Disturbance at `cell`, only when the cell is inside the grid border.
    pub fn drop_at(&self, cell: CellCoord, dims: GridDims) -> Option<Disturbance> {
        dims.is_interior(cell).then_some(Disturbance {
            at: cell,
            strength: self.strength,
            radius: self.radius,
        })
    }
}

/// Horizontal wake bands excited by scrolling.
#[derive(Debug, Clone, PartialEq)]
pub struct ScrollWake {
    /// Band rows as fractions of grid height.
    pub bands: Vec<f32>,
    /// Amplitude per pixel of scroll movement between frames.
    pub gain: f32,
    pub max_amplitude: f32,
    /// Spatial frequency along the band, radians per cell.
    pub wavenumber: f32,
    /// Phase shift per pixel of scroll offset.
    pub phase_rate: f32,
}

impl Default for ScrollWake {
    fn default() -> Self {
        Self {
            bands: vec![0.45, 0.70],
            gain: 0.004,
            max_amplitude: 0.35,
            wavenumber: 0.18,
            phase_rate: 0.02,
        }
    }
}

impl ScrollWake {
    /// Perturb every band for a scroll that moved from `last_offset` to
    /// `offset`. Returns the amplitude used (zero when nothing moved).
    pub fn apply(&self, field: &mut WaveField, offset: f32, last_offset: f32) -> f32 {
        let velocity = (offset - last_offset).abs();
        let amplitude = (velocity * self.gain).min(self.max_amplitude);
        if !amplitude.is_finite() || amplitude <= 0.0 {
            return 0.0;
        }
        let dims = field.dims();
        if dims.width < 3 || dims.height < 3 {
            return 0.0;
        }
        let phase = offset * self.phase_rate;
        for &band in &self.bands {
            let row = (band.clamp(0.0, 1.0) * dims.height as f32) as usize;
            let row = row.clamp(1, dims.height - 2);
            for x in 1..dims.width - 1 {
                let h = amplitude * (x as f32 * self.wavenumber + phase).sin();
                field.inject_disturbance(x as i32, row as i32, h, 1.0);
            }
        }
        amplitude
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::field::DEFAULT_DAMPING;

    fn ms(v: u64) -> Duration {
        Duration::from_millis(v)
    }

    #[test]
    fn rng_is_deterministic_per_seed() {
        let mut a = DropRng::new(7);
        let mut b = DropRng::new(7);
        let mut c = DropRng::new(8);
        let xs: Vec<u64> = (0..16).map(|_| a.next_u64()).collect();
        let ys: Vec<u64> = (0..16).map(|_| b.next_u64()).collect();
        assert_eq!(xs, ys);
        assert_ne!(xs[0], c.next_u64());
    }

    #[test]
    fn rng_ranges_stay_in_bounds() {
        let mut rng = DropRng::new(1);
        for _ in 0..1000 {
            let f = rng.next_f32();
            assert!((0.0..1.0).contains(&f));
            let r = rng.range(2, 9);
            assert!((2..9).contains(&r));
        }
        assert_eq!(rng.range(5, 5), 5);
    }

    #[test]
    fn ambient_drop_waits_for_interval() {
        let dims = GridDims::new(50, 30);
        let mut drops = AmbientDrops::new(AmbientSettings::default(), 3);
        assert!(drops.poll(ms(0), dims).is_none());
        assert!(drops.poll(ms(499), dims).is_none());
        assert!(drops.poll(ms(500), dims).is_some());
        assert!(drops.poll(ms(700), dims).is_none());
        assert!(drops.poll(ms(1000), dims).is_some());
    }

    #[test]
    fn ambient_drop_does_not_catch_up_after_pause() {
        let dims = GridDims::new(50, 30);
        let mut drops = AmbientDrops::new(AmbientSettings::default(), 3);
        drops.poll(ms(0), dims);
        assert!(drops.poll(ms(10_000), dims).is_some());
        assert!(drops.poll(ms(10_033), dims).is_none());
    }

    #[test]
    fn ambient_drops_respect_margin_and_strength() {
        let dims = GridDims::new(20, 12);
        let settings = AmbientSettings::default();
        let mut drops = AmbientDrops::new(settings.clone(), 11);
        drops.poll(ms(0), dims);
        for i in 1..=200 {
            let d = drops.poll(ms(i * 500), dims).unwrap();
            assert!(d.at.x >= 2 && d.at.x < 18, "{d:?}");
            assert!(d.at.y >= 2 && d.at.y < 10, "{d:?}");
            assert!(d.strength >= settings.strength_min);
            assert!(d.strength <= settings.strength_max);
        }
    }

    #[test]
    fn ambient_drops_skip_tiny_grids() {
        let mut drops = AmbientDrops::new(AmbientSettings::default(), 0);
        drops.poll(ms(0), GridDims::new(4, 4));
        assert!(drops.poll(ms(500), GridDims::new(4, 4)).is_none());
    }

    #[test]
    fn oversized_margin_produces_no_drops() {
        let settings = AmbientSettings {
            margin: usize::MAX / 2 + 1,
            ..AmbientSettings::default()
        };
        let dims = GridDims::new(160, 90);
        let mut drops = AmbientDrops::new(settings, 5);
        drops.poll(ms(0), dims);
        for i in 1..=4 {
            assert!(drops.poll(ms(i * 500), dims).is_none());
        }
    }

    #[test]
    fn pointer_ripple_only_in_interior() {
        let ripple = PointerRipple::default();
        let dims = GridDims::new(10, 10);
        assert!(ripple.drop_at(CellCoord::new(5, 5), dims).is_some());
        assert!(ripple.drop_at(CellCoord::new(0, 5), dims).is_none());
        assert!(ripple.drop_at(CellCoord::new(5, 9), dims).is_none());
        assert!(ripple.drop_at(CellCoord::new(-3, 40), dims).is_none());
    }

    #[test]
    fn scroll_wake_needs_movement() {
        let mut field = WaveField::new(GridDims::new(40, 20), DEFAULT_DAMPING);
        let wake = ScrollWake::default();
        assert_eq!(wake.apply(&mut field, 300.0, 300.0), 0.0);
        assert_eq!(field.energy(), 0.0);
    }

    #[test]
    fn scroll_wake_excites_only_band_rows() {
        let mut field = WaveField::new(GridDims::new(40, 20), DEFAULT_DAMPING);
        let wake = ScrollWake::default();
        let amplitude = wake.apply(&mut field, 120.0, 100.0);
        assert!(amplitude > 0.0);

        let dims = field.dims();
        for y in 0..dims.height {
            let row_energy: f32 = (0..dims.width)
                .map(|x| field.value(x, y).unwrap().powi(2))
                .sum();
            if y == 9 || y == 14 {
                assert!(row_energy > 0.0, "band row {y} is flat");
            } else {
                assert_eq!(row_energy, 0.0, "row {y} was touched");
            }
        }
        assert!(field.max_amplitude() <= amplitude + 1e-6);
    }

    #[test]
    fn scroll_wake_amplitude_is_capped() {
        let mut field = WaveField::new(GridDims::new(40, 20), DEFAULT_DAMPING);
        let wake = ScrollWake::default();
        let amplitude = wake.apply(&mut field, 50_000.0, 0.0);
        assert_eq!(amplitude, wake.max_amplitude);
    }
}
