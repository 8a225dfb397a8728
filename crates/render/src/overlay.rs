use bytemuck::{Pod, Zeroable};
use ripple_common::GridDims;
use ripple_kernel::WaveField;
use serde::{Deserialize, Serialize};

use crate::renderer::FieldRenderer;

/// One straight-alpha RGBA8 pixel.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Pod, Zeroable)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba {
    pub const TRANSPARENT: Self = Self {
        r: 0,
        g: 0,
        b: 0,
        a: 0,
    };
}

/// Pixel buffer with one pixel per grid cell, row-major.
#[derive(Debug, Clone, Default)]
pub struct PixelFrame {
    dims: GridDims,
    pixels: Vec<Rgba>,
}

impl PixelFrame {
    pub fn new(dims: GridDims) -> Self {
        Self {
            dims,
            pixels: vec![Rgba::TRANSPARENT; dims.len()],
        }
    }

    pub fn dims(&self) -> GridDims {
        self.dims
    }

    pub fn pixels(&self) -> &[Rgba] {
        &self.pixels
    }

    pub fn pixel(&self, x: usize, y: usize) -> Option<Rgba> {
        (x < self.dims.width && y < self.dims.height).then(|| self.pixels[self.dims.index(x, y)])
    }

    /// Raw RGBA8 bytes, ready for a texture upload.
    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.pixels)
    }

    /// Bytes per row of [`Self::as_bytes`].
    pub fn stride(&self) -> usize {
        self.dims.width * std::mem::size_of::<Rgba>()
    }
}

/// Colour and gain curves for the overlay.
///
/// Only two properties matter: pixel intensity and alpha never decrease as
/// `|wave|` grows, and alpha never exceeds `max_alpha`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Palette {
    /// Tone at zero displacement.
    pub base: [u8; 3],
    /// Tone approached by crests (positive displacement).
    pub crest: [u8; 3],
    /// Tone approached by troughs (negative displacement).
    pub trough: [u8; 3],
    pub positive_gain: f32,
    pub negative_gain: f32,
    pub max_alpha: u8,
    /// Scale applied to raw field heights before the gain curves.
    pub field_gain: f32,
    /// Amplitude of the decorative caustic term.
    pub caustic_strength: f32,
}

impl Default for Palette {
    fn default() -> Self {
        Self {
            base: [24, 96, 118],
            crest: [150, 232, 236],
            trough: [40, 128, 180],
            positive_gain: 2.4,
            negative_gain: 1.6,
            max_alpha: 40,
            field_gain: 1.0,
            caustic_strength: 0.06,
        }
    }
}

impl Palette {
    /// Map a wave value to a pixel.
    pub fn shade(&self, wave: f32) -> Rgba {
        if !wave.is_finite() || wave == 0.0 {
            return Rgba::TRANSPARENT;
        }
        let (tone, gain) = if wave > 0.0 {
            (self.crest, self.positive_gain)
        } else {
            (self.trough, self.negative_gain)
        };
        let t = (wave.abs() * gain.max(0.0)).min(1.0);
        let mix = |from: u8, to: u8| -> u8 {
            let v = from as f32 + (to as f32 - from as f32) * t;
            v.round().clamp(0.0, 255.0) as u8
        };
        Rgba {
            r: mix(self.base[0], tone[0]),
            g: mix(self.base[1], tone[1]),
            b: mix(self.base[2], tone[2]),
            a: (t * self.max_alpha as f32).round() as u8,
        }
    }
}

/// Decorative interference pattern layered over the simulated field.
fn caustic(x: f32, y: f32, t: f32) -> f32 {
    (x * 0.09 + t * 0.7).sin() * (y * 0.12 - t * 0.5).sin()
        + 0.5 * ((x + y) * 0.05 + t * 0.3).cos()
}

/// Paints the field into an owned [`PixelFrame`] every active frame.
#[derive(Debug, Clone)]
pub struct OverlayPainter {
    palette: Palette,
    caustics: bool,
    frame: PixelFrame,
}

impl OverlayPainter {
    /// `caustics` is off on touch-capable devices to spare per-pixel trig.
    pub fn new(dims: GridDims, palette: Palette, caustics: bool) -> Self {
        Self {
            palette,
            caustics,
            frame: PixelFrame::new(dims),
        }
    }

    pub fn palette(&self) -> &Palette {
        &self.palette
    }

    pub fn caustics(&self) -> bool {
        self.caustics
    }

    pub fn frame(&self) -> &PixelFrame {
        &self.frame
    }

    /// Reallocate the pixel buffer for new grid dimensions.
    pub fn resize(&mut self, dims: GridDims) {
        self.frame = PixelFrame::new(dims);
    }

    /// Wave value painted at cell `(x, y)` for height `value` at `time`.
    pub fn wave_at(&self, x: usize, y: usize, value: f32, time: f32) -> f32 {
        let mut wave = value * self.palette.field_gain;
        if self.caustics {
            wave += caustic(x as f32, y as f32, time) * self.palette.caustic_strength;
        }
        wave
    }

    /// Paint `field` at `time` seconds.
    pub fn paint(&mut self, field: &WaveField, time: f32) -> &PixelFrame {
        let dims = field.dims();
        if self.frame.dims != dims {
            tracing::debug!(
                width = dims.width,
                height = dims.height,
                "pixel frame out of step with field, reallocating"
            );
            self.resize(dims);
        }
        let heights = field.current();
        for y in 0..dims.height {
            let row = y * dims.width;
            for x in 0..dims.width {
                let wave = self.wave_at(x, y, heights[row + x], time);
                self.frame.pixels[row + x] = self.palette.shade(wave);
            }
        }
        &self.frame
    }
}

impl FieldRenderer for OverlayPainter {
    type Output = PixelFrame;

    fn render(&mut self, field: &WaveField, time: f32) -> &PixelFrame {
        self.paint(field, time)
    }
}
