use std::fmt::Write as _;

use ripple_kernel::WaveField;

/// Field-to-output interface shared by all renderers.
///
/// A renderer reads the field and a time in seconds, and produces output it
/// owns. It never mutates the field.
pub trait FieldRenderer {
    /// The output type produced by this renderer.
    type Output: ?Sized;

    /// Render one frame of `field` at `time` seconds.
    fn render(&mut self, field: &WaveField, time: f32) -> &Self::Output;
}

/// Debug text renderer.
///
/// Produces a character ramp of the field's current heights. Useful for CLI
/// previews, logging, and testing the render interface without a GPU.
#[derive(Debug)]
pub struct AsciiRenderer {
    /// Sample every `step`-th cell in both directions.
    step: usize,
    /// Height mapped to the densest glyph.
    full_scale: f32,
    out: String,
}

const RAMP: &[u8] = b" .:-=+*#%@";

impl Default for AsciiRenderer {
    fn default() -> Self {
        Self::new(1, 1.0)
    }
}

impl AsciiRenderer {
    pub fn new(step: usize, full_scale: f32) -> Self {
        Self {
            step: step.max(1),
            full_scale: if full_scale > 0.0 { full_scale } else { 1.0 },
            out: String::new(),
        }
    }

    fn glyph(&self, value: f32) -> char {
        let t = (value.abs() / self.full_scale).min(1.0);
        let idx = if t.is_finite() {
            (t * (RAMP.len() - 1) as f32).round() as usize
        } else {
            0
        };
        RAMP[idx] as char
    }
}

impl FieldRenderer for AsciiRenderer {
    type Output = str;

    fn render(&mut self, field: &WaveField, time: f32) -> &str {
        let dims = field.dims();
        self.out.clear();
        let _ = writeln!(
            self.out,
            "=== Wave Field ({}x{}, t={:.2}s) ===",
            dims.width, dims.height, time
        );
        let _ = writeln!(
            self.out,
            "energy={:.4} peak={:.4}",
            field.energy(),
            field.max_amplitude()
        );
        for y in (0..dims.height).step_by(self.step) {
            for x in (0..dims.width).step_by(self.step) {
                let value = field.value(x, y).unwrap_or(0.0);
                let glyph = self.glyph(value);
                self.out.push(glyph);
            }
            self.out.push('\n');
        }
        &self.out
    }
}
