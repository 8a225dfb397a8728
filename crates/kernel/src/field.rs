use ripple_common::GridDims;

/// Default per-step decay applied by [`WaveField::simulate`].
pub const DEFAULT_DAMPING: f32 = 0.985;

/// Double-buffered scalar displacement field.
///
/// `current` holds the latest heights, `previous` the step before. Both are
/// row-major `width * height` arrays and are always reallocated together.
#[derive(Debug, Clone)]
pub struct WaveField {
    dims: GridDims,
    current: Vec<f32>,
    previous: Vec<f32>,
    damping: f32,
}

impl WaveField {
    /// Create a field at rest.
    ///
    /// `damping` is clamped into `[0, 1)`; a value of 1 or more would let
    /// energy accumulate without bound under continuous injection.
    pub fn new(dims: GridDims, damping: f32) -> Self {
        let damping = if damping.is_finite() {
            damping.clamp(0.0, 0.999_999)
        } else {
            DEFAULT_DAMPING
        };
        Self {
            dims,
            current: vec![0.0; dims.len()],
            previous: vec![0.0; dims.len()],
            damping,
        }
    }

    pub fn dims(&self) -> GridDims {
        self.dims
    }

    pub fn damping(&self) -> f32 {
        self.damping
    }

    /// Latest field heights, row-major.
    pub fn current(&self) -> &[f32] {
        &self.current
    }

    /// Heights from the step before [`Self::current`].
    pub fn previous(&self) -> &[f32] {
        &self.previous
    }

    /// Height at `(x, y)`, or `None` outside the grid.
    pub fn value(&self, x: usize, y: usize) -> Option<f32> {
        if x < self.dims.width && y < self.dims.height {
            Some(self.current[self.dims.index(x, y)])
        } else {
            None
        }
    }

    /// Replace both buffers with fresh zeroed ones sized for `dims`.
    ///
    /// The old arrays are dropped; nothing computed against the old stride
    /// survives.
    pub fn resize(&mut self, dims: GridDims) {
        tracing::debug!(
            old_width = self.dims.width,
            old_height = self.dims.height,
            width = dims.width,
            height = dims.height,
            "reallocating wave field"
        );
        self.dims = dims;
        self.current = vec![0.0; dims.len()];
        self.previous = vec![0.0; dims.len()];
    }

    /// Bring the whole field back to rest without reallocating.
    pub fn clear(&mut self) {
        self.current.fill(0.0);
        self.previous.fill(0.0);
    }

    /// Add a radial bump centred on `(cx, cy)`.
    ///
    /// Every cell at Euclidean distance `d <= radius` gains
    /// `strength * (1 - d / radius)`. Cells outside the grid are skipped.
    /// A non-positive or non-finite radius adds nothing.
    pub fn inject_disturbance(&mut self, cx: i32, cy: i32, strength: f32, radius: f32) {
        if !(radius.is_finite() && radius > 0.0) || !strength.is_finite() {
            return;
        }
        if self.dims.is_empty() {
            return;
        }
        // Clip the bounding box to the grid before iterating.
        let reach = radius.ceil() as i64;
        let (cx, cy) = (cx as i64, cy as i64);
        let x0 = cx.saturating_sub(reach).max(0);
        let x1 = cx.saturating_add(reach).min(self.dims.width as i64 - 1);
        let y0 = cy.saturating_sub(reach).max(0);
        let y1 = cy.saturating_add(reach).min(self.dims.height as i64 - 1);

        for y in y0..=y1 {
            for x in x0..=x1 {
                let dx = (x - cx) as f32;
                let dy = (y - cy) as f32;
                let dist = (dx * dx + dy * dy).sqrt();
                if dist > radius {
                    continue;
                }
                let i = self.dims.index(x as usize, y as usize);
                self.current[i] += strength * (1.0 - dist / radius);
            }
        }
    }

    /// Advance the field one step.
    ///
    /// Interior cells take
    /// `((left + right + up + down) / 2 - previous) * damping`; the result is
    /// written over `previous` and the buffers are swapped. Border cells of
    /// the new buffer are held at rest.
    pub fn simulate(&mut self) {
        let GridDims { width, height } = self.dims;
        if width >= 3 && height >= 3 {
            let cur = &self.current;
            let next = &mut self.previous;
            for y in 1..height - 1 {
                let row = y * width;
                for x in 1..width - 1 {
                    let i = row + x;
                    let sum = cur[i - 1] + cur[i + 1] + cur[i - width] + cur[i + width];
                    next[i] = (sum * 0.5 - next[i]) * self.damping;
                }
            }
            self.rest_border();
        }
        std::mem::swap(&mut self.current, &mut self.previous);
    }

    /// Zero the one-cell border of the buffer about to become `current`.
    fn rest_border(&mut self) {
        let GridDims { width, height } = self.dims;
        let next = &mut self.previous;
        next[..width].fill(0.0);
        next[(height - 1) * width..].fill(0.0);
        for y in 1..height - 1 {
            next[y * width] = 0.0;
            next[y * width + width - 1] = 0.0;
        }
    }

    /// Sum of squared heights of the current buffer.
    pub fn energy(&self) -> f32 {
        self.current.iter().map(|v| v * v).sum()
    }

    /// Largest absolute height in the current buffer.
    pub fn max_amplitude(&self) -> f32 {
        self.current.iter().fold(0.0_f32, |m, v| m.max(v.abs()))
    }
}
