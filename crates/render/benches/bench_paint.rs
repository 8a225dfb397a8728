use std::hint::black_box;
use std::time::Instant;

use ripple_common::{GridDims, Viewport};
use ripple_kernel::{DEFAULT_DAMPING, WaveField};
use ripple_render::{OverlayPainter, Palette};

fn excited_field(dims: GridDims) -> WaveField {
    let mut field = WaveField::new(dims, DEFAULT_DAMPING);
    field.inject_disturbance(dims.width as i32 / 3, dims.height as i32 / 2, 1.0, 6.0);
    for _ in 0..30 {
        field.simulate();
    }
    field
}

fn bench_paint(viewport: Viewport, cell_size: u32, caustics: bool, iterations: usize) {
    let dims = GridDims::from_viewport(viewport, cell_size);
    let field = excited_field(dims);
    let mut painter = OverlayPainter::new(dims, Palette::default(), caustics);

    let start = Instant::now();
    for i in 0..iterations {
        let time = i as f32 * 0.033;
        black_box(painter.paint(black_box(&field), time));
    }
    let elapsed = start.elapsed();
    let per_iter = elapsed / iterations as u32;
    println!(
        "  paint ({}x{} cells, caustics={caustics}, {iterations} iters): {per_iter:?}/iter, total {elapsed:?}",
        dims.width, dims.height
    );
}

fn bench_frame(viewport: Viewport, cell_size: u32, iterations: usize) {
    let dims = GridDims::from_viewport(viewport, cell_size);
    let mut field = excited_field(dims);
    let mut painter = OverlayPainter::new(dims, Palette::default(), true);

    let start = Instant::now();
    for i in 0..iterations {
        field.simulate();
        black_box(painter.paint(&field, i as f32 * 0.033));
    }
    let elapsed = start.elapsed();
    let per_iter = elapsed / iterations as u32;
    println!("  simulate + paint ({iterations} iters): {per_iter:?}/iter, total {elapsed:?}");
}

fn main() {
    println!("=== Overlay Paint Benchmarks ===\n");

    let desktop = Viewport::new(1920, 1080);
    let phone = Viewport::new(390, 844);

    println!("Paint pass:");
    bench_paint(desktop, 8, true, 500);
    bench_paint(desktop, 8, false, 500);
    bench_paint(phone, 12, false, 5000);

    println!("\nFull frame:");
    bench_frame(desktop, 8, 500);

    println!("\n=== Done ===");
}
