use std::hint::black_box;
use std::time::Instant;

use ripple_common::{GridDims, Viewport};
use ripple_kernel::{DEFAULT_DAMPING, ScrollWake, WaveField};

fn make_field(viewport: Viewport, cell_size: u32) -> WaveField {
    let dims = GridDims::from_viewport(viewport, cell_size);
    let mut field = WaveField::new(dims, DEFAULT_DAMPING);
    field.inject_disturbance(dims.width as i32 / 2, dims.height as i32 / 2, 1.0, 4.0);
    field
}

fn bench_simulate(viewport: Viewport, cell_size: u32, iterations: usize) {
    let mut field = make_field(viewport, cell_size);
    let dims = field.dims();

    let start = Instant::now();
    for _ in 0..iterations {
        black_box(&mut field).simulate();
    }
    let elapsed = start.elapsed();
    let per_iter = elapsed / iterations as u32;
    println!(
        "  simulate ({}x{} cells, {iterations} iters): {per_iter:?}/iter, total {elapsed:?}",
        dims.width, dims.height
    );
}

fn bench_inject(viewport: Viewport, cell_size: u32, radius: f32, iterations: usize) {
    let mut field = make_field(viewport, cell_size);
    let dims = field.dims();

    let start = Instant::now();
    for i in 0..iterations {
        let x = (i % dims.width) as i32;
        let y = (i % dims.height) as i32;
        field.inject_disturbance(black_box(x), black_box(y), 0.1, black_box(radius));
    }
    let elapsed = start.elapsed();
    let per_iter = elapsed / iterations as u32;
    println!(
        "  inject (r={radius}, {iterations} iters): {per_iter:?}/iter, total {elapsed:?}"
    );
}

fn bench_scroll_wake(viewport: Viewport, cell_size: u32, iterations: usize) {
    let mut field = make_field(viewport, cell_size);
    let wake = ScrollWake::default();

    let start = Instant::now();
    for i in 0..iterations {
        let offset = i as f32 * 12.0;
        let _ = black_box(wake.apply(&mut field, offset, offset - 12.0));
    }
    let elapsed = start.elapsed();
    let per_iter = elapsed / iterations as u32;
    println!("  scroll wake ({iterations} iters): {per_iter:?}/iter, total {elapsed:?}");
}

fn main() {
    println!("=== Wave Field Benchmarks ===\n");

    let desktop = Viewport::new(1920, 1080);
    let phone = Viewport::new(390, 844);

    println!("Propagation step:");
    bench_simulate(desktop, 8, 1000);
    bench_simulate(desktop, 4, 200);
    bench_simulate(phone, 12, 5000);

    println!("\nDisturbance injection:");
    bench_inject(desktop, 8, 2.0, 100_000);
    bench_inject(desktop, 8, 6.0, 100_000);

    println!("\nScroll wake bands:");
    bench_scroll_wake(desktop, 8, 10_000);

    println!("\n=== Done ===");
}
