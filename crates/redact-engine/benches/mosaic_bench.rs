// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Criterion benchmarks for the mosaic rasterizer and the full-resolution final
// render in the redact-engine crate.

use criterion::{Criterion, black_box, criterion_group, criterion_main};
use image::{Rgba, RgbaImage};

use redact_core::{PixelRect, Region, RenderProgress, Shape};
use redact_engine::{CancelToken, rasterize, render_final};

fn synthetic(width: u32, height: u32) -> RgbaImage {
    RgbaImage::from_fn(width, height, |x, y| {
        Rgba([(x % 251) as u8, (y % 241) as u8, ((x ^ y) % 256) as u8, 255])
    })
}

// ---------------------------------------------------------------------------
// Benchmarks
// ---------------------------------------------------------------------------

/// One 512x512 region at block size 10, for each block shape.
fn bench_rasterize(c: &mut Criterion) {
    let src = synthetic(1024, 1024);
    let rect = PixelRect::new(256, 256, 512, 512);

    for shape in [Shape::Square, Shape::Circle] {
        let mut dst = src.clone();
        c.bench_function(&format!("rasterize {shape} (512x512, block 10)"), |b| {
            b.iter(|| {
                rasterize(black_box(&src), &mut dst, rect, shape, black_box(10)).unwrap();
            });
        });
    }
}

/// Final render of a 12-megapixel image with eight mixed regions.
fn bench_render_final(c: &mut Criterion) {
    let original = synthetic(4000, 3000);
    let regions: Vec<Region> = (0..8u32)
        .filter_map(|i| {
            let shape = if i % 2 == 0 { Shape::Square } else { Shape::Circle };
            Region::new(PixelRect::new(i * 450, i * 300, 600, 400), shape, 8 + i * 3)
        })
        .collect();
    let cancel = CancelToken::new();

    c.bench_function("render_final (4000x3000, 8 regions)", |b| {
        b.iter(|| {
            let mut progress = |_: RenderProgress| {};
            let out = render_final(black_box(&original), &regions, &mut progress, &cancel).unwrap();
            black_box(out);
        });
    });
}

criterion_group!(benches, bench_rasterize, bench_render_final);
criterion_main!(benches);
