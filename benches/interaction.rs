//! Benchmarks for the interaction hot paths.
//!
//! Run with: cargo bench
//!
//! Results are saved to `target/criterion/` with HTML reports.
#![allow(clippy::expect_used, clippy::cast_precision_loss)]

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use xlinteract::interaction::{HitContext, HitTester};
use xlinteract::layout::ViewportWindow;
use xlinteract::protection::selection_block_reason;
use xlinteract::{
    CellIndex, EngineConfig, HeaderConfig, InteractionEngine, InteractiveObject, MemorySheet,
    ObjectBounds, PointerEvent, ProtectionPolicy, RecordingNotifier, RecordingSink, Rectangle,
};

fn sheet_with_objects(max_row: u32, max_col: u32) -> MemorySheet {
    let mut sheet = MemorySheet::new(max_row, max_col);
    sheet.layout_mut().set_frozen(2, 1);
    for i in 0..50u32 {
        let x = (i % 10) as f32 * 120.0;
        let y = (i / 10) as f32 * 90.0;
        sheet.add_object(InteractiveObject::new(
            i,
            ObjectBounds::new(x + 10.0, y + 10.0, 80.0, 60.0),
        ));
    }
    sheet
}

/// Resolve the region under a grid of points across the canvas
fn bench_hit_test(c: &mut Criterion) {
    use xlinteract::Drawings;
    use xlinteract::Grid;

    let sheet = sheet_with_objects(1_048_575, 16_383);
    let config = EngineConfig::default();
    let headers = HeaderConfig::default();
    let viewport = ViewportWindow::for_layout(sheet.layout(), 1600.0, 900.0);
    let tester = HitTester::new(&config);
    let ctx = HitContext {
        layout: sheet.layout(),
        viewport: &viewport,
        headers: &headers,
        selection: Some(Rectangle::from_corners(
            CellIndex::new(3, 2),
            CellIndex::new(8, 5),
        )),
        objects: sheet.objects(),
        active_object: Some(7),
    };
    let points: Vec<(f32, f32)> = (0..40)
        .flat_map(|i| (0..20).map(move |j| (i as f32 * 40.0, j as f32 * 45.0)))
        .collect();

    let mut group = c.benchmark_group("hit_test");
    group.throughput(Throughput::Elements(points.len() as u64));
    group.bench_function("resolve_grid", |b| {
        b.iter(|| {
            for (x, y) in &points {
                black_box(tester.resolve(&ctx, black_box(*x), black_box(*y)));
            }
        })
    });
    group.finish();
}

/// Protection gating over rectangles of increasing size
fn bench_gating(c: &mut Criterion) {
    let policy = ProtectionPolicy::protected(false, true);
    let mut group = c.benchmark_group("selection_gating");

    for side in [10u32, 100, 500] {
        let rect = Rectangle::from_corners(CellIndex::new(0, 0), CellIndex::new(side - 1, side - 1));
        group.throughput(Throughput::Elements(u64::from(side) * u64::from(side)));
        group.bench_with_input(BenchmarkId::new("all_unlocked", side), &rect, |b, rect| {
            b.iter(|| selection_block_reason(&policy, black_box(rect), |_| false))
        });
    }

    group.finish();
}

/// A full drag-select with autoscroll ticks through the engine facade
fn bench_drag_select(c: &mut Criterion) {
    c.bench_function("drag_select_100_moves", |b| {
        b.iter(|| {
            let mut engine = InteractionEngine::new(
                sheet_with_objects(9_999, 255),
                RecordingSink::new(),
                RecordingNotifier::new(),
                EngineConfig::default(),
            )
            .expect("default config is valid");
            engine.resize(1600.0, 900.0);
            engine.pointer_down(PointerEvent::new(100.0, 100.0, 0.0));
            for i in 0..100u32 {
                let t = f64::from(i) * 16.0;
                engine.pointer_move(PointerEvent::new(100.0 + i as f32 * 10.0, 890.0, t));
                engine.tick(t);
            }
            engine.pointer_up(PointerEvent::new(1100.0, 890.0, 1700.0));
            black_box(engine.selection().areas.len())
        })
    });
}

criterion_group!(benches, bench_hit_test, bench_gating, bench_drag_select);

criterion_main!(benches);
