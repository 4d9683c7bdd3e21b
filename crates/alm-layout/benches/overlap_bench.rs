//! Benchmarks for connection indexing, overlap synthesis and the edit pipeline.
//!
//! Run with: cargo bench -p alm-layout --bench overlap_bench

use alm_core::geometry::{Axis, Size};
use alm_layout::{
    AreaId, AreaRef, AreaSide, EditAction, Editor, EditorConfig, ItemId, Layout, OverlapManager,
    TabConnections,
};
use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use std::hint::black_box;

/// `n` x `n` grid with shared tabs.
fn grid(n: usize) -> (Layout, Vec<AreaId>) {
    let side = 10.0 * n as f64;
    let mut layout = Layout::new(Size::new(side, side));
    let b = layout.borders();
    let mut xs = vec![b.left];
    let mut ys = vec![b.top];
    for i in 1..n {
        xs.push(layout.add_tab_at(Axis::X, 10.0 * i as f64).expect("x tab"));
        ys.push(layout.add_tab_at(Axis::Y, 10.0 * i as f64).expect("y tab"));
    }
    xs.push(b.right);
    ys.push(b.bottom);

    let mut areas = Vec::with_capacity(n * n);
    for row in 0..n {
        for col in 0..n {
            let at = AreaRef::new(xs[col], ys[row], xs[col + 1], ys[row + 1]);
            let item = ItemId((row * n + col) as u64 + 1);
            areas.push(layout.add_area(item, at).expect("area"));
        }
    }
    (layout, areas)
}

fn bench_fill(c: &mut Criterion) {
    let mut group = c.benchmark_group("connections/fill");
    for n in [4, 8, 16] {
        let (layout, _) = grid(n);
        group.throughput(Throughput::Elements((n * n) as u64));
        group.bench_with_input(BenchmarkId::from_parameter(n * n), &layout, |b, layout| {
            b.iter(|| black_box(TabConnections::from_layout(black_box(layout))));
        });
    }
    group.finish();
}

fn bench_connect(c: &mut Criterion) {
    let mut group = c.benchmark_group("overlap/connect");
    for n in [4, 8, 16] {
        let (layout, _) = grid(n);
        group.throughput(Throughput::Elements((n * n) as u64));
        group.bench_with_input(BenchmarkId::from_parameter(n * n), &layout, |b, layout| {
            b.iter(|| {
                let mut layout = layout.clone();
                let mut overlap = OverlapManager::new();
                black_box(overlap.connect_areas(&mut layout, true).expect("connect"))
            });
        });
    }
    group.finish();
}

fn bench_test_action(c: &mut Criterion) {
    let mut group = c.benchmark_group("editor/test_action");
    for n in [4, 8] {
        let (layout, areas) = grid(n);
        let mut editor = Editor::new(layout, EditorConfig::default()).expect("editor");
        let action = EditAction::InsertTab {
            area: areas[0],
            side: AreaSide::Right,
        };
        group.bench_function(BenchmarkId::from_parameter(n * n), |b| {
            b.iter(|| black_box(editor.test_action(black_box(&action))));
        });
    }
    group.finish();
}

criterion_group!(benches, bench_fill, bench_connect, bench_test_action);
criterion_main!(benches);
