use criterion::{black_box, criterion_group, criterion_main, Criterion};
use ndarray::Array1;
use ndarray_rand::rand_distr::Uniform;
use ndarray_rand::RandomExt;

use cellgrid::dg::{DGCell, Shape};
use cellgrid::prelude::*;
use cellgrid::query::SampleQuery;

fn create_grid(max_cells: usize) -> CellGrid {
    let range = Uniform::new(max_cells / 2, max_cells);
    let counts: Array1<usize> = Array1::random(Shape::ALL.len(), range);

    let mut grid = CellGrid::new();
    for (shape, count) in Shape::ALL.iter().zip(counts.iter()) {
        grid.add_cell_metadata(Box::new(DGCell::new(*shape, *count)));
    }
    grid
}

fn sample(grid: &CellGrid, registry: &Registry) -> usize {
    let mut query = SampleQuery::new();
    grid.query(&mut query, &registry.responders).unwrap();
    query.total_rows()
}

fn sample_fill_bench(c: &mut Criterion) {
    let registry = Registry::with_builtins();

    let small = create_grid(1_000);
    c.bench_function("sample fill 1k cells per shape", |b| {
        b.iter(|| sample(black_box(&small), &registry))
    });

    let large = create_grid(100_000);
    c.bench_function("sample fill 100k cells per shape", |b| {
        b.iter(|| sample(black_box(&large), &registry))
    });
}

criterion_group!(benches, sample_fill_bench);
criterion_main!(benches);
