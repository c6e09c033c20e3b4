// In benches/selector_bench.rs

use std::sync::Arc;

use arrow::datatypes::{DataType, Field, Schema};
use criterion::{black_box, criterion_group, criterion_main, Criterion};

use merlin_columns::selector::schema::with_field_tags;
use merlin_columns::{ColumnSelector, DictArray, Tag};

// --- Fixtures ---

const BENCH_COLUMNS: usize = 512;

fn column_names(prefix: &str, count: usize) -> Vec<String> {
    (0..count).map(|i| format!("{}_{}", prefix, i)).collect()
}

/// A wide schema where every fourth column is tagged categorical.
fn wide_schema(count: usize) -> Schema {
    let fields: Vec<Field> = column_names("col", count)
        .into_iter()
        .enumerate()
        .map(|(i, name)| {
            let field = Field::new(name, DataType::Int64, true);
            if i % 4 == 0 {
                with_field_tags(field, [Tag::Categorical])
            } else {
                field
            }
        })
        .collect();
    Schema::new(fields)
}

// --- Benchmark Suite ---

fn bench_selector_algebra(c: &mut Criterion) {
    let left = ColumnSelector::new(column_names("col", BENCH_COLUMNS));
    let right = ColumnSelector::new(column_names("col", BENCH_COLUMNS / 2))
        .with_subgroups([vec!["col_1", "col_2"], vec!["col_3", "col_4"]])
        .unwrap();
    let schema = wide_schema(BENCH_COLUMNS);
    let tagged = ColumnSelector::new(["col_1", "col_5"]).with_tags([Tag::Categorical]);

    let mut group = c.benchmark_group("ColumnSelector");

    group.bench_function("Add + names (overlapping)", |b| {
        b.iter(|| black_box((left.clone() + right.clone()).names()))
    });
    group.bench_function("Resolve wildcard", |b| {
        b.iter(|| black_box(ColumnSelector::all().resolve(black_box(&schema))))
    });
    group.bench_function("Resolve by tag", |b| {
        b.iter(|| black_box(tagged.resolve(black_box(&schema))))
    });
    group.bench_function("Filter columns", |b| {
        b.iter(|| black_box(left.filter_columns(black_box(&right))))
    });

    group.finish();
}

fn bench_dict_array(c: &mut Criterion) {
    let arrays: Vec<(String, Vec<i64>)> = column_names("col", 64)
        .into_iter()
        .map(|name| (name, (0..1024).collect()))
        .collect();
    let dict = DictArray::from_arrays(arrays.clone()).unwrap();
    let half: Vec<String> = column_names("col", 32);

    let mut group = c.benchmark_group("DictArray");

    group.bench_function("Build with inference", |b| {
        b.iter(|| black_box(DictArray::from_arrays(arrays.clone())))
    });
    group.bench_function("Select half", |b| {
        b.iter(|| black_box(dict.select(black_box(&half))))
    });
    group.bench_function("To RecordBatch", |b| {
        b.iter(|| black_box(dict.to_record_batch()))
    });
    group.bench_function("Update (full recompute)", |b| {
        b.iter(|| {
            let mut copy = dict.copy();
            let extra = Arc::clone(&dict["col_0"]);
            black_box(copy.update([("extra", extra)]))
        })
    });

    group.finish();
}

criterion_group!(benches, bench_selector_algebra, bench_dict_array);
criterion_main!(benches);
