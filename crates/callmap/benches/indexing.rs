//! Benchmarks for callmap indexing.
//!
//! These benchmarks measure:
//! - Single-unit walking (parse + index of one large unit)
//! - Directory indexing, parallel vs sequential
//! - Scaling behavior with different project sizes

// Benchmark code - performance of the benchmark setup is not critical
#![allow(missing_docs)]
#![allow(clippy::format_push_string)]
#![allow(clippy::cast_possible_truncation)]

mod common;

use std::time::Instant;

use callmap::{Indexer, IndexerConfig, Registry};
use criterion::{BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main};

use common::{as_file_refs, create_workspace};

/// Generate a Java unit with nested classes, overloads and call-heavy bodies.
fn generate_java_unit(package: &str, class_name: &str, num_methods: usize) -> String {
    let mut code = String::new();

    code.push_str(&format!("package {package};\n\nimport java.util.*;\n\n"));
    code.push_str(&format!("public class {class_name} {{\n"));
    code.push_str("    private final Map<String, Integer> cache = new HashMap<>();\n\n");

    for i in 0..num_methods {
        code.push_str(&format!(
            "    public int compute{i}(int input) {{\n\
                     int value = helper.transform(input, {i});\n\
                     if (cache.containsKey(\"k{i}\")) {{\n\
                         return cache.get(\"k{i}\") + value;\n\
                     }}\n\
                     cache.put(\"k{i}\", new Integer(value));\n\
                     return Math.max(value, compute{i}(input, 1));\n\
                 }}\n\n\
                 public int compute{i}(int input, int scale) {{\n\
                     return input * scale;\n\
                 }}\n\n"
        ));
    }

    code.push_str(&format!(
        "    static class {class_name}Helper {{\n\
                 int transform(int a, int b) {{ return Objects.hash(a, b); }}\n\
             }}\n"
    ));
    code.push_str("}\n");

    code
}

/// Generate a project spread over a few packages.
fn generate_project(num_units: usize) -> Vec<(String, String)> {
    (0..num_units)
        .map(|i| {
            let package = format!("com.bench.pkg{}", i % 4);
            let class_name = format!("Unit{i}");
            (
                format!("src/main/java/com/bench/pkg{}/{class_name}.java", i % 4),
                generate_java_unit(&package, &class_name, 10),
            )
        })
        .collect()
}

/// Benchmark parsing and walking a single large unit.
fn bench_single_unit(c: &mut Criterion) {
    let mut group = c.benchmark_group("single_unit");

    for num_methods in &[10, 100, 500] {
        let source = generate_java_unit("com.bench", "Big", *num_methods);
        group.throughput(Throughput::Bytes(source.len() as u64));

        group.bench_with_input(
            BenchmarkId::new("methods", num_methods),
            &source,
            |b, source| {
                let mut indexer = Indexer::new().expect("failed to create indexer");
                b.iter(|| {
                    let mut registry = Registry::new();
                    let summary = indexer
                        .index_source(source, "Big.java", &mut registry)
                        .expect("index failed");
                    black_box((summary, registry))
                });
            },
        );
    }

    group.finish();
}

/// Benchmark directory indexing in both execution modes.
fn bench_directory_index(c: &mut Criterion) {
    let mut group = c.benchmark_group("directory_index");

    for num_units in &[10, 50, 200] {
        let files = generate_project(*num_units);
        let file_refs = as_file_refs(&files);
        let (_dir, path) = create_workspace(&file_refs);

        group.throughput(Throughput::Elements(*num_units as u64));

        for (mode, parallel) in [("parallel", true), ("sequential", false)] {
            let config = IndexerConfig {
                parallel,
                ..IndexerConfig::default()
            };
            group.bench_with_input(BenchmarkId::new(mode, num_units), &path, |b, path| {
                let mut indexer =
                    Indexer::with_config(config.clone()).expect("failed to create indexer");
                b.iter(|| {
                    let mut registry = Registry::new();
                    let stats = indexer
                        .index_directory(path, &mut registry)
                        .expect("index failed");
                    black_box((stats, registry))
                });
            });
        }
    }

    group.finish();

    // Print a single run's totals (outside criterion measurement)
    println!("\n=== Directory Indexing Totals ===");

    let files = generate_project(200);
    let (dir, path) = create_workspace(&as_file_refs(&files));
    let mut indexer = Indexer::new().expect("failed to create indexer");
    let mut registry = Registry::new();

    let start = Instant::now();
    let stats = indexer
        .index_directory(&path, &mut registry)
        .expect("index failed");
    let total_duration = start.elapsed();

    println!("Units indexed: {}", stats.units_indexed);
    println!("Classes found: {}", stats.totals.classes_registered);
    println!("Calls found: {}", stats.totals.calls_found);
    println!("Total duration: {total_duration:?}");
    println!(
        "Avg per unit: {:?}",
        total_duration / stats.units_indexed.max(1) as u32
    );

    drop(dir);
}

criterion_group!(benches, bench_single_unit, bench_directory_index);
criterion_main!(benches);
