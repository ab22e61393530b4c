//! Import Benchmarks
//!
//! Row parsing and full in-memory imports

use std::fmt::Write;
use std::hint::black_box;

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use csvmesh_core::{import_reader, CsvFormat, ImportConfig, Profile, RowParser};

/// Build a Stubbs-shaped capture with `rows` data rows
fn stubbs_capture(rows: usize) -> String {
    let mut csv = String::from(
        "VTX,IDX,POSITION.x,POSITION.y,POSITION.z,a,b,c,d,e,f,g,h,i,TEXCOORD.x,TEXCOORD.y\n",
    );
    for i in 0..rows {
        let f = i as f32;
        let _ = writeln!(
            csv,
            "{i},{i},{},{},{},0,0,0,0,0,0,0,0,0,{},{}",
            f * 0.5,
            f * 0.25,
            -f,
            f / rows as f32,
            1.0 - f / rows as f32,
        );
    }
    csv
}

fn bench_parse_row(c: &mut Criterion) {
    let mut group = c.benchmark_group("parse_row");

    let profile = Profile::for_format(CsvFormat::Stubbs, None).unwrap();
    let fields = [
        "0", "0", "12.5", "-3.25", "100.0", "0", "0", "0", "0", "0", "0", "0", "0", "0", "0.5",
        "0.75",
    ];

    for extract_uv in [false, true] {
        let parser = RowParser::new(profile, 0.01, extract_uv);
        group.bench_function(if extract_uv { "with_uv" } else { "position_only" }, |b| {
            b.iter(|| black_box(parser.parse_row(2, black_box(&fields))));
        });
    }

    group.finish();
}

fn bench_import_reader(c: &mut Criterion) {
    let mut group = c.benchmark_group("import_reader");

    for rows in [1000, 10_000, 100_000].iter() {
        let capture = stubbs_capture(*rows);
        let config = ImportConfig::default();
        group.bench_with_input(BenchmarkId::from_parameter(rows), &capture, |b, capture| {
            b.iter(|| black_box(import_reader(capture.as_bytes(), &config)));
        });
    }

    group.finish();
}

criterion_group!(benches, bench_parse_row, bench_import_reader);

criterion_main!(benches);
