use std::time::Duration;

use criterion::measurement::WallTime;
use criterion::{black_box, criterion_group, criterion_main, BenchmarkGroup, BenchmarkId, Criterion};
use docpool::{Document, Filter, Query, TraversalPolicy, ValueType};
use serde_json::{json, Value};

fn synthetic_movies(count: usize) -> Value {
    let movies: Vec<Value> = (0..count)
        .map(|i| {
            json!({
                "title": format!("Movie {i}"),
                "actors": (0..4)
                    .map(|a| json!({"name": format!("Actor {i}-{a}"), "role": format!("Role {a}")}))
                    .collect::<Vec<_>>(),
                "keywords": ["thriller", "sequel", "remake"],
                "reviews": i * 7,
                "rating": (i % 100) as f64 / 10.0,
                "released": i % 2 == 0,
            })
        })
        .collect();
    json!({ "snapshot_date": "Oct 23th, 2017", "movies": movies })
}

fn build(count: usize) -> Document {
    let mut doc = Document::new().unwrap();
    let root = doc.root();
    let movies = doc.add_array(root, "movies", ValueType::Object).unwrap();
    for i in 0..count {
        let movie = doc.array_add_object(movies).unwrap();
        doc.add_string(movie, "title", "Movie").unwrap();
        let actors = doc.add_array(movie, "actors", ValueType::Object).unwrap();
        for _ in 0..4 {
            let actor = doc.array_add_object(actors).unwrap();
            doc.add_string(actor, "name", "Actor").unwrap();
        }
        doc.add_integer(movie, "reviews", i as i64).unwrap();
        doc.add_double(movie, "rating", 7.8).unwrap();
    }
    doc
}

fn criterion_config() -> Criterion {
    if std::env::var("DOCPOOL_BENCH_MINIMAL").is_ok() {
        Criterion::default()
            .warm_up_time(Duration::from_secs(0))
            .measurement_time(Duration::from_millis(10))
            .sample_size(10)
            .nresamples(1)
    } else {
        Criterion::default()
    }
}

fn bench_query(group: &mut BenchmarkGroup<'_, WallTime>, doc: &Document, count: usize) {
    let query = Query::new().with_filter(Filter::any().with_key_name("actors"));
    for policy in [TraversalPolicy::BreadthFirst, TraversalPolicy::DepthFirst] {
        group.bench_function(BenchmarkId::new(format!("{policy:?}"), count), |b| {
            b.iter(|| {
                let result = docpool::select(black_box(doc), &query, policy).unwrap();
                black_box(result.len());
            });
        });
    }
}

fn criterion_benchmark(c: &mut Criterion) {
    let mut build_group = c.benchmark_group("build");
    for count in [10, 1_000] {
        build_group.bench_function(BenchmarkId::from_parameter(count), |b| {
            b.iter(|| black_box(build(count)).dispose());
        });
    }
    build_group.finish();

    let value = synthetic_movies(1_000);
    let text = value.to_string();
    let mut decode = c.benchmark_group("decode");
    decode.throughput(criterion::Throughput::Bytes(text.len() as u64));
    decode.bench_function("movies", |b| {
        b.iter(|| black_box(docpool::from_str(black_box(&text)).unwrap()));
    });
    decode.finish();

    let doc = docpool::from_value(&value).unwrap();
    let mut print = c.benchmark_group("print");
    print.bench_function("movies", |b| {
        b.iter(|| black_box(docpool::to_string(&doc).unwrap()));
    });
    print.finish();

    let mut query = c.benchmark_group("query");
    bench_query(&mut query, &doc, 1_000);
    query.finish();
}

criterion_group! {
    name = benches;
    config = criterion_config();
    targets = criterion_benchmark
}
criterion_main!(benches);
