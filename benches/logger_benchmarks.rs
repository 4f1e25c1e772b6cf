//! Criterion benchmarks for dynamic_logger

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use dynamic_logger::prelude::*;
use dynamic_logger::{global, Encoder, LogEntry, TimestampFormat};
use tempfile::TempDir;

fn file_logger(dir: &TempDir, name: &str, format: OutputFormat) -> Logger {
    Logger::builder()
        .format(format)
        .disable_stacktrace(true)
        .output_paths([dir.path().join(name).display().to_string()])
        .build()
        .expect("Failed to build logger")
}

// ============================================================================
// Logger Creation Benchmarks
// ============================================================================

fn bench_logger_creation(c: &mut Criterion) {
    let mut group = c.benchmark_group("logger_creation");
    group.throughput(Throughput::Elements(1));

    group.bench_function("stderr_fallback", |b| {
        b.iter(|| black_box(Logger::stderr_fallback()));
    });

    let config = Config {
        format: "json".into(),
        output_paths: vec!["stdout".into()],
        ..Config::default()
    };
    group.bench_function("from_config", |b| {
        b.iter(|| black_box(Logger::new(black_box(&config)).unwrap()));
    });

    let logger = Logger::stderr_fallback();
    group.bench_function("with_name", |b| {
        b.iter(|| black_box(logger.with_name(black_box("worker"))));
    });

    group.finish();
}

// ============================================================================
// Logging Performance Benchmarks
// ============================================================================

fn bench_file_logging(c: &mut Criterion) {
    let mut group = c.benchmark_group("file_logging");
    group.throughput(Throughput::Elements(1));
    let dir = TempDir::new().unwrap();

    for format in [OutputFormat::Text, OutputFormat::Json, OutputFormat::KeyValue] {
        let logger = file_logger(&dir, &format!("{}.log", format), format);
        group.bench_with_input(BenchmarkId::new("info", format), &logger, |b, logger| {
            b.iter(|| logger.info(black_box("Benchmark message")));
        });
        group.bench_with_input(BenchmarkId::new("infow", format), &logger, |b, logger| {
            b.iter(|| {
                logger.infow(
                    black_box("Benchmark message"),
                    Fields::new().with("user_id", 12345).with("action", "login"),
                )
            });
        });
    }

    group.finish();
}

fn bench_context_logging(c: &mut Criterion) {
    let mut group = c.benchmark_group("context_logging");
    group.throughput(Throughput::Elements(1));
    let dir = TempDir::new().unwrap();

    let tenant = ContextKey::new("tenant");
    let logger = Logger::builder()
        .format(OutputFormat::Json)
        .disable_stacktrace(true)
        .output_paths([dir.path().join("ctx.log").display().to_string()])
        .context_key(tenant)
        .build()
        .unwrap();
    let ctx = with_request_id(
        &with_trace_id(&Context::background().with_value(&tenant, "acme"), "trace-1"),
        "req-1",
    );

    group.bench_function("info_ctx", |b| {
        b.iter(|| logger.info_ctx(black_box(&ctx), black_box("Benchmark message")));
    });

    group.bench_function("extract_fields", |b| {
        b.iter(|| black_box(dynamic_logger::extract_fields(black_box(&ctx), &[tenant])));
    });

    group.finish();
}

// ============================================================================
// Serialization Benchmarks
// ============================================================================

fn bench_serialization(c: &mut Criterion) {
    let mut group = c.benchmark_group("serialization");
    group.throughput(Throughput::Elements(1));

    let entry = LogEntry::new(LogLevel::Info, "Benchmark message").with_fields(
        Fields::new()
            .with("user_id", 12345)
            .with("action", "login")
            .with("latency_ms", 12.5),
    );

    for format in [OutputFormat::Text, OutputFormat::Json, OutputFormat::KeyValue] {
        let encoder = Encoder::new(format, TimestampFormat::Iso8601, false);
        group.bench_with_input(BenchmarkId::new("encode", format), &encoder, |b, encoder| {
            b.iter(|| black_box(encoder.encode(black_box(&entry)).unwrap()));
        });
    }

    group.finish();
}

// ============================================================================
// Level Filtering Benchmarks
// ============================================================================

fn bench_level_filtering(c: &mut Criterion) {
    let mut group = c.benchmark_group("level_filtering");
    group.throughput(Throughput::Elements(1));
    let dir = TempDir::new().unwrap();

    let logger = Logger::builder()
        .level(LogLevel::Error)
        .output_paths([dir.path().join("filtered.log").display().to_string()])
        .build()
        .unwrap();

    group.bench_function("filtered_debug", |b| {
        b.iter(|| logger.debug(black_box("This should be filtered")));
    });

    group.bench_function("filtered_debugf", |b| {
        b.iter(|| logger.debugf(format_args!("value {}", black_box(42))));
    });

    group.finish();
}

// ============================================================================
// Global Registry Benchmarks
// ============================================================================

fn bench_global(c: &mut Criterion) {
    let mut group = c.benchmark_group("global");
    group.throughput(Throughput::Elements(1));

    global::init(&Config {
        level: "error".into(),
        ..Config::default()
    })
    .unwrap();

    group.bench_function("std_logger_load", |b| {
        b.iter(|| black_box(global::std_logger()));
    });

    group.bench_function("filtered_info", |b| {
        b.iter(|| global::info(black_box("filtered")));
    });

    let configs = [
        Config {
            level: "error".into(),
            ..Config::default()
        },
        Config {
            level: "fatal".into(),
            ..Config::default()
        },
    ];
    let mut i = 0;
    group.bench_function("reconfigure", |b| {
        b.iter(|| {
            i += 1;
            global::reconfigure_global_logger(configs[i % 2].clone()).unwrap()
        });
    });

    group.finish();
}

criterion_group!(
    benches,
    bench_logger_creation,
    bench_file_logging,
    bench_context_logging,
    bench_serialization,
    bench_level_filtering,
    bench_global,
);

criterion_main!(benches);
