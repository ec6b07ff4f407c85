//! Parser Benchmark
//!
//! Measures parse throughput (bytes/sec) with and without lazy inner
//! functions, and the cost of delazifying one function afterwards.

use criterion::{BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main};
use jsfront_common::ParseOptions;
use jsfront_parser::{delazify_function, parse_module, parse_script};

// =============================================================================
// Test Sources
// =============================================================================

const SIMPLE_SOURCE: &str = r#"
function add(a, b) {
    return a + b;
}

const result = add(1, 2);
console.log(result);
"#;

const CLASS_SOURCE: &str = r#"
class UserService {
    #users = [];

    addUser(user) {
        this.#users.push(user);
    }

    getUser(id) {
        return this.#users.find(u => u.id === id);
    }

    static create(...seed) {
        const service = new UserService();
        for (const user of seed) service.addUser(user);
        return service;
    }
}

const service = UserService.create({ id: 1, name: "Alice" }, { id: 2, name: "Bob" });
console.log(service.getUser(1)?.name ?? "missing");
"#;

const MODULE_SOURCE: &str = r#"
import { readFile } from "fs/promises";
import * as path from "path";

export async function load(dir, name) {
    const text = await readFile(path.join(dir, name), "utf8");
    return JSON.parse(text);
}

export default class Cache {
    constructor() { this.entries = new Map(); }
    async get(dir, name) {
        let value = this.entries.get(name);
        if (value === undefined) {
            value = await load(dir, name);
            this.entries.set(name, value);
        }
        return value;
    }
}
"#;

/// Script with `functions` top-level functions of `statements` statements.
fn generate_large_source(functions: usize, statements: usize) -> String {
    let mut source = String::new();
    for i in 0..functions {
        source.push_str(&format!("function fn{i}(a, b) {{\n"));
        source.push_str("    var total = 0;\n");
        for j in 0..statements {
            source.push_str(&format!(
                "    if (a > {j}) {{ total += a * {j} + (b || 0); }} else {{ total -= {j}; }}\n"
            ));
        }
        source.push_str("    return function inner() { return total; };\n}\n");
    }
    source
}

// =============================================================================
// Benchmarks
// =============================================================================

fn bench_parse_small(c: &mut Criterion) {
    let eager = ParseOptions::eager();
    c.bench_function("parse_simple", |b| {
        b.iter(|| black_box(parse_script(black_box(SIMPLE_SOURCE), &eager)))
    });
    c.bench_function("parse_class", |b| {
        b.iter(|| black_box(parse_script(black_box(CLASS_SOURCE), &eager)))
    });
    c.bench_function("parse_module", |b| {
        b.iter(|| black_box(parse_module(black_box(MODULE_SOURCE), &eager)))
    });
}

/// Benchmark: full versus lazy parse throughput for various sizes
fn bench_parse_throughput(c: &mut Criterion) {
    let mut group = c.benchmark_group("parser_throughput");
    let eager = ParseOptions::eager();
    let lazy = ParseOptions::default();
    for (functions, statements) in [(10, 5), (50, 10), (200, 10)] {
        let source = generate_large_source(functions, statements);
        let label = format!("{functions}fn_{statements}stmt");
        group.throughput(Throughput::Bytes(source.len() as u64));
        group.bench_with_input(BenchmarkId::new("full", &label), &source, |b, source| {
            b.iter(|| black_box(parse_script(source, &eager)))
        });
        group.bench_with_input(BenchmarkId::new("lazy", &label), &source, |b, source| {
            b.iter(|| black_box(parse_script(source, &lazy)))
        });
    }
    group.finish();
}

/// Benchmark: delazify the last function of a lazily parsed script
fn bench_delazify(c: &mut Criterion) {
    let source = generate_large_source(100, 10);
    let options = ParseOptions::default();
    let Ok(output) = parse_script(&source, &options) else {
        return;
    };
    let Some(summary) = output.summaries.last().cloned() else {
        return;
    };
    c.bench_function("delazify_last_function", |b| {
        b.iter(|| {
            let interner = output.interner.clone();
            black_box(delazify_function(&source, &summary, interner, &options))
        })
    });
}

criterion_group!(benches, bench_parse_small, bench_parse_throughput, bench_delazify);
criterion_main!(benches);
