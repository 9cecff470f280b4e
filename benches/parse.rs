use std::hint::black_box;

use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};

const DIALECT_LINES: &[&str] = &[
    "PLAIN_{n}=value with spaces # trailing comment\n",
    "export EXPORTED_{n}=1\n",
    "SINGLE_{n}='single # not a comment'\n",
    "DOUBLE_{n}=\"line\\nnext\\r\" # comment\n",
    "BACKTICK_{n}=`a \"b\" 'c'`\n",
    "COLON_{n}: colon value\n",
    "# full-line comment\n",
    "\n",
    "MULTI_{n}=\"first\nsecond\nthird\"\n",
    "not an assignment\n",
];

fn bench_parse(c: &mut Criterion) {
    let mut group = c.benchmark_group("parse");
    for size in [1_024usize, 10_240, 102_400] {
        let input = make_input(size);
        group.throughput(Throughput::Bytes(input.len() as u64));
        group.bench_with_input(BenchmarkId::from_parameter(size), &input, |b, input| {
            b.iter(|| envy::parse(black_box(input)).expect("parse should succeed"));
        });
    }
    group.finish();
}

/// Mix of every value form, with distinct keys so the dedup map grows.
fn make_input(bytes: usize) -> String {
    let mut out = String::with_capacity(bytes + 64);
    let mut n = 0usize;
    while out.len() < bytes {
        let line = DIALECT_LINES[n % DIALECT_LINES.len()];
        out.push_str(&line.replace("{n}", &n.to_string()));
        n += 1;
    }
    out
}

criterion_group!(benches, bench_parse);
criterion_main!(benches);
