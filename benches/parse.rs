use criterion::{Criterion, criterion_group, criterion_main};
use std::hint::black_box;
use xmlast::{Document, DynamicArray};

const SRC: &str = include_str!("../tests/good.xml");

fn parse_xml(src: &str) {
    let _ = Document::parse_str(src).unwrap();
}

fn dump_xml(document: &Document) {
    let _ = document.dump(None);
}

fn push_back(count: usize) {
    let mut array = DynamicArray::new(0, None).unwrap();
    for i in 0..count {
        array.push_back(i).unwrap();
    }
}

fn criterion_benchmark(c: &mut Criterion) {
    let document = Document::parse_str(SRC).unwrap();

    c.bench_function("parse_xml", |b| b.iter(|| parse_xml(black_box(SRC))));

    c.bench_function("dump_xml", |b| b.iter(|| dump_xml(black_box(&document))));

    c.bench_function("push_back", |b| b.iter(|| push_back(black_box(10_000))));
}

criterion_group!(benches, criterion_benchmark);
criterion_main!(benches);
