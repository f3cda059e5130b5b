use crate::get_inputs;
use criterion::{BenchmarkId, Criterion, Throughput};
use html_tamer::parser::Tokenizer;
use html_tamer::IndexedDocument;
use std::hint::black_box;

pub fn tokenization(c: &mut Criterion) {
    let mut group = c.benchmark_group("tokenization");

    for input in get_inputs() {
        group.throughput(Throughput::Bytes(input.html.len() as u64));

        group.bench_with_input(BenchmarkId::new("Tokenizer", &input.name), &input, |b, i| {
            b.iter(|| {
                for token in Tokenizer::new(&i.html) {
                    black_box(token);
                }
            })
        });

        group.bench_with_input(
            BenchmarkId::new("Tokenizer - implicit end tags", &input.name),
            &input,
            |b, i| {
                b.iter(|| {
                    for token in Tokenizer::new(&i.html).with_implicit_end_tags(true) {
                        black_box(token);
                    }
                })
            },
        );
    }

    group.finish();
}

pub fn indexing(c: &mut Criterion) {
    let mut group = c.benchmark_group("indexing");

    for input in get_inputs() {
        group.throughput(Throughput::Bytes(input.html.len() as u64));

        group.bench_with_input(BenchmarkId::new("Index", &input.name), &input, |b, i| {
            b.iter(|| {
                let doc = IndexedDocument::index(i.html.as_str(), "http://blog.example.com/");

                black_box(doc.resource_urls().len() + doc.anchors().len());
            })
        });
    }

    group.finish();
}
