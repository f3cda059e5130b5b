use crate::get_inputs;
use criterion::{BenchmarkId, Criterion, Throughput};
use html_tamer::{
    absolutize, balance, sterilize, thin, thin_for_capture, CaptureFlags, IndexedDocument,
    SanitizeFlags, ThinFlags, ThinSettings,
};
use std::hint::black_box;

pub fn rewriting_passes(c: &mut Criterion) {
    let mut group = c.benchmark_group("rewriting");
    let strict = ThinSettings::new(ThinFlags::STRICT | ThinFlags::PRESERVE_IMAGES);

    for input in get_inputs() {
        group.throughput(Throughput::Bytes(input.html.len() as u64));

        group.bench_with_input(BenchmarkId::new("Balance", &input.name), &input, |b, i| {
            b.iter(|| black_box(balance(&i.html, 4096)))
        });

        group.bench_with_input(BenchmarkId::new("Sterilize", &input.name), &input, |b, i| {
            b.iter(|| black_box(sterilize(&i.html, SanitizeFlags::all())))
        });

        group.bench_with_input(BenchmarkId::new("Thin", &input.name), &input, |b, i| {
            b.iter(|| black_box(thin(&i.html, &ThinSettings::default())))
        });

        group.bench_with_input(BenchmarkId::new("Thin - strict", &input.name), &input, |b, i| {
            b.iter(|| black_box(thin(&i.html, &strict)))
        });

        group.bench_with_input(
            BenchmarkId::new("Thin for capture", &input.name),
            &input,
            |b, i| b.iter(|| black_box(thin_for_capture(&i.html, CaptureFlags::FOR_PAGE))),
        );

        group.bench_with_input(BenchmarkId::new("Absolutize", &input.name), &input, |b, i| {
            b.iter(|| black_box(absolutize(&i.html, "http://blog.example.com/2006/05/")))
        });
    }

    group.finish();
}

pub fn regeneration(c: &mut Criterion) {
    let mut group = c.benchmark_group("regeneration");

    for input in get_inputs() {
        let doc = IndexedDocument::index(input.html.as_str(), "http://blog.example.com/");

        group.throughput(Throughput::Bytes(input.html.len() as u64));

        group.bench_with_input(BenchmarkId::new("Generate", &input.name), &doc, |b, doc| {
            b.iter(|| black_box(doc.generate_html()))
        });
    }

    group.finish();
}
