//! Benchmarks for the Sharebox wire codec

use std::io::Cursor;

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use sharebox::protocol::{
    decode_size, encode_request, encode_size, read_frame, read_request, write_frame, Command,
};
use sharebox::store::render_listing;

fn codec_benchmarks(c: &mut Criterion) {
    c.bench_function("encode_size", |b| {
        b.iter(|| encode_size(black_box(1_000_000)))
    });

    c.bench_function("decode_size", |b| {
        let bytes = encode_size(1_000_000);
        b.iter(|| decode_size(black_box(bytes)))
    });

    c.bench_function("request_round_trip", |b| {
        let cmd = Command::Get {
            name: "remotefile.txt".to_string(),
        };
        b.iter(|| {
            let encoded = encode_request(black_box(&cmd)).unwrap();
            read_request(&mut Cursor::new(encoded)).unwrap()
        })
    });

    c.bench_function("frame_round_trip_64k", |b| {
        let payload = vec![0xABu8; 64 * 1024];
        b.iter(|| {
            let mut wire = Vec::with_capacity(payload.len() + 8);
            write_frame(&mut wire, black_box(&payload)).unwrap();
            read_frame(&mut Cursor::new(wire)).unwrap()
        })
    });

    c.bench_function("render_listing_100", |b| {
        let names: Vec<String> = (0..100).map(|i| format!("file_{i:03}.txt")).collect();
        b.iter(|| render_listing(black_box(&names)))
    });
}

criterion_group!(benches, codec_benchmarks);
criterion_main!(benches);
