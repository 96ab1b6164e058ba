//
// Copyright 2017-2026 Hans W. Uhlig. All Rights Reserved.
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//      http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.
//


//! Benchmarks for negotiation engine throughput

use criterion::{BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main};
use termlink_negotiation::consts::option::{NAWS, TTYPE};
use termlink_negotiation::consts::{DO, IAC, SB, SE};
use termlink_negotiation::{NegotiationEngine, NegotiationListener};

struct Sink(usize);

impl NegotiationListener for Sink {
    fn on_recv(&mut self, data: &[u8]) {
        self.0 += data.len();
    }
}

// ============================================================================
// Inbound Benchmarks
// ============================================================================

fn bench_payload_sizes(c: &mut Criterion) {
    let mut group = c.benchmark_group("payload_sizes");

    for size in [10, 100, 1000, 10000].iter() {
        group.throughput(Throughput::Bytes(*size as u64));

        group.bench_with_input(BenchmarkId::from_parameter(size), size, |b, &size| {
            let data: Vec<u8> = (0..size).map(|i| (i % 255) as u8).collect();
            let mut engine = NegotiationEngine::default();
            let mut sink = Sink(0);
            let mut wire = Vec::new();

            b.iter(|| {
                engine
                    .on_bytes(black_box(&data), &mut sink, &mut wire)
                    .unwrap();
            });
        });
    }

    group.finish();
}

fn bench_mixed_stream(c: &mut Criterion) {
    let mut stream = Vec::new();
    for _ in 0..100 {
        stream.extend_from_slice(b"You see a small brass lamp.\r\n");
        stream.extend_from_slice(&[IAC, IAC]);
        stream.extend_from_slice(&[IAC, SB, NAWS, 0, 80, 0, 24, IAC, SE]);
    }

    c.bench_function("mixed_stream", |b| {
        let mut engine = NegotiationEngine::default();
        let mut sink = Sink(0);
        let mut wire = Vec::new();

        b.iter(|| {
            engine
                .on_bytes(black_box(&stream), &mut sink, &mut wire)
                .unwrap();
        });
    });
}

// ============================================================================
// Negotiation Benchmarks
// ============================================================================

fn bench_handshake(c: &mut Criterion) {
    let handshake = [IAC, DO, TTYPE, IAC, SB, TTYPE, 1, IAC, SE, IAC, DO, NAWS];

    c.bench_function("handshake", |b| {
        let mut wire = Vec::with_capacity(64);

        b.iter(|| {
            let mut engine = NegotiationEngine::default();
            wire.clear();
            engine
                .on_bytes(black_box(&handshake), &mut Sink(0), &mut wire)
                .unwrap();
        });
    });
}

criterion_group!(inbound_benches, bench_payload_sizes, bench_mixed_stream);

criterion_group!(negotiation_benches, bench_handshake);

criterion_main!(inbound_benches, negotiation_benches);
