//! Request path benchmarks: parse, dispatch and response encoding.

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use snmp_agent_core::ber::{EncodeBuf, tag};
use snmp_agent_core::{Agent, Communities, Oid, OidRegistry, parse_request};

fn request(pdu_tag: u8, oid: &str) -> Vec<u8> {
    let oid = Oid::parse(oid).unwrap();
    let mut buf = EncodeBuf::new();
    buf.push_sequence(|buf| {
        buf.push_constructed(pdu_tag, |buf| {
            buf.push_sequence(|buf| {
                buf.push_sequence(|buf| {
                    buf.push_null();
                    buf.push_oid(&oid);
                });
            });
            buf.push_integer(0);
            buf.push_integer(0);
            buf.push_integer(0x1234_5678);
        });
        buf.push_octet_string(b"public");
        buf.push_integer(1);
    });
    buf.finish_vec()
}

/// Registry of `size` scalars under 1.3.6.1.4.1.99999.
fn agent(size: u32) -> Agent {
    let mut registry = OidRegistry::new();
    for i in 1..=size {
        registry
            .insert(&format!("1.3.6.1.4.1.99999.{}.0", i), move |_, r| {
                let _ = r.send(i as i64);
            })
            .unwrap();
    }
    Agent::builder().registry(registry).build().unwrap()
}

fn bench_parse(c: &mut Criterion) {
    let frame = request(tag::pdu::GET_REQUEST, "1.3.6.1.2.1.1.5.0");
    let communities = Communities::default();

    let mut group = c.benchmark_group("parse_request");
    group.throughput(Throughput::Bytes(frame.len() as u64));
    group.bench_function("get", |b| {
        b.iter(|| black_box(parse_request(black_box(&frame), &communities).is_ok()))
    });
    group.finish();
}

fn bench_handle_datagram(c: &mut Criterion) {
    let mut group = c.benchmark_group("handle_datagram");

    // Lookup is a linear scan, so cost grows with the target's position
    for size in [8u32, 64, 512] {
        let agent = agent(size);
        let get = request(tag::pdu::GET_REQUEST, &format!("1.3.6.1.4.1.99999.{}.0", size));
        let next = request(tag::pdu::GET_NEXT_REQUEST, "1.3.6.1.4.1.99999.1.0");

        group.bench_with_input(BenchmarkId::new("get_last", size), &get, |b, frame| {
            b.iter(|| black_box(agent.handle_datagram(black_box(frame))))
        });
        group.bench_with_input(BenchmarkId::new("get_next_first", size), &next, |b, frame| {
            b.iter(|| black_box(agent.handle_datagram(black_box(frame))))
        });
    }

    group.finish();
}

fn bench_oid(c: &mut Criterion) {
    let mut group = c.benchmark_group("oid");
    let text = "1.3.6.1.4.1.99999.1.2.3.4.5.6.7.8.9.10.4294967295";
    let oid = Oid::parse(text).unwrap();

    group.bench_function("parse", |b| b.iter(|| black_box(Oid::parse(black_box(text)))));
    group.bench_function("from_ber", |b| {
        b.iter(|| black_box(Oid::from_ber(black_box(oid.as_ber()))))
    });
    group.finish();
}

criterion_group!(benches, bench_parse, bench_handle_datagram, bench_oid);
criterion_main!(benches);
