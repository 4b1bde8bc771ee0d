use criterion::{criterion_group, criterion_main, BatchSize, Criterion, Throughput};
use ed2k_wire::core::file::File;
use ed2k_wire::core::header::Header;
use ed2k_wire::core::tag::{Tag, TAG_NAME, TAG_SIZE};
use ed2k_wire::identity::{ClientId, UserId};
use ed2k_wire::protocol::dispatcher::Dispatcher;
use ed2k_wire::protocol::message::{LoginRequest, OfferFiles};

#[allow(clippy::unwrap_used)]
fn sample_login() -> LoginRequest {
    LoginRequest {
        header: Header::default(),
        uid: UserId::generate(),
        client_id: ClientId::from(0xFFFF_FFFF),
        port: 4662,
        tags: vec![
            Tag::string(TAG_NAME, "gmule", false),
            Tag::u32(0x11, 1),
            Tag::u32(0x0F, 4662),
            Tag::u32(0x20, 0),
        ],
    }
}

#[allow(clippy::unwrap_used)]
fn sample_offer(files: usize) -> OfferFiles {
    OfferFiles {
        header: Header::default(),
        files: (0..files)
            .map(|i| File {
                hash: [i as u8; 16],
                client_id: ClientId::from(0x0200_0000 + i as u32),
                port: 4662,
                tags: vec![
                    Tag::string(TAG_NAME, format!("file-{i}.iso"), true),
                    Tag::integer(TAG_SIZE, 730_000_000 + i as u64),
                ],
            })
            .collect(),
    }
}

#[allow(clippy::unwrap_used)]
fn bench_message_encode_decode(c: &mut Criterion) {
    let mut group = c.benchmark_group("message_encode_decode");
    let dispatcher = Dispatcher::new();

    let login_frame = sample_login().encode().unwrap();
    group.throughput(Throughput::Bytes(login_frame.len() as u64));
    group.bench_function("encode_login", |b| {
        b.iter_batched(
            sample_login,
            |msg| msg.encode().unwrap(),
            BatchSize::SmallInput,
        )
    });
    group.bench_function("dispatch_login", |b| {
        b.iter(|| dispatcher.dispatch(&login_frame).unwrap())
    });

    for count in [10usize, 200] {
        let frame = sample_offer(count).encode().unwrap();
        group.throughput(Throughput::Bytes(frame.len() as u64));
        group.bench_function(format!("encode_offer_{count}_files"), |b| {
            b.iter_batched(
                || sample_offer(count),
                |msg| msg.encode().unwrap(),
                BatchSize::SmallInput,
            )
        });
        group.bench_function(format!("dispatch_offer_{count}_files"), |b| {
            b.iter(|| dispatcher.dispatch(&frame).unwrap())
        });
    }

    group.finish();
}

#[allow(clippy::unwrap_used)]
fn bench_tag_decode(c: &mut Criterion) {
    let mut group = c.benchmark_group("tag_decode");
    let tags = [
        ("u32", Tag::u32(0x11, 1).encode().unwrap()),
        (
            "short_string",
            Tag::string(TAG_NAME, "gmule", true).encode().unwrap(),
        ),
        (
            "string",
            Tag::string("a somewhat longer tag name", "and a value", false)
                .encode()
                .unwrap(),
        ),
    ];
    for (name, data) in &tags {
        group.bench_function(*name, |b| b.iter(|| Tag::decode(data).unwrap()));
    }
    group.finish();
}

criterion_group!(benches, bench_message_encode_decode, bench_tag_decode);
criterion_main!(benches);
