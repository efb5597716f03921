// SPDX-License-Identifier: MIT OR Apache-2.0
//! Build, encode and decode an error with a foreign cause, end to end.

use criterion::{Criterion, black_box, criterion_group, criterion_main};

use serum::{ErrorValue, json};
use serum_config::SerumConfig;

fn bench_pipeline(c: &mut Criterion) {
    let codec = SerumConfig::default().codec();
    let io = std::io::Error::other("disk unplugged");

    c.bench_function("build_encode_decode", |b| {
        b.iter(|| {
            let err = ErrorValue::builder("svc-lookup-failed")
                .template("lookup of {{key|q}} failed")
                .detail("key", black_box("k1"))
                .cause(&io)
                .build();
            let bytes = codec.encode(&err).unwrap_or_default();
            json::from_json(&bytes)
        })
    });
}

criterion_group!(benches, bench_pipeline);
criterion_main!(benches);
