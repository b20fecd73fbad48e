use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};

use chrono::Utc;
use uuid::Uuid;
use vendorhub_auth::{Hs256Tokens, TokenValidator, hash_password, verify_password};

/// Every gated request pays for one signature check; keep an eye on it.
fn bench_token_issue_and_validate(c: &mut Criterion) {
    let mut group = c.benchmark_group("bearer_tokens");
    let tokens = Hs256Tokens::with_default_ttl(b"bench-secret");
    let now = Utc::now();
    let token = tokens.issue(Uuid::now_v7(), now).unwrap();

    group.bench_function("issue", |b| {
        b.iter(|| tokens.issue(black_box(Uuid::now_v7()), now).unwrap());
    });

    group.bench_function("validate", |b| {
        b.iter(|| tokens.validate(black_box(&token), now).unwrap());
    });

    group.bench_function("reject_tampered", |b| {
        let tampered = format!("{token}x");
        b.iter(|| tokens.validate(black_box(&tampered), now).is_err());
    });

    group.finish();
}

/// Login latency is dominated by bcrypt; compare work factors.
fn bench_password_verify(c: &mut Criterion) {
    let mut group = c.benchmark_group("password_verify");
    group.sample_size(10);

    for cost in [4u32, 8, 10] {
        let hash = hash_password("correct horse battery staple", cost).unwrap();
        group.bench_with_input(BenchmarkId::from_parameter(cost), &hash, |b, hash| {
            b.iter(|| verify_password(black_box("correct horse battery staple"), hash).unwrap());
        });
    }

    group.finish();
}

criterion_group!(benches, bench_token_issue_and_validate, bench_password_verify);
criterion_main!(benches);
