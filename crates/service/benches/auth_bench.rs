use criterion::{criterion_group, criterion_main, Criterion};
use std::sync::Arc;

use service::auth::service::{AuthService, AuthConfig};
use service::auth::repository::mock::MockAuthRepository;
use service::auth::domain::{RegisterInput, LoginInput};

fn bench_auth(c: &mut Criterion) {
    let repo = Arc::new(MockAuthRepository::default());
    let svc = AuthService::new(repo, AuthConfig::new("secret", "refresh-secret"));

    // pre-create user outside of the benchmark using a tokio runtime
    let rt = tokio::runtime::Runtime::new().unwrap();
    rt.block_on(svc.register(RegisterInput { name: "Bench".into(), email: "bench@hotel.com".into(), password: "pw123".into(), ..Default::default() }))
        .unwrap();
    let session = rt
        .block_on(svc.authenticate(LoginInput { email: "bench@hotel.com".into(), password: "pw123".into() }))
        .unwrap();

    c.bench_function("auth_login_verify", |b| {
        b.iter(|| {
            rt.block_on(svc.authenticate(LoginInput { email: "bench@hotel.com".into(), password: "pw123".into() })).unwrap();
        });
    });

    c.bench_function("auth_validate_token", |b| {
        b.iter(|| {
            rt.block_on(svc.validate(&session.token)).unwrap();
        });
    });
}

criterion_group!(benches, bench_auth);
criterion_main!(benches);
