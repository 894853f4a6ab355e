#![allow(dead_code)]

use criterion::{criterion_group, criterion_main, Criterion};
use naive_injector::{Inject, Injector, Lifetime::*, Registry};
use std::sync::Arc;

struct A(Arc<B>, Arc<C>);
struct B(i32);
struct C(Arc<CA>);
struct CA(Arc<CAA>);
struct CAA(Arc<CAAA>);
struct CAAA;

#[inline]
fn registry(lifetime: naive_injector::Lifetime) -> Registry {
    Registry::new()
        .provide(lifetime, || Ok(CAAA))
        .provide(lifetime, |Inject(caaa): Inject<CAAA>| Ok(CAA(caaa)))
        .provide(lifetime, |Inject(caa): Inject<CAA>| Ok(CA(caa)))
        .provide(lifetime, |Inject(ca): Inject<CA>| Ok(C(ca)))
        .provide(lifetime, || Ok(B(2)))
        .provide(lifetime, |Inject(b): Inject<B>, Inject(c): Inject<C>| Ok(A(b, c)))
}

#[inline]
fn registry_with_finalizers() -> Registry {
    registry(Scoped)
        .add_finalizer(|_: Arc<CAAA>| Ok::<_, anyhow::Error>(()))
        .add_finalizer(|_: Arc<CAA>| Ok::<_, anyhow::Error>(()))
        .add_finalizer(|_: Arc<CA>| Ok::<_, anyhow::Error>(()))
        .add_finalizer(|_: Arc<C>| Ok::<_, anyhow::Error>(()))
        .add_finalizer(|_: Arc<B>| Ok::<_, anyhow::Error>(()))
        .add_finalizer(|_: Arc<A>| Ok::<_, anyhow::Error>(()))
}

#[inline]
fn scope_resolve(injector: &Injector) {
    let scope = injector.begin_scope();
    let _ = scope.resolve::<A>().unwrap();
}

#[inline]
fn scope_resolve_and_close(injector: &Injector) {
    let scope = injector.begin_scope();
    let _ = scope.resolve::<A>().unwrap();
    scope.close().unwrap();
}

fn criterion_benchmark(c: &mut Criterion) {
    let transient = registry(Transient).build();
    let singleton = registry(Singleton).build();
    let scoped = registry(Scoped).build();
    let scoped_with_finalizers = registry_with_finalizers().build();

    c.bench_function("registry_build", |b| b.iter(|| registry_with_finalizers().build()))
        .bench_function("injector_begin_scope", |b| b.iter(|| scoped.begin_scope()))
        .bench_function("injector_resolve_transient", |b| {
            b.iter(|| transient.resolve::<A>().unwrap())
        })
        .bench_function("injector_resolve_singleton", |b| {
            b.iter(|| singleton.resolve::<A>().unwrap())
        })
        .bench_function("scope_resolve", |b| b.iter(|| scope_resolve(&scoped)))
        .bench_function("scope_close", |b| b.iter(|| scope_resolve_and_close(&scoped_with_finalizers)))
        .bench_function("scope_close_without_finalizers", |b| {
            b.iter(|| scope_resolve_and_close(&scoped))
        });
}

criterion_group!(benches, criterion_benchmark);
criterion_main!(benches);
