use std::hint::black_box;

use criterion::{criterion_group, criterion_main, Criterion};
use grove::router::Router;
use grove::{handler, Engine, Request};
use http::Method;

/// The "verb zoo": literals, params at several depths and a catch-all
fn routes() -> Vec<(Method, &'static str)> {
    vec![
        (Method::GET, "/"),
        (Method::GET, "/zoo/animals"),
        (Method::POST, "/zoo/animals"),
        (Method::GET, "/zoo/animals/:id"),
        (Method::PUT, "/zoo/animals/:id"),
        (Method::PATCH, "/zoo/animals/:id"),
        (Method::DELETE, "/zoo/animals/:id"),
        (Method::GET, "/zoo/animals/:id/toys/:toy_id"),
        (
            Method::GET,
            "/zoo/:category/animals/:id/habitats/:habitat_id/sections/:section_id",
        ),
        (
            Method::POST,
            "/inventory/:warehouse_id/feeds/:feed_id/items/:item_id/batches/:batch_id",
        ),
        (Method::GET, "/complex/:a/:b/:c/:d/:e/:f/:g/:h/:i"),
        (Method::GET, "/zoo/health"),
        (Method::HEAD, "/zoo/health"),
        (Method::GET, "/assets/*filepath"),
    ]
}

fn paths() -> Vec<(Method, &'static str)> {
    vec![
        (Method::GET, "/zoo/animals/123"),
        (Method::GET, "/zoo/animals/123/toys/456"),
        (Method::GET, "/zoo/cats/animals/123/habitats/88/sections/5"),
        (Method::POST, "/inventory/1/feeds/2/items/3/batches/4"),
        (Method::GET, "/complex/1/2/3/4/5/6/7/8/9"),
        (Method::GET, "/assets/css/site/main.css"),
    ]
}

fn bench_route_throughput(c: &mut Criterion) {
    let mut router = Router::new();
    for (method, pattern) in routes() {
        router.add_route(method, pattern, handler(|_ctx| {}));
    }
    let paths = paths();
    c.bench_function("route_match", |b| {
        b.iter(|| {
            for (method, path) in &paths {
                let res = router.get_route(method, path);
                black_box(&res);
            }
        })
    });
}

fn bench_engine_dispatch(c: &mut Criterion) {
    let mut engine = Engine::new();
    engine.use_middleware(handler(|ctx| ctx.next()));
    for (method, pattern) in routes() {
        engine.add_route(method, pattern, handler(|ctx| ctx.string(200, "ok")));
    }
    let paths = paths();
    {
        let mut zoo = engine.group("/zoo");
        zoo.use_middleware(handler(|ctx| ctx.next()));
    }
    c.bench_function("engine_handle", |b| {
        b.iter(|| {
            for (method, path) in &paths {
                let res = engine.handle(Request::new(method.clone(), path));
                black_box(&res);
            }
        })
    });
}

criterion_group!(benches, bench_route_throughput, bench_engine_dispatch);
criterion_main!(benches);
