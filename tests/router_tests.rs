use grove::router::Router;
use grove::{handler, Engine, HandlerFunc};
use http::Method;

mod common;
use common::harness::{get, json_body};

fn echo_params() -> HandlerFunc {
    handler(|ctx| {
        let params = ctx.params().clone();
        let map: serde_json::Map<String, serde_json::Value> = params
            .iter()
            .map(|(k, v)| (k.to_string(), serde_json::Value::String(v.clone())))
            .collect();
        ctx.json(200, &map);
    })
}

fn engine_with(patterns: &[&str]) -> Engine {
    let mut engine = Engine::new();
    for pattern in patterns {
        engine.get(pattern, echo_params());
    }
    engine
}

#[test]
fn test_route_scenarios() {
    let engine = engine_with(&[
        "/",
        "/hello/:name",
        "/hello/b/c",
        "/hi/:name",
        "/assets/*filepath",
    ]);

    let res = get(&engine, "/");
    assert_eq!(res.status, 200);
    assert_eq!(json_body(&res), serde_json::json!({}));

    let res = get(&engine, "/hello/geektutu");
    assert_eq!(json_body(&res), serde_json::json!({ "name": "geektutu" }));

    let res = get(&engine, "/hello/b/c");
    assert_eq!(json_body(&res), serde_json::json!({}));

    let res = get(&engine, "/hi/x");
    assert_eq!(json_body(&res), serde_json::json!({ "name": "x" }));

    let res = get(&engine, "/assets/css/geektutu.css");
    assert_eq!(
        json_body(&res),
        serde_json::json!({ "filepath": "css/geektutu.css" })
    );
}

#[test]
fn test_unmatched_paths_are_404() {
    let engine = engine_with(&["/hello/:name", "/assets/*filepath"]);
    for path in ["/hello", "/hello/a/b", "/assets", "/nope"] {
        let res = get(&engine, path);
        assert_eq!(res.status, 404, "{path}");
        assert_eq!(res.body_text(), format!("404 NOT FOUND: {path}\n"));
    }
}

#[test]
fn test_exact_beats_wildcard_in_both_registration_orders() {
    for order in [["/p/:lang/doc", "/p/go/doc"], ["/p/go/doc", "/p/:lang/doc"]] {
        let mut router = Router::new();
        for pattern in order {
            router.add_route(Method::GET, pattern, echo_params());
        }
        let exact = router.get_route(&Method::GET, "/p/go/doc").unwrap();
        assert_eq!(&*exact.pattern, "/p/go/doc");
        assert!(exact.path_params.is_empty());

        let wild = router.get_route(&Method::GET, "/p/rust/doc").unwrap();
        assert_eq!(&*wild.pattern, "/p/:lang/doc");
        assert_eq!(wild.get_path_param("lang"), Some("rust"));
    }
}

#[test]
fn test_distinct_wildcard_names_bind_their_own_route() {
    let engine = engine_with(&["/p/:lang/x", "/p/:id/y"]);
    assert_eq!(
        json_body(&get(&engine, "/p/go/y")),
        serde_json::json!({ "id": "go" })
    );
    assert_eq!(
        json_body(&get(&engine, "/p/go/x")),
        serde_json::json!({ "lang": "go" })
    );
}

#[test]
fn test_multiple_params() {
    let engine = engine_with(&["/users/:id/posts/:post_id"]);
    assert_eq!(
        json_body(&get(&engine, "/users/42/posts/abc")),
        serde_json::json!({ "id": "42", "post_id": "abc" })
    );
}

#[test]
fn test_repeated_slashes_are_ignored() {
    let engine = engine_with(&["/a/:b"]);
    assert_eq!(
        json_body(&get(&engine, "//a///1/")),
        serde_json::json!({ "b": "1" })
    );
}

#[test]
fn test_query_string_does_not_affect_matching() {
    let mut engine = Engine::new();
    engine.get(
        "/hello",
        handler(|ctx| {
            let name = ctx.query("name").unwrap_or_default();
            ctx.string(200, format!("hello {name}"));
        }),
    );
    assert_eq!(get(&engine, "/hello?name=geektutu").body_text(), "hello geektutu");
    assert_eq!(get(&engine, "/hello").body_text(), "hello ");
}
