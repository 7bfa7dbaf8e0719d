use grove::{handler, Engine};

mod common;
use common::test_server::{free_addr, parse_response, send_request, setup_may_runtime};

fn demo() -> Engine {
    let mut engine = Engine::with_defaults();
    engine.get(
        "/hello/:name",
        handler(|ctx| {
            let body = format!("hello {}", ctx.param("name").unwrap_or_default());
            ctx.string(200, body);
        }),
    );
    engine.get(
        "/query",
        handler(|ctx| {
            let q = ctx.query("q").unwrap_or_default();
            ctx.json(200, &serde_json::json!({ "q": q }));
        }),
    );
    engine.post(
        "/login",
        handler(|ctx| {
            let user = ctx.post_form("username").unwrap_or_default();
            ctx.set_header("x-user", user.clone());
            ctx.string(200, format!("welcome {user}"));
        }),
    );
    engine.get("/panic", handler(|_ctx| panic!("boom")));
    engine
}

#[test]
fn test_live_server_round_trip() {
    setup_may_runtime();
    let addr = free_addr();
    let handle = demo().serve(addr).unwrap();
    handle.wait_ready().unwrap();

    let resp = parse_response(&send_request(
        &addr,
        "GET /hello/grove HTTP/1.1\r\nHost: localhost\r\n\r\n",
    ));
    assert_eq!(resp.status, 200);
    assert_eq!(resp.body, "hello grove");
    assert_eq!(resp.header("content-type"), Some("text/plain; charset=utf-8"));

    let resp = parse_response(&send_request(
        &addr,
        "GET /query?q=a%20b HTTP/1.1\r\nHost: localhost\r\n\r\n",
    ));
    assert_eq!(resp.status, 200);
    assert_eq!(resp.body, r#"{"q":"a b"}"#);

    let resp = parse_response(&send_request(
        &addr,
        "GET /missing HTTP/1.1\r\nHost: localhost\r\n\r\n",
    ));
    assert_eq!(resp.status, 404);
    assert_eq!(resp.body, "404 NOT FOUND: /missing\n");

    handle.stop();
}

#[test]
fn test_live_server_form_post_and_headers() {
    setup_may_runtime();
    let addr = free_addr();
    let handle = demo().serve(addr).unwrap();
    handle.wait_ready().unwrap();

    let body = "username=geek&password=1234";
    let req = format!(
        concat!(
            "POST /login HTTP/1.1\r\nHost: localhost\r\n",
            "Content-Type: application/x-www-form-urlencoded\r\n",
            "Content-Length: {}\r\n\r\n{}",
        ),
        body.len(),
        body
    );
    let resp = parse_response(&send_request(&addr, &req));
    assert_eq!(resp.status, 200);
    assert_eq!(resp.body, "welcome geek");
    assert_eq!(resp.header("x-user"), Some("geek"));

    handle.stop();
}

#[test]
fn test_live_server_survives_panics() {
    setup_may_runtime();
    let addr = free_addr();
    let handle = demo().serve(addr).unwrap();
    handle.wait_ready().unwrap();

    let resp = parse_response(&send_request(
        &addr,
        "GET /panic HTTP/1.1\r\nHost: localhost\r\n\r\n",
    ));
    assert_eq!(resp.status, 500);
    assert_eq!(resp.body, r#"{"message":"Internal Server Error"}"#);

    let resp = parse_response(&send_request(
        &addr,
        "GET /hello/again HTTP/1.1\r\nHost: localhost\r\n\r\n",
    ));
    assert_eq!(resp.status, 200);
    assert_eq!(resp.body, "hello again");

    handle.stop();
}
