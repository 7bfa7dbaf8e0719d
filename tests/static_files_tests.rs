use std::fs;

use grove::Engine;
use tempfile::TempDir;

mod common;
use common::harness::get;

fn site() -> TempDir {
    let dir = tempfile::tempdir().unwrap();
    fs::create_dir_all(dir.path().join("css")).unwrap();
    fs::write(dir.path().join("css/site.css"), "body { color: red; }").unwrap();
    fs::write(dir.path().join("index.html"), "<h1>grove</h1>").unwrap();
    fs::write(dir.path().join("blob.bin"), [0u8, 1, 2, 255]).unwrap();
    dir
}

#[test]
fn test_serves_files_with_content_type() {
    let dir = site();
    let mut engine = Engine::new();
    engine.static_files("/assets", dir.path());

    let res = get(&engine, "/assets/css/site.css");
    assert_eq!(res.status, 200);
    assert_eq!(res.body_text(), "body { color: red; }");
    assert_eq!(res.get_header("content-type"), Some("text/css; charset=utf-8"));

    let res = get(&engine, "/assets/index.html");
    assert_eq!(res.get_header("content-type"), Some("text/html; charset=utf-8"));

    let res = get(&engine, "/assets/blob.bin");
    assert_eq!(res.body, vec![0u8, 1, 2, 255]);
    assert_eq!(
        res.get_header("content-type"),
        Some("application/octet-stream")
    );
}

#[test]
fn test_missing_file_is_empty_404() {
    let dir = site();
    let mut engine = Engine::new();
    engine.static_files("/assets", dir.path());

    let res = get(&engine, "/assets/nope.js");
    assert_eq!(res.status, 404);
    assert!(res.body.is_empty());

    // A directory is not a file
    assert_eq!(get(&engine, "/assets/css").status, 404);
}

#[test]
fn test_traversal_is_rejected() {
    let outer = tempfile::tempdir().unwrap();
    fs::write(outer.path().join("secret.txt"), "top secret").unwrap();
    let public = outer.path().join("public");
    fs::create_dir(&public).unwrap();
    fs::write(public.join("ok.txt"), "fine").unwrap();

    let mut engine = Engine::new();
    engine.static_files("/files", &public);

    assert_eq!(get(&engine, "/files/ok.txt").body_text(), "fine");
    let res = get(&engine, "/files/../secret.txt");
    assert_eq!(res.status, 404);
    assert!(!res.body_text().contains("top secret"));
}

#[test]
fn test_static_files_in_group() {
    let dir = site();
    let mut engine = Engine::new();
    {
        let mut v1 = engine.group("/v1");
        v1.static_files("/static/", dir.path());
    }
    assert!(engine
        .router()
        .routes()
        .iter()
        .any(|(_, p)| &**p == "/v1/static/*filepath"));
    assert_eq!(get(&engine, "/v1/static/index.html").body_text(), "<h1>grove</h1>");
}
