#![allow(dead_code)]

pub mod harness {
    use grove::{Engine, Request, Response};
    use http::Method;

    /// Run a request through `engine` without a network
    pub fn call(engine: &Engine, method: Method, uri: &str) -> Response {
        engine.handle(Request::new(method, uri))
    }

    pub fn get(engine: &Engine, uri: &str) -> Response {
        call(engine, Method::GET, uri)
    }

    /// Parse a JSON body, panicking with the raw text on failure
    pub fn json_body(res: &Response) -> serde_json::Value {
        serde_json::from_slice(&res.body)
            .unwrap_or_else(|e| panic!("invalid JSON body {:?}: {e}", res.body_text()))
    }
}

pub mod test_server {
    use std::io::{Read, Write};
    use std::net::{SocketAddr, TcpListener, TcpStream};
    use std::sync::Once;
    use std::time::Duration;

    /// Ensures May coroutines are configured only once
    static MAY_INIT: Once = Once::new();

    pub fn setup_may_runtime() {
        MAY_INIT.call_once(|| {
            may::config().set_stack_size(0x8000);
        });
    }

    /// A local address that was free a moment ago
    pub fn free_addr() -> SocketAddr {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);
        addr
    }

    /// Write a raw request and read until the server goes quiet
    pub fn send_request(addr: &SocketAddr, req: &str) -> String {
        let mut stream = TcpStream::connect(addr).unwrap();
        stream.write_all(req.as_bytes()).unwrap();
        stream
            .set_read_timeout(Some(Duration::from_millis(200)))
            .unwrap();
        let mut buf = Vec::new();
        loop {
            let mut tmp = [0u8; 1024];
            match stream.read(&mut tmp) {
                Ok(0) => break,
                Ok(n) => buf.extend_from_slice(&tmp[..n]),
                Err(ref e)
                    if e.kind() == std::io::ErrorKind::WouldBlock
                        || e.kind() == std::io::ErrorKind::TimedOut =>
                {
                    break
                }
                Err(e) => panic!("read error: {:?}", e),
            }
        }
        String::from_utf8_lossy(&buf).to_string()
    }

    /// Raw response parts
    pub struct WireResponse {
        pub status: u16,
        pub headers: Vec<(String, String)>,
        pub body: String,
    }

    impl WireResponse {
        pub fn header(&self, name: &str) -> Option<&str> {
            self.headers
                .iter()
                .find(|(k, _)| k.eq_ignore_ascii_case(name))
                .map(|(_, v)| v.as_str())
        }
    }

    pub fn parse_response(resp: &str) -> WireResponse {
        let (head, body) = resp.split_once("\r\n\r\n").unwrap_or((resp, ""));
        let mut lines = head.lines();
        let status = lines
            .next()
            .and_then(|line| line.split_whitespace().nth(1))
            .and_then(|code| code.parse().ok())
            .unwrap_or(0);
        let headers = lines
            .filter_map(|line| line.split_once(':'))
            .map(|(k, v)| (k.trim().to_string(), v.trim().to_string()))
            .collect();
        WireResponse {
            status,
            headers,
            body: body.to_string(),
        }
    }
}
