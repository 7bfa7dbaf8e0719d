use std::io;
use std::sync::Arc;

use may_minihttp::HttpService;
use tracing::warn;

use super::request::parse_request;
use super::response::write_response;
use crate::context::Response;
use crate::engine::Engine;

/// `may_minihttp` service dispatching every request to an [`Engine`].
///
/// Cloned once per connection; all clones share the same engine.
#[derive(Clone)]
pub struct EngineService {
    engine: Arc<Engine>,
}

impl EngineService {
    #[must_use]
    pub fn new(engine: Arc<Engine>) -> Self {
        Self { engine }
    }

    #[must_use]
    pub fn engine(&self) -> &Engine {
        &self.engine
    }
}

impl HttpService for EngineService {
    fn call(
        &mut self,
        req: may_minihttp::Request,
        res: &mut may_minihttp::Response,
    ) -> io::Result<()> {
        let response = match parse_request(req) {
            Ok(request) => self.engine.handle(request),
            Err(e) => {
                warn!(error = %e, "Rejecting malformed request");
                bad_request(&e.to_string())
            }
        };
        write_response(res, response);
        Ok(())
    }
}

fn bad_request(message: &str) -> Response {
    let mut response = Response {
        status: 400,
        ..Response::default()
    };
    response.set_header("content-type", "application/json".to_string());
    response.body = serde_json::json!({ "message": message }).to_string().into_bytes();
    response
}
