use std::sync::{Arc, Mutex, mpsc};
use std::thread;
use std::time::Duration;

use serde_json::Value;

/// A request the stub received.
#[allow(dead_code)]
#[derive(Debug, Clone)]
pub struct Recorded {
    pub method: String,
    pub url: String,
    pub authorization: Option<String>,
    pub cache_control: Option<String>,
    pub body: String,
}

/// Canned JSON responses keyed by request path (query string ignored).
/// Unknown paths answer 404.
pub struct CmsStub {
    pub base_url: String,
    requests: Arc<Mutex<Vec<Recorded>>>,
    shutdown_tx: Option<mpsc::Sender<()>>,
    handle: Option<thread::JoinHandle<()>>,
}

#[allow(dead_code)]
impl CmsStub {
    pub fn spawn(routes: Vec<(&str, u16, Value)>) -> Self {
        let routes = routes
            .into_iter()
            .map(|(path, status, body)| (path.to_owned(), status, body))
            .collect::<Vec<_>>();
        let server = tiny_http::Server::http("127.0.0.1:0").expect("start cms stub server");
        let addr = server.server_addr();
        let base_url = format!("http://{addr}");

        let requests = Arc::new(Mutex::new(Vec::new()));
        let recorded = Arc::clone(&requests);
        let (shutdown_tx, shutdown_rx) = mpsc::channel::<()>();

        let handle = thread::spawn(move || {
            loop {
                if shutdown_rx.try_recv().is_ok() {
                    break;
                }

                let mut request = match server.recv_timeout(Duration::from_millis(50)) {
                    Ok(Some(req)) => req,
                    Ok(None) => continue,
                    Err(_) => break,
                };

                let header = |name: &str| {
                    request
                        .headers()
                        .iter()
                        .find(|h| h.field.to_string().eq_ignore_ascii_case(name))
                        .map(|h| h.value.as_str().to_owned())
                };
                let authorization = header("Authorization");
                let cache_control = header("Cache-Control");
                let url = request.url().to_owned();
                let method = request.method().to_string();
                let mut body = String::new();
                let _ = request.as_reader().read_to_string(&mut body);
                recorded.lock().expect("lock recorded requests").push(Recorded {
                    method,
                    url: url.clone(),
                    authorization,
                    cache_control,
                    body,
                });

                let path = url.split('?').next().unwrap_or_default();
                let (status, body) = match routes.iter().find(|(p, _, _)| p == path) {
                    Some((_, status, body)) => (*status, body.to_string()),
                    None => (
                        404,
                        serde_json::json!({
                            "data": null,
                            "error": { "status": 404, "name": "NotFoundError", "message": "Not Found" }
                        })
                        .to_string(),
                    ),
                };
                let content_type =
                    tiny_http::Header::from_bytes(&b"Content-Type"[..], &b"application/json"[..])
                        .expect("build header");
                let response = tiny_http::Response::from_string(body)
                    .with_status_code(status)
                    .with_header(content_type);
                let _ = request.respond(response);
            }
        });

        Self {
            base_url,
            requests,
            shutdown_tx: Some(shutdown_tx),
            handle: Some(handle),
        }
    }

    pub fn requests(&self) -> Vec<Recorded> {
        self.requests.lock().expect("lock recorded requests").clone()
    }

    /// Recorded requests whose path is `path`.
    pub fn requests_to(&self, path: &str) -> Vec<Recorded> {
        self.requests()
            .into_iter()
            .filter(|r| r.url.split('?').next() == Some(path))
            .collect()
    }
}

impl Drop for CmsStub {
    fn drop(&mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }
}
