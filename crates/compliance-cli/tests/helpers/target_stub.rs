// crates/compliance-cli/tests/helpers/target_stub.rs
// ============================================================================
// Module: Disclosure Target Stub
// Description: Minimal HTTP target emulating the public routing contract.
// Purpose: Exercise the reqwest transport and matrix runner end to end.
// Dependencies: axum, compliance-core, tokio
// ============================================================================

use std::net::TcpListener as StdTcpListener;
use std::sync::Arc;
use std::sync::Mutex;
use std::thread;

use axum::Router;
use axum::extract::State;
use axum::http::HeaderMap;
use axum::http::HeaderName;
use axum::http::HeaderValue;
use axum::http::Method;
use axum::http::StatusCode;
use axum::http::Uri;
use axum::http::header::CONTENT_TYPE;
use axum::response::IntoResponse;
use axum::response::Response;
use compliance_core::SECURITY_HEADERS;
use tokio::runtime::Builder;
use tokio::sync::oneshot;

/// Behaviour knobs for the stub target.
#[derive(Clone, Debug)]
pub struct TargetBehavior {
    /// Security headers (by documented name) the stub leaves out.
    pub omit_headers: Vec<&'static str>,
    /// JSON body served at `/public`.
    pub public_body: String,
}

impl Default for TargetBehavior {
    fn default() -> Self {
        Self {
            omit_headers: Vec::new(),
            public_body: r#"{"name":"Disclosure Node","version":"5.0"}"#.to_string(),
        }
    }
}

#[derive(Clone)]
struct TargetState {
    behavior: Arc<TargetBehavior>,
    requests: Arc<Mutex<Vec<(String, String)>>>,
}

/// Handle for the stub target server.
pub struct TargetStubHandle {
    base_url: String,
    shutdown: Option<oneshot::Sender<()>>,
    join: Option<thread::JoinHandle<()>>,
    requests: Arc<Mutex<Vec<(String, String)>>>,
}

impl TargetStubHandle {
    /// Returns the target base URL.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Returns captured (method, path) pairs.
    pub fn requests(&self) -> Vec<(String, String)> {
        self.requests.lock().map_or_else(|_| Vec::new(), |entries| entries.clone())
    }
}

impl Drop for TargetStubHandle {
    fn drop(&mut self) {
        if let Some(shutdown) = self.shutdown.take() {
            let _ = shutdown.send(());
        }
        if let Some(join) = self.join.take() {
            let _ = join.join();
        }
    }
}

/// Spawn a stub target that serves every security header.
pub fn spawn_compliant_target() -> Result<TargetStubHandle, String> {
    spawn_target(TargetBehavior::default())
}

/// Spawn a stub target with custom behaviour.
pub fn spawn_target(behavior: TargetBehavior) -> Result<TargetStubHandle, String> {
    let listener = StdTcpListener::bind("127.0.0.1:0")
        .map_err(|err| format!("target stub bind failed: {err}"))?;
    listener
        .set_nonblocking(true)
        .map_err(|err| format!("target stub listener nonblocking failed: {err}"))?;
    let addr =
        listener.local_addr().map_err(|err| format!("target stub local addr failed: {err}"))?;
    let base_url = format!("http://{addr}");

    let requests = Arc::new(Mutex::new(Vec::new()));
    let state = TargetState {
        behavior: Arc::new(behavior),
        requests: Arc::clone(&requests),
    };
    let app = Router::new().fallback(handle_request).with_state(state);
    let (shutdown_tx, shutdown_rx) = oneshot::channel();
    let join = thread::spawn(move || {
        let Ok(runtime) = Builder::new_current_thread().enable_all().build() else {
            return;
        };
        runtime.block_on(async move {
            let Ok(listener) = tokio::net::TcpListener::from_std(listener) else {
                return;
            };
            let server = axum::serve(listener, app).with_graceful_shutdown(async move {
                let _ = shutdown_rx.await;
            });
            let _ = server.await;
        });
    });
    Ok(TargetStubHandle {
        base_url,
        shutdown: Some(shutdown_tx),
        join: Some(join),
        requests,
    })
}

async fn handle_request(State(state): State<TargetState>, method: Method, uri: Uri) -> Response {
    let path = uri.path().to_string();
    if let Ok(mut requests) = state.requests.lock() {
        requests.push((method.as_str().to_string(), path.clone()));
    }
    let reads = method == Method::GET || method == Method::DELETE;
    let (status, content_type, body) = if path.contains('@') {
        not_found()
    } else if !reads {
        (StatusCode::METHOD_NOT_ALLOWED, None, String::new())
    } else {
        match path.as_str() {
            "/" | "/index.html" => (StatusCode::OK, Some("text/html"), "<html></html>".to_string()),
            "/public" => {
                (StatusCode::OK, Some("application/json"), state.behavior.public_body.clone())
            }
            _ => not_found(),
        }
    };

    let mut headers = HeaderMap::new();
    for header in SECURITY_HEADERS {
        if state.behavior.omit_headers.contains(&header.name) {
            continue;
        }
        if let Ok(name) = HeaderName::from_bytes(header.name.as_bytes()) {
            headers.insert(name, HeaderValue::from_static(header.value));
        }
    }
    if let Some(content_type) = content_type {
        headers.insert(CONTENT_TYPE, HeaderValue::from_static(content_type));
    }
    (status, headers, body).into_response()
}

fn not_found() -> (StatusCode, Option<&'static str>, String) {
    (StatusCode::NOT_FOUND, Some("text/html; charset=UTF-8"), "<h1>Not Found</h1>".to_string())
}
