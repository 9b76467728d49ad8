//! A throwaway HTTP server that records the requests it receives.

use std::sync::{Arc, Mutex};

use axum::{
    Router,
    extract::{FromRequest, Multipart, Request, State},
    http::{StatusCode, header},
    response::{IntoResponse, Response},
};
use tokio::net::TcpListener;

/// What the server saw of one request.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct RecordedRequest {
    pub method: String,
    pub path: String,
    pub query: Option<String>,
    pub cookie: Option<String>,
    pub content_type: String,
    /// The text fields of a multipart body, in order.
    pub fields: Vec<(String, String)>,
}

#[derive(Clone)]
struct ServerState {
    status: StatusCode,
    body: String,
    requests: Arc<Mutex<Vec<RecordedRequest>>>,
}

pub(crate) struct TestServer {
    /// The server's URL, ending with `/`.
    pub base_url: String,
    requests: Arc<Mutex<Vec<RecordedRequest>>>,
}

impl TestServer {
    pub(crate) fn requests(&self) -> Vec<RecordedRequest> {
        self.requests.lock().unwrap().clone()
    }
}

/// Start a server on a random local port that answers every request with
/// `status` and `body`, and sets a `session` cookie.
pub(crate) async fn spawn_test_server(status: StatusCode, body: &str) -> TestServer {
    let requests = Arc::new(Mutex::new(Vec::new()));
    let state = ServerState {
        status,
        body: body.to_owned(),
        requests: requests.clone(),
    };
    let router = Router::new().fallback(record_request).with_state(state);

    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Could not bind test server");
    let address = listener.local_addr().expect("Could not get server address");

    tokio::spawn(async move {
        axum::serve(listener, router)
            .await
            .expect("Test server failed");
    });

    TestServer {
        base_url: format!("http://{address}/"),
        requests,
    }
}

/// A URL on a local port that nothing is listening on.
pub(crate) async fn unused_local_url() -> String {
    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Could not bind port");
    let address = listener.local_addr().expect("Could not get address");
    drop(listener);

    format!("http://{address}/")
}

async fn record_request(State(state): State<ServerState>, request: Request) -> Response {
    let (content_type, cookie) = {
        let headers = request.headers();
        let header_text = |name: header::HeaderName| {
            headers
                .get(name)
                .and_then(|value| value.to_str().ok())
                .map(str::to_owned)
        };

        (
            header_text(header::CONTENT_TYPE).unwrap_or_default(),
            header_text(header::COOKIE),
        )
    };
    let method = request.method().to_string();
    let path = request.uri().path().to_owned();
    let query = request.uri().query().map(str::to_owned);

    let mut fields = Vec::new();
    let is_multipart = content_type.starts_with("multipart/form-data");

    if is_multipart {
        let mut multipart = Multipart::from_request(request, &state)
            .await
            .expect("Could not read multipart body");

        while let Some(field) = multipart.next_field().await.expect("Bad multipart field") {
            let name = field.name().unwrap_or_default().to_owned();
            let value = field.text().await.expect("Multipart field is not text");
            fields.push((name, value));
        }
    }

    state.requests.lock().unwrap().push(RecordedRequest {
        method,
        path,
        query,
        cookie,
        content_type,
        fields,
    });

    (
        state.status,
        [(header::SET_COOKIE, "session=test-session; Path=/")],
        state.body.clone(),
    )
        .into_response()
}
