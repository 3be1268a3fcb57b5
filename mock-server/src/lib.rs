use std::collections::BTreeMap;
use std::io::{self, Read, Write};
use std::net::{SocketAddr, TcpListener as StdTcpListener};
use std::thread::{self, JoinHandle};

use axum::{
    extract::Path,
    http::{HeaderMap, StatusCode},
    routing::{get, post},
    Form, Json, Router,
};
use tokio::net::TcpListener;

pub fn app() -> Router {
    Router::new()
        .route("/", get(index))
        .route("/hello", get(hello))
        .route("/echo", post(echo))
        .route("/headers", get(headers))
        .route("/status/{code}", get(status))
}

pub async fn run(listener: TcpListener) -> io::Result<()> {
    axum::serve(listener, app()).await
}

/// Start the app on a random local port in a background thread with its own
/// runtime. Returns the bound address.
pub fn spawn_background() -> io::Result<SocketAddr> {
    let std_listener = StdTcpListener::bind("127.0.0.1:0")?;
    let addr = std_listener.local_addr()?;
    std_listener.set_nonblocking(true)?;

    thread::spawn(move || {
        let rt = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .expect("mock server runtime");
        rt.block_on(async {
            let listener = TcpListener::from_std(std_listener).expect("tokio listener");
            run(listener).await
        })
    });

    Ok(addr)
}

/// Serve exactly one connection with a scripted reply.
///
/// Reads the request head (and a `Content-Length` body if announced), then
/// writes each chunk of `reply` with a flush in between and closes the
/// socket. The join handle yields the request bytes as text; the responder
/// thread panics if the client goes away before the reply is written.
pub fn serve_raw(reply: Vec<Vec<u8>>) -> io::Result<(SocketAddr, JoinHandle<String>)> {
    let listener = StdTcpListener::bind("127.0.0.1:0")?;
    let addr = listener.local_addr()?;

    let handle = thread::spawn(move || {
        let (mut stream, _) = listener.accept().expect("accept");
        let request = read_request(&mut stream);
        for chunk in reply {
            stream.write_all(&chunk).expect("write reply");
            stream.flush().expect("flush reply");
        }
        request
    });

    Ok((addr, handle))
}

fn read_request(stream: &mut impl Read) -> String {
    let mut request = Vec::new();
    let mut buf = [0u8; 512];

    let head_end = loop {
        if let Some(pos) = find(&request, b"\r\n\r\n") {
            break pos + 4;
        }
        match stream.read(&mut buf) {
            Ok(0) | Err(_) => return String::from_utf8_lossy(&request).into_owned(),
            Ok(n) => request.extend_from_slice(&buf[..n]),
        }
    };

    let head = String::from_utf8_lossy(&request[..head_end]).into_owned();
    let body_len = head
        .lines()
        .filter_map(|line| line.split_once(':'))
        .find(|(name, _)| name.trim().eq_ignore_ascii_case("content-length"))
        .and_then(|(_, value)| value.trim().parse::<usize>().ok())
        .unwrap_or(0);

    while request.len() < head_end + body_len {
        match stream.read(&mut buf) {
            Ok(0) | Err(_) => break,
            Ok(n) => request.extend_from_slice(&buf[..n]),
        }
    }

    String::from_utf8_lossy(&request).into_owned()
}

fn find(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    haystack.windows(needle.len()).position(|w| w == needle)
}

async fn index() -> &'static str {
    "ok"
}

async fn hello() -> &'static str {
    "Hello, world!"
}

async fn echo(Form(params): Form<BTreeMap<String, String>>) -> Json<BTreeMap<String, String>> {
    Json(params)
}

/// Request headers as a JSON object, names lowercased.
async fn headers(headers: HeaderMap) -> Json<BTreeMap<String, String>> {
    Json(
        headers
            .iter()
            .map(|(name, value)| {
                (
                    name.as_str().to_string(),
                    String::from_utf8_lossy(value.as_bytes()).into_owned(),
                )
            })
            .collect(),
    )
}

async fn status(Path(code): Path<u16>) -> Result<(StatusCode, String), StatusCode> {
    let status = StatusCode::from_u16(code).map_err(|_| StatusCode::BAD_REQUEST)?;
    let reason = status.canonical_reason().unwrap_or("Unknown");
    Ok((status, format!("{code} {reason}")))
}
