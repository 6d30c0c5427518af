//! Local HTTP servers for exercising outbound clients in tests.

use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;

/// One canned HTTP response.
pub struct Reply {
    head: String,
    body: Vec<u8>,
    hold_open: bool,
}

impl Reply {
    pub fn new(status_line: &str, content_type: &str, body: impl Into<Vec<u8>>) -> Self {
        let body = body.into();
        Self {
            head: format!(
                "HTTP/1.1 {status_line}\r\nContent-Type: {content_type}\r\nContent-Length: {}\r\nConnection: close\r\n\r\n",
                body.len()
            ),
            body,
            hold_open: false,
        }
    }

    /// A close-delimited body whose socket is never closed, so a client that
    /// reads to the end would wait forever.
    pub fn endless(content_type: &str, body: impl Into<Vec<u8>>) -> Self {
        Self {
            head: format!("HTTP/1.1 200 OK\r\nContent-Type: {content_type}\r\nConnection: close\r\n\r\n"),
            body: body.into(),
            hold_open: true,
        }
    }
}

/// Serves `replies` to successive connections and returns the base URL.
pub async fn serve(replies: Vec<Reply>) -> String {
    let listener = match TcpListener::bind("127.0.0.1:0").await {
        Ok(listener) => listener,
        Err(err) => panic!("listener should bind: {err}"),
    };
    let addr = match listener.local_addr() {
        Ok(addr) => addr,
        Err(err) => panic!("listener should expose local addr: {err}"),
    };

    tokio::spawn(async move {
        for reply in replies {
            let Ok((mut socket, _)) = listener.accept().await else {
                return;
            };
            let mut read_buf = [0_u8; 1024];
            let _ = socket.read(&mut read_buf).await;
            let _ = socket.write_all(reply.head.as_bytes()).await;
            let _ = socket.write_all(&reply.body).await;
            if reply.hold_open {
                std::future::pending::<()>().await;
            }
        }
    });

    format!("http://{addr}/")
}

/// A client that ignores any proxy settings in the environment.
pub fn local_client() -> reqwest::Client {
    match reqwest::Client::builder().no_proxy().build() {
        Ok(client) => client,
        Err(err) => panic!("client should build: {err}"),
    }
}
