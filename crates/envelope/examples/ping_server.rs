use bytes::BytesMut;
use micro_envelope::{Envelope, ResponseWriter};
use serde_json::Value;
use std::error::Error;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};
use tracing::{error, info, warn, Level};
use tracing_subscriber::FmtSubscriber;

const MAX_HEADER_BYTES: usize = 8 * 1024;
const MAX_HEADER_NUM: usize = 64;

#[tokio::main]
async fn main() {
    let subscriber = FmtSubscriber::builder().with_max_level(Level::DEBUG).finish();
    tracing::subscriber::set_global_default(subscriber).expect("setting default subscriber failed");

    info!(port = 8080, "start listening");
    let tcp_listener = match TcpListener::bind("127.0.0.1:8080").await {
        Ok(tcp_listener) => tcp_listener,
        Err(e) => {
            error!(cause = %e, "bind server error");
            return;
        }
    };

    loop {
        let (tcp_stream, _remote_addr) = match tcp_listener.accept().await {
            Ok(stream_and_addr) => stream_and_addr,
            Err(e) => {
                warn!(cause = %e, "failed to accept");
                continue;
            }
        };

        tokio::spawn(async move {
            if let Err(e) = handle(tcp_stream).await {
                error!(cause = %e, "failed to respond, connection shutdown");
            }
        });
    }
}

async fn handle(mut tcp_stream: TcpStream) -> Result<(), Box<dyn Error + Send + Sync>> {
    let (method, path) = read_request_line(&mut tcp_stream).await?;
    info!(%method, %path, "receive request");

    let envelope = Envelope::new(ResponseWriter::new(Vec::new()));
    let envelope = match (method.as_str(), path.as_str()) {
        ("GET", "/ping") => envelope.set_result(200, Value::from("pong")),
        ("GET", _) => envelope.set_result(404, Value::Null),
        _ => envelope.set_result(405, Value::Null).with_error_details(format!("method {method} is not supported")),
    };

    let response = envelope.output()?.into_inner();
    tcp_stream.write_all(&response).await?;
    tcp_stream.shutdown().await?;
    Ok(())
}

/// Reads until the request head is complete and returns its method and path.
async fn read_request_line(tcp_stream: &mut TcpStream) -> Result<(String, String), Box<dyn Error + Send + Sync>> {
    let mut buf = BytesMut::with_capacity(MAX_HEADER_BYTES);
    loop {
        if tcp_stream.read_buf(&mut buf).await? == 0 {
            return Err("connection closed before the request head".into());
        }

        let mut headers = [httparse::EMPTY_HEADER; MAX_HEADER_NUM];
        let mut request = httparse::Request::new(&mut headers);
        match request.parse(&buf)? {
            httparse::Status::Complete(_) => {
                let method = request.method.unwrap_or_default().to_owned();
                let path = request.path.unwrap_or_default().to_owned();
                return Ok((method, path));
            }
            httparse::Status::Partial if buf.len() >= MAX_HEADER_BYTES => {
                return Err(format!("request head exceeds {MAX_HEADER_BYTES} bytes").into());
            }
            httparse::Status::Partial => {}
        }
    }
}
