//! Shared helpers for integration tests: manifest documents and track mocks.

#![allow(dead_code)]

use std::sync::{Arc, Mutex};
use std::time::Instant;

use playlist_core::Track;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, Respond, ResponseTemplate};

/// Builds a manifest document listing `tracks` in order.
pub fn manifest_xml(tracks: &[Track]) -> String {
    let mut xml = String::from("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n<playlist version=\"1\">\n  <trackList>\n");
    for track in tracks {
        xml.push_str(&format!(
            "    <track><creator>{}</creator><title>{}</title><location>{}</location></track>\n",
            track.creator, track.title, track.location
        ));
    }
    xml.push_str("  </trackList>\n</playlist>\n");
    xml
}

/// Builds `count` tracks named `Track 0`, `Track 1`, ... served by `server`
/// under `/media/<index>.m4a`.
pub fn numbered_tracks(server: &MockServer, count: usize) -> Vec<Track> {
    (0..count)
        .map(|i| {
            Track::new(
                "Various",
                format!("Track {i}"),
                format!("{}/media/{i}.m4a", server.uri()),
            )
        })
        .collect()
}

/// Body served for track `index`.
pub fn track_body(index: usize) -> Vec<u8> {
    format!("media bytes for track {index}").into_bytes()
}

/// Serves the manifest for `tracks` at `/roster.xml`.
pub async fn mount_manifest(server: &MockServer, tracks: &[Track]) {
    Mock::given(method("GET"))
        .and(path("/roster.xml"))
        .respond_with(ResponseTemplate::new(200).set_body_string(manifest_xml(tracks)))
        .mount(server)
        .await;
}

/// Serves track `index`, expecting exactly `expected_requests` requests.
pub async fn mount_track(server: &MockServer, index: usize, expected_requests: u64) {
    Mock::given(method("GET"))
        .and(path(format!("/media/{index}.m4a")))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(track_body(index)))
        .expect(expected_requests)
        .mount(server)
        .await;
}

/// Responder that records when each request arrived.
#[derive(Clone)]
pub struct ArrivalRecorder {
    arrivals: Arc<Mutex<Vec<Instant>>>,
    template: ResponseTemplate,
}

impl ArrivalRecorder {
    pub fn new(template: ResponseTemplate) -> Self {
        Self {
            arrivals: Arc::new(Mutex::new(Vec::new())),
            template,
        }
    }

    /// Arrival times in the order requests were received.
    pub fn arrivals(&self) -> Vec<Instant> {
        self.arrivals.lock().unwrap().clone()
    }
}

impl Respond for ArrivalRecorder {
    fn respond(&self, _request: &wiremock::Request) -> ResponseTemplate {
        self.arrivals.lock().unwrap().push(Instant::now());
        self.template.clone()
    }
}

/// Raw HTTP server for `body` whose first response declares the full length
/// but closes the connection after `cut_at` bytes. Later connections get the
/// whole body. Returns the URL to request.
pub async fn spawn_truncate_once_server(body: Vec<u8>, cut_at: usize) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        let mut first = true;
        while let Ok((mut socket, _)) = listener.accept().await {
            if !read_request_head(&mut socket).await {
                continue;
            }
            let sent = if first { cut_at.min(body.len()) } else { body.len() };
            first = false;
            let head = format!(
                "HTTP/1.1 200 OK\r\nContent-Length: {}\r\nConnection: close\r\n\r\n",
                body.len()
            );
            let _ = socket.write_all(head.as_bytes()).await;
            let _ = socket.write_all(&body[..sent]).await;
            let _ = socket.shutdown().await;
        }
    });
    format!("http://{addr}/media/flaky.m4a")
}

async fn read_request_head(socket: &mut TcpStream) -> bool {
    let mut request = Vec::new();
    let mut buf = [0u8; 1024];
    while !request.windows(4).any(|w| w == b"\r\n\r\n") {
        match socket.read(&mut buf).await {
            Ok(0) | Err(_) => return false,
            Ok(n) => request.extend_from_slice(&buf[..n]),
        }
    }
    true
}
