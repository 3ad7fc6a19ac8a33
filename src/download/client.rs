//! HTTP client wrapper for the manifest fetch and track downloads.
//!
//! This module provides the `HttpClient` struct which handles in-memory
//! fetches and streaming downloads with timeout configuration and error
//! handling.

use std::path::Path;
use std::time::Duration;

use futures_util::StreamExt;
use reqwest::Client;
use tokio::fs::File;
use tokio::io::{AsyncWriteExt, BufWriter};
use tracing::{debug, instrument};
use url::Url;

use super::constants::{CONNECT_TIMEOUT_SECS, READ_TIMEOUT_SECS};
use super::error::DownloadError;
use super::filename::partial_path;
use crate::user_agent;

/// HTTP client for fetching the manifest and streaming tracks to disk.
///
/// This client is designed to be created once and cloned into every download
/// task, taking advantage of connection pooling.
///
/// # Example
///
/// ```no_run
/// use playlist_core::HttpClient;
/// use std::path::Path;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let client = HttpClient::new();
/// let bytes = client
///     .download_to_path("https://example.com/track.m4a", Path::new("./download/track.m4a"))
///     .await?;
/// println!("Downloaded {bytes} bytes");
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct HttpClient {
    client: Client,
}

impl Default for HttpClient {
    fn default() -> Self {
        Self::new()
    }
}

impl HttpClient {
    /// Creates a new HTTP client with default timeouts.
    ///
    /// Default configuration:
    /// - Connect timeout: 30 seconds
    /// - Read timeout: 5 minutes
    /// - Gzip decompression: enabled
    ///
    /// # Panics
    ///
    /// Panics if the HTTP client builder fails to build with the static
    /// configuration. This should never happen in practice.
    #[must_use]
    pub fn new() -> Self {
        Self::new_with_timeouts(CONNECT_TIMEOUT_SECS, READ_TIMEOUT_SECS)
    }

    /// Creates a new HTTP client with explicit timeout values.
    ///
    /// # Panics
    ///
    /// Panics if the HTTP client builder fails to build with the supplied
    /// timeout configuration.
    #[must_use]
    #[allow(clippy::expect_used)]
    pub fn new_with_timeouts(connect_timeout_secs: u64, read_timeout_secs: u64) -> Self {
        let client = Client::builder()
            .connect_timeout(Duration::from_secs(connect_timeout_secs))
            .read_timeout(Duration::from_secs(read_timeout_secs))
            .gzip(true)
            .user_agent(user_agent::default_user_agent())
            .build()
            .expect("failed to build HTTP client with static configuration");
        Self { client }
    }

    /// Fetches `url` and reads the whole response body into memory.
    ///
    /// # Errors
    ///
    /// Returns `DownloadError` if the URL is invalid, the request fails, the
    /// server answers with a non-success status, or the body cannot be read.
    #[instrument(skip(self), fields(url = %url))]
    pub async fn fetch_bytes(&self, url: &str) -> Result<Vec<u8>, DownloadError> {
        let response = self.send_get(url).await?;
        let body = response
            .bytes()
            .await
            .map_err(|e| DownloadError::network(url, e))?;
        debug!(bytes = body.len(), "fetched response body");
        Ok(body.to_vec())
    }

    /// Downloads `url` to `save_path`, returning the number of bytes written.
    ///
    /// The body is streamed into a sibling `.part` file which is renamed onto
    /// `save_path` only once every byte has been flushed. On failure the
    /// partial file is removed, so `save_path` exists only for complete
    /// downloads.
    ///
    /// # Errors
    ///
    /// Returns `DownloadError` if:
    /// - The URL is invalid
    /// - The request fails (network error, timeout)
    /// - The server returns an error status (4xx, 5xx)
    /// - Creating, writing or renaming the file fails
    #[must_use = "download result contains the number of bytes written"]
    #[instrument(skip(self), fields(url = %url, path = %save_path.display()))]
    pub async fn download_to_path(
        &self,
        url: &str,
        save_path: &Path,
    ) -> Result<u64, DownloadError> {
        debug!("starting download");

        let response = self.send_get(url).await?;

        let part_path = partial_path(save_path);
        let mut file = File::create(&part_path)
            .await
            .map_err(|e| DownloadError::io(part_path.clone(), e))?;

        let stream_result = stream_to_file(&mut file, response, url, &part_path).await;
        drop(file);

        let bytes_written = match stream_result {
            Ok(bytes) => bytes,
            Err(e) => {
                debug!(path = %part_path.display(), "cleaning up partial file after error");
                remove_partial(&part_path).await;
                return Err(e);
            }
        };

        if let Err(e) = tokio::fs::rename(&part_path, save_path).await {
            remove_partial(&part_path).await;
            return Err(DownloadError::io(save_path.to_path_buf(), e));
        }

        debug!(bytes = bytes_written, "download complete");
        Ok(bytes_written)
    }

    async fn send_get(&self, url: &str) -> Result<reqwest::Response, DownloadError> {
        let parsed = Url::parse(url).map_err(|_| DownloadError::invalid_url(url))?;

        let response = self
            .client
            .get(parsed)
            .send()
            .await
            .map_err(|e| DownloadError::network(url, e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(DownloadError::http_status(url, status.as_u16()));
        }

        Ok(response)
    }
}

async fn remove_partial(part_path: &Path) {
    if let Err(e) = tokio::fs::remove_file(part_path).await {
        debug!(path = %part_path.display(), error = %e, "failed to remove partial file");
    }
}

/// Streams response body to file, returning bytes written.
///
/// This is extracted to enable cleanup on error in the caller.
async fn stream_to_file(
    file: &mut File,
    response: reqwest::Response,
    url: &str,
    file_path: &Path,
) -> Result<u64, DownloadError> {
    let mut writer = BufWriter::new(file);
    let mut stream = response.bytes_stream();
    let mut bytes_written: u64 = 0;

    while let Some(chunk_result) = stream.next().await {
        let chunk = chunk_result.map_err(|e| DownloadError::network(url, e))?;

        writer
            .write_all(&chunk)
            .await
            .map_err(|e| DownloadError::io(file_path.to_path_buf(), e))?;

        bytes_written += chunk.len() as u64;
    }

    // Ensure all data is flushed to disk
    writer
        .flush()
        .await
        .map_err(|e| DownloadError::io(file_path.to_path_buf(), e))?;

    Ok(bytes_written)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use tempfile::TempDir;
    use tokio::io::AsyncReadExt;
    use tokio::net::TcpListener;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;

    #[tokio::test]
    async fn test_fetch_bytes_returns_body() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/roster.xml"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<playlist/>"))
            .mount(&server)
            .await;

        let client = HttpClient::new();
        let body = client
            .fetch_bytes(&format!("{}/roster.xml", server.uri()))
            .await
            .unwrap();
        assert_eq!(body, b"<playlist/>");
    }

    #[tokio::test]
    async fn test_fetch_bytes_rejects_error_status() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(503))
            .mount(&server)
            .await;

        let client = HttpClient::new();
        let result = client.fetch_bytes(&format!("{}/roster.xml", server.uri())).await;
        assert!(matches!(
            result,
            Err(DownloadError::HttpStatus { status: 503, .. })
        ));
    }

    #[tokio::test]
    async fn test_fetch_bytes_rejects_invalid_url() {
        let client = HttpClient::new();
        let result = client.fetch_bytes("not a url").await;
        assert!(matches!(result, Err(DownloadError::InvalidUrl { .. })));
    }

    #[tokio::test]
    async fn test_download_to_path_writes_body_and_removes_partial() {
        let server = MockServer::start().await;
        let content = vec![7u8; 64 * 1024];
        Mock::given(method("GET"))
            .and(path("/track.m4a"))
            .respond_with(ResponseTemplate::new(200).set_body_bytes(content.clone()))
            .mount(&server)
            .await;

        let temp_dir = TempDir::new().unwrap();
        let save_path = temp_dir.path().join("track.m4a");
        let client = HttpClient::new();
        let bytes = client
            .download_to_path(&format!("{}/track.m4a", server.uri()), &save_path)
            .await
            .unwrap();

        assert_eq!(bytes, content.len() as u64);
        assert_eq!(std::fs::read(&save_path).unwrap(), content);
        assert!(!partial_path(&save_path).exists());
    }

    #[tokio::test]
    async fn test_download_to_path_truncates_existing_partial() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_bytes(b"fresh".to_vec()))
            .mount(&server)
            .await;

        let temp_dir = TempDir::new().unwrap();
        let save_path = temp_dir.path().join("track.m4a");
        std::fs::write(partial_path(&save_path), b"stale bytes from an aborted run").unwrap();

        let client = HttpClient::new();
        client
            .download_to_path(&format!("{}/track.m4a", server.uri()), &save_path)
            .await
            .unwrap();

        assert_eq!(std::fs::read(&save_path).unwrap(), b"fresh");
    }

    #[tokio::test]
    async fn test_download_to_path_error_status_leaves_no_file() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let temp_dir = TempDir::new().unwrap();
        let save_path = temp_dir.path().join("track.m4a");
        let client = HttpClient::new();
        let result = client
            .download_to_path(&format!("{}/track.m4a", server.uri()), &save_path)
            .await;

        assert!(matches!(
            result,
            Err(DownloadError::HttpStatus { status: 404, .. })
        ));
        assert!(!save_path.exists());
        assert!(!partial_path(&save_path).exists());
    }

    /// Serves one response that promises `declared` bytes, sends `sent`, then
    /// closes the connection.
    async fn spawn_truncating_server(declared: usize, sent: usize) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut request = Vec::new();
            let mut buf = [0u8; 1024];
            while !request.windows(4).any(|w| w == b"\r\n\r\n") {
                let n = socket.read(&mut buf).await.unwrap();
                if n == 0 {
                    return;
                }
                request.extend_from_slice(&buf[..n]);
            }
            let head = format!(
                "HTTP/1.1 200 OK\r\nContent-Type: audio/mp4\r\nContent-Length: {declared}\r\n\r\n"
            );
            socket.write_all(head.as_bytes()).await.unwrap();
            socket.write_all(&vec![1u8; sent]).await.unwrap();
            socket.shutdown().await.unwrap();
        });
        format!("http://{addr}/track.m4a")
    }

    #[tokio::test]
    async fn test_download_to_path_truncated_body_leaves_no_file() {
        let url = spawn_truncating_server(100_000, 5_000).await;

        let temp_dir = TempDir::new().unwrap();
        let save_path = temp_dir.path().join("track.m4a");
        let client = HttpClient::new();
        let result = client.download_to_path(&url, &save_path).await;

        assert!(matches!(result, Err(DownloadError::Network { .. })));
        assert!(!save_path.exists());
        assert!(!partial_path(&save_path).exists());
        assert_eq!(std::fs::read_dir(temp_dir.path()).unwrap().count(), 0);
    }

    #[tokio::test]
    async fn test_download_to_path_missing_directory_is_io_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_bytes(b"data".to_vec()))
            .mount(&server)
            .await;

        let temp_dir = TempDir::new().unwrap();
        let save_path = temp_dir.path().join("missing").join("track.m4a");
        let client = HttpClient::new();
        let result = client
            .download_to_path(&format!("{}/track.m4a", server.uri()), &save_path)
            .await;

        assert!(matches!(result, Err(DownloadError::Io { .. })));
        assert!(!save_path.exists());
    }
}
