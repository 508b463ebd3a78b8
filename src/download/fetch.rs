//! Single file downloading.

use std::path::{Path, PathBuf};
use std::time::Duration;

use futures::StreamExt;
use reqwest::{header, Client, StatusCode};
use tokio::fs::{self, File};
use tokio::io::{AsyncWriteExt, BufWriter};
use tokio::time::sleep;

use crate::error::{Error, Result};
use crate::fs::sanitize_name;
use crate::retry::RetryPolicy;

/// Size of the write buffer between the response stream and disk.
pub const CHUNK_SIZE: usize = 8192;

/// Result of one fetch. Failures are reported, never raised.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchOutcome {
    /// File written to `path`.
    Downloaded { path: PathBuf, bytes: u64 },
    /// The request or write failed; nothing was left at the destination.
    Failed { reason: String },
    /// The URL was not an HTTP(S) URL; no request was made.
    Rejected,
}

impl FetchOutcome {
    pub fn is_downloaded(&self) -> bool {
        matches!(self, FetchOutcome::Downloaded { .. })
    }
}

/// Download `url` into `dest_dir/sanitize_name(display_name)`.
///
/// An existing file of the same name is overwritten. The outcome is logged
/// here; callers only need it for bookkeeping.
pub async fn fetch_file(
    client: &Client,
    url: &str,
    display_name: &str,
    dest_dir: &Path,
    retry: RetryPolicy,
) -> FetchOutcome {
    if !url.starts_with("http") {
        tracing::error!("Invalid URL: {}", url);
        return FetchOutcome::Rejected;
    }

    let dest_path = dest_dir.join(sanitize_name(display_name));

    match download_to(client, url, &dest_path, retry).await {
        Ok(bytes) => {
            tracing::info!("Successfully downloaded: {}", dest_path.display());
            FetchOutcome::Downloaded {
                path: dest_path,
                bytes,
            }
        }
        Err(e) => {
            tracing::error!("Failed to download {}: {}", url, e);
            FetchOutcome::Failed {
                reason: e.to_string(),
            }
        }
    }
}

/// Request `url`, retrying on HTTP 429, and stream a successful body to disk.
async fn download_to(
    client: &Client,
    url: &str,
    dest_path: &Path,
    retry: RetryPolicy,
) -> Result<u64> {
    let mut retries = 0;
    let response = loop {
        let response = client.get(url).send().await?;
        let status = response.status();

        if status.is_success() {
            break response;
        }

        if status == StatusCode::TOO_MANY_REQUESTS && retry.should_retry(retries) {
            retries += 1;
            let hint = response
                .headers()
                .get(header::RETRY_AFTER)
                .and_then(|v| v.to_str().ok())
                .and_then(|v| v.trim().parse::<u64>().ok())
                .map(Duration::from_secs);
            sleep(retry.delay_for(retries, hint)).await;
            continue;
        }

        return Err(Error::Download(format!("HTTP {}", status)));
    };

    let part_path = part_path_for(dest_path);
    match stream_to_file(response, &part_path).await {
        Ok(bytes) => {
            if let Err(e) = fs::rename(&part_path, dest_path).await {
                let _ = fs::remove_file(&part_path).await;
                return Err(e.into());
            }
            Ok(bytes)
        }
        Err(e) => {
            let _ = fs::remove_file(&part_path).await;
            Err(e)
        }
    }
}

/// Write the response body incrementally through a fixed-size buffer.
async fn stream_to_file(response: reqwest::Response, path: &Path) -> Result<u64> {
    let file = File::create(path).await?;
    let mut writer = BufWriter::with_capacity(CHUNK_SIZE, file);
    let mut stream = response.bytes_stream();
    let mut written: u64 = 0;

    while let Some(chunk) = stream.next().await {
        let chunk = chunk.map_err(|e| Error::Download(format!("Stream error: {}", e)))?;
        writer.write_all(&chunk).await?;
        written += chunk.len() as u64;
    }

    writer.flush().await?;
    writer.into_inner().sync_all().await?;

    Ok(written)
}

/// Hidden sibling the body is streamed into before the final rename.
fn part_path_for(dest_path: &Path) -> PathBuf {
    let name = dest_path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    dest_path.with_file_name(format!(".{}.{}.part", name, uuid::Uuid::new_v4()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn entries(dir: &Path) -> Vec<String> {
        let mut names: Vec<_> = std::fs::read_dir(dir)
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        names.sort();
        names
    }

    #[tokio::test]
    async fn test_non_http_url_is_rejected() {
        let dir = TempDir::new().unwrap();
        let outcome = fetch_file(
            &Client::new(),
            "ftp://example.com/file.pdf",
            "file.pdf",
            dir.path(),
            RetryPolicy::none(),
        )
        .await;

        assert_eq!(outcome, FetchOutcome::Rejected);
        assert!(entries(dir.path()).is_empty());
    }

    #[tokio::test]
    async fn test_not_found_creates_nothing() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/missing.pdf"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let dir = TempDir::new().unwrap();
        let outcome = fetch_file(
            &Client::new(),
            &format!("{}/missing.pdf", server.uri()),
            "missing.pdf",
            dir.path(),
            RetryPolicy::none(),
        )
        .await;

        match outcome {
            FetchOutcome::Failed { reason } => assert!(reason.contains("404")),
            other => panic!("expected failure, got {:?}", other),
        }
        assert!(entries(dir.path()).is_empty());
    }

    #[tokio::test]
    async fn test_body_written_exactly() {
        let body: Vec<u8> = (0..50_000u32).map(|i| (i % 251) as u8).collect();
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/files/1/download"))
            .respond_with(ResponseTemplate::new(200).set_body_bytes(body.clone()))
            .mount(&server)
            .await;

        let dir = TempDir::new().unwrap();
        let outcome = fetch_file(
            &Client::new(),
            &format!("{}/files/1/download", server.uri()),
            "lecture: 1.bin",
            dir.path(),
            RetryPolicy::none(),
        )
        .await;

        let expected = dir.path().join("lecture_ 1.bin");
        assert_eq!(
            outcome,
            FetchOutcome::Downloaded {
                path: expected.clone(),
                bytes: body.len() as u64
            }
        );
        assert_eq!(std::fs::read(&expected).unwrap(), body);
        assert_eq!(entries(dir.path()), vec!["lecture_ 1.bin"]);
    }

    #[tokio::test]
    async fn test_existing_file_is_overwritten() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/a"))
            .respond_with(ResponseTemplate::new(200).set_body_string("new"))
            .mount(&server)
            .await;

        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("a.txt"), "old contents").unwrap();

        let outcome = fetch_file(
            &Client::new(),
            &format!("{}/a", server.uri()),
            "a.txt",
            dir.path(),
            RetryPolicy::none(),
        )
        .await;

        assert!(outcome.is_downloaded());
        assert_eq!(std::fs::read_to_string(dir.path().join("a.txt")).unwrap(), "new");
    }

    #[tokio::test]
    async fn test_too_many_requests_is_retried() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/busy"))
            .respond_with(ResponseTemplate::new(429))
            .up_to_n_times(1)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/busy"))
            .respond_with(ResponseTemplate::new(200).set_body_string("ok"))
            .mount(&server)
            .await;

        let dir = TempDir::new().unwrap();
        let outcome = fetch_file(
            &Client::new(),
            &format!("{}/busy", server.uri()),
            "busy.txt",
            dir.path(),
            RetryPolicy::new(1, Duration::ZERO),
        )
        .await;

        assert!(outcome.is_downloaded());
    }

    #[tokio::test]
    async fn test_missing_destination_dir_fails_cleanly() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_string("x"))
            .mount(&server)
            .await;

        let dir = TempDir::new().unwrap();
        let outcome = fetch_file(
            &Client::new(),
            &format!("{}/x", server.uri()),
            "x.txt",
            &dir.path().join("does-not-exist"),
            RetryPolicy::none(),
        )
        .await;

        assert!(matches!(outcome, FetchOutcome::Failed { .. }));
    }
}
