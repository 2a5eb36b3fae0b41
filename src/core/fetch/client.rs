use std::path::Path;
use std::sync::Arc;

use futures_util::StreamExt;
use reqwest::Client;
use serde::de::DeserializeOwned;
use tokio::io::AsyncWriteExt;
use tracing::{debug, warn};

use crate::core::error::{LauncherError, LauncherResult};

/// Payload reported after each completed download.
#[derive(Debug, Clone, serde::Serialize)]
pub struct DownloadProgress {
    pub url: String,
    pub bytes_downloaded: u64,
    pub total_bytes: Option<u64>,
    pub file_name: String,
}

/// Caller-supplied progress callback, decoupled from any UI transport.
pub type ProgressSink = Arc<dyn Fn(DownloadProgress) + Send + Sync>;

/// Resilient single-file and JSON download primitive.
pub struct FileFetcher {
    client: Client,
    progress: Option<ProgressSink>,
}

impl FileFetcher {
    pub fn new(client: Client) -> Self {
        Self {
            client,
            progress: None,
        }
    }

    pub fn with_progress(mut self, sink: ProgressSink) -> Self {
        self.progress = Some(sink);
        self
    }

    // ── JSON fetch ──────────────────────────────────────

    /// GET a URL and deserialize the body as JSON.
    ///
    /// A non-2xx status is an error carrying the status code; a body that is
    /// not valid JSON is a `Json` error.
    pub async fn fetch_json<T: DeserializeOwned>(&self, url: &str) -> LauncherResult<T> {
        let response = self.client.get(url).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(LauncherError::DownloadFailed {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        let body = response.text().await?;
        let value = serde_json::from_str(&body)?;
        Ok(value)
    }

    // ── Single file download ────────────────────────────

    /// Download a single file to `dest`, streaming the body to disk.
    ///
    /// Creates parent directories as needed. On a non-2xx status or any
    /// transport/write error the partial file is removed; no partial files
    /// are ever left behind.
    pub async fn download_file(&self, url: &str, dest: &Path) -> LauncherResult<()> {
        if let Some(parent) = dest.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| LauncherError::Io {
                    path: parent.to_path_buf(),
                    source: e,
                })?;
        }

        let response = self.client.get(url).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(LauncherError::DownloadFailed {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        let total_bytes = response.content_length();

        // Stream to disk inside a block so the handle is dropped before any
        // cleanup — deleting an open file fails on Windows.
        let written = {
            let mut file =
                tokio::fs::File::create(dest)
                    .await
                    .map_err(|e| LauncherError::Io {
                        path: dest.to_path_buf(),
                        source: e,
                    })?;

            let mut stream = response.bytes_stream();
            let mut written: u64 = 0;
            let mut failure: Option<LauncherError> = None;

            while let Some(chunk) = stream.next().await {
                match chunk {
                    Ok(bytes) => {
                        if let Err(e) = file.write_all(&bytes).await {
                            failure = Some(LauncherError::Io {
                                path: dest.to_path_buf(),
                                source: e,
                            });
                            break;
                        }
                        written += bytes.len() as u64;
                    }
                    Err(e) => {
                        failure = Some(LauncherError::Http(e));
                        break;
                    }
                }
            }

            if failure.is_none() {
                if let Err(e) = file.flush().await {
                    failure = Some(LauncherError::Io {
                        path: dest.to_path_buf(),
                        source: e,
                    });
                }
            }

            drop(file);

            if let Some(err) = failure {
                let _ = tokio::fs::remove_file(dest).await;
                return Err(err);
            }

            written
        };

        if let Some(sink) = &self.progress {
            let file_name = dest
                .file_name()
                .map(|n| n.to_string_lossy().to_string())
                .unwrap_or_default();
            sink(DownloadProgress {
                url: url.to_string(),
                bytes_downloaded: written,
                total_bytes,
                file_name,
            });
        }

        debug!("Downloaded: {} -> {:?}", url, dest);
        Ok(())
    }

    // ── Mirror fallback ─────────────────────────────────

    /// Try each URL in order, returning on the first success.
    ///
    /// All URLs failing surfaces the last error.
    pub async fn download_with_fallback(&self, urls: &[String], dest: &Path) -> LauncherResult<()> {
        let mut last_error: Option<LauncherError> = None;
        for url in urls {
            match self.download_file(url, dest).await {
                Ok(()) => return Ok(()),
                Err(e) => {
                    warn!("Download from {} failed: {}", url, e);
                    last_error = Some(e);
                }
            }
        }
        Err(last_error
            .unwrap_or_else(|| LauncherError::Other("No download URLs provided".to_string())))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::routing::get;
    use axum::Router;
    use std::time::Duration;

    use crate::core::http::build_http_client;

    async fn spawn_server() -> String {
        let app = Router::new()
            .route("/manifest.json", get(|| async { r#"{"version":"1.0"}"# }))
            .route("/notjson", get(|| async { "certainly not json" }))
            .route("/file.bin", get(|| async { "mod jar payload" }));

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        format!("http://{}", addr)
    }

    fn fetcher() -> FileFetcher {
        FileFetcher::new(build_http_client(Duration::from_secs(5)).unwrap())
    }

    #[tokio::test]
    async fn fetch_json_parses_body() {
        let base = spawn_server().await;
        let value: serde_json::Value = fetcher()
            .fetch_json(&format!("{}/manifest.json", base))
            .await
            .unwrap();
        assert_eq!(value["version"], "1.0");
    }

    #[tokio::test]
    async fn fetch_json_surfaces_status_code() {
        let base = spawn_server().await;
        let err = fetcher()
            .fetch_json::<serde_json::Value>(&format!("{}/nope.json", base))
            .await
            .unwrap_err();
        assert!(err.to_string().contains("404"), "got: {}", err);
    }

    #[tokio::test]
    async fn fetch_json_rejects_non_json_body() {
        let base = spawn_server().await;
        let err = fetcher()
            .fetch_json::<serde_json::Value>(&format!("{}/notjson", base))
            .await
            .unwrap_err();
        assert!(matches!(err, LauncherError::Json(_)));
    }

    #[tokio::test]
    async fn download_file_writes_content_and_creates_parents() {
        let base = spawn_server().await;
        let dir = tempfile::tempdir().unwrap();
        let dest = dir.path().join("mods").join("nested").join("a.jar");

        fetcher()
            .download_file(&format!("{}/file.bin", base), &dest)
            .await
            .unwrap();

        let content = tokio::fs::read_to_string(&dest).await.unwrap();
        assert_eq!(content, "mod jar payload");
    }

    #[tokio::test]
    async fn download_file_leaves_no_partial_on_http_error() {
        let base = spawn_server().await;
        let dir = tempfile::tempdir().unwrap();
        let dest = dir.path().join("a.jar");

        let err = fetcher()
            .download_file(&format!("{}/missing.bin", base), &dest)
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            LauncherError::DownloadFailed { status: 404, .. }
        ));
        assert!(!dest.exists());
    }

    #[tokio::test]
    async fn download_with_fallback_uses_second_url() {
        let base = spawn_server().await;
        let dir = tempfile::tempdir().unwrap();
        let dest = dir.path().join("a.jar");

        let urls = vec![
            format!("{}/missing.bin", base),
            format!("{}/file.bin", base),
        ];
        fetcher().download_with_fallback(&urls, &dest).await.unwrap();

        let content = tokio::fs::read_to_string(&dest).await.unwrap();
        assert_eq!(content, "mod jar payload");
    }

    #[tokio::test]
    async fn download_with_fallback_reports_last_error() {
        let base = spawn_server().await;
        let dir = tempfile::tempdir().unwrap();
        let dest = dir.path().join("a.jar");

        let urls = vec![
            format!("{}/missing-one", base),
            format!("{}/missing-two", base),
        ];
        let err = fetcher()
            .download_with_fallback(&urls, &dest)
            .await
            .unwrap_err();
        assert!(err.to_string().contains("missing-two"));
        assert!(!dest.exists());
    }
}
