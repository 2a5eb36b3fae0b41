use std::path::PathBuf;
use std::sync::Arc;

use serde::Serialize;
use serde_json::Value;
use tracing::{info, warn};

use super::manifest::Manifest;
use crate::core::error::{LauncherError, LauncherResult};
use crate::core::fetch::FileFetcher;

/// Last fully-synced manifest, persisted inside the modpack root.
pub const LOCAL_MANIFEST_FILE: &str = "manifest.local.json";

#[derive(Debug, Clone, Serialize)]
pub struct UpdateCheck {
    pub needs_update: bool,
    pub remote_version: String,
    pub local_version: Option<String>,
}

/// Synchronizes a modpack directory against a remote manifest.
///
/// One `sync` call runs: mirror fetch → snapshot load → version diff →
/// sequential delta download → snapshot commit. A single download failure
/// aborts the sync; already-downloaded files stay on disk and the stale
/// snapshot makes the next attempt retry everything it needs to.
pub struct ManifestSyncEngine {
    fetcher: Arc<FileFetcher>,
    manifest_urls: Vec<String>,
    modpack_root: PathBuf,
}

struct RemoteManifest {
    manifest: Manifest,
    raw: Value,
    base_url: String,
}

impl ManifestSyncEngine {
    pub fn new(fetcher: Arc<FileFetcher>, manifest_urls: Vec<String>, modpack_root: PathBuf) -> Self {
        Self {
            fetcher,
            manifest_urls,
            modpack_root,
        }
    }

    pub fn snapshot_path(&self) -> PathBuf {
        self.modpack_root.join(LOCAL_MANIFEST_FILE)
    }

    /// Read the last-synced manifest snapshot. Absent or unparsable means
    /// "no local version", which forces a full sync; it is never an error.
    pub async fn load_snapshot(&self) -> Option<Manifest> {
        let raw = tokio::fs::read_to_string(self.snapshot_path()).await.ok()?;
        match serde_json::from_str(&raw) {
            Ok(manifest) => Some(manifest),
            Err(e) => {
                warn!("Unparsable local manifest snapshot: {}", e);
                None
            }
        }
    }

    /// Compare remote and local versions without downloading anything.
    pub async fn check_update(&self) -> LauncherResult<UpdateCheck> {
        let remote = self.fetch_remote().await?;
        let local_version = self.load_snapshot().await.map(|m| m.version);
        Ok(UpdateCheck {
            needs_update: local_version.as_deref() != Some(remote.manifest.version.as_str()),
            remote_version: remote.manifest.version,
            local_version,
        })
    }

    /// Run one full sync. Returns the manifest that is now current on disk.
    pub async fn sync(&self) -> LauncherResult<Manifest> {
        tokio::fs::create_dir_all(&self.modpack_root)
            .await
            .map_err(|e| LauncherError::Io {
                path: self.modpack_root.clone(),
                source: e,
            })?;

        let remote = self.fetch_remote().await?;
        let local_version = self.load_snapshot().await.map(|m| m.version);
        let needs_update = local_version.as_deref() != Some(remote.manifest.version.as_str());

        if needs_update {
            info!(
                "Modpack update: {:?} -> {}",
                local_version, remote.manifest.version
            );
        }

        let mut downloaded = 0usize;
        for rel in remote.manifest.target_files() {
            let dest = self.modpack_root.join(rel);
            if !needs_update && dest.exists() {
                continue;
            }
            let url = build_remote_url(&remote.base_url, rel);
            info!("Downloading {}...", rel);
            self.fetcher
                .download_file(&url, &dest)
                .await
                .map_err(|e| {
                    LauncherError::Other(format!("Could not download {} ({}): {}", rel, url, e))
                })?;
            downloaded += 1;
        }

        // The snapshot write is the commit point: it only happens once every
        // listed file is on disk.
        let snapshot = serde_json::to_string_pretty(&remote.raw)?;
        tokio::fs::write(self.snapshot_path(), snapshot)
            .await
            .map_err(|e| LauncherError::Io {
                path: self.snapshot_path(),
                source: e,
            })?;

        info!(
            "Modpack synced at version {} ({} files downloaded)",
            remote.manifest.version, downloaded
        );
        Ok(remote.manifest)
    }

    /// Try each mirror in priority order; the first response that parses and
    /// validates wins. All mirrors failing is fatal and surfaces the last
    /// underlying error.
    async fn fetch_remote(&self) -> LauncherResult<RemoteManifest> {
        let mut last_error: Option<LauncherError> = None;

        for url in &self.manifest_urls {
            match self.fetcher.fetch_json::<Value>(url).await {
                Ok(raw) => match Manifest::validate(&raw) {
                    Ok(manifest) => {
                        return Ok(RemoteManifest {
                            manifest,
                            raw,
                            base_url: base_of(url),
                        });
                    }
                    Err(e) => {
                        warn!("Manifest from {} rejected: {}", url, e);
                        last_error = Some(e);
                    }
                },
                Err(e) => {
                    warn!("Manifest fetch from {} failed: {}", url, e);
                    last_error = Some(e);
                }
            }
        }

        Err(LauncherError::ManifestUnavailable {
            last_error: last_error
                .map(|e| e.to_string())
                .unwrap_or_else(|| "no manifest mirrors configured".to_string()),
        })
    }
}

/// The manifest's own directory is the base all relative paths resolve from.
fn base_of(url: &str) -> String {
    match url.rfind('/') {
        Some(idx) => url[..=idx].to_string(),
        None => url.to_string(),
    }
}

/// Join base and relative path, percent-encoding each segment independently
/// so names with spaces or special characters survive.
fn build_remote_url(base: &str, relative_path: &str) -> String {
    let safe = relative_path
        .split('/')
        .map(|segment| urlencoding::encode(segment).into_owned())
        .collect::<Vec<_>>()
        .join("/");
    if base.ends_with('/') {
        format!("{}{}", base, safe)
    } else {
        format!("{}/{}", base, safe)
    }
}
