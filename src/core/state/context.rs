use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use serde_json::Value;
use tokio::sync::Mutex;
use tracing::info;

use crate::core::error::LauncherResult;
use crate::core::fetch::{FileFetcher, ProgressSink};
use crate::core::http::{build_http_client, DEFAULT_TIMEOUT};
use crate::core::options::modpack_defaults::write_default_modpack_options;
use crate::core::options::reconciler::{apply_user_options, AppliedOptions};
use crate::core::settings::profile::ProfileKind;
use crate::core::settings::store::{SettingsBundle, SettingsStore, SETTINGS_FILE};
use crate::core::sync::engine::{ManifestSyncEngine, UpdateCheck};
use crate::core::sync::manifest::Manifest;
use crate::core::sync::prune;

const APP_DIR_NAME: &str = "MCLauncherData";
const MODPACK_NAME: &str = "banealand";

/// Default manifest mirrors, tried in priority order.
pub const DEFAULT_MANIFEST_URLS: &[&str] = &[
    "https://raw.githubusercontent.com/AleeCrack31/banealand/main/manifest.json",
    "https://cdn.jsdelivr.net/gh/AleeCrack31/banealand@main/manifest.json",
];

pub struct ContextConfig {
    pub data_dir: Option<PathBuf>,
    pub manifest_urls: Vec<String>,
    pub http_timeout: Duration,
    pub progress: Option<ProgressSink>,
}

impl Default for ContextConfig {
    fn default() -> Self {
        Self {
            data_dir: None,
            manifest_urls: DEFAULT_MANIFEST_URLS
                .iter()
                .map(|s| s.to_string())
                .collect(),
            http_timeout: DEFAULT_TIMEOUT,
            progress: None,
        }
    }
}

/// Owns everything the sync and settings operations need: paths, the shared
/// HTTP client, and one mutex per mutated resource so concurrent top-level
/// calls cannot interleave partial writes.
pub struct LauncherContext {
    data_dir: PathBuf,
    modpack_root: PathBuf,
    engine: ManifestSyncEngine,
    settings_store: SettingsStore,
    settings_lock: Mutex<()>,
    modpack_lock: Mutex<()>,
}

impl LauncherContext {
    pub fn new(config: ContextConfig) -> LauncherResult<Self> {
        let data_dir = config.data_dir.unwrap_or_else(default_data_dir);
        let modpack_root = data_dir.join("modpacks").join(MODPACK_NAME);

        let client = build_http_client(config.http_timeout)?;
        let mut fetcher = FileFetcher::new(client);
        if let Some(sink) = config.progress {
            fetcher = fetcher.with_progress(sink);
        }

        let engine = ManifestSyncEngine::new(
            Arc::new(fetcher),
            config.manifest_urls,
            modpack_root.clone(),
        );
        let settings_store = SettingsStore::new(data_dir.join(SETTINGS_FILE));

        Ok(Self {
            data_dir,
            modpack_root,
            engine,
            settings_store,
            settings_lock: Mutex::new(()),
            modpack_lock: Mutex::new(()),
        })
    }

    pub fn data_dir(&self) -> &PathBuf {
        &self.data_dir
    }

    pub fn modpack_root(&self) -> &PathBuf {
        &self.modpack_root
    }

    /// Game root the given profile's options.txt lives in.
    pub fn game_root(&self, profile: ProfileKind) -> PathBuf {
        match profile {
            ProfileKind::Vanilla => self.data_dir.join("minecraft"),
            ProfileKind::Modpack => self.modpack_root.join("minecraft"),
        }
    }

    // ── Modpack operations ──────────────────────────────

    pub async fn sync_modpack(&self) -> LauncherResult<Manifest> {
        let _guard = self.modpack_lock.lock().await;
        self.engine.sync().await
    }

    pub async fn check_modpack_update(&self) -> LauncherResult<UpdateCheck> {
        self.engine.check_update().await
    }

    /// Prune against the given manifest, or the cached snapshot when `None`.
    /// Without any manifest the prune is skipped outright.
    pub async fn prune_extras(&self, manifest: Option<&Manifest>) -> usize {
        let _guard = self.modpack_lock.lock().await;
        let cached;
        let manifest = match manifest {
            Some(manifest) => manifest,
            None => match self.engine.load_snapshot().await {
                Some(snapshot) => {
                    cached = snapshot;
                    &cached
                }
                None => {
                    info!("No manifest available; skipping prune");
                    return 0;
                }
            },
        };
        prune::prune_extras(&self.modpack_root, manifest)
    }

    // ── Settings operations ─────────────────────────────

    pub async fn load_settings(&self) -> SettingsBundle {
        self.settings_store.load().await
    }

    /// Merge `values` onto the stored profile, persist the bundle, and
    /// reconcile the profile's options.txt. The modpack profile always starts
    /// from a blank options slate.
    pub async fn apply_settings(
        &self,
        profile: ProfileKind,
        values: &Value,
    ) -> LauncherResult<AppliedOptions> {
        let _guard = self.settings_lock.lock().await;

        let mut bundle = self.settings_store.load().await;
        let merged = bundle.profile(profile).merge_raw(values);
        bundle.set_profile(profile, merged.clone());
        self.settings_store.save(&bundle).await?;

        let root = self.game_root(profile);
        apply_user_options(&merged, &root, profile == ProfileKind::Modpack).await
    }

    /// Overwrite the modpack's options.txt with the stock baseline.
    pub async fn reset_modpack_options(&self) -> LauncherResult<PathBuf> {
        let _guard = self.settings_lock.lock().await;
        write_default_modpack_options(&self.game_root(ProfileKind::Modpack)).await
    }
}

fn default_data_dir() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(APP_DIR_NAME)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn context(dir: &tempfile::TempDir) -> LauncherContext {
        LauncherContext::new(ContextConfig {
            data_dir: Some(dir.path().to_path_buf()),
            manifest_urls: vec![],
            ..ContextConfig::default()
        })
        .unwrap()
    }

    #[tokio::test]
    async fn apply_settings_persists_and_reconciles_options() {
        let dir = tempfile::tempdir().unwrap();
        let ctx = context(&dir);

        let applied = ctx
            .apply_settings(ProfileKind::Vanilla, &json!({ "fov": 110, "ramMB": 8000 }))
            .await
            .unwrap();

        assert_eq!(applied.path, dir.path().join("minecraft").join("options.txt"));
        assert!(applied.verified.contains("fov:110"));

        let bundle = ctx.load_settings().await;
        assert_eq!(bundle.vanilla.fov, 110);
        assert_eq!(bundle.vanilla.ram_mb, 8000);
        assert_eq!(bundle.modpack.fov, 90);
    }

    #[tokio::test]
    async fn modpack_settings_apply_from_a_blank_slate() {
        let dir = tempfile::tempdir().unwrap();
        let ctx = context(&dir);

        let options_path = ctx.game_root(ProfileKind::Modpack).join("options.txt");
        tokio::fs::create_dir_all(options_path.parent().unwrap())
            .await
            .unwrap();
        tokio::fs::write(&options_path, "modMenuScale:3\r\n")
            .await
            .unwrap();

        let applied = ctx
            .apply_settings(ProfileKind::Modpack, &json!({ "ramMB": 6000 }))
            .await
            .unwrap();
        assert!(!applied.verified.contains("modMenuScale"));
        assert_eq!(ctx.load_settings().await.modpack.ram_mb, 6000);
    }

    #[tokio::test]
    async fn prune_without_snapshot_is_skipped() {
        let dir = tempfile::tempdir().unwrap();
        let ctx = context(&dir);

        std::fs::create_dir_all(ctx.modpack_root().join("mods")).unwrap();
        std::fs::write(ctx.modpack_root().join("mods").join("a.jar"), b"x").unwrap();

        assert_eq!(ctx.prune_extras(None).await, 0);
        assert!(ctx.modpack_root().join("mods").join("a.jar").exists());
    }

    #[tokio::test]
    async fn reset_modpack_options_writes_the_baseline() {
        let dir = tempfile::tempdir().unwrap();
        let ctx = context(&dir);

        let path = ctx.reset_modpack_options().await.unwrap();
        let content = tokio::fs::read_to_string(&path).await.unwrap();
        assert!(content.starts_with("version:1343"));
    }
}
