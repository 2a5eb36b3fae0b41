use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{info, warn};

use super::profile::{ProfileKind, ProfileSettings};
use crate::core::error::{LauncherError, LauncherResult};

pub const SETTINGS_FILE: &str = "settings.json";

/// The two named profiles persisted in `settings.json`.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct SettingsBundle {
    pub vanilla: ProfileSettings,
    pub modpack: ProfileSettings,
}

impl SettingsBundle {
    pub fn profile(&self, kind: ProfileKind) -> &ProfileSettings {
        match kind {
            ProfileKind::Vanilla => &self.vanilla,
            ProfileKind::Modpack => &self.modpack,
        }
    }

    pub fn set_profile(&mut self, kind: ProfileKind, settings: ProfileSettings) {
        match kind {
            ProfileKind::Vanilla => self.vanilla = settings,
            ProfileKind::Modpack => self.modpack = settings,
        }
    }
}

/// Loads and persists the settings bundle. Loads never fail: anything
/// missing or unparsable degrades to defaults.
pub struct SettingsStore {
    path: PathBuf,
}

impl SettingsStore {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub async fn load(&self) -> SettingsBundle {
        let raw = match tokio::fs::read_to_string(&self.path).await {
            Ok(raw) => raw,
            Err(_) => return SettingsBundle::default(),
        };

        let parsed: Value = match serde_json::from_str(&raw) {
            Ok(parsed) => parsed,
            Err(e) => {
                warn!("Corrupt settings file at {:?}: {}", self.path, e);
                return SettingsBundle::default();
            }
        };

        // Old flat single-profile format: settings at the top level.
        if parsed.get("ramMB").is_some() {
            return SettingsBundle {
                vanilla: ProfileSettings::from_raw(&parsed),
                modpack: ProfileSettings::default(),
            };
        }

        SettingsBundle {
            vanilla: ProfileSettings::from_raw(parsed.get("vanilla").unwrap_or(&Value::Null)),
            modpack: ProfileSettings::from_raw(parsed.get("modpack").unwrap_or(&Value::Null)),
        }
    }

    pub async fn save(&self, bundle: &SettingsBundle) -> LauncherResult<()> {
        if let Some(parent) = self.path.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| LauncherError::Io {
                    path: parent.to_path_buf(),
                    source: e,
                })?;
        }

        let json = serde_json::to_string_pretty(bundle)?;
        tokio::fs::write(&self.path, json)
            .await
            .map_err(|e| LauncherError::Io {
                path: self.path.clone(),
                source: e,
            })?;

        info!("Saved settings to {:?}", self.path);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store(dir: &tempfile::TempDir) -> SettingsStore {
        SettingsStore::new(dir.path().join(SETTINGS_FILE))
    }

    #[tokio::test]
    async fn missing_file_loads_defaults() {
        let dir = tempfile::tempdir().unwrap();
        assert_eq!(store(&dir).load().await, SettingsBundle::default());
    }

    #[tokio::test]
    async fn corrupt_file_loads_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let store = store(&dir);
        tokio::fs::write(store.path(), "{not json").await.unwrap();
        assert_eq!(store.load().await, SettingsBundle::default());
    }

    #[tokio::test]
    async fn save_then_load_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let store = store(&dir);

        let mut bundle = SettingsBundle::default();
        bundle.vanilla.fov = 110;
        bundle.modpack.ram_mb = 8000;
        store.save(&bundle).await.unwrap();

        assert_eq!(store.load().await, bundle);
    }

    #[tokio::test]
    async fn legacy_flat_format_becomes_the_vanilla_profile() {
        let dir = tempfile::tempdir().unwrap();
        let store = store(&dir);
        tokio::fs::write(store.path(), r#"{"ramMB": 6000, "fov": 70}"#)
            .await
            .unwrap();

        let bundle = store.load().await;
        assert_eq!(bundle.vanilla.ram_mb, 6000);
        assert_eq!(bundle.vanilla.fov, 70);
        assert_eq!(bundle.modpack, ProfileSettings::default());
    }

    #[tokio::test]
    async fn loaded_profiles_are_normalized() {
        let dir = tempfile::tempdir().unwrap();
        let store = store(&dir);
        tokio::fs::write(
            store.path(),
            r#"{"vanilla": {"ramMB": 999999, "sensitivity": 150}, "modpack": {"fov": "oops"}}"#,
        )
        .await
        .unwrap();

        let bundle = store.load().await;
        assert_eq!(bundle.vanilla.ram_mb, 20000);
        assert!((bundle.vanilla.sensitivity - 1.5).abs() < f64::EPSILON);
        assert_eq!(bundle.modpack.fov, 90);
    }
}
