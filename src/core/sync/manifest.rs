use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::core::error::{LauncherError, LauncherResult};

/// Remote JSON descriptor of the files composing one modpack version.
///
/// Versions are opaque strings compared for strict inequality only; there is
/// no semantic ordering and no content hashing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Manifest {
    pub version: String,
    #[serde(default)]
    pub forge: Option<ForgeFiles>,
    #[serde(default)]
    pub mods: Vec<String>,
    #[serde(default)]
    pub config: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForgeFiles {
    #[serde(default)]
    pub installer: Option<String>,
    #[serde(default)]
    pub universal: Option<String>,
    #[serde(rename = "vanillaJar", default)]
    pub vanilla_jar: Option<String>,
}

impl Manifest {
    /// Schema-validate a fetched manifest body.
    ///
    /// Anything that deserializes but has no usable version, or lists a path
    /// escaping the modpack root, is rejected here rather than surfacing as
    /// missing fields later.
    pub fn validate(raw: &Value) -> LauncherResult<Self> {
        let manifest: Manifest = serde_json::from_value(raw.clone())
            .map_err(|e| LauncherError::InvalidManifest(e.to_string()))?;

        if manifest.version.trim().is_empty() {
            return Err(LauncherError::InvalidManifest(
                "missing or empty version".to_string(),
            ));
        }

        for rel in manifest.target_files() {
            if !is_safe_relative(rel) {
                return Err(LauncherError::InvalidManifest(format!(
                    "unsafe file path '{}'",
                    rel
                )));
            }
        }

        Ok(manifest)
    }

    /// Every file this manifest says the modpack consists of, as paths
    /// relative to both the manifest base URL and the modpack root.
    pub fn target_files(&self) -> Vec<&str> {
        let mut files = Vec::new();
        if let Some(forge) = &self.forge {
            if let Some(installer) = &forge.installer {
                files.push(installer.as_str());
            }
            if let Some(universal) = &forge.universal {
                files.push(universal.as_str());
            }
            if let Some(vanilla_jar) = &forge.vanilla_jar {
                files.push(vanilla_jar.as_str());
            }
        }
        files.extend(self.mods.iter().map(String::as_str));
        files.extend(self.config.iter().map(String::as_str));
        files
    }

    /// Relative paths allowed to exist under `<root>/mods`.
    pub fn allowed_mods(&self) -> HashSet<String> {
        allow_set(&self.mods, "mods/")
    }

    /// Relative paths allowed to exist under `<root>/config`.
    pub fn allowed_config(&self) -> HashSet<String> {
        allow_set(&self.config, "config/")
    }
}

/// Normalize separators and strip any leading slashes.
fn normalize_rel(path: &str) -> String {
    path.replace('\\', "/").trim_start_matches('/').to_string()
}

fn allow_set(entries: &[String], prefix: &str) -> HashSet<String> {
    let mut allowed = HashSet::new();
    for entry in entries {
        let trimmed = normalize_rel(entry);
        if trimmed.is_empty() {
            continue;
        }
        let inside = trimmed.strip_prefix(prefix).unwrap_or(&trimmed);
        if !inside.is_empty() {
            allowed.insert(normalize_rel(inside));
        }
    }
    allowed
}

fn is_safe_relative(path: &str) -> bool {
    let normalized = path.replace('\\', "/");
    if normalized.starts_with('/') || normalized.contains(':') {
        return false;
    }
    !normalized.split('/').any(|segment| segment == "..")
}
