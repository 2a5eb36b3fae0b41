// ─── KeyValueFileStore ───
// Read/merge/write engine for the game's line-oriented `key:value` options
// files. Values may themselves contain colons; everything after the first
// colon on a line is the value, verbatim. Lines are CRLF-terminated on disk.

use std::collections::BTreeMap;
use std::path::Path;

use tracing::debug;

use crate::core::error::{LauncherError, LauncherResult};

pub type OptionsMap = BTreeMap<String, String>;

/// Read an options file into a mapping.
///
/// A missing or unreadable file is not an error: it yields an empty mapping
/// so callers degrade to their defaults.
pub async fn load(path: &Path) -> OptionsMap {
    let mut map = OptionsMap::new();
    let raw = match tokio::fs::read_to_string(path).await {
        Ok(raw) => raw,
        Err(_) => return map,
    };

    for line in raw.lines() {
        if line.trim().is_empty() {
            continue;
        }
        let (key, value) = match line.split_once(':') {
            Some((key, rest)) => (key, rest),
            None => (line, ""),
        };
        if !key.is_empty() {
            map.insert(key.to_string(), value.to_string());
        }
    }
    map
}

/// Overlay entries with defined values onto `existing` by key.
///
/// `None` overlay values are skipped; there are no deletion semantics.
pub fn merge(existing: &OptionsMap, overlay: &BTreeMap<String, Option<String>>) -> OptionsMap {
    let mut merged = existing.clone();
    for (key, value) in overlay {
        if let Some(value) = value {
            merged.insert(key.clone(), value.clone());
        }
    }
    merged
}

/// Serialize the mapping as CRLF-joined `key:value` lines, write it, then
/// read it back and return the raw content for caller-side verification.
///
/// Write or verify failures are fatal to the calling operation.
pub async fn write_verified(path: &Path, map: &OptionsMap) -> LauncherResult<String> {
    if let Some(parent) = path.parent() {
        tokio::fs::create_dir_all(parent)
            .await
            .map_err(|e| LauncherError::Io {
                path: parent.to_path_buf(),
                source: e,
            })?;
    }

    let content = map
        .iter()
        .map(|(k, v)| format!("{}:{}", k, v))
        .collect::<Vec<_>>()
        .join("\r\n");

    tokio::fs::write(path, &content)
        .await
        .map_err(|e| LauncherError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;

    let verify = tokio::fs::read_to_string(path)
        .await
        .map_err(|e| LauncherError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;

    debug!("Wrote {} option entries to {:?}", map.len(), path);
    Ok(verify)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn load_of_missing_file_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let map = load(&dir.path().join("options.txt")).await;
        assert!(map.is_empty());
    }

    #[tokio::test]
    async fn write_then_load_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sub").join("options.txt");

        let mut map = OptionsMap::new();
        map.insert("fov".to_string(), "90".to_string());
        map.insert("lastServer".to_string(), "".to_string());
        map.insert(
            "resourcePacks".to_string(),
            "[\"a:pack\",\"b:pack\"]".to_string(),
        );

        let verify = write_verified(&path, &map).await.unwrap();
        assert!(verify.contains("fov:90"));
        assert!(verify.contains("\r\n"));

        let loaded = load(&path).await;
        assert_eq!(loaded, map);
    }

    #[tokio::test]
    async fn values_keep_embedded_colons() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("options.txt");
        tokio::fs::write(&path, "key_key.sneak:key.keyboard.left.shift\r\nlastServer:play.example.com:25565\r\n\r\n")
            .await
            .unwrap();

        let map = load(&path).await;
        assert_eq!(map["key_key.sneak"], "key.keyboard.left.shift");
        assert_eq!(map["lastServer"], "play.example.com:25565");
        assert_eq!(map.len(), 2);
    }

    #[test]
    fn merge_skips_undefined_values() {
        let mut existing = OptionsMap::new();
        existing.insert("fov".to_string(), "90".to_string());
        existing.insert("gamma".to_string(), "0.5".to_string());

        let mut overlay = BTreeMap::new();
        overlay.insert("fov".to_string(), Some("110".to_string()));
        overlay.insert("gamma".to_string(), None);
        overlay.insert("maxFps".to_string(), Some("0".to_string()));

        let merged = merge(&existing, &overlay);
        assert_eq!(merged["fov"], "110");
        assert_eq!(merged["gamma"], "0.5");
        assert_eq!(merged["maxFps"], "0");
    }
}
