use std::collections::HashSet;
use std::path::Path;

use tracing::{debug, info, warn};
use walkdir::WalkDir;

use super::manifest::Manifest;

/// Delete files under `<root>/mods` and `<root>/config` that the manifest
/// does not list, then drop any directories left empty. Returns the number
/// of files removed.
///
/// An empty allow-set skips its directory entirely: a malformed or empty
/// manifest must never wipe a modpack. Individual delete failures are logged
/// and do not abort the batch.
pub fn prune_extras(root: &Path, manifest: &Manifest) -> usize {
    let mut removed = 0;
    removed += prune_dir(&root.join("mods"), &manifest.allowed_mods(), "mod");
    removed += prune_dir(&root.join("config"), &manifest.allowed_config(), "config");
    removed
}

fn prune_dir(dir: &Path, allowed: &HashSet<String>, label: &str) -> usize {
    if allowed.is_empty() {
        debug!("Empty allow-set for {:?}, skipping prune", dir);
        return 0;
    }
    if !dir.is_dir() {
        return 0;
    }

    let mut removed = 0;

    // contents_first so files go before their parent directories, letting the
    // same pass clean up directories that just became empty.
    for entry in WalkDir::new(dir)
        .contents_first(true)
        .into_iter()
        .filter_map(Result::ok)
    {
        let path = entry.path();

        if entry.file_type().is_file() {
            let rel = match path.strip_prefix(dir) {
                Ok(rel) => rel.to_string_lossy().replace('\\', "/"),
                Err(_) => continue,
            };
            if allowed.contains(rel.as_str()) {
                continue;
            }
            match std::fs::remove_file(path) {
                Ok(()) => {
                    info!("Removed extra {}: {}", label, rel);
                    removed += 1;
                }
                Err(e) => warn!("Could not remove {} {}: {}", label, rel, e),
            }
        } else if entry.file_type().is_dir() && path != dir {
            let is_empty = std::fs::read_dir(path)
                .map(|mut entries| entries.next().is_none())
                .unwrap_or(false);
            if is_empty {
                let _ = std::fs::remove_dir(path);
            }
        }
    }

    removed
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn manifest(mods: &[&str], config: &[&str]) -> Manifest {
        Manifest::validate(&json!({
            "version": "1",
            "mods": mods,
            "config": config,
        }))
        .unwrap()
    }

    fn touch(path: &Path) {
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(path, b"x").unwrap();
    }

    #[test]
    fn unlisted_files_are_deleted_listed_files_kept() {
        let dir = tempfile::tempdir().unwrap();
        touch(&dir.path().join("mods/a.jar"));
        touch(&dir.path().join("mods/b.jar"));

        let removed = prune_extras(dir.path(), &manifest(&["mods/a.jar"], &[]));
        assert_eq!(removed, 1);
        assert!(dir.path().join("mods/a.jar").exists());
        assert!(!dir.path().join("mods/b.jar").exists());
    }

    #[test]
    fn emptied_subdirectories_are_removed() {
        let dir = tempfile::tempdir().unwrap();
        touch(&dir.path().join("mods/a.jar"));
        touch(&dir.path().join("mods/old/leftover.jar"));

        let removed = prune_extras(dir.path(), &manifest(&["a.jar"], &[]));
        assert_eq!(removed, 1);
        assert!(dir.path().join("mods/a.jar").exists());
        assert!(!dir.path().join("mods/old").exists());
    }

    #[test]
    fn empty_allow_set_is_a_no_op() {
        let dir = tempfile::tempdir().unwrap();
        touch(&dir.path().join("mods/a.jar"));
        touch(&dir.path().join("config/x.cfg"));

        let removed = prune_extras(dir.path(), &manifest(&[], &[]));
        assert_eq!(removed, 0);
        assert!(dir.path().join("mods/a.jar").exists());
        assert!(dir.path().join("config/x.cfg").exists());
    }

    #[test]
    fn config_entries_match_with_or_without_prefix() {
        let dir = tempfile::tempdir().unwrap();
        touch(&dir.path().join("config/keep.cfg"));
        touch(&dir.path().join("config/also-keep.cfg"));
        touch(&dir.path().join("config/drop.cfg"));

        let removed = prune_extras(
            dir.path(),
            &manifest(&[], &["config/keep.cfg", "also-keep.cfg"]),
        );
        assert_eq!(removed, 1);
        assert!(dir.path().join("config/keep.cfg").exists());
        assert!(dir.path().join("config/also-keep.cfg").exists());
        assert!(!dir.path().join("config/drop.cfg").exists());
    }
}
